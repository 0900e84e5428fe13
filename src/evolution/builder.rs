use std::sync::Arc;

use crate::{
    error::{EvolutionError, OptionExt, Result},
    problem::Objective,
    rng::RandomNumberGenerator,
    shade::Shade,
};

use super::ShadeOptions;

/// Fluent construction of a [`Shade`] engine.
///
/// Only the objective is mandatory. Without options the SHADE defaults are
/// used, and without a generator one is seeded from system entropy.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use adaptive_de::{
///     evolution::{Optimizer, ShadeBuilder, ShadeOptions},
///     problem::{functions::sphere, BoundedProblem},
/// };
///
/// let problem = Arc::new(BoundedProblem::uniform(3, -5.0, 5.0, sphere).unwrap());
/// let mut shade = ShadeBuilder::new()
///     .with_objective(problem)
///     .with_options(ShadeOptions::builder().linear_size_reduction(true).build().unwrap())
///     .with_initial_chromosome(vec![0.5, 0.5, 0.5])
///     .with_seed(7)
///     .build()
///     .unwrap();
///
/// shade.evolve_population(10).unwrap();
/// assert!(shade.best().fitness <= 0.75);
/// ```
pub struct ShadeBuilder<O>
where
    O: Objective + ?Sized,
{
    objective: Option<Arc<O>>,
    options: Option<ShadeOptions>,
    initial_chromosome: Option<Vec<f64>>,
    initial_fitness: Option<f64>,
    rng: Option<RandomNumberGenerator>,
}

impl<O> ShadeBuilder<O>
where
    O: Objective + ?Sized,
{
    pub fn new() -> Self {
        Self {
            objective: None,
            options: None,
            initial_chromosome: None,
            initial_fitness: None,
            rng: None,
        }
    }

    pub fn with_objective(mut self, objective: Arc<O>) -> Self {
        self.objective = Some(objective);
        self
    }

    pub fn with_options(mut self, options: ShadeOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Seeds individual 0 of the population with `chromosome`.
    pub fn with_initial_chromosome(mut self, chromosome: Vec<f64>) -> Self {
        self.initial_chromosome = Some(chromosome);
        self
    }

    /// Supplies the known fitness of the initial chromosome.
    pub fn with_initial_fitness(mut self, fitness: f64) -> Self {
        self.initial_fitness = Some(fitness);
        self
    }

    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Shorthand for `with_rng(RandomNumberGenerator::from_seed(seed))`.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(RandomNumberGenerator::from_seed(seed))
    }

    /// Builds the engine and evaluates its initial population.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if no objective was given or if an
    /// initial fitness was given without an initial chromosome, plus any error
    /// of [`Shade::new`] / [`Shade::with_initial`].
    pub fn build(self) -> Result<Shade<O>> {
        let objective = self
            .objective
            .ok_or_else_evolution(|| EvolutionError::Configuration("Objective not specified".to_string()))?;
        let options = self.options.unwrap_or_default();
        let rng = self.rng.unwrap_or_default();

        match (self.initial_chromosome, self.initial_fitness) {
            (Some(chromosome), fitness) => {
                Shade::with_initial(objective, chromosome, fitness, options, rng)
            }
            (None, Some(_)) => Err(EvolutionError::Configuration(
                "Initial fitness given without an initial chromosome".to_string(),
            )),
            (None, None) => Shade::new(objective, options, rng),
        }
    }
}

impl<O> Default for ShadeBuilder<O>
where
    O: Objective + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}
