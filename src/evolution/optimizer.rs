use crate::{error::Result, population::Population};

/// Represents the result of an evolution: the best chromosome and its fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct EvolutionResult {
    /// The best chromosome found.
    pub chromosome: Vec<f64>,
    /// The fitness of the chromosome.
    pub fitness: f64,
}

/// Summary of one completed generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// Zero-based generation index within the `evolve_population` call.
    pub generation: usize,
    /// Best fitness in the population after selection.
    pub best_fitness: f64,
    /// Population size at the end of the generation.
    pub population_size: usize,
    /// Archive size at the end of the generation.
    pub archive_size: usize,
    /// Number of trials that strictly improved on their parent.
    pub successes: usize,
    /// Fitness evaluations performed so far, including the initial population.
    pub evaluations: usize,
}

/// The contract shared by every differential evolution variant.
///
/// Each variant owns its [`Population`] and evolves it in place; the caller
/// reads the outcome through [`Optimizer::best`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use adaptive_de::{
///     evolution::{Optimizer, ShadeOptions},
///     problem::{functions::sphere, BoundedProblem},
///     rng::RandomNumberGenerator,
///     shade::Shade,
/// };
///
/// fn run<O: Optimizer>(optimizer: &mut O) -> f64 {
///     optimizer.evolve_population(20).unwrap();
///     optimizer.best().fitness
/// }
///
/// let problem = Arc::new(BoundedProblem::uniform(2, -5.0, 5.0, sphere).unwrap());
/// let mut shade = Shade::new(
///     problem,
///     ShadeOptions::default(),
///     RandomNumberGenerator::from_seed(1),
/// )
/// .unwrap();
/// assert!(run(&mut shade) < 1.0);
/// ```
pub trait Optimizer {
    /// Runs up to `max_generations` generations.
    ///
    /// # Errors
    ///
    /// Returns an error if the objective yields a NaN fitness or a control
    /// parameter distribution cannot be sampled. The population keeps every
    /// replacement committed before the failure.
    fn evolve_population(&mut self, max_generations: usize) -> Result<()>;

    /// The best individual under the optimizer's fitness goal.
    fn best(&self) -> EvolutionResult {
        self.population().best()
    }

    /// The current population.
    fn population(&self) -> &Population;
}
