//! # DEGL
//!
//! Differential Evolution with Global and Local neighbourhoods. Individuals
//! sit on a ring; each one blends a global current-to-best/1 move with a local
//! one restricted to its `k` ring neighbours on either side. The blend weight
//! `w` is carried per individual and evolves with the same difference scheme
//! as the chromosomes.
//!
//! Control parameters are fixed: `F = 0.8`, `Cr = 0.9`, `N = 10·D`.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use adaptive_de::{
//!     degl::Degl,
//!     evolution::Optimizer,
//!     population::FitnessGoal,
//!     problem::{functions::sphere, BoundedProblem},
//!     rng::RandomNumberGenerator,
//! };
//!
//! let problem = Arc::new(BoundedProblem::uniform(3, -5.0, 5.0, sphere).unwrap());
//! let mut degl = Degl::new(problem, FitnessGoal::Minimize, RandomNumberGenerator::from_seed(3)).unwrap();
//! let before = degl.best().fitness;
//! degl.evolve_population(30).unwrap();
//! assert!(degl.best().fitness <= before);
//! ```

use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::{
    breeding::binary_crossover,
    error::Result,
    evolution::{GenerationRecord, LogLevel, Optimizer},
    population::{evaluate, FitnessGoal, Population},
    problem::Objective,
    rng::RandomNumberGenerator,
};

pub const SCALE_FACTOR: f64 = 0.8;
pub const CROSSOVER_RATE: f64 = 0.9;
/// Population size per gene.
pub const POPULATION_FACTOR: usize = 10;
pub const MIN_WEIGHT: f64 = 0.05;
pub const MAX_WEIGHT: f64 = 0.95;

/// Ring neighbourhood radius for a population of `population_size`.
pub fn neighbourhood_radius(population_size: usize) -> usize {
    if population_size <= 10 {
        1
    } else {
        population_size / 10 + 1
    }
}

/// The DEGL optimizer.
pub struct Degl<O>
where
    O: Objective + ?Sized,
{
    objective: Arc<O>,
    population: Population,
    weights: Vec<f64>,
    radius: usize,
    rng: RandomNumberGenerator,
    evaluations: usize,
    max_evaluations: Option<usize>,
    log_level: LogLevel,
    history: Vec<GenerationRecord>,
}

impl<O> Degl<O>
where
    O: Objective + ?Sized,
{
    /// Creates an optimizer over a random population of `10·D` individuals.
    ///
    /// # Errors
    ///
    /// Returns an error if the objective has no genes or an initial fitness
    /// evaluation yields NaN.
    pub fn new(objective: Arc<O>, goal: FitnessGoal, mut rng: RandomNumberGenerator) -> Result<Self> {
        let size = POPULATION_FACTOR * objective.number_of_genes();
        let population = Population::random(&*objective, size, goal, &mut rng)?;
        Ok(Self::from_population(objective, population, size, rng))
    }

    /// Creates an optimizer whose individual 0 is `chromosome`.
    ///
    /// # Errors
    ///
    /// Returns `EvolutionError::DimensionMismatch` if `chromosome` does not have
    /// the objective's number of genes, plus the errors of [`Degl::new`].
    pub fn with_initial(
        objective: Arc<O>,
        chromosome: Vec<f64>,
        fitness: Option<f64>,
        goal: FitnessGoal,
        mut rng: RandomNumberGenerator,
    ) -> Result<Self> {
        let size = POPULATION_FACTOR * objective.number_of_genes();
        let population =
            Population::with_initial(&*objective, chromosome, fitness, size, goal, &mut rng)?;
        let evaluations = if fitness.is_some() { size - 1 } else { size };
        Ok(Self::from_population(objective, population, evaluations, rng))
    }

    fn from_population(
        objective: Arc<O>,
        population: Population,
        evaluations: usize,
        mut rng: RandomNumberGenerator,
    ) -> Self {
        let weights = (0..population.len())
            .map(|_| rng.uniform(MIN_WEIGHT, MAX_WEIGHT))
            .collect();
        Self {
            objective,
            radius: neighbourhood_radius(population.len()),
            population,
            weights,
            rng,
            evaluations,
            max_evaluations: None,
            log_level: LogLevel::None,
            history: Vec::new(),
        }
    }

    /// Stops a run once more than `max_evaluations` fitness evaluations were spent.
    pub fn set_max_evaluations(&mut self, max_evaluations: Option<usize>) {
        self.max_evaluations = max_evaluations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// The per-individual blend weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Ring positions within `radius` of `index`: forward neighbours first,
    /// then backward ones.
    fn neighbourhood(&self, index: usize) -> Vec<usize> {
        let n = self.population.len();
        let forward = (1..=self.radius).map(|step| (index + step) % n);
        let backward = (1..=self.radius).map(|step| (index + n - step % n) % n);
        forward.chain(backward).collect()
    }

    /// The best individual among `places`. Ties keep the earliest place.
    fn local_best(&self, places: &[usize]) -> usize {
        let goal = self.population.goal();
        places[1..].iter().fold(places[0], |best, &candidate| {
            if goal.is_better(self.population.fitness(best), self.population.fitness(candidate)) {
                candidate
            } else {
                best
            }
        })
    }

    fn local_pair(&mut self, places: &[usize]) -> (usize, usize) {
        let first = self.rng.uniform_index(places.len());
        let second = loop {
            let r = self.rng.uniform_index(places.len());
            if r != first {
                break r;
            }
        };
        (places[first], places[second])
    }

    fn global_pair(&mut self, avoid: usize) -> (usize, usize) {
        let n = self.population.len();
        let first = loop {
            let r = self.rng.uniform_index(n);
            if r != avoid {
                break r;
            }
        };
        let second = loop {
            let r = self.rng.uniform_index(n);
            if r != avoid && r != first {
                break r;
            }
        };
        (first, second)
    }

    /// Builds the constrained donor of `index` and its mutated blend weight.
    fn mutate(&mut self, index: usize, global_best: usize) -> (Vec<f64>, f64) {
        let places = self.neighbourhood(index);
        let (l1, l2) = self.local_pair(&places);
        let local_best = self.local_best(&places);
        let (g1, g2) = self.global_pair(index);

        let w = &self.weights;
        let weight = (w[index]
            + SCALE_FACTOR * (w[global_best] - w[index])
            + SCALE_FACTOR * (w[g1] - w[g2]))
            .clamp(MIN_WEIGHT, MAX_WEIGHT);

        let x = |i: usize| self.population.chromosome(i);
        let mut donor: Vec<f64> = (0..self.population.dimension())
            .map(|j| {
                let global = x(index)[j]
                    + SCALE_FACTOR * (x(global_best)[j] - x(index)[j])
                    + SCALE_FACTOR * (x(g1)[j] - x(g2)[j]);
                let local = x(index)[j]
                    + SCALE_FACTOR * (x(local_best)[j] - x(index)[j])
                    + SCALE_FACTOR * (x(l1)[j] - x(l2)[j]);
                weight * global + (1.0 - weight) * local
            })
            .collect();
        self.objective.constrain(&mut donor, &mut self.rng);
        (donor, weight)
    }
}

impl<O> Optimizer for Degl<O>
where
    O: Objective + ?Sized,
{
    fn evolve_population(&mut self, max_generations: usize) -> Result<()> {
        let span = info_span!(
            "degl",
            dimension = self.population.dimension(),
            population_size = self.population.len(),
            radius = self.radius
        );
        let _guard = span.enter();
        let goal = self.population.goal();

        for generation in 0..max_generations {
            let global_best = self.population.best_index();
            let mut successes = 0;

            for index in 0..self.population.len() {
                let (donor, weight) = self.mutate(index, global_best);
                let trial = binary_crossover(
                    self.population.chromosome(index),
                    &donor,
                    CROSSOVER_RATE,
                    &mut self.rng,
                );
                let fitness = evaluate(&*self.objective, &trial)?;
                self.evaluations += 1;

                let parent = self.population.fitness(index);
                if goal.is_not_worse(parent, fitness) {
                    if goal.is_better(parent, fitness) {
                        successes += 1;
                    }
                    self.population.replace(index, trial, fitness);
                    self.weights[index] = weight;
                }
            }

            let record = GenerationRecord {
                generation,
                best_fitness: self.population.best().fitness,
                population_size: self.population.len(),
                archive_size: 0,
                successes,
                evaluations: self.evaluations,
            };
            match self.log_level {
                LogLevel::Minimal => info!(
                    generation,
                    best_fitness = record.best_fitness,
                    "generation complete"
                ),
                LogLevel::Verbose => info!(
                    generation,
                    best_fitness = record.best_fitness,
                    successes,
                    evaluations = self.evaluations,
                    "generation complete"
                ),
                LogLevel::None => {}
            }
            self.history.push(record);

            if matches!(self.max_evaluations, Some(max) if self.evaluations > max) {
                debug!(
                    evaluations = self.evaluations,
                    generation, "evaluation budget exhausted"
                );
                break;
            }
        }
        Ok(())
    }

    fn population(&self) -> &Population {
        &self.population
    }
}

impl<O> std::fmt::Debug for Degl<O>
where
    O: Objective + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Degl")
            .field("population_size", &self.population.len())
            .field("radius", &self.radius)
            .field("evaluations", &self.evaluations)
            .finish()
    }
}
