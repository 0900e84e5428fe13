//! # SHADE
//!
//! Success-History based Adaptive Differential Evolution, with the optional
//! Linear population Size Reduction of L-SHADE.
//!
//! One generation of [`Shade::evolve_population`]:
//!
//! 1. refresh the top-p cache from the current fitness values;
//! 2. for every individual, draw `Cr` and `F` from the success-history memory,
//!    build a current-to-pbest/1 mutant, constrain it, cross it over with the
//!    individual and evaluate it. The trial replaces the individual if it is not
//!    worse; a strict improvement also archives the displaced parent and records
//!    `(Cr, F, |Δf|)` as a success;
//! 3. fold the successes into memory slot `g mod H`;
//! 4. with L-SHADE, shrink the population along the linear schedule.
//!
//! In sequential mode step 2 works in place: individual `i` already sees the
//! replacements made for `0..i`. In parallel mode step 2 is split into a
//! parallel propose phase over the generation-start state and a serial commit
//! phase (see [`parallel`]).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use adaptive_de::{
//!     evolution::{LogLevel, Optimizer, ShadeOptions},
//!     problem::{functions::rastrigin, BoundedProblem},
//!     rng::RandomNumberGenerator,
//!     shade::Shade,
//! };
//!
//! let problem = Arc::new(BoundedProblem::uniform(4, -5.12, 5.12, rastrigin).unwrap());
//! let options = ShadeOptions::builder()
//!     .linear_size_reduction(true)
//!     .log_level(LogLevel::Minimal)
//!     .build()
//!     .unwrap();
//!
//! let mut shade = Shade::new(problem, options, RandomNumberGenerator::from_seed(42)).unwrap();
//! shade.evolve_population(50).unwrap();
//!
//! assert!(shade.population().len() < 72);
//! assert_eq!(shade.history().len(), 50);
//! println!("best: {:?}", shade.best());
//! ```

pub mod archive;
pub mod memory;
pub mod parallel;
pub mod reduction;

pub use archive::Archive;
pub use memory::{CrossoverMean, SuccessHistoryMemory, SuccessSet};

use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::{
    breeding::{current_to_pbest, Crossover, DonorPool},
    error::Result,
    evolution::{GenerationRecord, LogLevel, Optimizer, ShadeOptions},
    population::{evaluate, Population},
    problem::Objective,
    rng::RandomNumberGenerator,
    selection::{select, Selection, TopPCache},
};

use reduction::linear_target_size;

/// A trial vector together with the control parameters that produced it.
#[derive(Debug, Clone)]
pub(crate) struct Trial {
    pub index: usize,
    pub crossover_rate: f64,
    pub scale_factor: f64,
    pub chromosome: Vec<f64>,
}

/// Read-only view of the engine state a trial is built from.
pub(crate) struct GenerationView<'a, O>
where
    O: Objective + ?Sized,
{
    objective: &'a O,
    population: &'a Population,
    archive: &'a Archive,
    memory: &'a SuccessHistoryMemory,
    top_p: &'a [usize],
    crossover: Crossover,
}

impl<'a, O> GenerationView<'a, O>
where
    O: Objective + ?Sized,
{
    pub(crate) fn new(
        objective: &'a O,
        population: &'a Population,
        archive: &'a Archive,
        memory: &'a SuccessHistoryMemory,
        top_p: &'a [usize],
        crossover: Crossover,
    ) -> Self {
        Self {
            objective,
            population,
            archive,
            memory,
            top_p,
            crossover,
        }
    }

    pub(crate) fn objective(&self) -> &'a O {
        self.objective
    }

    pub(crate) fn population_size(&self) -> usize {
        self.population.len()
    }

    /// Builds the trial for individual `index`. Does not evaluate it.
    pub(crate) fn propose(&self, index: usize, rng: &mut RandomNumberGenerator) -> Result<Trial> {
        let slot = self.memory.random_slot(rng);
        let crossover_rate = self.memory.crossover_rate(slot, rng)?;
        let scale_factor = self.memory.scale_factor(slot, rng)?;

        let pool = DonorPool::new(self.population, self.archive);
        let mut mutant = current_to_pbest(index, scale_factor, self.top_p, &pool, rng);
        self.objective.constrain(&mut mutant, rng);

        let chromosome = self.crossover.apply(
            self.population.chromosome(index),
            &mutant,
            crossover_rate,
            rng,
        );

        Ok(Trial {
            index,
            crossover_rate,
            scale_factor,
            chromosome,
        })
    }
}

/// The SHADE / L-SHADE optimizer.
///
/// The engine owns its population, archive, memory and random generator; the
/// objective is shared through an `Arc`. Construct it with [`Shade::new`],
/// [`Shade::with_initial`] or [`crate::evolution::ShadeBuilder`].
pub struct Shade<O>
where
    O: Objective + ?Sized,
{
    objective: Arc<O>,
    options: ShadeOptions,
    population: Population,
    initial_size: usize,
    memory: SuccessHistoryMemory,
    archive: Archive,
    top_p: TopPCache,
    rng: RandomNumberGenerator,
    parallel: bool,
    evaluations: usize,
    history: Vec<GenerationRecord>,
}

impl<O> Shade<O>
where
    O: Objective + ?Sized,
{
    /// Creates an engine over a random population of `population_factor · D`
    /// individuals.
    ///
    /// # Errors
    ///
    /// Returns an error if the objective has no genes, if the population would
    /// be smaller than [`crate::population::MIN_POPULATION_SIZE`], or if an
    /// initial fitness evaluation yields NaN.
    pub fn new(objective: Arc<O>, options: ShadeOptions, mut rng: RandomNumberGenerator) -> Result<Self> {
        let size = options.population_size(objective.number_of_genes());
        let population = Population::random(&*objective, size, options.get_goal(), &mut rng)?;
        Ok(Self::from_population(objective, population, size, options, rng))
    }

    /// Creates an engine whose individual 0 is `chromosome`.
    ///
    /// When `fitness` is given it is used as the fitness of `chromosome` without
    /// evaluating the objective.
    ///
    /// # Errors
    ///
    /// Returns `EvolutionError::DimensionMismatch` if `chromosome` does not have
    /// the objective's number of genes, plus the errors of [`Shade::new`].
    pub fn with_initial(
        objective: Arc<O>,
        chromosome: Vec<f64>,
        fitness: Option<f64>,
        options: ShadeOptions,
        mut rng: RandomNumberGenerator,
    ) -> Result<Self> {
        let size = options.population_size(objective.number_of_genes());
        let population = Population::with_initial(
            &*objective,
            chromosome,
            fitness,
            size,
            options.get_goal(),
            &mut rng,
        )?;
        let evaluations = if fitness.is_some() { size - 1 } else { size };
        Ok(Self::from_population(objective, population, evaluations, options, rng))
    }

    fn from_population(
        objective: Arc<O>,
        population: Population,
        evaluations: usize,
        options: ShadeOptions,
        rng: RandomNumberGenerator,
    ) -> Self {
        let size = population.len();
        Self {
            objective,
            memory: SuccessHistoryMemory::new(options.get_memory_size()),
            archive: Archive::new(options.archive_capacity(size)),
            top_p: TopPCache::new(options.p_best_count(size)),
            parallel: options.get_parallel(),
            initial_size: size,
            population,
            options,
            rng,
            evaluations,
            history: Vec::new(),
        }
    }

    /// Runs subsequent generations on parallel workers.
    pub fn enable_parallel(&mut self) {
        self.parallel = true;
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn objective(&self) -> &Arc<O> {
        &self.objective
    }

    pub fn options(&self) -> &ShadeOptions {
        &self.options
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn memory(&self) -> &SuccessHistoryMemory {
        &self.memory
    }

    /// Current number of pbest candidates.
    pub fn p(&self) -> usize {
        self.top_p.p()
    }

    /// Fitness evaluations performed so far, including the initial population.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// One record per completed generation, across all `evolve_population` calls.
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    fn worker_count(&self) -> usize {
        self.options
            .get_num_workers()
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }

    fn budget_exhausted(&self) -> bool {
        matches!(self.options.get_max_evaluations(), Some(max) if self.evaluations > max)
    }

    fn sequential_generation(&mut self, successes: &mut SuccessSet) -> Result<()> {
        let crossover = self.options.get_crossover();
        for index in 0..self.population.len() {
            let trial = GenerationView::new(
                &*self.objective,
                &self.population,
                &self.archive,
                &self.memory,
                self.top_p.indices(),
                crossover,
            )
            .propose(index, &mut self.rng)?;
            let fitness = evaluate(&*self.objective, &trial.chromosome)?;
            self.evaluations += 1;
            self.commit(trial, fitness, successes);
        }
        Ok(())
    }

    fn parallel_generation(&mut self, successes: &mut SuccessSet) -> Result<()> {
        let workers = self.worker_count();
        let generators = parallel::worker_generators(&mut self.rng, workers);
        let view = GenerationView::new(
            &*self.objective,
            &self.population,
            &self.archive,
            &self.memory,
            self.top_p.indices(),
            self.options.get_crossover(),
        );
        let trials = parallel::propose_all(&view, generators)?;

        self.evaluations += trials.len();
        for (trial, fitness) in trials {
            self.commit(trial, fitness, successes);
        }
        Ok(())
    }

    fn commit(&mut self, trial: Trial, fitness: f64, successes: &mut SuccessSet) {
        let outcome = select(&mut self.population, trial.index, trial.chromosome, fitness);
        if let Selection::Improved {
            displaced,
            improvement,
        } = outcome
        {
            self.archive.insert(displaced, &mut self.rng);
            successes.record(trial.crossover_rate, trial.scale_factor, improvement);
        }
    }

    fn reduce_population(&mut self, generation: usize, max_generations: usize) {
        let target = linear_target_size(self.initial_size, generation, max_generations);
        if target >= self.population.len() {
            return;
        }
        debug!(
            from = self.population.len(),
            to = target,
            "linear population size reduction"
        );
        self.population.retain_best(target);
        self.archive.set_capacity(self.options.archive_capacity(target));
        self.top_p.set_p(self.options.p_best_count(target));
    }

    fn log_generation(&self, record: &GenerationRecord, slot: usize) {
        match self.options.get_log_level() {
            LogLevel::Minimal => info!(
                generation = record.generation,
                best_fitness = record.best_fitness,
                "generation complete"
            ),
            LogLevel::Verbose => info!(
                generation = record.generation,
                best_fitness = record.best_fitness,
                population_size = record.population_size,
                archive_size = record.archive_size,
                successes = record.successes,
                evaluations = record.evaluations,
                memory_slot = slot,
                "generation complete"
            ),
            LogLevel::None => {}
        }
    }
}

impl<O> Optimizer for Shade<O>
where
    O: Objective + ?Sized,
{
    fn evolve_population(&mut self, max_generations: usize) -> Result<()> {
        let span = info_span!(
            "shade",
            dimension = self.population.dimension(),
            population_size = self.population.len(),
            parallel = self.parallel,
            linear_size_reduction = self.options.get_linear_size_reduction()
        );
        let _guard = span.enter();

        if self.parallel {
            debug!(workers = self.worker_count(), "parallel generations");
        }

        let mut successes = SuccessSet::new();
        for generation in 0..max_generations {
            successes.clear();
            self.top_p.refresh(&self.population);

            if self.parallel {
                self.parallel_generation(&mut successes)?;
            } else {
                self.sequential_generation(&mut successes)?;
            }

            let slot = generation % self.memory.size();
            self.memory.update(&successes, slot);

            let exhausted = self.budget_exhausted();
            if !exhausted && self.options.get_linear_size_reduction() {
                self.reduce_population(generation, max_generations);
            }

            let record = GenerationRecord {
                generation,
                best_fitness: self.population.best().fitness,
                population_size: self.population.len(),
                archive_size: self.archive.len(),
                successes: successes.len(),
                evaluations: self.evaluations,
            };
            self.log_generation(&record, slot);
            self.history.push(record);

            if exhausted {
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

impl<O> std::fmt::Debug for Shade<O>
where
    O: Objective + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shade")
            .field("options", &self.options)
            .field("population_size", &self.population.len())
            .field("archive_size", &self.archive.len())
            .field("p", &self.top_p.p())
            .field("parallel", &self.parallel)
            .field("evaluations", &self.evaluations)
            .finish()
    }
}
