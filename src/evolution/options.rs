//! # ShadeOptions
//!
//! The `ShadeOptions` struct holds the control constants of a SHADE / L-SHADE run:
//! how the population size scales with the problem dimension, the share of the
//! population eligible as `pbest`, the archive capacity ratio, the length of the
//! success-history memory, the crossover operator, and the switches for linear
//! population size reduction, parallel generations and evaluation budgets.
//!
//! The defaults are the published SHADE / L-SHADE settings.
//!
//! ## Example
//!
//! ```rust
//! use adaptive_de::evolution::options::{LogLevel, ShadeOptions};
//! use adaptive_de::population::FitnessGoal;
//!
//! // Default SHADE settings, minimizing
//! let shade = ShadeOptions::default();
//! assert_eq!(shade.get_memory_size(), 6);
//!
//! // L-SHADE, maximizing, with an evaluation budget
//! let lshade = ShadeOptions::builder()
//!     .linear_size_reduction(true)
//!     .goal(FitnessGoal::Maximize)
//!     .max_evaluations(50_000)
//!     .log_level(LogLevel::Minimal)
//!     .build()
//!     .unwrap();
//! assert!(lshade.get_linear_size_reduction());
//! ```
//!
//! ## LogLevel
//!
//! - `Verbose`: one `info!` event per generation with population, archive,
//!   success and evaluation counts.
//! - `Minimal`: one `info!` event per generation with the best fitness.
//! - `None`: no per-generation events.

use crate::{
    breeding::Crossover,
    error::{EvolutionError, Result},
    population::FitnessGoal,
};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Verbose,
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShadeOptions {
    /// Initial population size per gene
    population_factor: usize,
    /// Share of the population eligible as pbest
    p_best_rate: f64,
    /// Archive capacity relative to the population size
    archive_rate: f64,
    /// Number of success-history slots (H)
    memory_size: usize,
    crossover: Crossover,
    linear_size_reduction: bool,
    goal: FitnessGoal,
    parallel: bool,
    /// Number of parallel workers; `None` uses rayon's thread count
    num_workers: Option<usize>,
    /// Stop once this many fitness evaluations have been spent
    max_evaluations: Option<usize>,
    log_level: LogLevel,
}

impl ShadeOptions {
    pub fn get_population_factor(&self) -> usize {
        self.population_factor
    }

    pub fn get_p_best_rate(&self) -> f64 {
        self.p_best_rate
    }

    pub fn get_archive_rate(&self) -> f64 {
        self.archive_rate
    }

    pub fn get_memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn get_crossover(&self) -> Crossover {
        self.crossover
    }

    pub fn get_linear_size_reduction(&self) -> bool {
        self.linear_size_reduction
    }

    pub fn get_goal(&self) -> FitnessGoal {
        self.goal
    }

    pub fn get_parallel(&self) -> bool {
        self.parallel
    }

    pub fn get_num_workers(&self) -> Option<usize> {
        self.num_workers
    }

    pub fn get_max_evaluations(&self) -> Option<usize> {
        self.max_evaluations
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Initial population size for a problem with `dimension` genes.
    pub fn population_size(&self, dimension: usize) -> usize {
        self.population_factor * dimension
    }

    /// Number of pbest candidates for a population of `population_size`.
    ///
    /// Rounded to the nearest integer, never below one nor above the population.
    pub fn p_best_count(&self, population_size: usize) -> usize {
        let p = (self.p_best_rate * population_size as f64).round() as usize;
        p.clamp(1, population_size.max(1))
    }

    /// Archive capacity for a population of `population_size`.
    pub fn archive_capacity(&self, population_size: usize) -> usize {
        (self.archive_rate * population_size as f64) as usize
    }

    /// Sets whether L-SHADE's linear population size reduction is used.
    pub fn set_linear_size_reduction(&mut self, enabled: bool) {
        self.linear_size_reduction = enabled;
    }

    /// Sets the fitness goal.
    pub fn set_goal(&mut self, goal: FitnessGoal) {
        self.goal = goal;
    }

    /// Sets whether generations run on parallel workers.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Sets the log level.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Returns a builder for creating a `ShadeOptions` instance.
    pub fn builder() -> ShadeOptionsBuilder {
        ShadeOptionsBuilder::default()
    }
}

impl Default for ShadeOptions {
    fn default() -> Self {
        Self {
            population_factor: 18,
            p_best_rate: 0.11,
            archive_rate: 2.6,
            memory_size: 6,
            crossover: Crossover::Binomial,
            linear_size_reduction: false,
            goal: FitnessGoal::Minimize,
            parallel: false,
            num_workers: None,
            max_evaluations: None,
            log_level: LogLevel::None,
        }
    }
}

/// Builder for `ShadeOptions`.
///
/// Unset fields fall back to the defaults of [`ShadeOptions::default`].
#[derive(Debug, Clone, Default)]
pub struct ShadeOptionsBuilder {
    population_factor: Option<usize>,
    p_best_rate: Option<f64>,
    archive_rate: Option<f64>,
    memory_size: Option<usize>,
    crossover: Option<Crossover>,
    linear_size_reduction: Option<bool>,
    goal: Option<FitnessGoal>,
    parallel: Option<bool>,
    num_workers: Option<usize>,
    max_evaluations: Option<usize>,
    log_level: Option<LogLevel>,
}

impl ShadeOptionsBuilder {
    pub fn population_factor(mut self, value: usize) -> Self {
        self.population_factor = Some(value);
        self
    }

    pub fn p_best_rate(mut self, value: f64) -> Self {
        self.p_best_rate = Some(value);
        self
    }

    pub fn archive_rate(mut self, value: f64) -> Self {
        self.archive_rate = Some(value);
        self
    }

    pub fn memory_size(mut self, value: usize) -> Self {
        self.memory_size = Some(value);
        self
    }

    pub fn crossover(mut self, value: Crossover) -> Self {
        self.crossover = Some(value);
        self
    }

    pub fn linear_size_reduction(mut self, value: bool) -> Self {
        self.linear_size_reduction = Some(value);
        self
    }

    pub fn goal(mut self, value: FitnessGoal) -> Self {
        self.goal = Some(value);
        self
    }

    /// Shorthand for `goal(FitnessGoal::from_minimize(value))`.
    pub fn minimize(self, value: bool) -> Self {
        self.goal(FitnessGoal::from_minimize(value))
    }

    pub fn parallel(mut self, value: bool) -> Self {
        self.parallel = Some(value);
        self
    }

    pub fn num_workers(mut self, value: usize) -> Self {
        self.num_workers = Some(value);
        self
    }

    pub fn max_evaluations(mut self, value: usize) -> Self {
        self.max_evaluations = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds the `ShadeOptions` instance.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the population factor or memory size is
    /// zero, the pbest rate is outside `(0, 1]`, the archive rate is negative or
    /// not finite, or the worker count or evaluation budget is zero.
    pub fn build(self) -> Result<ShadeOptions> {
        let defaults = ShadeOptions::default();
        let options = ShadeOptions {
            population_factor: self.population_factor.unwrap_or(defaults.population_factor),
            p_best_rate: self.p_best_rate.unwrap_or(defaults.p_best_rate),
            archive_rate: self.archive_rate.unwrap_or(defaults.archive_rate),
            memory_size: self.memory_size.unwrap_or(defaults.memory_size),
            crossover: self.crossover.unwrap_or(defaults.crossover),
            linear_size_reduction: self
                .linear_size_reduction
                .unwrap_or(defaults.linear_size_reduction),
            goal: self.goal.unwrap_or(defaults.goal),
            parallel: self.parallel.unwrap_or(defaults.parallel),
            num_workers: self.num_workers,
            max_evaluations: self.max_evaluations,
            log_level: self.log_level.unwrap_or(defaults.log_level),
        };

        if options.population_factor == 0 {
            return Err(EvolutionError::Configuration(
                "Population factor must be greater than 0".to_string(),
            ));
        }

        if !(options.p_best_rate > 0.0 && options.p_best_rate <= 1.0) {
            return Err(EvolutionError::Configuration(
                "pbest rate must be in the range (0, 1]".to_string(),
            ));
        }

        if !(options.archive_rate >= 0.0 && options.archive_rate.is_finite()) {
            return Err(EvolutionError::Configuration(
                "Archive rate must be a finite, non-negative number".to_string(),
            ));
        }

        if options.memory_size == 0 {
            return Err(EvolutionError::Configuration(
                "Memory size must be greater than 0".to_string(),
            ));
        }

        if options.num_workers == Some(0) {
            return Err(EvolutionError::Configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if options.max_evaluations == Some(0) {
            return Err(EvolutionError::Configuration(
                "Evaluation budget must be greater than 0".to_string(),
            ));
        }

        Ok(options)
    }
}
