//! # Error Types
//!
//! This module defines the error type shared by every optimizer in the crate.
//! Errors are raised while configuring or constructing an engine (invalid
//! options, a seed chromosome with the wrong number of genes) and while running
//! one (an objective returning NaN, a distribution that cannot be sampled).
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use adaptive_de::error::{EvolutionError, Result};
//!
//! fn check_dimension(expected: usize, got: usize) -> Result<()> {
//!     if expected != got {
//!         return Err(EvolutionError::DimensionMismatch { expected, got });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_dimension(3, 3).is_ok());
//! assert!(check_dimension(3, 2).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use adaptive_de::error::{EvolutionError, OptionExt};
//!
//! fn best_fitness(fitness: &[f64]) -> adaptive_de::error::Result<f64> {
//!     fitness
//!         .iter()
//!         .cloned()
//!         .reduce(f64::min)
//!         .ok_or_else_evolution(|| EvolutionError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_fitness(&[3.0, 1.0, 2.0]).unwrap(), 1.0);
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running an optimizer.
#[derive(Error, Debug)]
pub enum EvolutionError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when a chromosome does not have the objective's number of genes.
    #[error("Dimension mismatch: expected {expected} genes, got {got}")]
    DimensionMismatch {
        /// Number of genes declared by the objective
        expected: usize,
        /// Number of genes actually supplied
        got: usize,
    },

    /// Error that occurs when the population would be too small for mutation.
    #[error("Population size {size} is too small (must be >= {minimum})")]
    PopulationTooSmall {
        /// The requested population size
        size: usize,
        /// The smallest population the operators can work with
        minimum: usize,
    },

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness evaluation yields an unusable value.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when a random number generation fails.
    #[error("Random generation error: {0}")]
    RandomGeneration(String),
}

/// A specialized Result type for optimizer operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `EvolutionError`.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, EvolutionError>` using
    /// a closure to generate the error.
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError,
    {
        self.ok_or_else(err_fn)
    }
}
