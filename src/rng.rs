//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness for an
//! optimizer run. It wraps the `rand` crate's `StdRng` and exposes the handful of
//! draws the differential evolution operators need: uniform reals, uniform
//! indices, and normal / Cauchy samples from `rand_distr`.
//!
//! A generator is created once by the caller, moved into the engine, and never
//! reseeded. Parallel workers receive child generators derived with
//! [`RandomNumberGenerator::split`], so every worker has its own stream while a
//! fixed seed still reproduces the whole run.
//!
//! ## Example
//!
//! ```rust
//! use adaptive_de::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let x = rng.uniform(-5.0, 5.0);
//! assert!((-5.0..5.0).contains(&x));
//!
//! let i = rng.uniform_index(10);
//! assert!(i < 10);
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Cauchy, Distribution, Normal};

use crate::error::{EvolutionError, Result};

/// A wrapper around the `rand` crate's `StdRng` that provides the draws used by
/// the evolution operators.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible runs, tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derives an independent child generator from this generator's stream.
    ///
    /// Successive calls yield distinct children; the sequence of children is fully
    /// determined by the parent's seed.
    pub fn split(&mut self) -> Self {
        Self::from_seed(self.rng.gen::<u64>())
    }

    /// Draws a real number uniformly from `[from, to)`.
    ///
    /// A degenerate interval (`from >= to`) returns `from`.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        if from < to {
            self.rng.gen_range(from..to)
        } else {
            from
        }
    }

    /// Draws a real number uniformly from `[0, 1)`.
    pub fn probability(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws an index uniformly from `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn uniform_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot draw an index from an empty range");
        self.rng.gen_range(0..len)
    }

    /// Draws from a normal distribution with the given mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns `EvolutionError::RandomGeneration` if the standard deviation is
    /// negative or not finite.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        if !(std_dev >= 0.0 && std_dev.is_finite()) {
            return Err(EvolutionError::RandomGeneration(format!(
                "normal({mean}, {std_dev}): standard deviation must be finite and non-negative"
            )));
        }
        let dist = Normal::new(mean, std_dev)
            .map_err(|e| EvolutionError::RandomGeneration(format!("normal({mean}, {std_dev}): {e}")))?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Draws from a Cauchy distribution with the given location and scale.
    ///
    /// # Errors
    ///
    /// Returns `EvolutionError::RandomGeneration` if the scale is not positive.
    pub fn cauchy(&mut self, location: f64, scale: f64) -> Result<f64> {
        let dist = Cauchy::new(location, scale)
            .map_err(|e| EvolutionError::RandomGeneration(format!("cauchy({location}, {scale}): {e}")))?;
        Ok(dist.sample(&mut self.rng))
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
