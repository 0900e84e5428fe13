//! # Objective Trait
//!
//! The `Objective` trait is the boundary between the optimizers and the problem
//! being optimized. An objective knows how many genes a chromosome has, how to
//! draw a random feasible chromosome, how to project an arbitrary chromosome
//! back into its feasible region, and how to score a chromosome.
//!
//! The optimizers never inspect bounds themselves: every mutant passes through
//! [`Objective::constrain`] before its fitness is computed.
//!
//! ## Example
//!
//! ```rust
//! use adaptive_de::problem::Objective;
//! use adaptive_de::rng::RandomNumberGenerator;
//!
//! struct Sphere {
//!     dimension: usize,
//! }
//!
//! impl Objective for Sphere {
//!     fn number_of_genes(&self) -> usize {
//!         self.dimension
//!     }
//!
//!     fn randomize(&self, chromosome: &mut [f64], rng: &mut RandomNumberGenerator) {
//!         chromosome.iter_mut().for_each(|gene| *gene = rng.uniform(-5.0, 5.0));
//!     }
//!
//!     fn constrain(&self, chromosome: &mut [f64], _rng: &mut RandomNumberGenerator) {
//!         chromosome.iter_mut().for_each(|gene| *gene = gene.clamp(-5.0, 5.0));
//!     }
//!
//!     fn fitness(&self, chromosome: &[f64]) -> f64 {
//!         chromosome.iter().map(|x| x * x).sum()
//!     }
//! }
//! ```
//!
//! For the common case of independent `[lower, upper]` bounds per gene, use
//! [`BoundedProblem`] instead of implementing the trait by hand.

pub mod bounded;
pub mod functions;

pub use bounded::{BoundaryPolicy, BoundedProblem};

use crate::rng::RandomNumberGenerator;

/// Trait for the black-box problems the optimizers minimize or maximize.
///
/// Implementations must be `Send + Sync`: in parallel mode `fitness` is called
/// concurrently from several workers. `fitness` must therefore be free of side
/// effects visible to other calls, and deterministic for a given chromosome.
pub trait Objective: Send + Sync {
    /// Returns the dimensionality of the problem.
    fn number_of_genes(&self) -> usize;

    /// Overwrites every gene of `chromosome` with a random feasible value.
    fn randomize(&self, chromosome: &mut [f64], rng: &mut RandomNumberGenerator);

    /// Projects `chromosome` into the feasible region in place.
    ///
    /// Applying `constrain` to an already feasible chromosome must leave it unchanged.
    fn constrain(&self, chromosome: &mut [f64], rng: &mut RandomNumberGenerator);

    /// Calculates the fitness of `chromosome`.
    fn fitness(&self, chromosome: &[f64]) -> f64;
}
