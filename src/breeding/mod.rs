//! # Breeding
//!
//! The variation operators of differential evolution: mutation builds a donor
//! vector from the current population (and archive), crossover mixes the donor
//! with its target to form the trial vector.
pub mod crossover;
pub mod mutation;

pub use crossover::{binary_crossover, exponential_crossover, Crossover};
pub use mutation::{current_to_pbest, DonorPool};
