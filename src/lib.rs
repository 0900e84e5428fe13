//! # adaptive-de
//!
//! Adaptive Differential Evolution for continuous black-box optimization.
//!
//! The crate provides SHADE (Success-History based Adaptive Differential
//! Evolution), its L-SHADE variant with linear population size reduction, and
//! the ring-topology DEGL variant. All of them implement the
//! [`Optimizer`] trait and evolve a [`Population`] against an [`Objective`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use adaptive_de::{
//!     problem::{functions::sphere, BoundedProblem},
//!     Optimizer, ShadeBuilder, ShadeOptions,
//! };
//!
//! let problem = Arc::new(BoundedProblem::uniform(5, -100.0, 100.0, sphere).unwrap());
//! let mut shade = ShadeBuilder::new()
//!     .with_objective(problem)
//!     .with_options(ShadeOptions::default())
//!     .with_seed(2024)
//!     .build()
//!     .unwrap();
//!
//! let start = shade.best().fitness;
//! shade.evolve_population(100).unwrap();
//! assert!(shade.best().fitness < start);
//! ```
pub mod breeding;
pub mod degl;
pub mod error;
pub mod evolution;
pub mod population;
pub mod problem;
pub mod rng;
pub mod selection;
pub mod shade;

// Re-export commonly used types for convenience
pub use degl::Degl;
pub use error::{EvolutionError, OptionExt, Result};
pub use evolution::{
    EvolutionResult, GenerationRecord, LogLevel, Optimizer, ShadeBuilder, ShadeOptions,
};
pub use population::{FitnessGoal, Population};
pub use problem::{BoundaryPolicy, BoundedProblem, Objective};
pub use rng::RandomNumberGenerator;
pub use shade::Shade;
