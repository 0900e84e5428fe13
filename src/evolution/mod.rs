pub mod builder;
pub mod optimizer;
pub mod options;

pub use builder::ShadeBuilder;
pub use optimizer::{EvolutionResult, GenerationRecord, Optimizer};
pub use options::{LogLevel, ShadeOptions, ShadeOptionsBuilder};
