//! # Selection
//!
//! Greedy one-to-one survivor selection and the cache of `pbest` candidates
//! consulted by the mutation operator.
pub mod greedy;
pub mod top_p;

pub use greedy::{select, Selection};
pub use top_p::TopPCache;
