//! Discrete-time lattice pricing with early exercise.
//!
//! - [`BinomialTree`]: Cox-Ross-Rubinstein tree for American and European options
//! - [`LatticeConfig`]: step count and exercise style
//! - [`LatticeError`]: lattice construction failures

pub mod binomial;
pub mod error;

pub use binomial::{BinomialTree, LatticeConfig, DEFAULT_LATTICE_STEPS};
pub use error::LatticeError;
