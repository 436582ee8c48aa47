//! optsurf command line library
//!
//! As part of the **S**ervice layer, this crate wires the pricing engines to
//! files and the terminal: configuration loading, market snapshot parsing,
//! and the command implementations behind the `optsurf` binary.

pub mod commands;
pub mod config;
pub mod error;
pub mod snapshot;

pub use error::{CliError, Result};

// Re-export pricer dependencies for integration
pub use pricer_core;
pub use pricer_models;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
