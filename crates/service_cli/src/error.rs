//! CLI error types

use pricer_core::market_data::MarketDataError;
use pricer_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors reported by `optsurf` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file is not valid JSON of the expected shape
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Offending file
        path: String,
        /// Parser message
        message: String,
    },

    /// Argument combination or value rejected before pricing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Engine rejected the inputs
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Quote or surface data rejected
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Output serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
