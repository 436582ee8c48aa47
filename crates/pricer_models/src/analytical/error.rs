//! Error types for analytical pricing operations.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// # Variants
/// - `InvalidSpot`: Non-positive or non-finite spot price
/// - `InvalidVolatility`: Negative or non-finite volatility
/// - `NonFiniteInput`: Rate or other input is NaN / infinite
/// - `UnsupportedModel`: Sensitivities requested from a model that has none
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid spot price (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid volatility (negative).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Input is NaN or infinite.
    #[error("Non-finite input: {name} = {value}")]
    NonFiniteInput {
        /// Parameter name
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// The selected model does not provide the requested output.
    #[error("Unsupported model: {model} does not provide {output}")]
    UnsupportedModel {
        /// Model name
        model: String,
        /// What was requested
        output: String,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { .. } => PricingError::DomainError(err.to_string()),
            AnalyticalError::InvalidSpot { .. } | AnalyticalError::NonFiniteInput { .. } => {
                PricingError::InvalidInput(err.to_string())
            }
            AnalyticalError::UnsupportedModel { .. } => {
                PricingError::UnsupportedModel(err.to_string())
            }
        }
    }
}
