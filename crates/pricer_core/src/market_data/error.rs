//! Market data error types.
//!
//! This module provides structured error handling for quote validation,
//! surface construction and volatility surface lookups.

use crate::types::PricingError;
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidQuote`: Quote with non-positive days/strike or unusable volatility
/// - `InvalidGrid`: Output grid specification that cannot be laid out
/// - `InvalidStrike`: Non-positive strike price in a lookup
/// - `InvalidExpiry`: Non-positive time to expiry in a lookup
/// - `OutOfBounds`: Query outside valid domain
/// - `InsufficientData`: Not enough quotes for construction
/// - `EmptyDayGroup`: Fallback expiry has no quotes
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InsufficientData { got: 0, need: 1 };
/// assert_eq!(format!("{}", err), "Insufficient data: got 0, need 1");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Quote rejected at construction.
    #[error("Invalid quote: {reason}")]
    InvalidQuote {
        /// Why the quote was rejected
        reason: String,
    },

    /// Grid specification rejected.
    #[error("Invalid grid: {message}")]
    InvalidGrid {
        /// Description of the problem
        message: String,
    },

    /// Invalid strike price (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid expiry (non-positive).
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Query point outside valid domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of quotes provided
        got: usize,
        /// Minimum number of quotes required
        need: usize,
    },

    /// No quotes observed on the expiry chosen by the nearest-day lookup.
    #[error("Empty day group: no quotes at {days} days to expiry")]
    EmptyDayGroup {
        /// Days to expiry of the empty group
        days: u32,
    },
}

impl From<MarketDataError> for PricingError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::InsufficientData { .. } => {
                PricingError::InsufficientData(err.to_string())
            }
            MarketDataError::EmptyDayGroup { days } => PricingError::EmptyDayGroup { days },
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}
