//! Error types for structured error handling.
//!
//! This module provides [`PricingError`], the taxonomy every engine entry point
//! reports through. Module-level errors (`MarketDataError`, and the analytical
//! and lattice errors in `pricer_models`) convert into it via `From`.
//!
//! All variants are local input-validation failures. None of them are
//! transient, so callers should never retry.

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidOptionKind`: Option kind text is neither call nor put
/// - `InvalidInput`: Invalid market data or parameters
/// - `DomainError`: Input outside the mathematical domain of a formula
/// - `DegenerateLattice`: Binomial lattice cannot be built for the inputs
/// - `InvalidStepCount`: Lattice step count below one
/// - `InsufficientData`: No quotes to build a surface from
/// - `EmptyDayGroup`: Surface fallback hit an expiry with no quotes
/// - `UnsupportedModel`: Operation not offered by the selected pricing model
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Option kind is not one of call / put.
    #[error("Invalid option kind: {0:?} (expected \"call\" or \"put\")")]
    InvalidOptionKind(String),

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input outside the domain of the formula (e.g. negative volatility).
    #[error("Domain error: {0}")]
    DomainError(String),

    /// Lattice parameters collapse (u == d).
    #[error("Degenerate lattice: {0}")]
    DegenerateLattice(String),

    /// Lattice step count below one.
    #[error("Invalid step count: {steps} (must be at least 1)")]
    InvalidStepCount {
        /// The rejected step count
        steps: usize,
    },

    /// Not enough market data to proceed.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Day group used by the surface fallback has no quotes.
    #[error("Empty day group: no quotes at {days} days to expiry")]
    EmptyDayGroup {
        /// Days to expiry of the empty group
        days: u32,
    },

    /// Operation not available for the selected model.
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
}
