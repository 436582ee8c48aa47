//! Error types for lattice pricing.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Binomial lattice errors.
///
/// # Examples
/// ```
/// use pricer_models::lattice::LatticeError;
///
/// let err = LatticeError::InvalidStepCount { steps: 0 };
/// assert_eq!(format!("{}", err), "Invalid step count: 0 (must be at least 1)");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LatticeError {
    /// Fewer than one time step.
    #[error("Invalid step count: {steps} (must be at least 1)")]
    InvalidStepCount {
        /// The rejected step count
        steps: usize,
    },

    /// Up and down factors coincide.
    #[error("Degenerate lattice: {reason}")]
    Degenerate {
        /// Which condition failed
        reason: String,
    },
}

impl From<LatticeError> for PricingError {
    fn from(err: LatticeError) -> Self {
        match err {
            LatticeError::InvalidStepCount { steps } => PricingError::InvalidStepCount { steps },
            LatticeError::Degenerate { reason } => PricingError::DegenerateLattice(reason),
        }
    }
}
