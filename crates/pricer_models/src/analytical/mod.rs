//! Analytical pricing for European options.
//!
//! This module provides:
//! - Black-Scholes closed-form price and Greeks ([`BlackScholes`], [`AnalyticPricer`])
//! - Sensitivity containers ([`Greeks`], [`GreekKind`])
//! - Standard normal CDF / PDF
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: formulas run in `f64` or `f32`
//! - **Defined boundaries**: expired options and zero volatility are priced,
//!   not rejected
//! - **Numerical Stability**: erfc-based CDF with exact reflection symmetry

pub mod black_scholes;
pub mod distributions;
pub mod error;
pub mod greeks;

// Re-export main types at module level
pub use black_scholes::{AnalyticPricer, BlackScholes};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use greeks::{GreekKind, Greeks};
