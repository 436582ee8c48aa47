//! Core traits for numeric genericity and option pricing.
//!
//! This module defines:
//! - Generic floating-point operations (`Float` trait)
//! - Single-option valuation (`OptionPricer` trait)

/// Generic floating-point trait for numeric computations.
///
/// Re-exported so downstream crates can write formulas once for both
/// `f64` and `f32`.
///
/// # Examples
/// ```
/// use pricer_core::traits::Float;
///
/// fn compute_discount<T: Float>(rate: T, time: T) -> T {
///     (-rate * time).exp()
/// }
///
/// let discount_f64: f64 = compute_discount(0.05, 1.0);
/// assert!((discount_f64 - 0.951229).abs() < 1e-5);
/// ```
pub use num_traits::Float;

mod pricer;

pub use pricer::OptionPricer;
