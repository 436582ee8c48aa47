//! Core option and error types.
//!
//! This module provides:
//! - `option`: [`OptionType`], [`ExerciseStyle`] and the validated [`OptionSpec`]
//! - `time`: Actual/365 day-count helpers for expiries quoted as dates or days
//! - `error`: The [`PricingError`] taxonomy shared by every engine entry point
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod error;
pub mod option;
pub mod time;

// Re-export commonly used types at module level
pub use error::PricingError;
pub use option::{ExerciseStyle, OptionSpec, OptionType};
pub use time::{days_between, days_to_years, year_fraction, DAYS_PER_YEAR};
