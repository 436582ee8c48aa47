//! Day-count helpers for expiries quoted in calendar days.
//!
//! Quote tables carry expiration dates; the engine works in days to expiry
//! (surface axes) and in year fractions (pricing). Both conversions use
//! Actual/365 fixed.

use chrono::NaiveDate;

/// Days per year under Actual/365 fixed.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Signed number of calendar days from `valuation` to `expiration`.
///
/// Negative when the expiration lies in the past.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::time::days_between;
///
/// let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
/// let expiry = NaiveDate::from_ymd_opt(2025, 2, 21).unwrap();
/// assert_eq!(days_between(today, expiry), 32);
/// assert_eq!(days_between(expiry, today), -32);
/// ```
#[inline]
pub fn days_between(valuation: NaiveDate, expiration: NaiveDate) -> i64 {
    (expiration - valuation).num_days()
}

/// Converts days to expiry into a year fraction (Act/365).
///
/// # Examples
/// ```
/// use pricer_core::types::time::days_to_years;
///
/// assert_eq!(days_to_years(365.0), 1.0);
/// assert_eq!(days_to_years(0.0), 0.0);
/// ```
#[inline]
pub fn days_to_years(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}

/// Converts a year fraction into days to expiry (Act/365).
#[inline]
pub fn years_to_days(years: f64) -> f64 {
    years * DAYS_PER_YEAR
}

/// Year fraction between two dates (Act/365), negative if already expired.
#[inline]
pub fn year_fraction(valuation: NaiveDate, expiration: NaiveDate) -> f64 {
    days_to_years(days_between(valuation, expiration) as f64)
}
