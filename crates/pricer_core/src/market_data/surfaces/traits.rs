//! Volatility surface trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Implied volatility lookup by strike and expiry.
///
/// # Contract
///
/// - `volatility(strike, expiry)` returns the implied volatility σ(K, T)
///   with `expiry` in years
/// - `strike_domain()` returns the valid range of strike prices
/// - `expiry_domain()` returns the valid range of expiry times in years
///
/// # Invariants
///
/// - σ > 0 for all valid (strike, expiry) pairs
///
/// # Example
///
/// ```
/// use pricer_core::market_data::surfaces::{SurfaceBuilder, SurfaceGridSpec, VolatilitySurface};
/// use pricer_core::market_data::VolQuote;
///
/// let quotes = [VolQuote::new(365, 100.0, 0.2).unwrap()];
/// let spec = SurfaceGridSpec::new((365.0, 365.0), (100.0, 100.0)).with_resolution(1, 1);
/// let surface = SurfaceBuilder::new(100.0, spec).unwrap().build(&quotes).unwrap();
///
/// let sigma = surface.volatility(100.0, 1.0).unwrap();
/// assert_eq!(sigma, 0.2);
/// ```
pub trait VolatilitySurface<T: Float> {
    /// Return the implied volatility for given strike and expiry.
    ///
    /// # Arguments
    ///
    /// * `strike` - Strike price (must be > 0)
    /// * `expiry` - Time to expiry in years (must be > 0)
    ///
    /// # Returns
    ///
    /// * `Ok(sigma)` - Implied volatility
    /// * `Err(MarketDataError::InvalidStrike)` - If strike <= 0
    /// * `Err(MarketDataError::InvalidExpiry)` - If expiry <= 0
    /// * `Err(MarketDataError::OutOfBounds)` - If outside valid domain
    fn volatility(&self, strike: T, expiry: T) -> Result<T, MarketDataError>;

    /// Return the valid strike domain `(K_min, K_max)`.
    fn strike_domain(&self) -> (T, T);

    /// Return the valid expiry domain `(T_min, T_max)` in years.
    fn expiry_domain(&self) -> (T, T);
}
