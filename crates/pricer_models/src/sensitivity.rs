//! Price and Greek surfaces over spot × days to expiry.
//!
//! Strike, volatility and rate are held fixed while spot sweeps
//! `[0.7·S, 1.3·S]` and days to expiry sweep a caller-supplied range. Every
//! node is an independent Black-Scholes evaluation with `T = days / 365`;
//! rows (one per day) are computed in parallel.

use pricer_core::math::linspace;
use pricer_core::types::{days_to_years, OptionSpec, OptionType, PricingError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::analytical::{BlackScholes, GreekKind};

/// Default number of points on each axis.
pub const DEFAULT_SENSITIVITY_POINTS: usize = 50;

/// Lower end of the spot axis as a fraction of the reference spot.
pub const SPOT_AXIS_LOWER: f64 = 0.7;

/// Upper end of the spot axis as a fraction of the reference spot.
pub const SPOT_AXIS_UPPER: f64 = 1.3;

/// Fixed inputs and axis layout for a sensitivity surface.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::sensitivity::SensitivityRequest;
///
/// // Strike from the midpoint of a strike range
/// let request = SensitivityRequest::from_strike_range(
///     150.0, (120.0, 180.0), 0.25, 0.05, OptionType::Call, (7.0, 365.0),
/// ).unwrap();
/// assert_eq!(request.strike(), 150.0);
///
/// let (lo, hi) = request.spot_range();
/// assert!((lo - 105.0).abs() < 1e-9 && (hi - 195.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityRequest {
    spot: f64,
    strike: f64,
    volatility: f64,
    rate: f64,
    kind: OptionType,
    day_range: (f64, f64),
    spot_points: usize,
    day_points: usize,
}

impl SensitivityRequest {
    /// Creates a request at the default 50×50 resolution.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` if the option inputs are invalid or the
    /// day range is not `0 ≤ min ≤ max` with finite ends;
    /// `PricingError::DomainError` for a negative volatility.
    pub fn new(
        spot: f64,
        strike: f64,
        volatility: f64,
        rate: f64,
        kind: OptionType,
        day_range: (f64, f64),
    ) -> Result<Self, PricingError> {
        let (lo, hi) = day_range;
        if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
            return Err(PricingError::InvalidInput(format!(
                "day range [{}, {}] must satisfy 0 <= min <= max",
                lo, hi
            )));
        }
        // Validates spot, strike, vol and rate in one place
        OptionSpec::new(spot, strike, 0.0, rate, volatility, kind)?;

        Ok(Self {
            spot,
            strike,
            volatility,
            rate,
            kind,
            day_range,
            spot_points: DEFAULT_SENSITIVITY_POINTS,
            day_points: DEFAULT_SENSITIVITY_POINTS,
        })
    }

    /// Request whose strike is the midpoint of `strike_range`.
    pub fn from_strike_range(
        spot: f64,
        strike_range: (f64, f64),
        volatility: f64,
        rate: f64,
        kind: OptionType,
        day_range: (f64, f64),
    ) -> Result<Self, PricingError> {
        let strike = strike_range.0 + (strike_range.1 - strike_range.0) / 2.0;
        Self::new(spot, strike, volatility, rate, kind, day_range)
    }

    /// Same inputs at a different resolution.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` if either axis has no points.
    pub fn with_resolution(self, spot_points: usize, day_points: usize) -> Result<Self, PricingError> {
        if spot_points == 0 || day_points == 0 {
            return Err(PricingError::InvalidInput(format!(
                "sensitivity grid needs at least one point per axis, got {}x{}",
                spot_points, day_points
            )));
        }
        Ok(Self {
            spot_points,
            day_points,
            ..self
        })
    }

    /// Reference spot.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Fixed strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Fixed volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Option side.
    #[inline]
    pub fn kind(&self) -> OptionType {
        self.kind
    }

    /// `[0.7·S, 1.3·S]`.
    #[inline]
    pub fn spot_range(&self) -> (f64, f64) {
        (self.spot * SPOT_AXIS_LOWER, self.spot * SPOT_AXIS_UPPER)
    }

    /// Days-to-expiry range.
    #[inline]
    pub fn day_range(&self) -> (f64, f64) {
        self.day_range
    }

    fn spot_axis(&self) -> Vec<f64> {
        let (lo, hi) = self.spot_range();
        linspace(lo, hi, self.spot_points)
    }

    fn day_axis(&self) -> Vec<f64> {
        linspace(self.day_range.0, self.day_range.1, self.day_points)
    }
}

/// Values over spot (columns) × days to expiry (rows).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityGrid {
    spots: Vec<f64>,
    days: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl SensitivityGrid {
    /// Spot axis.
    pub fn spots(&self) -> &[f64] {
        &self.spots
    }

    /// Days-to-expiry axis.
    pub fn days(&self) -> &[f64] {
        &self.days
    }

    /// Rows of values, one per day.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.days.len(), self.spots.len())
    }

    /// Value at day index `i` and spot index `j`.
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }
}

/// Black-Scholes price at every (days, spot) node.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::sensitivity::{price_surface, SensitivityRequest};
///
/// let request = SensitivityRequest::new(100.0, 100.0, 0.2, 0.05, OptionType::Call, (0.0, 365.0))
///     .unwrap()
///     .with_resolution(5, 3)
///     .unwrap();
/// let grid = price_surface(&request).unwrap();
///
/// assert_eq!(grid.shape(), (3, 5));
/// // Zero days: intrinsic value, so the lowest spot is worthless
/// assert_eq!(grid.value(0, 0), Some(0.0));
/// ```
pub fn price_surface(request: &SensitivityRequest) -> Result<SensitivityGrid, PricingError> {
    evaluate(request, "price", |model, strike, expiry, kind| {
        model.price(strike, expiry, kind)
    })
}

/// One analytic Greek at every (days, spot) node.
pub fn greek_surface(
    request: &SensitivityRequest,
    greek: GreekKind,
) -> Result<SensitivityGrid, PricingError> {
    evaluate(request, greek.name(), |model, strike, expiry, kind| {
        model.greeks(strike, expiry, kind).get(greek)
    })
}

fn evaluate<F>(
    request: &SensitivityRequest,
    output: &str,
    node: F,
) -> Result<SensitivityGrid, PricingError>
where
    F: Fn(&BlackScholes<f64>, f64, f64, OptionType) -> f64 + Sync,
{
    let spots = request.spot_axis();
    let days = request.day_axis();
    debug!(
        output,
        rows = days.len(),
        cols = spots.len(),
        strike = request.strike,
        "evaluating sensitivity grid"
    );

    let models = spots
        .iter()
        .map(|&s| BlackScholes::new(s, request.rate, request.volatility))
        .collect::<Result<Vec<_>, _>>()?;

    let values: Vec<Vec<f64>> = days
        .par_iter()
        .map(|&d| {
            let expiry = days_to_years(d);
            models
                .iter()
                .map(|model| node(model, request.strike, expiry, request.kind))
                .collect()
        })
        .collect();

    Ok(SensitivityGrid {
        spots,
        days,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn request(kind: OptionType) -> SensitivityRequest {
        SensitivityRequest::new(100.0, 100.0, 0.25, 0.03, kind, (7.0, 365.0)).unwrap()
    }

    #[test]
    fn test_default_resolution_and_axes() {
        let grid = price_surface(&request(OptionType::Call)).unwrap();
        assert_eq!(grid.shape(), (50, 50));
        assert_relative_eq!(grid.spots()[0], 70.0, epsilon = 1e-12);
        assert_relative_eq!(*grid.spots().last().unwrap(), 130.0, epsilon = 1e-12);
        assert_eq!(grid.days()[0], 7.0);
        assert_eq!(*grid.days().last().unwrap(), 365.0);
    }

    #[test]
    fn test_nodes_match_direct_pricing() {
        let request = request(OptionType::Put).with_resolution(7, 4).unwrap();
        let grid = price_surface(&request).unwrap();
        for (i, &d) in grid.days().iter().enumerate() {
            for (j, &s) in grid.spots().iter().enumerate() {
                let direct = BlackScholes::new(s, 0.03, 0.25)
                    .unwrap()
                    .price(100.0, d / 365.0, OptionType::Put);
                assert_relative_eq!(grid.value(i, j).unwrap(), direct, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_call_delta_increases_with_spot() {
        let grid = greek_surface(&request(OptionType::Call), GreekKind::Delta).unwrap();
        for row in grid.rows() {
            assert!(row.windows(2).all(|w| w[1] >= w[0]));
            assert!(row.iter().all(|&d| (0.0..=1.0).contains(&d)));
        }
    }

    #[test]
    fn test_gamma_and_vega_non_negative() {
        for greek in [GreekKind::Gamma, GreekKind::Vega] {
            let grid = greek_surface(&request(OptionType::Put), greek).unwrap();
            assert!(grid.rows().iter().flatten().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_strike_from_range_midpoint() {
        let r = SensitivityRequest::from_strike_range(
            100.0,
            (80.0, 120.0),
            0.2,
            0.05,
            OptionType::Call,
            (30.0, 90.0),
        )
        .unwrap();
        assert_eq!(r.strike(), 100.0);
    }

    #[test]
    fn test_invalid_requests() {
        assert!(SensitivityRequest::new(100.0, 100.0, 0.2, 0.05, OptionType::Call, (90.0, 30.0)).is_err());
        assert!(SensitivityRequest::new(100.0, 100.0, 0.2, 0.05, OptionType::Call, (-1.0, 30.0)).is_err());
        assert!(matches!(
            SensitivityRequest::new(100.0, 100.0, -0.2, 0.05, OptionType::Call, (1.0, 30.0)),
            Err(PricingError::DomainError(_))
        ));
        assert!(request(OptionType::Call).with_resolution(0, 10).is_err());
    }

    #[test]
    fn test_zero_days_row_is_intrinsic() {
        let r = SensitivityRequest::new(100.0, 100.0, 0.2, 0.05, OptionType::Put, (0.0, 30.0))
            .unwrap()
            .with_resolution(3, 2)
            .unwrap();
        let grid = price_surface(&r).unwrap();
        let expired = &grid.rows()[0];
        assert_relative_eq!(expired[0], 30.0, epsilon = 1e-12);
        assert_eq!(expired[1], 0.0);
        assert_eq!(expired[2], 0.0);
    }
}
