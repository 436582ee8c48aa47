//! Regular (days, strike) volatility grid and its layout specification.

use serde::{Deserialize, Serialize};

use super::VolatilitySurface;
use crate::market_data::error::MarketDataError;
use crate::market_data::quotes::VolQuote;
use crate::math::grid::linspace;
use crate::types::time::{days_to_years, years_to_days};

/// Default number of points on each surface axis.
pub const DEFAULT_GRID_POINTS: usize = 50;

/// Upper bound on the day resolution of a fitted grid.
const MAX_FITTED_DAY_POINTS: usize = 50;

/// Points per observed expiry in a fitted grid.
const FITTED_DAY_POINTS_PER_EXPIRY: usize = 5;

/// Layout of the output grid: axis ranges and resolution.
///
/// # Examples
/// ```
/// use pricer_core::market_data::surfaces::SurfaceGridSpec;
///
/// let spec = SurfaceGridSpec::new((7.0, 365.0), (75.0, 225.0));
/// assert_eq!(spec.day_points(), 50);
/// assert_eq!(spec.strike_points(), 50);
///
/// let coarse = spec.with_resolution(10, 20);
/// assert_eq!(coarse.day_axis().len(), 10);
/// assert_eq!(coarse.strike_axis().len(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGridSpec {
    day_range: (f64, f64),
    strike_range: (f64, f64),
    day_points: usize,
    strike_points: usize,
}

impl SurfaceGridSpec {
    /// Grid over the given ranges at the default 50×50 resolution.
    pub fn new(day_range: (f64, f64), strike_range: (f64, f64)) -> Self {
        Self {
            day_range,
            strike_range,
            day_points: DEFAULT_GRID_POINTS,
            strike_points: DEFAULT_GRID_POINTS,
        }
    }

    /// Same ranges with a different resolution.
    pub fn with_resolution(self, day_points: usize, strike_points: usize) -> Self {
        Self {
            day_points,
            strike_points,
            ..self
        }
    }

    /// Grid fitted to the observed quotes.
    ///
    /// The day axis spans the observed days to expiry with
    /// `min(50, 5 × distinct expiries)` points. The strike axis uses
    /// `strike_range` when given, else the observed strike extremes, with
    /// 50 points.
    ///
    /// # Errors
    /// `MarketDataError::InsufficientData` when `quotes` is empty.
    pub fn fitted(
        quotes: &[VolQuote],
        strike_range: Option<(f64, f64)>,
    ) -> Result<Self, MarketDataError> {
        let first = quotes.first().ok_or(MarketDataError::InsufficientData { got: 0, need: 1 })?;

        let mut days: Vec<u32> = quotes.iter().map(|q| q.days()).collect();
        days.sort_unstable();
        days.dedup();

        let day_range = (
            f64::from(days[0]),
            f64::from(days[days.len() - 1]),
        );

        let strike_range = strike_range.unwrap_or_else(|| {
            quotes.iter().fold((first.strike(), first.strike()), |(lo, hi), q| {
                (lo.min(q.strike()), hi.max(q.strike()))
            })
        });

        let day_points = MAX_FITTED_DAY_POINTS.min(FITTED_DAY_POINTS_PER_EXPIRY * days.len());

        Ok(Self::new(day_range, strike_range).with_resolution(day_points, DEFAULT_GRID_POINTS))
    }

    /// Checks that the grid can be laid out.
    ///
    /// # Errors
    /// `MarketDataError::InvalidGrid` for non-finite or reversed ranges,
    /// non-positive strikes, negative days, or an axis with no points.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        let invalid = |message: String| Err(MarketDataError::InvalidGrid { message });

        let (d_lo, d_hi) = self.day_range;
        let (k_lo, k_hi) = self.strike_range;

        if !(d_lo.is_finite() && d_hi.is_finite()) {
            return invalid(format!("day range must be finite, got [{}, {}]", d_lo, d_hi));
        }
        if !(k_lo.is_finite() && k_hi.is_finite()) {
            return invalid(format!("strike range must be finite, got [{}, {}]", k_lo, k_hi));
        }
        if d_lo > d_hi {
            return invalid(format!("day range is reversed: [{}, {}]", d_lo, d_hi));
        }
        if k_lo > k_hi {
            return invalid(format!("strike range is reversed: [{}, {}]", k_lo, k_hi));
        }
        if d_lo < 0.0 {
            return invalid(format!("day range must be non-negative, got {}", d_lo));
        }
        if k_lo <= 0.0 {
            return invalid(format!("strike range must be positive, got {}", k_lo));
        }
        if self.day_points == 0 || self.strike_points == 0 {
            return invalid(format!(
                "each axis needs at least one point, got {}×{}",
                self.day_points, self.strike_points
            ));
        }
        Ok(())
    }

    /// `(min_days, max_days)`.
    #[inline]
    pub fn day_range(&self) -> (f64, f64) {
        self.day_range
    }

    /// `(min_strike, max_strike)`.
    #[inline]
    pub fn strike_range(&self) -> (f64, f64) {
        self.strike_range
    }

    /// Number of day nodes.
    #[inline]
    pub fn day_points(&self) -> usize {
        self.day_points
    }

    /// Number of strike nodes.
    #[inline]
    pub fn strike_points(&self) -> usize {
        self.strike_points
    }

    /// Day axis nodes.
    pub fn day_axis(&self) -> Vec<f64> {
        linspace(self.day_range.0, self.day_range.1, self.day_points)
    }

    /// Strike axis nodes.
    pub fn strike_axis(&self) -> Vec<f64> {
        linspace(self.strike_range.0, self.strike_range.1, self.strike_points)
    }
}

/// Implied volatility sampled on a regular (days, strike) grid.
///
/// Rows are expiries, columns are strikes: `vols[day_idx][strike_idx]`.
/// Immutable once built; produced by
/// [`SurfaceBuilder`](super::SurfaceBuilder).
///
/// Lookups through [`VolatilitySurface`] take expiry in years (days / 365)
/// and interpolate bilinearly between nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolSurfaceGrid {
    days: Vec<f64>,
    strikes: Vec<f64>,
    vols: Vec<Vec<f64>>,
}

impl VolSurfaceGrid {
    pub(crate) fn from_rows(days: Vec<f64>, strikes: Vec<f64>, vols: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(days.len(), vols.len());
        debug_assert!(vols.iter().all(|row| row.len() == strikes.len()));
        Self {
            days,
            strikes,
            vols,
        }
    }

    /// Day axis.
    #[inline]
    pub fn days(&self) -> &[f64] {
        &self.days
    }

    /// Strike axis.
    #[inline]
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// All rows, one per day node.
    #[inline]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.vols
    }

    /// `(day nodes, strike nodes)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.days.len(), self.strikes.len())
    }

    /// Row for the `i`-th day node.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.vols.get(i).map(Vec::as_slice)
    }

    /// Volatility at node `(day_idx, strike_idx)`.
    pub fn value(&self, day_idx: usize, strike_idx: usize) -> Option<f64> {
        self.vols.get(day_idx).and_then(|row| row.get(strike_idx)).copied()
    }

    /// Smallest and largest node volatility.
    pub fn vol_range(&self) -> (f64, f64) {
        self.vols
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Bilinear lookup with the expiry given in days.
    ///
    /// # Errors
    /// `MarketDataError::OutOfBounds` if either coordinate lies outside the grid.
    pub fn vol_at_days(&self, days: f64, strike: f64) -> Result<f64, MarketDataError> {
        check_within(&self.days, days)?;
        check_within(&self.strikes, strike)?;
        Ok(self.bilinear(days, strike))
    }

    fn bilinear(&self, days: f64, strike: f64) -> f64 {
        let (i0, i1, wd) = bracket(&self.days, days);
        let (j0, j1, wk) = bracket(&self.strikes, strike);

        let lower = lerp(self.vols[i0][j0], self.vols[i0][j1], wk);
        let upper = lerp(self.vols[i1][j0], self.vols[i1][j1], wk);
        lerp(lower, upper, wd)
    }
}

impl VolatilitySurface<f64> for VolSurfaceGrid {
    fn volatility(&self, strike: f64, expiry: f64) -> Result<f64, MarketDataError> {
        if strike <= 0.0 {
            return Err(MarketDataError::InvalidStrike { strike });
        }
        if expiry <= 0.0 {
            return Err(MarketDataError::InvalidExpiry { expiry });
        }

        let (t_min, t_max) = self.expiry_domain();
        if !(t_min..=t_max).contains(&expiry) {
            return Err(MarketDataError::OutOfBounds {
                x: expiry,
                min: t_min,
                max: t_max,
            });
        }
        check_within(&self.strikes, strike)?;

        // Round trip through years can leave the last ulp outside the axis
        let (d_min, d_max) = axis_bounds(&self.days);
        let days = years_to_days(expiry).clamp(d_min, d_max);
        Ok(self.bilinear(days, strike))
    }

    fn strike_domain(&self) -> (f64, f64) {
        axis_bounds(&self.strikes)
    }

    fn expiry_domain(&self) -> (f64, f64) {
        let (d_min, d_max) = axis_bounds(&self.days);
        (days_to_years(d_min), days_to_years(d_max))
    }
}

#[inline]
fn axis_bounds(axis: &[f64]) -> (f64, f64) {
    (axis[0], axis[axis.len() - 1])
}

fn check_within(axis: &[f64], x: f64) -> Result<(), MarketDataError> {
    let (min, max) = axis_bounds(axis);
    if (min..=max).contains(&x) {
        Ok(())
    } else {
        Err(MarketDataError::OutOfBounds { x, min, max })
    }
}

/// Enclosing node pair and weight of the upper node.
fn bracket(axis: &[f64], x: f64) -> (usize, usize, f64) {
    if axis.len() == 1 {
        return (0, 0, 0.0);
    }
    let hi = axis.partition_point(|&v| v <= x).clamp(1, axis.len() - 1);
    let lo = hi - 1;
    let width = axis[hi] - axis[lo];
    let w = if width > 0.0 { (x - axis[lo]) / width } else { 0.0 };
    (lo, hi, w)
}

#[inline]
fn lerp(a: f64, b: f64, w: f64) -> f64 {
    a + (b - a) * w
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_grid() -> VolSurfaceGrid {
        VolSurfaceGrid::from_rows(
            vec![36.5, 73.0],
            vec![90.0, 100.0, 110.0],
            vec![vec![0.30, 0.20, 0.25], vec![0.32, 0.22, 0.27]],
        )
    }

    // ========================================
    // SurfaceGridSpec
    // ========================================

    #[test]
    fn test_spec_validate_accepts_default() {
        assert!(SurfaceGridSpec::new((7.0, 90.0), (50.0, 150.0)).validate().is_ok());
    }

    #[test]
    fn test_spec_validate_rejects_reversed_and_empty() {
        assert!(SurfaceGridSpec::new((90.0, 7.0), (50.0, 150.0)).validate().is_err());
        assert!(SurfaceGridSpec::new((7.0, 90.0), (150.0, 50.0)).validate().is_err());
        assert!(SurfaceGridSpec::new((7.0, f64::NAN), (50.0, 150.0)).validate().is_err());
        assert!(SurfaceGridSpec::new((7.0, 90.0), (0.0, 150.0)).validate().is_err());
        assert!(SurfaceGridSpec::new((7.0, 90.0), (50.0, 150.0))
            .with_resolution(0, 10)
            .validate()
            .is_err());
    }

    #[test]
    fn test_spec_fitted_resolution() {
        let quotes = vec![
            VolQuote::new(30, 100.0, 0.2).unwrap(),
            VolQuote::new(30, 120.0, 0.25).unwrap(),
            VolQuote::new(60, 80.0, 0.3).unwrap(),
        ];
        let spec = SurfaceGridSpec::fitted(&quotes, None).unwrap();
        assert_eq!(spec.day_range(), (30.0, 60.0));
        assert_eq!(spec.strike_range(), (80.0, 120.0));
        assert_eq!(spec.day_points(), 10);
        assert_eq!(spec.strike_points(), 50);

        let windowed = SurfaceGridSpec::fitted(&quotes, Some((50.0, 150.0))).unwrap();
        assert_eq!(windowed.strike_range(), (50.0, 150.0));
    }

    #[test]
    fn test_spec_fitted_caps_day_points() {
        let quotes: Vec<VolQuote> = (1..=20)
            .map(|d| VolQuote::new(d * 7, 100.0, 0.2).unwrap())
            .collect();
        let spec = SurfaceGridSpec::fitted(&quotes, None).unwrap();
        assert_eq!(spec.day_points(), 50);
    }

    #[test]
    fn test_spec_fitted_empty() {
        let err = SurfaceGridSpec::fitted(&[], None).unwrap_err();
        assert_eq!(err, MarketDataError::InsufficientData { got: 0, need: 1 });
    }

    // ========================================
    // VolSurfaceGrid access
    // ========================================

    #[test]
    fn test_grid_accessors() {
        let grid = sample_grid();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.value(1, 2), Some(0.27));
        assert_eq!(grid.value(2, 0), None);
        assert_eq!(grid.row(0), Some(&[0.30, 0.20, 0.25][..]));
        assert_eq!(grid.vol_range(), (0.20, 0.32));
    }

    #[test]
    fn test_grid_bilinear_nodes_and_midpoints() {
        let grid = sample_grid();
        assert_relative_eq!(grid.vol_at_days(36.5, 100.0).unwrap(), 0.20, epsilon = 1e-12);
        assert_relative_eq!(grid.vol_at_days(73.0, 110.0).unwrap(), 0.27, epsilon = 1e-12);
        // Centre of the lower-left cell: mean of its four corners
        let mid = grid.vol_at_days(54.75, 95.0).unwrap();
        assert_relative_eq!(mid, (0.30 + 0.20 + 0.32 + 0.22) / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_surface_trait_uses_years() {
        let grid = sample_grid();
        let (t_min, t_max) = grid.expiry_domain();
        assert_relative_eq!(t_min, 0.1, epsilon = 1e-12);
        assert_relative_eq!(t_max, 0.2, epsilon = 1e-12);

        assert_relative_eq!(grid.volatility(100.0, t_min).unwrap(), 0.20, epsilon = 1e-12);
        assert_relative_eq!(grid.volatility(110.0, t_max).unwrap(), 0.27, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_surface_trait_errors() {
        let grid = sample_grid();
        assert!(matches!(
            grid.volatility(-1.0, 0.1),
            Err(MarketDataError::InvalidStrike { .. })
        ));
        assert!(matches!(
            grid.volatility(100.0, 0.0),
            Err(MarketDataError::InvalidExpiry { .. })
        ));
        assert!(matches!(
            grid.volatility(100.0, 1.0),
            Err(MarketDataError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.volatility(200.0, 0.15),
            Err(MarketDataError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_grid_single_node() {
        let grid = VolSurfaceGrid::from_rows(vec![30.0], vec![100.0], vec![vec![0.4]]);
        assert_eq!(grid.vol_at_days(30.0, 100.0).unwrap(), 0.4);
        assert!(grid.vol_at_days(31.0, 100.0).is_err());
    }
}
