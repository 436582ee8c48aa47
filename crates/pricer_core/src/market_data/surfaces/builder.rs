//! Nearest-neighbour reconstruction of an implied volatility surface.
//!
//! Each output node `(d, s)` takes the quote at the nearest observed expiry
//! `d*` and nearest observed strike `s*`. When that pair was never quoted the
//! node falls back to the at-the-money quote of `d*` (the observed strike
//! closest to spot), and failing that to the mean of every quote on `d*`.

use rayon::prelude::*;
use tracing::debug;

use super::grid::{SurfaceGridSpec, VolSurfaceGrid};
use crate::market_data::error::MarketDataError;
use crate::market_data::quotes::VolQuote;
use crate::math::grid::nearest_index;

/// Quotes observed at one expiry, duplicates merged, sorted by strike.
#[derive(Debug)]
struct DayGroup {
    days: u32,
    quotes: Vec<(f64, f64)>,
    mean: f64,
}

impl DayGroup {
    fn vol_at(&self, strike: f64) -> Option<f64> {
        self.quotes
            .binary_search_by(|(k, _)| k.total_cmp(&strike))
            .ok()
            .map(|i| self.quotes[i].1)
    }
}

/// Where a node's volatility came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeSource {
    Exact,
    AtTheMoney,
    DayMean,
}

#[derive(Debug, Default, Clone, Copy)]
struct SourceCounts {
    exact: usize,
    atm: usize,
    day_mean: usize,
}

impl SourceCounts {
    fn record(mut self, source: NodeSource) -> Self {
        match source {
            NodeSource::Exact => self.exact += 1,
            NodeSource::AtTheMoney => self.atm += 1,
            NodeSource::DayMean => self.day_mean += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            exact: self.exact + other.exact,
            atm: self.atm + other.atm,
            day_mean: self.day_mean + other.day_mean,
        }
    }
}

/// Builds a [`VolSurfaceGrid`] from sparse quotes.
///
/// The result depends only on the set of quotes: input order never matters,
/// and repeated builds are bit-identical. Quotes sharing `(days, strike)`
/// are averaged. Rows are evaluated in parallel.
///
/// # Examples
/// ```
/// use pricer_core::market_data::surfaces::{SurfaceBuilder, SurfaceGridSpec};
/// use pricer_core::market_data::VolQuote;
///
/// let quotes = vec![
///     VolQuote::new(30, 95.0, 0.24).unwrap(),
///     VolQuote::new(30, 100.0, 0.20).unwrap(),
///     VolQuote::new(90, 100.0, 0.22).unwrap(),
/// ];
///
/// let spec = SurfaceGridSpec::new((30.0, 90.0), (95.0, 100.0)).with_resolution(2, 2);
/// let surface = SurfaceBuilder::new(100.0, spec).unwrap().build(&quotes).unwrap();
///
/// assert_eq!(surface.value(0, 0), Some(0.24));
/// // (90 days, 95) was never quoted: falls back to the ATM quote at 90 days
/// assert_eq!(surface.value(1, 0), Some(0.22));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SurfaceBuilder {
    spot: f64,
    grid: SurfaceGridSpec,
}

impl SurfaceBuilder {
    /// Creates a builder for the given spot and output grid.
    ///
    /// # Errors
    /// `MarketDataError::InvalidGrid` if the grid spec fails validation or
    /// spot is not a positive finite number.
    pub fn new(spot: f64, grid: SurfaceGridSpec) -> Result<Self, MarketDataError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(MarketDataError::InvalidGrid {
                message: format!("reference spot must be positive and finite, got {}", spot),
            });
        }
        grid.validate()?;
        Ok(Self { spot, grid })
    }

    /// Reference spot used to pick the at-the-money strike.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Output grid layout.
    #[inline]
    pub fn grid(&self) -> &SurfaceGridSpec {
        &self.grid
    }

    /// Builds the surface.
    ///
    /// # Errors
    /// - `MarketDataError::InsufficientData` when `quotes` is empty
    /// - `MarketDataError::EmptyDayGroup` when the nearest expiry of some node
    ///   has no quotes to average
    pub fn build(&self, quotes: &[VolQuote]) -> Result<VolSurfaceGrid, MarketDataError> {
        if quotes.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }

        let groups = group_by_day(quotes);
        let observed_days: Vec<u32> = groups.iter().map(|g| g.days).collect();
        let observed_strikes = distinct_strikes(&groups);

        let atm_strike = nearest_index(&observed_strikes, self.spot)
            .map(|i| observed_strikes[i])
            .ok_or(MarketDataError::InsufficientData { got: 0, need: 1 })?;

        let day_axis = self.grid.day_axis();
        let strike_axis = self.grid.strike_axis();

        // Nearest observed strike per column is shared by every row
        let nearest_strikes: Vec<f64> = strike_axis
            .iter()
            .map(|&s| {
                nearest_index(&observed_strikes, s)
                    .map(|i| observed_strikes[i])
                    .ok_or(MarketDataError::InsufficientData { got: 0, need: 1 })
            })
            .collect::<Result<_, _>>()?;

        debug!(
            quotes = quotes.len(),
            expiries = observed_days.len(),
            strikes = observed_strikes.len(),
            atm_strike,
            day_points = day_axis.len(),
            strike_points = strike_axis.len(),
            "building volatility surface"
        );

        let rows: Vec<(Vec<f64>, SourceCounts)> = day_axis
            .par_iter()
            .map(|&d| {
                let group = nearest_index(&observed_days, d)
                    .map(|i| &groups[i])
                    .ok_or(MarketDataError::InsufficientData { got: 0, need: 1 })?;
                if group.quotes.is_empty() {
                    return Err(MarketDataError::EmptyDayGroup { days: group.days });
                }

                let mut counts = SourceCounts::default();
                let row: Vec<f64> = nearest_strikes
                    .iter()
                    .map(|&s| {
                        let (vol, source) = node_vol(group, s, atm_strike);
                        counts = counts.record(source);
                        vol
                    })
                    .collect();
                Ok((row, counts))
            })
            .collect::<Result<_, MarketDataError>>()?;

        let mut counts = SourceCounts::default();
        let mut vols = Vec::with_capacity(rows.len());
        for (row, row_counts) in rows {
            counts = counts.merge(row_counts);
            vols.push(row);
        }

        debug!(
            exact = counts.exact,
            atm_fallback = counts.atm,
            day_mean_fallback = counts.day_mean,
            "volatility surface built"
        );

        Ok(VolSurfaceGrid::from_rows(day_axis, strike_axis, vols))
    }
}

fn node_vol(group: &DayGroup, strike: f64, atm_strike: f64) -> (f64, NodeSource) {
    if let Some(v) = group.vol_at(strike) {
        (v, NodeSource::Exact)
    } else if let Some(v) = group.vol_at(atm_strike) {
        (v, NodeSource::AtTheMoney)
    } else {
        (group.mean, NodeSource::DayMean)
    }
}

/// Sorts quotes, merges duplicate `(days, strike)` pairs by their mean and
/// splits the result into per-expiry groups.
///
/// A call and a put at the same strike and expiry arrive as two quotes with
/// no side attached. Both are kept through their mean rather than letting
/// whichever side is loaded last overwrite the other, so the surface does not
/// depend on load order.
fn group_by_day(quotes: &[VolQuote]) -> Vec<DayGroup> {
    let mut sorted: Vec<VolQuote> = quotes.to_vec();
    sorted.sort_by(|a, b| {
        a.days()
            .cmp(&b.days())
            .then(a.strike().total_cmp(&b.strike()))
            .then(a.implied_vol().total_cmp(&b.implied_vol()))
    });

    let mut groups: Vec<DayGroup> = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let (days, strike) = (sorted[i].days(), sorted[i].strike());
        let mut j = i;
        let mut sum = 0.0;
        while j < sorted.len() && sorted[j].days() == days && sorted[j].strike() == strike {
            sum += sorted[j].implied_vol();
            j += 1;
        }
        let vol = sum / (j - i) as f64;

        match groups.last_mut() {
            Some(g) if g.days == days => g.quotes.push((strike, vol)),
            _ => groups.push(DayGroup {
                days,
                quotes: vec![(strike, vol)],
                mean: 0.0,
            }),
        }
        i = j;
    }

    for g in &mut groups {
        g.mean = g.quotes.iter().map(|(_, v)| v).sum::<f64>() / g.quotes.len() as f64;
    }
    groups
}

fn distinct_strikes(groups: &[DayGroup]) -> Vec<f64> {
    let mut strikes: Vec<f64> = groups
        .iter()
        .flat_map(|g| g.quotes.iter().map(|(k, _)| *k))
        .collect();
    strikes.sort_by(f64::total_cmp);
    strikes.dedup();
    strikes
}
