//! Theoretical valuation of a listed option chain.
//!
//! Rows of one expiration and one side are filtered to a moneyness band
//! around spot, priced with their own implied volatility under the chosen
//! [`PricingModel`], and compared with the last traded price.

use chrono::NaiveDate;
use pricer_core::market_data::{ExpiryChain, OptionQuoteRow};
use pricer_core::types::{year_fraction, OptionSpec, OptionType, PricingError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytical::Greeks;
use crate::lattice::LatticeConfig;
use crate::model::PricingModel;

/// Default lower band edge as a fraction of spot.
pub const DEFAULT_MONEYNESS_LOWER: f64 = 0.8;
/// Default upper band edge as a fraction of spot.
pub const DEFAULT_MONEYNESS_UPPER: f64 = 1.2;

/// Inclusive strike band `[lower·S, upper·S]`.
///
/// # Examples
/// ```
/// use pricer_models::chain::MoneynessBand;
///
/// let band = MoneynessBand::default();
/// assert!(band.contains(100.0, 80.0));
/// assert!(band.contains(100.0, 120.0));
/// assert!(!band.contains(100.0, 121.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneynessBand {
    lower: f64,
    upper: f64,
}

impl Default for MoneynessBand {
    fn default() -> Self {
        Self {
            lower: DEFAULT_MONEYNESS_LOWER,
            upper: DEFAULT_MONEYNESS_UPPER,
        }
    }
}

impl MoneynessBand {
    /// Creates a band from spot fractions.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` unless `0 ≤ lower ≤ upper` and both are finite.
    pub fn new(lower: f64, upper: f64) -> Result<Self, PricingError> {
        if !lower.is_finite() || !upper.is_finite() || lower < 0.0 || lower > upper {
            return Err(PricingError::InvalidInput(format!(
                "moneyness band [{}, {}] must satisfy 0 <= lower <= upper",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Lower edge as a fraction of spot.
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper edge as a fraction of spot.
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Strike bounds for the given spot.
    #[inline]
    pub fn strike_bounds(&self, spot: f64) -> (f64, f64) {
        (spot * self.lower, spot * self.upper)
    }

    /// Whether `strike` lies inside the band for `spot`.
    #[inline]
    pub fn contains(&self, spot: f64, strike: f64) -> bool {
        let (lo, hi) = self.strike_bounds(spot);
        strike >= lo && strike <= hi
    }
}

/// Market inputs shared by every row of a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRequest {
    spot: f64,
    time_to_expiry: f64,
    rate: f64,
    kind: OptionType,
    model: PricingModel,
    lattice: LatticeConfig,
    band: MoneynessBand,
}

impl ChainRequest {
    /// Request with the default model, lattice and band.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for a non-positive or non-finite spot, a
    /// negative or non-finite time, or a non-finite rate.
    pub fn new(
        spot: f64,
        time_to_expiry: f64,
        rate: f64,
        kind: OptionType,
    ) -> Result<Self, PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot must be positive and finite, got {}",
                spot
            )));
        }
        if !time_to_expiry.is_finite() || time_to_expiry < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "time to expiry must be non-negative and finite, got {}",
                time_to_expiry
            )));
        }
        if !rate.is_finite() {
            return Err(PricingError::InvalidInput(format!("rate must be finite, got {}", rate)));
        }
        Ok(Self {
            spot,
            time_to_expiry,
            rate,
            kind,
            model: PricingModel::default(),
            lattice: LatticeConfig::default(),
            band: MoneynessBand::default(),
        })
    }

    /// Request for one side of `chain`, with time measured Actual/365 from
    /// `valuation_date`. Past expirations collapse to zero time.
    pub fn for_expiry(
        chain: &ExpiryChain,
        valuation_date: NaiveDate,
        spot: f64,
        rate: f64,
        kind: OptionType,
    ) -> Result<Self, PricingError> {
        let years = year_fraction(valuation_date, chain.expiration).max(0.0);
        Self::new(spot, years, rate, kind)
    }

    /// Uses `model` for pricing.
    pub fn with_model(mut self, model: PricingModel) -> Self {
        self.model = model;
        self
    }

    /// Uses `lattice` when the model is the binomial tree.
    pub fn with_lattice(mut self, lattice: LatticeConfig) -> Self {
        self.lattice = lattice;
        self
    }

    /// Uses `band` to filter strikes.
    pub fn with_band(mut self, band: MoneynessBand) -> Self {
        self.band = band;
        self
    }

    /// Spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Time to expiry in years.
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Option side being valued.
    #[inline]
    pub fn kind(&self) -> OptionType {
        self.kind
    }

    /// Pricing model.
    #[inline]
    pub fn model(&self) -> PricingModel {
        self.model
    }

    /// Moneyness band.
    #[inline]
    pub fn band(&self) -> MoneynessBand {
        self.band
    }
}

/// A chain row with its theoretical value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedQuote {
    /// Strike price.
    pub strike: f64,
    /// Implied volatility used for pricing.
    pub implied_vol: f64,
    /// Last traded price, when quoted.
    pub last_price: Option<f64>,
    /// Session volume.
    pub volume: Option<u64>,
    /// Open interest.
    pub open_interest: Option<u64>,
    /// Model price.
    pub theoretical_price: f64,
    /// Analytic Greeks; only for the European analytic model.
    pub greeks: Option<Greeks<f64>>,
    /// `theoretical_price - last_price`.
    pub price_diff: Option<f64>,
    /// `price_diff / last_price * 100`.
    pub price_diff_pct: Option<f64>,
}

/// Values the rows of `rows` that fall inside the request's moneyness band.
///
/// One result per in-band row, in input order. Rows are priced in parallel
/// and fail independently: a row with an unusable implied volatility
/// (`PricingError::InvalidInput`) or an engine error does not affect its
/// neighbours.
///
/// # Examples
/// ```
/// use pricer_core::market_data::OptionQuoteRow;
/// use pricer_core::types::OptionType;
/// use pricer_models::chain::{value_chain, ChainRequest};
///
/// let rows = vec![
///     OptionQuoteRow::new(70.0, 0.4),
///     OptionQuoteRow::new(100.0, 0.25).with_last_price(5.0),
///     OptionQuoteRow::new(110.0, 0.22),
/// ];
/// let request = ChainRequest::new(100.0, 0.25, 0.05, OptionType::Call).unwrap();
/// let valued = value_chain(&request, &rows);
///
/// assert_eq!(valued.len(), 2);
/// let atm = valued[0].as_ref().unwrap();
/// assert!(atm.price_diff.is_some());
/// assert!(atm.greeks.is_some());
/// ```
pub fn value_chain(
    request: &ChainRequest,
    rows: &[OptionQuoteRow],
) -> Vec<Result<ValuedQuote, PricingError>> {
    let in_band: Vec<&OptionQuoteRow> = rows
        .iter()
        .filter(|row| request.band.contains(request.spot, row.strike))
        .collect();
    debug!(
        total = rows.len(),
        in_band = in_band.len(),
        model = %request.model,
        kind = %request.kind,
        "filtered chain by moneyness"
    );

    in_band
        .par_iter()
        .map(|row| value_row(request, row))
        .collect()
}

/// Values the in-band rows, failing on the first row error in input order.
///
/// # Errors
/// The error of the earliest failing in-band row.
pub fn try_value_chain(
    request: &ChainRequest,
    rows: &[OptionQuoteRow],
) -> Result<Vec<ValuedQuote>, PricingError> {
    value_chain(request, rows).into_iter().collect()
}

fn value_row(request: &ChainRequest, row: &OptionQuoteRow) -> Result<ValuedQuote, PricingError> {
    if !row.has_valid_iv() {
        return Err(PricingError::InvalidInput(format!(
            "row at strike {} has unusable implied volatility {}",
            row.strike, row.implied_volatility
        )));
    }

    let spec = OptionSpec::new(
        request.spot,
        row.strike,
        request.time_to_expiry,
        request.rate,
        row.implied_volatility,
        request.kind,
    )?;
    let theoretical_price = request.model.price(&spec, &request.lattice)?;
    let greeks = if request.model.has_greeks() {
        Some(request.model.greeks(&spec)?)
    } else {
        None
    };

    let (price_diff, price_diff_pct) = match row.last_price {
        Some(last) if last.is_finite() && last > 0.0 => {
            let diff = theoretical_price - last;
            (Some(diff), Some(diff / last * 100.0))
        }
        _ => (None, None),
    };

    Ok(ValuedQuote {
        strike: row.strike,
        implied_vol: row.implied_volatility,
        last_price: row.last_price,
        volume: row.volume,
        open_interest: row.open_interest,
        theoretical_price,
        greeks,
        price_diff,
        price_diff_pct,
    })
}
