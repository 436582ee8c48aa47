//! Option quote tables and their reduction to implied volatility quotes.
//!
//! A market-data provider hands over one [`ExpiryChain`] per listed
//! expiration. [`collect_vol_quotes`] flattens those chains into the
//! [`VolQuote`] points consumed by the surface builder, and
//! [`combined_smile`] lines up the call and put smiles of one expiration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::MarketDataError;
use crate::types::{days_between, OptionType};

/// Default half-width of the strike window, as a fraction of spot.
pub const DEFAULT_STRIKE_WIDTH_PCT: f64 = 0.5;

/// One implied volatility observation.
///
/// # Examples
/// ```
/// use pricer_core::market_data::VolQuote;
///
/// let q = VolQuote::new(30, 100.0, 0.22).unwrap();
/// assert_eq!(q.days(), 30);
///
/// assert!(VolQuote::new(0, 100.0, 0.22).is_err());
/// assert!(VolQuote::new(30, 100.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VolQuoteFields")]
pub struct VolQuote {
    days: u32,
    strike: f64,
    implied_vol: f64,
}

#[derive(Deserialize)]
struct VolQuoteFields {
    days: u32,
    strike: f64,
    implied_vol: f64,
}

impl TryFrom<VolQuoteFields> for VolQuote {
    type Error = MarketDataError;

    fn try_from(f: VolQuoteFields) -> Result<Self, Self::Error> {
        VolQuote::new(f.days, f.strike, f.implied_vol)
    }
}

impl VolQuote {
    /// Creates a validated quote.
    ///
    /// # Errors
    /// `MarketDataError::InvalidQuote` if `days` is zero, the strike is not
    /// a positive finite number, or the volatility is not a positive finite
    /// number.
    pub fn new(days: u32, strike: f64, implied_vol: f64) -> Result<Self, MarketDataError> {
        if days == 0 {
            return Err(MarketDataError::InvalidQuote {
                reason: "days to expiry must be positive".to_string(),
            });
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(MarketDataError::InvalidQuote {
                reason: format!("strike must be positive and finite, got {}", strike),
            });
        }
        if !implied_vol.is_finite() || implied_vol <= 0.0 {
            return Err(MarketDataError::InvalidQuote {
                reason: format!(
                    "implied volatility must be positive and finite, got {}",
                    implied_vol
                ),
            });
        }
        Ok(Self {
            days,
            strike,
            implied_vol,
        })
    }

    /// Calendar days to expiry.
    #[inline]
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Implied volatility (annualised, decimal).
    #[inline]
    pub fn implied_vol(&self) -> f64 {
        self.implied_vol
    }
}

/// One row of a provider's option table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuoteRow {
    /// Strike price.
    pub strike: f64,
    /// Provider implied volatility; may be missing (NaN) or zero.
    pub implied_volatility: f64,
    /// Last traded price.
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Contracts traded in the session.
    #[serde(default)]
    pub volume: Option<u64>,
    /// Open contracts.
    #[serde(default)]
    pub open_interest: Option<u64>,
}

impl OptionQuoteRow {
    /// Row with only strike and implied volatility populated.
    pub fn new(strike: f64, implied_volatility: f64) -> Self {
        Self {
            strike,
            implied_volatility,
            last_price: None,
            volume: None,
            open_interest: None,
        }
    }

    /// Sets the last traded price.
    pub fn with_last_price(mut self, last_price: f64) -> Self {
        self.last_price = Some(last_price);
        self
    }

    /// Returns whether the implied volatility is usable.
    #[inline]
    pub fn has_valid_iv(&self) -> bool {
        self.implied_volatility.is_finite() && self.implied_volatility > 0.0
    }
}

/// Calls and puts listed for one expiration date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryChain {
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call rows.
    #[serde(default)]
    pub calls: Vec<OptionQuoteRow>,
    /// Put rows.
    #[serde(default)]
    pub puts: Vec<OptionQuoteRow>,
}

impl ExpiryChain {
    /// Rows of the given side.
    pub fn rows(&self, kind: OptionType) -> &[OptionQuoteRow] {
        match kind {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }
}

/// A point on a volatility smile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmilePoint {
    /// Strike price.
    pub strike: f64,
    /// Implied volatility.
    pub implied_vol: f64,
    /// Side the quote came from.
    pub kind: OptionType,
}

/// Strike window `(spot * (1 - width_pct), spot * (1 + width_pct))`.
///
/// # Examples
/// ```
/// use pricer_core::market_data::strike_window;
///
/// assert_eq!(strike_window(150.0, 0.5), (75.0, 225.0));
/// ```
#[inline]
pub fn strike_window(spot: f64, width_pct: f64) -> (f64, f64) {
    (spot * (1.0 - width_pct), spot * (1.0 + width_pct))
}

/// Flattens expiry chains into volatility quotes.
///
/// Expirations on or before `valuation_date` are skipped, as are rows outside
/// the inclusive `strike_range` and rows whose strike or implied volatility is
/// unusable. Calls and puts at the same strike both produce a quote; the
/// surface builder merges them. Output is sorted by `(days, strike, vol)`.
pub fn collect_vol_quotes(
    chains: &[ExpiryChain],
    valuation_date: NaiveDate,
    strike_range: Option<(f64, f64)>,
) -> Vec<VolQuote> {
    let mut quotes = Vec::new();
    let mut skipped_rows = 0usize;

    for chain in chains {
        let days = days_between(valuation_date, chain.expiration);
        let days = match u32::try_from(days) {
            Ok(d) if d > 0 => d,
            _ => {
                debug!(expiration = %chain.expiration, days, "skipping expired chain");
                continue;
            }
        };

        for row in chain.calls.iter().chain(chain.puts.iter()) {
            if let Some((lo, hi)) = strike_range {
                if row.strike < lo || row.strike > hi {
                    continue;
                }
            }
            match VolQuote::new(days, row.strike, row.implied_volatility) {
                Ok(q) => quotes.push(q),
                Err(_) => skipped_rows += 1,
            }
        }
    }

    quotes.sort_by(|a, b| {
        a.days
            .cmp(&b.days)
            .then(a.strike.total_cmp(&b.strike))
            .then(a.implied_vol.total_cmp(&b.implied_vol))
    });

    debug!(
        chains = chains.len(),
        quotes = quotes.len(),
        skipped_rows,
        "collected volatility quotes"
    );
    quotes
}

/// Call and put smiles of one expiration on a common strike axis.
///
/// Rows with unusable implied volatility are dropped. Points are sorted by
/// strike, calls before puts at equal strikes.
///
/// # Examples
/// ```
/// use pricer_core::market_data::{combined_smile, OptionQuoteRow};
/// use pricer_core::types::OptionType;
///
/// let calls = vec![OptionQuoteRow::new(110.0, 0.21), OptionQuoteRow::new(100.0, 0.20)];
/// let puts = vec![OptionQuoteRow::new(100.0, 0.23), OptionQuoteRow::new(90.0, f64::NAN)];
///
/// let smile = combined_smile(&calls, &puts);
/// assert_eq!(smile.len(), 3);
/// assert_eq!(smile[0].kind, OptionType::Call);
/// assert_eq!(smile[1].kind, OptionType::Put);
/// assert_eq!(smile[2].strike, 110.0);
/// ```
pub fn combined_smile(calls: &[OptionQuoteRow], puts: &[OptionQuoteRow]) -> Vec<SmilePoint> {
    let side = |rows: &[OptionQuoteRow], kind: OptionType| {
        rows.iter()
            .filter(|r| r.has_valid_iv() && r.strike.is_finite())
            .map(move |r| SmilePoint {
                strike: r.strike,
                implied_vol: r.implied_volatility,
                kind,
            })
            .collect::<Vec<_>>()
    };

    let mut points = side(calls, OptionType::Call);
    points.extend(side(puts, OptionType::Put));
    points.sort_by(|a, b| a.strike.total_cmp(&b.strike).then(a.kind.cmp(&b.kind)));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chain(expiration: NaiveDate) -> ExpiryChain {
        ExpiryChain {
            expiration,
            calls: vec![
                OptionQuoteRow::new(90.0, 0.25),
                OptionQuoteRow::new(100.0, 0.20),
                OptionQuoteRow::new(250.0, 0.40),
            ],
            puts: vec![
                OptionQuoteRow::new(100.0, 0.22),
                OptionQuoteRow::new(110.0, f64::NAN),
                OptionQuoteRow::new(120.0, 0.0),
            ],
        }
    }

    // ========================================
    // VolQuote validation
    // ========================================

    #[test]
    fn test_vol_quote_rejects_bad_inputs() {
        assert!(VolQuote::new(0, 100.0, 0.2).is_err());
        assert!(VolQuote::new(5, 0.0, 0.2).is_err());
        assert!(VolQuote::new(5, f64::INFINITY, 0.2).is_err());
        assert!(VolQuote::new(5, 100.0, 0.0).is_err());
        assert!(VolQuote::new(5, 100.0, -0.2).is_err());
        assert!(VolQuote::new(5, 100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_vol_quote_serde_validates() {
        let ok: VolQuote =
            serde_json::from_str(r#"{"days":30,"strike":100.0,"implied_vol":0.2}"#).unwrap();
        assert_eq!(ok, VolQuote::new(30, 100.0, 0.2).unwrap());

        let bad = serde_json::from_str::<VolQuote>(r#"{"days":0,"strike":100.0,"implied_vol":0.2}"#);
        assert!(bad.is_err());
    }

    // ========================================
    // collect_vol_quotes
    // ========================================

    #[test]
    fn test_collect_skips_expired_and_invalid() {
        let today = date(2024, 1, 1);
        let chains = vec![
            chain(date(2023, 12, 15)),
            chain(today),
            chain(date(2024, 1, 31)),
        ];

        let quotes = collect_vol_quotes(&chains, today, None);
        // 90C, 100C, 250C, 100P survive; NaN and zero IV puts are dropped
        assert_eq!(quotes.len(), 4);
        assert!(quotes.iter().all(|q| q.days() == 30));
    }

    #[test]
    fn test_collect_applies_strike_range() {
        let today = date(2024, 1, 1);
        let chains = vec![chain(date(2024, 1, 31))];

        let quotes = collect_vol_quotes(&chains, today, Some(strike_window(100.0, 0.5)));
        let strikes: Vec<f64> = quotes.iter().map(|q| q.strike()).collect();
        assert_eq!(strikes, vec![90.0, 100.0, 100.0]);
    }

    #[test]
    fn test_collect_sorted_by_days_then_strike() {
        let today = date(2024, 1, 1);
        let chains = vec![chain(date(2024, 3, 1)), chain(date(2024, 1, 8))];

        let quotes = collect_vol_quotes(&chains, today, None);
        for pair in quotes.windows(2) {
            let a = (pair[0].days(), pair[0].strike());
            let b = (pair[1].days(), pair[1].strike());
            assert!(a <= b);
        }
        assert_eq!(quotes[0].days(), 7);
    }

    #[test]
    fn test_strike_window_default_width() {
        let (lo, hi) = strike_window(100.0, DEFAULT_STRIKE_WIDTH_PCT);
        assert_eq!(lo, 50.0);
        assert_eq!(hi, 150.0);
    }

    // ========================================
    // combined_smile
    // ========================================

    #[test]
    fn test_combined_smile_orders_calls_first() {
        let c = chain(date(2024, 1, 31));
        let smile = combined_smile(&c.calls, &c.puts);

        let keys: Vec<(f64, OptionType)> = smile.iter().map(|p| (p.strike, p.kind)).collect();
        assert_eq!(
            keys,
            vec![
                (90.0, OptionType::Call),
                (100.0, OptionType::Call),
                (100.0, OptionType::Put),
                (250.0, OptionType::Call),
            ]
        );
    }

    #[test]
    fn test_chain_rows_by_kind() {
        let c = chain(date(2024, 1, 31));
        assert_eq!(c.rows(OptionType::Call).len(), 3);
        assert_eq!(c.rows(OptionType::Put).len(), 3);
    }
}
