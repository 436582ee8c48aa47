//! Market snapshot file format
//!
//! A snapshot is what a market-data provider hands over for one underlying:
//! spot, valuation date, and the listed calls and puts of every expiration.
//!
//! ```json
//! {
//!   "symbol": "ACME",
//!   "spot": 150.0,
//!   "valuation_date": "2025-01-20",
//!   "chains": [
//!     {
//!       "expiration": "2025-02-21",
//!       "calls": [{ "strike": 150.0, "implied_volatility": 0.24, "last_price": 6.1 }],
//!       "puts":  [{ "strike": 150.0, "implied_volatility": 0.26 }]
//!     }
//!   ]
//! }
//! ```

use chrono::NaiveDate;
use pricer_core::market_data::{collect_vol_quotes, strike_window, ExpiryChain, VolQuote};
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Quotes for one underlying at one valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Ticker, informational only
    #[serde(default)]
    pub symbol: Option<String>,
    /// Spot price of the underlying
    pub spot: f64,
    /// Date the quotes were taken
    pub valuation_date: NaiveDate,
    /// One chain per listed expiration
    pub chains: Vec<ExpiryChain>,
}

impl MarketSnapshot {
    /// Rejects a non-positive or non-finite spot.
    pub fn validate(&self) -> Result<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "snapshot spot must be positive, got {}",
                self.spot
            )));
        }
        Ok(())
    }

    /// Listed expirations in ascending order.
    pub fn expirations(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.chains.iter().map(|c| c.expiration).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Chain for `expiration`.
    pub fn chain(&self, expiration: NaiveDate) -> Result<&ExpiryChain> {
        self.chains
            .iter()
            .find(|c| c.expiration == expiration)
            .ok_or_else(|| {
                CliError::InvalidArgument(format!(
                    "no chain for expiration {}; available: {}",
                    expiration,
                    self.expirations()
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    /// Strike window `spot·(1 ± width_pct)`.
    pub fn strike_window(&self, width_pct: f64) -> (f64, f64) {
        strike_window(self.spot, width_pct)
    }

    /// Volatility quotes of every unexpired chain inside `strike_range`.
    pub fn vol_quotes(&self, strike_range: (f64, f64)) -> Vec<VolQuote> {
        collect_vol_quotes(&self.chains, self.valuation_date, Some(strike_range))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use pricer_core::market_data::OptionQuoteRow;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Three expirations with a mild skew around spot 100.
    pub(crate) fn snapshot() -> MarketSnapshot {
        let smile = |base: f64, last: bool| -> Vec<OptionQuoteRow> {
            [70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0]
                .iter()
                .map(|&k| {
                    let m: f64 = k / 100.0 - 1.0;
                    let row = OptionQuoteRow::new(k, base + 0.2 * m * m - 0.05 * m);
                    if last {
                        row.with_last_price(((100.0 - k).max(0.0) + 2.0).max(0.5))
                    } else {
                        row
                    }
                })
                .collect()
        };

        MarketSnapshot {
            symbol: Some("TEST".to_string()),
            spot: 100.0,
            valuation_date: date(2025, 1, 20),
            chains: vec![
                ExpiryChain {
                    expiration: date(2025, 2, 21),
                    calls: smile(0.22, true),
                    puts: smile(0.24, false),
                },
                ExpiryChain {
                    expiration: date(2025, 4, 17),
                    calls: smile(0.23, true),
                    puts: smile(0.25, false),
                },
                ExpiryChain {
                    expiration: date(2025, 1, 10),
                    calls: smile(0.30, false),
                    puts: vec![],
                },
            ],
        }
    }
}
