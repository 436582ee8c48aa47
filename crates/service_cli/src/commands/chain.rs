//! Chain command implementation
//!
//! Values one side of one expiration against its last traded prices, or
//! prints the combined call/put smile of that expiration.

use std::path::PathBuf;

use chrono::NaiveDate;
use pricer_core::market_data::{combined_smile, SmilePoint};
use pricer_core::types::{ExerciseStyle, OptionType};
use pricer_models::chain::{value_chain, ChainRequest, ValuedQuote};
use pricer_models::model::PricingModel;
use serde::Serialize;
use tracing::{info, warn};

use super::{read_json, write_json};
use crate::config::EngineConfig;
use crate::snapshot::MarketSnapshot;
use crate::{CliError, Result};

/// Output of `optsurf chain`.
#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    /// Ticker from the snapshot
    pub symbol: Option<String>,
    /// Spot price
    pub spot: f64,
    /// Valuation date
    pub valuation_date: NaiveDate,
    /// Expiration valued
    pub expiration: NaiveDate,
    /// Years to expiration (Act/365)
    pub time_to_expiry: f64,
    /// Side valued
    pub kind: OptionType,
    /// Pricing model
    pub model: PricingModel,
    /// Valued rows inside the moneyness band, in quote order
    pub rows: Vec<ValuedQuote>,
    /// In-band rows that could not be valued
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
}

/// An in-band chain row the engine rejected.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    /// Strike of the rejected row
    pub strike: f64,
    /// Engine error message
    pub error: String,
}

/// Output of `optsurf chain --smile`.
#[derive(Debug, Clone, Serialize)]
pub struct SmileReport {
    /// Expiration
    pub expiration: NaiveDate,
    /// Call and put implied volatilities by strike
    pub points: Vec<SmilePoint>,
}

/// First expiration strictly after the valuation date.
fn nearest_live_expiration(snapshot: &MarketSnapshot) -> Result<NaiveDate> {
    snapshot
        .expirations()
        .into_iter()
        .find(|&d| d > snapshot.valuation_date)
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "snapshot has no expiration after {}",
                snapshot.valuation_date
            ))
        })
}

/// Values `kind` rows of `expiration` (default: nearest live expiration).
pub fn compute(
    config: &EngineConfig,
    snapshot: &MarketSnapshot,
    expiration: Option<NaiveDate>,
    kind: OptionType,
    model: PricingModel,
) -> Result<ChainReport> {
    snapshot.validate()?;
    let expiration = match expiration {
        Some(date) => date,
        None => nearest_live_expiration(snapshot)?,
    };
    let chain = snapshot.chain(expiration)?;

    let request = ChainRequest::for_expiry(
        chain,
        snapshot.valuation_date,
        snapshot.spot,
        config.risk_free_rate,
        kind,
    )?
    .with_model(model)
    .with_lattice(config.lattice(ExerciseStyle::American)?)
    .with_band(config.moneyness_band()?);

    let quotes = chain.rows(kind);
    let in_band = quotes
        .iter()
        .filter(|row| request.band().contains(request.spot(), row.strike));

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for (quote, result) in in_band.zip(value_chain(&request, quotes)) {
        match result {
            Ok(valued) => rows.push(valued),
            Err(e) => {
                warn!(strike = quote.strike, error = %e, "Skipping chain row");
                skipped.push(SkippedRow {
                    strike: quote.strike,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(ChainReport {
        symbol: snapshot.symbol.clone(),
        spot: snapshot.spot,
        valuation_date: snapshot.valuation_date,
        expiration,
        time_to_expiry: request.time_to_expiry(),
        kind,
        model,
        rows,
        skipped,
    })
}

/// Combined smile of `expiration` (default: nearest live expiration).
pub fn compute_smile(snapshot: &MarketSnapshot, expiration: Option<NaiveDate>) -> Result<SmileReport> {
    let expiration = match expiration {
        Some(date) => date,
        None => nearest_live_expiration(snapshot)?,
    };
    let chain = snapshot.chain(expiration)?;
    Ok(SmileReport {
        expiration,
        points: combined_smile(&chain.calls, &chain.puts),
    })
}

/// Run the chain command
pub fn run(
    config: &EngineConfig,
    market: &PathBuf,
    expiration: Option<NaiveDate>,
    kind: OptionType,
    model: PricingModel,
    smile: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let snapshot: MarketSnapshot = read_json(market)?;

    if smile {
        let report = compute_smile(&snapshot, expiration)?;
        info!(expiration = %report.expiration, points = report.points.len(), "Built smile");
        return write_json(&report, output);
    }

    let report = compute(config, &snapshot, expiration, kind, model)?;
    info!(
        expiration = %report.expiration,
        kind = %kind,
        model = %model,
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "Valued chain"
    );
    write_json(&report, output)
}
