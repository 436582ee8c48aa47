//! Batch command implementation
//!
//! Prices a JSON array of option specs in parallel.

use std::path::PathBuf;

use pricer_core::types::{ExerciseStyle, OptionSpec};
use pricer_models::batch::price_batch;
use pricer_models::model::PricingModel;
use serde::Serialize;
use tracing::{info, warn};

use super::{read_json, write_json};
use crate::config::EngineConfig;
use crate::Result;

/// One line of the batch output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// Position in the input file
    pub index: usize,
    /// Price, if the option could be priced
    pub price: Option<f64>,
    /// Engine error otherwise
    pub error: Option<String>,
}

/// Prices `specs`, one row per input in input order.
pub fn compute(config: &EngineConfig, specs: &[OptionSpec], model: PricingModel) -> Result<Vec<BatchRow>> {
    let lattice = config.lattice(ExerciseStyle::American)?;
    let rows = price_batch(model, specs, &lattice)
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(price) => BatchRow {
                index,
                price: Some(price),
                error: None,
            },
            Err(e) => BatchRow {
                index,
                price: None,
                error: Some(e.to_string()),
            },
        })
        .collect();
    Ok(rows)
}

/// Run the batch command
pub fn run(
    config: &EngineConfig,
    input: &PathBuf,
    model: PricingModel,
    output: Option<&PathBuf>,
) -> Result<()> {
    let specs: Vec<OptionSpec> = read_json(input)?;
    info!(count = specs.len(), model = %model, "Pricing batch");

    let rows = compute(config, &specs, model)?;
    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        warn!(failed, "Some options could not be priced");
    }
    write_json(&rows, output)
}
