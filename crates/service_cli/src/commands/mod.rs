//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands split into a
//! pure `compute` step returning a serializable report and a `run` step that
//! writes it as JSON.

pub mod batch;
pub mod chain;
pub mod greeks;
pub mod price;
pub mod surface;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use pricer_core::types::{days_to_years, OptionSpec, OptionType};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::{CliError, Result};

/// Market inputs of a single option, shared by `price` and `greeks`.
#[derive(Debug, Clone, Args)]
pub struct OptionArgs {
    /// Spot price of the underlying
    #[arg(long)]
    pub spot: f64,

    /// Strike price
    #[arg(long)]
    pub strike: f64,

    /// Time to expiry in years
    #[arg(long, conflicts_with = "days", required_unless_present = "days")]
    pub expiry: Option<f64>,

    /// Time to expiry in calendar days (Act/365)
    #[arg(long)]
    pub days: Option<f64>,

    /// Volatility as a decimal (0.25 = 25%)
    #[arg(long, visible_alias = "volatility")]
    pub vol: f64,

    /// Option type (call or put)
    #[arg(short, long, default_value = "call")]
    pub kind: OptionType,
}

impl OptionArgs {
    /// Validated option spec at the given rate.
    pub fn to_spec(&self, rate: f64) -> Result<OptionSpec> {
        let expiry = match (self.expiry, self.days) {
            (Some(years), _) => years,
            (None, Some(days)) => days_to_years(days),
            (None, None) => {
                return Err(CliError::InvalidArgument(
                    "either --expiry or --days is required".to_string(),
                ))
            }
        };
        Ok(OptionSpec::new(
            self.spot, self.strike, expiry, rate, self.vol, self.kind,
        )?)
    }
}

/// Reads a JSON file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Writes `value` as pretty JSON to `output`, or to stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            info!(path = %path.display(), "Wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, value)?;
            lock.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn args() -> OptionArgs {
        OptionArgs {
            spot: 150.0,
            strike: 160.0,
            expiry: None,
            days: Some(73.0),
            vol: 0.25,
            kind: OptionType::Call,
        }
    }

    #[test]
    fn test_days_converted_to_years() {
        let spec = args().to_spec(0.02).unwrap();
        assert_relative_eq!(spec.time_to_expiry(), 0.2, epsilon = 1e-12);
        assert_eq!(spec.rate(), 0.02);
    }

    #[test]
    fn test_expiry_takes_years() {
        let spec = OptionArgs {
            expiry: Some(0.5),
            days: None,
            ..args()
        }
        .to_spec(0.02)
        .unwrap();
        assert_eq!(spec.time_to_expiry(), 0.5);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let bad = OptionArgs {
            spot: -1.0,
            ..args()
        };
        assert!(matches!(bad.to_spec(0.02), Err(CliError::Pricing(_))));

        let missing = OptionArgs {
            days: None,
            ..args()
        };
        assert!(matches!(missing.to_spec(0.02), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_read_json_missing_file() {
        let path = Path::new("/nonexistent/optsurf/market.json");
        assert!(matches!(
            read_json::<serde_json::Value>(path),
            Err(CliError::FileNotFound(_))
        ));
    }
}
