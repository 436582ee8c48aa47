//! Surface command implementation
//!
//! - `surface vol`: implied volatility surface from a market snapshot
//! - `surface price`: Black-Scholes price over spot × days to expiry
//! - `surface greek`: one Greek over spot × days to expiry

use std::path::PathBuf;

use clap::{Args, Subcommand};
use pricer_core::market_data::{strike_window, SurfaceBuilder, SurfaceGridSpec, VolSurfaceGrid};
use pricer_core::types::OptionType;
use pricer_models::analytical::GreekKind;
use pricer_models::sensitivity::{greek_surface, price_surface, SensitivityGrid, SensitivityRequest};
use tracing::info;

use super::{read_json, write_json};
use crate::config::EngineConfig;
use crate::snapshot::MarketSnapshot;
use crate::{CliError, Result};

/// Surface subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum SurfaceCommand {
    /// Implied volatility surface from quoted chains
    Vol {
        /// Market snapshot (JSON)
        #[arg(short, long)]
        market: PathBuf,

        /// Lowest strike on the grid (default: spot·(1 - strike_width_pct))
        #[arg(long, requires = "max_strike")]
        min_strike: Option<f64>,

        /// Highest strike on the grid (default: spot·(1 + strike_width_pct))
        #[arg(long, requires = "min_strike")]
        max_strike: Option<f64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Option price over spot and days to expiry
    Price {
        #[command(flatten)]
        grid: SensitivityArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// A single Greek over spot and days to expiry
    Greek {
        /// Greek to evaluate (delta, gamma, vega, theta, rho)
        #[arg(short, long)]
        greek: GreekKind,

        #[command(flatten)]
        grid: SensitivityArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Fixed inputs of a sensitivity surface.
#[derive(Debug, Clone, Args)]
pub struct SensitivityArgs {
    /// Reference spot price; the grid spans 0.7·S to 1.3·S
    #[arg(long)]
    pub spot: f64,

    /// Strike price (default: midpoint of the strike window)
    #[arg(long)]
    pub strike: Option<f64>,

    /// Volatility as a decimal
    #[arg(long, visible_alias = "volatility")]
    pub vol: f64,

    /// Option type (call or put)
    #[arg(short, long, default_value = "call")]
    pub kind: OptionType,

    /// Shortest days to expiry
    #[arg(long, default_value = "7")]
    pub min_days: f64,

    /// Longest days to expiry
    #[arg(long, default_value = "365")]
    pub max_days: f64,

    /// Points on each axis
    #[arg(long, default_value = "50")]
    pub points: usize,
}

impl SensitivityArgs {
    fn request(&self, config: &EngineConfig) -> Result<SensitivityRequest> {
        let days = (self.min_days, self.max_days);
        let request = match self.strike {
            Some(strike) => SensitivityRequest::new(
                self.spot,
                strike,
                self.vol,
                config.risk_free_rate,
                self.kind,
                days,
            )?,
            None => {
                let window = strike_window(self.spot, config.strike_width_pct);
                SensitivityRequest::from_strike_range(
                    self.spot,
                    window,
                    self.vol,
                    config.risk_free_rate,
                    self.kind,
                    days,
                )?
            }
        };
        Ok(request.with_resolution(self.points, self.points)?)
    }
}

/// Builds the implied volatility surface of `snapshot`.
pub fn compute_vol(
    config: &EngineConfig,
    snapshot: &MarketSnapshot,
    strike_range: Option<(f64, f64)>,
) -> Result<VolSurfaceGrid> {
    snapshot.validate()?;
    let strike_range = strike_range.unwrap_or_else(|| snapshot.strike_window(config.strike_width_pct));
    let quotes = snapshot.vol_quotes(strike_range);
    info!(quotes = quotes.len(), ?strike_range, "Collected volatility quotes");

    let spec = config.surface_resolution(SurfaceGridSpec::fitted(&quotes, Some(strike_range))?);
    let grid = SurfaceBuilder::new(snapshot.spot, spec)?.build(&quotes)?;
    Ok(grid)
}

/// Price or Greek sensitivity grid.
pub fn compute_sensitivity(
    config: &EngineConfig,
    grid: &SensitivityArgs,
    greek: Option<GreekKind>,
) -> Result<SensitivityGrid> {
    let request = grid.request(config)?;
    let surface = match greek {
        Some(kind) => greek_surface(&request, kind)?,
        None => price_surface(&request)?,
    };
    Ok(surface)
}

/// Run the surface command
pub fn run(config: &EngineConfig, command: &SurfaceCommand) -> Result<()> {
    match command {
        SurfaceCommand::Vol {
            market,
            min_strike,
            max_strike,
            output,
        } => {
            let snapshot: MarketSnapshot = read_json(market)?;
            let strike_range = match (min_strike, max_strike) {
                (Some(lo), Some(hi)) => Some((*lo, *hi)),
                (None, None) => None,
                _ => {
                    return Err(CliError::InvalidArgument(
                        "--min-strike and --max-strike must be given together".to_string(),
                    ))
                }
            };
            let grid = compute_vol(config, &snapshot, strike_range)?;
            let (lo, hi) = grid.vol_range();
            info!(shape = ?grid.shape(), min_vol = lo, max_vol = hi, "Built volatility surface");
            write_json(&grid, output.as_ref())
        }
        SurfaceCommand::Price { grid, output } => {
            let surface = compute_sensitivity(config, grid, None)?;
            info!(shape = ?surface.shape(), "Built price surface");
            write_json(&surface, output.as_ref())
        }
        SurfaceCommand::Greek {
            greek,
            grid,
            output,
        } => {
            let surface = compute_sensitivity(config, grid, Some(*greek))?;
            info!(greek = %greek, shape = ?surface.shape(), "Built Greek surface");
            write_json(&surface, output.as_ref())
        }
    }
}
