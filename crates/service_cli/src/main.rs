//! optsurf - option pricing and implied volatility surfaces
//!
//! # Commands
//!
//! - `optsurf price` - Price one option (Black-Scholes or binomial)
//! - `optsurf greeks` - Analytic Greeks of one option
//! - `optsurf batch --input <file>` - Price a JSON array of options in parallel
//! - `optsurf surface vol --market <file>` - Implied volatility surface
//! - `optsurf surface price|greek` - Price or Greek over spot × days to expiry
//! - `optsurf chain --market <file>` - Value a listed chain against last prices

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pricer_core::types::OptionType;
use pricer_models::analytical::GreekKind;
use pricer_models::model::PricingModel;
use service_cli::commands::{self, surface::SurfaceCommand, OptionArgs};
use service_cli::config::{build_config, CliArgs as ConfigCliArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Option pricing and implied volatility surface engine
#[derive(Parser, Debug)]
#[command(name = "optsurf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Risk-free rate override
    #[arg(long, global = true)]
    rate: Option<f64>,

    /// Binomial lattice steps override
    #[arg(long, global = true)]
    steps: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price a single option
    Price {
        #[command(flatten)]
        option: OptionArgs,

        /// Pricing model (european, american)
        #[arg(short, long, default_value = "european")]
        model: PricingModel,
    },

    /// Analytic Greeks of a single option
    Greeks {
        #[command(flatten)]
        option: OptionArgs,

        /// Print only this Greek
        #[arg(long)]
        only: Option<GreekKind>,
    },

    /// Price a JSON array of option specs
    Batch {
        /// Input file (JSON array of option specs)
        #[arg(short, long)]
        input: PathBuf,

        /// Pricing model (european, american)
        #[arg(short, long, default_value = "european")]
        model: PricingModel,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Volatility, price and Greek surfaces
    #[command(subcommand)]
    Surface(SurfaceCommand),

    /// Value a listed option chain
    Chain {
        /// Market snapshot (JSON)
        #[arg(short, long)]
        market: PathBuf,

        /// Expiration date (YYYY-MM-DD); defaults to the nearest live one
        #[arg(short, long)]
        expiration: Option<NaiveDate>,

        /// Option side (call or put)
        #[arg(short, long, default_value = "call")]
        kind: OptionType,

        /// Pricing model (european, american)
        #[arg(long, default_value = "european")]
        model: PricingModel,

        /// Print the combined call/put smile instead of valuing
        #[arg(long)]
        smile: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl From<&Cli> for ConfigCliArgs {
    fn from(cli: &Cli) -> Self {
        ConfigCliArgs {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            risk_free_rate: cli.rate,
            lattice_steps: cli.steps,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&ConfigCliArgs::from(&cli)).context("Failed to load configuration")?;

    init_tracing(config.log_level.as_filter_str());

    tracing::debug!(
        version = service_cli::VERSION,
        risk_free_rate = config.risk_free_rate,
        lattice_steps = config.lattice_steps,
        log_level = %config.log_level,
        "Configuration loaded"
    );

    match &cli.command {
        Commands::Price { option, model } => {
            commands::price::run(&config, option, *model).context("price failed")
        }
        Commands::Greeks { option, only } => {
            commands::greeks::run(&config, option, *only).context("greeks failed")
        }
        Commands::Batch {
            input,
            model,
            output,
        } => commands::batch::run(&config, input, *model, output.as_ref())
            .with_context(|| format!("batch pricing of {} failed", input.display())),
        Commands::Surface(command) => {
            commands::surface::run(&config, command).context("surface failed")
        }
        Commands::Chain {
            market,
            expiration,
            kind,
            model,
            smile,
            output,
        } => commands::chain::run(&config, market, *expiration, *kind, *model, *smile, output.as_ref())
            .with_context(|| format!("chain valuation of {} failed", market.display())),
    }
}
