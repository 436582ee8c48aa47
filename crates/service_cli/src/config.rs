//! Engine configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use pricer_core::market_data::surfaces::DEFAULT_GRID_POINTS;
use pricer_core::market_data::{SurfaceGridSpec, DEFAULT_STRIKE_WIDTH_PCT};
use pricer_core::types::ExerciseStyle;
use pricer_models::chain::{MoneynessBand, DEFAULT_MONEYNESS_LOWER, DEFAULT_MONEYNESS_UPPER};
use pricer_models::lattice::{LatticeConfig, DEFAULT_LATTICE_STEPS};

/// Environment variable prefix shared by every setting.
pub const ENV_PREFIX: &str = "OPTSURF_";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// A numeric setting outside its allowed range
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Config file could not be read or parsed
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Environment variable could not be parsed
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-node detail
    Trace,
    /// Engine statistics
    Debug,
    /// Command progress
    Info,
    /// Problems only
    #[default]
    Warn,
    /// Failures only
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Engine configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Binomial lattice steps
    pub lattice_steps: usize,
    /// Strike resolution of volatility surfaces
    pub surface_strike_points: usize,
    /// Day resolution of volatility surfaces
    pub surface_day_points: usize,
    /// Half-width of the strike window as a fraction of spot
    pub strike_width_pct: f64,
    /// Lower edge of the chain moneyness band
    pub moneyness_lower: f64,
    /// Upper edge of the chain moneyness band
    pub moneyness_upper: f64,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            risk_free_rate: 0.05,
            lattice_steps: DEFAULT_LATTICE_STEPS,
            surface_strike_points: DEFAULT_GRID_POINTS,
            surface_day_points: DEFAULT_GRID_POINTS,
            strike_width_pct: DEFAULT_STRIKE_WIDTH_PCT,
            moneyness_lower: DEFAULT_MONEYNESS_LOWER,
            moneyness_upper: DEFAULT_MONEYNESS_UPPER,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}{} = {:?}", ENV_PREFIX, key, raw)))
}

impl EngineConfig {
    /// Create a new EngineConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Overrides every setting whose `OPTSURF_*` variable is set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Overrides settings from `lookup`, which maps an unprefixed key such as
    /// `RISK_FREE_RATE` to its raw value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(v.trim())?;
        }
        if let Some(v) = lookup("RISK_FREE_RATE") {
            self.risk_free_rate = parse_env("RISK_FREE_RATE", &v)?;
        }
        if let Some(v) = lookup("LATTICE_STEPS") {
            self.lattice_steps = parse_env("LATTICE_STEPS", &v)?;
        }
        if let Some(v) = lookup("SURFACE_STRIKE_POINTS") {
            self.surface_strike_points = parse_env("SURFACE_STRIKE_POINTS", &v)?;
        }
        if let Some(v) = lookup("SURFACE_DAY_POINTS") {
            self.surface_day_points = parse_env("SURFACE_DAY_POINTS", &v)?;
        }
        if let Some(v) = lookup("STRIKE_WIDTH_PCT") {
            self.strike_width_pct = parse_env("STRIKE_WIDTH_PCT", &v)?;
        }
        if let Some(v) = lookup("MONEYNESS_LOWER") {
            self.moneyness_lower = parse_env("MONEYNESS_LOWER", &v)?;
        }
        if let Some(v) = lookup("MONEYNESS_UPPER") {
            self.moneyness_upper = parse_env("MONEYNESS_UPPER", &v)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "risk_free_rate",
                message: format!("must be finite, got {}", self.risk_free_rate),
            });
        }
        if self.lattice_steps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "lattice_steps",
                message: "must be at least 1".to_string(),
            });
        }
        if self.surface_strike_points == 0 || self.surface_day_points == 0 {
            return Err(ConfigError::InvalidValue {
                key: "surface_points",
                message: format!(
                    "grid needs at least one point per axis, got {}x{}",
                    self.surface_day_points, self.surface_strike_points
                ),
            });
        }
        if !(self.strike_width_pct > 0.0 && self.strike_width_pct < 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "strike_width_pct",
                message: format!("must lie in (0, 1), got {}", self.strike_width_pct),
            });
        }
        self.moneyness_band()?;
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(rate) = cli.risk_free_rate {
            self.risk_free_rate = rate;
        }
        if let Some(steps) = cli.lattice_steps {
            self.lattice_steps = steps;
        }
        Ok(())
    }

    /// Lattice configuration with the given exercise style.
    pub fn lattice(&self, exercise: ExerciseStyle) -> Result<LatticeConfig, ConfigError> {
        LatticeConfig::new(self.lattice_steps, exercise).map_err(|e| ConfigError::InvalidValue {
            key: "lattice_steps",
            message: e.to_string(),
        })
    }

    /// Moneyness band for chain valuation.
    pub fn moneyness_band(&self) -> Result<MoneynessBand, ConfigError> {
        MoneynessBand::new(self.moneyness_lower, self.moneyness_upper).map_err(|e| {
            ConfigError::InvalidValue {
                key: "moneyness",
                message: e.to_string(),
            }
        })
    }

    /// Applies the configured strike resolution to a grid layout and caps
    /// its day resolution at the configured day points.
    pub fn surface_resolution(&self, spec: SurfaceGridSpec) -> SurfaceGridSpec {
        let day_points = spec.day_points().min(self.surface_day_points);
        spec.with_resolution(day_points, self.surface_strike_points)
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Risk-free rate override
    pub risk_free_rate: Option<f64>,
    /// Lattice step override
    pub lattice_steps: Option<usize>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<EngineConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.risk_free_rate, 0.05);
        assert_eq!(config.lattice_steps, 50);
        assert_eq!(config.surface_strike_points, 50);
        assert_eq!(config.surface_day_points, 50);
        assert_eq!(config.strike_width_pct, 0.5);
        assert_eq!(config.moneyness_lower, 0.8);
        assert_eq!(config.moneyness_upper, 1.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Trace), "trace");
        assert_eq!(format!("{}", LogLevel::Warn), "warn");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            log_level = "debug"
            risk_free_rate = 0.02
            lattice_steps = 200
            surface_strike_points = 80
            surface_day_points = 30
            strike_width_pct = 0.3
            moneyness_lower = 0.9
            moneyness_upper = 1.1
        "#;

        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.risk_free_rate, 0.02);
        assert_eq!(config.lattice_steps, 200);
        assert_eq!(config.surface_strike_points, 80);
        assert_eq!(config.surface_day_points, 30);
        assert_eq!(config.strike_width_pct, 0.3);
        assert_eq!(config.moneyness_lower, 0.9);
        assert_eq!(config.moneyness_upper, 1.1);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: EngineConfig = toml::from_str("lattice_steps = 500").unwrap();
        assert_eq!(config.lattice_steps, 500);
        assert_eq!(config.risk_free_rate, 0.05);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_toml_rejects_bad_log_level() {
        assert!(toml::from_str::<EngineConfig>(r#"log_level = "loud""#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        config
            .apply_env_from(lookup(&[
                ("RISK_FREE_RATE", "0.03"),
                ("LATTICE_STEPS", " 120 "),
                ("LOG_LEVEL", "info"),
            ]))
            .unwrap();

        assert_eq!(config.risk_free_rate, 0.03);
        assert_eq!(config.lattice_steps, 120);
        assert_eq!(config.log_level, LogLevel::Info);
        // Untouched settings keep their values
        assert_eq!(config.surface_day_points, 50);
    }

    #[test]
    fn test_env_parse_failure() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_env_from(lookup(&[("LATTICE_STEPS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPTSURF_LATTICE_STEPS"));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = EngineConfig::default();
        let cli = CliArgs {
            config_file: None,
            log_level: Some("debug".to_string()),
            risk_free_rate: Some(0.01),
            lattice_steps: Some(300),
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.risk_free_rate, 0.01);
        assert_eq!(config.lattice_steps, 300);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = EngineConfig::default();
        config
            .apply_env_from(lookup(&[("RISK_FREE_RATE", "0.03")]))
            .unwrap();
        config
            .merge_with_cli(&CliArgs {
                risk_free_rate: Some(0.04),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.risk_free_rate, 0.04);
    }

    #[test]
    fn test_validate() {
        let mut config = EngineConfig::default();
        config.lattice_steps = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.strike_width_pct = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.moneyness_lower = 1.3;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.risk_free_rate = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.surface_day_points = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_settings() {
        let config = EngineConfig::default();
        let lattice = config.lattice(ExerciseStyle::European).unwrap();
        assert_eq!(lattice.steps(), 50);
        assert_eq!(lattice.exercise(), ExerciseStyle::European);

        let band = config.moneyness_band().unwrap();
        assert_eq!(band.strike_bounds(100.0), (80.0, 120.0));
    }

    #[test]
    fn test_surface_resolution_caps_days() {
        let config = EngineConfig {
            surface_day_points: 8,
            surface_strike_points: 25,
            ..Default::default()
        };
        let spec = SurfaceGridSpec::new((7.0, 90.0), (80.0, 120.0)).with_resolution(15, 50);
        let resolved = config.surface_resolution(spec);
        assert_eq!(resolved.day_points(), 8);
        assert_eq!(resolved.strike_points(), 25);

        let coarse = SurfaceGridSpec::new((7.0, 90.0), (80.0, 120.0)).with_resolution(5, 50);
        assert_eq!(config.surface_resolution(coarse).day_points(), 5);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidLogLevel("bad".to_string());
        assert!(err.to_string().contains("Invalid log level"));

        let err = ConfigError::InvalidValue {
            key: "lattice_steps",
            message: "must be at least 1".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for lattice_steps: must be at least 1");
    }
}
