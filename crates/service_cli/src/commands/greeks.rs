//! Greeks command implementation
//!
//! Analytic Black-Scholes sensitivities for one option.

use pricer_core::traits::OptionPricer;
use pricer_core::types::OptionSpec;
use pricer_models::analytical::{AnalyticPricer, GreekKind, Greeks};
use serde::Serialize;
use tracing::info;

use super::{write_json, OptionArgs};
use crate::config::EngineConfig;
use crate::Result;

/// Output of `optsurf greeks`.
#[derive(Debug, Clone, Serialize)]
pub struct GreeksReport {
    /// Inputs
    pub spec: OptionSpec,
    /// Black-Scholes price
    pub price: f64,
    /// d₁
    pub d1: f64,
    /// d₂
    pub d2: f64,
    /// Sensitivities
    pub greeks: Greeks<f64>,
}

/// Price, d₁/d₂ and Greeks for `option`.
pub fn compute(config: &EngineConfig, option: &OptionArgs) -> Result<GreeksReport> {
    let spec = option.to_spec(config.risk_free_rate)?;
    let price = AnalyticPricer.price(&spec)?;
    let (d1, d2) = AnalyticPricer.d1_d2(&spec)?;
    let greeks = AnalyticPricer.greeks(&spec)?;

    Ok(GreeksReport {
        spec,
        price,
        d1,
        d2,
        greeks,
    })
}

/// Run the greeks command
///
/// With `only`, prints just that sensitivity as a bare number.
pub fn run(config: &EngineConfig, option: &OptionArgs, only: Option<GreekKind>) -> Result<()> {
    info!(kind = %option.kind, "Computing Greeks");
    let report = compute(config, option)?;
    match only {
        Some(kind) => write_json(&report.greeks.get(kind), None),
        None => write_json(&report, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::OptionType;

    #[test]
    fn test_worked_example() {
        let config = EngineConfig {
            risk_free_rate: 0.02,
            ..Default::default()
        };
        let option = OptionArgs {
            spot: 150.0,
            strike: 160.0,
            expiry: Some(0.5),
            days: None,
            vol: 0.25,
            kind: OptionType::Call,
        };

        let report = compute(&config, &option).unwrap();
        assert_relative_eq!(report.price, 7.1682, epsilon = 1e-3);
        assert_relative_eq!(report.d1, -0.22013, epsilon = 1e-4);
        assert_relative_eq!(report.d2, -0.39690, epsilon = 1e-4);
        assert_relative_eq!(report.greeks.delta, 0.41289, epsilon = 1e-4);
        assert_relative_eq!(report.greeks.vega, 41.30, epsilon = 0.01);
        assert!(report.greeks.gamma > 0.0);
        assert!(report.greeks.theta < 0.0);
    }
}
