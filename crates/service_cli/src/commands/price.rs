//! Price command implementation
//!
//! Prices one option with the selected model.

use pricer_core::types::{ExerciseStyle, OptionSpec};
use pricer_models::model::PricingModel;
use serde::Serialize;
use tracing::info;

use super::{write_json, OptionArgs};
use crate::config::EngineConfig;
use crate::Result;

/// Output of `optsurf price`.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    /// Model used
    pub model: PricingModel,
    /// Lattice steps, when the lattice model was used
    pub lattice_steps: Option<usize>,
    /// Inputs priced
    pub spec: OptionSpec,
    /// Theoretical price
    pub price: f64,
    /// Intrinsic value at the current spot
    pub intrinsic: f64,
}

/// Prices `option` under `model`.
pub fn compute(config: &EngineConfig, option: &OptionArgs, model: PricingModel) -> Result<PriceReport> {
    let spec = option.to_spec(config.risk_free_rate)?;
    let lattice = config.lattice(ExerciseStyle::American)?;
    let price = model.price(&spec, &lattice)?;

    Ok(PriceReport {
        model,
        lattice_steps: (!model.has_greeks()).then_some(lattice.steps()),
        spec,
        price,
        intrinsic: spec.intrinsic(),
    })
}

/// Run the price command
pub fn run(config: &EngineConfig, option: &OptionArgs, model: PricingModel) -> Result<()> {
    info!(model = %model, kind = %option.kind, "Pricing option");
    let report = compute(config, option, model)?;
    info!(price = report.price, "Pricing complete");
    write_json(&report, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::OptionType;

    fn option(kind: OptionType) -> OptionArgs {
        OptionArgs {
            spot: 150.0,
            strike: 160.0,
            expiry: Some(0.5),
            days: None,
            vol: 0.25,
            kind,
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            risk_free_rate: 0.02,
            ..Default::default()
        }
    }

    #[test]
    fn test_analytic_price() {
        let report = compute(&config(), &option(OptionType::Call), PricingModel::EuropeanAnalytic).unwrap();
        assert_relative_eq!(report.price, 7.1682, epsilon = 1e-3);
        assert_eq!(report.lattice_steps, None);
        assert_eq!(report.intrinsic, 0.0);
    }

    #[test]
    fn test_lattice_price_uses_config_steps() {
        let config = EngineConfig {
            lattice_steps: 400,
            ..config()
        };
        let report = compute(&config, &option(OptionType::Put), PricingModel::AmericanLattice).unwrap();
        assert_eq!(report.lattice_steps, Some(400));
        assert!(report.price >= report.intrinsic);
    }

    #[test]
    fn test_expired_option_is_intrinsic() {
        let expired = OptionArgs {
            spot: 170.0,
            expiry: Some(0.0),
            ..option(OptionType::Call)
        };
        let report = compute(&config(), &expired, PricingModel::EuropeanAnalytic).unwrap();
        assert_eq!(report.price, 10.0);
    }
}
