//! Static dispatch over the available pricing engines.
//!
//! [`PricingModel`] is a closed enum: selecting an engine by name parses into
//! one of its variants, and every call is a `match` rather than a vtable hop.
//!
//! ## Example
//!
//! ```
//! use pricer_core::types::{OptionSpec, OptionType};
//! use pricer_models::lattice::LatticeConfig;
//! use pricer_models::model::PricingModel;
//!
//! let spec = OptionSpec::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Put).unwrap();
//! let lattice = LatticeConfig::default();
//!
//! let european: PricingModel = "european".parse().unwrap();
//! let american: PricingModel = "American".parse().unwrap();
//!
//! let e = european.price(&spec, &lattice).unwrap();
//! let a = american.price(&spec, &lattice).unwrap();
//! assert!(a >= e);
//!
//! assert!(european.greeks(&spec).is_ok());
//! assert!(american.greeks(&spec).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use pricer_core::traits::OptionPricer;
use pricer_core::types::{OptionSpec, PricingError};
use serde::{Deserialize, Serialize};

use crate::analytical::{AnalyticPricer, AnalyticalError, Greeks};
use crate::lattice::{BinomialTree, LatticeConfig};

/// Pricing engine selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Closed-form Black-Scholes, European exercise.
    #[default]
    EuropeanAnalytic,
    /// Cox-Ross-Rubinstein lattice with the configured exercise style.
    AmericanLattice,
}

impl PricingModel {
    /// Both models in display order.
    pub const ALL: [PricingModel; 2] = [PricingModel::EuropeanAnalytic, PricingModel::AmericanLattice];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PricingModel::EuropeanAnalytic => "Black-Scholes (European)",
            PricingModel::AmericanLattice => "Binomial (American)",
        }
    }

    /// Whether this model produces analytic Greeks.
    #[inline]
    pub fn has_greeks(&self) -> bool {
        matches!(self, PricingModel::EuropeanAnalytic)
    }

    /// Prices `spec` with the selected engine.
    ///
    /// `lattice` is ignored by the analytic model.
    ///
    /// # Errors
    /// Whatever the underlying engine reports, converted to [`PricingError`].
    pub fn price(&self, spec: &OptionSpec, lattice: &LatticeConfig) -> Result<f64, PricingError> {
        match self {
            PricingModel::EuropeanAnalytic => AnalyticPricer.price(spec),
            PricingModel::AmericanLattice => BinomialTree::new(*lattice).price(spec),
        }
    }

    /// Analytic Greeks for `spec`.
    ///
    /// # Errors
    /// `PricingError::UnsupportedModel` for the lattice model.
    pub fn greeks(&self, spec: &OptionSpec) -> Result<Greeks<f64>, PricingError> {
        match self {
            PricingModel::EuropeanAnalytic => AnalyticPricer.greeks(spec),
            PricingModel::AmericanLattice => Err(AnalyticalError::UnsupportedModel {
                model: self.to_string(),
                output: "greeks".to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PricingModel {
    type Err = PricingError;

    /// Accepts the variant names as well as the short forms `european`,
    /// `black-scholes`, `bs`, `american`, `binomial` and `lattice`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "european_analytic" | "european" | "black_scholes" | "bs" | "analytic" => {
                Ok(PricingModel::EuropeanAnalytic)
            }
            "american_lattice" | "american" | "binomial" | "lattice" | "crr" => {
                Ok(PricingModel::AmericanLattice)
            }
            _ => Err(PricingError::InvalidInput(format!(
                "unknown pricing model: {:?}",
                s
            ))),
        }
    }
}
