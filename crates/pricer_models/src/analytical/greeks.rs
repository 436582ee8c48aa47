//! Option sensitivities produced by the analytic pricer.

use std::fmt;
use std::str::FromStr;

use num_traits::Float;
use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};

/// Name of a single sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreekKind {
    /// ∂V/∂S
    Delta,
    /// ∂²V/∂S²
    Gamma,
    /// ∂V/∂σ
    Vega,
    /// ∂V/∂t (calendar time, so usually negative)
    Theta,
    /// ∂V/∂r
    Rho,
}

impl GreekKind {
    /// All sensitivities in reporting order.
    pub const ALL: [GreekKind; 5] = [
        GreekKind::Delta,
        GreekKind::Gamma,
        GreekKind::Vega,
        GreekKind::Theta,
        GreekKind::Rho,
    ];

    /// Capitalised display name.
    pub fn name(&self) -> &'static str {
        match self {
            GreekKind::Delta => "Delta",
            GreekKind::Gamma => "Gamma",
            GreekKind::Vega => "Vega",
            GreekKind::Theta => "Theta",
            GreekKind::Rho => "Rho",
        }
    }
}

impl fmt::Display for GreekKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GreekKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GreekKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PricingError::InvalidInput(format!("unknown greek: {:?}", s)))
    }
}

/// Delta, Gamma, Vega, Theta and Rho of one option.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{GreekKind, Greeks};
///
/// let g = Greeks { delta: 0.5, gamma: 0.02, vega: 39.0, theta: -6.4, rho: 53.2 };
/// assert_eq!(g.get(GreekKind::Vega), 39.0);
///
/// let names: Vec<&str> = g.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, ["Delta", "Gamma", "Vega", "Theta", "Rho"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks<T> {
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// ∂V/∂σ (per unit volatility)
    pub vega: T,
    /// ∂V/∂t (per year)
    pub theta: T,
    /// ∂V/∂r (per unit rate)
    pub rho: T,
}

impl<T: Float> Greeks<T> {
    /// All sensitivities zero.
    pub fn zero() -> Self {
        Self {
            delta: T::zero(),
            gamma: T::zero(),
            vega: T::zero(),
            theta: T::zero(),
            rho: T::zero(),
        }
    }

    /// Value of one sensitivity.
    pub fn get(&self, kind: GreekKind) -> T {
        match kind {
            GreekKind::Delta => self.delta,
            GreekKind::Gamma => self.gamma,
            GreekKind::Vega => self.vega,
            GreekKind::Theta => self.theta,
            GreekKind::Rho => self.rho,
        }
    }

    /// `(name, value)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, T)> + '_ {
        GreekKind::ALL.into_iter().map(move |k| (k.name(), self.get(k)))
    }
}
