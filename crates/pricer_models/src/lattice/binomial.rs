//! Cox-Ross-Rubinstein binomial tree.
//!
//! ## Parameters
//!
//! - Δt = T / N
//! - u = e^(σ√Δt), d = 1/u
//! - p = (e^(rΔt) - d) / (u - d)
//!
//! Terminal nodes carry the payoff at S·u^i·d^(N-i). Backward induction
//! discounts the expected value one step at a time; American nodes take the
//! larger of continuation and immediate exercise. A single buffer of N + 1
//! values is reused across layers, so memory is O(N) and time O(N²).

use pricer_core::traits::OptionPricer;
use pricer_core::types::{ExerciseStyle, OptionSpec, OptionType, PricingError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::LatticeError;

/// Default number of time steps.
pub const DEFAULT_LATTICE_STEPS: usize = 50;

/// Lattice resolution and exercise style.
///
/// # Examples
/// ```
/// use pricer_core::types::ExerciseStyle;
/// use pricer_models::lattice::LatticeConfig;
///
/// let config = LatticeConfig::default();
/// assert_eq!(config.steps(), 50);
/// assert_eq!(config.exercise(), ExerciseStyle::American);
///
/// assert!(LatticeConfig::new(0, ExerciseStyle::European).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LatticeConfigFields")]
pub struct LatticeConfig {
    steps: usize,
    exercise: ExerciseStyle,
}

#[derive(Deserialize)]
struct LatticeConfigFields {
    #[serde(default = "default_steps")]
    steps: usize,
    #[serde(default)]
    exercise: ExerciseStyle,
}

fn default_steps() -> usize {
    DEFAULT_LATTICE_STEPS
}

impl TryFrom<LatticeConfigFields> for LatticeConfig {
    type Error = LatticeError;

    fn try_from(f: LatticeConfigFields) -> Result<Self, Self::Error> {
        LatticeConfig::new(f.steps, f.exercise)
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_LATTICE_STEPS,
            exercise: ExerciseStyle::American,
        }
    }
}

impl LatticeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// `LatticeError::InvalidStepCount` if `steps == 0`.
    pub fn new(steps: usize, exercise: ExerciseStyle) -> Result<Self, LatticeError> {
        if steps == 0 {
            return Err(LatticeError::InvalidStepCount { steps });
        }
        Ok(Self { steps, exercise })
    }

    /// American exercise with `steps` steps.
    pub fn american(steps: usize) -> Result<Self, LatticeError> {
        Self::new(steps, ExerciseStyle::American)
    }

    /// European exercise with `steps` steps.
    pub fn european(steps: usize) -> Result<Self, LatticeError> {
        Self::new(steps, ExerciseStyle::European)
    }

    /// Number of time steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Exercise style.
    #[inline]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }
}

/// Cox-Ross-Rubinstein binomial pricer.
///
/// # Examples
/// ```
/// use pricer_core::types::{OptionSpec, OptionType};
/// use pricer_models::lattice::{BinomialTree, LatticeConfig};
///
/// let spec = OptionSpec::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Put).unwrap();
/// let american = BinomialTree::new(LatticeConfig::american(200).unwrap()).value(&spec).unwrap();
/// let european = BinomialTree::new(LatticeConfig::european(200).unwrap()).value(&spec).unwrap();
///
/// assert!(american >= european);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinomialTree {
    config: LatticeConfig,
}

impl BinomialTree {
    /// Tree with the given configuration.
    pub fn new(config: LatticeConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[inline]
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Option value on the lattice.
    ///
    /// # Errors
    /// - `LatticeError::InvalidStepCount` if the step count is zero
    /// - `LatticeError::Degenerate` if `u == d`
    ///
    /// Drift that swamps diffusion over one step (`p ∉ [0, 1]`) is not an
    /// error: the option is valued on the deterministic forward path.
    pub fn value(&self, spec: &OptionSpec) -> Result<f64, LatticeError> {
        let steps = self.config.steps;
        if steps == 0 {
            return Err(LatticeError::InvalidStepCount { steps });
        }
        if spec.is_expired() {
            return Ok(spec.intrinsic());
        }

        let american = self.config.exercise.allows_early_exercise();
        let dt = spec.time_to_expiry() / steps as f64;

        if spec.volatility() == 0.0 {
            debug!(steps, american, "zero volatility, valuing deterministic forward path");
            return Ok(deterministic_value(spec, steps, dt, american));
        }

        let u = (spec.volatility() * dt.sqrt()).exp();
        let d = 1.0 / u;
        if u == d {
            return Err(LatticeError::Degenerate {
                reason: format!(
                    "up and down factors coincide (σ = {}, Δt = {})",
                    spec.volatility(),
                    dt
                ),
            });
        }

        let growth = (spec.rate() * dt).exp();
        let p = (growth - d) / (u - d);
        if !(0.0..=1.0).contains(&p) {
            debug!(p, steps, "drift dominates diffusion, valuing deterministic forward path");
            return Ok(deterministic_value(spec, steps, dt, american));
        }

        let disc = (-spec.rate() * dt).exp();
        let disc_up = disc * p;
        let disc_down = disc * (1.0 - p);
        let kind = spec.kind();
        let strike = spec.strike();

        // Node i at layer n sits at S·d^n·(u/d)^i
        let ratio = u / d;
        let mut values = Vec::with_capacity(steps + 1);
        let mut node_spot = spec.spot() * d.powi(steps as i32);
        for _ in 0..=steps {
            values.push(kind.intrinsic(node_spot, strike));
            node_spot *= ratio;
        }

        let mut layer_base = spec.spot() * d.powi(steps as i32 - 1);
        for layer in (0..steps).rev() {
            let mut node_spot = layer_base;
            for j in 0..=layer {
                let continuation = disc_up * values[j + 1] + disc_down * values[j];
                values[j] = if american {
                    continuation.max(kind.intrinsic(node_spot, strike))
                } else {
                    continuation
                };
                node_spot *= ratio;
            }
            layer_base *= u;
        }

        Ok(values[0].max(0.0))
    }
}

/// Zero-volatility value: the underlying follows S·e^(r·t) exactly.
///
/// European exercise takes the discounted payoff at expiry; American
/// exercise takes the best discounted payoff over every lattice date.
fn deterministic_value(spec: &OptionSpec, steps: usize, dt: f64, american: bool) -> f64 {
    let discounted_payoff = |t: f64| {
        let discounted_strike = spec.strike() * (-spec.rate() * t).exp();
        match spec.kind() {
            OptionType::Call => (spec.spot() - discounted_strike).max(0.0),
            OptionType::Put => (discounted_strike - spec.spot()).max(0.0),
        }
    };

    if american {
        (0..=steps)
            .map(|k| discounted_payoff(k as f64 * dt))
            .fold(0.0, f64::max)
    } else {
        discounted_payoff(spec.time_to_expiry())
    }
}

impl OptionPricer for BinomialTree {
    fn price(&self, spec: &OptionSpec) -> Result<f64, PricingError> {
        Ok(self.value(spec)?)
    }

    fn name(&self) -> &'static str {
        "binomial-crr"
    }
}
