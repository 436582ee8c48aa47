//! Black-Scholes pricing model for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! ## Boundaries
//!
//! - `T ≤ 0`: the option has expired; price is intrinsic and every Greek is 0.
//! - `σ = 0`: the underlying grows deterministically at `r`, so the price is
//!   the discounted forward intrinsic `max(0, ±(S - K·e^(-rT)))` and the
//!   Greeks are the derivatives of that expression.

use num_traits::Float;
use pricer_core::traits::OptionPricer;
use pricer_core::types::{OptionSpec, OptionType, PricingError};

use super::distributions::{lit, norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use super::greeks::Greeks;

/// Black-Scholes model for European option pricing.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes<T: Float> {
    /// Spot price (S)
    spot: T,
    /// Risk-free interest rate (r)
    rate: T,
    /// Volatility (σ)
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model.
    ///
    /// Zero volatility is accepted and priced as the deterministic limit.
    ///
    /// # Errors
    /// - `AnalyticalError::NonFiniteInput` if any input is NaN or infinite
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility < 0
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0).is_ok());
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, -0.2).is_err());
    /// ```
    pub fn new(spot: T, rate: T, volatility: T) -> Result<Self, AnalyticalError> {
        let as_f64 = |x: T| x.to_f64().unwrap_or(f64::NAN);

        for (name, value) in [("spot", spot), ("rate", rate), ("volatility", volatility)] {
            if !value.is_finite() {
                return Err(AnalyticalError::NonFiniteInput {
                    name,
                    value: as_f64(value),
                });
            }
        }
        if spot <= T::zero() {
            return Err(AnalyticalError::InvalidSpot { spot: as_f64(spot) });
        }
        if volatility < T::zero() {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: as_f64(volatility),
            });
        }

        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    #[inline]
    fn discount(&self, expiry: T) -> T {
        (-self.rate * expiry).exp()
    }

    /// Total volatility σ√T; zero marks the deterministic regime.
    #[inline]
    fn total_vol(&self, expiry: T) -> T {
        self.volatility * expiry.sqrt()
    }

    /// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
    ///
    /// When `T ≤ 0` or `σ = 0` the ratio is unbounded; the result is then
    /// ±∞ according to forward moneyness (0 exactly at the forward).
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        if expiry <= T::zero() || self.total_vol(expiry) <= T::zero() {
            let forward_gap = self.spot - strike * self.discount(expiry.max(T::zero()));
            return if forward_gap > T::zero() {
                T::infinity()
            } else if forward_gap < T::zero() {
                T::neg_infinity()
            } else {
                T::zero()
            };
        }

        let log_moneyness = (self.spot / strike).ln();
        let drift = (self.rate + lit::<T>(0.5) * self.volatility * self.volatility) * expiry;
        (log_moneyness + drift) / self.total_vol(expiry)
    }

    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        if expiry <= T::zero() {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.total_vol(expiry)
    }

    /// Option price for either payoff direction.
    ///
    /// Never negative and never NaN for valid inputs.
    pub fn price(&self, strike: T, expiry: T, kind: OptionType) -> T {
        let zero = T::zero();

        if expiry <= zero {
            let payoff = match kind {
                OptionType::Call => self.spot - strike,
                OptionType::Put => strike - self.spot,
            };
            return payoff.max(zero);
        }

        let discounted_strike = strike * self.discount(expiry);

        if self.total_vol(expiry) <= zero {
            let forward_payoff = match kind {
                OptionType::Call => self.spot - discounted_strike,
                OptionType::Put => discounted_strike - self.spot,
            };
            return forward_payoff.max(zero);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);

        let value = match kind {
            OptionType::Call => self.spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
            OptionType::Put => discounted_strike * norm_cdf(-d2) - self.spot * norm_cdf(-d1),
        };
        value.max(zero)
    }

    /// European call price.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
    /// assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-3);
    /// ```
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        self.price(strike, expiry, OptionType::Call)
    }

    /// European put price.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        self.price(strike, expiry, OptionType::Put)
    }

    /// All five sensitivities in one pass.
    ///
    /// - Delta = N(d₁) (call) / N(d₁) - 1 (put)
    /// - Gamma = φ(d₁) / (S·σ·√T)
    /// - Vega = S·φ(d₁)·√T
    /// - Theta = -S·φ(d₁)·σ / (2√T) - r·K·e^(-rT)·N(ω·d₂)
    /// - Rho = K·T·e^(-rT)·N(ω·d₂)
    ///
    /// with ω = +1 for calls and -1 for puts. ω only flips the argument of
    /// N, so put rho is reported as a positive magnitude and put theta
    /// carries the full rate term.
    pub fn greeks(&self, strike: T, expiry: T, kind: OptionType) -> Greeks<T> {
        let zero = T::zero();
        if expiry <= zero {
            return Greeks::zero();
        }

        let omega = lit::<T>(kind.sign());
        let discounted_strike = strike * self.discount(expiry);
        let total_vol = self.total_vol(expiry);

        if total_vol <= zero {
            let in_the_money = omega * (self.spot - discounted_strike) > zero;
            if !in_the_money {
                return Greeks::zero();
            }
            return Greeks {
                delta: omega,
                gamma: zero,
                vega: zero,
                theta: -self.rate * discounted_strike,
                rho: expiry * discounted_strike,
            };
        }

        let d1 = self.d1(strike, expiry);
        let d2 = d1 - total_vol;
        let sqrt_t = expiry.sqrt();
        let pdf_d1 = norm_pdf(d1);
        let cdf_omega_d2 = norm_cdf(omega * d2);

        let delta = match kind {
            OptionType::Call => norm_cdf(d1),
            OptionType::Put => norm_cdf(d1) - T::one(),
        };

        Greeks {
            delta,
            gamma: pdf_d1 / (self.spot * total_vol),
            vega: self.spot * pdf_d1 * sqrt_t,
            theta: -(self.spot * pdf_d1 * self.volatility) / (lit::<T>(2.0) * sqrt_t)
                - self.rate * discounted_strike * cdf_omega_d2,
            rho: expiry * discounted_strike * cdf_omega_d2,
        }
    }

    /// Delta (∂V/∂S).
    #[inline]
    pub fn delta(&self, strike: T, expiry: T, kind: OptionType) -> T {
        self.greeks(strike, expiry, kind).delta
    }

    /// Gamma (∂²V/∂S²), identical for calls and puts.
    #[inline]
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        self.greeks(strike, expiry, OptionType::Call).gamma
    }

    /// Vega (∂V/∂σ), identical for calls and puts.
    #[inline]
    pub fn vega(&self, strike: T, expiry: T) -> T {
        self.greeks(strike, expiry, OptionType::Call).vega
    }

    /// Theta (∂V/∂t), usually negative.
    #[inline]
    pub fn theta(&self, strike: T, expiry: T, kind: OptionType) -> T {
        self.greeks(strike, expiry, kind).theta
    }

    /// Rho (∂V/∂r).
    #[inline]
    pub fn rho(&self, strike: T, expiry: T, kind: OptionType) -> T {
        self.greeks(strike, expiry, kind).rho
    }
}

impl BlackScholes<f64> {
    /// Model parameters taken from an option specification.
    pub fn from_spec(spec: &OptionSpec) -> Result<Self, AnalyticalError> {
        Self::new(spec.spot(), spec.rate(), spec.volatility())
    }
}

/// Closed-form European pricer over [`OptionSpec`].
///
/// # Examples
/// ```
/// use pricer_core::traits::OptionPricer;
/// use pricer_core::types::{OptionSpec, OptionType};
/// use pricer_models::analytical::AnalyticPricer;
///
/// let spec = OptionSpec::new(150.0, 160.0, 0.5, 0.02, 0.25, OptionType::Call).unwrap();
/// let price = AnalyticPricer.price(&spec).unwrap();
/// let greeks = AnalyticPricer.greeks(&spec).unwrap();
///
/// assert!((price - 7.168).abs() < 1e-3);
/// assert!((greeks.delta - 0.4129).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticPricer;

impl AnalyticPricer {
    /// Analytic sensitivities for `spec`.
    pub fn greeks(&self, spec: &OptionSpec) -> Result<Greeks<f64>, PricingError> {
        let model = BlackScholes::from_spec(spec)?;
        Ok(model.greeks(spec.strike(), spec.time_to_expiry(), spec.kind()))
    }

    /// `(d1, d2)` for `spec`.
    pub fn d1_d2(&self, spec: &OptionSpec) -> Result<(f64, f64), PricingError> {
        let model = BlackScholes::from_spec(spec)?;
        Ok((
            model.d1(spec.strike(), spec.time_to_expiry()),
            model.d2(spec.strike(), spec.time_to_expiry()),
        ))
    }
}

impl OptionPricer for AnalyticPricer {
    fn price(&self, spec: &OptionSpec) -> Result<f64, PricingError> {
        let model = BlackScholes::from_spec(spec)?;
        Ok(model.price(spec.strike(), spec.time_to_expiry(), spec.kind()))
    }

    fn name(&self) -> &'static str {
        "black-scholes"
    }
}
