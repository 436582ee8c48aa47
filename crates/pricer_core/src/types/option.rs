//! Option contract value types.
//!
//! - [`OptionType`]: closed call / put variant
//! - [`ExerciseStyle`]: European or American exercise
//! - [`OptionSpec`]: validated market inputs for a single vanilla option

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Option payoff direction.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
/// assert_eq!("PUT".parse::<OptionType>().unwrap(), OptionType::Put);
/// assert!("straddle".parse::<OptionType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at the given spot.
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(PricingError::InvalidOptionKind(s.to_string())),
        }
    }
}

/// Option exercise style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    European,
    /// Exercise at any time up to expiry.
    #[default]
    American,
}

impl ExerciseStyle {
    /// Returns whether early exercise is allowed.
    #[inline]
    pub fn allows_early_exercise(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

/// Market inputs for a single vanilla option.
///
/// Immutable once constructed. `time_to_expiry == 0` is the expiry boundary
/// where the price collapses to intrinsic value; `volatility == 0` is the
/// deterministic boundary where the forward payoff is discounted at the
/// risk-free rate. Both are valid inputs, not errors.
///
/// # Examples
/// ```
/// use pricer_core::types::{OptionSpec, OptionType};
///
/// let spec = OptionSpec::new(100.0, 105.0, 0.5, 0.05, 0.2, OptionType::Call).unwrap();
/// assert_eq!(spec.strike(), 105.0);
///
/// // Non-positive spot is rejected
/// assert!(OptionSpec::new(0.0, 105.0, 0.5, 0.05, 0.2, OptionType::Call).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionSpecFields")]
pub struct OptionSpec {
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    volatility: f64,
    kind: OptionType,
}

#[derive(Deserialize)]
struct OptionSpecFields {
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    volatility: f64,
    kind: OptionType,
}

impl TryFrom<OptionSpecFields> for OptionSpec {
    type Error = PricingError;

    fn try_from(f: OptionSpecFields) -> Result<Self, Self::Error> {
        OptionSpec::new(f.spot, f.strike, f.time_to_expiry, f.rate, f.volatility, f.kind)
    }
}

impl OptionSpec {
    /// Creates a validated option specification.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` if any input is non-finite, spot or strike
    /// is not positive, or time to expiry is negative.
    /// `PricingError::DomainError` if volatility is negative.
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        volatility: f64,
        kind: OptionType,
    ) -> Result<Self, PricingError> {
        let named = [
            ("spot", spot),
            ("strike", strike),
            ("time to expiry", time_to_expiry),
            ("rate", rate),
            ("volatility", volatility),
        ];
        if let Some((name, value)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot must be positive, got {}",
                spot
            )));
        }
        if strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "strike must be positive, got {}",
                strike
            )));
        }
        if time_to_expiry < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "time to expiry must be non-negative, got {}",
                time_to_expiry
            )));
        }
        if volatility < 0.0 {
            return Err(PricingError::DomainError(format!(
                "volatility must be non-negative, got {}",
                volatility
            )));
        }

        Ok(Self {
            spot,
            strike,
            time_to_expiry,
            rate,
            volatility,
            kind,
        })
    }

    /// Spot price of the underlying (S).
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike price (K).
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry in years (T).
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Continuously compounded risk-free rate (r).
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility (σ).
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Call or put.
    #[inline]
    pub fn kind(&self) -> OptionType {
        self.kind
    }

    /// Intrinsic value at the current spot.
    #[inline]
    pub fn intrinsic(&self) -> f64 {
        self.kind.intrinsic(self.spot, self.strike)
    }

    /// Returns whether the option is at its expiry boundary.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.time_to_expiry <= 0.0
    }

    /// Copy with a different spot.
    pub fn with_spot(&self, spot: f64) -> Result<Self, PricingError> {
        Self::new(
            spot,
            self.strike,
            self.time_to_expiry,
            self.rate,
            self.volatility,
            self.kind,
        )
    }

    /// Copy with a different time to expiry.
    pub fn with_time_to_expiry(&self, time_to_expiry: f64) -> Result<Self, PricingError> {
        Self::new(
            self.spot,
            self.strike,
            time_to_expiry,
            self.rate,
            self.volatility,
            self.kind,
        )
    }

    /// Copy with a different volatility.
    pub fn with_volatility(&self, volatility: f64) -> Result<Self, PricingError> {
        Self::new(
            self.spot,
            self.strike,
            self.time_to_expiry,
            self.rate,
            volatility,
            self.kind,
        )
    }

    /// Copy with the other payoff direction.
    pub fn with_kind(&self, kind: OptionType) -> Self {
        Self { kind, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_sign_and_intrinsic() {
        assert_eq!(OptionType::Call.sign(), 1.0);
        assert_eq!(OptionType::Put.sign(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!(OptionType::from_str("call").unwrap(), OptionType::Call);
        assert_eq!(OptionType::from_str(" Call ").unwrap(), OptionType::Call);
        assert_eq!(OptionType::from_str("PUT").unwrap(), OptionType::Put);
        assert_eq!(OptionType::from_str("p").unwrap(), OptionType::Put);

        match OptionType::from_str("butterfly") {
            Err(PricingError::InvalidOptionKind(kind)) => assert_eq!(kind, "butterfly"),
            other => panic!("Expected InvalidOptionKind, got {:?}", other),
        }
    }

    #[test]
    fn test_option_type_display_round_trip() {
        for kind in [OptionType::Call, OptionType::Put] {
            assert_eq!(kind.to_string().parse::<OptionType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_exercise_style_default_is_american() {
        assert_eq!(ExerciseStyle::default(), ExerciseStyle::American);
        assert!(ExerciseStyle::American.allows_early_exercise());
        assert!(!ExerciseStyle::European.allows_early_exercise());
    }

    #[test]
    fn test_spec_accessors() {
        let spec = OptionSpec::new(150.0, 160.0, 0.5, 0.02, 0.25, OptionType::Call).unwrap();
        assert_eq!(spec.spot(), 150.0);
        assert_eq!(spec.strike(), 160.0);
        assert_eq!(spec.time_to_expiry(), 0.5);
        assert_eq!(spec.rate(), 0.02);
        assert_eq!(spec.volatility(), 0.25);
        assert_eq!(spec.kind(), OptionType::Call);
        assert_eq!(spec.intrinsic(), 0.0);
        assert!(!spec.is_expired());
    }

    #[test]
    fn test_spec_boundaries_are_valid() {
        let expired = OptionSpec::new(170.0, 160.0, 0.0, 0.02, 0.25, OptionType::Call).unwrap();
        assert!(expired.is_expired());
        assert_eq!(expired.intrinsic(), 10.0);

        assert!(OptionSpec::new(100.0, 100.0, 1.0, 0.05, 0.0, OptionType::Put).is_ok());
        // Negative rates are allowed
        assert!(OptionSpec::new(100.0, 100.0, 1.0, -0.01, 0.2, OptionType::Put).is_ok());
    }

    #[test]
    fn test_spec_rejects_invalid_inputs() {
        let call = OptionType::Call;
        assert!(matches!(
            OptionSpec::new(-1.0, 100.0, 1.0, 0.05, 0.2, call),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::new(100.0, 0.0, 1.0, 0.05, 0.2, call),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::new(100.0, 100.0, -0.1, 0.05, 0.2, call),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::new(100.0, 100.0, 1.0, 0.05, -0.2, call),
            Err(PricingError::DomainError(_))
        ));
        assert!(matches!(
            OptionSpec::new(f64::NAN, 100.0, 1.0, 0.05, 0.2, call),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            OptionSpec::new(100.0, 100.0, 1.0, f64::INFINITY, 0.2, call),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_spec_copy_builders() {
        let spec = OptionSpec::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call).unwrap();

        let bumped = spec.with_volatility(0.3).unwrap();
        assert_eq!(bumped.volatility(), 0.3);
        assert_eq!(spec.volatility(), 0.2);

        assert_eq!(spec.with_spot(120.0).unwrap().spot(), 120.0);
        assert_eq!(spec.with_time_to_expiry(0.0).unwrap().time_to_expiry(), 0.0);
        assert_eq!(spec.with_kind(OptionType::Put).kind(), OptionType::Put);
        assert!(spec.with_volatility(-0.1).is_err());
    }

    #[test]
    fn test_spec_serde_validates() {
        let json = r#"{"spot":100.0,"strike":95.0,"time_to_expiry":0.25,"rate":0.05,"volatility":0.3,"kind":"put"}"#;
        let spec: OptionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind(), OptionType::Put);
        assert_eq!(spec.strike(), 95.0);

        let bad = r#"{"spot":-100.0,"strike":95.0,"time_to_expiry":0.25,"rate":0.05,"volatility":0.3,"kind":"put"}"#;
        assert!(serde_json::from_str::<OptionSpec>(bad).is_err());

        let round_trip: OptionSpec =
            serde_json::from_str(&serde_json::to_string(&spec).unwrap()).unwrap();
        assert_eq!(round_trip, spec);
    }
}
