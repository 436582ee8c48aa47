//! Pricing trait shared by the analytic and lattice engines.

use crate::types::{OptionSpec, PricingError};

/// An engine that values a single vanilla option.
///
/// Implementations must be pure: the same [`OptionSpec`] always produces the
/// same price, and no state is carried between calls. That makes every
/// implementation safe to call from many threads at once.
///
/// # Static Dispatch
///
/// Model selection in `pricer_models` is an enum that forwards to concrete
/// implementations; prefer that over `Box<dyn OptionPricer>`.
///
/// ```
/// use pricer_core::traits::OptionPricer;
/// use pricer_core::types::{OptionSpec, OptionType, PricingError};
///
/// struct IntrinsicOnly;
///
/// impl OptionPricer for IntrinsicOnly {
///     fn price(&self, spec: &OptionSpec) -> Result<f64, PricingError> {
///         Ok(spec.intrinsic())
///     }
/// }
///
/// let spec = OptionSpec::new(110.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call).unwrap();
/// assert_eq!(IntrinsicOnly.price(&spec).unwrap(), 10.0);
/// ```
pub trait OptionPricer: Send + Sync {
    /// Fair value of the option described by `spec`.
    ///
    /// # Invariants
    /// - The returned price is non-negative
    /// - The method is deterministic and side-effect free
    fn price(&self, spec: &OptionSpec) -> Result<f64, PricingError>;

    /// Short model name for logs and reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionType;

    struct Discounted;

    impl OptionPricer for Discounted {
        fn price(&self, spec: &OptionSpec) -> Result<f64, PricingError> {
            let df = (-spec.rate() * spec.time_to_expiry()).exp();
            Ok(df * spec.intrinsic())
        }

        fn name(&self) -> &'static str {
            "Discounted"
        }
    }

    #[test]
    fn test_trait_dispatch() {
        let spec = OptionSpec::new(120.0, 100.0, 1.0, 0.0, 0.2, OptionType::Call).unwrap();
        assert_eq!(Discounted.price(&spec).unwrap(), 20.0);
        assert_eq!(Discounted.name(), "Discounted");
    }

    #[test]
    fn test_trait_is_object_safe() {
        let pricer: &dyn OptionPricer = &Discounted;
        let spec = OptionSpec::new(80.0, 100.0, 1.0, 0.0, 0.2, OptionType::Put).unwrap();
        assert_eq!(pricer.price(&spec).unwrap(), 20.0);
    }
}
