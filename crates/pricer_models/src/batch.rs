//! Rayon-based batch pricing.
//!
//! Each option is independent, so a batch is a parallel map. Results come
//! back in input order; one failing option does not affect the others.

use pricer_core::types::{OptionSpec, PricingError};
use rayon::prelude::*;
use tracing::debug;

use crate::lattice::LatticeConfig;
use crate::model::PricingModel;

/// Prices every spec in parallel, one result per input in the same order.
///
/// # Examples
/// ```
/// use pricer_core::types::{OptionSpec, OptionType};
/// use pricer_models::batch::price_batch;
/// use pricer_models::lattice::LatticeConfig;
/// use pricer_models::model::PricingModel;
///
/// let specs: Vec<OptionSpec> = [90.0, 100.0, 110.0]
///     .iter()
///     .map(|&k| OptionSpec::new(100.0, k, 1.0, 0.05, 0.2, OptionType::Call).unwrap())
///     .collect();
///
/// let prices = price_batch(PricingModel::EuropeanAnalytic, &specs, &LatticeConfig::default());
/// assert_eq!(prices.len(), 3);
/// assert!(prices[0].as_ref().unwrap() > prices[2].as_ref().unwrap());
/// ```
pub fn price_batch(
    model: PricingModel,
    specs: &[OptionSpec],
    lattice: &LatticeConfig,
) -> Vec<Result<f64, PricingError>> {
    debug!(model = %model, count = specs.len(), "pricing batch");
    specs
        .par_iter()
        .map(|spec| model.price(spec, lattice))
        .collect()
}

/// Prices every spec in parallel, failing on the first error in input order.
///
/// # Errors
/// The error of the earliest failing spec.
pub fn try_price_batch(
    model: PricingModel,
    specs: &[OptionSpec],
    lattice: &LatticeConfig,
) -> Result<Vec<f64>, PricingError> {
    price_batch(model, specs, lattice).into_iter().collect()
}
