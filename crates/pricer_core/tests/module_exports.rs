//! Integration tests for module exports.
//!
//! Verify that all public modules and types are reachable via absolute paths.

use chrono::NaiveDate;

#[test]
fn test_types_module_exports() {
    use pricer_core::types::error::PricingError;
    use pricer_core::types::option::{ExerciseStyle, OptionSpec, OptionType};
    use pricer_core::types::time::{days_between, days_to_years, DAYS_PER_YEAR};

    let spec = OptionSpec::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call).unwrap();
    assert_eq!(spec.kind(), OptionType::Call);
    assert_eq!(ExerciseStyle::default(), ExerciseStyle::American);

    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let expiry = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    assert_eq!(days_to_years(days_between(today, expiry) as f64), 1.0);
    assert_eq!(DAYS_PER_YEAR, 365.0);

    let err: PricingError = "straddle".parse::<OptionType>().unwrap_err();
    assert!(matches!(err, PricingError::InvalidOptionKind(_)));
}

#[test]
fn test_traits_module_exports() {
    use pricer_core::traits::{Float, OptionPricer};
    use pricer_core::types::{OptionSpec, PricingError};

    struct Intrinsic;

    impl OptionPricer for Intrinsic {
        fn price(&self, spec: &OptionSpec) -> Result<f64, PricingError> {
            Ok(spec.intrinsic())
        }
    }

    fn generic_sqrt<T: Float>(x: T) -> T {
        x.sqrt()
    }
    assert_eq!(generic_sqrt(4.0_f64), 2.0);
    assert!(Intrinsic.name().contains("Intrinsic"));
}

#[test]
fn test_market_data_module_exports() {
    use pricer_core::market_data::error::MarketDataError;
    use pricer_core::market_data::quotes::{collect_vol_quotes, ExpiryChain, OptionQuoteRow};
    use pricer_core::market_data::surfaces::{
        SurfaceBuilder, SurfaceGridSpec, VolatilitySurface, DEFAULT_GRID_POINTS,
    };

    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let chains = vec![ExpiryChain {
        expiration: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        calls: vec![OptionQuoteRow::new(100.0, 0.2)],
        puts: vec![],
    }];
    let quotes = collect_vol_quotes(&chains, today, None);
    assert_eq!(quotes.len(), 1);

    let spec = SurfaceGridSpec::new((30.0, 90.0), (80.0, 120.0));
    assert_eq!(spec.day_points(), DEFAULT_GRID_POINTS);

    let surface = SurfaceBuilder::new(100.0, spec).unwrap().build(&quotes).unwrap();
    assert_eq!(surface.volatility(100.0, 60.0 / 365.0).unwrap(), 0.2);

    let err = SurfaceBuilder::new(100.0, spec).unwrap().build(&[]).unwrap_err();
    assert!(matches!(err, MarketDataError::InsufficientData { .. }));
}

#[test]
fn test_math_module_exports() {
    use pricer_core::math::{linspace, nearest_index};

    let axis = linspace(0.0, 10.0, 11);
    assert_eq!(nearest_index(&axis, 4.5), Some(4));
}
