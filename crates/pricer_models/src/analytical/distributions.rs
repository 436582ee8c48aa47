//! Standard normal distribution functions.
//!
//! - `norm_cdf`: Cumulative distribution function Φ
//! - `norm_pdf`: Probability density function φ
//!
//! Both are generic over `T: Float` so the pricing formulas can be evaluated
//! in `f32` as well as `f64`.

use num_traits::Float;

/// 1 / sqrt(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Abramowitz & Stegun 7.1.26 polynomial coefficients, lowest order first.
const ERFC_COEFFS: [f64; 5] = [
    0.254_829_592,
    -0.284_496_736,
    1.421_413_741,
    -1.453_152_027,
    1.061_405_429,
];

/// A&S 7.1.26 rational argument scale.
const ERFC_P: f64 = 0.327_591_1;

/// Converts an `f64` constant into `T`.
///
/// Every constant used here is representable in any IEEE float, so the NaN
/// branch is unreachable for `f32`/`f64`.
#[inline]
pub(crate) fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Complementary error function, A&S 7.1.26 (max abs error 1.5e-7).
///
/// Evaluated on |x| and reflected with erfc(-x) = 2 - erfc(x), which keeps
/// Φ(x) + Φ(-x) = 1 exact up to rounding.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let abs_x = x.abs();
    let t = T::one() / (T::one() + lit::<T>(ERFC_P) * abs_x);

    let poly = ERFC_COEFFS
        .iter()
        .rev()
        .fold(T::zero(), |acc, &a| lit::<T>(a) + t * acc);
    let tail = t * poly * (-abs_x * abs_x).exp();

    if x < T::zero() {
        lit::<T>(2.0) - tail
    } else {
        tail
    }
}

/// Standard normal cumulative distribution function.
///
/// Φ(x) = ½·erfc(−x/√2), accurate to about 1e-7.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    lit::<T>(0.5) * erfc_approx(-x / lit::<T>(std::f64::consts::SQRT_2))
}

/// Standard normal probability density function.
///
/// φ(x) = exp(−x²/2) / √(2π).
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0_f64) - 0.3989422804).abs() < 1e-7);
/// assert!((norm_pdf(1.0_f64) - 0.2419707245).abs() < 1e-7);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    lit::<T>(FRAC_1_SQRT_2PI) * (lit::<T>(-0.5) * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // norm_cdf
    // ==========================================================

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(1.0_f64), 0.8413447460685429, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(-1.0_f64), 0.15865525393145707, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(2.0_f64), 0.9772498680518208, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(-0.39690_f64), 0.34572, epsilon = 1e-4);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [-3.0, -1.5, -0.22, 0.0, 0.4, 1.0, 2.5, 6.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0_f64, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_norm_cdf_monotonic_and_bounded() {
        let values: Vec<f64> = (-100..=100).map(|i| i as f64 * 0.1).collect();
        for pair in values.windows(2) {
            let (a, b) = (norm_cdf(pair[0]), norm_cdf(pair[1]));
            assert!((0.0..=1.0).contains(&a));
            assert!(b >= a, "CDF not monotonic at x = {}", pair[0]);
        }
    }

    #[test]
    fn test_norm_cdf_tails() {
        assert!(norm_cdf(-10.0_f64) >= 0.0);
        assert!(norm_cdf(-10.0_f64) < 1e-7);
        assert!(norm_cdf(10.0_f64) <= 1.0);
    }

    #[test]
    fn test_norm_cdf_f32_compatibility() {
        assert!((norm_cdf(0.0_f32) - 0.5).abs() < 1e-5);
    }

    // ==========================================================
    // norm_pdf
    // ==========================================================

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-12);
        assert_relative_eq!(norm_pdf(2.0_f64), 0.05399096651318806, epsilon = 1e-10);
        assert_relative_eq!(norm_pdf(-2.0_f64), norm_pdf(2.0_f64), epsilon = 1e-15);
    }

    #[test]
    fn test_cdf_derivative_matches_pdf() {
        let h = 1e-4;
        for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let slope = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(slope, norm_pdf(x), epsilon = 1e-4);
        }
    }
}
