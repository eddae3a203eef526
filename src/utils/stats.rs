//! Statistical utility functions.

use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::erf::erfc;

/// Standard normal cumulative distribution function.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal quantile for a probability strictly inside (0, 1).
///
/// # Example
/// ```
/// use stock_forecast::utils::normal_quantile;
///
/// // 95% two-sided level -> z ≈ 1.96
/// let z = normal_quantile(0.975).unwrap();
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "probability must lie in (0, 1), got {p}"
        )));
    }
    let standard =
        Normal::new(0.0, 1.0).map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    Ok(standard.inverse_cdf(p))
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Evaluate `c[0] + c[1] x + c[2] x^2 + ...`.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_cdf_known_values() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(1.959964), 0.975, epsilon = 1e-6);
        assert_relative_eq!(normal_cdf(-1.644854), 0.05, epsilon = 1e-6);
        assert!(normal_cdf(-40.0) >= 0.0);
        assert!(normal_cdf(40.0) <= 1.0);
    }

    #[test]
    fn normal_quantile_known_values() {
        assert_relative_eq!(normal_quantile(0.5).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(normal_quantile(0.975).unwrap(), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(normal_quantile(0.025).unwrap(), -1.959964, epsilon = 1e-5);
    }

    #[test]
    fn normal_quantile_rejects_boundaries() {
        assert!(normal_quantile(0.0).is_err());
        assert!(normal_quantile(1.0).is_err());
        assert!(normal_quantile(f64::NAN).is_err());
    }

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn polyval_matches_expansion() {
        // 1 + 2x + 3x^2 at x = 2
        assert_relative_eq!(polyval(&[1.0, 2.0, 3.0], 2.0), 17.0, epsilon = 1e-12);
        assert_eq!(polyval(&[], 3.0), 0.0);
    }
}
