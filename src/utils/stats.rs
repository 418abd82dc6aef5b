//! Sample statistics used by the seasonality test, the estimators and the
//! interval calculations.

use statrs::distribution::{ContinuousCDF, Normal};

/// Standard normal quantile `Φ⁻¹(p)`; infinite at `p = 0` and `p = 1`.
///
/// ```
/// use theta_forecast::utils::quantile_normal;
///
/// // two-sided 10% critical value
/// assert!((quantile_normal(0.95) - 1.645).abs() < 1e-3);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with `n - 1` denominator; NaN below two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Sample autocorrelations for lags `0..=max_lag`.
///
/// Uses the biased estimator (denominator `n` for every lag). A series with
/// zero variance has no autocorrelation signal: every lag above zero is 0.
pub fn acf(values: &[f64], max_lag: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return vec![];
    }
    let m = mean(values);
    let denominator: f64 = values.iter().map(|x| (x - m).powi(2)).sum();

    (0..=max_lag)
        .map(|lag| {
            if lag == 0 {
                return 1.0;
            }
            if lag >= n || denominator < 1e-12 {
                return 0.0;
            }
            let numerator: f64 = (lag..n)
                .map(|i| (values[i] - m) * (values[i - lag] - m))
                .sum();
            numerator / denominator
        })
        .collect()
}

/// Autocorrelation at a single lag; NaN when the lag is not below `n`.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return f64::NAN;
    }
    acf(values, lag)[lag]
}

/// First difference of a series.
pub fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_normal_known_values() {
        assert_relative_eq!(quantile_normal(0.5), 0.0, epsilon = 1e-8);
        assert_relative_eq!(quantile_normal(0.975), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(quantile_normal(0.025), -1.959964, epsilon = 1e-5);
        assert_relative_eq!(quantile_normal(0.95), 1.644854, epsilon = 1e-5);
    }

    #[test]
    fn quantile_normal_boundary_values() {
        assert_eq!(quantile_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn mean_and_variance() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn autocorrelation_lag_0_is_1() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(autocorrelation(&values, 0), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn acf_of_constant_series_is_zero() {
        let values = vec![100.0; 24];
        let r = acf(&values, 12);
        assert_eq!(r.len(), 13);
        assert!(r[1..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn acf_detects_periodic_pattern() {
        let values: Vec<f64> = (0..48)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
            .collect();
        let r = acf(&values, 12);
        assert!(r[12] > 0.7);
        assert!(r[6] < -0.7);
    }

    #[test]
    fn difference_shortens_by_one() {
        assert_eq!(difference(&[1.0, 3.0, 6.0]), vec![2.0, 3.0]);
        assert!(difference(&[1.0]).is_empty());
    }
}
