//! Autocorrelation test for the presence of seasonality at a known period.
//!
//! The sample autocorrelation at lag `m` is compared against zero with a
//! two-sided normal critical value. Under the null of no seasonality the
//! autocorrelation is approximately normal with the chosen standard error.

use crate::error::{ForecastError, Result};
use crate::utils::stats::{acf, difference, quantile_normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Standard error used for the lag-`m` autocorrelation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcfStandardError {
    /// Large-sample bound `1 / sqrt(n)`.
    #[default]
    Simple,
    /// Bartlett's formula `sqrt((1 + 2 * sum_{k<m} r_k^2) / n)`.
    Bartlett,
}

/// Configuration for the seasonality test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityTestConfig {
    /// Two-sided significance level.
    pub significance: f64,
    /// Standard error formula.
    pub standard_error: AcfStandardError,
    /// Test the first difference instead of the levels.
    pub difference: bool,
}

impl Default for SeasonalityTestConfig {
    fn default() -> Self {
        Self {
            significance: 0.10,
            standard_error: AcfStandardError::Simple,
            difference: false,
        }
    }
}

impl SeasonalityTestConfig {
    /// Set the two-sided significance level.
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    pub fn with_standard_error(mut self, standard_error: AcfStandardError) -> Self {
        self.standard_error = standard_error;
        self
    }

    /// Run the test on the first difference of the series.
    pub fn with_difference(mut self, difference: bool) -> Self {
        self.difference = difference;
        self
    }

    /// Critical value `z_{1 - significance/2}`.
    pub fn critical_value(&self) -> Result<f64> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(ForecastError::Configuration(format!(
                "significance must lie in (0, 1), got {}",
                self.significance
            )));
        }
        Ok(quantile_normal(1.0 - self.significance / 2.0))
    }
}

/// Outcome of [`test_seasonality`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityTestResult {
    pub period: usize,
    /// Sample autocorrelation at lag `period`.
    pub acf: f64,
    pub std_error: f64,
    pub critical_value: f64,
    pub seasonal: bool,
}

impl SeasonalityTestResult {
    /// Test statistic `acf / std_error`.
    pub fn statistic(&self) -> f64 {
        if self.std_error > 0.0 {
            self.acf / self.std_error
        } else {
            0.0
        }
    }
}

/// Test whether a seasonal pattern of length `period` is present.
///
/// Fails with a configuration error when `period < 2`, when the series has
/// fewer than `2 * period` observations, or when the significance level is
/// outside `(0, 1)`. A constant series has zero autocorrelation and is
/// reported as not seasonal.
///
/// # Example
/// ```
/// use theta_forecast::detection::{test_seasonality, SeasonalityTestConfig};
///
/// let values: Vec<f64> = (0..48)
///     .map(|i| 10.0 + (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
///     .collect();
/// let result = test_seasonality(&values, 12, &SeasonalityTestConfig::default()).unwrap();
/// assert!(result.seasonal);
/// ```
pub fn test_seasonality(
    values: &[f64],
    period: usize,
    config: &SeasonalityTestConfig,
) -> Result<SeasonalityTestResult> {
    if period < 2 {
        return Err(ForecastError::Configuration(format!(
            "seasonality test requires a period of at least 2, got {}",
            period
        )));
    }
    if values.len() < 2 * period {
        return Err(ForecastError::insufficient_data(2 * period, values.len()));
    }
    let critical_value = config.critical_value()?;

    let tested = if config.difference {
        difference(values)
    } else {
        values.to_vec()
    };
    let n = tested.len() as f64;
    let r = acf(&tested, period);
    let acf_m = r[period];

    let std_error = match config.standard_error {
        AcfStandardError::Simple => 1.0 / n.sqrt(),
        AcfStandardError::Bartlett => {
            let sum_sq: f64 = r[1..period].iter().map(|x| x * x).sum();
            ((1.0 + 2.0 * sum_sq) / n).sqrt()
        }
    };

    let seasonal = acf_m.abs() > critical_value * std_error;
    debug!(
        period,
        acf = acf_m,
        std_error,
        critical_value,
        seasonal,
        "seasonality test"
    );

    Ok(SeasonalityTestResult {
        period,
        acf: acf_m,
        std_error,
        critical_value,
        seasonal,
    })
}
