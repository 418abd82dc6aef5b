//! Classical moving-average decomposition used to remove and restore a
//! fixed-period seasonal pattern.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the seasonal pattern combines with the rest of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionMethod {
    /// `y = adjusted * factor`
    ///
    /// Seasonal swings scale with the level. Requires strictly positive data.
    #[default]
    Multiplicative,
    /// `y = adjusted + offset`
    Additive,
}

impl DecompositionMethod {
    /// Choose multiplicative for strictly positive data, additive otherwise.
    pub fn auto(values: &[f64]) -> Self {
        if !values.is_empty() && values.iter().all(|&v| v > 0.0) {
            DecompositionMethod::Multiplicative
        } else {
            DecompositionMethod::Additive
        }
    }

    /// Factor that leaves a value unchanged.
    pub fn identity(&self) -> f64 {
        match self {
            DecompositionMethod::Multiplicative => 1.0,
            DecompositionMethod::Additive => 0.0,
        }
    }

    /// Re-apply a seasonal factor.
    pub fn apply(&self, value: f64, factor: f64) -> f64 {
        match self {
            DecompositionMethod::Multiplicative => value * factor,
            DecompositionMethod::Additive => value + factor,
        }
    }

    /// Remove a seasonal factor.
    pub fn remove(&self, value: f64, factor: f64) -> f64 {
        match self {
            DecompositionMethod::Multiplicative => value / factor,
            DecompositionMethod::Additive => value - factor,
        }
    }
}

impl fmt::Display for DecompositionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionMethod::Multiplicative => write!(f, "multiplicative"),
            DecompositionMethod::Additive => write!(f, "additive"),
        }
    }
}

impl FromStr for DecompositionMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiplicative" | "mul" => Ok(DecompositionMethod::Multiplicative),
            "additive" | "add" => Ok(DecompositionMethod::Additive),
            other => Err(ForecastError::Configuration(format!(
                "unknown decomposition method '{}', expected 'multiplicative' or 'additive'",
                other
            ))),
        }
    }
}

/// One seasonal factor per position within the period.
///
/// Position 0 corresponds to the first observation of the fitted sample.
/// Multiplicative factors average to 1 and are strictly positive; additive
/// offsets average to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeasonalFactors")]
pub struct SeasonalFactors {
    method: DecompositionMethod,
    factors: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`SeasonalFactors::new`].
#[derive(Deserialize)]
struct RawSeasonalFactors {
    method: DecompositionMethod,
    factors: Vec<f64>,
}

impl TryFrom<RawSeasonalFactors> for SeasonalFactors {
    type Error = ForecastError;

    fn try_from(raw: RawSeasonalFactors) -> Result<Self> {
        SeasonalFactors::new(raw.method, raw.factors)
    }
}

impl SeasonalFactors {
    /// Wrap precomputed factors, checking the invariants of `method`.
    pub fn new(method: DecompositionMethod, factors: Vec<f64>) -> Result<Self> {
        if factors.is_empty() {
            return Err(ForecastError::Configuration(
                "seasonal factors must not be empty".to_string(),
            ));
        }
        if factors.iter().any(|f| !f.is_finite()) {
            return Err(ForecastError::Configuration(
                "seasonal factors must be finite".to_string(),
            ));
        }
        if method == DecompositionMethod::Multiplicative && factors.iter().any(|&f| f <= 0.0) {
            return Err(ForecastError::Configuration(
                "multiplicative seasonal factors must be strictly positive".to_string(),
            ));
        }
        Ok(Self { method, factors })
    }

    pub fn method(&self) -> DecompositionMethod {
        self.method
    }

    pub fn period(&self) -> usize {
        self.factors.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.factors
    }

    /// Factor for an absolute 0-based position.
    pub fn at(&self, position: usize) -> f64 {
        self.factors[position % self.factors.len()]
    }

    /// Remove the pattern from a sample starting at phase `start_phase`.
    pub fn deseasonalize(&self, values: &[f64], start_phase: usize) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.method.remove(v, self.at(start_phase + i)))
            .collect()
    }

    /// Apply the pattern to values starting at phase `start_phase`.
    pub fn reseasonalize(&self, values: &[f64], start_phase: usize) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.method.apply(v, self.at(start_phase + i)))
            .collect()
    }
}

/// Seasonally adjusted series together with the factors removed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub adjusted: Vec<f64>,
    pub factors: SeasonalFactors,
}

/// Estimate seasonal factors and return the adjusted series.
///
/// Factors come from a centered moving average of length `period` (a
/// `2 x period` average for even periods). The detrended ratios (or
/// differences) are averaged by position and normalized.
///
/// # Errors
/// A configuration error when `period < 2`, when fewer than `2 * period`
/// observations are supplied, or when multiplicative mode meets a
/// non-positive observation or produces a non-positive factor.
pub fn decompose(values: &[f64], period: usize, method: DecompositionMethod) -> Result<Decomposition> {
    let factors = seasonal_factors(values, period, method)?;
    let adjusted = factors.deseasonalize(values, 0);
    Ok(Decomposition { adjusted, factors })
}

/// Remove `factors` from `values`, starting at phase 0.
pub fn deseasonalize(values: &[f64], factors: &SeasonalFactors) -> Vec<f64> {
    factors.deseasonalize(values, 0)
}

/// Re-apply `factors` to `values` starting at `start_phase`.
///
/// For forecasts following a sample of `n` observations, `start_phase` is
/// `n`; the factor index cycles modulo the period.
pub fn reseasonalize(values: &[f64], factors: &SeasonalFactors, start_phase: usize) -> Vec<f64> {
    factors.reseasonalize(values, start_phase)
}

/// Estimate normalized seasonal factors.
pub fn seasonal_factors(
    values: &[f64],
    period: usize,
    method: DecompositionMethod,
) -> Result<SeasonalFactors> {
    if period < 2 {
        return Err(ForecastError::Configuration(format!(
            "seasonal period must be at least 2, got {}",
            period
        )));
    }
    let n = values.len();
    if n < 2 * period {
        return Err(ForecastError::insufficient_data(2 * period, n));
    }
    if method == DecompositionMethod::Multiplicative && values.iter().any(|&v| v <= 0.0) {
        return Err(ForecastError::Configuration(
            "multiplicative decomposition requires strictly positive data".to_string(),
        ));
    }

    let trend = centered_moving_average(values, period);

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, (&y, t)) in values.iter().zip(&trend).enumerate() {
        if let Some(t) = t {
            sums[i % period] += method.remove(y, *t);
            counts[i % period] += 1;
        }
    }

    let mut factors: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { method.identity() })
        .collect();

    let avg = factors.iter().sum::<f64>() / period as f64;
    match method {
        DecompositionMethod::Multiplicative => {
            if avg <= 0.0 {
                return Err(ForecastError::Configuration(
                    "multiplicative seasonal factors must be strictly positive".to_string(),
                ));
            }
            factors.iter_mut().for_each(|f| *f /= avg);
        }
        DecompositionMethod::Additive => factors.iter_mut().for_each(|f| *f -= avg),
    }

    SeasonalFactors::new(method, factors)
}

/// Centered moving average; `None` where the window does not fit.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let mut trend = vec![None; n];
    if n <= 2 * half {
        return trend;
    }

    for i in half..(n - half) {
        let avg = if period % 2 == 0 {
            // 2 x m average: half weight on both ends
            let inner: f64 = values[(i - half + 1)..(i + half)].iter().sum();
            (inner + 0.5 * values[i - half] + 0.5 * values[i + half]) / period as f64
        } else {
            values[(i - half)..=(i + half)].iter().sum::<f64>() / period as f64
        };
        trend[i] = Some(avg);
    }
    trend
}
