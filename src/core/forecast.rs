//! Forecast result structures.

use crate::error::{ForecastError, Result};
use crate::seasonality::DecompositionMethod;
use serde::{Deserialize, Serialize};

/// Point forecasts with optional prediction interval bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
    /// Coverage of the interval, e.g. 0.95.
    coverage: Option<f64>,
}

impl Forecast {
    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
            coverage: None,
        }
    }

    /// Create a forecast with interval bounds of the given coverage.
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        coverage: f64,
    ) -> Result<Self> {
        for bound in [&lower, &upper] {
            if bound.len() != values.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: values.len(),
                    got: bound.len(),
                });
            }
        }
        Ok(Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
            coverage: Some(coverage),
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    pub fn coverage(&self) -> Option<f64> {
        self.coverage
    }

    /// Consume the forecast, returning the point predictions.
    pub fn into_point(self) -> Vec<f64> {
        self.point
    }
}

/// Trend weight `1 - 1/theta` applied to the drift line.
///
/// `theta` must exceed 1; positive infinity gives weight 1.
pub fn theta_weight(theta: f64) -> Result<f64> {
    if theta.is_nan() || theta <= 1.0 {
        return Err(ForecastError::InvalidArgument(format!(
            "theta must be greater than 1, got {}",
            theta
        )));
    }
    if theta == f64::INFINITY {
        return Ok(1.0);
    }
    Ok(1.0 - 1.0 / theta)
}

/// Forecast pieces kept apart so the trend can be reweighted.
///
/// `trend` holds the unweighted drift contribution, i.e. the `theta = ∞`
/// trend. `level` is the flat smoothed level and `seasonal` the factor (or
/// offset) for each step. With no seasonal adjustment the seasonal entries
/// are the identity of `method`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastComponents {
    pub trend: Vec<f64>,
    pub level: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub method: DecompositionMethod,
}

impl ForecastComponents {
    pub fn horizon(&self) -> usize {
        self.level.len()
    }

    /// Recombine into point forecasts for a given theta.
    pub fn combine(&self, theta: f64) -> Result<Vec<f64>> {
        let weight = theta_weight(theta)?;
        Ok(self
            .trend
            .iter()
            .zip(&self.level)
            .zip(&self.seasonal)
            .map(|((t, l), s)| self.method.apply(weight * t + l, *s))
            .collect())
    }
}
