//! Simple exponential smoothing with the smoothing parameter chosen by a
//! bounded line search on the one-step squared error.
//!
//! The recursion is `level_t = α × y_t + (1-α) × level_{t-1}` with
//! `level_1 = y_1`, so `α = 1` reproduces the naive last-value forecast.

use crate::error::{ForecastError, Result};
use crate::utils::optimization::{bounded_scalar, BoundedScalarConfig};
use tracing::debug;

/// Lower end of the search interval for alpha.
pub const MIN_ALPHA: f64 = 1e-4;

/// A fitted simple exponential smoother.
#[derive(Debug, Clone, PartialEq)]
pub struct SesFit {
    /// Smoothing parameter in `(0, 1]`.
    pub alpha: f64,
    /// Smoothed level for every observation.
    pub levels: Vec<f64>,
    /// Sum of squared one-step errors.
    pub sse: f64,
    /// Mean squared one-step error.
    pub sigma2: f64,
    /// Line search iterations.
    pub iterations: usize,
}

impl SesFit {
    /// Final smoothed level.
    pub fn last_level(&self) -> f64 {
        self.levels.last().copied().unwrap_or(f64::NAN)
    }

    /// One-step-ahead predictions; the first is the first level.
    pub fn one_step_predictions(&self) -> Vec<f64> {
        one_step_predictions(&self.levels)
    }
}

/// Run the smoother with a fixed alpha.
pub fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut levels = Vec::with_capacity(values.len());
    let mut level = match values.first() {
        Some(&v) => v,
        None => return levels,
    };
    levels.push(level);
    for &y in &values[1..] {
        level = alpha * y + (1.0 - alpha) * level;
        levels.push(level);
    }
    levels
}

/// Sum of squared one-step errors `Σ (y_t - level_{t-1})²`.
pub fn one_step_sse(values: &[f64], alpha: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut level = values[0];
    let mut sse = 0.0;
    for &y in &values[1..] {
        let error = y - level;
        sse += error * error;
        level = alpha * y + (1.0 - alpha) * level;
    }
    sse
}

/// Shift levels one step to get in-sample predictions.
pub fn one_step_predictions(levels: &[f64]) -> Vec<f64> {
    match levels.first() {
        Some(&first) => std::iter::once(first)
            .chain(levels[..levels.len() - 1].iter().copied())
            .collect(),
        None => Vec::new(),
    }
}

/// Choose alpha on `[MIN_ALPHA, 1]` minimizing the one-step squared error.
///
/// The interior is searched with Brent's method and the endpoint `alpha = 1`
/// is checked separately, since the search never evaluates it.
///
/// # Errors
/// Configuration error for fewer than two observations; estimation error,
/// carrying the last iterate, when the search exhausts its budget.
pub fn fit_ses(values: &[f64], config: &BoundedScalarConfig) -> Result<SesFit> {
    let n = values.len();
    if n < 2 {
        return Err(ForecastError::insufficient_data(2, n));
    }

    let search = bounded_scalar(|a| one_step_sse(values, a), MIN_ALPHA, 1.0, config.clone());
    if !search.converged {
        return Err(ForecastError::Estimation {
            message: format!(
                "SES line search did not converge in {} iterations",
                search.iterations
            ),
            last_iterate: search.optimal_point,
        });
    }

    let mut alpha = search.optimal_point[0];
    let mut sse = search.optimal_value;
    let sse_naive = one_step_sse(values, 1.0);
    if sse_naive <= sse {
        alpha = 1.0;
        sse = sse_naive;
    }

    let levels = smooth(values, alpha);
    let sigma2 = sse / (n - 1) as f64;
    debug!(alpha, sse, iterations = search.iterations, "fitted SES");

    Ok(SesFit {
        alpha,
        levels,
        sse,
        sigma2,
        iterations: search.iterations,
    })
}
