//! Exact maximum likelihood for the IMA(1,1) model with drift,
//!
//! `y_t = y_{t-1} + c + ε_t + γ ε_{t-1}`,
//!
//! the state-space equivalent of simple exponential smoothing with
//! `α = 1 + γ`. The likelihood of the differenced series is evaluated
//! exactly with the innovations algorithm; the innovation variance is
//! concentrated out.

use crate::error::{ForecastError, Result};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{acf, difference, mean};
use std::f64::consts::PI;
use tracing::debug;

/// Invertibility bound on the MA coefficient.
pub const MAX_ABS_GAMMA: f64 = 0.9999;

/// Configuration for [`fit_ima`].
#[derive(Debug, Clone)]
pub struct ImaConfig {
    pub optimizer: NelderMeadConfig,
}

impl Default for ImaConfig {
    fn default() -> Self {
        Self {
            optimizer: NelderMeadConfig::default()
                .with_max_iter(2000)
                .with_tolerance(1e-10),
        }
    }
}

impl ImaConfig {
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.optimizer = self.optimizer.with_max_iter(max_iter);
        self
    }
}

/// Estimated IMA(1,1) parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ImaFit {
    /// Drift `c` of the differenced series.
    pub drift: f64,
    /// MA(1) coefficient `γ`.
    pub gamma: f64,
    /// Innovation variance `σ²`.
    pub sigma2: f64,
    /// Maximized Gaussian log-likelihood of the differences.
    pub loglik: f64,
    /// Optimizer iterations (0 when no search was needed).
    pub iterations: usize,
}

/// Map `γ` to the equivalent SES alpha, clamped into `[1 - cap, cap]`.
///
/// Returns the alpha and whether clamping occurred.
pub fn ses_equivalent_alpha(gamma: f64, cap: f64) -> (f64, bool) {
    let raw = gamma + 1.0;
    let low = 1.0 - cap;
    if raw > cap {
        (cap, true)
    } else if raw < low {
        (low, true)
    } else {
        (raw, false)
    }
}

/// Fit drift, `γ` and `σ²` by exact maximum likelihood.
///
/// # Errors
/// Configuration error for fewer than three observations; estimation error
/// carrying `[drift, γ]` when the optimizer does not converge.
pub fn fit_ima(values: &[f64], config: &ImaConfig) -> Result<ImaFit> {
    let diffs = differences(values)?;
    let nobs = diffs.len() as f64;

    // A constant difference leaves nothing to estimate.
    let center = mean(&diffs);
    if diffs.iter().all(|d| (d - center).abs() < 1e-12) {
        debug!(drift = center, "differenced series is constant, skipping likelihood search");
        return Ok(ImaFit {
            drift: center,
            gamma: 0.0,
            sigma2: 0.0,
            loglik: f64::INFINITY,
            iterations: 0,
        });
    }

    let gamma0 = moment_gamma(&diffs);
    let drift0 = profile_drift(&diffs, gamma0);
    let bounds = [
        (f64::NEG_INFINITY, f64::INFINITY),
        (-MAX_ABS_GAMMA, MAX_ABS_GAMMA),
    ];

    let result = nelder_mead(
        |p| concentrated_objective(&diffs, p[0], p[1]),
        &[drift0, gamma0],
        Some(&bounds),
        config.optimizer.clone(),
    );

    if !result.converged {
        return Err(ForecastError::Estimation {
            message: format!(
                "IMA likelihood did not converge in {} iterations",
                result.iterations
            ),
            last_iterate: result.optimal_point,
        });
    }

    let (drift, gamma) = (result.optimal_point[0], result.optimal_point[1]);
    let (sigma2, sum_log_r) = innovation_variance(&diffs, drift, gamma);
    debug!(drift, gamma, sigma2, iterations = result.iterations, "fitted IMA(1,1)");

    Ok(ImaFit {
        drift,
        gamma,
        sigma2,
        loglik: loglik(nobs, sigma2, sum_log_r),
        iterations: result.iterations,
    })
}

/// Re-estimate drift and `σ²` with `γ` held fixed.
pub fn fit_ima_constrained(values: &[f64], gamma: f64) -> Result<ImaFit> {
    let diffs = differences(values)?;
    let drift = profile_drift(&diffs, gamma);
    let (sigma2, sum_log_r) = innovation_variance(&diffs, drift, gamma);
    Ok(ImaFit {
        drift,
        gamma,
        sigma2,
        loglik: loglik(diffs.len() as f64, sigma2, sum_log_r),
        iterations: 0,
    })
}

fn differences(values: &[f64]) -> Result<Vec<f64>> {
    if values.len() < 3 {
        return Err(ForecastError::insufficient_data(3, values.len()));
    }
    Ok(difference(values))
}

/// Innovations `e_t` and their relative variances `r_t` for an MA(1)
/// process with unit innovation variance.
fn innovations(z: &[f64], gamma: f64) -> (Vec<f64>, Vec<f64>) {
    let g2 = 1.0 + gamma * gamma;
    let mut e = Vec::with_capacity(z.len());
    let mut r = Vec::with_capacity(z.len());
    for (t, &zt) in z.iter().enumerate() {
        if t == 0 {
            r.push(g2);
            e.push(zt);
        } else {
            let theta = gamma / r[t - 1];
            r.push(g2 - theta * gamma);
            e.push(zt - theta * e[t - 1]);
        }
    }
    (e, r)
}

/// `(σ̂², Σ ln r_t)` for the given parameters.
fn innovation_variance(diffs: &[f64], drift: f64, gamma: f64) -> (f64, f64) {
    let z: Vec<f64> = diffs.iter().map(|d| d - drift).collect();
    let (e, r) = innovations(&z, gamma);
    let weighted: f64 = e.iter().zip(&r).map(|(e, r)| e * e / r).sum();
    let sum_log_r: f64 = r.iter().map(|r| r.ln()).sum();
    (weighted / diffs.len() as f64, sum_log_r)
}

/// `N ln σ̂² + Σ ln r_t`, minus twice the concentrated log-likelihood up to
/// a constant.
fn concentrated_objective(diffs: &[f64], drift: f64, gamma: f64) -> f64 {
    let (sigma2, sum_log_r) = innovation_variance(diffs, drift, gamma);
    if !(sigma2 > 0.0) {
        return f64::INFINITY;
    }
    diffs.len() as f64 * sigma2.ln() + sum_log_r
}

fn loglik(nobs: f64, sigma2: f64, sum_log_r: f64) -> f64 {
    -0.5 * (nobs * ((2.0 * PI).ln() + 1.0) + nobs * sigma2.ln() + sum_log_r)
}

/// Generalized least squares drift for fixed `γ`.
///
/// Innovations are linear in the data, so the drift enters as
/// `e(d) - c · e(1)`.
fn profile_drift(diffs: &[f64], gamma: f64) -> f64 {
    let (e_data, r) = innovations(diffs, gamma);
    let ones = vec![1.0; diffs.len()];
    let (e_ones, _) = innovations(&ones, gamma);
    let num: f64 = e_data
        .iter()
        .zip(&e_ones)
        .zip(&r)
        .map(|((a, b), r)| a * b / r)
        .sum();
    let den: f64 = e_ones.iter().zip(&r).map(|(b, r)| b * b / r).sum();
    if den > 0.0 {
        num / den
    } else {
        mean(diffs)
    }
}

/// Method-of-moments start for `γ` from the lag-1 autocorrelation.
fn moment_gamma(diffs: &[f64]) -> f64 {
    let r1 = acf(diffs, 1).get(1).copied().unwrap_or(0.0);
    if r1.abs() < 1e-8 {
        0.0
    } else if r1.abs() < 0.5 {
        (1.0 - (1.0 - 4.0 * r1 * r1).sqrt()) / (2.0 * r1)
    } else {
        0.9 * r1.signum()
    }
}
