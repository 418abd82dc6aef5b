//! Point forecasts, components and prediction intervals.
//!
//! For step `h` the forecast of the adjusted series is
//!
//! `X̃_n + (1 - 1/θ) · b0 · (h - 1 + 1/α - (1-α)^n / α)`
//!
//! which is then reseasonalized at phase `(n + h - 1) mod m`.

use crate::core::{theta_weight, Forecast, ForecastComponents};
use crate::error::{ForecastError, Result};
use crate::models::theta::results::{ThetaResults, ThetaState};
use crate::utils::stats::quantile_normal;
use tracing::debug;

/// Theta used when none is given.
pub const DEFAULT_THETA: f64 = 2.0;

fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidArgument(
            "horizon must be positive".to_string(),
        ));
    }
    Ok(())
}

fn check_level(alpha_level: f64) -> Result<f64> {
    if !(alpha_level > 0.0 && alpha_level < 1.0) {
        return Err(ForecastError::InvalidArgument(format!(
            "interval significance must lie in (0, 1), got {}",
            alpha_level
        )));
    }
    Ok(quantile_normal(1.0 - alpha_level / 2.0))
}

impl ThetaState {
    /// Unweighted drift contribution `b0 · (h - 1 + 1/α - (1-α)^n / α)`.
    fn trend_path(&self, horizon: usize) -> Vec<f64> {
        let alpha = self.alpha;
        let tail = (1.0 - alpha).powf(self.n as f64);
        let base = 1.0 / alpha - tail / alpha;
        (0..horizon)
            .map(|k| self.b0 * (k as f64 + base))
            .collect()
    }

    fn seasonal_path(&self, horizon: usize) -> Vec<f64> {
        match &self.seasonal_factors {
            Some(factors) => (0..horizon).map(|k| factors.at(self.n + k)).collect(),
            None => vec![self.method.identity(); horizon],
        }
    }

    /// Trend, level and seasonal pieces of the forecast.
    ///
    /// The state is validated first, so a restored state with an invalid
    /// alpha or inconsistent factors is rejected instead of producing NaN.
    pub fn forecast_components(&self, horizon: usize) -> Result<ForecastComponents> {
        check_horizon(horizon)?;
        self.validate()?;
        Ok(ForecastComponents {
            trend: self.trend_path(horizon),
            level: vec![self.level; horizon],
            seasonal: self.seasonal_path(horizon),
            method: self.method,
        })
    }

    /// Point forecasts for `horizon` steps.
    ///
    /// `theta` must exceed 1; `f64::INFINITY` keeps the full drift.
    pub fn forecast(&self, horizon: usize, theta: f64) -> Result<Forecast> {
        check_horizon(horizon)?;
        theta_weight(theta)?;
        let point = self.forecast_components(horizon)?.combine(theta)?;
        debug!(horizon, theta, "theta forecast");
        Ok(Forecast::from_values(point))
    }

    /// Forecasts with normal prediction intervals at significance `alpha_level`.
    ///
    /// The step-`h` variance is `σ² · (1 + (h-1) · α²)`, the forecast
    /// variance of an IMA(1,1) process. The bounds are exact only under that
    /// process, i.e. for models fitted by maximum likelihood; for SES fits
    /// `σ²` is the mean squared one-step error and the bounds are an
    /// approximation.
    pub fn prediction_intervals(
        &self,
        horizon: usize,
        theta: f64,
        alpha_level: f64,
    ) -> Result<Forecast> {
        check_horizon(horizon)?;
        theta_weight(theta)?;
        let z = check_level(alpha_level)?;

        let point = self.forecast(horizon, theta)?.into_point();
        let a2 = self.alpha * self.alpha;
        let (lower, upper) = point
            .iter()
            .enumerate()
            .map(|(k, &p)| {
                let width = z * (self.sigma2 * (1.0 + k as f64 * a2)).sqrt();
                (p - width, p + width)
            })
            .unzip();

        Forecast::from_values_with_intervals(point, lower, upper, 1.0 - alpha_level)
    }

    /// Interval bounds per step at the default theta.
    pub fn predict_interval(&self, horizon: usize, alpha_level: f64) -> Result<(Vec<f64>, Vec<f64>)> {
        let forecast = self.prediction_intervals(horizon, DEFAULT_THETA, alpha_level)?;
        match (forecast.lower(), forecast.upper()) {
            (Some(lower), Some(upper)) => Ok((lower.to_vec(), upper.to_vec())),
            _ => Err(ForecastError::InvalidArgument(
                "interval bounds unavailable".to_string(),
            )),
        }
    }
}

impl ThetaResults {
    /// See [`ThetaState::forecast`].
    pub fn forecast(&self, horizon: usize, theta: f64) -> Result<Forecast> {
        self.state().forecast(horizon, theta)
    }

    /// See [`ThetaState::forecast_components`].
    pub fn forecast_components(&self, horizon: usize) -> Result<ForecastComponents> {
        self.state().forecast_components(horizon)
    }

    /// See [`ThetaState::prediction_intervals`].
    pub fn prediction_intervals(
        &self,
        horizon: usize,
        theta: f64,
        alpha_level: f64,
    ) -> Result<Forecast> {
        self.state().prediction_intervals(horizon, theta, alpha_level)
    }

    /// See [`ThetaState::predict_interval`].
    pub fn predict_interval(&self, horizon: usize, alpha_level: f64) -> Result<(Vec<f64>, Vec<f64>)> {
        self.state().predict_interval(horizon, alpha_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theta::LevelEstimator;
    use crate::seasonality::{DecompositionMethod, SeasonalFactors};
    use approx::assert_relative_eq;

    fn flat_state(alpha: f64, b0: f64) -> ThetaState {
        ThetaState {
            a0: 0.0,
            b0,
            alpha,
            sigma2: 4.0,
            level: 50.0,
            seasonal_factors: None,
            method: DecompositionMethod::Multiplicative,
            n: 30,
            period: 1,
            estimator: LevelEstimator::ClosedFormSes,
        }
    }

    #[test]
    fn alpha_one_gives_naive_plus_weighted_drift() {
        let state = flat_state(1.0, 2.0);
        let forecast = state.forecast(3, 2.0).unwrap();
        // weight 0.5, trend b0 * h
        assert_eq!(forecast.point(), &[51.0, 52.0, 53.0]);
    }

    #[test]
    fn infinite_theta_uses_full_drift() {
        let state = flat_state(0.5, 1.0);
        let forecast = state.forecast(2, f64::INFINITY).unwrap();
        let base = 2.0 - 0.5f64.powi(30) / 0.5;
        assert_relative_eq!(forecast.point()[0], 50.0 + base, epsilon = 1e-12);
        assert_relative_eq!(forecast.point()[1], 51.0 + base, epsilon = 1e-12);
    }

    #[test]
    fn large_theta_approaches_infinite_limit() {
        let state = flat_state(0.3, 0.7);
        let limit = state.forecast(5, f64::INFINITY).unwrap();
        let near = state.forecast(5, 1e12).unwrap();
        for (a, b) in limit.point().iter().zip(near.point()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn seasonal_phase_continues_after_sample() {
        let mut state = flat_state(1.0, 0.0);
        state.n = 5;
        state.period = 4;
        state.seasonal_factors = Some(
            SeasonalFactors::new(DecompositionMethod::Multiplicative, vec![0.5, 1.0, 1.5, 1.0])
                .unwrap(),
        );
        // First forecast step sits at position 5, phase 1.
        let forecast = state.forecast(4, 2.0).unwrap();
        assert_eq!(forecast.point(), &[50.0, 75.0, 50.0, 25.0]);
    }

    #[test]
    fn components_recombine_for_any_theta() {
        let state = flat_state(0.4, 1.5);
        let components = state.forecast_components(6).unwrap();
        for theta in [1.5, 2.0, 3.0, f64::INFINITY] {
            let direct = state.forecast(6, theta).unwrap();
            assert_eq!(components.combine(theta).unwrap(), direct.point());
        }
    }

    #[test]
    fn degenerate_arguments_are_rejected() {
        let state = flat_state(0.5, 1.0);
        assert!(state.forecast(0, 2.0).unwrap_err().is_invalid_argument());
        assert!(state.forecast(3, 1.0).unwrap_err().is_invalid_argument());
        assert!(state.forecast(3, f64::NAN).unwrap_err().is_invalid_argument());
        assert!(state
            .forecast_components(0)
            .unwrap_err()
            .is_invalid_argument());
        assert!(state
            .prediction_intervals(3, 2.0, 0.0)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn interval_width_grows_with_horizon() {
        let state = flat_state(0.5, 0.0);
        let forecast = state.prediction_intervals(4, 2.0, 0.05).unwrap();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        let z = quantile_normal(0.975);

        assert_relative_eq!(upper[0] - forecast.point()[0], z * 2.0, epsilon = 1e-12);
        // sigma_h^2 = 4 * (1 + 3 * 0.25)
        assert_relative_eq!(upper[3] - lower[3], 2.0 * z * 7.0f64.sqrt(), epsilon = 1e-12);
        for k in 1..4 {
            assert!(upper[k] - lower[k] > upper[k - 1] - lower[k - 1]);
        }
        assert_eq!(forecast.coverage(), Some(0.95));
    }

    #[test]
    fn predict_interval_uses_default_theta() {
        let state = flat_state(0.5, 1.0);
        let (lower, upper) = state.predict_interval(3, 0.1).unwrap();
        let point = state.forecast(3, DEFAULT_THETA).unwrap();
        for k in 0..3 {
            assert_relative_eq!((lower[k] + upper[k]) / 2.0, point.point()[k], epsilon = 1e-12);
        }
    }

    #[test]
    fn invalid_restored_state_is_rejected() {
        let mut zero_alpha = flat_state(0.0, 1.0);
        assert!(zero_alpha.forecast(2, 2.0).unwrap_err().is_configuration());
        zero_alpha.alpha = f64::NAN;
        assert!(zero_alpha.prediction_intervals(2, 2.0, 0.05).is_err());

        let mut mismatched = flat_state(0.5, 1.0);
        mismatched.seasonal_factors = Some(
            SeasonalFactors::new(DecompositionMethod::Multiplicative, vec![0.9, 1.1]).unwrap(),
        );
        // period stays 1
        assert!(mismatched.forecast_components(3).unwrap_err().is_configuration());
    }

    #[test]
    fn long_samples_keep_the_correction_term_finite() {
        let mut state = flat_state(0.5, 1.0);
        state.n = usize::MAX;
        let forecast = state.forecast(1, f64::INFINITY).unwrap();
        assert_relative_eq!(forecast.point()[0], 52.0, epsilon = 1e-12);
    }
}
