//! Fitted Theta model: persisted state, in-sample diagnostics and summary.

use crate::detection::SeasonalityTestResult;
use crate::error::{ForecastError, Result};
use crate::models::arima::ImaFit;
use crate::models::theta::model::LevelEstimator;
use crate::seasonality::{DecompositionMethod, SeasonalFactors};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything needed to forecast, without access to the original series.
///
/// Serializable so a fitted model can be stored and restored. Forecasting
/// methods live on this type and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThetaState {
    /// OLS intercept of the adjusted series.
    pub a0: f64,
    /// OLS drift of the adjusted series.
    pub b0: f64,
    /// Smoothing parameter of the level.
    pub alpha: f64,
    /// One-step innovation variance.
    pub sigma2: f64,
    /// Final smoothed level.
    pub level: f64,
    /// Present when the series was deseasonalized.
    pub seasonal_factors: Option<SeasonalFactors>,
    pub method: DecompositionMethod,
    /// Number of fitted observations.
    pub n: usize,
    /// Seasonal period; 1 when no period applies.
    pub period: usize,
    pub estimator: LevelEstimator,
}

impl ThetaState {
    /// Check a restored state for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(ForecastError::Configuration(
                "state must describe at least one observation".to_string(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ForecastError::Configuration(format!(
                "alpha must lie in (0, 1], got {}",
                self.alpha
            )));
        }
        if ![self.a0, self.b0, self.level, self.sigma2]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ForecastError::Configuration(
                "state parameters must be finite".to_string(),
            ));
        }
        if self.sigma2 < 0.0 {
            return Err(ForecastError::Configuration(
                "innovation variance must be non-negative".to_string(),
            ));
        }
        if let Some(factors) = &self.seasonal_factors {
            // Re-run the constructor checks on deserialized factors.
            SeasonalFactors::new(factors.method(), factors.as_slice().to_vec())?;
            if factors.period() != self.period || factors.method() != self.method {
                return Err(ForecastError::Configuration(
                    "seasonal factors disagree with period or method".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of the seasonality step of a fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityDecision {
    pub seasonal: bool,
    pub method: DecompositionMethod,
    /// Absent when the test was skipped.
    pub test: Option<SeasonalityTestResult>,
}

/// A fitted Theta model.
///
/// Immutable; every forecasting call is a pure function of the fitted
/// state, so a single instance may be shared across threads.
#[derive(Debug, Clone)]
pub struct ThetaResults {
    state: ThetaState,
    decision: SeasonalityDecision,
    levels: Vec<f64>,
    adjusted: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    ima: Option<ImaFit>,
}

impl ThetaResults {
    pub(crate) fn new(
        state: ThetaState,
        decision: SeasonalityDecision,
        levels: Vec<f64>,
        adjusted: Vec<f64>,
        fitted: Vec<f64>,
        residuals: Vec<f64>,
        ima: Option<ImaFit>,
    ) -> Self {
        Self {
            state,
            decision,
            levels,
            adjusted,
            fitted,
            residuals,
            ima,
        }
    }

    pub fn state(&self) -> &ThetaState {
        &self.state
    }

    /// Copy of the state for persistence.
    pub fn to_state(&self) -> ThetaState {
        self.state.clone()
    }

    pub fn decision(&self) -> &SeasonalityDecision {
        &self.decision
    }

    pub fn a0(&self) -> f64 {
        self.state.a0
    }

    pub fn b0(&self) -> f64 {
        self.state.b0
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    pub fn sigma2(&self) -> f64 {
        self.state.sigma2
    }

    /// Smoothed level path of the adjusted series.
    pub fn level_path(&self) -> &[f64] {
        &self.levels
    }

    /// Series after seasonal adjustment (the data itself when not seasonal).
    pub fn adjusted(&self) -> &[f64] {
        &self.adjusted
    }

    pub fn seasonal_factors(&self) -> Option<&SeasonalFactors> {
        self.state.seasonal_factors.as_ref()
    }

    /// In-sample one-step predictions, reseasonalized.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// IMA estimates, present when fitted by maximum likelihood.
    pub fn ima(&self) -> Option<&ImaFit> {
        self.ima.as_ref()
    }

    /// Presentation-only report of the fitted parameters.
    pub fn summary(&self) -> ThetaSummary {
        ThetaSummary {
            a0: self.state.a0,
            b0: self.state.b0,
            alpha: self.state.alpha,
            sigma2: self.state.sigma2,
            seasonal: self.decision.seasonal,
            method: self.decision.method,
            period: self.state.period,
            nobs: self.state.n,
            estimator: self.state.estimator,
            seasonality_statistic: self.decision.test.as_ref().map(|t| t.statistic()),
            ima_drift: self.ima.as_ref().map(|f| f.drift),
        }
    }
}

/// Structured summary of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThetaSummary {
    pub a0: f64,
    pub b0: f64,
    pub alpha: f64,
    pub sigma2: f64,
    pub seasonal: bool,
    pub method: DecompositionMethod,
    pub period: usize,
    pub nobs: usize,
    pub estimator: LevelEstimator,
    pub seasonality_statistic: Option<f64>,
    pub ima_drift: Option<f64>,
}

impl fmt::Display for ThetaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Theta Model Results")?;
        writeln!(f, "  Observations:  {}", self.nobs)?;
        writeln!(f, "  Estimator:     {}", self.estimator)?;
        writeln!(f, "  Period:        {}", self.period)?;
        if self.seasonal {
            writeln!(f, "  Deseasonalized: yes ({})", self.method)?;
        } else {
            writeln!(f, "  Deseasonalized: no")?;
        }
        if let Some(stat) = self.seasonality_statistic {
            writeln!(f, "  Seasonality z: {:.4}", stat)?;
        }
        writeln!(f, "  b0:            {:.6}", self.b0)?;
        writeln!(f, "  alpha:         {:.6}", self.alpha)?;
        write!(f, "  sigma2:        {:.6}", self.sigma2)?;
        if let Some(drift) = self.ima_drift {
            write!(f, "\n  IMA drift:     {:.6}", drift)?;
        }
        Ok(())
    }
}
