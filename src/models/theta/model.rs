//! Theta model specification and fitting.

use crate::core::TimeSeries;
use crate::detection::{test_seasonality, SeasonalityTestConfig, SeasonalityTestResult};
use crate::error::{ForecastError, Result};
use crate::models::arima::{fit_ima, fit_ima_constrained, ses_equivalent_alpha, ImaConfig, ImaFit};
use crate::models::exponential::{fit_ses, one_step_predictions, smooth};
use crate::models::theta::results::{SeasonalityDecision, ThetaResults, ThetaState};
use crate::seasonality::{decompose, DecompositionMethod};
use crate::utils::ols::fit_linear_trend;
use crate::utils::optimization::BoundedScalarConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Upper cap on alpha derived from the IMA fit; `1 - cap` is the floor.
pub const MLE_ALPHA_CAP: f64 = 0.9998;

/// How the smoothing parameter of the level is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEstimator {
    /// Minimize the one-step squared error of simple exponential smoothing.
    #[default]
    ClosedFormSes,
    /// Exact maximum likelihood of the equivalent IMA(1,1) with drift.
    MleViaIma,
}

impl fmt::Display for LevelEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelEstimator::ClosedFormSes => write!(f, "SES"),
            LevelEstimator::MleViaIma => write!(f, "MLE"),
        }
    }
}

/// Unfitted Theta model.
///
/// Configure with the `with_*` builders, then call [`ThetaModel::fit`],
/// which consumes the model and returns an immutable [`ThetaResults`].
///
/// The series is tested for seasonality at its period. If seasonal, it is
/// deseasonalized; a linear trend and a simple exponential smoother are
/// then fitted to the adjusted series.
///
/// # Example
/// ```
/// use theta_forecast::core::{Frequency, TimeSeries};
/// use theta_forecast::models::theta::ThetaModel;
///
/// let values: Vec<f64> = (0..48)
///     .map(|i| 100.0 + i as f64 + 10.0 * (i as f64 * std::f64::consts::PI / 6.0).sin())
///     .collect();
/// let series = TimeSeries::from_values(values).unwrap().with_frequency(Frequency::Monthly);
///
/// let results = ThetaModel::new().fit(&series).unwrap();
/// let forecast = results.forecast(12, 2.0).unwrap();
/// assert_eq!(forecast.horizon(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct ThetaModel {
    period: Option<usize>,
    /// `None` selects the method from the data.
    method: Option<DecompositionMethod>,
    estimator: LevelEstimator,
    deseasonalize: bool,
    use_test: bool,
    seasonality_test: SeasonalityTestConfig,
    ses_config: BoundedScalarConfig,
    ima_config: ImaConfig,
}

impl Default for ThetaModel {
    fn default() -> Self {
        Self {
            period: None,
            method: Some(DecompositionMethod::Multiplicative),
            estimator: LevelEstimator::ClosedFormSes,
            deseasonalize: true,
            use_test: true,
            seasonality_test: SeasonalityTestConfig::default(),
            ses_config: BoundedScalarConfig::default(),
            ima_config: ImaConfig::default(),
        }
    }
}

impl ThetaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seasonal period. Overrides the period implied by the series frequency.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = Some(period);
        self
    }

    /// Decomposition method used when the series is deseasonalized.
    pub fn with_method(mut self, method: DecompositionMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Decomposition method by name: `"multiplicative"`, `"additive"`, their
    /// short forms `"mul"`/`"add"`, or `"auto"`.
    pub fn with_method_name(mut self, name: &str) -> Result<Self> {
        self.method = if name.trim().eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(DecompositionMethod::from_str(name)?)
        };
        Ok(self)
    }

    pub fn with_estimator(mut self, estimator: LevelEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Shorthand for `with_estimator(LevelEstimator::MleViaIma)`.
    pub fn with_mle(self, use_mle: bool) -> Self {
        self.with_estimator(if use_mle {
            LevelEstimator::MleViaIma
        } else {
            LevelEstimator::ClosedFormSes
        })
    }

    /// When false, no seasonal adjustment is attempted and no period is needed.
    pub fn with_deseasonalize(mut self, deseasonalize: bool) -> Self {
        self.deseasonalize = deseasonalize;
        self
    }

    /// When false, the series is always deseasonalized without testing.
    pub fn with_use_test(mut self, use_test: bool) -> Self {
        self.use_test = use_test;
        self
    }

    /// Run the seasonality test on the differenced series.
    pub fn with_difference(mut self, difference: bool) -> Self {
        self.seasonality_test.difference = difference;
        self
    }

    pub fn with_seasonality_test(mut self, config: SeasonalityTestConfig) -> Self {
        self.seasonality_test = config;
        self
    }

    pub fn with_ses_config(mut self, config: BoundedScalarConfig) -> Self {
        self.ses_config = config;
        self
    }

    pub fn with_ima_config(mut self, config: ImaConfig) -> Self {
        self.ima_config = config;
        self
    }

    pub fn estimator(&self) -> LevelEstimator {
        self.estimator
    }

    /// Fit the model to a series.
    ///
    /// # Errors
    /// - [`ForecastError::Configuration`] when the period is zero or cannot
    ///   be determined while seasonal adjustment is enabled, when the series
    ///   is shorter than two full periods, or when multiplicative adjustment
    ///   meets non-positive data.
    /// - [`ForecastError::Estimation`] when the level smoother does not
    ///   converge.
    pub fn fit(self, series: &TimeSeries) -> Result<ThetaResults> {
        let values = series.values();
        let n = values.len();

        let period = match self.period {
            Some(0) => {
                return Err(ForecastError::Configuration(
                    "seasonal period must be positive".to_string(),
                ))
            }
            Some(p) => p,
            None if !self.deseasonalize => 1,
            None => series.seasonal_period().ok_or_else(|| {
                ForecastError::Configuration(
                    "seasonal period could not be inferred from the series; set it explicitly"
                        .to_string(),
                )
            })?,
        };
        let method = self
            .method
            .unwrap_or_else(|| DecompositionMethod::auto(values));

        debug!(n, period, %method, estimator = %self.estimator, "fitting theta model");

        let (seasonal, test) = self.decide_seasonality(values, period)?;
        let (adjusted, factors) = if seasonal {
            let decomposition = decompose(values, period, method)?;
            (decomposition.adjusted, Some(decomposition.factors))
        } else {
            (values.to_vec(), None)
        };

        let trend = fit_linear_trend(&adjusted)?;
        let level = self.fit_level(&adjusted)?;
        let levels = smooth(&adjusted, level.alpha);
        let last_level = levels.last().copied().unwrap_or(f64::NAN);

        let mut fitted = one_step_predictions(&levels);
        if let Some(f) = &factors {
            fitted = f.reseasonalize(&fitted, 0);
        }
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        debug!(
            a0 = trend.intercept,
            b0 = trend.slope,
            alpha = level.alpha,
            sigma2 = level.sigma2,
            seasonal,
            "theta model fitted"
        );

        let state = ThetaState {
            a0: trend.intercept,
            b0: trend.slope,
            alpha: level.alpha,
            sigma2: level.sigma2,
            level: last_level,
            seasonal_factors: factors,
            method,
            n,
            period,
            estimator: self.estimator,
        };

        Ok(ThetaResults::new(
            state,
            SeasonalityDecision {
                seasonal,
                method,
                test,
            },
            levels,
            adjusted,
            fitted,
            residuals,
            level.ima,
        ))
    }

    /// Convenience for fitting a plain slice of observations.
    pub fn fit_values(self, values: &[f64]) -> Result<ThetaResults> {
        let series = TimeSeries::from_values(values.to_vec())?;
        self.fit(&series)
    }

    fn decide_seasonality(
        &self,
        values: &[f64],
        period: usize,
    ) -> Result<(bool, Option<SeasonalityTestResult>)> {
        if !self.deseasonalize || period <= 1 {
            return Ok((false, None));
        }
        if values.len() < 2 * period {
            return Err(ForecastError::insufficient_data(2 * period, values.len()));
        }
        if !self.use_test {
            return Ok((true, None));
        }
        let result = test_seasonality(values, period, &self.seasonality_test)?;
        Ok((result.seasonal, Some(result)))
    }

    fn fit_level(&self, adjusted: &[f64]) -> Result<LevelFit> {
        match self.estimator {
            LevelEstimator::ClosedFormSes => {
                let ses = fit_ses(adjusted, &self.ses_config)?;
                Ok(LevelFit {
                    alpha: ses.alpha,
                    sigma2: ses.sigma2,
                    ima: None,
                })
            }
            LevelEstimator::MleViaIma => {
                let mut ima = fit_ima(adjusted, &self.ima_config)?;
                let (alpha, clamped) = ses_equivalent_alpha(ima.gamma, MLE_ALPHA_CAP);
                if clamped {
                    warn!(
                        gamma = ima.gamma,
                        alpha, "IMA coefficient implies alpha outside bounds, clamping"
                    );
                    ima = fit_ima_constrained(adjusted, alpha - 1.0)?;
                }
                Ok(LevelFit {
                    alpha,
                    sigma2: ima.sigma2,
                    ima: Some(ima),
                })
            }
        }
    }
}

/// Output of the level smoother.
struct LevelFit {
    alpha: f64,
    sigma2: f64,
    ima: Option<ImaFit>,
}
