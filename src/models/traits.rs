//! Traits separating model specification from fitted models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;
use crate::models::theta::{ThetaModel, ThetaResults, DEFAULT_THETA};

/// An unfitted model specification.
///
/// Fitting consumes the specification, so a fitted model can only ever be
/// produced once from it.
pub trait Estimator {
    /// The fitted model.
    type Fitted: Forecaster;

    /// Fit the model to the time series data.
    fn fit(self, series: &TimeSeries) -> Result<Self::Fitted>;
}

/// Common interface for fitted forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Generate predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with intervals of the given coverage, e.g. 0.95.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast>;

    /// In-sample predictions.
    fn fitted_values(&self) -> &[f64];

    /// Residuals (actual - fitted).
    fn residuals(&self) -> &[f64];

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Boxed fitted model that can be shared across threads.
///
/// # Example
///
/// ```
/// use theta_forecast::models::{BoxedForecaster, Estimator};
/// use theta_forecast::models::theta::ThetaModel;
/// use theta_forecast::core::TimeSeries;
///
/// let series = TimeSeries::from_values((1..=30).map(|i| i as f64).collect()).unwrap();
/// let model: BoxedForecaster = Box::new(
///     ThetaModel::new().with_deseasonalize(false).fit(&series).unwrap(),
/// );
/// assert_eq!(model.name(), "Theta");
/// assert_eq!(model.predict(3).unwrap().horizon(), 3);
/// ```
pub type BoxedForecaster = Box<dyn Forecaster + Send + Sync>;

impl Estimator for ThetaModel {
    type Fitted = ThetaResults;

    fn fit(self, series: &TimeSeries) -> Result<ThetaResults> {
        ThetaModel::fit(self, series)
    }
}

impl Forecaster for ThetaResults {
    fn predict(&self, horizon: usize) -> Result<Forecast> {
        self.forecast(horizon, DEFAULT_THETA)
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        self.prediction_intervals(horizon, DEFAULT_THETA, 1.0 - level)
    }

    fn fitted_values(&self) -> &[f64] {
        ThetaResults::fitted_values(self)
    }

    fn residuals(&self) -> &[f64] {
        ThetaResults::residuals(self)
    }

    fn name(&self) -> &str {
        "Theta"
    }
}
