//! Forecasting models.

mod traits;

pub mod arima;
pub mod exponential;
pub mod theta;

pub use theta::{LevelEstimator, ThetaModel, ThetaResults};
pub use traits::{BoxedForecaster, Estimator, Forecaster};
