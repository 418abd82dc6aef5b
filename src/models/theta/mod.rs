//! The Theta method.
//!
//! A series is optionally deseasonalized, then split into two theta lines:
//! a linear trend fitted by least squares and a level tracked by simple
//! exponential smoothing. Forecasts combine the drift, weighted by
//! `1 - 1/θ`, with the flat smoothed level and restore the seasonal pattern.
//!
//! Fitting consumes a [`ThetaModel`] and yields an immutable
//! [`ThetaResults`]; forecasting never mutates the fitted state.

mod forecast;
mod model;
mod results;

pub use forecast::DEFAULT_THETA;
pub use model::{LevelEstimator, ThetaModel, MLE_ALPHA_CAP};
pub use results::{SeasonalityDecision, ThetaResults, ThetaState, ThetaSummary};
