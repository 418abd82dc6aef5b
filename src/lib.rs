//! # theta-forecast
//!
//! The Theta method for univariate time series forecasting.
//!
//! A series is tested for seasonality at its period and deseasonalized when
//! a pattern is present. A least squares trend and a simple exponential
//! smoother are fitted to the adjusted series; forecasts blend the two with
//! a theta weight and restore the seasonal pattern. The smoothing parameter
//! is chosen either by minimizing the one-step squared error or by exact
//! maximum likelihood of the equivalent IMA(1,1) model, which also backs
//! the prediction intervals.
//!
//! ```
//! use theta_forecast::prelude::*;
//!
//! let values: Vec<f64> = (0..36)
//!     .map(|i| 50.0 + 0.8 * i as f64 + [4.0, -1.0, -5.0, 2.0][i % 4])
//!     .collect();
//! let series = TimeSeries::from_values(values)?.with_frequency(Frequency::Quarterly);
//!
//! let results = ThetaModel::new().with_method(DecompositionMethod::Additive).fit(&series)?;
//! let forecast = results.prediction_intervals(8, 2.0, 0.05)?;
//! assert_eq!(forecast.horizon(), 8);
//! # Ok::<(), ForecastError>(())
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod detection;
pub mod deterministic;
pub mod error;
pub mod models;
pub mod seasonality;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, ForecastComponents, Frequency, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::theta::{LevelEstimator, ThetaModel, ThetaResults, ThetaState};
    pub use crate::models::{Estimator, Forecaster};
    pub use crate::seasonality::DecompositionMethod;
    pub use crate::utils::quantile_normal;
}
