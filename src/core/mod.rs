//! Core data structures for time series forecasting.

mod forecast;
mod time_series;

pub use forecast::{theta_weight, Forecast, ForecastComponents};
pub use time_series::{Frequency, TimeSeries};
