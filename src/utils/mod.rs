//! Numerical helpers shared by the models.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{fit_linear_trend, ols_fit, ols_residuals, LinearTrend, OLSResult};
pub use optimization::{
    bounded_scalar, nelder_mead, BoundedScalarConfig, NelderMeadConfig, OptimizeResult,
};
pub use stats::{acf, autocorrelation, difference, mean, quantile_normal, variance};
