//! Seasonal adjustment.
//!
//! Estimates a fixed-period seasonal pattern with a classical
//! moving-average decomposition, removes it before fitting, and restores it
//! on forecasts.

mod decompose;

pub use decompose::{
    decompose, deseasonalize, reseasonalize, seasonal_factors, Decomposition,
    DecompositionMethod, SeasonalFactors,
};
