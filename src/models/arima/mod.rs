//! Integrated moving-average estimation.
//!
//! Only the IMA(1,1) model with drift is provided. It is the likelihood
//! counterpart of simple exponential smoothing.

mod ima;

pub use ima::{fit_ima, fit_ima_constrained, ses_equivalent_alpha, ImaConfig, ImaFit, MAX_ABS_GAMMA};
