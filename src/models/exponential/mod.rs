//! Exponential smoothing.

mod ses;

pub use ses::{fit_ses, one_step_predictions, one_step_sse, smooth, SesFit, MIN_ALPHA};
