//! Error types for the theta-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fitting or forecasting.
///
/// Three categories matter to callers: configuration problems detected at
/// `fit()` time, estimation failures of the level smoother, and invalid
/// arguments to forecasting calls. The remaining variants are raised while
/// constructing a [`TimeSeries`](crate::core::TimeSeries).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Invalid option, insufficient sample size, or missing period.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The level smoother's optimizer did not converge within its budget.
    #[error("estimation error: {message} (last iterate: {last_iterate:?})")]
    Estimation {
        message: String,
        last_iterate: Vec<f64>,
    },

    /// Degenerate theta, non-positive horizon or similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Frequency inference failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),
}

impl ForecastError {
    /// Shorthand for the insufficient-sample configuration error.
    pub(crate) fn insufficient_data(needed: usize, got: usize) -> Self {
        ForecastError::Configuration(format!(
            "insufficient data: need at least {}, got {}",
            needed, got
        ))
    }

    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ForecastError::Configuration(_))
    }

    /// Check if this is an estimation error.
    pub fn is_estimation(&self) -> bool {
        matches!(self, ForecastError::Estimation { .. })
    }

    /// Check if this is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ForecastError::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::Configuration("unknown method 'foo'".to_string());
        assert_eq!(err.to_string(), "configuration error: unknown method 'foo'");

        let err = ForecastError::insufficient_data(24, 10);
        assert_eq!(
            err.to_string(),
            "configuration error: insufficient data: need at least 24, got 10"
        );

        let err = ForecastError::Estimation {
            message: "line search did not converge".to_string(),
            last_iterate: vec![0.5],
        };
        assert_eq!(
            err.to_string(),
            "estimation error: line search did not converge (last iterate: [0.5])"
        );

        let err = ForecastError::InvalidArgument("theta must be > 1".to_string());
        assert_eq!(err.to_string(), "invalid argument: theta must be > 1");

        let err = ForecastError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");
    }

    #[test]
    fn error_classification() {
        assert!(ForecastError::insufficient_data(2, 1).is_configuration());
        assert!(ForecastError::InvalidArgument(String::new()).is_invalid_argument());
        assert!(ForecastError::Estimation {
            message: String::new(),
            last_iterate: vec![],
        }
        .is_estimation());
        assert!(!ForecastError::EmptyData.is_configuration());
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::EmptyData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
