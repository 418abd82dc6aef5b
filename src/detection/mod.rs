//! Statistical tests on the input series.

mod seasonality;

pub use seasonality::{
    test_seasonality, AcfStandardError, SeasonalityTestConfig, SeasonalityTestResult,
};
