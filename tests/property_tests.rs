//! Property-based tests for the Theta forecaster.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated time series data.

use theta_forecast::core::TimeSeries;
use theta_forecast::models::theta::{LevelEstimator, ThetaModel, ThetaState, MLE_ALPHA_CAP};
use theta_forecast::models::Forecaster;
use theta_forecast::seasonality::{
    decompose, deseasonalize, reseasonalize, DecompositionMethod, SeasonalFactors,
};
use proptest::prelude::*;

fn make_ts(values: &[f64]) -> TimeSeries {
    TimeSeries::from_values(values.to_vec()).unwrap()
}

/// Strategy for generating valid time series values.
/// Adds small variation to avoid all-constant series.
fn valid_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(1.0..1000.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.001;
            }
            v
        })
    })
}

/// Strategy for generating positive seasonal series with a trend.
fn seasonal_values_strategy(
    min_len: usize,
    max_len: usize,
    period: usize,
) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(move |len| {
        (50.0..100.0_f64, 5.0..20.0_f64, 0.0..1.0_f64).prop_map(move |(base, amplitude, slope)| {
            (0..len)
                .map(|i| {
                    base + slope * i as f64
                        + amplitude * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                })
                .collect()
        })
    })
}

fn method_strategy() -> impl Strategy<Value = DecompositionMethod> {
    prop_oneof![
        Just(DecompositionMethod::Multiplicative),
        Just(DecompositionMethod::Additive),
    ]
}

fn factors_strategy(period: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.5..1.5_f64, period)
}

// =============================================================================
// Property: deseasonalize and reseasonalize are inverses
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn decomposition_round_trips(
        values in seasonal_values_strategy(24, 80, 6),
        method in method_strategy()
    ) {
        let result = decompose(&values, 6, method).unwrap();
        let restored = reseasonalize(&result.adjusted, &result.factors, 0);
        for (a, b) in values.iter().zip(&restored) {
            prop_assert!((a - b).abs() < 1e-8 * a.abs().max(1.0));
        }
    }

    #[test]
    fn explicit_factors_round_trip(
        values in valid_values_strategy(5, 60),
        factors in factors_strategy(4),
        method in method_strategy()
    ) {
        let factors = SeasonalFactors::new(method, factors).unwrap();
        let adjusted = deseasonalize(&values, &factors);
        let restored = reseasonalize(&adjusted, &factors, 0);
        for (a, b) in values.iter().zip(&restored) {
            prop_assert!((a - b).abs() < 1e-9 * a.abs().max(1.0));
        }
    }
}

// =============================================================================
// Property: forecasts are well formed
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn forecast_length_matches_horizon(
        values in valid_values_strategy(10, 80),
        horizon in 1usize..30
    ) {
        let fitted = ThetaModel::new().with_period(1).fit(&make_ts(&values)).unwrap();
        let forecast = fitted.predict(horizon).unwrap();
        prop_assert_eq!(forecast.horizon(), horizon);
        prop_assert!(forecast.point().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn fitted_and_residuals_sum_to_data(values in valid_values_strategy(10, 60)) {
        let fitted = ThetaModel::new().with_period(1).fit(&make_ts(&values)).unwrap();
        for ((y, f), r) in values.iter().zip(fitted.fitted_values()).zip(fitted.residuals()) {
            prop_assert!((y - (f + r)).abs() < 1e-9 * y.abs().max(1.0));
        }
    }

    #[test]
    fn alpha_stays_in_bounds(
        values in valid_values_strategy(10, 60),
        mle in any::<bool>()
    ) {
        let fitted = ThetaModel::new()
            .with_period(1)
            .with_mle(mle)
            .fit(&make_ts(&values))
            .unwrap();
        let alpha = fitted.alpha();
        prop_assert!(alpha > 0.0 && alpha <= 1.0);
        if mle {
            prop_assert!(alpha >= 1.0 - MLE_ALPHA_CAP && alpha <= MLE_ALPHA_CAP);
        }
        prop_assert!(fitted.sigma2() >= 0.0);
    }

    #[test]
    fn seasonal_fit_produces_finite_forecasts(
        values in seasonal_values_strategy(36, 96, 12),
        horizon in 1usize..25
    ) {
        let fitted = ThetaModel::new().with_period(12).fit(&make_ts(&values)).unwrap();
        let forecast = fitted.prediction_intervals(horizon, 2.0, 0.05).unwrap();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        for k in 0..horizon {
            prop_assert!(forecast.point()[k].is_finite());
            prop_assert!(lower[k] <= forecast.point()[k] && forecast.point()[k] <= upper[k]);
        }
    }
}

// =============================================================================
// Property: forecast formula identities
// =============================================================================

fn state_strategy() -> impl Strategy<Value = ThetaState> {
    (
        0.01..1.0_f64,
        -5.0..5.0_f64,
        10.0..500.0_f64,
        5usize..200,
        method_strategy(),
    )
        .prop_map(|(alpha, b0, level, n, method)| ThetaState {
            a0: level - b0 * n as f64,
            b0,
            alpha,
            sigma2: 1.0,
            level,
            seasonal_factors: None,
            method,
            n,
            period: 1,
            estimator: LevelEstimator::ClosedFormSes,
        })
}

/// A fitted state carrying period-4 seasonal factors of either method.
fn seasonal_state_strategy() -> impl Strategy<Value = ThetaState> {
    (
        state_strategy(),
        method_strategy(),
        prop::collection::vec(0.5..1.5_f64, 4),
    )
        .prop_map(|(mut state, method, raw)| {
            let factors = match method {
                DecompositionMethod::Multiplicative => raw,
                DecompositionMethod::Additive => raw.iter().map(|f| 10.0 * (f - 1.0)).collect(),
            };
            state.seasonal_factors = Some(SeasonalFactors::new(method, factors).unwrap());
            state.method = method;
            state.period = 4;
            state
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn components_recombine_to_forecast(
        state in prop_oneof![state_strategy(), seasonal_state_strategy()],
        theta in 1.01..20.0_f64,
        horizon in 1usize..24
    ) {
        let direct = state.forecast(horizon, theta).unwrap();
        let combined = state.forecast_components(horizon).unwrap().combine(theta).unwrap();
        prop_assert_eq!(direct.point(), combined.as_slice());
    }

    #[test]
    fn large_theta_converges_to_full_drift(
        state in state_strategy(),
        horizon in 1usize..24
    ) {
        let limit = state.forecast(horizon, f64::INFINITY).unwrap();
        let near = state.forecast(horizon, 1e10).unwrap();
        for (a, b) in limit.point().iter().zip(near.point()) {
            prop_assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn unit_alpha_is_naive_plus_drift(
        mut state in state_strategy(),
        theta in 1.01..20.0_f64,
        horizon in 1usize..24
    ) {
        state.alpha = 1.0;
        let w = 1.0 - 1.0 / theta;
        let forecast = state.forecast(horizon, theta).unwrap();
        for (k, value) in forecast.point().iter().enumerate() {
            let expected = state.level + w * state.b0 * (k + 1) as f64;
            prop_assert!((value - expected).abs() < 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn seasonal_forecast_restores_factor_phase(
        state in seasonal_state_strategy(),
        theta in 1.01..20.0_f64,
        horizon in 1usize..24
    ) {
        let mut plain = state.clone();
        plain.seasonal_factors = None;
        plain.period = 1;
        let adjusted = plain.forecast(horizon, theta).unwrap();
        let seasonal = state.forecast(horizon, theta).unwrap();
        let factors = state.seasonal_factors.as_ref().unwrap();
        for (k, (s, a)) in seasonal.point().iter().zip(adjusted.point()).enumerate() {
            let expected = state.method.apply(*a, factors.at(state.n + k));
            prop_assert!((s - expected).abs() < 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn interval_width_is_non_decreasing(
        state in state_strategy(),
        horizon in 2usize..24
    ) {
        let forecast = state.prediction_intervals(horizon, 2.0, 0.1).unwrap();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        for k in 1..horizon {
            prop_assert!(upper[k] - lower[k] >= upper[k - 1] - lower[k - 1] - 1e-12);
        }
    }
}
