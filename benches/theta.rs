//! Benchmarks for fitting and forecasting with the Theta method.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use theta_forecast::core::TimeSeries;
use theta_forecast::models::theta::{LevelEstimator, ThetaModel};

fn generate_seasonal(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            (100.0 + 0.3 * i as f64)
                * (1.0 + 0.15 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin())
                + ((i * 31) % 11) as f64 * 0.4
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("theta_fit");

    for size in [48, 144, 576, 2304].iter() {
        let series = TimeSeries::from_values(generate_seasonal(*size, 12)).unwrap();

        group.bench_with_input(BenchmarkId::new("SES", size), size, |b, _| {
            b.iter(|| {
                ThetaModel::new()
                    .with_period(12)
                    .fit(black_box(&series))
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("MLE", size), size, |b, _| {
            b.iter(|| {
                ThetaModel::new()
                    .with_period(12)
                    .with_estimator(LevelEstimator::MleViaIma)
                    .fit(black_box(&series))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("theta_forecast");
    let series = TimeSeries::from_values(generate_seasonal(240, 12)).unwrap();
    let fitted = ThetaModel::new().with_period(12).fit(&series).unwrap();

    for horizon in [12, 120, 1200].iter() {
        group.bench_with_input(BenchmarkId::new("point", horizon), horizon, |b, &h| {
            b.iter(|| fitted.forecast(black_box(h), 2.0).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("intervals", horizon), horizon, |b, &h| {
            b.iter(|| fitted.prediction_intervals(black_box(h), 2.0, 0.05).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_forecast);
criterion_main!(benches);
