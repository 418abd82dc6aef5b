//! Ordinary least squares and the linear trend estimator.

use crate::deterministic::{DesignMatrix, DeterministicProcess, TimeTrend};
use crate::error::{ForecastError, Result};

/// Fitted least squares coefficients, one per design column.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Regression coefficients in design column order.
    pub coefficients: Vec<f64>,
    /// Names of the design columns.
    pub regressor_names: Vec<String>,
}

impl OLSResult {
    /// Predict values for a design matrix with the same columns.
    pub fn predict(&self, design: &DesignMatrix) -> Result<Vec<f64>> {
        if design.n_cols() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: design.n_cols(),
            });
        }

        let mut predictions = vec![0.0; design.n_rows()];
        for (coef, column) in self.coefficients.iter().zip(design.columns()) {
            for (pred, x) in predictions.iter_mut().zip(column) {
                *pred += coef * x;
            }
        }
        Ok(predictions)
    }

    /// Coefficient by column name.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.regressor_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.coefficients[i])
    }
}

/// Fit `y = X @ beta` by least squares.
///
/// Solves the normal equations with a Cholesky factorization. The design
/// must carry its own constant column if an intercept is wanted.
pub fn ols_fit(y: &[f64], design: &DesignMatrix) -> Result<OLSResult> {
    let n = y.len();
    let k = design.n_cols();

    if design.n_rows() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: design.n_rows(),
        });
    }
    if k == 0 {
        return Err(ForecastError::Configuration(
            "least squares requires at least one regressor".into(),
        ));
    }
    if n < k {
        return Err(ForecastError::insufficient_data(k, n));
    }

    let cols = design.columns();
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in 0..=i {
            let s: f64 = cols[i].iter().zip(&cols[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = s;
            xtx[j][i] = s;
        }
        xty[i] = cols[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::Configuration("least squares design is rank deficient".into())
    })?;

    Ok(OLSResult {
        coefficients: beta,
        regressor_names: design.names().to_vec(),
    })
}

/// Solve `A @ x = b` for symmetric positive definite `A` via Cholesky.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L @ L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                // Relative pivot check catches collinear columns.
                if sum <= a[i][i].abs() * 1e-12 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * z[j];
        }
        z[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

/// Intercept and slope of `X_t = a0 + b0 * (t - 1)` for `t = 1..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    /// Intercept, the trend value at the first observation.
    pub intercept: f64,
    /// Drift per period.
    pub slope: f64,
}

impl LinearTrend {
    /// Trend value at 0-based position `t`.
    pub fn value_at(&self, t: usize) -> f64 {
        self.intercept + self.slope * t as f64
    }
}

/// Fit a linear trend by least squares on a constant and `t - 1`.
///
/// Closed form, no iteration; fails only when fewer than two observations
/// are supplied.
pub fn fit_linear_trend(values: &[f64]) -> Result<LinearTrend> {
    if values.len() < 2 {
        return Err(ForecastError::insufficient_data(2, values.len()));
    }

    let trend = TimeTrend::linear().with_origin(0.0);
    let design = DeterministicProcess::new()
        .with_term(trend)
        .in_sample(values.len())?;
    let fit = ols_fit(values, &design)?;

    Ok(LinearTrend {
        intercept: fit.coefficient("const").unwrap_or(0.0),
        slope: fit.coefficient("trend").unwrap_or(0.0),
    })
}

/// Residuals `y - X @ beta` of a fitted regression.
pub fn ols_residuals(y: &[f64], fit: &OLSResult, design: &DesignMatrix) -> Result<Vec<f64>> {
    let predictions = fit.predict(design)?;
    if predictions.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: y.len(),
            got: predictions.len(),
        });
    }
    Ok(y.iter().zip(&predictions).map(|(a, b)| a - b).collect())
}
