//! Deterministic regressors for time series models.
//!
//! A [`DeterministicTerm`] produces a block of columns for the in-sample
//! period and for any number of steps beyond it. Terms are collected in a
//! [`DeterministicProcess`], which stacks their columns side by side.
//!
//! Positions are 0-based: the in-sample period covers `0..nobs` and the
//! out-of-sample period `nobs..nobs + steps`.

mod terms;

pub use terms::{CustomTerm, Fourier, SeasonalDummies, TimeTrend};

use crate::error::{ForecastError, Result};

/// Column-major matrix of named regressors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignMatrix {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    rows: usize,
}

impl DesignMatrix {
    /// Create an empty matrix with a fixed number of rows.
    pub fn new(rows: usize) -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            rows,
        }
    }

    /// Append a named column.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.rows {
            return Err(ForecastError::DimensionMismatch {
                expected: self.rows,
                got: values.len(),
            });
        }
        self.names.push(name.into());
        self.columns.push(values);
        Ok(())
    }

    /// Append all columns of `other`.
    pub fn hstack(&mut self, other: DesignMatrix) -> Result<()> {
        if other.rows != self.rows {
            return Err(ForecastError::DimensionMismatch {
                expected: self.rows,
                got: other.rows,
            });
        }
        self.names.extend(other.names);
        self.columns.extend(other.columns);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Values of one observation across all columns.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.rows {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index]).collect())
    }
}

/// A generator of deterministic regressors.
pub trait DeterministicTerm: std::fmt::Debug + Send + Sync {
    /// Short name used to label the term.
    fn name(&self) -> String;

    /// Columns for the fitted sample of `nobs` observations.
    fn in_sample(&self, nobs: usize) -> DesignMatrix;

    /// Columns for `steps` positions following a sample of `nobs` observations.
    fn out_of_sample(&self, steps: usize, nobs: usize) -> DesignMatrix;
}

/// Registry of deterministic terms evaluated together.
///
/// # Example
/// ```
/// use theta_forecast::deterministic::{DeterministicProcess, SeasonalDummies, TimeTrend};
///
/// let mut process = DeterministicProcess::new();
/// process.register(TimeTrend::linear());
/// process.register(SeasonalDummies::new(4));
///
/// let design = process.in_sample(8).unwrap();
/// assert_eq!(design.n_rows(), 8);
/// assert_eq!(design.n_cols(), 2 + 4);
/// ```
#[derive(Debug, Default)]
pub struct DeterministicProcess {
    terms: Vec<Box<dyn DeterministicTerm>>,
}

impl DeterministicProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_term<T: DeterministicTerm + 'static>(mut self, term: T) -> Self {
        self.register(term);
        self
    }

    /// Register a term. Columns appear in registration order.
    pub fn register<T: DeterministicTerm + 'static>(&mut self, term: T) {
        self.terms.push(Box::new(term));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate over registered terms.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DeterministicTerm> {
        self.terms.iter().map(|t| t.as_ref())
    }

    /// Stacked in-sample columns of every registered term.
    pub fn in_sample(&self, nobs: usize) -> Result<DesignMatrix> {
        let mut design = DesignMatrix::new(nobs);
        for term in &self.terms {
            design.hstack(term.in_sample(nobs))?;
        }
        Ok(design)
    }

    /// Stacked out-of-sample columns of every registered term.
    pub fn out_of_sample(&self, steps: usize, nobs: usize) -> Result<DesignMatrix> {
        let mut design = DesignMatrix::new(steps);
        for term in &self.terms {
            design.hstack(term.out_of_sample(steps, nobs))?;
        }
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_matrix_rejects_wrong_length() {
        let mut design = DesignMatrix::new(3);
        assert!(design.push_column("a", vec![1.0, 2.0, 3.0]).is_ok());
        assert!(matches!(
            design.push_column("b", vec![1.0]),
            Err(ForecastError::DimensionMismatch {
                expected: 3,
                got: 1
            })
        ));
        assert_eq!(design.n_cols(), 1);
        assert_eq!(design.row(1), Some(vec![2.0]));
        assert_eq!(design.row(3), None);
    }

    #[test]
    fn process_stacks_terms_in_registration_order() {
        let process = DeterministicProcess::new()
            .with_term(TimeTrend::linear())
            .with_term(Fourier::new(12.0, 2));

        assert_eq!(process.len(), 2);
        let design = process.in_sample(24).unwrap();
        assert_eq!(
            design.names(),
            &["const", "trend", "sin(1,12)", "cos(1,12)", "sin(2,12)", "cos(2,12)"]
        );
    }

    #[test]
    fn out_of_sample_continues_in_sample() {
        let process = DeterministicProcess::new().with_term(TimeTrend::linear());
        let full = process.in_sample(10).unwrap();
        let future = process.out_of_sample(3, 7).unwrap();

        let trend_full = full.column("trend").unwrap();
        let trend_future = future.column("trend").unwrap();
        assert_eq!(&trend_full[7..10], trend_future);
    }

    #[test]
    fn empty_process_yields_empty_design() {
        let process = DeterministicProcess::new();
        assert!(process.is_empty());
        let design = process.in_sample(5).unwrap();
        assert_eq!(design.n_rows(), 5);
        assert_eq!(design.n_cols(), 0);
    }

    #[test]
    fn registry_accepts_user_defined_terms() {
        let mut process = DeterministicProcess::new();
        process.register(CustomTerm::new("step", vec!["after_10".to_string()], |t| {
            vec![if t >= 10 { 1.0 } else { 0.0 }]
        }));

        let names: Vec<String> = process.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["step".to_string()]);

        let future = process.out_of_sample(2, 9).unwrap();
        assert_eq!(future.column("after_10").unwrap(), &[0.0, 1.0]);
    }
}
