//! Concrete deterministic terms.

use super::{DesignMatrix, DeterministicTerm};
use std::f64::consts::PI;
use std::fmt;

/// Polynomial time trend, optionally with a constant.
///
/// Column `k` holds `(origin + t)^k` for position `t`. With the default
/// origin of 1 the first observation has trend value 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTrend {
    constant: bool,
    order: usize,
    origin: f64,
}

impl TimeTrend {
    pub fn new(constant: bool, order: usize) -> Self {
        Self {
            constant,
            order,
            origin: 1.0,
        }
    }

    /// Constant plus linear trend.
    pub fn linear() -> Self {
        Self::new(true, 1)
    }

    /// Value of the trend at the first observation.
    pub fn with_origin(mut self, origin: f64) -> Self {
        self.origin = origin;
        self
    }

    fn columns(&self, positions: std::ops::Range<usize>) -> DesignMatrix {
        let mut design = DesignMatrix::new(positions.len());
        let t: Vec<f64> = positions.map(|p| self.origin + p as f64).collect();
        let first = if self.constant { 0 } else { 1 };
        for power in first..=self.order {
            let name = match power {
                0 => "const".to_string(),
                1 => "trend".to_string(),
                2 => "trend_squared".to_string(),
                3 => "trend_cubed".to_string(),
                k => format!("trend**{}", k),
            };
            let values = t.iter().map(|&x| x.powi(power as i32)).collect();
            // Lengths agree by construction.
            let _ = design.push_column(name, values);
        }
        design
    }
}

impl DeterministicTerm for TimeTrend {
    fn name(&self) -> String {
        match (self.constant, self.order) {
            (true, 0) => "constant".to_string(),
            (true, k) => format!("trend(const, order={})", k),
            (false, k) => format!("trend(order={})", k),
        }
    }

    fn in_sample(&self, nobs: usize) -> DesignMatrix {
        self.columns(0..nobs)
    }

    fn out_of_sample(&self, steps: usize, nobs: usize) -> DesignMatrix {
        self.columns(nobs..nobs + steps)
    }
}

/// Seasonal indicator columns, one per position within the period.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalDummies {
    period: usize,
    initial: usize,
}

impl SeasonalDummies {
    pub fn new(period: usize) -> Self {
        Self { period, initial: 0 }
    }

    /// Phase of the first observation.
    pub fn with_initial(mut self, initial: usize) -> Self {
        self.initial = initial;
        self
    }

    fn columns(&self, positions: std::ops::Range<usize>) -> DesignMatrix {
        let mut design = DesignMatrix::new(positions.len());
        if self.period == 0 {
            return design;
        }
        for phase in 0..self.period {
            let values = positions
                .clone()
                .map(|p| {
                    if (p + self.initial) % self.period == phase {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect();
            let _ = design.push_column(format!("s({},{})", phase + 1, self.period), values);
        }
        design
    }
}

impl DeterministicTerm for SeasonalDummies {
    fn name(&self) -> String {
        format!("seasonality(period={})", self.period)
    }

    fn in_sample(&self, nobs: usize) -> DesignMatrix {
        self.columns(0..nobs)
    }

    fn out_of_sample(&self, steps: usize, nobs: usize) -> DesignMatrix {
        self.columns(nobs..nobs + steps)
    }
}

/// Fourier pairs `sin(2πkt/period)`, `cos(2πkt/period)` for `k = 1..=order`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fourier {
    period: f64,
    order: usize,
}

impl Fourier {
    pub fn new(period: f64, order: usize) -> Self {
        Self { period, order }
    }

    fn columns(&self, positions: std::ops::Range<usize>) -> DesignMatrix {
        let mut design = DesignMatrix::new(positions.len());
        for k in 1..=self.order {
            let freq = 2.0 * PI * k as f64 / self.period;
            let sin = positions.clone().map(|p| (freq * p as f64).sin()).collect();
            let cos = positions.clone().map(|p| (freq * p as f64).cos()).collect();
            let _ = design.push_column(format!("sin({},{})", k, self.period), sin);
            let _ = design.push_column(format!("cos({},{})", k, self.period), cos);
        }
        design
    }
}

impl DeterministicTerm for Fourier {
    fn name(&self) -> String {
        format!("fourier(period={}, order={})", self.period, self.order)
    }

    fn in_sample(&self, nobs: usize) -> DesignMatrix {
        self.columns(0..nobs)
    }

    fn out_of_sample(&self, steps: usize, nobs: usize) -> DesignMatrix {
        self.columns(nobs..nobs + steps)
    }
}

type RowFn = Box<dyn Fn(usize) -> Vec<f64> + Send + Sync>;

/// User-defined term built from a per-position row generator.
///
/// The generator receives the 0-based position and returns one value per
/// column name. Missing trailing values are filled with zero.
pub struct CustomTerm {
    name: String,
    columns: Vec<String>,
    row: RowFn,
}

impl CustomTerm {
    pub fn new<F>(name: impl Into<String>, columns: Vec<String>, row: F) -> Self
    where
        F: Fn(usize) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            columns,
            row: Box::new(row),
        }
    }

    fn evaluate(&self, positions: std::ops::Range<usize>) -> DesignMatrix {
        let rows: Vec<Vec<f64>> = positions.clone().map(|p| (self.row)(p)).collect();
        let mut design = DesignMatrix::new(positions.len());
        for (j, name) in self.columns.iter().enumerate() {
            let values = rows
                .iter()
                .map(|r| r.get(j).copied().unwrap_or(0.0))
                .collect();
            let _ = design.push_column(name.clone(), values);
        }
        design
    }
}

impl fmt::Debug for CustomTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTerm")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl DeterministicTerm for CustomTerm {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn in_sample(&self, nobs: usize) -> DesignMatrix {
        self.evaluate(0..nobs)
    }

    fn out_of_sample(&self, steps: usize, nobs: usize) -> DesignMatrix {
        self.evaluate(nobs..nobs + steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn time_trend_default_origin_is_one() {
        let design = TimeTrend::linear().in_sample(4);
        assert_eq!(design.column("const").unwrap(), &[1.0; 4]);
        assert_eq!(design.column("trend").unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn time_trend_quadratic_without_constant() {
        let design = TimeTrend::new(false, 2).with_origin(0.0).out_of_sample(2, 3);
        assert_eq!(design.names(), &["trend", "trend_squared"]);
        assert_eq!(design.column("trend").unwrap(), &[3.0, 4.0]);
        assert_eq!(design.column("trend_squared").unwrap(), &[9.0, 16.0]);
    }

    #[test]
    fn seasonal_dummies_cycle_with_phase() {
        let design = SeasonalDummies::new(3).with_initial(1).in_sample(4);
        assert_eq!(design.n_cols(), 3);
        // Position 0 sits at phase 1.
        assert_eq!(design.row(0).unwrap(), vec![0.0, 1.0, 0.0]);
        assert_eq!(design.row(2).unwrap(), vec![1.0, 0.0, 0.0]);
        for r in 0..4 {
            assert_relative_eq!(design.row(r).unwrap().iter().sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn fourier_terms_repeat_each_period() {
        let term = Fourier::new(4.0, 1);
        let design = term.in_sample(8);
        let sin = design.column("sin(1,4)").unwrap();
        for t in 0..4 {
            assert_relative_eq!(sin[t], sin[t + 4], epsilon = 1e-12);
        }
        assert_relative_eq!(design.column("cos(1,4)").unwrap()[0], 1.0);
    }

    #[test]
    fn custom_term_pads_short_rows() {
        let term = CustomTerm::new(
            "pulse",
            vec!["a".to_string(), "b".to_string()],
            |t| if t == 1 { vec![5.0] } else { vec![0.0, 1.0] },
        );
        let design = term.in_sample(3);
        assert_eq!(design.column("a").unwrap(), &[0.0, 5.0, 0.0]);
        assert_eq!(design.column("b").unwrap(), &[1.0, 0.0, 1.0]);
        assert!(format!("{:?}", term).contains("pulse"));
    }
}
