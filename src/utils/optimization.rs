//! Derivative-free minimizers used by the level smoother.
//!
//! Both routines run under a fixed iteration budget and report whether they
//! converged; callers decide what a non-converged result means.

use std::cmp::Ordering;

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    /// Best point found (the last iterate when not converged).
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the convergence criterion was met within the budget.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the spread of simplex values and vertices.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// Points are clamped into `bounds` (one `(min, max)` pair per dimension)
/// after every simplex move.
///
/// # Example
/// ```
/// use theta_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> OptimizeResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return OptimizeResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let start = clamp_to_bounds(initial.to_vec(), bounds);
    let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
    simplex.push(Vertex::evaluate(start.clone(), &objective));
    for i in 0..n {
        let mut point = start.clone();
        point[i] += if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(Vertex::evaluate(clamp_to_bounds(point, bounds), &objective));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));

        let best = simplex[0].value;
        let worst = simplex[n].value;
        let second_worst = simplex[n - 1].value;

        let centroid = centroid_without_last(&simplex);
        let spread = simplex
            .iter()
            .map(|v| euclidean_distance(&v.point, &centroid))
            .fold(0.0, f64::max);
        if worst - best < config.tolerance || spread < config.tolerance {
            converged = true;
            break;
        }

        let reflected = Vertex::evaluate(
            clamp_to_bounds(move_from(&centroid, &simplex[n].point, -config.alpha), bounds),
            &objective,
        );

        if reflected.value < best {
            let expanded = Vertex::evaluate(
                clamp_to_bounds(move_from(&centroid, &reflected.point, config.gamma), bounds),
                &objective,
            );
            simplex[n] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
            continue;
        }

        if reflected.value < second_worst {
            simplex[n] = reflected;
            continue;
        }

        if reflected.value < worst {
            let outside = Vertex::evaluate(
                clamp_to_bounds(move_from(&centroid, &reflected.point, config.rho), bounds),
                &objective,
            );
            if outside.value <= reflected.value {
                simplex[n] = outside;
                continue;
            }
        } else {
            let inside = Vertex::evaluate(
                clamp_to_bounds(move_from(&centroid, &simplex[n].point, config.rho), bounds),
                &objective,
            );
            if inside.value < worst {
                simplex[n] = inside;
                continue;
            }
        }

        // Shrink every vertex towards the best one.
        let best_point = simplex[0].point.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let shrunk = move_from(&best_point, &vertex.point, config.sigma);
            *vertex = Vertex::evaluate(clamp_to_bounds(shrunk, bounds), &objective);
        }
    }

    let best = simplex
        .into_iter()
        .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
        .unwrap_or(Vertex {
            point: initial.to_vec(),
            value: f64::NAN,
        });

    OptimizeResult {
        optimal_point: best.point,
        optimal_value: best.value,
        iterations,
        converged,
    }
}

/// Configuration for bounded scalar minimization.
#[derive(Debug, Clone)]
pub struct BoundedScalarConfig {
    /// Maximum number of iterations (function evaluations after the first).
    pub max_iter: usize,
    /// Absolute tolerance on the argument.
    pub xatol: f64,
}

impl Default for BoundedScalarConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            xatol: 1e-10,
        }
    }
}

impl BoundedScalarConfig {
    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the absolute argument tolerance.
    pub fn with_xatol(mut self, xatol: f64) -> Self {
        self.xatol = xatol;
        self
    }
}

/// Minimize a scalar function on `[lower, upper]` with Brent's method.
///
/// Combines golden-section steps with parabolic interpolation. The interval
/// endpoints themselves are never evaluated.
///
/// # Example
/// ```
/// use theta_forecast::utils::optimization::{bounded_scalar, BoundedScalarConfig};
///
/// let result = bounded_scalar(|x| (x - 0.3).powi(2), 0.0, 1.0, BoundedScalarConfig::default());
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 0.3).abs() < 1e-6);
/// ```
pub fn bounded_scalar<F>(
    objective: F,
    lower: f64,
    upper: f64,
    config: BoundedScalarConfig,
) -> OptimizeResult
where
    F: Fn(f64) -> f64,
{
    let golden = 0.5 * (3.0 - 5.0_f64.sqrt());
    let sqrt_eps = f64::EPSILON.sqrt();

    let (mut a, mut b) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };

    let mut x = a + golden * (b - a);
    let mut w = x;
    let mut v = x;
    let mut fx = objective(x);
    let mut fw = fx;
    let mut fv = fx;
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        let xm = 0.5 * (a + b);
        let tol1 = sqrt_eps * x.abs() + config.xatol / 3.0;
        let tol2 = 2.0 * tol1;

        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            converged = true;
            break;
        }
        iterations += 1;

        let mut use_golden = true;
        if e.abs() > tol1 {
            // Parabola through x, w, v.
            let mut r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = d;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if (u - a) < tol2 || (b - u) < tol2 {
                    d = tol1.copysign(xm - x);
                }
                use_golden = false;
            }
        }

        if use_golden {
            e = if x >= xm { a - x } else { b - x };
            d = golden * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + tol1.copysign(d)
        };
        let fu = objective(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    OptimizeResult {
        optimal_point: vec![x],
        optimal_value: fx,
        iterations,
        converged,
    }
}

/// A simplex vertex together with its objective value.
#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    value: f64,
}

impl Vertex {
    fn evaluate<F>(point: Vec<f64>, objective: &F) -> Self
    where
        F: Fn(&[f64]) -> f64,
    {
        let value = objective(&point);
        // NaN objectives rank last.
        let value = if value.is_nan() { f64::INFINITY } else { value };
        Self { point, value }
    }
}

/// Centroid of every vertex but the last (the worst after sorting).
fn centroid_without_last(simplex: &[Vertex]) -> Vec<f64> {
    let dims = simplex[0].point.len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dims];
    for vertex in &simplex[..simplex.len() - 1] {
        for (c, p) in centroid.iter_mut().zip(vertex.point.iter()) {
            *c += p;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

/// `origin + coef * (point - origin)`.
fn move_from(origin: &[f64], point: &[f64], coef: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point.iter())
        .map(|(o, p)| o + coef * (p - o))
        .collect()
}

fn clamp_to_bounds(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(b) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(b.iter()) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
