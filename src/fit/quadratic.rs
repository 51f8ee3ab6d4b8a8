//! Quadratic temperature-profile fit with uncertainty propagation.
//!
//! Given pooled observations `(x_i, T_i)` (every thermocouple of every record
//! in the steady-state window) we solve
//!
//! ```text
//! minimize Σ (T_i - (a·x_i² + b·x_i + c))²
//! ```
//!
//! and report:
//! - the parameters and their standard errors, scaled by the two-sided
//!   Student-t critical value at `records - p` degrees of freedom (the
//!   residual variance itself still uses all `n` pooled observations)
//! - the surface temperature `T(0)` and gradient `T'(0)`, with uncertainty
//!   propagated from the parameters

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{FitStrategy, RunFit};
use crate::math::{
    solve_least_squares, student_t, sum_squared_residuals, unscaled_covariance, Uncertain,
};
use crate::models::{
    fill_design_row, predict, predict_uncertain, slope_uncertain, QUADRATIC_PARAMS,
};

/// Fit `T = a·x² + b·x + c` to `(x, y)`, pooled from `records` window records.
///
/// Never fails: degenerate input yields [`RunFit::failed`].
pub fn fit_quadratic(x: &[f64], y: &[f64], records: usize, confidence: f64) -> RunFit {
    let p = QUADRATIC_PARAMS.len();
    let n = x.len().min(y.len());

    if n < p || distinct_count(&x[..n]) < p {
        debug!(n, "quadratic fit needs at least three distinct positions");
        return RunFit::failed(FitStrategy::Quadratic);
    }
    if x[..n].iter().chain(&y[..n]).any(|v| !v.is_finite()) {
        debug!("quadratic fit input is not finite");
        return RunFit::failed(FitStrategy::Quadratic);
    }

    let mut design = DMatrix::<f64>::zeros(n, p);
    let mut row = [0.0; 3];
    for (i, &xi) in x[..n].iter().enumerate() {
        fill_design_row(xi, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }
    let target = DVector::from_column_slice(&y[..n]);

    let Some(beta) = solve_least_squares(&design, &target) else {
        debug!("quadratic design matrix is rank deficient");
        return RunFit::failed(FitStrategy::Quadratic);
    };
    let params = [beta[0], beta[1], beta[2]];

    // Standard errors need n > p; an exact fit keeps its parameters.
    let dof = n - p;
    let errors = match unscaled_covariance(&design) {
        Some(cov) if dof > 0 => {
            let s2 = sum_squared_residuals(&design, &target, &beta) / dof as f64;
            let t = student_t::critical_value(confidence, records as f64 - p as f64);
            [0usize, 1, 2].map(|j| (s2 * cov[(j, j)]).sqrt() * t)
        }
        _ => [f64::NAN; 3],
    };

    let uncertain =
        [0usize, 1, 2].map(|j| Uncertain::variable(params[j], errors[j], QUADRATIC_PARAMS[j]));
    let surface = Uncertain::variable(0.0, 0.0, "x");
    let t_s = predict_uncertain(&surface, &uncertain);
    let dt_dx = slope_uncertain(&surface, &uncertain);

    RunFit {
        strategy: FitStrategy::Quadratic,
        a: params[0],
        a_err: errors[0],
        b: params[1],
        b_err: errors[1],
        c: params[2],
        c_err: errors[2],
        rvalue: correlation_of_fit(&x[..n], &y[..n], &params),
        pvalue: f64::NAN,
        dt_dx: dt_dx.nominal(),
        dt_dx_err: dt_dx.std_dev(),
        t_s: t_s.nominal(),
        t_s_err: t_s.std_dev(),
    }
}

fn distinct_count(x: &[f64]) -> usize {
    let mut sorted: Vec<f64> = x.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// `sqrt(R²)` of the fitted profile.
fn correlation_of_fit(x: &[f64], y: &[f64], params: &[f64; 3]) -> f64 {
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let sst: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - predict(xi, params)).powi(2))
        .sum();
    if sst > 0.0 {
        (1.0 - sse / sst).max(0.0).sqrt()
    } else {
        f64::NAN
    }
}
