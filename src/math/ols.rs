//! Ordinary least squares.
//!
//! Every run fit is a small regression problem of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with a tall design matrix (one row per pooled thermocouple reading, 2-3
//! columns). We solve it with SVD, which tolerates the tall shape and reports
//! rank deficiency instead of panicking.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Rank deficiency shows up as tiny singular values; refuse rather than
    // return an arbitrary minimum-norm solution.
    let max_sv = svd.singular_values.max();
    if !(max_sv.is_finite() && max_sv > 0.0) || svd.rank(max_sv * 1e-12) < x.ncols() {
        return None;
    }

    let beta = svd.solve(y, 1e-12 * max_sv).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

/// Unscaled parameter covariance `(XᵀX)⁻¹`.
///
/// Multiply by the residual variance `SSE / (n - p)` to get the covariance of
/// the least squares estimate.
///
/// Computed from the SVD (`V Σ⁻² Vᵀ`) rather than by inverting `XᵀX`, which
/// would square the condition number of the design.
pub fn unscaled_covariance(x: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let svd = x.clone().svd(false, true);
    let v_t = svd.v_t?;
    let singular = svd.singular_values;

    let max_sv = singular.max();
    if singular.len() < x.ncols()
        || !(max_sv.is_finite() && max_sv > 0.0)
        || singular.iter().any(|&s| s <= max_sv * 1e-12)
    {
        return None;
    }

    let inv_sq = singular.map(|s| 1.0 / (s * s));
    let cov = v_t.transpose() * DMatrix::from_diagonal(&inv_sq) * &v_t;
    cov.iter().all(|v| v.is_finite()).then_some(cov)
}

/// Sum of squared residuals of `y - xβ`.
pub fn sum_squared_residuals(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> f64 {
    let residuals = y - x * beta;
    residuals.dot(&residuals)
}
