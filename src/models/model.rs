//! The quadratic profile `T(x) = a·x² + b·x + c`.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given position (for OLS)
//! - evaluate the profile (and its slope) given the parameters
//!
//! `x` is the distance from the boiling surface, so `T(0)` is the surface
//! temperature and `T'(0)` the surface gradient.

use crate::math::Uncertain;

/// Parameter names, in design-matrix column order.
pub const QUADRATIC_PARAMS: [&str; 3] = ["a", "b", "c"];

/// Fill a design row `[x², x, 1]`.
///
/// # Panics
/// Panics if `out` is shorter than [`QUADRATIC_PARAMS`].
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    out[0] = x * x;
    out[1] = x;
    out[2] = 1.0;
}

/// `T(x)`
pub fn predict(x: f64, params: &[f64; 3]) -> f64 {
    let [a, b, c] = *params;
    a * x * x + b * x + c
}

/// `T'(x)`
pub fn slope(x: f64, params: &[f64; 3]) -> f64 {
    let [a, b, _] = *params;
    2.0 * a * x + b
}

/// `T(x)` with uncertainty carried from both the parameters and `x`.
pub fn predict_uncertain(x: &Uncertain, params: &[Uncertain; 3]) -> Uncertain {
    let [a, b, c] = params;
    a.mul(&x.powi(2)).add(&b.mul(x)).add(c)
}

/// `T'(x)` with uncertainty carried from both the parameters and `x`.
pub fn slope_uncertain(x: &Uncertain, params: &[Uncertain; 3]) -> Uncertain {
    let [a, b, _] = params;
    a.mul(x).scale(2.0).add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_matches_prediction() {
        let params = [0.5, -2.0, 100.0];
        let mut row = [0.0; 3];
        fill_design_row(0.3, &mut row);
        let dot: f64 = row.iter().zip(params.iter()).map(|(r, p)| r * p).sum();
        assert!((dot - predict(0.3, &params)).abs() < 1e-12);
    }

    #[test]
    fn surface_values_are_intercept_and_linear_term() {
        let params = [
            Uncertain::variable(3.0, 0.3, "a"),
            Uncertain::variable(-40.0, 2.0, "b"),
            Uncertain::variable(120.0, 0.5, "c"),
        ];
        let x0 = Uncertain::variable(0.0, 0.0, "x");

        let t_s = predict_uncertain(&x0, &params);
        assert_eq!(t_s.nominal(), 120.0);
        assert!((t_s.std_dev() - 0.5).abs() < 1e-12);

        let dt_dx = slope_uncertain(&x0, &params);
        assert_eq!(dt_dx.nominal(), -40.0);
        assert!((dt_dx.std_dev() - 2.0).abs() < 1e-12);
        assert_eq!(slope(0.0, &[3.0, -40.0, 120.0]), -40.0);
    }

    #[test]
    fn slope_away_from_surface_depends_on_curvature() {
        let params = [
            Uncertain::variable(2.0, 1.0, "a"),
            Uncertain::exact(0.0),
            Uncertain::exact(0.0),
        ];
        let x = Uncertain::exact(0.5);
        // d/da (2·a·x) = 2x = 1
        let s = slope_uncertain(&x, &params);
        assert_eq!(s.nominal(), 2.0);
        assert!((s.std_dev() - 1.0).abs() < 1e-12);
    }
}
