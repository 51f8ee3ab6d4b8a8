//! Legacy straight-line fit of the steady-state means.
//!
//! Each mean is repeated once per averaged record before regressing, so the
//! degrees of freedom reflect the records that went into the means.

use crate::domain::{FitStrategy, RunFit};
use crate::math::student_t;

/// Guards the t statistic against division by zero when `|r| = 1`.
const TINY: f64 = 1e-20;

/// Ordinary least squares line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub rvalue: f64,
    /// Two-sided p-value for a null hypothesis of zero slope.
    pub pvalue: f64,
    pub stderr: f64,
    pub intercept_stderr: f64,
}

/// Least squares line through `(x, y)`.
///
/// Returns `None` for fewer than two points, non-finite input, or when every
/// `x` is identical.
pub fn linregress(x: &[f64], y: &[f64]) -> Option<LinearRegression> {
    let n = x.len();
    if n < 2 || y.len() != n || x.iter().chain(y).any(|v| !v.is_finite()) {
        return None;
    }
    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let mut ssxm = 0.0;
    let mut ssym = 0.0;
    let mut ssxym = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= nf;
    ssym /= nf;
    ssxym /= nf;

    if ssxm == 0.0 {
        return None;
    }

    let r_den = (ssxm * ssym).sqrt();
    let rvalue = if r_den == 0.0 {
        0.0
    } else {
        (ssxym / r_den).clamp(-1.0, 1.0)
    };
    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    if n == 2 {
        // Two points always lie on a line.
        let (rvalue, pvalue) = if ssym == 0.0 { (0.0, 1.0) } else { (rvalue.signum(), 0.0) };
        return Some(LinearRegression {
            slope,
            intercept,
            rvalue,
            pvalue,
            stderr: 0.0,
            intercept_stderr: 0.0,
        });
    }

    let dof = (n - 2) as f64;
    let t = rvalue * (dof / ((1.0 - rvalue + TINY) * (1.0 + rvalue + TINY))).sqrt();
    let pvalue = student_t::two_sided_p(t, dof);
    let stderr = ((1.0 - rvalue * rvalue).max(0.0) * ssym / ssxm / dof).sqrt();
    let intercept_stderr = stderr * (ssxm + x_mean * x_mean).sqrt();

    Some(LinearRegression {
        slope,
        intercept,
        rvalue,
        pvalue,
        stderr,
        intercept_stderr,
    })
}

/// Fit the thermocouple means against their positions.
///
/// `repeats` is the number of records behind each mean.
pub fn fit_linear(positions: &[f64], means: &[f64], repeats: usize, confidence: f64) -> RunFit {
    let x = repeat_each(positions, repeats);
    let y = repeat_each(means, repeats);

    let Some(reg) = linregress(&x, &y) else {
        return RunFit::failed(FitStrategy::Linear);
    };

    let t = if x.len() > 2 {
        student_t::critical_value(confidence, (x.len() - 2) as f64)
    } else {
        f64::NAN
    };
    let b_err = reg.stderr * t;
    let c_err = reg.intercept_stderr * t;

    RunFit {
        strategy: FitStrategy::Linear,
        a: 0.0,
        a_err: 0.0,
        b: reg.slope,
        b_err,
        c: reg.intercept,
        c_err,
        rvalue: reg.rvalue,
        pvalue: reg.pvalue,
        dt_dx: reg.slope,
        dt_dx_err: b_err,
        t_s: reg.intercept,
        t_s_err: c_err,
    }
}

fn repeat_each(values: &[f64], times: usize) -> Vec<f64> {
    values
        .iter()
        .flat_map(|&v| std::iter::repeat_n(v, times))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_line_is_recovered() {
        let x = [0.0, 0.01, 0.02, 0.03];
        let y: Vec<f64> = x.iter().map(|x| 250.0 * x + 105.0).collect();
        let reg = linregress(&x, &y).unwrap();
        assert!((reg.slope - 250.0).abs() < 1e-9);
        assert!((reg.intercept - 105.0).abs() < 1e-9);
        assert!((reg.rvalue - 1.0).abs() < 1e-9);
        assert!(reg.stderr < 1e-6);
        assert!(reg.pvalue < 1e-12);
    }

    #[test]
    fn matches_reference_regression() {
        // y = 1.1, 1.9, 3.2, 3.9, 5.1 on x = 1..5
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.1, 1.9, 3.2, 3.9, 5.1];
        let reg = linregress(&x, &y).unwrap();
        assert!((reg.slope - 1.0).abs() < 1e-12);
        assert!((reg.intercept - 0.04).abs() < 1e-12);
        // SSE = 0.072, s² = 0.024, Sxx = 10
        let stderr = (0.024_f64 / 10.0).sqrt();
        assert!((reg.stderr - stderr).abs() < 1e-9);
        assert!((reg.intercept_stderr - stderr * 11.0_f64.sqrt()).abs() < 1e-9);
        assert!(reg.pvalue > 0.0 && reg.pvalue < 1e-3);
    }

    #[test]
    fn identical_x_is_rejected() {
        assert!(linregress(&[1.0, 1.0, 1.0], &[2.0, 3.0, 4.0]).is_none());
        let fit = fit_linear(&[0.01, 0.01, 0.01], &[100.0, 101.0, 102.0], 10, 0.95);
        assert!(!fit.converged());
        assert_eq!(fit.strategy, FitStrategy::Linear);
    }

    #[test]
    fn repeated_means_fit_the_line() {
        let positions = [0.0, 0.01, 0.02];
        let means = [120.0, 121.5, 123.0];
        let fit = fit_linear(&positions, &means, 10, 0.95);
        assert!(fit.converged());
        assert_eq!(fit.a, 0.0);
        assert!((fit.dt_dx - 150.0).abs() < 1e-9);
        assert!((fit.t_s - 120.0).abs() < 1e-9);
        assert!(fit.dt_dx_err < 1e-6);
    }
}
