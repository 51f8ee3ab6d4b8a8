//! Terminal summary of a pipeline invocation.
//!
//! Formatting lives here so the stages stay free of presentation concerns.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::TrialRun;

/// Per-trial digest shown after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialReport {
    pub date: NaiveDate,
    pub runs: usize,
    pub failed_fits: usize,
    /// (min, max) heat flux over runs with a finite value (W/cm^2).
    pub q_range: Option<(f64, f64)>,
    /// (min, max) superheat over runs with a finite value (K).
    pub dt_range: Option<(f64, f64)>,
}

pub fn summarize_trial(date: NaiveDate, runs: &[TrialRun]) -> TrialReport {
    TrialReport {
        date,
        runs: runs.len(),
        failed_fits: runs.iter().filter(|r| !r.fit.converged()).count(),
        q_range: finite_range(runs.iter().map(|r| r.heat.q)),
        dt_range: finite_range(runs.iter().map(|r| r.heat.superheat)),
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn fmt_range(range: Option<(f64, f64)>, unit: &str) -> String {
    match range {
        Some((lo, hi)) => format!("[{lo:.2}, {hi:.2}] {unit}"),
        None => "n/a".to_string(),
    }
}

/// Format the summary printed by `boil run`.
pub fn format_summary(
    reports: &[TrialReport],
    skipped: &[NaiveDate],
    outputs: &[PathBuf],
) -> String {
    let mut out = String::new();

    out.push_str("=== boil - boiling curve reduction ===\n");
    let runs: usize = reports.iter().map(|r| r.runs).sum();
    out.push_str(&format!("Trials: {} | Runs: {runs}\n", reports.len()));

    out.push('\n');
    out.push_str(&format!(
        "{:<12} {:>5} {:>7}  {:<24} {:<24}\n",
        "trial", "runs", "failed", "q''", "ΔT"
    ));
    for report in reports {
        out.push_str(&format!(
            "{:<12} {:>5} {:>7}  {:<24} {:<24}\n",
            report.date.format("%Y-%m-%d").to_string(),
            report.runs,
            report.failed_fits,
            fmt_range(report.q_range, "W/cm^2"),
            fmt_range(report.dt_range, "K"),
        ));
    }

    for date in skipped {
        out.push_str(&format!("(skipped {date}: not monotonic)\n"));
    }

    if !outputs.is_empty() {
        out.push_str("\nWrote:\n");
        for path in outputs {
            out.push_str(&format!("- {}\n", path.display()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitStrategy, HeatTransfer, RunFit};
    use crate::stages::testing::{date, linear_summary};

    fn run(q: f64, dt: f64, converged: bool) -> TrialRun {
        let mut fit = RunFit::failed(FitStrategy::Quadratic);
        if converged {
            fit.a = 0.0;
            fit.b = 1.0;
            fit.c = 1.0;
        }
        TrialRun {
            summary: linear_summary("r", 1, 120.0, 100.0, 100.0),
            fit,
            heat: HeatTransfer {
                k: 400.0,
                t_w: 100.0,
                t_w_diff: 0.0,
                q,
                q_err: 0.0,
                power: 0.0,
                superheat: dt,
                superheat_err: 0.0,
            },
        }
    }

    #[test]
    fn summary_counts_failures_and_ranges() {
        let runs = [run(5.0, 10.0, true), run(9.0, 20.0, true), run(f64::NAN, f64::NAN, false)];
        let report = summarize_trial(date(), &runs);
        assert_eq!(report.runs, 3);
        assert_eq!(report.failed_fits, 1);
        assert_eq!(report.q_range, Some((5.0, 9.0)));
        assert_eq!(report.dt_range, Some((10.0, 20.0)));

        let text = format_summary(&[report], &[], &[PathBuf::from("results/results.csv")]);
        assert!(text.contains("2022-09-14"));
        assert!(text.contains("[5.00, 9.00] W/cm^2"));
        assert!(text.contains("results/results.csv"));
    }

    #[test]
    fn empty_trial_has_no_ranges() {
        let report = summarize_trial(date(), &[]);
        assert_eq!(report.q_range, None);
        assert!(format_summary(&[report], &[date()], &[]).contains("skipped 2022-09-14"));
    }
}
