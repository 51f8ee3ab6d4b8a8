//! Pipeline stages.
//!
//! Each stage is a plain function of its input and a [`Context`]; the driver in
//! `app::pipeline` calls them in order for every trial:
//!
//! 1. `steady_state`: run files → one [`RunSummary`](crate::domain::RunSummary) per run
//! 2. `validate`: water temperatures of every summary checked against the project range
//! 3. `fit`: summary → [`FittedRun`](crate::domain::FittedRun)
//! 4. `heat_transfer`: all fitted runs of a trial → [`TrialRun`](crate::domain::TrialRun)s
//! 5. `metadata`: trial runs → flattened [`ResultRow`](crate::domain::ResultRow)s

pub mod fit;
pub mod heat_transfer;
pub mod metadata;
pub mod steady_state;
pub mod validate;

pub use fit::*;
pub use heat_transfer::*;
pub use metadata::*;
pub use steady_state::*;
pub use validate::*;

#[cfg(test)]
pub(crate) mod testing;

use crate::config::Project;
use crate::props::{PropertyLookup, SaturationLookup};

/// Everything a stage may consult besides its input.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub project: &'a Project,
    pub properties: &'a dyn PropertyLookup,
    pub saturation: &'a dyn SaturationLookup,
}

impl<'a> Context<'a> {
    pub fn new(
        project: &'a Project,
        properties: &'a dyn PropertyLookup,
        saturation: &'a dyn SaturationLookup,
    ) -> Self {
        Self {
            project,
            properties,
            saturation,
        }
    }
}

/// Mean ignoring NaN; NaN if nothing is left.
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_mean_skips_missing_values() {
        assert_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN, f64::NAN]).is_nan());
        assert!(nan_mean(std::iter::empty()).is_nan());
    }
}
