//! Fixtures shared by the stage tests.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::axes::Axis;
use crate::config::{Project, ProjectFile};
use crate::domain::{Record, RunSummary};
use crate::props::{Material, Property, PropertyLookup, SaturationLookup};

pub const DATE: &str = "2022-09-14";

pub fn date() -> NaiveDate {
    NaiveDate::parse_from_str(DATE, "%Y-%m-%d").unwrap()
}

pub fn project(base: &Path, window: usize, strategy: &str) -> Project {
    let yaml = format!(
        r#"
dirs:
  trials: trials
  results: results
params:
  records_to_average: {window}
  fit_strategy: {strategy}
trials:
  - date: {DATE}
    rod: X
    coupon: A1
    sample: NA
    group: control
    monotonic: true
    joint: solder
    thermocouple_pos:
      T_1: 0.0
      T_2: 0.01
      T_3: 0.02
"#
    );
    let file: ProjectFile = serde_yaml::from_str(&yaml).unwrap();
    Project::from_file(file, base).unwrap()
}

pub fn record(time: &str, values: &[(Axis, f64)]) -> Record {
    Record {
        time: time.to_string(),
        values: values.iter().copied().collect(),
    }
}

/// A run whose thermocouples follow `T = t_s + slope·x` exactly.
pub fn linear_summary(run: &str, records: usize, t_s: f64, slope: f64, water: f64) -> RunSummary {
    let window: Vec<Record> = (0..records)
        .map(|i| {
            record(
                &format!("{i}"),
                &[
                    (Axis::T1, t_s),
                    (Axis::T2, t_s + slope * 0.01),
                    (Axis::T3, t_s + slope * 0.02),
                    (Axis::Tw1, water),
                    (Axis::Tw2, water),
                    (Axis::Tw3, water),
                    (Axis::P, 14.695_95),
                ],
            )
        })
        .collect();
    let means: BTreeMap<Axis, f64> = window[0].values.clone();
    RunSummary {
        trial: date(),
        run: run.to_string(),
        time: format!("{}", records - 1),
        means,
        window,
    }
}

/// Conductivity fixed at 400 W/m-K.
pub struct ConstantProperties;

impl PropertyLookup for ConstantProperties {
    fn property(&self, _: Material, _: Property, temperature: f64) -> f64 {
        if temperature.is_nan() { f64::NAN } else { 400.0 }
    }
}

/// Saturation fixed at 100 C.
pub struct ConstantSaturation;

impl SaturationLookup for ConstantSaturation {
    fn saturation_temperature(&self, psia: f64) -> f64 {
        if psia.is_nan() { f64::NAN } else { 100.0 }
    }
}
