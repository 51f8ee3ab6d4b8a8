//! Shared domain types.
//!
//! Trial metadata is deserialized straight from the project YAML; the per-run
//! types are produced by the pipeline stages and consumed by the table builder
//! and the exporters.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::axes::Axis;

/// The rod used in a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rod {
    W,
    X,
    Y,
}

/// The coupon attached to the rod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coupon {
    A1,
    A2,
    A3,
    A4,
    A6,
    A7,
    A9,
}

/// The sample attached to the coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sample {
    /// No sample attached.
    NA,
    B3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Control,
    Porous,
    Hybrid,
}

/// How the parts of the sample were joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Joint {
    Paste,
    Epoxy,
    Solder,
}

impl Rod {
    pub fn as_str(self) -> &'static str {
        match self {
            Rod::W => "W",
            Rod::X => "X",
            Rod::Y => "Y",
        }
    }
}

impl Coupon {
    pub fn as_str(self) -> &'static str {
        match self {
            Coupon::A1 => "A1",
            Coupon::A2 => "A2",
            Coupon::A3 => "A3",
            Coupon::A4 => "A4",
            Coupon::A6 => "A6",
            Coupon::A7 => "A7",
            Coupon::A9 => "A9",
        }
    }
}

impl Sample {
    pub fn as_str(self) -> &'static str {
        match self {
            Sample::NA => "NA",
            Sample::B3 => "B3",
        }
    }
}

impl Group {
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Control => "control",
            Group::Porous => "porous",
            Group::Hybrid => "hybrid",
        }
    }
}

impl Joint {
    pub fn as_str(self) -> &'static str {
        match self {
            Joint::Paste => "paste",
            Joint::Epoxy => "epoxy",
            Joint::Solder => "solder",
        }
    }
}

/// Ordered thermocouple name → position (m) mapping.
///
/// Order is significant: it is the order in which temperatures are stacked for
/// fitting, so this is a list rather than a hash map. In YAML it is written as
/// a plain mapping (`T_1: 0.1016`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThermocouplePositions(Vec<(Axis, f64)>);

impl ThermocouplePositions {
    pub fn new(pairs: Vec<(Axis, f64)>) -> Self {
        Self(pairs)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.0.iter().map(|(axis, _)| *axis)
    }

    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|(_, x)| *x)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The thermocouple closest to the surface (smallest position).
    pub fn nearest(&self) -> Option<Axis> {
        self.0
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(axis, _)| *axis)
    }
}

impl Serialize for ThermocouplePositions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (axis, x) in &self.0 {
            map.serialize_entry(axis, x)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ThermocouplePositions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PositionsVisitor;

        impl<'de> Visitor<'de> for PositionsVisitor {
            type Value = ThermocouplePositions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of thermocouple name to position (m)")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((axis, x)) = access.next_entry::<Axis, f64>()? {
                    pairs.push((axis, x));
                }
                Ok(ThermocouplePositions(pairs))
            }
        }

        deserializer.deserialize_map(PositionsVisitor)
    }
}

/// One experiment occasion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trial {
    pub date: NaiveDate,
    pub rod: Rod,
    pub coupon: Coupon,
    pub sample: Sample,
    pub group: Group,
    /// Whether the boiling curve is monotonic.
    pub monotonic: bool,
    pub joint: Joint,
    #[serde(default)]
    pub comment: String,
    pub thermocouple_pos: ThermocouplePositions,
}

impl Trial {
    /// Metadata columns broadcast to every run of the trial.
    pub fn metadata_cells(&self) -> [(Axis, Cell); 7] {
        [
            (Axis::Group, Cell::Text(self.group.as_str().to_string())),
            (Axis::Rod, Cell::Text(self.rod.as_str().to_string())),
            (Axis::Coupon, Cell::Text(self.coupon.as_str().to_string())),
            (Axis::Sample, Cell::Text(self.sample.as_str().to_string())),
            (Axis::Joint, Cell::Text(self.joint.as_str().to_string())),
            (Axis::Monotonic, Cell::Bool(self.monotonic)),
            (Axis::Comment, Cell::Text(self.comment.clone())),
        ]
    }
}

/// One record of a run CSV, restricted to the registry's source columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: String,
    pub values: BTreeMap<Axis, f64>,
}

/// Steady-state reduction of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub trial: NaiveDate,
    /// Run identifier (the file stem, typically a timestamp).
    pub run: String,
    /// Time index of the last record in the averaging window.
    pub time: String,
    /// Trailing-window mean of every channel.
    pub means: BTreeMap<Axis, f64>,
    /// The trailing window itself, kept for pooled fitting.
    pub window: Vec<Record>,
}

impl RunSummary {
    pub fn mean(&self, axis: Axis) -> f64 {
        self.means.get(&axis).copied().unwrap_or(f64::NAN)
    }
}

/// Which temperature-profile model to fit per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitStrategy {
    /// `T = a·x² + b·x + c` over the pooled window records.
    #[default]
    Quadratic,
    /// Legacy straight-line fit of the steady-state means.
    Linear,
}

/// Per-run fit outputs. Failed fits carry NaN everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFit {
    pub strategy: FitStrategy,
    pub a: f64,
    pub a_err: f64,
    pub b: f64,
    pub b_err: f64,
    pub c: f64,
    pub c_err: f64,
    pub rvalue: f64,
    pub pvalue: f64,
    /// Temperature gradient at the surface (x = 0).
    pub dt_dx: f64,
    pub dt_dx_err: f64,
    /// Extrapolated surface temperature.
    pub t_s: f64,
    pub t_s_err: f64,
}

impl RunFit {
    pub fn failed(strategy: FitStrategy) -> Self {
        Self {
            strategy,
            a: f64::NAN,
            a_err: f64::NAN,
            b: f64::NAN,
            b_err: f64::NAN,
            c: f64::NAN,
            c_err: f64::NAN,
            rvalue: f64::NAN,
            pvalue: f64::NAN,
            dt_dx: f64::NAN,
            dt_dx_err: f64::NAN,
            t_s: f64::NAN,
            t_s_err: f64::NAN,
        }
    }

    pub fn converged(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    pub fn columns(&self) -> [(Axis, f64); 12] {
        [
            (Axis::A, self.a),
            (Axis::AErr, self.a_err),
            (Axis::B, self.b),
            (Axis::BErr, self.b_err),
            (Axis::C, self.c),
            (Axis::CErr, self.c_err),
            (Axis::Rvalue, self.rvalue),
            (Axis::Pvalue, self.pvalue),
            (Axis::DtDx, self.dt_dx),
            (Axis::DtDxErr, self.dt_dx_err),
            (Axis::Ts, self.t_s),
            (Axis::TsErr, self.t_s_err),
        ]
    }
}

/// A steady-state run together with its profile fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRun {
    pub summary: RunSummary,
    pub fit: RunFit,
}

/// Trial-level heat transfer quantities for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatTransfer {
    /// Thermal conductivity of the rod (W/m-K).
    pub k: f64,
    /// Reconciled water temperature (C).
    pub t_w: f64,
    /// Disagreement between submerged thermocouples and saturation temperature (K).
    pub t_w_diff: f64,
    /// Heat flux (W/cm^2).
    pub q: f64,
    pub q_err: f64,
    /// Heat rate through the rod (W).
    pub power: f64,
    /// Superheat against the trial-wide water temperature (K).
    pub superheat: f64,
    pub superheat_err: f64,
}

impl HeatTransfer {
    pub fn columns(&self) -> [(Axis, f64); 8] {
        [
            (Axis::K, self.k),
            (Axis::Tw, self.t_w),
            (Axis::TwDiff, self.t_w_diff),
            (Axis::Flux, self.q),
            (Axis::FluxErr, self.q_err),
            (Axis::Power, self.power),
            (Axis::Superheat, self.superheat),
            (Axis::SuperheatErr, self.superheat_err),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialRun {
    pub summary: RunSummary,
    pub fit: RunFit,
    pub heat: HeatTransfer,
}

/// One value of the result table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// CSV rendering. NaN is written as an empty cell.
    pub fn render(&self) -> String {
        match self {
            Cell::Float(v) if v.is_nan() => String::new(),
            Cell::Float(v) => format!("{v}"),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A fully assembled output row, keyed by (trial, run, time).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub trial: NaiveDate,
    pub run: String,
    pub time: String,
    pub cells: BTreeMap<Axis, Cell>,
}

impl ResultRow {
    pub fn get(&self, axis: Axis) -> Option<&Cell> {
        self.cells.get(&axis)
    }

    pub fn float(&self, axis: Axis) -> f64 {
        self.get(axis).and_then(Cell::as_f64).unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermocouple_positions_keep_yaml_order() {
        let yaml = "T_3: 0.02\nT_1: 0.0\nT_2: 0.01\n";
        let pos: ThermocouplePositions = serde_yaml::from_str(yaml).unwrap();
        let axes: Vec<Axis> = pos.axes().collect();
        assert_eq!(axes, vec![Axis::T3, Axis::T1, Axis::T2]);
        assert_eq!(pos.nearest(), Some(Axis::T1));
    }

    #[test]
    fn trial_parses_from_yaml() {
        let yaml = r#"
date: 2022-09-14
rod: X
coupon: A1
sample: NA
group: control
monotonic: true
joint: solder
comment: first run
thermocouple_pos:
  T_1: 0.1016
  T_2: 0.0762
"#;
        let trial: Trial = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(trial.group, Group::Control);
        assert_eq!(trial.thermocouple_pos.len(), 2);
        assert_eq!(trial.thermocouple_pos.nearest(), Some(Axis::T2));
    }

    #[test]
    fn nan_cells_render_empty() {
        assert_eq!(Cell::Float(f64::NAN).render(), "");
        assert_eq!(Cell::Float(1.5).render(), "1.5");
        assert_eq!(Cell::Bool(true).render(), "true");
    }

    #[test]
    fn failed_fit_is_not_converged() {
        let fit = RunFit::failed(FitStrategy::Quadratic);
        assert!(!fit.converged());
        assert!(fit.columns().iter().all(|(_, v)| v.is_nan()));
    }
}
