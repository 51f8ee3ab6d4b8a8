//! Axis definitions and the resolved lookup table consumed by every stage.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A named column of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "trial")]
    Trial,
    #[serde(rename = "run")]
    Run,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "rod")]
    Rod,
    #[serde(rename = "coupon")]
    Coupon,
    #[serde(rename = "sample")]
    Sample,
    #[serde(rename = "joint")]
    Joint,
    #[serde(rename = "monotonic")]
    Monotonic,
    #[serde(rename = "comment")]
    Comment,
    V,
    I,
    #[serde(rename = "T_0")]
    T0,
    #[serde(rename = "T_1")]
    T1,
    #[serde(rename = "T_2")]
    T2,
    #[serde(rename = "T_3")]
    T3,
    #[serde(rename = "T_4")]
    T4,
    #[serde(rename = "T_5")]
    T5,
    #[serde(rename = "T_6")]
    T6,
    #[serde(rename = "T_w1")]
    Tw1,
    #[serde(rename = "T_w2")]
    Tw2,
    #[serde(rename = "T_w3")]
    Tw3,
    P,
    #[serde(rename = "a")]
    A,
    #[serde(rename = "a_err")]
    AErr,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "b_err")]
    BErr,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c_err")]
    CErr,
    #[serde(rename = "rvalue")]
    Rvalue,
    #[serde(rename = "pvalue")]
    Pvalue,
    #[serde(rename = "dT_dx")]
    DtDx,
    #[serde(rename = "dT_dx_err")]
    DtDxErr,
    #[serde(rename = "T_s")]
    Ts,
    #[serde(rename = "T_s_err")]
    TsErr,
    #[serde(rename = "k")]
    K,
    #[serde(rename = "T_w")]
    Tw,
    #[serde(rename = "T_w_diff")]
    TwDiff,
    #[serde(rename = "q")]
    Flux,
    #[serde(rename = "q_err")]
    FluxErr,
    #[serde(rename = "Q")]
    Power,
    #[serde(rename = "DT")]
    Superheat,
    #[serde(rename = "DT_err")]
    SuperheatErr,
}

impl Axis {
    pub const ALL: [Axis; 43] = [
        Axis::Trial,
        Axis::Run,
        Axis::Time,
        Axis::Group,
        Axis::Rod,
        Axis::Coupon,
        Axis::Sample,
        Axis::Joint,
        Axis::Monotonic,
        Axis::Comment,
        Axis::V,
        Axis::I,
        Axis::T0,
        Axis::T1,
        Axis::T2,
        Axis::T3,
        Axis::T4,
        Axis::T5,
        Axis::T6,
        Axis::Tw1,
        Axis::Tw2,
        Axis::Tw3,
        Axis::P,
        Axis::A,
        Axis::AErr,
        Axis::B,
        Axis::BErr,
        Axis::C,
        Axis::CErr,
        Axis::Rvalue,
        Axis::Pvalue,
        Axis::DtDx,
        Axis::DtDxErr,
        Axis::Ts,
        Axis::TsErr,
        Axis::K,
        Axis::Tw,
        Axis::TwDiff,
        Axis::Flux,
        Axis::FluxErr,
        Axis::Power,
        Axis::Superheat,
        Axis::SuperheatErr,
    ];

    /// Submerged thermocouples measuring the water bath.
    pub const WATER: [Axis; 3] = [Axis::Tw1, Axis::Tw2, Axis::Tw3];

    /// Canonical column name, as used in YAML and in the simple results file.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Trial => "trial",
            Axis::Run => "run",
            Axis::Time => "time",
            Axis::Group => "group",
            Axis::Rod => "rod",
            Axis::Coupon => "coupon",
            Axis::Sample => "sample",
            Axis::Joint => "joint",
            Axis::Monotonic => "monotonic",
            Axis::Comment => "comment",
            Axis::V => "V",
            Axis::I => "I",
            Axis::T0 => "T_0",
            Axis::T1 => "T_1",
            Axis::T2 => "T_2",
            Axis::T3 => "T_3",
            Axis::T4 => "T_4",
            Axis::T5 => "T_5",
            Axis::T6 => "T_6",
            Axis::Tw1 => "T_w1",
            Axis::Tw2 => "T_w2",
            Axis::Tw3 => "T_w3",
            Axis::P => "P",
            Axis::A => "a",
            Axis::AErr => "a_err",
            Axis::B => "b",
            Axis::BErr => "b_err",
            Axis::C => "c",
            Axis::CErr => "c_err",
            Axis::Rvalue => "rvalue",
            Axis::Pvalue => "pvalue",
            Axis::DtDx => "dT_dx",
            Axis::DtDxErr => "dT_dx_err",
            Axis::Ts => "T_s",
            Axis::TsErr => "T_s_err",
            Axis::K => "k",
            Axis::Tw => "T_w",
            Axis::TwDiff => "T_w_diff",
            Axis::Flux => "q",
            Axis::FluxErr => "q_err",
            Axis::Power => "Q",
            Axis::Superheat => "DT",
            Axis::SuperheatErr => "DT_err",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::ALL
            .iter()
            .copied()
            .find(|axis| axis.name() == s)
            .ok_or_else(|| AppError::input(format!("Unknown axis `{s}`.")))
    }
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    #[default]
    Float,
    Text,
    Bool,
    Date,
    Timestamp,
    Category,
}

/// OriginLab column designation.
///
/// See <https://www.originlab.com/doc/en/Origin-Help/Worksheet-Column-Designation>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Coldes {
    X,
    #[default]
    Y,
    /// X error bar.
    M,
    /// Y error bar.
    E,
    L,
    N,
}

impl Coldes {
    pub fn letter(self) -> char {
        match self {
            Coldes::X => 'X',
            Coldes::Y => 'Y',
            Coldes::M => 'M',
            Coldes::E => 'E',
            Coldes::L => 'L',
            Coldes::N => 'N',
        }
    }
}

/// Definition of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisSpec {
    #[serde(rename = "name")]
    pub axis: Axis,
    /// Header of this column in the raw run CSVs, if it is read from them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty_name: Option<String>,
    #[serde(default)]
    pub dtype: Dtype,
    #[serde(default)]
    pub index: bool,
    #[serde(default)]
    pub coldes: Coldes,
}

impl AxisSpec {
    pub fn pretty(&self) -> &str {
        self.pretty_name.as_deref().unwrap_or(self.axis.name())
    }
}

/// Resolved registry: ordered specs plus an axis lookup table.
#[derive(Debug, Clone)]
pub struct AxisRegistry {
    specs: Vec<AxisSpec>,
    by_axis: HashMap<Axis, usize>,
}

const INDEX_AXES: [Axis; 3] = [Axis::Trial, Axis::Run, Axis::Time];

impl AxisRegistry {
    /// Build a registry, rejecting malformed definitions.
    pub fn from_specs(specs: Vec<AxisSpec>) -> Result<Self, AppError> {
        let mut by_axis = HashMap::with_capacity(specs.len());
        let mut sources = HashSet::new();

        for (idx, spec) in specs.iter().enumerate() {
            if by_axis.insert(spec.axis, idx).is_some() {
                return Err(AppError::input(format!(
                    "Axis `{}` is defined more than once.",
                    spec.axis
                )));
            }
            if let Some(source) = &spec.source {
                if !sources.insert(source.as_str()) {
                    return Err(AppError::input(format!(
                        "Source column `{source}` is mapped to more than one axis."
                    )));
                }
                if !spec.index && spec.dtype != Dtype::Float {
                    return Err(AppError::input(format!(
                        "Sourced axis `{}` must have dtype `float`.",
                        spec.axis
                    )));
                }
            }
        }

        let index: Vec<Axis> = specs.iter().filter(|s| s.index).map(|s| s.axis).collect();
        if index != INDEX_AXES {
            return Err(AppError::input(
                "The registry must flag exactly `trial`, `run`, `time` (in that order) as index axes.",
            ));
        }

        let registry = Self { specs, by_axis };
        if registry.source(Axis::Time).is_none() {
            return Err(AppError::input("The `time` axis needs a source column."));
        }
        if registry.source(Axis::Trial).is_some() || registry.source(Axis::Run).is_some() {
            return Err(AppError::input(
                "`trial` and `run` come from the directory layout and cannot have source columns.",
            ));
        }
        Ok(registry)
    }

    pub fn specs(&self) -> &[AxisSpec] {
        &self.specs
    }

    pub fn get(&self, axis: Axis) -> Option<&AxisSpec> {
        self.by_axis.get(&axis).map(|&idx| &self.specs[idx])
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.by_axis.contains_key(&axis)
    }

    pub fn source(&self, axis: Axis) -> Option<&str> {
        self.get(axis).and_then(|s| s.source.as_deref())
    }

    pub fn units(&self, axis: Axis) -> &str {
        self.get(axis).map(|s| s.units.as_str()).unwrap_or("")
    }

    pub fn pretty(&self, axis: Axis) -> &str {
        self.get(axis).map(AxisSpec::pretty).unwrap_or(axis.name())
    }

    /// Index axes in table order.
    pub fn index(&self) -> impl Iterator<Item = &AxisSpec> {
        self.specs.iter().filter(|s| s.index)
    }

    /// Non-index axes in table order.
    pub fn columns(&self) -> impl Iterator<Item = &AxisSpec> {
        self.specs.iter().filter(|s| !s.index)
    }

    /// Numeric channels read from the run CSVs (the time index excluded).
    pub fn channels(&self) -> impl Iterator<Item = &AxisSpec> {
        self.specs.iter().filter(|s| !s.index && s.source.is_some())
    }
}

impl Default for AxisRegistry {
    fn default() -> Self {
        let specs = default_specs();
        let by_axis = specs.iter().enumerate().map(|(i, s)| (s.axis, i)).collect();
        Self { specs, by_axis }
    }
}

fn spec(
    axis: Axis,
    source: Option<&str>,
    units: &str,
    pretty: Option<&str>,
    dtype: Dtype,
    coldes: Coldes,
) -> AxisSpec {
    AxisSpec {
        axis,
        source: source.map(str::to_string),
        units: units.to_string(),
        pretty_name: pretty.map(str::to_string),
        dtype,
        index: INDEX_AXES.contains(&axis),
        coldes,
    }
}

fn default_specs() -> Vec<AxisSpec> {
    use Coldes::{E, L, M, N, X, Y};
    use Dtype::{Bool, Category, Date, Float, Text, Timestamp};

    vec![
        spec(Axis::Trial, None, "", Some("Trial"), Date, N),
        spec(Axis::Run, None, "", Some("Run"), Timestamp, N),
        spec(Axis::Time, Some("Time"), "", Some("Time"), Timestamp, N),
        spec(Axis::Group, None, "", Some("Group"), Category, L),
        spec(Axis::Rod, None, "", Some("Rod"), Category, L),
        spec(Axis::Coupon, None, "", Some("Coupon"), Category, L),
        spec(Axis::Sample, None, "", Some("Sample"), Category, L),
        spec(Axis::Joint, None, "", Some("Joint"), Category, L),
        spec(Axis::Monotonic, None, "", Some("Monotonic"), Bool, L),
        spec(Axis::Comment, None, "", Some("Comment"), Text, L),
        spec(Axis::V, Some("V (V)"), "V", None, Float, Y),
        spec(Axis::I, Some("I (A)"), "A", None, Float, Y),
        spec(Axis::T1, Some("T1 (C)"), "C", None, Float, Y),
        spec(Axis::T2, Some("T2 (C)"), "C", None, Float, Y),
        spec(Axis::T3, Some("T3 (C)"), "C", None, Float, Y),
        spec(Axis::T4, Some("T4 (C)"), "C", None, Float, Y),
        spec(Axis::T5, Some("T5 (C)"), "C", None, Float, Y),
        spec(Axis::Tw1, Some("Tw1 (C)"), "C", None, Float, Y),
        spec(Axis::Tw2, Some("Tw2 (C)"), "C", None, Float, Y),
        spec(Axis::Tw3, Some("Tw3 (C)"), "C", None, Float, Y),
        spec(Axis::P, Some("P (psia)"), "psia", None, Float, Y),
        spec(Axis::A, None, "K/m^2", None, Float, Y),
        spec(Axis::AErr, None, "K/m^2", None, Float, E),
        spec(Axis::B, None, "K/m", None, Float, Y),
        spec(Axis::BErr, None, "K/m", None, Float, E),
        spec(Axis::C, None, "C", None, Float, Y),
        spec(Axis::CErr, None, "C", None, Float, E),
        spec(Axis::Rvalue, None, "", Some("r"), Float, Y),
        spec(Axis::Pvalue, None, "", Some("p"), Float, Y),
        spec(Axis::DtDx, None, "K/m", Some("dT/dx"), Float, Y),
        spec(Axis::DtDxErr, None, "K/m", Some("dT/dx_err"), Float, E),
        spec(Axis::Ts, None, "C", None, Float, Y),
        spec(Axis::TsErr, None, "C", None, Float, E),
        spec(Axis::K, None, "W/m-K", None, Float, Y),
        spec(Axis::Tw, None, "C", None, Float, Y),
        spec(Axis::TwDiff, None, "K", Some("T_w,diff"), Float, Y),
        spec(Axis::Flux, None, "W/cm^2", Some("q''"), Float, Y),
        spec(Axis::FluxErr, None, "W/cm^2", Some("q''_err"), Float, E),
        spec(Axis::Power, None, "W", None, Float, Y),
        spec(Axis::Superheat, None, "K", Some("ΔT"), Float, X),
        spec(Axis::SuperheatErr, None, "K", Some("ΔT_err"), Float, M),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_passes_validation() {
        let specs = AxisRegistry::default().specs().to_vec();
        let registry = AxisRegistry::from_specs(specs).unwrap();
        assert_eq!(registry.source(Axis::T1), Some("T1 (C)"));
        assert_eq!(registry.units(Axis::Flux), "W/cm^2");
        assert_eq!(registry.pretty(Axis::Ts), "T_s");
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for axis in Axis::ALL {
            assert_eq!(axis.name().parse::<Axis>().unwrap(), axis);
        }
        assert!("T_7".parse::<Axis>().is_err());
    }

    #[test]
    fn rejects_duplicate_sources() {
        let mut specs = AxisRegistry::default().specs().to_vec();
        let t2 = specs.iter_mut().find(|s| s.axis == Axis::T2).unwrap();
        t2.source = Some("T1 (C)".to_string());
        let err = AxisRegistry::from_specs(specs).unwrap_err();
        assert!(err.message().contains("T1 (C)"));
    }

    #[test]
    fn rejects_missing_time_source() {
        let mut specs = AxisRegistry::default().specs().to_vec();
        specs[2].source = None;
        assert!(AxisRegistry::from_specs(specs).is_err());
    }

    #[test]
    fn channels_exclude_index_and_derived_axes() {
        let registry = AxisRegistry::default();
        let channels: Vec<Axis> = registry.channels().map(|s| s.axis).collect();
        assert!(channels.contains(&Axis::P));
        assert!(!channels.contains(&Axis::Time));
        assert!(!channels.contains(&Axis::Flux));
    }

    #[test]
    fn yaml_spec_uses_canonical_names() {
        let spec: AxisSpec =
            serde_yaml::from_str("name: T_w1\nsource: Tw1 (C)\nunits: C\n").unwrap();
        assert_eq!(spec.axis, Axis::Tw1);
        assert_eq!(spec.coldes, Coldes::Y);
        assert!(!spec.index);
    }
}
