//! Project file schema and the resolved, validated `Project`.
//!
//! A project is a single YAML file:
//!
//! ```yaml
//! dirs:
//!   trials: trials
//!   results: results
//!   directory_per_trial: data
//! params:
//!   records_to_average: 60
//! geometry:
//!   diameter: 0.009525
//! trials:
//!   - date: 2022-09-14
//!     rod: X
//!     ...
//! ```
//!
//! Relative directories are resolved against `dirs.base`, which itself defaults
//! to the directory containing the YAML file.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::axes::{AxisRegistry, AxisSpec};
use crate::config::validate::validate_project;
use crate::domain::{FitStrategy, Trial};
use crate::error::AppError;

/// (cm/m)
pub const CM_PER_M: f64 = 100.0;
/// ((cm/m)^2)
pub const CM2_PER_M2: f64 = CM_PER_M * CM_PER_M;

/// The project file as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    pub dirs: Dirs,
    pub params: Params,
    #[serde(default)]
    pub geometry: Geometry,
    pub trials: Vec<Trial>,
    /// Full replacement of the built-in column registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<Vec<AxisSpec>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dirs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,
    /// Directory holding one folder per trial, named by ISO date.
    pub trials: PathBuf,
    /// Output directory, created if missing.
    pub results: PathBuf,
    /// Path of the run CSVs relative to each trial folder.
    #[serde(default = "default_directory_per_trial")]
    pub directory_per_trial: PathBuf,
    #[serde(default = "default_results_file")]
    pub results_file: PathBuf,
    #[serde(default = "default_originlab_results_file")]
    pub originlab_results_file: PathBuf,
    #[serde(default = "default_coldes_file")]
    pub coldes_file: PathBuf,
}

fn default_directory_per_trial() -> PathBuf {
    PathBuf::from("data")
}

fn default_results_file() -> PathBuf {
    PathBuf::from("results.csv")
}

fn default_originlab_results_file() -> PathBuf {
    PathBuf::from("results_originlab.csv")
}

fn default_coldes_file() -> PathBuf {
    PathBuf::from("originlab_coldes.txt")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Number of trailing records averaged into the steady state of each run.
    pub records_to_average: usize,
    #[serde(default)]
    pub fit_strategy: FitStrategy,
    /// Two-sided confidence level used to scale fit standard errors.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Skip trials whose boiling curve is not monotonic.
    #[serde(default)]
    pub monotonic_only: bool,
    /// Accepted steady-state range of the submerged thermocouples (C).
    #[serde(default = "default_water_range")]
    pub water_range: [f64; 2],
    /// What to do with runs whose water temperatures fall outside `water_range`.
    #[serde(default)]
    pub invalid_data: InvalidData,
}

fn default_confidence() -> f64 {
    0.95
}

fn default_water_range() -> [f64; 2] {
    [95.0, 101.0]
}

/// Handling of steady-state data that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidData {
    /// Log every violation and keep the run.
    #[default]
    Warn,
    /// Fail the invocation on the first violation.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Geometry {
    /// Rod diameter (m).
    #[serde(default = "default_diameter")]
    pub diameter: f64,
}

fn default_diameter() -> f64 {
    0.009525 // 3/8"
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            diameter: default_diameter(),
        }
    }
}

impl Geometry {
    /// Cross-sectional area of the rod (cm^2).
    pub fn cross_sectional_area_cm2(&self) -> f64 {
        let diameter = self.diameter * CM_PER_M;
        PI / 4.0 * diameter * diameter
    }
}

/// Directories with every relative path resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDirs {
    pub base: PathBuf,
    pub trials: PathBuf,
    pub results: PathBuf,
    pub directory_per_trial: PathBuf,
    pub results_file: PathBuf,
    pub originlab_results_file: PathBuf,
    pub coldes_file: PathBuf,
}

impl ResolvedDirs {
    fn resolve(dirs: &Dirs, yaml_dir: &Path) -> Self {
        let base = match &dirs.base {
            Some(base) => yaml_dir.join(base),
            None => yaml_dir.to_path_buf(),
        };
        let trials = base.join(&dirs.trials);
        let results = base.join(&dirs.results);
        Self {
            results_file: results.join(&dirs.results_file),
            originlab_results_file: results.join(&dirs.originlab_results_file),
            coldes_file: results.join(&dirs.coldes_file),
            directory_per_trial: dirs.directory_per_trial.clone(),
            base,
            trials,
            results,
        }
    }

    /// Folder containing the run CSVs of the trial on `date`.
    pub fn trial_dir(&self, date: NaiveDate) -> PathBuf {
        self.trials
            .join(date.format("%Y-%m-%d").to_string())
            .join(&self.directory_per_trial)
    }
}

/// Validated configuration, constructed once and passed to every stage.
#[derive(Debug, Clone)]
pub struct Project {
    pub dirs: ResolvedDirs,
    pub params: Params,
    pub geometry: Geometry,
    pub trials: Vec<Trial>,
    pub registry: AxisRegistry,
}

impl Project {
    /// Load, resolve and validate a project YAML file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::input(format!("Failed to read project file '{}': {e}", path.display()))
        })?;
        let file: ProjectFile = serde_yaml::from_str(&content).map_err(|e| {
            AppError::input(format!("Invalid project file '{}': {e}", path.display()))
        })?;
        let yaml_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_file(file, yaml_dir)
    }

    pub fn from_file(file: ProjectFile, yaml_dir: &Path) -> Result<Self, AppError> {
        let registry = match file.axes {
            Some(specs) => AxisRegistry::from_specs(specs)?,
            None => AxisRegistry::default(),
        };
        let project = Self {
            dirs: ResolvedDirs::resolve(&file.dirs, yaml_dir),
            params: file.params,
            geometry: file.geometry,
            trials: file.trials,
            registry,
        };
        validate_project(&project)?;
        Ok(project)
    }

    /// Look up a trial by its date.
    pub fn trial(&self, date: NaiveDate) -> Option<&Trial> {
        self.trials.iter().find(|t| t.date == date)
    }
}
