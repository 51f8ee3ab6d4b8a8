//! Deterministic synthetic project generation.
//!
//! Writes a project YAML plus one folder of run CSVs per trial. Every run
//! follows a known rod profile
//!
//! ```text
//! T(x) = T_s + g·x + h·x²
//! ```
//!
//! with per-run water temperature, so results can be checked against the
//! generating values. Noise is Gaussian and seeded.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::axes::{Axis, AxisRegistry};
use crate::config::{Dirs, Geometry, InvalidData, Params, ProjectFile};
use crate::domain::{Coupon, FitStrategy, Group, Joint, Rod, Sample, ThermocouplePositions, Trial};
use crate::error::{AppError, EXIT_INTERNAL};

/// Positions (m) of `T_1` … `T_5`. The project maps the first three.
const POSITIONS: [(Axis, f64); 5] = [
    (Axis::T1, 0.0),
    (Axis::T2, 0.01),
    (Axis::T3, 0.02),
    (Axis::T4, 0.03),
    (Axis::T5, 0.04),
];
const MAPPED: usize = 3;

/// One atmosphere (psia).
const PRESSURE: f64 = 14.695_95;

#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub trials: usize,
    pub runs: usize,
    pub records: usize,
    pub window: usize,
    /// Standard deviation of thermocouple noise (K).
    pub noise: f64,
    /// Profile curvature `h` (K/m²).
    pub curvature: f64,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            trials: 2,
            runs: 3,
            records: 20,
            window: 10,
            noise: 0.0,
            curvature: 0.0,
            seed: 42,
        }
    }
}

/// Generating values of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTruth {
    pub trial: NaiveDate,
    pub run: String,
    pub t_s: f64,
    pub gradient: f64,
    pub water: f64,
}

#[derive(Debug, Clone)]
pub struct SynthProject {
    pub project_file: PathBuf,
    pub runs: Vec<RunTruth>,
}

fn first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 9, 14).unwrap_or_default()
}

fn trial(date: NaiveDate, index: usize) -> Trial {
    Trial {
        date,
        rod: [Rod::X, Rod::Y, Rod::W][index % 3],
        coupon: [Coupon::A1, Coupon::A2, Coupon::A3][index % 3],
        sample: if index % 2 == 0 { Sample::NA } else { Sample::B3 },
        group: [Group::Control, Group::Porous, Group::Hybrid][index % 3],
        monotonic: true,
        joint: [Joint::Solder, Joint::Paste, Joint::Epoxy][index % 3],
        comment: format!("synthetic trial {}", index + 1),
        thermocouple_pos: ThermocouplePositions::new(POSITIONS[..MAPPED].to_vec()),
    }
}

/// Write a synthetic project under `out_dir`.
pub fn write_synthetic_project(
    out_dir: &Path,
    config: &SynthConfig,
) -> Result<SynthProject, AppError> {
    if config.trials == 0 || config.runs == 0 {
        return Err(AppError::input("Synthetic projects need at least one trial and one run."));
    }
    if config.window == 0 || config.records < config.window {
        return Err(AppError::input("`records` must be at least `window`, which must be > 0."));
    }
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::input(format!("Invalid noise level {}: {e}", config.noise)))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let registry = AxisRegistry::default();
    let trials: Vec<Trial> = (0..config.trials)
        .map(|i| trial(first_date() + Duration::days(i as i64), i))
        .collect();
    let file = ProjectFile {
        dirs: Dirs {
            base: None,
            trials: PathBuf::from("trials"),
            results: PathBuf::from("results"),
            directory_per_trial: PathBuf::from("data"),
            results_file: PathBuf::from("results.csv"),
            originlab_results_file: PathBuf::from("results_originlab.csv"),
            coldes_file: PathBuf::from("originlab_coldes.txt"),
        },
        params: Params {
            records_to_average: config.window,
            fit_strategy: FitStrategy::Quadratic,
            confidence: 0.95,
            monotonic_only: false,
            water_range: [95.0, 101.0],
            invalid_data: InvalidData::Warn,
        },
        geometry: Geometry::default(),
        trials: trials.clone(),
        axes: None,
    };

    let mut truth = Vec::new();
    for (i, trial) in trials.iter().enumerate() {
        let dir = out_dir
            .join(&file.dirs.trials)
            .join(trial.date.format("%Y-%m-%d").to_string())
            .join(&file.dirs.directory_per_trial);
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", dir.display())))?;

        for j in 0..config.runs {
            let start = trial
                .date
                .and_hms_opt(10, 0, 0)
                .ok_or_else(|| AppError::new(EXIT_INTERNAL, "Invalid run start time."))?
                + Duration::minutes(10 * j as i64);
            let run = RunTruth {
                trial: trial.date,
                run: start.format("%Y-%m-%dT%H-%M-%S").to_string(),
                t_s: 105.0 + 5.0 * j as f64 + i as f64,
                gradient: 500.0 + 250.0 * j as f64,
                water: 98.0 + j as f64,
            };

            let path = dir.join(format!("{}.csv", run.run));
            let file = File::create(&path).map_err(|e| {
                AppError::input(format!("Failed to create '{}': {e}", path.display()))
            })?;
            let mut writer = csv::Writer::from_writer(file);
            let write_err = |e: csv::Error| {
                AppError::input(format!("Failed to write '{}': {e}", path.display()))
            };

            let mut header = vec![registry.source(Axis::Time).unwrap_or("Time").to_string()];
            header.extend(registry.channels().filter_map(|s| s.source.clone()));
            writer.write_record(&header).map_err(write_err)?;

            for k in 0..config.records {
                let time = (start + Duration::seconds(k as i64)).format("%Y-%m-%dT%H:%M:%S");
                let mut record = vec![time.to_string()];
                for spec in registry.channels() {
                    let value = channel_value(spec.axis, &run, config.curvature)
                        + noise_for(spec.axis, &normal, &mut rng);
                    record.push(value.to_string());
                }
                writer.write_record(&record).map_err(write_err)?;
            }
            writer.flush().map_err(|e| {
                AppError::input(format!("Failed to flush '{}': {e}", path.display()))
            })?;
            truth.push(run);
        }
    }

    let yaml = serde_yaml::to_string(&file)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to serialize project: {e}")))?;
    let project_file = out_dir.join("project.yaml");
    fs::write(&project_file, yaml).map_err(|e| {
        AppError::input(format!("Failed to write '{}': {e}", project_file.display()))
    })?;

    Ok(SynthProject {
        project_file,
        runs: truth,
    })
}

fn channel_value(axis: Axis, run: &RunTruth, curvature: f64) -> f64 {
    if let Some(&(_, x)) = POSITIONS.iter().find(|(a, _)| *a == axis) {
        return run.t_s + run.gradient * x + curvature * x * x;
    }
    match axis {
        Axis::Tw1 | Axis::Tw2 | Axis::Tw3 => run.water,
        Axis::P => PRESSURE,
        Axis::V => 20.0,
        Axis::I => 0.01 * run.gradient,
        _ => f64::NAN,
    }
}

fn noise_for(axis: Axis, normal: &Normal<f64>, rng: &mut StdRng) -> f64 {
    let thermocouple = POSITIONS.iter().any(|(a, _)| *a == axis) || Axis::WATER.contains(&axis);
    if thermocouple { normal.sample(rng) } else { 0.0 }
}
