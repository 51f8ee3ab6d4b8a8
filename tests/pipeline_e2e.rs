//! End-to-end: synthetic project on disk -> results files.

use std::fs;
use std::path::PathBuf;

use boiler_reduce::app::pipeline::run_project;
use boiler_reduce::axes::Axis;
use boiler_reduce::config::Project;
use boiler_reduce::data::{write_synthetic_project, SynthConfig, SynthProject};
use boiler_reduce::domain::FitStrategy;
use boiler_reduce::error::EXIT_DATA;
use boiler_reduce::io::read_fits_json;
use boiler_reduce::props::{CoolPropWater, SaturationLookup};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("boil-e2e-{}-{name}", std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

fn synth(name: &str) -> (PathBuf, SynthProject) {
    let dir = scratch(name);
    let synth = write_synthetic_project(&dir, &SynthConfig::default()).unwrap();
    (dir, synth)
}

#[test]
fn two_trials_of_three_runs_reduce_to_six_rows() {
    let (dir, synth) = synth("six");
    let project = Project::load(&synth.project_file).unwrap();
    let fits_path = dir.join("results").join("fits.json");
    let (output, written) = run_project(&project, Some(&fits_path)).unwrap();

    assert_eq!(output.rows.len(), 6);
    assert_eq!(output.reports.len(), 2);
    assert!(output.reports.iter().all(|r| r.runs == 3 && r.failed_fits == 0));
    for row in &output.rows {
        for axis in [Axis::Flux, Axis::Power, Axis::Superheat] {
            assert!(row.float(axis).is_finite(), "{axis} missing in {}", row.run);
        }
    }
    assert_eq!(written.len(), 4);
    for path in &written {
        assert!(path.is_file(), "{} not written", path.display());
    }

    // Fits recover the generating profile.
    for (run, truth) in output.runs.iter().zip(&synth.runs) {
        assert_eq!(run.summary.run, truth.run);
        assert!((run.fit.t_s - truth.t_s).abs() < 1e-6);
        assert!((run.fit.dt_dx - truth.gradient).abs() < 1e-4);
        let expected_q = run.heat.k * truth.gradient / 1e4;
        assert!((run.heat.q - expected_q).abs() < 1e-6);
    }

    let fits = read_fits_json(&fits_path).unwrap();
    assert_eq!(fits.len(), 6);
    assert_eq!(fits[0].strategy, FitStrategy::Quadratic);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn superheat_uses_trial_wide_water_temperature() {
    let (dir, synth) = synth("superheat");
    let project = Project::load(&synth.project_file).unwrap();
    let (output, _) = run_project(&project, None).unwrap();

    let saturation = CoolPropWater.saturation_temperature(14.695_95);
    for trial in &project.trials {
        let truths: Vec<_> = synth.runs.iter().filter(|t| t.trial == trial.date).collect();
        let trial_water =
            truths.iter().map(|t| (t.water + saturation) / 2.0).sum::<f64>() / truths.len() as f64;

        for truth in &truths {
            let row = output
                .rows
                .iter()
                .find(|r| r.trial == trial.date && r.run == truth.run)
                .unwrap();
            let dt = row.float(Axis::Superheat);
            assert!((dt - (truth.t_s - trial_water)).abs() < 1e-6);

            // Runs have different water temperatures, so a per-run mean would differ.
            let per_run = truth.t_s - row.float(Axis::Tw);
            if (row.float(Axis::Tw) - trial_water).abs() > 0.1 {
                assert!((dt - per_run).abs() > 0.1);
            }
        }
    }
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn results_files_carry_units_and_escapes() {
    let (dir, synth) = synth("files");
    let project = Project::load(&synth.project_file).unwrap();
    run_project(&project, None).unwrap();

    let simple = fs::read_to_string(&project.dirs.results_file).unwrap();
    let lines: Vec<&str> = simple.lines().collect();
    assert_eq!(lines.len(), 2 + 6);
    assert!(lines[0].starts_with("trial,run,time,group"));
    assert!(lines[1].contains("W/cm^2"));

    let origin = fs::read_to_string(&project.dirs.originlab_results_file).unwrap();
    let header: Vec<&str> = origin.lines().take(2).collect();
    assert!(header[0].starts_with("Trial,Run,Time"));
    assert!(header[0].contains(r"T\-(w1)"));
    assert!(header[1].contains(r"W/cm\+(2)"));

    let coldes = fs::read_to_string(&project.dirs.coldes_file).unwrap();
    let width = lines[0].split(',').count();
    assert_eq!(coldes.len(), width);
    assert!(coldes.starts_with("NNN"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn linear_strategy_runs_end_to_end() {
    let (dir, synth) = synth("linear");
    let mut project = Project::load(&synth.project_file).unwrap();
    project.params.fit_strategy = FitStrategy::Linear;
    let (output, _) = run_project(&project, None).unwrap();

    assert_eq!(output.rows.len(), 6);
    for (run, truth) in output.runs.iter().zip(&synth.runs) {
        assert_eq!(run.fit.strategy, FitStrategy::Linear);
        assert!((run.fit.dt_dx - truth.gradient).abs() < 1e-6);
        assert!((run.fit.rvalue - 1.0).abs() < 1e-9);
    }
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn run_shorter_than_window_aborts() {
    let (dir, synth) = synth("short");
    let yaml = fs::read_to_string(&synth.project_file).unwrap();
    assert!(yaml.contains("records_to_average: 10"));
    let yaml = yaml.replace("records_to_average: 10", "records_to_average: 30");
    fs::write(&synth.project_file, yaml).unwrap();

    let project = Project::load(&synth.project_file).unwrap();
    let err = run_project(&project, None).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_DATA);
    assert!(err.message().contains(&synth.runs[0].run), "{}", err.message());
    assert!(!project.dirs.results_file.exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn monotonic_only_skips_trials() {
    let (dir, synth) = synth("monotonic");
    let mut project = Project::load(&synth.project_file).unwrap();
    project.trials[1].monotonic = false;
    project.params.monotonic_only = true;
    let (output, _) = run_project(&project, None).unwrap();

    assert_eq!(output.rows.len(), 3);
    assert_eq!(output.skipped, vec![project.trials[1].date]);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn out_of_range_water_temperature_follows_policy() {
    // Water rises 1 C per run from 98 C, so the fifth run reads 102 C.
    let dir = scratch("water");
    let config = SynthConfig {
        runs: 5,
        ..SynthConfig::default()
    };
    let synth = write_synthetic_project(&dir, &config).unwrap();
    let hot = &synth.runs[4];
    assert_eq!(hot.water, 102.0);

    let yaml = fs::read_to_string(&synth.project_file).unwrap();
    assert!(yaml.contains("invalid_data: warn"));
    let (output, _) = run_project(&Project::load(&synth.project_file).unwrap(), None).unwrap();
    assert_eq!(output.rows.len(), 10);

    fs::write(
        &synth.project_file,
        yaml.replace("invalid_data: warn", "invalid_data: abort"),
    )
    .unwrap();
    let project = Project::load(&synth.project_file).unwrap();
    let err = run_project(&project, None).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_DATA);
    assert!(err.message().contains(&hot.run), "{}", err.message());

    fs::remove_dir_all(&dir).ok();
}
