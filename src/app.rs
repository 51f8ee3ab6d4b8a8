//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads and validates the project
//! - runs the reduction pipeline and writes its outputs
//! - prints the summary

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, RunArgs, SynthArgs, ValidateArgs};
use crate::config::Project;
use crate::data::{write_synthetic_project, SynthConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `boil` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Validate(args) => handle_validate(args),
        Command::Synth(args) => handle_synth(args),
    }
}

/// `RUST_LOG` wins; otherwise `-v` picks the level. Logs go to stderr.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let mut project = Project::load(&args.project)?;
    if args.monotonic_only {
        project.params.monotonic_only = true;
    }
    if let Some(strategy) = args.fit_strategy {
        project.params.fit_strategy = strategy;
    }

    let (output, written) = pipeline::run_project(&project, args.export_fits.as_deref())?;
    println!(
        "{}",
        crate::report::format_summary(&output.reports, &output.skipped, &written)
    );
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<(), AppError> {
    let project = Project::load(&args.project)?;
    println!("Project '{}' is valid.", args.project.display());
    println!("Results: {}", project.dirs.results.display());
    for trial in &project.trials {
        let dir = project.dirs.trial_dir(trial.date);
        let status = if dir.is_dir() { "ok" } else { "missing" };
        println!(
            "- {} ({} thermocouples): {} [{status}]",
            trial.date,
            trial.thermocouple_pos.len(),
            dir.display()
        );
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SynthConfig {
        trials: args.trials,
        runs: args.runs,
        records: args.records,
        window: args.window,
        noise: args.noise,
        curvature: args.curvature,
        seed: args.seed,
    };
    let synth = write_synthetic_project(&args.out_dir, &config)?;
    println!(
        "Wrote {} runs; project file: {}",
        synth.runs.len(),
        synth.project_file.display()
    );
    Ok(())
}
