//! Command-line parsing for `boil`.
//!
//! Argument parsing and command dispatch stay separate from the reduction
//! code; `app` turns these structs into pipeline calls.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::FitStrategy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "boil", version, about = "Boiling heat-transfer data reduction")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reduce every trial of a project and write the results tables.
    Run(RunArgs),
    /// Load and validate a project without reading any run.
    Validate(ValidateArgs),
    /// Write a synthetic project with a known temperature profile.
    Synth(SynthArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Project YAML file.
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Also write per-run fits to this JSON file.
    #[arg(long = "export-fits", value_name = "JSON")]
    pub export_fits: Option<PathBuf>,

    /// Skip trials whose boiling curve is not monotonic.
    #[arg(long)]
    pub monotonic_only: bool,

    /// Override the project's fit strategy.
    #[arg(long, value_enum)]
    pub fit_strategy: Option<FitStrategy>,
}

#[derive(Debug, Parser, Clone)]
pub struct ValidateArgs {
    /// Project YAML file.
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,
}

#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output directory (created if missing).
    #[arg(value_name = "DIR")]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = 2)]
    pub trials: usize,

    /// Runs per trial.
    #[arg(long, default_value_t = 3)]
    pub runs: usize,

    /// Records per run.
    #[arg(long, default_value_t = 20)]
    pub records: usize,

    /// Records averaged into each steady state.
    #[arg(long, default_value_t = 10)]
    pub window: usize,

    /// Thermocouple noise standard deviation (K).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Profile curvature (K/m^2).
    #[arg(long, default_value_t = 0.0)]
    pub curvature: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_flags() {
        let cli = Cli::parse_from([
            "boil",
            "-vv",
            "run",
            "p.yaml",
            "--export-fits",
            "f.json",
            "--fit-strategy",
            "linear",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.project, PathBuf::from("p.yaml"));
        assert_eq!(args.export_fits, Some(PathBuf::from("f.json")));
        assert_eq!(args.fit_strategy, Some(FitStrategy::Linear));
        assert!(!args.monotonic_only);
    }

    #[test]
    fn synth_defaults() {
        let cli = Cli::parse_from(["boil", "synth", "out"]);
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!((args.trials, args.runs, args.records, args.window), (2, 3, 20, 10));
    }
}
