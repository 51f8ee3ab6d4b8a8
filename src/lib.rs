//! `boiler-reduce` library crate.
//!
//! Reduces thermocouple CSV logs from boiling heat-transfer trials into a single
//! results table. The binary (`boil`) is a thin wrapper around this library so that:
//!
//! - the reduction pipeline is testable without spawning processes
//! - every stage takes its configuration explicitly (no global project state)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod axes;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod props;
pub mod report;
pub mod stages;
pub mod table;
