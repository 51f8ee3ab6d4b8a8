//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - trial metadata (`Trial`, `Rod`, `Coupon`, ..., `ThermocouplePositions`)
//! - per-run records and steady-state summaries (`Record`, `RunSummary`)
//! - per-run fit outputs and per-trial heat transfer (`RunFit`, `HeatTransfer`)
//! - flattened result rows (`ResultRow`, `Cell`)

pub mod types;

pub use types::*;
