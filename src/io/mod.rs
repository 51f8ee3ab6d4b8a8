//! Input/output helpers.
//!
//! - run CSV ingest (`ingest`)
//! - result table CSV + column designations (`export`)
//! - per-run fit JSON (`fits`)

pub mod export;
pub mod fits;
pub mod ingest;

pub use export::*;
pub use fits::*;
pub use ingest::*;
