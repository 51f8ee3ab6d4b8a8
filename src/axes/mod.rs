//! Column/axis registry.
//!
//! Every physical quantity the pipeline reads or produces is an [`Axis`]. The
//! registry maps each axis to its CSV source name, units, display name, dtype,
//! and index flag, and is resolved once per invocation.

pub mod registry;

pub use registry::*;
