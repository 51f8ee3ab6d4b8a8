//! Project configuration.
//!
//! - YAML schema + path resolution (`project`)
//! - validation rules applied before anything reaches the pipeline (`validate`)

pub mod project;
pub mod validate;

pub use project::*;
pub use validate::validate_project;
