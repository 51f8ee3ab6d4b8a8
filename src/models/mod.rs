//! Temperature-profile models along the rod axis.
//!
//! Models are implemented as small, pure functions so the fitters can stay
//! generic over the design matrix.

pub mod model;

pub use model::*;
