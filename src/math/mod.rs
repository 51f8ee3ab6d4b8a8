//! Mathematical utilities: least squares, the Student-t distribution, and
//! first-order uncertainty propagation.

pub mod ols;
pub mod student_t;
pub mod uncertain;

pub use ols::*;
pub use uncertain::Uncertain;
