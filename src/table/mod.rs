//! The result table and its export formatting.
//!
//! - `frame`: `ResultTable` built from result rows in registry column order
//! - `units`: `"name (units)"` label splitting and joining
//! - `originlab`: the ordered transforms producing the OriginLab variant

pub mod frame;
pub mod originlab;
pub mod units;

pub use frame::*;
pub use originlab::*;
pub use units::*;
