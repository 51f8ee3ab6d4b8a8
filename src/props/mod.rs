//! Physical property lookups.
//!
//! Stages only see the two traits here, so tests can substitute fixed tables.

pub mod material;
pub mod saturation;

pub use material::*;
pub use saturation::*;

/// (K)
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius_to_kelvin(t: f64) -> f64 {
    t + KELVIN_OFFSET
}

pub fn kelvin_to_celsius(t: f64) -> f64 {
    t - KELVIN_OFFSET
}
