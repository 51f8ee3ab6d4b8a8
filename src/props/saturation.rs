//! Saturation temperature of water from pressure.
//!
//! Backed by CoolProp through `rfluids`: saturated liquid water (quality 0)
//! at the measured absolute pressure.

use rfluids::prelude::*;
use tracing::debug;

use crate::props::kelvin_to_celsius;

/// `temperature(pressure) → saturation temperature`.
pub trait SaturationLookup {
    /// Saturation temperature (C) at absolute pressure `psia`. NaN when out of range.
    fn saturation_temperature(&self, psia: f64) -> f64;
}

/// (Pa/psi)
pub const PA_PER_PSI: f64 = 6_894.757_293_168;

/// Triple-point pressure (Pa).
const P_MIN: f64 = 611.655;
/// Critical pressure (Pa).
const P_MAX: f64 = 22.064e6;

/// Water saturation curve from the CoolProp backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoolPropWater;

impl CoolPropWater {
    /// `T_sat` (K) at `p_pa` (Pa), or `None` outside the two-phase region.
    pub fn saturation_temperature_k(&self, p_pa: f64) -> Option<f64> {
        if !(P_MIN..=P_MAX).contains(&p_pa) {
            return None;
        }
        let mut fluid = Fluid::from(Pure::Water)
            .in_state(FluidInput::pressure(p_pa), FluidInput::quality(0.0))
            .map_err(|e| debug!(p_pa, "rfluids error: {e}"))
            .ok()?;
        let t = fluid
            .temperature()
            .map_err(|e| debug!(p_pa, "rfluids error getting temperature: {e}"))
            .ok()?;
        t.is_finite().then_some(t)
    }
}

impl SaturationLookup for CoolPropWater {
    fn saturation_temperature(&self, psia: f64) -> f64 {
        self.saturation_temperature_k(psia * PA_PER_PSI)
            .map(kelvin_to_celsius)
            .unwrap_or(f64::NAN)
    }
}
