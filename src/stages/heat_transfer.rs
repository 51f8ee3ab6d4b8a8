//! Trial-level heat transfer.
//!
//! Per run:
//! - water temperature `T_w`, reconciled from the submerged thermocouples and
//!   the saturation temperature at the measured pressure
//! - rod conductivity `k` at the mean of `T_s` and the thermocouple nearest the
//!   surface
//! - heat flux `q = k·dT/dx` (W/cm²) and heat rate `Q = q·A`
//!
//! Superheat `DT = T_s - T̄_w` uses the mean water temperature of the whole
//! trial, not of the run.

use tracing::{info, warn};

use crate::axes::Axis;
use crate::config::CM2_PER_M2;
use crate::domain::{FittedRun, HeatTransfer, Trial, TrialRun};
use crate::math::Uncertain;
use crate::props::{celsius_to_kelvin, Material, Property};
use crate::stages::{nan_mean, Context};

/// Water temperatures of one run: (bath mean, saturation, reconciled, disagreement).
fn water_temperature(run: &FittedRun, ctx: &Context) -> (f64, f64, f64, f64) {
    let bath = nan_mean(Axis::WATER.iter().map(|&a| run.summary.mean(a)));
    let saturation = ctx.saturation.saturation_temperature(run.summary.mean(Axis::P));
    let reconciled = nan_mean([bath, saturation]);
    (bath, saturation, reconciled, (bath - saturation).abs())
}

/// Conductivity of the rod between the surface and the nearest thermocouple.
fn conductivity(run: &FittedRun, trial: &Trial, ctx: &Context) -> f64 {
    let nearest = trial
        .thermocouple_pos
        .nearest()
        .map(|a| run.summary.mean(a))
        .unwrap_or(f64::NAN);
    let t_mean = celsius_to_kelvin((run.fit.t_s + nearest) / 2.0);
    ctx.properties
        .property(Material::Copper, Property::ThermalConductivity, t_mean)
}

/// Augment every fitted run of a trial with heat transfer quantities.
pub fn aggregate_trial(trial: &Trial, runs: Vec<FittedRun>, ctx: &Context) -> Vec<TrialRun> {
    let area = ctx.project.geometry.cross_sectional_area_cm2();

    let water: Vec<(f64, f64, f64, f64)> =
        runs.iter().map(|run| water_temperature(run, ctx)).collect();
    let trial_water = nan_mean(water.iter().map(|w| w.2));
    info!(trial = %trial.date, runs = runs.len(), water = trial_water, "trial water temperature");

    runs.into_iter()
        .zip(water)
        .map(|(run, (_, _, t_w, t_w_diff))| {
            let k = conductivity(&run, trial, ctx);
            if k.is_nan() && run.fit.converged() {
                warn!(
                    trial = %trial.date,
                    run = %run.summary.run,
                    "conductivity out of table range"
                );
            }

            let gradient = Uncertain::variable(run.fit.dt_dx, run.fit.dt_dx_err, "dT_dx");
            let q = gradient.scale(k / CM2_PER_M2);
            let heat = HeatTransfer {
                k,
                t_w,
                t_w_diff,
                q: q.nominal(),
                q_err: q.std_dev(),
                power: q.nominal() * area,
                superheat: run.fit.t_s - trial_water,
                superheat_err: run.fit.t_s_err,
            };
            TrialRun {
                summary: run.summary,
                fit: run.fit,
                heat,
            }
        })
        .collect()
}
