use log::info;
use rayon::prelude::*;

use crate::dynamics::state::{OutputSample, RocketParameters, SimConfig};
use crate::error::Result;
use crate::motor::ThrustCurve;
use super::ramp::DeploymentRamp;
use super::runner::FlightIntegrator;

/// Result of one case in a parameter sweep.
#[derive(Debug)]
pub struct SweepResult {
    pub rocket: RocketParameters,
    pub outcome: Result<Vec<OutputSample>>,
}

impl SweepResult {
    /// Highest altitude reached, if the run succeeded.
    pub fn apogee(&self) -> Option<f64> {
        self.outcome
            .as_ref()
            .ok()
            .map(|s| s.iter().map(|x| x.altitude).fold(0.0_f64, f64::max))
    }
}

/// Fly every parameter set against the same motor, in parallel.
///
/// Runs are independent; results come back in the order of `cases`.
pub fn sweep(
    cases: &[RocketParameters],
    curve: &ThrustCurve,
    config: &SimConfig,
    ramp: DeploymentRamp,
) -> Vec<SweepResult> {
    info!("sweeping {} parameter sets", cases.len());
    cases
        .par_iter()
        .map(|rocket| SweepResult {
            rocket: *rocket,
            outcome: FlightIntegrator::new(curve, *rocket, *config).with_ramp(ramp).run(),
        })
        .collect()
}

/// Copies of `base` with the ignition mass replaced by each of `masses`.
pub fn mass_cases(base: &RocketParameters, masses: &[f64]) -> Vec<RocketParameters> {
    masses
        .iter()
        .map(|&mass| RocketParameters { mass, ..*base })
        .collect()
}
