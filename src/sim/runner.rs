use log::{debug, info, warn};

use crate::dynamics::state::{OutputSample, RocketParameters, SimConfig, SimulationState};
use crate::error::{DivergenceReason, Result, SimError};
use crate::motor::ThrustCurve;
use super::integrator::{euler_step, FlightModel};
use super::ramp::DeploymentRamp;

// ---------------------------------------------------------------------------
// Flight integrator
// ---------------------------------------------------------------------------

/// Runs one flight from the pad to touchdown.
///
/// Holds only immutable inputs; every call to [`run`](Self::run) builds and
/// owns its own [`SimulationState`], so one integrator can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct FlightIntegrator<'a> {
    curve: &'a ThrustCurve,
    rocket: RocketParameters,
    config: SimConfig,
    ramp: DeploymentRamp,
}

impl<'a> FlightIntegrator<'a> {
    pub fn new(curve: &'a ThrustCurve, rocket: RocketParameters, config: SimConfig) -> Self {
        Self {
            curve,
            rocket,
            config,
            ramp: DeploymentRamp::default(),
        }
    }

    pub fn with_ramp(mut self, ramp: DeploymentRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn rocket(&self) -> &RocketParameters {
        &self.rocket
    }

    pub fn curve(&self) -> &ThrustCurve {
        self.curve
    }

    /// Integrate until the rocket is back on the ground.
    ///
    /// Inputs are validated before the first step. The returned samples are
    /// in time order, one per step; the last one is on the ground.
    pub fn run(&self) -> Result<Vec<OutputSample>> {
        self.rocket.validate()?;
        self.config.validate()?;
        self.ramp.validate()?;

        let ramp = self.ramp.duration();
        let model = FlightModel::new(self.curve, &self.rocket, ramp);
        let dt = self.config.dt;
        debug!(
            "starting run: m0={} kg, Cd={}, A={} m^2, rho={} kg/m^3, dt={} s, Isp={:.2} s, ramp={:.2} s",
            self.rocket.mass, self.rocket.cd, self.rocket.area, self.rocket.rho, dt, model.isp, ramp
        );

        let mut state = SimulationState::at_rest(self.rocket.mass);
        let capacity = self.config.max_steps.min(((120.0 / dt) as usize).max(1));
        let mut samples = Vec::with_capacity(capacity);

        for step in 1..=self.config.max_steps {
            let was_deployed = state.chute_deployed;
            let sample = euler_step(&mut state, &model, dt);

            if !was_deployed && state.chute_deployed {
                debug!(
                    "parachute deployed at t={:.2}s, alt={:.1}m, v={:.1}m/s",
                    sample.time, sample.altitude, sample.velocity
                );
            }

            let failure = if !state.is_finite() {
                Some(DivergenceReason::NonFinite)
            } else if state.mass <= 0.0 {
                Some(DivergenceReason::MassDepleted)
            } else {
                None
            };
            if let Some(reason) = failure {
                return Err(self.diverged(reason, step, state.time, samples));
            }

            samples.push(sample);

            if state.is_landed() {
                info!(
                    "landed after {} steps at t={:.2}s, {:.1} m downrange",
                    step, state.time, state.pos.x
                );
                return Ok(samples);
            }
        }

        Err(self.diverged(
            DivergenceReason::StepCapExceeded,
            self.config.max_steps,
            state.time,
            samples,
        ))
    }

    fn diverged(
        &self,
        reason: DivergenceReason,
        steps: usize,
        time: f64,
        samples: Vec<OutputSample>,
    ) -> SimError {
        warn!("run abandoned after {} steps at t={:.2}s: {}", steps, time, reason);
        SimError::DivergedSimulation {
            reason,
            steps,
            time,
            partial: if self.config.keep_partial { samples } else { Vec::new() },
        }
    }
}

/// Run one flight with the default deployment ramp (convenience wrapper).
pub fn simulate(
    curve: &ThrustCurve,
    rocket: &RocketParameters,
    config: &SimConfig,
) -> Result<Vec<OutputSample>> {
    FlightIntegrator::new(curve, *rocket, *config).run()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
