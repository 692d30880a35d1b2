use nalgebra::Vector2;

use crate::dynamics::state::{OutputSample, RocketParameters, SimulationState, G};
use crate::motor::ThrustCurve;
use crate::physics::aerodynamics::{effective_drag, sign};
use crate::physics::propulsion::{mass_flow, specific_impulse};

// ---------------------------------------------------------------------------
// Per-run constants
// ---------------------------------------------------------------------------

/// Everything a step needs that does not change during a run.
#[derive(Debug, Clone, Copy)]
pub struct FlightModel<'a> {
    pub curve: &'a ThrustCurve,
    pub rocket: &'a RocketParameters,
    pub isp: f64,          // s
    pub ramp: f64,         // parachute opening time, s
    pub wind_x: f64,       // downrange wind, m/s
    pub thrust_axis: (f64, f64),
}

impl<'a> FlightModel<'a> {
    pub fn new(curve: &'a ThrustCurve, rocket: &'a RocketParameters, ramp: f64) -> Self {
        Self {
            curve,
            rocket,
            isp: specific_impulse(curve.total_impulse(), rocket.propellant_mass),
            ramp,
            wind_x: rocket.launch.wind_downrange(),
            thrust_axis: rocket.launch.thrust_axis(),
        }
    }
}

// ---------------------------------------------------------------------------
// Semi-implicit Euler step
// ---------------------------------------------------------------------------

/// Advance `state` by `dt` and return the sample describing the step.
///
/// Forces are evaluated at the start of the step; velocity is updated first
/// and the new velocity moves the position. Hitting the ground stops the
/// vehicle dead.
pub fn euler_step(state: &mut SimulationState, model: &FlightModel, dt: f64) -> OutputSample {
    let rocket = model.rocket;

    // --- Thrust ---
    let thrust = model.curve.thrust_at(state.time);

    // --- Parachute deployment ---
    if !state.chute_deployed
        && state.velocity() < 0.0
        && state.altitude() <= rocket.parachute.deploy_altitude
    {
        state.chute_deployed = true;
        state.deploy_started_at = Some(state.time);
    }
    let profile = effective_drag(rocket, state.deploy_started_at, model.ramp, state.time);

    // --- Drag (per axis, opposing motion through the air) ---
    let vz = state.velocity();
    let drag = profile.force(vz, rocket.rho);
    let v_rel_x = state.vel.x - model.wind_x;
    let drag_x = profile.force(v_rel_x, rocket.rho);

    // --- Acceleration ---
    let (axis_x, axis_z) = model.thrust_axis;
    let accel = Vector2::new(
        (thrust * axis_x - sign(v_rel_x) * drag_x) / state.mass,
        (thrust * axis_z - sign(vz) * drag) / state.mass - G,
    );

    // --- Mass flow ---
    let mdot = mass_flow(thrust, model.isp);
    state.mass -= mdot * dt;

    // --- Integrate ---
    state.vel += accel * dt;
    state.pos += state.vel * dt;
    state.time += dt;

    // --- Ground ---
    if state.pos.y < 0.0 {
        state.pos.y = 0.0;
        state.vel = Vector2::zeros();
    }

    OutputSample {
        time: state.time,
        altitude: state.pos.y,
        velocity: state.vel.y,
        acceleration: accel.y,
        thrust,
        drag,
        mass: state.mass,
        mdot,
        chute_deployed: state.chute_deployed,
        downrange: state.pos.x,
        lateral_velocity: state.vel.x,
    }
}
