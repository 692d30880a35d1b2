use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::dynamics::state::{OutputSample, RocketParameters};
use crate::motor::ThrustCurve;
use crate::sim::event::{detect_events, EventKind};

/// Summary statistics computed from a flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub apogee_m: f64,
    pub apogee_time: f64,
    pub max_speed: f64,
    pub max_accel: f64,
    pub flight_time: f64,
    pub burnout_time: Option<f64>,
    pub burnout_altitude: Option<f64>,
    pub deployment_time: Option<f64>,
    pub deployment_drag: Option<f64>,
    /// Vertical velocity on the last airborne sample, m/s.
    pub descent_rate: f64,
    pub downrange_m: f64,
    pub initial_mass: f64,
    pub final_mass: f64,
    pub total_impulse: f64,
    pub burn_time: f64,
}

impl FlightSummary {
    /// Compute the summary of a run of `rocket` flown with `curve`.
    ///
    /// Returns `None` for an empty sample sequence.
    pub fn from_samples(
        samples: &[OutputSample],
        rocket: &RocketParameters,
        curve: &ThrustCurve,
    ) -> Option<Self> {
        let last = samples.last()?;

        let apogee = samples
            .iter()
            .max_by(|a, b| a.altitude.total_cmp(&b.altitude))?;

        let max_speed = samples
            .iter()
            .map(|s| s.velocity.hypot(s.lateral_velocity))
            .fold(0.0_f64, f64::max);

        let max_accel = samples
            .iter()
            .map(|s| s.acceleration.abs())
            .fold(0.0_f64, f64::max);

        let events = detect_events(samples);
        let event = |kind: EventKind| events.iter().find(|e| e.kind == kind);
        let burnout = event(EventKind::Burnout);
        let deployment = event(EventKind::ChuteDeployment);

        let descent_rate = if samples.len() >= 2 {
            samples[samples.len() - 2].velocity
        } else {
            0.0
        };

        Some(FlightSummary {
            apogee_m: apogee.altitude,
            apogee_time: apogee.time,
            max_speed,
            max_accel,
            flight_time: last.time,
            burnout_time: burnout.map(|e| e.time),
            burnout_altitude: burnout.map(|e| e.sample.altitude),
            deployment_time: deployment.map(|e| e.time),
            deployment_drag: deployment.map(|e| e.sample.drag),
            descent_rate,
            downrange_m: last.downrange,
            initial_mass: rocket.mass,
            final_mass: last.mass,
            total_impulse: curve.total_impulse(),
            burn_time: curve.burn_time(),
        })
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: W, summary: &FlightSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}

/// Write summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &FlightSummary) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_summary(file, summary)?;
    Ok(())
}
