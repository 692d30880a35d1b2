use serde::Serialize;

use crate::dynamics::state::OutputSample;
use super::phase::BURNOUT_THRUST;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Liftoff,
    Burnout,
    Apogee,
    ChuteDeployment,
    Landing,
}

/// A discrete event found in a sample sequence.
#[derive(Debug, Clone, Serialize)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub sample: OutputSample,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &OutputSample, current: &OutputSample) -> Option<EventKind>;
}

/// Fires once when the rocket first leaves the ground.
#[derive(Debug, Default)]
pub struct LiftoffDetector {
    fired: bool,
}

impl EventDetector for LiftoffDetector {
    fn check(&mut self, prev: &OutputSample, current: &OutputSample) -> Option<EventKind> {
        if !self.fired && prev.altitude <= 0.0 && current.altitude > 0.0 {
            self.fired = true;
            Some(EventKind::Liftoff)
        } else {
            None
        }
    }
}

/// Fires once when thrust drops to burnout level after burning.
#[derive(Debug, Default)]
pub struct BurnoutDetector {
    fired: bool,
}

impl EventDetector for BurnoutDetector {
    fn check(&mut self, prev: &OutputSample, current: &OutputSample) -> Option<EventKind> {
        if !self.fired && prev.thrust > BURNOUT_THRUST && current.thrust <= BURNOUT_THRUST {
            self.fired = true;
            Some(EventKind::Burnout)
        } else {
            None
        }
    }
}

/// Detects apogee (vertical velocity going from rising to not rising).
#[derive(Debug, Default)]
pub struct ApogeeDetector {
    fired: bool,
}

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &OutputSample, current: &OutputSample) -> Option<EventKind> {
        if !self.fired && prev.velocity > 0.0 && current.velocity <= 0.0 && current.altitude > 0.0
        {
            self.fired = true;
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Fires when the parachute flag flips on.
#[derive(Debug, Default)]
pub struct DeploymentDetector;

impl EventDetector for DeploymentDetector {
    fn check(&mut self, prev: &OutputSample, current: &OutputSample) -> Option<EventKind> {
        (!prev.chute_deployed && current.chute_deployed).then_some(EventKind::ChuteDeployment)
    }
}

/// Fires when an airborne rocket comes to rest on the ground.
#[derive(Debug, Default)]
pub struct LandingDetector;

impl EventDetector for LandingDetector {
    fn check(&mut self, prev: &OutputSample, current: &OutputSample) -> Option<EventKind> {
        let landed = current.altitude == 0.0 && current.velocity <= 0.0;
        (prev.altitude > 0.0 && landed).then_some(EventKind::Landing)
    }
}

/// Run the standard detectors over a whole flight.
///
/// The pad is taken as the state before the first sample, so a first step
/// that leaves the ground reports liftoff and one that deploys reports the
/// deployment.
pub fn detect_events(samples: &[OutputSample]) -> Vec<FlightEvent> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    let pad = OutputSample {
        time: 0.0,
        altitude: 0.0,
        velocity: 0.0,
        acceleration: 0.0,
        thrust: 0.0,
        drag: 0.0,
        mass: first.mass + first.mdot * first.time,
        mdot: 0.0,
        chute_deployed: false,
        downrange: 0.0,
        lateral_velocity: 0.0,
    };

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(LiftoffDetector::default()),
        Box::new(BurnoutDetector::default()),
        Box::new(ApogeeDetector::default()),
        Box::new(DeploymentDetector),
        Box::new(LandingDetector),
    ];

    let mut events = Vec::new();
    let mut prev = &pad;
    for current in samples {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(prev, current) {
                events.push(FlightEvent { time: current.time, kind, sample: *current });
            }
        }
        prev = current;
    }
    events
}
