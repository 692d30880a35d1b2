pub mod event;
pub mod integrator;
pub mod phase;
pub mod ramp;
pub mod runner;
pub mod sweep;

pub use event::{detect_events, EventKind, FlightEvent};
pub use integrator::{euler_step, FlightModel};
pub use phase::{classify, flight_phase, FlightPhase};
pub use ramp::DeploymentRamp;
pub use runner::{simulate, FlightIntegrator};
pub use sweep::{mass_cases, sweep, SweepResult};
