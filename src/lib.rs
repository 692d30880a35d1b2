pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod motor;
pub mod physics;
pub mod sim;

pub use config::{ConfigError, RunConfig};
pub use dynamics::state::{OutputSample, ParachuteConfig, RocketParameters, SimConfig};
pub use error::{DivergenceReason, Result, SimError};
pub use motor::ThrustCurve;
pub use sim::runner::{simulate, FlightIntegrator};
