pub mod state;

pub use state::{
    LaunchConditions, OutputSample, ParachuteConfig, RocketParameters, SimConfig,
    SimulationState, G, G0,
};
