//! TOML run files.
//!
//! ```toml
//! [rocket]
//! mass = 5.0
//! cd = 0.7
//! area = 0.00456
//!
//! [parachute]
//! deploy_altitude = 300.0
//! cd = 1.5
//! area = 0.5
//!
//! [motor]
//! thrust_curve = "motors/J350.eng"
//!
//! [simulation]
//! dt = 0.05
//! ramp_seed = 42
//! ```
//!
//! Every table and field is optional; missing values take the defaults of
//! the reference rocket.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::dynamics::state::{
    LaunchConditions, ParachuteConfig, RocketParameters, SimConfig, DEFAULT_DEPLOY_ALTITUDE,
    DEFAULT_MAX_STEPS,
};
use crate::sim::ramp::{DeploymentRamp, DEFAULT_RAMP};

/// Errors that can occur while loading a run file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RocketTable {
    pub mass: f64,
    pub cd: f64,
    pub area: f64,
    pub rho: f64,
    pub propellant_mass: f64,
}

impl Default for RocketTable {
    fn default() -> Self {
        Self {
            mass: 5.0,
            cd: 0.7,
            area: 0.004_56,
            rho: 1.225,
            propellant_mass: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParachuteTable {
    pub deploy_altitude: f64,
    pub cd: Option<f64>,
    pub area: Option<f64>,
}

impl Default for ParachuteTable {
    fn default() -> Self {
        Self {
            deploy_altitude: DEFAULT_DEPLOY_ALTITUDE,
            cd: None,
            area: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchTable {
    pub angle_deg: f64,
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotorTable {
    /// CSV or RASP file; the built-in curve when absent.
    pub thrust_curve: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationTable {
    pub dt: f64,
    pub max_steps: usize,
    pub keep_partial: bool,
    pub ramp_seconds: f64,
    /// Draw the opening time from `[ramp_min, ramp_max]` with this seed
    /// instead of using `ramp_seconds`.
    pub ramp_seed: Option<u64>,
    pub ramp_min: f64,
    pub ramp_max: f64,
}

impl Default for SimulationTable {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            dt: sim.dt,
            max_steps: DEFAULT_MAX_STEPS,
            keep_partial: sim.keep_partial,
            ramp_seconds: DEFAULT_RAMP,
            ramp_seed: None,
            ramp_min: 0.5,
            ramp_max: 2.5,
        }
    }
}

/// A complete run description as read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub rocket: RocketTable,
    pub parachute: ParachuteTable,
    pub launch: LaunchTable,
    pub motor: MotorTable,
    pub simulation: SimulationTable,
}

impl RunConfig {
    /// Load a run file from disk.
    ///
    /// A relative `[motor] thrust_curve` is taken relative to the run file's
    /// directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut cfg = Self::from_toml(&contents)?;
        let resolved = match (&cfg.motor.thrust_curve, path.parent()) {
            (Some(curve), Some(dir)) if curve.is_relative() => Some(dir.join(curve)),
            _ => None,
        };
        if resolved.is_some() {
            cfg.motor.thrust_curve = resolved;
        }
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn rocket(&self) -> RocketParameters {
        let r = &self.rocket;
        RocketParameters::new(r.mass, r.cd, r.area, r.rho)
            .with_propellant_mass(r.propellant_mass)
            .with_parachute(ParachuteConfig {
                deploy_altitude: self.parachute.deploy_altitude,
                cd: self.parachute.cd,
                area: self.parachute.area,
            })
            .with_launch(LaunchConditions {
                angle_deg: self.launch.angle_deg,
                wind_speed: self.launch.wind_speed,
                wind_direction_deg: self.launch.wind_direction_deg,
            })
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            dt: self.simulation.dt,
            max_steps: self.simulation.max_steps,
            keep_partial: self.simulation.keep_partial,
        }
    }

    pub fn ramp(&self) -> DeploymentRamp {
        let s = &self.simulation;
        match s.ramp_seed {
            Some(seed) => DeploymentRamp::Random { min: s.ramp_min, max: s.ramp_max, seed },
            None => DeploymentRamp::Fixed(s.ramp_seconds),
        }
    }

    pub fn thrust_curve_path(&self) -> Option<&Path> {
        self.motor.thrust_curve.as_deref()
    }
}
