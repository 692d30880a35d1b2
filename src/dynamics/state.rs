use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G: f64 = 9.81; // gravity used by the equations of motion, m/s^2
pub const G0: f64 = 9.80665; // standard gravity for the Isp relation, m/s^2

/// Deploy altitude used when none is configured, m.
pub const DEFAULT_DEPLOY_ALTITUDE: f64 = 300.0;

// ---------------------------------------------------------------------------
// Rocket definition
// ---------------------------------------------------------------------------

/// Recovery parachute. Missing `cd`/`area` keep the body values, so a
/// deployment without a canopy only flips the `chute_deployed` flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParachuteConfig {
    pub deploy_altitude: f64,  // m, deploy when descending at or below
    pub cd: Option<f64>,       // canopy drag coefficient
    pub area: Option<f64>,     // canopy reference area, m^2
}

impl Default for ParachuteConfig {
    fn default() -> Self {
        Self {
            deploy_altitude: DEFAULT_DEPLOY_ALTITUDE,
            cd: None,
            area: None,
        }
    }
}

/// Launch rail tilt and ambient wind for the 2-D drift model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LaunchConditions {
    pub angle_deg: f64,          // thrust tilt from vertical, + toward downrange
    pub wind_speed: f64,         // m/s
    pub wind_direction_deg: f64, // 0 = along +downrange
}

/// Physical inputs of one run. All SI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketParameters {
    pub mass: f64,            // kg, at ignition
    pub cd: f64,              // body drag coefficient
    pub area: f64,            // body reference area, m^2
    pub rho: f64,             // air density, kg/m^3
    /// Mass the thrust curve burns in total, kg. Sets the Isp estimate
    /// `total_impulse / (propellant_mass * g0)`.
    pub propellant_mass: f64,
    pub parachute: ParachuteConfig,
    pub launch: LaunchConditions,
}

impl RocketParameters {
    /// Body-only rocket with default recovery and calm, vertical launch.
    pub fn new(mass: f64, cd: f64, area: f64, rho: f64) -> Self {
        Self {
            mass,
            cd,
            area,
            rho,
            propellant_mass: 1.0,
            parachute: ParachuteConfig::default(),
            launch: LaunchConditions::default(),
        }
    }

    pub fn with_parachute(mut self, parachute: ParachuteConfig) -> Self {
        self.parachute = parachute;
        self
    }

    pub fn with_launch(mut self, launch: LaunchConditions) -> Self {
        self.launch = launch;
        self
    }

    pub fn with_propellant_mass(mut self, kg: f64) -> Self {
        self.propellant_mass = kg;
        self
    }

    /// Reject non-positive or non-finite inputs before a run starts.
    pub fn validate(&self) -> Result<()> {
        positive("mass", self.mass)?;
        positive("drag coefficient", self.cd)?;
        positive("reference area", self.area)?;
        positive("air density", self.rho)?;
        positive("propellant mass", self.propellant_mass)?;

        let p = &self.parachute;
        if !p.deploy_altitude.is_finite() || p.deploy_altitude < 0.0 {
            return Err(SimError::params(format!(
                "deploy altitude must be finite and >= 0, got {}",
                p.deploy_altitude
            )));
        }
        if let Some(cd) = p.cd {
            positive("parachute drag coefficient", cd)?;
        }
        if let Some(area) = p.area {
            positive("parachute area", area)?;
        }

        let l = &self.launch;
        if !(l.angle_deg.is_finite() && l.wind_speed.is_finite() && l.wind_direction_deg.is_finite())
        {
            return Err(SimError::params("launch conditions must be finite"));
        }
        if l.angle_deg.abs() >= 90.0 {
            return Err(SimError::params(format!(
                "launch angle must be within (-90, 90) degrees, got {}",
                l.angle_deg
            )));
        }
        if l.wind_speed < 0.0 {
            return Err(SimError::params(format!(
                "wind speed must be >= 0, got {}",
                l.wind_speed
            )));
        }
        Ok(())
    }

    pub(crate) fn chute_cd(&self) -> f64 {
        self.parachute.cd.unwrap_or(self.cd)
    }

    pub(crate) fn chute_area(&self) -> f64 {
        self.parachute.area.unwrap_or(self.area)
    }
}

pub(crate) fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::params(format!("{} must be positive, got {}", name, value)))
    }
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable state of a single run.
/// Frame: x = downrange, y = up, origin at the pad.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub time: f64,         // s
    pub pos: Vector2<f64>, // m
    pub vel: Vector2<f64>, // m/s
    pub mass: f64,         // kg
    pub chute_deployed: bool,
    pub deploy_started_at: Option<f64>,
}

impl SimulationState {
    /// On the pad, at rest, fully fuelled.
    pub fn at_rest(mass: f64) -> Self {
        Self {
            time: 0.0,
            pos: Vector2::zeros(),
            vel: Vector2::zeros(),
            mass,
            chute_deployed: false,
            deploy_started_at: None,
        }
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    /// Vertical velocity, m/s (positive up).
    pub fn velocity(&self) -> f64 {
        self.vel.y
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|v| v.is_finite()) && self.mass.is_finite()
    }

    /// Landed: on the ground and not rising.
    pub fn is_landed(&self) -> bool {
        self.pos.y == 0.0 && self.vel.y <= 0.0
    }
}

// ---------------------------------------------------------------------------
// Output sample
// ---------------------------------------------------------------------------

/// Immutable snapshot emitted after every integration step.
///
/// `thrust`, `drag`, `acceleration` and `mdot` are the values used during
/// the step; kinematics and mass are the values at its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSample {
    pub time: f64,             // s
    pub altitude: f64,         // m
    pub velocity: f64,         // m/s, vertical
    pub acceleration: f64,     // m/s^2, vertical
    pub thrust: f64,           // N
    pub drag: f64,             // N, magnitude of vertical drag
    pub mass: f64,             // kg
    pub mdot: f64,             // kg/s
    pub chute_deployed: bool,
    pub downrange: f64,        // m
    pub lateral_velocity: f64, // m/s
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub dt: f64,           // integration step, s
    pub max_steps: usize,  // hard cap before the run is declared diverged
    /// Attach the samples produced so far to a divergence error.
    pub keep_partial: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            max_steps: DEFAULT_MAX_STEPS,
            keep_partial: false,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        positive("time step", self.dt)?;
        if self.max_steps == 0 {
            return Err(SimError::params("step cap must be at least 1"));
        }
        Ok(())
    }
}
