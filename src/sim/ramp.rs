use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::error::{Result, SimError};

/// Default canopy opening time, s.
pub const DEFAULT_RAMP: f64 = 1.5;

/// How long the parachute takes to go from body drag to full canopy drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeploymentRamp {
    /// Same opening time every run.
    Fixed(f64),
    /// Opening time drawn once per run, uniformly in `[min, max]`, from a
    /// generator seeded with `seed`.
    Random { min: f64, max: f64, seed: u64 },
}

impl Default for DeploymentRamp {
    fn default() -> Self {
        Self::Fixed(DEFAULT_RAMP)
    }
}

impl DeploymentRamp {
    /// Reference opening window for randomized deployments.
    pub fn random(seed: u64) -> Self {
        Self::Random { min: 0.5, max: 2.5, seed }
    }

    /// Resolve the opening time for one run, s.
    pub fn duration(&self) -> f64 {
        match *self {
            Self::Fixed(d) => d,
            Self::Random { min, max, seed } => {
                if max <= min {
                    return min;
                }
                let mut rng = Pcg64Mcg::seed_from_u64(seed);
                rng.gen_range(min..=max)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::Fixed(d) => d.is_finite() && d >= 0.0,
            Self::Random { min, max, .. } => {
                min.is_finite() && max.is_finite() && min >= 0.0 && max >= min
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SimError::params(format!(
                "invalid deployment ramp {:?}",
                self
            )))
        }
    }
}
