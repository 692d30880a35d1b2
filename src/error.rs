use std::fmt;

use thiserror::Error;

use crate::dynamics::state::OutputSample;

/// Why a run was abandoned before reaching the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergenceReason {
    /// The step cap ran out before the landed condition was met.
    StepCapExceeded,
    /// Mass flow drove the vehicle mass to zero or below.
    MassDepleted,
    /// Altitude, velocity or mass became NaN or infinite.
    NonFinite,
}

impl fmt::Display for DivergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepCapExceeded => write!(f, "step cap exceeded before landing"),
            Self::MassDepleted => write!(f, "vehicle mass depleted by mass flow"),
            Self::NonFinite => write!(f, "state became non-finite"),
        }
    }
}

/// Errors produced while loading a thrust curve or running a flight.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid thrust curve: {reason}")]
    InvalidCurve { reason: String },

    #[error("invalid rocket parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("simulation diverged after {steps} steps at t={time:.3}s: {reason}")]
    DivergedSimulation {
        reason: DivergenceReason,
        steps: usize,
        time: f64,
        /// Samples produced before the failure; empty unless the run was
        /// configured to keep them.
        partial: Vec<OutputSample>,
    },

    #[error("failed to read thrust curve: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse thrust curve: {0}")]
    Csv(#[from] csv::Error),
}

impl SimError {
    pub(crate) fn curve(reason: impl Into<String>) -> Self {
        Self::InvalidCurve { reason: reason.into() }
    }

    pub(crate) fn params(reason: impl Into<String>) -> Self {
        Self::InvalidParameters { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
