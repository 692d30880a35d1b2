use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use super::parse;

// ---------------------------------------------------------------------------
// Thrust samples
// ---------------------------------------------------------------------------

/// Timestamps closer than this collapse into a single sample.
pub const DUPLICATE_TOLERANCE: f64 = 1e-9;

/// One point of a motor thrust curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustSample {
    pub time: f64,   // s
    pub thrust: f64, // N
}

impl From<(f64, f64)> for ThrustSample {
    fn from((time, thrust): (f64, f64)) -> Self {
        Self { time, thrust }
    }
}

/// Built-in solid motor profile (~6.4 s burn, regressive thrust).
const DEFAULT_CURVE: [(f64, f64); 26] = [
    (0.124, 816.849), (0.375, 796.043), (0.626, 781.861), (0.877, 767.440),
    (1.129, 759.627), (1.380, 735.948), (1.631, 714.454), (1.883, 701.582),
    (2.134, 674.667), (2.385, 656.493), (2.637, 636.076), (2.889, 612.409),
    (3.140, 587.801), (3.391, 567.170), (3.642, 559.971), (3.894, 534.157),
    (4.145, 444.562), (4.396, 280.510), (4.648, 216.702), (4.899, 163.136),
    (5.150, 120.571), (5.402, 86.544), (5.653, 59.990), (5.904, 39.527),
    (6.156, 25.914), (6.408, 0.000),
];

// ---------------------------------------------------------------------------
// Thrust curve
// ---------------------------------------------------------------------------

/// Monotonic, de-duplicated time → thrust profile.
///
/// Invariants: at least two samples, strictly increasing time, every thrust
/// finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustCurve {
    samples: Vec<ThrustSample>,
}

impl ThrustCurve {
    /// Build a curve from unordered `(time, thrust)` pairs.
    ///
    /// Pairs are sorted by time; timestamps within [`DUPLICATE_TOLERANCE`]
    /// of each other keep the later-listed value.
    pub fn load<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<ThrustSample>,
    {
        let mut raw: Vec<ThrustSample> = pairs.into_iter().map(Into::into).collect();

        for s in &raw {
            if !s.time.is_finite() || !s.thrust.is_finite() {
                return Err(SimError::curve(format!(
                    "non-finite sample ({}, {})",
                    s.time, s.thrust
                )));
            }
            if s.time < 0.0 {
                return Err(SimError::curve(format!("negative time {}", s.time)));
            }
            if s.thrust < 0.0 {
                return Err(SimError::curve(format!(
                    "negative thrust {} N at t={}s",
                    s.thrust, s.time
                )));
            }
        }

        // Stable sort keeps listing order among equal timestamps.
        raw.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut samples: Vec<ThrustSample> = Vec::with_capacity(raw.len());
        for s in raw {
            match samples.last_mut() {
                Some(last) if s.time <= last.time + DUPLICATE_TOLERANCE => *last = s,
                _ => samples.push(s),
            }
        }

        if samples.len() < 2 {
            return Err(SimError::curve(format!(
                "need at least 2 distinct samples, got {}",
                samples.len()
            )));
        }

        Ok(Self { samples })
    }

    /// Read a curve from a CSV or RASP/ENG file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(parse::load_file(path)?)
    }

    /// Read `path` when given, otherwise use the built-in profile.
    pub fn from_source(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Thrust at time `t`, N.
    ///
    /// Holds the first value before the first sample, interpolates linearly
    /// between samples and returns zero once `t` is past the last sample.
    /// A NaN time has no thrust.
    pub fn thrust_at(&self, t: f64) -> f64 {
        if t.is_nan() {
            return 0.0;
        }
        let first = self.samples[0];
        let last = self.samples[self.samples.len() - 1];

        if t < first.time {
            return first.thrust;
        }
        if t > last.time {
            return 0.0;
        }
        if t == last.time {
            return last.thrust;
        }

        // Index of the first sample strictly after t; in 1..len by the checks above.
        let hi = self.samples.partition_point(|s| s.time <= t);
        let a = self.samples[hi - 1];
        let b = self.samples[hi];
        let frac = (t - a.time) / (b.time - a.time);
        a.thrust + frac * (b.thrust - a.thrust)
    }

    /// Time of the last sample, s.
    pub fn burn_time(&self) -> f64 {
        self.samples[self.samples.len() - 1].time
    }

    /// Trapezoidal integral of thrust over the sampled span, N·s.
    pub fn total_impulse(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| 0.5 * (w[0].thrust + w[1].thrust) * (w[1].time - w[0].time))
            .sum()
    }

    pub fn peak_thrust(&self) -> f64 {
        self.samples.iter().map(|s| s.thrust).fold(0.0_f64, f64::max)
    }

    /// Mean thrust across the sampled span (impulse / span), N.
    pub fn average_thrust(&self) -> f64 {
        let span = self.burn_time() - self.samples[0].time;
        if span > 0.0 {
            self.total_impulse() / span
        } else {
            0.0
        }
    }

    pub fn samples(&self) -> &[ThrustSample] {
        &self.samples
    }
}

impl Default for ThrustCurve {
    fn default() -> Self {
        Self {
            samples: DEFAULT_CURVE.iter().copied().map(ThrustSample::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> ThrustCurve {
        ThrustCurve::load([(0.0, 0.0), (1.0, 100.0), (2.0, 50.0)]).unwrap()
    }

    #[test]
    fn sorts_unordered_input() {
        let c = ThrustCurve::load([(2.0, 50.0), (0.0, 0.0), (1.0, 100.0)]).unwrap();
        let times: Vec<f64> = c.samples().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn duplicate_timestamp_keeps_later_value() {
        let c = ThrustCurve::load([(0.0, 10.0), (1.0, 20.0), (1.0, 30.0), (2.0, 0.0)]).unwrap();
        assert_eq!(c.samples().len(), 3);
        assert_eq!(c.thrust_at(1.0), 30.0);
    }

    #[test]
    fn near_duplicate_timestamps_collapse() {
        let c = ThrustCurve::load([(0.0, 10.0), (1.0, 20.0), (1.0 + 5e-10, 25.0), (2.0, 0.0)])
            .unwrap();
        assert_eq!(c.samples().len(), 3);
        assert_eq!(c.samples()[1].thrust, 25.0);
    }

    #[test]
    fn rejects_too_few_points() {
        let err = ThrustCurve::load([(1.0, 5.0), (1.0, 6.0)]).unwrap_err();
        assert!(matches!(err, SimError::InvalidCurve { .. }));
        let empty: [(f64, f64); 0] = [];
        assert!(ThrustCurve::load(empty).is_err());
    }

    #[test]
    fn rejects_negative_thrust() {
        let err = ThrustCurve::load([(0.0, 5.0), (1.0, -1.0)]).unwrap_err();
        assert!(matches!(err, SimError::InvalidCurve { .. }));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(ThrustCurve::load([(0.0, f64::NAN), (1.0, 1.0)]).is_err());
        assert!(ThrustCurve::load([(0.0, 1.0), (f64::INFINITY, 1.0)]).is_err());
    }

    #[test]
    fn holds_first_value_before_first_sample() {
        let c = ThrustCurve::load([(0.5, 40.0), (1.5, 20.0)]).unwrap();
        assert_eq!(c.thrust_at(0.0), 40.0);
        assert_eq!(c.thrust_at(0.25), 40.0);
    }

    #[test]
    fn interpolates_linearly() {
        let c = ramp();
        assert_relative_eq!(c.thrust_at(0.5), 50.0);
        assert_relative_eq!(c.thrust_at(1.5), 75.0);
    }

    #[test]
    fn zero_after_burnout() {
        let c = ramp();
        assert_eq!(c.thrust_at(2.0), 50.0);
        assert_eq!(c.thrust_at(2.000_001), 0.0);
        assert_eq!(c.thrust_at(100.0), 0.0);
    }

    #[test]
    fn exact_at_sample_times() {
        let c = ThrustCurve::default();
        for s in c.samples() {
            assert_eq!(c.thrust_at(s.time), s.thrust);
        }
    }

    #[test]
    fn finite_everywhere() {
        let c = ThrustCurve::default();
        let mut t = 0.0;
        while t < 10.0 {
            let f = c.thrust_at(t);
            assert!(f.is_finite() && f >= 0.0, "thrust {} at t={}", f, t);
            t += 0.013;
        }
    }

    #[test]
    fn nan_time_has_no_thrust() {
        assert_eq!(ramp().thrust_at(f64::NAN), 0.0);
        assert_eq!(ThrustCurve::default().thrust_at(f64::NAN), 0.0);
    }

    #[test]
    fn impulse_is_trapezoidal() {
        // 0.5*(0+100)*1 + 0.5*(100+50)*1
        assert_relative_eq!(ramp().total_impulse(), 125.0);
    }

    #[test]
    fn default_curve_shape() {
        let c = ThrustCurve::default();
        assert_eq!(c.samples().len(), 26);
        assert_relative_eq!(c.burn_time(), 6.408);
        assert_relative_eq!(c.peak_thrust(), 816.849);
        let impulse = c.total_impulse();
        assert!(impulse > 2_900.0 && impulse < 3_100.0, "impulse {}", impulse);
    }

    #[test]
    fn average_thrust_over_span() {
        assert_relative_eq!(ramp().average_thrust(), 62.5);
    }

    #[test]
    fn from_source_without_path_is_default() {
        assert_eq!(ThrustCurve::from_source(None).unwrap(), ThrustCurve::default());
    }
}
