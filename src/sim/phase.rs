use std::fmt;

use serde::Serialize;

use crate::dynamics::state::OutputSample;

/// Thrust at or below this is treated as burnt out, N.
pub const BURNOUT_THRUST: f64 = 1.0;

/// Flight phase label derived from two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlightPhase {
    Liftoff,
    PoweredAscent,
    Coast,
    Descent,
    ChuteDescent,
    Landed,
}

impl FlightPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Liftoff => "Liftoff",
            Self::PoweredAscent => "Powered Ascent",
            Self::Coast => "Coast",
            Self::Descent => "Descent",
            Self::ChuteDescent => "Chute Descent",
            Self::Landed => "Landed",
        }
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `curr` given the sample before it.
///
/// Stateless: nothing is carried between calls, so a single frame right at
/// a transition can land on either side of it.
pub fn flight_phase(prev: Option<&OutputSample>, curr: &OutputSample) -> FlightPhase {
    if curr.altitude <= 0.0 && curr.velocity == 0.0 {
        return FlightPhase::Landed;
    }
    if curr.time == 0.0 {
        return FlightPhase::Liftoff;
    }
    if curr.chute_deployed {
        return FlightPhase::ChuteDescent;
    }
    match prev {
        Some(p) if p.altitude < curr.altitude => {
            if curr.thrust > BURNOUT_THRUST {
                FlightPhase::PoweredAscent
            } else {
                FlightPhase::Coast
            }
        }
        Some(p) if p.altitude > curr.altitude => FlightPhase::Descent,
        _ => FlightPhase::Coast,
    }
}

/// Phase of every sample in a run, in order.
pub fn classify(samples: &[OutputSample]) -> Vec<FlightPhase> {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| flight_phase(i.checked_sub(1).map(|j| &samples[j]), s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, altitude: f64, velocity: f64, thrust: f64, chute: bool) -> OutputSample {
        OutputSample {
            time,
            altitude,
            velocity,
            acceleration: 0.0,
            thrust,
            drag: 0.0,
            mass: 1.0,
            mdot: 0.0,
            chute_deployed: chute,
            downrange: 0.0,
            lateral_velocity: 0.0,
        }
    }

    #[test]
    fn powered_then_coast() {
        let a = sample(1.0, 10.0, 20.0, 500.0, false);
        let b = sample(1.1, 12.0, 21.0, 480.0, false);
        assert_eq!(flight_phase(Some(&a), &b), FlightPhase::PoweredAscent);

        let c = sample(1.2, 14.0, 19.0, 0.5, false);
        assert_eq!(flight_phase(Some(&b), &c), FlightPhase::Coast);
    }

    #[test]
    fn descent_and_chute() {
        let a = sample(20.0, 500.0, -10.0, 0.0, false);
        let b = sample(20.1, 499.0, -10.5, 0.0, false);
        assert_eq!(flight_phase(Some(&a), &b), FlightPhase::Descent);

        let c = sample(20.2, 498.0, -10.0, 0.0, true);
        assert_eq!(flight_phase(Some(&b), &c), FlightPhase::ChuteDescent);
    }

    #[test]
    fn landed_wins_over_everything() {
        let a = sample(30.0, 1.0, -5.0, 0.0, true);
        let b = sample(30.1, 0.0, 0.0, 0.0, true);
        assert_eq!(flight_phase(Some(&a), &b), FlightPhase::Landed);
    }

    #[test]
    fn time_zero_is_liftoff() {
        let s = sample(0.0, 0.0, 1.0, 800.0, false);
        assert_eq!(flight_phase(None, &s), FlightPhase::Liftoff);
    }

    #[test]
    fn flat_or_first_sample_falls_back_to_coast() {
        let a = sample(5.0, 100.0, 0.0, 0.0, false);
        let b = sample(5.1, 100.0, 0.0, 0.0, false);
        assert_eq!(flight_phase(Some(&a), &b), FlightPhase::Coast);
        assert_eq!(flight_phase(None, &b), FlightPhase::Coast);
    }

    #[test]
    fn classify_matches_pairwise() {
        let run = vec![
            sample(0.1, 1.0, 10.0, 800.0, false),
            sample(0.2, 2.0, 11.0, 800.0, false),
            sample(0.3, 1.5, -2.0, 0.0, false),
            sample(0.4, 0.0, 0.0, 0.0, false),
        ];
        assert_eq!(
            classify(&run),
            vec![
                FlightPhase::Coast,
                FlightPhase::PoweredAscent,
                FlightPhase::Descent,
                FlightPhase::Landed,
            ]
        );
    }
}
