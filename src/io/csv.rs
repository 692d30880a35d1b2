use std::io::Write;
use std::path::Path;

use crate::dynamics::state::OutputSample;

/// Write samples as a CSV table, one row per step.
///
/// Columns: time, altitude, velocity, acceleration, thrust, drag, mass,
///          mdot, chute_deployed, downrange, lateral_velocity
pub fn write_samples<W: Write>(writer: W, samples: &[OutputSample]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for s in samples {
        wtr.serialize(s)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write samples to a CSV file at the given path.
pub fn write_samples_file(path: impl AsRef<Path>, samples: &[OutputSample]) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_samples(file, samples)
}

/// Plottable quantities of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Altitude,
    Velocity,
    Acceleration,
    Thrust,
    Drag,
    Mass,
    MassFlow,
    Downrange,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Altitude,
        Column::Velocity,
        Column::Acceleration,
        Column::Thrust,
        Column::Drag,
        Column::Mass,
        Column::MassFlow,
        Column::Downrange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Altitude => "altitude",
            Column::Velocity => "velocity",
            Column::Acceleration => "acceleration",
            Column::Thrust => "thrust",
            Column::Drag => "drag",
            Column::Mass => "mass",
            Column::MassFlow => "mdot",
            Column::Downrange => "downrange",
        }
    }

    fn value(self, s: &OutputSample) -> f64 {
        match self {
            Column::Altitude => s.altitude,
            Column::Velocity => s.velocity,
            Column::Acceleration => s.acceleration,
            Column::Thrust => s.thrust,
            Column::Drag => s.drag,
            Column::Mass => s.mass,
            Column::MassFlow => s.mdot,
            Column::Downrange => s.downrange,
        }
    }
}

/// `[time, value]` pairs of one quantity, ready for a plotting layer.
pub fn series(samples: &[OutputSample], column: Column) -> Vec<[f64; 2]> {
    samples.iter().map(|s| [s.time, column.value(s)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_samples() -> Vec<OutputSample> {
        let a = OutputSample {
            time: 0.05,
            altitude: 0.1,
            velocity: 2.0,
            acceleration: 40.0,
            thrust: 816.849,
            drag: 0.0,
            mass: 4.98,
            mdot: 0.27,
            chute_deployed: false,
            downrange: 0.0,
            lateral_velocity: 0.0,
        };
        let b = OutputSample { time: 0.1, altitude: 0.3, chute_deployed: true, ..a };
        vec![a, b]
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut buf = Vec::new();
        write_samples(&mut buf, &two_samples()).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "time,altitude,velocity,acceleration,thrust,drag,mass,mdot,chute_deployed,downrange,lateral_velocity"
        );
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.05,0.1,2.0,"));
        assert!(lines[2].contains(",true,"));
    }

    #[test]
    fn file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.csv");
        write_samples_file(&path, &two_samples()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn series_pairs_time_with_value() {
        let s = series(&two_samples(), Column::Altitude);
        assert_eq!(s, vec![[0.05, 0.1], [0.1, 0.3]]);
        assert_eq!(Column::MassFlow.name(), "mdot");
    }
}
