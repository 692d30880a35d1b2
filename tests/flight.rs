use std::io::Write;

use approx::assert_relative_eq;
use rstest::rstest;

use rocket_flight::dynamics::state::{LaunchConditions, OutputSample, RocketParameters, SimConfig};
use rocket_flight::io::{series, Column, FlightSummary};
use rocket_flight::motor::ThrustCurve;
use rocket_flight::sim::{detect_events, EventKind};
use rocket_flight::{simulate, DivergenceReason, SimError};

fn reference_rocket() -> RocketParameters {
    RocketParameters::new(5.0, 0.7, 0.004_56, 1.225)
}

fn apogee(samples: &[OutputSample]) -> f64 {
    samples.iter().map(|s| s.altitude).fold(0.0_f64, f64::max)
}

#[test]
fn reference_flight() {
    let curve = ThrustCurve::default();
    let samples = simulate(&curve, &reference_rocket(), &SimConfig::default()).unwrap();

    assert!(apogee(&samples) > 50.0);
    let last = samples.last().unwrap();
    assert!(last.time < 120.0);
    assert_eq!(last.altitude, 0.0);
    assert!(last.velocity <= 0.0);

    // No sample at t = 0; one per step afterwards.
    assert_relative_eq!(samples[0].time, 0.05, epsilon = 1e-12);
    for pair in samples.windows(2) {
        assert_relative_eq!(pair[1].time - pair[0].time, 0.05, epsilon = 1e-9);
    }
}

#[test]
fn constant_thrust_one_second() {
    let curve = ThrustCurve::load([(0.0, 100.0), (1.0, 100.0)]).unwrap();
    let rocket = RocketParameters::new(1.0, 0.001, 0.001, 1.225).with_propellant_mass(1e-9);
    let samples = simulate(&curve, &rocket, &SimConfig::default()).unwrap();

    let at_one = samples
        .iter()
        .find(|s| (s.time - 1.0).abs() < 1e-6)
        .expect("a sample at t = 1 s");
    assert_relative_eq!(at_one.velocity, 90.19, epsilon = 0.5);
}

#[test]
fn zero_thrust_stays_on_pad() {
    let curve = ThrustCurve::load([(0.0, 0.0), (2.0, 0.0)]).unwrap();
    let samples = simulate(&curve, &reference_rocket(), &SimConfig::default()).unwrap();
    assert_eq!(samples.len(), 1);
    assert!(samples.iter().all(|s| s.altitude == 0.0));
    assert_eq!(samples[0].mass, reference_rocket().mass);
}

#[test]
fn mass_never_increases_while_burning() {
    let curve = ThrustCurve::default();
    let samples = simulate(&curve, &reference_rocket(), &SimConfig::default()).unwrap();
    for pair in samples.windows(2) {
        assert!(pair[1].mass <= pair[0].mass);
        if pair[1].thrust > 0.0 {
            assert!(pair[1].mass < pair[0].mass, "no burn at t={}", pair[1].time);
        }
    }
    let burned = reference_rocket().mass - samples.last().unwrap().mass;
    assert_relative_eq!(burned, 1.0, epsilon = 0.1);
}

#[rstest]
fn terminates_over_parameter_grid(
    #[values(0.1, 0.5, 1.0, 2.0, 5.0, 50.0)] mass: f64,
    #[values(0.1, 0.7, 2.0)] cd: f64,
    #[values(1e-4, 1e-2, 1.0)] area: f64,
    #[values(0.5, 1.225, 1.5)] rho: f64,
) {
    let curve = ThrustCurve::default();
    let rocket = RocketParameters::new(mass, cd, area, rho);
    match simulate(&curve, &rocket, &SimConfig::default()) {
        Ok(samples) => {
            let last = samples.last().unwrap();
            assert_eq!(last.altitude, 0.0);
            assert!(last.velocity <= 0.0);
            assert!(samples.iter().all(|s| s.altitude >= 0.0));
        }
        // Light rockets cannot carry the full propellant load.
        Err(SimError::DivergedSimulation { reason: DivergenceReason::MassDepleted, .. }) => {
            assert!(mass <= rocket.propellant_mass, "m0={} ran out of mass", mass);
        }
        Err(e) => panic!("m0={} cd={} A={} rho={}: {}", mass, cd, area, rho, e),
    }
}

#[test]
fn thrust_round_trips_at_sample_times() {
    let pairs = [(0.0, 10.0), (0.5, 40.0), (0.5, 35.0), (1.2, 20.0), (2.0, 0.0)];
    let curve = ThrustCurve::load(pairs).unwrap();
    assert_eq!(curve.samples().len(), 4);
    for s in curve.samples() {
        assert_eq!(curve.thrust_at(s.time), s.thrust);
    }
    assert_eq!(curve.thrust_at(0.5), 35.0);
    assert!(curve.total_impulse() >= 0.0);
}

#[test]
fn divergence_is_reported() {
    let curve = ThrustCurve::default();
    let config = SimConfig { max_steps: 10, ..SimConfig::default() };
    let err = simulate(&curve, &reference_rocket(), &config).unwrap_err();
    assert!(matches!(err, SimError::DivergedSimulation { steps: 10, .. }));
}

#[test]
fn crosswind_drifts_downrange() {
    let curve = ThrustCurve::default();
    let rocket = reference_rocket().with_launch(LaunchConditions {
        wind_speed: 5.0,
        ..LaunchConditions::default()
    });
    let samples = simulate(&curve, &rocket, &SimConfig::default()).unwrap();
    let summary = FlightSummary::from_samples(&samples, &rocket, &curve).unwrap();
    assert!(summary.downrange_m > 0.0);
    assert_eq!(samples.last().unwrap().altitude, 0.0);
}

#[test]
fn summary_agrees_with_events() {
    let curve = ThrustCurve::default();
    let rocket = reference_rocket();
    let samples = simulate(&curve, &rocket, &SimConfig::default()).unwrap();
    let summary = FlightSummary::from_samples(&samples, &rocket, &curve).unwrap();
    let events = detect_events(&samples);

    let apogee_event = events.iter().find(|e| e.kind == EventKind::Apogee).unwrap();
    assert!((summary.apogee_time - apogee_event.time).abs() <= 0.05 + 1e-9);
    assert_eq!(summary.apogee_m, apogee(&samples));
    assert_eq!(summary.initial_mass, 5.0);
    assert!(summary.deployment_time.is_some());
    assert!(summary.descent_rate < 0.0);

    let alt = series(&samples, Column::Altitude);
    assert_eq!(alt.len(), samples.len());
}

#[test]
fn curve_from_rasp_file() {
    let mut file = tempfile::Builder::new().suffix(".eng").tempfile().unwrap();
    writeln!(
        file,
        "; test motor\nJ350 38 337 P 0.37 0.7 Test\n0.0 300.0\n1.0 400.0\n2.0 0.0\n"
    )
    .unwrap();

    let curve = ThrustCurve::from_file(file.path()).unwrap();
    assert_eq!(curve.samples().len(), 3);
    assert_eq!(curve.peak_thrust(), 400.0);

    let samples = simulate(&curve, &reference_rocket(), &SimConfig::default()).unwrap();
    assert_eq!(samples.last().unwrap().altitude, 0.0);
}

#[test]
fn curve_from_csv_file() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "time,thrust\n0.0,100\n0.5,200\n1.0,0").unwrap();
    let curve = ThrustCurve::from_file(file.path()).unwrap();
    assert_eq!(curve.thrust_at(0.25), 150.0);
}
