use std::env::{set_var, var};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;

use rocket_flight::config::RunConfig;
use rocket_flight::dynamics::state::{OutputSample, RocketParameters};
use rocket_flight::io::{self, FlightSummary};
use rocket_flight::motor::ThrustCurve;
use rocket_flight::physics::recommended_launch_angle;
use rocket_flight::sim::{classify, detect_events, mass_cases, sweep, FlightIntegrator, FlightPhase};

const LOG_VAR: &str = "ROCKET_FLIGHT_LOG";

#[derive(Parser)]
#[command(author, version, about = "Point-mass hobby rocket flight simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fly one rocket and print a flight report
    Run(RunArgs),
    /// Fly the same rocket at several ignition masses in parallel
    Sweep(SweepArgs),
}

#[derive(Args)]
struct RocketArgs {
    /// TOML run file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignition mass, kg
    #[arg(long)]
    mass: Option<f64>,

    /// Body drag coefficient
    #[arg(long)]
    cd: Option<f64>,

    /// Body reference area, m^2
    #[arg(long)]
    area: Option<f64>,

    /// Air density, kg/m^3
    #[arg(long)]
    rho: Option<f64>,

    /// Thrust curve file (.csv, .eng or .rasp); built-in curve otherwise
    #[arg(long)]
    thrust_curve: Option<PathBuf>,

    /// Parachute deploy altitude, m
    #[arg(long)]
    chute_altitude: Option<f64>,

    /// Parachute drag coefficient
    #[arg(long)]
    chute_cd: Option<f64>,

    /// Parachute area, m^2
    #[arg(long)]
    chute_area: Option<f64>,

    /// Integration step, s
    #[arg(long)]
    dt: Option<f64>,

    /// Wind speed, m/s
    #[arg(long)]
    wind_speed: Option<f64>,

    /// Wind direction, degrees (0 = blowing downrange)
    #[arg(long)]
    wind_direction: Option<f64>,

    /// Launch angle from vertical, degrees
    #[arg(long, conflicts_with = "auto_angle")]
    angle: Option<f64>,

    /// Tilt the rail into the wind
    #[arg(long, default_value_t = false)]
    auto_angle: bool,

    /// Seed for a randomized parachute opening time
    #[arg(long)]
    ramp_seed: Option<u64>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    rocket: RocketArgs,

    /// Write every sample as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    rocket: RocketArgs,

    /// Ignition masses to fly, kg
    #[arg(long, value_delimiter = ',', required = true)]
    masses: Vec<f64>,
}

impl RocketArgs {
    fn resolve(&self) -> anyhow::Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading run file {}", path.display()))?,
            None => RunConfig::default(),
        };

        let r = &mut cfg.rocket;
        r.mass = self.mass.unwrap_or(r.mass);
        r.cd = self.cd.unwrap_or(r.cd);
        r.area = self.area.unwrap_or(r.area);
        r.rho = self.rho.unwrap_or(r.rho);

        let p = &mut cfg.parachute;
        p.deploy_altitude = self.chute_altitude.unwrap_or(p.deploy_altitude);
        p.cd = self.chute_cd.or(p.cd);
        p.area = self.chute_area.or(p.area);

        let l = &mut cfg.launch;
        l.wind_speed = self.wind_speed.unwrap_or(l.wind_speed);
        l.wind_direction_deg = self.wind_direction.unwrap_or(l.wind_direction_deg);
        l.angle_deg = match (self.angle, self.auto_angle) {
            (Some(angle), _) => angle,
            (None, true) => recommended_launch_angle(l.wind_speed, l.wind_direction_deg),
            (None, false) => l.angle_deg,
        };

        if let Some(path) = &self.thrust_curve {
            cfg.motor.thrust_curve = Some(path.clone());
        }
        cfg.simulation.dt = self.dt.unwrap_or(cfg.simulation.dt);
        cfg.simulation.ramp_seed = self.ramp_seed.or(cfg.simulation.ramp_seed);
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }
    if pretty_env_logger::try_init_custom_env(LOG_VAR).is_err() {
        println!("could not init logger");
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

fn load_curve(cfg: &RunConfig) -> anyhow::Result<ThrustCurve> {
    let path = cfg.thrust_curve_path();
    if let Some(p) = path {
        info!("loading thrust curve from {}", p.display());
    }
    ThrustCurve::from_source(path).context("loading thrust curve")
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = args.rocket.resolve()?;
    let curve = load_curve(&cfg)?;
    let rocket = cfg.rocket();
    let sim = cfg.sim_config();

    let samples = FlightIntegrator::new(&curve, rocket, sim)
        .with_ramp(cfg.ramp())
        .run()
        .context("flight simulation failed")?;
    let summary = FlightSummary::from_samples(&samples, &rocket, &curve)
        .context("simulation produced no samples")?;

    if let Some(path) = &args.csv {
        io::write_samples_file(path, &samples)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} samples to {}", samples.len(), path.display());
    }
    if let Some(path) = &args.summary {
        io::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote summary to {}", path.display());
    }

    print_report(&rocket, &curve, &samples, &summary, sim.dt);
    Ok(())
}

fn run_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let cfg = args.rocket.resolve()?;
    let curve = load_curve(&cfg)?;
    let cases = mass_cases(&cfg.rocket(), &args.masses);
    let results = sweep(&cases, &curve, &cfg.sim_config(), cfg.ramp());

    println!();
    println!("  {:>9}  {:>10}  {:>10}  {}", "mass (kg)", "apogee (m)", "flight (s)", "outcome");
    println!("  {}", "─".repeat(50));
    for r in &results {
        match &r.outcome {
            Ok(samples) => {
                let flight = samples.last().map(|s| s.time).unwrap_or(0.0);
                println!(
                    "  {:>9.2}  {:>10.1}  {:>10.2}  landed",
                    r.rocket.mass,
                    r.apogee().unwrap_or(0.0),
                    flight
                );
            }
            Err(e) => println!("  {:>9.2}  {:>10}  {:>10}  {}", r.rocket.mass, "-", "-", e),
        }
    }
    println!();
    Ok(())
}

fn print_report(
    rocket: &RocketParameters,
    curve: &ThrustCurve,
    samples: &[OutputSample],
    summary: &FlightSummary,
    dt: f64,
) {
    println!();
    println!("====================================================================");
    println!("  ROCKET FLIGHT SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Rocket & Motor");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.2} kg    Propellant:   {:>8.2} kg",
        rocket.mass, rocket.propellant_mass
    );
    println!(
        "  Cd:            {:>8.3}       Area:         {:>8.5} m^2",
        rocket.cd, rocket.area
    );
    println!(
        "  Impulse:       {:>8.1} N·s   Burn time:    {:>8.2} s",
        curve.total_impulse(),
        curve.burn_time()
    );
    println!(
        "  Peak thrust:   {:>8.1} N     Avg thrust:   {:>8.1} N",
        curve.peak_thrust(),
        curve.average_thrust()
    );
    println!(
        "  Chute at:      {:>8.1} m     Launch angle: {:>8.1} deg",
        rocket.parachute.deploy_altitude, rocket.launch.angle_deg
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in detect_events(samples) {
        println!(
            "  {:<16} t={:>6.2}s   alt={:>8.1}m   vel={:>7.1}m/s",
            format!("{:?}", e.kind),
            e.time,
            e.sample.altitude,
            e.sample.velocity
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>8.1} m   at t={:.2} s",
        summary.apogee_m, summary.apogee_time
    );
    println!("  Max speed:     {:>8.1} m/s", summary.max_speed);
    println!(
        "  Max accel:     {:>8.1} m/s^2 ({:.1} g)",
        summary.max_accel,
        summary.max_accel / 9.80665
    );
    println!("  Descent rate:  {:>8.1} m/s", summary.descent_rate);
    println!("  Downrange:     {:>8.1} m", summary.downrange_m);
    println!("  Flight time:   {:>8.2} s", summary.flight_time);
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>8}  {:>8}  {}",
        "t (s)", "alt (m)", "vel (m/s)", "thrust", "mass(kg)", "phase"
    );
    println!("  {}", "─".repeat(62));

    let phases = classify(samples);
    let sample_interval = (samples.len() / 30).max(1);
    for (i, (s, phase)) in samples.iter().zip(&phases).enumerate() {
        let transition = i > 0 && phases[i - 1] != *phase;
        let print = i % sample_interval == 0 || transition || i == samples.len() - 1;
        if !print {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.1}  {:>9.1}  {:>8.1}  {:>8.3}  {}",
            s.time, s.altitude, s.velocity, s.thrust, s.mass, phase
        );
    }

    let landed = phases.last() == Some(&FlightPhase::Landed);
    println!();
    println!(
        "  Simulation: {} steps, dt={} s, {}",
        samples.len(),
        dt,
        if landed { "landed" } else { "in flight" }
    );
    println!("====================================================================");
    println!();
}
