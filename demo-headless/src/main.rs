mod controls;
mod summary;

use clap::Parser;
use controls::{parse_poke, slider_to_speed, Poke};
use pipe_flow_core::{
    ConfigError, ParticleConfig, ParticleSet, PipeFlow, PipeFlowConfig, PipeFlowSimulation,
    RespawnMode, SimulationConfig, Vec3, VectorField,
};
use std::process::ExitCode;
use summary::AxialHistogram;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Headless pipe flow demo with scripted interaction
#[derive(Parser, Debug)]
#[command(name = "pipe-flow-headless")]
#[command(about = "Laminar pipe flow tracer simulation without graphics", long_about = None)]
struct Args {
    /// Pipe radius
    #[arg(long, default_value_t = 5.0)]
    radius: f64,

    /// Pipe length along Z
    #[arg(long, default_value_t = 20.0)]
    length: f64,

    /// Number of tracer particles
    #[arg(short = 'n', long, default_value_t = 2000)]
    particles: usize,

    /// Flow speed slider position (0-200 maps to 0.0-4.0)
    #[arg(short, long, default_value_t = 50)]
    speed_slider: u32,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 10.0)]
    duration: f64,

    /// RNG seed for reproducible particle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Respawn escaped particles on the inlet plane instead of throughout the pipe
    #[arg(long)]
    inlet_respawn: bool,

    /// Inject a perturbation: x,y,z or x,y,z,strength (repeatable)
    #[arg(long = "poke", value_parser = parse_poke)]
    pokes: Vec<Poke>,

    /// Simulated time at which the pokes are injected
    #[arg(long, default_value_t = 0.0)]
    poke_at: f64,

    /// Number of axial histogram bins in reports
    #[arg(long, default_value_t = 16)]
    bins: usize,

    /// Report interval in simulated seconds
    #[arg(short, long, default_value_t = 1.0)]
    report_interval: f64,

    /// Run validation checks instead of a scenario
    #[arg(short, long)]
    validate: bool,
}

/// Wall-clock frame length the demo pretends to render at
const FRAME_DT: f64 = 1.0 / 60.0;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let outcome = if args.validate {
        run_validation_checks()
    } else {
        run_scenario(&args)
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_scenario(args: &Args) -> Result<bool, ConfigError> {
    let config = SimulationConfig {
        pipe: PipeFlowConfig {
            radius: args.radius,
            base_speed: slider_to_speed(args.speed_slider),
            ..PipeFlowConfig::default()
        },
        pipe_length: args.length,
        particle_count: args.particles,
        respawn_mode: if args.inlet_respawn {
            RespawnMode::Inlet
        } else {
            RespawnMode::Volume
        },
        seed: args.seed,
        ..SimulationConfig::default()
    };

    let mut sim = PipeFlowSimulation::new(&config)?;
    let mut histogram = AxialHistogram::new(args.length, args.bins);

    println!("=== Pipe Flow Demo ===\n");
    println!(
        "Pipe R={:.2} L={:.2}, {} particles, speed {:.2} (slider {})",
        args.radius,
        args.length,
        args.particles,
        sim.field().flow_speed(),
        args.speed_slider
    );
    if !args.pokes.is_empty() {
        println!("{} poke(s) scheduled at t={:.2}s", args.pokes.len(), args.poke_at);
    }
    println!();
    println!("Time(s) | Ticks | Perturb | Respawned | Mean v_z | Mean age | Axial distribution");
    println!("--------|-------|---------|-----------|----------|----------|-------------------");

    let mut poked = args.pokes.is_empty();
    let mut next_report = 0.0;

    while sim.elapsed() < args.duration {
        if !poked && sim.elapsed() >= args.poke_at {
            for poke in &args.pokes {
                info!(
                    "Poke at ({:.2}, {:.2}, {:.2}) strength {:.1}",
                    poke.position.x, poke.position.y, poke.position.z, poke.strength
                );
                sim.add_perturbation(poke.position, poke.strength);
            }
            poked = true;
        }

        sim.advance_frame(FRAME_DT);
        sim.render(&mut histogram);

        if sim.elapsed() >= next_report {
            let stats = sim.stats();
            println!(
                "{:7.2} | {:5} | {:7} | {:9} | {:8.4} | {:8.3} | {}",
                stats.elapsed,
                stats.tick,
                stats.perturbation_count,
                stats.respawned_last_tick,
                stats.mean_axial_speed,
                histogram.mean_age(),
                histogram.sparkline()
            );
            next_report += args.report_interval;
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Frames rendered: {}", histogram.frames());
    println!("Final axial counts: {:?}", histogram.bins());
    Ok(true)
}

/// Quick physical sanity checks, printed as PASS/FAIL lines
fn run_validation_checks() -> Result<bool, ConfigError> {
    println!("\n=== Running Validation Checks ===\n");
    let mut all_passed = true;

    // Check 1: on-axis transport matches U·t
    println!("Check 1: On-axis transport");
    let field = PipeFlow::with_radius(5.0)?;
    let mut set = ParticleSet::new(ParticleConfig {
        count: 1,
        seed: Some(1),
        ..ParticleConfig::default()
    })?;
    set.place_particle(0, Vec3::new(0.0, 0.0, 10.0));
    for _ in 0..50 {
        set.advance_with(&field, 0.1);
    }
    let z = set.particles()[0].position.z;
    println!("  Final z: {:.6} (expected 15.0)", z);
    all_passed &= report_check((z - 15.0).abs() < 1e-9, "Particle advected at centreline speed");

    // Check 2: area-uniform respawn
    println!("\nCheck 2: Respawn distribution");
    let set = ParticleSet::new(ParticleConfig {
        count: 10_000,
        seed: Some(2),
        ..ParticleConfig::default()
    })?;
    let r_sq_max = set.pipe_radius() * set.pipe_radius();
    let inner_half = set
        .positions()
        .filter(|p| (p.x * p.x + p.y * p.y) < 0.5 * r_sq_max)
        .count();
    println!("  Particles inside r²<R²/2: {} of 10000 (expected ~5000)", inner_half);
    all_passed &= report_check(
        inner_half.abs_diff(5_000) < 300,
        "Half the area holds half the particles",
    );

    // Check 3: wall no-slip
    println!("\nCheck 3: No-slip wall");
    let wall = field.sample(&Vec3::new(3.0, 4.0, 2.0));
    println!("  Velocity at wall: ({:.3}, {:.3}, {:.3})", wall.x, wall.y, wall.z);
    all_passed &= report_check(wall == Vec3::zeros(), "Base flow vanishes at the wall");

    Ok(all_passed)
}

fn report_check(passed: bool, description: &str) -> bool {
    if passed {
        println!("  ✓ PASS: {}", description);
    } else {
        println!("  ✗ FAIL: {}", description);
    }
    passed
}
