//! Tick-driven pipe-flow simulation
//!
//! Owns the field and the particle set and advances them in a fixed order:
//! field time-dependent state first (perturbation decay), then particle
//! advection. Interactive mutations (`add_perturbation`, `set_flow_speed`)
//! are applied between ticks on the same thread.

pub mod clock;

pub use clock::FixedStepClock;

use crate::advection::{AdvanceReport, Particle, ParticleConfig, ParticleSet, RespawnMode, SharedField};
use crate::core_types::Vec3;
use crate::error::{require_positive, ConfigError};
use crate::velocity::{PipeFlow, PipeFlowConfig, VectorField};
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

/// Default fixed timestep (~60 Hz)
pub const DEFAULT_TIMESTEP: f64 = 0.016;

/// Consumer of particle positions (the rendering collaborator)
///
/// Receives a read-only view that stays valid until the next tick.
pub trait ParticleRenderer {
    /// Draw or otherwise consume the current particle state
    fn render(&mut self, particles: &[Particle]);
}

/// Complete configuration for a pipe-flow simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Field configuration; its radius is also the particle domain radius
    pub pipe: PipeFlowConfig,
    /// Pipe length
    pub pipe_length: f64,
    /// Number of tracer particles
    pub particle_count: usize,
    /// Tick-time respawn placement
    pub respawn_mode: RespawnMode,
    /// RNG seed for particle placement; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Fixed tick length in seconds
    pub timestep: f64,
    /// Upper bound on ticks run for a single frame in `advance_frame`
    pub max_ticks_per_frame: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pipe: PipeFlowConfig::default(),
            pipe_length: 20.0,
            particle_count: 2000,
            respawn_mode: RespawnMode::Volume,
            seed: None,
            timestep: DEFAULT_TIMESTEP,
            max_ticks_per_frame: 5,
        }
    }
}

impl SimulationConfig {
    /// Particle-set configuration derived from this config
    pub fn particle_config(&self) -> ParticleConfig {
        ParticleConfig {
            count: self.particle_count,
            pipe_radius: self.pipe.radius,
            pipe_length: self.pipe_length,
            respawn_mode: self.respawn_mode,
            seed: self.seed,
        }
    }

    /// Validate every part of the configuration
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipe.validate()?;
        self.particle_config().validate()?;
        require_positive(self.timestep, ConfigError::InvalidTimestep)?;
        Ok(())
    }
}

/// Snapshot of simulation counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks run so far
    pub tick: u64,
    /// Simulated seconds
    pub elapsed: f64,
    /// Number of particles
    pub particle_count: usize,
    /// Live perturbations
    pub perturbation_count: usize,
    /// Current centreline speed
    pub flow_speed: f64,
    /// Particles respawned during the last tick
    pub respawned_last_tick: usize,
    /// Mean axial velocity sampled at the particle positions
    pub mean_axial_speed: f64,
}

/// Pipe flow plus tracers, advanced at a fixed timestep
pub struct PipeFlowSimulation {
    field: Rc<RefCell<PipeFlow>>,
    particles: ParticleSet,
    clock: FixedStepClock,
    timestep: f64,
    tick_count: u64,
    elapsed: f64,
    last_report: AdvanceReport,
}

impl PipeFlowSimulation {
    /// Build the field and particle set and wire them together
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any part of the configuration is invalid.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let field = Rc::new(RefCell::new(PipeFlow::new(config.pipe.clone())?));
        let mut particles = ParticleSet::new(config.particle_config())?;
        let shared: SharedField = field.clone();
        particles.attach_field(shared);

        info!(
            "Pipe flow simulation ready: {} particles, dt={:.4}s",
            config.particle_count, config.timestep
        );

        Ok(Self {
            field,
            particles,
            clock: FixedStepClock::new(config.timestep, config.max_ticks_per_frame),
            timestep: config.timestep,
            tick_count: 0,
            elapsed: 0.0,
            last_report: AdvanceReport::default(),
        })
    }

    /// Run one fixed tick: decay perturbations, then advect particles
    pub fn tick(&mut self) -> AdvanceReport {
        let dt = self.timestep;

        self.field.borrow_mut().advance_time(dt);
        let report = self.particles.advance(dt);

        self.tick_count += 1;
        self.elapsed += dt;
        self.last_report = report;
        report
    }

    /// Run `ticks` fixed ticks
    pub fn step(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Feed a wall-clock frame delta; runs however many ticks it covers
    ///
    /// Returns the number of ticks run.
    pub fn advance_frame(&mut self, frame_dt: f64) -> u32 {
        let ticks = self.clock.accumulate(frame_dt);
        self.step(ticks);
        ticks
    }

    /// Inject a source/sink at a picked world position
    pub fn add_perturbation(&mut self, position: Vec3, strength: f64) {
        self.field.borrow_mut().add_perturbation(position, strength);
    }

    /// Set the centreline speed of the base flow
    pub fn set_flow_speed(&mut self, speed: f64) {
        info!("Flow speed set to {:.3}", speed);
        self.field.borrow_mut().set_flow_speed(speed);
    }

    /// Hand the current particles to a renderer
    pub fn render<R: ParticleRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(self.particles.particles());
    }

    /// Read-only particle view
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// The particle set
    pub fn particle_set(&self) -> &ParticleSet {
        &self.particles
    }

    /// Mutable particle set, for scripted setups between ticks
    pub fn particle_set_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// Borrow the field
    pub fn field(&self) -> Ref<'_, PipeFlow> {
        self.field.borrow()
    }

    /// Fixed tick length
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current counters
    pub fn stats(&self) -> SimulationStats {
        let field = self.field.borrow();
        let particles = self.particles.particles();

        let axial_sum: f64 = particles
            .iter()
            .map(|p| field.sample(&p.position).z)
            .sum();
        let mean_axial_speed = if particles.is_empty() {
            0.0
        } else {
            axial_sum / particles.len() as f64
        };

        let stats = SimulationStats {
            tick: self.tick_count,
            elapsed: self.elapsed,
            particle_count: particles.len(),
            perturbation_count: field.perturbation_count(),
            flow_speed: field.flow_speed(),
            respawned_last_tick: self.last_report.respawned,
            mean_axial_speed,
        };
        debug!("Stats: {:?}", stats);
        stats
    }
}
