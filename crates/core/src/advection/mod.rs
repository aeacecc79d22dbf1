//! Massless tracer advection through a velocity field
//!
//! Each tick, every particle either
//!
//! 1. is outside the domain (`x² + y² > R²`, `z > L` or `z < 0`) and is
//!    respawned without integrating this tick, or
//! 2. takes one classic fourth-order Runge-Kutta step:
//!
//! ```text
//! k1 = v(p)
//! k2 = v(p + k1·dt/2)
//! k3 = v(p + k2·dt/2)
//! k4 = v(p + k3·dt)
//! p' = p + (k1 + 2·k2 + 2·k3 + k4)·dt/6
//! ```
//!
//! RK4 keeps trajectories smooth near perturbation centres where the
//! inverse-square term makes single-sample Euler steps overshoot.

pub mod spawn;

pub use spawn::{RespawnMode, SpawnSampler};

use crate::core_types::{radial_distance_sq, Vec3};
use crate::error::{require_positive, ConfigError};
use crate::velocity::VectorField;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Shared handle to the field a particle set samples
///
/// The driver keeps its own clone to mutate the field between ticks.
pub type SharedField = Rc<RefCell<dyn VectorField>>;

/// A single tracer particle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// World position
    pub position: Vec3,
    /// Seconds since the last respawn
    pub age: f64,
    /// Set on respawn; kept for state tracking
    pub active: bool,
}

/// Configuration for a particle set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Number of particles (fixed for the lifetime of the set)
    pub count: usize,
    /// Pipe radius used for the domain test and spawning
    pub pipe_radius: f64,
    /// Pipe length; the domain spans `0 <= z <= length`
    pub pipe_length: f64,
    /// Where particles reappear after leaving the domain
    pub respawn_mode: RespawnMode,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            pipe_radius: 5.0,
            pipe_length: 20.0,
            respawn_mode: RespawnMode::Volume,
            seed: None,
        }
    }
}

impl ParticleConfig {
    /// Check the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty set or a non-positive radius or length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::EmptyParticleSet);
        }
        require_positive(self.pipe_radius, ConfigError::InvalidRadius)?;
        require_positive(self.pipe_length, ConfigError::InvalidLength)?;
        Ok(())
    }
}

/// Outcome of one advection tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Particles that took an RK4 step
    pub integrated: usize,
    /// Particles recycled instead of integrated
    pub respawned: usize,
}

/// Fixed-size population of tracers confined to a cylindrical pipe
pub struct ParticleSet {
    particles: Vec<Particle>,
    pipe_radius: f64,
    pipe_length: f64,
    respawn_mode: RespawnMode,
    sampler: SpawnSampler,
    field: Option<SharedField>,
}

impl fmt::Debug for ParticleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleSet")
            .field("count", &self.particles.len())
            .field("pipe_radius", &self.pipe_radius)
            .field("pipe_length", &self.pipe_length)
            .field("respawn_mode", &self.respawn_mode)
            .field("has_field", &self.field.is_some())
            .finish_non_exhaustive()
    }
}

impl ParticleSet {
    /// Create and populate a particle set
    ///
    /// Every particle is placed uniformly through the pipe volume, whatever
    /// the respawn mode, so the first frame is already filled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn new(config: ParticleConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut set = Self {
            particles: vec![Particle::default(); config.count],
            pipe_radius: config.pipe_radius,
            pipe_length: config.pipe_length,
            respawn_mode: config.respawn_mode,
            sampler: SpawnSampler::new(config.pipe_radius, config.pipe_length, config.seed),
            field: None,
        };
        set.reset();

        info!(
            "Particle set initialized: {} particles, R={:.2}, L={:.2}, respawn={:?}",
            config.count, config.pipe_radius, config.pipe_length, config.respawn_mode
        );

        Ok(set)
    }

    /// Attach the field to sample during [`advance`](Self::advance)
    pub fn attach_field(&mut self, field: SharedField) {
        self.field = Some(field);
    }

    /// Detach the field; later `advance` calls do nothing
    pub fn detach_field(&mut self) -> Option<SharedField> {
        self.field.take()
    }

    /// Whether a field is attached
    pub fn has_field(&self) -> bool {
        self.field.is_some()
    }

    /// Read-only view of all particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterator over particle positions
    pub fn positions(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.particles.iter().map(|p| &p.position)
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false for a validated set; provided for API completeness
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Pipe radius
    pub fn pipe_radius(&self) -> f64 {
        self.pipe_radius
    }

    /// Pipe length
    pub fn pipe_length(&self) -> f64 {
        self.pipe_length
    }

    /// Tick-time respawn placement
    pub fn respawn_mode(&self) -> RespawnMode {
        self.respawn_mode
    }

    /// Mutable access to one particle, for scripted setups
    pub fn particle_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// Move particle `index` to `position`, resetting its age
    ///
    /// Returns false if the index is out of range.
    pub fn place_particle(&mut self, index: usize, position: Vec3) -> bool {
        match self.particles.get_mut(index) {
            Some(p) => {
                p.position = position;
                p.age = 0.0;
                p.active = true;
                true
            }
            None => false,
        }
    }

    /// Respawn every particle uniformly through the volume
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            let position = self.sampler.sample_volume();
            Self::reinit(p, position);
        }
    }

    /// True if `position` lies outside the pipe
    ///
    /// Radial test plus both axial bounds. Points exactly on the wall or on
    /// either end plane are inside. Non-finite positions are outside.
    pub fn is_out_of_domain(&self, position: &Vec3) -> bool {
        let inside = radial_distance_sq(position) <= self.pipe_radius * self.pipe_radius
            && (0.0..=self.pipe_length).contains(&position.z);
        !inside
    }

    /// Advance every particle by `dt` through the attached field
    ///
    /// No field attached is a silent no-op. A field that is mutably
    /// borrowed elsewhere is also skipped, with a warning.
    pub fn advance(&mut self, dt: f64) -> AdvanceReport {
        let Some(field) = self.field.clone() else {
            return AdvanceReport::default();
        };
        let Ok(field) = field.try_borrow() else {
            warn!("Velocity field is mutably borrowed; skipping advection tick");
            return AdvanceReport::default();
        };
        self.advance_with(&*field, dt)
    }

    /// Advance every particle by `dt` through a borrowed field
    pub fn advance_with(&mut self, field: &dyn VectorField, dt: f64) -> AdvanceReport {
        let mut report = AdvanceReport::default();

        for i in 0..self.particles.len() {
            let particle = self.particles[i];

            if !particle.active || self.is_out_of_domain(&particle.position) {
                // Freshly respawned particles skip integration this tick
                let position = self.sampler.sample(self.respawn_mode);
                Self::reinit(&mut self.particles[i], position);
                report.respawned += 1;
                continue;
            }

            let p = &mut self.particles[i];
            p.position = rk4_step(field, &p.position, dt);
            p.age += dt;
            report.integrated += 1;
        }

        debug!(
            "Advection tick: dt={:.4}, integrated={}, respawned={}",
            dt, report.integrated, report.respawned
        );

        report
    }

    fn reinit(particle: &mut Particle, position: Vec3) {
        particle.position = position;
        particle.age = 0.0;
        particle.active = true;
    }
}

/// One classic RK4 step of `dp/dt = v(p)`
pub fn rk4_step(field: &dyn VectorField, position: &Vec3, dt: f64) -> Vec3 {
    let half = dt * 0.5;
    let k1 = field.sample(position);
    let k2 = field.sample(&(position + k1 * half));
    let k3 = field.sample(&(position + k2 * half));
    let k4 = field.sample(&(position + k3 * dt));

    position + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
