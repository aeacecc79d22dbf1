//! Laminar Pipe Flow with Interactive Sources/Sinks
//!
//! # Base Flow
//!
//! Fully developed Hagen-Poiseuille flow in a circular pipe of radius `R`
//! whose axis is the Z axis:
//!
//! ```text
//! v_z(r) = U × (1 - r²/R²)     for r < R
//! v_z(r) = 0                   otherwise
//! ```
//!
//! where `U` is the centreline (base) speed. Velocity peaks on the axis and
//! vanishes at the wall.
//!
//! # Perturbations
//!
//! Each perturbation adds a radially directed push (source) or pull (sink)
//! with a softened inverse-square falloff:
//!
//! ```text
//! v_p(x) = S / (1 + k × d²) × (x - x_p) / d      for d > ε
//! ```
//!
//! Strength decays exponentially in time (`S ← S × e^(-λ dt)`) and the
//! perturbation is dropped once `|S|` falls below a fixed threshold, so
//! every injection has a finite lifetime.

use crate::core_types::{radial_distance_sq, Vec3};
use crate::error::{require_non_negative, require_positive, ConfigError};
use crate::velocity::{Perturbation, VectorField};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, trace, warn};

/// Default constants for the pipe-flow model
pub mod constants {
    /// Default pipe radius
    pub const DEFAULT_RADIUS: f64 = 5.0;

    /// Default centreline speed
    pub const DEFAULT_BASE_SPEED: f64 = 1.0;

    /// Maximum number of live perturbations
    pub const PERTURBATION_CAPACITY: usize = 5;

    /// Temporal decay rate λ (1/s); strength halves in ~0.35 s
    pub const TEMPORAL_DECAY_RATE: f64 = 2.0;

    /// Perturbations weaker than this are removed
    pub const MIN_STRENGTH: f64 = 0.5;

    /// Spatial softening constant `k` assigned to new perturbations
    pub const SPATIAL_FALLOFF: f64 = 0.5;

    /// Samples closer than this to a perturbation centre ignore it
    pub const SINGULARITY_RADIUS: f64 = 0.1;
}

/// Configuration for the pipe-flow field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeFlowConfig {
    /// Pipe radius `R`
    pub radius: f64,

    /// Initial centreline speed `U`
    pub base_speed: f64,

    /// Maximum live perturbations; the oldest is evicted when full
    pub capacity: usize,

    /// Temporal decay rate λ applied to every perturbation each tick
    pub temporal_decay_rate: f64,

    /// Removal threshold on `|strength|`
    pub min_strength: f64,

    /// Spatial softening constant given to new perturbations
    pub spatial_falloff: f64,

    /// Epsilon guard around perturbation centres
    pub singularity_radius: f64,
}

impl Default for PipeFlowConfig {
    fn default() -> Self {
        Self {
            radius: constants::DEFAULT_RADIUS,
            base_speed: constants::DEFAULT_BASE_SPEED,
            capacity: constants::PERTURBATION_CAPACITY,
            temporal_decay_rate: constants::TEMPORAL_DECAY_RATE,
            min_strength: constants::MIN_STRENGTH,
            spatial_falloff: constants::SPATIAL_FALLOFF,
            singularity_radius: constants::SINGULARITY_RADIUS,
        }
    }
}

impl PipeFlowConfig {
    /// Check the configuration once, before any sampling happens
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive radius, zero capacity, or a
    /// negative / non-finite rate or threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(self.radius, ConfigError::InvalidRadius)?;
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        require_non_negative("temporal_decay_rate", self.temporal_decay_rate)?;
        require_non_negative("min_strength", self.min_strength)?;
        require_non_negative("spatial_falloff", self.spatial_falloff)?;
        require_non_negative("singularity_radius", self.singularity_radius)?;
        Ok(())
    }
}

/// Laminar pipe flow plus a bounded FIFO of decaying perturbations
///
/// Deserializing goes through [`PipeFlow::new`] and
/// [`VectorField::add_perturbation`], so a loaded field obeys the same
/// validation and capacity rules as one built in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PipeFlowState")]
pub struct PipeFlow {
    config: PipeFlowConfig,

    /// Live perturbations in insertion order (front = oldest)
    perturbations: VecDeque<Perturbation>,
}

/// Wire shape of a serialized [`PipeFlow`]
#[derive(Deserialize)]
struct PipeFlowState {
    config: PipeFlowConfig,
    #[serde(default)]
    perturbations: Vec<PerturbationState>,
}

/// Serialized perturbation; its softening always comes from the config
#[derive(Deserialize)]
struct PerturbationState {
    position: Vec3,
    strength: f64,
}

impl TryFrom<PipeFlowState> for PipeFlow {
    type Error = ConfigError;

    fn try_from(state: PipeFlowState) -> Result<Self, Self::Error> {
        let mut flow = Self::new(state.config)?;
        for p in state.perturbations {
            flow.add_perturbation(p.position, p.strength);
        }
        Ok(flow)
    }
}

impl PipeFlow {
    /// Create a new pipe-flow field
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn new(config: PipeFlowConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            "Pipe flow initialized: R={:.2}, U={:.2}, capacity={}, decay={:.2}/s",
            config.radius, config.base_speed, config.capacity, config.temporal_decay_rate
        );

        Ok(Self {
            perturbations: VecDeque::with_capacity(config.capacity),
            config,
        })
    }

    /// Default configuration with the given pipe radius
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRadius`] for a non-positive radius.
    pub fn with_radius(radius: f64) -> Result<Self, ConfigError> {
        Self::new(PipeFlowConfig {
            radius,
            ..PipeFlowConfig::default()
        })
    }

    /// Pipe radius
    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    /// Current centreline speed
    pub fn flow_speed(&self) -> f64 {
        self.config.base_speed
    }

    /// Active configuration (reflects the current flow speed)
    pub fn config(&self) -> &PipeFlowConfig {
        &self.config
    }

    /// Live perturbations, oldest first
    pub fn perturbations(&self) -> impl ExactSizeIterator<Item = &Perturbation> + '_ {
        self.perturbations.iter()
    }

    /// Number of live perturbations
    pub fn perturbation_count(&self) -> usize {
        self.perturbations.len()
    }

    /// Drop every perturbation immediately
    pub fn clear_perturbations(&mut self) {
        debug!("Clearing {} perturbations", self.perturbations.len());
        self.perturbations.clear();
    }

    /// Axial Poiseuille component at radial distance² `r_sq`
    #[inline]
    fn base_axial_speed(&self, r_sq: f64) -> f64 {
        let wall_sq = self.config.radius * self.config.radius;
        if r_sq < wall_sq {
            self.config.base_speed * (1.0 - r_sq / wall_sq)
        } else {
            0.0
        }
    }
}

impl VectorField for PipeFlow {
    fn sample(&self, position: &Vec3) -> Vec3 {
        // 1. Base Poiseuille flow along Z
        let mut v = Vec3::new(0.0, 0.0, self.base_axial_speed(radial_distance_sq(position)));

        // 2. Interactive sources/sinks
        for pert in &self.perturbations {
            v += pert.contribution_at(position, self.config.singularity_radius);
        }
        v
    }

    fn add_perturbation(&mut self, position: Vec3, strength: f64) {
        if !strength.is_finite() || !position.iter().all(|c| c.is_finite()) {
            warn!(
                "Ignoring non-finite perturbation: strength {} at ({}, {}, {})",
                strength, position.x, position.y, position.z
            );
            return;
        }

        while self.perturbations.len() >= self.config.capacity {
            let Some(evicted) = self.perturbations.pop_front() else {
                break;
            };
            trace!(
                "Perturbation capacity {} reached, evicting strength {:.3} at ({:.2}, {:.2}, {:.2})",
                self.config.capacity,
                evicted.strength,
                evicted.position.x,
                evicted.position.y,
                evicted.position.z
            );
        }

        debug!(
            "Adding perturbation: strength {:.2} at ({:.2}, {:.2}, {:.2})",
            strength, position.x, position.y, position.z
        );
        self.perturbations
            .push_back(Perturbation::new(position, strength, self.config.spatial_falloff));
    }

    fn set_flow_speed(&mut self, speed: f64) {
        debug!("Flow speed {:.3} -> {:.3}", self.config.base_speed, speed);
        self.config.base_speed = speed;
    }

    fn advance_time(&mut self, dt: f64) {
        let rate = self.config.temporal_decay_rate;
        for pert in &mut self.perturbations {
            pert.decay_step(rate, dt);
        }

        let min_strength = self.config.min_strength;
        let before = self.perturbations.len();
        self.perturbations.retain(|p| !p.is_spent(min_strength));

        let expired = before - self.perturbations.len();
        if expired > 0 {
            trace!(
                "{} perturbation(s) expired, {} remaining",
                expired,
                self.perturbations.len()
            );
        }
    }
}
