//! Pipe Flow Core Library
//!
//! Simulates a laminar velocity field inside a cylindrical pipe, disturbed by
//! interactive point sources and sinks, and advects massless tracer particles
//! through it for visualization.
//!
//! ## Pieces
//!
//! - [`velocity`]: the [`VectorField`] trait and the [`PipeFlow`] model
//!   (Poiseuille base flow plus a bounded FIFO of decaying perturbations)
//! - [`advection`]: the [`ParticleSet`] RK4 integrator with domain recycling
//! - [`simulation`]: the fixed-tick [`PipeFlowSimulation`] driver
//!
//! Rendering, windowing and input are external; they consume particle
//! positions through [`ParticleRenderer`] and inject perturbations through
//! [`PipeFlowSimulation::add_perturbation`].
//!
//! ```
//! use pipe_flow_core::{PipeFlowSimulation, SimulationConfig, Vec3};
//!
//! let mut sim = PipeFlowSimulation::new(&SimulationConfig {
//!     particle_count: 100,
//!     seed: Some(1),
//!     ..SimulationConfig::default()
//! })
//! .expect("default geometry is valid");
//!
//! sim.add_perturbation(Vec3::new(0.0, 0.0, 10.0), 50.0);
//! sim.step(60);
//! assert_eq!(sim.particles().len(), 100);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Field model, integrator and driver
pub mod advection;
pub mod simulation;
pub mod velocity;

// Re-export core types
pub use core_types::Vec3;
pub use error::ConfigError;

pub use advection::{AdvanceReport, Particle, ParticleConfig, ParticleSet, RespawnMode, SharedField};
pub use simulation::{FixedStepClock, ParticleRenderer, PipeFlowSimulation, SimulationConfig, SimulationStats};
pub use velocity::{Perturbation, PipeFlow, PipeFlowConfig, VectorField};
