//! Velocity field abstraction and the laminar pipe-flow model
//!
//! A [`VectorField`] maps any 3D point to a velocity sample. The particle
//! integrator only ever reads through this trait, so the field model can be
//! swapped (uniform test fields, alternative profiles) without touching the
//! advection code.

pub mod perturbation;
pub mod pipe_flow;

pub use perturbation::Perturbation;
pub use pipe_flow::{constants, PipeFlow, PipeFlowConfig};

use crate::core_types::Vec3;

/// Interface for any fluid velocity field sampled by the tracer particles
///
/// Sampling takes `&self`: the field is read-only for the duration of a
/// particle tick. Mutation (`add_perturbation`, `set_flow_speed`,
/// `advance_time`) happens between ticks.
pub trait VectorField {
    /// Velocity at `position`
    ///
    /// Always returns a value; the zero vector is a valid sample.
    fn sample(&self, position: &Vec3) -> Vec3;

    /// Inject a transient point source (`strength > 0`) or sink (`strength < 0`)
    fn add_perturbation(&mut self, position: Vec3, strength: f64);

    /// Set the axial speed of the base flow
    ///
    /// Negative values reverse the flow. Takes effect on the next sample.
    fn set_flow_speed(&mut self, speed: f64);

    /// Advance time-dependent state by `dt` seconds
    ///
    /// Fields with no time-dependent state keep the default no-op.
    fn advance_time(&mut self, _dt: f64) {}
}
