//! Transient point sources and sinks

use crate::core_types::Vec3;
use serde::Serialize;

/// A decaying point disturbance added on top of the base flow
///
/// Positive strength pushes fluid radially outward from `position`, negative
/// strength pulls it inward. `decay` is the *spatial* softening constant of
/// the falloff `strength / (1 + decay * d²)`; the temporal decay applied every
/// tick is a property of the owning field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Perturbation {
    pub(crate) position: Vec3,
    pub(crate) strength: f64,
    pub(crate) decay: f64,
}

impl Perturbation {
    /// Create a perturbation at `position`
    ///
    /// A negative or NaN `decay` is clamped to zero so the falloff
    /// denominator never drops below one.
    pub fn new(position: Vec3, strength: f64, decay: f64) -> Self {
        Self {
            position,
            strength,
            decay: decay.max(0.0),
        }
    }

    /// World position of the source/sink centre
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current (signed) strength
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Spatial softening constant
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Exponential decay over `dt`: `strength *= e^(-rate * dt)`
    pub(crate) fn decay_step(&mut self, rate: f64, dt: f64) {
        self.strength *= (-rate * dt).exp();
    }

    /// True once `|strength|` has fallen below `min_strength`
    ///
    /// A non-finite strength is always spent.
    pub fn is_spent(&self, min_strength: f64) -> bool {
        !self.strength.is_finite() || self.strength.abs() < min_strength
    }

    /// Velocity contributed at `point`
    ///
    /// Radially directed away from the centre, scaled by
    /// `strength / (1 + decay * d²)`. Points within `singularity_radius` of
    /// the centre receive nothing.
    pub fn contribution_at(&self, point: &Vec3, singularity_radius: f64) -> Vec3 {
        let offset = point - self.position;
        let dist_sq = offset.norm_squared();
        let dist = dist_sq.sqrt();

        if dist <= singularity_radius {
            return Vec3::zeros();
        }

        // Softened denominator is >= 1 for non-negative decay
        let factor = self.strength / (1.0 + self.decay * dist_sq);
        offset * (factor / dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_source_pushes_outward() {
        let source = Perturbation::new(Vec3::zeros(), 10.0, 0.5);
        let v = source.contribution_at(&Vec3::new(2.0, 0.0, 0.0), 0.1);

        // factor = 10 / (1 + 0.5 * 4) = 10/3
        assert_relative_eq!(v.x, 10.0 / 3.0, epsilon = 1e-12);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_sink_pulls_inward() {
        let sink = Perturbation::new(Vec3::new(0.0, 0.0, 5.0), -4.0, 0.5);
        let v = sink.contribution_at(&Vec3::new(0.0, 0.0, 6.0), 0.1);
        assert!(v.z < 0.0, "sink should pull toward its centre: {v:?}");
    }

    #[test]
    fn test_singularity_guard() {
        let source = Perturbation::new(Vec3::new(1.0, 1.0, 1.0), 50.0, 0.5);
        assert_eq!(source.contribution_at(&Vec3::new(1.0, 1.0, 1.0), 0.1), Vec3::zeros());
        assert_eq!(source.contribution_at(&Vec3::new(1.05, 1.0, 1.0), 0.1), Vec3::zeros());
        assert_ne!(source.contribution_at(&Vec3::new(1.2, 1.0, 1.0), 0.1), Vec3::zeros());
    }

    #[test]
    fn test_decay_step_and_spent() {
        let mut p = Perturbation::new(Vec3::zeros(), -1.0, 0.5);
        p.decay_step(2.0, 0.5);
        assert_relative_eq!(p.strength(), -(-1.0_f64).exp(), epsilon = 1e-12);
        assert!(p.is_spent(0.5));
        assert!(!p.is_spent(0.3));
    }

    #[test]
    fn test_non_finite_strength_is_spent() {
        assert!(Perturbation::new(Vec3::zeros(), f64::NAN, 0.5).is_spent(0.5));
        assert!(Perturbation::new(Vec3::zeros(), f64::INFINITY, 0.5).is_spent(0.5));
        assert!(Perturbation::new(Vec3::zeros(), f64::NEG_INFINITY, 0.5).is_spent(0.0));
    }

    #[test]
    fn test_negative_decay_clamped() {
        let source = Perturbation::new(Vec3::zeros(), 10.0, -0.25);
        assert_eq!(source.decay(), 0.0);
        assert_eq!(Perturbation::new(Vec3::zeros(), 10.0, f64::NAN).decay(), 0.0);

        // d² = 4 would zero a -0.25 denominator; clamped it is plain 1/r falloff
        let v = source.contribution_at(&Vec3::new(2.0, 0.0, 0.0), 0.1);
        assert!(v.x.is_finite());
        assert_relative_eq!(v.x, 10.0, epsilon = 1e-12);
    }
}
