//! Vector type alias for 3D positions and velocities.

use nalgebra::Vector3;

/// 3D vector type for positions and velocity samples.
///
/// This is a simple alias for `nalgebra::Vector3<f64>`. The pipe axis runs
/// along Z, so the cross-section lives in the XY plane.
pub type Vec3 = Vector3<f64>;

/// Squared distance from the pipe axis (the Z axis).
///
/// Squared form avoids a square root in the hot domain and profile checks.
#[inline]
pub fn radial_distance_sq(position: &Vec3) -> f64 {
    position.x * position.x + position.y * position.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_distance_ignores_axial_component() {
        let a = Vec3::new(3.0, 4.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 100.0);
        assert_eq!(radial_distance_sq(&a), 25.0);
        assert_eq!(radial_distance_sq(&a), radial_distance_sq(&b));
    }
}
