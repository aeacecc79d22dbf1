//! Configuration errors.
//!
//! Every check happens once at construction. The per-tick paths
//! (`sample`, `advance_time`, `advance`) are infallible.

use thiserror::Error;

/// Rejected configuration for a field, particle set, or simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Pipe radius was zero, negative, or not finite.
    #[error("pipe radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    /// Pipe length was zero, negative, or not finite.
    #[error("pipe length must be finite and positive, got {0}")]
    InvalidLength(f64),

    /// A particle set must hold at least one particle.
    #[error("particle count must be at least 1")]
    EmptyParticleSet,

    /// Perturbation capacity must allow at least one entry.
    #[error("perturbation capacity must be at least 1")]
    ZeroCapacity,

    /// A named rate or threshold was negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidParameter {
        /// Parameter name as it appears in the config struct
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Simulation timestep was zero, negative, or not finite.
    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f64),
}

/// Ensure `value` is finite and strictly positive.
pub(crate) fn require_positive(value: f64, err: fn(f64) -> ConfigError) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(err(value))
    }
}

/// Ensure `value` is finite and not negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_radius_message_includes_value() {
        let msg = ConfigError::InvalidRadius(-2.5).to_string();
        assert!(msg.contains("-2.5"), "missing value in: {msg}");
    }

    #[test]
    fn invalid_parameter_names_the_field() {
        let msg = ConfigError::InvalidParameter {
            name: "temporal_decay_rate",
            value: f64::NAN,
        }
        .to_string();
        assert!(msg.contains("temporal_decay_rate"), "missing name in: {msg}");
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive(0.0, ConfigError::InvalidRadius).is_err());
        assert!(require_positive(f64::NAN, ConfigError::InvalidRadius).is_err());
        assert!(require_positive(f64::INFINITY, ConfigError::InvalidRadius).is_err());
        assert_eq!(require_positive(1.5, ConfigError::InvalidRadius), Ok(1.5));
    }

    #[test]
    fn require_non_negative_accepts_zero() {
        assert_eq!(require_non_negative("rate", 0.0), Ok(0.0));
        assert!(require_non_negative("rate", -0.1).is_err());
    }

    #[test]
    fn config_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<ConfigError>();
    }
}
