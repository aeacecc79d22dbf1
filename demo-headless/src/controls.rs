//! Mapping from UI-style controls to simulation inputs

use pipe_flow_core::Vec3;

/// Upper end of the integer speed slider
pub const SLIDER_MAX: u32 = 200;

/// Slider units per unit of centreline speed (0-200 maps to 0.0-4.0)
pub const SLIDER_UNITS_PER_SPEED: f64 = 50.0;

/// Strength applied by a click when none is given
pub const DEFAULT_POKE_STRENGTH: f64 = 50.0;

/// Map an integer slider value to a centreline speed
///
/// Values above [`SLIDER_MAX`] are clamped.
pub fn slider_to_speed(value: u32) -> f64 {
    f64::from(value.min(SLIDER_MAX)) / SLIDER_UNITS_PER_SPEED
}

/// A scripted perturbation injection, standing in for a pick event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poke {
    /// World position of the pick
    pub position: Vec3,
    /// Source (> 0) or sink (< 0) strength
    pub strength: f64,
}

/// Parse `x,y,z` or `x,y,z,strength`
///
/// Every value must be a finite number.
pub fn parse_poke(s: &str) -> Result<Poke, String> {
    let values = s
        .split(',')
        .map(|part| {
            let part = part.trim();
            match part.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(v) => Err(format!("'{}' is not finite ({})", part, v)),
                Err(e) => Err(format!("'{}' is not a number: {}", part, e)),
            }
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match values.as_slice() {
        [x, y, z] => Ok(Poke {
            position: Vec3::new(*x, *y, *z),
            strength: DEFAULT_POKE_STRENGTH,
        }),
        [x, y, z, strength] => Ok(Poke {
            position: Vec3::new(*x, *y, *z),
            strength: *strength,
        }),
        _ => Err(format!(
            "expected x,y,z or x,y,z,strength, got {} value(s)",
            values.len()
        )),
    }
}
