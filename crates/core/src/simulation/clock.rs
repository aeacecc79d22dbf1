//! Fixed-timestep accumulator
//!
//! Converts variable frame deltas into a whole number of fixed ticks so the
//! integrator always sees the same `dt`.

use tracing::warn;

/// Accumulates wall-clock time and releases it in fixed ticks
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepClock {
    timestep: f64,
    max_ticks_per_frame: u32,
    accumulator: f64,
}

impl FixedStepClock {
    /// Create a clock; `max_ticks_per_frame` is raised to at least 1
    pub fn new(timestep: f64, max_ticks_per_frame: u32) -> Self {
        Self {
            timestep,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: 0.0,
        }
    }

    /// Fixed tick length in seconds
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Time carried over to the next frame
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Add `frame_dt` and return how many ticks to run
    ///
    /// At most `max_ticks_per_frame` ticks are released; whole ticks beyond
    /// that are dropped so a stalled frame cannot trigger a catch-up spiral.
    /// Non-finite or non-positive deltas are ignored.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return 0;
        }

        self.accumulator += frame_dt;
        let mut ticks = 0;
        while self.accumulator >= self.timestep && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.timestep;
            ticks += 1;
        }

        if self.accumulator >= self.timestep {
            let dropped = (self.accumulator / self.timestep).floor();
            warn!(
                "Frame overran {} ticks, dropping {:.0} tick(s) of simulation time",
                self.max_ticks_per_frame, dropped
            );
            self.accumulator %= self.timestep;
        }

        ticks
    }

    /// Forget any pending time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_frame_yields_one_tick() {
        let mut clock = FixedStepClock::new(0.016, 5);
        assert_eq!(clock.accumulate(0.016), 1);
        assert_relative_eq!(clock.pending(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = FixedStepClock::new(0.1, 5);
        assert_eq!(clock.accumulate(0.06), 0);
        assert_eq!(clock.accumulate(0.06), 1);
        assert_relative_eq!(clock.pending(), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FixedStepClock::new(0.1, 3);
        assert_eq!(clock.accumulate(1.05), 3);
        assert!(clock.pending() < 0.1);
    }

    #[test]
    fn test_reset_discards_pending() {
        let mut clock = FixedStepClock::new(0.1, 5);
        assert_eq!(clock.accumulate(0.08), 0);
        clock.reset();
        assert_eq!(clock.pending(), 0.0);
        assert_eq!(clock.accumulate(0.08), 0, "reset time must not carry over");
        assert_eq!(clock.accumulate(0.03), 1);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut clock = FixedStepClock::new(0.1, 3);
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_eq!(clock.accumulate(f64::NAN), 0);
        assert_eq!(clock.pending(), 0.0);
        assert_eq!(FixedStepClock::new(0.1, 0).accumulate(0.1), 1);
    }
}
