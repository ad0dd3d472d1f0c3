//! Frame-delta accumulator
//!
//! Browsers call us at whatever rate they like; the simulation only ever
//! advances in whole `SIM_DT` steps.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps: max_substeps.max(1),
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Feed a wall-clock frame delta (seconds); returns fixed ticks to run.
    ///
    /// Backlog beyond `max_substeps` is dropped rather than caught up later.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == self.max_substeps && self.accumulator >= self.dt {
            self.accumulator = 0.0;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FrameClock::new(0.01, 8);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
    }

    #[test]
    fn test_caps_substeps_and_drops_backlog() {
        let mut clock = FrameClock::new(0.01, 4);
        assert_eq!(clock.advance(0.1), 4);
        // Backlog was discarded, a tiny frame does not trigger catch-up
        assert_eq!(clock.advance(0.001), 0);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        // Huge stalls clamp to MAX_FRAME_DT = 6 ticks at 60 Hz
        assert!(clock.advance(10.0) <= MAX_SUBSTEPS);
    }
}
