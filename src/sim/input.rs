//! Input mapping
//!
//! Drag gestures and held keys both boil down to the same `InputState`:
//! a steering direction, a throttle strength and a boost countdown. The
//! last modality to write wins; the UI layer decides precedence.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Steering intent consumed by the integrator every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// A drag, touch or key gesture is currently driving
    pub active: bool,
    /// Unit vector (or the +x default when idle)
    pub direction: Vec2,
    /// Throttle fraction in [0, 1]
    pub strength: f32,
    /// Ticks of boost remaining
    pub boost_ticks: u32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            active: false,
            direction: Vec2::X,
            strength: 0.0,
            boost_ticks: 0,
        }
    }
}

impl InputState {
    /// Queue a boost burst (flick or boost key)
    pub fn add_boost(&mut self, ticks: u32) {
        self.boost_ticks = self.boost_ticks.saturating_add(ticks);
    }

    pub fn boosting(&self) -> bool {
        self.boost_ticks > 0
    }
}

/// Direction and throttle derived from a drag offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutput {
    pub direction: Vec2,
    pub strength: f32,
}

/// Map a drag offset from the gesture start to steering.
///
/// Drags inside the deadzone report zero throttle and the default direction.
pub fn from_input_drag(dx: f32, dy: f32, tuning: &Tuning) -> DragOutput {
    let len = dx.hypot(dy);
    if !(len >= tuning.drag_deadzone) || len == 0.0 {
        return DragOutput {
            direction: Vec2::X,
            strength: 0.0,
        };
    }
    DragOutput {
        direction: Vec2::new(dx / len, dy / len),
        strength: (len / tuning.drag_reach).clamp(0.0, 1.0),
    }
}

/// Currently held keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

impl DirectionKeys {
    /// Combined intent in {-1, 0, 1}² (screen coordinates, +y down)
    pub fn intent(&self) -> Vec2 {
        let dx = self.right as i8 - self.left as i8;
        let dy = self.down as i8 - self.up as i8;
        Vec2::new(dx as f32, dy as f32)
    }
}

/// An in-progress pointer drag
#[derive(Debug, Clone, Copy)]
struct DragGesture {
    start: Vec2,
    last: Vec2,
    /// Timestamp of the last sample (ms)
    last_time: f64,
}

/// Turns raw pointer and key events into `InputState` updates
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    drag: Option<DragGesture>,
    keys: DirectionKeys,
    keys_driving: bool,
    prev_boost: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer/touch pressed at `pos` (screen units), `now_ms` in milliseconds
    pub fn pointer_down(&mut self, input: &mut InputState, pos: Vec2, now_ms: f64) {
        self.drag = Some(DragGesture {
            start: pos,
            last: pos,
            last_time: now_ms,
        });
        input.active = true;
    }

    /// Pointer moved while pressed
    pub fn pointer_move(&mut self, input: &mut InputState, tuning: &Tuning, pos: Vec2, now_ms: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta = pos - drag.start;
        let out = from_input_drag(delta.x, delta.y, tuning);
        input.direction = out.direction;
        input.strength = out.strength;

        drag.last = pos;
        drag.last_time = now_ms;
    }

    /// Pointer released. Returns true when the release counted as a flick.
    pub fn pointer_up(&mut self, input: &mut InputState, tuning: &Tuning, now_ms: f64) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let elapsed_ms = (now_ms - drag.last_time).max(1.0) as f32;
        let flick_speed = (drag.last - drag.start).length() / elapsed_ms;
        let flicked = flick_speed > tuning.flick_speed;

        input.active = false;
        input.strength = 0.0;
        if flicked {
            input.add_boost(tuning.boost_ticks);
            log::debug!("Flick boost ({flick_speed:.2} units/ms)");
        }
        flicked
    }

    /// Record the currently held keys; applied on the next `apply_keys`
    pub fn set_keys(&mut self, keys: DirectionKeys) {
        self.keys = keys;
    }

    /// Fold held keys into the input (call once per frame, before ticking)
    pub fn apply_keys(&mut self, input: &mut InputState, tuning: &Tuning) {
        let intent = self.keys.intent();
        if intent != Vec2::ZERO {
            input.active = true;
            input.direction = intent / intent.length();
            input.strength = 1.0;
            self.keys_driving = true;
        } else if self.keys_driving {
            self.keys_driving = false;
            if !self.dragging() {
                input.active = false;
            }
        }

        // Idle input keeps its heading but coasts
        if !input.active {
            input.strength = 0.0;
        }

        // Boost fires on the press edge only
        if self.keys.boost && !self.prev_boost {
            input.add_boost(tuning.boost_ticks);
        }
        self.prev_boost = self.keys.boost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_drag() {
        let out = from_input_drag(2.0, 1.0, &Tuning::default());
        assert_eq!(out.strength, 0.0);
        assert_eq!(out.direction, Vec2::X);
    }

    #[test]
    fn test_full_throttle_drag() {
        let out = from_input_drag(100.0, 0.0, &Tuning::default());
        assert_eq!(out.direction, Vec2::new(1.0, 0.0));
        assert_eq!(out.strength, 1.0);
    }

    #[test]
    fn test_partial_drag_scales_strength() {
        let out = from_input_drag(0.0, -40.0, &Tuning::default());
        assert_eq!(out.direction, Vec2::new(0.0, -1.0));
        assert!((out.strength - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_drag_and_slow_release() {
        let tuning = Tuning::default();
        let mut mapper = InputMapper::new();
        let mut input = InputState::default();

        mapper.pointer_down(&mut input, Vec2::new(100.0, 100.0), 0.0);
        assert!(input.active);
        mapper.pointer_move(&mut input, &tuning, Vec2::new(100.0, 160.0), 500.0);
        assert_eq!(input.direction, Vec2::new(0.0, 1.0));
        assert!((input.strength - 0.75).abs() < 1e-6);

        // 60 units over a 500ms hold is no flick
        let flicked = mapper.pointer_up(&mut input, &tuning, 1000.0);
        assert!(!flicked);
        assert!(!input.active);
        assert_eq!(input.strength, 0.0);
        assert_eq!(input.boost_ticks, 0);
        // Direction is remembered after release
        assert_eq!(input.direction, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_flick_grants_boost() {
        let tuning = Tuning::default();
        let mut mapper = InputMapper::new();
        let mut input = InputState::default();

        mapper.pointer_down(&mut input, Vec2::ZERO, 0.0);
        mapper.pointer_move(&mut input, &tuning, Vec2::new(90.0, 0.0), 40.0);
        assert!(mapper.pointer_up(&mut input, &tuning, 50.0));
        assert_eq!(input.boost_ticks, tuning.boost_ticks);
        assert!(!mapper.dragging());
        // Stray release without a drag does nothing
        assert!(!mapper.pointer_up(&mut input, &tuning, 60.0));
    }

    #[test]
    fn test_keys_normalize_diagonal() {
        let tuning = Tuning::default();
        let mut mapper = InputMapper::new();
        let mut input = InputState::default();

        mapper.set_keys(DirectionKeys {
            up: true,
            right: true,
            ..Default::default()
        });
        mapper.apply_keys(&mut input, &tuning);
        assert!(input.active);
        assert_eq!(input.strength, 1.0);
        assert!((input.direction.length() - 1.0).abs() < 1e-6);
        assert!(input.direction.x > 0.0 && input.direction.y < 0.0);

        // Opposing keys cancel out and release the throttle
        mapper.set_keys(DirectionKeys {
            left: true,
            right: true,
            ..Default::default()
        });
        mapper.apply_keys(&mut input, &tuning);
        assert!(!input.active);
        assert_eq!(input.strength, 0.0);
    }

    #[test]
    fn test_boost_key_fires_on_press_edge() {
        let tuning = Tuning::default();
        let mut mapper = InputMapper::new();
        let mut input = InputState::default();
        let held = DirectionKeys {
            boost: true,
            ..Default::default()
        };

        mapper.set_keys(held);
        for _ in 0..5 {
            mapper.apply_keys(&mut input, &tuning);
        }
        assert_eq!(input.boost_ticks, tuning.boost_ticks);

        mapper.set_keys(DirectionKeys::default());
        mapper.apply_keys(&mut input, &tuning);
        mapper.set_keys(held);
        mapper.apply_keys(&mut input, &tuning);
        assert_eq!(input.boost_ticks, 2 * tuning.boost_ticks);
    }

    #[test]
    fn test_key_release_keeps_active_drag() {
        let tuning = Tuning::default();
        let mut mapper = InputMapper::new();
        let mut input = InputState::default();

        mapper.set_keys(DirectionKeys {
            left: true,
            ..Default::default()
        });
        mapper.apply_keys(&mut input, &tuning);
        mapper.pointer_down(&mut input, Vec2::ZERO, 0.0);
        mapper.pointer_move(&mut input, &tuning, Vec2::new(0.0, 80.0), 16.0);

        mapper.set_keys(DirectionKeys::default());
        mapper.apply_keys(&mut input, &tuning);
        assert!(input.active);
        assert_eq!(input.strength, 1.0);
    }
}
