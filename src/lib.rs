//! Zamboni Rush - steer a Zamboni around a rink and scrape the ice clean
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (vehicle physics, dirt field, scoring)
//! - `levels`: Built-in rinks and their base dirt patterns
//! - `tuning`: Data-driven physics and scoring balance
//! - `records`: Career records and best times (LocalStorage on web)
//! - `web`: wasm-bindgen handle driven by the page (wasm32 only)

pub mod error;
pub mod levels;
pub mod records;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, LevelError};
pub use levels::{Level, RinkGeometry};
pub use records::Records;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Boost duration granted by a flick or the boost key (250ms)
    pub const BOOST_TICKS: u32 = TICK_RATE / 4;

    /// Top speed in world units per second
    pub const MAX_SPEED: f32 = 120.0;
    /// Extra top speed and acceleration while boosting
    pub const BOOST_EXTRA: f32 = 50.0;
    /// Forward acceleration at full throttle (units/s²)
    pub const ACCEL: f32 = 210.0;
    /// Linear deceleration applied every tick (units/s²)
    pub const FRICTION: f32 = 130.0;
    /// Maximum steering rate (radians per second)
    pub const TURN_RATE: f32 = std::f32::consts::PI * 1.2;
    /// Sideways velocity damping per second (higher = less slide)
    pub const LATERAL_DAMP: f32 = 8.0;

    /// Zamboni footprint
    pub const ZAMBONI_WIDTH: f32 = 28.0;
    pub const ZAMBONI_LENGTH: f32 = 42.0;

    /// Distance kept between the vehicle centre and the boards
    pub const WALL_INSET: f32 = 8.0;
    /// Squeegee sits this fraction of the vehicle length behind the centre
    pub const SQUEEGEE_OFFSET: f32 = 0.45;
    /// Cleaning radius is padded slightly to close gaps between ticks
    pub const CLEAN_RADIUS_PAD: f32 = 1.05;

    /// Drag shorter than this is ignored (screen units)
    pub const DRAG_DEADZONE: f32 = 5.0;
    /// Drag length that reaches full throttle
    pub const DRAG_REACH: f32 = 80.0;
    /// Release speed (units per ms) that counts as a flick
    pub const FLICK_SPEED: f32 = 0.8;

    /// Cleaned percentage required to finish a rink
    pub const CLEAN_THRESHOLD: f32 = 100.0;
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Shortest signed rotation taking `from` onto `to`, in (-π, π]
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Unit vector pointing along `heading`
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Normalize with a fallback length of 1 so a zero vector stays zero
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    let len = if len > 0.0 { len } else { 1.0 };
    v / len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-4);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_angle_delta_takes_short_way() {
        let d = angle_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_safe_normalize_zero() {
        assert_eq!(safe_normalize(Vec2::ZERO), Vec2::ZERO);
        assert!((safe_normalize(Vec2::new(3.0, 4.0)).length() - 1.0).abs() < 1e-6);
    }
}
