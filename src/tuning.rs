//! Data-driven game balance
//!
//! Every physics and scoring constant the simulation reads lives here so a
//! tweak file can override them without a rebuild. `Tuning::default()` is the
//! shipped balance.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Physics, input and scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Vehicle ===
    pub max_speed: f32,
    pub boost_extra: f32,
    pub accel: f32,
    pub friction: f32,
    /// Radians per second
    pub turn_rate: f32,
    pub lateral_damp: f32,
    pub vehicle_width: f32,
    pub vehicle_length: f32,

    // === Rink / cleaning ===
    pub wall_inset: f32,
    /// Fraction of vehicle length the squeegee trails the centre
    pub squeegee_offset: f32,
    pub clean_radius_pad: f32,
    /// Percent cleaned that finishes the rink
    pub clean_threshold: f32,

    // === Input ===
    pub drag_deadzone: f32,
    pub drag_reach: f32,
    /// Units per millisecond
    pub flick_speed: f32,
    pub boost_ticks: u32,

    // === Scoring ===
    pub scoring: ScoreTuning,
}

/// Par time heuristic and grade tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    pub par_min: f32,
    pub par_base: f32,
    /// Rink area (units²) worth one second of par
    pub par_area_divisor: f32,
    /// Seconds of par per unit of initial average dirt
    pub par_dirt_weight: f32,
    /// Fraction of par to beat for the top grade
    pub top_tier: f32,
    /// Fraction of par to beat for the middle grade
    pub mid_tier: f32,
    /// Speed treated as "full" for engine level events
    pub engine_speed_ref: f32,
    /// Speed treated as a full-force impact for bump events
    pub bump_speed_ref: f32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            par_min: 10.0,
            par_base: 18.0,
            par_area_divisor: 9000.0,
            par_dirt_weight: 22.0,
            top_tier: 0.9,
            mid_tier: 1.15,
            engine_speed_ref: 180.0,
            bump_speed_ref: 220.0,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            boost_extra: BOOST_EXTRA,
            accel: ACCEL,
            friction: FRICTION,
            turn_rate: TURN_RATE,
            lateral_damp: LATERAL_DAMP,
            vehicle_width: ZAMBONI_WIDTH,
            vehicle_length: ZAMBONI_LENGTH,

            wall_inset: WALL_INSET,
            squeegee_offset: SQUEEGEE_OFFSET,
            clean_radius_pad: CLEAN_RADIUS_PAD,
            clean_threshold: CLEAN_THRESHOLD,

            drag_deadzone: DRAG_DEADZONE,
            drag_reach: DRAG_REACH,
            flick_speed: FLICK_SPEED,
            boost_ticks: BOOST_TICKS,

            scoring: ScoreTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning file; missing keys keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the integrator's clamps
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_speed", self.max_speed),
            ("turn_rate", self.turn_rate),
            ("vehicle_width", self.vehicle_width),
            ("vehicle_length", self.vehicle_length),
            ("drag_reach", self.drag_reach),
            ("clean_radius_pad", self.clean_radius_pad),
            ("par_area_divisor", self.scoring.par_area_divisor),
            ("engine_speed_ref", self.scoring.engine_speed_ref),
            ("bump_speed_ref", self.scoring.bump_speed_ref),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange {
                    name,
                    expected: "positive",
                    value,
                });
            }
        }

        let non_negative = [
            ("boost_extra", self.boost_extra),
            ("accel", self.accel),
            ("friction", self.friction),
            ("lateral_damp", self.lateral_damp),
            ("wall_inset", self.wall_inset),
            ("squeegee_offset", self.squeegee_offset),
            ("drag_deadzone", self.drag_deadzone),
            ("flick_speed", self.flick_speed),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange {
                    name,
                    expected: "non-negative",
                    value,
                });
            }
        }

        if !(self.clean_threshold > 0.0 && self.clean_threshold <= 100.0) {
            return Err(ConfigError::OutOfRange {
                name: "clean_threshold",
                expected: "in (0, 100]",
                value: self.clean_threshold,
            });
        }
        if self.scoring.mid_tier < self.scoring.top_tier {
            return Err(ConfigError::OutOfRange {
                name: "mid_tier",
                expected: "at least top_tier",
                value: self.scoring.mid_tier,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let t = Tuning::default();
        assert_eq!(t.max_speed, 120.0);
        assert_eq!(t.boost_ticks, 15);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "max_speed": 150.0, "scoring": { "par_min": 12.0 } }"#)
            .unwrap();
        assert_eq!(t.max_speed, 150.0);
        assert_eq!(t.friction, FRICTION);
        assert_eq!(t.scoring.par_min, 12.0);
        assert_eq!(t.scoring.par_base, 18.0);
    }

    #[test]
    fn test_json_round_trip() {
        let t = Tuning::default();
        let json = t.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), t);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "max_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "max_speed",
                ..
            }
        ));
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
