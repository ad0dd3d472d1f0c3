//! Session state
//!
//! One `SessionState` per attempt at a rink. Restarting means dropping it and
//! building a new one; nothing inside needs teardown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::FrameClock;
use super::dirt::DirtField;
use super::input::{DirectionKeys, InputMapper, InputState};
use super::score::ScoreCard;
use super::tick::tick;
use super::vehicle::VehicleState;
use crate::error::LevelError;
use crate::levels::Level;
use crate::tuning::Tuning;

/// Something the audio/visual layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// Emitted every tick: drives the engine hum
    Engine { throttle: f32, speed_norm: f32 },
    /// Vehicle hit the boards (rising edge only)
    Bump { intensity: f32 },
    /// Rink finished; emitted exactly once
    Completed(ScoreCard),
    /// Crowd reaction right after completion
    Cheer { intensity: f32 },
}

/// Oldest events are dropped beyond this many undrained
const MAX_QUEUED_EVENTS: usize = 64;

/// FNV-1a offset basis / prime (32-bit)
const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Mix a level id with per-session entropy into a dirt seed
pub fn make_seed(level_id: &str, entropy: u32) -> u64 {
    let hash = level_id
        .bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ b as u32).wrapping_mul(FNV_PRIME));
    (hash ^ entropy) as u64
}

/// Complete state of one attempt at a rink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub level: Level,
    /// Seed the dirt was generated from
    pub seed: u64,
    pub tuning: Tuning,
    pub dirt: DirtField,
    /// World size of one dirt cell
    pub cell_size: Vec2,
    pub vehicle: VehicleState,
    pub input: InputState,
    #[serde(skip)]
    pub mapper: InputMapper,

    /// 0..=100, recomputed every tick
    pub cleaned_percent: f32,
    /// Average dirt before any cleaning (feeds par time)
    pub initial_avg_dirt: f32,
    pub completed: bool,
    /// Seconds of simulated time
    pub elapsed: f32,
    pub ticks: u64,
    pub bump_count: u32,
    /// Vehicle is pressed against the boards this tick
    pub wall_contact: bool,
    /// Set on the completing tick
    pub score: Option<ScoreCard>,

    #[serde(skip)]
    events: Vec<SimEvent>,
}

impl SessionState {
    /// Start a session with dirt generated from `seed`
    pub fn new(level: &Level, seed: u64) -> Result<Self, LevelError> {
        Self::with_tuning(level, seed, Tuning::default())
    }

    pub fn with_tuning(level: &Level, seed: u64, tuning: Tuning) -> Result<Self, LevelError> {
        level.validate()?;
        let dirt = DirtField::randomized(&level.dirt, seed, level.blur_passes);
        Self::build(level, seed, dirt, tuning)
    }

    /// Start a session with freshly drawn entropy, so every run differs
    pub fn with_entropy(level: &Level) -> Result<Self, LevelError> {
        let seed = make_seed(&level.id, rand::random::<u32>());
        Self::new(level, seed)
    }

    /// Start a session on an exact dirt field (no noise blending)
    pub fn with_field(level: &Level, dirt: DirtField, tuning: Tuning) -> Result<Self, LevelError> {
        level.validate()?;
        let (cols, rows, len) = (dirt.cols(), dirt.rows(), dirt.tiles().len());
        if cols * rows != len {
            return Err(LevelError::GridSizeMismatch { cols, rows, len });
        }
        Self::build(level, 0, dirt, tuning)
    }

    fn build(level: &Level, seed: u64, dirt: DirtField, tuning: Tuning) -> Result<Self, LevelError> {
        let cell_size = level.rink.cell_size(dirt.cols(), dirt.rows());
        let vehicle = VehicleState::new(level.start, tuning.vehicle_width, tuning.vehicle_length);
        let initial_avg_dirt = dirt.average();
        let cleaned_percent = dirt.cleaned_percent();

        log::info!(
            "Session on {} ({}x{} grid, seed {:#x}, {:.1}% clean)",
            level.id,
            dirt.cols(),
            dirt.rows(),
            seed,
            cleaned_percent
        );

        Ok(Self {
            level: level.clone(),
            seed,
            tuning,
            dirt,
            cell_size,
            vehicle,
            input: InputState::default(),
            mapper: InputMapper::new(),
            cleaned_percent,
            initial_avg_dirt,
            completed: false,
            elapsed: 0.0,
            ticks: 0,
            bump_count: 0,
            wall_contact: false,
            score: None,
            events: Vec::new(),
        })
    }

    /// Advance one fixed tick; a finished session stays frozen
    pub fn advance(&mut self, dt: f32) {
        tick(self, dt);
    }

    /// Fold held keys into input, then run however many ticks `frame_dt` buys.
    /// Returns the number of ticks simulated.
    pub fn advance_frame(&mut self, clock: &mut FrameClock, frame_dt: f32) -> u32 {
        self.apply_keys();
        let ticks = clock.advance(frame_dt);
        for _ in 0..ticks {
            if self.completed {
                break;
            }
            self.advance(clock.dt());
        }
        ticks
    }

    // === Input forwarding ===

    pub fn pointer_down(&mut self, pos: Vec2, now_ms: f64) {
        self.mapper.pointer_down(&mut self.input, pos, now_ms);
    }

    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) {
        self.mapper
            .pointer_move(&mut self.input, &self.tuning, pos, now_ms);
    }

    pub fn pointer_up(&mut self, now_ms: f64) -> bool {
        self.mapper.pointer_up(&mut self.input, &self.tuning, now_ms)
    }

    pub fn set_keys(&mut self, keys: DirectionKeys) {
        self.mapper.set_keys(keys);
    }

    pub fn apply_keys(&mut self) {
        self.mapper.apply_keys(&mut self.input, &self.tuning);
    }

    // === Outputs ===

    /// Where the squeegee currently sits
    pub fn squeegee_position(&self) -> Vec2 {
        self.vehicle
            .squeegee_at(self.vehicle.position, self.tuning.squeegee_offset)
    }

    /// Dirt level just ahead of the squeegee (for spray effects)
    pub fn dirt_under_squeegee(&self) -> f32 {
        self.dirt.sample(self.squeegee_position(), self.cell_size)
    }

    /// Speed normalized for engine sound, 0..=1
    pub fn speed_norm(&self) -> f32 {
        (self.vehicle.speed() / self.tuning.scoring.engine_speed_ref).min(1.0)
    }

    /// Queue an event. Only the latest engine reading is kept, and the
    /// queue stays bounded when nobody drains it.
    pub(crate) fn push_event(&mut self, event: SimEvent) {
        if matches!(event, SimEvent::Engine { .. }) {
            self.events.retain(|e| !matches!(e, SimEvent::Engine { .. }));
        }
        if self.events.len() >= MAX_QUEUED_EVENTS {
            let excess = self.events.len() + 1 - MAX_QUEUED_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::levels;

    #[test]
    fn test_make_seed_depends_on_level_and_entropy() {
        assert_eq!(make_seed("level-1", 7), make_seed("level-1", 7));
        assert_ne!(make_seed("level-1", 7), make_seed("level-2", 7));
        assert_ne!(make_seed("level-1", 7), make_seed("level-1", 8));
    }

    #[test]
    fn test_new_session_starts_parked() {
        let level = levels::find("level-1").unwrap();
        let s = SessionState::new(&level, 1234).unwrap();
        assert_eq!(s.vehicle.position, level.start);
        assert_eq!(s.vehicle.velocity, Vec2::ZERO);
        assert_eq!(s.vehicle.heading, 0.0);
        assert_eq!(s.input, InputState::default());
        assert!(!s.completed);
        assert_eq!(s.bump_count, 0);
        assert_eq!(s.cell_size, Vec2::new(10.0, 10.0));
        assert!((s.initial_avg_dirt - s.dirt.average()).abs() < 1e-6);
        assert!(s.cleaned_percent < 100.0);
    }

    #[test]
    fn test_same_seed_same_dirt() {
        let level = levels::find("level-2").unwrap();
        let a = SessionState::new(&level, 99).unwrap();
        let b = SessionState::new(&level, 99).unwrap();
        assert_eq!(a.dirt, b.dirt);
    }

    #[test]
    fn test_with_entropy_builds() {
        let level = levels::find("level-3").unwrap();
        let s = SessionState::with_entropy(&level).unwrap();
        assert_eq!(s.dirt.cols(), 96);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut level = levels::find("level-1").unwrap();
        level.cleaning_radius = -1.0;
        assert!(SessionState::new(&level, 1).is_err());
    }

    #[test]
    fn test_pointer_input_drives_session() {
        let level = levels::find("level-1").unwrap();
        let mut s = SessionState::new(&level, 5).unwrap();
        s.pointer_down(Vec2::new(50.0, 50.0), 0.0);
        s.pointer_move(Vec2::new(50.0, 150.0), 100.0);
        assert_eq!(s.input.direction, Vec2::Y);
        assert_eq!(s.input.strength, 1.0);

        for _ in 0..30 {
            s.advance(SIM_DT);
        }
        assert!(s.vehicle.heading > 0.0);
        assert!(s.vehicle.speed() > 0.0);

        s.pointer_up(600.0);
        assert_eq!(s.input.strength, 0.0);
    }

    #[test]
    fn test_advance_frame_runs_fixed_ticks() {
        let level = levels::find("level-1").unwrap();
        let mut s = SessionState::new(&level, 5).unwrap();
        let mut clock = FrameClock::default();
        let ran = s.advance_frame(&mut clock, 0.055);
        assert_eq!(ran, 3);
        assert_eq!(s.ticks, 3);
        assert!((s.elapsed - 3.0 * SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_engine_events_drain() {
        let level = levels::find("level-1").unwrap();
        let mut s = SessionState::new(&level, 5).unwrap();
        s.advance(SIM_DT);
        s.advance(SIM_DT);
        let events = s.drain_events();
        // Engine readings coalesce to the latest one
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SimEvent::Engine { .. }));
        assert!(s.events().is_empty());
    }

    #[test]
    fn test_undrained_queue_stays_bounded() {
        let level = levels::find("level-1").unwrap();
        let mut s = SessionState::new(&level, 5).unwrap();
        for _ in 0..36_000 {
            s.advance(SIM_DT);
        }
        assert_eq!(s.events().len(), 1);

        for i in 0..200 {
            s.push_event(SimEvent::Bump {
                intensity: i as f32 / 200.0,
            });
        }
        assert!(s.events().len() <= MAX_QUEUED_EVENTS);
        // Newest events survive
        assert_eq!(
            s.events().last(),
            Some(&SimEvent::Bump {
                intensity: 199.0 / 200.0
            })
        );
    }

    #[test]
    fn test_events_serialize_tagged() {
        let json = serde_json::to_value(SimEvent::Bump { intensity: 0.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "bump", "intensity": 0.5 }));
    }
}
