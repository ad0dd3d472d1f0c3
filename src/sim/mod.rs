//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Seeded RNG only (entropy is drawn once, at session creation)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod dirt;
pub mod input;
pub mod score;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use clock::FrameClock;
pub use dirt::DirtField;
pub use input::{DirectionKeys, DragOutput, InputMapper, InputState, from_input_drag};
pub use score::{
    Grade, ScoreCard, bump_penalty, cheer_for, composite_score, evaluate, par_time,
};
pub use state::{SessionState, SimEvent, make_seed};
pub use tick::tick;
pub use vehicle::VehicleState;
