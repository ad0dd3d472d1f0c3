//! Browser bindings
//!
//! A thin handle the page's canvas/HUD/audio code drives once per animation
//! frame. Rendering and sound stay in JS; this only forwards input, steps the
//! simulation and exposes what to draw.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::levels;
use crate::records::Records;
use crate::sim::{DirectionKeys, FrameClock, SessionState};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed (hot reload)
    }
    log::info!("Zamboni Rush core loaded");
}

/// One playable rink plus the player's records
#[wasm_bindgen]
pub struct ZamboniGame {
    session: SessionState,
    clock: FrameClock,
    records: Records,
    /// Best time after this run was recorded
    best_time: Option<f32>,
}

#[wasm_bindgen]
impl ZamboniGame {
    #[wasm_bindgen(constructor)]
    pub fn new(level_id: &str) -> Result<ZamboniGame, JsValue> {
        let level = levels::find(level_id).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session =
            SessionState::with_entropy(&level).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let records = Records::load();
        let best_time = records.best_time(level_id);
        Ok(Self {
            session,
            clock: FrameClock::default(),
            records,
            best_time,
        })
    }

    /// Fresh dirt, vehicle back at the start
    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session = SessionState::with_tuning(
            &self.session.level,
            crate::sim::make_seed(&self.session.level.id, rand::random()),
            self.session.tuning.clone(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.clock.reset();
        Ok(())
    }

    /// Step with the wall-clock delta (seconds) since the last frame
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        let was_completed = self.session.completed;
        let ticks = self.session.advance_frame(&mut self.clock, frame_dt);

        if self.session.completed && !was_completed {
            let id = self.session.level.id.clone();
            let s = &self.session;
            self.records
                .record_run(&id, s.elapsed, s.bump_count, s.cleaned_percent);
            self.best_time = Some(self.records.set_best_time(&id, s.elapsed));
            self.records.mark_complete(&id);
            self.records.save();
        }
        ticks
    }

    // === Input ===

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.pointer_down(Vec2::new(x, y), js_sys::Date::now());
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.session.pointer_move(Vec2::new(x, y), js_sys::Date::now());
    }

    /// Returns true when the release was a boost flick
    pub fn pointer_up(&mut self) -> bool {
        self.session.pointer_up(js_sys::Date::now())
    }

    pub fn set_keys(&mut self, up: bool, down: bool, left: bool, right: bool, boost: bool) {
        self.session.set_keys(DirectionKeys {
            up,
            down,
            left,
            right,
            boost,
        });
    }

    // === Outputs ===

    pub fn x(&self) -> f32 {
        self.session.vehicle.position.x
    }

    pub fn y(&self) -> f32 {
        self.session.vehicle.position.y
    }

    pub fn heading(&self) -> f32 {
        self.session.vehicle.heading
    }

    pub fn speed_norm(&self) -> f32 {
        self.session.speed_norm()
    }

    pub fn throttle(&self) -> f32 {
        self.session.input.strength
    }

    pub fn dirt_under_squeegee(&self) -> f32 {
        self.session.dirt_under_squeegee()
    }

    pub fn cleaned_percent(&self) -> f32 {
        self.session.cleaned_percent
    }

    pub fn elapsed(&self) -> f32 {
        self.session.elapsed
    }

    pub fn bump_count(&self) -> u32 {
        self.session.bump_count
    }

    pub fn wall_contact(&self) -> bool {
        self.session.wall_contact
    }

    pub fn completed(&self) -> bool {
        self.session.completed
    }

    pub fn grade(&self) -> Option<String> {
        self.session
            .score
            .as_ref()
            .map(|c| c.grade.label().to_string())
    }

    pub fn par(&self) -> Option<f32> {
        self.session.score.as_ref().map(|c| c.par)
    }

    pub fn best_time(&self) -> Option<f32> {
        self.best_time
    }

    pub fn cols(&self) -> usize {
        self.session.dirt.cols()
    }

    pub fn rows(&self) -> usize {
        self.session.dirt.rows()
    }

    /// Row-major dirt values for the ice overlay
    pub fn dirt_tiles(&self) -> Vec<f32> {
        self.session.dirt.tiles().to_vec()
    }

    /// Pending events as a JSON array (engine, bump, completed)
    pub fn drain_events(&mut self) -> String {
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to serialize events: {e}");
            "[]".to_string()
        })
    }
}
