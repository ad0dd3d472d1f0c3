//! Zamboni Rush entry point
//!
//! The browser build is driven through `zamboni_rush::web`. Natively this runs
//! a headless autopilot over every built-in rink and logs the results, which
//! is handy for checking a tuning file.
//!
//! Usage: `zamboni-rush [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::process::ExitCode;

    use glam::Vec2;
    use zamboni_rush::consts::SIM_DT;
    use zamboni_rush::sim::{SessionState, SimEvent, make_seed};
    use zamboni_rush::{Records, Tuning, angle_delta, levels};

    /// Give up on a rink after this much simulated time (seconds)
    const TIME_LIMIT: f32 = 600.0;
    /// Heading error (radians) beyond which the autopilot stops to turn
    const TURN_IN_PLACE: f32 = 0.5;

    /// Greedy driver: head for the nearest dirty cell, turning in place when
    /// the target is far off the nose so it never orbits.
    fn autopilot(session: &mut SessionState) {
        let pos = session.vehicle.position;
        let Some(target) = nearest_dirty_cell(session, pos) else {
            session.input.strength = 0.0;
            session.input.active = false;
            return;
        };

        let to_target = target - pos;
        let wanted = to_target.y.atan2(to_target.x);
        let error = angle_delta(session.vehicle.heading, wanted).abs();

        session.input.active = true;
        session.input.direction = to_target.normalize_or(Vec2::X);
        session.input.strength = if error > TURN_IN_PLACE { 0.0 } else { 1.0 };
    }

    fn nearest_dirty_cell(session: &SessionState, from: Vec2) -> Option<Vec2> {
        let dirt = &session.dirt;
        let cell = session.cell_size;
        let mut best: Option<(f32, Vec2)> = None;
        for y in 0..dirt.rows() {
            for x in 0..dirt.cols() {
                if dirt.get(x, y).unwrap_or(0.0) <= 0.0 {
                    continue;
                }
                let center = Vec2::new(
                    (x as f32 + 0.5) * cell.x,
                    (y as f32 + 0.5) * cell.y,
                );
                let d = center.distance_squared(from);
                if best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((d, center));
                }
            }
        }
        best.map(|(_, c)| c)
    }

    fn load_tuning() -> Result<Tuning, String> {
        let Some(path) = std::env::args().nth(1) else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
        Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Zamboni Rush (native) starting headless autopilot...");

        let tuning = match load_tuning() {
            Ok(t) => t,
            Err(e) => {
                log::error!("Bad tuning file: {e}");
                return ExitCode::FAILURE;
            }
        };

        let mut records = Records::load();
        for level in levels::all() {
            let seed = make_seed(&level.id, rand::random());
            let mut session = match SessionState::with_tuning(&level, seed, tuning.clone()) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("Cannot start {}: {e}", level.id);
                    return ExitCode::FAILURE;
                }
            };

            while !session.completed && session.elapsed < TIME_LIMIT {
                autopilot(&mut session);
                session.advance(SIM_DT);
                for event in session.drain_events() {
                    if let SimEvent::Bump { intensity } = event {
                        log::debug!("{}: bump at {:.1}s ({intensity:.2})", level.id, session.elapsed);
                    }
                }
            }

            match &session.score {
                Some(card) => {
                    records.record_run(&level.id, card.elapsed, card.bump_count, card.cleaned_percent);
                    let best = records.set_best_time(&level.id, card.elapsed);
                    records.mark_complete(&level.id);
                    println!(
                        "{:<18} {:>6.1}s  par {:>5.1}s  bumps {:>2}  {:<18} best {:.1}s",
                        level.name,
                        card.elapsed,
                        card.par,
                        card.bump_count,
                        card.grade.label(),
                        best
                    );
                }
                None => println!(
                    "{:<18} gave up after {:.0}s at {:.1}% clean",
                    level.name, session.elapsed, session.cleaned_percent
                ),
            }
        }
        records.save();

        if let Some(best) = &records.best_composite {
            println!("Best composite: {} on {}", best.score, best.level_id);
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    demo::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is zamboni_rush::web::start, this is just to satisfy the compiler
}
