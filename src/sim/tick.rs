//! Fixed timestep simulation tick
//!
//! Steers, accelerates and slides the Zamboni, keeps it inside the boards,
//! scrapes the ice under the squeegee and checks for a finished rink.

use glam::Vec2;

use super::score::{cheer_for, evaluate};
use super::state::{SessionState, SimEvent};
use crate::levels::is_final_level;
use crate::{angle_delta, heading_vector, normalize_angle, safe_normalize};

/// Advance the session by one fixed timestep.
///
/// A completed session is frozen: further calls do nothing.
pub fn tick(state: &mut SessionState, dt: f32) {
    if state.completed {
        return;
    }

    let was_touching = state.wall_contact;
    integrate(state, dt);

    let speed = state.vehicle.speed();
    let throttle = state.input.strength;
    let speed_norm = state.speed_norm();
    state.push_event(SimEvent::Engine {
        throttle,
        speed_norm,
    });

    if state.wall_contact && !was_touching {
        let intensity = (speed / state.tuning.scoring.bump_speed_ref).min(1.0);
        log::debug!("Bump #{} (intensity {:.2})", state.bump_count, intensity);
        state.push_event(SimEvent::Bump { intensity });
    }

    if state.completed {
        let card = evaluate(
            state.level.rink.area(),
            state.initial_avg_dirt,
            state.elapsed,
            state.bump_count,
            state.cleaned_percent,
            &state.tuning.scoring,
        );
        log::info!(
            "{} cleaned in {:.2}s with {} bumps: {} (par {:.1}s)",
            state.level.id,
            state.elapsed,
            state.bump_count,
            card.grade.label(),
            card.par
        );
        let intensity = cheer_for(card.grade, is_final_level(&state.level.id));
        state.score = Some(card.clone());
        state.push_event(SimEvent::Completed(card));
        state.push_event(SimEvent::Cheer { intensity });
    }
}

/// The physics step proper
fn integrate(state: &mut SessionState, dt: f32) {
    let t = &state.tuning;
    let input = &state.input;
    let z = &mut state.vehicle;
    let boost = if input.boosting() { t.boost_extra } else { 0.0 };

    // Heavy vehicle: turn toward the commanded direction at a bounded rate
    let target = input.direction.y.atan2(input.direction.x);
    let max_turn = t.turn_rate * dt;
    let turn = angle_delta(z.heading, target).clamp(-max_turn, max_turn);
    z.heading = normalize_angle(z.heading + turn);

    // Throttle plus boost
    let forward = heading_vector(z.heading);
    let accel = t.accel * input.strength + boost;
    z.velocity += forward * (accel * dt);

    // Damp only the sideways part of the velocity
    let forward_vel = forward * z.velocity.dot(forward);
    let side_vel = z.velocity - forward_vel;
    if side_vel.length_squared() > 0.0 {
        let damp = (1.0 - t.lateral_damp * dt).max(0.0);
        z.velocity = forward_vel + side_vel * damp;
    }

    // Linear friction, never reversing direction
    let speed = z.velocity.length();
    if speed > 0.0 {
        let slowed = (speed - t.friction * dt).max(0.0);
        z.velocity *= slowed / speed;
    }

    let cap = t.max_speed + boost;
    if z.velocity.length() > cap {
        z.velocity = safe_normalize(z.velocity) * cap;
    }

    let prev_position = z.position;
    z.position += z.velocity * dt;

    // Rectangular clamp; the drawn rounded corners are not enforced
    let rink = state.level.rink;
    let inset = t.wall_inset;
    let min = Vec2::splat(inset);
    let max = Vec2::new(rink.width - inset, rink.height - inset).max(min);
    let unclamped = z.position;
    z.position = unclamped.max(min).min(max);
    let contact = z.position != unclamped;
    if contact && !state.wall_contact {
        state.bump_count += 1;
    }
    state.wall_contact = contact;

    // Scrape at both ends of the move so fast passes leave no gaps
    let radius = state.level.cleaning_radius * t.clean_radius_pad;
    for center in [z.position, prev_position] {
        let squeegee = z.squeegee_at(center, t.squeegee_offset);
        state.dirt.clear_radius(squeegee, radius, state.cell_size);
    }

    // Derived from the tick count so long sessions don't drift
    state.ticks += 1;
    state.elapsed = (state.ticks as f64 * dt as f64) as f32;
    state.input.boost_ticks = state.input.boost_ticks.saturating_sub(1);

    let cleaned = state.dirt.cleaned_percent();
    debug_assert!(
        cleaned >= state.cleaned_percent - 1e-3,
        "coverage went backwards: {} -> {}",
        state.cleaned_percent,
        cleaned
    );
    state.cleaned_percent = cleaned;
    if cleaned >= t.clean_threshold {
        state.completed = true;
    }
}
