//! Grading a finished rink
//!
//! Par is a heuristic of rink size and how dirty the ice started; bumping
//! the boards inflates the time used for grading.

use serde::{Deserialize, Serialize};

use crate::tuning::ScoreTuning;

/// Cheer level for finishing the last rink, whatever the grade
const FINAL_LEVEL_CHEER: f32 = 1.2;

/// Result tier, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    CupWinner,
    PlayoffContender,
    TeamRebuild,
}

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::CupWinner => "Cup winner",
            Grade::PlayoffContender => "Playoff contender",
            Grade::TeamRebuild => "Team rebuild",
        }
    }

    /// Crowd cheer level for the audio layer
    pub fn cheer_intensity(&self) -> f32 {
        match self {
            Grade::CupWinner => 1.0,
            Grade::PlayoffContender => 0.8,
            Grade::TeamRebuild => 0.6,
        }
    }
}

/// Everything the results screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub grade: Grade,
    /// Par time in seconds
    pub par: f32,
    /// Elapsed time with the bump penalty applied
    pub penalized_time: f32,
    /// Raw elapsed time (what best-time tracking compares)
    pub elapsed: f32,
    pub bump_count: u32,
    pub cleaned_percent: f32,
    pub composite: i32,
}

/// Crowd cheer for a finished rink; the final rink always gets the big one
pub fn cheer_for(grade: Grade, final_level: bool) -> f32 {
    if final_level {
        FINAL_LEVEL_CHEER
    } else {
        grade.cheer_intensity()
    }
}

/// Expected completion time for a rink
pub fn par_time(rink_area: f32, initial_avg_dirt: f32, tuning: &ScoreTuning) -> f32 {
    let area_term = rink_area / tuning.par_area_divisor;
    let dirt_term = initial_avg_dirt * tuning.par_dirt_weight;
    (tuning.par_base + area_term + dirt_term).max(tuning.par_min)
}

/// Multiplicative time penalty for hitting the boards
pub fn bump_penalty(bump_count: u32) -> f32 {
    match bump_count {
        0..=1 => 0.0,
        2..=3 => 0.05,
        _ => 0.12,
    }
}

pub fn grade_for(time: f32, par: f32, tuning: &ScoreTuning) -> Grade {
    if time <= par * tuning.top_tier {
        Grade::CupWinner
    } else if time <= par * tuning.mid_tier {
        Grade::PlayoffContender
    } else {
        Grade::TeamRebuild
    }
}

/// Career composite used by the records board (higher is better)
pub fn composite_score(time: f32, bumps: u32, clean: f32) -> i32 {
    (clean * 1.2 - bumps as f32 * 3.0 - time * 0.55).round() as i32
}

/// Grade a completed run
pub fn evaluate(
    rink_area: f32,
    initial_avg_dirt: f32,
    elapsed: f32,
    bump_count: u32,
    cleaned_percent: f32,
    tuning: &ScoreTuning,
) -> ScoreCard {
    let par = par_time(rink_area, initial_avg_dirt, tuning);
    let penalized_time = elapsed * (1.0 + bump_penalty(bump_count));
    ScoreCard {
        grade: grade_for(penalized_time, par, tuning),
        par,
        penalized_time,
        elapsed,
        bump_count,
        cleaned_percent,
        composite: composite_score(elapsed, bump_count, cleaned_percent),
    }
}
