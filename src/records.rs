//! Career records and level progress
//!
//! Persisted to LocalStorage on the web. Storage trouble is logged and
//! ignored; it never reaches the simulation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::sim::composite_score;

/// Fastest completion overall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastestRun {
    pub time: f32,
    pub level_id: String,
}

/// Fewest board hits overall (ties go to the faster run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewestBumps {
    pub bumps: u32,
    pub level_id: String,
    pub time: f32,
}

/// Cleanest finish overall (ties go to the faster run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestClean {
    pub clean: f32,
    pub level_id: String,
    pub time: f32,
    pub bumps: u32,
}

/// Best composite score overall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestComposite {
    pub score: i32,
    pub level_id: String,
    pub time: f32,
    pub bumps: u32,
    pub clean: f32,
}

/// Per-level personal bests; each field tracks its own best independently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBest {
    pub time: f32,
    pub bumps: u32,
    pub clean: f32,
    pub composite: i32,
    pub runs: u32,
}

/// Everything remembered between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Records {
    pub fastest_time: Option<FastestRun>,
    pub fewest_bumps: Option<FewestBumps>,
    pub highest_clean: Option<HighestClean>,
    pub best_composite: Option<BestComposite>,
    pub total_runs: u32,
    /// Sum of cleaned percent across all runs
    pub total_ice_cleaned_pct: f32,
    pub per_level: BTreeMap<String, LevelBest>,
    /// Best completion time per level (seconds)
    pub best_times: BTreeMap<String, f32>,
    /// Levels finished at least once
    pub completed: BTreeSet<String>,
}

impl Records {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zamboni.records.v1";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished run into the career records
    pub fn record_run(&mut self, level_id: &str, time: f32, bumps: u32, clean: f32) {
        self.total_runs += 1;
        self.total_ice_cleaned_pct += clean;
        let composite = composite_score(time, bumps, clean);

        self.per_level
            .entry(level_id.to_string())
            .and_modify(|best| {
                best.time = best.time.min(time);
                best.bumps = best.bumps.min(bumps);
                best.clean = best.clean.max(clean);
                best.composite = best.composite.max(composite);
                best.runs += 1;
            })
            .or_insert(LevelBest {
                time,
                bumps,
                clean,
                composite,
                runs: 1,
            });

        if self.fastest_time.as_ref().is_none_or(|f| time < f.time) {
            self.fastest_time = Some(FastestRun {
                time,
                level_id: level_id.to_string(),
            });
        }

        if self
            .fewest_bumps
            .as_ref()
            .is_none_or(|f| bumps < f.bumps || (bumps == f.bumps && time < f.time))
        {
            self.fewest_bumps = Some(FewestBumps {
                bumps,
                level_id: level_id.to_string(),
                time,
            });
        }

        if self
            .highest_clean
            .as_ref()
            .is_none_or(|h| clean > h.clean || (clean == h.clean && time < h.time))
        {
            self.highest_clean = Some(HighestClean {
                clean,
                level_id: level_id.to_string(),
                time,
                bumps,
            });
        }

        if self
            .best_composite
            .as_ref()
            .is_none_or(|b| composite > b.score)
        {
            self.best_composite = Some(BestComposite {
                score: composite,
                level_id: level_id.to_string(),
                time,
                bumps,
                clean,
            });
        }
    }

    pub fn best_time(&self, level_id: &str) -> Option<f32> {
        self.best_times.get(level_id).copied()
    }

    /// Store `time` if it beats the previous best; returns the best after update
    pub fn set_best_time(&mut self, level_id: &str, time: f32) -> f32 {
        let best = self
            .best_times
            .entry(level_id.to_string())
            .or_insert(time);
        if time < *best {
            *best = time;
        }
        *best
    }

    pub fn mark_complete(&mut self, level_id: &str) {
        self.completed.insert(level_id.to_string());
    }

    pub fn is_complete(&self, level_id: &str) -> bool {
        self.completed.contains(level_id)
    }

    /// Parse a stored payload; anything unreadable yields fresh records
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Discarding unreadable records: {e}");
                Self::new()
            }
        }
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let records = Self::from_json(&json);
                log::info!("Loaded records ({} runs)", records.total_runs);
                return records;
            }
        }

        log::info!("No records found, starting fresh");
        Self::new()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, records not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write records");
                } else {
                    log::info!("Records saved ({} runs)", self.total_runs);
                }
            }
            Err(e) => log::warn!("Failed to serialize records: {e}"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_sets_everything() {
        let mut r = Records::new();
        r.record_run("level-1", 40.0, 2, 100.0);
        assert_eq!(r.total_runs, 1);
        assert_eq!(r.fastest_time.as_ref().unwrap().time, 40.0);
        assert_eq!(r.fewest_bumps.as_ref().unwrap().bumps, 2);
        assert_eq!(r.best_composite.as_ref().unwrap().score, 92);
        let best = &r.per_level["level-1"];
        assert_eq!(best.runs, 1);
        assert_eq!(best.composite, 92);
    }

    #[test]
    fn test_per_level_bests_are_independent() {
        let mut r = Records::new();
        r.record_run("level-1", 40.0, 5, 100.0);
        r.record_run("level-1", 55.0, 0, 100.0);
        let best = &r.per_level["level-1"];
        assert_eq!(best.time, 40.0);
        assert_eq!(best.bumps, 0);
        assert_eq!(best.runs, 2);
        // 120 - 0 - 30.25 = 89.75 beats 120 - 15 - 22 = 83
        assert_eq!(best.composite, 90);
    }

    #[test]
    fn test_bump_ties_go_to_faster_run() {
        let mut r = Records::new();
        r.record_run("level-1", 50.0, 1, 100.0);
        r.record_run("level-2", 45.0, 1, 100.0);
        r.record_run("level-3", 30.0, 2, 100.0);
        let fewest = r.fewest_bumps.unwrap();
        assert_eq!(fewest.level_id, "level-2");
        assert_eq!(fewest.time, 45.0);
        assert_eq!(r.fastest_time.unwrap().level_id, "level-3");
        assert_eq!(r.total_ice_cleaned_pct, 300.0);
    }

    #[test]
    fn test_best_time_only_improves() {
        let mut r = Records::new();
        assert_eq!(r.best_time("level-1"), None);
        assert_eq!(r.set_best_time("level-1", 50.0), 50.0);
        assert_eq!(r.set_best_time("level-1", 60.0), 50.0);
        assert_eq!(r.set_best_time("level-1", 42.5), 42.5);
        assert_eq!(r.best_time("level-1"), Some(42.5));
    }

    #[test]
    fn test_progress() {
        let mut r = Records::new();
        assert!(!r.is_complete("level-1"));
        r.mark_complete("level-1");
        r.mark_complete("level-1");
        assert!(r.is_complete("level-1"));
        assert_eq!(r.completed.len(), 1);
    }

    #[test]
    fn test_unreadable_payload_starts_fresh() {
        assert_eq!(Records::from_json("not json"), Records::new());
        // Missing fields fall back to defaults
        let r = Records::from_json(r#"{ "total_runs": 3 }"#);
        assert_eq!(r.total_runs, 3);
        assert!(r.per_level.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut r = Records::new();
        r.record_run("level-2", 61.5, 3, 100.0);
        r.set_best_time("level-2", 61.5);
        r.mark_complete("level-2");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(Records::from_json(&json), r);
    }
}
