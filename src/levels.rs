//! Built-in rinks
//!
//! Each level carries a smooth base dirt silhouette; sessions blend it with
//! seeded noise (harder rinks blur the noise more for bigger clusters).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::DirtField;

/// Playfield bounds in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RinkGeometry {
    pub width: f32,
    pub height: f32,
    /// Drawn rounded corners; physics clamps to the plain rectangle
    pub corner_radius: f32,
}

impl RinkGeometry {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// World size of one cell when a `cols` x `rows` grid spans the rink
    pub fn cell_size(&self, cols: usize, rows: usize) -> Vec2 {
        Vec2::new(
            self.width / cols.max(1) as f32,
            self.height / rows.max(1) as f32,
        )
    }
}

/// Level descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub difficulty: u8,
    pub description: String,
    pub rink: RinkGeometry,
    /// Base dirt pattern, blended with noise per session
    pub dirt: DirtField,
    pub start: Vec2,
    pub cleaning_radius: f32,
    /// Reserved: cleaning is instant, this is not read by the integrator
    pub cleaning_rate: f32,
    /// Box blur passes over the session noise
    pub blur_passes: u32,
}

impl Level {
    pub fn validate(&self) -> Result<(), LevelError> {
        let (cols, rows, len) = (self.dirt.cols(), self.dirt.rows(), self.dirt.tiles().len());
        if cols * rows != len {
            return Err(LevelError::GridSizeMismatch { cols, rows, len });
        }
        let RinkGeometry { width, height, .. } = self.rink;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(LevelError::InvalidRink { width, height });
        }
        if !self.rink.contains(self.start) {
            return Err(LevelError::StartOutsideRink {
                x: self.start.x,
                y: self.start.y,
            });
        }
        if !(self.cleaning_radius > 0.0 && self.cleaning_radius.is_finite()) {
            return Err(LevelError::InvalidCleaningRadius(self.cleaning_radius));
        }
        Ok(())
    }
}

/// Ids of the built-in levels, in play order
pub const LEVEL_IDS: [&str; 3] = ["level-1", "level-2", "level-3"];

/// All built-in levels, in play order
pub fn all() -> Vec<Level> {
    vec![backyard_pond(), beer_league_bash(), the_big_show()]
}

/// Look up a built-in level by id
pub fn find(id: &str) -> Result<Level, LevelError> {
    match id {
        "level-1" => Ok(backyard_pond()),
        "level-2" => Ok(beer_league_bash()),
        "level-3" => Ok(the_big_show()),
        _ => Err(LevelError::UnknownLevel(id.to_string())),
    }
}

/// Level following `id`, `None` after the last one
pub fn next_level_id(id: &str) -> Option<&'static str> {
    let idx = LEVEL_IDS.iter().position(|&l| l == id)?;
    LEVEL_IDS.get(idx + 1).copied()
}

pub fn is_final_level(id: &str) -> bool {
    LEVEL_IDS.last() == Some(&id)
}

fn backyard_pond() -> Level {
    let (cols, rows) = (64, 36);
    let intensity = 0.65;
    Level {
        id: "level-1".into(),
        name: "Backyard Pond".into(),
        difficulty: 1,
        description: "Cozy backyard ice. Learn the basics and sweep clean lanes.".into(),
        rink: RinkGeometry {
            width: 640.0,
            height: 360.0,
            corner_radius: 24.0,
        },
        dirt: DirtField::from_fn(cols, rows, |x, y| {
            let nx = x as f32 / cols as f32;
            let ny = y as f32 / rows as f32;
            intensity * (0.6 + 0.4 * (8.0 * nx).sin() * (6.0 * ny).cos())
        }),
        start: Vec2::new(120.0, 180.0),
        cleaning_radius: 26.0,
        cleaning_rate: 1.1,
        blur_passes: 2,
    }
}

fn beer_league_bash() -> Level {
    let (cols, rows) = (80, 45);
    Level {
        id: "level-2".into(),
        name: "Beer League Bash".into(),
        difficulty: 2,
        description: "Beer league chaos: full sheet, streaky corners, board grime.".into(),
        rink: RinkGeometry {
            width: 800.0,
            height: 450.0,
            corner_radius: 28.0,
        },
        dirt: DirtField::from_fn(cols, rows, |x, y| {
            let nx = x as f32 / cols as f32;
            let ny = y as f32 / rows as f32;
            let band = 0.4 + 0.6 * (10.0 * nx).sin().powi(2);
            // Grime piles up in all four corners
            let corner = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
                .iter()
                .map(|&(cx, cy)| (0.5 - (nx - cx).hypot(ny - cy)).max(0.0) * 0.7)
                .sum::<f32>();
            (0.5 * band + 0.4 * corner).min(1.0)
        }),
        start: Vec2::new(180.0, 220.0),
        cleaning_radius: 26.0,
        cleaning_rate: 1.0,
        blur_passes: 3,
    }
}

fn the_big_show() -> Level {
    let (cols, rows) = (96, 54);
    Level {
        id: "level-3".into(),
        name: "The Big Show".into(),
        difficulty: 3,
        description: "Under the lights: pro sheet with heavy center wear and long lanes.".into(),
        rink: RinkGeometry {
            width: 960.0,
            height: 540.0,
            corner_radius: 32.0,
        },
        dirt: DirtField::from_fn(cols, rows, |x, y| {
            let nx = x as f32 / cols as f32;
            let ny = y as f32 / rows as f32;
            let streaks = 0.6 + 0.4 * (18.0 * (nx + ny)).sin();
            let center_mess = (0.7 - (nx - 0.5).hypot(ny - 0.5)).max(0.0) * 0.6;
            (0.55 * streaks + 0.5 * center_mess).min(1.0)
        }),
        start: Vec2::new(220.0, 260.0),
        cleaning_radius: 28.0,
        cleaning_rate: 0.95,
        blur_passes: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_are_valid() {
        let levels = all();
        assert_eq!(levels.len(), LEVEL_IDS.len());
        for (level, id) in levels.iter().zip(LEVEL_IDS) {
            assert_eq!(level.id, id);
            assert!(level.validate().is_ok(), "{} failed validation", level.id);
            assert!(level.dirt.tiles().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_cell_size_matches_grid() {
        let level = find("level-1").unwrap();
        let (cols, rows) = (level.dirt.cols(), level.dirt.rows());
        assert_eq!(level.rink.cell_size(cols, rows), Vec2::new(10.0, 10.0));
        assert_eq!(level.rink.cell_size(0, 0), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_find_unknown_level() {
        assert_eq!(
            find("level-9"),
            Err(LevelError::UnknownLevel("level-9".into()))
        );
    }

    #[test]
    fn test_level_order() {
        assert_eq!(next_level_id("level-1"), Some("level-2"));
        assert_eq!(next_level_id("level-3"), None);
        assert_eq!(next_level_id("nope"), None);
        assert!(is_final_level("level-3"));
        assert!(!is_final_level("level-2"));
    }

    #[test]
    fn test_validation_errors() {
        let mut level = find("level-1").unwrap();
        level.start = Vec2::new(-5.0, 10.0);
        assert!(matches!(
            level.validate(),
            Err(LevelError::StartOutsideRink { .. })
        ));

        let mut level = find("level-1").unwrap();
        level.cleaning_radius = 0.0;
        assert_eq!(
            level.validate(),
            Err(LevelError::InvalidCleaningRadius(0.0))
        );

        let mut level = find("level-1").unwrap();
        level.rink.width = 0.0;
        assert!(matches!(level.validate(), Err(LevelError::InvalidRink { .. })));
    }

    #[test]
    fn test_mismatched_grid_from_json_is_rejected() {
        let mut level = find("level-1").unwrap();
        level.dirt = DirtField::filled(2, 2, 1.0);
        let mut json: serde_json::Value = serde_json::to_value(&level).unwrap();
        json["dirt"]["tile"] = serde_json::json!([1.0, 1.0, 1.0]);
        let err = serde_json::from_value::<Level>(json).unwrap_err();
        assert!(err.to_string().contains("holds 3 tiles"), "{err}");
    }

    #[test]
    fn test_json_level_dirt_is_clamped() {
        let mut level = find("level-1").unwrap();
        level.dirt = DirtField::filled(2, 1, 1.0);
        let mut json: serde_json::Value = serde_json::to_value(&level).unwrap();
        json["dirt"]["tile"] = serde_json::json!([7.0, -3.0]);
        let level: Level = serde_json::from_value(json).unwrap();
        assert_eq!(level.dirt.tiles(), &[1.0, 0.0]);
        assert!(level.validate().is_ok());
    }
}
