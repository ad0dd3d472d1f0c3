//! Construction-time errors
//!
//! Stepping a session never fails; only building one from a level descriptor
//! or loading tuning data can.

use thiserror::Error;

/// A level descriptor that cannot be simulated
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("dirt grid is {cols}x{rows} but holds {len} tiles")]
    GridSizeMismatch { cols: usize, rows: usize, len: usize },
    #[error("rink must have positive size, got {width}x{height}")]
    InvalidRink { width: f32, height: f32 },
    #[error("start position ({x}, {y}) lies outside the rink")]
    StartOutsideRink { x: f32, y: f32 },
    #[error("cleaning radius must be positive, got {0}")]
    InvalidCleaningRadius(f32),
    #[error("unknown level id: {0}")]
    UnknownLevel(String),
}

/// Tuning data that failed to load
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{name}` must be {expected}, got {value}")]
    OutOfRange {
        name: &'static str,
        expected: &'static str,
        value: f32,
    },
}
