//! Dirt field: per-cell grime over the rink
//!
//! Row-major grid of values in [0, 1] (0 = clean ice, 1 = filthy). Levels
//! provide a smooth base silhouette; each session blends it with seeded,
//! blurred noise so no two runs look the same. The squeegee clears cells
//! outright - there is no gradual scrubbing.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Weight of the level's base pattern in the blend
const BASE_WEIGHT: f32 = 0.35;
/// Weight of the shaped noise in the blend
const NOISE_WEIGHT: f32 = 0.8;
/// Exponent applied to normalized noise (pushes haze down, keeps pockets)
const NOISE_SHAPE: f32 = 1.3;
/// Highest coverage reported while any cell still holds dirt
const NEARLY_CLEAN: f32 = 99.99999;

/// Discretized dirt coverage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDirtField")]
pub struct DirtField {
    cols: usize,
    rows: usize,
    tile: Vec<f32>,
}

/// Wire form; goes through `DirtField::from_tiles` on load
#[derive(Deserialize)]
struct RawDirtField {
    cols: usize,
    rows: usize,
    tile: Vec<f32>,
}

impl TryFrom<RawDirtField> for DirtField {
    type Error = LevelError;

    fn try_from(raw: RawDirtField) -> Result<Self, Self::Error> {
        let len = raw.tile.len();
        Self::from_tiles(raw.cols, raw.rows, raw.tile).ok_or(LevelError::GridSizeMismatch {
            cols: raw.cols,
            rows: raw.rows,
            len,
        })
    }
}

impl DirtField {
    /// Build a grid by evaluating `f(x, y)` per cell, clamped to [0, 1]
    pub fn from_fn(cols: usize, rows: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut tile = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                tile.push(clamp01(f(x, y)));
            }
        }
        Self { cols, rows, tile }
    }

    /// Uniform grid
    pub fn filled(cols: usize, rows: usize, value: f32) -> Self {
        Self::from_fn(cols, rows, |_, _| value)
    }

    /// Wrap raw tiles; values are clamped into [0, 1].
    /// Returns `None` when `tile.len() != cols * rows`.
    pub fn from_tiles(cols: usize, rows: usize, mut tile: Vec<f32>) -> Option<Self> {
        if tile.len() != cols * rows {
            return None;
        }
        for v in &mut tile {
            *v = clamp01(*v);
        }
        Some(Self { cols, rows, tile })
    }

    /// Blend a base pattern with seeded cluster noise.
    ///
    /// More `blur_passes` means larger, smoother clusters.
    pub fn randomized(base: &DirtField, seed: u64, blur_passes: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let noise = noise_field(base.cols, base.rows, &mut rng, blur_passes);

        let tile = base
            .tile
            .iter()
            .zip(&noise)
            .map(|(&b, &n)| clamp01(BASE_WEIGHT * b + NOISE_WEIGHT * n.powf(NOISE_SHAPE)))
            .collect();

        Self {
            cols: base.cols,
            rows: base.rows,
            tile,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tiles(&self) -> &[f32] {
        &self.tile
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_empty()
    }

    /// Dirt at cell (x, y), `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.cols && y < self.rows {
            Some(self.tile[y * self.cols + x])
        } else {
            None
        }
    }

    /// Dirt under a world-space point (clamped to the grid edge)
    pub fn sample(&self, point: Vec2, cell_size: Vec2) -> f32 {
        if self.is_empty() || cell_size.x <= 0.0 || cell_size.y <= 0.0 {
            return 0.0;
        }
        let x = clamp_index((point.x / cell_size.x).floor(), self.cols);
        let y = clamp_index((point.y / cell_size.y).floor(), self.rows);
        self.tile[y * self.cols + x]
    }

    /// Set every cell whose centre lies within `radius` of `center` to 0.
    ///
    /// `cell_size` is the world size of one cell. Returns how many cells went
    /// from dirty to clean.
    pub fn clear_radius(&mut self, center: Vec2, radius: f32, cell_size: Vec2) -> usize {
        if self.is_empty() || cell_size.x <= 0.0 || cell_size.y <= 0.0 || radius < 0.0 {
            return 0;
        }

        let min_x = clamp_index(((center.x - radius) / cell_size.x).floor(), self.cols);
        let max_x = clamp_index(((center.x + radius) / cell_size.x).ceil(), self.cols);
        let min_y = clamp_index(((center.y - radius) / cell_size.y).floor(), self.rows);
        let max_y = clamp_index(((center.y + radius) / cell_size.y).ceil(), self.rows);

        let mut cleared = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let cell_center = Vec2::new(
                    x as f32 * cell_size.x + cell_size.x / 2.0,
                    y as f32 * cell_size.y + cell_size.y / 2.0,
                );
                if cell_center.distance(center) <= radius {
                    let v = &mut self.tile[y * self.cols + x];
                    if *v > 0.0 {
                        *v = 0.0;
                        cleared += 1;
                    }
                }
            }
        }
        cleared
    }

    /// Mean dirt level in [0, 1]; an empty grid counts as clean
    pub fn average(&self) -> f32 {
        self.mean() as f32
    }

    /// Percentage of the rink that is clean, 0..=100.
    ///
    /// Reads exactly 100 only once every cell is spotless.
    pub fn cleaned_percent(&self) -> f32 {
        let mean = self.mean();
        let percent = ((1.0 - mean) * 100.0) as f32;
        if mean > 0.0 {
            percent.min(NEARLY_CLEAN)
        } else {
            percent
        }
    }

    fn mean(&self) -> f64 {
        if self.tile.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.tile.iter().map(|&v| v as f64).sum();
        sum / self.tile.len() as f64
    }

    /// Number of cells still holding any dirt
    pub fn dirty_cells(&self) -> usize {
        self.tile.iter().filter(|&&v| v > 0.0).count()
    }
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Clamp a floating grid coordinate into `0..len` (len > 0)
#[inline]
fn clamp_index(v: f32, len: usize) -> usize {
    let max = (len - 1) as f32;
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, max) as usize
}

/// White noise, box blurred `passes` times, normalized to [0, 1]
fn noise_field(cols: usize, rows: usize, rng: &mut Pcg32, passes: u32) -> Vec<f32> {
    let mut field: Vec<f32> = (0..cols * rows).map(|_| rng.random::<f32>()).collect();
    if field.is_empty() {
        return field;
    }

    let idx = |x: usize, y: usize| y * cols + x;
    for _ in 0..passes {
        let mut next = field.clone();
        for y in 0..rows {
            for x in 0..cols {
                let mut sum = 0.0;
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        // Edge samples repeat the border cell
                        let xx = (x as i32 + dx).clamp(0, cols as i32 - 1) as usize;
                        let yy = (y as i32 + dy).clamp(0, rows as i32 - 1) as usize;
                        sum += field[idx(xx, yy)];
                    }
                }
                next[idx(x, y)] = sum / 9.0;
            }
        }
        field = next;
    }

    let (min, max) = field
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = (max - min).max(1e-6);
    for v in &mut field {
        *v = (*v - min) / range;
    }
    field
}
