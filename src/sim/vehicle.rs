//! The Zamboni itself

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading_vector;

/// Position, motion and footprint of the vehicle.
///
/// Only the integrator mutates this during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing angle in radians, kept in (-π, π]
    pub heading: f32,
    pub width: f32,
    pub length: f32,
}

impl VehicleState {
    /// Parked at `position`, facing +x
    pub fn new(position: Vec2, width: f32, length: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            heading: 0.0,
            width,
            length,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn forward(&self) -> Vec2 {
        heading_vector(self.heading)
    }

    /// Where the squeegee sits when the vehicle centre is at `center`
    pub fn squeegee_at(&self, center: Vec2, offset_fraction: f32) -> Vec2 {
        center - self.forward() * (self.length * offset_fraction)
    }
}
