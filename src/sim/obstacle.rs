//! Moving obstacle rectangles
//!
//! Obstacles slide horizontally and bounce off the left/right surface edges.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::OBSTACLE_SPEED;

/// A horizontally oscillating obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    /// Horizontal speed in pixels/sec (always positive)
    pub speed: f32,
    /// Direction sign: -1.0 (left) or +1.0 (right)
    pub direction: f32,
}

impl Obstacle {
    pub fn new(rect: Rect, speed: f32, direction: f32) -> Self {
        Self {
            rect,
            speed: speed.abs(),
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
        }
    }

    /// Advance one frame, flipping direction at the surface edges
    ///
    /// The rectangle is clamped back inside `[0, surface_width]` so it never
    /// leaves the playfield even with a large `dt`.
    pub fn advance(&mut self, dt: f32, surface_width: f32) {
        self.rect.x += self.speed * self.direction * dt;

        if self.rect.x < 0.0 {
            self.rect.x = 0.0;
            self.direction = 1.0;
        } else if self.rect.right() > surface_width {
            self.rect.x = (surface_width - self.rect.width).max(0.0);
            self.direction = -1.0;
        }
    }

    /// Rectangle enlarged for placement safety
    ///
    /// Grows by the target radius plus padding; the motion axis (x) gets its
    /// own, usually larger, padding to cover where the obstacle is heading.
    pub fn inflated(&self, target_radius: f32, motion_padding: f32, cross_padding: f32) -> Rect {
        self.rect
            .inflate(target_radius + motion_padding, target_radius + cross_padding)
    }
}

/// Preset obstacle layout for obstacle levels
///
/// Positions are laid out for the default 960x420 surface; callers clamp
/// them into the actual surface.
pub fn preset_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::new(Rect::new(320.0, 180.0, 80.0, 160.0), OBSTACLE_SPEED, 1.0),
        Obstacle::new(Rect::new(520.0, 300.0, 80.0, 100.0), OBSTACLE_SPEED, 1.0),
    ]
}
