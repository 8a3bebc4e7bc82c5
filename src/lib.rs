//! Dragon Reach - drag-and-deliver motor rehabilitation exercise
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement, dragging, metrics, levels)
//! - `settings`: Data-driven tuning and surface configuration
//! - `history`: Session records for trend display
//! - `persistence`: Session sink seam for external storage
//! - `platform`: Browser/native platform abstraction

pub mod error;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SinkError};
pub use history::SessionHistory;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame step (60 Hz, matches a typical display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical surface dimensions
    pub const SURFACE_WIDTH: f32 = 960.0;
    pub const SURFACE_HEIGHT: f32 = 420.0;

    /// Number of levels in a session
    pub const MAX_LEVEL: u32 = 10;
    /// First level with moving obstacles and ordered delivery
    pub const OBSTACLE_LEVEL_THRESHOLD: u32 = 3;

    /// Collector defaults (centered on the surface)
    pub const COLLECTOR_RADIUS: f32 = 60.0;
    /// Drop must land this far inside the collector rim
    pub const CAPTURE_MARGIN: f32 = 10.0;

    /// Target sizing: radius = max(BASE - level * STEP, MIN)
    pub const TARGET_BASE_RADIUS: f32 = 40.0;
    pub const TARGET_RADIUS_STEP: f32 = 2.0;
    pub const TARGET_MIN_RADIUS: f32 = 20.0;

    /// Timing budget: max(BASE - level * STEP, MIN) milliseconds
    pub const TIME_BUDGET_BASE_MS: u32 = 1200;
    pub const TIME_BUDGET_STEP_MS: u32 = 50;
    pub const TIME_BUDGET_MIN_MS: u32 = 500;

    /// Obstacle speed (2 px per 60 Hz frame)
    pub const OBSTACLE_SPEED: f32 = 120.0;

    /// Default target color when delivery order doesn't matter
    pub const DEFAULT_COLOR: &str = "#ffd700";
    /// Colors cycled by target id on sequence levels
    pub const SEQUENCE_COLORS: [&str; 3] = ["#ffd700", "#00e6ff", "#ff6b81"];

    /// Rewards handed out per completed level (clamped at the last entry)
    pub const REWARDS: [&str; 5] = [
        "Dragon gets shiny armor!",
        "Dragon earns a glowing scale!",
        "Dragon explores a new magical forest!",
        "Dragon finds a treasure chest!",
        "Dragon learns to fly higher!",
    ];
}

/// Quantize a point to an integer grid cell of the given size
#[inline]
pub fn quantize(pos: Vec2, cell_size: f32) -> (i32, i32) {
    let cell = if cell_size > 0.0 { cell_size } else { 1.0 };
    ((pos.x / cell).round() as i32, (pos.y / cell).round() as i32)
}

/// Clamp a value into `[lo, hi]`, tolerating an inverted range by returning `lo`
#[inline]
pub fn clamp_lenient(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo { lo } else { value.max(lo).min(hi) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_to_nearest_cell() {
        assert_eq!(quantize(Vec2::new(10.4, 20.6), 1.0), (10, 21));
        assert_eq!(quantize(Vec2::new(95.0, 149.0), 50.0), (2, 3));
        // Non-positive cell size falls back to unit cells
        assert_eq!(quantize(Vec2::new(3.2, 4.8), 0.0), (3, 5));
    }

    #[test]
    fn test_clamp_lenient_inverted_range() {
        assert_eq!(clamp_lenient(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_lenient(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_lenient(5.0, 8.0, 2.0), 8.0);
    }
}
