//! Per-level configuration
//!
//! Difficulty scales with the level index: more targets, smaller targets,
//! and from the obstacle threshold on, moving obstacles plus ordered delivery.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::obstacle::{Obstacle, preset_obstacles};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Everything needed to set up one level. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level index
    pub level: u32,
    pub target_count: u32,
    pub target_radius: f32,
    /// Base timing budget per target (milliseconds)
    pub time_budget_ms: u32,
    /// Obstacles at their starting positions
    pub obstacles: Vec<Obstacle>,
    /// Targets must be delivered in id order
    pub sequence_enabled: bool,
    /// Color per target id
    pub sequence_colors: Vec<String>,
}

impl LevelConfig {
    /// Build and validate the configuration for `level`
    pub fn for_level(level: u32, settings: &Settings) -> Result<Self, ConfigError> {
        if level == 0 || level > settings.max_level {
            return Err(ConfigError::LevelOutOfRange {
                level,
                max: settings.max_level,
            });
        }

        let target_count = level.min(settings.max_level);
        let target_radius = target_radius_for_level(level);
        let has_obstacles = level >= settings.obstacle_level_threshold;

        let bounds = settings.bounds();
        let mut obstacles = if has_obstacles {
            preset_obstacles()
        } else {
            Vec::new()
        };
        for (index, obstacle) in obstacles.iter_mut().enumerate() {
            if obstacle.rect.width > bounds.width || obstacle.rect.height > bounds.height {
                return Err(ConfigError::ObstacleTooLarge {
                    index,
                    width: obstacle.rect.width,
                    height: obstacle.rect.height,
                });
            }
            obstacle.rect.clamp_into(&bounds);
        }

        let sequence_colors = (0..target_count as usize)
            .map(|i| {
                if has_obstacles {
                    SEQUENCE_COLORS[i % SEQUENCE_COLORS.len()].to_string()
                } else {
                    DEFAULT_COLOR.to_string()
                }
            })
            .collect();

        let config = Self {
            level,
            target_count,
            target_radius,
            time_budget_ms: time_budget_for_level(level),
            obstacles,
            sequence_enabled: has_obstacles,
            sequence_colors,
        };
        config.validate(&bounds, settings.solver.edge_margin)?;
        Ok(config)
    }

    /// Arithmetic sanity checks so no target can end up NaN or negative
    fn validate(&self, bounds: &Rect, edge_margin: f32) -> Result<(), ConfigError> {
        if !(self.target_radius.is_finite() && self.target_radius > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "target_radius",
                value: self.target_radius,
            });
        }
        let needed = 2.0 * (self.target_radius + edge_margin);
        if bounds.width < needed || bounds.height < needed {
            return Err(ConfigError::SurfaceTooSmall {
                width: bounds.width,
                height: bounds.height,
                radius: self.target_radius,
                margin: edge_margin,
            });
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            let r = obstacle.rect;
            let finite = [r.x, r.y, r.width, r.height, obstacle.speed]
                .iter()
                .all(|v| v.is_finite());
            if !finite || r.width <= 0.0 || r.height <= 0.0 {
                return Err(ConfigError::ObstacleTooLarge {
                    index,
                    width: r.width,
                    height: r.height,
                });
            }
        }
        Ok(())
    }

    /// Color tag for a target id
    pub fn color_for(&self, id: u32) -> &str {
        self.sequence_colors
            .get(id as usize)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOR)
    }
}

/// Target radius for a level: shrinks by a fixed step down to a floor
pub fn target_radius_for_level(level: u32) -> f32 {
    (TARGET_BASE_RADIUS - level as f32 * TARGET_RADIUS_STEP).max(TARGET_MIN_RADIUS)
}

/// Per-target timing budget for a level (milliseconds)
pub fn time_budget_for_level(level: u32) -> u32 {
    TIME_BUDGET_BASE_MS
        .saturating_sub(level.saturating_mul(TIME_BUDGET_STEP_MS))
        .max(TIME_BUDGET_MIN_MS)
}

/// Build every level of a session up front
pub fn build_all(settings: &Settings) -> Result<Vec<LevelConfig>, ConfigError> {
    (1..=settings.max_level)
        .map(|level| LevelConfig::for_level(level, settings))
        .collect()
}
