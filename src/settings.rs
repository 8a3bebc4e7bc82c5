//! Session settings and tuning
//!
//! Loaded from JSON by the host; every field has a default so a partial
//! document only overrides what it names.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::geometry::Rect;
use crate::sim::level::target_radius_for_level;
use crate::sim::metrics::RecoveryWeights;
use crate::sim::spawn::SolverTuning;
use crate::sim::state::Collector;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Surface ===
    /// Logical surface width (pixels)
    pub surface_width: f32,
    /// Logical surface height (pixels)
    pub surface_height: f32,

    // === Progression ===
    /// Levels per session
    pub max_level: u32,
    /// First level with obstacles and ordered delivery
    pub obstacle_level_threshold: u32,

    // === Collector ===
    pub collector_radius: f32,
    /// Capture radius = collector radius - capture margin
    pub capture_margin: f32,

    // === Interaction ===
    /// Extra obstacle padding when rejecting drag moves
    pub drag_obstacle_padding: f32,
    /// Grid cell size for reach zones (1.0 = integer pixels)
    pub zone_cell_size: f32,

    // === Tuning ===
    pub solver: SolverTuning,
    pub recovery: RecoveryWeights,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,

            max_level: MAX_LEVEL,
            obstacle_level_threshold: OBSTACLE_LEVEL_THRESHOLD,

            collector_radius: COLLECTOR_RADIUS,
            capture_margin: CAPTURE_MARGIN,

            drag_obstacle_padding: 0.0,
            zone_cell_size: 1.0,

            solver: SolverTuning::default(),
            recovery: RecoveryWeights::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing keys keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Surface bounds as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.surface_width, self.surface_height)
    }

    /// Collector centered on the surface
    pub fn collector(&self) -> Collector {
        Collector::new(
            Vec2::new(self.surface_width / 2.0, self.surface_height / 2.0),
            self.collector_radius,
            self.collector_radius - self.capture_margin,
        )
    }

    /// Check every precondition the level loop relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.surface_width, self.surface_height);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ConfigError::InvalidSurface {
                width: w,
                height: h,
            });
        }
        if self.max_level == 0 {
            return Err(ConfigError::NoLevels);
        }

        positive("collector_radius", self.collector_radius)?;
        positive("zone_cell_size", self.zone_cell_size)?;
        non_negative("capture_margin", self.capture_margin)?;
        non_negative("drag_obstacle_padding", self.drag_obstacle_padding)?;

        let capture = self.collector_radius - self.capture_margin;
        if capture <= 0.0 {
            return Err(ConfigError::InvalidCapture {
                radius: self.collector_radius,
                capture,
            });
        }

        let solver = &self.solver;
        non_negative("solver.edge_margin", solver.edge_margin)?;
        non_negative("solver.target_padding", solver.target_padding)?;
        non_negative("solver.exclusion_margin_factor", solver.exclusion_margin_factor)?;
        non_negative("solver.motion_axis_padding", solver.motion_axis_padding)?;
        non_negative("solver.cross_axis_padding", solver.cross_axis_padding)?;

        let recovery = &self.recovery;
        non_negative("recovery.speed", recovery.speed)?;
        non_negative("recovery.accuracy", recovery.accuracy)?;
        non_negative("recovery.coverage", recovery.coverage)?;
        positive("recovery.reference_speed_secs", recovery.reference_speed_secs)?;
        positive("recovery.reference_errors", recovery.reference_errors)?;
        positive("recovery.reference_zones", recovery.reference_zones)?;

        // Level 1 has the largest targets
        let radius = target_radius_for_level(1);
        let needed = 2.0 * (radius + solver.edge_margin);
        if w < needed || h < needed {
            return Err(ConfigError::SurfaceTooSmall {
                width: w,
                height: h,
                radius,
                margin: solver.edge_margin,
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "max_level": 4, "solver": { "interior_attempts": 50 } }"#)
                .unwrap();
        assert_eq!(settings.max_level, 4);
        assert_eq!(settings.solver.interior_attempts, 50);
        assert_eq!(settings.solver.edge_attempts, 50);
        assert_eq!(settings.surface_width, SURFACE_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_broken_preconditions() {
        let cases = [
            Settings {
                surface_width: -1.0,
                ..Settings::default()
            },
            Settings {
                surface_height: f32::INFINITY,
                ..Settings::default()
            },
            Settings {
                surface_width: 50.0,
                surface_height: 50.0,
                ..Settings::default()
            },
            Settings {
                max_level: 0,
                ..Settings::default()
            },
            Settings {
                capture_margin: 60.0,
                ..Settings::default()
            },
            Settings {
                zone_cell_size: 0.0,
                ..Settings::default()
            },
        ];
        for settings in cases {
            assert!(settings.validate().is_err(), "{settings:?} should be rejected");
        }
    }

    #[test]
    fn test_collector_is_centered() {
        let collector = Settings::default().collector();
        assert_eq!(collector.center, Vec2::new(480.0, 210.0));
        assert_eq!(collector.radius, 60.0);
        assert_eq!(collector.capture_radius, 50.0);
    }
}
