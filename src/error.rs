//! Configuration errors
//!
//! Gameplay misses and placement exhaustion are never errors; only broken
//! preconditions found at initialization end up here.

use thiserror::Error;

/// A configuration that must not start the level loop
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("surface dimensions must be positive and finite, got {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },

    #[error("surface {width}x{height} cannot fit a target of radius {radius} with margin {margin}")]
    SurfaceTooSmall {
        width: f32,
        height: f32,
        radius: f32,
        margin: f32,
    },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("capture radius {capture} must be positive and smaller than collector radius {radius}")]
    InvalidCapture { radius: f32, capture: f32 },

    #[error("max level must be at least 1")]
    NoLevels,

    #[error("level {level} is outside 1..={max}")]
    LevelOutOfRange { level: u32, max: u32 },

    #[error("obstacle {index} ({width}x{height}) does not fit the surface")]
    ObstacleTooLarge { index: usize, width: f32, height: f32 },

    #[error("invalid settings JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// A session summary that could not be handed to storage
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write session record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),
}
