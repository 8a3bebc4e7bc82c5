//! Game state and core simulation types
//!
//! Everything the level loop needs lives in one `GameState` owned by the
//! caller; there are no process-wide singletons.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::level::{self, LevelConfig};
use super::metrics::{LevelStats, LevelSummary, SessionStats, SessionSummary};
use super::obstacle::Obstacle;
use crate::clamp_lenient;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level `level` is queued; targets get placed on the next tick
    Setup { level: u32 },
    /// Targets are on the surface and can be dragged
    Active,
    /// Level frozen (clock and obstacles stop)
    Paused,
    /// All levels done; terminal
    SessionComplete,
}

/// A draggable target ("orb")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// 0-based; defines delivery order on sequence levels
    pub id: u32,
    pub position: Vec2,
    /// Where the target was last placed by the solver
    pub spawn_position: Vec2,
    pub radius: f32,
    pub color: String,
    pub delivered: bool,
    /// Session clock time of the last pick (seconds)
    #[serde(skip)]
    pub picked_at: Option<f64>,
}

impl Target {
    pub fn new(id: u32, position: Vec2, radius: f32, color: impl Into<String>) -> Self {
        Self {
            id,
            position,
            spawn_position: position,
            radius,
            color: color.into(),
            delivered: false,
            picked_at: None,
        }
    }

    /// Move to a freshly solved spawn position
    pub fn respawn_at(&mut self, position: Vec2) {
        self.position = position;
        self.spawn_position = position;
        self.picked_at = None;
    }
}

/// The fixed delivery goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    pub center: Vec2,
    pub radius: f32,
    /// Drops must land strictly inside this radius
    pub capture_radius: f32,
}

impl Collector {
    pub fn new(center: Vec2, radius: f32, capture_radius: f32) -> Self {
        Self {
            center,
            radius,
            capture_radius,
        }
    }

    /// No-spawn zone radius for a target of the given size
    #[inline]
    pub fn exclusion_radius(&self, target_radius: f32, margin_factor: f32) -> f32 {
        self.radius + margin_factor * target_radius
    }

    /// True if a point would count as a delivery
    #[inline]
    pub fn captures(&self, point: Vec2) -> bool {
        self.center.distance(point) < self.capture_radius
    }
}

/// Drag interaction state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A target is held; `offset` is pointer minus target center at pick time
    Holding { target_id: u32, offset: Vec2 },
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    LevelStarted {
        level: u32,
        target_count: u32,
        sequence_enabled: bool,
        time_budget_ms: u32,
    },
    LevelCompleted {
        summary: LevelSummary,
        reward: String,
    },
    SessionCompleted {
        summary: SessionSummary,
    },
    Delivered {
        target_id: u32,
        elapsed: f32,
    },
    Missed {
        target_id: u32,
    },
    OutOfOrder {
        target_id: u32,
        expected: u32,
    },
    MoveBlocked {
        target_id: u32,
    },
}

/// Monotonic session clock, advanced only by frame deltas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    elapsed: f64,
}

impl SimClock {
    /// Advance by `dt` seconds; negative or non-finite steps are ignored
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt as f64;
        }
    }

    /// Seconds since the session started
    pub fn now(&self) -> f64 {
        self.elapsed
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    /// Pre-validated configs, index = level - 1
    pub levels: Vec<LevelConfig>,
    pub phase: GamePhase,
    /// Current (or last played) level, 1-based; 0 before the first setup
    pub level: u32,
    pub clock: SimClock,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub collector: Collector,
    pub obstacles: Vec<Obstacle>,
    /// Targets of the current level, sorted by id
    pub targets: Vec<Target>,
    pub drag: DragState,
    /// Next id that must be delivered on sequence levels
    pub next_required: u32,
    pub level_stats: LevelStats,
    pub session: SessionStats,
    /// Pending notifications (drained by the caller)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Validate the settings and create a session waiting at level 1
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let levels = level::build_all(&settings)?;
        let collector = settings.collector();

        log::info!(
            "Session created: {}x{} surface, {} levels, seed {}",
            settings.surface_width,
            settings.surface_height,
            levels.len(),
            seed
        );

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            levels,
            phase: GamePhase::Setup { level: 1 },
            level: 0,
            clock: SimClock::default(),
            time_ticks: 0,
            collector,
            obstacles: Vec::new(),
            targets: Vec::new(),
            drag: DragState::Idle,
            next_required: 0,
            level_stats: LevelStats::default(),
            session: SessionStats::default(),
            events: Vec::new(),
        })
    }

    /// Surface bounds as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        self.settings.bounds()
    }

    /// Config of the current level, if one has been set up
    pub fn current_config(&self) -> Option<&LevelConfig> {
        self.level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
    }

    /// Whether the current level requires id-ordered delivery
    pub fn sequence_enabled(&self) -> bool {
        self.current_config().is_some_and(|c| c.sequence_enabled)
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Targets still waiting for delivery
    pub fn undelivered(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| !t.delivered)
    }

    /// A level is complete exactly when every target has been delivered
    pub fn is_level_complete(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(|t| t.delivered)
    }

    /// Id of the held target, if any
    pub fn held_target(&self) -> Option<u32> {
        match self.drag {
            DragState::Holding { target_id, .. } => Some(target_id),
            DragState::Idle => None,
        }
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adopt a new surface size
    ///
    /// Re-validates every level, recenters the collector and pulls obstacles
    /// and targets back inside the new bounds. On error nothing changes.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        let settings = Settings {
            surface_width: width,
            surface_height: height,
            ..self.settings.clone()
        };
        settings.validate()?;
        let levels = level::build_all(&settings)?;

        self.settings = settings;
        self.levels = levels;
        self.collector = self.settings.collector();

        let bounds = self.bounds();
        for obstacle in &mut self.obstacles {
            obstacle.rect.clamp_into(&bounds);
        }
        for target in &mut self.targets {
            let area = bounds.inset(target.radius);
            target.position = Vec2::new(
                clamp_lenient(target.position.x, area.x, area.right()),
                clamp_lenient(target.position.y, area.y, area.bottom()),
            );
        }

        log::info!("Surface resized to {}x{}", width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_waits_at_level_one() {
        let state = GameState::new(Settings::default(), 7).unwrap();
        assert_eq!(state.phase, GamePhase::Setup { level: 1 });
        assert_eq!(state.levels.len(), 10);
        assert!(state.targets.is_empty());
        assert!(!state.is_level_complete());
        assert_eq!(state.collector.center, Vec2::new(480.0, 210.0));
        assert_eq!(state.collector.capture_radius, 50.0);
    }

    #[test]
    fn test_invalid_surface_rejected() {
        let settings = Settings {
            surface_width: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            GameState::new(settings, 1),
            Err(ConfigError::InvalidSurface { .. })
        ));

        let settings = Settings {
            surface_height: f32::NAN,
            ..Settings::default()
        };
        assert!(GameState::new(settings, 1).is_err());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = SimClock::default();
        clock.advance(0.5);
        clock.advance(-10.0);
        clock.advance(f32::NAN);
        clock.advance(0.25);
        assert!((clock.now() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_collector_capture_is_strict() {
        let collector = Collector::new(Vec2::ZERO, 60.0, 50.0);
        assert!(collector.captures(Vec2::new(49.9, 0.0)));
        assert!(!collector.captures(Vec2::new(50.0, 0.0)));
        assert_eq!(collector.exclusion_radius(20.0, 0.5), 70.0);
    }

    #[test]
    fn test_resize_recenters_and_clamps() {
        let mut state = GameState::new(Settings::default(), 3).unwrap();
        state.targets.push(Target::new(0, Vec2::new(900.0, 400.0), 30.0, "#fff"));

        state.resize(640.0, 360.0).unwrap();
        assert_eq!(state.collector.center, Vec2::new(320.0, 180.0));
        assert_eq!(state.targets[0].position, Vec2::new(610.0, 330.0));

        // Too small for the obstacle preset: rejected, nothing changes
        assert!(state.resize(300.0, 100.0).is_err());
        assert_eq!(state.settings.surface_width, 640.0);
    }
}
