//! Deterministic simulation module
//!
//! All exercise logic lives here. This module must stay pure and deterministic:
//! - Time only advances through `tick` deltas
//! - Seeded RNG only
//! - Stable iteration order (targets by id, zones in a BTreeSet)
//! - No rendering or platform dependencies beyond the session timestamp

pub mod autoplay;
pub mod drag;
pub mod geometry;
pub mod level;
pub mod metrics;
pub mod obstacle;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use drag::{DropOutcome, PointerEvent, PointerKind, handle_pointer};
pub use geometry::{
    Rect, circle_contains_point, euclidean_distance, has_ray_clearance, segment_intersects_rect,
    segment_intersects_segment,
};
pub use level::LevelConfig;
pub use metrics::{LevelStats, LevelSummary, RecoveryWeights, SessionStats, SessionSummary};
pub use obstacle::Obstacle;
pub use spawn::{Placement, PlacementTier, Rejection, SolverTuning, place_target};
pub use state::{Collector, DragState, GameEvent, GamePhase, GameState, SimClock, Target};
pub use tick::{TickInput, tick};
