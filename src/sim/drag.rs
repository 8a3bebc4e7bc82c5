//! Pick / move / drop interaction
//!
//! Pointer positions arrive already translated into surface coordinates.
//! Misses, blocked moves and out-of-order drops are counted as errors here;
//! none of them are failures.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::progression;
use super::spawn::place_target;
use super::state::{DragState, GameEvent, GamePhase, GameState, Target};
use crate::clamp_lenient;

/// Pointer/touch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Vec2,
}

impl PointerEvent {
    pub fn down(pos: Vec2) -> Self {
        Self {
            kind: PointerKind::Down,
            pos,
        }
    }

    pub fn moved(pos: Vec2) -> Self {
        Self {
            kind: PointerKind::Move,
            pos,
        }
    }

    pub fn up(pos: Vec2) -> Self {
        Self {
            kind: PointerKind::Up,
            pos,
        }
    }
}

/// How a release was classified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    Delivered { target_id: u32, elapsed: f32 },
    /// Released outside the capture radius
    Missed { target_id: u32 },
    /// Released on the collector, but not the required id
    OutOfOrder { target_id: u32, expected: u32 },
}

/// Feed one pointer event into the state machine
///
/// Returns the drop classification for a release while holding.
pub fn handle_pointer(state: &mut GameState, event: PointerEvent) -> Option<DropOutcome> {
    if state.phase != GamePhase::Active {
        return None;
    }
    match event.kind {
        PointerKind::Down => {
            pick(state, event.pos);
            None
        }
        PointerKind::Move => {
            drag_to(state, event.pos);
            None
        }
        PointerKind::Up => release(state),
    }
}

/// Grab the nearest undelivered target under the pointer
fn pick(state: &mut GameState, pos: Vec2) {
    if state.drag != DragState::Idle {
        return;
    }

    let now = state.clock.now();
    let nearest = state
        .targets
        .iter_mut()
        .filter(|t| !t.delivered && t.position.distance_squared(pos) <= t.radius * t.radius)
        .min_by(|a, b| {
            a.position
                .distance_squared(pos)
                .partial_cmp(&b.position.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(target) = nearest {
        target.picked_at = Some(now);
        state.drag = DragState::Holding {
            target_id: target.id,
            offset: pos - target.position,
        };
        log::trace!("Picked target {}", target.id);
    }
}

/// Track the pointer, refusing moves into obstacles
fn drag_to(state: &mut GameState, pos: Vec2) {
    let DragState::Holding { target_id, offset } = state.drag else {
        return;
    };
    let Some(index) = state.targets.iter().position(|t| t.id == target_id) else {
        state.drag = DragState::Idle;
        return;
    };

    let radius = state.targets[index].radius;
    let area = state.bounds().inset(radius);
    let wanted = pos - offset;
    let proposed = Vec2::new(
        clamp_lenient(wanted.x, area.x, area.right()),
        clamp_lenient(wanted.y, area.y, area.bottom()),
    );

    let padding = state.settings.drag_obstacle_padding;
    let blocked = state
        .obstacles
        .iter()
        .any(|o| o.rect.inflate(padding, padding).intersects_circle(proposed, radius));

    if blocked {
        state.level_stats.record_error();
        state.events.push(GameEvent::MoveBlocked { target_id });
    } else {
        state.targets[index].position = proposed;
    }
}

/// Classify the drop, then check for level completion
fn release(state: &mut GameState) -> Option<DropOutcome> {
    let DragState::Holding { target_id, .. } = state.drag else {
        return None;
    };
    state.drag = DragState::Idle;
    let index = state.targets.iter().position(|t| t.id == target_id)?;

    let sequence = state.sequence_enabled();
    let captured = state.collector.captures(state.targets[index].position);
    let in_order = !sequence || target_id == state.next_required;

    let outcome = if captured && in_order {
        let now = state.clock.now();
        let cell_size = state.settings.zone_cell_size;
        let target = &mut state.targets[index];
        let elapsed = target
            .picked_at
            .map(|t| (now - t).max(0.0) as f32)
            .unwrap_or(0.0);
        target.delivered = true;
        target.picked_at = None;

        state
            .level_stats
            .record_delivery(elapsed, target.spawn_position, cell_size);
        if sequence {
            state.next_required += 1;
        }
        state.events.push(GameEvent::Delivered { target_id, elapsed });
        log::debug!("Target {} delivered in {:.2}s", target_id, elapsed);
        DropOutcome::Delivered { target_id, elapsed }
    } else {
        state.level_stats.record_error();
        let outcome = if captured {
            let expected = state.next_required;
            state.events.push(GameEvent::OutOfOrder {
                target_id,
                expected,
            });
            log::debug!("Target {} out of order (expected {})", target_id, expected);
            DropOutcome::OutOfOrder {
                target_id,
                expected,
            }
        } else {
            state.events.push(GameEvent::Missed { target_id });
            log::debug!("Target {} missed the collector", target_id);
            DropOutcome::Missed { target_id }
        };
        respawn(state, index);
        outcome
    };

    progression::check_level_complete(state);
    Some(outcome)
}

/// Send a target back to a freshly solved spawn position
fn respawn(state: &mut GameState, index: usize) {
    let id = state.targets[index].id;
    let radius = state.targets[index].radius;
    let others: Vec<Target> = state
        .targets
        .iter()
        .filter(|t| t.id != id)
        .cloned()
        .collect();
    let bounds = state.bounds();

    let placement = place_target(
        radius,
        &others,
        &state.obstacles,
        &state.collector,
        bounds,
        &state.settings.solver,
        &mut state.rng,
    );
    state.targets[index].respawn_at(placement.position);
}
