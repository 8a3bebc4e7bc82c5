//! Idle/demo mode: scripted pointer input that plays the level
//!
//! Picks the next deliverable target and drops it straight onto the
//! collector, waiting while an obstacle sits on the drop spot.

use super::drag::PointerEvent;
use super::state::{DragState, GamePhase, GameState};

/// Pointer events for this frame
pub fn plan(state: &GameState) -> Vec<PointerEvent> {
    if state.phase != GamePhase::Active {
        return Vec::new();
    }

    // Never leave a target hanging between frames
    if let DragState::Holding { target_id, .. } = state.drag {
        let pos = state
            .target(target_id)
            .map(|t| t.position)
            .unwrap_or(state.collector.center);
        return vec![PointerEvent::up(pos)];
    }

    let next = if state.sequence_enabled() {
        state.target(state.next_required).filter(|t| !t.delivered)
    } else {
        state.undelivered().min_by_key(|t| t.id)
    };
    let Some(target) = next else {
        return Vec::new();
    };

    let drop_at = state.collector.center;
    let padding = state.settings.drag_obstacle_padding;
    let drop_blocked = state
        .obstacles
        .iter()
        .any(|o| o.rect.inflate(padding, padding).intersects_circle(drop_at, target.radius));
    if drop_blocked {
        return Vec::new();
    }

    vec![
        PointerEvent::down(target.position),
        PointerEvent::moved(drop_at),
        PointerEvent::up(drop_at),
    ]
}
