//! Level lifecycle: setup, completion, rewards, session end

use super::spawn::place_target;
use super::state::{DragState, GameEvent, GamePhase, GameState, Target};
use crate::consts::REWARDS;
use crate::platform;

/// Reward for finishing a level, clamped at the last entry
pub fn reward_for_level(level: u32) -> &'static str {
    let index = (level.max(1) - 1) as usize;
    REWARDS[index.min(REWARDS.len() - 1)]
}

/// Set up `level`: fresh obstacles, targets, drag state and per-level stats
///
/// Any in-flight drag from the previous level is dropped.
pub fn start_level(state: &mut GameState, level: u32) {
    let level = level.clamp(1, state.levels.len() as u32);
    let config = state.levels[(level - 1) as usize].clone();

    state.level = level;
    state.obstacles = config.obstacles.clone();
    state.targets.clear();
    state.drag = DragState::Idle;
    state.next_required = 0;
    state.level_stats.reset();

    let bounds = state.bounds();
    for id in 0..config.target_count {
        let placement = place_target(
            config.target_radius,
            &state.targets,
            &state.obstacles,
            &state.collector,
            bounds,
            &state.settings.solver,
            &mut state.rng,
        );
        log::debug!(
            "Level {} target {} placed at ({:.1}, {:.1}) via {:?}",
            level,
            id,
            placement.position.x,
            placement.position.y,
            placement.tier
        );
        state.targets.push(Target::new(
            id,
            placement.position,
            config.target_radius,
            config.color_for(id),
        ));
    }

    state.phase = GamePhase::Active;
    state.events.push(GameEvent::LevelStarted {
        level,
        target_count: config.target_count,
        sequence_enabled: config.sequence_enabled,
        time_budget_ms: config.time_budget_ms,
    });
    log::info!(
        "Level {} started: {} targets (radius {}), {} obstacles, sequence {}",
        level,
        config.target_count,
        config.target_radius,
        config.obstacles.len(),
        config.sequence_enabled
    );
}

/// Finish the level if every target has been delivered
///
/// Returns true when the level was completed by this call.
pub fn check_level_complete(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Active || !state.is_level_complete() {
        return false;
    }
    complete_level(state);
    true
}

fn complete_level(state: &mut GameState) {
    let level = state.level;
    let summary = state.level_stats.summary(level);
    let reward = reward_for_level(level).to_string();

    log::info!(
        "Level {} complete: avg {:.2}s, {} errors, {} zones - {}",
        level,
        summary.average_speed,
        summary.error_count,
        summary.zone_count,
        reward
    );

    state.session.absorb(&state.level_stats, summary.clone());
    state.drag = DragState::Idle;
    state.events.push(GameEvent::LevelCompleted { summary, reward });

    if level < state.settings.max_level {
        state.phase = GamePhase::Setup { level: level + 1 };
        return;
    }

    state.phase = GamePhase::SessionComplete;
    let summary = state
        .session
        .summary(level, &state.settings.recovery, platform::now_unix_ms());
    log::info!(
        "Session complete: avg {:.2}s, {} errors, {} zones, recovery {:.2}",
        summary.average_speed,
        summary.error_count,
        summary.zone_count,
        summary.recovery_indicator
    );
    state.events.push(GameEvent::SessionCompleted { summary });
}

/// Throw away the session and queue level 1 again
pub fn reset_session(state: &mut GameState) {
    state.targets.clear();
    state.obstacles.clear();
    state.drag = DragState::Idle;
    state.next_required = 0;
    state.level = 0;
    state.level_stats.reset();
    state.session = Default::default();
    state.phase = GamePhase::Setup { level: 1 };
    log::info!("Session reset");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_reward_clamps_at_last_entry() {
        assert_eq!(reward_for_level(1), "Dragon gets shiny armor!");
        assert_eq!(reward_for_level(5), "Dragon learns to fly higher!");
        assert_eq!(reward_for_level(9), "Dragon learns to fly higher!");
        assert_eq!(reward_for_level(0), "Dragon gets shiny armor!");
    }

    #[test]
    fn test_start_level_places_dense_ids() {
        let mut state = GameState::new(Settings::default(), 77).unwrap();
        start_level(&mut state, 6);

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.level, 6);
        let ids: Vec<u32> = state.targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(state.obstacles.len(), 2);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::LevelStarted { level: 6, target_count: 6, sequence_enabled: true, .. })
        ));
    }

    #[test]
    fn test_n_minus_one_deliveries_stay_active() {
        let mut state = GameState::new(Settings::default(), 5).unwrap();
        start_level(&mut state, 2);
        state.targets[0].delivered = true;

        assert!(!check_level_complete(&mut state));
        assert_eq!(state.phase, GamePhase::Active);

        state.targets[1].delivered = true;
        assert!(check_level_complete(&mut state));
        assert_eq!(state.phase, GamePhase::Setup { level: 3 });
        assert_eq!(state.session.levels.len(), 1);
    }

    #[test]
    fn test_last_level_ends_session() {
        let mut state = GameState::new(Settings::default(), 5).unwrap();
        start_level(&mut state, 10);
        for target in &mut state.targets {
            target.delivered = true;
        }
        assert!(check_level_complete(&mut state));
        assert_eq!(state.phase, GamePhase::SessionComplete);

        let events = state.drain_events();
        let session = events.iter().find_map(|e| match e {
            GameEvent::SessionCompleted { summary } => Some(summary.clone()),
            _ => None,
        });
        let session = session.expect("session summary emitted");
        assert_eq!(session.final_level, 10);
        assert!((0.0..=1.0).contains(&session.recovery_indicator));
    }

    #[test]
    fn test_reset_returns_to_level_one() {
        let mut state = GameState::new(Settings::default(), 5).unwrap();
        start_level(&mut state, 4);
        state.level_stats.record_error();
        reset_session(&mut state);

        assert_eq!(state.phase, GamePhase::Setup { level: 1 });
        assert!(state.targets.is_empty());
        assert_eq!(state.level_stats.error_count, 0);
    }
}
