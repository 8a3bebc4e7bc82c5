//! Frame tick
//!
//! One call per rendered frame: advances the clock and obstacles, performs
//! any pending level setup, then applies the frame's pointer input in order.

use super::autoplay;
use super::drag::{PointerEvent, handle_pointer};
use super::progression;
use super::state::{GamePhase, GameState};

/// Input collected for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch events in surface coordinates, oldest first
    pub pointer: Vec<PointerEvent>,
    /// Pause toggle
    pub pause: bool,
    /// Restart the session from level 1
    pub reset: bool,
    /// Idle/demo mode - autoplay delivers the targets
    pub idle_mode: bool,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        progression::reset_session(state);
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Active => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Active,
            _ => {}
        }
    }

    // Don't tick if paused or finished
    match state.phase {
        GamePhase::Paused | GamePhase::SessionComplete => return,
        _ => {}
    }

    state.time_ticks += 1;
    state.clock.advance(dt);
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    if let GamePhase::Setup { level } = state.phase {
        progression::start_level(state, level);
    }

    let width = state.settings.surface_width;
    for obstacle in &mut state.obstacles {
        obstacle.advance(dt, width);
    }

    let mut events = input.pointer.clone();
    if input.idle_mode {
        events.extend(autoplay::plan(state));
    }
    for event in events {
        if state.phase != GamePhase::Active {
            break;
        }
        handle_pointer(state, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;

    #[test]
    fn test_first_tick_sets_up_level_one() {
        let mut state = GameState::new(Settings::default(), 12345).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.level, 1);
        assert_eq!(state.targets.len(), 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(Settings::default(), 12345).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        let before = state.clock.now();

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.clock.now(), before);

        // Unpause
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
        assert!(state.clock.now() > before);
    }

    #[test]
    fn test_obstacles_move_each_tick() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        progression::start_level(&mut state, 3);
        let x0 = state.obstacles[0].rect.x;
        tick(&mut state, &TickInput::default(), 0.5);
        assert!((state.obstacles[0].rect.x - (x0 + 60.0)).abs() < 1e-3);
    }

    #[test]
    fn test_reset_discards_progress() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        progression::start_level(&mut state, 5);
        let input = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Settings::default(), 99999).unwrap();
        let mut state2 = GameState::new(Settings::default(), 99999).unwrap();

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.level, state2.level);
        assert_eq!(state1.targets, state2.targets);
        assert_eq!(state1.obstacles, state2.obstacles);
    }
}
