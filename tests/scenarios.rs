//! End-to-end play-throughs driven through the public API

use dragon_reach::Settings;
use dragon_reach::consts::SIM_DT;
use dragon_reach::persistence::{JsonLinesSink, SessionSink};
use dragon_reach::sim::progression;
use dragon_reach::sim::{
    DropOutcome, GameEvent, GamePhase, GameState, PointerEvent, TickInput, handle_pointer, tick,
};

fn pointer_tick(state: &mut GameState, events: Vec<PointerEvent>) {
    let input = TickInput {
        pointer: events,
        ..Default::default()
    };
    tick(state, &input, SIM_DT);
}

#[test]
fn test_level_one_single_delivery_advances() {
    let mut state = GameState::new(Settings::default(), 2024).unwrap();
    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.phase, GamePhase::Active);
    assert_eq!(state.targets.len(), 1);

    let start = state.targets[0].position;
    let center = state.collector.center;
    pointer_tick(
        &mut state,
        vec![
            PointerEvent::down(start),
            PointerEvent::moved(center),
            PointerEvent::up(center),
        ],
    );

    assert!(state.targets[0].delivered);
    assert_eq!(state.phase, GamePhase::Setup { level: 2 });
    assert_eq!(state.session.levels.len(), 1);
    assert_eq!(state.session.levels[0].error_count, 0);
    assert_eq!(state.session.levels[0].deliveries, 1);

    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::LevelCompleted { reward, .. } if reward == "Dragon gets shiny armor!"
    )));

    // Next tick sets up level 2
    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.level, 2);
    assert_eq!(state.targets.len(), 2);
}

#[test]
fn test_level_three_out_of_order_then_in_order() {
    let mut state = GameState::new(Settings::default(), 7).unwrap();
    progression::start_level(&mut state, 3);
    assert!(state.sequence_enabled());
    assert_eq!(state.targets.len(), 3);
    assert_eq!(state.obstacles.len(), 2);

    let center = state.collector.center;

    // Release id 1 first
    let before = state.targets[1].position;
    handle_pointer(&mut state, PointerEvent::down(before));
    handle_pointer(&mut state, PointerEvent::moved(center));
    let outcome = handle_pointer(&mut state, PointerEvent::up(center));

    assert_eq!(
        outcome,
        Some(DropOutcome::OutOfOrder {
            target_id: 1,
            expected: 0
        })
    );
    assert_eq!(state.level_stats.error_count, 1);
    assert!(!state.targets[1].delivered);
    assert_ne!(state.targets[1].position, before);
    assert!(!state.collector.captures(state.targets[1].position));
    assert_eq!(state.next_required, 0);

    // Now the required one
    let first = state.targets[0].position;
    handle_pointer(&mut state, PointerEvent::down(first));
    handle_pointer(&mut state, PointerEvent::moved(center));
    let outcome = handle_pointer(&mut state, PointerEvent::up(center));

    assert!(matches!(
        outcome,
        Some(DropOutcome::Delivered { target_id: 0, .. })
    ));
    assert!(state.targets[0].delivered);
    assert_eq!(state.next_required, 1);
    assert_eq!(state.level_stats.error_count, 1);
    assert_eq!(state.phase, GamePhase::Active);
}

#[test]
fn test_delivery_time_follows_the_clock() {
    let mut state = GameState::new(Settings::default(), 11).unwrap();
    tick(&mut state, &TickInput::default(), SIM_DT);

    let start = state.targets[0].position;
    let center = state.collector.center;
    pointer_tick(&mut state, vec![PointerEvent::down(start)]);
    for _ in 0..29 {
        tick(&mut state, &TickInput::default(), SIM_DT);
    }
    pointer_tick(
        &mut state,
        vec![PointerEvent::moved(center), PointerEvent::up(center)],
    );

    // Picked on one tick, released 30 ticks later
    let summary = &state.session.levels[0];
    assert!((summary.average_speed - 0.5).abs() < 1e-3);
}

#[test]
fn test_missed_drop_counts_and_repositions() {
    let mut state = GameState::new(Settings::default(), 3).unwrap();
    tick(&mut state, &TickInput::default(), SIM_DT);

    let start = state.targets[0].position;
    let outcome = {
        handle_pointer(&mut state, PointerEvent::down(start));
        handle_pointer(&mut state, PointerEvent::up(start))
    };

    assert_eq!(outcome, Some(DropOutcome::Missed { target_id: 0 }));
    assert_eq!(state.level_stats.error_count, 1);
    assert!(!state.targets[0].delivered);
    assert_eq!(state.phase, GamePhase::Active);
}

#[test]
fn test_autoplay_finishes_a_session() {
    let mut state = GameState::new(Settings::default(), 42).unwrap();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut sink = JsonLinesSink::new(Vec::new());
    for _ in 0..60 * 60 * 5 {
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            if let GameEvent::SessionCompleted { summary } = event {
                sink.record(&summary).unwrap();
            }
        }
        if state.phase == GamePhase::SessionComplete {
            break;
        }
    }

    assert_eq!(state.phase, GamePhase::SessionComplete);
    assert_eq!(state.session.levels.len(), 10);
    assert_eq!(state.session.error_count, 0);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("\"final_level\":10"));
}

#[test]
fn test_invalid_settings_do_not_start() {
    let settings = Settings {
        surface_width: 0.0,
        ..Settings::default()
    };
    assert!(GameState::new(settings, 1).is_err());
}
