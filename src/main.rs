//! Dragon Reach entry point
//!
//! Web: exposes a `Session` handle the page drives from its animation frame
//! and pointer listeners. Native: runs a headless autoplay session and
//! writes the session summary to stdout as a JSON line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_session {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use dragon_reach::consts::*;
    use dragon_reach::persistence::SessionSink;
    use dragon_reach::sim::{GameEvent, GameState, PointerEvent, TickInput, tick};
    use dragon_reach::{SessionHistory, Settings};

    /// One exercise session bound to a page
    #[wasm_bindgen]
    pub struct Session {
        state: GameState,
        history: SessionHistory,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Events drained since the page last asked, as JSON values
        pending: Vec<GameEvent>,
    }

    #[wasm_bindgen]
    impl Session {
        /// Start a session; `settings_json` may be empty for defaults
        #[wasm_bindgen(constructor)]
        pub fn new(settings_json: &str, history_json: &str) -> Result<Session, JsValue> {
            let settings = if settings_json.trim().is_empty() {
                Settings::default()
            } else {
                Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?
            };
            let history = if history_json.trim().is_empty() {
                SessionHistory::new()
            } else {
                SessionHistory::from_json(history_json).unwrap_or_else(|e| {
                    log::warn!("Discarding unreadable session history: {}", e);
                    SessionHistory::new()
                })
            };

            let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
            let state = GameState::new(settings, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
            log::info!("Session created with seed {}", seed);

            Ok(Session {
                state,
                history,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                pending: Vec::new(),
            })
        }

        pub fn pointer_down(&mut self, x: f32, y: f32) {
            self.input.pointer.push(PointerEvent::down(Vec2::new(x, y)));
        }

        pub fn pointer_move(&mut self, x: f32, y: f32) {
            self.input.pointer.push(PointerEvent::moved(Vec2::new(x, y)));
        }

        pub fn pointer_up(&mut self, x: f32, y: f32) {
            self.input.pointer.push(PointerEvent::up(Vec2::new(x, y)));
        }

        pub fn toggle_pause(&mut self) {
            self.input.pause = true;
        }

        pub fn reset(&mut self) {
            self.input.reset = true;
        }

        pub fn set_idle_mode(&mut self, idle: bool) {
            self.input.idle_mode = idle;
        }

        pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
            self.state
                .resize(width, height)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        }

        /// Advance to `time` (ms, from requestAnimationFrame)
        pub fn frame(&mut self, time: f64) {
            if self.last_time == 0.0 {
                self.last_time = time;
            }
            let dt = (((time - self.last_time) / 1000.0) as f32).min(0.1);
            self.last_time = time;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs apply to a single substep
                self.input.pointer.clear();
                self.input.pause = false;
                self.input.reset = false;
            }

            for event in self.state.drain_events() {
                if let GameEvent::SessionCompleted { summary } = &event {
                    if let Err(e) = self.history.record(summary) {
                        log::error!("Failed to record session: {}", e);
                    }
                }
                self.pending.push(event);
            }
        }

        /// Events since the last call, as a JSON array
        pub fn take_events(&mut self) -> String {
            let events = std::mem::take(&mut self.pending);
            serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
        }

        /// Current targets, collector and obstacles for drawing
        pub fn scene_json(&self) -> String {
            let scene = serde_json::json!({
                "phase": self.state.phase,
                "level": self.state.level,
                "collector": self.state.collector,
                "targets": self.state.targets,
                "obstacles": self.state.obstacles,
                "next_required": self.state.next_required,
            });
            scene.to_string()
        }

        pub fn history_json(&self) -> String {
            self.history.to_json().unwrap_or_else(|_| "{}".to_string())
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Dragon Reach starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_session::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dragon_reach::consts::SIM_DT;
    use dragon_reach::persistence::{JsonLinesSink, SessionSink};
    use dragon_reach::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use dragon_reach::{SessionHistory, Settings, platform};

    /// Ten minutes of simulated time
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Dragon Reach (native) starting headless autoplay session...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Cannot load settings from {}: {}", path, e);
                    std::process::exit(2);
                }
            }
        }
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(platform::now_unix_ms() as u64);

    let mut state = match GameState::new(settings, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    log::info!("Seed {}", seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut history = SessionHistory::new();
    let mut sink = JsonLinesSink::new(std::io::stdout().lock());

    for _ in 0..MAX_FRAMES {
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match &event {
                GameEvent::LevelCompleted { summary, reward } => log::info!(
                    "Level {} done in avg {:.2}s: {}",
                    summary.level,
                    summary.average_speed,
                    reward
                ),
                GameEvent::SessionCompleted { summary } => {
                    if let Err(e) = sink.record(summary) {
                        log::error!("Failed to write session summary: {}", e);
                    }
                    if let Err(e) = history.record(summary) {
                        log::error!("Failed to record session: {}", e);
                    }
                }
                other => log::debug!("{:?}", other),
            }
        }

        if state.phase == GamePhase::SessionComplete {
            log::info!("Session finished after {} ticks", state.time_ticks);
            return;
        }
    }

    log::warn!(
        "Stopped after {} frames at level {} without finishing",
        MAX_FRAMES,
        state.level
    );
}
