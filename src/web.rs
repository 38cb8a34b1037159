//! Browser binding
//!
//! Exposes the simulation to a JavaScript host. The page owns the DOM,
//! audio, and the `requestAnimationFrame` loop; it forwards input events,
//! calls `frame()` once per display refresh, and draws from the snapshot
//! or from the visual callbacks.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GamePhase, GameState, InputLatch, Rect, VisualSink, tick_with};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by a previous module instance
        return;
    }
    log::info!("Highway Rush core loaded");
}

/// Forwards entity lifetimes to JS callbacks: `(id, x, y)` / `(id)` / `(x, y)`
#[derive(Default)]
struct JsVisuals {
    spawn: Option<Function>,
    moved: Option<Function>,
    despawn: Option<Function>,
    player: Option<Function>,
}

impl VisualSink for JsVisuals {
    fn spawn(&mut self, id: u32, rect: Rect) {
        if let Some(f) = &self.spawn {
            let _ = f.call3(
                &JsValue::NULL,
                &JsValue::from(id),
                &JsValue::from(rect.left()),
                &JsValue::from(rect.top()),
            );
        }
    }

    fn moved(&mut self, id: u32, rect: Rect) {
        if let Some(f) = &self.moved {
            let _ = f.call3(
                &JsValue::NULL,
                &JsValue::from(id),
                &JsValue::from(rect.left()),
                &JsValue::from(rect.top()),
            );
        }
    }

    fn despawn(&mut self, id: u32) {
        if let Some(f) = &self.despawn {
            let _ = f.call1(&JsValue::NULL, &JsValue::from(id));
        }
    }

    fn player_moved(&mut self, rect: Rect) {
        if let Some(f) = &self.player {
            let _ = f.call2(
                &JsValue::NULL,
                &JsValue::from(rect.left()),
                &JsValue::from(rect.top()),
            );
        }
    }
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: InputLatch,
    visuals: JsVisuals,
    accumulator: f32,
    last_time: f64,
    last_phase: GamePhase,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `tuning_json` overrides the default balance
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> WebGame {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json_or_default(&json),
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        WebGame {
            state: GameState::new(seed, tuning),
            input: InputLatch::new(),
            visuals: JsVisuals::default(),
            accumulator: 0.0,
            last_time: 0.0,
            last_phase: GamePhase::Menu,
        }
    }

    /// Register renderer callbacks
    pub fn set_visual_callbacks(
        &mut self,
        spawn: Function,
        moved: Function,
        despawn: Function,
        player: Option<Function>,
    ) {
        self.visuals = JsVisuals {
            spawn: Some(spawn),
            moved: Some(moved),
            despawn: Some(despawn),
            player,
        };
    }

    pub fn steer_left(&mut self, active: bool) {
        self.input.steer_left(active);
    }

    pub fn steer_right(&mut self, active: bool) {
        self.input.steer_right(active);
    }

    pub fn change_lane(&mut self, dir: i8) {
        self.input.change_lane(dir);
    }

    pub fn start(&mut self) {
        self.input.start();
    }

    pub fn advance(&mut self) {
        self.input.advance();
    }

    pub fn restart(&mut self) {
        self.input.restart();
    }

    pub fn menu(&mut self) {
        self.input.menu();
    }

    pub fn pause(&mut self) {
        self.input.pause();
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.set_idle_mode(idle);
    }

    /// Window lost focus: let go of held controls
    pub fn blur(&mut self) {
        self.input.release_all();
        if !self.state.phase.is_frozen() {
            self.input.pause();
        }
    }

    pub fn grant_shield(&mut self) {
        self.state.grant_shield();
    }

    /// Run simulation ticks for one display frame
    pub fn frame(&mut self, time_ms: f64) {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.take();
            tick_with(&mut self.state, &input, &mut self.visuals);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let phase = self.state.phase;
        if phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
    }

    /// Current frame state as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_default()
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.state.drain_events()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn score(&self) -> u32 {
        self.state.progress.score
    }

    pub fn level(&self) -> u32 {
        self.state.level_number()
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.state.phase)
    }
}
