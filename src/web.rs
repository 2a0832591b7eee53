//! Browser bindings
//!
//! The page owns rendering, key bindings and touch controls. It forwards
//! input here, calls `tick` from `requestAnimationFrame`, and reads the JSON
//! snapshot back to draw the frame.

use wasm_bindgen::prelude::*;

use crate::config::{GameConfig, Variant};
use crate::controller::RunController;
use crate::sim::{Direction, suggest_move};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Already initialised when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Info);
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn fresh_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[wasm_bindgen]
pub struct WebGame {
    run: RunController,
}

#[wasm_bindgen]
impl WebGame {
    /// New run using a built-in variant name ("classic", "staged", "frantic")
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> WebGame {
        let variant = Variant::from_str(variant).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using {}", variant, Variant::default().as_str());
            Variant::default()
        });
        WebGame {
            run: RunController::with_variant(variant, fresh_seed()),
        }
    }

    /// New run from a JSON rule set
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<WebGame, JsValue> {
        let config = GameConfig::from_json(json).map_err(js_error)?;
        let run = RunController::new(config, fresh_seed()).map_err(js_error)?;
        Ok(WebGame { run })
    }

    #[wasm_bindgen(js_name = moveLeft)]
    pub fn move_left(&mut self) -> bool {
        self.run.move_player(Direction::Left)
    }

    #[wasm_bindgen(js_name = moveRight)]
    pub fn move_right(&mut self) -> bool {
        self.run.move_player(Direction::Right)
    }

    /// Call once per animation frame with the frame timestamp (ms)
    pub fn tick(&mut self, timestamp: f64) -> bool {
        self.run.tick(timestamp)
    }

    #[wasm_bindgen(js_name = dismissIntro)]
    pub fn dismiss_intro(&mut self) -> bool {
        self.run.dismiss_intro()
    }

    pub fn restart(&mut self) {
        self.run.restart(fresh_seed());
    }

    /// Let the demo AI take one decision (attract mode)
    pub fn autopilot(&mut self) -> bool {
        match suggest_move(self.run.state(), self.run.config()) {
            Some(direction) => self.run.move_player(direction),
            None => false,
        }
    }

    /// Cancel all timers and ignore further input until `restart` (page teardown)
    pub fn stop(&mut self) {
        self.run.stop();
    }

    /// Rules of the current run as pretty JSON, loadable with `fromConfig`
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.run.config().to_json().map_err(js_error)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.run.snapshot()).map_err(js_error)
    }

    /// Notifications since the previous call, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.run.drain_events()).map_err(js_error)
    }
}
