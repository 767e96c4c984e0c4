//! Browser host binding
//!
//! JS owns rendering and the animation loop; it forwards keyboard events and
//! frame timestamps here and draws from the returned JSON snapshot.

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::config::ExplorerConfig;
use crate::error::SimError;
use crate::explorer::Explorer;
use crate::input::Command;

fn to_js(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebExplorer {
    inner: Explorer,
}

#[wasm_bindgen]
impl WebExplorer {
    /// Build from an optional JSON config (defaults when absent)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebExplorer, JsValue> {
        let config = match config_json {
            Some(json) => ExplorerConfig::from_json(&json).map_err(to_js)?,
            None => ExplorerConfig::default(),
        };
        let inner = Explorer::new(config).map_err(to_js)?;
        Ok(WebExplorer { inner })
    }

    /// Register `callback(stationId)`, invoked once per completed warp
    #[wasm_bindgen(js_name = setOnComplete)]
    pub fn set_on_complete(&mut self, callback: js_sys::Function) {
        self.inner.set_on_complete(move |id| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(id)) {
                log::warn!("onComplete callback threw: {:?}", e);
            }
        });
    }

    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(&mut self, event: &KeyboardEvent, now: f64) {
        let key = event.key();
        if Command::from_key(&key).is_some() {
            event.prevent_default();
        }
        match self.inner.key_down(&key, now) {
            Ok(()) | Err(SimError::NoStationInRange) => {}
            Err(e) => log::debug!("Key '{}' ignored: {}", key, e),
        }
    }

    #[wasm_bindgen(js_name = handleKeyUp)]
    pub fn handle_key_up(&mut self, event: &KeyboardEvent) {
        self.inner.key_up(&event.key());
    }

    /// Click/tap on the scene enters the nearby station. Returns whether a warp started.
    pub fn select(&mut self, now: f64) -> bool {
        self.inner.select(now).is_ok()
    }

    /// Advance to `now` and return the frame snapshot as JSON
    pub fn frame(&mut self, now: f64) -> Result<String, JsValue> {
        let out = self.inner.frame(now).map_err(to_js)?;
        serde_json::to_string(&out).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Star positions as JSON, for the background layer
    pub fn stars(&self) -> Result<String, JsValue> {
        let stars = self.inner.starfield().map(|f| f.stars()).unwrap_or(&[]);
        serde_json::to_string(stars).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = backToSpace)]
    pub fn back_to_space(&mut self) -> Result<(), JsValue> {
        self.inner.back_to_space().map_err(to_js)
    }

    #[wasm_bindgen(js_name = startTour)]
    pub fn start_tour(&mut self, now: f64) -> Result<(), JsValue> {
        self.inner.start_tour(now).map_err(to_js)
    }

    #[wasm_bindgen(js_name = resetJourney)]
    pub fn reset_journey(&mut self) -> Result<(), JsValue> {
        self.inner.reset_journey().map_err(to_js)
    }
}
