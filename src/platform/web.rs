//! wasm-bindgen adapter for browser hosts
//!
//! The page owns the canvas, the 3D engine and the DOM panel. It forwards
//! events here, calls `frame` from `requestAnimationFrame`, and reads
//! frames, events and HUD state back as plain JS objects.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::session::Session;
use crate::settings::Settings;
use crate::sim::gravity::GravityPreset;
use crate::sim::input::{InputEvent, Key, PointerButton};
use crate::sim::state::SimEvent;

#[wasm_bindgen(inline_js = "
    export function exit_pointer_lock() {
        if (document.pointerLockElement) {
            document.exitPointerLock();
        }
    }
")]
extern "C" {
    fn exit_pointer_lock();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn button(code: u32) -> PointerButton {
    // DOM MouseEvent.button: 0 = primary, anything else treated as secondary
    if code == 0 {
        PointerButton::Primary
    } else {
        PointerButton::Secondary
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Kinetic Sandbox (web) starting...");
    }
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// `settings_json` may be omitted or partial
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> WebSession {
        let settings = Settings::load_or_default(settings_json.as_deref());
        WebSession {
            inner: Session::new(settings),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, button_code: u32) {
        self.inner.handle_event(InputEvent::PointerDown {
            x,
            y,
            button: button(button_code),
        });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, dx: f32, dy: f32) {
        self.inner.handle_event(InputEvent::PointerMove { x, y, dx, dy });
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, button_code: u32) {
        self.inner.handle_event(InputEvent::PointerUp {
            x,
            y,
            button: button(button_code),
        });
    }

    pub fn wheel(&mut self, delta: f32) {
        self.inner.handle_event(InputEvent::Wheel { delta });
    }

    pub fn key_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.inner.handle_event(InputEvent::KeyDown(key));
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.inner.handle_event(InputEvent::KeyUp(key));
        }
    }

    pub fn pointer_lock_changed(&mut self, locked: bool) {
        log::info!("Pointer lock {}", if locked { "acquired" } else { "released" });
        self.inner.handle_event(InputEvent::PointerLockChanged(locked));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.handle_event(InputEvent::Resize { width, height });
    }

    /// Advance one frame; `dt_ms` is the requestAnimationFrame delta
    pub fn frame(&mut self, dt_ms: f64) -> Result<JsValue, JsValue> {
        let frame = self.inner.frame((dt_ms / 1000.0) as f32);
        to_js(&frame)
    }

    pub fn set_control(&mut self, key: &str, value: &str) {
        self.inner.set_control(key, value);
    }

    /// Run a panel action by name (`gravity`, `preset:moon`, ...)
    pub fn action(&mut self, name: &str) {
        self.inner.perform_named(name);
    }

    pub fn texture_loaded(&mut self, preset: &str, ok: bool) {
        match preset.parse::<GravityPreset>() {
            Ok(preset) => self.inner.texture_loaded(preset, ok),
            Err(err) => log::warn!("{}", err),
        }
    }

    /// Events since the last drain. Pointer-lock release is handled here too.
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        let events = self.inner.drain_events();
        if events.iter().any(|e| matches!(e, SimEvent::ReleasePointerLock)) {
            exit_pointer_lock();
        }
        to_js(&events)
    }

    pub fn hud(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.hud())
    }

    pub fn wants_pointer_lock(&self) -> bool {
        self.inner.mode().wants_pointer_lock() && !self.inner.hud().dead
    }
}
