#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the tracepad runner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect, Uint8ClampedArray};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::{RunnerCore, outcome_label, phase_label};
use tracepad_web::{CaptureCommand, DisplayRect, PointerButton, StrokeDispatch};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn button_from_u8(button: u8) -> Option<PointerButton> {
    match button {
        0 => Some(PointerButton::Primary),
        1 => Some(PointerButton::Middle),
        2 => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn rect(left: f32, top: f32, width: f32, height: f32) -> DisplayRect {
    DisplayRect::new(left, top, width, height)
}

fn capture_command_to_js(command: Option<CaptureCommand>) -> JsValue {
    let Some(command) = command else {
        return JsValue::NULL;
    };
    let obj = Object::new();
    let (kind, pointer_id) = match command {
        CaptureCommand::Acquire { pointer_id } => ("acquire", pointer_id),
        CaptureCommand::Release { pointer_id } => ("release", pointer_id),
    };
    set_js(&obj, "kind", JsValue::from_str(kind));
    set_js(&obj, "pointer_id", JsValue::from_f64(f64::from(pointer_id)));
    obj.into()
}

fn dispatch_to_js(dispatch: StrokeDispatch, active_pointer_id: Option<u32>) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "accepted", dispatch.is_forwarded().into());
    set_js(&obj, "phase", JsValue::from_str(phase_label(dispatch.log.phase)));
    set_js(
        &obj,
        "outcome",
        JsValue::from_str(&outcome_label(dispatch.log.outcome)),
    );
    set_js(
        &obj,
        "capture_command",
        capture_command_to_js(dispatch.capture_command),
    );
    set_js(
        &obj,
        "active_pointer_id",
        active_pointer_id.map_or(JsValue::NULL, |id| JsValue::from_f64(f64::from(id))),
    );
    obj.into()
}

fn invalid_button(button: u8) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "accepted", false.into());
    set_js(
        &obj,
        "error",
        JsValue::from_str(&format!("invalid pointer button {button}")),
    );
    obj.into()
}

/// Letter tracing runner.
///
/// Host-driven: JavaScript forwards pointer events, blits `pixels()` into a
/// canvas, performs the save request, and schedules returned effects.
#[wasm_bindgen]
pub struct TracepadRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl TracepadRunner {
    /// Mount for the stored `childData` JSON. Throws when the session is
    /// missing or malformed; the host should then route to `/child-login`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        viewport_width: f32,
        viewport_height: f32,
        session_json: &str,
        config_json: Option<String>,
    ) -> Result<TracepadRunner, JsValue> {
        install_panic_hook();
        RunnerCore::new(
            viewport_width,
            viewport_height,
            session_json,
            config_json.as_deref(),
        )
        .map(|inner| Self { inner })
        .map_err(|err| JsValue::from_str(&err))
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.inner.resize(viewport_width, viewport_height);
    }

    /// `button` follows `PointerEvent.button`: `0` primary, `1` middle,
    /// `2` secondary. `rect_*` is the canvas `getBoundingClientRect()`.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        button: u8,
        client_x: f32,
        client_y: f32,
        rect_left: f32,
        rect_top: f32,
        rect_width: f32,
        rect_height: f32,
    ) -> JsValue {
        let Some(button) = button_from_u8(button) else {
            return invalid_button(button);
        };
        let dispatch = self.inner.pointer_down(
            pointer_id,
            button,
            client_x,
            client_y,
            rect(rect_left, rect_top, rect_width, rect_height),
        );
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        client_x: f32,
        client_y: f32,
        rect_left: f32,
        rect_top: f32,
        rect_width: f32,
        rect_height: f32,
    ) -> JsValue {
        let dispatch = self.inner.pointer_move(
            pointer_id,
            client_x,
            client_y,
            rect(rect_left, rect_top, rect_width, rect_height),
        );
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, pointer_id: u32, button: u8) -> JsValue {
        let Some(button) = button_from_u8(button) else {
            return invalid_button(button);
        };
        let dispatch = self.inner.pointer_up(pointer_id, button);
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> JsValue {
        let dispatch = self.inner.pointer_cancel(pointer_id);
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, pointer_id: u32) -> JsValue {
        let dispatch = self.inner.pointer_leave(pointer_id);
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    #[wasm_bindgen(js_name = captureAcquired)]
    pub fn capture_acquired(&mut self, pointer_id: u32) -> JsValue {
        let dispatch = self.inner.capture_acquired(pointer_id);
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    #[wasm_bindgen(js_name = lostPointerCapture)]
    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> JsValue {
        let dispatch = self.inner.lost_pointer_capture(pointer_id);
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    pub fn blur(&mut self) -> JsValue {
        let dispatch = self.inner.blur();
        dispatch_to_js(dispatch, self.inner.active_pointer_id())
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(js_name = clearFeedback)]
    pub fn clear_feedback(&mut self) {
        self.inner.clear_feedback();
    }

    /// Returns `{ticket, url, body}` JSON to POST. Throws the user-facing
    /// message when the save cannot start.
    #[wasm_bindgen(js_name = beginSave)]
    pub fn begin_save(&mut self) -> Result<String, JsValue> {
        self.inner
            .begin_save()
            .map_err(|err| JsValue::from_str(&err))
    }

    /// Feed back the save response. Returns the effects JSON array.
    #[wasm_bindgen(js_name = completeSaveResponse)]
    pub fn complete_save_response(&mut self, status: u16, body: &str) -> String {
        self.inner.complete_save_response(status, body)
    }

    /// Feed back a failed `fetch`. Returns the effects JSON array.
    #[wasm_bindgen(js_name = completeSaveNetworkError)]
    pub fn complete_save_network_error(&mut self, message: &str) -> String {
        self.inner.complete_save_network_error(message)
    }

    /// Returns the navigation effect JSON array.
    pub fn exit(&mut self) -> String {
        self.inner.exit()
    }

    pub fn side(&self) -> u32 {
        self.inner.side()
    }

    /// RGBA pixels ready for `new ImageData(pixels, side, side)`.
    pub fn pixels(&self) -> Uint8ClampedArray {
        Uint8ClampedArray::from(self.inner.pixels().as_slice())
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.inner
            .snapshot_json()
            .map_err(|err| JsValue::from_str(&err))
    }

    /// Drain structured pointer logs.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let arr = Array::new();
        for line in self.inner.take_logs() {
            arr.push(&JsValue::from_str(&line));
        }
        arr
    }
}
