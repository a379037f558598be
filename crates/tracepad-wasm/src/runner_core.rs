#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`TracingController`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here: inputs are plain
//! numbers and strings, outputs are [`StrokeDispatch`] values and JSON.

use serde_json::{Value, json};
use tracepad_api::{ApiError, endpoints, outcome};
use tracepad_core::{CHILD_DATA_KEY, MemorySessionStore};
use tracepad_web::stroke_capture::{IgnoredReason, LogEntry, LogOutcome, PointerPhase};
use tracepad_web::{
    CaptureCommand, ControllerEffect, DisplayRect, PointerButton, PointerInput, StrokeDispatch,
    TracepadConfig, TracingController, Viewport,
};

/// Host-facing runner for one tracing round.
pub struct RunnerCore {
    controller: TracingController,
    base_url: String,
    /// Ticket handed to the host by the last successful `begin_save`.
    pending_ticket: Option<u64>,
    /// Structured pointer lifecycle logs, drained by the host.
    logs: Vec<String>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl RunnerCore {
    /// Mount a controller for the session stored as `session_json` (the
    /// `childData` value). `config_json` overrides the default configuration.
    pub fn new(
        viewport_width: f32,
        viewport_height: f32,
        session_json: &str,
        config_json: Option<&str>,
    ) -> Result<Self, String> {
        let config = match config_json {
            Some(raw) => TracepadConfig::from_json_str(raw).map_err(|err| err.to_string())?,
            None => TracepadConfig::default(),
        };
        let settings = config.tracing_settings().map_err(|err| err.to_string())?;
        let mut store = MemorySessionStore::new();
        store.insert(CHILD_DATA_KEY, session_json);
        let controller = TracingController::mount(
            &store,
            Viewport::new(viewport_width, viewport_height),
            settings,
        )
        .map_err(|err| format!("{err}; redirect={}", err.redirect()))?;
        Ok(Self {
            controller,
            base_url: config.api.base_url,
            pending_ticket: None,
            logs: Vec::new(),
        })
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.controller
            .resize(Viewport::new(viewport_width, viewport_height));
    }

    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        client_x: f32,
        client_y: f32,
        rect: DisplayRect,
    ) -> StrokeDispatch {
        let input = PointerInput::mouse(client_x, client_y);
        let dispatch = self.controller.pointer_down(pointer_id, button, &input, rect);
        self.record(dispatch)
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        client_x: f32,
        client_y: f32,
        rect: DisplayRect,
    ) -> StrokeDispatch {
        let input = PointerInput::mouse(client_x, client_y);
        let dispatch = self.controller.pointer_move(pointer_id, &input, rect);
        self.record(dispatch)
    }

    pub fn pointer_up(&mut self, pointer_id: u32, button: PointerButton) -> StrokeDispatch {
        let dispatch = self.controller.pointer_up(pointer_id, button);
        self.record(dispatch)
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> StrokeDispatch {
        let dispatch = self.controller.pointer_cancel(pointer_id);
        self.record(dispatch)
    }

    pub fn pointer_leave(&mut self, pointer_id: u32) -> StrokeDispatch {
        let dispatch = self.controller.pointer_leave(pointer_id);
        self.record(dispatch)
    }

    pub fn capture_acquired(&mut self, pointer_id: u32) -> StrokeDispatch {
        let dispatch = self.controller.capture_acquired(pointer_id);
        self.record(dispatch)
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> StrokeDispatch {
        let dispatch = self.controller.lost_pointer_capture(pointer_id);
        self.record(dispatch)
    }

    pub fn blur(&mut self) -> StrokeDispatch {
        let dispatch = self.controller.blur();
        self.record(dispatch)
    }

    pub fn clear(&mut self) {
        self.controller.clear();
    }

    pub fn clear_feedback(&mut self) {
        self.controller.clear_feedback();
    }

    /// Start a save. On success returns `{ticket, url, body}` JSON for the
    /// host to POST; on rejection returns the message now shown to the child.
    pub fn begin_save(&mut self) -> Result<String, String> {
        let ticket = self
            .controller
            .begin_save()
            .map_err(|rejection| rejection.to_string())?;
        let body = serde_json::to_value(&ticket.request).map_err(|err| err.to_string())?;
        self.pending_ticket = Some(ticket.id);
        Ok(json!({
            "ticket": ticket.id,
            "url": endpoints::join(&self.base_url, endpoints::SAVE_TRACING),
            "body": body,
        })
        .to_string())
    }

    /// Finish the pending save with the HTTP status and body the host got.
    /// Returns the effects to schedule as a JSON array.
    pub fn complete_save_response(&mut self, status: u16, body: &str) -> String {
        self.complete(outcome::acknowledgement(status, body))
    }

    /// Finish the pending save after the request itself failed.
    pub fn complete_save_network_error(&mut self, message: &str) -> String {
        self.complete(Err(ApiError::transport(message)))
    }

    fn complete(&mut self, result: Result<(), ApiError>) -> String {
        let Some(ticket) = self.pending_ticket.take() else {
            self.logs.push("save_response ignored: no pending ticket".to_owned());
            return "[]".to_owned();
        };
        let effects = self.controller.complete_save(ticket, result);
        self.effects_json(&effects)
    }

    /// Leave the game. Returns the navigation effect as JSON.
    pub fn exit(&mut self) -> String {
        let effect = self.controller.exit();
        self.effects_json(std::slice::from_ref(&effect))
    }

    fn effects_json(&self, effects: &[ControllerEffect]) -> String {
        let values: Vec<Value> = effects
            .iter()
            .map(|effect| match effect {
                ControllerEffect::ClearFeedback { after } => json!({
                    "kind": "clear_feedback",
                    "after_ms": after.as_millis() as u64,
                }),
                ControllerEffect::ReportCompletion(request) => json!({
                    "kind": "report_completion",
                    "url": endpoints::join(&self.base_url, endpoints::MARK_GAME_COMPLETED),
                    "body": serde_json::to_value(request).unwrap_or(Value::Null),
                }),
                ControllerEffect::Navigate { route, after } => json!({
                    "kind": "navigate",
                    "path": route.path(),
                    "after_ms": after.as_millis() as u64,
                }),
            })
            .collect();
        Value::Array(values).to_string()
    }

    /// Side of the square surface in pixels; zero when there is none.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.controller.side()
    }

    /// RGBA8 pixels of the surface, row-major.
    #[must_use]
    pub fn pixels(&self) -> Vec<u8> {
        self.controller
            .surface()
            .map(|surface| surface.data().to_vec())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.controller.active_pointer_id()
    }

    /// Controller state as JSON.
    pub fn snapshot_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.controller.snapshot()).map_err(|err| err.to_string())
    }

    /// Drain accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    fn record(&mut self, dispatch: StrokeDispatch) -> StrokeDispatch {
        self.logs.push(format_log_entry(dispatch.log));
        dispatch
    }
}

pub(crate) fn phase_label(phase: PointerPhase) -> &'static str {
    match phase {
        PointerPhase::PointerDown => "pointer_down",
        PointerPhase::PointerMove => "pointer_move",
        PointerPhase::PointerUp => "pointer_up",
        PointerPhase::PointerCancel => "pointer_cancel",
        PointerPhase::PointerLeave => "pointer_leave",
        PointerPhase::Blur => "blur",
        PointerPhase::LostPointerCapture => "lost_pointer_capture",
        PointerPhase::CaptureAcquired => "capture_acquired",
    }
}

pub(crate) fn ignored_reason_label(reason: IgnoredReason) -> &'static str {
    match reason {
        IgnoredReason::InvalidPointerId => "invalid_pointer_id",
        IgnoredReason::ButtonNotAllowed => "button_not_allowed",
        IgnoredReason::ButtonMismatch => "button_mismatch",
        IgnoredReason::ActivePointerAlreadyInProgress => "active_pointer_already_in_progress",
        IgnoredReason::NoActivePointer => "no_active_pointer",
        IgnoredReason::PointerMismatch => "pointer_mismatch",
        IgnoredReason::LeaveWhileCaptured => "leave_while_captured",
        IgnoredReason::Unmappable => "unmappable",
    }
}

pub(crate) fn outcome_label(outcome: LogOutcome) -> String {
    match outcome {
        LogOutcome::StrokeForwarded => "stroke_forwarded".to_owned(),
        LogOutcome::CaptureStateUpdated => "capture_state_updated".to_owned(),
        LogOutcome::Ignored(reason) => format!("ignored:{}", ignored_reason_label(reason)),
    }
}

fn format_capture_command(command: Option<CaptureCommand>) -> String {
    match command {
        Some(CaptureCommand::Acquire { pointer_id }) => format!("acquire:{pointer_id}"),
        Some(CaptureCommand::Release { pointer_id }) => format!("release:{pointer_id}"),
        None => "-".to_owned(),
    }
}

fn format_log_entry(log: LogEntry) -> String {
    let pointer_id = log
        .pointer_id
        .map_or_else(|| "-".to_owned(), |id| id.to_string());
    let sequence = log
        .sequence
        .map_or_else(|| "-".to_owned(), |seq| seq.to_string());
    let (x, y) = match log.position {
        Some(pos) => (format!("{:.1}", pos.x), format!("{:.1}", pos.y)),
        None => ("-".to_owned(), "-".to_owned()),
    };
    format!(
        "stroke_pointer phase={} seq={sequence} pointer={pointer_id} x={x} y={y} command={} outcome={}",
        phase_label(log.phase),
        format_capture_command(log.capture_command),
        outcome_label(log.outcome),
    )
}
