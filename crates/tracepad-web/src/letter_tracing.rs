#![forbid(unsafe_code)]

//! Letter tracing controller.
//!
//! Owns the drawing surface for one tracing round: paints the reference
//! glyph, turns pointer input into ink, decides whether a save is a real
//! trace attempt, and walks the fixed letter sequence.
//!
//! # Host contract
//! Everything is synchronous. Saving is split in two so that browser hosts
//! can run the request on their own event loop:
//!
//! 1. [`TracingController::begin_save`] samples the ink, encodes the PNG and
//!    returns a [`SaveTicket`] holding the request body.
//! 2. The host performs the request and feeds the result to
//!    [`TracingController::complete_save`], which returns the
//!    [`ControllerEffect`]s to schedule.
//!
//! Native hosts can use [`TracingController::attempt_save`], which does both
//! around a blocking [`TracingApi`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracepad_api::{ApiError, MarkCompletedRequest, SaveTracingRequest, TracingApi};
use tracepad_core::{GameKind, Route, SessionContext, SessionError, SessionStore, SymbolSequence};
use tracepad_render::{
    EncodeError, GlyphStyle, InkSample, InkThreshold, Point, Rgba, StrokePath, StrokeStyle,
    Surface, draw_reference_glyph, png_data_url,
};

use crate::feedback::{ControllerEffect, Feedback, FeedbackTone};
use crate::stroke_capture::{
    IgnoredReason, PointerButton, PointerPhase, StrokeAction, StrokeCaptureAdapter,
    StrokeDispatch,
};
use crate::viewport::{DisplayRect, PointerInput, SurfacePolicy, Viewport, to_surface_coordinates};

pub const NO_SURFACE_MESSAGE: &str = "Failed to get canvas context";
pub const INSUFFICIENT_INK_MESSAGE: &str = "Please trace over the letter outline before saving";
pub const ENCODE_FAILED_MESSAGE: &str = "Failed to create image";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save tracing";
pub const SAVE_NETWORK_MESSAGE: &str = "Network error while saving";
pub const ROUND_COMPLETE_MESSAGE: &str = "🎉 All letters completed! Great work!";

/// Everything the controller needs besides the session and the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingSettings {
    pub sequence: SymbolSequence,
    pub surface: SurfacePolicy,
    pub glyph: GlyphStyle,
    pub ink: InkThreshold,
    pub background: Rgba,
    pub ink_color: Rgba,
    /// How long the per-letter success message stays up.
    pub advance_delay: Duration,
    /// Extra pause after the completion message before leaving the game.
    pub navigate_delay: Duration,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            sequence: SymbolSequence::default(),
            surface: SurfacePolicy::default(),
            glyph: GlyphStyle::default(),
            ink: InkThreshold::default(),
            background: Rgba::WHITE,
            ink_color: Rgba::BLACK,
            advance_delay: Duration::from_millis(1_500),
            navigate_delay: Duration::from_millis(2_000),
        }
    }
}

/// Derived interaction phase for the current letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingPhase {
    Idle,
    Tracing,
    Submitting,
    Completed,
}

/// Round progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// One-based position of the current letter.
    pub position: usize,
    pub total: usize,
    /// Letters saved successfully so far.
    pub traced: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.traced, self.total)
    }
}

/// An in-flight save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub id: u64,
    pub symbol: char,
    pub dark_pixels: usize,
    pub request: SaveTracingRequest,
}

/// Why a save did not start.
#[derive(Debug)]
pub enum SaveRejection {
    /// A save is already in flight.
    AlreadySubmitting,
    /// The round is over.
    Completed,
    /// There is no surface to sample.
    NoSurface,
    /// Not enough ink to count as a trace attempt.
    InsufficientInk { dark_pixels: usize },
    /// PNG encoding failed.
    Encode(EncodeError),
}

impl fmt::Display for SaveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySubmitting => f.write_str("a save is already in flight"),
            Self::Completed => f.write_str("the round is already completed"),
            Self::NoSurface => f.write_str(NO_SURFACE_MESSAGE),
            Self::InsufficientInk { dark_pixels } => {
                write!(f, "{INSUFFICIENT_INK_MESSAGE} ({dark_pixels} dark pixels)")
            }
            Self::Encode(err) => write!(f, "{ENCODE_FAILED_MESSAGE}: {err}"),
        }
    }
}

impl std::error::Error for SaveRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

/// Serializable view of the controller for hosts and logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracingSnapshot {
    pub symbol: char,
    pub phase: TracingPhase,
    pub progress: Progress,
    pub percent: f64,
    pub side: u32,
    pub drawing: bool,
    pub feedback: Option<Feedback>,
}

/// Drawing surface controller for one tracing round.
#[derive(Debug)]
pub struct TracingController {
    session: SessionContext,
    settings: TracingSettings,
    viewport: Viewport,
    surface: Option<Surface>,
    path: StrokePath,
    drawing: bool,
    capture: StrokeCaptureAdapter,
    traced: usize,
    feedback: Option<Feedback>,
    pending: Option<u64>,
    next_ticket: u64,
    completed: bool,
}

impl TracingController {
    /// Read the session from `store` and paint the first letter.
    pub fn mount(
        store: &dyn SessionStore,
        viewport: Viewport,
        settings: TracingSettings,
    ) -> Result<Self, SessionError> {
        let session = SessionContext::load(store).inspect_err(|err| {
            tracing::warn!(error = %err, redirect = %err.redirect(), "tracing game needs a session");
        })?;
        Ok(Self::new(session, viewport, settings))
    }

    #[must_use]
    pub fn new(session: SessionContext, viewport: Viewport, settings: TracingSettings) -> Self {
        let mut controller = Self {
            session,
            settings,
            viewport,
            surface: None,
            path: StrokePath::new(),
            drawing: false,
            capture: StrokeCaptureAdapter::default(),
            traced: 0,
            feedback: None,
            pending: None,
            next_ticket: 1,
            completed: false,
        };
        let first = controller.settings.sequence.current();
        controller.initialize_surface(first);
        controller
    }

    /// Recreate the surface for the current viewport and paint `symbol`.
    ///
    /// Discards every stroke, including one in progress. When the viewport
    /// leaves no room for a surface, the controller is left without one and
    /// drawing becomes a no-op.
    pub fn initialize_surface(&mut self, symbol: char) {
        self.path.reset();
        self.drawing = false;
        let side = self.settings.surface.side(self.viewport);
        self.surface = Surface::square(side, self.settings.background);
        match self.surface.as_mut() {
            Some(surface) => {
                draw_reference_glyph(surface, symbol, &self.settings.glyph);
                tracing::debug!(%symbol, side, "surface initialized");
            }
            None => tracing::debug!(%symbol, "no room for a surface; drawing disabled"),
        }
    }

    /// Viewport changed. Always reinitializes, even mid-stroke.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let symbol = self.current_symbol();
        self.initialize_surface(symbol);
    }

    /// Start a new path at `point`.
    pub fn begin_stroke(&mut self, point: Point) {
        if self.completed || self.surface.is_none() {
            return;
        }
        self.path.move_to(point);
        self.drawing = true;
    }

    /// Paint from the current path position to `point`. No effect unless a
    /// stroke is active.
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let width = self.settings.surface.brush_width(surface.width());
        let style = StrokeStyle::new(self.settings.ink_color, width);
        self.path.line_to(surface, point, style);
    }

    pub fn end_stroke(&mut self) {
        self.drawing = false;
        self.path.reset();
    }

    // --- pointer lifecycle -------------------------------------------------

    /// Pointer pressed over the surface displayed at `rect`.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        input: &PointerInput,
        rect: DisplayRect,
    ) -> StrokeDispatch {
        let Some(point) = self.map_input(input, rect) else {
            return StrokeDispatch::ignored(
                PointerPhase::PointerDown,
                IgnoredReason::Unmappable,
                Some(pointer_id),
                None,
            );
        };
        let dispatch = self.capture.pointer_down(pointer_id, button, point);
        self.apply(dispatch)
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        input: &PointerInput,
        rect: DisplayRect,
    ) -> StrokeDispatch {
        let Some(point) = self.map_input(input, rect) else {
            return StrokeDispatch::ignored(
                PointerPhase::PointerMove,
                IgnoredReason::Unmappable,
                Some(pointer_id),
                None,
            );
        };
        let dispatch = self.capture.pointer_move(pointer_id, point);
        self.apply(dispatch)
    }

    pub fn pointer_up(&mut self, pointer_id: u32, button: PointerButton) -> StrokeDispatch {
        let dispatch = self.capture.pointer_up(pointer_id, button);
        self.apply(dispatch)
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> StrokeDispatch {
        let dispatch = self.capture.pointer_cancel(pointer_id);
        self.apply(dispatch)
    }

    pub fn pointer_leave(&mut self, pointer_id: u32) -> StrokeDispatch {
        let dispatch = self.capture.pointer_leave(pointer_id);
        self.apply(dispatch)
    }

    pub fn capture_acquired(&mut self, pointer_id: u32) -> StrokeDispatch {
        let dispatch = self.capture.capture_acquired(pointer_id);
        self.apply(dispatch)
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> StrokeDispatch {
        let dispatch = self.capture.lost_pointer_capture(pointer_id);
        self.apply(dispatch)
    }

    pub fn blur(&mut self) -> StrokeDispatch {
        let dispatch = self.capture.blur();
        self.apply(dispatch)
    }

    fn map_input(&self, input: &PointerInput, rect: DisplayRect) -> Option<Point> {
        let (width, height) = self
            .surface
            .as_ref()
            .map_or((0, 0), |s| (s.width(), s.height()));
        to_surface_coordinates(input, rect, width, height)
    }

    fn apply(&mut self, dispatch: StrokeDispatch) -> StrokeDispatch {
        match dispatch.action {
            Some(StrokeAction::Begin(point)) => self.begin_stroke(point),
            Some(StrokeAction::Extend(point)) => self.extend_stroke(point),
            Some(StrokeAction::End) => self.end_stroke(),
            None => {}
        }
        tracing::trace!(log = ?dispatch.log, "pointer dispatch");
        dispatch
    }

    // --- clear and save ----------------------------------------------------

    /// Restore the pristine glyph. Ignored while a save is in flight.
    pub fn clear(&mut self) {
        if self.pending.is_some() || self.completed {
            tracing::debug!("clear ignored");
            return;
        }
        let symbol = self.current_symbol();
        self.initialize_surface(symbol);
    }

    /// Sample the ink and, for a real attempt, enter `Submitting` and return
    /// the request to send.
    pub fn begin_save(&mut self) -> Result<SaveTicket, SaveRejection> {
        if self.completed {
            return Err(SaveRejection::Completed);
        }
        if self.pending.is_some() {
            return Err(SaveRejection::AlreadySubmitting);
        }
        let Some(surface) = self.surface.as_ref() else {
            self.feedback = Some(Feedback::error(NO_SURFACE_MESSAGE));
            return Err(SaveRejection::NoSurface);
        };

        let sample = InkSample::measure(surface, self.settings.ink);
        if !sample.is_trace_attempt() {
            tracing::debug!(
                dark_pixels = sample.dark_pixels,
                min = self.settings.ink.min_dark_pixels,
                "not enough ink to save"
            );
            self.feedback = Some(Feedback::error(INSUFFICIENT_INK_MESSAGE));
            return Err(SaveRejection::InsufficientInk {
                dark_pixels: sample.dark_pixels,
            });
        }

        let flattened = surface.flattened_onto(self.settings.background);
        let image_data = match png_data_url(&flattened) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(error = %err, "tracing image encode failed");
                self.feedback = Some(Feedback::error(ENCODE_FAILED_MESSAGE));
                return Err(SaveRejection::Encode(err));
            }
        };

        let symbol = self.current_symbol();
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(id);
        self.feedback = None;
        tracing::info!(%symbol, dark_pixels = sample.dark_pixels, ticket = id, "submitting tracing");
        Ok(SaveTicket {
            id,
            symbol,
            dark_pixels: sample.dark_pixels,
            request: SaveTracingRequest::new(&self.session, symbol, image_data),
        })
    }

    /// Apply the API outcome for ticket `ticket_id`. Tickets that are not
    /// the one in flight are ignored.
    pub fn complete_save(
        &mut self,
        ticket_id: u64,
        outcome: Result<(), ApiError>,
    ) -> Vec<ControllerEffect> {
        if self.pending != Some(ticket_id) {
            tracing::debug!(ticket = ticket_id, "stale save response ignored");
            return Vec::new();
        }
        self.pending = None;

        if let Err(err) = outcome {
            tracing::warn!(error = %err, symbol = %self.current_symbol(), "tracing save failed");
            let text = if err.is_rejection() {
                err.server_message().unwrap_or(SAVE_FAILED_MESSAGE).to_string()
            } else {
                SAVE_NETWORK_MESSAGE.to_string()
            };
            self.feedback = Some(Feedback::error(text));
            return Vec::new();
        }

        self.traced += 1;
        let symbol = self.current_symbol();
        if self.settings.sequence.is_last() {
            self.completed = true;
            self.end_stroke();
            self.feedback = Some(Feedback::new(
                FeedbackTone::Celebration,
                ROUND_COMPLETE_MESSAGE,
            ));
            tracing::info!(traced = self.traced, "tracing round completed");
            return vec![
                ControllerEffect::ReportCompletion(MarkCompletedRequest::new(
                    &self.session,
                    GameKind::Tracing,
                )),
                ControllerEffect::Navigate {
                    route: Route::ChildDashboard,
                    after: self.settings.advance_delay + self.settings.navigate_delay,
                },
            ];
        }

        self.feedback = Some(Feedback::new(
            FeedbackTone::Success,
            format!("✓ {symbol} traced! Good job!"),
        ));
        if let Some(next) = self.settings.sequence.advance() {
            tracing::info!(traced = %symbol, %next, "advancing to next letter");
            self.initialize_surface(next);
        }
        vec![ControllerEffect::ClearFeedback {
            after: self.settings.advance_delay,
        }]
    }

    /// Save through a blocking API. Completion reporting is performed here
    /// and its failures only logged; the remaining effects are returned.
    pub fn attempt_save(&mut self, api: &dyn TracingApi) -> Vec<ControllerEffect> {
        let ticket = match self.begin_save() {
            Ok(ticket) => ticket,
            Err(rejection) => {
                tracing::debug!(%rejection, "save not started");
                return Vec::new();
            }
        };
        let outcome = api.save_tracing(&ticket.request);
        let effects = self.complete_save(ticket.id, outcome);
        effects
            .into_iter()
            .filter(|effect| match effect {
                ControllerEffect::ReportCompletion(request) => {
                    if let Err(err) = api.mark_game_completed(request) {
                        tracing::warn!(error = %err, game = %request.game.as_str(), "mark completed failed");
                    }
                    false
                }
                _ => true,
            })
            .collect()
    }

    /// Leave the game.
    pub fn exit(&mut self) -> ControllerEffect {
        tracing::info!(symbol = %self.current_symbol(), "tracing game exited");
        ControllerEffect::navigate_now(Route::ChildDashboard)
    }

    /// Drop the current message (the host calls this when a
    /// [`ControllerEffect::ClearFeedback`] timer fires).
    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    // --- accessors ---------------------------------------------------------

    #[must_use]
    pub fn current_symbol(&self) -> char {
        self.settings.sequence.current()
    }

    #[must_use]
    pub fn phase(&self) -> TracingPhase {
        if self.completed {
            TracingPhase::Completed
        } else if self.pending.is_some() {
            TracingPhase::Submitting
        } else if self.drawing {
            TracingPhase::Tracing
        } else {
            TracingPhase::Idle
        }
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            position: self.settings.sequence.index() + 1,
            total: self.settings.sequence.len(),
            traced: self.traced,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Side of the current surface, zero when there is none.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.surface.as_ref().map_or(0, Surface::width)
    }

    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Pointer currently driving a stroke, as tracked by the capture adapter.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.capture.active_pointer_id()
    }

    /// Ink on the surface right now.
    #[must_use]
    pub fn ink_sample(&self) -> Option<InkSample> {
        self.surface
            .as_ref()
            .map(|surface| InkSample::measure(surface, self.settings.ink))
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub const fn settings(&self) -> &TracingSettings {
        &self.settings
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn snapshot(&self) -> TracingSnapshot {
        TracingSnapshot {
            symbol: self.current_symbol(),
            phase: self.phase(),
            progress: self.progress(),
            percent: self.settings.sequence.display_percent(),
            side: self.side(),
            drawing: self.drawing,
            feedback: self.feedback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracepad_api::ApiError;
    use tracepad_core::SessionContext;
    use tracepad_render::Point;

    use super::*;

    fn session() -> SessionContext {
        SessionContext {
            username: "mia".into(),
            therapist_code: "T-42".into(),
            session_id: "s-1".into(),
        }
    }

    fn controller() -> TracingController {
        TracingController::new(
            session(),
            Viewport::new(1280.0, 1000.0),
            TracingSettings::default(),
        )
    }

    fn scribble(controller: &mut TracingController) {
        let side = controller.side() as f32;
        for row in 1..6 {
            let y = side * row as f32 / 6.0;
            controller.begin_stroke(Point::new(side * 0.1, y));
            controller.extend_stroke(Point::new(side * 0.9, y));
            controller.end_stroke();
        }
    }

    #[test]
    fn mounts_on_first_letter_with_pristine_surface() {
        let controller = controller();
        assert_eq!(controller.current_symbol(), 'A');
        assert_eq!(controller.side(), 500);
        assert_eq!(controller.phase(), TracingPhase::Idle);
        assert_eq!(controller.ink_sample().map(|s| s.dark_pixels), Some(0));
        assert_eq!(controller.progress().to_string(), "0/4");
    }

    #[test]
    fn extend_without_begin_paints_nothing() {
        let mut controller = controller();
        controller.extend_stroke(Point::new(10.0, 10.0));
        controller.extend_stroke(Point::new(400.0, 400.0));
        assert_eq!(controller.ink_sample().map(|s| s.dark_pixels), Some(0));
    }

    #[test]
    fn phase_follows_stroke_and_submit() {
        let mut controller = controller();
        controller.begin_stroke(Point::new(10.0, 10.0));
        assert_eq!(controller.phase(), TracingPhase::Tracing);
        scribble(&mut controller);
        assert_eq!(controller.phase(), TracingPhase::Idle);
        let ticket = controller.begin_save().expect("ticket");
        assert_eq!(controller.phase(), TracingPhase::Submitting);
        assert!(matches!(
            controller.begin_save(),
            Err(SaveRejection::AlreadySubmitting)
        ));
        controller.complete_save(ticket.id, Err(ApiError::transport("down")));
        assert_eq!(controller.phase(), TracingPhase::Idle);
    }

    #[test]
    fn clear_is_ignored_while_submitting() {
        let mut controller = controller();
        scribble(&mut controller);
        let before = controller.ink_sample().expect("surface").dark_pixels;
        let _ticket = controller.begin_save().expect("ticket");
        controller.clear();
        assert_eq!(
            controller.ink_sample().expect("surface").dark_pixels,
            before
        );
    }

    #[test]
    fn clear_restores_pristine_glyph() {
        let mut controller = controller();
        scribble(&mut controller);
        controller.clear();
        assert_eq!(controller.ink_sample().map(|s| s.dark_pixels), Some(0));
    }

    #[test]
    fn failed_save_keeps_strokes_and_reports_message() {
        let mut controller = controller();
        scribble(&mut controller);
        let before = controller.ink_sample().expect("surface").dark_pixels;

        let ticket = controller.begin_save().expect("ticket");
        let effects = controller.complete_save(
            ticket.id,
            Err(ApiError::rejected(400, Some("Session expired".into()))),
        );
        assert!(effects.is_empty());
        assert_eq!(
            controller.feedback().map(|f| f.text.as_str()),
            Some("Session expired")
        );
        assert_eq!(controller.current_symbol(), 'A');
        assert_eq!(
            controller.ink_sample().expect("surface").dark_pixels,
            before
        );

        let retry = controller.begin_save().expect("retry");
        controller.complete_save(retry.id, Err(ApiError::rejected(500, None)));
        assert_eq!(
            controller.feedback().map(|f| f.text.as_str()),
            Some(SAVE_FAILED_MESSAGE)
        );
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut controller = controller();
        scribble(&mut controller);
        let ticket = controller.begin_save().expect("ticket");
        assert!(controller.complete_save(ticket.id + 7, Ok(())).is_empty());
        assert_eq!(controller.phase(), TracingPhase::Submitting);
        controller.complete_save(ticket.id, Ok(()));
        assert!(controller.complete_save(ticket.id, Ok(())).is_empty());
        assert_eq!(controller.current_symbol(), 'B');
    }

    #[test]
    fn zero_viewport_disables_drawing_and_save() {
        let mut controller = TracingController::new(
            session(),
            Viewport::new(0.0, 0.0),
            TracingSettings::default(),
        );
        assert!(controller.surface().is_none());
        controller.begin_stroke(Point::new(1.0, 1.0));
        assert!(!controller.is_drawing());
        assert!(matches!(
            controller.begin_save(),
            Err(SaveRejection::NoSurface)
        ));
        assert_eq!(
            controller.feedback().map(|f| f.text.as_str()),
            Some(NO_SURFACE_MESSAGE)
        );

        controller.resize(Viewport::new(800.0, 800.0));
        assert_eq!(controller.side(), 400);
    }

    #[test]
    fn ticket_request_carries_session_and_png() {
        let mut controller = controller();
        scribble(&mut controller);
        let ticket = controller.begin_save().expect("ticket");
        assert_eq!(ticket.symbol, 'A');
        assert_eq!(ticket.request.letter, "A");
        assert_eq!(ticket.request.username, "mia");
        assert!(
            ticket
                .request
                .image_data
                .starts_with(tracepad_render::PNG_DATA_URL_PREFIX)
        );
        assert!(ticket.dark_pixels > 500);
    }

    #[test]
    fn snapshot_serializes_phase_in_lowercase() {
        let controller = controller();
        let json = serde_json::to_value(controller.snapshot()).expect("json");
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["symbol"], "A");
        assert_eq!(json["progress"]["total"], 4);
        assert_eq!(json["percent"], 25.0);
    }
}
