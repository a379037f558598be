#![forbid(unsafe_code)]

//! `tracepad-web` holds the game controllers the hosts embed.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes pointer events,
//!   viewport sizes and API results; controllers return effects instead of
//!   sleeping or navigating.
//! - **Deterministic pixels**: the surface is painted by `tracepad-render`,
//!   so the ink heuristic sees the same buffer on every target.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!   The blocking helpers (`attempt_save`, the typing drill) only block as
//!   long as the API implementation handed to them does.
//!
//! # Modules
//! - [`letter_tracing`]: drawing surface controller for a round of letters.
//! - [`typing_drill`]: word-by-word typing practice.
//! - [`stroke_capture`]: single-pointer lifecycle adapter.
//! - [`viewport`]: surface sizing and client-to-buffer mapping.
//! - [`feedback`]: messages and host effects.
//! - [`config`]: TOML/JSON configuration.

pub mod config;
pub mod feedback;
pub mod letter_tracing;
pub mod stroke_capture;
pub mod typing_drill;
pub mod viewport;

pub use config::{ConfigError, TracepadConfig};
pub use feedback::{ControllerEffect, Feedback, FeedbackTone};
pub use letter_tracing::{
    Progress, SaveRejection, SaveTicket, TracingController, TracingPhase, TracingSettings,
    TracingSnapshot,
};
pub use stroke_capture::{
    CaptureCommand, PointerButton, StrokeCaptureAdapter, StrokeCaptureConfig, StrokeDispatch,
};
pub use typing_drill::{DrillMount, DrillProgress, DrillSettings, InputHint, WordDrill};
pub use viewport::{ClientPoint, DisplayRect, PointerInput, SurfacePolicy, Viewport};
