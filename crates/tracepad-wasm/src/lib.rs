#![forbid(unsafe_code)]

//! Browser runner for the tracepad letter tracing game.
//!
//! This crate provides [`TracepadRunner`], a `wasm-bindgen`-exported struct
//! that wraps `tracepad_web::TracingController` and exposes it to JavaScript
//! for host-driven execution. The host owns the `<canvas>`, the event
//! listeners, `fetch`, and the router; the runner owns the pixels and the
//! game state.
//!
//! A typical frame:
//! 1. forward pointer events with client coordinates and the canvas
//!    `getBoundingClientRect()`;
//! 2. blit `pixels()` into the canvas with `putImageData`;
//! 3. on save, POST the body returned by `beginSave()` and hand the response
//!    to `completeSaveResponse()`, then schedule the returned effects.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::TracepadRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
