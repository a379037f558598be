#![forbid(unsafe_code)]

//! Command-line host for the tracepad games.
//!
//! # Role in tracepad
//! The browser runner is the primary host; this crate drives the same
//! controllers from a terminal so that tracing rounds and typing drills can
//! be replayed against a backend (or a dry-run sink) without a browser.
//!
//! # Primary responsibilities
//! - **render**: paint a reference glyph and write it as PNG.
//! - **trace**: replay scripted strokes through `TracingController` and
//!   submit each attempt.
//! - **typing**: run `WordDrill` interactively over stdin/stdout.

pub mod cli;
pub mod error;
pub mod logging;
pub mod render;
pub mod trace;
pub mod typing;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};
