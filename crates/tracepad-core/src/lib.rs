#![forbid(unsafe_code)]

//! Core: session context, navigation routes, and symbol sequencing.
//!
//! # Role in tracepad
//! `tracepad-core` holds the small pieces of state every game shares: who is
//! playing ([`session::SessionContext`]), where the host should navigate
//! ([`route::Route`]), which game is reporting progress ([`game::GameKind`]),
//! and the fixed, finite order of symbols a tracing round walks through
//! ([`sequence::SymbolSequence`]).
//!
//! Nothing here touches pixels or the network. The raster kernel lives in
//! `tracepad-render`, the HTTP surface in `tracepad-api`, and the
//! controllers that tie them together in `tracepad-web`.

pub mod game;
pub mod route;
pub mod sequence;
pub mod session;

pub use game::GameKind;
pub use route::Route;
pub use sequence::{SequenceError, SymbolSequence};
pub use session::{
    CHILD_DATA_KEY, FileSessionStore, MemorySessionStore, SessionContext, SessionError,
    SessionStore,
};
