#![forbid(unsafe_code)]

//! Endpoint paths, relative to the configured base URL.

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const SAVE_TRACING: &str = "/api/tracing/save";
pub const MARK_GAME_COMPLETED: &str = "/api/mark-game-completed";
pub const GENERATE_INITIAL_WORD: &str = "/api/typing/generate-initial-word";
pub const GENERATE_NEXT_WORD: &str = "/api/typing/generate-next-word";
pub const SAVE_TYPING_RESULTS: &str = "/api/save-typing-results";

/// Join a base URL and an endpoint path without doubling the slash.
#[must_use]
pub fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
