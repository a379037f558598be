#![forbid(unsafe_code)]

//! Turning an HTTP status and body into a call result.
//!
//! Shared by the native client and by browser hosts that perform the fetch
//! themselves. A body that is not JSON is a decode failure regardless of
//! status, matching a client that always parses the body before looking at
//! the status.

use crate::error::ApiError;
use crate::types::{StatusResponse, TypingResultsResponse, WordResponse};

#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    status >= 200 && status < 300
}

/// `{success, error?}` endpoints: 2xx and `success == true`.
pub fn acknowledgement(status: u16, body: &str) -> Result<(), ApiError> {
    let parsed: StatusResponse = serde_json::from_str(body)?;
    if is_success_status(status) && parsed.success {
        Ok(())
    } else {
        Err(ApiError::rejected(status, parsed.error))
    }
}

/// Fire-and-forget endpoints: only the status matters.
pub fn completion(status: u16, body: &str) -> Result<(), ApiError> {
    if is_success_status(status) {
        return Ok(());
    }
    let message = serde_json::from_str::<StatusResponse>(body)
        .ok()
        .and_then(|parsed| parsed.error);
    Err(ApiError::rejected(status, message))
}

/// Word generation: 2xx, `success == true` and a non-empty word.
pub fn generated_word(status: u16, body: &str) -> Result<String, ApiError> {
    let parsed: WordResponse = serde_json::from_str(body)?;
    match parsed.word {
        Some(word) if is_success_status(status) && parsed.success && !word.is_empty() => Ok(word),
        _ => Err(ApiError::rejected(status, parsed.error)),
    }
}

/// Typing results: any 2xx is a save; the body may carry an analysis.
pub fn typing_results(status: u16, body: &str) -> Result<TypingResultsResponse, ApiError> {
    let parsed: TypingResultsResponse = serde_json::from_str(body)?;
    if is_success_status(status) {
        Ok(parsed)
    } else {
        Err(ApiError::rejected(status, parsed.error))
    }
}
