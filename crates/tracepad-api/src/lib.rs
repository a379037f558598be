#![forbid(unsafe_code)]

//! Backend API surface for the tracepad games.
//!
//! # Role in tracepad
//! Controllers in `tracepad-web` never talk HTTP directly. They build typed
//! requests ([`types`]) and hand them to an implementation of
//! [`TracingApi`] or [`TypingApi`]. Native hosts use the blocking
//! [`HttpGameApi`]; browser hosts perform the fetch themselves and feed the
//! status and body back through [`outcome`].
//!
//! # Primary responsibilities
//! - **Wire types**: camelCase JSON bodies for every endpoint.
//! - **Outcome rules**: a call succeeds on a 2xx status and, where the body
//!   carries one, a true `success` flag.
//! - **Transport**: `reqwest` blocking client with connect and request
//!   timeouts (not built for `wasm32`).

pub mod endpoints;
pub mod error;
pub mod outcome;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod client;

#[cfg(not(target_arch = "wasm32"))]
pub use client::{ClientOptions, HttpGameApi};
pub use error::ApiError;
pub use types::{
    AutoAnalysis, ConfusionPattern, MarkCompletedRequest, SaveTracingRequest,
    SaveTypingResultsRequest, TypingRecord, TypingResultsResponse, WordRequest,
};

/// Completion reporting shared by every game.
pub trait CompletionApi {
    /// Tell the backend a game was finished. The response body is ignored.
    fn mark_game_completed(&self, request: &MarkCompletedRequest) -> Result<(), ApiError>;
}

/// Letter tracing submission.
pub trait TracingApi: CompletionApi {
    /// Submit a traced image.
    fn save_tracing(&self, request: &SaveTracingRequest) -> Result<(), ApiError>;
}

/// Typing drill word generation and result submission.
pub trait TypingApi: CompletionApi {
    fn generate_initial_word(&self, request: &WordRequest) -> Result<String, ApiError>;

    /// Request a word informed by `request.typing_history`.
    fn generate_next_word(&self, request: &WordRequest) -> Result<String, ApiError>;

    fn save_typing_results(
        &self,
        request: &SaveTypingResultsRequest,
    ) -> Result<TypingResultsResponse, ApiError>;
}

impl<T: CompletionApi + ?Sized> CompletionApi for &T {
    fn mark_game_completed(&self, request: &MarkCompletedRequest) -> Result<(), ApiError> {
        (**self).mark_game_completed(request)
    }
}

impl<T: TracingApi + ?Sized> TracingApi for &T {
    fn save_tracing(&self, request: &SaveTracingRequest) -> Result<(), ApiError> {
        (**self).save_tracing(request)
    }
}

impl<T: TypingApi + ?Sized> TypingApi for &T {
    fn generate_initial_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        (**self).generate_initial_word(request)
    }

    fn generate_next_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        (**self).generate_next_word(request)
    }

    fn save_typing_results(
        &self,
        request: &SaveTypingResultsRequest,
    ) -> Result<TypingResultsResponse, ApiError> {
        (**self).save_typing_results(request)
    }
}
