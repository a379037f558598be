#![forbid(unsafe_code)]

//! Blocking HTTP implementation of the game API traits.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::endpoints;
use crate::error::ApiError;
use crate::outcome;
use crate::types::{
    MarkCompletedRequest, SaveTracingRequest, SaveTypingResultsRequest, TypingResultsResponse,
    WordRequest,
};
use crate::{CompletionApi, TracingApi, TypingApi};

/// Connection settings for [`HttpGameApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: endpoints::DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// `reqwest` blocking client bound to one backend origin.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(options: &ClientOptions) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the status and raw response text.
    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(u16, String), ApiError> {
        let url = endpoints::join(&self.base_url, path);
        tracing::debug!(%url, "api request");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .inspect_err(|error| tracing::warn!(%url, %error, "api transport failure"))?;
        let status = response.status().as_u16();
        let text = response.text()?;
        tracing::debug!(%url, status, bytes = text.len(), "api response");
        Ok((status, text))
    }
}

impl CompletionApi for HttpGameApi {
    fn mark_game_completed(&self, request: &MarkCompletedRequest) -> Result<(), ApiError> {
        let (status, body) = self.post(endpoints::MARK_GAME_COMPLETED, request)?;
        outcome::completion(status, &body)
    }
}

impl TracingApi for HttpGameApi {
    fn save_tracing(&self, request: &SaveTracingRequest) -> Result<(), ApiError> {
        let (status, body) = self.post(endpoints::SAVE_TRACING, request)?;
        outcome::acknowledgement(status, &body)
    }
}

impl TypingApi for HttpGameApi {
    fn generate_initial_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        let (status, body) = self.post(endpoints::GENERATE_INITIAL_WORD, request)?;
        outcome::generated_word(status, &body)
    }

    fn generate_next_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        let (status, body) = self.post(endpoints::GENERATE_NEXT_WORD, request)?;
        outcome::generated_word(status, &body)
    }

    fn save_typing_results(
        &self,
        request: &SaveTypingResultsRequest,
    ) -> Result<TypingResultsResponse, ApiError> {
        let (status, body) = self.post(endpoints::SAVE_TYPING_RESULTS, request)?;
        outcome::typing_results(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ClientOptions, HttpGameApi};
    use crate::TracingApi;
    use crate::types::SaveTracingRequest;
    use tracepad_core::SessionContext;

    #[test]
    fn new_normalizes_trailing_slash() {
        let options = ClientOptions {
            base_url: "http://127.0.0.1:9/".into(),
            ..ClientOptions::default()
        };
        let api = HttpGameApi::new(&options).expect("client");
        assert_eq!(api.base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        let options = ClientOptions {
            base_url: "http://127.0.0.1:9".into(),
            connect_timeout: Duration::from_millis(200),
            request_timeout: Duration::from_millis(500),
        };
        let api = HttpGameApi::new(&options).expect("client");
        let session = SessionContext {
            username: "u".into(),
            therapist_code: "t".into(),
            session_id: "s".into(),
        };
        let err = api
            .save_tracing(&SaveTracingRequest::new(&session, 'A', String::new()))
            .expect_err("nothing listens on port 9");
        assert!(!err.is_rejection());
    }
}
