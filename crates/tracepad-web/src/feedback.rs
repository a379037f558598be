#![forbid(unsafe_code)]

//! User-facing messages and host-scheduled effects shared by the games.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracepad_api::MarkCompletedRequest;
use tracepad_core::Route;

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTone {
    Success,
    Celebration,
    Encouragement,
    Error,
}

/// Message shown to the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub tone: FeedbackTone,
    pub text: String,
}

impl Feedback {
    #[must_use]
    pub fn new(tone: FeedbackTone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(FeedbackTone::Error, text)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.tone, FeedbackTone::Error)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Work the host must schedule or perform on the controller's behalf.
///
/// Controllers never sleep or navigate themselves; delays are expressed as
/// durations relative to the moment the effect was returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEffect {
    /// Clear the current feedback message after `after`.
    ClearFeedback { after: Duration },
    /// Report the finished game to the completion endpoint. Failures are
    /// only logged.
    ReportCompletion(MarkCompletedRequest),
    /// Leave the game for `route` after `after`.
    Navigate { route: Route, after: Duration },
}

impl ControllerEffect {
    #[must_use]
    pub const fn navigate_now(route: Route) -> Self {
        Self::Navigate {
            route,
            after: Duration::ZERO,
        }
    }
}
