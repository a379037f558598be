#![forbid(unsafe_code)]

//! Game identifiers reported to the completion endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the mini-games a child can finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Tracing,
    Typing,
}

impl GameKind {
    /// Wire identifier used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tracing => "tracing",
            Self::Typing => "typing",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
