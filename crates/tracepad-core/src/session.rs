#![forbid(unsafe_code)]

//! Session context lookup.
//!
//! The identity of the playing child is written by the login flow into a
//! key-value store (browser session storage in production). Games read it
//! exactly once when they mount. A missing or unreadable entry is a fatal
//! precondition: the caller must send the user back to the login route.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::route::Route;

/// Store key holding the serialized [`SessionContext`].
pub const CHILD_DATA_KEY: &str = "childData";

/// Read-only key-value source for session data.
pub trait SessionStore {
    /// Look up the raw string stored under `key`.
    fn get(&self, key: &str) -> Option<String>;
}

/// Identity triple for the current play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub username: String,
    pub therapist_code: String,
    pub session_id: String,
}

impl SessionContext {
    /// Read the context from `store`.
    pub fn load(store: &dyn SessionStore) -> Result<Self, SessionError> {
        let raw = store.get(CHILD_DATA_KEY).ok_or(SessionError::Missing {
            key: CHILD_DATA_KEY,
        })?;
        let context = serde_json::from_str::<Self>(&raw).map_err(|source| {
            SessionError::Malformed {
                key: CHILD_DATA_KEY,
                source,
            }
        })?;
        tracing::debug!(username = %context.username, session_id = %context.session_id, "session context loaded");
        Ok(context)
    }

    /// Preferred game recorded for this child, falling back to the global key.
    #[must_use]
    pub fn preferred_game(&self, store: &dyn SessionStore) -> Option<String> {
        store
            .get(&format!("selectedGame_{}", self.username))
            .or_else(|| store.get("selectedGame"))
    }
}

/// Failure to obtain a usable session context.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session context stored under `{key}`")]
    Missing { key: &'static str },

    #[error("session context under `{key}` is malformed: {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is not a JSON object: {source}")]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SessionError {
    /// Where the host should send the user after this failure.
    #[must_use]
    pub const fn redirect(&self) -> Route {
        Route::ChildLogin
    }
}

/// In-memory store, primarily for hosts that already hold the values.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `context` under [`CHILD_DATA_KEY`].
    pub fn with_context(context: &SessionContext) -> Result<Self, serde_json::Error> {
        let mut store = Self::new();
        store.insert(CHILD_DATA_KEY, serde_json::to_string(context)?);
        Ok(store)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Store backed by a JSON object on disk.
///
/// String values are returned verbatim; any other JSON value is returned in
/// its serialized form so that nested objects such as `childData` can be
/// written naturally. A missing file behaves like an empty store.
#[derive(Debug, Clone, Default)]
pub struct FileSessionStore {
    entries: HashMap<String, String>,
}

impl FileSessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "session file absent; using empty store");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SessionError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let object: serde_json::Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| SessionError::InvalidFile {
                path: path.to_path_buf(),
                source,
            })?;
        let entries = object
            .into_iter()
            .map(|(key, value)| {
                let raw = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, raw)
            })
            .collect();
        Ok(Self { entries })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::{
        CHILD_DATA_KEY, FileSessionStore, MemorySessionStore, SessionContext, SessionError,
    };
    use crate::route::Route;

    fn context() -> SessionContext {
        SessionContext {
            username: "mia".to_string(),
            therapist_code: "T-100".to_string(),
            session_id: "s-42".to_string(),
        }
    }

    #[test]
    fn load_reads_camel_case_child_data() {
        let mut store = MemorySessionStore::new();
        store.insert(
            CHILD_DATA_KEY,
            r#"{"username":"mia","therapistCode":"T-100","sessionId":"s-42"}"#,
        );
        assert_eq!(SessionContext::load(&store).expect("context"), context());
    }

    #[test]
    fn missing_context_redirects_to_login() {
        let error = SessionContext::load(&MemorySessionStore::new()).expect_err("missing");
        assert!(matches!(error, SessionError::Missing { key: "childData" }));
        assert_eq!(error.redirect(), Route::ChildLogin);
    }

    #[test]
    fn malformed_context_is_reported() {
        let mut store = MemorySessionStore::new();
        store.insert(CHILD_DATA_KEY, "{not json");
        let error = SessionContext::load(&store).expect_err("malformed");
        assert!(matches!(error, SessionError::Malformed { .. }));
        assert_eq!(error.redirect(), Route::ChildLogin);
    }

    #[test]
    fn preferred_game_prefers_per_user_key() {
        let mut store = MemorySessionStore::with_context(&context()).expect("store");
        store.insert("selectedGame", "typing");
        assert_eq!(
            context().preferred_game(&store).as_deref(),
            Some("typing")
        );
        store.insert("selectedGame_mia", "puzzles");
        assert_eq!(
            context().preferred_game(&store).as_deref(),
            Some("puzzles")
        );
    }

    #[test]
    fn file_store_accepts_nested_child_data_object() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"childData":{{"username":"mia","therapistCode":"T-100","sessionId":"s-42"}},"selectedGame":"tracing"}}"#
        )
        .expect("write");
        let store = FileSessionStore::open(file.path()).expect("open");
        assert_eq!(SessionContext::load(&store).expect("context"), context());
        assert_eq!(
            context().preferred_game(&store).as_deref(),
            Some("tracing")
        );
    }

    #[test]
    fn absent_file_is_an_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::open(dir.path().join("missing.json")).expect("open");
        assert!(matches!(
            SessionContext::load(&store),
            Err(SessionError::Missing { .. })
        ));
    }

    #[test]
    fn non_object_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "[1, 2, 3]").expect("write");
        assert!(matches!(
            FileSessionStore::open(file.path()),
            Err(SessionError::InvalidFile { .. })
        ));
    }
}
