#![forbid(unsafe_code)]

//! Request and response bodies. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use tracepad_core::{GameKind, SessionContext};

/// Body of the tracing image submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTracingRequest {
    pub therapist_code: String,
    pub username: String,
    pub session_id: String,
    pub letter: String,
    /// `data:image/png;base64,...`
    pub image_data: String,
}

impl SaveTracingRequest {
    #[must_use]
    pub fn new(session: &SessionContext, letter: char, image_data: String) -> Self {
        Self {
            therapist_code: session.therapist_code.clone(),
            username: session.username.clone(),
            session_id: session.session_id.clone(),
            letter: letter.to_string(),
            image_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCompletedRequest {
    pub therapist_code: String,
    pub username: String,
    pub game: GameKind,
}

impl MarkCompletedRequest {
    #[must_use]
    pub fn new(session: &SessionContext, game: GameKind) -> Self {
        Self {
            therapist_code: session.therapist_code.clone(),
            username: session.username.clone(),
            game,
        }
    }
}

/// One answered word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingRecord {
    pub word: String,
    pub input: String,
    pub correct: bool,
}

/// Body of both word generation endpoints. The initial request carries no
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRequest {
    pub session_id: String,
    pub username: String,
    pub therapist_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typing_history: Option<Vec<TypingRecord>>,
}

impl WordRequest {
    #[must_use]
    pub fn initial(session: &SessionContext) -> Self {
        Self {
            session_id: session.session_id.clone(),
            username: session.username.clone(),
            therapist_code: session.therapist_code.clone(),
            typing_history: None,
        }
    }

    #[must_use]
    pub fn next(session: &SessionContext, history: &[TypingRecord]) -> Self {
        Self {
            typing_history: Some(history.to_vec()),
            ..Self::initial(session)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTypingResultsRequest {
    pub therapist_code: String,
    pub username: String,
    pub session_id: String,
    pub results: Vec<TypingRecord>,
}

impl SaveTypingResultsRequest {
    #[must_use]
    pub fn new(session: &SessionContext, results: &[TypingRecord]) -> Self {
        Self {
            therapist_code: session.therapist_code.clone(),
            username: session.username.clone(),
            session_id: session.session_id.clone(),
            results: results.to_vec(),
        }
    }
}

/// Generic `{success, error?}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WordResponse {
    pub success: bool,
    pub word: Option<String>,
    pub error: Option<String>,
}

/// Letter pair the child tends to mix up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionPattern {
    pub confuses: String,
    pub with: String,
}

/// Backend analysis returned after saving typing results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoAnalysis {
    pub problematic_letters: Vec<String>,
    pub confusion_patterns: Vec<ConfusionPattern>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypingResultsResponse {
    pub auto_analysis: Option<AutoAnalysis>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracepad_core::{GameKind, SessionContext};

    use super::{
        MarkCompletedRequest, SaveTracingRequest, TypingRecord, TypingResultsResponse,
        WordRequest,
    };

    fn session() -> SessionContext {
        SessionContext {
            username: "mia".into(),
            therapist_code: "T-42".into(),
            session_id: "s-1".into(),
        }
    }

    #[test]
    fn tracing_request_uses_camel_case_fields() {
        let request = SaveTracingRequest::new(&session(), 'B', "data:image/png;base64,AA==".into());
        assert_eq!(
            serde_json::to_value(&request).expect("json"),
            json!({
                "therapistCode": "T-42",
                "username": "mia",
                "sessionId": "s-1",
                "letter": "B",
                "imageData": "data:image/png;base64,AA==",
            })
        );
    }

    #[test]
    fn mark_completed_carries_game_identifier() {
        let request = MarkCompletedRequest::new(&session(), GameKind::Typing);
        assert_eq!(
            serde_json::to_value(&request).expect("json"),
            json!({ "therapistCode": "T-42", "username": "mia", "game": "typing" })
        );
    }

    #[test]
    fn initial_word_request_omits_history() {
        let value = serde_json::to_value(WordRequest::initial(&session())).expect("json");
        assert!(value.get("typingHistory").is_none());

        let history = [TypingRecord {
            word: "cat".into(),
            input: "cta".into(),
            correct: false,
        }];
        let value = serde_json::to_value(WordRequest::next(&session(), &history)).expect("json");
        assert_eq!(
            value["typingHistory"],
            json!([{ "word": "cat", "input": "cta", "correct": false }])
        );
    }

    #[test]
    fn typing_results_response_tolerates_missing_fields() {
        let parsed: TypingResultsResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(parsed, TypingResultsResponse::default());

        let parsed: TypingResultsResponse = serde_json::from_value(json!({
            "autoAnalysis": {
                "problematicLetters": ["b", "d"],
                "confusionPatterns": [{ "confuses": "b", "with": "d" }]
            }
        }))
        .expect("parse");
        let analysis = parsed.auto_analysis.expect("analysis");
        assert_eq!(analysis.problematic_letters, vec!["b", "d"]);
        assert_eq!(analysis.confusion_patterns[0].with, "d");
    }
}
