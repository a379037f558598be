//! Typing drill behaviour against a scripted in-memory API.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tracepad_api::{
    ApiError, AutoAnalysis, CompletionApi, MarkCompletedRequest, SaveTypingResultsRequest,
    TypingApi, TypingResultsResponse, WordRequest,
};
use tracepad_core::{GameKind, MemorySessionStore, Route, SessionContext};
use tracepad_web::typing_drill::{RESULTS_NETWORK_MESSAGE, RESULTS_SAVED_MESSAGE};
use tracepad_web::{ControllerEffect, DrillMount, DrillSettings, FeedbackTone, WordDrill};

#[derive(Default)]
struct ScriptedTypingApi {
    words: RefCell<VecDeque<Result<String, ApiError>>>,
    word_requests: RefCell<Vec<WordRequest>>,
    saves: RefCell<Vec<SaveTypingResultsRequest>>,
    save_results: RefCell<VecDeque<Result<TypingResultsResponse, ApiError>>>,
    completions: RefCell<Vec<MarkCompletedRequest>>,
}

impl ScriptedTypingApi {
    fn with_words(words: &[&str]) -> Self {
        let api = Self::default();
        api.words
            .borrow_mut()
            .extend(words.iter().map(|w| Ok((*w).to_string())));
        api
    }

    fn next_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        self.word_requests.borrow_mut().push(request.clone());
        self.words
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::rejected(500, None)))
    }
}

impl CompletionApi for ScriptedTypingApi {
    fn mark_game_completed(&self, request: &MarkCompletedRequest) -> Result<(), ApiError> {
        self.completions.borrow_mut().push(request.clone());
        Ok(())
    }
}

impl TypingApi for ScriptedTypingApi {
    fn generate_initial_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        self.next_word(request)
    }

    fn generate_next_word(&self, request: &WordRequest) -> Result<String, ApiError> {
        self.next_word(request)
    }

    fn save_typing_results(
        &self,
        request: &SaveTypingResultsRequest,
    ) -> Result<TypingResultsResponse, ApiError> {
        self.saves.borrow_mut().push(request.clone());
        self.save_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(TypingResultsResponse::default()))
    }
}

fn session() -> SessionContext {
    SessionContext {
        username: "leo".into(),
        therapist_code: "T-7".into(),
        session_id: "s-9".into(),
    }
}

fn short_drill(total_words: usize) -> DrillSettings {
    DrillSettings {
        total_words,
        fallback_seed: Some(7),
        ..DrillSettings::default()
    }
}

fn ready(api: &ScriptedTypingApi, settings: DrillSettings) -> WordDrill {
    let store = MemorySessionStore::with_context(&session()).expect("store");
    match WordDrill::mount(&store, settings, api).expect("mount") {
        DrillMount::Ready(drill) => *drill,
        DrillMount::Redirect(route) => panic!("unexpected redirect to {route}"),
    }
}

#[test]
fn full_drill_saves_marks_complete_and_navigates() {
    let api = ScriptedTypingApi::with_words(&["cat", "kite"]);
    api.save_results
        .borrow_mut()
        .push_back(Ok(TypingResultsResponse {
            auto_analysis: Some(AutoAnalysis {
                problematic_letters: vec!["k".into()],
                confusion_patterns: vec![],
            }),
            error: None,
        }));
    let mut drill = ready(&api, short_drill(2));
    assert_eq!(drill.word(), Some("cat"));

    drill.set_input(" Cat ");
    let effects = drill.submit(&api);
    assert_eq!(
        effects,
        vec![ControllerEffect::ClearFeedback {
            after: Duration::from_millis(1_500)
        }]
    );
    assert_eq!(
        drill.feedback().map(|f| f.tone),
        Some(FeedbackTone::Success)
    );
    assert_eq!(drill.word(), Some("kite"));
    assert_eq!(drill.input(), "");
    assert_eq!(drill.progress().to_string(), "1/2");

    drill.set_input("kit");
    let effects = drill.submit(&api);
    assert_eq!(
        effects,
        vec![ControllerEffect::Navigate {
            route: Route::ChildDashboard,
            after: Duration::from_millis(2_000),
        }]
    );
    assert!(drill.is_finished());
    assert_eq!(
        drill.feedback().map(|f| f.text.as_str()),
        Some(RESULTS_SAVED_MESSAGE)
    );
    assert_eq!(
        drill.analysis().map(|a| a.problematic_letters.clone()),
        Some(vec!["k".to_string()])
    );

    let saves = api.saves.borrow();
    assert_eq!(saves.len(), 1);
    let answers: Vec<(String, bool)> = saves[0]
        .results
        .iter()
        .map(|r| (r.input.clone(), r.correct))
        .collect();
    assert_eq!(
        answers,
        vec![("Cat".to_string(), true), ("kit".to_string(), false)]
    );
    assert_eq!(api.completions.borrow()[0].game, GameKind::Typing);

    // Next-word request carried the history so far.
    let requests = api.word_requests.borrow();
    assert_eq!(requests[0].typing_history, None);
    assert_eq!(
        requests[1].typing_history.as_ref().map(Vec::len),
        Some(1)
    );
}

#[test]
fn wrong_answer_shows_the_word() {
    let api = ScriptedTypingApi::with_words(&["sun", "dog"]);
    let mut drill = ready(&api, short_drill(5));
    drill.set_input("son");
    drill.submit(&api);
    let feedback = drill.feedback().expect("feedback");
    assert_eq!(feedback.tone, FeedbackTone::Encouragement);
    assert_eq!(feedback.text, "💪 Keep trying! The word was: sun");
}

#[test]
fn blank_input_is_ignored() {
    let api = ScriptedTypingApi::with_words(&["sun"]);
    let mut drill = ready(&api, short_drill(5));
    drill.set_input("   ");
    assert!(drill.submit(&api).is_empty());
    assert_eq!(drill.progress().answered, 0);
    assert_eq!(drill.input_hint(), None);
}

#[test]
fn next_word_failure_falls_back_deterministically() {
    let run = || {
        let api = ScriptedTypingApi::with_words(&["cat"]);
        let mut drill = ready(&api, short_drill(5));
        drill.set_input("cat");
        drill.submit(&api);
        (drill.word().map(str::to_string), drill.error().map(str::to_string))
    };
    let (word, error) = run();
    let word = word.expect("fallback word");
    assert!(DrillSettings::default().fallback_words.contains(&word));
    assert_eq!(error.as_deref(), Some("Failed to generate word"));
    assert_eq!(run().0.as_deref(), Some(word.as_str()));
}

#[test]
fn initial_word_failure_leaves_drill_without_word() {
    let api = ScriptedTypingApi::default();
    api.words
        .borrow_mut()
        .push_back(Err(ApiError::transport("connection refused")));
    let mut drill = ready(&api, short_drill(5));
    assert_eq!(drill.word(), None);
    assert_eq!(drill.error(), Some("Network error"));
    drill.set_input("cat");
    assert!(drill.submit(&api).is_empty());
}

#[test]
fn failed_results_save_keeps_drill_open() {
    let api = ScriptedTypingApi::with_words(&["cat"]);
    api.save_results
        .borrow_mut()
        .push_back(Err(ApiError::transport("timed out")));
    let mut drill = ready(&api, short_drill(1));
    drill.set_input("cat");
    assert!(drill.submit(&api).is_empty());
    assert!(!drill.is_finished());
    let feedback = drill.feedback().expect("feedback");
    assert!(feedback.is_error());
    assert_eq!(feedback.text, RESULTS_NETWORK_MESSAGE);
    assert!(api.completions.borrow().is_empty());
}

#[test]
fn puzzles_preference_redirects_to_dashboard() {
    let api = ScriptedTypingApi::with_words(&["cat"]);
    let mut store = MemorySessionStore::with_context(&session()).expect("store");
    store.insert("selectedGame_leo", "puzzles");
    match WordDrill::mount(&store, DrillSettings::default(), &api).expect("mount") {
        DrillMount::Redirect(route) => assert_eq!(route, Route::ChildDashboard),
        DrillMount::Ready(_) => panic!("expected redirect"),
    }
    assert!(api.word_requests.borrow().is_empty());
}

#[test]
fn exit_saves_partial_results_once() {
    let api = ScriptedTypingApi::with_words(&["cat", "dog"]);
    let mut drill = ready(&api, short_drill(5));
    drill.set_input("cat");
    drill.submit(&api);

    assert_eq!(
        drill.exit(&api),
        Some(ControllerEffect::navigate_now(Route::ChildDashboard))
    );
    assert_eq!(drill.exit(&api), None);
    assert_eq!(api.saves.borrow().len(), 1);
}

#[test]
fn exit_without_answers_skips_save() {
    let api = ScriptedTypingApi::with_words(&["cat"]);
    let mut drill = ready(&api, short_drill(5));
    assert!(drill.exit(&api).is_some());
    assert!(api.saves.borrow().is_empty());
}

#[test]
fn recent_results_are_newest_first() {
    let api = ScriptedTypingApi::with_words(&["a", "b", "c", "d"]);
    let mut drill = ready(&api, short_drill(10));
    for input in ["a", "x", "c"] {
        drill.set_input(input);
        drill.submit(&api);
    }
    let recent: Vec<&str> = drill.recent_results(2).map(|r| r.word.as_str()).collect();
    assert_eq!(recent, vec!["c", "b"]);
}
