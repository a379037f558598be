#![forbid(unsafe_code)]

//! Typing drill: type the shown word, get immediate feedback, repeat for a
//! fixed number of words, then save the results for analysis.
//!
//! Words come from the backend. When generating the next word fails the
//! drill keeps going with a word picked from a local fallback list, so a
//! flaky backend never strands the child mid-session.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracepad_api::{
    ApiError, AutoAnalysis, MarkCompletedRequest, SaveTypingResultsRequest, TypingApi,
    TypingRecord, WordRequest,
};
use tracepad_core::{GameKind, Route, SessionContext, SessionError, SessionStore};

use crate::feedback::{ControllerEffect, Feedback, FeedbackTone};

/// Preferred-game value that keeps the child out of this drill.
pub const PUZZLES_PREFERENCE: &str = "puzzles";

pub const WORD_FAILED_MESSAGE: &str = "Failed to generate word";
pub const WORD_NETWORK_MESSAGE: &str = "Network error";
pub const RESULTS_SAVED_MESSAGE: &str = "🎉 Typing game completed! Results saved.";
pub const RESULTS_FAILED_MESSAGE: &str = "Failed to save results";
pub const RESULTS_NETWORK_MESSAGE: &str = "Network error while saving results";
pub const CORRECT_MESSAGE: &str = "🎉 Excellent! Great job! 🎉";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillSettings {
    pub total_words: usize,
    pub fallback_words: Vec<String>,
    /// Seed for fallback picks; derived from the session id when `None`.
    pub fallback_seed: Option<u64>,
    pub feedback_duration: Duration,
    pub navigate_delay: Duration,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            total_words: 10,
            fallback_words: ["cat", "dog", "sun", "tree", "book"]
                .into_iter()
                .map(String::from)
                .collect(),
            fallback_seed: None,
            feedback_duration: Duration::from_millis(1_500),
            navigate_delay: Duration::from_millis(2_000),
        }
    }
}

/// Live hint shown under the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "left", rename_all = "camelCase")]
pub enum InputHint {
    Perfect,
    CheckSpelling,
    LettersLeft(usize),
}

impl fmt::Display for InputHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perfect => f.write_str("✓ Perfect! Click the button to submit!"),
            Self::CheckSpelling => f.write_str("Check your spelling!"),
            Self::LettersLeft(1) => f.write_str("Keep going! 1 letter left"),
            Self::LettersLeft(n) => write!(f, "Keep going! {n} letters left"),
        }
    }
}

/// Hint for `input` against `word`. `None` for blank input.
#[must_use]
pub fn input_hint(word: &str, input: &str) -> Option<InputHint> {
    let typed = input.trim();
    if typed.is_empty() {
        return None;
    }
    if typed.to_lowercase() == word.to_lowercase() {
        return Some(InputHint::Perfect);
    }
    let typed_len = typed.chars().count();
    let word_len = word.chars().count();
    if typed_len >= word_len {
        Some(InputHint::CheckSpelling)
    } else {
        Some(InputHint::LettersLeft(word_len - typed_len))
    }
}

/// Words answered against the drill length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrillProgress {
    pub answered: usize,
    pub total: usize,
}

impl DrillProgress {
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.answered as f64 / self.total as f64 * 100.0).min(100.0)
    }
}

impl fmt::Display for DrillProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.answered, self.total)
    }
}

/// Outcome of mounting the drill.
#[derive(Debug)]
pub enum DrillMount {
    Ready(Box<WordDrill>),
    /// The child should not be here; the host navigates away.
    Redirect(Route),
}

#[derive(Debug)]
pub struct WordDrill {
    session: SessionContext,
    settings: DrillSettings,
    word: Option<String>,
    input: String,
    results: Vec<TypingRecord>,
    error: Option<String>,
    feedback: Option<Feedback>,
    analysis: Option<AutoAnalysis>,
    finished: bool,
    exiting: bool,
    rng: SmallRng,
}

impl WordDrill {
    /// Read the session, honour the preferred game, and fetch the first word.
    pub fn mount(
        store: &dyn SessionStore,
        settings: DrillSettings,
        api: &dyn TypingApi,
    ) -> Result<DrillMount, SessionError> {
        let session = SessionContext::load(store).inspect_err(|err| {
            tracing::warn!(error = %err, redirect = %err.redirect(), "typing drill needs a session");
        })?;
        if session.preferred_game(store).as_deref() == Some(PUZZLES_PREFERENCE) {
            tracing::info!(username = %session.username, "puzzles preferred; leaving typing drill");
            return Ok(DrillMount::Redirect(Route::ChildDashboard));
        }
        let mut drill = Self::new(session, settings);
        drill.start(api);
        Ok(DrillMount::Ready(Box::new(drill)))
    }

    /// Drill with no word yet; call [`start`](Self::start) to fetch one.
    #[must_use]
    pub fn new(session: SessionContext, settings: DrillSettings) -> Self {
        let seed = settings.fallback_seed.unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            session.session_id.hash(&mut hasher);
            hasher.finish()
        });
        Self {
            session,
            settings,
            word: None,
            input: String::new(),
            results: Vec::new(),
            error: None,
            feedback: None,
            analysis: None,
            finished: false,
            exiting: false,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Request the first word. On failure the drill has no word and shows
    /// the error.
    pub fn start(&mut self, api: &dyn TypingApi) {
        self.error = None;
        match api.generate_initial_word(&WordRequest::initial(&self.session)) {
            Ok(word) => {
                tracing::debug!(%word, "initial word");
                self.word = Some(word);
            }
            Err(err) => {
                tracing::warn!(error = %err, "initial word generation failed");
                self.error = Some(word_error_message(&err));
            }
        }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    #[must_use]
    pub fn input_hint(&self) -> Option<InputHint> {
        input_hint(self.word.as_deref()?, &self.input)
    }

    /// Check the current input against the word.
    ///
    /// Ignored when there is no word or the input is blank. After the last
    /// word the results are saved; otherwise the next word is fetched.
    pub fn submit(&mut self, api: &dyn TypingApi) -> Vec<ControllerEffect> {
        if self.finished {
            return Vec::new();
        }
        let Some(word) = self.word.clone() else {
            return Vec::new();
        };
        let typed = self.input.trim().to_string();
        if typed.is_empty() {
            return Vec::new();
        }

        let correct = typed.to_lowercase() == word.to_lowercase();
        tracing::debug!(%word, input = %typed, correct, "word answered");
        self.results.push(TypingRecord {
            word: word.clone(),
            input: typed,
            correct,
        });
        self.input.clear();
        self.feedback = Some(if correct {
            Feedback::new(FeedbackTone::Success, CORRECT_MESSAGE)
        } else {
            Feedback::new(
                FeedbackTone::Encouragement,
                format!("💪 Keep trying! The word was: {word}"),
            )
        });

        if self.results.len() >= self.settings.total_words {
            return self.save_results(api);
        }
        self.next_word(api);
        vec![ControllerEffect::ClearFeedback {
            after: self.settings.feedback_duration,
        }]
    }

    fn next_word(&mut self, api: &dyn TypingApi) {
        self.error = None;
        match api.generate_next_word(&WordRequest::next(&self.session, &self.results)) {
            Ok(word) => self.word = Some(word),
            Err(err) => {
                self.error = Some(word_error_message(&err));
                self.word = self.fallback_word();
                tracing::warn!(error = %err, fallback = ?self.word, "next word generation failed");
            }
        }
    }

    fn fallback_word(&mut self) -> Option<String> {
        let words = &self.settings.fallback_words;
        if words.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..words.len());
        words.get(index).cloned()
    }

    fn save_results(&mut self, api: &dyn TypingApi) -> Vec<ControllerEffect> {
        let request = SaveTypingResultsRequest::new(&self.session, &self.results);
        match api.save_typing_results(&request) {
            Ok(response) => {
                self.finished = true;
                self.feedback = Some(Feedback::new(
                    FeedbackTone::Celebration,
                    RESULTS_SAVED_MESSAGE,
                ));
                if let Some(analysis) = &response.auto_analysis {
                    tracing::info!(
                        problematic = ?analysis.problematic_letters,
                        patterns = analysis.confusion_patterns.len(),
                        "typing analysis received"
                    );
                }
                self.analysis = response.auto_analysis;
                let completed = MarkCompletedRequest::new(&self.session, GameKind::Typing);
                if let Err(err) = api.mark_game_completed(&completed) {
                    tracing::warn!(error = %err, game = %GameKind::Typing.as_str(), "mark completed failed");
                }
                vec![ControllerEffect::Navigate {
                    route: Route::ChildDashboard,
                    after: self.settings.navigate_delay,
                }]
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving typing results failed");
                let text = if err.is_rejection() {
                    err.server_message().unwrap_or(RESULTS_FAILED_MESSAGE).to_string()
                } else {
                    RESULTS_NETWORK_MESSAGE.to_string()
                };
                self.feedback = Some(Feedback::error(text));
                Vec::new()
            }
        }
    }

    /// Leave the drill, saving partial results first. Errors are only
    /// logged. Returns `None` when an exit is already under way.
    pub fn exit(&mut self, api: &dyn TypingApi) -> Option<ControllerEffect> {
        if self.exiting {
            return None;
        }
        self.exiting = true;
        if !self.results.is_empty() && !self.finished {
            let request = SaveTypingResultsRequest::new(&self.session, &self.results);
            if let Err(err) = api.save_typing_results(&request) {
                tracing::warn!(error = %err, answered = self.results.len(), "saving on exit failed");
            }
        }
        Some(ControllerEffect::navigate_now(Route::ChildDashboard))
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    #[must_use]
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Word generation error, shown alongside the drill.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&AutoAnalysis> {
        self.analysis.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> &[TypingRecord] {
        &self.results
    }

    /// Up to `n` answers, newest first.
    pub fn recent_results(&self, n: usize) -> impl Iterator<Item = &TypingRecord> {
        self.results.iter().rev().take(n)
    }

    #[must_use]
    pub fn progress(&self) -> DrillProgress {
        DrillProgress {
            answered: self.results.len(),
            total: self.settings.total_words,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }
}

fn word_error_message(err: &ApiError) -> String {
    if err.is_rejection() {
        err.server_message().unwrap_or(WORD_FAILED_MESSAGE).to_string()
    } else {
        WORD_NETWORK_MESSAGE.to_string()
    }
}
