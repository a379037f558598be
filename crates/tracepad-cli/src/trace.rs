use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracepad_api::{
    ApiError, CompletionApi, HttpGameApi, MarkCompletedRequest, SaveTracingRequest, TracingApi,
};
use tracepad_core::{FileSessionStore, Route};
use tracepad_render::PNG_DATA_URL_PREFIX;
use tracepad_web::{
    ControllerEffect, DisplayRect, PointerButton, PointerInput, Progress, TracepadConfig,
    TracingController,
};

use crate::cli::parse_viewport;
use crate::error::{CliError, Result};

const SCRIPT_POINTER_ID: u32 = 1;

#[derive(Debug, Clone, Args)]
pub struct TraceArgs {
    /// JSON stroke script; see [`TraceScript`].
    #[arg(long)]
    pub script: PathBuf,

    /// JSON object holding `childData` (and optionally `selectedGame`).
    #[arg(long)]
    pub session: PathBuf,

    #[arg(long, default_value = "1280x800")]
    pub viewport: String,

    /// Do not contact the backend; accept every save locally.
    #[arg(long)]
    pub dry_run: bool,

    /// With `--dry-run`, write each submitted image here.
    #[arg(long, requires = "dry_run")]
    pub out_dir: Option<PathBuf>,
}

/// Strokes to replay, one entry per save attempt.
///
/// Points are fractions of the surface side, so a script replays the same
/// way at any viewport:
///
/// ```json
/// { "attempts": [ { "strokes": [[[0.2, 0.8], [0.5, 0.2], [0.8, 0.8]]] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceScript {
    pub attempts: Vec<ScriptAttempt>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptAttempt {
    #[serde(default)]
    pub strokes: Vec<Vec<[f32; 2]>>,
}

impl TraceScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Saved,
    /// The save never left the controller.
    NotSubmitted(String),
    /// The backend or the network failed; the letter stays.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub letter: char,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceReport {
    pub attempts: Vec<AttemptReport>,
    pub progress: Progress,
    /// Where the game asked to go once the round was over.
    pub navigate: Option<Route>,
}

impl TraceReport {
    #[must_use]
    pub fn completed(&self) -> bool {
        self.navigate.is_some()
    }
}

impl fmt::Display for TraceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, attempt) in self.attempts.iter().enumerate() {
            let outcome = match &attempt.outcome {
                AttemptOutcome::Saved => "saved".to_owned(),
                AttemptOutcome::NotSubmitted(reason) => format!("not submitted: {reason}"),
                AttemptOutcome::Failed(reason) => format!("failed: {reason}"),
            };
            writeln!(f, "#{:02} {} {outcome}", index + 1, attempt.letter)?;
        }
        write!(f, "traced {}", self.progress)?;
        if let Some(route) = self.navigate {
            write!(f, " -> {route}")?;
        }
        Ok(())
    }
}

pub fn run_trace(config: &TracepadConfig, args: TraceArgs) -> Result<TraceReport> {
    let script = TraceScript::from_file(&args.script)?;
    let viewport = parse_viewport(&args.viewport)?;
    let store = FileSessionStore::open(&args.session)?;
    let mut controller = TracingController::mount(&store, viewport, config.tracing_settings()?)?;

    let report = if args.dry_run {
        let api = DryRunApi::new(args.out_dir);
        replay(&mut controller, &script, &api)
    } else {
        let api = HttpGameApi::new(&config.to_client_options())?;
        replay(&mut controller, &script, &api)
    };
    Ok(report)
}

/// Feed every scripted attempt through the pointer path and save it.
/// Stops early once the round is over.
pub fn replay(
    controller: &mut TracingController,
    script: &TraceScript,
    api: &dyn TracingApi,
) -> TraceReport {
    let mut attempts = Vec::with_capacity(script.attempts.len());
    let mut navigate = None;

    for attempt in &script.attempts {
        if navigate.is_some() {
            tracing::info!(
                skipped = script.attempts.len() - attempts.len(),
                "round completed; remaining attempts skipped"
            );
            break;
        }
        let letter = controller.current_symbol();
        for stroke in &attempt.strokes {
            draw_stroke(controller, stroke);
        }

        let ticket = match controller.begin_save() {
            Ok(ticket) => ticket,
            Err(rejection) => {
                tracing::info!(%letter, %rejection, "attempt not submitted");
                attempts.push(AttemptReport {
                    letter,
                    outcome: AttemptOutcome::NotSubmitted(rejection.to_string()),
                });
                continue;
            }
        };
        let result = api.save_tracing(&ticket.request);
        let effects = controller.complete_save(ticket.id, result);
        let outcome = match controller.feedback() {
            Some(feedback) if feedback.is_error() => AttemptOutcome::Failed(feedback.text.clone()),
            _ => AttemptOutcome::Saved,
        };
        attempts.push(AttemptReport { letter, outcome });

        for effect in effects {
            match effect {
                ControllerEffect::ClearFeedback { .. } => controller.clear_feedback(),
                ControllerEffect::ReportCompletion(request) => {
                    if let Err(err) = api.mark_game_completed(&request) {
                        tracing::warn!(error = %err, "mark completed failed");
                    }
                }
                ControllerEffect::Navigate { route, .. } => navigate = Some(route),
            }
        }
    }

    TraceReport {
        attempts,
        progress: controller.progress(),
        navigate,
    }
}

fn draw_stroke(controller: &mut TracingController, stroke: &[[f32; 2]]) {
    let side = controller.side();
    let rect = DisplayRect::unscaled(side);
    let side = side as f32;
    let Some(([fx, fy], rest)) = stroke.split_first() else {
        return;
    };
    controller.pointer_down(
        SCRIPT_POINTER_ID,
        PointerButton::Primary,
        &PointerInput::mouse(fx * side, fy * side),
        rect,
    );
    for [fx, fy] in rest {
        controller.pointer_move(
            SCRIPT_POINTER_ID,
            &PointerInput::mouse(fx * side, fy * side),
            rect,
        );
    }
    controller.pointer_up(SCRIPT_POINTER_ID, PointerButton::Primary);
}

/// Accepts every request locally, optionally writing the submitted PNGs.
#[derive(Debug, Default)]
pub struct DryRunApi {
    out_dir: Option<PathBuf>,
    saved: Cell<usize>,
    completions: Cell<usize>,
}

impl DryRunApi {
    #[must_use]
    pub fn new(out_dir: Option<PathBuf>) -> Self {
        Self {
            out_dir,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.get()
    }

    #[must_use]
    pub fn completions(&self) -> usize {
        self.completions.get()
    }

    fn write_image(&self, dir: &Path, request: &SaveTracingRequest) -> Result<PathBuf> {
        let encoded = request
            .image_data
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| CliError::invalid("image is not a PNG data URL"))?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|err| CliError::invalid(format!("image is not valid base64: {err}")))?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "{:02}-{}.png",
            self.saved.get() + 1,
            request.letter
        ));
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl CompletionApi for DryRunApi {
    fn mark_game_completed(
        &self,
        request: &MarkCompletedRequest,
    ) -> std::result::Result<(), ApiError> {
        self.completions.set(self.completions.get() + 1);
        tracing::info!(username = %request.username, game = request.game.as_str(), "dry run: game completed");
        Ok(())
    }
}

impl TracingApi for DryRunApi {
    fn save_tracing(&self, request: &SaveTracingRequest) -> std::result::Result<(), ApiError> {
        if let Some(dir) = &self.out_dir {
            let path = self
                .write_image(dir, request)
                .map_err(|err| ApiError::transport(err.to_string()))?;
            tracing::info!(letter = %request.letter, path = %path.display(), "dry run: image written");
        } else {
            tracing::info!(letter = %request.letter, bytes = request.image_data.len(), "dry run: save accepted");
        }
        self.saved.set(self.saved.get() + 1);
        Ok(())
    }
}
