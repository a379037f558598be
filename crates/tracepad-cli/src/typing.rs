use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use tracepad_api::{AutoAnalysis, HttpGameApi, TypingApi};
use tracepad_core::{FileSessionStore, Route, SessionStore};
use tracepad_web::{
    ControllerEffect, DrillMount, DrillSettings, InputHint, TracepadConfig, WordDrill,
};

use crate::error::Result;

/// Typed on its own line, leaves the drill early.
pub const QUIT_COMMAND: &str = ":q";

#[derive(Debug, Clone, Args)]
pub struct TypingArgs {
    /// JSON object holding `childData` (and optionally `selectedGame`).
    #[arg(long)]
    pub session: PathBuf,
}

/// How a terminal drill ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingSummary {
    /// The child prefers another game.
    Redirected(Route),
    Finished { answered: usize, correct: usize },
    Exited { answered: usize },
}

pub fn run_typing(config: &TracepadConfig, args: TypingArgs) -> Result<()> {
    let store = FileSessionStore::open(&args.session)?;
    let api = HttpGameApi::new(&config.to_client_options())?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let summary = drive_typing(
        &store,
        config.drill_settings(),
        &api,
        stdin.lock(),
        stdout.lock(),
    )?;
    tracing::info!(?summary, "typing drill ended");
    Ok(())
}

/// Run one drill, reading answers line by line from `input`.
///
/// End of input or [`QUIT_COMMAND`] exits early, saving partial results.
pub fn drive_typing(
    store: &dyn SessionStore,
    settings: DrillSettings,
    api: &dyn TypingApi,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<TypingSummary> {
    let mut drill = match WordDrill::mount(store, settings, api)? {
        DrillMount::Ready(drill) => *drill,
        DrillMount::Redirect(route) => {
            writeln!(out, "Puzzles are selected for this child; going to {route}")?;
            return Ok(TypingSummary::Redirected(route));
        }
    };

    loop {
        if let Some(error) = drill.error() {
            writeln!(out, "! {error}")?;
        }
        let Some(word) = drill.word().map(str::to_owned) else {
            writeln!(out, "No word to practise.")?;
            return leave(&mut drill, api, &mut out);
        };
        writeln!(out, "[{}] Type this word: {word}", drill.progress())?;
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || line.trim() == QUIT_COMMAND {
            writeln!(out)?;
            return leave(&mut drill, api, &mut out);
        }
        drill.set_input(line.trim_end_matches(['\r', '\n']));
        if let Some(hint) = drill.input_hint().filter(|hint| *hint != InputHint::Perfect) {
            writeln!(out, "  {hint}")?;
        }

        let effects = drill.submit(api);
        if let Some(feedback) = drill.feedback() {
            writeln!(out, "{}", feedback.text)?;
        }
        for effect in effects {
            match effect {
                ControllerEffect::ClearFeedback { .. } => drill.clear_feedback(),
                ControllerEffect::ReportCompletion(_) => {}
                ControllerEffect::Navigate { route, .. } => {
                    if let Some(analysis) = drill.analysis() {
                        write_analysis(&mut out, analysis)?;
                    }
                    let results = drill.results();
                    let correct = results.iter().filter(|r| r.correct).count();
                    writeln!(out, "{correct}/{} correct. Back to {route}.", results.len())?;
                    return Ok(TypingSummary::Finished {
                        answered: results.len(),
                        correct,
                    });
                }
            }
        }
    }
}

fn leave(
    drill: &mut WordDrill,
    api: &dyn TypingApi,
    out: &mut impl Write,
) -> Result<TypingSummary> {
    let answered = drill.results().len();
    if let Some(ControllerEffect::Navigate { route, .. }) = drill.exit(api) {
        writeln!(out, "Leaving after {answered} word(s). Back to {route}.")?;
    }
    Ok(TypingSummary::Exited { answered })
}

fn write_analysis(out: &mut impl Write, analysis: &AutoAnalysis) -> std::io::Result<()> {
    if !analysis.problematic_letters.is_empty() {
        writeln!(
            out,
            "Letters to practise: {}",
            analysis.problematic_letters.join(", ")
        )?;
    }
    for pattern in &analysis.confusion_patterns {
        writeln!(out, "Mixes up {} with {}", pattern.confuses, pattern.with)?;
    }
    Ok(())
}
