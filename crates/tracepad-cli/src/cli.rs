use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracepad_web::{TracepadConfig, Viewport};

use crate::error::{CliError, Result};
use crate::logging::init_logging;
use crate::render::{RenderArgs, run_render};
use crate::trace::{TraceArgs, run_trace};
use crate::typing::{TypingArgs, run_typing};

#[derive(Debug, Parser)]
#[command(
    name = "tracepad",
    about = "Letter tracing and typing drills for the therapy game backend",
    version
)]
pub struct Cli {
    /// TOML or JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the reference glyph for a letter to PNG.
    Render(RenderArgs),

    /// Replay a stroke script through the tracing game.
    Trace(TraceArgs),

    /// Play the typing drill on the terminal.
    Typing(TypingArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging();
    let config = TracepadConfig::load(cli.config.as_deref())?;
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
    match cli.command {
        Commands::Render(args) => run_render(&config, args).map(|_| ()),
        Commands::Trace(args) => run_trace(&config, args).map(|report| {
            println!("{report}");
        }),
        Commands::Typing(args) => run_typing(&config, args),
    }
}

/// Parse a `WIDTHxHEIGHT` viewport, e.g. `1280x800`.
pub fn parse_viewport(raw: &str) -> Result<Viewport> {
    let invalid = || CliError::invalid(format!("viewport must look like 1280x800, got `{raw}`"));
    let (width, height) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: f32 = width.trim().parse().map_err(|_| invalid())?;
    let height: f32 = height.trim().parse().map_err(|_| invalid())?;
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }
    Ok(Viewport::new(width, height))
}
