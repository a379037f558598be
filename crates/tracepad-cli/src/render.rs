use std::path::PathBuf;

use clap::Args;
use tracepad_render::{Surface, draw_reference_glyph, encode_png, supports_symbol};
use tracepad_web::TracepadConfig;

use crate::cli::parse_viewport;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[arg(long, default_value_t = 'A')]
    pub letter: char,

    /// Viewport the surface is sized for, as `WIDTHxHEIGHT`.
    #[arg(long, default_value = "1280x800")]
    pub viewport: String,

    #[arg(long)]
    pub out: PathBuf,
}

/// Paint the reference glyph for `args.letter` and write it as PNG.
/// Returns the side of the written image.
pub fn run_render(config: &TracepadConfig, args: RenderArgs) -> Result<u32> {
    let letter = args.letter.to_ascii_uppercase();
    if !supports_symbol(letter) {
        return Err(CliError::invalid(format!(
            "no reference glyph for `{}`",
            args.letter
        )));
    }
    let viewport = parse_viewport(&args.viewport)?;
    let settings = config.tracing_settings()?;
    let side = settings.surface.side(viewport);
    let mut surface = Surface::square(side, settings.background).ok_or_else(|| {
        CliError::invalid(format!("viewport `{}` leaves no room to draw", args.viewport))
    })?;
    draw_reference_glyph(&mut surface, letter, &settings.glyph);
    let png = encode_png(&surface)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, png)?;
    tracing::info!(%letter, side, out = %args.out.display(), "reference glyph written");
    Ok(side)
}
