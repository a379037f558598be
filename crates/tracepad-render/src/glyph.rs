#![forbid(unsafe_code)]

//! Built-in reference glyphs.
//!
//! Letters are stored as single-line skeletons in a unit box whose height is
//! the cap height (`y` grows downwards, `x` runs from `0` to the glyph's
//! advance). Rendering thickens the skeleton into a bold body, fills it with
//! a light colour, then draws a darker outline around the union of all
//! strokes. Nothing depends on system fonts, so every host paints identical
//! pixels.

use crate::color::Rgba;
use crate::geometry::Point;
use crate::raster::DistanceField;
use crate::surface::Surface;

/// Cap height as a fraction of the nominal font size.
const CAP_HEIGHT_EM: f32 = 0.72;
/// Body stroke thickness as a fraction of the nominal font size.
const BODY_WEIGHT_EM: f32 = 0.14;
/// Angular resolution for curved strokes, in degrees per segment.
const ARC_STEP_DEG: f32 = 10.0;

/// Colours and proportions for reference glyph rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    /// Light body colour.
    pub fill: Rgba,
    /// Outline colour; the tracing guide.
    pub outline: Rgba,
    /// Font size as a fraction of the surface side.
    pub font_ratio: f32,
    /// Minimum outline width in pixels.
    pub outline_min_width: u32,
    /// Outline width grows as `side / outline_divisor`.
    pub outline_divisor: u32,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            fill: Rgba::from_hex(0xE0E0E0),
            outline: Rgba::from_hex(0x888888),
            font_ratio: 0.6,
            outline_min_width: 2,
            outline_divisor: 200,
        }
    }
}

impl GlyphStyle {
    /// Nominal font size for a surface side, in whole pixels.
    #[must_use]
    pub fn font_size(&self, side: u32) -> f32 {
        (side as f32 * self.font_ratio).floor()
    }

    /// Outline width for a surface side, in whole pixels.
    #[must_use]
    pub fn outline_width(&self, side: u32) -> u32 {
        self.outline_min_width
            .max(side / self.outline_divisor.max(1))
    }
}

type Skeleton = Vec<Vec<(f32, f32)>>;

struct GlyphOutline {
    advance: f32,
    strokes: Skeleton,
}

fn arc(cx: f32, cy: f32, rx: f32, ry: f32, from_deg: f32, to_deg: f32) -> Vec<(f32, f32)> {
    let sweep = to_deg - from_deg;
    let steps = ((sweep.abs() / ARC_STEP_DEG).ceil() as usize).max(2);
    (0..=steps)
        .map(|i| {
            let theta = (from_deg + sweep * i as f32 / steps as f32).to_radians();
            (cx + rx * theta.cos(), cy + ry * theta.sin())
        })
        .collect()
}

fn join(parts: &[&[(f32, f32)]]) -> Vec<(f32, f32)> {
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

fn outline(symbol: char) -> Option<GlyphOutline> {
    let (advance, strokes): (f32, Skeleton) = match symbol {
        'A' => (
            0.8,
            vec![
                vec![(0.0, 1.0), (0.4, 0.0), (0.8, 1.0)],
                vec![(0.15, 0.62), (0.65, 0.62)],
            ],
        ),
        'B' => (
            0.65,
            vec![
                vec![(0.0, 0.0), (0.0, 1.0)],
                join(&[
                    &[(0.0, 0.0), (0.38, 0.0)],
                    &arc(0.38, 0.25, 0.24, 0.25, -90.0, 90.0),
                    &[(0.0, 0.5)],
                ]),
                join(&[
                    &[(0.0, 0.5), (0.4, 0.5)],
                    &arc(0.4, 0.75, 0.25, 0.25, -90.0, 90.0),
                    &[(0.0, 1.0)],
                ]),
            ],
        ),
        'C' => (0.84, vec![arc(0.42, 0.5, 0.42, 0.5, -45.0, -315.0)]),
        'D' => (
            0.7,
            vec![
                vec![(0.0, 0.0), (0.0, 1.0)],
                join(&[
                    &[(0.0, 0.0), (0.3, 0.0)],
                    &arc(0.3, 0.5, 0.4, 0.5, -90.0, 90.0),
                    &[(0.0, 1.0)],
                ]),
            ],
        ),
        'E' => (
            0.6,
            vec![
                vec![(0.6, 0.0), (0.0, 0.0), (0.0, 1.0), (0.6, 1.0)],
                vec![(0.0, 0.5), (0.5, 0.5)],
            ],
        ),
        'F' => (
            0.55,
            vec![
                vec![(0.55, 0.0), (0.0, 0.0), (0.0, 1.0)],
                vec![(0.0, 0.5), (0.45, 0.5)],
            ],
        ),
        'G' => (
            0.84,
            vec![join(&[
                &arc(0.42, 0.5, 0.42, 0.5, -45.0, -360.0),
                &[(0.45, 0.5)],
            ])],
        ),
        'H' => (
            0.7,
            vec![
                vec![(0.0, 0.0), (0.0, 1.0)],
                vec![(0.7, 0.0), (0.7, 1.0)],
                vec![(0.0, 0.5), (0.7, 0.5)],
            ],
        ),
        'I' => (
            0.3,
            vec![
                vec![(0.15, 0.0), (0.15, 1.0)],
                vec![(0.0, 0.0), (0.3, 0.0)],
                vec![(0.0, 1.0), (0.3, 1.0)],
            ],
        ),
        'J' => (
            0.55,
            vec![join(&[
                &[(0.55, 0.0), (0.55, 0.72)],
                &arc(0.3, 0.72, 0.25, 0.28, 0.0, 180.0),
            ])],
        ),
        'K' => (
            0.65,
            vec![
                vec![(0.0, 0.0), (0.0, 1.0)],
                vec![(0.65, 0.0), (0.0, 0.6)],
                vec![(0.2, 0.45), (0.65, 1.0)],
            ],
        ),
        'L' => (0.55, vec![vec![(0.0, 0.0), (0.0, 1.0), (0.55, 1.0)]]),
        'M' => (
            0.85,
            vec![vec![
                (0.0, 1.0),
                (0.0, 0.0),
                (0.425, 0.6),
                (0.85, 0.0),
                (0.85, 1.0),
            ]],
        ),
        'N' => (
            0.7,
            vec![vec![(0.0, 1.0), (0.0, 0.0), (0.7, 1.0), (0.7, 0.0)]],
        ),
        'O' => (0.85, vec![arc(0.425, 0.5, 0.425, 0.5, 0.0, 360.0)]),
        'P' => (
            0.62,
            vec![
                vec![(0.0, 0.0), (0.0, 1.0)],
                join(&[
                    &[(0.0, 0.0), (0.35, 0.0)],
                    &arc(0.35, 0.27, 0.27, 0.27, -90.0, 90.0),
                    &[(0.0, 0.54)],
                ]),
            ],
        ),
        'Q' => (
            0.85,
            vec![
                arc(0.425, 0.5, 0.425, 0.5, 0.0, 360.0),
                vec![(0.5, 0.7), (0.85, 1.0)],
            ],
        ),
        'R' => (
            0.65,
            vec![
                vec![(0.0, 0.0), (0.0, 1.0)],
                join(&[
                    &[(0.0, 0.0), (0.35, 0.0)],
                    &arc(0.35, 0.27, 0.27, 0.27, -90.0, 90.0),
                    &[(0.0, 0.54)],
                ]),
                vec![(0.3, 0.54), (0.65, 1.0)],
            ],
        ),
        'S' => (
            0.6,
            vec![join(&[
                &arc(0.3, 0.25, 0.28, 0.25, -20.0, -270.0),
                &arc(0.3, 0.75, 0.3, 0.25, -90.0, 160.0),
            ])],
        ),
        'T' => (
            0.7,
            vec![vec![(0.0, 0.0), (0.7, 0.0)], vec![(0.35, 0.0), (0.35, 1.0)]],
        ),
        'U' => (
            0.7,
            vec![join(&[
                &[(0.0, 0.0)],
                &arc(0.35, 0.65, 0.35, 0.35, 180.0, 0.0),
                &[(0.7, 0.0)],
            ])],
        ),
        'V' => (0.75, vec![vec![(0.0, 0.0), (0.375, 1.0), (0.75, 0.0)]]),
        'W' => (
            1.0,
            vec![vec![
                (0.0, 0.0),
                (0.25, 1.0),
                (0.5, 0.35),
                (0.75, 1.0),
                (1.0, 0.0),
            ]],
        ),
        'X' => (
            0.7,
            vec![vec![(0.0, 0.0), (0.7, 1.0)], vec![(0.7, 0.0), (0.0, 1.0)]],
        ),
        'Y' => (
            0.7,
            vec![
                vec![(0.0, 0.0), (0.35, 0.5), (0.7, 0.0)],
                vec![(0.35, 0.5), (0.35, 1.0)],
            ],
        ),
        'Z' => (
            0.65,
            vec![vec![(0.0, 0.0), (0.65, 0.0), (0.0, 1.0), (0.65, 1.0)]],
        ),
        _ => return None,
    };
    Some(GlyphOutline { advance, strokes })
}

/// Whether a reference glyph exists for `symbol`.
#[must_use]
pub fn supports_symbol(symbol: char) -> bool {
    symbol.is_ascii_uppercase()
}

/// Draw `symbol` centred on `surface`: light body first, outline on top.
///
/// Returns `false` (and leaves the surface untouched) when the symbol has no
/// glyph or the surface is too small to hold one.
pub fn draw_reference_glyph(surface: &mut Surface, symbol: char, style: &GlyphStyle) -> bool {
    let Some(glyph) = outline(symbol) else {
        tracing::warn!(?symbol, "no reference glyph for symbol");
        return false;
    };
    let side = surface.width().min(surface.height());
    let font_size = style.font_size(side);
    let outline_width = style.outline_width(side) as f32;
    let cap = font_size * CAP_HEIGHT_EM;
    let body_radius = font_size * BODY_WEIGHT_EM / 2.0;

    let origin_x = surface.width() as f32 / 2.0 - glyph.advance * cap / 2.0;
    let origin_y = surface.height() as f32 / 2.0 - cap / 2.0;
    let polylines: Vec<Vec<Point>> = glyph
        .strokes
        .iter()
        .map(|stroke| {
            stroke
                .iter()
                .map(|&(x, y)| Point::new(origin_x + x * cap, origin_y + y * cap))
                .collect()
        })
        .collect();

    let reach = body_radius + outline_width;
    let Some(field) = DistanceField::build(surface, &polylines, reach) else {
        return false;
    };
    field.paint_band(surface, 0.0, body_radius, style.fill);
    field.paint_band(
        surface,
        body_radius - outline_width / 2.0,
        body_radius + outline_width / 2.0,
        style.outline,
    );
    tracing::debug!(?symbol, side, font_size, outline_width, "reference glyph drawn");
    true
}
