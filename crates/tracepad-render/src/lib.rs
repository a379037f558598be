#![forbid(unsafe_code)]

//! Render kernel: RGBA surfaces, stroke rasterization, reference glyphs,
//! ink sampling, and PNG export.
//!
//! # Role in tracepad
//! `tracepad-render` is the pixel layer. It owns the [`Surface`] buffer the
//! tracing controller draws into and everything that reads or writes it.
//!
//! # Primary responsibilities
//! - **Surface**: square or rectangular RGBA8 buffer with bounds-checked access.
//! - **Rasterization**: round-capped thick segments ([`StrokePath`]) and a
//!   distance field for glyph bodies and outlines.
//! - **Glyphs**: a built-in single-line stroke font for `A`–`Z`, drawn as a
//!   light body plus a darker outline.
//! - **Ink sampling**: a pure scan counting pixels darker than a cutoff.
//! - **Export**: PNG bytes and `data:` URLs.
//!
//! Everything here is deterministic: no anti-aliasing, no font lookup, no
//! platform dependencies. The same inputs paint the same pixels on every
//! target, which is what the ink heuristic relies on.

pub mod color;
pub mod encode;
pub mod geometry;
pub mod glyph;
pub mod ink;
pub mod raster;
pub mod surface;

pub use color::Rgba;
pub use encode::{EncodeError, PNG_DATA_URL_PREFIX, encode_png, png_data_url};
pub use geometry::Point;
pub use glyph::{GlyphStyle, draw_reference_glyph, supports_symbol};
pub use ink::{InkSample, InkThreshold, count_dark_pixels};
pub use raster::{StrokePath, StrokeStyle};
pub use surface::Surface;
