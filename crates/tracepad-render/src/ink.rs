#![forbid(unsafe_code)]

//! Ink heuristic.
//!
//! A trace attempt is judged by counting pixels whose red, green and blue
//! channels are all below a darkness cutoff. The reference glyph colours sit
//! well above the default cutoff, so a pristine surface always counts zero
//! and only user ink moves the number.

use crate::surface::Surface;

/// Parameters of the ink heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkThreshold {
    /// A pixel is dark when every colour channel is strictly below this.
    pub darkness_cutoff: u8,
    /// A trace counts when strictly more dark pixels than this are present.
    pub min_dark_pixels: usize,
}

impl Default for InkThreshold {
    fn default() -> Self {
        Self {
            darkness_cutoff: 100,
            min_dark_pixels: 500,
        }
    }
}

/// Count RGBA8 pixels whose red, green and blue are all below `cutoff`.
///
/// Alpha is ignored. Trailing bytes that do not form a whole pixel are
/// skipped.
#[must_use]
pub fn count_dark_pixels(rgba: &[u8], cutoff: u8) -> usize {
    rgba.chunks_exact(4)
        .filter(|px| px[0] < cutoff && px[1] < cutoff && px[2] < cutoff)
        .count()
}

/// Result of sampling a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkSample {
    pub dark_pixels: usize,
    pub threshold: InkThreshold,
}

impl InkSample {
    /// Scan the whole surface once.
    #[must_use]
    pub fn measure(surface: &Surface, threshold: InkThreshold) -> Self {
        let dark_pixels = count_dark_pixels(surface.data(), threshold.darkness_cutoff);
        tracing::trace!(dark_pixels, "ink sampled");
        Self {
            dark_pixels,
            threshold,
        }
    }

    /// Whether enough ink is present to treat the surface as traced.
    #[must_use]
    pub const fn is_trace_attempt(&self) -> bool {
        self.dark_pixels > self.threshold.min_dark_pixels
    }
}
