#![forbid(unsafe_code)]

//! Viewport sizing and client-to-surface coordinate mapping.
//!
//! The drawing surface is square. Its side is the smallest of a fraction of
//! the viewport width, a fraction of the viewport height, and an absolute
//! cap, truncated to whole pixels. The surface is displayed at that size, but
//! hosts may scale it with layout, so every pointer position is mapped
//! through the element's on-screen rectangle.

use serde::{Deserialize, Serialize};
use tracepad_render::Point;

/// Host window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Sizing rules for the surface and the brush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePolicy {
    pub width_fraction: f32,
    pub width_cap: f32,
    pub height_fraction: f32,
    pub height_cap: f32,
    /// No surface is ever larger than this, whatever the viewport.
    pub absolute_cap: u32,
    pub brush_min_width: u32,
    /// Brush width grows as `buffer_width / brush_divisor`.
    pub brush_divisor: u32,
}

impl Default for SurfacePolicy {
    fn default() -> Self {
        Self {
            width_fraction: 0.85,
            width_cap: 700.0,
            height_fraction: 0.5,
            height_cap: 600.0,
            absolute_cap: 500,
            brush_min_width: 8,
            brush_divisor: 50,
        }
    }
}

impl SurfacePolicy {
    /// Side length in whole pixels for `viewport`. Zero means there is no
    /// room for a surface.
    #[must_use]
    pub fn side(&self, viewport: Viewport) -> u32 {
        let by_width = (viewport.width * self.width_fraction).min(self.width_cap);
        let by_height = (viewport.height * self.height_fraction).min(self.height_cap);
        let side = by_width.min(by_height).min(self.absolute_cap as f32);
        if side >= 1.0 {
            (side.floor() as u32).min(self.absolute_cap)
        } else {
            0
        }
    }

    /// Brush width for a buffer `buffer_width` pixels wide.
    #[must_use]
    pub fn brush_width(&self, buffer_width: u32) -> f32 {
        self.brush_min_width
            .max(buffer_width / self.brush_divisor.max(1)) as f32
    }
}

/// Client-space position of a pointer or touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

impl ClientPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle of the displayed surface, as reported by the host's
/// layout (`getBoundingClientRect` in a browser).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle at the origin displaying a surface at its natural size.
    #[must_use]
    pub const fn unscaled(side: u32) -> Self {
        Self::new(0.0, 0.0, side as f32, side as f32)
    }
}

/// Raw pointer input: a mouse-like position or a touch list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerInput {
    Mouse { position: ClientPoint },
    Touch { touches: Vec<ClientPoint> },
}

impl PointerInput {
    #[must_use]
    pub const fn mouse(x: f32, y: f32) -> Self {
        Self::Mouse {
            position: ClientPoint::new(x, y),
        }
    }

    /// The position that drives drawing: the mouse, or the first touch.
    #[must_use]
    pub fn primary(&self) -> Option<ClientPoint> {
        match self {
            Self::Mouse { position } => Some(*position),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Map pointer input to buffer coordinates.
///
/// Scales each axis by `buffer_size / displayed_size`. Returns `None` for an
/// empty touch list or a rectangle with no area.
#[must_use]
pub fn to_surface_coordinates(
    input: &PointerInput,
    rect: DisplayRect,
    buffer_width: u32,
    buffer_height: u32,
) -> Option<Point> {
    let client = input.primary()?;
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let scale_x = buffer_width as f32 / rect.width;
    let scale_y = buffer_height as f32 / rect.height;
    Some(Point::new(
        (client.x - rect.left) * scale_x,
        (client.y - rect.top) * scale_y,
    ))
}
