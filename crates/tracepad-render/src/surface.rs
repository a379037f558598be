#![forbid(unsafe_code)]

//! RGBA8 raster buffer.
//!
//! Row-major, four bytes per pixel, no padding. This is the same layout as a
//! browser `ImageData`, so hosts can blit [`Surface::data`] directly.

use crate::color::Rgba;

/// Owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Create a surface filled with `background`.
    ///
    /// Returns `None` for a zero-area request; there is nothing to draw on.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgba) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        let mut surface = Self {
            width,
            height,
            data: vec![0; len],
        };
        surface.fill(background);
        Some(surface)
    }

    /// Square surface of `side` pixels.
    #[must_use]
    pub fn square(side: u32, background: Rgba) -> Option<Self> {
        Self::new(side, side, background)
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the surface and return its RGBA8 bytes.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        Some(Rgba::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrite one pixel. Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Composite `color` over one pixel. Out-of-bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if color.is_opaque() {
            self.set_pixel(x, y, color);
            return;
        }
        if let Some(dst) = self.pixel(x, y) {
            self.set_pixel(x, y, color.over(dst));
        }
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Iterate all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
    }

    /// Same-size copy of this surface composited over an opaque background.
    ///
    /// The result never contains transparency, whatever was drawn.
    #[must_use]
    pub fn flattened_onto(&self, background: Rgba) -> Self {
        let background = Rgba { a: 0xFF, ..background };
        let mut out = self.clone();
        for px in out.data.chunks_exact_mut(4) {
            let c = Rgba::new(px[0], px[1], px[2], px[3]).over(background);
            px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Surface;
    use crate::color::Rgba;

    #[test]
    fn zero_area_surface_is_unavailable() {
        assert!(Surface::new(0, 10, Rgba::WHITE).is_none());
        assert!(Surface::square(0, Rgba::WHITE).is_none());
    }

    #[test]
    fn new_surface_is_filled_with_background() {
        let surface = Surface::new(3, 2, Rgba::from_hex(0x102030)).expect("surface");
        assert_eq!(surface.data().len(), 3 * 2 * 4);
        assert!(surface.pixels().all(|p| p == Rgba::from_hex(0x102030)));
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut surface = Surface::square(2, Rgba::WHITE).expect("surface");
        surface.set_pixel(2, 0, Rgba::BLACK);
        surface.set_pixel(0, 5, Rgba::BLACK);
        assert_eq!(surface.pixel(2, 0), None);
        assert!(surface.pixels().all(|p| p == Rgba::WHITE));
    }

    #[test]
    fn flatten_removes_transparency() {
        let mut surface = Surface::square(2, Rgba::TRANSPARENT).expect("surface");
        surface.set_pixel(1, 1, Rgba::BLACK);
        let flat = surface.flattened_onto(Rgba::WHITE);
        assert_eq!(flat.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(flat.pixel(1, 1), Some(Rgba::BLACK));
        assert!(flat.pixels().all(Rgba::is_opaque));
    }

    #[test]
    fn blend_pixel_composites_translucent_colour() {
        let mut surface = Surface::square(1, Rgba::WHITE).expect("surface");
        surface.blend_pixel(0, 0, Rgba::new(0, 0, 0, 128));
        let px = surface.pixel(0, 0).expect("pixel");
        assert!(px.r < 0xFF && px.r > 0, "got {px:?}");
        assert!(px.is_opaque());
    }
}
