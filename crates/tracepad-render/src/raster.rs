#![forbid(unsafe_code)]

//! Thick-segment rasterization.
//!
//! Coverage is binary: a pixel is painted when its centre lies within
//! `width / 2` of the segment. Painting a capsule for every segment gives
//! round caps and round joins for free, which is what freehand strokes need.

use crate::color::Rgba;
use crate::geometry::{Point, distance_to_segment};
use crate::surface::Surface;

/// Colour and width of a painted stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

impl StrokeStyle {
    #[must_use]
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

/// Inclusive pixel bounds touched by a capsule, clipped to the surface.
fn capsule_bounds(
    surface: &Surface,
    a: Point,
    b: Point,
    radius: f32,
) -> Option<(u32, u32, u32, u32)> {
    let min_x = (a.x.min(b.x) - radius).floor().max(0.0);
    let min_y = (a.y.min(b.y) - radius).floor().max(0.0);
    let max_x = (a.x.max(b.x) + radius).ceil().min(surface.width() as f32 - 1.0);
    let max_y = (a.y.max(b.y) + radius).ceil().min(surface.height() as f32 - 1.0);
    if !(min_x <= max_x && min_y <= max_y) {
        return None;
    }
    Some((min_x as u32, min_y as u32, max_x as u32, max_y as u32))
}

/// Paint the capsule around segment `a`–`b`. Returns the number of pixels
/// written.
pub fn fill_capsule(surface: &mut Surface, a: Point, b: Point, style: StrokeStyle) -> usize {
    let radius = style.width / 2.0;
    if !(radius > 0.0) {
        return 0;
    }
    let Some((x0, y0, x1, y1)) = capsule_bounds(surface, a, b, radius) else {
        return 0;
    };
    let mut painted = 0;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(centre, a, b) <= radius {
                surface.blend_pixel(x, y, style.color);
                painted += 1;
            }
        }
    }
    painted
}

/// Current-position pen over a surface, mirroring a 2D canvas path that is
/// stroked after every `line_to`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokePath {
    cursor: Option<Point>,
}

impl StrokePath {
    #[must_use]
    pub const fn new() -> Self {
        Self { cursor: None }
    }

    /// Start a new subpath at `point` without painting.
    pub fn move_to(&mut self, point: Point) {
        self.cursor = Some(point);
    }

    /// Paint from the current position to `point` and move there.
    ///
    /// Without a current position this only sets one, like a canvas path
    /// whose first command is `lineTo`.
    pub fn line_to(&mut self, surface: &mut Surface, point: Point, style: StrokeStyle) -> usize {
        let painted = match self.cursor {
            Some(from) => fill_capsule(surface, from, point, style),
            None => 0,
        };
        self.cursor = Some(point);
        painted
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Forget the current position.
    pub fn reset(&mut self) {
        self.cursor = None;
    }
}

/// Distance to the nearest of a set of polylines, sampled at pixel centres
/// over a clipped window of a surface.
///
/// Used for glyph bodies: filling `d <= r` paints the union of all strokes,
/// and painting the band `|d - r| <= w/2` outlines that union without the
/// interior seams that stroking each capsule separately would leave.
#[derive(Debug, Clone)]
pub struct DistanceField {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    dist: Vec<f32>,
}

impl DistanceField {
    /// Build a field for `polylines`, covering every pixel within `reach` of
    /// any segment. Returns `None` when nothing lands on the surface.
    #[must_use]
    pub fn build(surface: &Surface, polylines: &[Vec<Point>], reach: f32) -> Option<Self> {
        let points = polylines.iter().flatten();
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let (x0, y0, x1, y1) = capsule_bounds(
            surface,
            Point::new(min_x, min_y),
            Point::new(max_x, max_y),
            reach,
        )?;
        let width = x1 - x0 + 1;
        let height = y1 - y0 + 1;
        let mut dist = vec![f32::INFINITY; width as usize * height as usize];

        for line in polylines {
            let segments: Vec<(Point, Point)> = match line.as_slice() {
                [] => continue,
                [only] => vec![(*only, *only)],
                many => many.windows(2).map(|w| (w[0], w[1])).collect(),
            };
            for (a, b) in segments {
                let Some((sx0, sy0, sx1, sy1)) = capsule_bounds(surface, a, b, reach) else {
                    continue;
                };
                for y in sy0.max(y0)..=sy1.min(y1) {
                    let row = (y - y0) as usize * width as usize;
                    for x in sx0.max(x0)..=sx1.min(x1) {
                        let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                        let d = distance_to_segment(centre, a, b);
                        let slot = &mut dist[row + (x - x0) as usize];
                        if d < *slot {
                            *slot = d;
                        }
                    }
                }
            }
        }

        Some(Self {
            x0,
            y0,
            width,
            height,
            dist,
        })
    }

    /// Paint every pixel whose distance lies in `lo..=hi`. Returns the number
    /// of pixels written.
    pub fn paint_band(&self, surface: &mut Surface, lo: f32, hi: f32, color: Rgba) -> usize {
        let mut painted = 0;
        for row in 0..self.height {
            for col in 0..self.width {
                let d = self.dist[(row * self.width + col) as usize];
                if d >= lo && d <= hi {
                    surface.blend_pixel(self.x0 + col, self.y0 + row, color);
                    painted += 1;
                }
            }
        }
        painted
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{DistanceField, StrokePath, StrokeStyle, fill_capsule};
    use crate::color::Rgba;
    use crate::geometry::Point;
    use crate::surface::Surface;

    fn blank(side: u32) -> Surface {
        Surface::square(side, Rgba::WHITE).expect("surface")
    }

    fn black_count(surface: &Surface) -> usize {
        surface.pixels().filter(|p| *p == Rgba::BLACK).count()
    }

    #[test]
    fn horizontal_capsule_covers_expected_band() {
        let mut surface = blank(40);
        let style = StrokeStyle::new(Rgba::BLACK, 4.0);
        let painted = fill_capsule(
            &mut surface,
            Point::new(10.0, 20.0),
            Point::new(30.0, 20.0),
            style,
        );
        assert_eq!(painted, black_count(&surface));
        // 20px long body, 4 rows thick, plus two rounded caps.
        assert!((80..=110).contains(&painted), "painted {painted}");
        assert_eq!(surface.pixel(20, 19), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(20, 23), Some(Rgba::WHITE));
    }

    #[test]
    fn capsule_outside_surface_paints_nothing() {
        let mut surface = blank(10);
        let style = StrokeStyle::new(Rgba::BLACK, 4.0);
        let painted = fill_capsule(
            &mut surface,
            Point::new(-50.0, -50.0),
            Point::new(-40.0, -45.0),
            style,
        );
        assert_eq!(painted, 0);
        assert_eq!(black_count(&surface), 0);
    }

    #[test]
    fn zero_width_paints_nothing() {
        let mut surface = blank(10);
        let style = StrokeStyle::new(Rgba::BLACK, 0.0);
        assert_eq!(
            fill_capsule(&mut surface, Point::new(1.0, 1.0), Point::new(8.0, 8.0), style),
            0
        );
    }

    #[test]
    fn path_needs_a_current_point_before_painting() {
        let mut surface = blank(20);
        let style = StrokeStyle::new(Rgba::BLACK, 3.0);
        let mut path = StrokePath::new();
        assert_eq!(path.line_to(&mut surface, Point::new(5.0, 5.0), style), 0);
        assert!(path.line_to(&mut surface, Point::new(15.0, 5.0), style) > 0);
        assert_eq!(path.cursor(), Some(Point::new(15.0, 5.0)));
    }

    #[test]
    fn move_to_starts_independent_subpath() {
        let mut surface = blank(30);
        let style = StrokeStyle::new(Rgba::BLACK, 2.0);
        let mut path = StrokePath::new();
        path.move_to(Point::new(2.0, 2.0));
        path.line_to(&mut surface, Point::new(10.0, 2.0), style);
        path.move_to(Point::new(2.0, 20.0));
        path.line_to(&mut surface, Point::new(10.0, 20.0), style);
        // Nothing painted between the two subpaths.
        assert_eq!(surface.pixel(6, 11), Some(Rgba::WHITE));
    }

    #[test]
    fn distance_field_band_outlines_union() {
        let mut surface = blank(60);
        let lines = vec![
            vec![Point::new(10.0, 30.0), Point::new(50.0, 30.0)],
            vec![Point::new(30.0, 10.0), Point::new(30.0, 50.0)],
        ];
        let field = DistanceField::build(&surface, &lines, 8.0).expect("field");
        field.paint_band(&mut surface, 4.0, 5.0, Rgba::BLACK);
        // The crossing point is inside both bodies, so no seam is drawn there.
        assert_eq!(surface.pixel(30, 30), Some(Rgba::WHITE));
        assert!(black_count(&surface) > 0);
    }

    proptest! {
        #[test]
        fn longer_strokes_never_paint_fewer_pixels(len in 1.0f32..80.0, width in 1.0f32..16.0) {
            let style = StrokeStyle::new(Rgba::BLACK, width);
            let mut short = blank(120);
            let mut long = blank(120);
            fill_capsule(&mut short, Point::new(20.0, 60.0), Point::new(20.0 + len / 2.0, 60.0), style);
            fill_capsule(&mut long, Point::new(20.0, 60.0), Point::new(20.0 + len, 60.0), style);
            prop_assert!(black_count(&long) >= black_count(&short));
        }
    }
}
