//! Property tests for the ink heuristic over rendered surfaces.
//!
//! 1. **Pristine is zero**: a freshly drawn reference glyph never contains a
//!    dark pixel, at any surface size.
//! 2. **Ink is monotone**: adding strokes never lowers the dark-pixel count.
//! 3. **Export is faithful**: the PNG carries exactly the sampled pixels, so
//!    the count measured before export is the count a reader of the PNG sees.

use proptest::prelude::*;
use tracepad_render::{
    GlyphStyle, InkSample, InkThreshold, Point, Rgba, StrokePath, StrokeStyle, Surface,
    count_dark_pixels, draw_reference_glyph, encode_png,
};

fn glyph_surface(side: u32, symbol: char) -> Surface {
    let mut surface = Surface::square(side, Rgba::WHITE).expect("surface");
    assert!(draw_reference_glyph(&mut surface, symbol, &GlyphStyle::default()));
    surface
}

fn symbol_strategy() -> impl Strategy<Value = char> {
    (b'A'..=b'Z').prop_map(char::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn pristine_glyph_has_zero_ink(side in 16u32..520, symbol in symbol_strategy()) {
        let surface = glyph_surface(side, symbol);
        let sample = InkSample::measure(&surface, InkThreshold::default());
        prop_assert_eq!(sample.dark_pixels, 0);
        prop_assert!(!sample.is_trace_attempt());
    }

    #[test]
    fn strokes_never_reduce_ink(
        points in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0), 2..20),
        width in 1.0f32..16.0,
    ) {
        let mut surface = glyph_surface(200, 'A');
        let style = StrokeStyle::new(Rgba::BLACK, width);
        let mut path = StrokePath::new();
        let mut last = 0;
        path.move_to(Point::from(points[0]));
        for &p in &points[1..] {
            path.line_to(&mut surface, Point::from(p), style);
            let now = count_dark_pixels(surface.data(), 100);
            prop_assert!(now >= last);
            last = now;
        }
    }
}

#[test]
fn heavy_scribble_counts_as_trace_and_survives_export() {
    let mut surface = glyph_surface(300, 'B');
    let style = StrokeStyle::new(Rgba::BLACK, 8.0);
    let mut path = StrokePath::new();
    path.move_to(Point::new(60.0, 60.0));
    for i in 0..8 {
        let y = 60.0 + i as f32 * 20.0;
        path.line_to(&mut surface, Point::new(240.0, y), style);
        path.line_to(&mut surface, Point::new(60.0, y + 10.0), style);
    }

    let sample = InkSample::measure(&surface, InkThreshold::default());
    assert!(sample.is_trace_attempt(), "only {} dark pixels", sample.dark_pixels);

    let png = encode_png(&surface).expect("encode");
    let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
    assert_eq!(
        count_dark_pixels(decoded.as_raw(), 100),
        sample.dark_pixels
    );
}
