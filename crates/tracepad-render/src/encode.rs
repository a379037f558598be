#![forbid(unsafe_code)]

//! PNG export.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::surface::Surface;

/// Prefix of every URL produced by [`png_data_url`].
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// PNG encoding failed.
#[derive(Debug)]
pub struct EncodeError {
    width: u32,
    height: u32,
    source: image::ImageError,
}

impl EncodeError {
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to encode {}x{} surface as PNG: {}",
            self.width, self.height, self.source
        )
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Encode the surface as an 8-bit RGBA PNG.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            surface.data(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|source| EncodeError {
            width: surface.width(),
            height: surface.height(),
            source,
        })?;
    tracing::debug!(
        width = surface.width(),
        height = surface.height(),
        bytes = bytes.len(),
        "surface encoded as png"
    );
    Ok(bytes)
}

/// Encode the surface as a `data:image/png;base64,...` URL.
pub fn png_data_url(surface: &Surface) -> Result<String, EncodeError> {
    let png = encode_png(surface)?;
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len().div_ceil(3) * 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(&png, &mut url);
    Ok(url)
}
