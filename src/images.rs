//! Helpers for turning base64 image payloads into decoded raster images.
//!
//! Payloads are accepted either as bare base64 text or as a `data:` URL.  Decoding is delegated to
//! the [`image`] crate; the result is always converted to RGB8 because neither rendering engine
//! places images with an alpha channel.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, GenericImageView};
use log::warn;

/// Resolution assumed for images that carry no usable density information.
pub const DEFAULT_IMAGE_DPI: f64 = 300.0;

const MM_PER_INCH: f64 = 25.4;

/// Errors produced while decoding an image payload.
#[derive(Debug)]
pub enum ImageError {
    /// The payload is not valid base64.
    Base64(base64::DecodeError),
    /// The decoded bytes are not an image format supported by the [`image`] crate.
    Decode(image::ImageError),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(err) => write!(f, "Image payload is not valid base64: {err}"),
            Self::Decode(err) => write!(f, "Failed to decode image from provided bytes: {err}"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

fn strip_data_url(payload: &str) -> &str {
    let payload = payload.trim();
    if payload.starts_with("data:") {
        if let Some(index) = payload.find(";base64,") {
            return &payload[index + ";base64,".len()..];
        }
    }
    payload
}

/// Decodes a base64 payload (optionally wrapped in a `data:` URL) into raw bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, ImageError> {
    STANDARD
        .decode(strip_data_url(payload))
        .map_err(ImageError::Base64)
}

/// Decodes a base64 payload into an RGB image.
pub fn decode_image(payload: &str) -> Result<DynamicImage, ImageError> {
    let bytes = decode_base64(payload)?;
    let image = image::load_from_memory(&bytes).map_err(ImageError::Decode)?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Decodes `payload` if it is non-empty.
///
/// Empty payloads mean "no image".  Payloads that fail to decode are reported through the `log`
/// facade and skipped so a bad image never prevents the rest of the page from rendering.
pub fn decode_optional(payload: &str, role: &str) -> Option<DynamicImage> {
    if payload.trim().is_empty() {
        return None;
    }

    match decode_image(payload) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("Skipping {role} image: {err}");
            None
        }
    }
}

/// Returns the printed size of `image` in millimetres at the given resolution.
pub fn natural_size_mm(image: &DynamicImage, dpi: f64) -> (f64, f64) {
    let (px_width, px_height) = image.dimensions();
    (
        MM_PER_INCH * px_width as f64 / dpi,
        MM_PER_INCH * px_height as f64 / dpi,
    )
}

/// Returns the uniform scale that fits `natural` into `bounds` while keeping the aspect ratio.
pub fn fit_scale(natural: (f64, f64), bounds: (f64, f64)) -> f64 {
    let (width, height) = natural;
    if width <= f64::EPSILON || height <= f64::EPSILON {
        return 1.0;
    }
    (bounds.0 / width).min(bounds.1 / height).max(0.0)
}

#[cfg(test)]
pub(crate) fn encode_test_png(width: u32, height: u32) -> String {
    use image::{ImageBuffer, ImageOutputFormat, Rgba};
    use std::io::Cursor;

    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 40) as u8, (y * 40) as u8, 120, 200])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode png");
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_payload_without_alpha() {
        let payload = encode_test_png(4, 2);
        let image = decode_image(&payload).expect("decode png");
        assert_eq!(image.dimensions(), (4, 2));
        assert!(!image.color().has_alpha());
    }

    #[test]
    fn accepts_data_url_payloads() {
        let payload = format!("data:image/png;base64,{}", encode_test_png(3, 3));
        assert!(decode_image(&payload).is_ok());
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_image("a base64 encoded png").unwrap_err();
        assert!(matches!(err, ImageError::Base64(_)));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let payload = STANDARD.encode(b"definitely not a png");
        let err = decode_image(&payload).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn optional_decode_skips_empty_and_broken_payloads() {
        assert!(decode_optional("", "screen").is_none());
        assert!(decode_optional("   ", "screen").is_none());
        assert!(decode_optional("%%%", "screen").is_none());
        assert!(decode_optional(&encode_test_png(2, 2), "screen").is_some());
    }

    #[test]
    fn fit_scale_preserves_aspect_ratio() {
        assert_eq!(fit_scale((100.0, 50.0), (50.0, 50.0)), 0.5);
        assert_eq!(fit_scale((10.0, 20.0), (40.0, 40.0)), 2.0);
        assert_eq!(fit_scale((0.0, 20.0), (40.0, 40.0)), 1.0);
    }

    #[test]
    fn natural_size_uses_dpi() {
        let image = decode_image(&encode_test_png(300, 150)).expect("decode png");
        let (width, height) = natural_size_mm(&image, DEFAULT_IMAGE_DPI);
        assert!((width - 25.4).abs() < 1e-9);
        assert!((height - 12.7).abs() < 1e-9);
    }
}
