//! JPEG encoding of the cropped bitmap.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

/// Errors that can occur while encoding the cropped bitmap.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// Pixel buffer length does not match `width * height * 3`
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The JPEG encoder itself failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode row-major RGB8 pixels as a baseline JPEG.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality on the 1-100 scale; values outside it are clamped
///
/// # Errors
///
/// Returns an error if either dimension is zero, the buffer length is wrong,
/// or the encoder fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Convert a canvas-style quality factor (0.0 to 1.0) to the 1-100 scale.
///
/// Non-finite factors fall back to the default quality.
pub fn quality_from_factor(factor: f32) -> u8 {
    let factor = if factor.is_finite() {
        factor
    } else {
        crate::config::DEFAULT_JPEG_QUALITY
    };
    (factor.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}
