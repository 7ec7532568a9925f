use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::RgbImage;

use super::{encode_jpeg, quality_from_factor, EncodeError};

pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Encode `bitmap` as JPEG and wrap it in a `data:image/jpeg;base64,` URI.
///
/// `quality_factor` is on the canvas `toDataURL` scale (0.0 to 1.0).
///
/// # Errors
///
/// Returns an error if the bitmap is empty or JPEG encoding fails.
pub fn encode_data_uri(bitmap: &RgbImage, quality_factor: f32) -> Result<String, EncodeError> {
    let (width, height) = bitmap.dimensions();
    let jpeg = encode_jpeg(
        bitmap.as_raw(),
        width,
        height,
        quality_from_factor(quality_factor),
    )?;
    Ok(format!("{JPEG_DATA_URI_PREFIX}{}", BASE64.encode(jpeg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trips_through_decoder() {
        let bitmap = RgbImage::from_pixel(12, 9, image::Rgb([10, 200, 30]));
        let uri = encode_data_uri(&bitmap, 0.85).unwrap();

        let payload = uri.strip_prefix(JPEG_DATA_URI_PREFIX).unwrap();
        let bytes = BASE64.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 9));
    }

    #[test]
    fn test_empty_bitmap_is_rejected() {
        let bitmap = RgbImage::new(0, 0);
        assert!(matches!(
            encode_data_uri(&bitmap, 0.85),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
