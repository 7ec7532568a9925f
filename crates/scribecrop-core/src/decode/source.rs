//! Decoding the crop source from file bytes.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode JPEG or PNG bytes into an oriented RGB image.
///
/// The EXIF orientation tag is applied so the result matches what a browser
/// lays out, which is the space the crop region is measured in.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let result = decode_inner(bytes);
    if let Err(err) = &result {
        tracing::warn!(len = bytes.len(), %err, "image decode failed");
    }
    result
}

fn decode_inner(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(|e| match e {
        image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    let orientation = get_orientation(bytes);
    let decoded = DecodedImage::from_rgb_image(apply_orientation(img, orientation).into_rgb8());
    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage);
    }

    tracing::debug!(
        width = decoded.width,
        height = decoded.height,
        ?orientation,
        "decoded crop source"
    );
    Ok(decoded)
}

/// Read the EXIF orientation tag. Anything unreadable counts as `Normal`.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{jpeg_with_orientation, png_bytes};
    use super::*;

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(8, 4)).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.pixels.len(), 8 * 4 * 3);
        assert_eq!(&img.pixels[..3], &[255, 0, 0]);
    }

    #[test]
    fn test_decode_jpeg_applies_orientation() {
        let bytes = jpeg_with_orientation(16, 8, 6);
        assert_eq!(get_orientation(&bytes), Orientation::Rotate90CW);

        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.dimensions(), (8, 16));
    }

    #[test]
    fn test_decode_jpeg_normal_orientation() {
        let img = decode_image(&jpeg_with_orientation(16, 8, 1)).unwrap();
        assert_eq!(img.dimensions(), (16, 8));
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&png_bytes(2, 2)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert_eq!(decode_image(&[]), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn test_decode_garbage() {
        assert_eq!(
            decode_image(&[0x00, 0x01, 0x02, 0x03]),
            Err(DecodeError::InvalidFormat)
        );
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = png_bytes(32, 32);
        let result = decode_image(&bytes[..40]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_apply_orientation_rotate180() {
        let img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let rotated = apply_orientation(DynamicImage::ImageRgb8(img), Orientation::Rotate180).into_rgb8();
        assert_eq!(rotated.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rotated.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_transpose() {
        // 2x1 [A B] mirrored across the diagonal becomes 1x2 [A; B]
        let img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let t = apply_orientation(DynamicImage::ImageRgb8(img), Orientation::Transpose).into_rgb8();
        assert_eq!(t.dimensions(), (1, 2));
        assert_eq!(t.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(t.get_pixel(0, 1).0, [0, 255, 0]);
    }
}
