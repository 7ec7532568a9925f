//! Extraction of the committed crop region from the full-resolution source.
//!
//! # Pipeline
//!
//! 1. Project the region corners from display space to natural pixels
//! 2. Take the axis-aligned bounding box of the projected corners
//! 3. Cap the output so its larger edge is at most `max_dimension`
//! 4. Sample the part of the box that lies on the image into the matching
//!    part of the output (bilinear); any part off the image stays empty
//! 5. For quads, clear every pixel outside the quad
//!
//! Quads are not rectified. The output is the bounding box with the area
//! outside the quad left transparent, which JPEG encoding flattens to black.

mod clip;
mod fit;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CropperConfig;
use crate::decode::DecodedImage;
use crate::encode::{encode_data_uri, EncodeError};
use crate::geometry::{CropRegion, GeometryError, ImageDimensions, Point};
use crate::projection::Projection;

pub use clip::clip_to_polygon;
pub use fit::calculate_fit_dimensions;

/// Reasons an export produced no output.
#[derive(Debug, Error, PartialEq)]
pub enum ExportError {
    /// No decoded source image is loaded.
    #[error("No source image to export from")]
    MissingSource,

    /// No crop region has been committed yet.
    #[error("No crop region to export")]
    MissingRegion,

    /// The region covers no pixels of the source.
    #[error("Crop region is empty: {width}x{height}")]
    EmptyRegion { width: f64, height: f64 },

    /// The source pixel buffer does not match its stated size.
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The display measurement cannot carry a region.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The cropped bitmap could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Axis-aligned block of whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The region's bounding box in natural pixels plus the final output size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    /// Left edge of the bounding box in natural pixels; may be off the image.
    pub x: f64,
    /// Top edge of the bounding box in natural pixels; may be off the image.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Source pixels sampled: the on-image part of the box, snapped outward
    /// to whole pixels and clamped to the image.
    pub source: PixelRect,
    /// Output pixels the sampled source is drawn into. The whole output when
    /// the box lies on the image.
    pub target: PixelRect,
    pub output_width: u32,
    pub output_height: u32,
}

impl CropBox {
    /// Map a natural-space point into output pixel coordinates.
    pub fn to_output(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.x) * self.output_width as f64 / self.width,
            (p.y - self.y) * self.output_height as f64 / self.height,
        )
    }

    /// Whether the output is smaller than the box it was taken from.
    pub fn is_downscaled(&self) -> bool {
        self.output_width < self.width.round() as u32
            || self.output_height < self.height.round() as u32
    }

    /// Whether part of the box hangs off the image.
    pub fn is_partial(&self) -> bool {
        self.target.width < self.output_width || self.target.height < self.output_height
    }
}

/// Output span `[start, end)` covered by the on-image part `[lo, hi]` of a
/// box axis starting at `origin` with length `extent`.
fn target_span(lo: f64, hi: f64, origin: f64, extent: f64, output: u32) -> (u32, u32) {
    let to_out = |v: f64| {
        ((v - origin) * output as f64 / extent)
            .round()
            .clamp(0.0, output as f64) as u32
    };
    let start = to_out(lo).min(output - 1);
    let end = to_out(hi).max(start + 1);
    (start, end - start)
}

/// Compute the natural-space crop box of `region`.
///
/// # Arguments
///
/// * `region` - Selection in display coordinates
/// * `dims` - Display size the region lives in and the natural image size
/// * `max_dimension` - Cap on the larger output edge
///
/// # Returns
///
/// The float bounding box, the whole-pixel source rectangle to sample, the
/// part of the output that sample fills and the final output size.
///
/// # Errors
///
/// Returns [`ExportError::EmptyRegion`] if the box has no area or does not
/// overlap the image at all.
pub fn natural_crop_box(
    region: &CropRegion,
    dims: &ImageDimensions,
    max_dimension: u32,
) -> Result<CropBox, ExportError> {
    let corners = Projection::new(*dims).region_to_natural(region);

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in &corners {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    }
    let width = max_x - min_x;
    let height = max_y - min_y;
    let empty = || ExportError::EmptyRegion { width, height };

    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(empty());
    }

    // On-image part of the box
    let (nw, nh) = (dims.natural_width as f64, dims.natural_height as f64);
    let (vis_left, vis_right) = (min_x.max(0.0), max_x.min(nw));
    let (vis_top, vis_bottom) = (min_y.max(0.0), max_y.min(nh));
    if vis_right <= vis_left || vis_bottom <= vis_top {
        return Err(empty());
    }

    let left = vis_left.floor() as u32;
    let top = vis_top.floor() as u32;
    let right = vis_right.ceil() as u32;
    let bottom = vis_bottom.ceil() as u32;

    let (output_width, output_height) = calculate_fit_dimensions(
        (width.round() as u32).max(1),
        (height.round() as u32).max(1),
        max_dimension,
    );
    if output_width == 0 || output_height == 0 {
        return Err(empty());
    }

    let (tx, tw) = target_span(vis_left, vis_right, min_x, width, output_width);
    let (ty, th) = target_span(vis_top, vis_bottom, min_y, height, output_height);

    Ok(CropBox {
        x: min_x,
        y: min_y,
        width,
        height,
        source: PixelRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        },
        target: PixelRect {
            x: tx,
            y: ty,
            width: tw,
            height: th,
        },
        output_width,
        output_height,
    })
}

/// Cropped bitmap with transparency where a quad clip removed pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    pub bitmap: RgbaImage,
}

impl CroppedImage {
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Composite onto an opaque `background`.
    pub fn flatten_rgb(&self, background: Rgb<u8>) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b, a] = self.bitmap.get_pixel(x, y).0;
            let blend = |c: u8, bg: u8| {
                let a = a as u32;
                ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
            };
            Rgb([
                blend(r, background.0[0]),
                blend(g, background.0[1]),
                blend(b, background.0[2]),
            ])
        })
    }

    /// JPEG data URI; transparent pixels become black, as a canvas encodes them.
    pub fn to_data_uri(&self, quality_factor: f32) -> Result<String, ExportError> {
        let flat = self.flatten_rgb(Rgb([0, 0, 0]));
        Ok(encode_data_uri(&flat, quality_factor)?)
    }
}

/// Extract `region` from `source`.
///
/// # Arguments
///
/// * `source` - Decoded image; its size is the natural size
/// * `region` - Selection in display coordinates
/// * `dims` - Supplies the display size the region was drawn in. The natural
///   size is always taken from `source` itself, so a stale measurement cannot
///   skew the projection.
/// * `config` - Supplies `max_dimension`
///
/// # Errors
///
/// Returns an error if the source is empty or its buffer is malformed, or if
/// the region covers no pixels of the image.
pub fn export_region(
    source: &DecodedImage,
    region: &CropRegion,
    dims: &ImageDimensions,
    config: &CropperConfig,
) -> Result<CroppedImage, ExportError> {
    if source.is_empty() {
        return Err(ExportError::MissingSource);
    }
    let full = source.to_rgb_image().ok_or_else(|| {
        ExportError::SurfaceUnavailable(format!(
            "{} bytes for a {}x{} image",
            source.pixels.len(),
            source.width,
            source.height
        ))
    })?;

    let dims = dims.with_natural_size(source.width, source.height)?;
    let crop = natural_crop_box(region, &dims, config.validated().max_dimension)?;
    let PixelRect {
        x,
        y,
        width,
        height,
    } = crop.source;
    let target = crop.target;

    let sampled = imageops::crop_imm(&full, x, y, width, height).to_image();
    let sized = if (width, height) == (target.width, target.height) {
        sampled
    } else {
        imageops::resize(&sampled, target.width, target.height, FilterType::Triangle)
    };
    let sized = image::DynamicImage::ImageRgb8(sized).into_rgba8();

    let mut bitmap = if crop.is_partial() {
        let mut canvas = RgbaImage::new(crop.output_width, crop.output_height);
        imageops::replace(&mut canvas, &sized, target.x as i64, target.y as i64);
        canvas
    } else {
        sized
    };

    if let CropRegion::Quad(_) = region {
        let polygon = Projection::new(dims)
            .region_to_natural(region)
            .map(|p| crop.to_output(p));
        clip_to_polygon(&mut bitmap, &polygon);
    }

    tracing::info!(
        width = crop.output_width,
        height = crop.output_height,
        shape = ?region.shape(),
        downscaled = crop.is_downscaled(),
        partial = crop.is_partial(),
        "crop exported"
    );
    Ok(CroppedImage { bitmap })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::Rect;
    use proptest::prelude::*;

    proptest! {
        /// Property: Crop boxes larger than the cap come out with a 1024 px larger edge.
        #[test]
        fn prop_crop_box_downscale(
            nw in 1100u32..=8000,
            nh in 1100u32..=8000,
            fx in 0.0f64..=0.3,
            fy in 0.0f64..=0.3,
            fw in 0.5f64..=0.7,
            fh in 0.5f64..=0.7,
        ) {
            let dims = ImageDimensions::new(nw as f64 / 4.0, nh as f64 / 4.0, nw, nh).unwrap();
            let region = CropRegion::Rect(Rect::new(
                fx * dims.display_width,
                fy * dims.display_height,
                fw * dims.display_width,
                fh * dims.display_height,
            ));
            let crop = natural_crop_box(&region, &dims, 1024).unwrap();
            let (bw, bh) = (crop.width.round(), crop.height.round());
            prop_assume!(bw.max(bh) > 1024.0);

            prop_assert_eq!(crop.output_width.max(crop.output_height), 1024);
            let (major, minor) = if bw >= bh { (bw, bh) } else { (bh, bw) };
            let expected_minor = minor * 1024.0 / major;
            let actual_minor = crop.output_width.min(crop.output_height) as f64;
            prop_assert!((actual_minor - expected_minor).abs() <= 1.0);
        }

        /// Property: Crop boxes within the cap keep their natural size.
        #[test]
        fn prop_crop_box_passthrough(
            x in 0.0f64..=100.0,
            y in 0.0f64..=100.0,
            w in 1.0f64..=400.0,
            h in 1.0f64..=400.0,
        ) {
            let dims = ImageDimensions::new(500.0, 500.0, 1000, 1000).unwrap();
            let region = CropRegion::Rect(Rect::new(x, y, w, h));
            let crop = natural_crop_box(&region, &dims, 1024).unwrap();

            prop_assert!((crop.width - w * 2.0).abs() < 1e-9);
            prop_assert!((crop.height - h * 2.0).abs() < 1e-9);
            prop_assert_eq!(crop.output_width, crop.width.round() as u32);
            prop_assert_eq!(crop.output_height, crop.height.round() as u32);
            prop_assert!(!crop.is_partial());
        }

        /// Property: The sampled area always lands inside the output and on the image.
        #[test]
        fn prop_target_within_output(
            x in -300.0f64..=400.0,
            y in -300.0f64..=400.0,
            w in 1.0f64..=400.0,
            h in 1.0f64..=400.0,
        ) {
            let dims = ImageDimensions::new(500.0, 500.0, 1000, 1000).unwrap();
            let region = CropRegion::Rect(Rect::new(x, y, w, h));
            let Ok(crop) = natural_crop_box(&region, &dims, 1024) else {
                // Only boxes that miss the image entirely are rejected
                prop_assert!(x + w <= 0.0 || y + h <= 0.0);
                return Ok(());
            };

            let t = crop.target;
            prop_assert!(t.width >= 1 && t.height >= 1);
            prop_assert!(t.x + t.width <= crop.output_width);
            prop_assert!(t.y + t.height <= crop.output_height);
            prop_assert!(crop.source.x + crop.source.width <= 1000);
            prop_assert!(crop.source.y + crop.source.height <= 1000);
        }
    }
}
