//! Cropper configuration.
//!
//! Every field has a default matching the behavior of the reading-journal
//! capture flow, so hosts usually pass an empty object and override only what
//! they need. Missing fields deserialize to their defaults.

use serde::{Deserialize, Serialize};

use crate::geometry::CropShape;

/// Largest output edge in pixels. Keeps OCR uploads bounded.
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

/// Lossy encode quality factor (0.0 to 1.0), as passed to a canvas encoder.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.85;

/// Tunables for the crop engine, projection and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Region shape the engine edits.
    pub shape: CropShape,
    /// Distance in display pixels kept between handles and the image border.
    pub padding: f64,
    /// Fraction of each dimension covered by the initial rectangle.
    pub initial_rect_fraction: f64,
    /// Minimum rectangle width and height in display pixels.
    pub min_rect_size: f64,
    /// Output size cap in pixels (applies to the larger edge).
    pub max_dimension: u32,
    /// Encode quality factor (0.0 to 1.0).
    pub jpeg_quality: f32,
    /// Corner handle hit radius in display pixels.
    pub corner_hit_radius: f64,
    /// Thickness of the invisible edge touch strip in display pixels.
    pub edge_hit_thickness: f64,
    /// Amount the edge touch strip is shortened so it never overlaps corners.
    pub edge_handle_inset: f64,
    /// Opacity of the dark overlay outside the selection.
    pub overlay_opacity: f32,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            shape: CropShape::Quad,
            padding: 10.0,
            initial_rect_fraction: 0.8,
            min_rect_size: 50.0,
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            corner_hit_radius: 18.0,
            edge_hit_thickness: 30.0,
            edge_handle_inset: 50.0,
            overlay_opacity: 0.6,
        }
    }
}

impl CropperConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration for a given shape.
    pub fn with_shape(shape: CropShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Return a copy with every value forced into its usable range.
    ///
    /// Non-finite values fall back to the defaults.
    pub fn validated(&self) -> Self {
        let defaults = Self::default();
        let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };

        Self {
            shape: self.shape,
            padding: finite_or(self.padding, defaults.padding).max(0.0),
            initial_rect_fraction: finite_or(
                self.initial_rect_fraction,
                defaults.initial_rect_fraction,
            )
            .clamp(0.01, 1.0),
            min_rect_size: finite_or(self.min_rect_size, defaults.min_rect_size).max(1.0),
            max_dimension: self.max_dimension.max(1),
            jpeg_quality: if self.jpeg_quality.is_finite() {
                self.jpeg_quality.clamp(0.0, 1.0)
            } else {
                defaults.jpeg_quality
            },
            corner_hit_radius: finite_or(self.corner_hit_radius, defaults.corner_hit_radius)
                .max(0.0),
            edge_hit_thickness: finite_or(self.edge_hit_thickness, defaults.edge_hit_thickness)
                .max(0.0),
            edge_handle_inset: finite_or(self.edge_handle_inset, defaults.edge_handle_inset)
                .max(0.0),
            overlay_opacity: if self.overlay_opacity.is_finite() {
                self.overlay_opacity.clamp(0.0, 1.0)
            } else {
                defaults.overlay_opacity
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CropperConfig::new();
        assert_eq!(config.shape, CropShape::Quad);
        assert_eq!(config.max_dimension, 1024);
        assert!((config.jpeg_quality - 0.85).abs() < f32::EPSILON);
        assert!((config.padding - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_shape() {
        let config = CropperConfig::with_shape(CropShape::Rect);
        assert_eq!(config.shape, CropShape::Rect);
        assert_eq!(config.max_dimension, DEFAULT_MAX_DIMENSION);
    }

    #[test]
    fn test_validated_clamps_ranges() {
        let mut config = CropperConfig::new();
        config.padding = -5.0;
        config.initial_rect_fraction = 3.0;
        config.max_dimension = 0;
        config.jpeg_quality = 7.0;
        config.overlay_opacity = -1.0;

        let valid = config.validated();
        assert_eq!(valid.padding, 0.0);
        assert_eq!(valid.initial_rect_fraction, 1.0);
        assert_eq!(valid.max_dimension, 1);
        assert_eq!(valid.jpeg_quality, 1.0);
        assert_eq!(valid.overlay_opacity, 0.0);
    }

    #[test]
    fn test_validated_replaces_non_finite() {
        let mut config = CropperConfig::new();
        config.padding = f64::NAN;
        config.min_rect_size = f64::INFINITY;
        config.jpeg_quality = f32::NAN;

        let valid = config.validated();
        assert_eq!(valid.padding, 10.0);
        assert_eq!(valid.min_rect_size, 50.0);
        assert!((valid.jpeg_quality - 0.85).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validated_keeps_valid_config() {
        let config = CropperConfig::with_shape(CropShape::Rect);
        assert_eq!(config.validated(), config);
    }
}
