//! Output size capping.

/// Fit `width` x `height` within `max_edge` on both axes, preserving aspect.
///
/// # Arguments
///
/// * `width` - Source width in pixels
/// * `height` - Source height in pixels
/// * `max_edge` - Largest allowed width or height
///
/// # Returns
///
/// Sizes that already fit are returned unchanged. Otherwise the larger edge
/// becomes exactly `max_edge` and the other is rounded, never below 1. A zero
/// input gives `(0, 0)`.
pub fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_edge == 0 {
        return (0, 0);
    }
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;
    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_downscale() {
        assert_eq!(calculate_fit_dimensions(2000, 1500, 1024), (1024, 768));
        assert_eq!(calculate_fit_dimensions(6000, 4000, 1024), (1024, 683));
    }

    #[test]
    fn test_portrait_downscale() {
        assert_eq!(calculate_fit_dimensions(1500, 2000, 1024), (768, 1024));
    }

    #[test]
    fn test_square() {
        assert_eq!(calculate_fit_dimensions(4000, 4000, 1024), (1024, 1024));
    }

    #[test]
    fn test_fits_already() {
        assert_eq!(calculate_fit_dimensions(640, 480, 1024), (640, 480));
        assert_eq!(calculate_fit_dimensions(1024, 1024, 1024), (1024, 1024));
    }

    #[test]
    fn test_only_one_axis_over() {
        assert_eq!(calculate_fit_dimensions(300, 2048, 1024), (150, 1024));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(calculate_fit_dimensions(100_000, 10, 1024), (1024, 1));
    }

    #[test]
    fn test_zero_input() {
        assert_eq!(calculate_fit_dimensions(0, 10, 1024), (0, 0));
        assert_eq!(calculate_fit_dimensions(10, 10, 0), (0, 0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
