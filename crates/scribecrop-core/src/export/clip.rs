//! Polygon clipping of the exported bitmap.
//!
//! A canvas clip path keeps a pixel when its centre lies inside the path
//! under the non-zero winding rule. Pixels outside are never drawn and stay
//! transparent black.

use image::{Rgba, RgbaImage};

use crate::geometry::{winding_number, Point};

/// Make every pixel whose centre lies outside `polygon` transparent black.
///
/// `polygon` is in output pixel coordinates. Returns the number of pixels kept.
pub fn clip_to_polygon(bitmap: &mut RgbaImage, polygon: &[Point]) -> usize {
    let mut kept = 0;
    for (x, y, pixel) in bitmap.enumerate_pixels_mut() {
        let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
        if winding_number(polygon, centre) != 0 {
            kept += 1;
        } else {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_full_rectangle_keeps_everything() {
        let mut bitmap = opaque(10, 8);
        let polygon = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 8.0),
            Point::new(0.0, 8.0),
        ];
        assert_eq!(clip_to_polygon(&mut bitmap, &polygon), 80);
        assert!(bitmap.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_triangle_like_quad_clears_corner() {
        // Top-right corner pulled onto the top-left: a right triangle
        let mut bitmap = opaque(10, 10);
        let polygon = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        clip_to_polygon(&mut bitmap, &polygon);

        assert_eq!(bitmap.get_pixel(9, 0).0, [0, 0, 0, 0]);
        assert_eq!(bitmap.get_pixel(0, 9).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_counter_clockwise_polygon_also_clips() {
        let mut bitmap = opaque(10, 10);
        let polygon = [
            Point::new(2.0, 2.0),
            Point::new(2.0, 8.0),
            Point::new(8.0, 8.0),
            Point::new(8.0, 2.0),
        ];
        assert_eq!(clip_to_polygon(&mut bitmap, &polygon), 36);
        assert_eq!(bitmap.get_pixel(0, 0).0[3], 0);
        assert_eq!(bitmap.get_pixel(5, 5).0[3], 255);
    }

    #[test]
    fn test_self_intersecting_bowtie_nonzero() {
        // Bowtie: the left and right lobes are inside, top and bottom are not
        let mut bitmap = opaque(10, 10);
        let polygon = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        clip_to_polygon(&mut bitmap, &polygon);
        assert_eq!(bitmap.get_pixel(8, 5).0[3], 255);
        assert_eq!(bitmap.get_pixel(1, 5).0[3], 255);
        assert_eq!(bitmap.get_pixel(5, 1).0[3], 0);
        assert_eq!(bitmap.get_pixel(5, 8).0[3], 0);
    }
}
