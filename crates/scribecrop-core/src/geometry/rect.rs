//! Axis-aligned rectangle selection.
//!
//! Rectangles resize from corners and edges and translate as a whole. Unlike
//! quads they enforce a minimum width and height so the selection can never
//! collapse.

use serde::{Deserialize, Serialize};

use super::{clamp_axis, Bounds, Edge, Point, Quad};

/// Rectangle in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Horizontal or vertical side a corner handle drives.
#[derive(Clone, Copy)]
enum Side {
    Low,
    High,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Rectangle covering `fraction` of each dimension, centered.
    pub fn centered(width: f64, height: f64, fraction: f64) -> Self {
        let w = width * fraction;
        let h = height * fraction;
        Self::new((width - w) / 2.0, (height - h) / 2.0, w, h)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Corners clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    pub fn to_quad(&self) -> Quad {
        Quad::new(self.corners())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Intersect with `bounds`, keeping at least a zero-size rect at the border.
    pub fn clamped(&self, bounds: &Bounds) -> Self {
        let left = clamp_axis(self.x, bounds.min_x, bounds.max_x);
        let top = clamp_axis(self.y, bounds.min_y, bounds.max_y);
        let right = clamp_axis(self.right(), left, bounds.max_x);
        let bottom = clamp_axis(self.bottom(), top, bounds.max_y);
        Self::from_edges(left, top, right, bottom)
    }

    /// Resize from corner `index`; the opposite corner stays put.
    pub fn with_corner_dragged(
        &self,
        index: usize,
        delta: Point,
        bounds: &Bounds,
        min_size: f64,
    ) -> Self {
        let (x_side, y_side) = match index {
            0 => (Side::Low, Side::Low),
            1 => (Side::High, Side::Low),
            2 => (Side::High, Side::High),
            3 => (Side::Low, Side::High),
            _ => return *self,
        };

        let (left, right) = move_side(
            self.x,
            self.right(),
            x_side,
            delta.x,
            bounds.min_x,
            bounds.max_x,
            min_size,
        );
        let (top, bottom) = move_side(
            self.y,
            self.bottom(),
            y_side,
            delta.y,
            bounds.min_y,
            bounds.max_y,
            min_size,
        );
        Self::from_edges(left, top, right, bottom)
    }

    /// Resize one side along its normal.
    pub fn with_edge_dragged(
        &self,
        edge: Edge,
        delta: Point,
        bounds: &Bounds,
        min_size: f64,
    ) -> Self {
        let (mut left, mut top, mut right, mut bottom) =
            (self.x, self.y, self.right(), self.bottom());

        match edge {
            Edge::Top | Edge::Bottom => {
                let side = if edge == Edge::Top { Side::Low } else { Side::High };
                (top, bottom) = move_side(
                    top,
                    bottom,
                    side,
                    delta.y,
                    bounds.min_y,
                    bounds.max_y,
                    min_size,
                );
            }
            Edge::Left | Edge::Right => {
                let side = if edge == Edge::Left { Side::Low } else { Side::High };
                (left, right) = move_side(
                    left,
                    right,
                    side,
                    delta.x,
                    bounds.min_x,
                    bounds.max_x,
                    min_size,
                );
            }
        }

        Self::from_edges(left, top, right, bottom)
    }

    /// Translate the whole rectangle, stopping at the bounds.
    pub fn translated(&self, delta: Point, bounds: &Bounds) -> Self {
        let dx = clamp_axis(delta.x, bounds.min_x - self.x, bounds.max_x - self.right());
        let dy = clamp_axis(delta.y, bounds.min_y - self.y, bounds.max_y - self.bottom());
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Move the `side` end of the span `[low, high]` by `delta`.
///
/// The span never shrinks below `min_size` (or its current length, if that
/// is already smaller) and never crosses `[bound_min, bound_max]`.
fn move_side(
    low: f64,
    high: f64,
    side: Side,
    delta: f64,
    bound_min: f64,
    bound_max: f64,
    min_size: f64,
) -> (f64, f64) {
    let min_len = min_size.min(high - low).max(0.0);
    match side {
        Side::Low => (clamp_axis(low + delta, bound_min, high - min_len), high),
        Side::High => (low, clamp_axis(high + delta, low + min_len, bound_max)),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Resizes keep the rectangle inside bounds and at least min size.
        #[test]
        fn prop_resize_respects_bounds_and_min_size(
            index in 0usize..4,
            dx in -1000.0f64..=1000.0,
            dy in -1000.0f64..=1000.0,
        ) {
            let bounds = Bounds::inset(400.0, 300.0, 10.0);
            let start = Rect::centered(400.0, 300.0, 0.8);
            let r = start.with_corner_dragged(index, Point::new(dx, dy), &bounds, 50.0);

            prop_assert!(r.width >= 50.0 - 1e-9);
            prop_assert!(r.height >= 50.0 - 1e-9);
            for c in r.corners() {
                prop_assert!(bounds.contains(c));
            }
        }

        /// Property: Translation preserves size and stays inside bounds.
        #[test]
        fn prop_translate_preserves_size(
            dx in -1000.0f64..=1000.0,
            dy in -1000.0f64..=1000.0,
        ) {
            let bounds = Bounds::inset(400.0, 300.0, 10.0);
            let start = Rect::centered(400.0, 300.0, 0.5);
            let r = start.translated(Point::new(dx, dy), &bounds);

            prop_assert!((r.width - start.width).abs() < 1e-9);
            prop_assert!((r.height - start.height).abs() < 1e-9);
            for c in r.corners() {
                prop_assert!(bounds.contains(c));
            }
        }
    }
}
