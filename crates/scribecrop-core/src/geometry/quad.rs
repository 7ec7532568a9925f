//! Four-corner selection with independently draggable corners and edges.
//!
//! Corner indices never change meaning: dragging only rewrites coordinates,
//! so edge `i` always joins corner `i` and corner `(i + 1) % 4`. The quad is
//! allowed to become self-intersecting or degenerate; export deals with
//! whatever shape the user leaves behind.

use serde::{Deserialize, Serialize};

use super::{clamp_axis, Axis, Bounds, Edge, Point, Rect};

/// Areas below this (in square display pixels) count as degenerate.
const DEGENERATE_AREA: f64 = 1.0;

/// Quadrilateral region: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Quad spanning `bounds` exactly.
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self::new([
            Point::new(bounds.min_x, bounds.min_y),
            Point::new(bounds.max_x, bounds.min_y),
            Point::new(bounds.max_x, bounds.max_y),
            Point::new(bounds.min_x, bounds.max_y),
        ])
    }

    /// The full image inset by `padding` on every side.
    pub fn inset(width: f64, height: f64, padding: f64) -> Self {
        Self::from_bounds(&Bounds::inset(width, height, padding))
    }

    pub fn bounding_box(&self) -> Rect {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for p in &self.corners {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Shoelace area, positive for clockwise winding in screen coordinates.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Near-zero area, e.g. all corners dragged onto a line.
    pub fn is_degenerate(&self) -> bool {
        self.signed_area().abs() < DEGENERATE_AREA
    }

    /// Point-in-quad using the non-zero winding rule (the canvas default clip rule).
    pub fn contains(&self, p: Point) -> bool {
        winding_number(&self.corners, p) != 0
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.corners.map(|c| c.scaled(sx, sy)))
    }

    pub fn clamped(&self, bounds: &Bounds) -> Self {
        Self::new(self.corners.map(|c| c.clamped(bounds)))
    }

    /// Move one corner freely from its drag-start position.
    ///
    /// `self` is the snapshot taken at pointer-down; `delta` is the total
    /// pointer travel since then. Each axis is clamped independently.
    pub fn with_corner_dragged(&self, index: usize, delta: Point, bounds: &Bounds) -> Self {
        let mut next = *self;
        if let Some(corner) = next.corners.get_mut(index) {
            *corner = (*corner + delta).clamped(bounds);
        }
        next
    }

    /// Move both corners of `edge` along its free axis by the same amount.
    ///
    /// The shared delta is clamped so neither endpoint leaves `bounds`, which
    /// keeps the two corners in lock-step even when one of them hits the
    /// border first.
    pub fn with_edge_dragged(&self, edge: Edge, delta: Point, bounds: &Bounds) -> Self {
        let (a, b) = edge.corners();
        let mut next = *self;

        match edge.axis() {
            Axis::Horizontal => {
                let (ya, yb) = (self.corners[a].y, self.corners[b].y);
                let dy = clamp_axis(
                    delta.y,
                    bounds.min_y - ya.min(yb),
                    bounds.max_y - ya.max(yb),
                );
                next.corners[a].y = ya + dy;
                next.corners[b].y = yb + dy;
            }
            Axis::Vertical => {
                let (xa, xb) = (self.corners[a].x, self.corners[b].x);
                let dx = clamp_axis(
                    delta.x,
                    bounds.min_x - xa.min(xb),
                    bounds.max_x - xa.max(xb),
                );
                next.corners[a].x = xa + dx;
                next.corners[b].x = xb + dx;
            }
        }

        next
    }
}

/// Winding number of `polygon` around `p`.
pub(crate) fn winding_number(polygon: &[Point], p: Point) -> i32 {
    let n = polygon.len();
    let mut winding = 0;

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let cross = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);

        if a.y <= p.y {
            if b.y > p.y && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross < 0.0 {
            winding -= 1;
        }
    }

    winding
}


// ============================================================================
// Property-Based Tests
// ============================================================================
