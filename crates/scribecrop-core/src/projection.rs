//! Render projection between display space and natural pixel space, plus the
//! overlay geometry a host draws on top of the image.
//!
//! The scale factors are derived from the current [`ImageDimensions`] on every
//! call and never cached, so a responsive relayout can never leave a stale
//! factor behind.

use serde::{Deserialize, Serialize};

use crate::config::CropperConfig;
use crate::geometry::{Axis, CropRegion, Edge, ImageDimensions, Point};

/// Maps points between the displayed image and its natural resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    dims: ImageDimensions,
}

impl Projection {
    pub fn new(dims: ImageDimensions) -> Self {
        Self { dims }
    }

    pub fn dimensions(&self) -> &ImageDimensions {
        &self.dims
    }

    /// Natural pixels per display pixel, `(sx, sy)`.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.dims.natural_width as f64 / self.dims.display_width,
            self.dims.natural_height as f64 / self.dims.display_height,
        )
    }

    pub fn to_natural(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        p.scaled(sx, sy)
    }

    pub fn to_display(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        p.scaled(1.0 / sx, 1.0 / sy)
    }

    /// Region corners in natural pixel space, clockwise from top-left.
    pub fn region_to_natural(&self, region: &CropRegion) -> [Point; 4] {
        region.corners().map(|c| self.to_natural(c))
    }
}

/// Fill rule a path is meant to be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// Value of the SVG `fill-rule` attribute.
    pub fn as_svg(&self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

/// Dark overlay covering everything outside the selection.
///
/// Two contours: the full image clockwise, then the selection traversed in
/// reverse (corners 0, 3, 2, 1). Filled even-odd this leaves a hole exactly
/// where the selection is, whatever its winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskPath {
    pub outer: [Point; 4],
    pub inner: [Point; 4],
    pub fill_rule: FillRule,
}

impl MaskPath {
    pub fn new(region: &CropRegion, display_width: f64, display_height: f64) -> Self {
        let c = region.corners();
        Self {
            outer: [
                Point::new(0.0, 0.0),
                Point::new(display_width, 0.0),
                Point::new(display_width, display_height),
                Point::new(0.0, display_height),
            ],
            inner: [c[0], c[3], c[2], c[1]],
            fill_rule: FillRule::EvenOdd,
        }
    }

    /// SVG path data, e.g. `M 0,0 L 400,0 L 400,300 L 0,300 Z M ...`.
    pub fn to_svg(&self) -> String {
        format!("{} {}", contour(&self.outer), contour(&self.inner))
    }
}

fn contour(points: &[Point; 4]) -> String {
    let [first, rest @ ..] = points;
    let mut d = format!("M {},{}", first.x, first.y);
    for p in rest {
        d.push_str(&format!(" L {},{}", p.x, p.y));
    }
    d.push_str(" Z");
    d
}

/// SVG `points` attribute for the selection border polygon.
pub fn polygon_points(region: &CropRegion) -> String {
    region
        .corners()
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Placement of an invisible edge touch target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeHandleLayout {
    pub edge: Edge,
    /// Midpoint of the edge.
    pub center: Point,
    /// Edge length minus the corner inset, never negative.
    pub length: f64,
    /// Rotation of the strip, `atan2(dy, dx)` in degrees.
    pub angle_degrees: f64,
    /// Thickness of the strip across the edge.
    pub thickness: f64,
    /// CSS cursor shown while hovering.
    pub cursor: &'static str,
}

/// Layout of all four edge handles for the current region.
pub fn edge_handles(region: &CropRegion, config: &CropperConfig) -> [EdgeHandleLayout; 4] {
    let corners = region.corners();
    Edge::ALL.map(|edge| {
        let (a, b) = edge.corners();
        let (p, q) = (corners[a], corners[b]);
        let d = q - p;
        EdgeHandleLayout {
            edge,
            center: Point::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0),
            length: (d.x.hypot(d.y) - config.edge_handle_inset).max(0.0),
            angle_degrees: d.y.atan2(d.x).to_degrees(),
            thickness: config.edge_hit_thickness,
            cursor: match edge.axis() {
                Axis::Horizontal => "ns-resize",
                Axis::Vertical => "ew-resize",
            },
        }
    })
}

/// Colors and stroke of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub mask_fill: String,
    pub border_stroke: String,
    pub border_width: f64,
    pub handle_fill: String,
    /// Diameter of the visible corner handle.
    pub handle_size: f64,
}

impl OverlayStyle {
    pub fn from_config(config: &CropperConfig) -> Self {
        Self {
            mask_fill: format!("rgba(0,0,0,{})", config.overlay_opacity),
            border_stroke: "#ffffff".to_string(),
            border_width: 2.0,
            handle_fill: "#ffffff".to_string(),
            handle_size: config.corner_hit_radius * 2.0,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from_config(&CropperConfig::default())
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
