//! Crop region geometry in displayed-image space.
//!
//! All coordinates here are display pixels: the size the image is rendered at
//! on screen, not its true resolution. Conversion to natural pixels happens
//! only at export time (see [`crate::projection`]).
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the displayed image
//! - X grows to the right, Y grows downward
//! - Corner indices run clockwise: 0 top-left, 1 top-right, 2 bottom-right,
//!   3 bottom-left
//! - Edge `i` joins corner `i` and corner `(i + 1) % 4`

mod quad;
mod rect;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CropperConfig;

pub use quad::Quad;
pub use rect::Rect;

pub(crate) use quad::winding_number;

/// Errors raised while building geometry from host-provided measurements.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Display size is zero, negative or not a number.
    #[error("Invalid display size: {width}x{height}")]
    InvalidDisplaySize { width: f64, height: f64 },

    /// Natural (decoded) size has a zero dimension.
    #[error("Invalid natural size: {width}x{height}")]
    InvalidNaturalSize { width: u32, height: u32 },
}

/// A position or offset in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Clamp each axis independently into `bounds`.
    pub fn clamped(self, bounds: &Bounds) -> Self {
        Self {
            x: clamp_axis(self.x, bounds.min_x, bounds.max_x),
            y: clamp_axis(self.y, bounds.min_y, bounds.max_y),
        }
    }

    /// Scale both axes.
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Clamp without panicking when the range is empty (collapses to `max`).
#[inline]
pub(crate) fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Measurements captured when the source image finishes loading.
///
/// Natural dimensions are the true pixel resolution. Display dimensions are
/// the rendered (possibly scaled-down) size the pointer coordinates live in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub display_width: f64,
    pub display_height: f64,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ImageDimensions {
    /// Build dimensions, rejecting sizes no handle could be placed on.
    pub fn new(
        display_width: f64,
        display_height: f64,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<Self, GeometryError> {
        let dims = Self {
            display_width,
            display_height,
            natural_width,
            natural_height,
        };
        dims.check()?;
        Ok(dims)
    }

    fn check(&self) -> Result<(), GeometryError> {
        let display_ok = |v: f64| v.is_finite() && v > 0.0;
        if !display_ok(self.display_width) || !display_ok(self.display_height) {
            return Err(GeometryError::InvalidDisplaySize {
                width: self.display_width,
                height: self.display_height,
            });
        }
        if self.natural_width == 0 || self.natural_height == 0 {
            return Err(GeometryError::InvalidNaturalSize {
                width: self.natural_width,
                height: self.natural_height,
            });
        }
        Ok(())
    }

    /// Whether these dimensions can carry an interactive region.
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Same natural size, new display size.
    pub fn with_display_size(&self, width: f64, height: f64) -> Result<Self, GeometryError> {
        Self::new(width, height, self.natural_width, self.natural_height)
    }

    /// Same display size, new natural size.
    pub fn with_natural_size(&self, width: u32, height: u32) -> Result<Self, GeometryError> {
        Self::new(self.display_width, self.display_height, width, height)
    }
}

/// Axis-aligned box every handle is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// `[padding, width - padding] x [padding, height - padding]`.
    ///
    /// When the image is narrower than twice the padding the axis collapses
    /// to its centre line.
    pub fn inset(width: f64, height: f64, padding: f64) -> Self {
        let axis = |extent: f64| {
            if extent >= 2.0 * padding {
                (padding, extent - padding)
            } else {
                (extent / 2.0, extent / 2.0)
            }
        };
        let (min_x, max_x) = axis(width);
        let (min_y, max_y) = axis(height);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Direction an edge handle is allowed to travel along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal edges (top, bottom) move along Y only.
    Horizontal,
    /// Vertical edges (left, right) move along X only.
    Vertical,
}

/// One side of the crop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Corners 0 (top-left) to 1 (top-right)
    Top,
    /// Corners 1 (top-right) to 2 (bottom-right)
    Right,
    /// Corners 2 (bottom-right) to 3 (bottom-left)
    Bottom,
    /// Corners 3 (bottom-left) to 0 (top-left)
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Position in [`Edge::ALL`], equal to the index of the edge's first corner.
    pub fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Right => 1,
            Edge::Bottom => 2,
            Edge::Left => 3,
        }
    }

    /// Inverse of [`Edge::index`]; `None` for 4 and above.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Corner indices joined by this edge: `(i, (i + 1) % 4)`.
    pub fn corners(self) -> (usize, usize) {
        let i = self.index();
        (i, (i + 1) % 4)
    }

    pub fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Horizontal,
            Edge::Left | Edge::Right => Axis::Vertical,
        }
    }
}

/// Which kind of region the engine edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropShape {
    /// Four independently draggable corners plus four edge handles.
    #[default]
    Quad,
    /// Axis-aligned rectangle with resize handles and whole-region move.
    Rect,
}

/// The user's selection in display space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CropRegion {
    Quad(Quad),
    Rect(Rect),
}

impl CropRegion {
    /// Default region for a freshly loaded image.
    ///
    /// Quads start at the full image inset by the padding. Rectangles start
    /// centered at `initial_rect_fraction` of each dimension. Both fit inside
    /// the clamp bounds.
    pub fn initialize(
        shape: CropShape,
        display_width: f64,
        display_height: f64,
        config: &CropperConfig,
    ) -> Self {
        let bounds = Bounds::inset(display_width, display_height, config.padding);
        match shape {
            CropShape::Quad => CropRegion::Quad(Quad::from_bounds(&bounds)),
            CropShape::Rect => CropRegion::Rect(
                Rect::centered(display_width, display_height, config.initial_rect_fraction)
                    .clamped(&bounds),
            ),
        }
    }

    pub fn shape(&self) -> CropShape {
        match self {
            CropRegion::Quad(_) => CropShape::Quad,
            CropRegion::Rect(_) => CropShape::Rect,
        }
    }

    /// Corners in clockwise order starting top-left.
    pub fn corners(&self) -> [Point; 4] {
        match self {
            CropRegion::Quad(q) => q.corners,
            CropRegion::Rect(r) => r.corners(),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            CropRegion::Quad(q) => q.bounding_box(),
            CropRegion::Rect(r) => *r,
        }
    }

    /// Scale every coordinate; used to follow a display-size change.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        match self {
            CropRegion::Quad(q) => CropRegion::Quad(q.scaled(sx, sy)),
            CropRegion::Rect(r) => CropRegion::Rect(r.scaled(sx, sy)),
        }
    }

    /// Force the region back inside `bounds`.
    pub fn clamped(&self, bounds: &Bounds) -> Self {
        match self {
            CropRegion::Quad(q) => CropRegion::Quad(q.clamped(bounds)),
            CropRegion::Rect(r) => CropRegion::Rect(r.clamped(bounds)),
        }
    }

    /// Whether every corner lies inside `bounds`.
    pub fn is_within(&self, bounds: &Bounds) -> bool {
        self.corners().iter().all(|c| bounds.contains(*c))
    }

    /// Containment test in display space.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            CropRegion::Quad(q) => q.contains(p),
            CropRegion::Rect(r) => r.contains(p),
        }
    }
}
