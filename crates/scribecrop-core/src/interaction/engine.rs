//! The crop engine: region state plus the single-gesture drag state machine.
//!
//! ```text
//!            pointer_down(h)                pointer_move
//!   Idle ────────────────────▶ Dragging ◀──────────────┐
//!    ▲                            │  └─────────────────┘
//!    └────────────────────────────┘
//!       pointer_up | pointer_cancel | pointer_leave
//! ```
//!
//! Every move is applied to the snapshot taken at pointer-down using the
//! total travel since then, so rounding never accumulates across events.

use serde::{Deserialize, Serialize};

use super::{PointerEvent, PointerInput};
use crate::config::CropperConfig;
use crate::geometry::{
    Bounds, CropRegion, CropShape, Edge, GeometryError, ImageDimensions, Point,
};

/// A draggable part of the crop overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum Handle {
    /// Corner by winding index (0 top-left .. 3 bottom-left).
    Corner(usize),
    /// The invisible touch strip along one side.
    Edge(Edge),
    /// The region interior; whole-region move, rectangles only.
    Body,
}

/// Degrees of freedom a gesture has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    /// One corner moves freely in 2D
    Corner,
    /// Both corners of one edge move together along a single axis
    Edge,
    /// The whole region translates
    Move,
}

impl Handle {
    pub fn mode(&self) -> DragMode {
        match self {
            Handle::Corner(_) => DragMode::Corner,
            Handle::Edge(_) => DragMode::Edge,
            Handle::Body => DragMode::Move,
        }
    }

    /// Corner or edge index; zero for the body.
    pub fn index(&self) -> usize {
        match self {
            Handle::Corner(i) => *i,
            Handle::Edge(e) => e.index(),
            Handle::Body => 0,
        }
    }

    /// Whether this handle exists on a region of `shape`.
    pub fn applies_to(&self, shape: CropShape) -> bool {
        match self {
            Handle::Corner(i) => *i < 4,
            Handle::Edge(_) => true,
            Handle::Body => shape == CropShape::Rect,
        }
    }
}

/// Transient record of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    /// Pointer position at pointer-down.
    pub start: Point,
    /// Region at pointer-down.
    pub snapshot: CropRegion,
}

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InteractionState {
    /// No gesture in progress
    Idle,
    /// A gesture holds the single drag session
    Dragging { mode: DragMode, target_index: usize },
}

/// Crop region owner and pointer state machine.
#[derive(Debug, Clone)]
pub struct CropEngine {
    dims: ImageDimensions,
    config: CropperConfig,
    region: CropRegion,
    committed: CropRegion,
    session: Option<DragSession>,
}

impl CropEngine {
    /// Engine with the default region for `dims` and the configured shape.
    pub fn new(dims: ImageDimensions, config: &CropperConfig) -> Self {
        let config = config.validated();
        let region = CropRegion::initialize(
            config.shape,
            dims.display_width,
            dims.display_height,
            &config,
        );
        Self {
            dims,
            config,
            region,
            committed: region,
            session: None,
        }
    }

    /// Engine resuming a previously saved region, clamped to the current bounds.
    pub fn with_region(
        dims: ImageDimensions,
        config: &CropperConfig,
        region: CropRegion,
    ) -> Self {
        let mut engine = Self::new(dims, config);
        let region = region.clamped(&engine.bounds());
        engine.config.shape = region.shape();
        engine.region = region;
        engine.committed = region;
        engine
    }

    pub fn dimensions(&self) -> &ImageDimensions {
        &self.dims
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    /// Live region, updated on every move.
    pub fn region(&self) -> &CropRegion {
        &self.region
    }

    /// Region as of the last finished gesture. Export reads this one.
    pub fn committed_region(&self) -> &CropRegion {
        &self.committed
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Clamp box for every handle: the image inset by the padding.
    pub fn bounds(&self) -> Bounds {
        Bounds::inset(
            self.dims.display_width,
            self.dims.display_height,
            self.config.padding,
        )
    }

    pub fn state(&self) -> InteractionState {
        match &self.session {
            None => InteractionState::Idle,
            Some(s) => InteractionState::Dragging {
                mode: s.handle.mode(),
                target_index: s.handle.index(),
            },
        }
    }

    /// True while a gesture is in progress; the host suppresses page
    /// gestures (scroll, pinch-zoom, text selection) while this is set.
    pub fn is_interaction_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a gesture on `handle`.
    ///
    /// Returns `false` and changes nothing when a gesture is already active
    /// (the first touch wins), the handle does not exist on this shape, or
    /// the input is not finite.
    pub fn pointer_down(&mut self, handle: Handle, input: PointerInput) -> bool {
        if self.session.is_some() {
            tracing::trace!(?handle, "pointer down ignored, gesture already active");
            return false;
        }
        if !handle.applies_to(self.region.shape()) || !input.is_finite() {
            return false;
        }

        self.session = Some(DragSession {
            handle,
            start: input.position(),
            snapshot: self.region,
        });
        tracing::debug!(?handle, x = input.x, y = input.y, "drag started");
        true
    }

    /// Apply the pointer travel since pointer-down. Returns whether the region changed.
    pub fn pointer_move(&mut self, input: PointerInput) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        if !input.is_finite() {
            return false;
        }

        let delta = input.position() - session.start;
        let bounds = self.bounds();
        let min_size = self.config.min_rect_size;

        let next = match (session.snapshot, session.handle) {
            (CropRegion::Quad(q), Handle::Corner(i)) => {
                CropRegion::Quad(q.with_corner_dragged(i, delta, &bounds))
            }
            (CropRegion::Quad(q), Handle::Edge(edge)) => {
                CropRegion::Quad(q.with_edge_dragged(edge, delta, &bounds))
            }
            (CropRegion::Quad(_), Handle::Body) => return false,
            (CropRegion::Rect(r), Handle::Corner(i)) => {
                CropRegion::Rect(r.with_corner_dragged(i, delta, &bounds, min_size))
            }
            (CropRegion::Rect(r), Handle::Edge(edge)) => {
                CropRegion::Rect(r.with_edge_dragged(edge, delta, &bounds, min_size))
            }
            (CropRegion::Rect(r), Handle::Body) => CropRegion::Rect(r.translated(delta, &bounds)),
        };

        let changed = next != self.region;
        self.region = next;
        changed
    }

    /// Finish the gesture; the live region becomes the committed one.
    pub fn pointer_up(&mut self) -> bool {
        self.end_session("up")
    }

    /// The platform aborted the gesture. The last written region still counts.
    pub fn pointer_cancel(&mut self) -> bool {
        self.end_session("cancel")
    }

    /// The pointer left the cropper container.
    pub fn pointer_leave(&mut self) -> bool {
        self.end_session("leave")
    }

    fn end_session(&mut self, reason: &'static str) -> bool {
        match self.session.take() {
            Some(session) => {
                self.committed = self.region;
                tracing::debug!(handle = ?session.handle, reason, "drag ended");
                true
            }
            None => false,
        }
    }

    /// Single entry point for hosts that forward raw events.
    pub fn handle_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { handle, input } => self.pointer_down(handle, input),
            PointerEvent::Move(input) => self.pointer_move(input),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Cancel => self.pointer_cancel(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Find the handle under an image-local point.
    ///
    /// Corners win over edges, edges over the body. Edge touch strips are
    /// shortened by `edge_handle_inset` so they never cover a corner.
    pub fn hit_test(&self, p: Point) -> Option<Handle> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        let corners = self.region.corners();

        let corner = corners
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.distance_to(p)))
            .filter(|(_, d)| *d <= self.config.corner_hit_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((i, _)) = corner {
            return Some(Handle::Corner(i));
        }

        let half_thickness = self.config.edge_hit_thickness / 2.0;
        let edge = Edge::ALL
            .iter()
            .filter_map(|edge| {
                let (a, b) = edge.corners();
                edge_distance(corners[a], corners[b], p, self.config.edge_handle_inset)
                    .map(|d| (*edge, d))
            })
            .filter(|(_, d)| *d <= half_thickness)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((edge, _)) = edge {
            return Some(Handle::Edge(edge));
        }

        match self.region {
            CropRegion::Rect(r) if r.contains(p) => Some(Handle::Body),
            _ => None,
        }
    }

    /// Follow a layout change of the displayed image.
    ///
    /// The region is rescaled into the new display size and clamped to the
    /// new bounds. Any gesture in progress ends first, since its start point
    /// belongs to the old layout.
    pub fn relayout(
        &mut self,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), GeometryError> {
        let dims = self.dims.with_display_size(display_width, display_height)?;
        self.end_session("relayout");

        let sx = dims.display_width / self.dims.display_width;
        let sy = dims.display_height / self.dims.display_height;
        self.dims = dims;

        let bounds = self.bounds();
        self.region = self.region.scaled(sx, sy).clamped(&bounds);
        self.committed = self.region;
        tracing::debug!(display_width, display_height, "crop region relaid out");
        Ok(())
    }

    /// Throw away the current region and start over from the default.
    pub fn reset(&mut self) {
        self.session = None;
        self.region = CropRegion::initialize(
            self.config.shape,
            self.dims.display_width,
            self.dims.display_height,
            &self.config,
        );
        self.committed = self.region;
    }
}

/// Perpendicular distance from `p` to the touch strip along `a`-`b`.
///
/// `None` when `p` projects outside the strip, which is the segment shortened
/// by `inset` (split evenly between both ends) and centered on its midpoint.
fn edge_distance(a: Point, b: Point, p: Point, inset: f64) -> Option<f64> {
    let d = b - a;
    let len = d.x.hypot(d.y);
    if len < f64::EPSILON {
        return None;
    }

    let rel = p - a;
    let along = (rel.x * d.x + rel.y * d.y) / len;
    let half_strip = (len - inset).max(0.0) / 2.0;
    if (along - len / 2.0).abs() > half_strip {
        return None;
    }

    Some((d.x * rel.y - d.y * rel.x).abs() / len)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
