//! Input normalization.
//!
//! Mouse, pen and touch payloads are reduced to a single [`PointerInput`] at
//! the boundary so the state machine never looks at the device type.

use serde::{Deserialize, Serialize};

use super::Handle;
use crate::geometry::Point;

/// A normalized pointer position.
///
/// Only deltas between two inputs reach the geometry, so any consistent
/// coordinate frame works (client, page or image-local).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
}

impl PointerInput {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// NaN or infinite coordinates come from broken event payloads.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for PointerInput {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// Device-specific payloads as delivered by a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeviceInput {
    Mouse { client_x: f64, client_y: f64 },
    Pen { client_x: f64, client_y: f64 },
    Pointer { client_x: f64, client_y: f64 },
    Touch { touches: Vec<TouchPoint> },
}

impl DeviceInput {
    /// Reduce to a single pointer position.
    ///
    /// Touch events track the first contact only. A touch event with no
    /// remaining contacts (touchend) carries no position and yields `None`.
    pub fn normalize(&self) -> Option<PointerInput> {
        match self {
            DeviceInput::Mouse { client_x, client_y }
            | DeviceInput::Pen { client_x, client_y }
            | DeviceInput::Pointer { client_x, client_y } => {
                Some(PointerInput::new(*client_x, *client_y))
            }
            DeviceInput::Touch { touches } => touches
                .first()
                .map(|t| PointerInput::new(t.client_x, t.client_y)),
        }
    }
}

/// Everything the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed on a handle.
    Down { handle: Handle, input: PointerInput },
    Move(PointerInput),
    Up,
    Cancel,
    /// Pointer left the cropper container.
    Leave,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_normalizes() {
        let input = DeviceInput::Mouse {
            client_x: 12.0,
            client_y: 34.0,
        };
        assert_eq!(input.normalize(), Some(PointerInput::new(12.0, 34.0)));
    }

    #[test]
    fn test_touch_uses_first_contact() {
        let input = DeviceInput::Touch {
            touches: vec![
                TouchPoint {
                    client_x: 1.0,
                    client_y: 2.0,
                },
                TouchPoint {
                    client_x: 100.0,
                    client_y: 200.0,
                },
            ],
        };
        assert_eq!(input.normalize(), Some(PointerInput::new(1.0, 2.0)));
    }

    #[test]
    fn test_touch_end_has_no_position() {
        let input = DeviceInput::Touch { touches: vec![] };
        assert_eq!(input.normalize(), None);
    }

    #[test]
    fn test_pen_and_pointer_normalize_identically() {
        let pen = DeviceInput::Pen {
            client_x: 5.5,
            client_y: 6.5,
        };
        let pointer = DeviceInput::Pointer {
            client_x: 5.5,
            client_y: 6.5,
        };
        assert_eq!(pen.normalize(), pointer.normalize());
    }

    #[test]
    fn test_finite_check() {
        assert!(PointerInput::new(1.0, 2.0).is_finite());
        assert!(!PointerInput::new(f64::NAN, 2.0).is_finite());
        assert!(!PointerInput::new(1.0, f64::INFINITY).is_finite());
    }
}
