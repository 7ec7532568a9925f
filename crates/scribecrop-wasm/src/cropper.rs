//! The interactive cropper as a JavaScript class.
//!
//! ```typescript
//! const cropper = new JsCropper({ onCropComplete, onCancel, lockScroll, unlockScroll }, { shape: 'quad' });
//! cropper.load_image(bytes, img.clientWidth, img.clientHeight);
//!
//! overlay.onpointerdown = (e) => {
//!   const handle = cropper.hit_test(e.offsetX, e.offsetY);
//!   if (handle) cropper.pointer_down_event(handle, e);
//! };
//! window.onpointermove = (e) => { if (cropper.pointer_move_event(e)) redraw(); };
//! window.onpointerup = () => cropper.pointer_up();
//!
//! confirmButton.onclick = () => cropper.confirm();
//! ```
//!
//! Region, mask and handle layout are returned as plain objects for the host
//! to render; the cropper never touches the DOM itself.

use crate::host::{self, JsHost, JsScrollLock};
use crate::input::pointer_input;
use crate::types::{config_from_js, to_js, JsDecodedImage};
use scribecrop_core::projection::{edge_handles, polygon_points, MaskPath, OverlayStyle};
use scribecrop_core::{CropEngine, Cropper, Handle, Point, PointerEvent, PointerInput};
use wasm_bindgen::prelude::*;

fn err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn handle_from_js(handle: JsValue) -> Result<Handle, JsValue> {
    serde_wasm_bindgen::from_value(handle)
        .map_err(|e| JsValue::from_str(&format!("Invalid handle: {e}")))
}

#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper<JsHost, JsScrollLock>,
}

#[wasm_bindgen]
impl JsCropper {
    /// Open a cropper. Page scrolling is locked until `confirm` or `cancel`
    /// (or until the object is freed).
    #[wasm_bindgen(constructor)]
    pub fn new(callbacks: JsValue, config: JsValue) -> Result<JsCropper, JsValue> {
        let (host, lock) = host::from_callbacks(&callbacks)?;
        let config = config_from_js(config)?;
        Ok(JsCropper {
            inner: Cropper::new(host, lock, config),
        })
    }

    /// Decode and show a photo at the given display size.
    ///
    /// On failure the handles are hidden and the error is returned; the
    /// cropper stays open so another image can be loaded.
    pub fn load_image(
        &mut self,
        bytes: &[u8],
        display_width: f64,
        display_height: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .load_image(bytes, display_width, display_height)
            .map_err(err)
    }

    /// Show an image decoded earlier with `decode_image`.
    pub fn load_decoded(
        &mut self,
        image: &JsDecodedImage,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .load_decoded(image.to_decoded(), display_width, display_height)
            .map_err(err)
    }

    #[wasm_bindgen(getter)]
    pub fn handles_visible(&self) -> bool {
        self.inner.handles_visible()
    }

    #[wasm_bindgen(getter)]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Handle under a point in image-local display coordinates, or `null`.
    pub fn hit_test(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        match self.engine().and_then(|e| e.hit_test(Point::new(x, y))) {
            Some(handle) => to_js(&handle),
            None => Ok(JsValue::NULL),
        }
    }

    /// Start a drag on `handle` (as returned by `hit_test`) at `(x, y)`.
    ///
    /// Returns `false` when a drag is already in progress or the handle does
    /// not exist for the current shape.
    pub fn pointer_down(&mut self, handle: JsValue, x: f64, y: f64) -> Result<bool, JsValue> {
        let handle = handle_from_js(handle)?;
        Ok(self.inner.handle_event(PointerEvent::Down {
            handle,
            input: PointerInput::new(x, y),
        }))
    }

    /// Like `pointer_down`, reading the position from a DOM event.
    pub fn pointer_down_event(&mut self, handle: JsValue, event: JsValue) -> Result<bool, JsValue> {
        let handle = handle_from_js(handle)?;
        Ok(match pointer_input(&event) {
            Some(input) => self.inner.handle_event(PointerEvent::Down { handle, input }),
            None => false,
        })
    }

    /// Returns whether the region changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner
            .handle_event(PointerEvent::Move(PointerInput::new(x, y)))
    }

    pub fn pointer_move_event(&mut self, event: JsValue) -> bool {
        match pointer_input(&event) {
            Some(input) => self.inner.handle_event(PointerEvent::Move(input)),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        self.inner.handle_event(PointerEvent::Up)
    }

    pub fn pointer_cancel(&mut self) -> bool {
        self.inner.handle_event(PointerEvent::Cancel)
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.inner.handle_event(PointerEvent::Leave)
    }

    #[wasm_bindgen(getter)]
    pub fn is_interaction_active(&self) -> bool {
        self.engine().is_some_and(|e| e.is_interaction_active())
    }

    /// `{ state: 'idle' }` or `{ state: 'dragging', mode, target_index }`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        match self.engine() {
            Some(engine) => to_js(&engine.state()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Live region in display coordinates, or `null` without an image.
    pub fn region(&self) -> Result<JsValue, JsValue> {
        match self.engine() {
            Some(engine) => to_js(engine.region()),
            None => Ok(JsValue::NULL),
        }
    }

    /// SVG path data for the dimming mask. Render it with `mask_fill_rule`.
    pub fn mask_path(&self) -> Option<String> {
        self.mask().map(|mask| mask.to_svg())
    }

    /// SVG `fill-rule` the mask path is meant for.
    pub fn mask_fill_rule(&self) -> Option<String> {
        self.mask().map(|mask| mask.fill_rule.as_svg().to_string())
    }

    /// SVG `points` for the selection border.
    pub fn polygon_points(&self) -> Option<String> {
        self.engine().map(|engine| polygon_points(engine.region()))
    }

    /// Placement of the four invisible edge touch targets.
    pub fn edge_handles(&self) -> Result<JsValue, JsValue> {
        match self.engine() {
            Some(engine) => to_js(&edge_handles(engine.region(), engine.config())),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn overlay_style(&self) -> Result<JsValue, JsValue> {
        to_js(&OverlayStyle::from_config(self.inner.config()))
    }

    /// Follow a resize of the displayed image.
    pub fn relayout(&mut self, display_width: f64, display_height: f64) -> Result<(), JsValue> {
        self.inner
            .relayout(display_width, display_height)
            .map_err(err)
    }

    /// Encode the committed region without closing the cropper.
    pub fn export(&self) -> Result<String, JsValue> {
        self.inner.export().map_err(err)
    }

    /// Export and deliver the result to `onCropComplete`, then close.
    ///
    /// A failed export throws and leaves the cropper open.
    pub fn confirm(&mut self) -> Result<(), JsValue> {
        self.inner.confirm().map_err(err)
    }

    /// Close and call `onCancel`. Returns `false` if already closed.
    pub fn cancel(&mut self) -> bool {
        self.inner.cancel()
    }
}

impl JsCropper {
    fn engine(&self) -> Option<&CropEngine> {
        if self.inner.is_closed() {
            return None;
        }
        self.inner.engine()
    }

    fn mask(&self) -> Option<MaskPath> {
        self.engine().map(|engine| {
            let dims = engine.dimensions();
            MaskPath::new(engine.region(), dims.display_width, dims.display_height)
        })
    }
}
