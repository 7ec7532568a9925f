//! JavaScript callbacks behind the core host traits.
//!
//! The host passes a single object:
//!
//! ```typescript
//! {
//!   onCropComplete: (dataUri: string) => void,
//!   onCancel: () => void,
//!   lockScroll?: () => void,
//!   unlockScroll?: () => void,
//! }
//! ```
//!
//! Exceptions thrown by a callback are logged to the console and otherwise
//! swallowed; the cropper has already reached its outcome by then.

use js_sys::{Function, Reflect};
use scribecrop_core::{CropperHost, ScrollLock};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub(crate) struct JsHost {
    on_crop_complete: Function,
    on_cancel: Function,
}

/// Page scroll suppression supplied by the host page.
pub(crate) struct JsScrollLock {
    lock: Option<Function>,
    unlock: Option<Function>,
}

pub(crate) fn from_callbacks(callbacks: &JsValue) -> Result<(JsHost, JsScrollLock), JsValue> {
    if !callbacks.is_object() {
        return Err(JsValue::from_str("Cropper callbacks must be an object"));
    }
    let host = JsHost {
        on_crop_complete: required(callbacks, "onCropComplete")?,
        on_cancel: required(callbacks, "onCancel")?,
    };
    let lock = JsScrollLock {
        lock: optional(callbacks, "lockScroll"),
        unlock: optional(callbacks, "unlockScroll"),
    };
    Ok((host, lock))
}

fn required(obj: &JsValue, name: &str) -> Result<Function, JsValue> {
    optional(obj, name).ok_or_else(|| JsValue::from_str(&format!("`{name}` must be a function")))
}

fn optional(obj: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn report(name: &str, result: Result<JsValue, JsValue>) {
    if let Err(err) = result {
        tracing::error!(callback = name, "host callback threw");
        web_sys::console::error_2(&JsValue::from_str(&format!("{name} threw")), &err);
    }
}

impl CropperHost for JsHost {
    fn on_crop_complete(&mut self, data_uri: String) {
        let result = self
            .on_crop_complete
            .call1(&JsValue::NULL, &JsValue::from_str(&data_uri));
        report("onCropComplete", result);
    }

    fn on_cancel(&mut self) {
        report("onCancel", self.on_cancel.call0(&JsValue::NULL));
    }
}

impl ScrollLock for JsScrollLock {
    fn lock(&mut self) {
        if let Some(f) = &self.lock {
            report("lockScroll", f.call0(&JsValue::NULL));
        }
    }

    fn unlock(&mut self) {
        if let Some(f) = &self.unlock {
            report("unlockScroll", f.call0(&JsValue::NULL));
        }
    }
}
