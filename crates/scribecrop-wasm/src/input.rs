//! DOM event normalization.
//!
//! Mouse, pointer and touch events (or plain objects shaped like them) are
//! read with `Reflect` and reduced to a `DeviceInput`, so the engine only
//! ever sees a `PointerInput`.

use js_sys::Reflect;
use scribecrop_core::interaction::TouchPoint;
use scribecrop_core::{DeviceInput, PointerInput};
use wasm_bindgen::prelude::*;

fn get(obj: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn number(obj: &JsValue, key: &str) -> Option<f64> {
    get(obj, key).and_then(|v| v.as_f64())
}

pub(crate) fn device_input(event: &JsValue) -> Option<DeviceInput> {
    if let Some(touches) = get(event, "touches") {
        let len = number(&touches, "length").unwrap_or(0.0) as u32;
        let touches = (0..len)
            .filter_map(|i| {
                let touch = Reflect::get_u32(&touches, i).ok()?;
                Some(TouchPoint {
                    client_x: number(&touch, "clientX")?,
                    client_y: number(&touch, "clientY")?,
                })
            })
            .collect();
        return Some(DeviceInput::Touch { touches });
    }

    let client_x = number(event, "clientX")?;
    let client_y = number(event, "clientY")?;
    let input = match get(event, "pointerType").and_then(|v| v.as_string()).as_deref() {
        Some("pen") => DeviceInput::Pen { client_x, client_y },
        Some(_) => DeviceInput::Pointer { client_x, client_y },
        None => DeviceInput::Mouse { client_x, client_y },
    };
    Some(input)
}

/// Position of a DOM event, or `None` for events that carry none (touchend).
pub(crate) fn pointer_input(event: &JsValue) -> Option<PointerInput> {
    device_input(event).and_then(|input| input.normalize())
}
