//! WASM-compatible wrapper types.

use scribecrop_core::decode::DecodedImage;
use scribecrop_core::CropperConfig;
use wasm_bindgen::prelude::*;

/// A decoded crop source held in WASM memory.
///
/// Decode once with `decode_image`, then hand the same object to
/// `JsCropper.load_decoded` or `crop_image` to avoid decoding twice.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Wrap row-major RGB pixels (3 bytes per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Copy of the RGB pixels as a `Uint8Array`.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Read a `CropperConfig` from a plain JS object. `undefined` and `null` give
/// the defaults; missing fields fall back individually.
pub(crate) fn config_from_js(value: JsValue) -> Result<CropperConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropperConfig::default());
    }
    serde_wasm_bindgen::from_value::<CropperConfig>(value)
        .map(|config| config.validated())
        .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {e}")))
}

pub(crate) fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_config_defaults_from_undefined() {
        let config = config_from_js(JsValue::UNDEFINED).unwrap();
        assert_eq!(config, CropperConfig::default());
    }

    #[wasm_bindgen_test]
    fn test_config_partial_object() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"shape".into(), &"rect".into()).unwrap();
        js_sys::Reflect::set(&obj, &"max_dimension".into(), &JsValue::from(512)).unwrap();

        let config = config_from_js(obj.into()).unwrap();
        assert_eq!(config.shape, scribecrop_core::CropShape::Rect);
        assert_eq!(config.max_dimension, 512);
        assert_eq!(config.padding, 10.0);
    }

    #[wasm_bindgen_test]
    fn test_config_rejects_wrong_types() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"padding".into(), &"wide".into()).unwrap();
        assert!(config_from_js(obj.into()).is_err());
    }
}
