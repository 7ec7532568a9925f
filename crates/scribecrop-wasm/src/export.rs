//! Stateless export bindings.
//!
//! For hosts that keep their own crop region (for example from a previous
//! session) and only need the final encoding step.

use crate::types::{config_from_js, to_js, JsDecodedImage};
use scribecrop_core::{export_region, natural_crop_box, CropRegion, ImageDimensions};
use wasm_bindgen::prelude::*;

fn region_from_js(region: JsValue) -> Result<CropRegion, JsValue> {
    serde_wasm_bindgen::from_value(region)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop region: {e}")))
}

fn err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Crop `image` to `region` and encode the result as a JPEG data URI.
///
/// # Arguments
///
/// * `image` - Decoded source; its size is the natural size
/// * `region` - `{ kind: "quad", corners: [...] }` or
///   `{ kind: "rect", x, y, width, height }` in display coordinates
/// * `display_width`, `display_height` - Size the region was drawn at
/// * `config` - Optional cropper config (`max_dimension`, `jpeg_quality`, ...)
///
/// # Example (TypeScript)
///
/// ```typescript
/// const uri = crop_image(image, { kind: 'rect', x: 40, y: 30, width: 320, height: 240 }, 400, 300);
/// ```
#[wasm_bindgen]
pub fn crop_image(
    image: &JsDecodedImage,
    region: JsValue,
    display_width: f64,
    display_height: f64,
    config: JsValue,
) -> Result<String, JsValue> {
    let config = config_from_js(config)?;
    let region = region_from_js(region)?;
    let source = image.to_decoded();
    let dims =
        ImageDimensions::new(display_width, display_height, source.width, source.height)
            .map_err(err)?;

    export_region(&source, &region, &dims, &config)
        .and_then(|cropped| cropped.to_data_uri(config.jpeg_quality))
        .map_err(err)
}

/// Natural-pixel bounding box and output size `crop_image` would use.
#[wasm_bindgen]
pub fn crop_box(
    region: JsValue,
    display_width: f64,
    display_height: f64,
    natural_width: u32,
    natural_height: u32,
    max_dimension: u32,
) -> Result<JsValue, JsValue> {
    let region = region_from_js(region)?;
    let dims = ImageDimensions::new(display_width, display_height, natural_width, natural_height)
        .map_err(err)?;
    let crop = natural_crop_box(&region, &dims, max_dimension).map_err(err)?;
    to_js(&crop)
}
