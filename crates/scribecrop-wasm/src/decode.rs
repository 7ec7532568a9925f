//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@scribecrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsDecodedImage;
use scribecrop_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG photo from bytes.
///
/// EXIF orientation is applied, so the returned size is the size the photo
/// is displayed at (a portrait phone shot stays portrait).
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image, the file is
/// truncated or corrupted, or the image has no pixels.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
