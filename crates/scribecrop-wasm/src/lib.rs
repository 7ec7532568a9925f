//! Scribecrop WASM - WebAssembly bindings for the scribecrop crop engine
//!
//! # Module Structure
//!
//! - `cropper` - The interactive `JsCropper` class
//! - `decode` - Photo decoding with EXIF orientation
//! - `export` - One-shot crop and encode for a known region
//! - `host` - JavaScript callbacks behind the core host traits
//! - `input` - DOM mouse/pointer/touch event normalization
//! - `types` - WASM-compatible wrapper types for image data and config
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@scribecrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsCropper({
//!   onCropComplete: (dataUri) => upload(dataUri),
//!   onCancel: () => closeDialog(),
//! });
//! cropper.load_image(new Uint8Array(await file.arrayBuffer()), img.width, img.height);
//! ```

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Layer;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;

mod cropper;
mod decode;
mod export;
mod host;
mod input;
mod types;

pub use cropper::JsCropper;
pub use decode::decode_image;
pub use export::{crop_box, crop_image};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load).
///
/// Routes panics and `tracing` output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(LevelFilter::INFO);

    // A host page may load the module more than once
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
