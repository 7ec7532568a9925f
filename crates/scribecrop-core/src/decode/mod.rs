//! Decoding of the photo being cropped.
//!
//! The cropper measures the region against the image as the browser lays it
//! out, so decoding must produce the same natural size: EXIF orientation is
//! applied before anything else looks at the pixels.
//!
//! Only JPEG and PNG are enabled. Camera uploads arrive as JPEG, screenshots
//! and scans as PNG.

mod source;
mod types;

pub use source::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};

#[cfg(test)]
pub(crate) use source::fixtures;
