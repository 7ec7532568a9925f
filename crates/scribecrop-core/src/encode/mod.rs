//! Encoding of the cropped result.
//!
//! The host receives the crop as a JPEG data URI, the same string a canvas
//! produces with `toDataURL("image/jpeg", quality)`.

mod data_uri;
mod jpeg;

pub use data_uri::{encode_data_uri, JPEG_DATA_URI_PREFIX};
pub use jpeg::{encode_jpeg, quality_from_factor, EncodeError};
