//! Scribecrop Core - photo cropping engine
//!
//! Lets a user pick the part of a photographed page to keep (a free
//! four-corner quadrilateral or an axis-aligned rectangle), then extracts that
//! part from the full-resolution photo as a size-capped JPEG for OCR upload.
//!
//! # Module Structure
//!
//! - `geometry` - Points, bounds, quads and rectangles in display space
//! - `interaction` - Pointer normalization and the drag state machine
//! - `projection` - Display/natural mapping and overlay geometry
//! - `decode` - JPEG/PNG decoding with EXIF orientation
//! - `export` - Bounding-box crop, downscale and quad clip
//! - `encode` - JPEG and data URI encoding
//! - `cropper` - Lifecycle, host callbacks and scroll lock ownership

pub mod config;
pub mod cropper;
pub mod decode;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod interaction;
pub mod projection;

pub use config::CropperConfig;
pub use cropper::{Cropper, CropperError, CropperHost, ImageState, Outcome};
pub use decode::{decode_image, DecodeError, DecodedImage, Orientation};
pub use encode::{encode_data_uri, encode_jpeg, EncodeError};
pub use export::{export_region, natural_crop_box, CropBox, CroppedImage, ExportError};
pub use geometry::{
    Bounds, CropRegion, CropShape, Edge, GeometryError, ImageDimensions, Point, Quad, Rect,
};
pub use interaction::{
    CropEngine, DeviceInput, Handle, InteractionState, PointerEvent, PointerInput, ScrollLock,
    ScrollLockGuard,
};
pub use projection::{
    edge_handles, polygon_points, EdgeHandleLayout, FillRule, MaskPath, OverlayStyle, Projection,
};
