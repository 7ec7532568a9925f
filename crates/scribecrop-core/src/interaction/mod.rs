//! Pointer interaction: input normalization, the drag state machine and
//! scroll suppression while the cropper is mounted.

mod engine;
mod input;
mod scroll_lock;

pub use engine::{CropEngine, DragMode, DragSession, Handle, InteractionState};
pub use input::{DeviceInput, PointerEvent, PointerInput, TouchPoint};
pub use scroll_lock::{NoopScrollLock, ScrollLock, ScrollLockGuard};

#[cfg(test)]
pub(crate) use scroll_lock::testing;
