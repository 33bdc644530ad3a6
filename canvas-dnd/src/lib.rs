pub mod adapter;
pub mod clipboard_format;
pub mod codec;
pub mod dimensions;
pub mod drag_drop;
pub mod drop_effect;
pub mod error;
pub mod pixel_format;
pub mod surface;
pub mod window;

#[cfg(any(target_os="macos", target_os="windows"))]
pub mod drop_target;

pub use adapter::{DragTargetAdapter, DropOutcome};
pub use dimensions::{Point, Rect, Size};
pub use drag_drop::{DragDataItemType, DragDataProvider, DragEvent, DragTarget, DragWindow, DropOperation};
pub use error::Error;
pub use pixel_format::{infer_surface_format, BitmapLayout};
pub use surface::{Color, PixelAlpha, Surface, SurfaceFormat, SurfaceRef};
pub use window::DragTargetSlot;

#[cfg(any(target_os="macos", target_os="windows"))]
pub use drop_target::DropTarget;

// Re-exports
pub use raw_window_handle;

mod platform;

#[cfg(test)]
mod test_util;
