pub mod pasteboard;
pub mod view;

pub use view::OsDropTarget;
