pub mod data_object;
pub mod drop_target;

pub use drop_target::OsDropTarget;
