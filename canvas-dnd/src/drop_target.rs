use std::rc::Rc;

use raw_window_handle::HasWindowHandle;

use crate::drag_drop::DragWindow;
use crate::error::Error;
use crate::platform::interface::OsDropTargetInterface;
use crate::platform::OsDropTarget;

/// Keeps a window registered as a native drop target.
///
/// Dropping the value unregisters the window.
pub struct DropTarget {
    _os_drop_target: OsDropTarget,
}

impl DropTarget {
    pub fn register<W>(window: Rc<W>) -> Result<Self, Error>
    where
        W: DragWindow + HasWindowHandle + 'static,
    {
        let window_handle = window.window_handle()?.as_raw();
        let os_drop_target = OsDropTarget::register(window, window_handle)?;

        Ok(Self {
            _os_drop_target: os_drop_target,
        })
    }
}
