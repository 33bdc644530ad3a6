use std::rc::Rc;

use raw_window_handle::RawWindowHandle;

use crate::drag_drop::DragWindow;
use crate::error::Error;

/// Native drop target registration, one implementation per platform.
pub(crate) trait OsDropTargetInterface: Sized {
    /// Starts receiving native drag callbacks for `window_handle` and
    /// forwards them to `window` until the registration is dropped.
    fn register(window: Rc<dyn DragWindow>, window_handle: RawWindowHandle) -> Result<Self, Error>;
}
