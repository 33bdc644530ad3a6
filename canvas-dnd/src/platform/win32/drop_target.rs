use std::rc::Rc;

use raw_window_handle::RawWindowHandle;
use windows::core::implement;
use windows::Win32::Foundation::{E_FAIL, E_INVALIDARG, E_NOTIMPL, E_UNEXPECTED, HWND, POINT, POINTL};
use windows::Win32::Graphics::Gdi::ScreenToClient;
use windows::Win32::System::Com::IDataObject;
use windows::Win32::System::Ole::{IDropTarget, IDropTarget_Impl, OleInitialize, OleUninitialize, RegisterDragDrop, RevokeDragDrop, DROPEFFECT, DROPEFFECT_NONE};
use windows::Win32::System::SystemServices::MODIFIERKEYS_FLAGS;

use crate::adapter::DragTargetAdapter;
use crate::dimensions::Point;
use crate::drag_drop::{DragWindow, DropOperation};
use crate::drop_effect::win32;
use crate::error::Error;
use crate::platform::interface::OsDropTargetInterface;

use super::data_object::DataObjectProvider;

#[implement(IDropTarget)]
struct DropTargetHandler {
    hwnd: HWND,
    adapter: DragTargetAdapter<DataObjectProvider>,
}

impl DropTargetHandler {
    fn position(&self, pt: &POINTL) -> Point {
        let mut point = POINT { x: pt.x, y: pt.y };
        let _ = unsafe { ScreenToClient(self.hwnd, &mut point) };

        Point::new(point.x, point.y)
    }
}

fn supported_operations(pdweffect: *mut DROPEFFECT) -> windows::core::Result<DropOperation> {
    if pdweffect.is_null() {
        return Err(E_INVALIDARG.into());
    }

    Ok(win32::from_native(unsafe { (*pdweffect).0 }))
}

/// Writes the outcome of a callback back to the effect pointer.
fn finish(pdweffect: *mut DROPEFFECT, result: Result<DropOperation, Error>) -> windows::core::Result<()> {
    match result {
        Ok(operation) => {
            unsafe { *pdweffect = DROPEFFECT(win32::to_native(operation)) };
            Ok(())
        }
        Err(error) => {
            unsafe { *pdweffect = DROPEFFECT_NONE };
            Err(to_windows_error(error))
        }
    }
}

fn to_windows_error(error: Error) -> windows::core::Error {
    match error {
        Error::NoDragTarget => E_NOTIMPL.into(),
        Error::NoSession | Error::MissingData => E_UNEXPECTED.into(),
        Error::WindowsError(error) => error,
        error => {
            log::error!("Drop target error: {error}");
            E_FAIL.into()
        }
    }
}

#[allow(non_snake_case)]
impl IDropTarget_Impl for DropTargetHandler_Impl {
    fn DragEnter(&self, pdataobj: Option<&IDataObject>, _grfkeystate: MODIFIERKEYS_FLAGS, pt: &POINTL, pdweffect: *mut DROPEFFECT) -> windows::core::Result<()> {
        let supported = supported_operations(pdweffect)?;
        let data = pdataobj.cloned().map(DataObjectProvider::new);

        let result = self.adapter.drag_enter(data, self.position(pt), supported);
        finish(pdweffect, result)
    }

    fn DragOver(&self, _grfkeystate: MODIFIERKEYS_FLAGS, pt: &POINTL, pdweffect: *mut DROPEFFECT) -> windows::core::Result<()> {
        let supported = supported_operations(pdweffect)?;

        let result = self.adapter.drag_over(self.position(pt), supported);
        finish(pdweffect, result)
    }

    fn DragLeave(&self) -> windows::core::Result<()> {
        self.adapter.drag_leave().map_err(to_windows_error)
    }

    fn Drop(&self, pdataobj: Option<&IDataObject>, _grfkeystate: MODIFIERKEYS_FLAGS, pt: &POINTL, pdweffect: *mut DROPEFFECT) -> windows::core::Result<()> {
        let supported = supported_operations(pdweffect)?;
        let data = pdataobj.cloned().map(DataObjectProvider::new);

        let result = self.adapter
            .drop(data, self.position(pt), supported)
            .map(|outcome| outcome.operation);
        finish(pdweffect, result)
    }
}

pub struct OsDropTarget {
    hwnd: HWND,
    _drop_target: IDropTarget,
}

impl OsDropTargetInterface for OsDropTarget {
    fn register(window: Rc<dyn DragWindow>, window_handle: RawWindowHandle) -> Result<Self, Error> {
        let RawWindowHandle::Win32(window_handle) = window_handle else {
            return Err(Error::PlatformError("Not a Win32 window".into()));
        };

        let hwnd = HWND(window_handle.hwnd.get() as _);

        let drop_target: IDropTarget = DropTargetHandler {
            hwnd,
            adapter: DragTargetAdapter::new(window),
        }.into();

        unsafe {
            OleInitialize(None)?;

            if let Err(error) = RegisterDragDrop(hwnd, &drop_target) {
                OleUninitialize();
                return Err(error.into());
            }
        }

        Ok(Self {
            hwnd,
            _drop_target: drop_target,
        })
    }
}

impl Drop for OsDropTarget {
    fn drop(&mut self) {
        unsafe {
            if let Err(error) = RevokeDragDrop(self.hwnd) {
                log::warn!("Failed to revoke drop target: {error}");
            }

            OleUninitialize();
        }
    }
}
