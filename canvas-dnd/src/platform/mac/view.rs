use std::ffi::{c_void, CString};
use std::ops::Deref;
use std::ptr::null_mut;
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicPtr, Ordering};

use objc2::rc::{Allocated, Retained};
use objc2::runtime::{AnyClass, Bool, ClassBuilder, ProtocolObject, Sel};
use objc2::{msg_send, sel, ClassType, Encode, Encoding, Message, RefEncode};
use objc2_app_kit::{NSAutoresizingMaskOptions, NSDragOperation, NSDraggingInfo, NSPasteboardTypeFileURL, NSPasteboardTypePNG, NSPasteboardTypeTIFF, NSView};
use objc2_foundation::NSArray;
use raw_window_handle::RawWindowHandle;
use uuid::Uuid;

use crate::adapter::DragTargetAdapter;
use crate::dimensions::Point;
use crate::drag_drop::{DragWindow, DropOperation};
use crate::drop_effect::appkit;
use crate::error::Error;
use crate::platform::interface::OsDropTargetInterface;

use super::pasteboard::PasteboardProvider;

type Adapter = DragTargetAdapter<PasteboardProvider>;

const ADAPTER_IVAR: &std::ffi::CStr = c"_adapter";

#[repr(transparent)]
#[derive(Default)]
struct AdapterPtr(AtomicPtr<c_void>);

unsafe impl Encode for AdapterPtr {
    const ENCODING: Encoding = Encoding::Atomic(&Encoding::Pointer(&Encoding::Void));
}

/// Transparent view laid over the host view that receives the
/// NSDraggingDestination callbacks.
pub struct DropTargetView {
    superclass: NSView,
}

unsafe impl RefEncode for DropTargetView {
    const ENCODING_REF: Encoding = NSView::ENCODING_REF;
}

unsafe impl Message for DropTargetView {}

impl DropTargetView {
    fn class() -> Result<&'static AnyClass, Error> {
        static CLASS: OnceLock<Option<&'static AnyClass>> = OnceLock::new();

        CLASS
            .get_or_init(Self::register_class)
            .ok_or_else(|| Error::PlatformError("Failed to register drop target view class".into()))
    }

    fn register_class() -> Option<&'static AnyClass> {
        // Several copies of this library can live in one process
        let class_name = CString::new(format!("canvas-dnd-DropTargetView-{}", Uuid::new_v4().simple())).ok()?;

        let mut builder = ClassBuilder::new(&class_name, NSView::class())?;
        builder.add_ivar::<AdapterPtr>(ADAPTER_IVAR);

        unsafe {
            // NSView
            builder.add_method(sel!(isFlipped), Self::is_flipped as unsafe extern "C" fn(_, _) -> _);

            // NSDraggingDestination
            builder.add_method(sel!(wantsPeriodicDraggingUpdates), Self::wants_periodic_dragging_updates as unsafe extern "C" fn(_, _) -> _);
            builder.add_method(sel!(draggingEntered:), Self::dragging_entered as unsafe extern "C" fn(_, _, _) -> _);
            builder.add_method(sel!(draggingUpdated:), Self::dragging_updated as unsafe extern "C" fn(_, _, _) -> _);
            builder.add_method(sel!(draggingExited:), Self::dragging_exited as unsafe extern "C" fn(_, _, _));
            builder.add_method(sel!(prepareForDragOperation:), Self::prepare_for_drag_operation as unsafe extern "C" fn(_, _, _) -> _);
            builder.add_method(sel!(performDragOperation:), Self::perform_drag_operation as unsafe extern "C" fn(_, _, _) -> _);
        }

        Some(builder.register())
    }

    fn adapter_ptr(&self) -> &AtomicPtr<c_void> {
        let ivar = self.class().instance_variable(ADAPTER_IVAR).expect("Drop target view without adapter ivar");
        let adapter_ptr: &AdapterPtr = unsafe { ivar.load(self) };
        &adapter_ptr.0
    }

    fn with_adapter<T>(&self, f: impl FnOnce(&Adapter) -> T) -> Option<T> {
        let adapter_ptr = self.adapter_ptr().load(Ordering::Acquire) as *const Adapter;
        if adapter_ptr.is_null() {
            return None;
        }

        Some(f(unsafe { &*adapter_ptr }))
    }

    fn drag_position(&self, sender: &ProtocolObject<dyn NSDraggingInfo>) -> Point {
        let location = unsafe { sender.draggingLocation() };
        let local = self.convertPoint_fromView(location, None);

        Point::new(local.x as i32, local.y as i32)
    }

    fn source_operations(sender: &ProtocolObject<dyn NSDraggingInfo>) -> DropOperation {
        appkit::from_native(unsafe { sender.draggingSourceOperationMask() }.0)
    }

    fn convert_drag_operation(result: Option<Result<DropOperation, Error>>) -> NSDragOperation {
        match result {
            Some(Ok(operation)) => NSDragOperation(appkit::to_native(operation)),
            Some(Err(error)) => {
                log::debug!("Drag refused: {error}");
                NSDragOperation::None
            }
            None => NSDragOperation::None,
        }
    }

    // NSView
    unsafe extern "C" fn is_flipped(&self, _cmd: Sel) -> Bool {
        Bool::YES
    }

    // NSDraggingDestination
    unsafe extern "C" fn wants_periodic_dragging_updates(&self, _cmd: Sel) -> Bool {
        Bool::NO
    }

    unsafe extern "C" fn dragging_entered(&self, _cmd: Sel, sender: &ProtocolObject<dyn NSDraggingInfo>) -> NSDragOperation {
        let position = self.drag_position(sender);
        let supported = Self::source_operations(sender);
        let data = PasteboardProvider::new(unsafe { sender.draggingPasteboard() });

        Self::convert_drag_operation(self.with_adapter(|adapter| adapter.drag_enter(Some(data), position, supported)))
    }

    unsafe extern "C" fn dragging_updated(&self, _cmd: Sel, sender: &ProtocolObject<dyn NSDraggingInfo>) -> NSDragOperation {
        let position = self.drag_position(sender);
        let supported = Self::source_operations(sender);

        Self::convert_drag_operation(self.with_adapter(|adapter| adapter.drag_over(position, supported)))
    }

    unsafe extern "C" fn dragging_exited(&self, _cmd: Sel, _sender: &ProtocolObject<dyn NSDraggingInfo>) {
        if let Some(Err(error)) = self.with_adapter(|adapter| adapter.drag_leave()) {
            log::debug!("Drag exit ignored: {error}");
        }
    }

    unsafe extern "C" fn prepare_for_drag_operation(&self, _cmd: Sel, _sender: &ProtocolObject<dyn NSDraggingInfo>) -> Bool {
        Bool::YES
    }

    unsafe extern "C" fn perform_drag_operation(&self, _cmd: Sel, sender: &ProtocolObject<dyn NSDraggingInfo>) -> Bool {
        let position = self.drag_position(sender);
        let supported = Self::source_operations(sender);
        let data = PasteboardProvider::new(unsafe { sender.draggingPasteboard() });

        match self.with_adapter(|adapter| adapter.drop(Some(data), position, supported)) {
            Some(Ok(outcome)) => Bool::new(outcome.accepted),
            Some(Err(error)) => {
                log::debug!("Drop refused: {error}");
                Bool::NO
            }
            None => Bool::NO,
        }
    }
}

impl Deref for DropTargetView {
    type Target = NSView;

    fn deref(&self) -> &Self::Target {
        &self.superclass
    }
}

pub struct OsDropTarget {
    view: Retained<DropTargetView>,
}

impl OsDropTargetInterface for OsDropTarget {
    fn register(window: Rc<dyn DragWindow>, window_handle: RawWindowHandle) -> Result<Self, Error> {
        let RawWindowHandle::AppKit(window_handle) = window_handle else {
            return Err(Error::PlatformError("Not an AppKit window".into()));
        };

        let class = DropTargetView::class()?;
        let parent_view: &NSView = unsafe { window_handle.ns_view.cast::<NSView>().as_ref() };

        let view = unsafe {
            let view: Allocated<DropTargetView> = msg_send![class, alloc];
            let view: Retained<DropTargetView> = msg_send![view, initWithFrame: parent_view.bounds()];
            view
        };

        view.setAutoresizingMask(NSAutoresizingMaskOptions::ViewWidthSizable | NSAutoresizingMaskOptions::ViewHeightSizable);

        let dragged_types = unsafe { NSArray::from_slice(&[NSPasteboardTypeFileURL, NSPasteboardTypePNG, NSPasteboardTypeTIFF]) };
        view.registerForDraggedTypes(&dragged_types);

        let adapter = Box::new(Adapter::new(window));
        view.adapter_ptr().store(Box::into_raw(adapter) as _, Ordering::Release);

        parent_view.addSubview(&view);

        Ok(Self {
            view,
        })
    }
}

impl Drop for OsDropTarget {
    fn drop(&mut self) {
        self.view.unregisterDraggedTypes();
        self.view.removeFromSuperview();

        let adapter_ptr = self.view.adapter_ptr().swap(null_mut(), Ordering::AcqRel) as *mut Adapter;
        if !adapter_ptr.is_null() {
            drop(unsafe { Box::from_raw(adapter_ptr) });
        }
    }
}
