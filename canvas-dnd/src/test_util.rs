use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use crate::dimensions::Point;
use crate::drag_drop::{DragDataItemType, DragDataProvider, DragEvent, DragWindow, DropOperation};
use crate::error::Error;
use crate::surface::SurfaceRef;

/// In-memory stand-in for a native data object.
#[derive(Clone, Default)]
pub struct FakeTransfer {
    paths: Vec<PathBuf>,
    image: Option<SurfaceRef>,
    handle: Rc<()>,
}

impl FakeTransfer {
    pub fn with_paths(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(PathBuf::from).collect(),
            ..Default::default()
        }
    }

    /// Shared token; its strong count drops back to one once every copy of
    /// this transfer is released.
    pub fn handle(&self) -> Rc<()> {
        self.handle.clone()
    }
}

impl DragDataProvider for FakeTransfer {
    fn paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }

    fn image(&self) -> Result<Option<SurfaceRef>, Error> {
        Ok(self.image.clone())
    }

    fn contains(&self, item_type: DragDataItemType) -> bool {
        match item_type {
            DragDataItemType::Paths => !self.paths.is_empty(),
            DragDataItemType::Image => self.image.is_some(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Enter(Point),
    Drag(Point),
    Leave(Point),
    Drop(Point),
}

pub struct RecordingWindow {
    has_drag_target: Cell<bool>,
    response: Cell<Option<DropOperation>>,
    accept: Cell<bool>,
    last_supported: Cell<Option<DropOperation>>,
    saw_paths: Cell<Option<bool>>,
    notifications: RefCell<Vec<Notification>>,
}

impl Default for RecordingWindow {
    fn default() -> Self {
        Self {
            has_drag_target: Cell::new(true),
            response: Default::default(),
            accept: Default::default(),
            last_supported: Default::default(),
            saw_paths: Default::default(),
            notifications: Default::default(),
        }
    }
}

impl RecordingWindow {
    pub fn set_has_drag_target(&self, has_drag_target: bool) {
        self.has_drag_target.set(has_drag_target);
    }

    pub fn respond_with(&self, operation: DropOperation) {
        self.response.set(Some(operation));
    }

    pub fn accept(&self, accept: bool) {
        self.accept.set(accept);
    }

    pub fn last_supported(&self) -> Option<DropOperation> {
        self.last_supported.get()
    }

    /// Whether the provider of the last event reported paths.
    pub fn saw_paths(&self) -> Option<bool> {
        self.saw_paths.get()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    fn record(&self, event: &mut DragEvent, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
        self.last_supported.set(Some(event.supported_operations()));
        self.saw_paths.set(Some(event.data_provider().contains(DragDataItemType::Paths)));

        if let Some(operation) = self.response.get() {
            event.set_drop_result(operation);
        }
        if self.accept.get() {
            event.set_accept_drop(true);
        }
    }
}

impl DragWindow for RecordingWindow {
    fn has_drag_target(&self) -> bool {
        self.has_drag_target.get()
    }

    fn notify_drag_enter(&self, event: &mut DragEvent) {
        let position = event.position();
        self.record(event, Notification::Enter(position));
    }

    fn notify_drag(&self, event: &mut DragEvent) {
        let position = event.position();
        self.record(event, Notification::Drag(position));
    }

    fn notify_drag_leave(&self, event: &mut DragEvent) {
        let position = event.position();
        self.record(event, Notification::Leave(position));
    }

    fn notify_drop(&self, event: &mut DragEvent) {
        let position = event.position();
        self.record(event, Notification::Drop(position));
    }
}
