use std::path::PathBuf;

use bitflags::bitflags;

use crate::dimensions::Point;
use crate::error::Error;
use crate::surface::SurfaceRef;

bitflags! {
    /// Operations a drag source allows or a drop target performs. The empty
    /// set means no operation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DropOperation: u32 {
        const COPY = 0b001;
        const MOVE = 0b010;
        const LINK = 0b100;
        const ANY  = Self::COPY.bits() | Self::MOVE.bits() | Self::LINK.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragDataItemType {
    Paths,
    Image,
}

/// Read access to the payload of a drag in progress.
pub trait DragDataProvider {
    /// Dragged file paths, in the order the source listed them.
    fn paths(&self) -> Vec<PathBuf>;

    /// The best image representation, or `None` if the drag carries no image.
    fn image(&self) -> Result<Option<SurfaceRef>, Error>;

    fn contains(&self, item_type: DragDataItemType) -> bool;
}

pub struct DragEvent<'a> {
    target: &'a dyn DragWindow,
    supported_operations: DropOperation,
    drop_result: DropOperation,
    accept_drop: bool,
    position: Point,
    data_provider: &'a dyn DragDataProvider,
}

impl<'a> DragEvent<'a> {
    pub fn new(
        target: &'a dyn DragWindow,
        supported_operations: DropOperation,
        position: Point,
        data_provider: &'a dyn DragDataProvider,
    ) -> Self {
        Self {
            target,
            supported_operations,
            drop_result: DropOperation::COPY,
            accept_drop: false,
            position,
            data_provider,
        }
    }

    pub fn target(&self) -> &'a dyn DragWindow {
        self.target
    }

    /// Operations the drag source allows.
    pub fn supported_operations(&self) -> DropOperation {
        self.supported_operations
    }

    pub fn source_supports(&self, operation: DropOperation) -> bool {
        self.supported_operations.contains(operation)
    }

    pub fn drop_result(&self) -> DropOperation {
        self.drop_result
    }

    /// The operation that will happen if the data is dropped here. Pass a
    /// single operation, or an empty set to refuse the drop.
    pub fn set_drop_result(&mut self, operation: DropOperation) {
        self.drop_result = operation;
    }

    pub fn accept_drop(&self) -> bool {
        self.accept_drop
    }

    /// Set when the dropped data was taken by the target.
    pub fn set_accept_drop(&mut self, accept: bool) {
        self.accept_drop = accept;
    }

    /// Cursor position in window coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn data_provider(&self) -> &'a dyn DragDataProvider {
        self.data_provider
    }
}

/// Application-side handler for drags over a window.
pub trait DragTarget {
    /// A drag entered the window. Set the drop result to the operation a
    /// drop would perform.
    fn drag_enter(&mut self, _event: &mut DragEvent) {}
    fn drag(&mut self, _event: &mut DragEvent) {}
    fn drag_leave(&mut self, _event: &mut DragEvent) {}
    fn drop(&mut self, _event: &mut DragEvent) {}
}

/// The window half of the drag-and-drop contract.
pub trait DragWindow {
    fn has_drag_target(&self) -> bool;
    fn notify_drag_enter(&self, event: &mut DragEvent);
    fn notify_drag(&self, event: &mut DragEvent);
    fn notify_drag_leave(&self, event: &mut DragEvent);
    fn notify_drop(&self, event: &mut DragEvent);
}
