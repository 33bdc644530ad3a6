use std::cell::RefCell;

use crate::drag_drop::{DragEvent, DragTarget, DragWindow};

/// Holds the application's drag target for a window and dispatches
/// notifications to it.
#[derive(Default)]
pub struct DragTargetSlot {
    target: RefCell<Option<Box<dyn DragTarget>>>,
}

impl DragTargetSlot {
    pub fn new(target: Option<Box<dyn DragTarget>>) -> Self {
        Self {
            target: RefCell::new(target),
        }
    }

    /// Replaces the current target. Passing `None` makes the window refuse
    /// drags.
    pub fn set_drag_target(&self, target: Option<Box<dyn DragTarget>>) -> Option<Box<dyn DragTarget>> {
        self.target.replace(target)
    }

    fn with_target(&self, f: impl FnOnce(&mut dyn DragTarget)) {
        let Ok(mut slot) = self.target.try_borrow_mut() else {
            log::warn!("Drag notification while the drag target is busy");
            return;
        };

        if let Some(target) = slot.as_mut() {
            f(&mut **target);
        }
    }
}

impl DragWindow for DragTargetSlot {
    fn has_drag_target(&self) -> bool {
        self.target
            .try_borrow()
            .map(|target| target.is_some())
            .unwrap_or(true)
    }

    fn notify_drag_enter(&self, event: &mut DragEvent) {
        self.with_target(|target| target.drag_enter(event));
    }

    fn notify_drag(&self, event: &mut DragEvent) {
        self.with_target(|target| target.drag(event));
    }

    fn notify_drag_leave(&self, event: &mut DragEvent) {
        self.with_target(|target| target.drag_leave(event));
    }

    fn notify_drop(&self, event: &mut DragEvent) {
        self.with_target(|target| target.drop(event));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dimensions::{Point, Rect};
    use crate::drag_drop::{DragDataItemType, DragEvent, DragTarget, DragWindow, DropOperation};
    use crate::test_util::FakeTransfer;

    use super::DragTargetSlot;

    /// Accepts copies inside a drop zone and keeps the dropped paths.
    struct DropZone {
        zone: Rect,
        dropped: Rc<RefCell<Vec<String>>>,
    }

    impl DragTarget for DropZone {
        fn drag_enter(&mut self, event: &mut DragEvent) {
            if self.zone.contains(event.position()) && event.source_supports(DropOperation::COPY) {
                event.set_drop_result(DropOperation::COPY);
            } else {
                event.set_drop_result(DropOperation::empty());
            }
        }

        fn drop(&mut self, event: &mut DragEvent) {
            event.set_accept_drop(self.zone.contains(event.position()));

            if event.accept_drop() && event.data_provider().contains(DragDataItemType::Paths) {
                let paths = event.data_provider().paths();
                self.dropped.borrow_mut().extend(paths.iter().map(|path| path.display().to_string()));
            }
        }
    }

    fn drop_zone_slot() -> (DragTargetSlot, Rc<RefCell<Vec<String>>>) {
        let dropped = Rc::new(RefCell::new(Vec::new()));
        let slot = DragTargetSlot::new(Some(Box::new(DropZone {
            zone: Rect::new(10, 10, 100, 100),
            dropped: dropped.clone(),
        })));

        (slot, dropped)
    }

    #[test]
    fn empty_slot_has_no_target() {
        let slot = DragTargetSlot::default();
        assert!(!slot.has_drag_target());
    }

    #[test]
    fn set_and_clear_target() {
        let (slot, _) = drop_zone_slot();
        assert!(slot.has_drag_target());

        assert!(slot.set_drag_target(None).is_some());
        assert!(!slot.has_drag_target());
    }

    #[test]
    fn forwards_enter_to_target() {
        let (slot, _) = drop_zone_slot();
        let data = FakeTransfer::default();

        let mut inside = DragEvent::new(&slot, DropOperation::ANY, Point::new(50, 50), &data);
        slot.notify_drag_enter(&mut inside);
        assert_eq!(inside.drop_result(), DropOperation::COPY);

        let mut outside = DragEvent::new(&slot, DropOperation::ANY, Point::new(5, 5), &data);
        slot.notify_drag_enter(&mut outside);
        assert_eq!(outside.drop_result(), DropOperation::empty());

        let mut move_only = DragEvent::new(&slot, DropOperation::MOVE, Point::new(50, 50), &data);
        slot.notify_drag_enter(&mut move_only);
        assert_eq!(move_only.drop_result(), DropOperation::empty());
    }

    #[test]
    fn forwards_drop_to_target() {
        let (slot, dropped) = drop_zone_slot();
        let data = FakeTransfer::with_paths(&["/tmp/a.png", "/tmp/b.txt"]);

        let mut event = DragEvent::new(&slot, DropOperation::COPY, Point::new(20, 20), &data);
        slot.notify_drop(&mut event);

        assert!(event.accept_drop());
        assert_eq!(*dropped.borrow(), vec!["/tmp/a.png".to_string(), "/tmp/b.txt".to_string()]);
    }

    #[test]
    fn empty_slot_ignores_notifications() {
        let slot = DragTargetSlot::default();
        let data = FakeTransfer::default();

        let mut event = DragEvent::new(&slot, DropOperation::COPY, Point::default(), &data);
        slot.notify_drop(&mut event);
        assert!(!event.accept_drop());
    }
}
