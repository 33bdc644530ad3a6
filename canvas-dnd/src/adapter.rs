use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dimensions::Point;
use crate::drag_drop::{DragDataProvider, DragEvent, DragWindow, DropOperation};
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropOutcome {
    pub operation: DropOperation,
    pub accepted: bool,
}

/// Platform-neutral drag session shared by the native drop targets.
///
/// The adapter is idle until `drag_enter` hands it a native data object and
/// active until `drag_leave` or `drop` releases it again. Every callback is
/// refused with [`Error::NoDragTarget`] while the window has no drag target,
/// without touching the session.
pub struct DragTargetAdapter<D> {
    window: Rc<dyn DragWindow>,
    data: RefCell<Option<D>>,
    position: Cell<Point>,
}

impl<D: DragDataProvider> DragTargetAdapter<D> {
    pub fn new(window: Rc<dyn DragWindow>) -> Self {
        Self {
            window,
            data: Default::default(),
            position: Default::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.data.borrow().is_some()
    }

    /// Last cursor position reported to the window.
    pub fn position(&self) -> Point {
        self.position.get()
    }

    pub fn drag_enter(&self, data: Option<D>, position: Point, supported: DropOperation) -> Result<DropOperation, Error> {
        log::trace!("drag_target::drag_enter");
        self.check_drag_target()?;

        let Some(data) = data else {
            self.data.take();
            return Err(Error::MissingData);
        };

        self.position.set(position);

        let mut event = DragEvent::new(self.window.as_ref(), supported, position, &data);
        self.window.notify_drag_enter(&mut event);
        let operation = event.drop_result();

        *self.data.borrow_mut() = Some(data);

        Ok(operation)
    }

    pub fn drag_over(&self, position: Point, supported: DropOperation) -> Result<DropOperation, Error> {
        log::trace!("drag_target::drag_over");
        self.check_drag_target()?;

        let session = self.data.borrow();
        let Some(data) = session.as_ref() else {
            log::warn!("Drag over without an active session");
            return Err(Error::NoSession);
        };

        self.position.set(position);

        let mut event = DragEvent::new(self.window.as_ref(), supported, position, data);
        self.window.notify_drag(&mut event);

        Ok(event.drop_result())
    }

    pub fn drag_leave(&self) -> Result<(), Error> {
        log::trace!("drag_target::drag_leave");
        self.check_drag_target()?;

        let Some(data) = self.data.take() else {
            log::warn!("Drag leave without an active session");
            return Err(Error::NoSession);
        };

        let mut event = DragEvent::new(self.window.as_ref(), DropOperation::empty(), self.position.get(), &data);
        self.window.notify_drag_leave(&mut event);

        Ok(())
    }

    pub fn drop(&self, data: Option<D>, position: Point, supported: DropOperation) -> Result<DropOutcome, Error> {
        log::trace!("drag_target::drop");
        self.check_drag_target()?;

        // The native side hands the data object over again; whatever was
        // captured on enter is released here either way.
        self.data.take();

        let Some(data) = data else {
            return Err(Error::MissingData);
        };

        self.position.set(position);

        let mut event = DragEvent::new(self.window.as_ref(), supported, position, &data);
        self.window.notify_drop(&mut event);

        Ok(DropOutcome {
            operation: event.drop_result(),
            accepted: event.accept_drop(),
        })
    }

    fn check_drag_target(&self) -> Result<(), Error> {
        if self.window.has_drag_target() {
            Ok(())
        } else {
            Err(Error::NoDragTarget)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::dimensions::Point;
    use crate::drag_drop::DropOperation;
    use crate::error::Error;
    use crate::test_util::{FakeTransfer, Notification, RecordingWindow};

    use super::{DragTargetAdapter, DropOutcome};

    fn adapter() -> (Rc<RecordingWindow>, DragTargetAdapter<FakeTransfer>) {
        let window = Rc::new(RecordingWindow::default());
        let adapter = DragTargetAdapter::new(window.clone());
        (window, adapter)
    }

    #[test]
    fn enter_over_over_drop() {
        let (window, adapter) = adapter();
        let data = FakeTransfer::with_paths(&["/a"]);
        let handle = data.handle();

        window.respond_with(DropOperation::MOVE);
        let operation = adapter.drag_enter(Some(data.clone()), Point::new(1, 1), DropOperation::ANY).unwrap();
        assert_eq!(operation, DropOperation::MOVE);
        assert!(adapter.is_active());

        adapter.drag_over(Point::new(2, 2), DropOperation::ANY).unwrap();
        adapter.drag_over(Point::new(3, 3), DropOperation::ANY).unwrap();
        assert_eq!(adapter.position(), Point::new(3, 3));

        window.accept(true);
        let outcome = adapter.drop(Some(data), Point::new(4, 4), DropOperation::ANY).unwrap();
        assert_eq!(outcome, DropOutcome { operation: DropOperation::MOVE, accepted: true });

        assert!(!adapter.is_active());
        assert_eq!(Rc::strong_count(&handle), 1);
        assert_eq!(window.notifications(), vec![
            Notification::Enter(Point::new(1, 1)),
            Notification::Drag(Point::new(2, 2)),
            Notification::Drag(Point::new(3, 3)),
            Notification::Drop(Point::new(4, 4)),
        ]);
    }

    #[test]
    fn enter_leave_skips_drop() {
        let (window, adapter) = adapter();
        let data = FakeTransfer::default();
        let handle = data.handle();

        adapter.drag_enter(Some(data), Point::new(5, 6), DropOperation::COPY).unwrap();
        adapter.drag_leave().unwrap();

        assert!(!adapter.is_active());
        assert_eq!(Rc::strong_count(&handle), 1);
        assert_eq!(window.notifications(), vec![
            Notification::Enter(Point::new(5, 6)),
            Notification::Leave(Point::new(5, 6)),
        ]);
    }

    #[test]
    fn leave_reports_no_operation() {
        let (window, adapter) = adapter();
        adapter.drag_enter(Some(FakeTransfer::default()), Point::default(), DropOperation::ANY).unwrap();
        adapter.drag_leave().unwrap();

        assert_eq!(window.last_supported(), Some(DropOperation::empty()));
    }

    #[test]
    fn event_carries_supported_operations_and_data() {
        let (window, adapter) = adapter();
        let data = FakeTransfer::with_paths(&["/x"]);

        adapter.drag_enter(Some(data), Point::default(), DropOperation::COPY | DropOperation::LINK).unwrap();

        assert_eq!(window.last_supported(), Some(DropOperation::COPY | DropOperation::LINK));
        assert_eq!(window.saw_paths(), Some(true));
    }

    #[test]
    fn default_result_is_copy() {
        let (_window, adapter) = adapter();
        let operation = adapter.drag_enter(Some(FakeTransfer::default()), Point::default(), DropOperation::ANY).unwrap();
        assert_eq!(operation, DropOperation::COPY);
    }

    #[test]
    fn no_drag_target_leaves_session_alone() {
        let (window, adapter) = adapter();
        adapter.drag_enter(Some(FakeTransfer::default()), Point::new(1, 1), DropOperation::ANY).unwrap();

        window.set_has_drag_target(false);
        let data = FakeTransfer::default();
        let handle = data.handle();

        assert!(matches!(adapter.drag_enter(Some(data.clone()), Point::new(9, 9), DropOperation::ANY), Err(Error::NoDragTarget)));
        assert!(matches!(adapter.drag_over(Point::new(9, 9), DropOperation::ANY), Err(Error::NoDragTarget)));
        assert!(matches!(adapter.drag_leave(), Err(Error::NoDragTarget)));
        assert!(matches!(adapter.drop(Some(data), Point::new(9, 9), DropOperation::ANY), Err(Error::NoDragTarget)));

        assert!(adapter.is_active());
        assert_eq!(adapter.position(), Point::new(1, 1));
        assert_eq!(Rc::strong_count(&handle), 1);
        assert_eq!(window.notifications().len(), 1);
    }

    #[test]
    fn missing_data_is_unexpected() {
        let (window, adapter) = adapter();

        assert!(matches!(adapter.drag_enter(None, Point::default(), DropOperation::ANY), Err(Error::MissingData)));
        assert!(!adapter.is_active());

        adapter.drag_enter(Some(FakeTransfer::default()), Point::default(), DropOperation::ANY).unwrap();
        assert!(matches!(adapter.drop(None, Point::default(), DropOperation::ANY), Err(Error::MissingData)));
        assert!(!adapter.is_active());
        assert_eq!(window.notifications().len(), 1);
    }

    #[test]
    fn over_and_leave_need_a_session() {
        let (window, adapter) = adapter();

        assert!(matches!(adapter.drag_over(Point::default(), DropOperation::ANY), Err(Error::NoSession)));
        assert!(matches!(adapter.drag_leave(), Err(Error::NoSession)));
        assert!(window.notifications().is_empty());
    }

    #[test]
    fn drop_without_enter_is_allowed() {
        let (window, adapter) = adapter();
        let data = FakeTransfer::with_paths(&["/only-drop"]);

        let outcome = adapter.drop(Some(data), Point::new(2, 3), DropOperation::LINK).unwrap();

        assert_eq!(outcome.operation, DropOperation::COPY);
        assert!(!outcome.accepted);
        assert!(window.saw_paths().unwrap());
    }
}
