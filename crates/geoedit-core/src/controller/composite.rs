use super::Controller;
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::error::{EditError, EditResult};
use crate::evented::{ControllerEvent, EventedSupport};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::view::{Cursor, View};

struct Child {
    controller: Box<dyn Controller>,
    /// Set once the child asked to be deactivated; cleared on activation.
    skipped: bool,
}

/// Fallback chain: children see an event in order until one handles it or
/// requests finish.
#[derive(Default)]
pub struct CompositeController {
    children: Vec<Child>,
    active: bool,
    events: EventedSupport<ControllerEvent>,
}

impl CompositeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain built from `controllers` in order.
    pub fn with_controllers(controllers: Vec<Box<dyn Controller>>) -> Self {
        let mut composite = Self::new();
        composite.children.extend(controllers.into_iter().map(|controller| Child {
            controller,
            skipped: false,
        }));
        composite
    }

    fn ensure_inactive(&self) -> EditResult<()> {
        if self.active {
            Err(EditError::ControllerActive(
                "cannot change the children of an active composite controller".into(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn append_controller(&mut self, controller: Box<dyn Controller>) -> EditResult<()> {
        self.ensure_inactive()?;
        self.children.push(Child {
            controller,
            skipped: false,
        });
        Ok(())
    }

    pub fn prepend_controller(&mut self, controller: Box<dyn Controller>) -> EditResult<()> {
        self.ensure_inactive()?;
        self.children.insert(
            0,
            Child {
                controller,
                skipped: false,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Re-emit everything the children emitted.
    fn bubble(&mut self) {
        for child in &mut self.children {
            for event in child.controller.events().take_pending() {
                self.events.emit(event);
            }
        }
    }

    fn dispatch(
        &mut self,
        mut send: impl FnMut(&mut dyn Controller) -> HandleEventResult,
    ) -> HandleEventResult {
        let mut result = HandleEventResult::IGNORED;
        for (index, child) in self.children.iter_mut().enumerate() {
            if child.skipped {
                continue;
            }
            let child_result = send(child.controller.as_mut());
            if child_result.is_request_deactivation() {
                log::debug!("Composite child {index} skipped until reactivation");
                child.skipped = true;
            }
            result = child_result.clear_request_deactivation();
            if result.is_handled() || result.is_request_finish() {
                break;
            }
        }
        self.bubble();
        result
    }
}

impl Controller for CompositeController {
    fn on_activate(&mut self, view: &mut View) -> EditResult<()> {
        for child in &mut self.children {
            child.skipped = false;
            child.controller.on_activate(view)?;
        }
        self.active = true;
        self.bubble();
        Ok(())
    }

    fn on_deactivate(&mut self, view: &mut View) -> EditResult<()> {
        self.active = false;
        let mut first_error = None;
        for child in &mut self.children {
            if let Err(e) = child.controller.on_deactivate(view) {
                log::warn!("Child controller failed to deactivate: {e}");
                first_error.get_or_insert(e);
            }
        }
        self.bubble();
        first_error.map_or(Ok(()), Err)
    }

    fn on_gesture_event(&mut self, event: &GestureEvent, view: &mut View) -> HandleEventResult {
        self.dispatch(|c| c.on_gesture_event(event, view))
    }

    fn on_key_event(&mut self, event: &KeyEvent, view: &mut View) -> HandleEventResult {
        self.dispatch(|c| c.on_key_event(event, view))
    }

    fn on_draw(&mut self, canvas: &mut dyn GeoCanvas, view: &View) {
        for child in &mut self.children {
            child.controller.on_draw(canvas, view);
        }
    }

    fn on_draw_label(&mut self, canvas: &mut dyn LabelCanvas, view: &View) {
        for child in &mut self.children {
            child.controller.on_draw_label(canvas, view);
        }
    }

    /// Cursor of the first child that has one.
    fn get_cursor(&mut self, event: &GestureEvent, view: &View) -> Option<Cursor> {
        self.children
            .iter_mut()
            .filter(|c| !c.skipped)
            .find_map(|c| c.controller.get_cursor(event, view))
    }

    fn invalidate(&mut self) {
        for child in &mut self.children {
            child.controller.invalidate();
        }
        self.bubble();
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }
}
