use super::Controller;
use crate::evented::{ControllerEvent, EventedSupport};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::view::View;

type GestureFilter = Box<dyn Fn(&GestureEvent) -> bool>;
type KeyFilter = Box<dyn Fn(&KeyEvent) -> bool>;

/// Swallows events so that nothing behind it sees them.
///
/// By default every gesture and key event is consumed. Filters narrow that
/// down to the events for which they return true.
#[derive(Default)]
pub struct NoopController {
    gesture_filter: Option<GestureFilter>,
    key_filter: Option<KeyFilter>,
    events: EventedSupport<ControllerEvent>,
}

impl NoopController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gesture_filter(mut self, filter: impl Fn(&GestureEvent) -> bool + 'static) -> Self {
        self.gesture_filter = Some(Box::new(filter));
        self
    }

    pub fn with_key_filter(mut self, filter: impl Fn(&KeyEvent) -> bool + 'static) -> Self {
        self.key_filter = Some(Box::new(filter));
        self
    }

    pub fn is_noop_gesture_event(&self, event: &GestureEvent) -> bool {
        self.gesture_filter.as_ref().is_none_or(|f| f(event))
    }

    pub fn is_noop_key_event(&self, event: &KeyEvent) -> bool {
        self.key_filter.as_ref().is_none_or(|f| f(event))
    }
}

impl Controller for NoopController {
    fn on_gesture_event(&mut self, event: &GestureEvent, _view: &mut View) -> HandleEventResult {
        if self.is_noop_gesture_event(event) {
            HandleEventResult::HANDLED
        } else {
            HandleEventResult::IGNORED
        }
    }

    fn on_key_event(&mut self, event: &KeyEvent, _view: &mut View) -> HandleEventResult {
        if self.is_noop_key_event(event) {
            HandleEventResult::HANDLED
        } else {
            HandleEventResult::IGNORED
        }
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }
}
