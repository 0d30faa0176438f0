use super::EditHandle;
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::evented::{EventedSupport, HandleEvent};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::view::Cursor;

/// Runs its children one after the other.
///
/// Only the current child receives events. When it requests finish, the
/// next child takes over; the finish request of the last child is passed on.
pub struct CascadingEditHandle {
    handles: Vec<Box<dyn EditHandle>>,
    current: usize,
    events: EventedSupport<HandleEvent>,
}

impl CascadingEditHandle {
    pub fn new(handles: Vec<Box<dyn EditHandle>>) -> Self {
        Self {
            handles,
            current: 0,
            events: EventedSupport::new(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.handles.len()
    }

    fn current(&self) -> Option<&dyn EditHandle> {
        self.handles.get(self.current).map(|h| h.as_ref())
    }

    fn advance(&mut self, mut result: HandleEventResult) -> HandleEventResult {
        for handle in &mut self.handles {
            let pending = handle.events().take_pending();
            for event in pending {
                self.events.emit(event);
            }
        }
        if result.is_request_finish() && !self.is_last() {
            self.current += 1;
            log::debug!("Cascading handle advanced to step {}", self.current);
            result = result.clear_request_finish();
        }
        result
    }
}

impl EditHandle for CascadingEditHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let Some(handle) = self.handles.get_mut(self.current) else {
            return HandleEventResult::IGNORED;
        };
        let result = handle.on_gesture_event(event, ctx);
        self.advance(result)
    }

    fn on_key_event(&mut self, event: &KeyEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let Some(handle) = self.handles.get_mut(self.current) else {
            return HandleEventResult::IGNORED;
        };
        let result = handle.on_key_event(event, ctx);
        self.advance(result)
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        self.current()?.get_cursor(event, ctx)
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        self.current().is_none_or(|h| h.should_paint_feature(ctx))
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        if let Some(handle) = self.current() {
            handle.on_draw(canvas, ctx);
        }
    }

    fn on_draw_label(&self, canvas: &mut dyn LabelCanvas, ctx: &EditContext<'_>) {
        if let Some(handle) = self.current() {
            handle.on_draw_label(canvas, ctx);
        }
    }

    fn update(&mut self, ctx: &EditContext<'_>) {
        for handle in &mut self.handles {
            handle.update(ctx);
        }
    }

    fn is_active(&self) -> bool {
        self.current().is_some_and(|h| h.is_active())
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}
