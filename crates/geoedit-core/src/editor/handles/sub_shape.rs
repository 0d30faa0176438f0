use super::EditHandle;
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::evented::{EventedSupport, HandleEvent};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::shapes::Shape;
use crate::view::Cursor;

/// Runs a handle against one sub-shape of a composed shape.
pub struct SubShapeHandle {
    index: usize,
    inner: Box<dyn EditHandle>,
    events: EventedSupport<HandleEvent>,
}

impl SubShapeHandle {
    /// Fails unless `shape` has a sub-shape `index`.
    pub fn new(shape: &Shape, index: usize, inner: Box<dyn EditHandle>) -> EditResult<Self> {
        shape.sub_shape(index)?;
        Ok(Self {
            index,
            inner,
            events: EventedSupport::new(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Re-emit the inner handle's events. Shape snapshots are replaced by
    /// the whole shape so that listeners always see the feature's shape.
    fn bubble(&mut self, ctx: &EditContext<'_>) {
        for event in self.inner.events().take_pending() {
            let event = match event {
                HandleEvent::EditShape(mut edit) => {
                    edit.shape = ctx.shape().clone();
                    HandleEvent::EditShape(edit)
                }
                other => other,
            };
            self.events.emit(event);
        }
    }
}

impl EditHandle for SubShapeHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let result = match ctx.sub_context(self.index) {
            Ok(mut sub) => self.inner.on_gesture_event(event, &mut sub),
            Err(e) => {
                log::warn!("Sub-shape handle skipped: {e}");
                return HandleEventResult::IGNORED;
            }
        };
        self.bubble(ctx);
        result
    }

    fn on_key_event(&mut self, event: &KeyEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let result = match ctx.sub_context(self.index) {
            Ok(mut sub) => self.inner.on_key_event(event, &mut sub),
            Err(_) => return HandleEventResult::IGNORED,
        };
        self.bubble(ctx);
        result
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        ctx.with_sub_shape(self.index, |sub| self.inner.get_cursor(event, sub))
            .ok()
            .flatten()
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        ctx.with_sub_shape(self.index, |sub| self.inner.should_paint_feature(sub))
            .unwrap_or(true)
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        let _ = ctx.with_sub_shape(self.index, |sub| self.inner.on_draw(canvas, sub));
    }

    fn on_draw_label(&self, canvas: &mut dyn LabelCanvas, ctx: &EditContext<'_>) {
        let _ = ctx.with_sub_shape(self.index, |sub| self.inner.on_draw_label(canvas, sub));
    }

    fn update(&mut self, ctx: &EditContext<'_>) {
        let inner = &mut self.inner;
        let _ = ctx.with_sub_shape(self.index, |sub| inner.update(sub));
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}
