use super::handles::{
    CompositeEditHandle, EditHandle, GeoBufferWidthHandle, HelperHandle, HelperKind, PointListCreateHandle,
    SubShapeHandle, default_size,
};
use super::{CompositeEditor, Editor, is_type};
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::evented::{EventedSupport, HandleEvent};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::shapes::{Shape, ShapeType};
use crate::view::Cursor;

/// Geo buffers: the base shape's handles plus a width handle on the
/// buffer outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoBufferEditor;

impl Editor for GeoBufferEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::GeoBuffer)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        let base = ctx.with_sub_shape(0, |sub| CompositeEditor::leaf_editors().get_shape_handles(sub))??;
        Ok(vec![
            Box::new(HelperHandle::new(HelperKind::GeoBuffer)),
            Box::new(SubShapeHandle::new(ctx.shape(), 0, Box::new(CompositeEditHandle::new(base)))?),
            Box::new(GeoBufferWidthHandle::width()),
        ])
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(Some(Box::new(GeoBufferCreateHandle::new(ctx.shape())?)))
    }

    fn name(&self) -> &'static str {
        "geo buffer"
    }
}

/// Draws the base line point by point. A buffer without width gets half
/// the default template size before its first point.
struct GeoBufferCreateHandle {
    base: SubShapeHandle,
    events: EventedSupport<HandleEvent>,
}

impl GeoBufferCreateHandle {
    fn new(shape: &Shape) -> EditResult<Self> {
        Ok(Self {
            base: SubShapeHandle::new(shape, 0, Box::new(PointListCreateHandle::new()))?,
            events: EventedSupport::new(),
        })
    }

    fn ensure_width(ctx: &mut EditContext<'_>) {
        let width = default_size(ctx.view) / 2.0;
        if let Shape::GeoBuffer(buffer) = ctx.shape_mut() {
            if buffer.width <= 0.0 {
                buffer.width = width;
            }
        }
    }

    fn bubble(&mut self) {
        for event in self.base.events().take_pending() {
            self.events.emit(event);
        }
    }
}

impl EditHandle for GeoBufferCreateHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        Self::ensure_width(ctx);
        let result = self.base.on_gesture_event(event, ctx);
        self.bubble();
        result
    }

    fn on_key_event(&mut self, event: &KeyEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let result = self.base.on_key_event(event, ctx);
        self.bubble();
        result
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        self.base.get_cursor(event, ctx)
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        self.base.should_paint_feature(ctx)
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        self.base.on_draw(canvas, ctx);
    }

    fn on_draw_label(&self, canvas: &mut dyn LabelCanvas, ctx: &EditContext<'_>) {
        self.base.on_draw_label(canvas, ctx);
    }

    fn is_active(&self) -> bool {
        self.base.is_active()
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}
