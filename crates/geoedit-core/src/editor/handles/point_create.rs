//! Creation by a single click.

use super::{EditHandle, ThreeStepEditHandle};
use crate::canvas::GeoCanvas;
use crate::context::EditContext;
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent};
use crate::input::{GestureEvent, GestureEventType};
use crate::result::HandleEventResult;
use crate::shapes::Shape;
use crate::view::Cursor;
use kurbo::Point;

/// Applies a clicked model point to the shape under creation.
pub type OnCreate = Box<dyn FnMut(&mut Shape, Point)>;

/// Places the shape with one click and finishes at once.
pub struct PointCreateHandle {
    on_create: OnCreate,
    placed: Option<Point>,
    active: bool,
    events: EventedSupport<HandleEvent>,
}

impl PointCreateHandle {
    pub fn new(on_create: impl FnMut(&mut Shape, Point) + 'static) -> Self {
        Self {
            on_create: Box::new(on_create),
            placed: None,
            active: false,
            events: EventedSupport::new(),
        }
    }

    /// Creates a point shape at the clicked location.
    pub fn point() -> Self {
        Self::new(|shape, point| *shape = Shape::Point(point))
    }

    pub fn placed(&self) -> Option<Point> {
        self.placed
    }
}

impl EditHandle for PointCreateHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.handle_phases(event, ctx)
    }

    fn get_cursor(&self, _event: &GestureEvent, _ctx: &EditContext<'_>) -> Option<Cursor> {
        Some(Cursor::Crosshair)
    }

    fn should_paint_feature(&self, _ctx: &EditContext<'_>) -> bool {
        self.placed.is_some()
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        if let Some(point) = self.placed {
            canvas.draw_icon(ctx.to_view(point), &ctx.settings.styles.point);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}

impl ThreeStepEditHandle for PointCreateHandle {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn should_activate(&self, event: &GestureEvent, _ctx: &EditContext<'_>) -> bool {
        event.kind == GestureEventType::SINGLE_CLICK_UP
    }

    fn activate(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let point = ctx.snap(event).point;
        (self.on_create)(ctx.shape_mut(), point);
        self.placed = Some(point);
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
        HandleEventResult::HANDLED
    }

    fn should_process(&self, _event: &GestureEvent) -> bool {
        false
    }

    fn process(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
        HandleEventResult::IGNORED
    }

    fn should_deactivate(&self, _event: &GestureEvent) -> bool {
        true
    }

    fn deactivate(&mut self, _event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
        HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
    }
}
