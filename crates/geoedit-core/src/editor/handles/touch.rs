//! Handles that activate by touching the shape itself rather than a point.

use super::{EditHandle, ThreeStepEditHandle};
use crate::context::EditContext;
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent};
use crate::input::{GestureEvent, GestureEventType};
use crate::result::HandleEventResult;
use crate::shapes::Shape;
use crate::view::Cursor;
use kurbo::Point;

/// What a [`ShapeTouchHandle`] does with a drag.
pub trait TouchAction {
    /// Whether a press at `event` grabs the shape.
    fn touches(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool;

    /// Apply a drag step from model point `from` to `to`.
    fn drag(&mut self, from: Point, to: Point, shape: &mut Shape);

    fn cursor(&self) -> Cursor;
}

/// Three-step handle that activates on a press that touches the shape.
pub struct ShapeTouchHandle<T> {
    action: T,
    active: bool,
    last: Option<Point>,
    changed: bool,
    events: EventedSupport<HandleEvent>,
}

impl<T: TouchAction> ShapeTouchHandle<T> {
    pub fn new(action: T) -> Self {
        Self {
            action,
            active: false,
            last: None,
            changed: false,
            events: EventedSupport::new(),
        }
    }
}

impl<T: TouchAction> EditHandle for ShapeTouchHandle<T> {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.handle_phases(event, ctx)
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        (self.active || self.action.touches(event, ctx)).then(|| self.action.cursor())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}

impl<T: TouchAction> ThreeStepEditHandle for ShapeTouchHandle<T> {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn should_activate(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        event.kind == GestureEventType::DOWN && self.action.touches(event, ctx)
    }

    fn activate(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.last = Some(ctx.to_model(event.view_point));
        HandleEventResult::HANDLED
    }

    fn should_process(&self, event: &GestureEvent) -> bool {
        event.kind == GestureEventType::DRAG
    }

    fn process(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let current = ctx.to_model(event.view_point);
        if let Some(last) = self.last.replace(current) {
            self.action.drag(last, current, ctx.shape_mut());
            self.changed = true;
            self.events.emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
        }
        HandleEventResult::HANDLED
    }

    fn should_deactivate(&self, event: &GestureEvent) -> bool {
        matches!(
            event.kind,
            GestureEventType::DRAG_END | GestureEventType::UP | GestureEventType::CONTEXT_MENU
        )
    }

    fn deactivate(&mut self, _event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.last = None;
        if std::mem::take(&mut self.changed) {
            self.events.emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
        }
        HandleEventResult::HANDLED
    }
}

/// Moves the whole shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translate;

impl TouchAction for Translate {
    fn touches(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        let point = ctx.to_model(event.view_point);
        ctx.shape().hit_test(point, ctx.model_radius(event))
    }

    fn drag(&mut self, from: Point, to: Point, shape: &mut Shape) {
        shape.translate(to - from);
    }

    fn cursor(&self) -> Cursor {
        Cursor::Move
    }
}

pub type ShapeTranslateHandle = ShapeTouchHandle<Translate>;

impl ShapeTranslateHandle {
    pub fn translate() -> Self {
        Self::new(Translate)
    }
}

/// Adjusts the width of a geo buffer by dragging its outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferWidth;

impl TouchAction for BufferWidth {
    fn touches(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        let Shape::GeoBuffer(buffer) = ctx.shape() else {
            return false;
        };
        let point = ctx.to_model(event.view_point);
        (buffer.distance_to_base(point) - buffer.width / 2.0).abs() <= ctx.model_radius(event)
    }

    fn drag(&mut self, _from: Point, to: Point, shape: &mut Shape) {
        if let Shape::GeoBuffer(buffer) = shape {
            buffer.width = 2.0 * buffer.distance_to_base(to);
        }
    }

    fn cursor(&self) -> Cursor {
        Cursor::Pointer
    }
}

pub type GeoBufferWidthHandle = ShapeTouchHandle<BufferWidth>;

impl GeoBufferWidthHandle {
    pub fn width() -> Self {
        Self::new(BufferWidth)
    }
}
