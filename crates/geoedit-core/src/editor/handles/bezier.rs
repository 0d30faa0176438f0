//! Bézier curve creation and editing.

use super::composite::{CompositeEditHandle, HandleSource};
use super::helper::{HelperHandle, HelperKind};
use super::EditHandle;
use crate::canvas::GeoCanvas;
use crate::context::EditContext;
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent};
use crate::input::{GestureEvent, GestureEventType};
use crate::result::HandleEventResult;
use crate::shapes::{BezierCurve, Polyline, Shape};
use crate::view::Cursor;

/// Places control points by clicking.
///
/// The fourth point finishes a cubic curve; a double click finishes a
/// quadratic one once three points are placed.
#[derive(Default)]
pub struct BezierCurveCreateHandle {
    events: EventedSupport<HandleEvent>,
}

impl BezierCurveCreateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a control point and return the new count.
    fn push(ctx: &mut EditContext<'_>, point: kurbo::Point) -> usize {
        match ctx.shape_mut() {
            Shape::BezierCurve(curve) => {
                curve.points.push(point);
                curve.points.len()
            }
            shape => {
                *shape = Shape::BezierCurve(BezierCurve::new(vec![point]));
                1
            }
        }
    }

    fn finish(&mut self, ctx: &EditContext<'_>) -> HandleEventResult {
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
        HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
    }

    fn is_complete(ctx: &EditContext<'_>) -> bool {
        matches!(ctx.shape(), Shape::BezierCurve(curve) if curve.is_complete())
    }
}

impl EditHandle for BezierCurveCreateHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        match event.kind {
            GestureEventType::SINGLE_CLICK_UP => {
                let point = ctx.snap(event).point;
                let last = ctx.shape().points().and_then(|p| p.last().copied());
                if last.is_some_and(|last| ctx.interacts(event, last)) {
                    return HandleEventResult::HANDLED;
                }
                let count = Self::push(ctx, point);
                self.events
                    .emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
                if count >= BezierCurve::MAX_POINTS {
                    return self.finish(ctx);
                }
                HandleEventResult::HANDLED
            }
            GestureEventType::DOUBLE_CLICK if Self::is_complete(ctx) => self.finish(ctx),
            GestureEventType::DOUBLE_CLICK => HandleEventResult::HANDLED,
            _ => HandleEventResult::IGNORED,
        }
    }

    fn get_cursor(&self, _event: &GestureEvent, _ctx: &EditContext<'_>) -> Option<Cursor> {
        Some(Cursor::Crosshair)
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        Self::is_complete(ctx)
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        let Some(points) = ctx.shape().points() else {
            return;
        };
        if points.len() > 1 {
            let polygon = Shape::Polyline(Polyline::new(points.to_vec()));
            canvas.draw_shape(&polygon, &ctx.settings.styles.helper);
        }
        for point in points {
            canvas.draw_icon(ctx.to_view(*point), &ctx.settings.styles.point);
        }
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}

/// Drag every control point and show the control polygon.
pub fn bezier_curve_edit_handle(shape: &Shape) -> CompositeEditHandle {
    CompositeEditHandle::default()
        .with(HelperHandle::new(HelperKind::BezierCurve))
        .with(CompositeEditHandle::generated(HandleSource::Vertices, shape))
}
