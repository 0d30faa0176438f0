//! Creation by template: one click drops a default-sized shape, which is
//! then edited in place until the user finishes.

use super::{CascadingEditHandle, EditHandle, PointCreateHandle};
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent};
use crate::input::{GestureEvent, GestureEventType, KeyEvent};
use crate::result::HandleEventResult;
use crate::shapes::{Shape, point_at_azimuth};
use crate::view::{Cursor, View};
use kurbo::Point;
use std::cell::Cell;
use std::rc::Rc;

/// Fills the shape around a clicked model point, given a default size in
/// model units.
pub type Template = Box<dyn Fn(&mut Shape, Point, f64)>;

/// Size in model units used for shapes dropped by template: an eighth of
/// the smaller viewport dimension.
pub fn default_size(view: &View) -> f64 {
    let pixels = view.viewport.width.min(view.viewport.height) / 8.0;
    view.camera.view_to_model_distance(pixels)
}

/// Point at `distance` from `center` in direction `azimuth`.
pub fn default_point(center: Point, azimuth: f64, distance: f64) -> Point {
    point_at_azimuth(center, azimuth, distance)
}

/// Two-stage creation: place by template, then edit.
///
/// In the edit stage a double click off the shape finishes, as does a
/// single click off the shape when `finish_on_single_click` is set.
pub struct CreateByTemplateHandle {
    stages: CascadingEditHandle,
    size: Rc<Cell<f64>>,
    events: EventedSupport<HandleEvent>,
}

impl CreateByTemplateHandle {
    pub fn new(template: impl Fn(&mut Shape, Point, f64) + 'static, edit: Box<dyn EditHandle>) -> Self {
        let template: Template = Box::new(template);
        let size = Rc::new(Cell::new(0.0));
        let shared = Rc::clone(&size);
        let create = PointCreateHandle::new(move |shape, point| template(shape, point, shared.get()));
        Self {
            stages: CascadingEditHandle::new(vec![Box::new(create), edit]),
            size,
            events: EventedSupport::new(),
        }
    }

    /// Whether the shape has been placed and is being edited.
    pub fn is_editing(&self) -> bool {
        self.stages.current_index() > 0
    }

    fn is_finish_event(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        let finishing = match event.kind {
            GestureEventType::DOUBLE_CLICK => true,
            GestureEventType::SINGLE_CLICK_UP => ctx.settings.finish_on_single_click,
            _ => false,
        };
        finishing
            && !ctx
                .shape()
                .hit_test(ctx.to_model(event.view_point), ctx.model_radius(event))
    }

    /// Forward stage events. The whole creation is one action, so only
    /// this handle reports `Finished`.
    fn bubble(&mut self, ctx: &EditContext<'_>) {
        let pending = self.stages.events().take_pending();
        let changed = pending
            .iter()
            .any(|e| matches!(e, HandleEvent::EditShape(_)));
        for event in pending {
            let event = match event {
                HandleEvent::EditShape(edit) => HandleEvent::EditShape(edit.into_in_progress()),
                other => other,
            };
            self.events.emit(event);
        }
        if changed {
            self.stages.update(ctx);
        }
    }
}

impl EditHandle for CreateByTemplateHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.size.set(default_size(ctx.view));
        let editing = self.is_editing();
        let result = self.stages.on_gesture_event(event, ctx);
        self.bubble(ctx);

        if editing && !result.is_handled() && self.is_finish_event(event, ctx) {
            log::debug!("Template creation finished on {:?}", event.kind);
            self.events
                .emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
            return HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH;
        }
        result
    }

    fn on_key_event(&mut self, event: &KeyEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let result = self.stages.on_key_event(event, ctx);
        self.bubble(ctx);
        result
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        self.stages.get_cursor(event, ctx)
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        self.is_editing() && self.stages.should_paint_feature(ctx)
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        self.stages.on_draw(canvas, ctx);
    }

    fn on_draw_label(&self, canvas: &mut dyn LabelCanvas, ctx: &EditContext<'_>) {
        self.stages.on_draw_label(canvas, ctx);
    }

    fn update(&mut self, ctx: &EditContext<'_>) {
        self.stages.update(ctx);
    }

    fn is_active(&self) -> bool {
        self.stages.is_active()
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}
