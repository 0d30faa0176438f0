//! Camera navigation: panning, zooming and the default controller chain.

use super::pick::{ContextMenuController, HoverController, SelectController};
use super::{CompositeController, Controller, delegate_controller};
use crate::camera::{Camera, ZOOM_STEP};
use crate::error::EditResult;
use crate::evented::{ControllerEvent, EventedSupport};
use crate::input::{GestureDetail, GestureEvent, GestureEventType, MouseButton};
use crate::result::HandleEventResult;
use crate::view::{Cursor, View};
use kurbo::Point;

/// Drags the camera with a non-right mouse button or one finger.
#[derive(Default)]
pub struct PanController {
    /// Last view point of a running pan.
    last: Option<Point>,
    events: EventedSupport<ControllerEvent>,
}

impl PanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.last.is_some()
    }

    fn accepts(event: &GestureEvent) -> bool {
        event.is_touch() || event.button != Some(MouseButton::Right)
    }

    fn pan_to(&mut self, point: Point, view: &mut View) {
        let last = self.last.unwrap_or(point);
        let delta = point - last;
        if delta.hypot2() > 0.0 {
            view.camera.pan(delta);
            self.events.emit(ControllerEvent::Invalidated);
        }
        self.last = Some(point);
    }
}

impl Controller for PanController {
    fn on_deactivate(&mut self, _view: &mut View) -> EditResult<()> {
        self.last = None;
        Ok(())
    }

    fn on_gesture_event(&mut self, event: &GestureEvent, view: &mut View) -> HandleEventResult {
        match event.kind {
            GestureEventType::DRAG if self.is_panning() || Self::accepts(event) => {
                if self.last.is_none() {
                    log::debug!("Pan started at {:?}", event.start_point());
                    self.last = Some(event.start_point());
                }
                self.pan_to(event.view_point, view);
                HandleEventResult::HANDLED
            }
            GestureEventType::DRAG_END if self.is_panning() => {
                self.pan_to(event.view_point, view);
                self.last = None;
                HandleEventResult::HANDLED
            }
            _ => HandleEventResult::IGNORED,
        }
    }

    fn get_cursor(&mut self, _event: &GestureEvent, _view: &View) -> Option<Cursor> {
        self.is_panning().then_some(Cursor::Grabbing)
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }
}

/// Zooms on scroll, pinch and double click. Ctrl snaps to power-of-two
/// scale levels.
#[derive(Default)]
pub struct ZoomController {
    /// Camera zoom when the running pinch started.
    pinch_start_zoom: Option<f64>,
    events: EventedSupport<ControllerEvent>,
}

impl ZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    fn zoom_to(&mut self, view: &mut View, anchor: Point, zoom: f64, snap: bool) {
        let zoom = if snap { Camera::snap_zoom(zoom) } else { zoom };
        let before = view.camera.zoom;
        view.camera.set_zoom_at(anchor, zoom);
        if (view.camera.zoom - before).abs() > f64::EPSILON {
            self.events.emit(ControllerEvent::Invalidated);
        }
    }
}

impl Controller for ZoomController {
    fn on_deactivate(&mut self, _view: &mut View) -> EditResult<()> {
        self.pinch_start_zoom = None;
        Ok(())
    }

    fn on_gesture_event(&mut self, event: &GestureEvent, view: &mut View) -> HandleEventResult {
        let snap = event.modifiers.ctrl;
        match (event.kind, event.detail) {
            (GestureEventType::SCROLL, GestureDetail::Scroll { amount }) => {
                let zoom = if snap {
                    view.camera.zoom * 2f64.powf(amount.signum())
                } else {
                    view.camera.zoom * ZOOM_STEP.powf(amount)
                };
                self.zoom_to(view, event.view_point, zoom, snap);
                HandleEventResult::HANDLED
            }
            (
                GestureEventType::PINCH,
                GestureDetail::Pinch {
                    scale_factor_from_start,
                    ..
                },
            ) => {
                let start = *self.pinch_start_zoom.get_or_insert(view.camera.zoom);
                self.zoom_to(view, event.view_point, start * scale_factor_from_start, snap);
                HandleEventResult::HANDLED
            }
            (GestureEventType::PINCH_END, _) => {
                if self.pinch_start_zoom.take().is_some() {
                    HandleEventResult::HANDLED
                } else {
                    HandleEventResult::IGNORED
                }
            }
            (GestureEventType::DOUBLE_CLICK, _) => {
                let factor = if event.button == Some(MouseButton::Right) { 0.5 } else { 2.0 };
                let zoom = view.camera.zoom * factor;
                self.zoom_to(view, event.view_point, zoom, snap);
                HandleEventResult::HANDLED
            }
            _ => HandleEventResult::IGNORED,
        }
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }
}

/// Pan then zoom.
pub struct NavigateController(CompositeController);

impl NavigateController {
    pub fn new() -> Self {
        Self(CompositeController::with_controllers(vec![
            Box::new(PanController::new()),
            Box::new(ZoomController::new()),
        ]))
    }
}

impl Default for NavigateController {
    fn default() -> Self {
        Self::new()
    }
}

delegate_controller!(NavigateController);

/// What a map does when no other controller is installed: select, context
/// menu, navigate, hover.
pub struct DefaultController(CompositeController);

impl DefaultController {
    pub fn new() -> Self {
        Self(CompositeController::with_controllers(vec![
            Box::new(SelectController::select()),
            Box::new(ContextMenuController::context_menu()),
            Box::new(NavigateController::new()),
            Box::new(HoverController::hover()),
        ]))
    }
}

impl Default for DefaultController {
    fn default() -> Self {
        Self::new()
    }
}

delegate_controller!(DefaultController);

#[cfg(test)]
mod tests {
    use super::super::test_support::view_with;
    use super::*;
    use crate::input::{InputType, Modifiers};
    use crate::shapes::{Bounds, Shape};
    use kurbo::{Size, Vec2};

    fn drag_from(start: Point, to: Point, kind: GestureEventType) -> GestureEvent {
        GestureEvent::new(kind, to).with_down_event(GestureEvent::new(GestureEventType::DOWN, start))
    }

    #[test]
    fn test_pan_follows_drag() {
        let mut view = View::new(Size::new(800.0, 600.0));
        let mut pan = PanController::new();
        let start = Point::new(100.0, 100.0);
        let drag = drag_from(start, Point::new(110.0, 105.0), GestureEventType::DRAG);
        assert!(pan.on_gesture_event(&drag, &mut view).is_handled());
        assert_eq!(view.camera.offset, Vec2::new(10.0, 5.0));
        assert_eq!(pan.get_cursor(&drag, &view), Some(Cursor::Grabbing));

        let end = drag_from(start, Point::new(120.0, 105.0), GestureEventType::DRAG_END);
        pan.on_gesture_event(&end, &mut view);
        assert_eq!(view.camera.offset, Vec2::new(20.0, 5.0));
        assert!(!pan.is_panning());
    }

    #[test]
    fn test_right_drag_does_not_pan() {
        let mut view = View::new(Size::new(800.0, 600.0));
        let mut pan = PanController::new();
        let drag = drag_from(Point::ZERO, Point::new(10.0, 0.0), GestureEventType::DRAG)
            .with_button(Some(MouseButton::Right));
        assert!(pan.on_gesture_event(&drag, &mut view).is_ignored());
        let touch = drag.with_input(InputType::Touch);
        assert!(pan.on_gesture_event(&touch, &mut view).is_handled());
    }

    #[test]
    fn test_scroll_zooms_around_point() {
        let mut view = View::new(Size::new(800.0, 600.0));
        let mut zoom = ZoomController::new();
        let anchor = Point::new(200.0, 100.0);
        let model_before = view.camera.view_to_model(anchor);
        let scroll = GestureEvent::new(GestureEventType::SCROLL, anchor)
            .with_detail(GestureDetail::Scroll { amount: 1.0 });
        zoom.on_gesture_event(&scroll, &mut view);
        assert!((view.camera.zoom - 1.2).abs() < 1e-9);
        let model_after = view.camera.view_to_model(anchor);
        assert!(model_before.distance(model_after) < 1e-9);
    }

    #[test]
    fn test_ctrl_scroll_snaps() {
        let mut view = View::new(Size::new(800.0, 600.0));
        view.camera.zoom = 1.5;
        let mut zoom = ZoomController::new();
        let scroll = GestureEvent::new(GestureEventType::SCROLL, Point::ZERO)
            .with_detail(GestureDetail::Scroll { amount: 1.0 })
            .with_modifiers(Modifiers::ctrl());
        zoom.on_gesture_event(&scroll, &mut view);
        assert!((view.camera.zoom - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_is_relative_to_start() {
        let mut view = View::new(Size::new(800.0, 600.0));
        view.camera.zoom = 2.0;
        let mut zoom = ZoomController::new();
        let pinch = |from_start: f64| {
            GestureEvent::new(GestureEventType::PINCH, Point::ZERO).with_detail(GestureDetail::Pinch {
                scale_factor: 1.0,
                scale_factor_from_start: from_start,
            })
        };
        zoom.on_gesture_event(&pinch(1.5), &mut view);
        zoom.on_gesture_event(&pinch(2.0), &mut view);
        assert!((view.camera.zoom - 4.0).abs() < 1e-9);
        let end = GestureEvent::new(GestureEventType::PINCH_END, Point::ZERO);
        assert!(zoom.on_gesture_event(&end, &mut view).is_handled());
        zoom.on_gesture_event(&pinch(0.5), &mut view);
        assert!((view.camera.zoom - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_click_zoom_direction() {
        let mut view = View::new(Size::new(800.0, 600.0));
        let mut zoom = ZoomController::new();
        let double = GestureEvent::new(GestureEventType::DOUBLE_CLICK, Point::ZERO);
        zoom.on_gesture_event(&double, &mut view);
        assert!((view.camera.zoom - 2.0).abs() < 1e-9);
        let right = double.with_button(Some(MouseButton::Right));
        zoom.on_gesture_event(&right, &mut view);
        zoom.on_gesture_event(&right, &mut view);
        assert!((view.camera.zoom - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_default_controller_selects_before_navigating() {
        let (mut view, layer, a) = view_with(Shape::Bounds(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut default = DefaultController::new();
        default.on_activate(&mut view).unwrap();
        let click = GestureEvent::new(GestureEventType::SINGLE_CLICK_CONFIRMED, Point::new(5.0, 5.0));
        assert!(default.on_gesture_event(&click, &mut view).is_handled());
        assert!(view.is_selected(layer, a));

        let drag = drag_from(Point::new(5.0, 5.0), Point::new(15.0, 5.0), GestureEventType::DRAG);
        assert!(default.on_gesture_event(&drag, &mut view).is_handled());
        assert_eq!(view.camera.offset, Vec2::new(10.0, 0.0));
        assert!(default.events().take_pending().contains(&ControllerEvent::Invalidated));
    }
}
