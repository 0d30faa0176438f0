//! Host that owns the view and routes input to controllers.

use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::controller::{Controller, DefaultController};
use crate::error::EditResult;
use crate::evented::{ControllerEvent, EventedSupport};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::style::ShapeStyle;
use crate::view::{Cursor, View};

/// A view plus two controller slots.
///
/// Events go to the installed controller first. Whatever it ignores falls
/// through to the default controller. A controller that requests finish is
/// deactivated and removed.
pub struct Map {
    view: View,
    controller: Option<Box<dyn Controller>>,
    default_controller: Box<dyn Controller>,
    events: EventedSupport<ControllerEvent>,
}

impl Map {
    pub fn new(view: View) -> Self {
        let mut map = Self {
            view,
            controller: None,
            default_controller: Box::new(DefaultController::new()),
            events: EventedSupport::without_queue(),
        };
        if let Err(e) = map.default_controller.on_activate(&mut map.view) {
            log::warn!("Default controller failed to activate: {e}");
        }
        map.drain_events();
        map
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.view.cursor()
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    /// Subscribe here to everything the controllers emit.
    pub fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }

    /// Replace the default controller, deactivating the old one.
    pub fn set_default_controller(&mut self, mut controller: Box<dyn Controller>) -> EditResult<()> {
        if let Err(e) = self.default_controller.on_deactivate(&mut self.view) {
            log::warn!("Default controller failed to deactivate: {e}");
        }
        controller.on_activate(&mut self.view)?;
        self.default_controller = controller;
        self.drain_events();
        Ok(())
    }

    /// Install `controller`, deactivating the current one first.
    pub fn set_controller(&mut self, mut controller: Box<dyn Controller>) -> EditResult<()> {
        self.remove_controller();
        let activated = controller.on_activate(&mut self.view);
        self.drain_from(controller.as_mut());
        activated?;
        log::info!("Controller installed");
        self.controller = Some(controller);
        Ok(())
    }

    /// Deactivate and return the installed controller.
    pub fn remove_controller(&mut self) -> Option<Box<dyn Controller>> {
        let mut controller = self.controller.take()?;
        log::info!("Controller removed");
        if let Err(e) = controller.on_deactivate(&mut self.view) {
            log::warn!("Controller failed to deactivate: {e}");
        }
        self.drain_from(controller.as_mut());
        Some(controller)
    }

    pub fn on_gesture_event(&mut self, event: &GestureEvent) -> HandleEventResult {
        let result = self.route(|controller, view| controller.on_gesture_event(event, view));
        let cursor = match self.controller.as_mut() {
            Some(controller) => controller.get_cursor(event, &self.view),
            None => None,
        }
        .or_else(|| self.default_controller.get_cursor(event, &self.view));
        self.view.set_cursor(cursor);
        result
    }

    pub fn on_key_event(&mut self, event: &KeyEvent) -> HandleEventResult {
        self.route(|controller, view| controller.on_key_event(event, view))
    }

    fn route(&mut self, mut send: impl FnMut(&mut dyn Controller, &mut View) -> HandleEventResult) -> HandleEventResult {
        let mut result = HandleEventResult::IGNORED;
        if let Some(controller) = self.controller.as_mut() {
            result = send(controller.as_mut(), &mut self.view);
            if result.is_request_finish() {
                self.remove_controller();
            }
        }
        if result.is_ignored() {
            result = send(self.default_controller.as_mut(), &mut self.view);
        }
        self.drain_events();
        result
    }

    /// Draw the visible features, then whatever the controllers show.
    ///
    /// Features hidden by an edit session are left to their controller.
    pub fn on_draw(&mut self, canvas: &mut dyn GeoCanvas, feature_style: &ShapeStyle) {
        for layer in self.view.layers().iter().filter(|l| l.visible) {
            for feature in layer.features() {
                if !self.view.is_feature_hidden(feature.id) {
                    canvas.draw_shape(&feature.shape, feature_style);
                }
            }
        }
        self.default_controller.on_draw(canvas, &self.view);
        if let Some(controller) = self.controller.as_mut() {
            controller.on_draw(canvas, &self.view);
        }
    }

    pub fn on_draw_label(&mut self, canvas: &mut dyn LabelCanvas) {
        self.default_controller.on_draw_label(canvas, &self.view);
        if let Some(controller) = self.controller.as_mut() {
            controller.on_draw_label(canvas, &self.view);
        }
    }

    fn drain_from(&mut self, controller: &mut dyn Controller) {
        for event in controller.events().take_pending() {
            self.events.emit(event);
        }
    }

    fn drain_events(&mut self) {
        let mut pending = self.default_controller.events().take_pending();
        if let Some(controller) = self.controller.as_mut() {
            pending.extend(controller.events().take_pending());
        }
        for event in pending {
            self.events.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::controller::EditController;
    use crate::editor::handles::test_support::*;
    use crate::evented::ControllerEventKind;
    use crate::feature::{Feature, FeatureId, FeatureLayer, LayerId};
    use crate::input::{GestureDetail, GestureEventType};
    use crate::shapes::Shape;
    use kurbo::{Point, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn map_with_point() -> (Map, LayerId, FeatureId) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut view = View::new(Size::new(800.0, 600.0));
        let mut layer = FeatureLayer::new("features");
        let feature = Feature::new(Shape::Point(Point::new(100.0, 100.0)));
        let id = feature.id;
        layer.add(feature);
        let layer_id = view.add_layer(layer);
        (Map::new(view), layer_id, id)
    }

    fn record(map: &mut Map, kind: ControllerEventKind) -> Rc<RefCell<usize>> {
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        map.events().on(kind, move |_| *counter.borrow_mut() += 1);
        count
    }

    #[test]
    fn test_default_controller_handles_without_controller() {
        let (mut map, layer, id) = map_with_point();
        let confirmed = at(GestureEventType::SINGLE_CLICK_CONFIRMED, 100.0, 100.0);
        assert!(map.on_gesture_event(&confirmed).is_handled());
        assert!(map.view().is_selected(layer, id));
    }

    #[test]
    fn test_edit_controller_first_then_fallthrough() {
        let (mut map, layer, id) = map_with_point();
        map.set_controller(Box::new(EditController::new(layer, id))).unwrap();

        let start = down(100.0, 100.0);
        map.on_gesture_event(&start);
        map.on_gesture_event(&drag(&start, 130.0, 100.0));
        map.on_gesture_event(&drag_end(&start, 130.0, 100.0));
        assert_eq!(map.view().camera.offset, kurbo::Vec2::ZERO);

        let scroll = at(GestureEventType::SCROLL, 10.0, 10.0).with_detail(GestureDetail::Scroll { amount: 1.0 });
        assert!(map.on_gesture_event(&scroll).is_handled());
        assert!((map.view().camera.zoom - 1.2).abs() < 1e-9);
        assert!(map.has_controller());
    }

    #[test]
    fn test_request_finish_removes_controller() {
        let (mut map, layer, id) = map_with_point();
        let finished = record(&mut map, ControllerEventKind::EditShape);
        let deactivated = record(&mut map, ControllerEventKind::Deactivated);
        map.set_controller(Box::new(EditController::new(layer, id))).unwrap();

        let start = down(100.0, 100.0);
        map.on_gesture_event(&start);
        map.on_gesture_event(&drag(&start, 140.0, 100.0));
        map.on_gesture_event(&drag_end(&start, 140.0, 100.0));
        let result = map.on_gesture_event(&double_click(400.0, 400.0));
        assert!(result.is_request_finish());
        assert!(!map.has_controller());
        assert_eq!(
            map.view().feature(layer, id).unwrap().shape,
            Shape::Point(Point::new(140.0, 100.0))
        );
        assert!(*finished.borrow() > 0);
        assert_eq!(*deactivated.borrow(), 1);
    }

    #[test]
    fn test_set_controller_deactivates_previous() {
        let (mut map, layer, id) = map_with_point();
        let deactivated = record(&mut map, ControllerEventKind::Deactivated);
        map.set_controller(Box::new(EditController::new(layer, id))).unwrap();
        assert!(map.view().is_feature_hidden(id));
        map.set_controller(Box::new(EditController::new(layer, id))).unwrap();
        assert_eq!(*deactivated.borrow(), 1);
        assert!(map.view().is_feature_hidden(id));
        assert!(map.remove_controller().is_some());
        assert!(!map.view().is_feature_hidden(id));
    }

    #[test]
    fn test_draw_leaves_hidden_features_to_controller() {
        let (mut map, layer, id) = map_with_point();
        let style = ShapeStyle::default();
        let mut canvas = RecordingCanvas::new();
        map.on_draw(&mut canvas, &style);
        assert_eq!(canvas.shapes().count(), 1);

        map.set_controller(Box::new(EditController::new(layer, id))).unwrap();
        canvas.clear();
        map.on_draw(&mut canvas, &style);
        assert_eq!(canvas.shapes().count(), 1);
        assert!(canvas.icon_count() > 0);
    }

    #[test]
    fn test_cursor_follows_pan() {
        let (mut map, _, _) = map_with_point();
        let start = down(300.0, 300.0);
        map.on_gesture_event(&drag(&start, 320.0, 300.0));
        assert_eq!(map.cursor(), Some(&Cursor::Grabbing));
        map.on_gesture_event(&drag_end(&start, 330.0, 300.0));
        assert_eq!(map.cursor(), None);
    }
}
