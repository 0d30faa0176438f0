//! Controllers that resolve a view point into features.

use super::Controller;
use crate::evented::{ControllerEvent, EventedSupport};
use crate::feature::FeatureLayer;
use crate::input::{GestureEvent, GestureEventType, InputType};
use crate::result::HandleEventResult;
use crate::view::{ContextMenu, PaintRepresentation, PickInfo, SelectionType, View};
use kurbo::Point;

/// Pick radius in view pixels for mouse input.
pub const MOUSE_PICK_SENSITIVITY: f64 = 3.0;
/// Pick radius in view pixels for touch input.
pub const TOUCH_PICK_SENSITIVITY: f64 = 10.0;

/// Decisions of a pick controller. Only [`PickHooks::is_pick_event`] and
/// [`PickHooks::handle_candidates`] are required.
pub trait PickHooks {
    fn is_pick_event(&self, event: &GestureEvent) -> bool;

    fn handle_candidates(&mut self, event: &GestureEvent, candidates: Vec<PickInfo>, view: &mut View)
    -> HandleEventResult;

    /// Whether a layer takes part in the pick.
    fn accepts_layer(&self, layer: &FeatureLayer) -> bool {
        layer.selectable
    }

    fn is_pick_multiple(&self, _event: &GestureEvent) -> bool {
        false
    }

    fn get_pick_point(&self, event: &GestureEvent) -> Point {
        event.view_point
    }

    fn get_sensitivity(&self, event: &GestureEvent) -> f64 {
        match event.input_type {
            InputType::Mouse => MOUSE_PICK_SENSITIVITY,
            InputType::Touch => TOUCH_PICK_SENSITIVITY,
        }
    }

    fn get_paint_representations(&self) -> Vec<PaintRepresentation> {
        vec![PaintRepresentation::Body, PaintRepresentation::Label]
    }

    fn get_candidates(
        &self,
        view: &View,
        view_point: Point,
        sensitivity: f64,
        representations: &[PaintRepresentation],
        multiple: bool,
    ) -> Vec<PickInfo> {
        view.pick_at(view_point, sensitivity, representations, multiple, |layer| {
            self.accepts_layer(layer)
        })
    }
}

/// Runs a [`PickHooks`] implementation as a controller.
pub struct PickController<H> {
    hooks: H,
    events: EventedSupport<ControllerEvent>,
}

impl<H: PickHooks> PickController<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            hooks,
            events: EventedSupport::new(),
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

impl<H: PickHooks> Controller for PickController<H> {
    fn on_gesture_event(&mut self, event: &GestureEvent, view: &mut View) -> HandleEventResult {
        if !self.hooks.is_pick_event(event) {
            return HandleEventResult::IGNORED;
        }
        let representations = self.hooks.get_paint_representations();
        let candidates = self.hooks.get_candidates(
            view,
            self.hooks.get_pick_point(event),
            self.hooks.get_sensitivity(event),
            &representations,
            self.hooks.is_pick_multiple(event),
        );
        let result = self.hooks.handle_candidates(event, candidates, view);
        if result.is_handled() {
            self.events.emit(ControllerEvent::Invalidated);
        }
        result
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }
}

/// Selects on a confirmed single click. Shift toggles; otherwise the pick
/// replaces the selection. A click on nothing clears it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Select;

impl Select {
    pub fn selection_type(event: &GestureEvent) -> SelectionType {
        if event.modifiers.shift {
            SelectionType::Toggle
        } else {
            SelectionType::New
        }
    }
}

impl PickHooks for Select {
    fn is_pick_event(&self, event: &GestureEvent) -> bool {
        event.kind == GestureEventType::SINGLE_CLICK_CONFIRMED
    }

    fn handle_candidates(
        &mut self,
        event: &GestureEvent,
        candidates: Vec<PickInfo>,
        view: &mut View,
    ) -> HandleEventResult {
        let selection_type = Self::selection_type(event);
        if candidates.is_empty() {
            if selection_type == SelectionType::New && view.selection_count() > 0 {
                view.clear_selection();
                return HandleEventResult::HANDLED;
            }
            return HandleEventResult::IGNORED;
        }
        view.select(&candidates, selection_type);
        HandleEventResult::HANDLED
    }
}

pub type SelectController = PickController<Select>;

impl SelectController {
    pub fn select() -> Self {
        Self::new(Select)
    }
}

/// Tracks the features under the mouse. Never consumes the move.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hover;

impl PickHooks for Hover {
    fn is_pick_event(&self, event: &GestureEvent) -> bool {
        event.kind == GestureEventType::MOVE && event.input_type == InputType::Mouse
    }

    fn accepts_layer(&self, layer: &FeatureLayer) -> bool {
        layer.hoverable
    }

    fn handle_candidates(
        &mut self,
        _event: &GestureEvent,
        candidates: Vec<PickInfo>,
        view: &mut View,
    ) -> HandleEventResult {
        if view.set_hovered(candidates) {
            log::debug!("Hover changed to {} features", view.hovered().len());
        }
        HandleEventResult::IGNORED
    }
}

pub type HoverController = PickController<Hover>;

impl HoverController {
    pub fn hover() -> Self {
        Self::new(Hover)
    }
}

/// Opens a context menu for everything under a long press or secondary
/// click.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextMenuPick;

impl PickHooks for ContextMenuPick {
    fn is_pick_event(&self, event: &GestureEvent) -> bool {
        matches!(event.kind, GestureEventType::LONG_PRESS | GestureEventType::CONTEXT_MENU)
    }

    fn is_pick_multiple(&self, _event: &GestureEvent) -> bool {
        true
    }

    fn handle_candidates(
        &mut self,
        event: &GestureEvent,
        candidates: Vec<PickInfo>,
        view: &mut View,
    ) -> HandleEventResult {
        if candidates.is_empty() {
            return HandleEventResult::IGNORED;
        }
        view.open_context_menu(ContextMenu {
            view_point: event.view_point,
            items: candidates,
        });
        HandleEventResult::HANDLED
    }
}

pub type ContextMenuController = PickController<ContextMenuPick>;

impl ContextMenuController {
    pub fn context_menu() -> Self {
        Self::new(ContextMenuPick)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::view_with;
    use super::*;
    use crate::feature::Feature;
    use crate::input::Modifiers;
    use crate::shapes::{Bounds, Shape};

    fn confirmed(x: f64, y: f64) -> GestureEvent {
        GestureEvent::new(GestureEventType::SINGLE_CLICK_CONFIRMED, Point::new(x, y))
    }

    #[test]
    fn test_plain_click_selects_new() {
        let (mut view, layer, a) = view_with(Shape::Bounds(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let b = Feature::new(Shape::Bounds(Bounds::new(100.0, 0.0, 10.0, 10.0)));
        let b_id = b.id;
        view.layer_mut(layer).unwrap().add(b);
        view.select(
            &[PickInfo {
                layer,
                feature: b_id,
                representation: PaintRepresentation::Body,
            }],
            SelectionType::New,
        );

        let mut select = SelectController::select();
        let result = select.on_gesture_event(&confirmed(5.0, 5.0), &mut view);
        assert!(result.is_handled());
        assert_eq!(view.selection(layer).collect::<Vec<_>>(), vec![a]);
        assert_eq!(select.events().take_pending(), vec![ControllerEvent::Invalidated]);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut view, layer, a) = view_with(Shape::Bounds(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut select = SelectController::select();
        let event = confirmed(5.0, 5.0).with_modifiers(Modifiers::shift());
        select.on_gesture_event(&event, &mut view);
        assert!(view.is_selected(layer, a));
        select.on_gesture_event(&event, &mut view);
        assert!(!view.is_selected(layer, a));
    }

    #[test]
    fn test_click_on_nothing_clears() {
        let (mut view, layer, _) = view_with(Shape::Bounds(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut select = SelectController::select();
        select.on_gesture_event(&confirmed(5.0, 5.0), &mut view);
        assert_eq!(view.selection(layer).count(), 1);
        assert!(select.on_gesture_event(&confirmed(300.0, 300.0), &mut view).is_handled());
        assert_eq!(view.selection_count(), 0);
        assert!(select.on_gesture_event(&confirmed(300.0, 300.0), &mut view).is_ignored());
    }

    #[test]
    fn test_hover_ignores_and_tracks() {
        let (mut view, _, a) = view_with(Shape::Bounds(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut hover = HoverController::hover();
        let moved = GestureEvent::new(GestureEventType::MOVE, Point::new(5.0, 5.0));
        assert!(hover.on_gesture_event(&moved, &mut view).is_ignored());
        assert_eq!(view.hovered().len(), 1);
        assert_eq!(view.hovered()[0].feature, a);

        let touch = moved.clone().with_input(InputType::Touch);
        view.set_hovered(Vec::new());
        hover.on_gesture_event(&touch, &mut view);
        assert!(view.hovered().is_empty());
    }

    #[test]
    fn test_sensitivity_per_device() {
        let event = confirmed(0.0, 0.0);
        assert_eq!(Select.get_sensitivity(&event), 3.0);
        assert_eq!(Select.get_sensitivity(&event.with_input(InputType::Touch)), 10.0);
    }

    #[test]
    fn test_context_menu_opens_on_long_press() {
        let (mut view, _, a) = view_with(Shape::Bounds(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut menu = ContextMenuController::context_menu();
        let press = GestureEvent::new(GestureEventType::LONG_PRESS, Point::new(5.0, 5.0));
        assert!(menu.on_gesture_event(&press, &mut view).is_handled());
        let opened = view.context_menu().unwrap();
        assert_eq!(opened.items[0].feature, a);
    }
}
