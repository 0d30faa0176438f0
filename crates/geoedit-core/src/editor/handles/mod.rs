//! Edit handles: interactive units that mutate the edited shape.
//!
//! Every handle implements [`EditHandle`]. Most concrete handles follow the
//! activate / process / deactivate protocol of [`ThreeStepEditHandle`].
//! [`CompositeEditHandle`] runs several handles side by side and
//! [`CascadingEditHandle`] runs them one after the other.

mod bezier;
mod bounds;
mod cascading;
mod composite;
mod helper;
mod point;
mod point_create;
mod point_list;
mod sub_shape;
mod template;
mod touch;

pub use bezier::{BezierCurveCreateHandle, bezier_curve_edit_handle};
pub use bounds::{BoundsCorner, BoundsCreateHandle, BoundsResizeHandle, BoundsResizeHandleIdentifier};
pub use cascading::CascadingEditHandle;
pub use composite::{CompositeEditHandle, HandleSource};
pub use helper::{HelperHandle, HelperKind};
pub use point::{
    DragPoint, EditMoveConstraint, FnDragPoint, HandleIcon, PointDragHandle, PointHandleCore,
    PointTranslateHandle, ShapePoint, dimension_handle, drag_handle,
};
pub use point_create::{OnCreate, PointCreateHandle};
pub use point_list::{
    InsertPoint, PointListCreateHandle, SinglePointDeleteHandle, VertexPoint, point_list_delete_handle,
    point_list_edit_handle, point_list_insert_handle, point_list_vertex_handle,
};
pub use sub_shape::SubShapeHandle;
pub use template::{CreateByTemplateHandle, Template, default_point, default_size};
pub use touch::{BufferWidth, GeoBufferWidthHandle, ShapeTouchHandle, ShapeTranslateHandle, TouchAction, Translate};

use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::evented::{EventedSupport, HandleEvent};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::view::Cursor;

/// Interaction capability shared by all handles.
///
/// Handles do not own the shape; they reach it through the context of each
/// call and keep only indices and interaction state between calls.
pub trait EditHandle {
    fn on_gesture_event(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
        HandleEventResult::IGNORED
    }

    fn on_key_event(&mut self, _event: &KeyEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
        HandleEventResult::IGNORED
    }

    /// Cursor to show for `event`, if this handle has an opinion.
    fn get_cursor(&self, _event: &GestureEvent, _ctx: &EditContext<'_>) -> Option<Cursor> {
        None
    }

    /// Whether the owning controller should draw the feature itself.
    fn should_paint_feature(&self, _ctx: &EditContext<'_>) -> bool {
        true
    }

    fn on_draw(&self, _canvas: &mut dyn GeoCanvas, _ctx: &EditContext<'_>) {}

    fn on_draw_label(&self, _canvas: &mut dyn LabelCanvas, _ctx: &EditContext<'_>) {}

    /// Resynchronize with a shape changed by someone else.
    fn update(&mut self, _ctx: &EditContext<'_>) {}

    fn is_active(&self) -> bool {
        false
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent>;
}

/// Three-phase protocol: activate, process any number of times, deactivate.
///
/// Concrete handles call [`ThreeStepEditHandle::handle_phases`] from
/// [`EditHandle::on_gesture_event`] and override [`EditHandle::is_active`].
pub trait ThreeStepEditHandle: EditHandle {
    fn set_active(&mut self, active: bool);

    fn should_activate(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool;

    fn activate(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
        HandleEventResult::HANDLED
    }

    fn should_process(&self, event: &GestureEvent) -> bool;

    fn process(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult;

    fn should_deactivate(&self, event: &GestureEvent) -> bool;

    fn deactivate(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
        HandleEventResult::HANDLED
    }

    /// Run the phases for one event. All three may fire on the same event.
    fn handle_phases(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let mut result = HandleEventResult::IGNORED;
        if !self.is_active() && self.should_activate(event, ctx) {
            result |= self.activate(event, ctx);
            self.set_active(true);
            log::debug!("Handle activated on {:?}", event.kind);
        }
        if self.is_active() && self.should_process(event) {
            result |= self.process(event, ctx);
        }
        if self.is_active() && self.should_deactivate(event) {
            result |= self.deactivate(event, ctx);
            self.set_active(false);
            log::debug!("Handle deactivated on {:?}", event.kind);
        }
        result
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::input::GestureEventType;
    use crate::shapes::Shape;
    use kurbo::Point;

    /// Records phase calls to check the protocol ordering.
    #[derive(Default)]
    struct Recorder {
        active: bool,
        calls: Vec<&'static str>,
        events: EventedSupport<HandleEvent>,
    }

    impl EditHandle for Recorder {
        fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
            self.handle_phases(event, ctx)
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
            &mut self.events
        }
    }

    impl ThreeStepEditHandle for Recorder {
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn should_activate(&self, event: &GestureEvent, _ctx: &EditContext<'_>) -> bool {
            matches!(event.kind, GestureEventType::DOWN | GestureEventType::SINGLE_CLICK_UP)
        }

        fn activate(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
            self.calls.push("activate");
            HandleEventResult::HANDLED
        }

        fn should_process(&self, event: &GestureEvent) -> bool {
            matches!(event.kind, GestureEventType::DRAG | GestureEventType::SINGLE_CLICK_UP)
        }

        fn process(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
            self.calls.push("process");
            HandleEventResult::HANDLED
        }

        fn should_deactivate(&self, event: &GestureEvent) -> bool {
            matches!(event.kind, GestureEventType::DRAG_END | GestureEventType::SINGLE_CLICK_UP)
        }

        fn deactivate(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
            self.calls.push("deactivate");
            HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
        }
    }

    #[test]
    fn test_process_requires_activation() {
        let mut fx = Fixture::new(Shape::Point(Point::ZERO));
        let mut ctx = fx.ctx();
        let mut handle = Recorder::default();
        let start = down(0.0, 0.0);

        let r = handle.on_gesture_event(&drag(&start, 1.0, 1.0), &mut ctx);
        assert!(r.is_ignored());
        assert!(handle.calls.is_empty());

        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 1.0, 1.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 1.0, 1.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 1.0, 1.0), &mut ctx);
        assert_eq!(handle.calls, vec!["activate", "process", "deactivate"]);
        assert!(!handle.is_active());
    }

    #[test]
    fn test_all_phases_on_one_event() {
        let mut fx = Fixture::new(Shape::Point(Point::ZERO));
        let mut ctx = fx.ctx();
        let mut handle = Recorder::default();
        let r = handle.on_gesture_event(&click(0.0, 0.0), &mut ctx);
        assert_eq!(handle.calls, vec!["activate", "process", "deactivate"]);
        assert!(r.is_handled() && r.is_request_finish());
        assert!(!handle.is_active());
    }
}
