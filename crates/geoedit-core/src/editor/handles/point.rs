//! Point handles: drag a single point of the shape.

use super::{EditHandle, ThreeStepEditHandle};
use crate::canvas::GeoCanvas;
use crate::context::EditContext;
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent};
use crate::input::{GestureEvent, GestureEventType};
use crate::result::HandleEventResult;
use crate::shapes::Shape;
use crate::style::IconStyle;
use crate::view::Cursor;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Restriction applied to a dragged point.
///
/// The model is planar: `Z` and `Vertical` both move along the y axis,
/// `XY` and `OnTerrain` move freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditMoveConstraint {
    XY,
    Z,
    #[default]
    OnTerrain,
    Vertical,
    Horizontal,
}

impl EditMoveConstraint {
    /// Constrain `target` relative to the point where the drag started.
    pub fn apply(self, start: Point, target: Point) -> Point {
        match self {
            EditMoveConstraint::XY | EditMoveConstraint::OnTerrain => target,
            EditMoveConstraint::Z | EditMoveConstraint::Vertical => Point::new(start.x, target.y),
            EditMoveConstraint::Horizontal => Point::new(target.x, start.y),
        }
    }
}

/// Which icon a point handle uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandleIcon {
    #[default]
    Point,
    Insert,
    Dimension,
}

/// State shared by all point-like handles: icon and last snap result.
#[derive(Debug, Clone, Default)]
pub struct PointHandleCore {
    pub icon: HandleIcon,
    /// Model point the last processed event snapped to.
    pub snap_point: Option<Point>,
}

impl PointHandleCore {
    pub fn new(icon: HandleIcon) -> Self {
        Self {
            icon,
            snap_point: None,
        }
    }

    fn icon_style<'s>(&self, ctx: &'s EditContext<'_>, active: bool) -> &'s IconStyle {
        let styles = &ctx.settings.styles;
        if active {
            return &styles.active_point;
        }
        match self.icon {
            HandleIcon::Point => &styles.point,
            HandleIcon::Insert => &styles.insert_point,
            HandleIcon::Dimension => &styles.dimension_point,
        }
    }

    pub fn cursor(&self, active: bool, interacts: bool) -> Option<Cursor> {
        if active {
            Some(Cursor::Grab)
        } else if interacts {
            Some(Cursor::Pointer)
        } else {
            None
        }
    }

    pub fn draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>, point: Point, active: bool) {
        canvas.draw_icon(ctx.to_view(point), self.icon_style(ctx, active));
        if let Some(snap) = self.snap_point {
            canvas.draw_icon(ctx.to_view(snap), &ctx.settings.styles.snap_icon);
        }
    }
}

/// Addressing of the point a [`PointDragHandle`] moves.
pub trait DragPoint {
    /// Current location, `None` if the shape has no such point.
    fn point(&self, shape: &Shape) -> Option<Point>;

    /// Move the point to `point`.
    fn drag(&mut self, point: Point, shape: &mut Shape, events: &mut EventedSupport<HandleEvent>);

    /// Called on activation. Returns true if the shape was changed.
    fn begin(&mut self, _shape: &mut Shape) -> bool {
        false
    }

    fn end(&mut self, _shape: &mut Shape) {}

    fn icon(&self) -> HandleIcon {
        HandleIcon::Point
    }
}

/// Drag handle for one point of the shape.
///
/// Activates on a press near the point, follows drags, deactivates on
/// release, drag end or context menu.
pub struct PointDragHandle<T> {
    target: T,
    core: PointHandleCore,
    constraint: EditMoveConstraint,
    active: bool,
    start: Option<Point>,
    changed: bool,
    events: EventedSupport<HandleEvent>,
}

impl<T: DragPoint> PointDragHandle<T> {
    pub fn new(target: T) -> Self {
        let core = PointHandleCore::new(target.icon());
        Self {
            target,
            core,
            constraint: EditMoveConstraint::default(),
            active: false,
            start: None,
            changed: false,
            events: EventedSupport::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: EditMoveConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Model point for `event`, snapped and constrained.
    pub fn view_to_model(&mut self, event: &GestureEvent, ctx: &EditContext<'_>) -> Point {
        let snapped = ctx.snap(event);
        self.core.snap_point = snapped.is_snapped().then_some(snapped.point);
        match self.start {
            Some(start) => self.constraint.apply(start, snapped.point),
            None => snapped.point,
        }
    }

    fn interacts(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        self.target
            .point(ctx.shape())
            .is_some_and(|p| ctx.interacts(event, p))
    }
}

impl<T: DragPoint> EditHandle for PointDragHandle<T> {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.handle_phases(event, ctx)
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        self.core.cursor(self.active, self.interacts(event, ctx))
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        if let Some(point) = self.target.point(ctx.shape()) {
            self.core.draw(canvas, ctx, point, self.active);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}

impl<T: DragPoint> ThreeStepEditHandle for PointDragHandle<T> {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn should_activate(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        event.kind == GestureEventType::DOWN && self.interacts(event, ctx)
    }

    fn activate(&mut self, _event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.changed = self.target.begin(ctx.shape_mut());
        self.start = self.target.point(ctx.shape());
        if self.changed {
            self.events.emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
        }
        HandleEventResult::HANDLED
    }

    fn should_process(&self, event: &GestureEvent) -> bool {
        event.kind == GestureEventType::DRAG
    }

    fn process(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let point = self.view_to_model(event, ctx);
        self.target.drag(point, ctx.shape_mut(), &mut self.events);
        self.changed = true;
        self.events.emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
        HandleEventResult::HANDLED
    }

    fn should_deactivate(&self, event: &GestureEvent) -> bool {
        matches!(
            event.kind,
            GestureEventType::DRAG_END | GestureEventType::UP | GestureEventType::CONTEXT_MENU
        )
    }

    fn deactivate(&mut self, _event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.target.end(ctx.shape_mut());
        self.core.snap_point = None;
        self.start = None;
        if std::mem::take(&mut self.changed) {
            self.events.emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
        }
        HandleEventResult::HANDLED
    }
}

type PointGetter = Box<dyn Fn(&Shape) -> Option<Point>>;
type PointSetter = Box<dyn FnMut(&mut Shape, Point)>;

/// [`DragPoint`] built from a getter and a setter closure.
pub struct FnDragPoint {
    get: PointGetter,
    set: PointSetter,
    icon: HandleIcon,
}

impl FnDragPoint {
    pub fn new(
        get: impl Fn(&Shape) -> Option<Point> + 'static,
        set: impl FnMut(&mut Shape, Point) + 'static,
    ) -> Self {
        Self {
            get: Box::new(get),
            set: Box::new(set),
            icon: HandleIcon::Point,
        }
    }

    pub fn with_icon(mut self, icon: HandleIcon) -> Self {
        self.icon = icon;
        self
    }
}

impl DragPoint for FnDragPoint {
    fn point(&self, shape: &Shape) -> Option<Point> {
        (self.get)(shape)
    }

    fn drag(&mut self, point: Point, shape: &mut Shape, _events: &mut EventedSupport<HandleEvent>) {
        (self.set)(shape, point);
    }

    fn icon(&self) -> HandleIcon {
        self.icon
    }
}

/// Boxed drag handle from closures.
pub fn drag_handle(
    get: impl Fn(&Shape) -> Option<Point> + 'static,
    set: impl FnMut(&mut Shape, Point) + 'static,
) -> PointDragHandle<FnDragPoint> {
    PointDragHandle::new(FnDragPoint::new(get, set))
}

/// Drag handle from closures for a dimension such as a radius or width.
pub fn dimension_handle(
    get: impl Fn(&Shape) -> Option<Point> + 'static,
    set: impl FnMut(&mut Shape, Point) + 'static,
) -> PointDragHandle<FnDragPoint> {
    PointDragHandle::new(FnDragPoint::new(get, set).with_icon(HandleIcon::Dimension))
}

/// The location of a point shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapePoint;

impl DragPoint for ShapePoint {
    fn point(&self, shape: &Shape) -> Option<Point> {
        match shape {
            Shape::Point(p) => Some(*p),
            _ => None,
        }
    }

    fn drag(&mut self, point: Point, shape: &mut Shape, _events: &mut EventedSupport<HandleEvent>) {
        if let Shape::Point(p) = shape {
            *p = point;
        }
    }
}

/// Moves a point shape to the snapped cursor location.
pub type PointTranslateHandle = PointDragHandle<ShapePoint>;

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::evented::{EditShapeStatus, HandleEventKind};
    use crate::shapes::Polyline;
    use crate::snap::SnapMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn statuses(handle: &mut impl EditHandle) -> Vec<EditShapeStatus> {
        handle
            .events()
            .take_pending()
            .into_iter()
            .filter_map(|e| match e {
                HandleEvent::EditShape(edit) => Some(edit.status),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_constraints() {
        let start = Point::new(1.0, 1.0);
        let target = Point::new(5.0, 7.0);
        assert_eq!(EditMoveConstraint::OnTerrain.apply(start, target), target);
        assert_eq!(EditMoveConstraint::XY.apply(start, target), target);
        assert_eq!(EditMoveConstraint::Horizontal.apply(start, target), Point::new(5.0, 1.0));
        assert_eq!(EditMoveConstraint::Vertical.apply(start, target), Point::new(1.0, 7.0));
        assert_eq!(EditMoveConstraint::Z.apply(start, target), Point::new(1.0, 7.0));
    }

    #[test]
    fn test_point_translate_drag_cycle() {
        let mut fx = Fixture::new(Shape::Point(Point::new(10.0, 10.0)));
        let mut ctx = fx.ctx();
        let mut handle = PointTranslateHandle::new(ShapePoint);

        let far = down(100.0, 100.0);
        assert!(handle.on_gesture_event(&far, &mut ctx).is_ignored());

        let start = down(12.0, 11.0);
        assert!(handle.on_gesture_event(&start, &mut ctx).is_handled());
        assert_eq!(handle.get_cursor(&start, &ctx), Some(Cursor::Grab));
        handle.on_gesture_event(&drag(&start, 30.0, 40.0), &mut ctx);
        assert_eq!(ctx.shape(), &Shape::Point(Point::new(30.0, 40.0)));
        handle.on_gesture_event(&drag(&start, 31.0, 41.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 31.0, 41.0), &mut ctx);
        assert!(!handle.is_active());

        let statuses = statuses(&mut handle);
        assert_eq!(
            statuses,
            vec![
                EditShapeStatus::InProgress,
                EditShapeStatus::InProgress,
                EditShapeStatus::Finished
            ]
        );
    }

    #[test]
    fn test_press_and_release_without_drag_emits_nothing() {
        let mut fx = Fixture::new(Shape::Point(Point::new(10.0, 10.0)));
        let mut ctx = fx.ctx();
        let mut handle = PointTranslateHandle::new(ShapePoint);
        handle.on_gesture_event(&down(10.0, 10.0), &mut ctx);
        handle.on_gesture_event(&at(GestureEventType::UP, 10.0, 10.0), &mut ctx);
        assert!(!handle.is_active());
        assert!(statuses(&mut handle).is_empty());
    }

    #[test]
    fn test_cursor_pointer_when_hovering() {
        let mut fx = Fixture::new(Shape::Point(Point::new(10.0, 10.0)));
        let ctx = fx.ctx();
        let handle = PointTranslateHandle::new(ShapePoint);
        assert_eq!(handle.get_cursor(&moved(14.0, 10.0), &ctx), Some(Cursor::Pointer));
        assert_eq!(handle.get_cursor(&moved(40.0, 10.0), &ctx), None);
    }

    #[test]
    fn test_fn_drag_point_with_constraint_and_snap() {
        let mut fx = Fixture::new(Shape::Polyline(Polyline::new(vec![
            Point::ZERO,
            Point::new(50.0, 0.0),
        ])));
        fx.settings.snap_mode = SnapMode::Grid;
        let mut ctx = fx.ctx();
        let mut handle = drag_handle(
            |s| s.point(1),
            |s, p| {
                s.set_point(1, p);
            },
        )
        .with_constraint(EditMoveConstraint::Horizontal);

        let start = down(50.0, 0.0);
        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 77.0, 33.0), &mut ctx);
        assert_eq!(ctx.shape().point(1), Some(Point::new(80.0, 0.0)));

        let mut canvas = crate::canvas::RecordingCanvas::new();
        handle.on_draw(&mut canvas, &ctx);
        // Handle icon plus snap marker.
        assert_eq!(canvas.icon_count(), 2);
    }

    #[test]
    fn test_drag_point_can_emit_events() {
        struct Flipper;
        impl DragPoint for Flipper {
            fn point(&self, shape: &Shape) -> Option<Point> {
                Some(shape.focus_point())
            }
            fn drag(&mut self, point: Point, shape: &mut Shape, events: &mut EventedSupport<HandleEvent>) {
                if let Shape::Point(p) = shape {
                    *p = point;
                }
                events.emit(HandleEvent::Flipped {
                    horizontal: true,
                    vertical: false,
                });
            }
        }

        let mut fx = Fixture::new(Shape::Point(Point::ZERO));
        let mut ctx = fx.ctx();
        let mut handle = PointDragHandle::new(Flipper);
        let flips = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&flips);
        handle
            .events()
            .on(HandleEventKind::Flipped, move |_| *counter.borrow_mut() += 1);
        let start = down(0.0, 0.0);
        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 5.0, 0.0), &mut ctx);
        assert_eq!(*flips.borrow(), 1);
    }
}
