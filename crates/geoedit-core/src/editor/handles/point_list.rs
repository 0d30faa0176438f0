//! Handles for polylines and polygons: create, move, insert and delete
//! points.

use super::composite::{CompositeEditHandle, HandleSource, point_floor};
use super::point::{DragPoint, HandleIcon, PointDragHandle};
use super::{EditHandle, ThreeStepEditHandle};
use crate::canvas::GeoCanvas;
use crate::context::EditContext;
use crate::error::{EditError, EditResult};
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent};
use crate::input::{GestureEvent, GestureEventType, InputType};
use crate::result::HandleEventResult;
use crate::settings::EditSettings;
use crate::shapes::{Polyline, Shape};
use crate::view::Cursor;
use kurbo::Point;

/// Number of points of a point list; other shapes are a mismatch.
fn point_count(shape: &Shape) -> EditResult<usize> {
    shape
        .point_count()
        .ok_or_else(|| EditError::mismatch("point list", shape.shape_type()))
}

/// Smallest number of points a point list may finish or be reduced to.
fn effective_minimum(shape: &Shape, settings: &EditSettings) -> usize {
    settings.minimum_point_count.max(point_floor(shape))
}

/// Point `index` of a point list.
#[derive(Debug, Clone, Copy)]
pub struct VertexPoint {
    index: usize,
}

impl DragPoint for VertexPoint {
    fn point(&self, shape: &Shape) -> Option<Point> {
        shape.point(self.index)
    }

    fn drag(&mut self, point: Point, shape: &mut Shape, _events: &mut EventedSupport<HandleEvent>) {
        shape.set_point(self.index, point);
    }
}

pub(super) fn vertex_handle(index: usize) -> PointDragHandle<VertexPoint> {
    PointDragHandle::new(VertexPoint { index })
}

/// Drag handle for point `index` of `shape`.
pub fn point_list_vertex_handle(shape: &Shape, index: usize) -> EditResult<PointDragHandle<VertexPoint>> {
    EditError::check_index(index, point_count(shape)?)?;
    Ok(vertex_handle(index))
}

/// Midpoint of segment `index`; pressing it inserts a point there which is
/// then dragged.
#[derive(Debug, Clone, Copy)]
pub struct InsertPoint {
    index: usize,
    inserted: bool,
}

impl InsertPoint {
    fn segment(&self, shape: &Shape) -> Option<(Point, Point)> {
        let points = shape.points()?;
        let start = *points.get(self.index)?;
        let end = match points.get(self.index + 1) {
            Some(end) => *end,
            // Closing segment of a polygon.
            None if matches!(shape, Shape::Polygon(_)) && points.len() > 2 => points[0],
            None => return None,
        };
        Some((start, end))
    }
}

impl DragPoint for InsertPoint {
    fn point(&self, shape: &Shape) -> Option<Point> {
        if self.inserted {
            return shape.point(self.index + 1);
        }
        self.segment(shape).map(|(a, b)| a.midpoint(b))
    }

    fn drag(&mut self, point: Point, shape: &mut Shape, _events: &mut EventedSupport<HandleEvent>) {
        if self.inserted {
            shape.set_point(self.index + 1, point);
        }
    }

    fn begin(&mut self, shape: &mut Shape) -> bool {
        let Some(midpoint) = self.point(shape) else {
            return false;
        };
        let Some(points) = shape.points_mut() else {
            return false;
        };
        points.insert(self.index + 1, midpoint);
        self.inserted = true;
        log::debug!("Inserted point {} at {midpoint:?}", self.index + 1);
        true
    }

    fn end(&mut self, _shape: &mut Shape) {
        self.inserted = false;
    }

    fn icon(&self) -> HandleIcon {
        HandleIcon::Insert
    }
}

pub(super) fn insert_handle(index: usize) -> PointDragHandle<InsertPoint> {
    PointDragHandle::new(InsertPoint {
        index,
        inserted: false,
    })
}

/// Insert handle on segment `index` of `shape`. A polygon's closing
/// segment is the last one.
pub fn point_list_insert_handle(shape: &Shape, index: usize) -> EditResult<PointDragHandle<InsertPoint>> {
    point_count(shape)?;
    let segments = HandleSource::Insertion { maximum: None }.handle_count(shape);
    EditError::check_index(index, segments)?;
    Ok(insert_handle(index))
}

/// Removes point `index` on a modified click (mouse) or long press (touch).
pub struct SinglePointDeleteHandle {
    index: usize,
    active: bool,
    events: EventedSupport<HandleEvent>,
}

impl SinglePointDeleteHandle {
    /// Delete handle for point `index` of `shape`.
    pub fn new(shape: &Shape, index: usize) -> EditResult<Self> {
        EditError::check_index(index, point_count(shape)?)?;
        Ok(Self::at(index))
    }

    pub(super) fn at(index: usize) -> Self {
        Self {
            index,
            active: false,
            events: EventedSupport::new(),
        }
    }

    fn is_delete_gesture(event: &GestureEvent) -> bool {
        match event.input_type {
            InputType::Mouse => {
                event.kind == GestureEventType::SINGLE_CLICK_UP && event.modifiers.any()
            }
            InputType::Touch => event.kind == GestureEventType::LONG_PRESS,
        }
    }
}

pub fn point_list_delete_handle(shape: &Shape, index: usize) -> EditResult<SinglePointDeleteHandle> {
    SinglePointDeleteHandle::new(shape, index)
}

impl EditHandle for SinglePointDeleteHandle {
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

impl ThreeStepEditHandle for SinglePointDeleteHandle {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn should_activate(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        let count = ctx.shape().point_count().unwrap_or(0);
        Self::is_delete_gesture(event)
            && count > effective_minimum(ctx.shape(), ctx.settings)
            && ctx
                .shape()
                .point(self.index)
                .is_some_and(|p| ctx.interacts(event, p))
    }

    fn activate(&mut self, _event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        let index = self.index;
        let Some(points) = ctx.shape_mut().points_mut() else {
            return HandleEventResult::IGNORED;
        };
        if index >= points.len() {
            return HandleEventResult::IGNORED;
        }
        points.remove(index);
        log::debug!("Deleted point {index}");
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
        HandleEventResult::HANDLED
    }
}

/// Edit handle of a point list: delete, move and insert points.
pub fn point_list_edit_handle(shape: &Shape, settings: &EditSettings) -> CompositeEditHandle {
    let deletion = HandleSource::Deletion {
        minimum: settings.minimum_point_count,
    };
    let insertion = HandleSource::Insertion {
        maximum: settings.maximum_point_count,
    };
    CompositeEditHandle::default()
        .with(CompositeEditHandle::generated(deletion, shape))
        .with(CompositeEditHandle::generated(HandleSource::Vertices, shape))
        .with(CompositeEditHandle::generated(insertion, shape))
}

/// Creates a polyline or polygon point by point.
///
/// Each click adds a point. A double click finishes once the minimum is
/// met; reaching the maximum finishes at once. With freehand enabled,
/// dragging from the last point adds points along the drag.
#[derive(Default)]
pub struct PointListCreateHandle {
    drawing: bool,
    hover: Option<Point>,
    events: EventedSupport<HandleEvent>,
}

impl PointListCreateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn last_point(ctx: &EditContext<'_>) -> Option<Point> {
        ctx.shape().points().and_then(|points| points.last().copied())
    }

    fn count(ctx: &EditContext<'_>) -> usize {
        ctx.shape().point_count().unwrap_or(0)
    }

    fn push(&mut self, point: Point, ctx: &mut EditContext<'_>) {
        if ctx.shape().points().is_none() {
            *ctx.shape_mut() = Shape::Polyline(Polyline::default());
        }
        if let Some(points) = ctx.shape_mut().points_mut() {
            points.push(point);
        }
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
    }

    fn finish(&mut self, ctx: &EditContext<'_>) -> HandleEventResult {
        self.drawing = false;
        self.hover = None;
        log::debug!("Point list finished with {} points", Self::count(ctx));
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
        HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
    }

    fn near_last(event: &GestureEvent, ctx: &EditContext<'_>) -> bool {
        Self::last_point(ctx).is_some_and(|last| ctx.interacts(event, last))
    }

    fn after_add(&mut self, ctx: &EditContext<'_>) -> HandleEventResult {
        if ctx.settings.is_maximum_reached(Self::count(ctx)) {
            self.finish(ctx)
        } else {
            HandleEventResult::HANDLED
        }
    }
}

impl EditHandle for PointListCreateHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        match event.kind {
            GestureEventType::SINGLE_CLICK_UP => {
                if Self::near_last(event, ctx) {
                    return HandleEventResult::HANDLED;
                }
                let point = ctx.snap(event).point;
                self.push(point, ctx);
                self.after_add(ctx)
            }
            GestureEventType::DOUBLE_CLICK => {
                if Self::count(ctx) >= effective_minimum(ctx.shape(), ctx.settings) {
                    self.finish(ctx)
                } else {
                    HandleEventResult::HANDLED
                }
            }
            GestureEventType::DOWN if ctx.settings.freehand && Self::near_last(event, ctx) => {
                self.drawing = true;
                HandleEventResult::HANDLED
            }
            GestureEventType::DRAG if self.drawing => {
                let point = ctx.snap(event).point;
                let far_enough = Self::last_point(ctx)
                    .is_none_or(|last| last.distance(point) > ctx.model_radius(event));
                if far_enough {
                    self.push(point, ctx);
                    return self.after_add(ctx);
                }
                HandleEventResult::HANDLED
            }
            GestureEventType::DRAG_END | GestureEventType::UP if self.drawing => {
                self.drawing = false;
                HandleEventResult::HANDLED
            }
            GestureEventType::MOVE => {
                self.hover = Some(ctx.to_model(event.view_point));
                HandleEventResult::IGNORED
            }
            _ => HandleEventResult::IGNORED,
        }
    }

    fn get_cursor(&self, _event: &GestureEvent, _ctx: &EditContext<'_>) -> Option<Cursor> {
        Some(Cursor::Crosshair)
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        Self::count(ctx) > 0
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        let Some(points) = ctx.shape().points() else {
            return;
        };
        for point in points {
            canvas.draw_icon(ctx.to_view(*point), &ctx.settings.styles.point);
        }
        if let (Some(last), Some(hover)) = (points.last(), self.hover) {
            let rubber_band = Shape::Polyline(Polyline::new(vec![*last, hover]));
            canvas.draw_shape(&rubber_band, &ctx.settings.styles.helper);
        }
    }

    fn is_active(&self) -> bool {
        self.drawing
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::input::Modifiers;
    use crate::shapes::{Polygon, ShapeType};

    fn line(points: &[(f64, f64)]) -> Shape {
        Shape::Polyline(Polyline::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        ))
    }

    #[test]
    fn test_create_clicks_then_double_click() {
        let mut fx = Fixture::new(Shape::empty(ShapeType::Polyline));
        let mut ctx = fx.ctx();
        let mut handle = PointListCreateHandle::new();
        assert!(!handle.should_paint_feature(&ctx));

        handle.on_gesture_event(&click(0.0, 0.0), &mut ctx);
        // Too few points to finish.
        let r = handle.on_gesture_event(&double_click(0.0, 0.0), &mut ctx);
        assert!(!r.is_request_finish());
        handle.on_gesture_event(&click(100.0, 0.0), &mut ctx);
        // Repeated click on the last point is skipped.
        handle.on_gesture_event(&click(102.0, 1.0), &mut ctx);
        assert_eq!(ctx.shape().point_count(), Some(2));
        let r = handle.on_gesture_event(&double_click(102.0, 1.0), &mut ctx);
        assert!(r.is_handled() && r.is_request_finish());
    }

    #[test]
    fn test_create_stops_at_maximum() {
        let mut fx = Fixture::new(Shape::empty(ShapeType::Polygon));
        fx.settings = fx.settings.clone().with_point_count(3, Some(3));
        let mut ctx = fx.ctx();
        let mut handle = PointListCreateHandle::new();
        handle.on_gesture_event(&click(0.0, 0.0), &mut ctx);
        handle.on_gesture_event(&click(100.0, 0.0), &mut ctx);
        let r = handle.on_gesture_event(&click(100.0, 100.0), &mut ctx);
        assert!(r.is_request_finish());
        assert_eq!(ctx.shape().shape_type(), ShapeType::Polygon);
    }

    #[test]
    fn test_freehand_drag_adds_spaced_points() {
        let mut fx = Fixture::new(Shape::empty(ShapeType::Polyline));
        let mut ctx = fx.ctx();
        let mut handle = PointListCreateHandle::new();
        handle.on_gesture_event(&click(0.0, 0.0), &mut ctx);
        let start = down(0.0, 0.0);
        assert!(handle.on_gesture_event(&start, &mut ctx).is_handled());
        assert!(handle.is_active());
        for x in [5.0, 15.0, 20.0, 35.0] {
            handle.on_gesture_event(&drag(&start, x, 0.0), &mut ctx);
        }
        handle.on_gesture_event(&drag_end(&start, 35.0, 0.0), &mut ctx);
        assert!(!handle.is_active());
        assert_eq!(
            ctx.shape().points().unwrap(),
            &[Point::ZERO, Point::new(15.0, 0.0), Point::new(35.0, 0.0)]
        );
    }

    #[test]
    fn test_insert_handle_drags_new_point() {
        let mut fx = Fixture::new(line(&[(0.0, 0.0), (100.0, 0.0)]));
        let mut handle = point_list_insert_handle(&fx.feature.shape, 0).unwrap();
        let mut ctx = fx.ctx();
        let start = down(50.0, 0.0);
        handle.on_gesture_event(&start, &mut ctx);
        assert_eq!(ctx.shape().point_count(), Some(3));
        handle.on_gesture_event(&drag(&start, 50.0, 40.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 50.0, 40.0), &mut ctx);
        assert_eq!(ctx.shape().point(1), Some(Point::new(50.0, 40.0)));
    }

    #[test]
    fn test_insert_on_closing_segment() {
        let square = Shape::Polygon(Polygon::new(vec![
            Point::ZERO,
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]));
        let mut fx = Fixture::new(square);
        let handle = point_list_insert_handle(&fx.feature.shape, 3).unwrap();
        let ctx = fx.ctx();
        assert_eq!(handle.target().point(ctx.shape()), Some(Point::new(0.0, 50.0)));
    }

    #[test]
    fn test_delete_respects_floor() {
        let mut fx = Fixture::new(line(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]));
        let mut handle = point_list_delete_handle(&fx.feature.shape, 1).unwrap();
        let mut first = point_list_delete_handle(&fx.feature.shape, 0).unwrap();
        let mut ctx = fx.ctx();
        // Plain click does not delete.
        assert!(handle.on_gesture_event(&click(100.0, 0.0), &mut ctx).is_ignored());
        let r = handle.on_gesture_event(&ctrl_click(100.0, 0.0), &mut ctx);
        assert!(r.is_handled());
        assert_eq!(ctx.shape().point_count(), Some(2));
        // Two points is the floor for a polyline.
        first.on_gesture_event(&ctrl_click(0.0, 0.0), &mut ctx);
        assert_eq!(ctx.shape().point_count(), Some(2));
    }

    #[test]
    fn test_delete_by_long_press() {
        let mut fx = Fixture::new(line(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]));
        let mut handle = point_list_delete_handle(&fx.feature.shape, 2).unwrap();
        let mut middle = point_list_delete_handle(&fx.feature.shape, 1).unwrap();
        let mut ctx = fx.ctx();
        let press = at(GestureEventType::LONG_PRESS, 200.0, 0.0).with_input(InputType::Touch);
        assert!(handle.on_gesture_event(&press, &mut ctx).is_handled());
        assert_eq!(ctx.shape().point_count(), Some(2));
        let shift = click(100.0, 0.0).with_modifiers(Modifiers::shift());
        assert!(!middle.on_gesture_event(&shift, &mut ctx).is_handled());
    }

    #[test]
    fn test_handle_index_out_of_range() {
        let shape = line(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]);
        let out_of_range = Err(EditError::IndexOutOfRange { index: 99, len: 3 });
        assert_eq!(point_list_vertex_handle(&shape, 99).map(|_| ()), out_of_range);
        assert_eq!(point_list_delete_handle(&shape, 99).map(|_| ()), out_of_range);
        assert_eq!(
            point_list_insert_handle(&shape, 2).map(|_| ()),
            Err(EditError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(point_list_vertex_handle(&shape, 2).is_ok());
        assert!(matches!(
            point_list_vertex_handle(&Shape::Point(Point::ZERO), 0),
            Err(EditError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_edit_handle_insert_regenerates_siblings() {
        let mut fx = Fixture::new(line(&[(0.0, 0.0), (100.0, 0.0)]));
        let settings = fx.settings.clone();
        let mut handle = point_list_edit_handle(&fx.feature.shape, &settings);
        let mut ctx = fx.ctx();

        let start = down(50.0, 0.0);
        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 50.0, 30.0), &mut ctx);
        handle.on_gesture_event(&drag(&start, 50.0, 60.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 50.0, 60.0), &mut ctx);
        assert_eq!(
            ctx.shape().points().unwrap(),
            &[Point::ZERO, Point::new(50.0, 60.0), Point::new(100.0, 0.0)]
        );
        assert!(!handle.is_active());

        // The new middle point now has its own vertex handle.
        let start = down(50.0, 60.0);
        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 50.0, 80.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 50.0, 80.0), &mut ctx);
        assert_eq!(ctx.shape().point(1), Some(Point::new(50.0, 80.0)));
        assert_eq!(ctx.shape().point_count(), Some(3));

        // And it can be deleted again.
        handle.on_gesture_event(&ctrl_click(50.0, 80.0), &mut ctx);
        assert_eq!(ctx.shape().point_count(), Some(2));
    }
}
