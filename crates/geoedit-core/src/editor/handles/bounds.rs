//! Corner handles for axis-aligned bounds.

use super::point::{DragPoint, PointDragHandle};
use super::EditHandle;
use crate::canvas::GeoCanvas;
use crate::context::EditContext;
use crate::evented::{EditShapeEvent, EventedSupport, HandleEvent, HandleEventKind};
use crate::input::{GestureEvent, GestureEventType};
use crate::result::HandleEventResult;
use crate::shapes::{Bounds, Shape};
use crate::view::Cursor;
use kurbo::Point;
use std::cell::Cell;
use std::rc::Rc;

/// Which corner of the bounds a resize handle holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundsResizeHandleIdentifier {
    LowerLeft,
    LowerRight,
    UpperLeft,
    UpperRight,
}

impl BoundsResizeHandleIdentifier {
    pub const ALL: [Self; 4] = [Self::LowerLeft, Self::LowerRight, Self::UpperRight, Self::UpperLeft];

    pub fn is_left(self) -> bool {
        matches!(self, Self::LowerLeft | Self::UpperLeft)
    }

    pub fn is_lower(self) -> bool {
        matches!(self, Self::LowerLeft | Self::LowerRight)
    }

    fn from_sides(left: bool, lower: bool) -> Self {
        match (left, lower) {
            (true, true) => Self::LowerLeft,
            (false, true) => Self::LowerRight,
            (true, false) => Self::UpperLeft,
            (false, false) => Self::UpperRight,
        }
    }

    /// Mirror across the vertical axis (`horizontal`) and/or the horizontal
    /// axis (`vertical`).
    pub fn flip(self, horizontal: bool, vertical: bool) -> Self {
        Self::from_sides(self.is_left() != horizontal, self.is_lower() != vertical)
    }

    pub fn opposite(self) -> Self {
        self.flip(true, true)
    }

    pub fn corner(self, bounds: &Bounds) -> Point {
        match self {
            Self::LowerLeft => bounds.lower_left(),
            Self::LowerRight => bounds.lower_right(),
            Self::UpperLeft => bounds.upper_left(),
            Self::UpperRight => bounds.upper_right(),
        }
    }
}

/// [`DragPoint`] for one corner. The identifier is shared with the sibling
/// corners so that all four can be relabeled when the bounds flip.
#[derive(Debug, Clone)]
pub struct BoundsCorner {
    identifier: Rc<Cell<BoundsResizeHandleIdentifier>>,
}

impl BoundsCorner {
    pub fn new(identifier: BoundsResizeHandleIdentifier) -> Self {
        Self {
            identifier: Rc::new(Cell::new(identifier)),
        }
    }

    pub fn identifier(&self) -> BoundsResizeHandleIdentifier {
        self.identifier.get()
    }
}

impl DragPoint for BoundsCorner {
    fn point(&self, shape: &Shape) -> Option<Point> {
        match shape {
            Shape::Bounds(bounds) => Some(self.identifier().corner(bounds)),
            _ => None,
        }
    }

    fn drag(&mut self, point: Point, shape: &mut Shape, events: &mut EventedSupport<HandleEvent>) {
        let Shape::Bounds(bounds) = shape else {
            return;
        };
        let identifier = self.identifier();
        let anchor = identifier.opposite().corner(bounds);
        *bounds = Bounds::from_points(anchor, point);

        let left = if point.x == anchor.x {
            identifier.is_left()
        } else {
            point.x < anchor.x
        };
        let lower = if point.y == anchor.y {
            identifier.is_lower()
        } else {
            point.y < anchor.y
        };
        let horizontal = left != identifier.is_left();
        let vertical = lower != identifier.is_lower();
        if horizontal || vertical {
            log::debug!("Bounds flipped at {identifier:?}: h={horizontal} v={vertical}");
            events.emit(HandleEvent::Flipped {
                horizontal,
                vertical,
            });
        }
    }
}

/// Drag handle for one corner of a bounds shape.
pub type BoundsResizeHandle = PointDragHandle<BoundsCorner>;

impl BoundsResizeHandle {
    pub fn corner(identifier: BoundsResizeHandleIdentifier) -> Self {
        Self::new(BoundsCorner::new(identifier))
    }

    /// All four corners, wired so that a flip reported by any of them
    /// relabels every corner.
    pub fn corners() -> Vec<Self> {
        let mut handles: Vec<Self> = BoundsResizeHandleIdentifier::ALL
            .into_iter()
            .map(Self::corner)
            .collect();
        let cells: Vec<_> = handles
            .iter()
            .map(|h| Rc::clone(&h.target().identifier))
            .collect();
        for handle in &mut handles {
            let cells = cells.clone();
            handle.events().on(HandleEventKind::Flipped, move |event| {
                if let HandleEvent::Flipped {
                    horizontal,
                    vertical,
                } = event
                {
                    for cell in &cells {
                        cell.set(cell.get().flip(*horizontal, *vertical));
                    }
                }
            });
        }
        handles
    }

    pub fn identifier(&self) -> BoundsResizeHandleIdentifier {
        self.target().identifier()
    }
}

/// Creates bounds by dragging from corner to corner, or by clicking two
/// corners.
#[derive(Default)]
pub struct BoundsCreateHandle {
    anchor: Option<Point>,
    changed: bool,
    events: EventedSupport<HandleEvent>,
}

impl BoundsCreateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn stretch(&mut self, anchor: Point, event: &GestureEvent, ctx: &mut EditContext<'_>) {
        let point = ctx.snap(event).point;
        *ctx.shape_mut() = Shape::Bounds(Bounds::from_points(anchor, point));
        self.changed = true;
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::in_progress(ctx.shape())));
    }

    fn finish(&mut self, ctx: &EditContext<'_>) -> HandleEventResult {
        self.anchor = None;
        self.changed = false;
        self.events
            .emit(HandleEvent::EditShape(EditShapeEvent::finished(ctx.shape())));
        HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
    }
}

impl EditHandle for BoundsCreateHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        match (event.kind, self.anchor) {
            (GestureEventType::DOWN, None) | (GestureEventType::SINGLE_CLICK_UP, None) => {
                self.anchor = Some(ctx.snap(event).point);
                HandleEventResult::HANDLED
            }
            (GestureEventType::DRAG | GestureEventType::MOVE, Some(anchor)) => {
                self.stretch(anchor, event, ctx);
                HandleEventResult::HANDLED
            }
            (GestureEventType::DRAG_END, Some(anchor)) => {
                self.stretch(anchor, event, ctx);
                self.finish(ctx)
            }
            (GestureEventType::SINGLE_CLICK_UP, Some(anchor)) => {
                // The click that set the anchor.
                if ctx.interacts(event, anchor) {
                    return HandleEventResult::HANDLED;
                }
                self.stretch(anchor, event, ctx);
                self.finish(ctx)
            }
            _ => HandleEventResult::IGNORED,
        }
    }

    fn get_cursor(&self, _event: &GestureEvent, _ctx: &EditContext<'_>) -> Option<Cursor> {
        Some(Cursor::Crosshair)
    }

    fn should_paint_feature(&self, _ctx: &EditContext<'_>) -> bool {
        self.changed
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        if let Some(anchor) = self.anchor {
            canvas.draw_icon(ctx.to_view(anchor), &ctx.settings.styles.point);
        }
    }

    fn is_active(&self) -> bool {
        self.anchor.is_some()
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
    use crate::shapes::ShapeType;
    use super::BoundsResizeHandleIdentifier::*;

    #[test]
    fn test_identifier_flip() {
        assert_eq!(LowerLeft.flip(true, false), LowerRight);
        assert_eq!(LowerLeft.flip(false, true), UpperLeft);
        assert_eq!(UpperRight.opposite(), LowerLeft);
        assert_eq!(UpperLeft.flip(false, false), UpperLeft);
    }

    #[test]
    fn test_resize_without_flip() {
        let mut fx = Fixture::new(Shape::Bounds(Bounds::new(0.0, 0.0, 100.0, 50.0)));
        let mut ctx = fx.ctx();
        let mut handle = BoundsResizeHandle::corner(UpperRight);
        let start = down(100.0, 50.0);
        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 150.0, 80.0), &mut ctx);
        handle.on_gesture_event(&drag_end(&start, 150.0, 80.0), &mut ctx);
        assert_eq!(ctx.shape(), &Shape::Bounds(Bounds::new(0.0, 0.0, 150.0, 80.0)));
        assert_eq!(handle.identifier(), UpperRight);
    }

    #[test]
    fn test_crossing_relabels_all_corners() {
        let mut fx = Fixture::new(Shape::Bounds(Bounds::new(0.0, 0.0, 100.0, 50.0)));
        let mut ctx = fx.ctx();
        let mut corners = BoundsResizeHandle::corners();
        // Drag the lower-left corner past the right side.
        let start = down(0.0, 0.0);
        let lower_left = &mut corners[0];
        lower_left.on_gesture_event(&start, &mut ctx);
        lower_left.on_gesture_event(&drag(&start, 130.0, 10.0), &mut ctx);
        assert_eq!(ctx.shape(), &Shape::Bounds(Bounds::new(100.0, 10.0, 30.0, 40.0)));
        assert_eq!(lower_left.identifier(), LowerRight);
        assert_eq!(corners[1].identifier(), LowerLeft);

        // Continuing the same drag keeps following the pointer.
        let lower_left = &mut corners[0];
        lower_left.on_gesture_event(&drag(&start, 140.0, 5.0), &mut ctx);
        assert_eq!(ctx.shape(), &Shape::Bounds(Bounds::new(100.0, 5.0, 40.0, 45.0)));
    }

    #[test]
    fn test_create_by_drag() {
        let mut fx = Fixture::new(Shape::empty(ShapeType::Bounds));
        let mut ctx = fx.ctx();
        let mut handle = BoundsCreateHandle::new();
        let start = down(10.0, 10.0);
        handle.on_gesture_event(&start, &mut ctx);
        assert!(!handle.should_paint_feature(&ctx));
        handle.on_gesture_event(&drag(&start, 60.0, 40.0), &mut ctx);
        let r = handle.on_gesture_event(&drag_end(&start, 70.0, 50.0), &mut ctx);
        assert!(r.is_request_finish());
        assert_eq!(ctx.shape(), &Shape::Bounds(Bounds::new(10.0, 10.0, 60.0, 40.0)));
    }

    #[test]
    fn test_create_by_two_clicks() {
        let mut fx = Fixture::new(Shape::empty(ShapeType::Bounds));
        let mut ctx = fx.ctx();
        let mut handle = BoundsCreateHandle::new();
        handle.on_gesture_event(&down(10.0, 10.0), &mut ctx);
        handle.on_gesture_event(&at(GestureEventType::UP, 10.0, 10.0), &mut ctx);
        let r = handle.on_gesture_event(&click(10.0, 10.0), &mut ctx);
        assert_eq!(r, HandleEventResult::HANDLED);
        handle.on_gesture_event(&moved(30.0, 30.0), &mut ctx);
        let r = handle.on_gesture_event(&click(50.0, 60.0), &mut ctx);
        assert!(r.is_request_finish());
        assert_eq!(ctx.shape(), &Shape::Bounds(Bounds::new(10.0, 10.0, 40.0, 50.0)));
        assert!(!handle.is_active());
    }
}
