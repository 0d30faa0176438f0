//! Co-active composition of handles.

use super::point_list::{SinglePointDeleteHandle, insert_handle, vertex_handle};
use super::EditHandle;
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::evented::{EventedSupport, HandleEvent};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::shapes::Shape;
use crate::view::Cursor;

/// Points a point list keeps regardless of the configured minimum.
pub(crate) fn point_floor(shape: &Shape) -> usize {
    match shape {
        Shape::Polygon(_) => 3,
        _ => 2,
    }
}

/// Where the children of a [`CompositeEditHandle`] come from.
///
/// Generated sources are reconciled against the shape after every change:
/// when the number of handles the shape calls for differs from the number
/// present, the children are rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSource {
    /// Children are given once and never regenerated.
    Fixed,
    /// One drag handle per point.
    Vertices,
    /// One delete handle per point while points may still be removed.
    Deletion { minimum: usize },
    /// One insert handle per segment until `maximum` points are reached.
    Insertion { maximum: Option<usize> },
}

impl HandleSource {
    /// Number of children the shape calls for.
    pub fn handle_count(self, shape: &Shape) -> usize {
        let count = shape.point_count().unwrap_or(0);
        match self {
            HandleSource::Fixed => 0,
            HandleSource::Vertices => count,
            HandleSource::Deletion { minimum } => {
                if count > minimum.max(point_floor(shape)) {
                    count
                } else {
                    0
                }
            }
            HandleSource::Insertion { maximum } => {
                if maximum.is_some_and(|max| count >= max) {
                    0
                } else if matches!(shape, Shape::Polygon(_)) && count > 2 {
                    count
                } else {
                    count.saturating_sub(1)
                }
            }
        }
    }

    pub fn create(self, shape: &Shape) -> Vec<Box<dyn EditHandle>> {
        let count = self.handle_count(shape);
        (0..count)
            .map(|index| -> Box<dyn EditHandle> {
                match self {
                    HandleSource::Fixed | HandleSource::Vertices => Box::new(vertex_handle(index)),
                    HandleSource::Deletion { .. } => Box::new(SinglePointDeleteHandle::at(index)),
                    HandleSource::Insertion { .. } => Box::new(insert_handle(index)),
                }
            })
            .collect()
    }
}

enum Active {
    None,
    Index(usize),
    /// A handle that was active when its siblings were regenerated. It keeps
    /// priority until it deactivates and is then dropped.
    Pinned(Box<dyn EditHandle>),
}

/// Runs its children side by side.
///
/// The child that handled the last event and is still active gets the next
/// event first. Otherwise children are offered the event in order until one
/// handles it.
pub struct CompositeEditHandle {
    handles: Vec<Box<dyn EditHandle>>,
    source: HandleSource,
    active: Active,
    events: EventedSupport<HandleEvent>,
}

impl Default for CompositeEditHandle {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CompositeEditHandle {
    pub fn new(handles: Vec<Box<dyn EditHandle>>) -> Self {
        Self {
            handles,
            source: HandleSource::Fixed,
            active: Active::None,
            events: EventedSupport::new(),
        }
    }

    /// Composite whose children are generated from the shape.
    pub fn generated(source: HandleSource, shape: &Shape) -> Self {
        Self {
            handles: source.create(shape),
            source,
            active: Active::None,
            events: EventedSupport::new(),
        }
    }

    pub fn push(&mut self, handle: Box<dyn EditHandle>) {
        self.handles.push(handle);
    }

    pub fn with(mut self, handle: impl EditHandle + 'static) -> Self {
        self.push(Box::new(handle));
        self
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn source(&self) -> HandleSource {
        self.source
    }

    /// Whether the children no longer match the shape.
    pub fn should_update_handles(&self, shape: &Shape) -> bool {
        self.source != HandleSource::Fixed && self.source.handle_count(shape) != self.handles.len()
    }

    fn regenerate(&mut self, shape: &Shape) {
        let old = std::mem::replace(&mut self.handles, self.source.create(shape));
        if let Active::Index(index) = self.active {
            self.active = match old.into_iter().nth(index) {
                Some(handle) => Active::Pinned(handle),
                None => Active::None,
            };
        }
        log::debug!(
            "Regenerated {:?} handles: {} children",
            self.source,
            self.handles.len()
        );
    }

    fn active_handle(&self) -> Option<&dyn EditHandle> {
        match &self.active {
            Active::None => None,
            Active::Index(index) => self.handles.get(*index).map(|h| h.as_ref()),
            Active::Pinned(handle) => Some(handle.as_ref()),
        }
    }

    fn all_handles(&self) -> impl Iterator<Item = &dyn EditHandle> {
        let pinned = match &self.active {
            Active::Pinned(handle) => Some(handle.as_ref()),
            _ => None,
        };
        self.handles.iter().map(|h| h.as_ref()).chain(pinned)
    }

    fn dispatch_active(
        &mut self,
        dispatch: &mut dyn FnMut(&mut dyn EditHandle) -> HandleEventResult,
    ) -> HandleEventResult {
        match &mut self.active {
            Active::None => HandleEventResult::IGNORED,
            Active::Pinned(handle) => dispatch(handle.as_mut()),
            Active::Index(index) => {
                let index = *index;
                match self.handles.get_mut(index) {
                    Some(handle) => dispatch(handle.as_mut()),
                    None => HandleEventResult::IGNORED,
                }
            }
        }
    }

    fn dispatch(
        &mut self,
        ctx: &mut EditContext<'_>,
        mut dispatch: impl FnMut(&mut dyn EditHandle, &mut EditContext<'_>) -> HandleEventResult,
    ) -> HandleEventResult {
        let mut result = self.dispatch_active(&mut |handle| dispatch(handle, ctx));

        if result.is_ignored() {
            let skip = match self.active {
                Active::Index(index) => Some(index),
                _ => None,
            };
            let mut taken = None;
            for (index, handle) in self.handles.iter_mut().enumerate() {
                if Some(index) == skip {
                    continue;
                }
                let child = dispatch(handle.as_mut(), ctx);
                result |= child;
                if handle.is_active() || child.is_handled() {
                    taken = Some(index);
                    break;
                }
            }
            if let Some(index) = taken {
                if !self.active_is_busy() {
                    self.active = Active::Index(index);
                }
            }
        }

        self.after_dispatch(ctx);
        result.clear_request_deactivation()
    }

    /// Whether a pinned handle is still mid-interaction.
    fn active_is_busy(&self) -> bool {
        matches!(&self.active, Active::Pinned(handle) if handle.is_active())
    }

    /// Re-emit child events, reconcile children after shape changes and
    /// release a handle that finished its interaction.
    fn after_dispatch(&mut self, ctx: &EditContext<'_>) {
        let mut pending = Vec::new();
        for handle in &mut self.handles {
            pending.extend(handle.events().take_pending());
        }
        if let Active::Pinned(handle) = &mut self.active {
            pending.extend(handle.events().take_pending());
        }

        let changed = pending
            .iter()
            .any(|e| matches!(e, HandleEvent::EditShape(_)));
        for event in pending {
            self.events.emit(event);
        }

        if changed {
            self.update(ctx);
        }

        let still_active = self.active_handle().is_some_and(|h| h.is_active());
        if !still_active {
            self.active = Active::None;
        }
    }
}

impl EditHandle for CompositeEditHandle {
    fn on_gesture_event(&mut self, event: &GestureEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.dispatch(ctx, |handle, ctx| handle.on_gesture_event(event, ctx))
    }

    fn on_key_event(&mut self, event: &KeyEvent, ctx: &mut EditContext<'_>) -> HandleEventResult {
        self.dispatch(ctx, |handle, ctx| handle.on_key_event(event, ctx))
    }

    fn get_cursor(&self, event: &GestureEvent, ctx: &EditContext<'_>) -> Option<Cursor> {
        if let Some(cursor) = self.active_handle().and_then(|h| h.get_cursor(event, ctx)) {
            return Some(cursor);
        }
        self.all_handles().find_map(|h| h.get_cursor(event, ctx))
    }

    fn should_paint_feature(&self, ctx: &EditContext<'_>) -> bool {
        self.all_handles().all(|h| h.should_paint_feature(ctx))
    }

    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        for handle in self.all_handles() {
            handle.on_draw(canvas, ctx);
        }
    }

    fn on_draw_label(&self, canvas: &mut dyn LabelCanvas, ctx: &EditContext<'_>) {
        for handle in self.all_handles() {
            handle.on_draw_label(canvas, ctx);
        }
    }

    fn update(&mut self, ctx: &EditContext<'_>) {
        if self.should_update_handles(ctx.shape()) {
            self.regenerate(ctx.shape());
        }
        for handle in &mut self.handles {
            handle.update(ctx);
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.active, Active::None)
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{PointTranslateHandle, ShapePoint};
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::evented::{EditShapeEvent, HandleEventKind};
    use crate::shapes::{Polygon, Polyline};
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn polyline(n: usize) -> Shape {
        Shape::Polyline(Polyline::new(
            (0..n).map(|i| Point::new(i as f64 * 100.0, 0.0)).collect(),
        ))
    }

    /// Answers every gesture with a fixed result and counts calls.
    struct Fixed {
        result: HandleEventResult,
        calls: Rc<RefCell<usize>>,
        events: EventedSupport<HandleEvent>,
    }

    impl Fixed {
        fn boxed(result: HandleEventResult, calls: &Rc<RefCell<usize>>) -> Box<dyn EditHandle> {
            Box::new(Self {
                result,
                calls: Rc::clone(calls),
                events: EventedSupport::new(),
            })
        }
    }

    impl EditHandle for Fixed {
        fn on_gesture_event(&mut self, _event: &GestureEvent, _ctx: &mut EditContext<'_>) -> HandleEventResult {
            *self.calls.borrow_mut() += 1;
            self.result
        }

        fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
            &mut self.events
        }
    }

    #[test]
    fn test_stops_at_first_handler() {
        let mut fx = Fixture::new(Shape::Point(Point::ZERO));
        let mut ctx = fx.ctx();
        let calls: Vec<_> = (0..3).map(|_| Rc::new(RefCell::new(0))).collect();
        let mut composite = CompositeEditHandle::new(vec![
            Fixed::boxed(HandleEventResult::IGNORED, &calls[0]),
            Fixed::boxed(HandleEventResult::HANDLED | HandleEventResult::REQUEST_DEACTIVATION, &calls[1]),
            Fixed::boxed(HandleEventResult::HANDLED, &calls[2]),
        ]);
        let r = composite.on_gesture_event(&click(0.0, 0.0), &mut ctx);
        assert_eq!(r, HandleEventResult::HANDLED);
        assert_eq!(*calls[0].borrow(), 1);
        assert_eq!(*calls[1].borrow(), 1);
        assert_eq!(*calls[2].borrow(), 0);
        assert!(!composite.is_active());
    }

    #[test]
    fn test_handle_counts_per_source() {
        let line = polyline(3);
        let polygon = Shape::Polygon(Polygon::new(vec![Point::ZERO; 3]));
        assert_eq!(HandleSource::Vertices.handle_count(&line), 3);
        assert_eq!(HandleSource::Insertion { maximum: None }.handle_count(&line), 2);
        assert_eq!(HandleSource::Insertion { maximum: None }.handle_count(&polygon), 3);
        assert_eq!(HandleSource::Insertion { maximum: Some(3) }.handle_count(&line), 0);
        assert_eq!(HandleSource::Deletion { minimum: 0 }.handle_count(&line), 3);
        assert_eq!(HandleSource::Deletion { minimum: 3 }.handle_count(&line), 0);
        assert_eq!(HandleSource::Deletion { minimum: 0 }.handle_count(&polygon), 0);
    }

    #[test]
    fn test_regenerates_when_point_added_externally() {
        let mut fx = Fixture::new(polyline(3));
        let mut composite = CompositeEditHandle::generated(HandleSource::Vertices, &fx.feature.shape);
        assert_eq!(composite.len(), 3);

        fx.feature
            .shape
            .points_mut()
            .unwrap()
            .push(Point::new(300.0, 0.0));
        let ctx = fx.ctx();
        assert!(composite.should_update_handles(ctx.shape()));
        composite.update(&ctx);
        assert_eq!(composite.len(), 4);
        assert!(!composite.should_update_handles(ctx.shape()));
    }

    #[test]
    fn test_active_child_keeps_priority_and_events_bubble() {
        let mut fx = Fixture::new(Shape::Point(Point::new(10.0, 10.0)));
        let mut ctx = fx.ctx();
        let calls = Rc::new(RefCell::new(0));
        let mut composite = CompositeEditHandle::new(vec![
            Box::new(PointTranslateHandle::new(ShapePoint)),
            Fixed::boxed(HandleEventResult::HANDLED, &calls),
        ]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        composite.events().on(HandleEventKind::EditShape, move |e| {
            if let HandleEvent::EditShape(EditShapeEvent { status, .. }) = e {
                sink.borrow_mut().push(*status);
            }
        });

        let start = down(10.0, 10.0);
        composite.on_gesture_event(&start, &mut ctx);
        assert!(composite.is_active());
        composite.on_gesture_event(&drag(&start, 20.0, 20.0), &mut ctx);
        composite.on_gesture_event(&drag_end(&start, 20.0, 20.0), &mut ctx);
        assert_eq!(*calls.borrow(), 0);
        assert!(!composite.is_active());
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(ctx.shape(), &Shape::Point(Point::new(20.0, 20.0)));

        // Released: the next unrelated event reaches the second child.
        composite.on_gesture_event(&click(500.0, 500.0), &mut ctx);
        assert_eq!(*calls.borrow(), 1);
    }
}
