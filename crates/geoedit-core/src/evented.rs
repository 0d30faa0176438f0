//! Explicit subscription registry for handle and controller events.
//!
//! Every emitter owns an [`EventedSupport`]. Subscribers register a callback
//! per event kind and receive a [`Subscription`] token to dispose it.
//! Emitted events are also queued so that an owning parent can drain them
//! with [`EventedSupport::take_pending`] and re-emit them upward.

use crate::shapes::Shape;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// An event with a kind used as subscription key.
pub trait Event: Clone {
    type Kind: Copy + Eq + Hash + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Token returned by [`EventedSupport::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription<K> {
    kind: K,
    id: u64,
}

impl<K: Copy> Subscription<K> {
    pub fn kind(&self) -> K {
        self.kind
    }
}

type Callback<E> = Box<dyn FnMut(&E)>;

/// Per-emitter subscription registry.
pub struct EventedSupport<E: Event> {
    listeners: HashMap<E::Kind, Vec<(u64, Callback<E>)>>,
    next_id: u64,
    pending: Vec<E>,
    queue: bool,
}

impl<E: Event> Default for EventedSupport<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> EventedSupport<E> {
    /// Registry that queues emitted events for the owner's parent.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
            pending: Vec::new(),
            queue: true,
        }
    }

    /// Registry for a root emitter that has no parent to drain it.
    pub fn without_queue() -> Self {
        Self {
            queue: false,
            ..Self::new()
        }
    }

    /// Register `callback` for events of `kind`.
    pub fn on(&mut self, kind: E::Kind, callback: impl FnMut(&E) + 'static) -> Subscription<E::Kind> {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        Subscription { kind, id }
    }

    /// Dispose a subscription. Returns false if it was already removed.
    pub fn remove(&mut self, subscription: &Subscription<E::Kind>) -> bool {
        let Some(callbacks) = self.listeners.get_mut(&subscription.kind) else {
            return false;
        };
        let before = callbacks.len();
        callbacks.retain(|(id, _)| *id != subscription.id);
        before != callbacks.len()
    }

    pub fn has_listeners(&self, kind: E::Kind) -> bool {
        self.listeners.get(&kind).is_some_and(|c| !c.is_empty())
    }

    /// Call every subscriber of the event's kind, then queue the event.
    pub fn emit(&mut self, event: E) {
        if let Some(callbacks) = self.listeners.get_mut(&event.kind()) {
            for (_, callback) in callbacks.iter_mut() {
                callback(&event);
            }
        }
        if self.queue {
            self.pending.push(event);
        }
    }

    /// Drain the events emitted since the last call.
    pub fn take_pending(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }
}

impl<E: Event> std::fmt::Debug for EventedSupport<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventedSupport")
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Progress of a logical shape edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditShapeStatus {
    InProgress,
    Finished,
}

/// Shape-change notification for undo and persistence collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct EditShapeEvent {
    pub status: EditShapeStatus,
    pub shape: Shape,
}

impl EditShapeEvent {
    pub fn in_progress(shape: &Shape) -> Self {
        Self {
            status: EditShapeStatus::InProgress,
            shape: shape.clone(),
        }
    }

    pub fn finished(shape: &Shape) -> Self {
        Self {
            status: EditShapeStatus::Finished,
            shape: shape.clone(),
        }
    }

    /// Same change, reported as part of a larger action whose owner emits
    /// the terminal `Finished`.
    pub fn into_in_progress(self) -> Self {
        Self {
            status: EditShapeStatus::InProgress,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleEventKind {
    EditShape,
    Invalidated,
    Flipped,
}

/// Events emitted by edit handles.
#[derive(Debug, Clone, PartialEq)]
pub enum HandleEvent {
    EditShape(EditShapeEvent),
    /// The handle's visuals changed without a shape change.
    Invalidated,
    /// A bounds corner crossed an opposite side.
    Flipped { horizontal: bool, vertical: bool },
}

impl Event for HandleEvent {
    type Kind = HandleEventKind;

    fn kind(&self) -> HandleEventKind {
        match self {
            HandleEvent::EditShape(_) => HandleEventKind::EditShape,
            HandleEvent::Invalidated => HandleEventKind::Invalidated,
            HandleEvent::Flipped { .. } => HandleEventKind::Flipped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerEventKind {
    Activated,
    Deactivated,
    Invalidated,
    EditShape,
    Restarted,
}

/// Events emitted by controllers.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Activated,
    Deactivated,
    Invalidated,
    EditShape(EditShapeEvent),
    Restarted,
}

impl Event for ControllerEvent {
    type Kind = ControllerEventKind;

    fn kind(&self) -> ControllerEventKind {
        match self {
            ControllerEvent::Activated => ControllerEventKind::Activated,
            ControllerEvent::Deactivated => ControllerEventKind::Deactivated,
            ControllerEvent::Invalidated => ControllerEventKind::Invalidated,
            ControllerEvent::EditShape(_) => ControllerEventKind::EditShape,
            ControllerEvent::Restarted => ControllerEventKind::Restarted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_emit_remove() {
        let mut events = EventedSupport::<HandleEvent>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = events.on(HandleEventKind::Flipped, move |e| sink.borrow_mut().push(e.clone()));
        assert!(events.has_listeners(HandleEventKind::Flipped));

        events.emit(HandleEvent::Invalidated);
        events.emit(HandleEvent::Flipped {
            horizontal: true,
            vertical: false,
        });
        assert_eq!(seen.borrow().len(), 1);

        assert!(events.remove(&sub));
        assert!(!events.remove(&sub));
        events.emit(HandleEvent::Flipped {
            horizontal: false,
            vertical: true,
        });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_pending_queue() {
        let mut events = EventedSupport::<ControllerEvent>::new();
        events.emit(ControllerEvent::Activated);
        events.emit(ControllerEvent::Invalidated);
        let drained = events.take_pending();
        assert_eq!(drained, vec![ControllerEvent::Activated, ControllerEvent::Invalidated]);
        assert!(events.take_pending().is_empty());

        let mut root = EventedSupport::<ControllerEvent>::without_queue();
        root.emit(ControllerEvent::Activated);
        assert!(root.take_pending().is_empty());
    }
}
