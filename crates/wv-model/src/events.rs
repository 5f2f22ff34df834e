//! Model-change notification.
//!
//! An explicit observer registry keyed by `(subject node, event kind)` with
//! typed payloads. `subscribe` returns a [`Subscription`] disposer so
//! teardown is symmetric — a listener that is never disposed explicitly is
//! still removed when its subscription is dropped. Handlers fire
//! synchronously, in subscription order, after the emitting mutation has
//! released its borrows.

use crate::ast::NodeKind;
use crate::id::NodeId;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A typed model-change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// A child was attached under `parent`.
    ChildAdded { parent: NodeId, child: NodeId },

    /// A child subtree was detached from `parent`. Carries a kind snapshot
    /// because the node is already gone from the tree.
    ChildRemoved {
        parent: NodeId,
        child: NodeId,
        kind: NodeKind,
    },

    /// A named property of `node` changed value.
    PropertyChanged {
        node: NodeId,
        key: String,
        value: String,
    },
}

impl ModelEvent {
    /// Registry key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            ModelEvent::ChildAdded { .. } => EventKind::ChildAdded,
            ModelEvent::ChildRemoved { .. } => EventKind::ChildRemoved,
            ModelEvent::PropertyChanged { .. } => EventKind::PropertyChanged,
        }
    }

    /// The node whose listeners should hear this event — the parent for
    /// child events, the node itself for property changes.
    pub fn subject(&self) -> NodeId {
        match self {
            ModelEvent::ChildAdded { parent, .. } | ModelEvent::ChildRemoved { parent, .. } => {
                *parent
            }
            ModelEvent::PropertyChanged { node, .. } => *node,
        }
    }
}

/// The event-name half of the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ChildAdded,
    ChildRemoved,
    PropertyChanged,
}

type Handler = Rc<RefCell<dyn FnMut(&ModelEvent)>>;

struct Listener {
    id: u64,
    subject: NodeId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct HubState {
    listeners: Vec<Listener>,
    next_id: u64,
}

/// The observer registry. Cheap to clone — clones share the registry.
#[derive(Clone, Default)]
pub struct EventHub {
    state: Rc<RefCell<HubState>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind` whose subject is `subject`.
    /// The listener stays registered until the returned subscription is
    /// disposed or dropped.
    pub fn subscribe(
        &self,
        subject: NodeId,
        kind: EventKind,
        handler: impl FnMut(&ModelEvent) + 'static,
    ) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(Listener {
            id,
            subject,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        Subscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Dispatch `event` to matching listeners in subscription order.
    ///
    /// The listener list is snapshotted before dispatch so handlers may
    /// subscribe or dispose re-entrantly without invalidating the walk.
    pub fn emit(&self, event: &ModelEvent) {
        let subject = event.subject();
        let kind = event.kind();
        let matching: Vec<Handler> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.subject == subject && l.kind == kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in matching {
            (&mut *handler.borrow_mut())(event);
        }
    }

    /// Number of live listeners for `(subject, kind)`.
    pub fn listener_count(&self, subject: NodeId, kind: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.subject == subject && l.kind == kind)
            .count()
    }
}

/// Disposer handle for a registered listener.
///
/// Disposal is idempotent and also runs on drop, so holding the
/// subscription for the lifetime of the view is enough to guarantee
/// teardown.
pub struct Subscription {
    state: Weak<RefCell<HubState>>,
    id: u64,
}

impl Subscription {
    /// Remove the listener from the registry.
    pub fn dispose(&self) {
        if let Some(state) = self.state.upgrade() {
            // Extract under the borrow, drop after releasing it: dropping
            // the handler can cascade into further disposals on this hub.
            let removed = {
                let mut state = state.borrow_mut();
                state
                    .listeners
                    .iter()
                    .position(|l| l.id == self.id)
                    .map(|pos| state.listeners.remove(pos))
            };
            drop(removed);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
