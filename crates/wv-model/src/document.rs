//! The shared document handle.
//!
//! `Document` wraps the statement tree in a cheap-clone handle so view
//! code, event handlers, and the embedding page can all hold it — the
//! single-threaded shared-model discipline of a hosting page. Every
//! mutation releases the tree borrow before emitting its event, so
//! handlers may read the document re-entrantly. Handlers must not mutate
//! the document from inside a model-event handler.

use crate::ast::{AstNode, AstTree, NodeKind};
use crate::events::{EventHub, EventKind, ModelEvent, Subscription};
use crate::id::NodeId;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle to the shared statement document.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<AstTree>>,
    hub: EventHub,
}

impl Document {
    /// Create an empty document holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(AstTree::new())),
            hub: EventHub::new(),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        let tree = self.tree.borrow();
        tree.graph[tree.root].id
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Attach a new node of `kind` under `parent`. Emits `ChildAdded`.
    /// Returns `None` (and logs) when the parent is unknown.
    pub fn add_child(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        let id = NodeId::with_prefix(kind.id_prefix());
        {
            let mut tree = self.tree.borrow_mut();
            let Some(parent_idx) = tree.index_of(parent) else {
                log::warn!("add_child: unknown parent {parent}");
                return None;
            };
            tree.add_node(parent_idx, AstNode::new(id, kind));
        }
        self.hub.emit(&ModelEvent::ChildAdded { parent, child: id });
        Some(id)
    }

    /// Detach `id` and its whole subtree. Emits one `ChildRemoved` for the
    /// detached node (with a kind snapshot). Returns false when `id` is
    /// unknown or the root.
    pub fn remove(&self, id: NodeId) -> bool {
        let event = {
            let mut tree = self.tree.borrow_mut();
            let Some(idx) = tree.index_of(id) else {
                return false;
            };
            if idx == tree.root {
                log::warn!("remove: refusing to remove the document root");
                return false;
            }
            let parent_idx = match tree.parent(idx) {
                Some(p) => p,
                None => return false,
            };
            let parent = tree.graph[parent_idx].id;
            let removed = match tree.remove_subtree(idx) {
                Some(node) => node,
                None => return false,
            };
            ModelEvent::ChildRemoved {
                parent,
                child: id,
                kind: removed.kind,
            }
        };
        self.hub.emit(&event);
        true
    }

    /// Write a new condition expression into a `While`/`If` node.
    /// Emits `PropertyChanged` with key `"Condition"`. A node of any other
    /// kind rejects the write with a log line — the typed model validates,
    /// the view layer does not.
    pub fn set_condition(&self, id: NodeId, text: &str) {
        let updated = {
            let mut tree = self.tree.borrow_mut();
            match tree.get_by_id_mut(id) {
                Some(node) => match &mut node.kind {
                    NodeKind::While { condition } | NodeKind::If { condition } => {
                        *condition = text.to_string();
                        true
                    }
                    _ => false,
                },
                None => false,
            }
        };
        if updated {
            self.hub.emit(&ModelEvent::PropertyChanged {
                node: id,
                key: "Condition".into(),
                value: text.to_string(),
            });
        } else {
            log::warn!("set_condition: {id} is not a conditional node");
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The condition expression of a `While`/`If` node.
    pub fn condition(&self, id: NodeId) -> Option<String> {
        let tree = self.tree.borrow();
        match tree.get_by_id(id).map(|n| &n.kind) {
            Some(NodeKind::While { condition }) | Some(NodeKind::If { condition }) => {
                Some(condition.clone())
            }
            _ => None,
        }
    }

    /// Kind snapshot of a node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.tree.borrow().get_by_id(id).map(|n| n.kind.clone())
    }

    /// Rendered display text of a node.
    pub fn label(&self, id: NodeId) -> Option<String> {
        self.tree.borrow().get_by_id(id).map(|n| n.kind.label())
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        match tree.index_of(id) {
            Some(idx) => tree
                .children(idx)
                .into_iter()
                .map(|c| tree.graph[c].id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Parent of `id`, when it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let idx = tree.index_of(id)?;
        tree.parent(idx).map(|p| tree.graph[p].id)
    }

    /// Whether the document still holds `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.borrow().index_of(id).is_some()
    }

    /// Whether `id` names a statement node.
    pub fn is_statement(&self, id: NodeId) -> bool {
        self.tree
            .borrow()
            .get_by_id(id)
            .is_some_and(|n| n.kind.is_statement())
    }

    // ─── Notification ────────────────────────────────────────────────────

    /// Register a listener for `(subject, kind)` events.
    pub fn observe(
        &self,
        subject: NodeId,
        kind: EventKind,
        handler: impl FnMut(&ModelEvent) + 'static,
    ) -> Subscription {
        self.hub.subscribe(subject, kind, handler)
    }

    /// Handle to the document's event registry.
    pub fn events(&self) -> EventHub {
        self.hub.clone()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
