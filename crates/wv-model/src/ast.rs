//! Statement-tree data model.
//!
//! The document is a tree where nodes are language constructs (statements
//! and the structural declarations that contain them) and edges are
//! parent→child containment. Node kinds form a closed enum so "is this a
//! statement?" is an exhaustive match, not a runtime duck-type probe.

use crate::id::NodeId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The node kinds in the statement tree.
///
/// Statements can appear inside a compound block's body; structural kinds
/// (service, resource, connector, worker) cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of the document.
    Root,

    /// A service definition — top-level structural container.
    Service { name: String },

    /// A resource inside a service.
    Resource { name: String },

    /// A connector declaration — structural, not a statement.
    ConnectorDecl { name: String },

    /// A worker declaration — structural, not a statement.
    WorkerDecl { name: String },

    /// A `while` loop with a boolean condition expression.
    While { condition: String },

    /// An `if` with a boolean condition expression.
    If { condition: String },

    /// Assignment: `target = expression`.
    Assignment { target: String, expression: String },

    /// A function or action invocation.
    Invocation {
        callee: String,
        arguments: SmallVec<[String; 2]>,
    },

    /// Reply to the inbound message.
    Reply { message: String },

    /// A source comment carried in the statement list.
    Comment { text: String },
}

impl NodeKind {
    /// Whether this kind may appear in a statement container's body.
    pub fn is_statement(&self) -> bool {
        match self {
            NodeKind::While { .. }
            | NodeKind::If { .. }
            | NodeKind::Assignment { .. }
            | NodeKind::Invocation { .. }
            | NodeKind::Reply { .. }
            | NodeKind::Comment { .. } => true,
            NodeKind::Root
            | NodeKind::Service { .. }
            | NodeKind::Resource { .. }
            | NodeKind::ConnectorDecl { .. }
            | NodeKind::WorkerDecl { .. } => false,
        }
    }

    /// Whether this kind renders as a compound block with a nested body.
    pub fn is_compound(&self) -> bool {
        matches!(self, NodeKind::While { .. } | NodeKind::If { .. })
    }

    /// Prefix used when generating ids for nodes of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Service { .. } => "service",
            NodeKind::Resource { .. } => "resource",
            NodeKind::ConnectorDecl { .. } => "connector",
            NodeKind::WorkerDecl { .. } => "worker",
            NodeKind::While { .. } => "while",
            NodeKind::If { .. } => "if",
            NodeKind::Assignment { .. } => "assign",
            NodeKind::Invocation { .. } => "invoke",
            NodeKind::Reply { .. } => "reply",
            NodeKind::Comment { .. } => "comment",
        }
    }

    /// Title shown in a compound block's tab, when this kind has one.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            NodeKind::While { .. } => Some("While"),
            NodeKind::If { .. } => Some("If"),
            _ => None,
        }
    }

    /// Display text for the rendered block.
    pub fn label(&self) -> String {
        match self {
            NodeKind::Root => String::new(),
            NodeKind::Service { name }
            | NodeKind::Resource { name }
            | NodeKind::ConnectorDecl { name }
            | NodeKind::WorkerDecl { name } => name.clone(),
            NodeKind::While { condition } | NodeKind::If { condition } => condition.clone(),
            NodeKind::Assignment { target, expression } => format!("{target} = {expression}"),
            NodeKind::Invocation { callee, arguments } => {
                format!("{callee}({})", arguments.join(", "))
            }
            NodeKind::Reply { message } => format!("reply {message}"),
            NodeKind::Comment { text } => format!("// {text}"),
        }
    }
}

// ─── Nodes & tree ────────────────────────────────────────────────────────

/// A single node in the statement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    /// The node's id (e.g. `while_0`). Generated from the kind prefix.
    pub id: NodeId,

    /// What construct this node is.
    pub kind: NodeKind,
}

impl AstNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self { id, kind }
    }
}

/// The complete document — a tree of `AstNode` values.
///
/// Edges go from parent → child.
#[derive(Debug, Clone)]
pub struct AstTree {
    /// The underlying directed graph.
    pub graph: StableDiGraph<AstNode, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,
}

impl AstTree {
    /// Create a new empty tree with a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_node = AstNode::new(NodeId::intern("root"), NodeKind::Root);
        let root = graph.add_node(root_node);

        let mut id_index = HashMap::new();
        id_index.insert(NodeId::intern("root"), root);

        Self {
            graph,
            root,
            id_index,
        }
    }

    /// Add a node as a child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: AstNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    /// Remove a node and its whole subtree, keeping `id_index` synchronized.
    /// Returns the removed root node.
    pub fn remove_subtree(&mut self, idx: NodeIndex) -> Option<AstNode> {
        for child in self.children(idx) {
            self.remove_subtree(child);
        }
        let removed = self.graph.remove_node(idx);
        if let Some(removed_node) = &removed {
            self.id_index.remove(&removed_node.id);
        }
        removed
    }

    /// Look up a node by its id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&AstNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up a node mutably by its id.
    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut AstNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in document (insertion) order.
    ///
    /// `NodeIndex`-sorted: adjacency iteration order is not guaranteed
    /// across targets, and statement layout depends on a stable order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }
}

impl Default for AstTree {
    fn default() -> Self {
        Self::new()
    }
}
