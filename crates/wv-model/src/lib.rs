pub mod ast;
pub mod document;
pub mod events;
pub mod expr;
pub mod id;
pub mod lint;

pub use ast::{AstNode, AstTree, NodeKind};
pub use document::Document;
pub use events::{EventHub, EventKind, ModelEvent, Subscription};
pub use expr::{CompareOp, CondExpr, parse_condition};
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, lint_document};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
