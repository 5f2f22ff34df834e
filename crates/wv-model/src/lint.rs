//! Lint diagnostics for statement documents.
//!
//! Reports structural issues without modifying the document. Results feed
//! into whatever diagnostics surface the embedding editor exposes.

use crate::ast::NodeKind;
use crate::document::Document;
use crate::expr::parse_condition;
use crate::id::NodeId;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed — likely a mistake.
    Warning,
    /// Informational — style suggestion.
    Info,
}

/// A single lint diagnostic for a document node.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "empty-condition").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document) -> Vec<LintDiagnostic> {
    let mut nodes = Vec::new();
    collect(doc, doc.root(), &mut nodes);

    let mut diags = Vec::new();
    lint_conditions(doc, &nodes, &mut diags);
    lint_empty_loop_bodies(doc, &nodes, &mut diags);
    diags
}

fn collect(doc: &Document, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id);
    for child in doc.children(id) {
        collect(doc, child, out);
    }
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn on blank or unparsable conditions of `while`/`if` nodes.
fn lint_conditions(doc: &Document, nodes: &[NodeId], diags: &mut Vec<LintDiagnostic>) {
    for &id in nodes {
        let Some(condition) = doc.condition(id) else {
            continue;
        };
        if condition.trim().is_empty() {
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("`{}` has an empty condition.", id.as_str()),
                severity: LintSeverity::Warning,
                rule: "empty-condition",
            });
        } else if let Err(err) = parse_condition(&condition) {
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("`{}`: {err}", id.as_str()),
                severity: LintSeverity::Warning,
                rule: "invalid-condition",
            });
        }
    }
}

/// Info when a `while` body contains no statements.
fn lint_empty_loop_bodies(doc: &Document, nodes: &[NodeId], diags: &mut Vec<LintDiagnostic>) {
    for &id in nodes {
        if !matches!(doc.kind(id), Some(NodeKind::While { .. })) {
            continue;
        }
        let has_statement = doc.children(id).iter().any(|c| doc.is_statement(*c));
        if !has_statement {
            diags.push(LintDiagnostic {
                node_id: id,
                message: format!("Loop `{}` has an empty body.", id.as_str()),
                severity: LintSeverity::Info,
                rule: "empty-loop-body",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_empty_condition() {
        let doc = Document::new();
        doc.add_child(
            doc.root(),
            NodeKind::While {
                condition: "  ".into(),
            },
        );
        let diags = lint_document(&doc);
        assert!(
            diags.iter().any(|d| d.rule == "empty-condition"),
            "expected empty-condition diagnostic"
        );
    }

    #[test]
    fn lint_invalid_condition() {
        let doc = Document::new();
        let id = doc
            .add_child(
                doc.root(),
                NodeKind::While {
                    condition: "x >".into(),
                },
            )
            .unwrap();
        doc.add_child(
            id,
            NodeKind::Reply {
                message: "m".into(),
            },
        );
        let diags = lint_document(&doc);
        assert!(
            diags.iter().any(|d| d.rule == "invalid-condition"),
            "expected invalid-condition diagnostic"
        );
        assert!(
            !diags.iter().any(|d| d.rule == "empty-loop-body"),
            "loop body is not empty"
        );
    }

    #[test]
    fn lint_empty_loop_body() {
        let doc = Document::new();
        doc.add_child(
            doc.root(),
            NodeKind::While {
                condition: "x > 0".into(),
            },
        );
        let diags = lint_document(&doc);
        assert!(
            diags.iter().any(|d| d.rule == "empty-loop-body"),
            "expected empty-loop-body diagnostic"
        );
    }

    #[test]
    fn lint_clean_document_no_diags() {
        let doc = Document::new();
        let loop_id = doc
            .add_child(
                doc.root(),
                NodeKind::While {
                    condition: "count < 10 && !done".into(),
                },
            )
            .unwrap();
        doc.add_child(
            loop_id,
            NodeKind::Assignment {
                target: "count".into(),
                expression: "count + 1".into(),
            },
        );
        let diags = lint_document(&doc);
        assert!(diags.is_empty(), "clean document should have no diagnostics");
    }
}
