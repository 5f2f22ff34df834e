//! Shared collaborators handed to every view render.

use crate::svg::{Canvas, ElemKey};
use std::rc::Rc;
use wv_model::{EventHub, NodeId, NodeKind};

/// Per-call view configuration. Usually empty; a parent may override the
/// title shown in a compound block's tab.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub title: Option<String>,
}

/// The statement templates a user can drop onto the canvas.
#[derive(Clone)]
pub struct ToolPalette {
    templates: Rc<Vec<NodeKind>>,
}

impl ToolPalette {
    /// The standard statement roster.
    pub fn standard() -> Self {
        Self {
            templates: Rc::new(vec![
                NodeKind::While {
                    condition: "true".into(),
                },
                NodeKind::If {
                    condition: "true".into(),
                },
                NodeKind::Assignment {
                    target: "x".into(),
                    expression: "0".into(),
                },
                NodeKind::Invocation {
                    callee: "log".into(),
                    arguments: smallvec::smallvec!["m".to_string()],
                },
                NodeKind::Reply {
                    message: "m".into(),
                },
                NodeKind::Comment { text: String::new() },
            ]),
        }
    }

    pub fn templates(&self) -> &[NodeKind] {
        &self.templates
    }

    /// A fresh node kind cloned from template `index`.
    pub fn instantiate(&self, index: usize) -> Option<NodeKind> {
        self.templates.get(index).cloned()
    }

    /// The template whose id prefix matches `keyword` (e.g. `"while"`,
    /// `"assign"`), as used by drop targets and the WASM facade.
    pub fn template_for(&self, keyword: &str) -> Option<NodeKind> {
        self.templates
            .iter()
            .find(|t| t.id_prefix() == keyword)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// The collaborators every view shares: the canvas it renders into, the
/// tool palette, and the document's event registry.
#[derive(Clone)]
pub struct DiagramContext {
    pub canvas: Canvas,
    pub palette: ToolPalette,
    pub events: EventHub,
}

/// The argument set built fresh for each child render — model, target
/// group, per-call options, the shared palette and event registry, and the
/// requesting parent.
pub struct RenderArgs {
    pub model: NodeId,
    pub group: ElemKey,
    pub options: ViewOptions,
    pub palette: ToolPalette,
    pub events: EventHub,
    pub parent: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_templates_are_statements() {
        let palette = ToolPalette::standard();
        assert!(!palette.is_empty());
        for template in palette.templates() {
            assert!(template.is_statement());
        }
    }

    #[test]
    fn template_lookup_by_keyword() {
        let palette = ToolPalette::standard();
        assert!(matches!(
            palette.template_for("while"),
            Some(NodeKind::While { .. })
        ));
        assert!(matches!(
            palette.template_for("reply"),
            Some(NodeKind::Reply { .. })
        ));
        assert!(palette.template_for("service").is_none());

        let fresh = palette.instantiate(0);
        assert!(fresh.is_some_and(|k| k.is_compound()));
    }
}
