//! WASM bridge for Weave — exposes the diagram and the embedded spec
//! editor to the hosting page.
//!
//! Compiled via `wasm-pack build --target web`; the page constructs one
//! `WeaveApp`, renders the diagram SVG into a container, and drives both
//! the statement views and the spec-editor panel through it.

mod dom;

pub use dom::DomHostPage;

use wasm_bindgen::prelude::*;
use wv_bridge::{BridgeError, EditorOptions, EmbeddedEditorView, Envelope};
use wv_diagram::Diagram;
use wv_model::{Document, NodeId, lint_document};

fn to_js(err: BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The main WASM-facing application object.
///
/// Holds the shared document, the rendered diagram, and the embedded
/// spec-editor view. All interaction from the page JS goes through this
/// struct.
#[wasm_bindgen]
pub struct WeaveApp {
    doc: Document,
    diagram: Diagram,
    editor: EmbeddedEditorView,
    page: DomHostPage,
}

#[wasm_bindgen]
impl WeaveApp {
    /// Create the app. `editor_container` is the element id of the panel
    /// that will host the spec editor iframe.
    #[wasm_bindgen(constructor)]
    pub fn new(editor_container: &str) -> Self {
        let doc = Document::new();
        let diagram = Diagram::new(doc.clone());
        diagram.render();
        let editor = EmbeddedEditorView::new(EditorOptions {
            container: Some(editor_container.to_string()),
            content: None,
        });
        Self {
            doc,
            diagram,
            editor,
            page: DomHostPage::new(),
        }
    }

    // ─── Diagram ─────────────────────────────────────────────────────────

    /// The rendered diagram as an SVG string.
    pub fn diagram_svg(&self) -> String {
        self.diagram.to_svg()
    }

    /// Inject the rendered diagram into a container element.
    pub fn render_diagram(&self, container: &str) -> Result<(), JsValue> {
        self.page
            .inject_html(container, &self.diagram.to_svg())
            .map_err(to_js)
    }

    /// The document's root node id.
    pub fn root_id(&self) -> String {
        self.doc.root().as_str().to_string()
    }

    /// Add a statement from a palette keyword under `parent`. Returns the
    /// new node's id.
    pub fn add_statement(&self, parent: &str, kind: &str) -> Option<String> {
        let template = self.diagram.context().palette.template_for(kind)?;
        self.diagram
            .add_statement(NodeId::intern(parent), template)
            .map(|id| id.as_str().to_string())
    }

    /// Remove a statement (and its subtree) by id.
    pub fn remove_statement(&self, id: &str) -> bool {
        self.diagram.remove_statement(NodeId::intern(id))
    }

    /// Push an edited condition through the owning loop view.
    pub fn set_condition(&self, id: &str, text: &str) -> bool {
        self.diagram.update_condition(NodeId::intern(id), text)
    }

    /// Current lint diagnostics as a JSON array.
    pub fn lint_json(&self) -> String {
        let diags: Vec<serde_json::Value> = lint_document(&self.doc)
            .into_iter()
            .map(|d| {
                serde_json::json!({
                    "node": d.node_id.as_str(),
                    "message": d.message,
                    "severity": format!("{:?}", d.severity),
                    "rule": d.rule,
                })
            })
            .collect();
        serde_json::Value::Array(diags).to_string()
    }

    // ─── Spec editor panel ───────────────────────────────────────────────

    /// Mount the spec editor iframe into its container.
    pub fn mount_spec_editor(&mut self) -> Result<(), JsValue> {
        self.editor.render(&mut self.page).map_err(to_js)
    }

    /// Write new spec text into the holder and refresh the editor.
    pub fn set_spec_content(&mut self, text: &str) -> Result<(), JsValue> {
        self.editor.set_content(&mut self.page, text).map_err(to_js)
    }

    /// Read the current spec text from the holder.
    pub fn get_spec_content(&self) -> Result<String, JsValue> {
        self.editor.get_content().map_err(to_js)
    }

    /// Apply a raw message posted back by the editor frame.
    pub fn on_editor_message(&mut self, raw: &str) -> Result<(), JsValue> {
        let envelope = Envelope::decode(raw).map_err(to_js)?;
        self.editor.handle_editor_message(&envelope).map_err(to_js)
    }

    pub fn show_spec_editor(&mut self) -> Result<(), JsValue> {
        self.editor.show(&mut self.page).map_err(to_js)
    }

    pub fn hide_spec_editor(&mut self) -> Result<(), JsValue> {
        self.editor.hide(&mut self.page).map_err(to_js)
    }

    pub fn spec_editor_visible(&self) -> bool {
        self.editor.is_visible(&self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_keywords_cover_the_statement_roster() {
        let app = WeaveApp::new("spec-editor");
        let root = app.root_id();
        for kind in ["while", "if", "assign", "invoke", "reply", "comment"] {
            assert!(app.add_statement(&root, kind).is_some(), "{kind}");
        }
        assert!(app.add_statement(&root, "service").is_none());
    }

    #[test]
    fn diagram_operations_work_without_a_dom() {
        let app = WeaveApp::new("spec-editor");
        let root = app.root_id();

        let loop_id = app.add_statement(&root, "while").unwrap();
        assert!(app.diagram_svg().contains(&format!("_{loop_id}")));

        assert!(app.set_condition(&loop_id, "count < 3"));
        assert!(app.diagram_svg().contains("count &lt; 3"));

        assert!(app.remove_statement(&loop_id));
        assert!(!app.diagram_svg().contains(&format!("_{loop_id}")));
    }

    #[test]
    fn lint_json_reports_rules() {
        let app = WeaveApp::new("spec-editor");
        let root = app.root_id();
        app.add_statement(&root, "while");

        let raw = app.lint_json();
        assert!(raw.contains("empty-loop-body"), "raw: {raw}");
    }
}
