//! The diagram facade.
//!
//! Owns the document handle, the shared context, and the root statement
//! container, and acts as the owning parent view: model mutations flow in
//! through the document, notifications flow back out to the containers, and
//! removal routes teardown through the child-removed path exactly once.

use crate::container::{ChildView, StatementContainer};
use crate::context::{DiagramContext, ToolPalette};
use crate::frame::BLOCK_WIDTH;
use crate::geometry::{BoundingBox, BoxEvent, BoxEventKind, BoxSubscription};
use crate::statements::render_child;
use crate::svg::{Canvas, fmt_num};
use wv_model::{Document, EventKind, ModelEvent, NodeId, NodeKind, Subscription};

pub const CANVAS_WIDTH: f32 = 960.0;
pub const CANVAS_HEIGHT: f32 = 600.0;
pub const CANVAS_PAD: f32 = 20.0;

/// One rendered statement diagram over a shared document.
pub struct Diagram {
    doc: Document,
    ctx: DiagramContext,
    root_container: StatementContainer,
    /// Root-level model subscriptions; disposed when the diagram drops.
    _root_subs: Vec<Subscription>,
    /// Keeps the `<svg>` height tracking the root container's extent.
    _height_sub: BoxSubscription,
}

impl Diagram {
    /// Build a diagram over `doc`. Pre-existing statements are not rendered
    /// until [`Diagram::render`] runs.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        let canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let root_group = canvas.append(canvas.root(), "g");
        canvas.set_id(root_group, "diagram-root");
        canvas.set_attr(
            root_group,
            "transform",
            &format!("translate({}, {})", fmt_num(CANVAS_PAD), fmt_num(CANVAS_PAD)),
        );

        let ctx = DiagramContext {
            canvas: canvas.clone(),
            palette: ToolPalette::standard(),
            events: doc.events(),
        };

        let root = doc.root();
        let root_container = StatementContainer::new(root, root_group, 0.0, 0.0, BLOCK_WIDTH);

        let added_sub = {
            let doc = doc.clone();
            let ctx = ctx.clone();
            let container = root_container.clone();
            doc.clone().observe(root, EventKind::ChildAdded, move |event| {
                if let ModelEvent::ChildAdded { child, .. } = event {
                    render_child(&doc, &ctx, &container, root, *child);
                }
            })
        };

        let removed_sub = {
            let canvas = canvas.clone();
            let container = root_container.clone();
            doc.observe(root, EventKind::ChildRemoved, move |event| {
                if let ModelEvent::ChildRemoved { child, kind, .. } = event
                    && kind.is_statement()
                {
                    container.child_statement_removed(&canvas, *child);
                }
            })
        };

        let height_sub = {
            let canvas = canvas.clone();
            let svg_root = canvas.root();
            let root_box = root_container.bounding_box();
            root_box
                .clone()
                .on(BoxEventKind::BottomEdgeMoved, move |event| {
                    if let BoxEvent::BottomEdgeMoved { .. } = event {
                        let needed = root_box.bottom() + 2.0 * CANVAS_PAD;
                        if needed > CANVAS_HEIGHT {
                            canvas.set_attr(svg_root, "height", &fmt_num(needed));
                        }
                    }
                })
        };

        Self {
            doc,
            ctx,
            root_container,
            _root_subs: vec![added_sub, removed_sub],
            _height_sub: height_sub,
        }
    }

    /// Render views for every statement already in the document.
    pub fn render(&self) {
        let root = self.doc.root();
        for child in self.doc.children(root) {
            render_child(&self.doc, &self.ctx, &self.root_container, root, child);
        }
    }

    // ─── Model operations ────────────────────────────────────────────────

    /// Add a statement under `parent` (the root or a rendered compound
    /// block). The new view renders through the child-added notification.
    pub fn add_statement(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.doc.add_child(parent, kind)
    }

    /// Remove a statement from the model; view teardown and layout
    /// compaction follow from the child-removed notification.
    pub fn remove_statement(&self, id: NodeId) -> bool {
        self.doc.remove(id)
    }

    /// Push an edited condition through the owning view.
    /// Returns false when `id` has no rendered compound view.
    pub fn update_condition(&self, id: NodeId, new_text: &str) -> bool {
        let doc = self.doc.clone();
        self.root_container
            .find_map(id, &mut |view| match view {
                ChildView::While(v) => {
                    v.update_condition_expression(&doc, new_text);
                    true
                }
                ChildView::Leaf(_) => false,
            })
            .unwrap_or(false)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn document(&self) -> Document {
        self.doc.clone()
    }

    pub fn context(&self) -> &DiagramContext {
        &self.ctx
    }

    pub fn canvas(&self) -> Canvas {
        self.ctx.canvas.clone()
    }

    pub fn root_container(&self) -> StatementContainer {
        self.root_container.clone()
    }

    /// Keys of the editable properties installed for a rendered view.
    pub fn editable_property_keys(&self, id: NodeId) -> Vec<String> {
        self.root_container
            .find_map(id, &mut |view| match view {
                ChildView::While(v) => v
                    .property_pane()
                    .map(|pane| pane.keys())
                    .unwrap_or_default(),
                ChildView::Leaf(_) => Vec::new(),
            })
            .unwrap_or_default()
    }

    /// The rendered view's bounding box, when `id` is rendered.
    pub fn bounding_box(&self, id: NodeId) -> Option<BoundingBox> {
        self.root_container.find_map(id, &mut |view| view.bounding_box())
    }

    /// Whether a rendered element for `id` exists in the canvas.
    pub fn has_rendered_element(&self, id: NodeId) -> bool {
        self.ctx.canvas.contains_id(&id.dom_id())
    }

    /// Serialize the rendered diagram.
    pub fn to_svg(&self) -> String {
        self.ctx.canvas.to_svg()
    }
}
