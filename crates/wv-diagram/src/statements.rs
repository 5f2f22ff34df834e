//! Statement views.
//!
//! `WhileStatementView` renders a loop construct as a compound block: shell
//! geometry from [`CompoundFrame`], nested statements through a
//! [`StatementContainer`], and an editable "Condition" property. Leaf
//! statements render as labeled blocks with no body.
//!
//! Lifecycle of a compound view: unrendered → rendered (via `render`) →
//! removed (via `on_before_model_remove`, invoked exactly once by the
//! owning parent). Teardown detaches the container-box listener, deletes
//! the rendered element by id, and zeroes the shell's bounding box.

use crate::container::StatementContainer;
use crate::context::{DiagramContext, RenderArgs, ViewOptions};
use crate::frame::{CompoundFrame, STATEMENT_HEIGHT, STATEMENT_WIDTH, grow_shell};
use crate::geometry::{BoundingBox, BoxEvent, BoxEventKind, BoxSubscription};
use crate::properties::{EditableProperty, PropertyPane, PropertyType};
use crate::svg::{Canvas, ElemKey, fmt_num};
use wv_model::{Document, EventKind, ModelEvent, NodeId, NodeKind, Subscription};

// ─── Leaf statements ─────────────────────────────────────────────────────

/// A non-compound statement rendered as a single labeled block.
pub struct LeafStatementView {
    model: NodeId,
    group: Option<ElemKey>,
    bbox: BoundingBox,
}

impl LeafStatementView {
    pub fn new(model: NodeId) -> Self {
        Self {
            model,
            group: None,
            bbox: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn render(
        &mut self,
        doc: &Document,
        canvas: &Canvas,
        parent_group: ElemKey,
        x: f32,
        y: f32,
    ) {
        let dom_id = self.model.dom_id();
        canvas.remove_by_id(&dom_id);

        let group = canvas.append(parent_group, "g");
        canvas.set_id(group, &dom_id);
        canvas.set_attr(
            group,
            "transform",
            &format!("translate({}, {})", fmt_num(x), fmt_num(y)),
        );
        canvas.set_attr(group, "class", "statement");

        let rect = canvas.append(group, "rect");
        canvas.set_attr(rect, "x", "0");
        canvas.set_attr(rect, "y", "0");
        canvas.set_attr(rect, "width", &fmt_num(STATEMENT_WIDTH));
        canvas.set_attr(rect, "height", &fmt_num(STATEMENT_HEIGHT));
        canvas.set_attr(rect, "class", "statement-outline");

        let text = canvas.append(group, "text");
        canvas.set_attr(text, "x", &fmt_num(STATEMENT_WIDTH / 2.0));
        canvas.set_attr(text, "y", &fmt_num(STATEMENT_HEIGHT / 2.0));
        canvas.set_attr(text, "text-anchor", "middle");
        canvas.set_text(text, &doc.label(self.model).unwrap_or_default());

        self.bbox.move_to(x, y);
        self.bbox.set_size(STATEMENT_WIDTH, STATEMENT_HEIGHT);
        self.group = Some(group);
    }

    /// Delete the rendered element and zero the box.
    pub fn remove(&mut self, canvas: &Canvas) {
        canvas.remove_by_id(&self.model.dom_id());
        self.bbox.zero();
        self.group = None;
    }

    pub fn model(&self) -> NodeId {
        self.model
    }

    pub fn group(&self) -> Option<ElemKey> {
        self.group
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox.clone()
    }
}

// ─── While statements ────────────────────────────────────────────────────

/// The view for a `while` loop block.
pub struct WhileStatementView {
    model: NodeId,
    frame: CompoundFrame,
    container: Option<StatementContainer>,
    pane: Option<PropertyPane>,
    model_subs: Vec<Subscription>,
    container_edge_sub: Option<BoxSubscription>,
}

fn condition_getter(doc: &Document, id: NodeId) -> Option<String> {
    doc.condition(id)
}

fn condition_setter(doc: &Document, id: NodeId, value: &str) {
    doc.set_condition(id, value);
}

impl WhileStatementView {
    pub fn new(args: &RenderArgs) -> Self {
        let title = args
            .options
            .title
            .clone()
            .unwrap_or_else(|| "While".to_string());
        Self {
            model: args.model,
            frame: CompoundFrame::new(args.model, title),
            container: None,
            pane: None,
            model_subs: Vec::new(),
            container_edge_sub: None,
        }
    }

    /// Render the block at `(x, y)` relative to `parent_group`.
    ///
    /// Installs the property pane, subscribes to the model's condition and
    /// child-added notifications, and visits each pre-existing child once.
    /// A re-render first disposes the previous subscriptions, so no view
    /// ever listens to the same model twice.
    pub fn render(
        &mut self,
        doc: &Document,
        ctx: &DiagramContext,
        parent_group: ElemKey,
        x: f32,
        y: f32,
    ) {
        self.model_subs.clear();
        if let Some(sub) = self.container_edge_sub.take() {
            sub.dispose();
        }

        let label = doc.condition(self.model).unwrap_or_default();
        let group = self.frame.render(&ctx.canvas, parent_group, x, y, &label);

        let (body_x, body_y) = self.frame.body_origin();
        let container =
            StatementContainer::new(self.model, group, body_x, body_y, STATEMENT_WIDTH);
        self.container = Some(container.clone());

        // Shell follows the container's bottom edge.
        self.container_edge_sub = Some({
            let canvas = ctx.canvas.clone();
            let outline = self.frame.outline();
            let shell_box = self.frame.bounding_box();
            container
                .bounding_box()
                .on(BoxEventKind::BottomEdgeMoved, move |event| {
                    if let BoxEvent::BottomEdgeMoved { dy } = event {
                        grow_shell(&canvas, outline, &shell_box, *dy);
                    }
                })
        });

        // Editable properties: a single text field bound to the condition.
        let mut pane = PropertyPane::new(self.model);
        pane.push(EditableProperty {
            property_type: PropertyType::Text,
            key: "Condition".into(),
            node: self.model,
            getter: condition_getter,
            setter: condition_setter,
        });
        self.pane = Some(pane);

        // Condition edits refresh the rendered label.
        let label_sub = {
            let canvas = ctx.canvas.clone();
            let label_el = self.frame.label_element();
            doc.observe(self.model, EventKind::PropertyChanged, move |event| {
                if let ModelEvent::PropertyChanged { key, value, .. } = event
                    && key.as_str() == "Condition"
                    && let Some(el) = label_el
                {
                    canvas.set_text(el, value);
                }
            })
        };

        // New children render on demand.
        let added_sub = {
            let doc = doc.clone();
            let ctx = ctx.clone();
            let container = container.clone();
            let parent_model = self.model;
            doc.clone()
                .observe(self.model, EventKind::ChildAdded, move |event| {
                    if let ModelEvent::ChildAdded { child, .. } = event {
                        render_child(&doc, &ctx, &container, parent_model, *child);
                    }
                })
        };

        // Removed statement children compact the container.
        let removed_sub = {
            let canvas = ctx.canvas.clone();
            let container = container.clone();
            doc.observe(self.model, EventKind::ChildRemoved, move |event| {
                if let ModelEvent::ChildRemoved { child, kind, .. } = event
                    && kind.is_statement()
                {
                    container.child_statement_removed(&canvas, *child);
                }
            })
        };

        self.model_subs = vec![label_sub, added_sub, removed_sub];

        // Pre-existing children get their views now.
        for child in doc.children(self.model) {
            self.visit(doc, ctx, child);
        }
    }

    /// Ask the statement container to render one child, with a fresh set of
    /// render arguments.
    pub fn visit(&self, doc: &Document, ctx: &DiagramContext, child: NodeId) {
        let Some(container) = &self.container else {
            log::warn!("while view {}: visit before render", self.model);
            return;
        };
        render_child(doc, ctx, container, self.model, child);
    }

    /// Forward a removed statement child to the container. Non-statement
    /// children are not the container's concern.
    pub fn child_removed_callback(&self, ctx: &DiagramContext, child: NodeId, kind: &NodeKind) {
        if kind.is_statement()
            && let Some(container) = &self.container
        {
            container.child_statement_removed(&ctx.canvas, child);
        }
    }

    /// Push an edited condition string back into the model.
    pub fn update_condition_expression(&self, doc: &Document, new_text: &str) {
        doc.set_condition(self.model, new_text);
    }

    /// Teardown before the model node is removed: detach the container-box
    /// listener, delete the rendered element by id, zero the shell's box.
    pub fn on_before_model_remove(&mut self, canvas: &Canvas) {
        if let Some(sub) = self.container_edge_sub.take() {
            sub.dispose();
        }
        canvas.remove_by_id(&self.model.dom_id());
        self.frame.bounding_box().zero();
        self.model_subs.clear();
    }

    pub fn model(&self) -> NodeId {
        self.model
    }

    pub fn group(&self) -> Option<ElemKey> {
        self.frame.group()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.frame.bounding_box()
    }

    pub fn container_handle(&self) -> Option<StatementContainer> {
        self.container.clone()
    }

    pub fn property_pane(&self) -> Option<&PropertyPane> {
        self.pane.as_ref()
    }
}

/// Build the render-argument set for `child` and hand it to `container`.
/// Shared by `visit` and the child-added notification path.
pub(crate) fn render_child(
    doc: &Document,
    ctx: &DiagramContext,
    container: &StatementContainer,
    parent: NodeId,
    child: NodeId,
) {
    let args = RenderArgs {
        model: child,
        group: container.group(),
        options: ViewOptions::default(),
        palette: ctx.palette.clone(),
        events: ctx.events.clone(),
        parent: Some(parent),
    };
    container.render_statement(doc, ctx, args);
}
