//! The statement container: lays out and renders the sequence of nested
//! statement views inside a compound block.
//!
//! The container is a cheap-clone handle shared between the owning compound
//! view and the event handlers that feed it. Each rendered child gets a
//! slot holding its view and the container's subscription to the child's
//! bottom edge; removing the slot disposes the subscription with it, so
//! layout listeners can never outlive the child they watch.

use crate::context::{DiagramContext, RenderArgs};
use crate::frame::STATEMENT_GAP;
use crate::geometry::{BoundingBox, BoxEvent, BoxEventKind, BoxSubscription};
use crate::statements::{LeafStatementView, WhileStatementView};
use crate::svg::{Canvas, ElemKey, fmt_num};
use std::cell::RefCell;
use std::rc::Rc;
use wv_model::{Document, NodeId, NodeKind};

/// A rendered child statement view, chosen by kind.
pub enum ChildView {
    While(WhileStatementView),
    Leaf(LeafStatementView),
}

impl ChildView {
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            ChildView::While(v) => v.bounding_box(),
            ChildView::Leaf(v) => v.bounding_box(),
        }
    }

    pub fn group(&self) -> Option<ElemKey> {
        match self {
            ChildView::While(v) => v.group(),
            ChildView::Leaf(v) => v.group(),
        }
    }

    fn teardown(&mut self, canvas: &Canvas) {
        match self {
            ChildView::While(v) => v.on_before_model_remove(canvas),
            ChildView::Leaf(v) => v.remove(canvas),
        }
    }
}

struct ChildSlot {
    id: NodeId,
    view: ChildView,
    /// The container's listener on this child's bottom edge. Disposed when
    /// the slot is dropped or the child is removed.
    edge_sub: BoxSubscription,
}

struct ContainerState {
    owner: NodeId,
    group: ElemKey,
    bbox: BoundingBox,
    slots: Vec<ChildSlot>,
}

/// Shared handle to one compound block's statement container.
#[derive(Clone)]
pub struct StatementContainer {
    state: Rc<RefCell<ContainerState>>,
}

impl StatementContainer {
    /// Create a container rendering into `group`, with its content box
    /// anchored at `(x, y)` relative to the group's coordinate space.
    pub fn new(owner: NodeId, group: ElemKey, x: f32, y: f32, width: f32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContainerState {
                owner,
                group,
                bbox: BoundingBox::new(x, y, width, 0.0),
                slots: Vec::new(),
            })),
        }
    }

    pub fn owner(&self) -> NodeId {
        self.state.borrow().owner
    }

    pub fn group(&self) -> ElemKey {
        self.state.borrow().group
    }

    /// The container's content box — grows and shrinks with its children.
    pub fn bounding_box(&self) -> BoundingBox {
        self.state.borrow().bbox.clone()
    }

    pub fn child_count(&self) -> usize {
        self.state.borrow().slots.len()
    }

    pub fn contains_child(&self, id: NodeId) -> bool {
        self.state.borrow().slots.iter().any(|s| s.id == id)
    }

    /// Render one child statement at the bottom of the container.
    ///
    /// Non-statement kinds are skipped with a log line so the render and
    /// removal paths agree on what a container holds. An already rendered
    /// child is left alone — one rendered element per live view.
    pub fn render_statement(&self, doc: &Document, ctx: &DiagramContext, args: RenderArgs) {
        let child = args.model;
        let Some(kind) = doc.kind(child) else {
            log::warn!("statement container: unknown model {child}");
            return;
        };
        if !kind.is_statement() {
            log::warn!("statement container: {child} is not a statement, skipping");
            return;
        }
        if self.contains_child(child) {
            log::debug!("statement container: {child} already rendered");
            return;
        }

        let (x, y, first, group) = {
            let st = self.state.borrow();
            let next_y = match st.slots.last() {
                Some(slot) => slot.view.bounding_box().bottom() + STATEMENT_GAP,
                None => st.bbox.y(),
            };
            (st.bbox.x(), next_y, st.slots.is_empty(), st.group)
        };

        let view = match kind {
            NodeKind::While { .. } => {
                let mut v = WhileStatementView::new(&args);
                v.render(doc, ctx, group, x, y);
                ChildView::While(v)
            }
            _ => {
                let mut v = LeafStatementView::new(child);
                v.render(doc, &ctx.canvas, group, x, y);
                ChildView::Leaf(v)
            }
        };

        let child_box = view.bounding_box();
        let grow = child_box.h() + if first { 0.0 } else { STATEMENT_GAP };

        // Watch the child's bottom edge to keep later siblings below it.
        // Weak, so the slot's closure does not keep its own container alive.
        let edge_sub = {
            let weak = Rc::downgrade(&self.state);
            let canvas = ctx.canvas.clone();
            child_box.on(BoxEventKind::BottomEdgeMoved, move |event| {
                if let BoxEvent::BottomEdgeMoved { dy } = event
                    && let Some(state) = weak.upgrade()
                {
                    let container = StatementContainer { state };
                    container.child_extent_changed(&canvas, child, *dy);
                }
            })
        };

        self.state.borrow_mut().slots.push(ChildSlot {
            id: child,
            view,
            edge_sub,
        });

        let bbox = self.bounding_box();
        bbox.grow_height(grow);
    }

    /// A child's extent changed by `dy`: shift later siblings and grow the
    /// container box, propagating the move upward.
    fn child_extent_changed(&self, canvas: &Canvas, child: NodeId, dy: f32) {
        let followers = {
            let st = self.state.borrow();
            let Some(pos) = st.slots.iter().position(|s| s.id == child) else {
                return;
            };
            follower_geometry(&st.slots[pos + 1..])
        };
        shift_views(canvas, &followers, dy);

        let bbox = self.bounding_box();
        bbox.grow_height(dy);
    }

    /// A child statement left the model: tear its view down, compact the
    /// layout, and shrink the container box.
    pub fn child_statement_removed(&self, canvas: &Canvas, child: NodeId) {
        let (mut slot, followers, extent) = {
            let mut st = self.state.borrow_mut();
            let Some(pos) = st.slots.iter().position(|s| s.id == child) else {
                log::debug!("statement container: {child} is not a rendered child");
                return;
            };
            let slot = st.slots.remove(pos);
            let followers = follower_geometry(&st.slots[pos..]);
            let extent = slot.view.bounding_box().h()
                + if st.slots.is_empty() {
                    0.0
                } else {
                    STATEMENT_GAP
                };
            (slot, followers, extent)
        };

        // Detach the layout listener before teardown zeroes the child's box,
        // so the container never reacts to the removal itself.
        slot.edge_sub.dispose();
        slot.view.teardown(canvas);

        shift_views(canvas, &followers, -extent);

        let bbox = self.bounding_box();
        bbox.grow_height(-extent);
    }

    /// Depth-first lookup of a rendered view by model id, descending into
    /// nested compound blocks.
    pub fn find_map<R>(&self, id: NodeId, f: &mut dyn FnMut(&ChildView) -> R) -> Option<R> {
        let st = self.state.borrow();
        for slot in &st.slots {
            if slot.id == id {
                return Some(f(&slot.view));
            }
            if let ChildView::While(v) = &slot.view
                && let Some(nested) = v.container_handle()
                && let Some(found) = nested.find_map(id, f)
            {
                return Some(found);
            }
        }
        None
    }
}

fn follower_geometry(slots: &[ChildSlot]) -> Vec<(BoundingBox, Option<ElemKey>)> {
    slots
        .iter()
        .map(|s| (s.view.bounding_box(), s.view.group()))
        .collect()
}

fn shift_views(canvas: &Canvas, views: &[(BoundingBox, Option<ElemKey>)], dy: f32) {
    for (bbox, group) in views {
        bbox.move_by(0.0, dy);
        if let Some(g) = group {
            canvas.set_attr(
                *g,
                "transform",
                &format!("translate({}, {})", fmt_num(bbox.x()), fmt_num(bbox.y())),
            );
        }
    }
}
