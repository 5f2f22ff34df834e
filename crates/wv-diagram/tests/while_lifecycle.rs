//! End-to-end lifecycle tests for the while-block view: render, condition
//! editing, child fan-out, compaction, and teardown.

use wv_diagram::{
    BODY_PAD, BoxEventKind, ChildView, Diagram, STATEMENT_GAP, STATEMENT_HEIGHT, StatementContainer,
    TITLE_HEIGHT,
};
use wv_model::{Document, NodeId, NodeKind};

fn while_kind(condition: &str) -> NodeKind {
    NodeKind::While {
        condition: condition.into(),
    }
}

fn leaf_kind(n: u32) -> NodeKind {
    NodeKind::Assignment {
        target: format!("x{n}"),
        expression: "0".into(),
    }
}

fn loop_container(diagram: &Diagram, id: NodeId) -> Option<StatementContainer> {
    diagram
        .root_container()
        .find_map(id, &mut |view| match view {
            ChildView::While(v) => v.container_handle(),
            ChildView::Leaf(_) => None,
        })
        .flatten()
}

#[test]
fn render_installs_exactly_one_condition_property() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("x > 0")).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    assert_eq!(
        diagram.editable_property_keys(loop_id),
        vec!["Condition".to_string()]
    );

    assert!(diagram.update_condition(loop_id, "x > 1"));
    assert_eq!(doc.condition(loop_id), Some("x > 1".to_string()));

    // The rendered label follows the model.
    let canvas = diagram.canvas();
    let label = canvas
        .get_by_id(&format!("{}_label", loop_id.dom_id()))
        .expect("label element");
    assert_eq!(canvas.text_of(label), Some("x > 1".to_string()));
}

#[test]
fn pre_existing_children_render_once() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("true")).unwrap();
    let a = doc.add_child(loop_id, leaf_kind(1)).unwrap();
    let b = doc.add_child(loop_id, leaf_kind(2)).unwrap();

    let diagram = Diagram::new(doc);
    diagram.render();

    let container = loop_container(&diagram, loop_id).expect("rendered loop container");
    assert_eq!(container.child_count(), 2);
    assert!(diagram.has_rendered_element(a));
    assert!(diagram.has_rendered_element(b));
}

#[test]
fn repeated_render_does_not_duplicate_views() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("true")).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();
    diagram.render();

    assert_eq!(diagram.root_container().child_count(), 1);

    // A child added after the double render still renders exactly once.
    let child = doc.add_child(loop_id, leaf_kind(1)).unwrap();
    let container = loop_container(&diagram, loop_id).unwrap();
    assert_eq!(container.child_count(), 1);
    assert!(container.contains_child(child));
}

#[test]
fn removal_clears_element_box_and_listener() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("x > 0")).unwrap();
    let child = doc.add_child(loop_id, leaf_kind(1)).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    let shell_box = diagram.bounding_box(loop_id).expect("rendered shell box");
    let container_box = loop_container(&diagram, loop_id).unwrap().bounding_box();
    assert_eq!(
        container_box.listener_count(BoxEventKind::BottomEdgeMoved),
        1,
        "the shell listens to its container"
    );
    assert!(diagram.has_rendered_element(loop_id));

    assert!(diagram.remove_statement(loop_id));

    assert!(!diagram.has_rendered_element(loop_id));
    assert!(
        !diagram.has_rendered_element(child),
        "child elements leave with the subtree"
    );
    assert_eq!(shell_box.w(), 0.0);
    assert_eq!(shell_box.h(), 0.0);
    assert_eq!(
        container_box.listener_count(BoxEventKind::BottomEdgeMoved),
        0,
        "no dangling listener on the shared box"
    );
    assert!(!doc.contains(loop_id));
}

#[test]
fn growth_propagates_to_ancestors() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("true")).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    let shell_box = diagram.bounding_box(loop_id).unwrap();
    let root_box = diagram.root_container().bounding_box();
    let shell_before = shell_box.h();
    let root_before = root_box.h();

    doc.add_child(loop_id, leaf_kind(1));

    assert_eq!(shell_box.h(), shell_before + STATEMENT_HEIGHT);
    assert_eq!(root_box.h(), root_before + STATEMENT_HEIGHT);
}

#[test]
fn sibling_compaction_on_removal() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("true")).unwrap();
    doc.add_child(loop_id, leaf_kind(1));
    let second = doc.add_child(loop_id, leaf_kind(2)).unwrap();
    let third = doc.add_child(loop_id, leaf_kind(3)).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    let body_y = TITLE_HEIGHT + BODY_PAD;
    let step = STATEMENT_HEIGHT + STATEMENT_GAP;
    let third_box = diagram.bounding_box(third).unwrap();
    assert_eq!(third_box.y(), body_y + 2.0 * step);

    let container_box = loop_container(&diagram, loop_id).unwrap().bounding_box();
    let before = container_box.h();

    assert!(diagram.remove_statement(second));

    assert_eq!(third_box.y(), body_y + step, "later sibling moved up");
    assert_eq!(container_box.h(), before - step, "container shrank");
    assert!(!diagram.has_rendered_element(second));

    // The rendered transform tracks the shifted box.
    let canvas = diagram.canvas();
    let group = canvas.get_by_id(&third.dom_id()).unwrap();
    assert_eq!(
        canvas.attr(group, "transform"),
        Some(format!("translate({}, {})", BODY_PAD, body_y + step))
    );
}

#[test]
fn nested_loops_render_and_tear_down_recursively() {
    let doc = Document::new();
    let outer = doc.add_child(doc.root(), while_kind("i < 10")).unwrap();
    let inner = doc.add_child(outer, while_kind("j < i")).unwrap();
    let leaf = doc.add_child(inner, leaf_kind(1)).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    assert!(diagram.has_rendered_element(outer));
    assert!(diagram.has_rendered_element(inner));
    assert!(diagram.has_rendered_element(leaf));
    assert_eq!(
        diagram.editable_property_keys(inner),
        vec!["Condition".to_string()],
        "nested loops get their own property pane"
    );

    // Growing the inner loop grows the outer shell.
    let outer_box = diagram.bounding_box(outer).unwrap();
    let before = outer_box.h();
    doc.add_child(inner, leaf_kind(2));
    assert_eq!(outer_box.h(), before + STATEMENT_HEIGHT);

    assert!(diagram.remove_statement(outer));
    assert!(!diagram.has_rendered_element(outer));
    assert!(!diagram.has_rendered_element(inner));
    assert!(!diagram.has_rendered_element(leaf));
    assert!(!doc.contains(inner));
}

#[test]
fn child_removed_callback_forwards_statement_removals() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("true")).unwrap();
    let first = doc.add_child(loop_id, leaf_kind(1)).unwrap();
    doc.add_child(loop_id, leaf_kind(2));

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    let first_kind = doc.kind(first).unwrap();
    diagram.root_container().find_map(loop_id, &mut |view| {
        if let ChildView::While(v) = view {
            v.child_removed_callback(diagram.context(), first, &first_kind);
        }
    });

    let container = loop_container(&diagram, loop_id).unwrap();
    assert_eq!(container.child_count(), 1);
    assert!(!diagram.has_rendered_element(first));

    // Non-statement kinds are not the container's concern.
    let worker_kind = NodeKind::WorkerDecl {
        name: "side".into(),
    };
    diagram.root_container().find_map(loop_id, &mut |view| {
        if let ChildView::While(v) = view {
            v.child_removed_callback(diagram.context(), NodeId::intern("ghost"), &worker_kind);
        }
    });
    assert_eq!(container.child_count(), 1);
}

#[test]
fn non_statement_children_are_skipped() {
    let doc = Document::new();
    let loop_id = doc.add_child(doc.root(), while_kind("true")).unwrap();

    let diagram = Diagram::new(doc.clone());
    diagram.render();

    let worker = doc
        .add_child(
            loop_id,
            NodeKind::WorkerDecl {
                name: "side".into(),
            },
        )
        .unwrap();

    let container = loop_container(&diagram, loop_id).unwrap();
    assert_eq!(container.child_count(), 0);
    assert!(!diagram.has_rendered_element(worker));
    assert!(doc.contains(worker), "the model still holds the node");
}
