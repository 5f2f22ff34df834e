//! The shared box/shell renderer for compound statement blocks.
//!
//! Every compound statement variant renders the same shell: an id'd group,
//! a title tab, the condition label, and a body outline that grows as the
//! nested statement container grows. The shell lives here as a capability
//! each view owns, invoked directly — no base-class chain.

use crate::geometry::BoundingBox;
use crate::svg::{Canvas, ElemKey, fmt_num};
use wv_model::NodeId;

// Block metrics, in canvas units.
pub const BLOCK_WIDTH: f32 = 200.0;
pub const TITLE_WIDTH: f32 = 60.0;
pub const TITLE_HEIGHT: f32 = 25.0;
pub const BODY_MIN_HEIGHT: f32 = 40.0;
pub const BODY_PAD: f32 = 10.0;
pub const STATEMENT_WIDTH: f32 = BLOCK_WIDTH - 2.0 * BODY_PAD;
pub const STATEMENT_HEIGHT: f32 = 30.0;
pub const STATEMENT_GAP: f32 = 10.0;

/// Rendered shell of one compound block.
pub struct CompoundFrame {
    model: NodeId,
    title: String,
    group: Option<ElemKey>,
    outline: Option<ElemKey>,
    label_el: Option<ElemKey>,
    bbox: BoundingBox,
}

impl CompoundFrame {
    pub fn new(model: NodeId, title: impl Into<String>) -> Self {
        Self {
            model,
            title: title.into(),
            group: None,
            outline: None,
            label_el: None,
            bbox: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Render the shell at `(x, y)` relative to `parent_group`. Replaces any
    /// previously rendered element carrying this model's id, so exactly one
    /// rendered element exists per live view. Returns the statement group.
    pub fn render(
        &mut self,
        canvas: &Canvas,
        parent_group: ElemKey,
        x: f32,
        y: f32,
        label: &str,
    ) -> ElemKey {
        let dom_id = self.model.dom_id();
        canvas.remove_by_id(&dom_id);

        let group = canvas.append(parent_group, "g");
        canvas.set_id(group, &dom_id);
        canvas.set_attr(
            group,
            "transform",
            &format!("translate({}, {})", fmt_num(x), fmt_num(y)),
        );
        canvas.set_attr(group, "class", "compound-statement");

        let height = TITLE_HEIGHT + BODY_MIN_HEIGHT;
        let outline = canvas.append(group, "rect");
        canvas.set_attr(outline, "x", "0");
        canvas.set_attr(outline, "y", "0");
        canvas.set_attr(outline, "width", &fmt_num(BLOCK_WIDTH));
        canvas.set_attr(outline, "height", &fmt_num(height));
        canvas.set_attr(outline, "class", "compound-outline");

        let tab = canvas.append(group, "rect");
        canvas.set_attr(tab, "x", "0");
        canvas.set_attr(tab, "y", "0");
        canvas.set_attr(tab, "width", &fmt_num(TITLE_WIDTH));
        canvas.set_attr(tab, "height", &fmt_num(TITLE_HEIGHT));
        canvas.set_attr(tab, "class", "compound-title");

        let title_el = canvas.append(group, "text");
        canvas.set_attr(title_el, "x", &fmt_num(TITLE_WIDTH / 2.0));
        canvas.set_attr(title_el, "y", &fmt_num(TITLE_HEIGHT / 2.0));
        canvas.set_attr(title_el, "text-anchor", "middle");
        canvas.set_text(title_el, &self.title);

        let label_el = canvas.append(group, "text");
        canvas.set_id(label_el, &format!("{dom_id}_label"));
        canvas.set_attr(label_el, "x", &fmt_num(TITLE_WIDTH + BODY_PAD));
        canvas.set_attr(label_el, "y", &fmt_num(TITLE_HEIGHT / 2.0));
        canvas.set_text(label_el, label);

        self.bbox.move_to(x, y);
        self.bbox.set_size(BLOCK_WIDTH, height);

        self.group = Some(group);
        self.outline = Some(outline);
        self.label_el = Some(label_el);
        group
    }

    /// Update the rendered condition label.
    pub fn set_label(&self, canvas: &Canvas, text: &str) {
        if let Some(label_el) = self.label_el {
            canvas.set_text(label_el, text);
        }
    }

    /// Grow (or shrink) the body outline by `dy` and propagate through the
    /// shell's bounding box.
    pub fn grow_body(&self, canvas: &Canvas, dy: f32) {
        grow_shell(canvas, self.outline, &self.bbox, dy);
    }

    /// Origin of the statement body, relative to the block group.
    pub fn body_origin(&self) -> (f32, f32) {
        (BODY_PAD, TITLE_HEIGHT + BODY_PAD)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox.clone()
    }

    pub fn group(&self) -> Option<ElemKey> {
        self.group
    }

    pub fn outline(&self) -> Option<ElemKey> {
        self.outline
    }

    pub fn label_element(&self) -> Option<ElemKey> {
        self.label_el
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Resize a shell outline by `dy` and grow its bounding box to match.
/// The box emits last, so listeners observe consistent geometry.
pub(crate) fn grow_shell(canvas: &Canvas, outline: Option<ElemKey>, bbox: &BoundingBox, dy: f32) {
    if let Some(outline) = outline {
        canvas.set_attr(outline, "height", &fmt_num(bbox.h() + dy));
    }
    bbox.grow_height(dy);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_builds_shell_under_model_id() {
        let canvas = Canvas::new(800.0, 600.0);
        let model = NodeId::intern("frame_loop");
        let mut frame = CompoundFrame::new(model, "While");

        let group = frame.render(&canvas, canvas.root(), 20.0, 30.0, "x > 0");
        assert!(canvas.contains_id("_frame_loop"));
        assert_eq!(canvas.tag_of(group), "g");
        // outline + tab + title text + label text
        assert_eq!(canvas.child_count(group), 4);
        assert_eq!(
            canvas.text_of(frame.label_element().unwrap()),
            Some("x > 0".to_string())
        );
        assert_eq!(frame.bounding_box().w(), BLOCK_WIDTH);
        assert_eq!(frame.bounding_box().h(), TITLE_HEIGHT + BODY_MIN_HEIGHT);
    }

    #[test]
    fn rerender_keeps_one_element() {
        let canvas = Canvas::new(800.0, 600.0);
        let model = NodeId::intern("frame_rerender");
        let mut frame = CompoundFrame::new(model, "While");

        frame.render(&canvas, canvas.root(), 0.0, 0.0, "a");
        frame.render(&canvas, canvas.root(), 0.0, 0.0, "b");

        assert_eq!(
            canvas.child_count(canvas.root()),
            1,
            "re-render must replace, not duplicate"
        );
    }

    #[test]
    fn grow_body_updates_outline_and_box() {
        let canvas = Canvas::new(800.0, 600.0);
        let model = NodeId::intern("frame_grow");
        let mut frame = CompoundFrame::new(model, "While");
        frame.render(&canvas, canvas.root(), 0.0, 0.0, "");

        let before = frame.bounding_box().h();
        frame.grow_body(&canvas, 40.0);
        assert_eq!(frame.bounding_box().h(), before + 40.0);
        assert_eq!(
            canvas.attr(frame.outline().unwrap(), "height"),
            Some(fmt_num(before + 40.0))
        );
    }
}
