//! The SVG element tree a diagram renders into.
//!
//! A small arena-backed stand-in for the document's SVG subtree: elements
//! carry a tag, attributes, optional text, and an optional DOM id. Ids are
//! indexed so views can remove their rendered element by id on teardown,
//! exactly like `d3.select("#_id").remove()` against a live document.
//! `to_svg()` serializes the tree for the hosting page to inject.

use std::collections::HashMap;

/// Key of an element in the canvas arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElemKey(usize);

struct ElementData {
    tag: &'static str,
    id: Option<String>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ElemKey>,
    alive: bool,
}

impl ElementData {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
            alive: true,
        }
    }
}

struct CanvasState {
    elements: Vec<ElementData>,
    index: HashMap<String, ElemKey>,
    root: ElemKey,
}

/// Handle to the rendered SVG element tree. Cheap to clone.
#[derive(Clone)]
pub struct Canvas {
    state: std::rc::Rc<std::cell::RefCell<CanvasState>>,
}

impl Canvas {
    /// Create a canvas with an `<svg>` root of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        let mut root = ElementData::new("svg");
        root.attrs
            .push(("xmlns".into(), "http://www.w3.org/2000/svg".into()));
        root.attrs.push(("width".into(), fmt_num(width)));
        root.attrs.push(("height".into(), fmt_num(height)));

        let state = CanvasState {
            elements: vec![root],
            index: HashMap::new(),
            root: ElemKey(0),
        };
        Self {
            state: std::rc::Rc::new(std::cell::RefCell::new(state)),
        }
    }

    pub fn root(&self) -> ElemKey {
        self.state.borrow().root
    }

    /// Append a new element under `parent`.
    pub fn append(&self, parent: ElemKey, tag: &'static str) -> ElemKey {
        let mut state = self.state.borrow_mut();
        let key = ElemKey(state.elements.len());
        state.elements.push(ElementData::new(tag));
        state.elements[parent.0].children.push(key);
        key
    }

    /// Assign a DOM id, registering it in the id index. A re-registered id
    /// points at the newest element, like duplicate ids in a live document.
    pub fn set_id(&self, key: ElemKey, id: &str) {
        let mut state = self.state.borrow_mut();
        if state.index.contains_key(id) {
            log::debug!("canvas: id `{id}` re-registered");
        }
        state.elements[key.0].id = Some(id.to_string());
        state.index.insert(id.to_string(), key);
    }

    pub fn set_attr(&self, key: ElemKey, name: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        let attrs = &mut state.elements[key.0].attrs;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn attr(&self, key: ElemKey, name: &str) -> Option<String> {
        self.state.borrow().elements[key.0]
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn set_text(&self, key: ElemKey, text: &str) {
        self.state.borrow_mut().elements[key.0].text = Some(text.to_string());
    }

    pub fn text_of(&self, key: ElemKey) -> Option<String> {
        self.state.borrow().elements[key.0].text.clone()
    }

    pub fn tag_of(&self, key: ElemKey) -> &'static str {
        self.state.borrow().elements[key.0].tag
    }

    /// Look up a live element by DOM id.
    pub fn get_by_id(&self, id: &str) -> Option<ElemKey> {
        let state = self.state.borrow();
        state
            .index
            .get(id)
            .copied()
            .filter(|k| state.elements[k.0].alive)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get_by_id(id).is_some()
    }

    /// Number of live children under `key`.
    pub fn child_count(&self, key: ElemKey) -> usize {
        let state = self.state.borrow();
        state.elements[key.0]
            .children
            .iter()
            .filter(|c| state.elements[c.0].alive)
            .count()
    }

    /// Live children of `key`, in document order.
    pub fn children_of(&self, key: ElemKey) -> Vec<ElemKey> {
        let state = self.state.borrow();
        state.elements[key.0]
            .children
            .iter()
            .copied()
            .filter(|c| state.elements[c.0].alive)
            .collect()
    }

    /// Remove the element with the given id and its whole subtree.
    /// Returns false when no live element carries the id.
    pub fn remove_by_id(&self, id: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(key) = state.index.get(id).copied() else {
            return false;
        };
        if !state.elements[key.0].alive {
            return false;
        }
        kill_subtree(&mut state, key);
        true
    }

    /// Serialize the live tree to an SVG string.
    pub fn to_svg(&self) -> String {
        let state = self.state.borrow();
        let mut out = String::new();
        write_element(&state, state.root, &mut out, 0);
        out
    }
}

fn kill_subtree(state: &mut CanvasState, key: ElemKey) {
    let children = state.elements[key.0].children.clone();
    for child in children {
        kill_subtree(state, child);
    }
    state.elements[key.0].alive = false;
    if let Some(id) = state.elements[key.0].id.clone()
        && state.index.get(&id) == Some(&key)
    {
        state.index.remove(&id);
    }
}

fn write_element(state: &CanvasState, key: ElemKey, out: &mut String, depth: usize) {
    let elem = &state.elements[key.0];
    if !elem.alive {
        return;
    }

    let pad = "  ".repeat(depth);
    out.push_str(&pad);
    out.push('<');
    out.push_str(elem.tag);
    if let Some(id) = &elem.id {
        out.push_str(&format!(" id=\"{}\"", escape(id)));
    }
    for (name, value) in &elem.attrs {
        out.push_str(&format!(" {name}=\"{}\"", escape(value)));
    }

    let live_children: Vec<ElemKey> = elem
        .children
        .iter()
        .copied()
        .filter(|c| state.elements[c.0].alive)
        .collect();

    if live_children.is_empty() && elem.text.is_none() {
        out.push_str(" />\n");
        return;
    }

    out.push('>');
    if let Some(text) = &elem.text {
        out.push_str(&escape(text));
    }
    if !live_children.is_empty() {
        out.push('\n');
        for child in live_children {
            write_element(state, child, out, depth + 1);
        }
        out.push_str(&pad);
    }
    out.push_str(&format!("</{}>\n", elem.tag));
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Format a number the way SVG attributes expect (no trailing `.0` noise).
pub fn fmt_num(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_lookup_by_id() {
        let canvas = Canvas::new(800.0, 600.0);
        let group = canvas.append(canvas.root(), "g");
        canvas.set_id(group, "_loop1");

        assert_eq!(canvas.get_by_id("_loop1"), Some(group));
        assert!(canvas.contains_id("_loop1"));
        assert_eq!(canvas.child_count(canvas.root()), 1);
    }

    #[test]
    fn remove_by_id_detaches_subtree() {
        let canvas = Canvas::new(800.0, 600.0);
        let group = canvas.append(canvas.root(), "g");
        canvas.set_id(group, "_loop1");
        let rect = canvas.append(group, "rect");
        canvas.set_id(rect, "_loop1_outline");

        assert!(canvas.remove_by_id("_loop1"));
        assert!(!canvas.contains_id("_loop1"));
        assert!(!canvas.contains_id("_loop1_outline"), "subtree unindexed");
        assert_eq!(canvas.child_count(canvas.root()), 0);
        assert!(!canvas.remove_by_id("_loop1"), "second removal is a no-op");
    }

    #[test]
    fn to_svg_escapes_text() {
        let canvas = Canvas::new(100.0, 100.0);
        let text = canvas.append(canvas.root(), "text");
        canvas.set_text(text, "a < b && c > 0");

        let svg = canvas.to_svg();
        assert!(svg.contains("a &lt; b &amp;&amp; c &gt; 0"));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn set_attr_overwrites() {
        let canvas = Canvas::new(100.0, 100.0);
        let rect = canvas.append(canvas.root(), "rect");
        canvas.set_attr(rect, "height", "40");
        canvas.set_attr(rect, "height", "70");
        assert_eq!(canvas.attr(rect, "height"), Some("70".to_string()));
    }

    #[test]
    fn fmt_num_drops_integral_fraction() {
        assert_eq!(fmt_num(200.0), "200");
        assert_eq!(fmt_num(12.5), "12.5");
    }
}
