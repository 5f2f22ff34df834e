//! Property-pane descriptors.
//!
//! A view exposes its editable fields as descriptors the property pane can
//! render: a property type, a display key, and getter/setter accessors over
//! the document. Accessors are plain `fn` pointers — the model layer does
//! the validating, the pane just routes values.

use wv_model::{Document, NodeId};

/// How the pane should edit a property. Closed — the statement views only
/// expose text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Text,
}

/// Reads the current value of a property from the document.
pub type PropertyGetter = fn(&Document, NodeId) -> Option<String>;

/// Writes an edited value back into the document.
pub type PropertySetter = fn(&Document, NodeId, &str);

/// One editable field of a rendered node.
pub struct EditableProperty {
    pub property_type: PropertyType,
    pub key: String,
    pub node: NodeId,
    pub getter: PropertyGetter,
    pub setter: PropertySetter,
}

/// The set of editable properties installed for one rendered node.
pub struct PropertyPane {
    node: NodeId,
    entries: Vec<EditableProperty>,
}

impl PropertyPane {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            entries: Vec::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn push(&mut self, property: EditableProperty) {
        self.entries.push(property);
    }

    pub fn properties(&self) -> &[EditableProperty] {
        &self.entries
    }

    /// Display keys, in pane order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|p| p.key.clone()).collect()
    }

    /// Read the current value of the property named `key`.
    pub fn value(&self, doc: &Document, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| (p.getter)(doc, p.node))
    }

    /// Route an edited value through the property's setter.
    /// Returns false when no property carries `key`.
    pub fn edit(&self, doc: &Document, key: &str, new_value: &str) -> bool {
        match self.entries.iter().find(|p| p.key == key) {
            Some(p) => {
                (p.setter)(doc, p.node, new_value);
                true
            }
            None => {
                log::warn!("property pane: no editable property `{key}` on {}", self.node);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wv_model::NodeKind;

    fn condition_getter(doc: &Document, id: NodeId) -> Option<String> {
        doc.condition(id)
    }

    fn condition_setter(doc: &Document, id: NodeId, value: &str) {
        doc.set_condition(id, value);
    }

    #[test]
    fn edit_routes_through_setter() {
        let doc = Document::new();
        let id = doc
            .add_child(
                doc.root(),
                NodeKind::While {
                    condition: "x > 0".into(),
                },
            )
            .unwrap();

        let mut pane = PropertyPane::new(id);
        pane.push(EditableProperty {
            property_type: PropertyType::Text,
            key: "Condition".into(),
            node: id,
            getter: condition_getter,
            setter: condition_setter,
        });

        assert_eq!(pane.value(&doc, "Condition"), Some("x > 0".to_string()));
        assert!(pane.edit(&doc, "Condition", "x > 1"));
        assert_eq!(doc.condition(id), Some("x > 1".to_string()));
        assert!(!pane.edit(&doc, "Body", "nope"));
    }
}
