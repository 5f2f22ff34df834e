//! The host-side content holder.
//!
//! Carries the embedded editor's current document text on the hosting
//! page. A fresh holder is created on every render — mounting the editor
//! clobbers whatever a previous mount held — and it is reachable only
//! through the view that created it, never through shared global scope.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to the current spec document text.
#[derive(Clone, Default)]
pub struct ContentHolder {
    text: Rc<RefCell<Option<String>>>,
}

impl ContentHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held text.
    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_string());
    }

    /// The held text, if any content has been written yet.
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.text.borrow().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_text() {
        let holder = ContentHolder::new();
        let alias = holder.clone();
        holder.set_text("swagger: \"2.0\"");
        assert_eq!(alias.text(), Some("swagger: \"2.0\"".to_string()));
    }

    #[test]
    fn fresh_holder_is_empty() {
        let holder = ContentHolder::new();
        assert!(holder.is_empty());
        assert_eq!(holder.text(), None);
    }
}
