//! `HostPage` over the real DOM.
//!
//! Looks containers up by element id, mounts the editor iframe, and
//! delivers envelopes with `postMessage` — the injected replacement for
//! the old `parent`/`top` global shims.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlIFrameElement};
use wv_bridge::{BridgeError, Envelope, FrameSpec, HostPage};

fn document() -> Result<Document, BridgeError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| BridgeError::Transport("no window.document".into()))
}

fn transport(err: JsValue) -> BridgeError {
    BridgeError::Transport(format!("{err:?}"))
}

/// The live page hosting the diagram and the editor panel.
#[derive(Default)]
pub struct DomHostPage {
    /// The mounted editor frame, kept for message delivery.
    frame: Option<HtmlIFrameElement>,
}

impl DomHostPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a container's contents with raw markup (used to inject the
    /// rendered diagram SVG).
    pub fn inject_html(&self, container: &str, html: &str) -> Result<(), BridgeError> {
        let doc = document()?;
        let element = doc
            .get_element_by_id(container)
            .ok_or_else(|| BridgeError::Transport(format!("no element `{container}`")))?;
        element.set_inner_html(html);
        Ok(())
    }
}

impl HostPage for DomHostPage {
    fn container_attr(&self, container: &str, name: &str) -> Option<String> {
        let doc = document().ok()?;
        doc.get_element_by_id(container)?.get_attribute(name)
    }

    fn replace_with_frame(&mut self, container: &str, frame: FrameSpec) -> Result<(), BridgeError> {
        let doc = document()?;
        let element = doc
            .get_element_by_id(container)
            .ok_or_else(|| BridgeError::Transport(format!("no element `{container}`")))?;
        element.set_inner_html("");

        let iframe = doc
            .create_element("iframe")
            .map_err(transport)?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| BridgeError::Transport("created element is not an iframe".into()))?;
        iframe.set_src(&frame.src);
        iframe.set_attribute("width", &frame.width).map_err(transport)?;
        iframe
            .set_attribute("height", &frame.height)
            .map_err(transport)?;
        iframe
            .set_attribute(
                "style",
                &format!("border: 0px; background: {}", frame.background),
            )
            .map_err(transport)?;

        element.append_child(&iframe).map_err(transport)?;
        self.frame = Some(iframe);
        Ok(())
    }

    fn set_visible(&mut self, container: &str, visible: bool) {
        let Ok(doc) = document() else { return };
        let Some(element) = doc.get_element_by_id(container) else {
            return;
        };
        let Ok(html) = element.dyn_into::<HtmlElement>() else {
            return;
        };
        let display = if visible { "block" } else { "none" };
        if let Err(err) = html.style().set_property("display", display) {
            log::warn!("set_visible({container}): {err:?}");
        }
    }

    fn is_visible(&self, container: &str) -> bool {
        let Ok(doc) = document() else { return false };
        let Some(element) = doc.get_element_by_id(container) else {
            return false;
        };
        let Ok(html) = element.dyn_into::<HtmlElement>() else {
            return false;
        };
        html.style()
            .get_property_value("display")
            .map(|display| display != "none")
            .unwrap_or(true)
    }

    fn post_to_editor(&mut self, envelope: &Envelope) -> Result<(), BridgeError> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| BridgeError::Transport("editor frame is not mounted".into()))?;
        let target = frame
            .content_window()
            .ok_or_else(|| BridgeError::Transport("editor frame has no window yet".into()))?;
        let raw = envelope.encode()?;
        target
            .post_message(&JsValue::from_str(&raw), "*")
            .map_err(transport)
    }
}
