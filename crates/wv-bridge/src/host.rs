//! The injected hosting-page surface.
//!
//! Everything the bridge needs from the page that embeds it — attribute
//! reads, frame mounting, visibility, and message delivery into the frame —
//! goes through this trait. The DOM implementation lives in the wasm crate;
//! tests inject a fake.

use crate::channel::Envelope;
use crate::error::BridgeError;

/// How the mounted editor frame should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// The editor URL, read from the container's `data-editor-url`.
    pub src: String,
    pub width: String,
    pub height: String,
    pub background: String,
}

impl FrameSpec {
    /// A borderless frame filling its container.
    pub fn fill(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            width: "100%".into(),
            height: "100%".into(),
            background: "#4a4a4a".into(),
        }
    }
}

/// The hosting-page contract consumed by the bridge.
pub trait HostPage {
    /// Read an attribute of the container element.
    fn container_attr(&self, container: &str, name: &str) -> Option<String>;

    /// Replace the container's contents with a single mounted frame.
    fn replace_with_frame(&mut self, container: &str, frame: FrameSpec) -> Result<(), BridgeError>;

    /// Toggle the container's CSS visibility.
    fn set_visible(&mut self, container: &str, visible: bool);

    /// Whether the container is currently displayed.
    fn is_visible(&self, container: &str) -> bool;

    /// Deliver an envelope into the mounted editor frame.
    fn post_to_editor(&mut self, envelope: &Envelope) -> Result<(), BridgeError>;
}
