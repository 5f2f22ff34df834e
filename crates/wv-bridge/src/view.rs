//! The embedded spec-editor view.
//!
//! Presents a configurable panel hosting the spec-document editor in an
//! isolated browsing context, and proxies content access through the
//! content holder and the versioned channel. Construction is deliberately
//! lenient — a missing container is logged, not fatal — while every
//! cross-boundary call reports structured errors.

use crate::channel::{BridgeMessage, Envelope};
use crate::error::BridgeError;
use crate::holder::ContentHolder;
use crate::host::{FrameSpec, HostPage};

/// Construction options for the editor view.
#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    /// Id of the container element to render into.
    pub container: Option<String>,
    /// Initial document text to seed the editor with.
    pub content: Option<String>,
}

/// Wraps the embedded spec editor.
pub struct EmbeddedEditorView {
    container: Option<String>,
    initial_content: Option<String>,
    holder: Option<ContentHolder>,
}

impl EmbeddedEditorView {
    /// Build the view. A missing `container` is reported once via the log
    /// and construction proceeds; rendering will refuse until one exists.
    pub fn new(options: EditorOptions) -> Self {
        if options.container.is_none() {
            log::error!("container is not specified for rendering the spec editor view");
        }
        Self {
            container: options.container,
            initial_content: options.content,
            holder: None,
        }
    }

    fn container(&self) -> Result<&str, BridgeError> {
        self.container.as_deref().ok_or(BridgeError::ContainerMissing)
    }

    /// Whether the view was constructed with a container to render into.
    pub fn is_renderable(&self) -> bool {
        self.container.is_some()
    }

    /// Mount the editor: create a fresh content holder (clobbering any
    /// prior one), replace the container's contents with a single frame
    /// pointed at the container's configured `data-editor-url`, and push
    /// the initial content when present.
    pub fn render(&mut self, page: &mut dyn HostPage) -> Result<(), BridgeError> {
        let container = self.container()?.to_string();
        let url = page
            .container_attr(&container, "data-editor-url")
            .ok_or_else(|| BridgeError::EditorUrlMissing {
                container: container.clone(),
            })?;

        let holder = ContentHolder::new();
        self.holder = Some(holder.clone());

        page.replace_with_frame(&container, FrameSpec::fill(url))?;

        if let Some(text) = self.initial_content.clone() {
            holder.set_text(&text);
            page.post_to_editor(&Envelope::new(BridgeMessage::Init { text }))?;
        }
        Ok(())
    }

    /// Write new document text: update the holder, then tell the embedded
    /// editor to refresh. Fails with `HolderMissing` when the view was
    /// never rendered (or a stale mount lost its holder).
    pub fn set_content(&self, page: &mut dyn HostPage, text: &str) -> Result<(), BridgeError> {
        let holder = self.holder.as_ref().ok_or(BridgeError::HolderMissing)?;
        holder.set_text(text);
        page.post_to_editor(&Envelope::new(BridgeMessage::SetContent {
            text: text.to_string(),
        }))
    }

    /// Read the current document text from the holder.
    pub fn get_content(&self) -> Result<String, BridgeError> {
        let holder = self.holder.as_ref().ok_or(BridgeError::HolderMissing)?;
        Ok(holder.text().unwrap_or_default())
    }

    /// Apply a message arriving from the editor frame. Host-bound content
    /// updates land in the holder; anything else is logged and ignored.
    pub fn handle_editor_message(&self, envelope: &Envelope) -> Result<(), BridgeError> {
        let holder = self.holder.as_ref().ok_or(BridgeError::HolderMissing)?;
        match &envelope.message {
            BridgeMessage::Content { text } | BridgeMessage::ContentChanged { text } => {
                holder.set_text(text);
                Ok(())
            }
            BridgeMessage::Ready => {
                log::debug!("spec editor frame is ready");
                Ok(())
            }
            other => {
                log::warn!("ignoring host-bound channel message from editor: {other:?}");
                Ok(())
            }
        }
    }

    /// Show the editor panel.
    pub fn show(&self, page: &mut dyn HostPage) -> Result<(), BridgeError> {
        page.set_visible(self.container()?, true);
        Ok(())
    }

    /// Hide the editor panel.
    pub fn hide(&self, page: &mut dyn HostPage) -> Result<(), BridgeError> {
        page.set_visible(self.container()?, false);
        Ok(())
    }

    /// Whether the editor panel is currently displayed.
    pub fn is_visible(&self, page: &dyn HostPage) -> bool {
        self.container
            .as_deref()
            .map(|c| page.is_visible(c))
            .unwrap_or(false)
    }
}
