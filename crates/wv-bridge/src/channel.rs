//! The versioned message contract between the hosting page and the
//! embedded editor frame.
//!
//! Both sides exchange JSON envelopes: a protocol version plus one tagged
//! message. Nothing is discovered through shared global scope — the
//! transport is injected as a [`HostPage`](crate::host::HostPage)
//! implementation, and a version mismatch is rejected at decode time
//! instead of failing somewhere inside the peer.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};

/// Current wire version. Bump when the message schema changes shape.
pub const PROTOCOL_VERSION: u16 = 1;

/// One message in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BridgeMessage {
    // host → editor
    /// First content push after the frame mounts.
    Init { text: String },
    /// Replace the editor's document text.
    SetContent { text: String },
    /// Ask the editor to report its current text.
    RequestContent,

    // editor → host
    /// The editor finished booting inside the frame.
    Ready,
    /// Response to `RequestContent`.
    Content { text: String },
    /// The user edited the document inside the frame.
    ContentChanged { text: String },
}

impl BridgeMessage {
    /// Whether this message travels from the hosting page into the frame.
    pub fn is_host_to_editor(&self) -> bool {
        match self {
            BridgeMessage::Init { .. }
            | BridgeMessage::SetContent { .. }
            | BridgeMessage::RequestContent => true,
            BridgeMessage::Ready
            | BridgeMessage::Content { .. }
            | BridgeMessage::ContentChanged { .. } => false,
        }
    }
}

/// A versioned message envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u16,
    #[serde(flatten)]
    pub message: BridgeMessage,
}

impl Envelope {
    /// Wrap a message under the current protocol version.
    pub fn new(message: BridgeMessage) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            message,
        }
    }

    /// Serialize to the JSON wire form.
    pub fn encode(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Codec(e.to_string()))
    }

    /// Parse the JSON wire form, rejecting unknown protocol versions.
    pub fn decode(raw: &str) -> Result<Self, BridgeError> {
        let envelope: Envelope =
            serde_json::from_str(raw).map_err(|e| BridgeError::Codec(e.to_string()))?;
        if envelope.version != PROTOCOL_VERSION {
            return Err(BridgeError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                got: envelope.version,
            });
        }
        Ok(envelope)
    }
}
