use std::fmt;

/// Failures at the host-page boundary.
///
/// The channel replaces crash-at-call-time global lookups, so every
/// cross-boundary operation is fallible and reports what was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No container was configured for the view.
    ContainerMissing,
    /// The container has no `data-editor-url` attribute.
    EditorUrlMissing { container: String },
    /// Content was accessed before `render` created the holder.
    HolderMissing,
    /// The peer spoke a different protocol version.
    VersionMismatch { expected: u16, got: u16 },
    /// A message failed to encode or decode.
    Codec(String),
    /// The hosting page failed to deliver a message or mount the frame.
    Transport(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::ContainerMissing => {
                write!(f, "no container is configured for the editor view")
            }
            BridgeError::EditorUrlMissing { container } => {
                write!(f, "container `{container}` has no data-editor-url attribute")
            }
            BridgeError::HolderMissing => {
                write!(f, "the content holder does not exist; render the view first")
            }
            BridgeError::VersionMismatch { expected, got } => {
                write!(f, "protocol version mismatch: expected {expected}, got {got}")
            }
            BridgeError::Codec(msg) => write!(f, "message codec error: {msg}"),
            BridgeError::Transport(msg) => write!(f, "host page transport error: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}
