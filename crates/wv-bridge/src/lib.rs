pub mod channel;
pub mod error;
pub mod holder;
pub mod host;
pub mod view;

pub use channel::{BridgeMessage, Envelope, PROTOCOL_VERSION};
pub use error::BridgeError;
pub use holder::ContentHolder;
pub use host::{FrameSpec, HostPage};
pub use view::{EditorOptions, EmbeddedEditorView};
