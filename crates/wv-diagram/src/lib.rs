pub mod container;
pub mod context;
pub mod diagram;
pub mod frame;
pub mod geometry;
pub mod properties;
pub mod statements;
pub mod svg;

pub use container::{ChildView, StatementContainer};
pub use context::{DiagramContext, RenderArgs, ToolPalette, ViewOptions};
pub use diagram::{CANVAS_HEIGHT, CANVAS_PAD, CANVAS_WIDTH, Diagram};
pub use frame::{
    BLOCK_WIDTH, BODY_MIN_HEIGHT, BODY_PAD, CompoundFrame, STATEMENT_GAP, STATEMENT_HEIGHT,
    STATEMENT_WIDTH, TITLE_HEIGHT, TITLE_WIDTH,
};
pub use geometry::{BoundingBox, BoxEvent, BoxEventKind, BoxSubscription};
pub use properties::{EditableProperty, PropertyGetter, PropertyPane, PropertySetter, PropertyType};
pub use statements::{LeafStatementView, WhileStatementView};
pub use svg::{Canvas, ElemKey};
