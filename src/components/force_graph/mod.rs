//! Credit mesh: graph model, force layout and the interactive canvas.

mod builder;
mod component;
mod interaction;
mod layout;
mod render;
mod state;
mod types;

pub use builder::{HUB_ID, credit_mesh};
pub use component::ForceGraphCanvas;
pub use interaction::{EdgeSnapshot, InteractionState, NodeSnapshot};
pub use layout::{ForceLayout, LayoutEngine, LayoutParams};
pub use state::ForceGraphState;
pub use types::{EdgeMetrics, GraphData, GraphError, MeshEdge, MeshNode, Metric, NodeRole, NodeStatus};
