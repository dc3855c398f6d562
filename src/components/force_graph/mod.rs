mod animation;
mod component;
mod ego;
mod layout;
mod render;
mod state;
mod style;
mod types;

pub use animation::SimulationHandle;
pub use component::NoteGraph;
pub use ego::{LOCAL_GRAPH_HOPS, ego_network};
pub use layout::{LayoutEngine, LayoutParams, title_radius};
pub use style::{ColorMode, display_radius, node_color};
pub use types::{GraphLink, GraphNode, NodeSnapshot, Snapshot, Vec2};
