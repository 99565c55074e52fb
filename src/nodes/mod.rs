//! Node system - graph data model, node kinds and evaluation

// Core node system modules
pub mod edge;
pub mod execution_engine;
pub mod frame;
pub mod graph;
pub mod node;
pub mod socket;

// Node kinds and their parameters
pub mod defaults;
pub mod factory;
pub mod params;
pub mod properties;

// Texture operator seam
pub mod texture;

// Re-export core types
pub use edge::{Edge, EdgeId, EdgeRecord};
pub use frame::{Frame, FrameId, FrameRecord};
pub use graph::{ItemRef, NodeGraph, SearchDirection};
pub use node::{Node, NodeId, NodeRecord};
pub use socket::{Socket, SocketAddr, SocketDirection, SocketGroup, SocketId, SocketRecord};

// Re-export node kind types
pub use factory::{NodeCategory, NodeFactory, NodeMetadata, NodeTypeId};
pub use params::NodeParams;
pub use properties::{GradientStop, Property, PropertyValue};

// Re-export execution engine types
pub use execution_engine::{ExecutionEngine, ExecutionStats, NodeState};
pub use texture::{
    Bpc, RenderRecord, RenderRequest, SequentialOperator, TextureHandle, TextureOperator,
};
