//! Error type shared by the graph, editor and file layers

use crate::nodes::{EdgeId, FrameId, NodeId, Property, SocketAddr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Unknown node type id: {0}")]
    UnknownNodeType(u32),
    #[error("Node {0} does not exist")]
    MissingNode(NodeId),
    #[error("Edge {0} does not exist")]
    MissingEdge(EdgeId),
    #[error("Frame {0} does not exist")]
    MissingFrame(FrameId),
    #[error("Socket {0:?} does not exist")]
    MissingSocket(SocketAddr),
    #[error("Socket id {0} is not known to this document")]
    UnknownSocketId(uuid::Uuid),
    #[error("Connection would create a cycle")]
    CycleDetected,
    #[error("Cannot connect a node to itself")]
    SelfConnection,
    #[error("Connection must go from an output socket to an input socket")]
    DirectionMismatch,
    #[error("Input socket {0:?} already has an edge")]
    InputOccupied(SocketAddr),
    #[error("Property {property:?} is not supported by {target}")]
    UnsupportedProperty { property: Property, target: String },
    #[error("Property {property:?} expects {expected}")]
    PropertyType { property: Property, expected: &'static str },
    #[error("Malformed document: {0}")]
    Document(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
