//! texnode - node graph engine for procedural texture authoring
//!
//! The crate keeps a graph of texture generator and filter nodes consistent
//! under arbitrary edits: sockets, edges and frames live in an arena owned by
//! the [`editor::Scene`], every mutation goes through an undoable command, and
//! the execution engine re-runs the affected nodes in dependency order.
//!
//! Actual pixel work is delegated to a [`nodes::TextureOperator`].

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod nodes;

pub use config::EditorConfig;
pub use editor::{Clipboard, Command, Scene};
pub use error::{GraphError, Result};
pub use nodes::{
    Bpc, Edge, EdgeId, Frame, FrameId, ItemRef, Node, NodeGraph, NodeId, NodeTypeId, Property,
    PropertyValue, SocketAddr, SocketDirection, SocketGroup, TextureHandle, TextureOperator,
};
