//! Sockets - typed connection points owned by a node

use super::{EdgeId, NodeId, TextureHandle};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable socket identity, preserved by serialization and refreshed by clone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketId(pub Uuid);

impl SocketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    Input,
    Output,
}

/// Which of a node's socket lists a socket lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SocketGroup {
    Input,
    Output,
    Additional,
}

impl SocketGroup {
    pub fn direction(self) -> SocketDirection {
        match self {
            SocketGroup::Output => SocketDirection::Output,
            SocketGroup::Input | SocketGroup::Additional => SocketDirection::Input,
        }
    }
}

/// Arena address of a socket: owning node, list and index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SocketAddr {
    pub node: NodeId,
    pub group: SocketGroup,
    pub index: usize,
}

impl SocketAddr {
    pub fn new(node: NodeId, group: SocketGroup, index: usize) -> Self {
        Self { node, group, index }
    }

    pub fn input(node: NodeId, index: usize) -> Self {
        Self::new(node, SocketGroup::Input, index)
    }

    pub fn output(node: NodeId, index: usize) -> Self {
        Self::new(node, SocketGroup::Output, index)
    }

    pub fn additional(node: NodeId, index: usize) -> Self {
        Self::new(node, SocketGroup::Additional, index)
    }

    pub fn direction(&self) -> SocketDirection {
        self.group.direction()
    }
}

/// On-disk form of a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketRecord {
    pub id: SocketId,
}

/// A connection point on a node
///
/// An input socket carries at most one edge; an output socket any number.
/// The value is whatever was last pushed with [`Socket::set_value`] and is
/// kept when the last edge goes away.
#[derive(Debug, Clone)]
pub struct Socket {
    id: SocketId,
    direction: SocketDirection,
    additional: bool,
    tip: String,
    value: TextureHandle,
    edges: Vec<EdgeId>,
    visible: bool,
    global_pos: Vec2,
}

impl Socket {
    pub fn new(direction: SocketDirection, tip: impl Into<String>) -> Self {
        Self {
            id: SocketId::new(),
            direction,
            additional: false,
            tip: tip.into(),
            value: TextureHandle::EMPTY,
            edges: Vec::new(),
            visible: true,
            global_pos: Vec2::ZERO,
        }
    }

    /// Creates an optional input socket
    pub fn new_additional(tip: impl Into<String>) -> Self {
        Self {
            additional: true,
            ..Self::new(SocketDirection::Input, tip)
        }
    }

    pub fn id(&self) -> SocketId {
        self.id
    }

    pub fn direction(&self) -> SocketDirection {
        self.direction
    }

    pub fn is_input(&self) -> bool {
        self.direction == SocketDirection::Input
    }

    pub fn is_additional(&self) -> bool {
        self.additional
    }

    pub fn tip(&self) -> &str {
        &self.tip
    }

    pub fn add_edge(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub fn delete_edge(&mut self, edge: EdgeId) {
        self.edges.retain(|e| *e != edge);
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn count_edge(&self) -> usize {
        self.edges.len()
    }

    pub fn value(&self) -> TextureHandle {
        self.value
    }

    /// Stores a value; recomputation of the owner is up to the caller
    pub fn set_value(&mut self, value: TextureHandle) {
        self.value = value;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Cached device-space centre
    pub fn global_pos(&self) -> Vec2 {
        self.global_pos
    }

    pub fn set_global_pos(&mut self, pos: Vec2) {
        self.global_pos = pos;
    }

    /// Hit test against a circle in device space
    pub fn in_circle(&self, center: Vec2, radius: f32) -> bool {
        self.global_pos.distance_squared(center) <= radius * radius
    }

    /// Copy of this socket with a fresh identity, no edges and no value
    pub fn detached_copy(&self) -> Self {
        Self {
            id: SocketId::new(),
            value: TextureHandle::EMPTY,
            edges: Vec::new(),
            ..self.clone()
        }
    }

    pub fn serialize(&self) -> SocketRecord {
        SocketRecord { id: self.id }
    }

    pub fn deserialize(&mut self, record: &SocketRecord) {
        self.id = record.id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_deduplicated() {
        let mut socket = Socket::new(SocketDirection::Output, "Output");
        socket.add_edge(4);
        socket.add_edge(4);
        socket.add_edge(7);
        assert_eq!(socket.count_edge(), 2);
        socket.delete_edge(4);
        assert_eq!(socket.edges(), &[7]);
    }

    #[test]
    fn test_value_survives_edge_removal() {
        let mut socket = Socket::new(SocketDirection::Input, "Texture");
        socket.add_edge(1);
        socket.set_value(TextureHandle(12));
        socket.delete_edge(1);
        assert_eq!(socket.value(), TextureHandle(12));
    }

    #[test]
    fn test_in_circle() {
        let mut socket = Socket::new(SocketDirection::Input, "Texture");
        socket.set_global_pos(Vec2::new(10.0, 10.0));
        assert!(socket.in_circle(Vec2::new(13.0, 14.0), 5.0));
        assert!(!socket.in_circle(Vec2::new(20.0, 10.0), 5.0));
    }

    #[test]
    fn test_detached_copy_has_fresh_identity() {
        let mut socket = Socket::new_additional("Texture");
        socket.add_edge(2);
        socket.set_value(TextureHandle(5));
        socket.set_visible(false);
        let copy = socket.detached_copy();
        assert_ne!(copy.id(), socket.id());
        assert_eq!(copy.count_edge(), 0);
        assert!(copy.value().is_empty());
        assert!(copy.is_additional());
        assert!(!copy.visible());
    }

    #[test]
    fn test_deserialize_restores_identity() {
        let original = Socket::new(SocketDirection::Output, "Output");
        let mut restored = Socket::new(SocketDirection::Output, "Output");
        restored.deserialize(&original.serialize());
        assert_eq!(restored.id(), original.id());
    }
}
