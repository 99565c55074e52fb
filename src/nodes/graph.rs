//! Node graph data structures and operations
//!
//! The graph is an arena: nodes, edges and frames are stored by stable id and
//! refer to each other only through ids. Every structural change goes through
//! a method here so the two-sided links (socket edge lists, frame membership)
//! stay consistent.

use super::edge::{Edge, EdgeId};
use super::frame::{Frame, FrameId};
use super::node::{Node, NodeId};
use super::socket::{Socket, SocketAddr, SocketDirection};
use crate::constants::frame::{HEADER_HEIGHT, MARGIN};
use crate::editor::viewport::ViewTransform;
use crate::error::{GraphError, Result};
use glam::Vec2;
use log::warn;
use std::collections::{BTreeMap, HashSet};

/// A reference to any item that can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemRef {
    Node(NodeId),
    Edge(EdgeId),
    Frame(FrameId),
}

/// Which way [`NodeGraph::check_connected`] walks edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// From a node towards the nodes feeding it
    Upstream,
    /// From a node towards the nodes it feeds
    Downstream,
}

/// A graph containing nodes, edges and frames
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    frames: BTreeMap<FrameId, Frame>,
    view: ViewTransform,
    next_node_id: NodeId,
    next_edge_id: EdgeId,
    next_frame_id: FrameId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn edges(&self) -> &BTreeMap<EdgeId, Edge> {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    pub fn frames(&self) -> &BTreeMap<FrameId, Frame> {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(&id)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(&id)
    }

    pub fn contains(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Node(id) => self.nodes.contains_key(&id),
            ItemRef::Edge(id) => self.edges.contains_key(&id),
            ItemRef::Frame(id) => self.frames.contains_key(&id),
        }
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Change pan/zoom and refresh every cached device position
    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
        self.refresh_positions();
    }

    pub fn alloc_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    pub fn alloc_edge_id(&mut self) -> EdgeId {
        let id = self.next_edge_id;
        self.next_edge_id += 1;
        id
    }

    pub fn alloc_frame_id(&mut self) -> FrameId {
        let id = self.next_frame_id;
        self.next_frame_id += 1;
        id
    }

    /// Removes everything and resets id allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.frames.clear();
        self.next_node_id = 0;
        self.next_edge_id = 0;
        self.next_frame_id = 0;
    }

    pub fn socket(&self, addr: SocketAddr) -> Option<&Socket> {
        self.nodes.get(&addr.node)?.socket(addr.group, addr.index)
    }

    pub fn socket_mut(&mut self, addr: SocketAddr) -> Option<&mut Socket> {
        self.nodes.get_mut(&addr.node)?.socket_mut(addr.group, addr.index)
    }

    // ---- nodes ----

    /// Inserts a node under its own id
    ///
    /// A node that remembers a frame rejoins it if that frame is live.
    pub fn insert_node(&mut self, mut node: Node) -> NodeId {
        let id = node.id;
        self.next_node_id = self.next_node_id.max(id + 1);
        node.update_socket_positions(&self.view);
        if let Some(frame_id) = node.attached_frame() {
            match self.frames.get_mut(&frame_id) {
                Some(frame) => frame.push_content(id),
                None => node.set_attached_frame(None),
            }
        }
        self.nodes.insert(id, node);
        id
    }

    /// Removes a node; its edges must already be gone
    ///
    /// The node keeps its frame back-reference so reinserting it restores
    /// membership.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let mut node = self.nodes.remove(&id)?;
        if node.has_edges() {
            debug_assert!(false, "node {} removed while still connected", id);
            warn!("Node {} removed while still connected", id);
        }
        if let Some(frame) = node.attached_frame().and_then(|f| self.frames.get_mut(&f)) {
            frame.remove_content(id);
        }
        node.set_selected(false);
        Some(node)
    }

    /// Every edge touching any socket of a node
    pub fn edges_of_node(&self, id: NodeId) -> Vec<EdgeId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut edges: Vec<EdgeId> = node
            .inputs()
            .iter()
            .chain(node.outputs())
            .chain(node.additionals())
            .flat_map(|s| s.edges().iter().copied())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Nodes fed by this node's outputs
    pub fn downstream_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        node.outputs()
            .iter()
            .flat_map(|s| s.edges())
            .filter_map(|e| self.edges.get(e))
            .map(|e| e.end_socket().node)
            .collect()
    }

    /// Nodes feeding this node's inputs
    pub fn upstream_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        node.inputs()
            .iter()
            .chain(node.additionals())
            .flat_map(|s| s.edges())
            .filter_map(|e| self.edges.get(e))
            .map(|e| e.start_socket().node)
            .collect()
    }

    /// Whether `target` is reachable from `origin` walking edges in `direction`
    pub fn check_connected(&self, origin: NodeId, target: NodeId, direction: SearchDirection) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![origin];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let next = match direction {
                SearchDirection::Upstream => self.upstream_nodes(current),
                SearchDirection::Downstream => self.downstream_nodes(current),
            };
            for node in next {
                if node == target {
                    return true;
                }
                stack.push(node);
            }
        }
        false
    }

    /// Whether an edge from `start` to `end` would close a cycle
    pub fn would_create_cycle(&self, start: NodeId, end: NodeId) -> bool {
        start == end || self.check_connected(start, end, SearchDirection::Upstream)
    }

    /// Moves a node and resizes the frame it belongs to
    pub fn set_node_position(&mut self, id: NodeId, position: Vec2) {
        let frame = self.nodes.get(&id).and_then(Node::attached_frame);
        self.place_node(id, position);
        if let Some(frame) = frame {
            self.resize_frame_by_content(frame);
        }
    }

    /// Moves a node without touching its frame
    fn place_node(&mut self, id: NodeId, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
            node.update_socket_positions(&self.view);
        }
        self.refresh_node_edges(id);
    }

    /// Recompute socket positions after the node's box changed shape
    pub fn refresh_node_geometry(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.update_socket_positions(&self.view);
        }
        self.refresh_node_edges(id);
    }

    fn refresh_node_edges(&mut self, id: NodeId) {
        for edge_id in self.edges_of_node(id) {
            self.refresh_edge(edge_id);
        }
    }

    fn refresh_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get(&id) else {
            return;
        };
        let start = self.socket(edge.start_socket()).map(Socket::global_pos);
        let end = self.socket(edge.end_socket()).map(Socket::global_pos);
        if let Some(edge) = self.edges.get_mut(&id) {
            if let Some(start) = start {
                edge.set_start_position(start);
            }
            if let Some(end) = end {
                edge.set_end_position(end);
            }
        }
    }

    /// Refresh every cached device position
    pub fn refresh_positions(&mut self) {
        let view = self.view;
        for node in self.nodes.values_mut() {
            node.update_socket_positions(&view);
        }
        let ids: Vec<EdgeId> = self.edges.keys().copied().collect();
        for id in ids {
            self.refresh_edge(id);
        }
    }

    // ---- edges ----

    /// Registers an edge with its sockets and copies the start value forward
    ///
    /// The end node becomes dirty. The end socket must be a free input.
    pub fn link_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        let (start, end) = (edge.start_socket(), edge.end_socket());
        if start.direction() != SocketDirection::Output || end.direction() != SocketDirection::Input {
            return Err(GraphError::DirectionMismatch);
        }
        let value = self.socket(start).ok_or(GraphError::MissingSocket(start))?.value();
        let end_socket = self.socket(end).ok_or(GraphError::MissingSocket(end))?;
        if end_socket.count_edge() > 0 {
            return Err(GraphError::InputOccupied(end));
        }

        let id = edge.id;
        self.next_edge_id = self.next_edge_id.max(id + 1);
        if let Some(socket) = self.socket_mut(start) {
            socket.add_edge(id);
        }
        if let Some(socket) = self.socket_mut(end) {
            socket.add_edge(id);
            socket.set_value(value);
        }
        if let Some(node) = self.nodes.get_mut(&end.node) {
            node.mark_dirty();
        }
        self.edges.insert(id, edge);
        self.refresh_edge(id);
        Ok(id)
    }

    /// Removes an edge from the graph and from both sockets
    ///
    /// The end socket keeps its last value.
    pub fn unlink_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let mut edge = self.edges.remove(&id)?;
        if let Some(socket) = self.socket_mut(edge.start_socket()) {
            socket.delete_edge(id);
        }
        if let Some(socket) = self.socket_mut(edge.end_socket()) {
            socket.delete_edge(id);
        }
        edge.set_selected(false);
        Some(edge)
    }

    /// Moves an edge's end to another input socket, copying the start value into it
    pub fn reconnect_end(&mut self, id: EdgeId, new_end: SocketAddr) -> Result<()> {
        let edge = self.edges.get(&id).ok_or(GraphError::MissingEdge(id))?;
        let (start, old_end) = (edge.start_socket(), edge.end_socket());
        if new_end.direction() != SocketDirection::Input {
            return Err(GraphError::DirectionMismatch);
        }
        let value = self.socket(start).ok_or(GraphError::MissingSocket(start))?.value();
        if self.socket(new_end).is_none() {
            return Err(GraphError::MissingSocket(new_end));
        }

        if let Some(socket) = self.socket_mut(old_end) {
            socket.delete_edge(id);
        }
        if let Some(socket) = self.socket_mut(new_end) {
            socket.add_edge(id);
            socket.set_value(value);
        }
        if let Some(edge) = self.edges.get_mut(&id) {
            edge.set_end_socket(new_end);
        }
        if let Some(node) = self.nodes.get_mut(&new_end.node) {
            node.mark_dirty();
        }
        self.refresh_edge(id);
        Ok(())
    }

    /// First edge on an input socket
    pub fn input_edge(&self, addr: SocketAddr) -> Option<EdgeId> {
        self.socket(addr)?.edges().first().copied()
    }

    /// An existing edge joining exactly these two sockets
    pub fn find_edge(&self, start: SocketAddr, end: SocketAddr) -> Option<EdgeId> {
        self.socket(end)?
            .edges()
            .iter()
            .copied()
            .find(|e| self.edges.get(e).is_some_and(|e| e.start_socket() == start))
    }

    /// First edge, not touching the node, whose curve crosses the node's box
    pub fn edge_under_node(&self, id: NodeId) -> Option<EdgeId> {
        let node = self.nodes.get(&id)?;
        let min = self.view.to_device(node.position);
        let size = self.view.to_device_len(node.size());
        self.edges
            .values()
            .filter(|e| e.start_socket().node != id && e.end_socket().node != id)
            .find(|e| e.intersect_with(min, size))
            .map(|e| e.id)
    }

    /// Visible socket of a direction near a device point, among the given nodes
    pub fn socket_at(
        &self,
        device_point: Vec2,
        radius: f32,
        direction: SocketDirection,
        candidates: impl IntoIterator<Item = NodeId>,
    ) -> Option<SocketAddr> {
        candidates
            .into_iter()
            .filter_map(|id| self.nodes.get(&id))
            .find_map(|node| node.nearest_socket(device_point, radius, direction))
    }

    // ---- frames ----

    /// Inserts a frame under its own id and reclaims its live members
    pub fn insert_frame(&mut self, mut frame: Frame) -> FrameId {
        let id = frame.id;
        self.next_frame_id = self.next_frame_id.max(id + 1);
        let members: Vec<NodeId> = frame
            .content()
            .iter()
            .copied()
            .filter(|n| self.nodes.contains_key(n))
            .collect();
        frame.clear_content();
        self.frames.insert(id, frame);
        for node in members {
            self.attach(id, node);
        }
        id
    }

    /// Removes a frame; members stay in the graph but lose their frame
    ///
    /// The returned frame still lists its members so reinsertion restores them.
    pub fn remove_frame(&mut self, id: FrameId) -> Option<Frame> {
        let mut frame = self.frames.remove(&id)?;
        for node in frame.content() {
            if let Some(node) = self.nodes.get_mut(node) {
                node.set_attached_frame(None);
            }
        }
        frame.set_selected(false);
        Some(frame)
    }

    fn attach(&mut self, frame_id: FrameId, node_id: NodeId) {
        let previous = self.nodes.get(&node_id).and_then(Node::attached_frame);
        if let Some(previous) = previous.filter(|p| *p != frame_id) {
            if let Some(frame) = self.frames.get_mut(&previous) {
                frame.remove_content(node_id);
            }
        }
        if let (Some(frame), Some(node)) = (self.frames.get_mut(&frame_id), self.nodes.get_mut(&node_id)) {
            frame.push_content(node_id);
            node.set_attached_frame(Some(frame_id));
        }
    }

    /// Reparents nodes into a frame and fits the frame around its content
    pub fn frame_add_nodes(&mut self, frame_id: FrameId, nodes: &[NodeId]) {
        for node in nodes {
            self.attach(frame_id, *node);
        }
        self.resize_frame_by_content(frame_id);
    }

    /// Reparents nodes into a frame, leaving its geometry alone
    pub fn frame_attach_nodes(&mut self, frame_id: FrameId, nodes: &[NodeId]) {
        for node in nodes {
            self.attach(frame_id, *node);
        }
    }

    pub fn frame_remove_node(&mut self, frame_id: FrameId, node_id: NodeId) {
        if let Some(frame) = self.frames.get_mut(&frame_id) {
            frame.remove_content(node_id);
        }
        if let Some(node) = self.nodes.get_mut(&node_id) {
            if node.attached_frame() == Some(frame_id) {
                node.set_attached_frame(None);
            }
        }
    }

    /// Bounding box of member boxes plus margin and header
    ///
    /// Suppressed while the frame is selected, and for empty frames.
    pub fn resize_frame_by_content(&mut self, frame_id: FrameId) {
        let Some(frame) = self.frames.get(&frame_id) else {
            return;
        };
        if frame.selected() {
            return;
        }
        let mut boxes = frame
            .content()
            .iter()
            .filter_map(|n| self.nodes.get(n))
            .map(|n| (n.position, n.position + n.size()));
        let Some(first) = boxes.next() else {
            return;
        };
        let (min, max) = boxes.fold(first, |(min, max), (lo, hi)| (min.min(lo), max.max(hi)));
        let position = min - Vec2::new(MARGIN, MARGIN + HEADER_HEIGHT);
        let size = (max - min) + Vec2::new(2.0 * MARGIN, 2.0 * MARGIN + HEADER_HEIGHT);
        if let Some(frame) = self.frames.get_mut(&frame_id) {
            frame.set_geometry(position, size);
        }
    }

    /// Set position and size; members stay where they are
    pub fn set_frame_geometry(&mut self, frame_id: FrameId, position: Vec2, size: Vec2) {
        if let Some(frame) = self.frames.get_mut(&frame_id) {
            frame.set_geometry(position, size);
        }
    }

    /// Move a frame and every member not listed in `moved`
    pub fn translate_frame(&mut self, frame_id: FrameId, delta: Vec2, moved: &[NodeId]) {
        let Some(frame) = self.frames.get_mut(&frame_id) else {
            return;
        };
        frame.set_position(frame.position() + delta);
        let members: Vec<NodeId> = frame.content().to_vec();
        for id in members.into_iter().filter(|id| !moved.contains(id)) {
            if let Some(position) = self.nodes.get(&id).map(|n| n.position) {
                self.place_node(id, position + delta);
            }
        }
    }

    /// Topmost (most recently created) frame containing a document point
    pub fn frame_at(&self, doc_point: Vec2) -> Option<FrameId> {
        self.frames
            .values()
            .rev()
            .find(|f| f.contains_point(doc_point))
            .map(|f| f.id)
    }

    /// Clears every item's selected flag
    pub fn clear_selection_flags(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_selected(false);
        }
        for edge in self.edges.values_mut() {
            edge.set_selected(false);
        }
        for frame in self.frames.values_mut() {
            frame.set_selected(false);
        }
    }

    pub fn set_item_selected(&mut self, item: ItemRef, selected: bool) {
        match item {
            ItemRef::Node(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.set_selected(selected);
                }
            }
            ItemRef::Edge(id) => {
                if let Some(edge) = self.edges.get_mut(&id) {
                    edge.set_selected(selected);
                }
            }
            ItemRef::Frame(id) => {
                if let Some(frame) = self.frames.get_mut(&id) {
                    frame.set_selected(selected);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Bpc, NodeParams, NodeTypeId, TextureHandle};
    use glam::UVec2;

    fn add(graph: &mut NodeGraph, type_id: NodeTypeId, position: Vec2) -> NodeId {
        let id = graph.alloc_node_id();
        let mut node = Node::new(id, NodeParams::default_for(type_id), UVec2::splat(64), Bpc::Rgba8);
        node.position = position;
        graph.insert_node(node)
    }

    fn connect(graph: &mut NodeGraph, from: NodeId, to: NodeId) -> EdgeId {
        let id = graph.alloc_edge_id();
        graph
            .link_edge(Edge::new(id, SocketAddr::output(from, 0), SocketAddr::input(to, 0)))
            .unwrap()
    }

    #[test]
    fn test_link_copies_value_and_marks_dirty() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Noise, Vec2::ZERO);
        let b = add(&mut graph, NodeTypeId::Inverse, Vec2::new(300.0, 0.0));
        graph.socket_mut(SocketAddr::output(a, 0)).unwrap().set_value(TextureHandle(8));
        graph.node_mut(b).unwrap().mark_idle();

        let edge = connect(&mut graph, a, b);
        assert_eq!(graph.socket(SocketAddr::input(b, 0)).unwrap().value(), TextureHandle(8));
        assert_eq!(graph.node(b).unwrap().state(), crate::nodes::NodeState::Dirty);
        assert_eq!(graph.edges_of_node(a), vec![edge]);

        let removed = graph.unlink_edge(edge).unwrap();
        assert_eq!(removed.id, edge);
        assert!(!graph.node(a).unwrap().has_edges());
        assert_eq!(graph.socket(SocketAddr::input(b, 0)).unwrap().value(), TextureHandle(8));
    }

    #[test]
    fn test_occupied_input_is_rejected() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Noise, Vec2::ZERO);
        let b = add(&mut graph, NodeTypeId::Color, Vec2::ZERO);
        let c = add(&mut graph, NodeTypeId::Inverse, Vec2::ZERO);
        connect(&mut graph, a, c);
        let id = graph.alloc_edge_id();
        let result = graph.link_edge(Edge::new(id, SocketAddr::output(b, 0), SocketAddr::input(c, 0)));
        assert!(matches!(result, Err(GraphError::InputOccupied(_))));
    }

    #[test]
    fn test_check_connected_and_cycles() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Noise, Vec2::ZERO);
        let b = add(&mut graph, NodeTypeId::Inverse, Vec2::ZERO);
        let c = add(&mut graph, NodeTypeId::Grayscale, Vec2::ZERO);
        connect(&mut graph, a, b);
        connect(&mut graph, b, c);
        assert!(graph.check_connected(c, a, SearchDirection::Upstream));
        assert!(graph.check_connected(a, c, SearchDirection::Downstream));
        assert!(!graph.check_connected(a, c, SearchDirection::Upstream));
        assert!(graph.would_create_cycle(c, a));
        assert!(graph.would_create_cycle(b, b));
        assert!(!graph.would_create_cycle(a, c));
    }

    #[test]
    fn test_reconnect_end_moves_value() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Color, Vec2::ZERO);
        let b = add(&mut graph, NodeTypeId::Inverse, Vec2::ZERO);
        let c = add(&mut graph, NodeTypeId::Grayscale, Vec2::ZERO);
        graph.socket_mut(SocketAddr::output(a, 0)).unwrap().set_value(TextureHandle(3));
        let edge = connect(&mut graph, a, b);
        graph.reconnect_end(edge, SocketAddr::input(c, 0)).unwrap();
        assert_eq!(graph.socket(SocketAddr::input(b, 0)).unwrap().count_edge(), 0);
        assert_eq!(graph.socket(SocketAddr::input(c, 0)).unwrap().value(), TextureHandle(3));
        assert_eq!(graph.edge(edge).unwrap().end_socket(), SocketAddr::input(c, 0));
    }

    #[test]
    fn test_frame_membership_survives_remove_and_insert() {
        let mut graph = NodeGraph::new();
        let n = add(&mut graph, NodeTypeId::Noise, Vec2::new(100.0, 100.0));
        let frame_id = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(frame_id, Vec2::ZERO));
        graph.frame_add_nodes(frame_id, &[n]);

        let frame = graph.frame(frame_id).unwrap();
        assert_eq!(frame.position(), Vec2::new(100.0 - MARGIN, 100.0 - MARGIN - HEADER_HEIGHT));
        assert_eq!(frame.content(), &[n]);

        let node = graph.remove_node(n).unwrap();
        assert!(graph.frame(frame_id).unwrap().content().is_empty());
        graph.insert_node(node);
        assert_eq!(graph.frame(frame_id).unwrap().content(), &[n]);

        let frame = graph.remove_frame(frame_id).unwrap();
        assert_eq!(graph.node(n).unwrap().attached_frame(), None);
        graph.insert_frame(frame);
        assert_eq!(graph.node(n).unwrap().attached_frame(), Some(frame_id));
    }

    #[test]
    fn test_resize_suppressed_while_selected() {
        let mut graph = NodeGraph::new();
        let n = add(&mut graph, NodeTypeId::Noise, Vec2::ZERO);
        let frame_id = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(frame_id, Vec2::ZERO));
        graph.frame_add_nodes(frame_id, &[n]);
        let before = graph.frame(frame_id).unwrap().position();
        graph.frame_mut(frame_id).unwrap().set_selected(true);
        graph.set_node_position(n, Vec2::new(50.0, 50.0));
        assert_eq!(graph.frame(frame_id).unwrap().position(), before);
        graph.frame_mut(frame_id).unwrap().set_selected(false);
        graph.set_node_position(n, Vec2::new(60.0, 50.0));
        assert_eq!(graph.frame(frame_id).unwrap().position().x, 60.0 - MARGIN);
    }

    #[test]
    fn test_translate_frame_moves_members() {
        let mut graph = NodeGraph::new();
        let n = add(&mut graph, NodeTypeId::Noise, Vec2::new(10.0, 10.0));
        let m = add(&mut graph, NodeTypeId::Color, Vec2::new(300.0, 10.0));
        let frame_id = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(frame_id, Vec2::ZERO));
        graph.frame_add_nodes(frame_id, &[n, m]);
        let before = graph.frame(frame_id).unwrap().position();
        graph.translate_frame(frame_id, Vec2::new(5.0, -5.0), &[m]);
        assert_eq!(graph.node(n).unwrap().position, Vec2::new(15.0, 5.0));
        assert_eq!(graph.node(m).unwrap().position, Vec2::new(300.0, 10.0));
        assert_eq!(graph.frame(frame_id).unwrap().position(), before + Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_frame_at_prefers_topmost() {
        let mut graph = NodeGraph::new();
        let lower = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(lower, Vec2::ZERO));
        let upper = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(upper, Vec2::new(100.0, 100.0)));
        assert_eq!(graph.frame_at(Vec2::new(150.0, 150.0)), Some(upper));
        assert_eq!(graph.frame_at(Vec2::new(50.0, 50.0)), Some(lower));
        assert_eq!(graph.frame_at(Vec2::new(-5.0, 50.0)), None);
    }

    #[test]
    fn test_edge_under_node() {
        let mut graph = NodeGraph::new();
        let a = add(&mut graph, NodeTypeId::Color, Vec2::ZERO);
        let b = add(&mut graph, NodeTypeId::Inverse, Vec2::new(800.0, 0.0));
        let c = add(&mut graph, NodeTypeId::Grayscale, Vec2::new(400.0, 0.0));
        let edge = connect(&mut graph, a, b);
        assert_eq!(graph.edge_under_node(c), Some(edge));
        graph.set_node_position(c, Vec2::new(400.0, 600.0));
        assert_eq!(graph.edge_under_node(c), None);
    }
}
