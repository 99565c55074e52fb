//! Copy, cut, paste and duplicate of a selected sub-graph
//!
//! Copied edges are stored as endpoint positions in document space, not as
//! socket identities. Pasting translates those points and relinks each edge
//! to whatever sockets lie under them, dropping edges that land nowhere.

use super::commands::{Command, PasteCommand};
use super::Scene;
use crate::nodes::{
    Edge, Frame, ItemRef, Node, NodeGraph, NodeId, SocketAddr, SocketDirection, TextureOperator,
};
use glam::Vec2;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Finds the socket under a device-space point
pub trait SocketResolver {
    fn resolve_socket_at(&self, device_point: Vec2, direction: SocketDirection) -> Option<SocketAddr>;
}

/// Looks among nodes about to be pasted first, then the live graph
struct PasteResolver<'a> {
    graph: &'a NodeGraph,
    pasted: &'a [Node],
    radius: f32,
}

impl SocketResolver for PasteResolver<'_> {
    fn resolve_socket_at(&self, device_point: Vec2, direction: SocketDirection) -> Option<SocketAddr> {
        self.pasted
            .iter()
            .find_map(|n| n.nearest_socket(device_point, self.radius, direction))
            .or_else(|| {
                self.graph.socket_at(
                    device_point,
                    self.radius,
                    direction,
                    self.graph.nodes().keys().copied(),
                )
            })
    }
}

#[derive(Debug, Clone)]
struct CopiedEdge {
    start: Vec2,
    end: Vec2,
}

#[derive(Debug, Clone)]
struct CopiedFrame {
    frame: Frame,
    /// Indices into the copied node list
    members: Vec<usize>,
}

/// In-process copy buffer
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    nodes: Vec<Node>,
    frames: Vec<CopiedFrame>,
    edges: Vec<CopiedEdge>,
    center: Vec2,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.frames.is_empty()
    }

    /// Document-space centre of the copied items' bounding box
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Snapshot the selection, replacing the previous contents
    ///
    /// Selected frames are copied with those of their members that are also
    /// selected. Other selected nodes are copied on their own. Material
    /// outputs are never copied. An edge is kept when both its nodes were
    /// copied.
    pub fn copy<O: TextureOperator>(&mut self, scene: &Scene<O>) {
        *self = Self::snapshot(scene.graph(), scene.selection());
        debug!(
            "Copied {} nodes, {} frames, {} edges",
            self.nodes.len(),
            self.frames.len(),
            self.edges.len()
        );
    }

    /// Copy, then delete the selection without bridging
    pub fn cut<O: TextureOperator>(&mut self, scene: &mut Scene<O>) {
        self.copy(scene);
        scene.delete_selection(false);
    }

    /// Paste so the copied centre lands on a device point
    ///
    /// Returns the pasted nodes and frames, which become the selection.
    pub fn paste<O: TextureOperator>(&self, scene: &mut Scene<O>, device_point: Vec2) -> Vec<ItemRef> {
        let target = scene.to_document(device_point);
        self.materialize(scene, target - self.center)
    }

    /// Copy the selection and paste it at the configured offset, leaving the
    /// clipboard untouched
    pub fn duplicate<O: TextureOperator>(scene: &mut Scene<O>) -> Vec<ItemRef> {
        let snapshot = Self::snapshot(scene.graph(), scene.selection());
        let offset = scene.config().duplicate_offset;
        snapshot.materialize(scene, offset)
    }

    fn snapshot(graph: &NodeGraph, selection: &[ItemRef]) -> Self {
        let copyable = |id: &NodeId| {
            selection.contains(&ItemRef::Node(*id))
                && graph.node(*id).is_some_and(|n| !n.type_id().is_material_output())
        };

        let selected_frames: Vec<&Frame> = selection
            .iter()
            .filter_map(|i| match i {
                ItemRef::Frame(id) => graph.frame(*id),
                _ => None,
            })
            .collect();
        let framed: HashSet<NodeId> = selected_frames
            .iter()
            .flat_map(|f| f.content().iter().copied())
            .collect();

        let mut order: Vec<NodeId> = Vec::new();
        let mut frames = Vec::new();
        for frame in &selected_frames {
            let mut members = Vec::new();
            for id in frame.content().iter().filter(|id| copyable(id)) {
                if !order.contains(id) {
                    members.push(order.len());
                    order.push(*id);
                }
            }
            frames.push(CopiedFrame {
                frame: frame.clone_detached(0),
                members,
            });
        }
        for item in selection {
            if let ItemRef::Node(id) = item {
                if !framed.contains(id) && copyable(id) && !order.contains(id) {
                    order.push(*id);
                }
            }
        }

        let covered: HashSet<NodeId> = order.iter().copied().collect();
        let view = graph.view();
        let edges = graph
            .edges()
            .values()
            .filter(|e| covered.contains(&e.start_socket().node) && covered.contains(&e.end_socket().node))
            .filter_map(|e| {
                let start = graph.socket(e.start_socket())?.global_pos();
                let end = graph.socket(e.end_socket())?.global_pos();
                Some(CopiedEdge {
                    start: view.to_document(start),
                    end: view.to_document(end),
                })
            })
            .collect();

        let nodes: Vec<Node> = order
            .iter()
            .filter_map(|id| graph.node(*id))
            .map(|n| n.clone_detached(0))
            .collect();

        let boxes = nodes
            .iter()
            .map(|n| (n.position, n.position + n.size()))
            .chain(frames.iter().map(|f| (f.frame.position(), f.frame.position() + f.frame.size())));
        let center = boxes
            .reduce(|(min, max), (lo, hi)| (min.min(lo), max.max(hi)))
            .map(|(min, max)| (min + max) * 0.5)
            .unwrap_or(Vec2::ZERO);

        Self {
            nodes,
            frames,
            edges,
            center,
        }
    }

    /// Build fresh items shifted by `offset` and push them as one paste
    fn materialize<O: TextureOperator>(&self, scene: &mut Scene<O>, offset: Vec2) -> Vec<ItemRef> {
        if self.is_empty() {
            return Vec::new();
        }
        let radius = scene.config().socket_hit_radius;
        let graph = &mut scene.graph;
        let view = *graph.view();

        let mut frames = Vec::with_capacity(self.frames.len());
        let mut member_of: HashMap<usize, usize> = HashMap::new();
        for copied in &self.frames {
            let id = graph.alloc_frame_id();
            let mut frame = copied.frame.clone_detached(id);
            frame.set_position(copied.frame.position() + offset);
            for index in &copied.members {
                member_of.insert(*index, id);
            }
            frames.push(frame);
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (index, copied) in self.nodes.iter().enumerate() {
            let mut node = copied.clone_detached(graph.alloc_node_id());
            node.position = copied.position + offset;
            node.set_attached_frame(member_of.get(&index).copied());
            node.update_socket_positions(&view);
            nodes.push(node);
        }

        let mut edges = Vec::new();
        let mut taken: HashSet<SocketAddr> = HashSet::new();
        let mut links: Vec<(NodeId, NodeId)> = Vec::new();
        for copied in &self.edges {
            let resolver = PasteResolver {
                graph: &*graph,
                pasted: &nodes,
                radius,
            };
            let start = resolver.resolve_socket_at(view.to_device(copied.start + offset), SocketDirection::Output);
            let end = resolver.resolve_socket_at(view.to_device(copied.end + offset), SocketDirection::Input);
            let (Some(start), Some(end)) = (start, end) else {
                debug!("Dropped pasted edge: endpoint is not on a socket");
                continue;
            };
            let occupied = taken.contains(&end) || graph.socket(end).is_some_and(|s| s.count_edge() > 0);
            if occupied {
                debug!("Dropped pasted edge: input {:?} already connected", end);
                continue;
            }
            if start.node == end.node || creates_cycle(graph, &links, start.node, end.node) {
                debug!("Dropped pasted edge: would create a cycle");
                continue;
            }
            taken.insert(end);
            links.push((start.node, end.node));
            edges.push(Edge::new(graph.alloc_edge_id(), start, end));
        }

        let command = PasteCommand::new(frames, nodes, edges);
        let items = command.items();
        debug!("Pasting {} items with offset {:?}", items.len(), offset);
        scene.push(Command::Paste(command));
        items
    }
}

/// Whether linking `start -> end` closes a cycle, counting both live edges
/// and links already planned for this paste
fn creates_cycle(graph: &NodeGraph, planned: &[(NodeId, NodeId)], start: NodeId, end: NodeId) -> bool {
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        if current == end {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        stack.extend(graph.upstream_nodes(current));
        stack.extend(planned.iter().filter(|(_, to)| *to == current).map(|(from, _)| *from));
    }
    false
}
