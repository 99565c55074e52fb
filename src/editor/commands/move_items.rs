use crate::nodes::{Edge, EdgeId, FrameId, ItemRef, NodeGraph, NodeId, SocketAddr};
use glam::Vec2;
use log::warn;

/// Position and size of a frame at some moment of a move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub id: FrameId,
    pub position: Vec2,
    pub size: Vec2,
}

impl FrameGeometry {
    pub fn capture(graph: &NodeGraph, id: FrameId) -> Option<Self> {
        graph.frame(id).map(|f| Self {
            id,
            position: f.position(),
            size: f.size(),
        })
    }

    /// Frames a move of `items` refits: parents of moved nodes that are not
    /// moving themselves
    pub fn affected_by(graph: &NodeGraph, items: &[ItemRef]) -> Vec<Self> {
        let mut ids: Vec<FrameId> = Vec::new();
        for item in items {
            let ItemRef::Node(node) = item else { continue };
            let Some(frame) = graph.node(*node).and_then(|n| n.attached_frame()) else {
                continue;
            };
            if !items.contains(&ItemRef::Frame(frame)) && !ids.contains(&frame) {
                ids.push(frame);
            }
        }
        ids.into_iter().filter_map(|id| Self::capture(graph, id)).collect()
    }

    fn apply(&self, graph: &mut NodeGraph) {
        graph.set_frame_geometry(self.id, self.position, self.size);
    }
}

/// A dropped node spliced into an edge it was released over
#[derive(Debug)]
struct Splice {
    edge: EdgeId,
    old_end: SocketAddr,
    /// Edge from the node to the old end; detached while undone
    new_edge: Option<Edge>,
    new_edge_id: Option<EdgeId>,
}

/// Moves nodes and frames by a common offset
///
/// The items are usually already at their destination (moved live while
/// dragging), so the first redo only re-applies the same positions. It can
/// also drop unframed nodes into a frame and splice a single node into an
/// edge.
///
/// Parent frames given through [`MoveCommand::with_frames_before`] get their
/// exact earlier geometry back on undo; any others are refitted to content.
#[derive(Debug)]
pub struct MoveCommand {
    items: Vec<ItemRef>,
    new_positions: Vec<Vec2>,
    delta: Vec2,
    target: Option<FrameGeometry>,
    frames_before: Vec<FrameGeometry>,
    frames_after: Vec<FrameGeometry>,
    /// Nodes the last redo put into the target frame
    framed: Vec<NodeId>,
    splice: Option<Splice>,
}

impl MoveCommand {
    pub fn new(
        graph: &NodeGraph,
        items: &[ItemRef],
        delta: Vec2,
        target_frame: Option<FrameId>,
        splice_edge: Option<EdgeId>,
    ) -> Self {
        let mut kept = Vec::new();
        let mut new_positions = Vec::new();
        for item in items {
            let position = match *item {
                ItemRef::Node(id) => graph.node(id).map(|n| n.position),
                ItemRef::Frame(id) => graph.frame(id).map(|f| f.position()),
                ItemRef::Edge(_) => None,
            };
            if let Some(position) = position {
                kept.push(*item);
                new_positions.push(position);
            }
        }

        let target = target_frame.and_then(|id| FrameGeometry::capture(graph, id));
        let splice = splice_edge.and_then(|edge| {
            graph.edge(edge).map(|e| Splice {
                edge,
                old_end: e.end_socket(),
                new_edge: None,
                new_edge_id: None,
            })
        });

        Self {
            items: kept,
            new_positions,
            delta,
            target,
            frames_before: Vec::new(),
            frames_after: Vec::new(),
            framed: Vec::new(),
            splice,
        }
    }

    /// Attach parent frame geometry captured before the items moved
    pub fn with_frames_before(mut self, graph: &NodeGraph, frames: Vec<FrameGeometry>) -> Self {
        self.frames_after = frames
            .iter()
            .filter_map(|f| FrameGeometry::capture(graph, f.id))
            .collect();
        self.frames_before = frames;
        self
    }

    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    fn moved_nodes(&self) -> Vec<NodeId> {
        self.items
            .iter()
            .filter_map(|i| match i {
                ItemRef::Node(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        let moved = self.moved_nodes();
        let mut to_frame = Vec::new();
        for (item, position) in self.items.iter().zip(&self.new_positions) {
            match *item {
                ItemRef::Node(id) => {
                    graph.set_node_position(id, *position);
                    let unframed = graph.node(id).is_some_and(|n| n.attached_frame().is_none());
                    if self.target.is_some() && unframed {
                        to_frame.push(id);
                    }
                }
                ItemRef::Frame(id) => {
                    if let Some(current) = graph.frame(id).map(|f| f.position()) {
                        graph.translate_frame(id, *position - current, &moved);
                    }
                }
                ItemRef::Edge(_) => {}
            }
        }
        for frame in &self.frames_after {
            frame.apply(graph);
        }

        if let Some(target) = self.target {
            graph.frame_add_nodes(target.id, &to_frame);
        }
        self.framed = to_frame;

        if let (Some(splice), Some(node)) = (self.splice.as_mut(), moved.first().copied()) {
            if let Err(err) = graph.reconnect_end(splice.edge, SocketAddr::input(node, 0)) {
                warn!("Could not splice node {} into edge {}: {}", node, splice.edge, err);
                return;
            }
            let edge = match splice.new_edge.take() {
                Some(edge) => edge,
                None => Edge::new(graph.alloc_edge_id(), SocketAddr::output(node, 0), splice.old_end),
            };
            match graph.link_edge(edge) {
                Ok(id) => splice.new_edge_id = Some(id),
                Err(err) => warn!("Could not link spliced edge: {}", err),
            }
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph) {
        if let Some(splice) = self.splice.as_mut() {
            if let Some(id) = splice.new_edge_id.take() {
                splice.new_edge = graph.unlink_edge(id);
            }
            if let Err(err) = graph.reconnect_end(splice.edge, splice.old_end) {
                warn!("Could not restore edge {}: {}", splice.edge, err);
            }
        }

        let moved = self.moved_nodes();
        if let Some(target) = self.target {
            for id in self.framed.drain(..) {
                graph.frame_remove_node(target.id, id);
            }
        }
        for (item, position) in self.items.iter().zip(&self.new_positions) {
            match *item {
                ItemRef::Node(id) => {
                    graph.set_node_position(id, *position - self.delta);
                }
                ItemRef::Frame(id) => graph.translate_frame(id, -self.delta, &moved),
                ItemRef::Edge(_) => {}
            }
        }
        for frame in &self.frames_before {
            frame.apply(graph);
        }

        if let Some(target) = self.target {
            target.apply(graph);
        }
    }
}
