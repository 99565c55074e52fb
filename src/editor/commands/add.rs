use super::{take_edge, take_frame, take_node};
use crate::editor::selection::Selection;
use crate::nodes::{Edge, EdgeId, Frame, FrameId, NodeGraph, NodeId, Node, TextureHandle};
use log::warn;

/// Inserts a node
#[derive(Debug)]
pub struct AddNodeCommand {
    id: NodeId,
    title: &'static str,
    /// The node while it is not in the graph
    node: Option<Node>,
}

impl AddNodeCommand {
    pub fn new(node: Node) -> Self {
        Self {
            id: node.id,
            title: node.title(),
            node: Some(node),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        if let Some(mut node) = self.node.take() {
            node.mark_dirty();
            graph.insert_node(node);
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        self.node = take_node(graph, selection, self.id);
    }
}

/// Connects an output socket to a free input socket
#[derive(Debug)]
pub struct AddEdgeCommand {
    id: EdgeId,
    edge: Option<Edge>,
    /// Value the end socket held before the edge arrived
    previous_end_value: TextureHandle,
}

impl AddEdgeCommand {
    pub fn new(edge: Edge) -> Self {
        Self {
            id: edge.id,
            edge: Some(edge),
            previous_end_value: TextureHandle::EMPTY,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        let Some(edge) = self.edge.take() else {
            return;
        };
        let end = edge.end_socket();
        self.previous_end_value = graph.socket(end).map(|s| s.value()).unwrap_or_default();
        if let Err(err) = graph.link_edge(edge) {
            debug_assert!(false, "edge {} could not be linked: {}", self.id, err);
            warn!("Edge {} could not be linked: {}", self.id, err);
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        let Some(edge) = take_edge(graph, selection, self.id) else {
            return;
        };
        let end = edge.end_socket();
        if let Some(socket) = graph.socket_mut(end) {
            socket.set_value(self.previous_end_value);
        }
        if let Some(node) = graph.node_mut(end.node) {
            node.mark_dirty();
        }
        self.edge = Some(edge);
    }
}

/// Creates a frame around some nodes, taking them out of their old frames
#[derive(Debug)]
pub struct AddFrameCommand {
    id: FrameId,
    frame: Option<Frame>,
    /// Each member with the frame it came from
    members: Vec<(NodeId, Option<FrameId>)>,
}

impl AddFrameCommand {
    pub fn new(graph: &NodeGraph, frame: Frame, nodes: &[NodeId]) -> Self {
        let members = nodes
            .iter()
            .filter_map(|id| graph.node(*id).map(|n| (*id, n.attached_frame())))
            .collect();
        Self {
            id: frame.id,
            frame: Some(frame),
            members,
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        graph.insert_frame(frame);
        let mut nodes = Vec::with_capacity(self.members.len());
        for (node, previous) in &self.members {
            if let Some(previous) = previous {
                graph.frame_remove_node(*previous, *node);
            }
            nodes.push(*node);
        }
        graph.frame_add_nodes(self.id, &nodes);
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        for (node, _) in &self.members {
            graph.frame_remove_node(self.id, *node);
        }
        self.frame = take_frame(graph, selection, self.id);
        for (node, previous) in &self.members {
            if let Some(previous) = previous {
                graph.frame_attach_nodes(*previous, &[*node]);
            }
        }
    }
}
