use super::{take_edge, take_frame, take_node};
use crate::editor::selection::Selection;
use crate::nodes::{Edge, EdgeId, Frame, FrameId, ItemRef, Node, NodeGraph, NodeId};
use log::warn;

/// Swaps the selection list
#[derive(Debug)]
pub struct SelectCommand {
    new: Vec<ItemRef>,
    old: Vec<ItemRef>,
}

impl SelectCommand {
    pub fn new(new: Vec<ItemRef>, old: Vec<ItemRef>) -> Self {
        Self { new, old }
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        selection.replace(graph, &self.new);
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        selection.replace(graph, &self.old);
    }
}

/// Inserts copied items and selects the pasted nodes and frames
///
/// Nodes reference pasted frames through their frame back-reference, so
/// frames go in first.
#[derive(Debug)]
pub struct PasteCommand {
    node_ids: Vec<NodeId>,
    edge_ids: Vec<EdgeId>,
    frame_ids: Vec<FrameId>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    frames: Vec<Frame>,
}

impl PasteCommand {
    pub fn new(frames: Vec<Frame>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            node_ids: nodes.iter().map(|n| n.id).collect(),
            edge_ids: edges.iter().map(|e| e.id).collect(),
            frame_ids: frames.iter().map(|f| f.id).collect(),
            nodes,
            edges,
            frames,
        }
    }

    /// Pasted nodes and frames, in selection order
    pub fn items(&self) -> Vec<ItemRef> {
        self.node_ids
            .iter()
            .map(|id| ItemRef::Node(*id))
            .chain(self.frame_ids.iter().map(|id| ItemRef::Frame(*id)))
            .collect()
    }

    pub fn edge_ids(&self) -> &[EdgeId] {
        &self.edge_ids
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        selection.clear(graph);
        for frame in self.frames.drain(..) {
            graph.insert_frame(frame);
        }
        for mut node in self.nodes.drain(..) {
            node.mark_dirty();
            graph.insert_node(node);
        }
        for edge in self.edges.drain(..) {
            let id = edge.id;
            if let Err(err) = graph.link_edge(edge) {
                warn!("Pasted edge {} dropped: {}", id, err);
            }
        }
        let items = self.items();
        for item in items {
            selection.add(graph, item);
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        for id in &self.edge_ids {
            if let Some(edge) = take_edge(graph, selection, *id) {
                self.edges.push(edge);
            }
        }
        for id in &self.node_ids {
            if let Some(node) = take_node(graph, selection, *id) {
                self.nodes.push(node);
            }
        }
        for id in &self.frame_ids {
            if let Some(frame) = take_frame(graph, selection, *id) {
                self.frames.push(frame);
            }
        }
        selection.clear(graph);
    }
}
