use super::{take_edge, take_frame, take_node};
use crate::editor::selection::Selection;
use crate::nodes::{Edge, EdgeId, Frame, FrameId, ItemRef, Node, NodeGraph, NodeId, SocketAddr};
use log::{debug, warn};
use std::collections::HashSet;

/// Removes items, optionally bridging the gap they leave in a chain
///
/// Edges touching a deleted node are deleted with it. With `save_connection`
/// each outgoing edge of a deleted node that leads outside the deletion is
/// replaced by an edge from the nearest surviving node upstream (found by
/// following input 0). Bridges are worked out on the first redo and reused.
#[derive(Debug)]
pub struct DeleteCommand {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    frames: Vec<FrameId>,
    save_connection: bool,
    prior_selection: Vec<ItemRef>,
    removed_nodes: Vec<Node>,
    removed_edges: Vec<Edge>,
    removed_frames: Vec<Frame>,
    /// `None` until the first redo
    bridges: Option<Vec<Edge>>,
    linked_bridges: Vec<EdgeId>,
}

impl DeleteCommand {
    pub fn new(graph: &NodeGraph, items: &[ItemRef], prior_selection: &[ItemRef], save_connection: bool) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut frames = Vec::new();
        for item in items {
            match *item {
                ItemRef::Node(id) if graph.node(id).is_some() && !nodes.contains(&id) => nodes.push(id),
                ItemRef::Edge(id) if graph.edge(id).is_some() && !edges.contains(&id) => edges.push(id),
                ItemRef::Frame(id) if graph.frame(id).is_some() && !frames.contains(&id) => frames.push(id),
                _ => {}
            }
        }
        for node in &nodes {
            for edge in graph.edges_of_node(*node) {
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }

        Self {
            nodes,
            edges,
            frames,
            save_connection,
            prior_selection: prior_selection.to_vec(),
            removed_nodes: Vec::new(),
            removed_edges: Vec::new(),
            removed_frames: Vec::new(),
            bridges: None,
            linked_bridges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Edges from surviving upstream nodes to surviving downstream inputs
    fn plan_bridges(&self, graph: &mut NodeGraph) -> Vec<Edge> {
        let deleted: HashSet<NodeId> = self.nodes.iter().copied().collect();
        let feeder = |graph: &NodeGraph, node: NodeId| -> Option<NodeId> {
            let edge = graph.input_edge(SocketAddr::input(node, 0))?;
            graph.edge(edge).map(|e| e.start_socket().node)
        };

        let mut plan = Vec::new();
        for &node in &self.nodes {
            let Some(outgoing) = graph.socket(SocketAddr::output(node, 0)).map(|s| s.edges().to_vec()) else {
                continue;
            };
            for edge in outgoing {
                let Some(end) = graph.edge(edge).map(|e| e.end_socket()) else {
                    continue;
                };
                if deleted.contains(&end.node) {
                    continue;
                }
                let mut upstream = feeder(&*graph, node);
                let mut seen = HashSet::new();
                while let Some(candidate) = upstream.filter(|n| deleted.contains(n)) {
                    if !seen.insert(candidate) {
                        upstream = None;
                        break;
                    }
                    upstream = feeder(&*graph, candidate);
                }
                let Some(upstream) = upstream else {
                    continue;
                };
                let start = SocketAddr::output(upstream, 0);
                if graph.socket(start).is_some() {
                    plan.push((start, end));
                }
            }
        }

        plan.into_iter()
            .map(|(start, end)| Edge::new(graph.alloc_edge_id(), start, end))
            .collect()
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        if self.save_connection && self.bridges.is_none() {
            let bridges = self.plan_bridges(graph);
            debug!("Delete keeps {} connection(s) alive", bridges.len());
            self.bridges = Some(bridges);
        }

        for id in &self.edges {
            if let Some(edge) = take_edge(graph, selection, *id) {
                self.removed_edges.push(edge);
            }
        }
        for id in &self.nodes {
            if let Some(node) = take_node(graph, selection, *id) {
                self.removed_nodes.push(node);
            }
        }
        for id in &self.frames {
            if let Some(frame) = take_frame(graph, selection, *id) {
                self.removed_frames.push(frame);
            }
        }

        if let Some(bridges) = self.bridges.as_mut() {
            for edge in bridges.drain(..) {
                let id = edge.id;
                match graph.link_edge(edge) {
                    Ok(id) => self.linked_bridges.push(id),
                    Err(err) => warn!("Could not bridge deleted nodes with edge {}: {}", id, err),
                }
            }
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        for id in self.linked_bridges.drain(..) {
            if let Some(edge) = take_edge(graph, selection, id) {
                if let Some(bridges) = self.bridges.as_mut() {
                    bridges.push(edge);
                }
            }
        }

        selection.clear(graph);
        for frame in self.removed_frames.drain(..) {
            graph.insert_frame(frame);
        }
        for node in self.removed_nodes.drain(..) {
            graph.insert_node(node);
        }
        for edge in self.removed_edges.drain(..) {
            let id = edge.id;
            if let Err(err) = graph.link_edge(edge) {
                debug_assert!(false, "edge {} could not be restored: {}", id, err);
                warn!("Edge {} could not be restored: {}", id, err);
            }
        }
        selection.replace(graph, &self.prior_selection);
    }
}
