use crate::nodes::{EdgeId, NodeGraph, SocketAddr};
use log::warn;

/// Moves the end of an edge to another input socket
#[derive(Debug)]
pub struct MoveEdgeCommand {
    edge: EdgeId,
    old_end: SocketAddr,
    new_end: SocketAddr,
}

impl MoveEdgeCommand {
    pub fn new(edge: EdgeId, old_end: SocketAddr, new_end: SocketAddr) -> Self {
        Self { edge, old_end, new_end }
    }

    fn reconnect(&self, graph: &mut NodeGraph, end: SocketAddr) {
        if let Err(err) = graph.reconnect_end(self.edge, end) {
            debug_assert!(false, "edge {} could not be moved: {}", self.edge, err);
            warn!("Edge {} could not be moved: {}", self.edge, err);
        }
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        self.reconnect(graph, self.new_end);
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph) {
        self.reconnect(graph, self.old_end);
    }
}
