use crate::nodes::{FrameId, NodeGraph, NodeId};
use glam::Vec2;

/// Takes nodes out of whatever frame holds them
///
/// Frame geometry is left alone both ways.
#[derive(Debug)]
pub struct DetachFromFrameCommand {
    members: Vec<(NodeId, FrameId)>,
}

impl DetachFromFrameCommand {
    pub fn new(graph: &NodeGraph, nodes: &[NodeId]) -> Self {
        let members = nodes
            .iter()
            .filter_map(|id| graph.node(*id)?.attached_frame().map(|f| (*id, f)))
            .collect();
        Self { members }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        for (node, frame) in &self.members {
            graph.frame_remove_node(*frame, *node);
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph) {
        for (node, frame) in &self.members {
            graph.frame_attach_nodes(*frame, &[*node]);
        }
    }
}

/// Moves and resizes a frame by offsets; consecutive resizes of the same
/// frame merge into one history entry
#[derive(Debug)]
pub struct ResizeFrameCommand {
    frame: FrameId,
    offset_position: Vec2,
    offset_size: Vec2,
}

impl ResizeFrameCommand {
    pub fn new(frame: FrameId, offset_position: Vec2, offset_size: Vec2) -> Self {
        Self {
            frame,
            offset_position,
            offset_size,
        }
    }

    pub fn offsets(&self) -> (Vec2, Vec2) {
        (self.offset_position, self.offset_size)
    }

    pub(super) fn merge_with(&mut self, other: &ResizeFrameCommand) -> bool {
        if other.frame != self.frame {
            return false;
        }
        self.offset_position += other.offset_position;
        self.offset_size += other.offset_size;
        true
    }

    fn shift(&self, graph: &mut NodeGraph, sign: f32) {
        let Some(frame) = graph.frame(self.frame) else {
            return;
        };
        let position = frame.position() + self.offset_position * sign;
        let size = frame.size() + self.offset_size * sign;
        graph.set_frame_geometry(self.frame, position, size);
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        self.shift(graph, 1.0);
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph) {
        self.shift(graph, -1.0);
    }
}
