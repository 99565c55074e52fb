//! Ordered, mixed-type selection list

use crate::nodes::{EdgeId, FrameId, ItemRef, NodeGraph, NodeId};

/// Selected items in the order they were selected
///
/// Adding or removing an item also updates the item's own `selected` flag,
/// so the two never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    items: Vec<ItemRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemRef) -> bool {
        self.items.contains(&item)
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ItemRef::Node(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn edges(&self) -> Vec<EdgeId> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ItemRef::Edge(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn frames(&self) -> Vec<FrameId> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ItemRef::Frame(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Appends a live item; items already selected keep their place
    pub fn add(&mut self, graph: &mut NodeGraph, item: ItemRef) {
        if !graph.contains(item) {
            return;
        }
        graph.set_item_selected(item, true);
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn remove(&mut self, graph: &mut NodeGraph, item: ItemRef) {
        graph.set_item_selected(item, false);
        self.items.retain(|i| *i != item);
    }

    /// Drops an item that has left the graph
    pub fn forget(&mut self, item: ItemRef) {
        self.items.retain(|i| *i != item);
    }

    pub fn clear(&mut self, graph: &mut NodeGraph) {
        for item in self.items.drain(..) {
            graph.set_item_selected(item, false);
        }
    }

    /// Replaces the selection, skipping items that are not live
    pub fn replace(&mut self, graph: &mut NodeGraph, items: &[ItemRef]) {
        self.clear(graph);
        for item in items {
            self.add(graph, *item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Bpc, Frame, Node, NodeParams, NodeTypeId};
    use glam::{UVec2, Vec2};

    #[test]
    fn test_flags_follow_selection() {
        let mut graph = NodeGraph::new();
        let id = graph.alloc_node_id();
        graph.insert_node(Node::new(
            id,
            NodeParams::default_for(NodeTypeId::Noise),
            UVec2::splat(32),
            Bpc::Rgba8,
        ));
        let frame = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(frame, Vec2::ZERO));

        let mut selection = Selection::new();
        selection.add(&mut graph, ItemRef::Frame(frame));
        selection.add(&mut graph, ItemRef::Node(id));
        selection.add(&mut graph, ItemRef::Frame(frame));
        assert_eq!(selection.items(), &[ItemRef::Frame(frame), ItemRef::Node(id)]);
        assert!(graph.node(id).unwrap().selected());

        selection.clear(&mut graph);
        assert!(selection.is_empty());
        assert!(!graph.node(id).unwrap().selected());
        assert!(!graph.frame(frame).unwrap().selected());
    }

    #[test]
    fn test_dead_items_are_not_selected() {
        let mut graph = NodeGraph::new();
        let mut selection = Selection::new();
        selection.replace(&mut graph, &[ItemRef::Node(4), ItemRef::Edge(1)]);
        assert!(selection.is_empty());
    }
}
