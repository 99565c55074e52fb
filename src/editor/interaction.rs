//! Pointer interaction: press, drag and release of scene items, plus box
//! selection
//!
//! The manager only tracks gesture state and moves items live while the
//! pointer is down. What a finished gesture means for the history is
//! reported back as a [`Gesture`] for the scene to turn into commands.

use super::commands::FrameGeometry;
use super::selection::Selection;
use crate::nodes::{EdgeId, FrameId, ItemRef, NodeGraph, NodeId};
use glam::Vec2;

/// Outcome of releasing the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// No gesture was in progress
    None,
    /// Pressed and released without moving; `select` replaces the selection
    Click { select: Option<Vec<ItemRef>> },
    /// Items were dragged by `delta` (document units); `frames_before` holds
    /// the parent frames as they were when the drag started
    Moved {
        items: Vec<ItemRef>,
        delta: Vec2,
        target_frame: Option<FrameId>,
        splice_edge: Option<EdgeId>,
        frames_before: Vec<FrameGeometry>,
    },
}

/// Where the dragged items were before the first step
#[derive(Debug, Clone)]
struct DragOrigin {
    positions: Vec<(ItemRef, Vec2)>,
    frames: Vec<FrameGeometry>,
}

impl DragOrigin {
    fn capture(graph: &NodeGraph, items: &[ItemRef]) -> Self {
        let positions = items
            .iter()
            .filter_map(|item| {
                let position = match *item {
                    ItemRef::Node(id) => graph.node(id).map(|n| n.position),
                    ItemRef::Frame(id) => graph.frame(id).map(|f| f.position()),
                    ItemRef::Edge(_) => None,
                }?;
                Some((*item, position))
            })
            .collect();
        Self {
            positions,
            frames: FrameGeometry::affected_by(graph, items),
        }
    }

    /// Put every captured item and frame back
    fn restore(&self, graph: &mut NodeGraph) {
        let moved: Vec<NodeId> = self
            .positions
            .iter()
            .filter_map(|(item, _)| match item {
                ItemRef::Node(id) => Some(*id),
                _ => None,
            })
            .collect();
        for (item, position) in &self.positions {
            match *item {
                ItemRef::Node(id) => graph.set_node_position(id, *position),
                ItemRef::Frame(id) => {
                    if let Some(current) = graph.frame(id).map(|f| f.position()) {
                        graph.translate_frame(id, *position - current, &moved);
                    }
                }
                ItemRef::Edge(_) => {}
            }
        }
        for frame in &self.frames {
            graph.set_frame_geometry(frame.id, frame.position, frame.size);
        }
    }
}

#[derive(Debug, Clone)]
struct Drag {
    pressed: ItemRef,
    additive: bool,
    last_point: Vec2,
    delta: Vec2,
    /// Set on the first step that actually moves something
    origin: Option<DragOrigin>,
    splice_edge: Option<EdgeId>,
}

/// Tracks an in-progress pointer gesture
#[derive(Debug, Clone, Default)]
pub struct InteractionManager {
    drag: Option<Drag>,
    box_selection_start: Option<Vec2>,
    box_selection_end: Option<Vec2>,
}

impl InteractionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Edge currently highlighted as a splice target
    pub fn splice_candidate(&self) -> Option<EdgeId> {
        self.drag.as_ref().and_then(|d| d.splice_edge)
    }

    /// Start a press on an item and return the selection it asks for, if any
    ///
    /// A plain press on an unselected item selects only that item; pressing an
    /// already selected item keeps the selection so the group can be dragged.
    /// An additive press toggles the item.
    pub fn press(
        &mut self,
        item: ItemRef,
        device_point: Vec2,
        additive: bool,
        selection: &Selection,
    ) -> Option<Vec<ItemRef>> {
        self.drag = Some(Drag {
            pressed: item,
            additive,
            last_point: device_point,
            delta: Vec2::ZERO,
            origin: None,
            splice_edge: None,
        });

        if additive {
            let mut items = selection.items().to_vec();
            if selection.contains(item) {
                items.retain(|i| *i != item);
            } else {
                items.push(item);
            }
            Some(items)
        } else if selection.contains(item) {
            None
        } else {
            Some(vec![item])
        }
    }

    /// Move the selected nodes and frames with the pointer
    pub fn drag_to(&mut self, graph: &mut NodeGraph, selection: &Selection, device_point: Vec2) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let scale = graph.view().scale;
        let step = (device_point - drag.last_point) / scale;
        drag.last_point = device_point;
        if step == Vec2::ZERO {
            return;
        }
        drag.delta += step;

        let items = movable_items(selection);
        if drag.origin.is_none() {
            drag.origin = Some(DragOrigin::capture(graph, &items));
        }
        move_live(graph, &items, step);

        let candidate = splice_target(graph, selection);
        if candidate != drag.splice_edge {
            if let Some(old) = drag.splice_edge {
                graph.set_item_selected(ItemRef::Edge(old), selection.contains(ItemRef::Edge(old)));
            }
            if let Some(new) = candidate {
                graph.set_item_selected(ItemRef::Edge(new), true);
            }
            drag.splice_edge = candidate;
        }
    }

    /// Finish the gesture
    pub fn release(&mut self, graph: &mut NodeGraph, selection: &Selection) -> Gesture {
        let Some(drag) = self.drag.take() else {
            return Gesture::None;
        };
        if let Some(edge) = drag.splice_edge {
            graph.set_item_selected(ItemRef::Edge(edge), selection.contains(ItemRef::Edge(edge)));
        }

        let Some(origin) = drag.origin else {
            let collapse = !drag.additive && selection.len() > 1 && selection.contains(drag.pressed);
            return Gesture::Click {
                select: collapse.then(|| vec![drag.pressed]),
            };
        };

        let items = movable_items(selection);
        let target_frame = match drag.pressed {
            ItemRef::Node(id) => drop_frame(graph, &items, id),
            _ => None,
        };
        Gesture::Moved {
            items,
            delta: drag.delta,
            target_frame,
            splice_edge: drag.splice_edge,
            frames_before: origin.frames,
        }
    }

    /// Abandon the gesture and put dragged items back where they started
    pub fn cancel(&mut self, graph: &mut NodeGraph, selection: &Selection) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if let Some(edge) = drag.splice_edge {
            graph.set_item_selected(ItemRef::Edge(edge), selection.contains(ItemRef::Edge(edge)));
        }
        if let Some(origin) = drag.origin {
            origin.restore(graph);
        }
    }

    /// Start box selection at a device point
    pub fn start_box_selection(&mut self, start: Vec2) {
        self.box_selection_start = Some(start);
        self.box_selection_end = Some(start);
    }

    pub fn update_box_selection(&mut self, end: Vec2) {
        self.box_selection_end = Some(end);
    }

    /// Nodes touched by the current box, for highlighting while dragging
    pub fn box_selection_preview(&self, graph: &NodeGraph) -> Vec<NodeId> {
        let Some((min, max)) = self.box_bounds(graph) else {
            return Vec::new();
        };
        nodes_in_box(graph, min, max)
    }

    /// Finish box selection and return the items it covers
    ///
    /// Nodes and frames are picked in document space; edges by sampling
    /// their curves in device space.
    pub fn complete_box_selection(
        &mut self,
        graph: &NodeGraph,
        selection: &Selection,
        additive: bool,
    ) -> Vec<ItemRef> {
        let bounds = self.box_bounds(graph);
        let device = match (self.box_selection_start.take(), self.box_selection_end.take()) {
            (Some(start), Some(end)) => Some((start.min(end), start.max(end))),
            _ => None,
        };
        let mut items = if additive {
            selection.items().to_vec()
        } else {
            Vec::new()
        };
        let (Some((min, max)), Some((device_min, device_max))) = (bounds, device) else {
            return items;
        };

        let mut push = |item: ItemRef| {
            if !items.contains(&item) {
                items.push(item);
            }
        };
        for id in nodes_in_box(graph, min, max) {
            push(ItemRef::Node(id));
        }
        for frame in graph.frames().values() {
            let (lo, hi) = (frame.position(), frame.position() + frame.size());
            if lo.cmple(max).all() && hi.cmpge(min).all() {
                push(ItemRef::Frame(frame.id));
            }
        }
        for edge in graph.edges().values() {
            if edge.intersect_with(device_min, device_max - device_min) {
                push(ItemRef::Edge(edge.id));
            }
        }
        items
    }

    /// Box corners in document space
    fn box_bounds(&self, graph: &NodeGraph) -> Option<(Vec2, Vec2)> {
        let (start, end) = (self.box_selection_start?, self.box_selection_end?);
        let view = graph.view();
        let (a, b) = (view.to_document(start), view.to_document(end));
        Some((a.min(b), a.max(b)))
    }
}

fn nodes_in_box(graph: &NodeGraph, min: Vec2, max: Vec2) -> Vec<NodeId> {
    graph
        .nodes()
        .values()
        .filter(|n| {
            let (lo, hi) = (n.position, n.position + n.size());
            lo.cmple(max).all() && hi.cmpge(min).all()
        })
        .map(|n| n.id)
        .collect()
}

/// Selected nodes and frames; edges follow their sockets
pub(crate) fn movable_items(selection: &Selection) -> Vec<ItemRef> {
    selection
        .items()
        .iter()
        .copied()
        .filter(|i| !matches!(i, ItemRef::Edge(_)))
        .collect()
}

/// Move items without recording history
///
/// Frames take their unlisted members along; listed nodes move once.
pub(crate) fn move_live(graph: &mut NodeGraph, items: &[ItemRef], delta: Vec2) {
    let moved: Vec<NodeId> = items
        .iter()
        .filter_map(|i| match i {
            ItemRef::Node(id) => Some(*id),
            _ => None,
        })
        .collect();
    for item in items {
        match *item {
            ItemRef::Node(id) => {
                if let Some(position) = graph.node(id).map(|n| n.position) {
                    graph.set_node_position(id, position + delta);
                }
            }
            ItemRef::Frame(id) => graph.translate_frame(id, delta, &moved),
            ItemRef::Edge(_) => {}
        }
    }
}

/// Edge to splice into: only a lone, unconnected node with both an input and
/// an output qualifies
fn splice_target(graph: &NodeGraph, selection: &Selection) -> Option<EdgeId> {
    let [ItemRef::Node(id)] = selection.items() else {
        return None;
    };
    let node = graph.node(*id)?;
    if node.has_edges() || node.inputs().is_empty() || node.outputs().is_empty() {
        return None;
    }
    graph.edge_under_node(*id)
}

/// Frame under the dropped node's header, unless the node is already framed
/// or the frame is itself being moved
fn drop_frame(graph: &NodeGraph, items: &[ItemRef], node: NodeId) -> Option<FrameId> {
    let node = graph.node(node)?;
    if node.attached_frame().is_some() {
        return None;
    }
    graph
        .frame_at(node.header_point())
        .filter(|f| !items.contains(&ItemRef::Frame(*f)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{NodeFactory, NodeTypeId};
    use crate::EditorConfig;

    #[test]
    fn test_press_on_selected_item_keeps_group() {
        let mut manager = InteractionManager::new();
        let mut graph = NodeGraph::new();
        let mut selection = Selection::new();
        let frame = graph.alloc_frame_id();
        graph.insert_frame(crate::nodes::Frame::new(frame, Vec2::ZERO));
        selection.add(&mut graph, ItemRef::Frame(frame));

        assert_eq!(manager.press(ItemRef::Frame(frame), Vec2::ZERO, false, &selection), None);
        assert_eq!(
            manager.press(ItemRef::Frame(frame), Vec2::ZERO, true, &selection),
            Some(Vec::new())
        );
        assert_eq!(
            manager.press(ItemRef::Node(3), Vec2::ZERO, false, &selection),
            Some(vec![ItemRef::Node(3)])
        );
    }

    #[test]
    fn test_box_preview_follows_the_box() {
        let factory = NodeFactory::new(&EditorConfig::default());
        let mut graph = NodeGraph::new();
        for x in [0.0, 500.0] {
            let id = graph.alloc_node_id();
            graph.insert_node(factory.create(id, NodeTypeId::Color, Vec2::new(x, 0.0)));
        }
        let mut manager = InteractionManager::new();
        assert!(manager.box_selection_preview(&graph).is_empty());

        manager.start_box_selection(Vec2::new(-10.0, -10.0));
        manager.update_box_selection(Vec2::new(50.0, 50.0));
        assert_eq!(manager.box_selection_preview(&graph), vec![0]);
        manager.update_box_selection(Vec2::new(600.0, 50.0));
        assert_eq!(manager.box_selection_preview(&graph), vec![0, 1]);

        manager.complete_box_selection(&graph, &Selection::new(), false);
        assert!(manager.box_selection_preview(&graph).is_empty());
    }

    #[test]
    fn test_release_without_motion_is_a_click() {
        let mut manager = InteractionManager::new();
        let mut graph = NodeGraph::new();
        let selection = Selection::new();
        manager.press(ItemRef::Node(0), Vec2::ONE, false, &selection);
        manager.drag_to(&mut graph, &selection, Vec2::ONE);
        assert_eq!(manager.release(&mut graph, &selection), Gesture::Click { select: None });
        assert_eq!(manager.release(&mut graph, &selection), Gesture::None);
    }
}
