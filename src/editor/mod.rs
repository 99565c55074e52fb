//! Scene editing: the scene, its command history, clipboard, pointer
//! interaction and file handling

pub mod clipboard;
pub mod commands;
pub mod file_manager;
pub mod interaction;
pub mod selection;
pub mod viewport;

pub use clipboard::{Clipboard, SocketResolver};
pub use commands::{Command, CommandStack};
pub use file_manager::{FileManager, SceneDocument};
pub use interaction::{Gesture, InteractionManager};
pub use selection::Selection;
pub use viewport::ViewTransform;

use crate::config::EditorConfig;
use crate::error::{GraphError, Result};
use crate::nodes::{
    Edge, EdgeId, ExecutionEngine, ExecutionStats, Frame, FrameId, ItemRef, Node, NodeFactory,
    NodeGraph, NodeId, NodeTypeId, Property, PropertyValue, SocketAddr, SocketDirection,
    SocketId, TextureOperator,
};
use commands::{
    AddEdgeCommand, AddFrameCommand, AddNodeCommand, ChangeTitleCommand, DeleteCommand,
    DetachFromFrameCommand, FrameGeometry, MoveCommand, MoveEdgeCommand, PropertyChangeCommand,
    ResizeFrameCommand, SelectCommand,
};
use glam::Vec2;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Owns a texture graph and every way of editing it
///
/// All edits go through undoable commands. After each command (and each undo
/// or redo) the scene re-evaluates whatever became dirty, so outputs are
/// always consistent with inputs once a call returns.
pub struct Scene<O: TextureOperator> {
    graph: NodeGraph,
    selection: Selection,
    history: CommandStack,
    engine: ExecutionEngine,
    operator: O,
    factory: NodeFactory,
    interaction: InteractionManager,
    config: EditorConfig,
}

impl<O: TextureOperator> Scene<O> {
    pub fn new(config: EditorConfig, operator: O) -> Self {
        Self {
            graph: NodeGraph::new(),
            selection: Selection::new(),
            history: CommandStack::new(config.undo_limit),
            engine: ExecutionEngine::new(),
            operator,
            factory: NodeFactory::new(&config),
            interaction: InteractionManager::new(),
            config,
        }
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Selected items, in selection order
    pub fn selection(&self) -> &[ItemRef] {
        self.selection.items()
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn operator_mut(&mut self) -> &mut O {
        &mut self.operator
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn factory(&self) -> &NodeFactory {
        &self.factory
    }

    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    // ---- history ----

    /// Apply a command, record it and re-evaluate
    pub fn push(&mut self, command: Command) {
        self.history.push(command, &mut self.graph, &mut self.selection);
        self.evaluate();
    }

    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.graph, &mut self.selection);
        if done {
            self.evaluate();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.graph, &mut self.selection);
        if done {
            self.evaluate();
        }
        done
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Run every dirty node and its downstream closure
    pub fn evaluate(&mut self) -> ExecutionStats {
        self.engine.evaluate(&mut self.graph, &mut self.operator).clone()
    }

    // ---- view ----

    pub fn view(&self) -> &ViewTransform {
        self.graph.view()
    }

    /// Install a view, clamping its scale to the configured range
    ///
    /// A non-finite scale falls back to 1 and a non-finite pan to zero.
    pub fn set_view(&mut self, mut view: ViewTransform) {
        if !view.scale.is_finite() {
            warn!("Replacing non-finite view scale {}", view.scale);
            view.scale = 1.0;
        }
        if !view.pan.is_finite() {
            warn!("Replacing non-finite view pan {:?}", view.pan);
            view.pan = Vec2::ZERO;
        }
        view.scale = self.config.clamp_scale(view.scale);
        self.graph.set_view(view);
    }

    /// Zoom by `factor` keeping a device point fixed
    pub fn zoom_at(&mut self, device_point: Vec2, factor: f32) {
        let mut view = *self.graph.view();
        view.zoom_at(device_point, factor, self.config.min_view_scale, self.config.max_view_scale);
        self.graph.set_view(view);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        let mut view = *self.graph.view();
        view.pan_by(delta);
        self.graph.set_view(view);
    }

    pub fn to_document(&self, device_point: Vec2) -> Vec2 {
        self.graph.view().to_document(device_point)
    }

    pub fn to_device(&self, doc_point: Vec2) -> Vec2 {
        self.graph.view().to_device(doc_point)
    }

    // ---- direct selection edits (not recorded) ----

    pub fn add_selected(&mut self, item: ItemRef) {
        self.selection.add(&mut self.graph, item);
    }

    pub fn delete_selected(&mut self, item: ItemRef) {
        self.selection.remove(&mut self.graph, item);
    }

    pub fn clear_selected(&mut self) {
        self.selection.clear(&mut self.graph);
    }

    // ---- hit testing ----

    /// Topmost frame under a device point
    pub fn frame_at(&self, device_point: Vec2) -> Option<FrameId> {
        self.graph.frame_at(self.to_document(device_point))
    }

    /// Topmost node under a device point
    pub fn node_at(&self, device_point: Vec2) -> Option<NodeId> {
        let doc = self.to_document(device_point);
        self.graph
            .nodes()
            .values()
            .rev()
            .find(|n| n.contains(doc))
            .map(|n| n.id)
    }

    /// Visible socket of a direction under a device point
    pub fn socket_at(&self, device_point: Vec2, direction: SocketDirection) -> Option<SocketAddr> {
        self.graph.socket_at(
            device_point,
            self.config.socket_hit_radius,
            direction,
            self.graph.nodes().keys().copied(),
        )
    }

    // ---- user operations ----

    /// Add a node of a kind at a document position
    pub fn create_node(&mut self, type_id: NodeTypeId, position: Vec2) -> NodeId {
        let id = self.graph.alloc_node_id();
        let node = self.factory.create(id, type_id, position);
        self.push(Command::AddNode(AddNodeCommand::new(node)));
        id
    }

    /// Connect two sockets, in either order
    ///
    /// An edge already on the input is replaced within the same undo step.
    pub fn connect(&mut self, from: SocketAddr, to: SocketAddr) -> Result<EdgeId> {
        let (start, end) = match (from.direction(), to.direction()) {
            (SocketDirection::Output, SocketDirection::Input) => (from, to),
            (SocketDirection::Input, SocketDirection::Output) => (to, from),
            _ => {
                warn!("Rejected connection {:?} -> {:?}: same direction", from, to);
                return Err(GraphError::DirectionMismatch);
            }
        };
        for addr in [start, end] {
            if self.graph.socket(addr).is_none() {
                return Err(GraphError::MissingSocket(addr));
            }
        }
        if start.node == end.node {
            warn!("Rejected connection of node {} to itself", start.node);
            return Err(GraphError::SelfConnection);
        }
        if let Some(existing) = self.graph.find_edge(start, end) {
            return Ok(existing);
        }
        if self.graph.would_create_cycle(start.node, end.node) {
            warn!("Rejected connection {} -> {}: cycle", start.node, end.node);
            return Err(GraphError::CycleDetected);
        }

        let id = self.graph.alloc_edge_id();
        let add = Command::AddEdge(AddEdgeCommand::new(Edge::new(id, start, end)));
        let command = match self.graph.input_edge(end) {
            Some(old) => {
                let prior = self.selection.items().to_vec();
                let delete = DeleteCommand::new(&self.graph, &[ItemRef::Edge(old)], &prior, false);
                Command::Macro {
                    text: "Replace Edge".to_string(),
                    commands: vec![Command::Delete(delete), add],
                }
            }
            None => add,
        };
        self.push(command);
        Ok(id)
    }

    /// Move an edge's end to another input socket
    pub fn reroute_edge(&mut self, edge: EdgeId, new_end: SocketAddr) -> Result<()> {
        let (start, old_end) = self
            .graph
            .edge(edge)
            .map(|e| (e.start_socket(), e.end_socket()))
            .ok_or(GraphError::MissingEdge(edge))?;
        if new_end == old_end {
            return Ok(());
        }
        if new_end.direction() != SocketDirection::Input {
            return Err(GraphError::DirectionMismatch);
        }
        let occupied = self
            .graph
            .socket(new_end)
            .ok_or(GraphError::MissingSocket(new_end))?
            .count_edge()
            > 0;
        if occupied {
            return Err(GraphError::InputOccupied(new_end));
        }
        if start.node == new_end.node {
            return Err(GraphError::SelfConnection);
        }
        if self.graph.would_create_cycle(start.node, new_end.node) {
            warn!("Rejected rerouting edge {}: cycle", edge);
            return Err(GraphError::CycleDetected);
        }
        self.push(Command::MoveEdge(MoveEdgeCommand::new(edge, old_end, new_end)));
        Ok(())
    }

    /// Add a frame around the selected nodes, or an empty one at `position`
    pub fn create_frame(&mut self, position: Vec2) -> FrameId {
        let id = self.graph.alloc_frame_id();
        let nodes = self.selection.nodes();
        let command = AddFrameCommand::new(&self.graph, Frame::new(id, position), &nodes);
        self.push(Command::AddFrame(command));
        id
    }

    /// Delete the selection and every edge touching a selected node
    pub fn delete_selection(&mut self, save_connection: bool) {
        if self.selection.is_empty() {
            return;
        }
        let items = self.selection.items().to_vec();
        self.delete_items(&items, save_connection);
    }

    pub(crate) fn delete_items(&mut self, items: &[ItemRef], save_connection: bool) {
        let prior = self.selection.items().to_vec();
        let command = DeleteCommand::new(&self.graph, items, &prior, save_connection);
        self.push(Command::Delete(command));
    }

    /// Replace the selection
    pub fn select(&mut self, items: Vec<ItemRef>) {
        let old = self.selection.items().to_vec();
        if old == items {
            return;
        }
        self.push(Command::Select(SelectCommand::new(items, old)));
    }

    /// Set a node or frame property through the history
    pub fn change_property(&mut self, target: ItemRef, property: Property, value: PropertyValue) -> Result<()> {
        let old = match target {
            ItemRef::Node(id) => {
                let node = self.graph.node(id).ok_or(GraphError::MissingNode(id))?;
                let old = node.property(property)?;
                // validate before recording
                node.clone_detached(id).set_property(property, &value)?;
                old
            }
            ItemRef::Frame(id) => {
                let frame = self.graph.frame(id).ok_or(GraphError::MissingFrame(id))?;
                let old = frame.property(property)?;
                frame.clone_detached(id).set_property(property, &value)?;
                old
            }
            ItemRef::Edge(_) => {
                return Err(GraphError::UnsupportedProperty {
                    property,
                    target: "Edge".to_string(),
                })
            }
        };
        if old == value {
            return Ok(());
        }
        self.push(Command::PropertyChange(PropertyChangeCommand::new(target, property, old, value)));
        Ok(())
    }

    /// Take nodes out of their frames
    pub fn detach_from_frame(&mut self, nodes: &[NodeId]) {
        let command = DetachFromFrameCommand::new(&self.graph, nodes);
        if !command.is_empty() {
            self.push(Command::DetachFromFrame(command));
        }
    }

    /// Offset a frame's position and size; repeated calls merge in the history
    pub fn resize_frame(&mut self, frame: FrameId, offset_position: Vec2, offset_size: Vec2) -> Result<()> {
        if self.graph.frame(frame).is_none() {
            return Err(GraphError::MissingFrame(frame));
        }
        self.push(Command::ResizeFrame(ResizeFrameCommand::new(frame, offset_position, offset_size)));
        Ok(())
    }

    pub fn rename_frame(&mut self, frame: FrameId, title: impl Into<String>) -> Result<()> {
        let old = self
            .graph
            .frame(frame)
            .ok_or(GraphError::MissingFrame(frame))?
            .title()
            .to_string();
        let title = title.into();
        if old != title {
            self.push(Command::ChangeTitle(ChangeTitleCommand::new(frame, old, title)));
        }
        Ok(())
    }

    /// Record a finished move of items that are already at their new place
    ///
    /// Parent frames are refitted to content on undo.
    pub fn moved_nodes(
        &mut self,
        items: &[ItemRef],
        offset: Vec2,
        target_frame: Option<FrameId>,
        splice_edge: Option<EdgeId>,
    ) {
        self.push_move(items, offset, target_frame, splice_edge, Vec::new());
    }

    fn push_move(
        &mut self,
        items: &[ItemRef],
        offset: Vec2,
        target_frame: Option<FrameId>,
        splice_edge: Option<EdgeId>,
        frames_before: Vec<FrameGeometry>,
    ) {
        let command = MoveCommand::new(&self.graph, items, offset, target_frame, splice_edge)
            .with_frames_before(&self.graph, frames_before);
        if command.items().is_empty() {
            return;
        }
        self.push(Command::Move(command));
    }

    /// Move items by a document offset as one undo step
    pub fn move_items(&mut self, items: &[ItemRef], delta: Vec2) {
        let frames_before = FrameGeometry::affected_by(&self.graph, items);
        interaction::move_live(&mut self.graph, items, delta);
        self.push_move(items, delta, None, None, frames_before);
    }

    /// Export a node's current output through the operator
    pub fn save_texture(&mut self, node: NodeId, path: &Path) -> Result<()> {
        let texture = self.graph.node(node).ok_or(GraphError::MissingNode(node))?.preview();
        self.operator.save_texture(texture, path)
    }

    // ---- gestures ----

    pub fn press_node(&mut self, node: NodeId, device_point: Vec2, additive: bool) {
        self.press_item(ItemRef::Node(node), device_point, additive);
    }

    pub fn press_item(&mut self, item: ItemRef, device_point: Vec2, additive: bool) {
        if let Some(items) = self.interaction.press(item, device_point, additive, &self.selection) {
            self.select(items);
        }
    }

    pub fn drag_to(&mut self, device_point: Vec2) {
        self.interaction.drag_to(&mut self.graph, &self.selection, device_point);
    }

    pub fn release(&mut self) {
        match self.interaction.release(&mut self.graph, &self.selection) {
            Gesture::None => {}
            Gesture::Click { select } => {
                if let Some(items) = select {
                    self.select(items);
                }
            }
            Gesture::Moved {
                items,
                delta,
                target_frame,
                splice_edge,
                frames_before,
            } => self.push_move(&items, delta, target_frame, splice_edge, frames_before),
        }
    }

    /// Drop the current drag, returning moved items to where it began
    pub fn cancel_drag(&mut self) {
        self.interaction.cancel(&mut self.graph, &self.selection);
    }

    pub fn start_box_selection(&mut self, device_point: Vec2) {
        self.interaction.start_box_selection(device_point);
    }

    pub fn update_box_selection(&mut self, device_point: Vec2) {
        self.interaction.update_box_selection(device_point);
    }

    pub fn complete_box_selection(&mut self, additive: bool) {
        let items = self
            .interaction
            .complete_box_selection(&self.graph, &self.selection, additive);
        self.select(items);
    }

    // ---- persistence ----

    /// Capture the scene as a document with no runtime ids
    pub fn save_document(&self) -> Result<SceneDocument> {
        let index: HashMap<NodeId, usize> = self
            .graph
            .nodes()
            .keys()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        let nodes = self
            .graph
            .nodes()
            .values()
            .map(Node::to_record)
            .collect::<Result<Vec<_>>>()?;
        let frames = self
            .graph
            .frames()
            .values()
            .map(|f| f.to_record(|n| index.get(&n).copied()))
            .collect();
        let socket_id = |addr: SocketAddr| -> Result<SocketId> {
            self.graph
                .socket(addr)
                .map(|s| s.id())
                .ok_or(GraphError::MissingSocket(addr))
        };
        let edges = self
            .graph
            .edges()
            .values()
            .map(|e| {
                Ok(crate::nodes::EdgeRecord {
                    start_socket: socket_id(e.start_socket())?,
                    end_socket: socket_id(e.end_socket())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SceneDocument {
            nodes,
            frames,
            edges,
            view: *self.graph.view(),
        })
    }

    /// Replace the scene's content with a document, then evaluate it
    ///
    /// History and selection are cleared. On error the scene is left empty.
    pub fn load_document(&mut self, document: &SceneDocument) -> Result<()> {
        self.interaction = InteractionManager::new();
        self.selection.clear(&mut self.graph);
        self.history.clear();
        self.graph.clear();
        info!("History cleared for document load");

        let result = self.build_from(document);
        if result.is_err() {
            self.graph.clear();
        }
        result?;
        let stats = self.evaluate();
        debug!(
            "Loaded {} nodes, {} edges, {} frames; {} evaluated",
            self.graph.nodes().len(),
            self.graph.edges().len(),
            self.graph.frames().len(),
            stats.evaluated.len()
        );
        Ok(())
    }

    fn build_from(&mut self, document: &SceneDocument) -> Result<()> {
        self.set_view(document.view);
        let mut sockets = HashMap::new();
        let mut ids = Vec::with_capacity(document.nodes.len());
        for record in &document.nodes {
            let id = self.graph.alloc_node_id();
            let node = Node::from_record(id, record, &mut sockets)?;
            ids.push(self.graph.insert_node(node));
        }
        for record in &document.frames {
            let id = self.graph.alloc_frame_id();
            self.graph.insert_frame(Frame::from_record(id, record));
            let members: Vec<NodeId> = record.content.iter().filter_map(|i| ids.get(*i).copied()).collect();
            self.graph.frame_attach_nodes(id, &members);
        }
        for record in &document.edges {
            let start = *sockets
                .get(&record.start_socket)
                .ok_or(GraphError::UnknownSocketId(record.start_socket.0))?;
            let end = *sockets
                .get(&record.end_socket)
                .ok_or(GraphError::UnknownSocketId(record.end_socket.0))?;
            let id = self.graph.alloc_edge_id();
            self.graph.link_edge(Edge::new(id, start, end))?;
        }
        Ok(())
    }
}
