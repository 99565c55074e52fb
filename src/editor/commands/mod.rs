//! Undoable edits and the history stack that runs them
//!
//! Every change a user makes to the scene is a [`Command`]. Pushing a command
//! runs its `redo`; the stack then keeps it for `undo`. Commands own the items
//! they take out of the graph, so undoing a deletion hands the very same node,
//! edge or frame back.

mod add;
mod delete;
mod edge;
mod frame;
mod move_items;
mod property;
mod select;

pub use add::{AddEdgeCommand, AddFrameCommand, AddNodeCommand};
pub use delete::DeleteCommand;
pub use edge::MoveEdgeCommand;
pub use frame::{DetachFromFrameCommand, ResizeFrameCommand};
pub use move_items::{FrameGeometry, MoveCommand};
pub use property::{ChangeTitleCommand, PropertyChangeCommand};
pub use select::{PasteCommand, SelectCommand};

use super::selection::Selection;
use crate::constants::history::RESIZE_FRAME_ID;
use crate::nodes::{Edge, EdgeId, Frame, FrameId, ItemRef, Node, NodeGraph, NodeId};
use log::debug;

/// An undoable edit
#[derive(Debug)]
pub enum Command {
    Move(MoveCommand),
    AddNode(AddNodeCommand),
    AddEdge(AddEdgeCommand),
    AddFrame(AddFrameCommand),
    Delete(DeleteCommand),
    Select(SelectCommand),
    Paste(PasteCommand),
    PropertyChange(PropertyChangeCommand),
    MoveEdge(MoveEdgeCommand),
    DetachFromFrame(DetachFromFrameCommand),
    ResizeFrame(ResizeFrameCommand),
    ChangeTitle(ChangeTitleCommand),
    /// Several commands applied and reverted as one step
    Macro { text: String, commands: Vec<Command> },
}

impl Command {
    pub fn redo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        match self {
            Command::Move(c) => c.redo(graph),
            Command::AddNode(c) => c.redo(graph),
            Command::AddEdge(c) => c.redo(graph),
            Command::AddFrame(c) => c.redo(graph),
            Command::Delete(c) => c.redo(graph, selection),
            Command::Select(c) => c.redo(graph, selection),
            Command::Paste(c) => c.redo(graph, selection),
            Command::PropertyChange(c) => c.redo(graph),
            Command::MoveEdge(c) => c.redo(graph),
            Command::DetachFromFrame(c) => c.redo(graph),
            Command::ResizeFrame(c) => c.redo(graph),
            Command::ChangeTitle(c) => c.redo(graph),
            Command::Macro { commands, .. } => {
                for command in commands.iter_mut() {
                    command.redo(graph, selection);
                }
            }
        }
    }

    pub fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) {
        match self {
            Command::Move(c) => c.undo(graph),
            Command::AddNode(c) => c.undo(graph, selection),
            Command::AddEdge(c) => c.undo(graph, selection),
            Command::AddFrame(c) => c.undo(graph, selection),
            Command::Delete(c) => c.undo(graph, selection),
            Command::Select(c) => c.undo(graph, selection),
            Command::Paste(c) => c.undo(graph, selection),
            Command::PropertyChange(c) => c.undo(graph),
            Command::MoveEdge(c) => c.undo(graph),
            Command::DetachFromFrame(c) => c.undo(graph),
            Command::ResizeFrame(c) => c.undo(graph),
            Command::ChangeTitle(c) => c.undo(graph),
            Command::Macro { commands, .. } => {
                for command in commands.iter_mut().rev() {
                    command.undo(graph, selection);
                }
            }
        }
    }

    /// Merge id; only commands with the same id may merge
    pub fn id(&self) -> Option<u32> {
        match self {
            Command::ResizeFrame(_) => Some(RESIZE_FRAME_ID),
            _ => None,
        }
    }

    /// Fold a newer command into this one
    pub fn merge_with(&mut self, other: &Command) -> bool {
        match (self, other) {
            (Command::ResizeFrame(this), Command::ResizeFrame(other)) => this.merge_with(other),
            _ => false,
        }
    }

    /// Human readable label for history menus
    pub fn text(&self) -> String {
        match self {
            Command::Move(_) => "Move".to_string(),
            Command::AddNode(c) => format!("Add {}", c.title()),
            Command::AddEdge(_) => "Add Edge".to_string(),
            Command::AddFrame(_) => "Add Frame".to_string(),
            Command::Delete(_) => "Delete".to_string(),
            Command::Select(_) => "Select".to_string(),
            Command::Paste(_) => "Paste".to_string(),
            Command::PropertyChange(c) => format!("Change {:?}", c.property()),
            Command::MoveEdge(_) => "Move Edge".to_string(),
            Command::DetachFromFrame(_) => "Detach From Frame".to_string(),
            Command::ResizeFrame(_) => "Resize Frame".to_string(),
            Command::ChangeTitle(_) => "Change Title".to_string(),
            Command::Macro { text, .. } => text.clone(),
        }
    }
}

/// Linear undo/redo history
#[derive(Debug, Default)]
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Oldest entries are dropped past this many; zero means unbounded
    limit: usize,
}

impl CommandStack {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Apply a command and record it
    pub fn push(&mut self, mut command: Command, graph: &mut NodeGraph, selection: &mut Selection) {
        command.redo(graph, selection);
        self.redo_stack.clear();

        if let (Some(id), Some(top)) = (command.id(), self.undo_stack.last_mut()) {
            if top.id() == Some(id) && top.merge_with(&command) {
                debug!("Merged '{}' into previous history entry", command.text());
                return;
            }
        }

        debug!("Pushed '{}'", command.text());
        self.undo_stack.push(command);
        if self.limit > 0 && self.undo_stack.len() > self.limit {
            let overflow = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..overflow);
        }
    }

    pub fn undo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) -> bool {
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };
        debug!("Undo '{}'", command.text());
        command.undo(graph, selection);
        self.redo_stack.push(command);
        true
    }

    pub fn redo(&mut self, graph: &mut NodeGraph, selection: &mut Selection) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        debug!("Redo '{}'", command.text());
        command.redo(graph, selection);
        self.undo_stack.push(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_text(&self) -> Option<String> {
        self.undo_stack.last().map(Command::text)
    }

    pub fn redo_text(&self) -> Option<String> {
        self.redo_stack.last().map(Command::text)
    }

    /// Number of entries that can be undone
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

// Removal helpers: an item leaving the graph also leaves the selection.

fn take_node(graph: &mut NodeGraph, selection: &mut Selection, id: NodeId) -> Option<Node> {
    selection.forget(ItemRef::Node(id));
    graph.remove_node(id)
}

fn take_edge(graph: &mut NodeGraph, selection: &mut Selection, id: EdgeId) -> Option<Edge> {
    selection.forget(ItemRef::Edge(id));
    graph.unlink_edge(id)
}

fn take_frame(graph: &mut NodeGraph, selection: &mut Selection, id: FrameId) -> Option<Frame> {
    selection.forget(ItemRef::Frame(id));
    graph.remove_frame(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn frame_graph() -> (NodeGraph, FrameId) {
        let mut graph = NodeGraph::new();
        let id = graph.alloc_frame_id();
        graph.insert_frame(Frame::new(id, Vec2::ZERO));
        (graph, id)
    }

    fn resize(frame: FrameId, dx: f32) -> Command {
        Command::ResizeFrame(ResizeFrameCommand::new(
            frame,
            Vec2::ZERO,
            Vec2::new(dx, 0.0),
        ))
    }

    #[test]
    fn test_consecutive_resizes_merge() {
        let (mut graph, frame) = frame_graph();
        let mut selection = Selection::new();
        let mut stack = CommandStack::new(0);
        let width = graph.frame(frame).unwrap().size().x;

        stack.push(resize(frame, 10.0), &mut graph, &mut selection);
        stack.push(resize(frame, 5.0), &mut graph, &mut selection);
        assert_eq!(stack.len(), 1);
        assert_eq!(graph.frame(frame).unwrap().size().x, width + 15.0);

        assert!(stack.undo(&mut graph, &mut selection));
        assert_eq!(graph.frame(frame).unwrap().size().x, width);
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_push_clears_redo() {
        let (mut graph, frame) = frame_graph();
        let mut selection = Selection::new();
        let mut stack = CommandStack::new(0);
        stack.push(resize(frame, 10.0), &mut graph, &mut selection);
        stack.undo(&mut graph, &mut selection);
        assert!(stack.can_redo());
        stack.push(
            Command::ChangeTitle(ChangeTitleCommand::new(frame, "Frame".into(), "Bricks".into())),
            &mut graph,
            &mut selection,
        );
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_text().as_deref(), Some("Change Title"));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let (mut graph, frame) = frame_graph();
        let mut selection = Selection::new();
        let mut stack = CommandStack::new(2);
        for title in ["a", "b", "c"] {
            let old = graph.frame(frame).unwrap().title().to_string();
            stack.push(
                Command::ChangeTitle(ChangeTitleCommand::new(frame, old, title.into())),
                &mut graph,
                &mut selection,
            );
        }
        assert_eq!(stack.len(), 2);
        stack.undo(&mut graph, &mut selection);
        stack.undo(&mut graph, &mut selection);
        assert!(!stack.undo(&mut graph, &mut selection));
        assert_eq!(graph.frame(frame).unwrap().title(), "a");
    }
}
