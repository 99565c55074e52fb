use crate::nodes::{FrameId, ItemRef, NodeGraph, Property, PropertyValue};
use log::warn;

/// Sets one property on a node or frame
#[derive(Debug)]
pub struct PropertyChangeCommand {
    target: ItemRef,
    property: Property,
    old: PropertyValue,
    new: PropertyValue,
}

impl PropertyChangeCommand {
    pub fn new(target: ItemRef, property: Property, old: PropertyValue, new: PropertyValue) -> Self {
        Self {
            target,
            property,
            old,
            new,
        }
    }

    pub fn property(&self) -> Property {
        self.property
    }

    fn apply(&self, graph: &mut NodeGraph, value: &PropertyValue) {
        let result = match self.target {
            ItemRef::Node(id) => {
                let Some(node) = graph.node_mut(id) else {
                    return;
                };
                let result = node.set_property(self.property, value);
                // inputs count can change the box
                graph.refresh_node_geometry(id);
                result
            }
            ItemRef::Frame(id) => match graph.frame_mut(id) {
                Some(frame) => frame.set_property(self.property, value),
                None => return,
            },
            ItemRef::Edge(_) => return,
        };
        if let Err(err) = result {
            warn!("Could not set {:?} on {:?}: {}", self.property, self.target, err);
        }
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        let value = self.new.clone();
        self.apply(graph, &value);
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph) {
        let value = self.old.clone();
        self.apply(graph, &value);
    }
}

/// Renames a frame
#[derive(Debug)]
pub struct ChangeTitleCommand {
    frame: FrameId,
    old: String,
    new: String,
}

impl ChangeTitleCommand {
    pub fn new(frame: FrameId, old: String, new: String) -> Self {
        Self { frame, old, new }
    }

    pub(super) fn redo(&mut self, graph: &mut NodeGraph) {
        if let Some(frame) = graph.frame_mut(self.frame) {
            frame.set_title(self.new.clone());
        }
    }

    pub(super) fn undo(&mut self, graph: &mut NodeGraph) {
        if let Some(frame) = graph.frame_mut(self.frame) {
            frame.set_title(self.old.clone());
        }
    }
}
