//! Frames - titled containers that group nodes

use super::{NodeId, Property, PropertyValue};
use crate::constants::frame as layout;
use crate::error::{GraphError, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for a frame
pub type FrameId = usize;

/// On-disk form of a frame; members are indices into the document's node list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    pub base_x: f32,
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub color: [f32; 3],
    #[serde(default)]
    pub content: Vec<usize>,
}

/// A grouping container
///
/// Membership is tracked on both sides: the frame lists its nodes and each
/// node points back at its frame. [`super::NodeGraph`] keeps the two in step.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    position: Vec2,
    size: Vec2,
    title: String,
    color: [f32; 3],
    selected: bool,
    content: Vec<NodeId>,
    bubble_visible: bool,
}

impl Frame {
    pub fn new(id: FrameId, position: Vec2) -> Self {
        Self {
            id,
            position,
            size: Vec2::from(layout::DEFAULT_SIZE),
            title: layout::DEFAULT_TITLE.to_string(),
            color: layout::DEFAULT_COLOR,
            selected: false,
            content: Vec::new(),
            bubble_visible: false,
        }
    }

    /// Top-left corner in document space
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn set_geometry(&mut self, position: Vec2, size: Vec2) {
        self.position = position;
        self.size = size;
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn content(&self) -> &[NodeId] {
        &self.content
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.content.contains(&node)
    }

    pub(crate) fn push_content(&mut self, node: NodeId) {
        if !self.content.contains(&node) {
            self.content.push(node);
        }
    }

    pub(crate) fn remove_content(&mut self, node: NodeId) {
        self.content.retain(|n| *n != node);
    }

    pub(crate) fn clear_content(&mut self) {
        self.content.clear();
    }

    /// Hover affordance; carries no graph meaning
    pub fn set_bubble_visible(&mut self, visible: bool) {
        self.bubble_visible = visible;
    }

    pub fn bubble_visible(&self) -> bool {
        self.bubble_visible
    }

    pub fn contains_point(&self, doc_point: Vec2) -> bool {
        let max = self.position + self.size;
        doc_point.cmpge(self.position).all() && doc_point.cmple(max).all()
    }

    pub fn property(&self, property: Property) -> Result<PropertyValue> {
        match property {
            Property::Title => Ok(PropertyValue::Text(self.title.clone())),
            Property::Color => Ok(PropertyValue::Color(self.color)),
            _ => Err(GraphError::UnsupportedProperty {
                property,
                target: "Frame".to_string(),
            }),
        }
    }

    pub fn set_property(&mut self, property: Property, value: &PropertyValue) -> Result<()> {
        match property {
            Property::Title => self.title = value.text(property)?.to_string(),
            Property::Color => self.color = value.color(property)?,
            _ => {
                return Err(GraphError::UnsupportedProperty {
                    property,
                    target: "Frame".to_string(),
                })
            }
        }
        Ok(())
    }

    /// Copy with the same look and geometry but no members
    pub fn clone_detached(&self, id: FrameId) -> Frame {
        Frame {
            id,
            selected: false,
            content: Vec::new(),
            bubble_visible: false,
            ..self.clone()
        }
    }

    pub fn to_record(&self, node_index: impl Fn(NodeId) -> Option<usize>) -> FrameRecord {
        FrameRecord {
            base_x: self.position.x,
            base_y: self.position.y,
            width: self.size.x,
            height: self.size.y,
            title: self.title.clone(),
            color: self.color,
            content: self.content.iter().filter_map(|n| node_index(*n)).collect(),
        }
    }

    /// Rebuild a frame without members; the caller attaches them
    pub fn from_record(id: FrameId, record: &FrameRecord) -> Frame {
        Frame {
            id,
            position: Vec2::new(record.base_x, record.base_y),
            size: Vec2::new(record.width, record.height),
            title: record.title.clone(),
            color: record.color,
            selected: false,
            content: Vec::new(),
            bubble_visible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_color_properties() {
        let mut frame = Frame::new(0, Vec2::ZERO);
        frame
            .set_property(Property::Title, &PropertyValue::Text("Bricks".into()))
            .unwrap();
        frame
            .set_property(Property::Color, &PropertyValue::Color([1.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(frame.title(), "Bricks");
        assert_eq!(frame.property(Property::Color).unwrap(), PropertyValue::Color([1.0, 0.0, 0.0]));
        assert!(frame.set_property(Property::Seed, &PropertyValue::Int(1)).is_err());
    }

    #[test]
    fn test_contains_point() {
        let frame = Frame::new(0, Vec2::new(10.0, 10.0));
        assert!(frame.contains_point(Vec2::new(20.0, 20.0)));
        assert!(!frame.contains_point(Vec2::new(5.0, 20.0)));
    }

    #[test]
    fn test_record_maps_members_to_indices() {
        let mut frame = Frame::new(2, Vec2::new(1.0, 2.0));
        frame.push_content(7);
        frame.push_content(9);
        frame.push_content(7);
        let record = frame.to_record(|n| (n == 9).then_some(0));
        assert_eq!(record.content, vec![0]);
        let restored = Frame::from_record(5, &record);
        assert_eq!(restored.position(), Vec2::new(1.0, 2.0));
        assert!(restored.content().is_empty());
    }
}
