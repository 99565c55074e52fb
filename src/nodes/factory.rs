//! Node factory with a fixed, append-only type registry

use crate::config::EditorConfig;
use crate::error::{GraphError, Result};
use crate::nodes::{Bpc, Node, NodeId, NodeParams};
use glam::{UVec2, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

/// Node type ids as stored in documents
///
/// New kinds are appended; existing ids never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum NodeTypeId {
    Noise = 0,
    Mix = 1,
    Albedo = 2,
    Metal = 3,
    Normal = 4,
    Color = 5,
    ColorRamp = 6,
    Inverse = 7,
    Grayscale = 8,
    Height = 9,
    Roughness = 10,
    Emission = 11,
    Blur = 12,
    Threshold = 13,
    DirectionalWarp = 14,
    Transform = 15,
    Mirror = 16,
    Tile = 17,
}

impl NodeTypeId {
    pub const ALL: [NodeTypeId; 18] = [
        NodeTypeId::Noise,
        NodeTypeId::Mix,
        NodeTypeId::Albedo,
        NodeTypeId::Metal,
        NodeTypeId::Normal,
        NodeTypeId::Color,
        NodeTypeId::ColorRamp,
        NodeTypeId::Inverse,
        NodeTypeId::Grayscale,
        NodeTypeId::Height,
        NodeTypeId::Roughness,
        NodeTypeId::Emission,
        NodeTypeId::Blur,
        NodeTypeId::Threshold,
        NodeTypeId::DirectionalWarp,
        NodeTypeId::Transform,
        NodeTypeId::Mirror,
        NodeTypeId::Tile,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Result<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(GraphError::UnknownNodeType(id))
    }

    /// Material outputs feed the 3D preview and are never copied
    pub fn is_material_output(self) -> bool {
        self.metadata().category == NodeCategory::Material
    }

    pub fn metadata(self) -> NodeMetadata {
        use NodeCategory::*;
        let describe = |display_name: &'static str,
                        category: NodeCategory,
                        inputs: &'static [&'static str],
                        outputs: &'static [&'static str],
                        additionals: usize| NodeMetadata {
            type_id: self,
            display_name,
            category,
            inputs,
            outputs,
            additionals,
        };
        match self {
            NodeTypeId::Noise => describe("Noise", Generator, &["Mask"], &["Noise"], 0),
            NodeTypeId::Mix => describe("Mix", Filter, &["First", "Second", "Factor"], &["Mix"], 0),
            NodeTypeId::Albedo => describe("Albedo", Material, &["Albedo"], &[], 0),
            NodeTypeId::Metal => describe("Metalness", Material, &["Metal"], &[], 0),
            NodeTypeId::Normal => describe("Normal", Material, &["Normal"], &[], 0),
            NodeTypeId::Color => describe("Color", Generator, &[], &["Color"], 0),
            NodeTypeId::ColorRamp => describe("Color Ramp", Filter, &["Source"], &["Ramp"], 0),
            NodeTypeId::Inverse => describe("Inverse", Filter, &["Source"], &["Inverse"], 0),
            NodeTypeId::Grayscale => describe("Grayscale", Filter, &["Source"], &["Grayscale"], 0),
            NodeTypeId::Height => describe("Height", Material, &["Height"], &[], 0),
            NodeTypeId::Roughness => describe("Roughness", Material, &["Roughness"], &[], 0),
            NodeTypeId::Emission => describe("Emission", Material, &["Emission"], &[], 0),
            NodeTypeId::Blur => describe("Blur", Filter, &["Source", "Mask"], &["Blur"], 0),
            NodeTypeId::Threshold => describe("Threshold", Filter, &["Source"], &["Threshold"], 0),
            NodeTypeId::DirectionalWarp => {
                describe("Directional Warp", Filter, &["Source", "Warp"], &["Warp"], 0)
            }
            NodeTypeId::Transform => describe("Transform", Filter, &["Source"], &["Transform"], 0),
            NodeTypeId::Mirror => describe("Mirror", Filter, &["Source"], &["Mirror"], 0),
            NodeTypeId::Tile => describe("Tile", Filter, &["Texture", "Mask"], &["Tile"], 5),
        }
    }
}

impl TryFrom<u32> for NodeTypeId {
    type Error = GraphError;

    fn try_from(id: u32) -> Result<Self> {
        Self::from_id(id)
    }
}

impl From<NodeTypeId> for u32 {
    fn from(type_id: NodeTypeId) -> u32 {
        type_id.id()
    }
}

/// Broad grouping used by node menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Produces a texture without needing an input
    Generator,
    /// Transforms or combines input textures
    Filter,
    /// Terminal material channel for the 3D preview
    Material,
}

/// Static description of a node kind
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMetadata {
    pub type_id: NodeTypeId,
    pub display_name: &'static str,
    pub category: NodeCategory,
    /// Tips of the fixed input sockets, in order
    pub inputs: &'static [&'static str],
    /// Tips of the output sockets, in order
    pub outputs: &'static [&'static str],
    /// Number of optional input sockets
    pub additionals: usize,
}

/// Builds nodes with the editor's default resolution and bit depth
#[derive(Debug, Clone)]
pub struct NodeFactory {
    resolution: UVec2,
    bpc: Bpc,
}

impl NodeFactory {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            resolution: config.default_resolution,
            bpc: config.default_bpc,
        }
    }

    /// Create a node of the given kind at a document-space position
    pub fn create(&self, id: NodeId, type_id: NodeTypeId, position: Vec2) -> Node {
        debug!("Creating {:?} node {} at {:?}", type_id, id, position);
        let mut node = Node::new(id, NodeParams::default_for(type_id), self.resolution, self.bpc);
        node.position = position;
        node
    }

    /// Create a node from its numeric type id
    pub fn create_by_id(&self, id: NodeId, type_id: u32, position: Vec2) -> Result<Node> {
        Ok(self.create(id, NodeTypeId::from_id(type_id)?, position))
    }

    /// All kinds in a category, in type id order
    pub fn nodes_in_category(category: NodeCategory) -> Vec<NodeMetadata> {
        NodeTypeId::ALL
            .iter()
            .map(|t| t.metadata())
            .filter(|m| m.category == category)
            .collect()
    }
}
