//! Node types and core node functionality

use super::execution_engine::NodeState;
use super::frame::FrameId;
use super::socket::{Socket, SocketAddr, SocketDirection, SocketGroup, SocketId, SocketRecord};
use super::{Bpc, NodeParams, NodeTypeId, Property, PropertyValue, RenderRequest, TextureHandle};
use crate::constants::node as layout;
use crate::editor::viewport::ViewTransform;
use crate::error::{GraphError, Result};
use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Unique identifier for a node
pub type NodeId = usize;

/// On-disk form of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(rename = "type")]
    pub type_id: u32,
    pub base_x: f32,
    pub base_y: f32,
    pub bpc: Bpc,
    pub resolution: UVec2,
    #[serde(default)]
    pub inputs: Vec<SocketRecord>,
    #[serde(default)]
    pub outputs: Vec<SocketRecord>,
    #[serde(default)]
    pub additionals: Vec<SocketRecord>,
    /// Kind-specific parameters, flattened into the node object
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// A texture node: sockets, placement and kind-specific parameters
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Top-left corner in document space
    pub position: Vec2,
    params: NodeParams,
    resolution: UVec2,
    bpc: Bpc,
    inputs: Vec<Socket>,
    outputs: Vec<Socket>,
    additionals: Vec<Socket>,
    selected: bool,
    attached_frame: Option<FrameId>,
    preview: TextureHandle,
    state: NodeState,
    deserializing: bool,
}

impl Node {
    /// Creates a node with the sockets its kind declares
    pub fn new(id: NodeId, params: NodeParams, resolution: UVec2, bpc: Bpc) -> Self {
        let meta = params.type_id().metadata();
        let mut node = Self {
            id,
            position: Vec2::ZERO,
            inputs: meta
                .inputs
                .iter()
                .map(|tip| Socket::new(SocketDirection::Input, *tip))
                .collect(),
            outputs: meta
                .outputs
                .iter()
                .map(|tip| Socket::new(SocketDirection::Output, *tip))
                .collect(),
            additionals: (0..meta.additionals)
                .map(|_| Socket::new_additional("Texture"))
                .collect(),
            params,
            resolution,
            bpc,
            selected: false,
            attached_frame: None,
            preview: TextureHandle::EMPTY,
            state: NodeState::Dirty,
            deserializing: false,
        };
        node.update_additional_visibility();
        node
    }

    pub fn type_id(&self) -> NodeTypeId {
        self.params.type_id()
    }

    pub fn title(&self) -> &'static str {
        self.type_id().metadata().display_name
    }

    pub fn params(&self) -> &NodeParams {
        &self.params
    }

    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    pub fn bpc(&self) -> Bpc {
        self.bpc
    }

    /// Read a property as shown on the property panel
    pub fn property(&self, property: Property) -> Result<PropertyValue> {
        match property {
            Property::Resolution => Ok(PropertyValue::Vec2(self.resolution.as_vec2())),
            Property::Bpc => Ok(PropertyValue::Int(self.bpc.index())),
            _ => self.params.get(property).ok_or_else(|| GraphError::UnsupportedProperty {
                property,
                target: self.title().to_string(),
            }),
        }
    }

    /// Write a property; the node becomes dirty on success
    pub fn set_property(&mut self, property: Property, value: &PropertyValue) -> Result<()> {
        match property {
            Property::Resolution => {
                let size = value.vec2(property)?;
                self.resolution = size.as_uvec2().max(UVec2::ONE);
            }
            Property::Bpc => self.bpc = Bpc::from_index(value.int(property)?),
            _ => {
                self.params.set(property, value)?;
                if property == Property::InputsCount {
                    self.update_additional_visibility();
                }
            }
        }
        self.mark_dirty();
        Ok(())
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn mark_dirty(&mut self) {
        self.state = NodeState::Dirty;
    }

    pub(crate) fn mark_idle(&mut self) {
        self.state = NodeState::Idle;
    }

    /// True between loading from a document and the first successful operation
    pub fn is_deserializing(&self) -> bool {
        self.deserializing
    }

    pub(crate) fn set_deserializing(&mut self, deserializing: bool) {
        self.deserializing = deserializing;
    }

    pub fn preview(&self) -> TextureHandle {
        self.preview
    }

    pub(crate) fn set_preview(&mut self, texture: TextureHandle) {
        self.preview = texture;
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn attached_frame(&self) -> Option<FrameId> {
        self.attached_frame
    }

    pub(crate) fn set_attached_frame(&mut self, frame: Option<FrameId>) {
        self.attached_frame = frame;
    }

    pub fn inputs(&self) -> &[Socket] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Socket] {
        &self.outputs
    }

    pub fn additionals(&self) -> &[Socket] {
        &self.additionals
    }

    pub fn socket(&self, group: SocketGroup, index: usize) -> Option<&Socket> {
        match group {
            SocketGroup::Input => self.inputs.get(index),
            SocketGroup::Output => self.outputs.get(index),
            SocketGroup::Additional => self.additionals.get(index),
        }
    }

    pub fn socket_mut(&mut self, group: SocketGroup, index: usize) -> Option<&mut Socket> {
        match group {
            SocketGroup::Input => self.inputs.get_mut(index),
            SocketGroup::Output => self.outputs.get_mut(index),
            SocketGroup::Additional => self.additionals.get_mut(index),
        }
    }

    /// Every input address: fixed inputs first, then additional inputs
    pub fn input_addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        let fixed = (0..self.inputs.len()).map(move |i| SocketAddr::input(self.id, i));
        let extra = (0..self.additionals.len()).map(move |i| SocketAddr::additional(self.id, i));
        fixed.chain(extra)
    }

    pub fn output_addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        (0..self.outputs.len()).map(move |i| SocketAddr::output(self.id, i))
    }

    /// Current input values in [`Node::input_addrs`] order
    pub fn input_values(&self) -> Vec<TextureHandle> {
        self.inputs
            .iter()
            .chain(self.additionals.iter())
            .map(Socket::value)
            .collect()
    }

    /// Whether any socket carries an edge
    pub fn has_edges(&self) -> bool {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .chain(&self.additionals)
            .any(|s| s.count_edge() > 0)
    }

    pub(crate) fn set_outputs(&mut self, value: TextureHandle) {
        for socket in &mut self.outputs {
            socket.set_value(value);
        }
    }

    pub fn render_request(&self) -> RenderRequest<'_> {
        RenderRequest {
            node: self.id,
            type_id: self.type_id(),
            params: &self.params,
            inputs: self.input_values(),
            resolution: self.resolution,
            bpc: self.bpc,
        }
    }

    fn update_additional_visibility(&mut self) {
        let visible = self.params.visible_additionals();
        for (i, socket) in self.additionals.iter_mut().enumerate() {
            socket.set_visible(i < visible);
        }
    }

    fn visible_additional_count(&self) -> usize {
        self.additionals.iter().filter(|s| s.visible()).count()
    }

    /// Box size in document space
    pub fn size(&self) -> Vec2 {
        let extra = self.visible_additional_count() as f32 * layout::ADDITIONAL_SOCKET_SPACING;
        Vec2::new(layout::WIDTH, layout::HEIGHT + extra)
    }

    pub fn contains(&self, doc_point: Vec2) -> bool {
        let max = self.position + self.size();
        doc_point.cmpge(self.position).all() && doc_point.cmple(max).all()
    }

    /// Point used to find the frame a dropped node lands in
    pub fn header_point(&self) -> Vec2 {
        self.position
            + Vec2::new(layout::WIDTH * 0.5, layout::HEIGHT * layout::HEADER_POINT_RATIO)
    }

    /// Socket centre relative to the node's top-left corner
    pub fn socket_offset(&self, group: SocketGroup, index: usize) -> Vec2 {
        let centered = |count: usize| {
            layout::SOCKET_CENTER_Y - layout::SOCKET_SPACING * 0.5 * (count as f32 - 1.0)
                + layout::SOCKET_SPACING * index as f32
        };
        match group {
            SocketGroup::Input => Vec2::new(layout::INPUT_SOCKET_X, centered(self.inputs.len())),
            SocketGroup::Output => Vec2::new(layout::OUTPUT_SOCKET_X, centered(self.outputs.len())),
            SocketGroup::Additional => Vec2::new(
                layout::INPUT_SOCKET_X,
                layout::ADDITIONAL_SOCKET_START_Y + layout::ADDITIONAL_SOCKET_SPACING * index as f32,
            ),
        }
    }

    /// Refresh every socket's cached device position
    pub fn update_socket_positions(&mut self, view: &ViewTransform) {
        let groups = [SocketGroup::Input, SocketGroup::Output, SocketGroup::Additional];
        for group in groups {
            let count = match group {
                SocketGroup::Input => self.inputs.len(),
                SocketGroup::Output => self.outputs.len(),
                SocketGroup::Additional => self.additionals.len(),
            };
            for index in 0..count {
                let pos = view.to_device(self.position + self.socket_offset(group, index));
                if let Some(socket) = self.socket_mut(group, index) {
                    socket.set_global_pos(pos);
                }
            }
        }
    }

    /// Closest visible socket of a direction within `radius` of a device point
    pub fn nearest_socket(
        &self,
        device_point: Vec2,
        radius: f32,
        direction: SocketDirection,
    ) -> Option<SocketAddr> {
        let candidates: Vec<SocketAddr> = match direction {
            SocketDirection::Input => self.input_addrs().collect(),
            SocketDirection::Output => self.output_addrs().collect(),
        };
        candidates
            .into_iter()
            .filter_map(|addr| {
                let socket = self.socket(addr.group, addr.index)?;
                (socket.visible() && socket.in_circle(device_point, radius))
                    .then(|| (addr, socket.global_pos().distance_squared(device_point)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(addr, _)| addr)
    }

    /// Same kind, parameters, resolution and placement; fresh sockets, no edges
    pub fn clone_detached(&self, id: NodeId) -> Node {
        let copy = |sockets: &[Socket]| -> Vec<Socket> {
            sockets.iter().map(Socket::detached_copy).collect()
        };
        Node {
            id,
            position: self.position,
            params: self.params.clone(),
            resolution: self.resolution,
            bpc: self.bpc,
            inputs: copy(&self.inputs),
            outputs: copy(&self.outputs),
            additionals: copy(&self.additionals),
            selected: false,
            attached_frame: None,
            preview: TextureHandle::EMPTY,
            state: NodeState::Dirty,
            deserializing: false,
        }
    }

    pub fn to_record(&self) -> Result<NodeRecord> {
        Ok(NodeRecord {
            type_id: self.type_id().id(),
            base_x: self.position.x,
            base_y: self.position.y,
            bpc: self.bpc,
            resolution: self.resolution,
            inputs: self.inputs.iter().map(Socket::serialize).collect(),
            outputs: self.outputs.iter().map(Socket::serialize).collect(),
            additionals: self.additionals.iter().map(Socket::serialize).collect(),
            params: self.params.to_json()?,
        })
    }

    /// Rebuild a node from its record, registering its socket ids for edge relinking
    pub fn from_record(
        id: NodeId,
        record: &NodeRecord,
        sockets: &mut HashMap<SocketId, SocketAddr>,
    ) -> Result<Node> {
        let type_id = NodeTypeId::from_id(record.type_id)?;
        let params = NodeParams::from_json(type_id, &record.params)?;
        let mut node = Node::new(id, params, record.resolution, record.bpc);
        node.position = Vec2::new(record.base_x, record.base_y);

        let groups = [
            (SocketGroup::Input, &record.inputs),
            (SocketGroup::Output, &record.outputs),
            (SocketGroup::Additional, &record.additionals),
        ];
        for (group, saved) in groups {
            for (index, socket_record) in saved.iter().enumerate() {
                let Some(socket) = node.socket_mut(group, index) else {
                    return Err(GraphError::Document(format!(
                        "{} node has no {:?} socket {}",
                        type_id.metadata().display_name,
                        group,
                        index
                    )));
                };
                socket.deserialize(socket_record);
                sockets.insert(socket_record.id, SocketAddr::new(id, group, index));
            }
        }
        node.deserializing = true;
        Ok(node)
    }
}
