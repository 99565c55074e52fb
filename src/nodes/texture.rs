//! Texture handles and the texture operator seam
//!
//! The graph never touches pixels. Each node's operation hands a
//! [`RenderRequest`] to a [`TextureOperator`] and stores the handle it gets
//! back in its output sockets.

use crate::constants::gl;
use crate::error::Result;
use crate::nodes::{NodeId, NodeParams, NodeTypeId};
use glam::UVec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Opaque texture handle; 0 means "no texture"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const EMPTY: TextureHandle = TextureHandle(0);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Bits per channel of a node's output texture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Bpc {
    #[default]
    Rgba8,
    Rgba16,
}

impl Bpc {
    /// Map a property panel index (0 = 8 bit, 1 = 16 bit)
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Bpc::Rgba16,
            _ => Bpc::Rgba8,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Bpc::Rgba8 => 0,
            Bpc::Rgba16 => 1,
        }
    }
}

impl TryFrom<i32> for Bpc {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            gl::RGBA8 => Ok(Bpc::Rgba8),
            gl::RGBA16 => Ok(Bpc::Rgba16),
            other => Err(format!("unsupported bit depth format {:#x}", other)),
        }
    }
}

impl From<Bpc> for i32 {
    fn from(bpc: Bpc) -> i32 {
        match bpc {
            Bpc::Rgba8 => gl::RGBA8,
            Bpc::Rgba16 => gl::RGBA16,
        }
    }
}

/// Everything a texture operator needs to produce one node output
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub node: NodeId,
    pub type_id: NodeTypeId,
    pub params: &'a NodeParams,
    /// Fixed input values followed by additional input values
    pub inputs: Vec<TextureHandle>,
    pub resolution: UVec2,
    pub bpc: Bpc,
}

/// Per-node-type texture generator, implemented by the rendering backend
pub trait TextureOperator {
    /// Produce the output texture for a node
    fn render(&mut self, request: &RenderRequest<'_>) -> TextureHandle;

    /// Export a texture to disk
    fn save_texture(&mut self, texture: TextureHandle, path: &Path) -> Result<()>;
}

/// A record of one render call made to a [`SequentialOperator`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub node: NodeId,
    pub type_id: NodeTypeId,
    pub inputs: Vec<TextureHandle>,
    pub output: TextureHandle,
}

/// Headless operator that hands out a fresh handle for every render
///
/// Useful for tests and batch tools: every recomputation is observable as a
/// new handle, and the call log shows the evaluation order.
#[derive(Debug, Default)]
pub struct SequentialOperator {
    next: u32,
    renders: Vec<RenderRecord>,
    saved: Vec<(TextureHandle, PathBuf)>,
}

impl SequentialOperator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All render calls made so far, oldest first
    pub fn renders(&self) -> &[RenderRecord] {
        &self.renders
    }

    /// Textures exported through [`TextureOperator::save_texture`]
    pub fn saved(&self) -> &[(TextureHandle, PathBuf)] {
        &self.saved
    }
}

impl TextureOperator for SequentialOperator {
    fn render(&mut self, request: &RenderRequest<'_>) -> TextureHandle {
        self.next += 1;
        let output = TextureHandle(self.next);
        self.renders.push(RenderRecord {
            node: request.node,
            type_id: request.type_id,
            inputs: request.inputs.clone(),
            output,
        });
        output
    }

    fn save_texture(&mut self, texture: TextureHandle, path: &Path) -> Result<()> {
        self.saved.push((texture, path.to_path_buf()));
        Ok(())
    }
}
