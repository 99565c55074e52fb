//! Editor configuration
//!
//! Runtime-tunable values with sensible defaults. A configuration can be
//! loaded from JSON; any field left out keeps its default.

use crate::error::Result;
use crate::nodes::Bpc;
use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Texture size given to newly created nodes
    pub default_resolution: UVec2,
    /// Bit depth given to newly created nodes
    pub default_bpc: Bpc,
    /// Document-space offset applied by duplicate
    pub duplicate_offset: Vec2,
    /// Device-space radius used when hit-testing sockets
    pub socket_hit_radius: f32,
    pub min_view_scale: f32,
    pub max_view_scale: f32,
    /// Maximum number of undo steps kept, 0 keeps everything
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_resolution: UVec2::new(1024, 1024),
            default_bpc: Bpc::Rgba8,
            duplicate_offset: Vec2::new(50.0, 50.0),
            socket_hit_radius: 12.0,
            min_view_scale: 0.1,
            max_view_scale: 5.0,
            undo_limit: 0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::info!("Loaded editor configuration from {}", path.display());
        Ok(config)
    }

    /// Clamp a view scale into the configured range
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_view_scale, self.max_view_scale)
    }
}
