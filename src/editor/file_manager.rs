//! File management for texture graphs
//!
//! Handles saving, loading, and file state management for scenes.

use super::viewport::ViewTransform;
use super::Scene;
use crate::error::Result;
use crate::nodes::{EdgeRecord, FrameRecord, NodeRecord, TextureOperator};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version
pub const FORMAT_VERSION: &str = "1.0";

/// A scene's structural content
///
/// Nodes are listed in arena order; frames refer to them by index and edges
/// by socket id, so the document carries no runtime ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub view: ViewTransform,
}

/// Save file data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: String,
    pub metadata: SaveMetadata,
    pub document: SceneDocument,
}

/// Metadata for save files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub created: chrono::DateTime<chrono::Utc>,
    pub modified: chrono::DateTime<chrono::Utc>,
    pub creator: String,
    #[serde(default)]
    pub description: String,
}

/// Tracks the file a scene belongs to and whether it has unsaved edits
#[derive(Debug, Default)]
pub struct FileManager {
    /// Current file path (None if unsaved/new file)
    current_file_path: Option<PathBuf>,
    /// Creation time of the current file, kept across saves
    created: Option<chrono::DateTime<chrono::Utc>>,
    is_modified: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_file_path(&self) -> Option<&Path> {
        self.current_file_path.as_deref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.is_modified
    }

    pub fn mark_modified(&mut self) {
        self.is_modified = true;
    }

    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    /// File name for a title bar, with `*` when there are unsaved edits
    pub fn file_display_name(&self) -> String {
        let name = self
            .current_file_path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled");
        if self.is_modified {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    /// Forget the current file
    pub fn new_file(&mut self) {
        self.current_file_path = None;
        self.created = None;
        self.is_modified = false;
    }

    /// Write a scene to a file as pretty JSON
    pub fn save_to_file<O: TextureOperator>(&mut self, file_path: &Path, scene: &Scene<O>) -> Result<()> {
        let now = chrono::Utc::now();
        let created = match (&self.current_file_path, self.created) {
            (Some(path), Some(created)) if path == file_path => created,
            _ => now,
        };
        let save_data = SaveData {
            version: FORMAT_VERSION.to_string(),
            metadata: SaveMetadata {
                created,
                modified: now,
                creator: format!("texnode {}", env!("CARGO_PKG_VERSION")),
                description: String::new(),
            },
            document: scene.save_document()?,
        };

        let json_content = serde_json::to_string_pretty(&save_data)?;
        std::fs::write(file_path, json_content)?;
        info!("Saved scene to {}", file_path.display());

        self.current_file_path = Some(file_path.to_path_buf());
        self.created = Some(created);
        self.is_modified = false;
        Ok(())
    }

    /// Replace a scene's content with a file's
    pub fn load_from_file<O: TextureOperator>(&mut self, file_path: &Path, scene: &mut Scene<O>) -> Result<()> {
        let file_content = std::fs::read_to_string(file_path)?;
        let save_data: SaveData = serde_json::from_str(&file_content)?;
        if save_data.version != FORMAT_VERSION {
            log::warn!(
                "{} was written with format {}, reading as {}",
                file_path.display(),
                save_data.version,
                FORMAT_VERSION
            );
        }
        scene.load_document(&save_data.document)?;
        info!("Loaded scene from {}", file_path.display());

        self.current_file_path = Some(file_path.to_path_buf());
        self.created = Some(save_data.metadata.created);
        self.is_modified = false;
        Ok(())
    }
}
