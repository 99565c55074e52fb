//! View transform for pan/zoom operations

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maps document space to device space: `device = doc * scale - pan`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub pan: Vec2,
    pub scale: f32,
}

impl ViewTransform {
    pub fn new(pan: Vec2, scale: f32) -> Self {
        Self { pan, scale }
    }

    /// Convert document coordinates to device coordinates
    pub fn to_device(&self, doc: Vec2) -> Vec2 {
        doc * self.scale - self.pan
    }

    /// Convert device coordinates to document coordinates
    pub fn to_document(&self, device: Vec2) -> Vec2 {
        (device + self.pan) / self.scale
    }

    /// Scale a document-space length into device space
    pub fn to_device_len(&self, len: Vec2) -> Vec2 {
        len * self.scale
    }

    /// Apply pan offset
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom by a factor, keeping a device point stationary
    pub fn zoom_at(&mut self, device_point: Vec2, factor: f32, min_scale: f32, max_scale: f32) {
        let anchor = self.to_document(device_point);
        self.scale = (self.scale * factor).clamp(min_scale, max_scale);
        self.pan = anchor * self.scale - device_point;
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}
