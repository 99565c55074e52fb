//! Edges - directed links from an output socket to an input socket

use super::socket::{SocketAddr, SocketId};
use crate::constants::edge::{CURVE_SAMPLES, MIN_TANGENT};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for an edge
pub type EdgeId = usize;

/// On-disk form of an edge, relinked through socket ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub start_socket: SocketId,
    pub end_socket: SocketId,
}

/// A connection between two sockets
///
/// The endpoints are addresses into the node arena; the edge itself owns
/// nothing. Cached endpoint positions are in device space.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    start: SocketAddr,
    end: SocketAddr,
    start_pos: Vec2,
    end_pos: Vec2,
    selected: bool,
}

impl Edge {
    pub fn new(id: EdgeId, start: SocketAddr, end: SocketAddr) -> Self {
        Self {
            id,
            start,
            end,
            start_pos: Vec2::ZERO,
            end_pos: Vec2::ZERO,
            selected: false,
        }
    }

    pub fn start_socket(&self) -> SocketAddr {
        self.start
    }

    pub fn end_socket(&self) -> SocketAddr {
        self.end
    }

    pub(crate) fn set_end_socket(&mut self, end: SocketAddr) {
        self.end = end;
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_pos
    }

    pub fn end_position(&self) -> Vec2 {
        self.end_pos
    }

    pub fn set_start_position(&mut self, pos: Vec2) {
        self.start_pos = pos;
    }

    pub fn set_end_position(&mut self, pos: Vec2) {
        self.end_pos = pos;
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Point on the edge curve at parameter t (0.0 to 1.0)
    pub fn curve_point(&self, t: f32) -> Vec2 {
        let tangent = ((self.end_pos.x - self.start_pos.x).abs() * 0.5).max(MIN_TANGENT);
        let p0 = self.start_pos;
        let p1 = self.start_pos + Vec2::new(tangent, 0.0);
        let p2 = self.end_pos - Vec2::new(tangent, 0.0);
        let p3 = self.end_pos;
        cubic_bezier_point(t, p0, p1, p2, p3)
    }

    /// Whether the edge curve passes through a device-space rectangle
    pub fn intersect_with(&self, min: Vec2, size: Vec2) -> bool {
        let max = min + size;
        (0..=CURVE_SAMPLES).any(|i| {
            let p = self.curve_point(i as f32 / CURVE_SAMPLES as f32);
            p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
        })
    }
}

/// Calculates a point on a cubic Bézier curve
fn cubic_bezier_point(t: f32, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}
