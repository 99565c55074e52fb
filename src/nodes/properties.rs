//! Typed property surface shared by nodes, frames and the undo history

use crate::error::{GraphError, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Every property a user can edit through a property panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    // Shared node settings
    Resolution,
    Bpc,
    // Frame settings
    Title,
    Color,
    // Noise
    NoiseType,
    Scale,
    ScaleX,
    ScaleY,
    Layers,
    Persistence,
    Amplitude,
    // Mix
    Factor,
    MixMode,
    // Material outputs
    Metal,
    Height,
    Rough,
    // Color ramp
    Stops,
    // Filters
    Intensity,
    Threshold,
    Angle,
    TranslateX,
    TranslateY,
    Rotation,
    ClampCoords,
    Direction,
    // Tile
    OffsetX,
    OffsetY,
    Columns,
    Rows,
    RandPosition,
    RandRotation,
    RandScale,
    MaskStrength,
    InputsCount,
    Seed,
    KeepProportion,
    UseAlpha,
    DepthMask,
}

/// One stop of a color ramp, stored on disk as `[r, g, b, position]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct GradientStop {
    pub color: [f32; 3],
    pub position: f32,
}

impl GradientStop {
    pub fn new(color: [f32; 3], position: f32) -> Self {
        Self { color, position }
    }
}

impl From<[f32; 4]> for GradientStop {
    fn from(v: [f32; 4]) -> Self {
        Self {
            color: [v[0], v[1], v[2]],
            position: v[3],
        }
    }
}

impl From<GradientStop> for [f32; 4] {
    fn from(stop: GradientStop) -> Self {
        [stop.color[0], stop.color[1], stop.color[2], stop.position]
    }
}

/// Tagged property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Text(String),
    Color([f32; 3]),
    Vec2(Vec2),
    Stops(Vec<GradientStop>),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Float(_) => "float",
            PropertyValue::Int(_) => "int",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Text(_) => "text",
            PropertyValue::Color(_) => "color",
            PropertyValue::Vec2(_) => "vec2",
            PropertyValue::Stops(_) => "stops",
        }
    }

    /// Read a float; integers are widened
    pub fn float(&self, property: Property) -> Result<f32> {
        match self {
            PropertyValue::Float(v) => Ok(*v),
            PropertyValue::Int(v) => Ok(*v as f32),
            _ => Err(mismatch(property, "float")),
        }
    }

    pub fn int(&self, property: Property) -> Result<i32> {
        match self {
            PropertyValue::Int(v) => Ok(*v),
            _ => Err(mismatch(property, "int")),
        }
    }

    pub fn bool(&self, property: Property) -> Result<bool> {
        match self {
            PropertyValue::Bool(v) => Ok(*v),
            _ => Err(mismatch(property, "bool")),
        }
    }

    pub fn text(&self, property: Property) -> Result<&str> {
        match self {
            PropertyValue::Text(v) => Ok(v),
            _ => Err(mismatch(property, "text")),
        }
    }

    pub fn color(&self, property: Property) -> Result<[f32; 3]> {
        match self {
            PropertyValue::Color(v) => Ok(*v),
            _ => Err(mismatch(property, "color")),
        }
    }

    pub fn vec2(&self, property: Property) -> Result<Vec2> {
        match self {
            PropertyValue::Vec2(v) => Ok(*v),
            _ => Err(mismatch(property, "vec2")),
        }
    }

    pub fn stops(&self, property: Property) -> Result<&[GradientStop]> {
        match self {
            PropertyValue::Stops(v) => Ok(v),
            _ => Err(mismatch(property, "stops")),
        }
    }
}

fn mismatch(property: Property, expected: &'static str) -> GraphError {
    GraphError::PropertyType { property, expected }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_stop_disk_form() {
        let stop = GradientStop::new([1.0, 0.5, 0.0], 0.25);
        let json = serde_json::to_string(&stop).unwrap();
        assert_eq!(json, "[1.0,0.5,0.0,0.25]");
        let back: GradientStop = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stop);
    }

    #[test]
    fn test_accessors_check_type() {
        assert_eq!(PropertyValue::Int(3).float(Property::Scale).unwrap(), 3.0);
        assert!(PropertyValue::Bool(true).float(Property::Scale).is_err());
        assert!(matches!(
            PropertyValue::Float(1.0).int(Property::Columns),
            Err(GraphError::PropertyType { property: Property::Columns, expected: "int" })
        ));
    }
}
