//! Per-kind node parameters
//!
//! Each node kind has a plain parameter struct. On disk the fields are
//! flattened into the node object with camelCase keys; anything missing
//! falls back to the values in [`super::defaults`].

use super::defaults::{
    default_gradient, FilterDefaults, MaterialDefaults, NoiseDefaults, TileDefaults,
};
use super::properties::{GradientStop, Property, PropertyValue};
use super::NodeTypeId;
use crate::error::{GraphError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseType {
    #[default]
    #[serde(rename = "perlinNoise")]
    Perlin,
    #[serde(rename = "simpleNoise")]
    Simple,
}

impl NoiseType {
    pub fn name(self) -> &'static str {
        match self {
            NoiseType::Perlin => "perlinNoise",
            NoiseType::Simple => "simpleNoise",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "perlinNoise" => Some(NoiseType::Perlin),
            "simpleNoise" => Some(NoiseType::Simple),
            _ => None,
        }
    }
}

/// Settings kept separately for each noise type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoiseSettings {
    pub scale: i32,
    pub scale_x: i32,
    pub scale_y: i32,
    pub layers: i32,
    pub persistence: f32,
    pub amplitude: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: NoiseDefaults::SCALE,
            scale_x: NoiseDefaults::SCALE_X,
            scale_y: NoiseDefaults::SCALE_Y,
            layers: NoiseDefaults::LAYERS,
            persistence: NoiseDefaults::PERSISTENCE,
            amplitude: NoiseDefaults::AMPLITUDE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoiseParams {
    pub noise_type: NoiseType,
    pub perlin: NoiseSettings,
    pub simple: NoiseSettings,
}

impl NoiseParams {
    /// Settings of the currently selected noise type
    pub fn active(&self) -> &NoiseSettings {
        match self.noise_type {
            NoiseType::Perlin => &self.perlin,
            NoiseType::Simple => &self.simple,
        }
    }

    pub fn active_mut(&mut self) -> &mut NoiseSettings {
        match self.noise_type {
            NoiseType::Perlin => &mut self.perlin,
            NoiseType::Simple => &mut self.simple,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MixParams {
    pub factor: f32,
    pub mode: i32,
}

impl Default for MixParams {
    fn default() -> Self {
        Self {
            factor: FilterDefaults::MIX_FACTOR,
            mode: FilterDefaults::MIX_MODE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParams {
    pub color: [f32; 3],
}

impl ColorParams {
    fn new(color: [f32; 3]) -> Self {
        Self { color }
    }
}

impl Default for ColorParams {
    fn default() -> Self {
        Self::new(FilterDefaults::COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalParams {
    pub metal: f32,
}

impl Default for MetalParams {
    fn default() -> Self {
        Self { metal: MaterialDefaults::METAL }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    pub height: f32,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self { height: MaterialDefaults::HEIGHT }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoughnessParams {
    pub rough: f32,
}

impl Default for RoughnessParams {
    fn default() -> Self {
        Self { rough: MaterialDefaults::ROUGH }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorRampParams {
    pub gradient_stops: Vec<GradientStop>,
}

impl Default for ColorRampParams {
    fn default() -> Self {
        Self { gradient_stops: default_gradient() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurParams {
    pub intensity: f32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self { intensity: FilterDefaults::BLUR_INTENSITY }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    pub threshold: f32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self { threshold: FilterDefaults::THRESHOLD }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpParams {
    pub intensity: f32,
    pub angle: f32,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            intensity: FilterDefaults::WARP_INTENSITY,
            angle: FilterDefaults::WARP_ANGLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformParams {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub clamp_coords: bool,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: 0.0,
            scale_x: FilterDefaults::TRANSFORM_SCALE,
            scale_y: FilterDefaults::TRANSFORM_SCALE,
            clamp_coords: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorParams {
    pub direction: i32,
}

impl Default for MirrorParams {
    fn default() -> Self {
        Self { direction: FilterDefaults::MIRROR_DIRECTION }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileParams {
    pub offset_x: f32,
    pub offset_y: f32,
    pub columns: i32,
    pub rows: i32,
    pub scale: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
    pub rand_position: f32,
    pub rand_rotation: f32,
    pub rand_scale: f32,
    pub mask_strength: f32,
    pub inputs_count: i32,
    pub seed: i32,
    pub keep_proportion: bool,
    pub use_alpha: bool,
    pub depth_mask: bool,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            offset_x: TileDefaults::OFFSET,
            offset_y: TileDefaults::OFFSET,
            columns: TileDefaults::COLUMNS,
            rows: TileDefaults::ROWS,
            scale: TileDefaults::SCALE,
            scale_x: TileDefaults::SCALE_AXIS,
            scale_y: TileDefaults::SCALE_AXIS,
            rotation: TileDefaults::ROTATION,
            rand_position: TileDefaults::RANDOM,
            rand_rotation: TileDefaults::RANDOM,
            rand_scale: TileDefaults::RANDOM,
            mask_strength: TileDefaults::MASK_STRENGTH,
            inputs_count: TileDefaults::INPUTS_COUNT,
            seed: TileDefaults::SEED,
            keep_proportion: false,
            use_alpha: true,
            depth_mask: false,
        }
    }
}

/// Parameters of a node, one variant per node kind
#[derive(Debug, Clone, PartialEq)]
pub enum NodeParams {
    Noise(NoiseParams),
    Mix(MixParams),
    Albedo(ColorParams),
    Metal(MetalParams),
    Normal,
    Color(ColorParams),
    ColorRamp(ColorRampParams),
    Inverse,
    Grayscale,
    Height(HeightParams),
    Roughness(RoughnessParams),
    Emission(ColorParams),
    Blur(BlurParams),
    Threshold(ThresholdParams),
    DirectionalWarp(WarpParams),
    Transform(TransformParams),
    Mirror(MirrorParams),
    Tile(TileParams),
}

impl NodeParams {
    /// Parameters a freshly created node of the given kind starts with
    pub fn default_for(type_id: NodeTypeId) -> Self {
        match type_id {
            NodeTypeId::Noise => NodeParams::Noise(NoiseParams::default()),
            NodeTypeId::Mix => NodeParams::Mix(MixParams::default()),
            NodeTypeId::Albedo => NodeParams::Albedo(ColorParams::new(MaterialDefaults::ALBEDO)),
            NodeTypeId::Metal => NodeParams::Metal(MetalParams::default()),
            NodeTypeId::Normal => NodeParams::Normal,
            NodeTypeId::Color => NodeParams::Color(ColorParams::default()),
            NodeTypeId::ColorRamp => NodeParams::ColorRamp(ColorRampParams::default()),
            NodeTypeId::Inverse => NodeParams::Inverse,
            NodeTypeId::Grayscale => NodeParams::Grayscale,
            NodeTypeId::Height => NodeParams::Height(HeightParams::default()),
            NodeTypeId::Roughness => NodeParams::Roughness(RoughnessParams::default()),
            NodeTypeId::Emission => {
                NodeParams::Emission(ColorParams::new(MaterialDefaults::EMISSION))
            }
            NodeTypeId::Blur => NodeParams::Blur(BlurParams::default()),
            NodeTypeId::Threshold => NodeParams::Threshold(ThresholdParams::default()),
            NodeTypeId::DirectionalWarp => NodeParams::DirectionalWarp(WarpParams::default()),
            NodeTypeId::Transform => NodeParams::Transform(TransformParams::default()),
            NodeTypeId::Mirror => NodeParams::Mirror(MirrorParams::default()),
            NodeTypeId::Tile => NodeParams::Tile(TileParams::default()),
        }
    }

    pub fn type_id(&self) -> NodeTypeId {
        match self {
            NodeParams::Noise(_) => NodeTypeId::Noise,
            NodeParams::Mix(_) => NodeTypeId::Mix,
            NodeParams::Albedo(_) => NodeTypeId::Albedo,
            NodeParams::Metal(_) => NodeTypeId::Metal,
            NodeParams::Normal => NodeTypeId::Normal,
            NodeParams::Color(_) => NodeTypeId::Color,
            NodeParams::ColorRamp(_) => NodeTypeId::ColorRamp,
            NodeParams::Inverse => NodeTypeId::Inverse,
            NodeParams::Grayscale => NodeTypeId::Grayscale,
            NodeParams::Height(_) => NodeTypeId::Height,
            NodeParams::Roughness(_) => NodeTypeId::Roughness,
            NodeParams::Emission(_) => NodeTypeId::Emission,
            NodeParams::Blur(_) => NodeTypeId::Blur,
            NodeParams::Threshold(_) => NodeTypeId::Threshold,
            NodeParams::DirectionalWarp(_) => NodeTypeId::DirectionalWarp,
            NodeParams::Transform(_) => NodeTypeId::Transform,
            NodeParams::Mirror(_) => NodeTypeId::Mirror,
            NodeParams::Tile(_) => NodeTypeId::Tile,
        }
    }

    /// Current value of a parameter, `None` if this kind has no such parameter
    pub fn get(&self, property: Property) -> Option<PropertyValue> {
        use PropertyValue::*;
        let value = match (self, property) {
            (NodeParams::Noise(p), Property::NoiseType) => Text(p.noise_type.name().to_string()),
            (NodeParams::Noise(p), Property::Scale) => Int(p.active().scale),
            (NodeParams::Noise(p), Property::ScaleX) => Int(p.active().scale_x),
            (NodeParams::Noise(p), Property::ScaleY) => Int(p.active().scale_y),
            (NodeParams::Noise(p), Property::Layers) => Int(p.active().layers),
            (NodeParams::Noise(p), Property::Persistence) => Float(p.active().persistence),
            (NodeParams::Noise(p), Property::Amplitude) => Float(p.active().amplitude),

            (NodeParams::Mix(p), Property::Factor) => Float(p.factor),
            (NodeParams::Mix(p), Property::MixMode) => Int(p.mode),

            (NodeParams::Albedo(p), Property::Color)
            | (NodeParams::Color(p), Property::Color)
            | (NodeParams::Emission(p), Property::Color) => Color(p.color),
            (NodeParams::Metal(p), Property::Metal) => Float(p.metal),
            (NodeParams::Height(p), Property::Height) => Float(p.height),
            (NodeParams::Roughness(p), Property::Rough) => Float(p.rough),

            (NodeParams::ColorRamp(p), Property::Stops) => Stops(p.gradient_stops.clone()),
            (NodeParams::Blur(p), Property::Intensity) => Float(p.intensity),
            (NodeParams::Threshold(p), Property::Threshold) => Float(p.threshold),
            (NodeParams::DirectionalWarp(p), Property::Intensity) => Float(p.intensity),
            (NodeParams::DirectionalWarp(p), Property::Angle) => Float(p.angle),

            (NodeParams::Transform(p), Property::TranslateX) => Float(p.translate_x),
            (NodeParams::Transform(p), Property::TranslateY) => Float(p.translate_y),
            (NodeParams::Transform(p), Property::Rotation) => Float(p.rotation),
            (NodeParams::Transform(p), Property::ScaleX) => Float(p.scale_x),
            (NodeParams::Transform(p), Property::ScaleY) => Float(p.scale_y),
            (NodeParams::Transform(p), Property::ClampCoords) => Bool(p.clamp_coords),
            (NodeParams::Mirror(p), Property::Direction) => Int(p.direction),

            (NodeParams::Tile(p), Property::OffsetX) => Float(p.offset_x),
            (NodeParams::Tile(p), Property::OffsetY) => Float(p.offset_y),
            (NodeParams::Tile(p), Property::Columns) => Int(p.columns),
            (NodeParams::Tile(p), Property::Rows) => Int(p.rows),
            (NodeParams::Tile(p), Property::Scale) => Float(p.scale),
            (NodeParams::Tile(p), Property::ScaleX) => Float(p.scale_x),
            (NodeParams::Tile(p), Property::ScaleY) => Float(p.scale_y),
            (NodeParams::Tile(p), Property::Rotation) => Float(p.rotation),
            (NodeParams::Tile(p), Property::RandPosition) => Float(p.rand_position),
            (NodeParams::Tile(p), Property::RandRotation) => Float(p.rand_rotation),
            (NodeParams::Tile(p), Property::RandScale) => Float(p.rand_scale),
            (NodeParams::Tile(p), Property::MaskStrength) => Float(p.mask_strength),
            (NodeParams::Tile(p), Property::InputsCount) => Int(p.inputs_count),
            (NodeParams::Tile(p), Property::Seed) => Int(p.seed),
            (NodeParams::Tile(p), Property::KeepProportion) => Bool(p.keep_proportion),
            (NodeParams::Tile(p), Property::UseAlpha) => Bool(p.use_alpha),
            (NodeParams::Tile(p), Property::DepthMask) => Bool(p.depth_mask),
            _ => return None,
        };
        Some(value)
    }

    /// Set a parameter, checking that this kind has it and the value type fits
    pub fn set(&mut self, property: Property, value: &PropertyValue) -> Result<()> {
        let v = value;
        let target = self.type_id();
        match (&mut *self, property) {
            (NodeParams::Noise(p), Property::NoiseType) => {
                let name = v.text(property)?;
                p.noise_type = NoiseType::from_name(name).ok_or(GraphError::PropertyType {
                    property,
                    expected: "noise type name",
                })?;
            }
            (NodeParams::Noise(p), Property::Scale) => p.active_mut().scale = v.int(property)?,
            (NodeParams::Noise(p), Property::ScaleX) => p.active_mut().scale_x = v.int(property)?,
            (NodeParams::Noise(p), Property::ScaleY) => p.active_mut().scale_y = v.int(property)?,
            (NodeParams::Noise(p), Property::Layers) => p.active_mut().layers = v.int(property)?,
            (NodeParams::Noise(p), Property::Persistence) => {
                p.active_mut().persistence = v.float(property)?
            }
            (NodeParams::Noise(p), Property::Amplitude) => {
                p.active_mut().amplitude = v.float(property)?
            }

            (NodeParams::Mix(p), Property::Factor) => p.factor = v.float(property)?,
            (NodeParams::Mix(p), Property::MixMode) => p.mode = v.int(property)?,

            (NodeParams::Albedo(p), Property::Color)
            | (NodeParams::Color(p), Property::Color)
            | (NodeParams::Emission(p), Property::Color) => p.color = v.color(property)?,
            (NodeParams::Metal(p), Property::Metal) => p.metal = v.float(property)?,
            (NodeParams::Height(p), Property::Height) => p.height = v.float(property)?,
            (NodeParams::Roughness(p), Property::Rough) => p.rough = v.float(property)?,

            (NodeParams::ColorRamp(p), Property::Stops) => {
                p.gradient_stops = v.stops(property)?.to_vec()
            }
            (NodeParams::Blur(p), Property::Intensity) => p.intensity = v.float(property)?,
            (NodeParams::Threshold(p), Property::Threshold) => p.threshold = v.float(property)?,
            (NodeParams::DirectionalWarp(p), Property::Intensity) => {
                p.intensity = v.float(property)?
            }
            (NodeParams::DirectionalWarp(p), Property::Angle) => p.angle = v.float(property)?,

            (NodeParams::Transform(p), Property::TranslateX) => p.translate_x = v.float(property)?,
            (NodeParams::Transform(p), Property::TranslateY) => p.translate_y = v.float(property)?,
            (NodeParams::Transform(p), Property::Rotation) => p.rotation = v.float(property)?,
            (NodeParams::Transform(p), Property::ScaleX) => p.scale_x = v.float(property)?,
            (NodeParams::Transform(p), Property::ScaleY) => p.scale_y = v.float(property)?,
            (NodeParams::Transform(p), Property::ClampCoords) => {
                p.clamp_coords = v.bool(property)?
            }
            (NodeParams::Mirror(p), Property::Direction) => p.direction = v.int(property)?,

            (NodeParams::Tile(p), Property::OffsetX) => p.offset_x = v.float(property)?,
            (NodeParams::Tile(p), Property::OffsetY) => p.offset_y = v.float(property)?,
            (NodeParams::Tile(p), Property::Columns) => p.columns = v.int(property)?,
            (NodeParams::Tile(p), Property::Rows) => p.rows = v.int(property)?,
            (NodeParams::Tile(p), Property::Scale) => p.scale = v.float(property)?,
            (NodeParams::Tile(p), Property::ScaleX) => p.scale_x = v.float(property)?,
            (NodeParams::Tile(p), Property::ScaleY) => p.scale_y = v.float(property)?,
            (NodeParams::Tile(p), Property::Rotation) => p.rotation = v.float(property)?,
            (NodeParams::Tile(p), Property::RandPosition) => p.rand_position = v.float(property)?,
            (NodeParams::Tile(p), Property::RandRotation) => p.rand_rotation = v.float(property)?,
            (NodeParams::Tile(p), Property::RandScale) => p.rand_scale = v.float(property)?,
            (NodeParams::Tile(p), Property::MaskStrength) => p.mask_strength = v.float(property)?,
            (NodeParams::Tile(p), Property::InputsCount) => {
                p.inputs_count = v.int(property)?.clamp(1, TileDefaults::MAX_INPUTS_COUNT)
            }
            (NodeParams::Tile(p), Property::Seed) => p.seed = v.int(property)?,
            (NodeParams::Tile(p), Property::KeepProportion) => {
                p.keep_proportion = v.bool(property)?
            }
            (NodeParams::Tile(p), Property::UseAlpha) => p.use_alpha = v.bool(property)?,
            (NodeParams::Tile(p), Property::DepthMask) => p.depth_mask = v.bool(property)?,
            _ => {
                return Err(GraphError::UnsupportedProperty {
                    property,
                    target: target.metadata().display_name.to_string(),
                })
            }
        }
        Ok(())
    }

    /// How many additional inputs are currently in use (Tile only)
    pub fn visible_additionals(&self) -> usize {
        match self {
            NodeParams::Tile(p) => (p.inputs_count - 1).max(0) as usize,
            _ => 0,
        }
    }

    /// Flattened on-disk fields
    pub fn to_json(&self) -> Result<Map<String, Value>> {
        let value = match self {
            NodeParams::Noise(p) => serde_json::to_value(p)?,
            NodeParams::Mix(p) => serde_json::to_value(p)?,
            NodeParams::Albedo(p) | NodeParams::Color(p) | NodeParams::Emission(p) => {
                serde_json::to_value(p)?
            }
            NodeParams::Metal(p) => serde_json::to_value(p)?,
            NodeParams::Height(p) => serde_json::to_value(p)?,
            NodeParams::Roughness(p) => serde_json::to_value(p)?,
            NodeParams::ColorRamp(p) => serde_json::to_value(p)?,
            NodeParams::Blur(p) => serde_json::to_value(p)?,
            NodeParams::Threshold(p) => serde_json::to_value(p)?,
            NodeParams::DirectionalWarp(p) => serde_json::to_value(p)?,
            NodeParams::Transform(p) => serde_json::to_value(p)?,
            NodeParams::Mirror(p) => serde_json::to_value(p)?,
            NodeParams::Tile(p) => serde_json::to_value(p)?,
            NodeParams::Normal | NodeParams::Inverse | NodeParams::Grayscale => {
                Value::Object(Map::new())
            }
        };
        match value {
            Value::Object(map) => Ok(map),
            other => Err(GraphError::Document(format!(
                "parameters did not serialize to an object: {}",
                other
            ))),
        }
    }

    /// Rebuild parameters of a given kind from flattened on-disk fields
    pub fn from_json(type_id: NodeTypeId, fields: &Map<String, Value>) -> Result<Self> {
        fn parse<T: DeserializeOwned>(fields: &Map<String, Value>) -> Result<T> {
            Ok(serde_json::from_value(Value::Object(fields.clone()))?)
        }

        let params = match type_id {
            NodeTypeId::Noise => NodeParams::Noise(parse(fields)?),
            NodeTypeId::Mix => NodeParams::Mix(parse(fields)?),
            NodeTypeId::Albedo => {
                NodeParams::Albedo(parse_color(fields, MaterialDefaults::ALBEDO)?)
            }
            NodeTypeId::Metal => NodeParams::Metal(parse(fields)?),
            NodeTypeId::Normal => NodeParams::Normal,
            NodeTypeId::Color => NodeParams::Color(parse(fields)?),
            NodeTypeId::ColorRamp => NodeParams::ColorRamp(parse(fields)?),
            NodeTypeId::Inverse => NodeParams::Inverse,
            NodeTypeId::Grayscale => NodeParams::Grayscale,
            NodeTypeId::Height => NodeParams::Height(parse(fields)?),
            NodeTypeId::Roughness => NodeParams::Roughness(parse(fields)?),
            NodeTypeId::Emission => {
                NodeParams::Emission(parse_color(fields, MaterialDefaults::EMISSION)?)
            }
            NodeTypeId::Blur => NodeParams::Blur(parse(fields)?),
            NodeTypeId::Threshold => NodeParams::Threshold(parse(fields)?),
            NodeTypeId::DirectionalWarp => NodeParams::DirectionalWarp(parse(fields)?),
            NodeTypeId::Transform => NodeParams::Transform(parse(fields)?),
            NodeTypeId::Mirror => NodeParams::Mirror(parse(fields)?),
            NodeTypeId::Tile => NodeParams::Tile(parse(fields)?),
        };
        Ok(params)
    }
}

/// Color nodes share one struct but not one default
fn parse_color(fields: &Map<String, Value>, default: [f32; 3]) -> Result<ColorParams> {
    match fields.get("color") {
        Some(color) => Ok(ColorParams::new(serde_json::from_value(color.clone())?)),
        None => Ok(ColorParams::new(default)),
    }
}
