//! Default parameter values for nodes
//!
//! This module centralizes the values a freshly created node starts with,
//! so the factory, deserialization and the parameter structs agree.

/// Defaults for the noise generator
pub struct NoiseDefaults;

impl NoiseDefaults {
    pub const TYPE: &'static str = "perlinNoise";
    pub const SCALE: i32 = 5;
    pub const SCALE_X: i32 = 1;
    pub const SCALE_Y: i32 = 1;
    pub const LAYERS: i32 = 8;
    pub const PERSISTENCE: f32 = 0.5;
    pub const AMPLITUDE: f32 = 1.0;
}

/// Defaults for the material output nodes
pub struct MaterialDefaults;

impl MaterialDefaults {
    pub const ALBEDO: [f32; 3] = [1.0, 1.0, 1.0];
    pub const EMISSION: [f32; 3] = [0.0, 0.0, 0.0];
    pub const METAL: f32 = 0.0;
    pub const ROUGH: f32 = 0.2;
    pub const HEIGHT: f32 = 0.1;
}

/// Defaults for the filter nodes
pub struct FilterDefaults;

impl FilterDefaults {
    pub const COLOR: [f32; 3] = [1.0, 1.0, 1.0];
    pub const MIX_FACTOR: f32 = 0.5;
    pub const MIX_MODE: i32 = 0;
    pub const BLUR_INTENSITY: f32 = 0.5;
    pub const THRESHOLD: f32 = 0.5;
    pub const WARP_INTENSITY: f32 = 0.1;
    pub const WARP_ANGLE: f32 = 0.0;
    pub const TRANSFORM_SCALE: f32 = 1.0;
    pub const MIRROR_DIRECTION: i32 = 0;
}

/// Defaults for the tile node
pub struct TileDefaults;

impl TileDefaults {
    pub const OFFSET: f32 = 0.0;
    pub const COLUMNS: i32 = 5;
    pub const ROWS: i32 = 5;
    pub const SCALE: f32 = 80.0;
    pub const SCALE_AXIS: f32 = 1.0;
    pub const ROTATION: f32 = 0.0;
    pub const RANDOM: f32 = 0.0;
    pub const MASK_STRENGTH: f32 = 0.0;
    pub const INPUTS_COUNT: i32 = 1;
    pub const MAX_INPUTS_COUNT: i32 = 6;
    pub const SEED: i32 = 1;
}

/// Black to white, the ramp every new color ramp starts with
pub fn default_gradient() -> Vec<super::GradientStop> {
    vec![
        super::GradientStop::new([0.0, 0.0, 0.0], 0.0),
        super::GradientStop::new([1.0, 1.0, 1.0], 1.0),
    ]
}
