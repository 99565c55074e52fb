//! Layout constants and fixed values shared by the graph and editor
//!
//! All lengths are in document units unless stated otherwise.

/// Node box layout
pub mod node {
    /// Width of a node box
    pub const WIDTH: f32 = 196.0;

    /// Height of a node box without additional inputs
    pub const HEIGHT: f32 = 207.0;

    /// Horizontal centre of input sockets
    pub const INPUT_SOCKET_X: f32 = 10.0;

    /// Horizontal centre of output sockets
    pub const OUTPUT_SOCKET_X: f32 = 186.0;

    /// Vertical centre of a lone fixed socket
    pub const SOCKET_CENTER_Y: f32 = 118.5;

    /// Distance between consecutive fixed sockets
    pub const SOCKET_SPACING: f32 = 42.0;

    /// Vertical centre of the first additional input
    pub const ADDITIONAL_SOCKET_START_Y: f32 = HEIGHT + 20.0;

    /// Distance between consecutive additional inputs
    pub const ADDITIONAL_SOCKET_SPACING: f32 = 28.0;

    /// Fraction of the node height where the header hit point sits
    pub const HEADER_POINT_RATIO: f32 = 0.16;
}

/// Frame layout
pub mod frame {
    /// Padding between a frame border and its content
    pub const MARGIN: f32 = 20.0;

    /// Height of the title band above the content
    pub const HEADER_HEIGHT: f32 = 30.0;

    /// Size of a frame created without content
    pub const DEFAULT_SIZE: [f32; 2] = [400.0, 300.0];

    /// Colour of a new frame
    pub const DEFAULT_COLOR: [f32; 3] = [0.35, 0.35, 0.4];

    /// Title of a new frame
    pub const DEFAULT_TITLE: &str = "Frame";
}

/// Edge curve sampling
pub mod edge {
    /// Number of segments used to approximate an edge curve
    pub const CURVE_SAMPLES: usize = 32;

    /// Minimum horizontal tangent length of an edge curve (device units)
    pub const MIN_TANGENT: f32 = 30.0;
}

/// Undo history
pub mod history {
    /// Merge id shared by consecutive frame resizes
    pub const RESIZE_FRAME_ID: u32 = 1;
}

/// GL internal formats used on disk for the bit depth field
pub mod gl {
    pub const RGBA8: i32 = 0x8058;
    pub const RGBA16: i32 = 0x805B;
}
