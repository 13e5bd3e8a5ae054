//! Common test fixtures for the grid mesh workspace.
//!
//! Pre-defined frames and viewport sizes that represent common scenarios.

use mesh_common::Frame;

/// A frame of `n x n` nodes with unit spacing at the origin.
pub fn square_frame(n: usize) -> Frame {
    Frame::new([0.0, 0.0], [1.0, 1.0], [n, n])
}

/// A frame with unit spacing at the origin.
pub fn unit_frame(nx: usize, ny: usize) -> Frame {
    Frame::new([0.0, 0.0], [1.0, 1.0], [nx, ny])
}

/// A frame with a projected-looking origin and 25 m spacing, rotated 30°
/// about its first node.
pub fn rotated_frame(nx: usize, ny: usize) -> Frame {
    Frame::new([456_000.0, 6_780_000.0], [25.0, 25.0], [nx, ny]).with_rotation(30.0, None)
}

/// A frame description as it arrives from a layer JSON document.
pub const FRAME_JSON: &str = r#"{
    "origin": [1000.0, 2000.0],
    "increment": [50.0, 25.0],
    "count": [4, 3],
    "rotDeg": 0.0
}"#;

/// Common viewport sizes for fit tests, in pixels (width, height).
pub mod viewports {
    /// A typical desktop canvas.
    pub const DESKTOP: (f64, f64) = (1600.0, 900.0);

    /// Square canvas.
    pub const SQUARE: (f64, f64) = (800.0, 800.0);

    /// Portrait phone canvas.
    pub const PORTRAIT: (f64, f64) = (390.0, 844.0);

    /// Zero-sized canvas (not yet laid out).
    pub const EMPTY: (f64, f64) = (0.0, 0.0);
}

/// Grid sizes used by benches.
pub mod sizes {
    /// A realistic layer grid.
    pub const MEDIUM: usize = 256;

    /// A large layer grid.
    pub const LARGE: usize = 1024;
}
