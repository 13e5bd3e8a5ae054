//! Geometry descriptor for a regular grid of samples.

use crate::{Bounds2D, MeshError, MeshResult};
use serde::{Deserialize, Serialize};

/// Regular grid geometry.
///
/// Sample arrays that go with a frame are row-major with row 0 at the
/// maximum y (north) and column 0 at the minimum x (west).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// World coordinates of the grid's (min x, min y) corner node.
    pub origin: [f64; 2],
    /// Cell size along x and y.
    pub increment: [f64; 2],
    /// Number of nodes along x and y.
    pub count: [usize; 2],
    /// Counter-clockwise rotation in degrees around `rotation_center`.
    #[serde(rename = "rotDeg", default)]
    pub rotation_degrees: f64,
    /// Point to rotate around. Defaults to `origin`.
    #[serde(rename = "rotPoint", default, skip_serializing_if = "Option::is_none")]
    pub rotation_center: Option<[f64; 2]>,
}

impl Frame {
    /// Create an unrotated frame.
    pub fn new(origin: [f64; 2], increment: [f64; 2], count: [usize; 2]) -> Self {
        Self {
            origin,
            increment,
            count,
            rotation_degrees: 0.0,
            rotation_center: None,
        }
    }

    /// Set a counter-clockwise rotation, optionally around a point other than the origin.
    pub fn with_rotation(mut self, degrees: f64, center: Option<[f64; 2]>) -> Self {
        self.rotation_degrees = degrees;
        self.rotation_center = center;
        self
    }

    /// Parse a frame from its JSON layer description.
    pub fn from_json(s: &str) -> MeshResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn nx(&self) -> usize {
        self.count[0]
    }

    pub fn ny(&self) -> usize {
        self.count[1]
    }

    /// Number of grid nodes (`nx * ny`).
    pub fn node_count(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Number of grid cells (`(nx - 1) * (ny - 1)`), zero for degenerate frames.
    pub fn cell_count(&self) -> usize {
        self.nx().saturating_sub(1) * self.ny().saturating_sub(1)
    }

    /// The effective rotation center.
    pub fn rotation_center(&self) -> [f64; 2] {
        self.rotation_center.unwrap_or(self.origin)
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees != 0.0
    }

    /// Check that the frame describes a grid that can be triangulated.
    pub fn validate(&self) -> MeshResult<()> {
        let (nx, ny) = (self.nx(), self.ny());
        if nx < 2 || ny < 2 {
            return Err(MeshError::EmptyGrid { nx, ny });
        }

        let [dx, dy] = self.increment;
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(MeshError::invalid_frame(format!(
                "increment must be finite and > 0, got ({}, {})",
                dx, dy
            )));
        }

        if !(self.origin[0].is_finite() && self.origin[1].is_finite()) {
            return Err(MeshError::invalid_frame("origin must be finite"));
        }

        if !self.rotation_degrees.is_finite() {
            return Err(MeshError::invalid_frame("rotation must be finite"));
        }

        // Vertex indices are emitted as u32.
        if nx.checked_mul(ny).map_or(true, |n| n > u32::MAX as usize) {
            return Err(MeshError::invalid_frame(format!(
                "{} x {} nodes exceeds the u32 index range",
                nx, ny
            )));
        }

        Ok(())
    }

    /// World (x, y) of the node at `col`, `row` (row 0 = maximum y).
    #[inline]
    pub fn node_xy(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin[0] + col as f64 * self.increment[0];
        let y = self.origin[1] + (self.ny() - 1 - row) as f64 * self.increment[1];
        (x, y)
    }

    /// Unrotated extent of the node footprint.
    pub fn footprint(&self) -> Bounds2D {
        let [ox, oy] = self.origin;
        let width = self.increment[0] * self.nx().saturating_sub(1) as f64;
        let height = self.increment[1] * self.ny().saturating_sub(1) as f64;
        Bounds2D::new(ox, oy, ox + width, oy + height)
    }
}

/// Sign convention for turning sample heights into position z.
///
/// Serialized as the boolean `zIncreasingDownwards` flag used by layer
/// descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum HeightConvention {
    /// Heights are depths: z = -height.
    #[default]
    IncreasingDownwards,
    /// Heights are elevations: z = height.
    IncreasingUpwards,
}

impl HeightConvention {
    /// Multiplier applied to a height to obtain position z.
    #[inline]
    pub fn z_sign(self) -> f32 {
        match self {
            HeightConvention::IncreasingDownwards => -1.0,
            HeightConvention::IncreasingUpwards => 1.0,
        }
    }

    #[inline]
    pub fn to_z(self, height: f32) -> f32 {
        height * self.z_sign()
    }
}

impl From<bool> for HeightConvention {
    fn from(z_increasing_downwards: bool) -> Self {
        if z_increasing_downwards {
            HeightConvention::IncreasingDownwards
        } else {
            HeightConvention::IncreasingUpwards
        }
    }
}

impl From<HeightConvention> for bool {
    fn from(convention: HeightConvention) -> Self {
        convention == HeightConvention::IncreasingDownwards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_xy_rows_run_north_to_south() {
        let frame = Frame::new([100.0, 200.0], [10.0, 5.0], [3, 4]);
        assert_eq!(frame.node_xy(0, 0), (100.0, 215.0));
        assert_eq!(frame.node_xy(2, 3), (120.0, 200.0));
    }

    #[test]
    fn test_counts() {
        let frame = Frame::new([0.0, 0.0], [1.0, 1.0], [4, 3]);
        assert_eq!(frame.node_count(), 12);
        assert_eq!(frame.cell_count(), 6);

        let degenerate = Frame::new([0.0, 0.0], [1.0, 1.0], [0, 3]);
        assert_eq!(degenerate.cell_count(), 0);
    }

    #[test]
    fn test_validate_empty_grid() {
        let frame = Frame::new([0.0, 0.0], [1.0, 1.0], [1, 5]);
        assert!(matches!(
            frame.validate(),
            Err(MeshError::EmptyGrid { nx: 1, ny: 5 })
        ));
    }

    #[test]
    fn test_validate_increment() {
        let frame = Frame::new([0.0, 0.0], [0.0, 1.0], [2, 2]);
        assert!(matches!(frame.validate(), Err(MeshError::InvalidFrame(_))));

        let frame = Frame::new([0.0, 0.0], [1.0, f64::NAN], [2, 2]);
        assert!(matches!(frame.validate(), Err(MeshError::InvalidFrame(_))));
    }

    #[test]
    fn test_height_convention() {
        assert_eq!(HeightConvention::default().to_z(10.0), -10.0);
        assert_eq!(HeightConvention::IncreasingUpwards.to_z(10.0), 10.0);
        assert_eq!(HeightConvention::from(false), HeightConvention::IncreasingUpwards);
        assert!(bool::from(HeightConvention::IncreasingDownwards));
    }
}
