//! Per-node surface normal estimation from the four axis-aligned neighbours.
//!
//! The normal at a node is the normalized mean of up to four quadrant
//! normals. Each quadrant is bounded by two adjacent neighbours and
//! contributes the cross product of their edge vectors, taken
//! counter-clockwise (seen from +z) so a level surface yields (0, 0, 1):
//!
//! ```text
//!             north (row - 1)
//!                  |
//!   west (col - 1) - c - east (col + 1)
//!                  |
//!             south (row + 1)
//! ```
//!
//! Missing neighbours drop their two quadrants. An inactive centre, or no
//! usable quadrant at all, yields the zero vector, which renderers read as
//! "no normal, shade per triangle".

use crate::activity::NodeActivity;
use mesh_common::{Frame, HeightConvention};
use nalgebra::Vector3;

/// Normal reported when none can be estimated.
pub const NO_NORMAL: [f32; 3] = [0.0, 0.0, 0.0];

/// Normal written for every node when smooth shading is off. Flat shading
/// is derived from triangle winding by the renderer, so this is only a
/// placeholder.
pub const FLAT_PLACEHOLDER: [f32; 3] = [1.0, 1.0, 1.0];

/// Summed quadrant normals shorter than this are treated as degenerate.
const MIN_NORMAL_LENGTH: f64 = 1e-12;

/// Read access to node positions and activity needed for normal estimation.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceGrid<'a> {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    heights: Option<&'a [f32]>,
    activity: NodeActivity<'a>,
    convention: HeightConvention,
}

impl<'a> SurfaceGrid<'a> {
    pub fn new(
        frame: &Frame,
        heights: Option<&'a [f32]>,
        activity: NodeActivity<'a>,
        convention: HeightConvention,
    ) -> Self {
        Self {
            nx: frame.nx(),
            ny: frame.ny(),
            dx: frame.increment[0],
            dy: frame.increment[1],
            heights,
            activity,
            convention,
        }
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        row * self.nx + col
    }

    /// Position z of node `index`, with the height convention applied.
    #[inline]
    pub fn z(&self, index: usize) -> f32 {
        match self.heights {
            Some(h) => self.convention.to_z(h[index]),
            None => 0.0,
        }
    }

    /// Whether node (`col`, `row`) lies inside the grid and is active.
    #[inline]
    pub fn is_active(&self, col: isize, row: isize) -> bool {
        col >= 0
            && row >= 0
            && (col as usize) < self.nx
            && (row as usize) < self.ny
            && self.activity.is_active(self.index(col as usize, row as usize))
    }

    /// Edge vector from the node at (`col`, `row`) to its neighbour at
    /// (`col + dc`, `row + dr`), or `None` if the neighbour is missing.
    #[inline]
    fn edge(&self, col: usize, row: usize, dc: isize, dr: isize, z0: f64) -> Option<Vector3<f64>> {
        let (c, r) = (col as isize + dc, row as isize + dr);
        if !self.is_active(c, r) {
            return None;
        }
        let z = self.z(self.index(c as usize, r as usize)) as f64;
        // Rows increase southwards, so a positive row step is a negative y step.
        Some(Vector3::new(
            dc as f64 * self.dx,
            -(dr as f64) * self.dy,
            z - z0,
        ))
    }
}

/// Estimate the unit normal at node (`col`, `row`).
pub fn estimate_normal(grid: &SurfaceGrid<'_>, col: usize, row: usize) -> [f32; 3] {
    if !grid.is_active(col as isize, row as isize) {
        return NO_NORMAL;
    }
    let z0 = grid.z(grid.index(col, row)) as f64;

    let east = grid.edge(col, row, 1, 0, z0);
    let north = grid.edge(col, row, 0, -1, z0);
    let west = grid.edge(col, row, -1, 0, z0);
    let south = grid.edge(col, row, 0, 1, z0);

    let quadrants = [(east, north), (north, west), (west, south), (south, east)];

    let mut sum = Vector3::zeros();
    let mut count = 0;
    for (a, b) in quadrants {
        if let (Some(a), Some(b)) = (a, b) {
            sum += a.cross(&b);
            count += 1;
        }
    }

    if count == 0 {
        return NO_NORMAL;
    }

    let length = sum.norm();
    if length < MIN_NORMAL_LENGTH {
        return NO_NORMAL;
    }
    let n = sum / length;
    [n.x as f32, n.y as f32, n.z as f32]
}

/// Normal estimation honouring the smooth-shading switch.
#[derive(Debug, Clone, Copy)]
pub struct NormalEstimator {
    smooth_shading: bool,
}

impl NormalEstimator {
    pub fn new(smooth_shading: bool) -> Self {
        Self { smooth_shading }
    }

    #[inline]
    pub fn estimate(&self, grid: &SurfaceGrid<'_>, col: usize, row: usize) -> [f32; 3] {
        if !self.smooth_shading {
            return FLAT_PLACEHOLDER;
        }
        estimate_normal(grid, col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(nx: usize, ny: usize) -> Frame {
        Frame::new([0.0, 0.0], [1.0, 1.0], [nx, ny])
    }

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_flat_surface_points_up() {
        let f = frame(3, 3);
        let heights = [5.0f32; 9];
        let props = [0.0f32; 9];
        let grid = SurfaceGrid::new(
            &f,
            Some(&heights[..]),
            NodeActivity::node_aligned(Some(&heights[..]), &props),
            HeightConvention::IncreasingDownwards,
        );
        for row in 0..3 {
            for col in 0..3 {
                assert!(approx(estimate_normal(&grid, col, row), [0.0, 0.0, 1.0]));
            }
        }
    }

    #[test]
    fn test_slope_tilts_against_gradient() {
        // Elevation rising eastwards: the normal leans west.
        let f = frame(3, 3);
        let heights = [0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let props = [0.0f32; 9];
        let grid = SurfaceGrid::new(
            &f,
            Some(&heights[..]),
            NodeActivity::node_aligned(Some(&heights[..]), &props),
            HeightConvention::IncreasingUpwards,
        );
        let n = estimate_normal(&grid, 1, 1);
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(n, [-s, 0.0, s]), "got {:?}", n);
    }

    #[test]
    fn test_rows_run_southwards() {
        // Row 0 is north; elevation rising northwards leans the normal south.
        let f = frame(3, 3);
        let heights = [2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let props = [0.0f32; 9];
        let grid = SurfaceGrid::new(
            &f,
            Some(&heights[..]),
            NodeActivity::node_aligned(Some(&heights[..]), &props),
            HeightConvention::IncreasingUpwards,
        );
        let n = estimate_normal(&grid, 1, 1);
        assert!(n[1] < 0.0 && n[2] > 0.0, "got {:?}", n);
    }

    #[test]
    fn test_inactive_center_has_no_normal() {
        let f = frame(2, 2);
        let heights = [f32::NAN, 0.0, 0.0, 0.0];
        let props = [0.0f32; 4];
        let grid = SurfaceGrid::new(
            &f,
            Some(&heights[..]),
            NodeActivity::node_aligned(Some(&heights[..]), &props),
            HeightConvention::default(),
        );
        assert_eq!(estimate_normal(&grid, 0, 0), NO_NORMAL);
    }

    #[test]
    fn test_isolated_node_has_no_normal() {
        let f = frame(3, 3);
        let nan = f32::NAN;
        let props = [nan, nan, nan, nan, 1.0, nan, nan, nan, nan];
        let grid = SurfaceGrid::new(
            &f,
            None,
            NodeActivity::node_aligned(None, &props),
            HeightConvention::default(),
        );
        let n = estimate_normal(&grid, 1, 1);
        assert_eq!(n, NO_NORMAL);
        assert!(n.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_opposite_neighbours_only_has_no_normal() {
        // West and east present, north and south missing: no quadrant closes.
        let f = frame(3, 3);
        let nan = f32::NAN;
        let props = [nan, nan, nan, 1.0, 1.0, 1.0, nan, nan, nan];
        let grid = SurfaceGrid::new(
            &f,
            None,
            NodeActivity::node_aligned(None, &props),
            HeightConvention::default(),
        );
        assert_eq!(estimate_normal(&grid, 1, 1), NO_NORMAL);
    }

    #[test]
    fn test_corner_uses_single_quadrant() {
        let f = frame(2, 2);
        let heights = [0.0f32; 4];
        let props = [0.0f32; 4];
        let grid = SurfaceGrid::new(
            &f,
            Some(&heights[..]),
            NodeActivity::node_aligned(Some(&heights[..]), &props),
            HeightConvention::default(),
        );
        assert!(approx(estimate_normal(&grid, 1, 1), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_smooth_shading_off_uses_placeholder() {
        let f = frame(2, 2);
        let props = [0.0f32; 4];
        let grid = SurfaceGrid::new(
            &f,
            None,
            NodeActivity::node_aligned(None, &props),
            HeightConvention::default(),
        );
        assert_eq!(NormalEstimator::new(false).estimate(&grid, 0, 0), FLAT_PLACEHOLDER);
        assert!(approx(
            NormalEstimator::new(true).estimate(&grid, 0, 0),
            [0.0, 0.0, 1.0]
        ));
    }
}
