//! Grid triangulation.
//!
//! Each cell is bounded by four nodes, named after their position in the
//! north-up grid:
//!
//! ```text
//!   i0 (NW) ---- i1 (NE)        i0 = row * nx + col
//!    |            |             i1 = row * nx + col + 1
//!    |            |             i2 = (row + 1) * nx + col + 1
//!   i3 (SW) ---- i2 (SE)        i3 = (row + 1) * nx + col
//! ```
//!
//! The NE-SW diagonal (i1-i3) is preferred whenever both its ends are
//! active; only otherwise is the NW-SE diagonal (i0-i2) tried. The last
//! index of every triangle is its provoking vertex.
//!
//! Node-aligned properties share one vertex per node. Cell-aligned
//! properties duplicate vertices per triangle so every cell can be flat
//! coloured with its own value.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::activity::{is_defined, LayoutMode, NodeActivity};
use crate::config::MeshOptions;
use crate::mesh::Mesh;
use crate::normals::{NormalEstimator, SurfaceGrid};
use crate::range::value_range;
use mesh_common::{Frame, MeshError, MeshResult};

/// How a cell is split into triangles, given its active corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSplit {
    /// Fewer than three usable corners.
    Empty,
    /// Split along i1-i3; `nw` emits (i1, i3, i0) and `se` emits (i1, i3, i2).
    NeSw { nw: bool, se: bool },
    /// Split along i0-i2; `ne` emits (i1, i2, i0) and `sw` emits (i3, i0, i2).
    NwSe { ne: bool, sw: bool },
}

impl CellSplit {
    /// Choose the split for corner activity `[i0, i1, i2, i3]`.
    pub fn classify(active: [bool; 4]) -> Self {
        let [a0, a1, a2, a3] = active;
        if a1 && a3 {
            if a0 || a2 {
                return CellSplit::NeSw { nw: a0, se: a2 };
            }
        } else if a0 && a2 && (a1 || a3) {
            return CellSplit::NwSe { ne: a1, sw: a3 };
        }
        CellSplit::Empty
    }

    pub fn triangle_count(self) -> usize {
        match self {
            CellSplit::Empty => 0,
            CellSplit::NeSw { nw, se } => nw as usize + se as usize,
            CellSplit::NwSe { ne, sw } => ne as usize + sw as usize,
        }
    }

    /// Visit the cell's triangles. The callback receives the triangle and
    /// the slot (0..3) of the corner opposite the diagonal.
    #[inline]
    pub fn for_each_triangle(self, corners: [u32; 4], mut f: impl FnMut([u32; 3], usize)) {
        let [i0, i1, i2, i3] = corners;
        match self {
            CellSplit::Empty => {}
            CellSplit::NeSw { nw, se } => {
                if nw {
                    f([i1, i3, i0], 2);
                }
                if se {
                    f([i1, i3, i2], 2);
                }
            }
            CellSplit::NwSe { ne, sw } => {
                if ne {
                    f([i1, i2, i0], 0);
                }
                if sw {
                    f([i3, i0, i2], 0);
                }
            }
        }
    }

    /// The diagonal, when it lies on the outline of the emitted geometry
    /// (exactly one triangle in the cell).
    pub fn outline_diagonal(self, corners: [u32; 4]) -> Option<[u32; 2]> {
        if self.triangle_count() != 1 {
            return None;
        }
        let [i0, i1, i2, i3] = corners;
        match self {
            CellSplit::NeSw { .. } => Some([i1, i3]),
            CellSplit::NwSe { .. } => Some([i0, i2]),
            CellSplit::Empty => None,
        }
    }
}

/// Cell-aligned meshes duplicate three vertices per triangle, so up to six
/// per cell must stay addressable by a `u32` index.
fn check_index_range(frame: &Frame, layout: LayoutMode) -> MeshResult<()> {
    if layout != LayoutMode::CellAligned {
        return Ok(());
    }
    let max_vertices = frame.cell_count().checked_mul(6);
    if max_vertices.map_or(true, |n| n > u32::MAX as usize) {
        return Err(MeshError::invalid_frame(format!(
            "{} cells need more than u32::MAX duplicated vertices",
            frame.cell_count()
        )));
    }
    Ok(())
}

/// Node indices of the cell whose NW corner is at (`col`, `row`).
#[inline]
fn cell_corners(col: usize, row: usize, nx: usize) -> [u32; 4] {
    let i0 = row * nx + col;
    let i3 = i0 + nx;
    [i0 as u32, (i0 + 1) as u32, (i3 + 1) as u32, i3 as u32]
}

/// Build a mesh from a frame, optional heights and properties.
///
/// Fails before allocating any output when the inputs are inconsistent.
pub fn build(
    frame: &Frame,
    heights: Option<&[f32]>,
    properties: &[f32],
    options: &MeshOptions,
) -> MeshResult<Mesh> {
    MeshAssembler::new(frame, heights, properties, *options).map(|a| a.build())
}

/// Validated inputs for one mesh build.
#[derive(Debug, Clone, Copy)]
pub struct MeshAssembler<'a> {
    frame: &'a Frame,
    heights: Option<&'a [f32]>,
    properties: &'a [f32],
    options: MeshOptions,
    layout: LayoutMode,
}

impl<'a> MeshAssembler<'a> {
    /// Validate the inputs and determine the property layout.
    pub fn new(
        frame: &'a Frame,
        heights: Option<&'a [f32]>,
        properties: &'a [f32],
        options: MeshOptions,
    ) -> MeshResult<Self> {
        if let Err(err) = frame.validate() {
            warn!(error = %err, "rejecting mesh frame");
            return Err(err);
        }

        let node_count = frame.node_count();
        if let Some(h) = heights {
            if h.len() != node_count {
                let err = MeshError::HeightShapeMismatch {
                    height_len: h.len(),
                    node_count,
                };
                warn!(error = %err, "rejecting mesh heights");
                return Err(err);
            }
        }

        let layout = LayoutMode::classify(properties.len(), frame.nx(), frame.ny());
        if layout == LayoutMode::Invalid {
            let err = MeshError::ShapeMismatch {
                property_len: properties.len(),
                node_count,
                cell_count: frame.cell_count(),
            };
            warn!(error = %err, "rejecting mesh properties");
            return Err(err);
        }

        if let Err(err) = check_index_range(frame, layout) {
            warn!(error = %err, "rejecting mesh frame");
            return Err(err);
        }

        Ok(Self {
            frame,
            heights,
            properties,
            options,
            layout,
        })
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Assemble the mesh.
    pub fn build(&self) -> Mesh {
        let start = Instant::now();
        debug!(
            nx = self.frame.nx(),
            ny = self.frame.ny(),
            layout = %self.layout,
            smooth_shading = self.options.smooth_shading,
            grid_lines = self.options.grid_lines,
            "building grid mesh"
        );

        let mesh = match self.layout {
            LayoutMode::CellAligned => self.build_cell_aligned(),
            _ => self.build_node_aligned(),
        };

        debug!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            lines = mesh.line_count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "grid mesh built"
        );
        mesh
    }

    fn surface(&self, activity: NodeActivity<'a>) -> SurfaceGrid<'a> {
        SurfaceGrid::new(
            self.frame,
            self.heights,
            activity,
            self.options.height_convention,
        )
    }

    /// Position z of node `index`. Undefined heights are placed at z = 0;
    /// such nodes are never referenced by a triangle or line.
    #[inline]
    fn node_z(&self, index: usize) -> f32 {
        match self.heights {
            Some(h) if is_defined(h[index]) => self.options.height_convention.to_z(h[index]),
            _ => 0.0,
        }
    }

    #[inline]
    fn node_position(&self, index: usize) -> [f32; 3] {
        let nx = self.frame.nx();
        let (x, y) = self.frame.node_xy(index % nx, index / nx);
        [x as f32, y as f32, self.node_z(index)]
    }

    fn build_node_aligned(&self) -> Mesh {
        let (nx, ny) = (self.frame.nx(), self.frame.ny());
        let activity = NodeActivity::node_aligned(self.heights, self.properties);
        let surface = self.surface(activity);
        let estimator = NormalEstimator::new(self.options.smooth_shading);

        // Nodes: rows are independent, fill them in parallel.
        let mut positions = vec![0.0f32; 3 * nx * ny];
        let mut normals = vec![0.0f32; 3 * nx * ny];
        positions
            .par_chunks_mut(3 * nx)
            .zip(normals.par_chunks_mut(3 * nx))
            .enumerate()
            .for_each(|(row, (pos_row, nrm_row))| {
                for col in 0..nx {
                    let p = self.node_position(row * nx + col);
                    let n = estimator.estimate(&surface, col, row);
                    pos_row[3 * col..3 * col + 3].copy_from_slice(&p);
                    nrm_row[3 * col..3 * col + 3].copy_from_slice(&n);
                }
            });
        let vertex_properties = self.properties.to_vec();

        // Cells: size the index buffers first, then fill them with a cursor.
        let (n_triangles, n_lines) = self.count_node_cells(&activity);

        let mut triangle_indices = vec![0u32; 3 * n_triangles];
        let mut tri_cursor = 0;
        let mut line_indices = if self.options.grid_lines {
            Some(vec![0u32; 2 * n_lines])
        } else {
            None
        };
        let mut line_cursor = 0;

        for row in 0..ny - 1 {
            for col in 0..nx - 1 {
                let corners = cell_corners(col, row, nx);
                let active = activity.corners(corners);
                let split = CellSplit::classify(active);

                split.for_each_triangle(corners, |tri, _| {
                    triangle_indices[tri_cursor..tri_cursor + 3].copy_from_slice(&tri);
                    tri_cursor += 3;
                });

                if let Some(lines) = line_indices.as_mut() {
                    node_cell_lines(col, row, nx, ny, corners, active, split, |edge| {
                        lines[line_cursor..line_cursor + 2].copy_from_slice(&edge);
                        line_cursor += 2;
                    });
                }
            }
        }
        debug_assert_eq!(tri_cursor, triangle_indices.len());

        Mesh {
            layout: LayoutMode::NodeAligned,
            positions,
            normals: Some(normals),
            triangle_indices,
            vertex_properties,
            line_indices,
            height_range: self.heights.and_then(value_range),
            property_range: value_range(self.properties),
        }
    }

    fn count_node_cells(&self, activity: &NodeActivity<'_>) -> (usize, usize) {
        let (nx, ny) = (self.frame.nx(), self.frame.ny());
        let mut triangles = 0;
        let mut lines = 0;
        for row in 0..ny - 1 {
            for col in 0..nx - 1 {
                let corners = cell_corners(col, row, nx);
                let active = activity.corners(corners);
                let split = CellSplit::classify(active);
                triangles += split.triangle_count();
                if self.options.grid_lines {
                    node_cell_lines(col, row, nx, ny, corners, active, split, |_| lines += 1);
                }
            }
        }
        (triangles, lines)
    }

    fn build_cell_aligned(&self) -> Mesh {
        let (nx, ny) = (self.frame.nx(), self.frame.ny());
        let activity = NodeActivity::heights_only(self.heights);
        let cells = || {
            (0..ny - 1).flat_map(move |row| (0..nx - 1).map(move |col| (col, row)))
        };
        let split_at = |col: usize, row: usize| -> Option<(CellSplit, [u32; 4], f32)> {
            let value = self.properties[row * (nx - 1) + col];
            if !is_defined(value) {
                return None;
            }
            let corners = cell_corners(col, row, nx);
            Some((CellSplit::classify(activity.corners(corners)), corners, value))
        };

        let n_triangles: usize = cells()
            .filter_map(|(col, row)| split_at(col, row))
            .map(|(split, _, _)| split.triangle_count())
            .sum();
        let n_vertices = 3 * n_triangles;

        let mut positions = vec![0.0f32; 3 * n_vertices];
        let mut vertex_properties = vec![0.0f32; n_vertices];
        let triangle_indices: Vec<u32> = (0..n_vertices as u32).collect();
        let mut line_indices = if self.options.grid_lines {
            Some(Vec::with_capacity(2 * n_vertices))
        } else {
            None
        };

        let mut vertex = 0usize;
        for (col, row) in cells() {
            let Some((split, corners, value)) = split_at(col, row) else {
                continue;
            };
            let single = split.triangle_count() == 1;

            split.for_each_triangle(corners, |tri, apex| {
                for (slot, &node) in tri.iter().enumerate() {
                    let p = self.node_position(node as usize);
                    positions[3 * (vertex + slot)..3 * (vertex + slot) + 3].copy_from_slice(&p);
                    vertex_properties[vertex + slot] = value;
                }

                if let Some(lines) = line_indices.as_mut() {
                    let base = vertex as u32;
                    let (a, b) = ((apex + 1) % 3, (apex + 2) % 3);
                    let apex = base + apex as u32;
                    lines.extend_from_slice(&[apex, base + a as u32, apex, base + b as u32]);
                    if single {
                        lines.extend_from_slice(&[base + a as u32, base + b as u32]);
                    }
                }

                vertex += 3;
            });
        }
        debug_assert_eq!(vertex, n_vertices);

        Mesh {
            layout: LayoutMode::CellAligned,
            positions,
            normals: None,
            triangle_indices,
            vertex_properties,
            line_indices,
            height_range: self.heights.and_then(value_range),
            property_range: value_range(self.properties),
        }
    }
}

/// Wire-frame edges of a node-aligned cell.
///
/// Every cell contributes its north and west edges; the south and east
/// edges are only added on the last row and column so shared edges are
/// emitted once. The diagonal is added when it outlines a lone triangle.
#[allow(clippy::too_many_arguments)]
#[inline]
fn node_cell_lines(
    col: usize,
    row: usize,
    nx: usize,
    ny: usize,
    corners: [u32; 4],
    active: [bool; 4],
    split: CellSplit,
    mut push: impl FnMut([u32; 2]),
) {
    let [i0, i1, i2, i3] = corners;
    let [a0, a1, a2, a3] = active;

    if a0 && a1 {
        push([i0, i1]);
    }
    if a0 && a3 {
        push([i0, i3]);
    }
    if row == ny - 2 && a3 && a2 {
        push([i3, i2]);
    }
    if col == nx - 2 && a1 && a2 {
        push([i1, i2]);
    }
    if let Some(diagonal) = split.outline_diagonal(corners) {
        push(diagonal);
    }
}
