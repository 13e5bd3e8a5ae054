//! Output mesh buffers.

use crate::activity::LayoutMode;
use mesh_common::ValueRange;

/// A renderable triangle mesh built from a grid.
///
/// Buffers are flat so they can be uploaded or transferred as-is:
/// `positions` and `normals` hold 3 floats per vertex, `vertex_properties`
/// one float per vertex, `triangle_indices` 3 indices per triangle and
/// `line_indices` 2 indices per wire-frame edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Property layout the mesh was built for.
    pub layout: LayoutMode,
    pub positions: Vec<f32>,
    /// Per-vertex normals. `None` for cell-aligned meshes, which are always
    /// flat shaded. A (0, 0, 0) entry means no normal could be estimated.
    pub normals: Option<Vec<f32>>,
    pub triangle_indices: Vec<u32>,
    pub vertex_properties: Vec<f32>,
    /// Wire-frame edges, present when grid lines were requested.
    pub line_indices: Option<Vec<u32>>,
    /// Range of the defined input heights. `None` when heights were absent
    /// or entirely undefined.
    pub height_range: Option<ValueRange>,
    /// Range of the defined input properties.
    pub property_range: Option<ValueRange>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    pub fn line_count(&self) -> usize {
        self.line_indices.as_ref().map_or(0, |l| l.len() / 2)
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangle_indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Iterate wire-frame edges as index pairs.
    pub fn lines(&self) -> impl Iterator<Item = [u32; 2]> + '_ {
        self.line_indices
            .as_deref()
            .unwrap_or(&[])
            .chunks_exact(2)
            .map(|l| [l[0], l[1]])
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> [f32; 3] {
        let p = &self.positions[3 * index..3 * index + 3];
        [p[0], p[1], p[2]]
    }

    /// Normals packed to signed bytes (`round(n * 127)`), for compact upload.
    pub fn normals_i8(&self) -> Option<Vec<i8>> {
        self.normals.as_ref().map(|normals| {
            normals
                .iter()
                .map(|&n| (n.clamp(-1.0, 1.0) * 127.0).round() as i8)
                .collect()
        })
    }

    /// Raw bytes of the position buffer.
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normal buffer, if any.
    pub fn normals_bytes(&self) -> Option<&[u8]> {
        self.normals.as_deref().map(bytemuck::cast_slice)
    }

    /// Raw bytes of the triangle index buffer.
    pub fn triangle_indices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangle_indices)
    }

    /// Raw bytes of the per-vertex property buffer.
    pub fn vertex_properties_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_properties)
    }

    /// Raw bytes of the line index buffer, if any.
    pub fn line_indices_bytes(&self) -> Option<&[u8]> {
        self.line_indices.as_deref().map(bytemuck::cast_slice)
    }

    /// Total size of all buffers in bytes.
    pub fn byte_size(&self) -> usize {
        self.positions_bytes().len()
            + self.normals_bytes().map_or(0, <[u8]>::len)
            + self.triangle_indices_bytes().len()
            + self.vertex_properties_bytes().len()
            + self.line_indices_bytes().map_or(0, <[u8]>::len)
    }
}
