//! Classification of grid samples as defined (active) or missing.

use serde::{Deserialize, Serialize};

/// Whether a sample carries a usable value. NaN and infinities mark missing samples.
#[inline]
pub fn is_defined(x: f32) -> bool {
    x.is_finite()
}

/// How the property array maps onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// One property per node, interpolated across each cell.
    NodeAligned,
    /// One property per cell, constant over the cell.
    CellAligned,
    /// Matches neither the node nor the cell count.
    Invalid,
}

impl LayoutMode {
    /// Classify a property array of `prop_len` values against an `nx` x `ny` node grid.
    pub fn classify(prop_len: usize, nx: usize, ny: usize) -> Self {
        if prop_len == nx * ny {
            LayoutMode::NodeAligned
        } else if nx > 0 && ny > 0 && prop_len == (nx - 1) * (ny - 1) {
            LayoutMode::CellAligned
        } else {
            LayoutMode::Invalid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::NodeAligned => "node_aligned",
            LayoutMode::CellAligned => "cell_aligned",
            LayoutMode::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-node activity over borrowed sample arrays.
///
/// A node is active when its height (if heights are present) and its node
/// property (if properties are node-aligned) are both defined. Absent
/// heights count as a flat, fully defined surface.
#[derive(Debug, Clone, Copy)]
pub struct NodeActivity<'a> {
    heights: Option<&'a [f32]>,
    node_properties: Option<&'a [f32]>,
}

impl<'a> NodeActivity<'a> {
    /// Activity for node-aligned properties.
    pub fn node_aligned(heights: Option<&'a [f32]>, properties: &'a [f32]) -> Self {
        Self {
            heights,
            node_properties: Some(properties),
        }
    }

    /// Activity for cell-aligned properties: only heights decide node activity.
    pub fn heights_only(heights: Option<&'a [f32]>) -> Self {
        Self {
            heights,
            node_properties: None,
        }
    }

    /// Whether node `index` is active. Out-of-range indices are inactive.
    #[inline]
    pub fn is_active(&self, index: usize) -> bool {
        let height_ok = match self.heights {
            Some(h) => h.get(index).is_some_and(|&v| is_defined(v)),
            None => true,
        };
        let property_ok = match self.node_properties {
            Some(p) => p.get(index).is_some_and(|&v| is_defined(v)),
            None => true,
        };
        height_ok && property_ok
    }

    /// Activity of the four corners of a cell, in `[i0, i1, i2, i3]` order.
    #[inline]
    pub fn corners(&self, corners: [u32; 4]) -> [bool; 4] {
        corners.map(|i| self.is_active(i as usize))
    }
}
