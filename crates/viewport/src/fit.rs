//! Fit a 2D extent into a viewport.
//!
//! The scale is chosen so the whole extent is visible: when the extent is
//! relatively taller than the usable viewport its height limits the scale,
//! otherwise (including an exact aspect tie) its width does. Zoom is
//! `log2(pixels per world unit)`.
//!
//! Margins are pixels reserved along the viewport edges, for example by
//! axis rulers. They shrink the usable viewport, and the target is shifted
//! so the content sits centred in what remains.

use mesh_common::Bounds2D;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Share of the viewport split between sub-views in a matrix layout.
const MATRIX_VIEW_FILL: f64 = 0.995;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Pixels reserved along each viewport edge. Negative values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
        .clamped()
    }

    /// Copy with every negative (or NaN) margin replaced by zero.
    pub fn clamped(self) -> Self {
        let pos = |v: f64| if v > 0.0 { v } else { 0.0 };
        Self {
            left: pos(self.left),
            right: pos(self.right),
            top: pos(self.top),
            bottom: pos(self.bottom),
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Grid of sub-views sharing one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLayout {
    pub rows: u32,
    pub cols: u32,
    /// Padding in pixels on every side of each sub-view.
    #[serde(default)]
    pub margin_pixels: u32,
}

impl ViewLayout {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            margin_pixels: 0,
        }
    }

    pub fn with_margin_pixels(mut self, margin_pixels: u32) -> Self {
        self.margin_pixels = margin_pixels;
        self
    }

    /// More than one sub-view.
    pub fn is_matrix(&self) -> bool {
        self.rows > 1 || self.cols > 1
    }

    /// Size of one sub-view inside its padding.
    pub fn sub_view_size(&self, viewport: ViewportSize) -> ViewportSize {
        let padding = 2.0 * self.margin_pixels as f64;
        let width = MATRIX_VIEW_FILL * viewport.width / self.cols.max(1) as f64;
        let height = MATRIX_VIEW_FILL * viewport.height / self.rows.max(1) as f64;
        ViewportSize::new(width - padding, height - padding)
    }
}

/// Camera target (world x, y) and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub target: [f64; 2],
    pub zoom: f64,
}

/// Fit `bounds` into a single view.
pub fn fit_bounds(bounds: &Bounds2D, viewport: ViewportSize, margins: &Margins) -> FitResult {
    fit_bounds_in_layout(bounds, viewport, margins, None)
}

/// Fit `bounds` into one sub-view of `layout` (or the whole viewport when
/// there is no layout or it holds a single view).
pub fn fit_bounds_in_layout(
    bounds: &Bounds2D,
    viewport: ViewportSize,
    margins: &Margins,
    layout: Option<&ViewLayout>,
) -> FitResult {
    let (cx, cy) = bounds.center();
    let centred = FitResult {
        target: [cx, cy],
        zoom: 0.0,
    };

    if viewport.is_empty() {
        debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport not laid out, centring without zoom"
        );
        return centred;
    }

    let margins = margins.clamped();
    let view = match layout {
        Some(layout) if layout.is_matrix() => layout.sub_view_size(viewport),
        _ => viewport,
    };
    let usable = ViewportSize::new(
        view.width - margins.horizontal(),
        view.height - margins.vertical(),
    );
    if usable.is_empty() {
        debug!(
            width = usable.width,
            height = usable.height,
            "margins leave no room, centring without zoom"
        );
        return centred;
    }

    let Some(world_per_pixel) = world_per_pixel(bounds, usable) else {
        return centred;
    };

    let shift_x = 0.5 * (margins.left - margins.right) * world_per_pixel;
    let shift_y = 0.5 * (margins.bottom - margins.top) * world_per_pixel;

    FitResult {
        target: [cx - shift_x, cy - shift_y],
        zoom: -world_per_pixel.log2(),
    }
}

/// World units per pixel needed to show all of `bounds` in `usable`, or
/// `None` for a degenerate extent.
fn world_per_pixel(bounds: &Bounds2D, usable: ViewportSize) -> Option<f64> {
    let (w, h) = (bounds.width(), bounds.height());
    if !(w > 0.0 || h > 0.0) {
        return None;
    }

    let port_aspect = usable.height / usable.width;
    let bounds_aspect = h / w;
    let scale = if bounds_aspect > port_aspect {
        h / usable.height
    } else {
        w / usable.width
    };
    Some(scale)
}
