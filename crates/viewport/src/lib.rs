//! Spatial extent of a grid layer and how to frame it in a viewport.
//!
//! - [`bounds`]: the layer's 3D bounding box, with the frame's planar
//!   rotation applied to its footprint.
//! - [`fit`]: camera target and zoom that fit a 2D extent into a viewport,
//!   keeping content centred between asymmetric margins.

pub mod bounds;
pub mod fit;

pub use bounds::{layer_bounding_box, project, rotate_point, rotated_footprint, Projection};
pub use fit::{fit_bounds, fit_bounds_in_layout, FitResult, Margins, ViewLayout, ViewportSize};
