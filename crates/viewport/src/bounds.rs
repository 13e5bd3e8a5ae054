//! Layer bounding boxes under planar rotation.

use mesh_common::{BoundingBox3D, Bounds2D, Frame, HeightConvention, ValueRange};
use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fit::{fit_bounds, FitResult, Margins, ViewportSize};

/// Rotate `point` counter-clockwise by `degrees` about `center`.
pub fn rotate_point(point: (f64, f64), center: [f64; 2], degrees: f64) -> (f64, f64) {
    let rotation = Rotation2::new(degrees.to_radians());
    let center = Point2::new(center[0], center[1]);
    let offset = Vector2::new(point.0 - center.x, point.1 - center.y);
    let p = center + rotation * offset;
    (p.x, p.y)
}

/// Axis-aligned extent of the frame footprint after its rotation.
pub fn rotated_footprint(frame: &Frame) -> Bounds2D {
    let footprint = frame.footprint();
    if !frame.is_rotated() {
        return footprint;
    }

    let center = frame.rotation_center();
    let corners = footprint
        .corners()
        .into_iter()
        .map(|corner| rotate_point(corner, center, frame.rotation_degrees));
    Bounds2D::from_points(corners).unwrap_or(footprint)
}

/// The box a layer reports to its caller: the rotated footprint, extruded
/// over the height range converted to position z.
///
/// A layer without any defined height sits at z = 0.
pub fn layer_bounding_box(
    frame: &Frame,
    height_range: Option<ValueRange>,
    convention: HeightConvention,
) -> BoundingBox3D {
    let (z0, z1) = height_range
        .map(|range| {
            let z = range.scaled(convention.z_sign());
            (z.min as f64, z.max as f64)
        })
        .unwrap_or((0.0, 0.0));
    BoundingBox3D::from_footprint(rotated_footprint(frame), z0, z1)
}

/// Bounding box and viewport fit for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub bounding_box: BoundingBox3D,
    pub fit: FitResult,
}

/// Compute the layer bounding box and the target/zoom that frame its
/// footprint in `viewport`. Missing margins count as zero.
pub fn project(
    frame: &Frame,
    height_range: Option<ValueRange>,
    convention: HeightConvention,
    viewport: ViewportSize,
    margins: Option<&Margins>,
) -> Projection {
    let bounding_box = layer_bounding_box(frame, height_range, convention);
    let margins = margins.copied().unwrap_or_default();
    let fit = fit_bounds(&bounding_box.footprint(), viewport, &margins);

    debug!(
        bbox = ?bounding_box.to_array(),
        target_x = fit.target[0],
        target_y = fit.target[1],
        zoom = fit.zoom,
        "projected layer bounds"
    );

    Projection { bounding_box, fit }
}
