//! Bounding box types reported for meshes and used for viewport fitting.

use serde::{Deserialize, Serialize};

/// Axis-aligned extent in the x/y plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds2D {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing all `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let mut bounds = Self::new(x0, y0, x0, y0);
        for (x, y) in iter {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// The four corners, counter-clockwise from (min_x, min_y).
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_x, self.min_y),
            (self.max_x, self.min_y),
            (self.max_x, self.max_y),
            (self.min_x, self.max_y),
        ]
    }
}

/// Axis-aligned 3D box, reported by a layer so a camera can frame it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl BoundingBox3D {
    /// Extrude a footprint between two z values (in any order).
    pub fn from_footprint(footprint: Bounds2D, z0: f64, z1: f64) -> Self {
        Self {
            min_x: footprint.min_x,
            min_y: footprint.min_y,
            min_z: z0.min(z1),
            max_x: footprint.max_x,
            max_y: footprint.max_y,
            max_z: z0.max(z1),
        }
    }

    pub fn footprint(&self) -> Bounds2D {
        Bounds2D::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// `[xmin, ymin, zmin, xmax, ymax, zmax]`, the layout used by layer reports.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        ]
    }
}
