//! Common types shared across the grid meshing crates.

pub mod bbox;
pub mod error;
pub mod frame;
pub mod range;

pub use bbox::{BoundingBox3D, Bounds2D};
pub use error::{MeshError, MeshResult};
pub use frame::{Frame, HeightConvention};
pub use range::ValueRange;
