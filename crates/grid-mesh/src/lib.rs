//! Grid-to-mesh triangulation.
//!
//! Turns a regular grid of height samples and an associated property grid
//! into flat, renderable mesh buffers: positions, normals, triangle indices,
//! per-vertex properties and an optional wire-frame line index buffer.
//!
//! # Architecture
//!
//! ```text
//! Frame + heights + properties
//!      │
//!      ▼
//! MeshAssembler::new  ── validate frame, height length, property layout
//!      │
//!      ├─► NodeAligned: one vertex per node
//!      │         ├─► positions + normals (NormalEstimator), rows in parallel
//!      │         └─► count cells, then fill triangle/line indices
//!      │
//!      └─► CellAligned: three fresh vertices per triangle
//!                └─► count triangles, then fill duplicated buffers
//!      │
//!      ▼
//!    Mesh (+ height/property ranges)
//! ```
//!
//! Missing samples are NaN (or infinite). Cells with missing corners lose
//! one or both triangles instead of failing the build.
//!
//! # Example
//!
//! ```
//! use grid_mesh::{build, MeshOptions};
//! use mesh_common::Frame;
//!
//! let frame = Frame::new([0.0, 0.0], [1.0, 1.0], [2, 2]);
//! let heights = [0.0f32; 4];
//! let mesh = build(&frame, Some(&heights[..]), &[1.0; 4], &MeshOptions::default()).unwrap();
//! assert_eq!(mesh.triangle_count(), 2);
//! ```

pub mod activity;
pub mod assembler;
pub mod config;
pub mod mesh;
pub mod normals;
pub mod pool;
pub mod range;

// Re-export commonly used types at crate root
pub use activity::{is_defined, LayoutMode, NodeActivity};
pub use assembler::{build, CellSplit, MeshAssembler};
pub use config::{MeshOptions, PoolConfig};
pub use mesh::Mesh;
pub use normals::{estimate_normal, NormalEstimator, SurfaceGrid, FLAT_PLACEHOLDER, NO_NORMAL};
pub use pool::{MeshPool, MeshRequest};
pub use range::{min_max, value_range};
