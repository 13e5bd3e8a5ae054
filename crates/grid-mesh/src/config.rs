//! Configuration for mesh building and the mesh worker pool.

use mesh_common::{HeightConvention, MeshError, MeshResult};
use serde::{Deserialize, Serialize};

/// Options that shape a single mesh build.
///
/// Field names follow the layer description JSON
/// (`smoothShading`, `gridLines`, `zIncreasingDownwards`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeshOptions {
    /// Estimate per-node normals. When off, a placeholder normal is written
    /// and the renderer shades each triangle flat.
    pub smooth_shading: bool,

    /// Emit a wire-frame line index buffer.
    pub grid_lines: bool,

    /// Sign convention for turning heights into position z.
    #[serde(rename = "zIncreasingDownwards")]
    pub height_convention: HeightConvention,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            smooth_shading: true,
            grid_lines: false,
            height_convention: HeightConvention::IncreasingDownwards,
        }
    }
}

impl MeshOptions {
    pub fn with_smooth_shading(mut self, smooth_shading: bool) -> Self {
        self.smooth_shading = smooth_shading;
        self
    }

    pub fn with_grid_lines(mut self, grid_lines: bool) -> Self {
        self.grid_lines = grid_lines;
        self
    }

    pub fn with_height_convention(mut self, convention: HeightConvention) -> Self {
        self.height_convention = convention;
        self
    }
}

/// Configuration for the mesh worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of worker threads.
    pub max_workers: usize,

    /// Prefix for worker thread names.
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            thread_name_prefix: "mesh-worker".to_string(),
        }
    }
}

impl PoolConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MESH_POOL_MAX_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.max_workers = workers;
            }
        }

        if let Ok(val) = std::env::var("MESH_POOL_THREAD_PREFIX") {
            if !val.is_empty() {
                config.thread_name_prefix = val;
            }
        }

        config
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> MeshResult<()> {
        if self.max_workers == 0 {
            return Err(MeshError::invalid_config("max_workers must be > 0"));
        }

        Ok(())
    }
}
