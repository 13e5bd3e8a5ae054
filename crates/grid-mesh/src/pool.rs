//! Caller-owned worker pool for building meshes off the calling thread.
//!
//! Large grids take long enough to triangulate that interactive callers
//! hand the whole build to a pool. A [`MeshPool`] is created explicitly,
//! cloned to share it, and shut down explicitly; there is no global pool.
//!
//! ```ignore
//! let pool = MeshPool::new(&PoolConfig::from_env())?;
//! let mesh = pool.build(MeshRequest::new(frame, Some(heights), properties)).await?;
//! pool.shutdown();
//! ```
//!
//! Each request owns its buffers, so jobs never alias each other and run
//! in parallel without locking. Dropping the returned future discards the
//! result; the job itself runs to completion.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::assembler;
use crate::config::{MeshOptions, PoolConfig};
use crate::mesh::Mesh;
use mesh_common::{Frame, MeshError, MeshResult};

/// Owned inputs for one mesh build.
#[derive(Debug, Clone)]
pub struct MeshRequest {
    pub frame: Frame,
    pub heights: Option<Vec<f32>>,
    pub properties: Vec<f32>,
    pub options: MeshOptions,
}

impl MeshRequest {
    pub fn new(frame: Frame, heights: Option<Vec<f32>>, properties: Vec<f32>) -> Self {
        Self {
            frame,
            heights,
            properties,
            options: MeshOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MeshOptions) -> Self {
        self.options = options;
        self
    }

    /// Build on the current thread.
    pub fn build(&self) -> MeshResult<Mesh> {
        assembler::build(
            &self.frame,
            self.heights.as_deref(),
            &self.properties,
            &self.options,
        )
    }
}

struct PoolInner {
    pool: Mutex<Option<Arc<ThreadPool>>>,
    in_flight: AtomicUsize,
    max_workers: usize,
}

/// Handle to a mesh worker pool. Clones share the same workers.
#[derive(Clone)]
pub struct MeshPool {
    inner: Arc<PoolInner>,
}

impl std::fmt::Debug for MeshPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshPool")
            .field("max_workers", &self.inner.max_workers)
            .field("in_flight", &self.in_flight())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Decrements the in-flight counter when a job finishes, even by panic.
struct InFlightGuard(Arc<PoolInner>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl MeshPool {
    /// Start a pool with up to `config.max_workers` threads.
    pub fn new(config: &PoolConfig) -> MeshResult<Self> {
        config.validate()?;

        let prefix = config.thread_name_prefix.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(move |i| format!("{}-{}", prefix, i))
            .build()
            .map_err(|e| MeshError::invalid_config(e.to_string()))?;

        info!(max_workers = config.max_workers, "mesh worker pool started");

        Ok(Self {
            inner: Arc::new(PoolInner {
                pool: Mutex::new(Some(Arc::new(pool))),
                in_flight: AtomicUsize::new(0),
                max_workers: config.max_workers,
            }),
        })
    }

    fn handle(&self) -> MeshResult<Arc<ThreadPool>> {
        let guard = self
            .inner
            .pool
            .lock()
            .map_err(|_| MeshError::worker_failed("pool lock poisoned"))?;
        guard.clone().ok_or(MeshError::PoolClosed)
    }

    /// Build a mesh on the pool and await the result.
    pub async fn build(&self, request: MeshRequest) -> MeshResult<Mesh> {
        let pool = self.handle()?;
        let (tx, rx) = oneshot::channel();

        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(self.inner.clone());
        debug!(
            nx = request.frame.nx(),
            ny = request.frame.ny(),
            in_flight = self.in_flight(),
            "submitting mesh job"
        );

        pool.spawn(move || {
            // Release the in-flight slot before the caller can observe the result.
            let result = {
                let _guard = guard;
                run_job(&request)
            };
            // The receiver is gone if the caller stopped waiting.
            let _ = tx.send(result);
        });

        rx.await
            .map_err(|_| MeshError::worker_failed("mesh job dropped its result"))?
    }

    /// Build a mesh on the pool, blocking the calling thread until done.
    pub fn build_blocking(&self, request: MeshRequest) -> MeshResult<Mesh> {
        let pool = self.handle()?;
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        let _guard = InFlightGuard(self.inner.clone());
        pool.install(|| run_job(&request))
    }

    /// Jobs submitted and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    pub fn max_workers(&self) -> usize {
        self.inner.max_workers
    }

    pub fn is_closed(&self) -> bool {
        self.inner.pool.lock().map_or(true, |p| p.is_none())
    }

    /// Stop accepting jobs. Running jobs finish, and the worker threads exit
    /// once the last of them completes.
    pub fn shutdown(&self) {
        if let Ok(mut pool) = self.inner.pool.lock() {
            if pool.take().is_some() {
                info!(in_flight = self.in_flight(), "mesh worker pool shut down");
            }
        }
    }
}

/// Run one build, turning a panic into an error so it never reaches the
/// pool's panic handler.
fn run_job(request: &MeshRequest) -> MeshResult<Mesh> {
    panic::catch_unwind(AssertUnwindSafe(|| request.build())).unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(MeshError::worker_failed(msg))
    })
}
