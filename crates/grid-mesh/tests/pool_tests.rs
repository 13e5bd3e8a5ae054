//! Tests for the caller-owned mesh worker pool.

use std::time::{Duration, Instant};

use futures::future::join_all;
use grid_mesh::{build, MeshOptions, MeshPool, MeshRequest, PoolConfig};
use mesh_common::MeshError;
use test_utils::{bowl_grid, index_grid, init_tracing, square_frame, with_holes};

fn bowl_request(n: usize) -> MeshRequest {
    MeshRequest::new(
        square_frame(n),
        Some(with_holes(bowl_grid(n, n, 0.5), 17)),
        index_grid(n, n),
    )
    .with_options(MeshOptions::default().with_grid_lines(true))
}

// ============================================================================
// Async builds
// ============================================================================

#[tokio::test]
async fn test_async_build_matches_direct_build() {
    init_tracing();
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(2)).unwrap();
    let request = bowl_request(32);

    let direct = request.build().unwrap();
    let pooled = pool.build(request).await.unwrap();

    assert_eq!(direct, pooled);
    assert_eq!(pool.in_flight(), 0);
    pool.shutdown();
}

#[tokio::test]
async fn test_concurrent_builds_are_independent() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(4)).unwrap();
    let sizes = [4usize, 9, 16, 25, 36, 49, 64, 81];

    let results = join_all(sizes.iter().map(|&n| pool.build(bowl_request(n)))).await;

    for (n, result) in sizes.iter().zip(results) {
        let mesh = result.unwrap();
        assert_eq!(mesh.vertex_count(), n * n);
        let expected = bowl_request(*n);
        let expected = build(
            &expected.frame,
            expected.heights.as_deref(),
            &expected.properties,
            &expected.options,
        )
        .unwrap();
        assert_eq!(mesh.triangle_indices, expected.triangle_indices);
    }
    assert_eq!(pool.in_flight(), 0);
}

#[tokio::test]
async fn test_in_flight_released_before_result_arrives() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(2)).unwrap();
    for _ in 0..200 {
        pool.build(bowl_request(2)).await.unwrap();
        assert_eq!(pool.in_flight(), 0);
    }
}

#[tokio::test]
async fn test_cloned_handles_share_workers() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(1)).unwrap();
    let other = pool.clone();

    let (a, b) = tokio::join!(pool.build(bowl_request(8)), other.build(bowl_request(8)));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(other.max_workers(), 1);
}

// ============================================================================
// Errors and shutdown
// ============================================================================

#[tokio::test]
async fn test_input_errors_surface_from_pool() {
    let pool = MeshPool::new(&PoolConfig::default()).unwrap();
    let mut request = bowl_request(4);
    request.heights = Some(vec![0.0; 3]);

    let err = pool.build(request).await.unwrap_err();
    assert!(err.is_input_error());
    assert!(matches!(err, MeshError::HeightShapeMismatch { .. }));
}

#[tokio::test]
async fn test_build_after_shutdown_fails() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(2)).unwrap();
    pool.shutdown();
    pool.shutdown();

    let err = pool.build(bowl_request(4)).await.unwrap_err();
    assert!(matches!(err, MeshError::PoolClosed));
    assert!(!err.is_input_error());
}

#[tokio::test]
async fn test_dropped_future_does_not_leak_in_flight() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(1)).unwrap();
    drop(pool.build(bowl_request(16)));

    // An unpolled future never submits its job.
    assert_eq!(pool.in_flight(), 0);
    let mesh = pool.build(bowl_request(4)).await.unwrap();
    assert_eq!(mesh.vertex_count(), 16);
}

#[tokio::test]
async fn test_discarded_submitted_job_releases_worker() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(1)).unwrap();

    // Polled once: the job is submitted, then its result is discarded.
    let discarded = tokio::time::timeout(Duration::ZERO, pool.build(bowl_request(512))).await;
    assert!(discarded.is_err());

    let deadline = Instant::now() + Duration::from_secs(30);
    while pool.in_flight() != 0 {
        assert!(Instant::now() < deadline, "discarded job never finished");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let mesh = pool.build(bowl_request(4)).await.unwrap();
    assert_eq!(mesh.vertex_count(), 16);
    assert_eq!(pool.in_flight(), 0);
}

#[test]
fn test_pool_debug_output() {
    let pool = MeshPool::new(&PoolConfig::default().with_max_workers(3)).unwrap();
    let debug = format!("{:?}", pool);
    assert!(debug.contains("max_workers: 3"));
    assert!(debug.contains("closed: false"));
}
