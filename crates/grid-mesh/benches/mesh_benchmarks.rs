//! Benchmarks for grid mesh assembly.
//!
//! Run with: cargo bench --package grid-mesh --bench mesh_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_mesh::{build, estimate_normal, MeshOptions, NodeActivity, SurfaceGrid};
use mesh_common::{Frame, HeightConvention};
use rand::Rng;
use test_utils::sizes;

/// Generate a smooth terrain-like field with hills and valleys.
fn generate_smooth_field(width: usize, height: usize) -> Vec<f32> {
    let mut data = vec![0.0f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;

            let v1 = (fx * std::f32::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f32::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f32::consts::PI * 2.0).sin() * 10.0;

            data[y * width + x] = 1500.0 + v1 + v2 + v3;
        }
    }
    data
}

/// Generate a field with random noise and scattered missing samples.
fn generate_holey_field(width: usize, height: usize, hole_fraction: f64) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    generate_smooth_field(width, height)
        .into_iter()
        .map(|v| {
            if rng.gen_bool(hole_fraction) {
                f32::NAN
            } else {
                v + rng.gen_range(-5.0..5.0)
            }
        })
        .collect()
}

fn frame(n: usize) -> Frame {
    Frame::new([0.0, 0.0], [25.0, 25.0], [n, n])
}

// =============================================================================
// NODE-ALIGNED BUILD BENCHMARKS
// =============================================================================

fn bench_node_aligned(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_node_aligned");

    for n in [64usize, sizes::MEDIUM, sizes::LARGE] {
        let frame = frame(n);
        let heights = generate_smooth_field(n, n);
        let properties = generate_smooth_field(n, n);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("smooth", n), &n, |b, _| {
            let options = MeshOptions::default();
            b.iter(|| build(black_box(&frame), Some(&heights[..]), &properties, &options));
        });

        group.bench_with_input(BenchmarkId::new("flat_shaded", n), &n, |b, _| {
            let options = MeshOptions::default().with_smooth_shading(false);
            b.iter(|| build(black_box(&frame), Some(&heights[..]), &properties, &options));
        });

        group.bench_with_input(BenchmarkId::new("grid_lines", n), &n, |b, _| {
            let options = MeshOptions::default().with_grid_lines(true);
            b.iter(|| build(black_box(&frame), Some(&heights[..]), &properties, &options));
        });
    }

    group.finish();
}

fn bench_node_aligned_with_holes(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_node_aligned_holes");
    let n = sizes::MEDIUM;
    let frame = frame(n);
    let properties = generate_smooth_field(n, n);

    for fraction in [0.01f64, 0.1, 0.5] {
        let heights = generate_holey_field(n, n, fraction);
        group.bench_with_input(
            BenchmarkId::new("holes", format!("{}%", (fraction * 100.0) as u32)),
            &heights,
            |b, heights| {
                let options = MeshOptions::default().with_grid_lines(true);
                b.iter(|| build(black_box(&frame), Some(heights.as_slice()), &properties, &options));
            },
        );
    }

    group.finish();
}

// =============================================================================
// CELL-ALIGNED BUILD BENCHMARKS
// =============================================================================

fn bench_cell_aligned(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_cell_aligned");

    for n in [64usize, sizes::MEDIUM, sizes::LARGE] {
        let frame = frame(n);
        let heights = generate_holey_field(n, n, 0.05);
        let properties = generate_smooth_field(n - 1, n - 1);
        group.throughput(Throughput::Elements(((n - 1) * (n - 1)) as u64));

        group.bench_with_input(BenchmarkId::new("cells", n), &n, |b, _| {
            let options = MeshOptions::default();
            b.iter(|| build(black_box(&frame), Some(&heights[..]), &properties, &options));
        });
    }

    group.finish();
}

// =============================================================================
// NORMAL ESTIMATION BENCHMARKS
// =============================================================================

fn bench_estimate_normal(c: &mut Criterion) {
    let n = sizes::MEDIUM;
    let frame = frame(n);
    let heights = generate_holey_field(n, n, 0.1);
    let properties = vec![0.0f32; n * n];
    let grid = SurfaceGrid::new(
        &frame,
        Some(&heights[..]),
        NodeActivity::node_aligned(Some(&heights[..]), &properties),
        HeightConvention::IncreasingDownwards,
    );

    c.bench_function("estimate_normal_medium", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for row in 0..n {
                for col in 0..n {
                    acc += estimate_normal(black_box(&grid), col, row)[2];
                }
            }
            acc
        });
    });
}

criterion_group!(
    benches,
    bench_node_aligned,
    bench_node_aligned_with_holes,
    bench_cell_aligned,
    bench_estimate_normal,
);
criterion_main!(benches);
