//! Test data generators for synthetic height and property grids.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite. All grids are row-major with row 0 first
//! (the northern edge), matching [`mesh_common::Frame`] layout.

/// Creates a grid where every node has the same value.
///
/// # Example
///
/// ```
/// use test_utils::flat_grid;
///
/// let grid = flat_grid(4, 3, 2.5);
/// assert_eq!(grid.len(), 12);
/// assert!(grid.iter().all(|&v| v == 2.5));
/// ```
pub fn flat_grid(nx: usize, ny: usize, value: f32) -> Vec<f32> {
    vec![value; nx * ny]
}

/// Creates a grid that rises linearly towards the east.
///
/// Each value is `col * slope`, independent of the row, so a surface built
/// from it has the same normal everywhere.
///
/// # Example
///
/// ```
/// use test_utils::ramp_grid;
///
/// let grid = ramp_grid(3, 2, 0.5);
/// assert_eq!(grid, vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);
/// ```
pub fn ramp_grid(nx: usize, ny: usize, slope: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(nx * ny);
    for _row in 0..ny {
        for col in 0..nx {
            data.push(col as f32 * slope);
        }
    }
    data
}

/// Creates a bowl: squared distance from the grid center, scaled by `depth`.
///
/// The minimum sits at the center node for odd dimensions. Useful for
/// checking that normals tilt away from the middle in every direction.
pub fn bowl_grid(nx: usize, ny: usize, depth: f32) -> Vec<f32> {
    let cx = (nx as f32 - 1.0) / 2.0;
    let cy = (ny as f32 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            data.push(depth * (dx * dx + dy * dy));
        }
    }
    data
}

/// Creates a grid with predictable per-node values: `row * nx + col`.
///
/// Handy as a property grid, since each vertex property identifies the node
/// it came from.
///
/// # Example
///
/// ```
/// use test_utils::index_grid;
///
/// let grid = index_grid(3, 2);
/// assert_eq!(grid[4], 4.0); // col=1, row=1
/// ```
pub fn index_grid(nx: usize, ny: usize) -> Vec<f32> {
    (0..nx * ny).map(|i| i as f32).collect()
}

/// Replaces every `every`-th value with NaN, starting at index 0.
///
/// `every == 0` leaves the data untouched.
///
/// # Example
///
/// ```
/// use test_utils::{flat_grid, with_holes};
///
/// let grid = with_holes(flat_grid(2, 2, 1.0), 3);
/// assert!(grid[0].is_nan());
/// assert!(grid[3].is_nan());
/// assert_eq!(grid[1], 1.0);
/// ```
pub fn with_holes(mut data: Vec<f32>, every: usize) -> Vec<f32> {
    if every == 0 {
        return data;
    }
    for value in data.iter_mut().step_by(every) {
        *value = f32::NAN;
    }
    data
}

/// Replaces the listed indices with NaN. Out-of-range indices are ignored.
pub fn with_holes_at(mut data: Vec<f32>, indices: &[usize]) -> Vec<f32> {
    for &i in indices {
        if let Some(value) = data.get_mut(i) {
            *value = f32::NAN;
        }
    }
    data
}

/// Creates a grid with a deterministic pseudo-random pattern in `[0, amplitude)`.
///
/// Uses a simple linear congruential generator so results are reproducible
/// across runs and platforms without pulling in an RNG.
pub fn noise_grid(nx: usize, ny: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..nx * ny)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * amplitude
        })
        .collect()
}

/// Counts NaN values in a grid.
pub fn count_undefined(data: &[f32]) -> usize {
    data.iter().filter(|v| !v.is_finite()).count()
}
