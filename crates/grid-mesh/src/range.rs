//! Value range reduction over sample buffers.
//!
//! Undefined samples (NaN or infinite) are skipped. A buffer with no defined
//! samples has no range, reported as `None`.

use mesh_common::ValueRange;
use num_traits::Float;

/// Minimum and maximum of the finite values in `data`.
///
/// Single pass, no allocation.
pub fn min_max<T: Float>(data: &[T]) -> Option<(T, T)> {
    let mut iter = data.iter().copied().filter(|v| v.is_finite());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
}

/// Range of the defined samples in an `f32` buffer.
pub fn value_range(data: &[f32]) -> Option<ValueRange> {
    min_max(data).map(|(min, max)| ValueRange::new(min, max))
}
