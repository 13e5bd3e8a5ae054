//! Closed numeric value range.

use serde::{Deserialize, Serialize};

/// Minimum and maximum of the defined samples in a buffer.
///
/// Buffers without any defined sample have no range; callers carry that as
/// `Option<ValueRange>` instead of an inverted sentinel pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Extent of the range, never negative.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Apply a height convention sign; the result stays ordered.
    pub fn scaled(&self, factor: f32) -> Self {
        let (a, b) = (self.min * factor, self.max * factor);
        Self::new(a.min(b), a.max(b))
    }
}

impl From<ValueRange> for [f32; 2] {
    fn from(range: ValueRange) -> Self {
        [range.min, range.max]
    }
}
