//! Scatter requests: how many cubes, how large, and where.
use crate::scatter::range::{PositionRange, ScalarRange};

/// Lower bound of the random count used when a request leaves the count open.
pub const RANDOM_COUNT_MIN: u32 = 10;
/// Upper bound (inclusive) of the random count used when a request leaves the count open.
pub const RANDOM_COUNT_MAX: u32 = 100;
/// Largest explicit count a request may ask for.
pub const MAX_COUNT: i64 = 1_000_000;
/// Instance count of the fixed-batch preset.
pub const FIXED_BATCH_COUNT: i64 = 50;

/// Input to a single scatter run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterRequest {
    /// Requested instance count, at most [`MAX_COUNT`]. `None` resolves to a random
    /// count in [`RANDOM_COUNT_MIN`]..=[`RANDOM_COUNT_MAX`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub count: Option<i64>,
    /// Closed range for the uniform scale factor.
    pub scale_range: ScalarRange,
    /// Closed ranges for the X, Y and Z position.
    pub position_range: PositionRange,
}

impl Default for ScatterRequest {
    fn default() -> Self {
        Self {
            count: None,
            scale_range: ScalarRange::new(0.5, 1.5),
            position_range: PositionRange::default(),
        }
    }
}

impl ScatterRequest {
    /// Creates a request with a random count and the default ranges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fifty cubes with the default ranges.
    pub fn fixed_batch() -> Self {
        Self::default().with_count(FIXED_BATCH_COUNT)
    }

    /// Sets an explicit instance count.
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Lets the planner pick a random count.
    pub fn with_random_count(mut self) -> Self {
        self.count = None;
        self
    }

    /// Sets the uniform scale range.
    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.scale_range = ScalarRange::new(min, max);
        self
    }

    /// Sets all three position ranges.
    pub fn with_position_range(mut self, position_range: PositionRange) -> Self {
        self.position_range = position_range;
        self
    }

    pub fn with_x_range(mut self, min: f32, max: f32) -> Self {
        self.position_range.x = ScalarRange::new(min, max);
        self
    }

    pub fn with_y_range(mut self, min: f32, max: f32) -> Self {
        self.position_range.y = ScalarRange::new(min, max);
        self
    }

    pub fn with_z_range(mut self, min: f32, max: f32) -> Self {
        self.position_range.z = ScalarRange::new(min, max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_leaves_count_open() {
        let request = ScatterRequest::new();
        assert_eq!(request.count, None);
        assert_eq!(request.scale_range, ScalarRange::new(0.5, 1.5));
    }

    #[test]
    fn fixed_batch_requests_fifty() {
        let request = ScatterRequest::fixed_batch();
        assert_eq!(request.count, Some(50));
        assert_eq!(request.position_range, PositionRange::default());
    }

    #[test]
    fn builders_set_axes_independently() {
        let request = ScatterRequest::new()
            .with_count(5)
            .with_scale_range(1.0, 2.0)
            .with_x_range(-1.0, 1.0)
            .with_y_range(0.0, 3.0)
            .with_z_range(4.0, 4.0)
            .with_random_count();

        assert_eq!(request.count, None);
        assert_eq!(request.scale_range, ScalarRange::new(1.0, 2.0));
        assert_eq!(request.position_range.x, ScalarRange::new(-1.0, 1.0));
        assert_eq!(request.position_range.y, ScalarRange::new(0.0, 3.0));
        assert_eq!(request.position_range.z, ScalarRange::fixed(4.0));
    }
}
