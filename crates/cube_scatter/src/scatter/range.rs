//! Closed numeric ranges for scale and per-axis position bounds.
use crate::error::{Error, Result};

/// A closed `[min, max]` interval of floats.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarRange {
    pub min: f32,
    pub max: f32,
}

impl ScalarRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range containing exactly one value.
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// `true` when both bounds are finite and `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Checks that the range is ordered, naming it `label` in the error.
    pub fn validate(&self, label: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidRequest(format!(
                "{label} bounds must be finite (got {} .. {})",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(Error::InvalidRequest(format!(
                "{label} minimum {} is greater than maximum {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Whether `value` lies between the bounds, inclusive, in either order.
    pub fn contains(&self, value: f32) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        (lo..=hi).contains(&value)
    }

    pub fn span(&self) -> f32 {
        (self.max - self.min).abs()
    }
}

impl From<(f32, f32)> for ScalarRange {
    fn from((min, max): (f32, f32)) -> Self {
        Self::new(min, max)
    }
}

/// Independent closed ranges for the X, Y and Z axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionRange {
    pub x: ScalarRange,
    pub y: ScalarRange,
    pub z: ScalarRange,
}

impl PositionRange {
    pub fn new(
        x: impl Into<ScalarRange>,
        y: impl Into<ScalarRange>,
        z: impl Into<ScalarRange>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// All three axes pinned to a single point.
    pub fn point(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: ScalarRange::fixed(x),
            y: ScalarRange::fixed(y),
            z: ScalarRange::fixed(z),
        }
    }

    /// Axis label paired with its range, in X, Y, Z order.
    pub fn axes(&self) -> [(&'static str, ScalarRange); 3] {
        [("x", self.x), ("y", self.y), ("z", self.z)]
    }

    pub fn validate(&self) -> Result<()> {
        for (axis, range) in self.axes() {
            range.validate(&format!("position {axis}"))?;
        }
        Ok(())
    }
}

impl Default for PositionRange {
    fn default() -> Self {
        Self::new((-10.0, 10.0), (0.0, 20.0), (-10.0, 10.0))
    }
}
