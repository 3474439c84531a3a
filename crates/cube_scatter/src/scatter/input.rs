//! Form-style input: count text, scale slider ticks and six position fields.
use crate::error::{Error, Result};
use crate::scatter::range::{PositionRange, ScalarRange};
use crate::scatter::request::ScatterRequest;

/// Slider ticks are divided by this to get a scale factor.
pub const TICKS_PER_UNIT: f32 = 100.0;
/// Tick range of the minimum-scale slider.
pub const MIN_SCALE_TICKS: std::ops::RangeInclusive<u32> = 1..=100;
/// Tick range of the maximum-scale slider.
pub const MAX_SCALE_TICKS: std::ops::RangeInclusive<u32> = 1..=200;

/// Raw values collected by a scatter form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScatterForm {
    /// Free text; blank means "pick a random count".
    pub count_text: String,
    pub min_scale_ticks: u32,
    pub max_scale_ticks: u32,
    pub x: (f32, f32),
    pub y: (f32, f32),
    pub z: (f32, f32),
}

impl Default for ScatterForm {
    fn default() -> Self {
        Self {
            count_text: String::new(),
            min_scale_ticks: 50,
            max_scale_ticks: 150,
            x: (-10.0, 10.0),
            y: (0.0, 20.0),
            z: (-10.0, 10.0),
        }
    }
}

impl ScatterForm {
    /// Builds a request; fails on unparsable count text or out-of-range slider ticks.
    ///
    /// Range ordering is left to the planner.
    pub fn to_request(&self) -> Result<ScatterRequest> {
        let count = parse_count_text(&self.count_text)?;
        let scale_range = ScalarRange::new(
            scale_from_ticks(self.min_scale_ticks, MIN_SCALE_TICKS, "minimum scale")?,
            scale_from_ticks(self.max_scale_ticks, MAX_SCALE_TICKS, "maximum scale")?,
        );

        let request = ScatterRequest::new()
            .with_scale_range(scale_range.min, scale_range.max)
            .with_position_range(PositionRange::new(self.x, self.y, self.z));
        Ok(match count {
            Some(n) => request.with_count(n),
            None => request,
        })
    }
}

/// Blank text is an absent count; otherwise the trimmed text must be an integer.
pub fn parse_count_text(text: &str) -> Result<Option<i64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<i64>().map(Some).map_err(|_| {
        Error::InvalidRequest(format!("count '{trimmed}' is not a whole number"))
    })
}

/// Converts slider ticks to a scale factor.
pub fn scale_from_ticks(
    ticks: u32,
    allowed: std::ops::RangeInclusive<u32>,
    label: &str,
) -> Result<f32> {
    if !allowed.contains(&ticks) {
        return Err(Error::InvalidRequest(format!(
            "{label} slider must be within {}..={} (got {ticks})",
            allowed.start(),
            allowed.end()
        )));
    }
    Ok(ticks as f32 / TICKS_PER_UNIT)
}
