//! Placement planning: resolve the count, validate ranges, and draw transforms.
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use rand_pcg::Pcg64Mcg;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sampling::{uniform_closed, uniform_half_open, uniform_u32_inclusive};
use crate::scatter::events::{EventSink, ScatterEvent, ScatterEventKind};
use crate::scatter::range::{PositionRange, ScalarRange};
use crate::scatter::request::{ScatterRequest, MAX_COUNT, RANDOM_COUNT_MAX, RANDOM_COUNT_MIN};

/// Seed used by the reproducible preset.
pub const CLASSIC_SEED: u64 = 1234;

/// Rotations are drawn from `[0, FULL_TURN_DEGREES)` on every axis.
pub const FULL_TURN_DEGREES: f32 = 360.0;

/// Transform of one scattered instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Absolute position.
    pub position: Vec3,
    /// Rotation in degrees about X, Y and Z, applied in that order.
    pub rotation_degrees: Vec3,
    /// Uniform scale factor.
    pub uniform_scale: f32,
}

impl Placement {
    pub fn new(position: Vec3, rotation_degrees: Vec3, uniform_scale: f32) -> Self {
        Self {
            position,
            rotation_degrees,
            uniform_scale,
        }
    }

    /// Rotation as a quaternion (X first, then Y, then Z).
    pub fn rotation(&self) -> Quat {
        let r = self.rotation_degrees;
        Quat::from_euler(
            EulerRot::ZYX,
            r.z.to_radians(),
            r.y.to_radians(),
            r.x.to_radians(),
        )
    }

    pub fn scale(&self) -> Vec3 {
        Vec3::splat(self.uniform_scale)
    }

    /// Local-to-world matrix: scale, then rotate, then translate.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale(), self.rotation(), self.position)
    }
}

/// Result of a planning run.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterResult {
    /// Placements in generation order.
    pub placements: Vec<Placement>,
    /// Resolved instance count (echoes the random pick when the request left it open).
    pub count: usize,
    /// Seed the generator was reset to for this run, if the planner owned it.
    pub seed: Option<u64>,
}

impl ScatterResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }
}

impl<'a> IntoIterator for &'a ScatterResult {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// Where the planner's generator gets its state from at the start of each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RngMode {
    /// Fresh entropy per run. The chosen seed is reported so a run can be replayed.
    #[default]
    Entropy,
    /// Reset to this seed before every run; identical requests give identical results.
    Seeded(u64),
}

/// How non-positive explicit counts are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountPolicy {
    /// Reject with [`Error::InvalidRequest`].
    #[default]
    Strict,
    /// Treat like an absent count and draw a random one.
    FallbackToRandom,
}

/// Planner configuration.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub rng_mode: RngMode,
    pub count_policy: CountPolicy,
    /// Reject inverted position ranges the same way as an inverted scale range.
    pub validate_position_ranges: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rng_mode: RngMode::Entropy,
            count_policy: CountPolicy::Strict,
            validate_position_ranges: true,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rng_mode(mut self, rng_mode: RngMode) -> Self {
        self.rng_mode = rng_mode;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng_mode(RngMode::Seeded(seed))
    }

    pub fn with_count_policy(mut self, count_policy: CountPolicy) -> Self {
        self.count_policy = count_policy;
        self
    }

    pub fn with_position_validation(mut self, enabled: bool) -> Self {
        self.validate_position_ranges = enabled;
        self
    }
}

/// Resolves the requested count.
///
/// An absent count (or a non-positive one under [`CountPolicy::FallbackToRandom`])
/// draws uniformly from `10..=100`. Counts above [`MAX_COUNT`] are always rejected.
pub fn resolve_count<R: Rng + ?Sized>(
    requested: Option<i64>,
    policy: CountPolicy,
    rng: &mut R,
) -> Result<usize> {
    match requested {
        Some(n) if n > MAX_COUNT => Err(Error::InvalidRequest(format!(
            "count {n} exceeds the maximum of {MAX_COUNT}"
        ))),
        Some(n) if n > 0 => usize::try_from(n)
            .map_err(|_| Error::InvalidRequest(format!("count {n} does not fit in memory"))),
        Some(n) if policy == CountPolicy::Strict => Err(Error::InvalidRequest(format!(
            "count must be a positive integer (got {n})"
        ))),
        _ => Ok(uniform_u32_inclusive(rng, RANDOM_COUNT_MIN, RANDOM_COUNT_MAX) as usize),
    }
}

/// Checks that the scale range and all three position ranges are ordered and finite.
pub fn validate_ranges(scale_range: &ScalarRange, position_range: &PositionRange) -> Result<()> {
    scale_range.validate("scale")?;
    position_range.validate()
}

fn validate_request(request: &ScatterRequest, config: &PlannerConfig) -> Result<()> {
    if config.validate_position_ranges {
        return validate_ranges(&request.scale_range, &request.position_range);
    }

    request.scale_range.validate("scale")?;
    for (axis, range) in request.position_range.axes() {
        if !range.min.is_finite() || !range.max.is_finite() {
            return Err(Error::InvalidRequest(format!(
                "position {axis} bounds must be finite"
            )));
        }
    }
    Ok(())
}

/// Draws one placement: position x, y, z, then rotation x, y, z, then scale.
pub fn sample_placement(request: &ScatterRequest, rng: &mut dyn Rng) -> Placement {
    let p = &request.position_range;
    let x = uniform_closed(rng, p.x.min, p.x.max);
    let y = uniform_closed(rng, p.y.min, p.y.max);
    let z = uniform_closed(rng, p.z.min, p.z.max);

    let rx = uniform_half_open(rng, 0.0, FULL_TURN_DEGREES);
    let ry = uniform_half_open(rng, 0.0, FULL_TURN_DEGREES);
    let rz = uniform_half_open(rng, 0.0, FULL_TURN_DEGREES);

    let s = &request.scale_range;
    let scale = uniform_closed(rng, s.min, s.max);

    Placement::new(Vec3::new(x, y, z), Vec3::new(rx, ry, rz), scale)
}

/// Generates placements with a caller-owned generator.
///
/// `config.rng_mode` is ignored; seeding `rng` is up to the caller.
pub fn generate_with_rng<R: Rng>(
    request: &ScatterRequest,
    config: &PlannerConfig,
    rng: &mut R,
) -> Result<ScatterResult> {
    generate_internal(request, config, rng, None, &mut ())
}

fn generate_internal(
    request: &ScatterRequest,
    config: &PlannerConfig,
    rng: &mut dyn Rng,
    seed: Option<u64>,
    sink: &mut dyn EventSink,
) -> Result<ScatterResult> {
    let checked = match validate_request(request, config) {
        Ok(()) => resolve_count(request.count, config.count_policy, rng),
        Err(err) => Err(err),
    };
    let count = match checked {
        Ok(count) => count,
        Err(err) => {
            warn!("Rejected scatter request: {}.", err);
            if sink.wants(ScatterEventKind::Warning) {
                sink.send(ScatterEvent::Warning {
                    context: "request".into(),
                    message: err.to_string(),
                });
            }
            return Err(err);
        }
    };

    if sink.wants(ScatterEventKind::RunStarted) {
        sink.send(ScatterEvent::RunStarted { count, seed });
    }

    let mut placements = Vec::with_capacity(count);
    for index in 0..count {
        let placement = sample_placement(request, rng);
        if sink.wants(ScatterEventKind::PlacementGenerated) {
            sink.send(ScatterEvent::PlacementGenerated { index, placement });
        }
        placements.push(placement);
    }

    match seed {
        Some(seed) => info!("Planned {} placements (seed {}).", count, seed),
        None => info!("Planned {} placements.", count),
    }

    if sink.wants(ScatterEventKind::RunFinished) {
        sink.send(ScatterEvent::RunFinished { count });
    }

    Ok(ScatterResult {
        placements,
        count,
        seed,
    })
}

/// Owns a generator and turns [`ScatterRequest`]s into [`ScatterResult`]s.
///
/// The generator is a PCG (`Pcg64Mcg`) with a documented output stream, so a seed
/// maps to the same placements on every platform and release.
pub struct ScatterPlanner {
    config: PlannerConfig,
    rng: Pcg64Mcg,
}

fn generator_for(seed: u64) -> Pcg64Mcg {
    Pcg64Mcg::new(u128::from(seed))
}

impl Default for ScatterPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterPlanner {
    /// Planner drawing fresh entropy for every run.
    pub fn new() -> Self {
        Self::from_config(PlannerConfig::default())
    }

    /// Planner that reproduces the same result for the same request on every run.
    pub fn seeded(seed: u64) -> Self {
        Self::from_config(PlannerConfig::default().with_seed(seed))
    }

    pub fn from_config(config: PlannerConfig) -> Self {
        let initial = match config.rng_mode {
            RngMode::Seeded(seed) => seed,
            RngMode::Entropy => rand::rng().next_u64(),
        };
        Self {
            config,
            rng: generator_for(initial),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Resolves a count against the planner's current generator state.
    pub fn resolve_count(&mut self, requested: Option<i64>) -> Result<usize> {
        resolve_count(requested, self.config.count_policy, &mut self.rng)
    }

    /// Validates the request's ranges according to the planner configuration.
    pub fn validate_ranges(&self, request: &ScatterRequest) -> Result<()> {
        validate_request(request, &self.config)
    }

    /// Generates all placements for `request`, or none on error.
    ///
    /// Ranges are validated before the count is resolved, so a request that is wrong
    /// on both counts reports the range error. Validation draws nothing from the
    /// generator.
    pub fn generate(&mut self, request: &ScatterRequest) -> Result<ScatterResult> {
        self.generate_with_events(request, &mut ())
    }

    pub fn generate_with_events(
        &mut self,
        request: &ScatterRequest,
        sink: &mut dyn EventSink,
    ) -> Result<ScatterResult> {
        let seed = self.reset_rng();
        generate_internal(request, &self.config, &mut self.rng, Some(seed), sink)
    }

    fn reset_rng(&mut self) -> u64 {
        let seed = match self.config.rng_mode {
            RngMode::Seeded(seed) => seed,
            RngMode::Entropy => rand::rng().next_u64(),
        };
        debug!("Resetting scatter generator to seed {}.", seed);
        self.rng = generator_for(seed);
        seed
    }
}
