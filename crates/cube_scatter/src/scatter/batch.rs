//! Batch orchestration: turn a [`ScatterResult`] into scene objects.
//!
//! The order of scene calls is fixed: clear leftovers from a previous run, create the
//! base cube and the group, then per placement instantiate, parent and transform, and
//! finally hide the base and recenter the group pivot.
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::scatter::events::{EventSink, ScatterEvent, ScatterEventKind};
use crate::scatter::naming::AUTO_SUFFIX;
use crate::scatter::planner::{ScatterPlanner, ScatterResult};
use crate::scatter::request::ScatterRequest;
use crate::scatter::scene::SceneBinding;

pub const DEFAULT_BASE_NAME: &str = "myCube";

/// Options for materializing a batch.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchOptions {
    /// Stem for every created name; objects matching `{base_name}*` are deleted first.
    pub base_name: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_owned(),
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_name.trim().is_empty() {
            return Err(Error::InvalidRequest("base name must not be empty".into()));
        }
        if self.base_name.contains(['*', AUTO_SUFFIX]) {
            return Err(Error::InvalidRequest(format!(
                "base name '{}' must not contain '*' or '{AUTO_SUFFIX}'",
                self.base_name
            )));
        }
        Ok(())
    }

    /// Pattern matching everything a previous run with this base name created.
    pub fn cleanup_pattern(&self) -> String {
        format!("{}*", self.base_name)
    }
}

/// What a batch created.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct BatchReport<O, G> {
    /// The hidden source cube.
    pub base: O,
    /// Group holding every instance.
    pub group: G,
    /// Instances in placement order.
    pub instances: Vec<O>,
    /// Realized name of the base cube.
    pub base_name: String,
    /// Realized name of the group.
    pub group_name: String,
    /// Number of leftover nodes deleted before creation.
    pub deleted: usize,
    /// Seed of the planning run, if known.
    pub seed: Option<u64>,
}

impl<O, G> BatchReport<O, G> {
    pub fn count(&self) -> usize {
        self.instances.len()
    }

    /// One-line summary for the user.
    pub fn message(&self) -> String {
        format!(
            "Scattered {} cubes into '{}'.",
            self.instances.len(),
            self.group_name
        )
    }
}

/// Materializes `result` into `scene`.
///
/// Scene failures are returned unchanged; objects created before the failure stay in
/// the scene.
pub fn materialize<S: SceneBinding>(
    scene: &mut S,
    result: &ScatterResult,
    options: &BatchOptions,
    sink: &mut dyn EventSink,
) -> Result<BatchReport<S::Object, S::Group>> {
    options.validate()?;

    if sink.wants(ScatterEventKind::BatchStarted) {
        sink.send(ScatterEvent::BatchStarted {
            base_name: options.base_name.clone(),
            count: result.len(),
        });
    }

    let deleted = scene.delete_matching(&options.cleanup_pattern())?;
    if deleted > 0 {
        debug!(
            "Deleted {} leftover nodes matching '{}'.",
            deleted,
            options.cleanup_pattern()
        );
    }

    let base = scene.create_base_primitive(&format!("{}{AUTO_SUFFIX}", options.base_name))?;
    let base_name = scene.object_name(&base);
    let group = scene.create_group(&format!("{base_name}_instance_grp{AUTO_SUFFIX}"))?;
    let group_name = scene.group_name(&group);

    let instance_name = format!("{base_name}_instance{AUTO_SUFFIX}");
    let mut instances = Vec::with_capacity(result.len());
    for (index, placement) in result.iter().enumerate() {
        let instance = scene.instantiate(&base, &instance_name)?;
        scene.parent(&instance, &group)?;
        scene.apply_transform(&instance, placement)?;

        let name = scene.object_name(&instance);
        debug!(
            "Created instance '{}' at {:?} (scale {}).",
            name, placement.position, placement.uniform_scale
        );
        if sink.wants(ScatterEventKind::InstanceCreated) {
            sink.send(ScatterEvent::InstanceCreated { index, name });
        }
        instances.push(instance);
    }

    scene.hide(&base)?;
    scene.recenter_pivot(&group)?;

    let report = BatchReport {
        base,
        group,
        instances,
        base_name,
        group_name,
        deleted,
        seed: result.seed,
    };
    info!("{}", report.message());

    if sink.wants(ScatterEventKind::BatchFinished) {
        sink.send(ScatterEvent::BatchFinished {
            group: report.group_name.clone(),
            count: report.count(),
        });
    }

    Ok(report)
}

/// Plans and materializes one batch.
///
/// Nothing in `scene` is touched unless planning succeeds.
pub fn scatter_cubes<S: SceneBinding>(
    planner: &mut ScatterPlanner,
    scene: &mut S,
    request: &ScatterRequest,
    options: &BatchOptions,
) -> Result<BatchReport<S::Object, S::Group>> {
    scatter_cubes_with_events(planner, scene, request, options, &mut ())
}

pub fn scatter_cubes_with_events<S: SceneBinding>(
    planner: &mut ScatterPlanner,
    scene: &mut S,
    request: &ScatterRequest,
    options: &BatchOptions,
    sink: &mut dyn EventSink,
) -> Result<BatchReport<S::Object, S::Group>> {
    options.validate()?;
    let result = planner.generate_with_events(request, sink)?;
    materialize(scene, &result, options, sink)
}
