//! Bevy plugin for cube_scatter providing a `World` scene binding, entity events and presets.
#![forbid(unsafe_code)]

#[cfg(feature = "ron")]
pub use assets::{ScatterPresetAsset, ScatterPresetAssetLoader};
use bevy::prelude::*;
use cube_scatter::prelude::{
    scatter_cubes_with_events, BatchOptions, BatchReport, ScatterPlanner, ScatterRequest,
};
pub use events::{MessageSink, ScatterMessage, ScatterMessageFilter};
pub use scene::{CubeShape, ScatterBase, ScatterGroup, ScatterInstance, WorldSceneBinding};

#[cfg(feature = "ron")]
mod assets;
mod events;
mod scene;

/// Convenient re-exports for common types. Import with `use bevy_cube_scatter::prelude::*;`.
pub mod prelude {
    pub use cube_scatter::prelude::*;

    #[cfg(feature = "ron")]
    pub use crate::assets::{ScatterPresetAsset, ScatterPresetAssetLoader};
    #[cfg(feature = "ron")]
    pub use crate::ScatterPresetRequest;
    pub use crate::events::{MessageSink, ScatterMessage, ScatterMessageFilter};
    pub use crate::scene::{
        CubeShape, ScatterBase, ScatterGroup, ScatterInstance, WorldSceneBinding,
    };
    pub use crate::{
        CubeScatterPlanner, CubeScatterPlugin, ScatterBatch, ScatterCubesFailed,
        ScatterCubesFinished, ScatterCubesRequest,
    };
}

/// Bevy plugin providing resources, message types and observers.
pub struct CubeScatterPlugin;

/// Planner used by requests without their own seed.
///
/// Draws a fresh seed per run by default; insert [`CubeScatterPlanner::seeded`]
/// before adding the plugin for repeatable runs.
#[derive(Resource)]
pub struct CubeScatterPlanner(pub ScatterPlanner);

impl Default for CubeScatterPlanner {
    fn default() -> Self {
        Self(ScatterPlanner::new())
    }
}

impl CubeScatterPlanner {
    pub fn seeded(seed: u64) -> Self {
        Self(ScatterPlanner::seeded(seed))
    }
}

/// A request to scatter cubes into the world, tracked by `entity`.
#[non_exhaustive]
#[derive(EntityEvent, Clone, Debug)]
pub struct ScatterCubesRequest {
    /// Entity used to track the request.
    pub entity: Entity,
    /// Count and ranges to plan with.
    pub request: ScatterRequest,
    /// Naming of the created entities.
    pub options: BatchOptions,
    /// Seed for this run only; `None` uses [`CubeScatterPlanner`].
    pub seed: Option<u64>,
}

impl ScatterCubesRequest {
    pub fn new(entity: Entity, request: ScatterRequest) -> Self {
        Self {
            entity,
            request,
            options: BatchOptions::default(),
            seed: None,
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A request to run a loaded [`ScatterPresetAsset`].
#[cfg(feature = "ron")]
#[non_exhaustive]
#[derive(EntityEvent, Clone, Debug)]
pub struct ScatterPresetRequest {
    pub entity: Entity,
    pub preset: Handle<ScatterPresetAsset>,
}

#[cfg(feature = "ron")]
impl ScatterPresetRequest {
    pub fn new(entity: Entity, preset: Handle<ScatterPresetAsset>) -> Self {
        Self { entity, preset }
    }
}

/// [`EntityEvent`] triggered when a batch has been materialized.
#[non_exhaustive]
#[derive(EntityEvent, Clone, Debug)]
pub struct ScatterCubesFinished {
    /// Entity associated with the original request.
    pub entity: Entity,
    /// Created entities and their names.
    pub report: BatchReport<Entity, Entity>,
}

/// [`EntityEvent`] triggered when a request was rejected or the world could not be updated.
#[non_exhaustive]
#[derive(EntityEvent, Clone, Debug)]
pub struct ScatterCubesFailed {
    pub entity: Entity,
    pub error: String,
    /// `true` when nothing was touched because the request itself was invalid.
    pub invalid_request: bool,
}

/// Component inserted on the request entity once its batch exists.
#[derive(Component, Debug, Clone)]
pub struct ScatterBatch {
    pub base: Entity,
    pub group: Entity,
    pub instances: Vec<Entity>,
    pub seed: Option<u64>,
}

impl Plugin for CubeScatterPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ScatterMessage>()
            .init_resource::<CubeScatterPlanner>()
            .init_resource::<ScatterMessageFilter>()
            .add_observer(run_scatter_request);

        #[cfg(feature = "ron")]
        app.init_asset::<ScatterPresetAsset>()
            .init_asset_loader::<ScatterPresetAssetLoader>()
            .add_observer(run_preset_request);
    }
}

fn run_scatter_request(request: On<ScatterCubesRequest>, mut commands: Commands) {
    let request = ScatterCubesRequest::clone(&request);
    commands.queue(move |world: &mut World| scatter_into_world(world, request));
}

#[cfg(feature = "ron")]
fn run_preset_request(
    request: On<ScatterPresetRequest>,
    mut commands: Commands,
    presets: Res<Assets<ScatterPresetAsset>>,
) {
    let Some(preset) = presets.get(&request.preset) else {
        error!("ScatterPresetAsset not loaded yet: {:?}", request.preset);
        return;
    };
    commands.trigger(preset.to_request(request.entity));
}

/// Runs one batch against `world` and triggers [`ScatterCubesFinished`] or
/// [`ScatterCubesFailed`] for the request entity.
pub fn scatter_into_world(world: &mut World, request: ScatterCubesRequest) {
    let entity = request.entity;
    let filter = world
        .get_resource::<ScatterMessageFilter>()
        .cloned()
        .unwrap_or_default();
    let mut sink = MessageSink::new(entity, filter);

    if !world.contains_resource::<CubeScatterPlanner>() {
        world.init_resource::<CubeScatterPlanner>();
    }
    let outcome = world.resource_scope(|world, mut shared: Mut<CubeScatterPlanner>| {
        let mut scene = WorldSceneBinding::new(world);
        match request.seed {
            Some(seed) => {
                let config = shared.0.config().with_seed(seed);
                let mut planner = ScatterPlanner::from_config(config);
                scatter_cubes_with_events(
                    &mut planner,
                    &mut scene,
                    &request.request,
                    &request.options,
                    &mut sink,
                )
            }
            None => scatter_cubes_with_events(
                &mut shared.0,
                &mut scene,
                &request.request,
                &request.options,
                &mut sink,
            ),
        }
    });
    sink.flush(world);

    match outcome {
        Ok(report) => {
            if let Ok(mut tracked) = world.get_entity_mut(entity) {
                tracked.insert(ScatterBatch {
                    base: report.base,
                    group: report.group,
                    instances: report.instances.clone(),
                    seed: report.seed,
                });
            }
            world.trigger(ScatterCubesFinished { entity, report });
        }
        Err(err) => {
            let invalid_request = err.is_invalid_request();
            if invalid_request {
                warn!("Scatter request for {:?} rejected: {}", entity, err);
            } else {
                error!("Scatter batch for {:?} failed: {}", entity, err);
            }
            world.trigger(ScatterCubesFailed {
                entity,
                error: err.to_string(),
                invalid_request,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use cube_scatter::prelude::{ScatterEvent, ScatterEventKind};

    use super::*;

    #[derive(Resource, Default)]
    struct Outcomes {
        finished: Vec<BatchReport<Entity, Entity>>,
        failed: Vec<(String, bool)>,
    }

    fn setup_app() -> App {
        let mut app = App::new();
        app.add_message::<ScatterMessage>()
            .init_resource::<CubeScatterPlanner>()
            .init_resource::<ScatterMessageFilter>()
            .init_resource::<Outcomes>()
            .add_observer(run_scatter_request)
            .add_observer(
                |finished: On<ScatterCubesFinished>, mut outcomes: ResMut<Outcomes>| {
                    outcomes.finished.push(finished.report.clone());
                },
            )
            .add_observer(
                |failed: On<ScatterCubesFailed>, mut outcomes: ResMut<Outcomes>| {
                    outcomes
                        .failed
                        .push((failed.error.clone(), failed.invalid_request));
                },
            );
        app
    }

    fn settle(app: &mut App) {
        for _ in 0..3 {
            app.world_mut().flush();
        }
    }

    fn positions(app: &App, report: &BatchReport<Entity, Entity>) -> Vec<Vec3> {
        report
            .instances
            .iter()
            .map(|&e| app.world().get::<Transform>(e).unwrap().translation)
            .collect()
    }

    #[test]
    fn request_spawns_batch_and_reports() {
        let mut app = setup_app();
        let entity = app.world_mut().spawn_empty().id();
        app.world_mut().trigger(
            ScatterCubesRequest::new(entity, ScatterRequest::new().with_count(6)).with_seed(9),
        );
        settle(&mut app);

        let outcomes = app.world().resource::<Outcomes>();
        assert_eq!(outcomes.finished.len(), 1);
        let report = outcomes.finished[0].clone();
        assert_eq!(report.count(), 6);
        assert_eq!(report.seed, Some(9));
        assert_eq!(report.group_name, "myCube1_instance_grp1");

        let batch = app.world().get::<ScatterBatch>(entity).expect("tracked");
        assert_eq!(batch.group, report.group);
        assert_eq!(batch.instances.len(), 6);
        assert!(!app.world().resource::<Messages<ScatterMessage>>().is_empty());
    }

    #[test]
    fn seeded_requests_repeat_exactly() {
        let mut app = setup_app();
        let entity = app.world_mut().spawn_empty().id();
        let request =
            ScatterCubesRequest::new(entity, ScatterRequest::fixed_batch()).with_seed(1234);

        app.world_mut().trigger(request.clone());
        settle(&mut app);
        let first = app.world().resource::<Outcomes>().finished[0].clone();
        let first_positions = positions(&app, &first);

        app.world_mut().trigger(request);
        settle(&mut app);
        let second = app.world().resource::<Outcomes>().finished[1].clone();
        let second_positions = positions(&app, &second);

        assert_eq!(first_positions, second_positions);
        // The first batch was deleted before the second was created.
        assert!(app.world().get_entity(first.instances[0]).is_err());
        assert_eq!(second.count(), 50);
    }

    #[test]
    fn invalid_request_reports_failure_without_spawning() {
        let mut app = setup_app();
        let entity = app.world_mut().spawn_empty().id();
        let before = app.world().entities().len();

        app.world_mut().trigger(ScatterCubesRequest::new(
            entity,
            ScatterRequest::new().with_count(0),
        ));
        settle(&mut app);

        let outcomes = app.world().resource::<Outcomes>();
        assert!(outcomes.finished.is_empty());
        assert_eq!(outcomes.failed.len(), 1);
        assert!(outcomes.failed[0].1);
        assert_eq!(app.world().entities().len(), before);
        assert!(app.world().get::<ScatterBatch>(entity).is_none());
    }

    #[cfg(feature = "ron")]
    #[test]
    fn preset_request_uses_preset_seed_and_name() {
        let mut app = setup_app();
        app.add_observer(run_preset_request);

        let mut assets = Assets::<ScatterPresetAsset>::default();
        let preset = assets.add(ScatterPresetAsset {
            request: ScatterRequest::new().with_count(3),
            seed: Some(77),
            base_name: "pillar".into(),
        });
        app.world_mut().insert_resource(assets);

        let entity = app.world_mut().spawn_empty().id();
        app.world_mut().trigger(ScatterPresetRequest::new(entity, preset));
        settle(&mut app);

        let outcomes = app.world().resource::<Outcomes>();
        assert_eq!(outcomes.finished.len(), 1);
        assert_eq!(outcomes.finished[0].seed, Some(77));
        assert_eq!(outcomes.finished[0].base_name, "pillar1");
    }

    #[test]
    fn message_filter_limits_forwarded_events() {
        let mut app = setup_app();
        app.insert_resource(ScatterMessageFilter::only([ScatterEventKind::BatchFinished]));
        let entity = app.world_mut().spawn_empty().id();
        app.world_mut().trigger(
            ScatterCubesRequest::new(entity, ScatterRequest::new().with_count(4)).with_seed(3),
        );
        settle(&mut app);

        let messages = app.world().resource::<Messages<ScatterMessage>>();
        assert_eq!(messages.len(), 1);
        let mut cursor = messages.get_cursor();
        let message = cursor.read(messages).next().expect("one message");
        assert_eq!(message.request_entity, entity);
        assert!(matches!(
            message.event,
            ScatterEvent::BatchFinished { count: 4, .. }
        ));
    }
}
