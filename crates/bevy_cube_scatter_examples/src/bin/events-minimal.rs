use bevy::prelude::*;
use bevy_cube_scatter::prelude::*;

#[derive(Default, Resource)]
struct PresetHandle(Handle<ScatterPresetAsset>);

fn main() {
    App::new()
        .init_resource::<PresetHandle>()
        .add_plugins(DefaultPlugins)
        .add_plugins(CubeScatterPlugin)
        .add_systems(Startup, load_assets)
        .add_systems(Update, trigger_request)
        .add_systems(Update, on_scatter_message)
        .add_observer(print_result)
        .add_observer(print_failure)
        .run();
}

/// Loads the preset asset on startup.
fn load_assets(mut preset: ResMut<PresetHandle>, asset_server: Res<AssetServer>) {
    preset.0 = asset_server.load("tower.cubescatter");
}

/// Triggers a preset request once the asset is loaded.
fn trigger_request(
    mut commands: Commands,
    mut once: Local<bool>,
    handle: Res<PresetHandle>,
    assets: Res<Assets<ScatterPresetAsset>>,
) {
    // Only run once.
    if *once {
        return;
    }
    // Wait until the asset is loaded.
    if assets.get(&handle.0).is_none() {
        return;
    }

    // Spawn an entity to track the request.
    let entity = commands.spawn_empty().id();
    commands.trigger(ScatterPresetRequest::new(entity, handle.0.clone()));

    *once = true;
}

fn on_scatter_message(mut reader: MessageReader<ScatterMessage>) {
    for msg in reader.read() {
        let entity = msg.request_entity;

        match &msg.event {
            ScatterEvent::RunStarted { count, seed } => {
                info!(
                    "Scatter run started for entity {:?}: {count} cube(s), seed {:?}",
                    entity, seed
                );
            }
            ScatterEvent::PlacementGenerated { index, placement } => {
                debug!(
                    "Placement #{index}: p=({:.2},{:.2},{:.2}) scale={:.2}",
                    placement.position.x,
                    placement.position.y,
                    placement.position.z,
                    placement.uniform_scale
                );
            }
            ScatterEvent::InstanceCreated { index, name } => {
                debug!("Instance #{index} created: '{name}'");
            }
            ScatterEvent::BatchFinished { group, count } => {
                info!("Batch finished: {count} instance(s) under '{group}'");
            }
            ScatterEvent::Warning { context, message } => {
                warn!("Warning '{}': {}", context, message);
            }
            _ => {}
        }
    }
}

/// Observes the `EntityEvent` when a batch has been created.
fn print_result(finished: On<ScatterCubesFinished>, mut commands: Commands) {
    info!("{} (seed {:?})", finished.report.message(), finished.report.seed);

    // The cubes stay; only the tracking entity is removed.
    commands.entity(finished.entity).despawn();
}

fn print_failure(failed: On<ScatterCubesFailed>) {
    warn!("Scatter request {} failed: {}", failed.entity, failed.error);
}
