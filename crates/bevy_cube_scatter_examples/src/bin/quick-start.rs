use bevy::prelude::*;
use bevy_cube_scatter::prelude::*;
use rand::RngExt;

/// Resource to hold asset handles
#[derive(Default, Resource)]
struct Handles {
    preset: Handle<ScatterPresetAsset>,
}

/// Shared mesh and materials for every scattered cube.
#[derive(Resource)]
struct CubeMaterials {
    mesh: Handle<Mesh>,
    palette: Vec<Handle<StandardMaterial>>,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(CubeScatterPlugin)
        .init_resource::<Handles>()
        .add_systems(Startup, (setup_scene, load_assets))
        .add_systems(Update, (trigger_preset, rescatter_on_space, spin_groups))
        .add_observer(on_scatter_finished)
        .run();
}

/// Camera, light and the shared cube mesh.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 25.0, 40.0).looking_at(Vec3::new(0.0, 10.0, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 30.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let mut rng = rand::rng();
    let palette = (0..8)
        .map(|_| {
            materials.add(StandardMaterial {
                base_color: Color::srgb(
                    rng.random_range(0.2..=1.0),
                    rng.random_range(0.2..=1.0),
                    rng.random_range(0.2..=1.0),
                ),
                ..default()
            })
        })
        .collect();

    commands.insert_resource(CubeMaterials {
        mesh: meshes.add(Mesh::from(Cuboid::new(1.0, 1.0, 1.0))),
        palette,
    });
}

/// Load assets on startup.
fn load_assets(mut handles: ResMut<Handles>, asset_server: Res<AssetServer>) {
    handles.preset = asset_server.load("classic.cubescatter");
}

/// Runs the preset once it is loaded. The preset pins seed 1234, so the first
/// layout is the same on every start.
fn trigger_preset(
    mut commands: Commands,
    mut once: Local<bool>,
    handles: Res<Handles>,
    presets: Res<Assets<ScatterPresetAsset>>,
) {
    if *once || presets.get(&handles.preset).is_none() {
        return;
    }

    let entity = commands.spawn_empty().id();
    commands.trigger(ScatterPresetRequest::new(entity, handles.preset.clone()));
    *once = true;
}

/// Space replaces the batch with a fresh, unseeded one using the preset's ranges.
fn rescatter_on_space(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    handles: Res<Handles>,
    presets: Res<Assets<ScatterPresetAsset>>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    let Some(preset) = presets.get(&handles.preset) else {
        return;
    };

    let entity = commands.spawn_empty().id();
    commands.trigger(
        ScatterCubesRequest::new(entity, preset.request.clone().with_random_count())
            .with_options(preset.options()),
    );
}

/// Gives every new instance the shared mesh and a random material.
fn on_scatter_finished(
    finished: On<ScatterCubesFinished>,
    mut commands: Commands,
    cubes: Res<CubeMaterials>,
) {
    let mut rng = rand::rng();
    let report = &finished.report;

    commands
        .entity(report.base)
        .insert((Mesh3d(cubes.mesh.clone()), MeshMaterial3d(cubes.palette[0].clone())));
    for &instance in &report.instances {
        let material = cubes.palette[rng.random_range(0..cubes.palette.len())].clone();
        commands
            .entity(instance)
            .insert((Mesh3d(cubes.mesh.clone()), MeshMaterial3d(material)));
    }

    info!("{}", report.message());
    commands.entity(finished.entity).despawn();
}

/// Slowly turns each batch about its recentered pivot.
fn spin_groups(time: Res<Time>, mut groups: Query<&mut Transform, With<ScatterGroup>>) {
    for mut transform in &mut groups {
        transform.rotate_y(0.2 * time.delta_secs());
    }
}
