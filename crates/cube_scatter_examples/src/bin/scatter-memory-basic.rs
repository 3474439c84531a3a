use cube_scatter::prelude::*;
use cube_scatter_examples::{init_tracing, render_scene_to_png, RenderConfig};
use glam::Vec2;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Default ranges: x and z in [-10, 10], y in [0, 20], scale in [0.5, 1.5].
    // The count is left open, so the planner picks one in [10, 100].
    let request = ScatterRequest::new();

    // Fixed seed: every run of this example produces the same scene.
    let mut planner = ScatterPlanner::seeded(CLASSIC_SEED);
    let mut scene = MemoryScene::new();

    let report = scatter_cubes(&mut planner, &mut scene, &request, &BatchOptions::default())?;
    println!("{}", report.message());
    println!(
        "base '{}' hidden, {} nodes in scene, seed {:?}",
        report.base_name,
        scene.len(),
        report.seed
    );

    let rc = RenderConfig::new((800, 800), Vec2::new(24.0, 24.0));
    render_scene_to_png(&scene, &rc, "scatter-memory-basic.png")?;

    Ok(())
}
