use cube_scatter::prelude::*;
use cube_scatter_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Fifty cubes, reseeded before every run: both batches below are identical.
    let request = ScatterRequest::fixed_batch();
    let mut planner = ScatterPlanner::seeded(CLASSIC_SEED);
    let mut scene = MemoryScene::new();

    for run in 0..2 {
        let mut sink = FnSink::new(|event| match event {
            ScatterEvent::RunStarted { count, seed } => {
                println!("run {run}: planning {count} placements (seed {seed:?})");
            }
            ScatterEvent::PlacementGenerated { index, placement } if index < 3 => {
                println!(
                    "  #{index}: pos=({:.3}, {:.3}, {:.3}) rot=({:.1}, {:.1}, {:.1}) scale={:.3}",
                    placement.position.x,
                    placement.position.y,
                    placement.position.z,
                    placement.rotation_degrees.x,
                    placement.rotation_degrees.y,
                    placement.rotation_degrees.z,
                    placement.uniform_scale
                );
            }
            ScatterEvent::BatchFinished { group, count } => {
                println!("run {run}: {count} instances under '{group}'");
            }
            ScatterEvent::Warning { context, message } => {
                eprintln!("warning [{context}]: {message}");
            }
            _ => {}
        });

        let report = scatter_cubes_with_events(
            &mut planner,
            &mut scene,
            &request,
            &BatchOptions::default(),
            &mut sink,
        )?;
        println!("{} ({} leftover nodes removed)", report.message(), report.deleted);
    }

    Ok(())
}
