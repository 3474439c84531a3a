use cube_scatter::prelude::*;
use cube_scatter_examples::{init_tracing, render_scene_to_png, RenderConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Usage: scatter-form-input [COUNT] [MIN_TICKS] [MAX_TICKS] [XMIN XMAX YMIN YMAX ZMIN ZMAX]
///
/// COUNT may be blank (`""`) for a random count. Ticks are hundredths of a unit:
/// the minimum slider accepts 1..=100, the maximum slider 1..=200.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut form = ScatterForm::default();
    if let Some(count) = args.first() {
        form.count_text = count.clone();
    }
    if let Some(ticks) = args.get(1) {
        form.min_scale_ticks = ticks.parse()?;
    }
    if let Some(ticks) = args.get(2) {
        form.max_scale_ticks = ticks.parse()?;
    }
    if args.len() >= 9 {
        let v: Vec<f32> = args[3..9]
            .iter()
            .map(|s| s.parse::<f32>())
            .collect::<std::result::Result<_, _>>()?;
        form.x = (v[0], v[1]);
        form.y = (v[2], v[3]);
        form.z = (v[4], v[5]);
    }

    // Invalid input is reported and nothing is created.
    let request = match form.to_request() {
        Ok(request) => request,
        Err(err) => {
            eprintln!("warning: {err}");
            return Ok(());
        }
    };

    // Plan with a caller-owned generator, then materialize separately.
    let mut rng = StdRng::seed_from_u64(2025);
    let result = match generate_with_rng(&request, &PlannerConfig::default(), &mut rng) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("warning: {err}");
            return Ok(());
        }
    };

    let mut scene = MemoryScene::new();
    let report = materialize(&mut scene, &result, &BatchOptions::default(), &mut ())?;
    println!("{}", report.message());

    let p = &request.position_range;
    let extent = Vec2::new(p.x.span().max(1.0), p.z.span().max(1.0)) * 1.2;
    let center = Vec2::new((p.x.min + p.x.max) * 0.5, (p.z.min + p.z.max) * 0.5);
    let rc = RenderConfig::new((800, 800), extent).with_center(center);
    render_scene_to_png(&scene, &rc, "scatter-form-input.png")?;

    Ok(())
}
