use std::path::Path;

use cube_scatter::prelude::*;
use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG` (defaults to `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Top-down (X right, Z down) preview settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World-space X/Z span covered by the image.
    pub extent: Vec2,
    /// World-space X/Z point at the image center.
    pub center: Vec2,
    pub background: [u8; 3],
    /// Color of the lowest cubes; the highest are drawn in `high_color`.
    pub low_color: [u8; 3],
    pub high_color: [u8; 3],
    pub pivot_color: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), extent: Vec2) -> Self {
        Self {
            image_size,
            extent,
            center: Vec2::ZERO,
            background: [26, 26, 26],
            low_color: [40, 70, 160],
            high_color: [250, 220, 120],
            pivot_color: [230, 60, 60],
        }
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    fn to_pixel(&self, x: f32, z: f32) -> (i64, i64) {
        let (w, h) = self.image_size;
        let min = self.center - self.extent * 0.5;
        let u = (x - min.x) / self.extent.x;
        let v = (z - min.y) / self.extent.y;
        ((u * w as f32).floor() as i64, (v * h as f32).floor() as i64)
    }
}

/// Renders visible cubes of `scene` as their X/Z bounds, shaded by height, plus group pivots.
pub fn render_scene_to_png(
    scene: &MemoryScene,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    anyhow::ensure!(w > 0 && h > 0, "image size must be non-zero");
    anyhow::ensure!(
        config.extent.x > 0.0 && config.extent.y > 0.0,
        "render extent must be positive"
    );

    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    let mut boxes: Vec<Aabb> = scene
        .nodes()
        .filter(|(_, node)| node.visible && !node.is_group())
        .filter_map(|(id, _)| scene.local_bounds(id))
        .collect();
    // Higher cubes are drawn last so they sit on top in a view from above.
    boxes.sort_by(|a, b| a.max.y.total_cmp(&b.max.y));

    let (y_lo, y_hi) = boxes.iter().fold((f32::MAX, f32::MIN), |(lo, hi), b| {
        (lo.min(b.center().y), hi.max(b.center().y))
    });
    let y_span = (y_hi - y_lo).max(f32::EPSILON);

    for b in &boxes {
        let t = ((b.center().y - y_lo) / y_span).clamp(0.0, 1.0);
        let color = lerp_color(config.low_color, config.high_color, t);
        let (x0, y0) = config.to_pixel(b.min.x, b.min.z);
        let (x1, y1) = config.to_pixel(b.max.x, b.max.z);
        fill_rect(&mut img, x0, y0, x1, y1, color);
    }

    for (_, node) in scene.nodes().filter(|(_, node)| node.is_group()) {
        let (px, py) = config.to_pixel(node.pivot.x, node.pivot.z);
        draw_cross(&mut img, px, py, 6, config.pivot_color);
    }

    img.save(path.as_ref())?;
    info!(
        "Wrote {} cubes to {}.",
        boxes.len(),
        path.as_ref().display()
    );
    Ok(())
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    std::array::from_fn(|i| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8)
}

fn fill_rect(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for y in y0.max(0)..=y1.min(h - 1) {
        for x in x0.max(0)..=x1.min(w - 1) {
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

fn draw_cross(img: &mut RgbImage, cx: i64, cy: i64, arm: i64, color: [u8; 3]) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for d in -arm..=arm {
        for (x, y) in [(cx + d, cy), (cx, cy + d)] {
            if (0..w).contains(&x) && (0..h).contains(&y) {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
