use glam::{Vec2, Vec3};
use grove_scatter::prelude::*;
use grove_scatter_demos::{init_tracing, render_scene_to_png, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

// Shows how the polar disk sampler concentrates candidates towards the center:
// equal-width rings receive roughly equal counts although outer rings have
// much more area.
fn main() -> anyhow::Result<()> {
    init_tracing();
    let radius = 40.0;
    let samples = 4000;
    let rings = 8;

    let sampler = DiskSampling::new(radius);
    let mut rng = StdRng::seed_from_u64(1);
    let points: Vec<Vec2> = (0..samples)
        .map(|_| Vec2::from(sampler.sample(&mut rng)))
        .collect();

    let mut counts = vec![0usize; rings];
    for p in &points {
        let ring = ((p.length() / radius) * rings as f32) as usize;
        counts[ring.min(rings - 1)] += 1;
    }
    for (i, count) in counts.iter().enumerate() {
        let inner = radius * i as f32 / rings as f32;
        let outer = radius * (i + 1) as f32 / rings as f32;
        let area = std::f32::consts::PI * (outer * outer - inner * inner);
        println!(
            "ring {inner:>4.1}..{outer:<4.1}  {count:>4} samples  {:>6.3} per unit area",
            *count as f32 / area
        );
    }

    let items: Vec<PlacedItem> = points
        .iter()
        .map(|p| PlacedItem::new(Vec3::new(p.x, 0.0, p.y), Category::Grass))
        .collect();
    let rc = RenderConfig::new((600, 600), radius * 2.2).with_background([250, 250, 245]);
    let scene = Scene {
        items: &items,
        zones: &[ExcludedZone::new(Vec3::ZERO, radius)],
        ground: None,
    };
    let out = "sampling-radius-bias.png";
    render_scene_to_png(&scene, &rc, out)?;
    info!("{samples} samples written to {out}.");
    Ok(())
}
