use grove_scatter::prelude::*;
use grove_scatter_demos::{
    init_tracing, load_session_file, render_scene_to_png, RenderConfig, Scene,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let path = format!("{}/assets/session.ron", env!("CARGO_MANIFEST_DIR"));
    let session = load_session_file(&path)?;
    let surface = session.terrain.build();

    let mut decoration = DecorationController::new(
        session.decoration.clone(),
        &surface,
        RecordingInstantiator::new(),
        StdRng::seed_from_u64(session.seed),
    );
    let report = decoration.decorate_configured(&session.catalog)?;

    for pass in &report.passes {
        info!(
            "{}: {} synthesized colliders.",
            pass.category, pass.colliders_synthesized
        );
    }

    let items: Vec<PlacedItem> = decoration.placed().map(|s| s.item).collect();
    let rc = RenderConfig::new((800, 800), session.terrain.extent());
    let scene = Scene {
        items: &items,
        zones: &[],
        ground: Some(&surface),
    };
    let out = "decorate-terrain.png";
    render_scene_to_png(&scene, &rc, out)?;
    println!(
        "{} objects ({} categories skipped) written to {out}",
        items.len(),
        report.skipped.len()
    );
    Ok(())
}
