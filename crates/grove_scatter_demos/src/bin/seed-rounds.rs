use std::cell::Cell;

use grove_scatter::prelude::*;
use grove_scatter_demos::{
    init_tracing, load_session_file, render_scene_to_png, RenderConfig, Scene,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

// Plays a whole session: each round the player walks the nearest pickups,
// returns to the planting spot and plants.
fn main() -> anyhow::Result<()> {
    init_tracing();
    let path = format!("{}/assets/session.ron", env!("CARGO_MANIFEST_DIR"));
    let session = load_session_file(&path)?;
    let surface = session.terrain.build();

    let spot_position = session.rounds.terrain_center;
    let player = Cell::new(spot_position);
    let mut controller = ProgressionController::new(
        session.rounds.clone(),
        &surface,
        FnReference(|| player.get()),
        RecordingInstantiator::new(),
        StdRng::seed_from_u64(session.seed),
    )?;
    let rc = RenderConfig::new((600, 600), session.terrain.extent());

    controller.start_round()?;
    let mut round = 1;
    loop {
        render_round(&controller, &surface, &rc, round)?;

        let mut pickups: Vec<Spawned<u64>> = controller.pickups().cloned().collect();
        pickups.sort_by(|a, b| {
            let da = a.item.horizontal_distance(player.get());
            let db = b.item.horizontal_distance(player.get());
            da.total_cmp(&db)
        });
        for pickup in pickups {
            if controller.can_advance() {
                break;
            }
            player.set(pickup.item.position);
            controller.collect(&pickup.handle);
        }

        player.set(spot_position);
        let mut spot = PlantingSpot::new(spot_position);
        match spot.try_plant(&mut controller)? {
            Some(AdvanceResult::SessionComplete) => {
                info!("Round {round}: planted, session complete.");
                break;
            }
            Some(outcome) => info!("Round {round}: planted ({outcome:?})."),
            None => {
                warn!(
                    "Round {round}: stuck with {} collected.",
                    controller.state().items_collected_this_round
                );
                break;
            }
        }
        round += 1;
    }

    let inst = controller.instantiator();
    println!(
        "{} pickups spawned, {} despawned, {} left",
        inst.spawned,
        inst.despawned,
        inst.live_count()
    );
    Ok(())
}

fn render_round<S, P, R>(
    controller: &ProgressionController<S, P, RecordingInstantiator, R>,
    surface: &HeightfieldSurface,
    rc: &RenderConfig,
    round: usize,
) -> anyhow::Result<()>
where
    S: SurfaceQuery,
    P: ReferencePointProvider,
    R: rand::Rng,
{
    let items: Vec<PlacedItem> = controller.pickups().map(|s| s.item).collect();
    let zones = [ExcludedZone::new(
        controller.reference_position(),
        controller.config().min_spawn_distance,
    )];
    let scene = Scene {
        items: &items,
        zones: &zones,
        ground: Some(surface),
    };
    render_scene_to_png(&scene, rc, format!("seed-rounds-{round}.png"))?;
    Ok(())
}
