use std::cell::{Cell, RefCell};

use glam::Vec3;
use grove_scatter::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seed_picker(_: &mut dyn Rng) -> Category {
    Category::Seed
}

fn mixed_picker(rng: &mut dyn Rng) -> Category {
    Category::DECORATION_ORDER[(rng.next_u32() % 4) as usize]
}

/// Bumpy ground with a hole in one quadrant.
fn rough_ground() -> HeightfieldSurface {
    HeightfieldSurface::from_fn(120.0, 1.0, |p| {
        if p.x > 10.0 && p.y > 10.0 {
            None
        } else {
            Some((p.x * 0.3).sin() + (p.y * 0.2).cos())
        }
    })
}

#[test]
fn items_stay_within_radius_and_on_the_surface() {
    let ground = rough_ground();
    for seed in 0..32 {
        let center = Vec3::new(4.0, 0.0, -3.0);
        let request = PlacementRequest::new(center, 30.0, 40).with_min_separation(1.5);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = place(&request, &ground, seed_picker, &mut rng, None).expect("valid");
        for item in &result.items {
            assert!(item.horizontal_distance(center) <= 30.0 + 1e-3);
            let hit = ground
                .query(item.position.x, item.position.z, 10.0, 20.0)
                .expect("item sits on ground");
            assert!((hit.position.y - item.position.y).abs() < 1e-5);
        }
    }
}

#[test]
fn pairwise_and_zone_separation_hold_for_many_seeds() {
    let ground = FlatSurface::new(0.0);
    let zone = ExcludedZone::new(Vec3::new(-2.0, 0.0, 2.0), 4.0);
    for seed in 0..32 {
        let request = PlacementRequest::new(Vec3::ZERO, 20.0, 80)
            .with_min_separation(1.2)
            .with_profile_multipliers(&Category::DECORATION_ORDER)
            .with_excluded_zone(zone);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = place(&request, &ground, mixed_picker, &mut rng, None).expect("valid");

        assert!(result.placed() <= 80);
        for (i, a) in result.items.iter().enumerate() {
            let clearance = request.clearance_from_zone(a.category, &zone);
            assert!(a.horizontal_distance(zone.center) >= clearance - 1e-4);
            for b in &result.items[i + 1..] {
                let min = request.separation_between(a.category, b.category);
                assert!(a.horizontal_distance(b.position) >= min - 1e-4);
            }
        }
    }
}

#[test]
fn generous_area_reliably_reaches_full_count() {
    let ground = FlatSurface::new(0.0);
    let request = PlacementRequest::new(Vec3::ZERO, 50.0, 20).with_min_separation(1.0);
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = place(&request, &ground, seed_picker, &mut rng, None).expect("valid");
        assert_eq!(result.placed(), 20, "seed {seed} fell short");
    }
}

#[test]
fn scenario_five_items_on_flat_ground() {
    let request = PlacementRequest::new(Vec3::ZERO, 10.0, 5)
        .with_min_separation(2.0)
        .with_max_total_attempts(500);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result =
            place(&request, &FlatSurface::new(0.0), seed_picker, &mut rng, None).expect("valid");
        assert_eq!(result.placed(), 5);
        for (i, a) in result.items.iter().enumerate() {
            assert!(a.horizontal_distance(Vec3::ZERO) <= 10.0 + 1e-4);
            for b in &result.items[i + 1..] {
                assert!(a.horizontal_distance(b.position) >= 2.0 - 1e-4);
            }
        }
    }
}

#[test]
fn scenario_impossible_density() {
    let request = PlacementRequest::new(Vec3::ZERO, 1.0, 1000)
        .with_min_separation(2.0)
        .with_max_total_attempts(200);
    let queries = Cell::new(0);
    let ground = FnSurface::new(|_, _| {
        queries.set(queries.get() + 1);
        Some(0.0)
    });
    let mut rng = StdRng::seed_from_u64(5);
    let result = place(&request, &ground, seed_picker, &mut rng, None).expect("no error");
    assert!(result.attempts <= 200);
    assert!(queries.get() <= 200);
    assert!(result.placed() < 1000);
    assert!(!result.is_fulfilled());
}

#[test]
fn scenario_zero_radius_never_queries_surface() {
    let request = PlacementRequest::new(Vec3::ZERO, 0.0, 5);
    let queried = Cell::new(false);
    let ground = FnSurface::new(|_, _| {
        queried.set(true);
        Some(0.0)
    });
    let mut rng = StdRng::seed_from_u64(5);
    let err = place(&request, &ground, seed_picker, &mut rng, None).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(!queried.get());
}

#[test]
fn replaying_draws_and_surface_answers_reproduces_the_result() {
    // Record the surface answers of a first run over real terrain...
    let ground = rough_ground();
    let answers = RefCell::new(Vec::new());
    let recording = FnSurface::new(|x, z| {
        let h = ground.query(x, z, 10.0, 20.0).map(|p| p.position.y);
        answers.borrow_mut().push(h);
        h
    });
    let request = PlacementRequest::new(Vec3::ZERO, 40.0, 50).with_min_separation(2.0);
    let mut rng = StdRng::seed_from_u64(31337);
    let first = place(&request, &recording, mixed_picker, &mut rng, None).expect("valid");

    // ...then replay them in order with the same draws.
    let answers = answers.into_inner();
    let cursor = Cell::new(0);
    let replay = FnSurface::new(|_, _| {
        let h = answers[cursor.get()];
        cursor.set(cursor.get() + 1);
        h
    });
    let mut rng = StdRng::seed_from_u64(31337);
    let second = place(&request, &replay, mixed_picker, &mut rng, None).expect("valid");

    assert_eq!(first.items, second.items);
    assert_eq!(first.surface_misses, second.surface_misses);
    assert_eq!(cursor.get(), answers.len());
}
