mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec3;
use grove_scatter::prelude::{
    place, Category, ExcludedZone, FlatSurface, HeightfieldSurface, PlacementRequest,
    SurfaceQuery,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn build_request(count: usize, radius: f32, min_separation: f32) -> PlacementRequest {
    PlacementRequest::new(Vec3::ZERO, radius, count)
        .with_min_separation(min_separation)
        .with_profile_multipliers(&Category::DECORATION_ORDER)
        .with_excluded_zone(ExcludedZone::new(Vec3::new(3.0, 0.0, 3.0), 2.0))
}

fn mixed(rng: &mut dyn Rng) -> Category {
    Category::DECORATION_ORDER[(rng.next_u32() % 4) as usize]
}

fn bench_surface<S: SurfaceQuery>(c: &mut Criterion, name: &str, surface: &S) {
    let mut group = c.benchmark_group(name);

    for &(count, radius) in &[(50usize, 25.0f32), (200, 25.0), (200, 60.0)] {
        let request = build_request(count, radius, 2.5);
        let mut rng_preview = StdRng::seed_from_u64(0xD3ADB33F);
        let preview = place(&request, surface, mixed, &mut rng_preview, None)
            .expect("valid request");
        group.throughput(common::elements_throughput(preview.placed()));

        group.bench_function(format!("n{count}_r{radius}"), |b| {
            b.iter_batched(
                || StdRng::seed_from_u64(0xC0FFEE),
                |mut rng| {
                    let result = place(black_box(&request), surface, mixed, &mut rng, None)
                        .expect("valid request");
                    black_box(result.placed())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_planner(c: &mut Criterion) {
    bench_surface(c, "planner_flat", &FlatSurface::new(0.0));

    let holed = HeightfieldSurface::from_fn(128.0, 1.0, |p| {
        ((p.x * 0.15).sin() * (p.y * 0.15).cos() > -0.4).then_some(0.0)
    });
    bench_surface(c, "planner_holed", &holed);
}

fn bench_saturated(c: &mut Criterion) {
    let request = build_request(1000, 5.0, 2.0).with_max_total_attempts(5000);
    let surface = FlatSurface::new(0.0);
    c.bench_function("planner_saturated_budget", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(7),
            |mut rng| {
                let result = place(&request, &surface, mixed, &mut rng, None)
                    .expect("valid request");
                black_box(result.attempts)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = bench_planner, bench_saturated
}
criterion_main!(benches);
