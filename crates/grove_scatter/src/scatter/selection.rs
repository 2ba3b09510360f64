//! Weighted selection helpers.
//!
//! [pick_weighted_random] draws one entry proportionally to its weight and
//! backs [crate::catalog::ObjectCatalog::pick]. Non-positive or non-finite
//! weights never win.
use rand::Rng;

pub fn pick_weighted_random<'a, T>(
    entries: &'a [T],
    weight: impl Fn(&T) -> f32,
    rng: &mut dyn Rng,
) -> Option<&'a T> {
    let usable = |e: &&T| {
        let w = weight(e);
        w.is_finite() && w > 0.0
    };
    let total_weight: f32 = entries.iter().filter(usable).map(&weight).sum();
    if total_weight <= 0.0 {
        return None;
    }

    let mut roll = crate::sampling::rand01(rng) * total_weight;
    let mut last = None;
    for e in entries.iter().filter(usable) {
        roll -= weight(e);
        if roll <= 0.0 {
            return Some(e);
        }
        last = Some(e);
    }

    last
}
