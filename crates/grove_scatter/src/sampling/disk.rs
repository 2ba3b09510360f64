//! Polar disk sampling used for candidate columns.
use std::f32::consts::TAU;

use mint::Vector2;
use rand::Rng;

use crate::sampling::{rand_range, rand_range_exclusive, CandidateSampling};

/// Samples offsets on an annulus by drawing an angle uniformly in `[0, 2π)`
/// and a distance uniformly in `[min_distance, radius]`.
///
/// Distance is uniform in radius, not in area, so candidates cluster towards
/// the center. Callers relying on the exact draw sequence depend on this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskSampling {
    /// Outer radius in world units.
    pub radius: f32,
    /// Inner radial floor in world units.
    pub min_distance: f32,
}

impl DiskSampling {
    /// Create a sampler over the full disk of `radius`.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            min_distance: 0.0,
        }
    }

    /// Set the inner radial floor.
    pub fn with_min_distance(mut self, min_distance: f32) -> Self {
        self.min_distance = min_distance;
        self
    }
}

impl CandidateSampling for DiskSampling {
    fn sample(&self, rng: &mut dyn Rng) -> Vector2<f32> {
        let angle = rand_range_exclusive(rng, 0.0, TAU);
        let distance = rand_range(rng, self.min_distance, self.radius);
        Vector2 {
            x: angle.cos() * distance,
            y: angle.sin() * distance,
        }
    }
}
