//! Candidate sampling and random helpers shared by the scatter planner.
//!
//! All randomness in the crate flows through an injected [`Rng`], so a
//! seeded generator replays a scatter pass exactly.
use mint::Vector2;
use rand::Rng;

pub mod disk;

pub use disk::DiskSampling;

/// Trait for proposing candidate offsets relative to a pass center.
pub trait CandidateSampling {
    fn sample(&self, rng: &mut dyn Rng) -> Vector2<f32>;
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float in `[lo, hi]`.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    (lo + rand01(rng) * (hi - lo)).clamp(lo, hi)
}

/// Uniform float in `[lo, hi)`. Collapses to `lo` for an empty range.
#[inline]
pub(crate) fn rand_range_exclusive(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    (lo + rand01(rng) * (hi - lo)).clamp(lo, next_down(hi))
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input. Used to keep
/// half-open ranges such as yaw in `[0, 360)` strictly below their upper end
/// even when [`rand01`] rounds up to `1.0`.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
