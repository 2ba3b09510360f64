//! Bounded rejection sampling over a disk.
//!
//! [`place`] draws candidate columns from a [`DiskSampling`], drops them onto
//! the ground through a [`SurfaceQuery`] and keeps those that respect the
//! request's separation rules. Every iteration consumes one attempt, so a pass
//! always halts after at most `max_total_attempts` candidate evaluations and
//! returns whatever it managed to place.
use glam::{Vec2, Vec3, Vec3Swizzles};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::sampling::{rand_range, rand_range_exclusive, CandidateSampling, DiskSampling};
use crate::scatter::events::{EventSink, RejectReason, ScatterEvent, ScatterEventKind};
use crate::scatter::request::{ExcludedZone, PlacementRequest};
use crate::scatter::{Category, SCALE_RANGE};
use crate::surface::SurfaceQuery;

/// An accepted placement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedItem {
    /// World position on the walkable surface (plus the request's lift).
    pub position: Vec3,
    pub category: Category,
    /// Yaw in degrees, in `[0, 360)`.
    pub rotation_y: f32,
    /// Uniform scale, in `[0.8, 1.2]`.
    pub scale: f32,
}

impl PlacedItem {
    pub fn new(position: Vec3, category: Category) -> Self {
        Self {
            position,
            category,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }

    /// Horizontal (x/z) distance to `point`.
    #[inline]
    pub fn horizontal_distance(&self, point: Vec3) -> f32 {
        self.position.xz().distance(point.xz())
    }
}

/// Outcome of one scatter pass.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct PlacementResult {
    /// Accepted items in insertion order.
    pub items: Vec<PlacedItem>,
    /// Item count the request asked for.
    pub requested: usize,
    /// Candidate evaluations consumed.
    pub attempts: usize,
    /// Candidates whose column had no walkable surface.
    pub surface_misses: usize,
    /// Candidates rejected for separation or excluded zones.
    pub rejected: usize,
}

impl PlacementResult {
    /// Creates an empty result for a request of `requested` items.
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    /// Number of items placed.
    pub fn placed(&self) -> usize {
        self.items.len()
    }

    /// Whether every requested item was placed.
    pub fn is_fulfilled(&self) -> bool {
        self.items.len() >= self.requested
    }

    /// Requested items that could not be placed within the budget.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.items.len())
    }

    pub fn into_items(self) -> Vec<PlacedItem> {
        self.items
    }
}

/// Runs scatter passes against a fixed surface.
pub struct ScatterPlanner<'a, S: SurfaceQuery + ?Sized> {
    /// Ground queried for every candidate column.
    pub surface: &'a S,
}

impl<'a, S: SurfaceQuery + ?Sized> ScatterPlanner<'a, S> {
    pub fn new(surface: &'a S) -> Self {
        Self { surface }
    }

    /// Places items for `request`, drawing categories from `picker`.
    pub fn place<F, R>(
        &self,
        request: &PlacementRequest,
        picker: F,
        rng: &mut R,
    ) -> Result<PlacementResult>
    where
        F: FnMut(&mut dyn Rng) -> Category,
        R: Rng,
    {
        place(request, self.surface, picker, rng, None)
    }

    pub fn place_with_events<F, R>(
        &self,
        request: &PlacementRequest,
        picker: F,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<PlacementResult>
    where
        F: FnMut(&mut dyn Rng) -> Category,
        R: Rng,
    {
        place(request, self.surface, picker, rng, Some(sink))
    }
}

/// Places up to `request.count` items.
///
/// Random draws happen in a fixed order per attempt: angle, distance, then
/// after a surface hit the category from `picker`, then on acceptance yaw and
/// scale. Replaying the same draws and surface answers reproduces the result.
///
/// Returns [`crate::error::Error::InvalidConfig`] before touching `surface`
/// or `rng` when the request does not validate. Running out of attempts is
/// reported through [`PlacementResult::shortfall`].
pub fn place<S, F, R>(
    request: &PlacementRequest,
    surface: &S,
    mut picker: F,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<PlacementResult>
where
    S: SurfaceQuery + ?Sized,
    F: FnMut(&mut dyn Rng) -> Category,
    R: Rng,
{
    request.validate()?;
    match sink {
        Some(s) => Ok(place_internal(request, surface, &mut picker, rng, s)),
        None => Ok(place_internal(request, surface, &mut picker, rng, &mut ())),
    }
}

/// Accepted set of one pass: excluded zones, earlier-pass items and new items.
struct ScatterState<'r> {
    request: &'r PlacementRequest,
    points: Vec<(Vec2, Category)>,
}

impl<'r> ScatterState<'r> {
    fn new(request: &'r PlacementRequest) -> Self {
        let mut points = Vec::with_capacity(
            request
                .occupied
                .len()
                .saturating_add(placement_capacity(request)),
        );
        points.extend(
            request
                .occupied
                .iter()
                .map(|item| (item.position.xz(), item.category)),
        );
        Self { request, points }
    }

    fn conflict(&self, candidate: Vec2, category: Category) -> Option<RejectReason> {
        let in_zone = self.request.excluded_zones.iter().any(|zone: &ExcludedZone| {
            let clearance = self.request.clearance_from_zone(category, zone);
            candidate.distance_squared(zone.center.xz()) < clearance * clearance
        });
        if in_zone {
            return Some(RejectReason::ExcludedZone);
        }

        let too_close = self.points.iter().any(|&(p, other)| {
            let min = self.request.separation_between(category, other);
            candidate.distance_squared(p) < min * min
        });
        too_close.then_some(RejectReason::TooClose)
    }

    fn accept(&mut self, item: &PlacedItem) {
        self.points.push((item.position.xz(), item.category));
    }
}

/// Upper bound on items a pass can accept: one per attempt at most.
fn placement_capacity(request: &PlacementRequest) -> usize {
    request.count.min(request.max_total_attempts)
}

fn place_internal<S: SurfaceQuery + ?Sized>(
    request: &PlacementRequest,
    surface: &S,
    picker: &mut dyn FnMut(&mut dyn Rng) -> Category,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> PlacementResult {
    let sampling = DiskSampling::new(request.radius).with_min_distance(request.min_spawn_distance);
    let ray_from = request.center.y + request.search_height_above;
    let mut state = ScatterState::new(request);
    let mut result = PlacementResult::new(request.count);
    result.items.reserve(placement_capacity(request));

    if sink.wants(ScatterEventKind::PassStarted) {
        sink.send(ScatterEvent::PassStarted {
            center: request.center,
            radius: request.radius,
            requested: request.count,
            budget: request.max_total_attempts,
        });
    }

    while result.items.len() < request.count && result.attempts < request.max_total_attempts {
        let attempt = result.attempts;
        result.attempts += 1;

        let offset = Vec2::from(sampling.sample(rng));
        let x = request.center.x + offset.x;
        let z = request.center.z + offset.y;

        let Some(hit) = surface.query(x, z, ray_from, request.search_depth) else {
            result.surface_misses += 1;
            if sink.wants(ScatterEventKind::CandidateRejected) {
                sink.send(ScatterEvent::CandidateRejected {
                    attempt,
                    position: Vec3::new(x, request.center.y, z),
                    reason: RejectReason::SurfaceMiss,
                });
            }
            continue;
        };

        let category = picker(rng);
        let position = Vec3::new(x, hit.position.y + request.surface_offset, z);

        if let Some(reason) = state.conflict(position.xz(), category) {
            result.rejected += 1;
            if sink.wants(ScatterEventKind::CandidateRejected) {
                sink.send(ScatterEvent::CandidateRejected {
                    attempt,
                    position,
                    reason,
                });
            }
            continue;
        }

        let item = PlacedItem {
            position,
            category,
            rotation_y: rand_range_exclusive(rng, 0.0, 360.0),
            scale: rand_range(rng, SCALE_RANGE.0, SCALE_RANGE.1),
        };
        state.accept(&item);
        result.items.push(item);

        if sink.wants(ScatterEventKind::ItemPlaced) {
            sink.send(ScatterEvent::ItemPlaced { attempt, item });
        }
    }

    debug!(
        "Scatter pass placed {}/{} in {} attempts ({} surface misses, {} rejected).",
        result.placed(),
        result.requested,
        result.attempts,
        result.surface_misses,
        result.rejected,
    );

    if !result.is_fulfilled() && sink.wants(ScatterEventKind::Warning) {
        sink.send(ScatterEvent::Warning {
            context: format!("pass:r{}", request.radius),
            message: format!(
                "Attempt budget of {} exhausted with {} of {} placed",
                request.max_total_attempts,
                result.placed(),
                result.requested
            ),
        });
    }

    if sink.wants(ScatterEventKind::PassFinished) {
        sink.send(ScatterEvent::PassFinished {
            result: result.clone(),
        });
    }

    result
}
