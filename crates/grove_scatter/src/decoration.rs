//! On-demand terrain dressing with grass, bushes, rocks and trees.
//!
//! A decoration run scatters each category in [`Category::DECORATION_ORDER`]
//! with its own separation multiplier. Items from earlier passes stay
//! occupied for later ones, so a tree never lands on a bush placed a moment
//! before. Obstacles whose prefab has no collider get one synthesized.
use std::collections::BTreeMap;

use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::ObjectCatalog;
use crate::error::Result;
use crate::scatter::planner::place;
use crate::scatter::request::{
    PlacementRequest, DEFAULT_MAX_ATTEMPTS_PER_ITEM, DEFAULT_SEARCH_DEPTH,
    DEFAULT_SEARCH_HEIGHT_ABOVE,
};
use crate::scatter::Category;
use crate::spawn::{Instantiator, SpawnArena, SpawnRequest, Spawned};
use crate::surface::SurfaceQuery;

/// Decoration tuning.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DecorationConfig {
    pub center: Vec3,
    pub radius: f32,
    /// Items requested per category.
    pub counts: BTreeMap<Category, usize>,
    /// Base separation; multiplied per category.
    pub min_distance_between_objects: f32,
    /// Attempts granted per requested item, pooled per category pass.
    pub max_spawn_attempts: usize,
    pub search_height_above: f32,
    pub search_depth: f32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 25.0,
            counts: BTreeMap::from([
                (Category::Grass, 200),
                (Category::Bush, 50),
                (Category::Rock, 30),
                (Category::Tree, 20),
            ]),
            min_distance_between_objects: 2.5,
            max_spawn_attempts: DEFAULT_MAX_ATTEMPTS_PER_ITEM,
            search_height_above: DEFAULT_SEARCH_HEIGHT_ABOVE,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl DecorationConfig {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            ..Default::default()
        }
    }

    pub fn with_count(mut self, category: Category, count: usize) -> Self {
        self.counts.insert(category, count);
        self
    }

    pub fn with_min_distance(mut self, distance: f32) -> Self {
        self.min_distance_between_objects = distance;
        self
    }

    pub fn with_max_spawn_attempts(mut self, attempts: usize) -> Self {
        self.max_spawn_attempts = attempts;
        self
    }

    fn request(&self, center: Vec3, radius: f32, count: usize) -> PlacementRequest {
        PlacementRequest::new(center, radius, count)
            .with_min_separation(self.min_distance_between_objects)
            .with_profile_multipliers(&Category::DECORATION_ORDER)
            .with_search_range(self.search_height_above, self.search_depth)
            .with_max_attempts_per_item(self.max_spawn_attempts)
    }
}

/// Outcome of one category pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPass {
    pub category: Category,
    pub requested: usize,
    pub placed: usize,
    pub attempts: usize,
    /// Items that received a synthesized collider.
    pub colliders_synthesized: usize,
}

/// Outcome of a decoration run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationReport {
    pub passes: Vec<CategoryPass>,
    /// Categories skipped because the catalog had no variants.
    pub skipped: Vec<Category>,
}

impl DecorationReport {
    pub fn total_placed(&self) -> usize {
        self.passes.iter().map(|p| p.placed).sum()
    }

    pub fn pass(&self, category: Category) -> Option<&CategoryPass> {
        self.passes.iter().find(|p| p.category == category)
    }
}

/// Places and owns decoration objects.
pub struct DecorationController<S, I: Instantiator, R> {
    config: DecorationConfig,
    surface: S,
    instantiator: I,
    rng: R,
    placed: SpawnArena<I::Handle>,
}

impl<S, I, R> DecorationController<S, I, R>
where
    S: SurfaceQuery,
    I: Instantiator,
    R: Rng,
{
    pub fn new(config: DecorationConfig, surface: S, instantiator: I, rng: R) -> Self {
        Self {
            config,
            surface,
            instantiator,
            rng,
            placed: SpawnArena::new(),
        }
    }

    /// Decorates with the configured center, radius and counts.
    pub fn decorate_configured<C>(&mut self, catalog: &C) -> Result<DecorationReport>
    where
        C: ObjectCatalog + ?Sized,
    {
        let counts = self.config.counts.clone();
        self.decorate(self.config.center, self.config.radius, &counts, catalog)
    }

    /// Replaces any previous decoration with a fresh run.
    ///
    /// Categories outside [`Category::DECORATION_ORDER`] are ignored. Invalid
    /// parameters are reported before anything is cleared.
    pub fn decorate<C>(
        &mut self,
        center: Vec3,
        radius: f32,
        counts: &BTreeMap<Category, usize>,
        catalog: &C,
    ) -> Result<DecorationReport>
    where
        C: ObjectCatalog + ?Sized,
    {
        self.config.request(center, radius, 0).validate()?;
        for category in counts.keys().filter(|c| !Category::DECORATION_ORDER.contains(c)) {
            warn!("Category '{category}' is not a decoration category; ignoring.");
        }

        self.clear();
        let mut report = DecorationReport::default();

        for category in Category::DECORATION_ORDER {
            let count = counts.get(&category).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            if !catalog.has_variants(category) {
                warn!("No prefab variants registered for '{category}'; skipping.");
                report.skipped.push(category);
                continue;
            }

            let request = self
                .config
                .request(center, radius, count)
                .with_occupied(self.placed.items());
            let result = place(
                &request,
                &self.surface,
                |_: &mut dyn Rng| category,
                &mut self.rng,
                None,
            )?;

            let mut colliders_synthesized = 0;
            for item in &result.items {
                let Some(entry) = catalog.pick(category, &mut self.rng) else {
                    continue;
                };
                let collider = entry
                    .needs_synthesized_collider(category)
                    .then(|| entry.collider_for(category))
                    .flatten();
                if collider.is_some() {
                    colliders_synthesized += 1;
                }
                let spawn = SpawnRequest::new(item)
                    .with_prefab(&entry.prefab)
                    .with_collider(collider);
                self.placed.spawn(&mut self.instantiator, &spawn);
            }

            if !result.is_fulfilled() {
                warn!(
                    "Only {} of {} '{}' were placed (attempt budget exhausted).",
                    result.placed(),
                    count,
                    category
                );
            }
            info!(
                "Decorated '{}': {}/{} in {} attempts.",
                category,
                result.placed(),
                count,
                result.attempts
            );

            report.passes.push(CategoryPass {
                category,
                requested: count,
                placed: result.placed(),
                attempts: result.attempts,
                colliders_synthesized,
            });
        }

        Ok(report)
    }

    /// Destroys every decoration object. Safe to call with nothing placed.
    pub fn clear(&mut self) -> usize {
        self.placed.clear(&mut self.instantiator)
    }

    pub fn placed(&self) -> impl Iterator<Item = &Spawned<I::Handle>> {
        self.placed.iter()
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn config(&self) -> &DecorationConfig {
        &self.config
    }

    pub fn instantiator(&self) -> &I {
        &self.instantiator
    }
}
