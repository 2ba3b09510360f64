//! Placement requests: what a single scatter pass should produce and under which budget.
use std::collections::HashMap;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scatter::planner::PlacedItem;
use crate::scatter::Category;

/// Default height above the pass center at which surface rays start.
pub const DEFAULT_SEARCH_HEIGHT_ABOVE: f32 = 10.0;
/// Default length of the downward surface ray.
pub const DEFAULT_SEARCH_DEPTH: f32 = 20.0;
/// Default attempts granted per requested item.
pub const DEFAULT_MAX_ATTEMPTS_PER_ITEM: usize = 100;

/// Permanently occupied circle that candidates must keep clear of.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExcludedZone {
    /// Zone center; only x/z matter.
    pub center: Vec3,
    /// Zone radius in world units.
    pub radius: f32,
}

impl ExcludedZone {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Parameters of one scatter pass.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct PlacementRequest {
    /// Center of the sampled disk.
    pub center: Vec3,
    /// Radius of the sampled disk. Must be > 0.
    pub radius: f32,
    /// Number of items requested.
    pub count: usize,
    /// Base minimum separation between items.
    pub min_separation: f32,
    /// Per-category factors on `min_separation`. Missing categories use 1.0.
    pub separation_by_category: HashMap<Category, f32>,
    /// Zones that count as occupied but are never returned.
    pub excluded_zones: Vec<ExcludedZone>,
    /// Items from earlier passes that count as occupied but are never returned.
    pub occupied: Vec<PlacedItem>,
    /// Inner radial floor of the sampled disk.
    pub min_spawn_distance: f32,
    /// Vertical lift added to the surface hit.
    pub surface_offset: f32,
    /// Height above `center.y` at which the downward surface ray starts.
    pub search_height_above: f32,
    /// Length of the downward surface ray.
    pub search_depth: f32,
    /// Attempts granted per item; seeds the total budget.
    pub max_attempts_per_item: usize,
    /// Hard cap on candidate evaluations for the whole pass.
    pub max_total_attempts: usize,
    /// Set once the total budget was given explicitly.
    total_pinned: bool,
}

impl PlacementRequest {
    /// Creates a request with default search range and budgets.
    ///
    /// The total budget starts at `count * max_attempts_per_item` and follows
    /// [`Self::with_max_attempts_per_item`] until set explicitly.
    pub fn new(center: Vec3, radius: f32, count: usize) -> Self {
        Self {
            center,
            radius,
            count,
            min_separation: 0.0,
            separation_by_category: HashMap::new(),
            excluded_zones: Vec::new(),
            occupied: Vec::new(),
            min_spawn_distance: 0.0,
            surface_offset: 0.0,
            search_height_above: DEFAULT_SEARCH_HEIGHT_ABOVE,
            search_depth: DEFAULT_SEARCH_DEPTH,
            max_attempts_per_item: DEFAULT_MAX_ATTEMPTS_PER_ITEM,
            max_total_attempts: pooled_budget(count, DEFAULT_MAX_ATTEMPTS_PER_ITEM),
            total_pinned: false,
        }
    }

    /// Sets the base minimum separation.
    pub fn with_min_separation(mut self, min_separation: f32) -> Self {
        self.min_separation = min_separation;
        self
    }

    /// Sets the separation multiplier for one category.
    pub fn with_separation_multiplier(mut self, category: Category, multiplier: f32) -> Self {
        self.separation_by_category.insert(category, multiplier);
        self
    }

    /// Uses each category's profile multiplier for the given categories.
    pub fn with_profile_multipliers(mut self, categories: &[Category]) -> Self {
        for &c in categories {
            self.separation_by_category
                .insert(c, c.profile().separation_multiplier);
        }
        self
    }

    /// Adds a permanently occupied zone.
    pub fn with_excluded_zone(mut self, zone: ExcludedZone) -> Self {
        self.excluded_zones.push(zone);
        self
    }

    /// Adds items from earlier passes as occupied space.
    pub fn with_occupied(mut self, items: impl IntoIterator<Item = PlacedItem>) -> Self {
        self.occupied.extend(items);
        self
    }

    /// Sets the inner radial floor of the sampled disk.
    pub fn with_min_spawn_distance(mut self, min_spawn_distance: f32) -> Self {
        self.min_spawn_distance = min_spawn_distance;
        self
    }

    /// Sets the vertical lift added to surface hits.
    pub fn with_surface_offset(mut self, surface_offset: f32) -> Self {
        self.surface_offset = surface_offset;
        self
    }

    /// Sets the downward ray start height (relative to `center.y`) and length.
    pub fn with_search_range(mut self, height_above: f32, depth: f32) -> Self {
        self.search_height_above = height_above;
        self.search_depth = depth;
        self
    }

    /// Sets the per-item attempts.
    ///
    /// The pooled total budget is rescaled to `count * attempts` unless
    /// [`Self::with_max_total_attempts`] already set it.
    pub fn with_max_attempts_per_item(mut self, attempts: usize) -> Self {
        self.max_attempts_per_item = attempts;
        if !self.total_pinned {
            self.max_total_attempts = pooled_budget(self.count, attempts);
        }
        self
    }

    /// Sets the total budget. Later per-item changes leave it alone.
    pub fn with_max_total_attempts(mut self, attempts: usize) -> Self {
        self.max_total_attempts = attempts;
        self.total_pinned = true;
        self
    }

    /// Separation multiplier in effect for `category`.
    pub fn multiplier(&self, category: Category) -> f32 {
        self.separation_by_category
            .get(&category)
            .copied()
            .unwrap_or(1.0)
    }

    /// Required distance between items of categories `a` and `b`.
    pub fn separation_between(&self, a: Category, b: Category) -> f32 {
        (self.min_separation * self.multiplier(a)).max(self.min_separation * self.multiplier(b))
    }

    /// Required distance between an item of `category` and an excluded zone.
    pub fn clearance_from_zone(&self, category: Category, zone: &ExcludedZone) -> f32 {
        zone.radius.max(self.min_separation * self.multiplier(category))
    }

    /// Validates the request, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::invalid("radius must be finite and > 0"));
        }
        if !self.center.is_finite() {
            return Err(Error::invalid("center must be finite"));
        }
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            return Err(Error::invalid("min_separation must be finite and >= 0"));
        }
        if !(0.0..=self.radius).contains(&self.min_spawn_distance) {
            return Err(Error::invalid(format!(
                "min_spawn_distance must lie in [0, {}]",
                self.radius
            )));
        }
        if self.search_depth < 0.0 || !self.search_depth.is_finite() {
            return Err(Error::invalid("search_depth must be finite and >= 0"));
        }
        if !self.search_height_above.is_finite() || !self.surface_offset.is_finite() {
            return Err(Error::invalid(
                "search_height_above and surface_offset must be finite",
            ));
        }
        if self.max_attempts_per_item == 0 {
            return Err(Error::invalid("max_attempts_per_item must be > 0"));
        }
        if self.max_total_attempts == 0 {
            return Err(Error::invalid("max_total_attempts must be > 0"));
        }
        for (category, m) in &self.separation_by_category {
            if !m.is_finite() || *m < 0.0 {
                return Err(Error::invalid(format!(
                    "separation multiplier for {category} must be finite and >= 0"
                )));
            }
        }
        for zone in &self.excluded_zones {
            if !zone.radius.is_finite() || zone.radius < 0.0 {
                return Err(Error::invalid("excluded zone radius must be finite and >= 0"));
            }
        }

        Ok(())
    }
}

fn pooled_budget(count: usize, per_item: usize) -> usize {
    count.saturating_mul(per_item).max(1)
}
