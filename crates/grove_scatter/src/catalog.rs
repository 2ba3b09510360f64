//! Object catalog: weighted prefab variants per category and collider synthesis.
use std::collections::BTreeMap;

use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scatter::selection::pick_weighted_random;
use crate::scatter::{Category, ColliderShape};

/// Opaque reference to a host-engine prefab.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefabHandle(pub String);

impl PrefabHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrefabHandle {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Axis-aligned render bounds in the prefab's local space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalBounds {
    pub center: Vec3,
    pub size: Vec3,
}

/// One selectable variant of a category.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub prefab: PrefabHandle,
    /// Relative selection weight. Entries with weight <= 0 are never picked.
    pub weight: f32,
    /// Collider the prefab already carries, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub collider: Option<ColliderShape>,
    /// Render bounds used to synthesize a box collider.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: Option<LocalBounds>,
}

impl CatalogEntry {
    pub fn new(prefab: impl Into<PrefabHandle>, weight: f32) -> Self {
        Self {
            prefab: prefab.into(),
            weight,
            collider: None,
            bounds: None,
        }
    }

    pub fn with_collider(mut self, collider: ColliderShape) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_bounds(mut self, center: Vec3, size: Vec3) -> Self {
        self.bounds = Some(LocalBounds { center, size });
        self
    }

    /// Collider to attach when an item of `category` is instantiated from this entry.
    ///
    /// Ground cover and other collider-free categories get none. Otherwise an
    /// existing collider wins, then a box fitted to the render bounds, then the
    /// category's fallback shape.
    pub fn collider_for(&self, category: Category) -> Option<ColliderShape> {
        let profile = category.profile();
        if !profile.needs_collider || category.is_ground_cover() {
            return None;
        }
        if let Some(existing) = self.collider {
            return Some(existing);
        }
        Some(match self.bounds {
            Some(b) => ColliderShape::Box {
                center: b.center,
                size: b.size,
            },
            None => profile.fallback_collider,
        })
    }

    /// Whether instantiation has to add a collider the prefab lacks.
    pub fn needs_synthesized_collider(&self, category: Category) -> bool {
        self.collider.is_none() && self.collider_for(category).is_some()
    }
}

/// Source of prefab variants per category.
pub trait ObjectCatalog {
    /// Variants registered for `category`.
    fn entries(&self, category: Category) -> &[CatalogEntry];

    /// Picks a variant of `category` proportionally to its weight.
    fn pick(&self, category: Category, rng: &mut dyn Rng) -> Option<&CatalogEntry> {
        pick_weighted_random(self.entries(category), |e| e.weight, rng)
    }

    /// Total selection weight of `category`.
    fn weight(&self, category: Category) -> f32 {
        self.entries(category)
            .iter()
            .map(|e| e.weight)
            .filter(|w| w.is_finite() && *w > 0.0)
            .sum()
    }

    /// Whether `category` has at least one pickable variant.
    fn has_variants(&self, category: Category) -> bool {
        self.weight(category) > 0.0
    }
}

/// In-memory catalog.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<Category, Vec<CatalogEntry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variant to `category`.
    pub fn with_entry(mut self, category: Category, entry: CatalogEntry) -> Self {
        self.insert(category, entry);
        self
    }

    pub fn insert(&mut self, category: Category, entry: CatalogEntry) {
        self.entries.entry(category).or_default().push(entry);
    }

    /// Categories with at least one registered entry.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.keys().copied()
    }
}

impl ObjectCatalog for Catalog {
    fn entries(&self, category: Category) -> &[CatalogEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::test_rng::FixedRng;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_entry(Category::Tree, CatalogEntry::new("oak", 3.0))
            .with_entry(Category::Tree, CatalogEntry::new("pine", 1.0))
            .with_entry(Category::Grass, CatalogEntry::new("tuft", 1.0))
    }

    #[test]
    fn pick_is_weighted_within_category() {
        let c = catalog();
        let mut low = FixedRng { value: 0 };
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(c.pick(Category::Tree, &mut low).unwrap().prefab.as_str(), "oak");
        assert_eq!(c.pick(Category::Tree, &mut high).unwrap().prefab.as_str(), "pine");
        assert_eq!(c.weight(Category::Tree), 4.0);
    }

    #[test]
    fn missing_category_has_no_variants() {
        let c = catalog();
        let mut rng = FixedRng { value: 0 };
        assert!(c.pick(Category::Rock, &mut rng).is_none());
        assert!(!c.has_variants(Category::Rock));
        assert_eq!(c.categories().count(), 2);
    }

    #[test]
    fn ground_cover_never_gets_a_collider() {
        let entry = CatalogEntry::new("tuft", 1.0).with_bounds(Vec3::ZERO, Vec3::ONE);
        assert_eq!(entry.collider_for(Category::Grass), None);
        assert!(!entry.needs_synthesized_collider(Category::Grass));
    }

    #[test]
    fn collider_prefers_existing_then_bounds_then_fallback() {
        let capsule = ColliderShape::Capsule {
            radius: 1.0,
            height: 4.0,
        };
        let with_collider = CatalogEntry::new("oak", 1.0).with_collider(capsule);
        assert_eq!(with_collider.collider_for(Category::Tree), Some(capsule));
        assert!(!with_collider.needs_synthesized_collider(Category::Tree));

        let with_bounds = CatalogEntry::new("boulder", 1.0)
            .with_bounds(Vec3::new(0.0, 0.5, 0.0), Vec3::new(2.0, 1.0, 2.0));
        assert_eq!(
            with_bounds.collider_for(Category::Rock),
            Some(ColliderShape::Box {
                center: Vec3::new(0.0, 0.5, 0.0),
                size: Vec3::new(2.0, 1.0, 2.0)
            })
        );
        assert!(with_bounds.needs_synthesized_collider(Category::Rock));

        let bare = CatalogEntry::new("shrub", 1.0);
        assert_eq!(
            bare.collider_for(Category::Bush),
            Some(Category::Bush.profile().fallback_collider)
        );
    }
}
