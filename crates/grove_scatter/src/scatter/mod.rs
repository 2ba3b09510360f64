//! Scatter pipeline: categories, placement requests, the planner and its events.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod events;
pub mod planner;
pub mod request;
pub mod selection;

/// Scale range applied to every accepted item.
pub const SCALE_RANGE: (f32, f32) = (0.8, 1.2);

/// Classification of a placeable object. Drives separation and collider policy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Ground cover. Lowest detail, never collides.
    Grass,
    Bush,
    Rock,
    Tree,
    /// Collectible seed pickup.
    Seed,
}

impl Category {
    /// Decoration categories in the order a decoration run evaluates them.
    pub const DECORATION_ORDER: [Category; 4] =
        [Category::Grass, Category::Bush, Category::Rock, Category::Tree];

    /// Static placement policy for this category.
    pub const fn profile(self) -> CategoryProfile {
        match self {
            Category::Grass => CategoryProfile::new(1.0, false),
            Category::Bush | Category::Rock => CategoryProfile::new(1.5, true),
            Category::Tree => CategoryProfile::new(2.0, true),
            Category::Seed => CategoryProfile::new(1.0, false),
        }
    }

    /// Whether this is the lowest-detail ground cover category.
    pub const fn is_ground_cover(self) -> bool {
        matches!(self, Category::Grass)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::Grass => "grass",
            Category::Bush => "bush",
            Category::Rock => "rock",
            Category::Tree => "tree",
            Category::Seed => "seed",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Placement policy attached to a [`Category`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryProfile {
    /// Factor applied to the base minimum separation.
    pub separation_multiplier: f32,
    /// Whether placed instances need a collision volume.
    pub needs_collider: bool,
    /// Collider synthesized when neither the catalog entry nor its bounds provide one.
    pub fallback_collider: ColliderShape,
}

impl CategoryProfile {
    const fn new(separation_multiplier: f32, needs_collider: bool) -> Self {
        Self {
            separation_multiplier,
            needs_collider,
            fallback_collider: ColliderShape::Capsule {
                radius: 0.5,
                height: 2.0,
            },
        }
    }
}

/// Collision volume in the instance's local space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    Box { center: Vec3, size: Vec3 },
    Capsule { radius: f32, height: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_objects_need_twice_the_base_distance() {
        assert_eq!(Category::Tree.profile().separation_multiplier, 2.0);
        assert_eq!(Category::Bush.profile().separation_multiplier, 1.5);
        assert_eq!(Category::Rock.profile().separation_multiplier, 1.5);
        assert_eq!(Category::Grass.profile().separation_multiplier, 1.0);
    }

    #[test]
    fn only_obstacles_need_colliders() {
        assert!(!Category::Grass.profile().needs_collider);
        assert!(!Category::Seed.profile().needs_collider);
        for c in [Category::Bush, Category::Rock, Category::Tree] {
            assert!(c.profile().needs_collider, "{c} should collide");
            assert_eq!(
                c.profile().fallback_collider,
                ColliderShape::Capsule {
                    radius: 0.5,
                    height: 2.0
                }
            );
        }
    }

    #[test]
    fn decoration_order_starts_with_ground_cover() {
        assert!(Category::DECORATION_ORDER[0].is_ground_cover());
        assert_eq!(Category::DECORATION_ORDER[3], Category::Tree);
    }
}
