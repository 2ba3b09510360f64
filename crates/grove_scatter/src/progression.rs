//! Round progression: collectible pickups, advancing by planting, session end.
//!
//! [`ProgressionController`] owns the [`RoundState`] for a whole session. Each
//! round it scatters seed pickups around the terrain center while keeping a
//! clear zone around the player; collecting enough of them lets the player
//! advance (plant a tree), which starts the next round until the target number
//! of advances is reached.
use std::cell::Cell;

use glam::Vec3;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::scatter::planner::{place, PlacementResult};
use crate::scatter::request::{
    ExcludedZone, PlacementRequest, DEFAULT_SEARCH_DEPTH, DEFAULT_SEARCH_HEIGHT_ABOVE,
};
use crate::scatter::Category;
use crate::spawn::{Instantiator, SpawnArena, SpawnRequest, Spawned};
use crate::surface::SurfaceQuery;

/// Supplies the position pickups must keep clear of, usually the player.
pub trait ReferencePointProvider {
    fn current_position(&self) -> Vec3;
}

impl ReferencePointProvider for Vec3 {
    fn current_position(&self) -> Vec3 {
        *self
    }
}

impl ReferencePointProvider for Cell<Vec3> {
    fn current_position(&self) -> Vec3 {
        self.get()
    }
}

impl<P: ReferencePointProvider + ?Sized> ReferencePointProvider for &P {
    fn current_position(&self) -> Vec3 {
        (**self).current_position()
    }
}

/// Adapter that reads the reference point from a closure.
pub struct FnReference<F: Fn() -> Vec3>(pub F);

impl<F: Fn() -> Vec3> ReferencePointProvider for FnReference<F> {
    fn current_position(&self) -> Vec3 {
        (self.0)()
    }
}

/// Session and per-round tuning.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RoundConfig {
    /// Center of the pickup scatter disk.
    pub terrain_center: Vec3,
    /// Radius of the pickup scatter disk.
    pub spawn_radius: f32,
    /// Radial floor, pickup separation and clear radius around the player.
    pub min_spawn_distance: f32,
    /// Pickups scattered at the start of each round.
    pub items_per_round: usize,
    /// Pickups spent by one advance.
    pub items_consumed_per_advance: usize,
    /// Advances that complete the session.
    pub advances_target: usize,
    /// Height pickups float above the ground.
    pub surface_offset: f32,
    /// Attempt budget per pickup, pooled over the round.
    pub max_attempts_per_item: usize,
    pub search_height_above: f32,
    pub search_depth: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            terrain_center: Vec3::ZERO,
            spawn_radius: 50.0,
            min_spawn_distance: 2.0,
            items_per_round: 15,
            items_consumed_per_advance: 10,
            advances_target: 4,
            surface_offset: 0.5,
            max_attempts_per_item: 50,
            search_height_above: DEFAULT_SEARCH_HEIGHT_ABOVE,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl RoundConfig {
    pub fn new(terrain_center: Vec3, spawn_radius: f32) -> Self {
        Self {
            terrain_center,
            spawn_radius,
            ..Default::default()
        }
    }

    pub fn with_min_spawn_distance(mut self, distance: f32) -> Self {
        self.min_spawn_distance = distance;
        self
    }

    /// Sets pickups per round, pickups per advance and the advance target.
    pub fn with_rounds(mut self, per_round: usize, per_advance: usize, target: usize) -> Self {
        self.items_per_round = per_round;
        self.items_consumed_per_advance = per_advance;
        self.advances_target = target;
        self
    }

    pub fn with_surface_offset(mut self, offset: f32) -> Self {
        self.surface_offset = offset;
        self
    }

    pub fn with_max_attempts_per_item(mut self, attempts: usize) -> Self {
        self.max_attempts_per_item = attempts;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.items_consumed_per_advance == 0 {
            return Err(Error::invalid("items_consumed_per_advance must be > 0"));
        }
        if self.advances_target == 0 {
            return Err(Error::invalid("advances_target must be > 0"));
        }
        if self.items_per_round < self.items_consumed_per_advance {
            return Err(Error::invalid(format!(
                "items_per_round ({}) must be >= items_consumed_per_advance ({})",
                self.items_per_round, self.items_consumed_per_advance
            )));
        }
        self.placement_request(Vec3::ZERO).validate()
    }

    /// Pickup scatter request for a player standing at `reference`.
    pub fn placement_request(&self, reference: Vec3) -> PlacementRequest {
        PlacementRequest::new(self.terrain_center, self.spawn_radius, self.items_per_round)
            .with_min_separation(self.min_spawn_distance)
            .with_min_spawn_distance(self.min_spawn_distance)
            .with_excluded_zone(ExcludedZone::new(reference, self.min_spawn_distance))
            .with_surface_offset(self.surface_offset)
            .with_search_range(self.search_height_above, self.search_depth)
            .with_max_attempts_per_item(self.max_attempts_per_item)
    }
}

/// Counters mutated by collection and advancing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    pub items_collected_this_round: usize,
    /// Pickups actually placed this round; collection never exceeds it.
    pub items_placed_this_round: usize,
    pub items_consumed_per_advance: usize,
    pub advances_completed: usize,
    pub advances_target: usize,
}

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingCollection,
    ReadyToAdvance,
    SessionComplete,
}

/// Outcome of [`ProgressionController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceResult {
    /// Not enough pickups collected (or session over); nothing changed.
    Continued,
    /// Advance accepted and a fresh round of pickups was scattered.
    RoundComplete,
    /// Final advance; no further rounds start.
    SessionComplete,
}

/// Owns round state and the pickups of the current round.
pub struct ProgressionController<S, P, I: Instantiator, R> {
    config: RoundConfig,
    state: RoundState,
    surface: S,
    reference: P,
    instantiator: I,
    rng: R,
    pickups: SpawnArena<I::Handle>,
}

impl<S, P, I, R> ProgressionController<S, P, I, R>
where
    S: SurfaceQuery,
    P: ReferencePointProvider,
    I: Instantiator,
    R: Rng,
{
    /// Creates a controller. No pickups exist until [`Self::start_round`].
    pub fn new(config: RoundConfig, surface: S, reference: P, instantiator: I, rng: R) -> Result<Self> {
        config.validate()?;
        let state = RoundState {
            items_consumed_per_advance: config.items_consumed_per_advance,
            advances_target: config.advances_target,
            ..Default::default()
        };
        Ok(Self {
            config,
            state,
            surface,
            reference,
            instantiator,
            rng,
            pickups: SpawnArena::new(),
        })
    }

    /// Clears the previous pickups, resets the collected count and scatters a new round.
    ///
    /// Does nothing once the session is complete.
    pub fn start_round(&mut self) -> Result<PlacementResult> {
        if self.is_session_complete() {
            debug!("Session complete; not starting another round.");
            return Ok(PlacementResult::new(0));
        }

        let request = self
            .config
            .placement_request(self.reference.current_position());
        let result = place(
            &request,
            &self.surface,
            |_: &mut dyn Rng| Category::Seed,
            &mut self.rng,
            None,
        )?;

        let cleared = self.pickups.clear(&mut self.instantiator);
        for item in &result.items {
            self.pickups
                .spawn(&mut self.instantiator, &SpawnRequest::new(item));
        }
        self.state.items_collected_this_round = 0;
        self.state.items_placed_this_round = result.placed();

        if !result.is_fulfilled() {
            warn!(
                "Only {} of {} pickups were placed (attempt budget exhausted).",
                result.placed(),
                result.requested
            );
        }
        info!(
            "Round {} started: {} pickups placed, {} cleared.",
            self.state.advances_completed + 1,
            result.placed(),
            cleared
        );

        Ok(result)
    }

    /// Counts one collected pickup. Returns `false` if nothing was counted.
    pub fn on_item_collected(&mut self) -> bool {
        if self.is_session_complete()
            || self.state.items_collected_this_round >= self.state.items_placed_this_round
        {
            return false;
        }
        self.state.items_collected_this_round += 1;
        true
    }

    /// Collects the pickup behind `handle`: destroys it and counts it.
    ///
    /// Handles that are not live pickups of this round are ignored.
    pub fn collect(&mut self, handle: &I::Handle) -> bool {
        if self.is_session_complete() || !self.pickups.despawn(&mut self.instantiator, handle) {
            return false;
        }
        self.on_item_collected()
    }

    pub fn can_advance(&self) -> bool {
        self.state.items_collected_this_round >= self.state.items_consumed_per_advance
            && self.state.advances_completed < self.state.advances_target
    }

    /// Spends collected pickups on one advance.
    pub fn advance(&mut self) -> Result<AdvanceResult> {
        if !self.can_advance() {
            return Ok(AdvanceResult::Continued);
        }

        self.state.items_collected_this_round -= self.state.items_consumed_per_advance;
        self.state.advances_completed += 1;

        if self.is_session_complete() {
            info!(
                "Session complete after {} advances.",
                self.state.advances_completed
            );
            return Ok(AdvanceResult::SessionComplete);
        }

        self.start_round()?;
        Ok(AdvanceResult::RoundComplete)
    }

    pub fn phase(&self) -> RoundPhase {
        if self.is_session_complete() {
            RoundPhase::SessionComplete
        } else if self.can_advance() {
            RoundPhase::ReadyToAdvance
        } else {
            RoundPhase::AwaitingCollection
        }
    }

    pub fn is_session_complete(&self) -> bool {
        self.state.advances_completed >= self.state.advances_target
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Live pickups of the current round.
    pub fn pickups(&self) -> impl Iterator<Item = &Spawned<I::Handle>> {
        self.pickups.iter()
    }

    pub fn reference_position(&self) -> Vec3 {
        self.reference.current_position()
    }

    pub fn instantiator(&self) -> &I {
        &self.instantiator
    }
}

/// A spot where the player spends pickups to plant a tree. Usable once.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlantingSpot {
    pub position: Vec3,
    pub interaction_range: f32,
    planted: bool,
}

impl PlantingSpot {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            interaction_range: 2.0,
            planted: false,
        }
    }

    pub fn with_interaction_range(mut self, range: f32) -> Self {
        self.interaction_range = range;
        self
    }

    pub fn is_planted(&self) -> bool {
        self.planted
    }

    pub fn in_range(&self, player: Vec3) -> bool {
        self.position.distance(player) <= self.interaction_range
    }

    /// Plants here if the spot is free, the player is in range and the
    /// controller can advance. Returns `None` when nothing happened.
    pub fn try_plant<S, P, I, R>(
        &mut self,
        controller: &mut ProgressionController<S, P, I, R>,
    ) -> Result<Option<AdvanceResult>>
    where
        S: SurfaceQuery,
        P: ReferencePointProvider,
        I: Instantiator,
        R: Rng,
    {
        if self.planted
            || !self.in_range(controller.reference_position())
            || !controller.can_advance()
        {
            return Ok(None);
        }
        let outcome = controller.advance()?;
        self.planted = true;
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::spawn::RecordingInstantiator;
    use crate::surface::FlatSurface;

    type Controller<'p> =
        ProgressionController<FlatSurface, &'p Cell<Vec3>, RecordingInstantiator, StdRng>;

    fn controller(player: &Cell<Vec3>) -> Controller<'_> {
        let config = RoundConfig::new(Vec3::ZERO, 50.0).with_rounds(15, 10, 4);
        ProgressionController::new(
            config,
            FlatSurface::new(0.0),
            player,
            RecordingInstantiator::new(),
            StdRng::seed_from_u64(42),
        )
        .expect("valid config")
    }

    fn collect_n(c: &mut Controller<'_>, n: usize) {
        for _ in 0..n {
            assert!(c.on_item_collected());
        }
    }

    #[test]
    fn start_round_scatters_pickups_clear_of_player() {
        let player = Cell::new(Vec3::new(3.0, 0.0, -2.0));
        let mut c = controller(&player);
        let result = c.start_round().expect("round starts");

        assert_eq!(result.placed(), 15);
        assert_eq!(c.pickups().count(), 15);
        assert_eq!(c.instantiator().live_count(), 15);
        for p in c.pickups() {
            assert_eq!(p.item.category, Category::Seed);
            assert_eq!(p.item.position.y, 0.5);
            assert!(p.item.horizontal_distance(player.get()) >= 2.0 - 1e-4);
            assert!(p.item.horizontal_distance(Vec3::ZERO) >= 2.0 - 1e-4);
            assert!(p.item.horizontal_distance(Vec3::ZERO) <= 50.0 + 1e-4);
        }
    }

    #[test]
    fn collecting_enough_enables_advance() {
        let player = Cell::new(Vec3::ZERO);
        let mut c = controller(&player);
        c.start_round().unwrap();
        assert_eq!(c.phase(), RoundPhase::AwaitingCollection);
        collect_n(&mut c, 9);
        assert!(!c.can_advance());
        assert_eq!(c.advance().unwrap(), AdvanceResult::Continued);
        assert_eq!(c.state().items_collected_this_round, 9);
        collect_n(&mut c, 1);
        assert!(c.can_advance());
        assert_eq!(c.phase(), RoundPhase::ReadyToAdvance);
    }

    #[test]
    fn advance_starts_a_fresh_round() {
        let player = Cell::new(Vec3::ZERO);
        let mut c = controller(&player);
        c.start_round().unwrap();
        let before: Vec<_> = c.pickups().map(|p| p.handle).collect();
        collect_n(&mut c, 10);

        player.set(Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(c.advance().unwrap(), AdvanceResult::RoundComplete);
        assert_eq!(c.state().items_collected_this_round, 0);
        assert_eq!(c.state().advances_completed, 1);
        assert_eq!(c.pickups().count(), 15);
        assert!(c.pickups().all(|p| !before.contains(&p.handle)));
        assert!(c
            .pickups()
            .all(|p| p.item.horizontal_distance(player.get()) >= 2.0 - 1e-4));
        assert_eq!(c.instantiator().despawned, 15);
    }

    #[test]
    fn fourth_advance_completes_the_session() {
        let player = Cell::new(Vec3::ZERO);
        let mut c = controller(&player);
        c.start_round().unwrap();
        for _ in 0..3 {
            collect_n(&mut c, 10);
            assert_eq!(c.advance().unwrap(), AdvanceResult::RoundComplete);
        }
        collect_n(&mut c, 10);
        let spawned_before = c.instantiator().spawned;
        assert_eq!(c.advance().unwrap(), AdvanceResult::SessionComplete);
        assert_eq!(c.phase(), RoundPhase::SessionComplete);
        assert_eq!(c.instantiator().spawned, spawned_before);

        let frozen = c.state().clone();
        assert!(!c.on_item_collected());
        assert_eq!(c.advance().unwrap(), AdvanceResult::Continued);
        assert_eq!(c.start_round().unwrap().placed(), 0);
        assert_eq!(c.state(), &frozen);
        assert_eq!(c.instantiator().spawned, spawned_before);
    }

    #[test]
    fn collection_cannot_exceed_placed_pickups() {
        let player = Cell::new(Vec3::ZERO);
        let mut c = controller(&player);
        assert!(!c.on_item_collected());
        c.start_round().unwrap();
        collect_n(&mut c, 15);
        assert!(!c.on_item_collected());
        assert_eq!(c.state().items_collected_this_round, 15);
    }

    #[test]
    fn collect_by_handle_destroys_the_pickup_once() {
        let player = Cell::new(Vec3::ZERO);
        let mut c = controller(&player);
        c.start_round().unwrap();
        let handle = c.pickups().next().map(|p| p.handle).unwrap();
        assert!(c.collect(&handle));
        assert!(!c.collect(&handle));
        assert_eq!(c.state().items_collected_this_round, 1);
        assert_eq!(c.pickups().count(), 14);
    }

    #[test]
    fn planting_spot_requires_range_and_pickups() {
        let player = Cell::new(Vec3::new(20.0, 0.0, 0.0));
        let mut c = controller(&player);
        c.start_round().unwrap();
        let mut spot = PlantingSpot::new(Vec3::new(0.0, 0.0, 0.0));

        collect_n(&mut c, 10);
        assert_eq!(spot.try_plant(&mut c).unwrap(), None);

        player.set(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            spot.try_plant(&mut c).unwrap(),
            Some(AdvanceResult::RoundComplete)
        );
        assert!(spot.is_planted());

        collect_n(&mut c, 10);
        assert_eq!(spot.try_plant(&mut c).unwrap(), None);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(RoundConfig::default().validate().is_ok());
        assert!(RoundConfig::new(Vec3::ZERO, 0.0).validate().is_err());
        assert!(RoundConfig::default()
            .with_rounds(5, 10, 4)
            .validate()
            .is_err());
        assert!(RoundConfig::default()
            .with_rounds(15, 0, 4)
            .validate()
            .is_err());
        assert!(RoundConfig::default()
            .with_rounds(15, 10, 0)
            .validate()
            .is_err());
        assert!(RoundConfig::default()
            .with_max_attempts_per_item(0)
            .validate()
            .is_err());
    }

    #[test]
    fn closure_reference_tracks_the_player_between_rounds() {
        let player = Cell::new(Vec3::new(10.0, 0.0, 0.0));
        let config = RoundConfig::new(Vec3::ZERO, 20.0).with_rounds(15, 10, 4);
        let mut c = ProgressionController::new(
            config,
            FlatSurface::new(0.0),
            FnReference(|| player.get()),
            RecordingInstantiator::new(),
            StdRng::seed_from_u64(3),
        )
        .expect("valid config");

        c.start_round().expect("round starts");
        assert_eq!(c.reference_position(), Vec3::new(10.0, 0.0, 0.0));

        player.set(Vec3::new(-5.0, 0.0, 5.0));
        assert_eq!(c.reference_position(), Vec3::new(-5.0, 0.0, 5.0));
        c.start_round().expect("round restarts");
        for p in c.pickups() {
            assert!(p.item.horizontal_distance(player.get()) >= 2.0 - 1e-4);
        }
    }
}
