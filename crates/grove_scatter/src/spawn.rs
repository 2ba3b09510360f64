//! Instantiation of placed items and ownership of the resulting live objects.
//!
//! The planner returns data only. An [`Instantiator`] turns a [`PlacedItem`]
//! into a host-engine object and tears it down later; a [`SpawnArena`] keeps
//! the handles so a controller can clear everything it created.
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::catalog::PrefabHandle;
use crate::scatter::planner::PlacedItem;
use crate::scatter::ColliderShape;

/// Everything the host needs to build one object.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub item: &'a PlacedItem,
    /// Prefab to instantiate; `None` lets the host use its default for the category.
    pub prefab: Option<&'a PrefabHandle>,
    /// Collider to add because the prefab has none.
    pub collider: Option<ColliderShape>,
}

impl<'a> SpawnRequest<'a> {
    pub fn new(item: &'a PlacedItem) -> Self {
        Self {
            item,
            prefab: None,
            collider: None,
        }
    }

    pub fn with_prefab(mut self, prefab: &'a PrefabHandle) -> Self {
        self.prefab = Some(prefab);
        self
    }

    pub fn with_collider(mut self, collider: Option<ColliderShape>) -> Self {
        self.collider = collider;
        self
    }
}

/// Host-side factory for live objects.
pub trait Instantiator {
    type Handle: Clone + PartialEq + Debug;

    fn spawn(&mut self, request: &SpawnRequest<'_>) -> Self::Handle;

    /// Destroys a live object. Unknown or already destroyed handles are ignored.
    fn despawn(&mut self, handle: Self::Handle);
}

impl<I: Instantiator + ?Sized> Instantiator for &mut I {
    type Handle = I::Handle;

    #[inline]
    fn spawn(&mut self, request: &SpawnRequest<'_>) -> Self::Handle {
        (**self).spawn(request)
    }

    #[inline]
    fn despawn(&mut self, handle: Self::Handle) {
        (**self).despawn(handle)
    }
}

/// A live object and the placement it was created from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawned<H> {
    pub handle: H,
    pub item: PlacedItem,
}

/// Owns the handles of objects created by one controller.
#[derive(Debug, Clone)]
pub struct SpawnArena<H> {
    live: Vec<Spawned<H>>,
}

impl<H> Default for SpawnArena<H> {
    fn default() -> Self {
        Self { live: Vec::new() }
    }
}

impl<H: Clone + PartialEq + Debug> SpawnArena<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `request` through `instantiator` and records the handle.
    pub fn spawn<I>(&mut self, instantiator: &mut I, request: &SpawnRequest<'_>) -> H
    where
        I: Instantiator<Handle = H> + ?Sized,
    {
        let handle = instantiator.spawn(request);
        self.live.push(Spawned {
            handle: handle.clone(),
            item: *request.item,
        });
        handle
    }

    /// Forgets `handle` without destroying it and returns its record.
    pub fn take(&mut self, handle: &H) -> Option<Spawned<H>> {
        let idx = self.live.iter().position(|s| &s.handle == handle)?;
        Some(self.live.remove(idx))
    }

    /// Destroys one object. Returns `false` if the arena does not own `handle`.
    pub fn despawn<I>(&mut self, instantiator: &mut I, handle: &H) -> bool
    where
        I: Instantiator<Handle = H> + ?Sized,
    {
        match self.take(handle) {
            Some(spawned) => {
                instantiator.despawn(spawned.handle);
                true
            }
            None => false,
        }
    }

    /// Destroys every owned object and returns how many there were.
    pub fn clear<I>(&mut self, instantiator: &mut I) -> usize
    where
        I: Instantiator<Handle = H> + ?Sized,
    {
        let count = self.live.len();
        for spawned in self.live.drain(..) {
            instantiator.despawn(spawned.handle);
        }
        count
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.live.iter().any(|s| &s.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spawned<H>> {
        self.live.iter()
    }

    /// Placements of all live objects in spawn order.
    pub fn items(&self) -> impl Iterator<Item = PlacedItem> + '_ {
        self.live.iter().map(|s| s.item)
    }
}

/// What a [`RecordingInstantiator`] remembers about a live object.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRecord {
    pub item: PlacedItem,
    pub prefab: Option<PrefabHandle>,
    pub collider: Option<ColliderShape>,
}

/// In-memory instantiator that keeps a record per live object.
#[derive(Debug, Default)]
pub struct RecordingInstantiator {
    next_id: u64,
    live: BTreeMap<u64, SpawnRecord>,
    /// Total objects ever spawned.
    pub spawned: usize,
    /// Total objects destroyed.
    pub despawned: usize,
}

impl RecordingInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: u64) -> Option<&SpawnRecord> {
        self.live.get(&handle)
    }

    /// Live objects ordered by handle.
    pub fn live(&self) -> impl Iterator<Item = (u64, &SpawnRecord)> {
        self.live.iter().map(|(id, r)| (*id, r))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Instantiator for RecordingInstantiator {
    type Handle = u64;

    fn spawn(&mut self, request: &SpawnRequest<'_>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.spawned += 1;
        self.live.insert(
            id,
            SpawnRecord {
                item: *request.item,
                prefab: request.prefab.cloned(),
                collider: request.collider,
            },
        );
        id
    }

    fn despawn(&mut self, handle: u64) {
        if self.live.remove(&handle).is_some() {
            self.despawned += 1;
        }
    }
}
