#![forbid(unsafe_code)]
//! grove_scatter: bounded rejection-sampling scatter over irregular ground.
//!
//! Modules:
//! - scatter: categories, placement requests, the planner, selection and events
//! - sampling: polar disk sampling and rng helpers
//! - surface: downward ground queries and reference surfaces
//! - catalog: weighted prefab variants and collider synthesis
//! - spawn: instantiation collaborator and the arena owning live objects
//! - progression: pickup rounds, advancing and session completion
//! - decoration: on-demand terrain dressing
pub mod catalog;
pub mod decoration;
pub mod error;
pub mod progression;
pub mod sampling;
pub mod scatter;
pub mod spawn;
pub mod surface;

/// Convenient re-exports for common types. Import with `use grove_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogEntry, LocalBounds, ObjectCatalog, PrefabHandle};
    pub use crate::decoration::{
        CategoryPass, DecorationConfig, DecorationController, DecorationReport,
    };
    pub use crate::error::{Error, Result};
    pub use crate::progression::{
        AdvanceResult, FnReference, PlantingSpot, ProgressionController, ReferencePointProvider,
        RoundConfig, RoundPhase, RoundState,
    };
    pub use crate::sampling::{CandidateSampling, DiskSampling};
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, RejectReason, ScatterEvent, ScatterEventKind, VecSink,
    };
    pub use crate::scatter::planner::{place, PlacedItem, PlacementResult, ScatterPlanner};
    pub use crate::scatter::request::{ExcludedZone, PlacementRequest};
    pub use crate::scatter::selection::pick_weighted_random;
    pub use crate::scatter::{Category, CategoryProfile, ColliderShape};
    pub use crate::spawn::{
        Instantiator, RecordingInstantiator, SpawnArena, SpawnRecord, SpawnRequest, Spawned,
    };
    pub use crate::surface::{
        FlatSurface, FnSurface, HeightfieldSurface, SurfacePoint, SurfaceQuery,
    };
}
