//! Event types and sinks for observing scatter passes.
//!
//! This module defines [`ScatterEvent`] and a set of sinks to collect or
//! forward events while [`crate::scatter::planner::ScatterPlanner::place`]
//! runs. Passing `None` as the sink skips event construction entirely.
use glam::Vec3;

use crate::scatter::planner::{PlacedItem, PlacementResult};

/// Why a candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No walkable surface under the candidate column.
    SurfaceMiss,
    /// Too close to an already accepted or occupied item.
    TooClose,
    /// Inside the clearance of an excluded zone.
    ExcludedZone,
}

/// Describes events emitted by a scatter pass.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ScatterEvent {
    /// Emitted before the first candidate is drawn.
    PassStarted {
        /// Center of the sampled disk.
        center: Vec3,
        /// Radius of the sampled disk.
        radius: f32,
        /// Requested item count.
        requested: usize,
        /// Total attempt budget.
        budget: usize,
    },

    /// Emitted for each discarded candidate.
    CandidateRejected {
        /// Attempt index, starting at 0.
        attempt: usize,
        /// Candidate position; y is the pass center height on a surface miss.
        position: Vec3,
        reason: RejectReason,
    },

    /// Emitted when a candidate is accepted.
    ItemPlaced {
        /// Attempt index, starting at 0.
        attempt: usize,
        item: PlacedItem,
    },

    /// Emitted once the pass ends, fulfilled or not.
    PassFinished { result: PlacementResult },

    /// Non-fatal warning generated during a pass.
    Warning {
        /// Context string (e.g. category).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`ScatterEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScatterEventKind {
    PassStarted,
    CandidateRejected,
    ItemPlaced,
    PassFinished,
    Warning,
}

impl ScatterEvent {
    pub fn kind(&self) -> ScatterEventKind {
        match self {
            ScatterEvent::PassStarted { .. } => ScatterEventKind::PassStarted,
            ScatterEvent::CandidateRejected { .. } => ScatterEventKind::CandidateRejected,
            ScatterEvent::ItemPlaced { .. } => ScatterEventKind::ItemPlaced,
            ScatterEvent::PassFinished { .. } => ScatterEventKind::PassFinished,
            ScatterEvent::Warning { .. } => ScatterEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`ScatterEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ScatterEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ScatterEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ScatterEvent) {}

    #[inline]
    fn wants(&self, _kind: ScatterEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ScatterEvent),
{
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ScatterEvent>,
    only: Option<Vec<ScatterEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only the listed kinds.
    pub fn only(kinds: &[ScatterEventKind]) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.to_vec()),
        }
    }

    pub fn into_inner(self) -> Vec<ScatterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ScatterEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: ScatterEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: ScatterEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: ScatterEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
