//! Event types and sinks for observing scatter runs.
//!
//! [`crate::scatter::runner::ScatterRun`] emits [`ScatterEvent`]s while it walks the
//! tree and rock passes. Collect them with a [`VecSink`], forward them with a
//! [`FnSink`], or ignore them with `()`.
use crate::graph::NodeId;
use crate::scatter::runner::{PassSummary, Placement};
use crate::scatter::ScatterPass;

/// Why a candidate node was skipped before its probability draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateReason {
    /// A neighbor is fresh water.
    BesideFreshWater,
    /// No neighbor shares the node's tall grass type.
    NoTallGrassNeighbor,
}

/// Describes events emitted by a scatter run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ScatterEvent {
    /// Emitted once the container is cleared and the PRNG seeded.
    RunStarted {
        seed: u64,
        /// Number of nodes in the map graph.
        node_count: usize,
    },

    /// Emitted after both passes.
    RunFinished {
        placements: usize,
        /// Total uniform draws consumed by the run.
        draws: u64,
    },

    /// Emitted when a pass starts walking its candidates.
    PassStarted {
        pass: ScatterPass,
        /// Nodes of an allowed type, occupied or not.
        candidates: usize,
    },

    /// Emitted when a pass is done.
    PassFinished {
        pass: ScatterPass,
        summary: PassSummary,
    },

    /// Emitted when a node was rejected by an adjacency gate.
    NodeGated {
        pass: ScatterPass,
        node: NodeId,
        reason: GateReason,
    },

    /// Emitted after the spawner accepted a placement.
    PlacementMade {
        pass: ScatterPass,
        placement: Placement,
    },
}

/// A generic event sink that accepts [`ScatterEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ScatterEvent);

    /// Lets a sink opt out of building events it would drop.
    #[inline]
    fn enabled(&self) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ScatterEvent) {}

    #[inline]
    fn enabled(&self) -> bool {
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

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ScatterEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<ScatterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ScatterEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ScatterEvent) {
        self.events.push(event);
    }
}
