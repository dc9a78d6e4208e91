//! Runner for the two-pass environment scatter (trees, then rocks).
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::graph::{MapGraph, NodeId, NodeType};
use crate::scatter::events::{EventSink, GateReason, ScatterEvent};
use crate::scatter::settings::{EnvironmentSettings, ObjectClass};
use crate::scatter::spawner::{ObjectSpawner, SpawnRequest};
use crate::scatter::transform::PlacementTransform;
use crate::scatter::{rand01, CountingRng, ObjectClassId, ScatterPass};

/// A decoration placed on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub node: NodeId,
    pub pass: ScatterPass,
    pub class_id: ObjectClassId,
    pub transform: PlacementTransform,
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Nodes of an allowed type.
    pub candidates: usize,
    /// Candidates skipped because they were already occupied.
    pub skipped_occupied: usize,
    /// Candidates rejected by an adjacency gate.
    pub gated: usize,
    /// Uniform draws consumed, including transform draws.
    pub draws: u64,
    pub placed: usize,
}

/// Outcome of a full scatter run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ScatterResult<H> {
    /// Placements in the order they were spawned.
    pub placements: Vec<Placement>,
    /// Spawner handles, parallel to `placements`.
    pub handles: Vec<H>,
    pub trees: PassSummary,
    pub rocks: PassSummary,
}

impl<H> ScatterResult<H> {
    pub fn draws(&self) -> u64 {
        self.trees.draws + self.rocks.draws
    }
}

/// Owns validated settings and runs [`init`] with them.
#[derive(Debug, Clone)]
pub struct Environment {
    settings: EnvironmentSettings,
}

impl Environment {
    pub fn try_new(settings: EnvironmentSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    /// Clears the spawner and scatters trees and rocks over `graph`.
    pub fn init<S: ObjectSpawner>(
        &self,
        graph: &mut MapGraph,
        seed: u64,
        spawner: &mut S,
    ) -> Result<ScatterResult<S::Handle>> {
        init(&self.settings, graph, seed, spawner)
    }

    pub fn init_with_events<S: ObjectSpawner>(
        &self,
        graph: &mut MapGraph,
        seed: u64,
        spawner: &mut S,
        sink: &mut dyn EventSink,
    ) -> Result<ScatterResult<S::Handle>> {
        init_with_events(&self.settings, graph, seed, spawner, sink)
    }
}

/// Clears the spawner, resets occupancy and runs the tree and rock passes with a PRNG
/// seeded from `seed`.
pub fn init<S: ObjectSpawner>(
    settings: &EnvironmentSettings,
    graph: &mut MapGraph,
    seed: u64,
    spawner: &mut S,
) -> Result<ScatterResult<S::Handle>> {
    let mut sink = ();
    init_with_events(settings, graph, seed, spawner, &mut sink)
}

pub fn init_with_events<S: ObjectSpawner>(
    settings: &EnvironmentSettings,
    graph: &mut MapGraph,
    seed: u64,
    spawner: &mut S,
    sink: &mut dyn EventSink,
) -> Result<ScatterResult<S::Handle>> {
    let mut run = ScatterRun::begin(settings, graph, seed, spawner, sink)?;
    run.spawn_trees();
    run.spawn_rocks();
    Ok(run.finish())
}

/// State of one scatter run: settings, graph, spawner, and the seeded PRNG.
///
/// Created by [`ScatterRun::begin`]; the passes can then be driven individually.
pub struct ScatterRun<'a, S: ObjectSpawner> {
    settings: &'a EnvironmentSettings,
    graph: &'a mut MapGraph,
    spawner: &'a mut S,
    sink: &'a mut dyn EventSink,
    rng: CountingRng<StdRng>,
    map_center: Vec3,
    placements: Vec<Placement>,
    handles: Vec<S::Handle>,
    trees: PassSummary,
    rocks: PassSummary,
}

impl<'a, S: ObjectSpawner> ScatterRun<'a, S> {
    /// Validates inputs, clears the spawner's container and prior occupancy, and
    /// seeds the PRNG. No draws are made here.
    pub fn begin(
        settings: &'a EnvironmentSettings,
        graph: &'a mut MapGraph,
        seed: u64,
        spawner: &'a mut S,
        sink: &'a mut dyn EventSink,
    ) -> Result<Self> {
        settings.validate()?;
        graph.validate()?;

        let map_center = graph.center();
        spawner.clear();
        graph.reset_occupancy();

        info!(
            "Scattering environment over {} nodes with seed {}.",
            graph.len(),
            seed
        );
        if sink.enabled() {
            sink.send(ScatterEvent::RunStarted {
                seed,
                node_count: graph.len(),
            });
        }

        Ok(Self {
            settings,
            graph,
            spawner,
            sink,
            rng: CountingRng::new(StdRng::seed_from_u64(seed)),
            map_center,
            placements: Vec::new(),
            handles: Vec::new(),
            trees: PassSummary::default(),
            rocks: PassSummary::default(),
        })
    }

    /// Deciduous trees on Grass, coniferous trees on gated TallGrass.
    pub fn spawn_trees(&mut self) -> PassSummary {
        let pass = ScatterPass::Trees;
        let settings = self.settings;
        let draws_at_start = self.rng.draws();
        let mut summary = self.start_pass(pass);

        for id in self.candidates(pass) {
            let node = self.graph.node(id);
            if node.is_occupied() {
                summary.skipped_occupied += 1;
                continue;
            }

            let class = if node.node_type == NodeType::Grass {
                &settings.deciduous_tree
            } else {
                if let Some(reason) = self.coniferous_gate(id) {
                    summary.gated += 1;
                    trace!("Node {:?} gated: {:?}.", id, reason);
                    if self.sink.enabled() {
                        self.sink.send(ScatterEvent::NodeGated {
                            pass,
                            node: id,
                            reason,
                        });
                    }
                    continue;
                }
                &settings.coniferous_tree
            };

            self.try_place(pass, id, class, &mut summary);
        }

        self.finish_pass(pass, summary, draws_at_start)
    }

    /// Rocks on any remaining Grass, TallGrass or Rocky node.
    pub fn spawn_rocks(&mut self) -> PassSummary {
        let pass = ScatterPass::Rocks;
        let settings = self.settings;
        let draws_at_start = self.rng.draws();
        let mut summary = self.start_pass(pass);

        for id in self.candidates(pass) {
            if self.graph.node(id).is_occupied() {
                summary.skipped_occupied += 1;
                continue;
            }
            self.try_place(pass, id, &settings.rock, &mut summary);
        }

        self.finish_pass(pass, summary, draws_at_start)
    }

    /// Ends the run and returns what was placed.
    pub fn finish(mut self) -> ScatterResult<S::Handle> {
        let draws = self.rng.draws();
        info!(
            "Scatter finished: {} placements, {} draws.",
            self.placements.len(),
            draws
        );
        if self.sink.enabled() {
            self.sink.send(ScatterEvent::RunFinished {
                placements: self.placements.len(),
                draws,
            });
        }
        ScatterResult {
            placements: self.placements,
            handles: self.handles,
            trees: self.trees,
            rocks: self.rocks,
        }
    }

    /// Total uniform draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.rng.draws()
    }

    fn candidates(&self, pass: ScatterPass) -> Vec<NodeId> {
        self.graph
            .nodes_of_type(pass.node_types())
            .map(|n| n.id)
            .collect()
    }

    fn start_pass(&mut self, pass: ScatterPass) -> PassSummary {
        let candidates = self.graph.nodes_of_type(pass.node_types()).count();
        if self.sink.enabled() {
            self.sink
                .send(ScatterEvent::PassStarted { pass, candidates });
        }
        PassSummary {
            candidates,
            ..PassSummary::default()
        }
    }

    fn finish_pass(
        &mut self,
        pass: ScatterPass,
        mut summary: PassSummary,
        draws_at_start: u64,
    ) -> PassSummary {
        summary.draws = self.rng.draws() - draws_at_start;
        debug!(
            "{:?} pass: {} candidates, {} occupied, {} gated, {} placed, {} draws.",
            pass,
            summary.candidates,
            summary.skipped_occupied,
            summary.gated,
            summary.placed,
            summary.draws
        );
        match pass {
            ScatterPass::Trees => self.trees = summary,
            ScatterPass::Rocks => self.rocks = summary,
        }
        if self.sink.enabled() {
            self.sink.send(ScatterEvent::PassFinished { pass, summary });
        }
        summary
    }

    /// Coniferous trees need tall grass company and no fresh water next door.
    fn coniferous_gate(&self, id: NodeId) -> Option<GateReason> {
        let mut tall_grass_neighbor = false;
        for neighbor in self.graph.neighbor_nodes(id) {
            match neighbor.node_type {
                NodeType::FreshWater => return Some(GateReason::BesideFreshWater),
                NodeType::TallGrass => tall_grass_neighbor = true,
                _ => {}
            }
        }
        if tall_grass_neighbor {
            None
        } else {
            Some(GateReason::NoTallGrassNeighbor)
        }
    }

    fn try_place(
        &mut self,
        pass: ScatterPass,
        id: NodeId,
        class: &ObjectClass,
        summary: &mut PassSummary,
    ) -> bool {
        if rand01(&mut self.rng) >= class.probability {
            return false;
        }

        let center = self.graph.node(id).center;
        let transform = PlacementTransform::draw(center, self.map_center, class, &mut self.rng);
        let handle = self
            .spawner
            .spawn(&SpawnRequest::new(id, &class.id, &transform));
        self.graph.mark_occupied(id);

        debug!(
            "Placed '{}' on {:?} at {:?} (scale {:.3}).",
            class.id, id, transform.position, transform.scale
        );

        let placement = Placement {
            node: id,
            pass,
            class_id: class.id.clone(),
            transform,
        };
        if self.sink.enabled() {
            self.sink.send(ScatterEvent::PlacementMade {
                pass,
                placement: placement.clone(),
            });
        }
        self.placements.push(placement);
        self.handles.push(handle);
        summary.placed += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PolygonMapBuilder;
    use crate::scatter::events::VecSink;
    use crate::scatter::spawner::VecSpawner;

    fn square(x0: f32) -> Vec<Vec3> {
        vec![
            Vec3::new(x0, 0.0, 0.0),
            Vec3::new(x0 + 1.0, 0.0, 0.0),
            Vec3::new(x0 + 1.0, 0.0, 1.0),
            Vec3::new(x0, 0.0, 1.0),
        ]
    }

    /// A row of unit squares, left to right.
    fn strip(types: &[NodeType]) -> MapGraph {
        let mut builder = PolygonMapBuilder::new();
        for (i, t) in types.iter().enumerate() {
            builder = builder.polygon(*t, square(i as f32));
        }
        builder.build().unwrap()
    }

    fn certain() -> EnvironmentSettings {
        EnvironmentSettings::new(
            ObjectClass::new("oak", 1.0),
            ObjectClass::new("pine", 1.0),
            ObjectClass::new("rock", 1.0),
        )
    }

    #[test]
    fn placement_consumes_five_draws_and_occupies() {
        let mut graph = strip(&[NodeType::Grass]);
        let mut spawner = VecSpawner::new();
        let result = init(&certain(), &mut graph, 1, &mut spawner).unwrap();

        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].class_id, "oak");
        assert_eq!(result.trees.draws, 5);
        assert_eq!(result.rocks.draws, 0);
        assert_eq!(result.rocks.skipped_occupied, 1);
        assert!(graph.node(NodeId(0)).is_occupied());
        assert_eq!(result.handles, vec![0]);
    }

    #[test]
    fn gate_events_name_the_reason() {
        // Lone tall grass beside fresh water.
        let mut graph = strip(&[NodeType::FreshWater, NodeType::TallGrass]);
        let mut sink = VecSink::new();
        let settings = certain().with_rock(ObjectClass::new("rock", 0.0));
        let result = init_with_events(&settings, &mut graph, 3, &mut (), &mut sink).unwrap();

        assert!(result.placements.is_empty());
        assert_eq!(result.trees.gated, 1);
        assert_eq!(result.trees.draws, 0);
        let reasons: Vec<_> = sink
            .as_slice()
            .iter()
            .filter_map(|e| match e {
                ScatterEvent::NodeGated { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(reasons, vec![GateReason::BesideFreshWater]);
    }

    #[test]
    fn tall_grass_without_tall_grass_neighbor_is_gated() {
        let mut graph = strip(&[NodeType::Grass, NodeType::TallGrass]);
        let settings = certain()
            .with_deciduous_tree(ObjectClass::new("oak", 0.0))
            .with_rock(ObjectClass::new("rock", 0.0));
        let result = init(&settings, &mut graph, 3, &mut ()).unwrap();
        assert_eq!(result.trees.gated, 1);
        assert!(result.placements.is_empty());
    }

    #[test]
    fn invalid_settings_fail_before_clearing() {
        let mut graph = strip(&[NodeType::Grass]);
        let mut spawner = VecSpawner::new();
        let settings = certain().with_rock(ObjectClass::new("rock", -0.5));
        assert!(init(&settings, &mut graph, 0, &mut spawner).is_err());
        assert_eq!(spawner.clear_count(), 0);
    }

    #[test]
    fn events_bracket_the_run() {
        let mut graph = strip(&[NodeType::Grass, NodeType::Rocky]);
        let mut sink = VecSink::new();
        init_with_events(&certain(), &mut graph, 9, &mut (), &mut sink).unwrap();

        let events = sink.into_inner();
        assert!(matches!(events.first(), Some(ScatterEvent::RunStarted { seed: 9, .. })));
        assert!(matches!(
            events.last(),
            Some(ScatterEvent::RunFinished { placements: 2, .. })
        ));
        let passes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ScatterEvent::PassStarted { pass, .. } => Some(*pass),
                _ => None,
            })
            .collect();
        assert_eq!(passes, vec![ScatterPass::Trees, ScatterPass::Rocks]);
    }
}
