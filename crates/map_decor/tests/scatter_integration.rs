use glam::Vec3;
use map_decor::prelude::*;

/// Unit squares laid out row by row; `rows[r][c]` sits at x = c, z = r.
fn grid(rows: &[&[NodeType]]) -> MapGraph {
    let mut builder = PolygonMapBuilder::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, node_type) in row.iter().enumerate() {
            let (x, z) = (c as f32, r as f32);
            builder = builder.polygon(
                *node_type,
                vec![
                    Vec3::new(x, 0.0, z),
                    Vec3::new(x + 1.0, 0.0, z),
                    Vec3::new(x + 1.0, 0.0, z + 1.0),
                    Vec3::new(x, 0.0, z + 1.0),
                ],
            );
        }
    }
    builder.build().unwrap()
}

fn settings(deciduous: f32, coniferous: f32, rock: f32) -> EnvironmentSettings {
    EnvironmentSettings::new(
        ObjectClass::new("oak", deciduous).with_scale(1.0, 0.5),
        ObjectClass::new("pine", coniferous).with_scale(1.2, 0.3),
        ObjectClass::new("boulder", rock).with_scale(0.5, 0.2),
    )
}

/// Mixed terrain that exercises every pass and gate.
fn mixed_map(size: usize) -> MapGraph {
    use NodeType::*;
    let palette = [Grass, TallGrass, TallGrass, Rocky, FreshWater, Grass, Beach, TallGrass];
    let rows: Vec<Vec<NodeType>> = (0..size)
        .map(|r| {
            (0..size)
                .map(|c| palette[(r * 3 + c * 5 + r * c) % palette.len()])
                .collect()
        })
        .collect();
    let refs: Vec<&[NodeType]> = rows.iter().map(|r| r.as_slice()).collect();
    grid(&refs)
}

#[test]
fn excluded_node_types_are_untouched() {
    use NodeType::*;
    let mut graph = grid(&[&[SaltWater, Beach], &[Mountain, Snow], &[FreshWater, Beach]]);
    let mut spawner = VecSpawner::new();
    let result = init(&settings(1.0, 1.0, 1.0), &mut graph, 7, &mut spawner).unwrap();

    assert!(result.placements.is_empty());
    assert_eq!(result.draws(), 0);
    assert_eq!(graph.occupied_count(), 0);
    assert_eq!(spawner.clear_count(), 1);
    assert!(spawner.is_empty());
}

#[test]
fn tall_grass_beside_fresh_water_gets_no_conifer() {
    use NodeType::*;
    // Both tall grass nodes have a tall grass neighbor; only the middle one touches water.
    let mut graph = grid(&[&[TallGrass, TallGrass, FreshWater]]);
    let mut spawner = VecSpawner::new();
    let result = init(&settings(0.0, 1.0, 0.0), &mut graph, 11, &mut spawner).unwrap();

    let pine_nodes: Vec<NodeId> = result
        .placements
        .iter()
        .filter(|p| p.class_id == "pine")
        .map(|p| p.node)
        .collect();
    assert_eq!(pine_nodes, vec![NodeId(0)]);
    assert_eq!(result.trees.gated, 1);
    assert!(!graph.node(NodeId(1)).is_occupied());
}

#[test]
fn isolated_tall_grass_gets_no_conifer() {
    use NodeType::*;
    let mut graph = grid(&[
        &[Grass, Grass, Grass],
        &[Grass, TallGrass, Grass],
        &[Grass, Grass, Grass],
    ]);
    let mut sink = VecSink::new();
    let result =
        init_with_events(&settings(0.0, 1.0, 0.0), &mut graph, 5, &mut (), &mut sink).unwrap();

    assert!(result.placements.is_empty());
    assert!(sink.as_slice().iter().any(|e| matches!(
        e,
        ScatterEvent::NodeGated {
            node: NodeId(4),
            reason: GateReason::NoTallGrassNeighbor,
            ..
        }
    )));
}

#[test]
fn equal_seeds_give_identical_runs() {
    let settings = settings(0.5, 0.5, 0.5);
    let mut first_graph = mixed_map(8);
    let mut second_graph = mixed_map(8);
    let mut first = VecSpawner::new();
    let mut second = VecSpawner::new();

    let a = init(&settings, &mut first_graph, 42, &mut first).unwrap();
    let b = init(&settings, &mut second_graph, 42, &mut second).unwrap();

    assert!(!a.placements.is_empty());
    assert_eq!(a.placements, b.placements);
    assert_eq!(first.objects(), second.objects());
    assert_eq!(a.draws(), b.draws());
}

#[test]
fn rerun_on_same_graph_is_reproducible() {
    let settings = settings(0.5, 0.5, 0.5);
    let mut graph = mixed_map(6);
    let mut spawner = VecSpawner::new();

    let a = init(&settings, &mut graph, 9, &mut spawner).unwrap();
    let b = init(&settings, &mut graph, 9, &mut spawner).unwrap();

    assert_eq!(a.placements, b.placements);
    assert_eq!(spawner.len(), b.placements.len());
    assert_eq!(spawner.clear_count(), 2);
}

#[test]
fn different_seeds_diverge() {
    let settings = settings(0.5, 0.5, 0.5);
    let mut graph = mixed_map(8);
    let a = init(&settings, &mut graph, 1, &mut ()).unwrap();
    let b = init(&settings, &mut graph, 2, &mut ()).unwrap();
    assert_ne!(a.placements, b.placements);
}

#[test]
fn certain_deciduous_fills_every_grass_node() {
    use NodeType::*;
    let mut graph = grid(&[&[Grass, Grass, Rocky], &[Beach, Grass, Grass]]);
    let result = init(&settings(1.0, 0.0, 0.0), &mut graph, 3, &mut ()).unwrap();

    let grass: Vec<NodeId> = graph.nodes_of_type(&[Grass]).map(|n| n.id).collect();
    let oaks: Vec<NodeId> = result.placements.iter().map(|p| p.node).collect();
    assert_eq!(oaks, grass);
    assert!(grass.iter().all(|id| graph.node(*id).is_occupied()));
    // Rocks skip the occupied grass and draw once for the rocky node.
    assert_eq!(result.rocks.skipped_occupied, 4);
    assert_eq!(result.rocks.draws, 1);
}

#[test]
fn impossible_deciduous_places_nothing() {
    use NodeType::*;
    let mut graph = grid(&[&[Grass, Grass], &[Grass, Grass]]);
    let result = init(&settings(0.0, 1.0, 0.0), &mut graph, 3, &mut ()).unwrap();

    assert!(result.placements.is_empty());
    assert_eq!(graph.occupied_count(), 0);
    // One probability draw per grass node per pass.
    assert_eq!(result.trees.draws, 4);
    assert_eq!(result.rocks.draws, 4);
}

#[test]
fn positions_are_relative_to_map_center() {
    use NodeType::*;
    let mut graph = grid(&[&[Grass, Beach, Grass]]);
    let result = init(&settings(1.0, 0.0, 0.0), &mut graph, 0, &mut ()).unwrap();

    let positions: Vec<Vec3> = result
        .placements
        .iter()
        .map(|p| p.transform.position)
        .collect();
    assert_eq!(
        positions,
        vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]
    );
}

#[test]
fn transforms_stay_within_configured_ranges() {
    let mut graph = mixed_map(10);
    let result = init(&settings(1.0, 1.0, 1.0), &mut graph, 77, &mut ()).unwrap();

    for placement in &result.placements {
        let t = &placement.transform;
        assert!(t.euler_degrees.x.abs() <= MAX_TILT_DEGREES);
        assert!(t.euler_degrees.z.abs() <= MAX_TILT_DEGREES);
        assert!((0.0..360.0).contains(&t.euler_degrees.y));
        let (base, dev) = match placement.class_id.as_str() {
            "oak" => (1.0, 0.5),
            "pine" => (1.2, 0.3),
            _ => (0.5, 0.2),
        };
        assert!(t.scale >= base && t.scale <= base + dev);
    }
}

#[test]
fn invalid_settings_abort_before_clearing() {
    let mut graph = mixed_map(3);
    let mut spawner = VecSpawner::new();
    let bad = settings(0.5, f32::NAN, 0.5);

    assert!(matches!(
        init(&bad, &mut graph, 1, &mut spawner),
        Err(Error::InvalidConfig(_))
    ));
    assert_eq!(spawner.clear_count(), 0);
    assert!(Environment::try_new(bad).is_err());
}

#[test]
fn mixed_winding_neighbors_still_count_for_the_conifer_gate() {
    let counter_clockwise = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    let clockwise = vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(2.0, 0.0, 1.0),
        Vec3::new(2.0, 0.0, 0.0),
    ];
    let mut graph = PolygonMapBuilder::new()
        .polygon(NodeType::TallGrass, counter_clockwise)
        .polygon(NodeType::TallGrass, clockwise)
        .build()
        .unwrap();
    assert_eq!(graph.neighbors(NodeId(0)), vec![NodeId(1)]);

    let result = init(&settings(0.0, 1.0, 0.0), &mut graph, 4, &mut ()).unwrap();
    let pines: Vec<NodeId> = result
        .placements
        .iter()
        .filter(|p| p.class_id == "pine")
        .map(|p| p.node)
        .collect();
    assert_eq!(pines, vec![NodeId(0), NodeId(1)]);
    assert_eq!(result.trees.gated, 0);
}
