use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec3;
use map_decor::prelude::{MapGraph, NodeType, PolygonMapBuilder};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// `side × side` unit squares with a repeating terrain pattern.
pub fn grid_map(side: usize) -> MapGraph {
    const PATTERN: [NodeType; 8] = [
        NodeType::Grass,
        NodeType::TallGrass,
        NodeType::TallGrass,
        NodeType::Rocky,
        NodeType::Grass,
        NodeType::FreshWater,
        NodeType::TallGrass,
        NodeType::Beach,
    ];

    let mut builder = PolygonMapBuilder::new();
    for r in 0..side {
        for c in 0..side {
            let (x, z) = (c as f32, r as f32);
            let node_type = PATTERN[(r * 7 + c * 3 + (r ^ c)) % PATTERN.len()];
            builder = builder.polygon(
                node_type,
                vec![
                    Vec3::new(x, 0.0, z),
                    Vec3::new(x + 1.0, 0.0, z),
                    Vec3::new(x + 1.0, 0.0, z + 1.0),
                    Vec3::new(x, 0.0, z + 1.0),
                ],
            );
        }
    }
    match builder.build() {
        Ok(map) => map,
        Err(e) => panic!("bench grid failed to build: {e}"),
    }
}
