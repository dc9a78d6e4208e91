use std::fs;

use map_decor::prelude::*;
use map_decor_examples::{init_tracing, island_grid};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/assets/environment.ron").into());
    let text = fs::read_to_string(&path)?;
    let settings: EnvironmentSettings =
        ron::de::from_str(&text).map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
    let environment = Environment::try_new(settings)?;

    let mut map = island_grid(32, 11)?;

    // Log every gate decision alongside the placements.
    let mut gated = 0usize;
    let mut sink = FnSink::new(|event| {
        if let ScatterEvent::NodeGated { node, reason, .. } = event {
            gated += 1;
            tracing::debug!("{:?} gated: {:?}", node, reason);
        }
    });

    let result = environment.init_with_events(&mut map, 99, &mut (), &mut sink)?;
    drop(sink);

    println!(
        "{} placements, {} gated tall grass nodes, {} draws",
        result.placements.len(),
        gated,
        result.draws()
    );
    for placement in result.placements.iter().take(5) {
        let t = &placement.transform;
        println!(
            "  {:<16} {:?} at {:.2?} yaw {:.1} scale {:.2}",
            placement.class_id, placement.node, t.position, t.euler_degrees.y, t.scale
        );
    }

    Ok(())
}
