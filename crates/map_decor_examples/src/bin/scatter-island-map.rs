use map_decor::prelude::*;
use map_decor_examples::{init_tracing, island_grid, render_map_to_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 48x48 cells over a 48 unit square.
    let side = 48;
    let mut map = island_grid(side, 7)?;

    let environment = Environment::try_new(EnvironmentSettings::default())?;
    let mut spawner = VecSpawner::new();
    let result = environment.init(&mut map, 1234, &mut spawner)?;

    let count = |class: &str| {
        spawner
            .objects()
            .iter()
            .filter(|o| o.class_id == class)
            .count()
    };
    println!(
        "placed {} objects: {} deciduous, {} coniferous, {} rocks ({} draws)",
        spawner.len(),
        count("deciduous_tree"),
        count("coniferous_tree"),
        count("rock"),
        result.draws()
    );
    println!(
        "trees: {} candidates, {} gated; rocks: {} candidates, {} already occupied",
        result.trees.candidates,
        result.trees.gated,
        result.rocks.candidates,
        result.rocks.skipped_occupied
    );

    let config = TextureConfig::new(side as f32, 768).with_boundaries(true);
    render_map_to_png(&map, &config, "scatter-island-map.png")?;

    Ok(())
}
