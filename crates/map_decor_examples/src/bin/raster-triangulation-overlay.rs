use map_decor::prelude::*;
use map_decor_examples::{init_tracing, island_grid, render_map_to_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let side = 16;
    let map = island_grid(side, 3)?;

    // Fill only, then with boundaries, then with the dual graph on top.
    let extent = side as f32;
    let variants = [
        ("raster-fill.png", TextureConfig::new(extent, 512)),
        (
            "raster-boundaries.png",
            TextureConfig::new(extent, 512).with_boundaries(true),
        ),
        (
            "raster-triangulation-overlay.png",
            TextureConfig::new(extent, 512)
                .with_boundaries(true)
                .with_triangles(true),
        ),
    ];

    for (path, config) in &variants {
        let texture = render_map_to_png(&map, config, path)?;
        println!("{path}: {} PNG bytes", texture.compressed_png().len());
    }

    Ok(())
}
