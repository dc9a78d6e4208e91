#![forbid(unsafe_code)]

use std::path::Path;

use glam::Vec3;
use map_decor::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call from the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Terrain colors used by the example renders.
pub fn terrain_palette() -> Vec<NodeTypeColor> {
    vec![
        NodeTypeColor::new(NodeType::SaltWater, Color::from_rgb_u8(40, 80, 160)),
        NodeTypeColor::new(NodeType::FreshWater, Color::from_rgb_u8(80, 150, 220)),
        NodeTypeColor::new(NodeType::Beach, Color::from_rgb_u8(230, 215, 160)),
        NodeTypeColor::new(NodeType::Grass, Color::from_rgb_u8(110, 170, 70)),
        NodeTypeColor::new(NodeType::TallGrass, Color::from_rgb_u8(70, 130, 50)),
        NodeTypeColor::new(NodeType::Rocky, Color::from_rgb_u8(130, 125, 115)),
        NodeTypeColor::new(NodeType::Mountain, Color::from_rgb_u8(100, 90, 85)),
        NodeTypeColor::new(NodeType::Snow, Color::from_rgb_u8(245, 245, 250)),
    ]
}

/// Builds a `side × side` grid of unit cells over `[0, side]²` with an island-like
/// terrain: water at the rim, rising to mountains and snow in the middle.
///
/// Grid corners are jittered by `seed` so region outlines are irregular.
pub fn island_grid(side: usize, seed: u64) -> Result<MapGraph> {
    let mut rng = StdRng::seed_from_u64(seed);
    let corners = side + 1;
    let mut points = Vec::with_capacity(corners * corners);
    for r in 0..corners {
        for c in 0..corners {
            let border = r == 0 || c == 0 || r == side || c == side;
            let (jx, jz) = if border {
                (0.0, 0.0)
            } else {
                (jitter(&mut rng), jitter(&mut rng))
            };
            points.push(Vec3::new(c as f32 + jx, 0.0, r as f32 + jz));
        }
    }

    let half = side as f32 / 2.0;
    let mut builder = PolygonMapBuilder::new();
    for r in 0..side {
        for c in 0..side {
            let corner = |rr: usize, cc: usize| points[rr * corners + cc];
            let outline = vec![
                corner(r, c),
                corner(r, c + 1),
                corner(r + 1, c + 1),
                corner(r + 1, c),
            ];
            let dx = (c as f32 + 0.5 - half) / half;
            let dz = (r as f32 + 0.5 - half) / half;
            let noise = (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32;
            let height = 1.0 - (dx * dx + dz * dz).sqrt() + (noise - 0.5) * 0.3;
            builder = builder.polygon(terrain_for(height, noise), outline);
        }
    }
    builder.build()
}

fn jitter(rng: &mut StdRng) -> f32 {
    ((rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32 - 0.5) * 0.6
}

fn terrain_for(height: f32, noise: f32) -> NodeType {
    match height {
        h if h < 0.15 => NodeType::SaltWater,
        h if h < 0.25 => NodeType::Beach,
        h if h < 0.6 && noise < 0.08 => NodeType::FreshWater,
        h if h < 0.5 => NodeType::Grass,
        h if h < 0.7 => NodeType::TallGrass,
        h if h < 0.8 => NodeType::Rocky,
        h if h < 0.92 => NodeType::Mountain,
        _ => NodeType::Snow,
    }
}

/// Renders `map` with [`terrain_palette`] and writes the PNG to `path`.
pub fn render_map_to_png(
    map: &MapGraph,
    config: &TextureConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<MapTexture> {
    let mut generator = MapTextureGenerator::new();
    let texture = generator.generate(map, &terrain_palette(), config)?;
    texture.save_png(path.as_ref())?;
    tracing::info!("Wrote {}", path.as_ref().display());
    Ok(texture)
}
