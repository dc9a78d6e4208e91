//! Map texture generation: fill, boundary and triangulation passes.
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use tracing::{debug, info, warn};

use crate::color::{Color, ColorMapping, NodeTypeColor};
use crate::error::{Error, Result};
use crate::graph::MapGraph;
use crate::raster::backend::{FlatColorMaterial, RenderBackend, ScopedSurface};
use crate::raster::display_list::{Batch, DisplayList, PrimitiveKind};
use crate::raster::projection::{plane_point, PixelProjection};
use crate::raster::software::SoftwareBackend;

/// Surface color before any pass draws.
pub const BACKGROUND_COLOR: Color = Color::WHITE;
/// Color of region boundary lines.
pub const BOUNDARY_COLOR: Color = Color::BLACK;
/// Color of triangulation (dual graph) lines.
pub const TRIANGULATION_COLOR: Color = Color::RED;

/// Configuration for generating a map texture.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// World units spanned by the mesh along x and z.
    pub mesh_extent: f32,
    /// Side length of the square output in pixels.
    pub texture_size: u32,
    /// Draw every edge as a boundary line.
    pub draw_boundaries: bool,
    /// Draw center-to-center lines across opposite edges.
    pub draw_triangles: bool,
}

impl TextureConfig {
    pub fn new(mesh_extent: f32, texture_size: u32) -> Self {
        Self {
            mesh_extent,
            texture_size,
            draw_boundaries: false,
            draw_triangles: false,
        }
    }

    pub fn with_boundaries(mut self, draw_boundaries: bool) -> Self {
        self.draw_boundaries = draw_boundaries;
        self
    }

    pub fn with_triangles(mut self, draw_triangles: bool) -> Self {
        self.draw_triangles = draw_triangles;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.mesh_extent.is_finite() || self.mesh_extent <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "mesh_extent must be finite and > 0, got {}",
                self.mesh_extent
            )));
        }
        if self.texture_size == 0 {
            return Err(Error::InvalidConfig("texture_size must be > 0".into()));
        }
        Ok(())
    }
}

/// A rendered map: the pixel buffer plus its compressed PNG encoding.
#[derive(Clone)]
pub struct MapTexture {
    image: RgbaImage,
    compressed: Vec<u8>,
}

impl MapTexture {
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// PNG bytes encoded with the best compression setting.
    pub fn compressed_png(&self) -> &[u8] {
        &self.compressed
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.compressed)?;
        Ok(())
    }
}

impl std::fmt::Debug for MapTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapTexture")
            .field("size", &self.size())
            .field("compressed_bytes", &self.compressed.len())
            .finish()
    }
}

/// Renders map graphs into textures through a [`RenderBackend`].
///
/// The drawing material is created on first use and reused afterwards.
pub struct MapTextureGenerator<B: RenderBackend = SoftwareBackend> {
    backend: B,
    material: Option<FlatColorMaterial>,
}

impl MapTextureGenerator<SoftwareBackend> {
    pub fn new() -> Self {
        Self::with_backend(SoftwareBackend::new())
    }
}

impl Default for MapTextureGenerator<SoftwareBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend> MapTextureGenerator<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            material: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The cached material, if a texture was generated before.
    pub fn material(&self) -> Option<&FlatColorMaterial> {
        self.material.as_ref()
    }

    /// Renders `map` with colors from an ordered `(type, color)` list.
    pub fn generate(
        &mut self,
        map: &MapGraph,
        colors: &[NodeTypeColor],
        config: &TextureConfig,
    ) -> Result<MapTexture> {
        self.generate_with_mapping(map, &ColorMapping::from_entries(colors), config)
    }

    pub fn generate_with_mapping(
        &mut self,
        map: &MapGraph,
        mapping: &ColorMapping,
        config: &TextureConfig,
    ) -> Result<MapTexture> {
        config.validate()?;
        map.validate()?;

        let material = *self
            .material
            .get_or_insert_with(FlatColorMaterial::alpha_blended);
        let projection = PixelProjection::try_new(config.mesh_extent, config.texture_size)?;
        let list = build_display_list(map, mapping, config);

        let mut surface = ScopedSurface::acquire(&mut self.backend, config.texture_size)?;
        surface.clear(BACKGROUND_COLOR);
        surface.draw(&material, &projection, &list)?;
        let image = surface.read_pixels()?;
        surface.release();

        let compressed = compress_png(&image)?;
        info!(
            "Generated {}x{} map texture: {} nodes, {} primitives, {} PNG bytes.",
            config.texture_size,
            config.texture_size,
            map.len(),
            list.primitive_count(),
            compressed.len()
        );

        Ok(MapTexture { image, compressed })
    }
}

/// Renders `map` with the software backend.
pub fn generate_texture(
    map: &MapGraph,
    mesh_extent: f32,
    texture_size: u32,
    colors: &[NodeTypeColor],
    draw_boundaries: bool,
    draw_triangles: bool,
) -> Result<MapTexture> {
    let config = TextureConfig::new(mesh_extent, texture_size)
        .with_boundaries(draw_boundaries)
        .with_triangles(draw_triangles);
    MapTextureGenerator::new().generate(map, colors, &config)
}

/// Records the fill, boundary and triangulation passes in draw order.
pub fn build_display_list(
    map: &MapGraph,
    mapping: &ColorMapping,
    config: &TextureConfig,
) -> DisplayList {
    let mut list = DisplayList::new();

    list.push(fill_pass(map, mapping));
    if config.draw_boundaries {
        list.push(boundary_pass(map));
    }
    if config.draw_triangles {
        list.push(triangulation_pass(map));
    }

    list
}

fn fill_pass(map: &MapGraph, mapping: &ColorMapping) -> Batch {
    let mut batch = Batch::new(PrimitiveKind::Triangles);
    let mut unmapped = 0usize;

    for node in map.nodes() {
        if !mapping.contains(node.node_type) {
            unmapped += 1;
        }
        if node.edges().is_empty() {
            warn!("Node {:?} has no boundary edges; nothing to fill.", node.id);
            continue;
        }
        batch.set_color(mapping.get(node.node_type));

        let center = plane_point(node.center);
        for edge in map.node_edges(node.id) {
            batch.vertex(center);
            batch.vertex(plane_point(edge.start));
            batch.vertex(plane_point(edge.end));
        }
    }

    if unmapped > 0 {
        debug!(
            "{} nodes have no mapped color; using the fallback.",
            unmapped
        );
    }
    batch
}

fn boundary_pass(map: &MapGraph) -> Batch {
    let mut batch = Batch::new(PrimitiveKind::Lines);
    batch.set_color(BOUNDARY_COLOR);
    for edge in map.edges() {
        batch.vertex(plane_point(edge.start));
        batch.vertex(plane_point(edge.end));
    }
    batch
}

fn triangulation_pass(map: &MapGraph) -> Batch {
    let mut batch = Batch::new(PrimitiveKind::Lines);
    batch.set_color(TRIANGULATION_COLOR);
    for edge in map.edges() {
        let Some(opposite) = edge.opposite else {
            continue;
        };
        let from = map.node(edge.node).center;
        let to = map.node(map.edge(opposite).node).center;
        batch.vertex(plane_point(from));
        batch.vertex(plane_point(to));
    }
    batch
}

fn compress_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::graph::{NodeType, PolygonMapBuilder};

    fn two_squares() -> MapGraph {
        let square = |x0: f32| {
            vec![
                Vec3::new(x0, 0.0, 0.0),
                Vec3::new(x0 + 1.0, 0.0, 0.0),
                Vec3::new(x0 + 1.0, 0.0, 1.0),
                Vec3::new(x0, 0.0, 1.0),
            ]
        };
        PolygonMapBuilder::new()
            .polygon(NodeType::Grass, square(0.0))
            .polygon(NodeType::Rocky, square(1.0))
            .build()
            .unwrap()
    }

    #[test]
    fn passes_are_recorded_in_order() {
        let map = two_squares();
        let config = TextureConfig::new(2.0, 8)
            .with_boundaries(true)
            .with_triangles(true);
        let list = build_display_list(&map, &ColorMapping::new(), &config);

        let kinds: Vec<_> = list.batches().iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                PrimitiveKind::Triangles,
                PrimitiveKind::Lines,
                PrimitiveKind::Lines
            ]
        );
        // One fan triangle per boundary edge, one line per edge, one per linked edge.
        assert_eq!(list.batches()[0].primitive_count(), 8);
        assert_eq!(list.batches()[1].primitive_count(), 8);
        assert_eq!(list.batches()[2].primitive_count(), 2);
    }

    #[test]
    fn disabled_overlays_are_not_recorded() {
        let map = two_squares();
        let list = build_display_list(&map, &ColorMapping::new(), &TextureConfig::new(2.0, 8));
        assert_eq!(list.batches().len(), 1);
    }

    #[test]
    fn fill_uses_fallback_for_unmapped_types() {
        let map = two_squares();
        let green = Color::rgb(0.0, 1.0, 0.0);
        let mapping = ColorMapping::from_entries(&[NodeTypeColor::new(NodeType::Grass, green)]);
        let list = build_display_list(&map, &mapping, &TextureConfig::new(2.0, 8));

        let fill = &list.batches()[0];
        assert_eq!(fill.vertices()[0].color, green);
        assert_eq!(fill.vertices().last().unwrap().color, Color::RED);
    }

    #[test]
    fn invalid_config_is_rejected_before_rendering() {
        let mut generator = MapTextureGenerator::new();
        let map = two_squares();
        for config in [TextureConfig::new(0.0, 8), TextureConfig::new(-1.0, 8), TextureConfig::new(2.0, 0)] {
            assert!(matches!(
                generator.generate(&map, &[], &config),
                Err(Error::InvalidConfig(_))
            ));
        }
        assert_eq!(generator.backend().surfaces_acquired(), 0);
        assert!(generator.material().is_none());
    }

    #[test]
    fn material_is_created_once_and_surfaces_released() {
        let mut generator = MapTextureGenerator::new();
        let map = two_squares();
        let config = TextureConfig::new(2.0, 8);
        generator.generate(&map, &[], &config).unwrap();
        generator.generate(&map, &[], &config).unwrap();

        assert_eq!(generator.material(), Some(&FlatColorMaterial::alpha_blended()));
        assert_eq!(generator.backend().surfaces_acquired(), 2);
        assert_eq!(generator.backend().live_surfaces(), 0);
    }

    #[test]
    fn compressed_png_decodes_to_same_pixels() {
        let texture = generate_texture(&two_squares(), 2.0, 16, &[], true, false).unwrap();
        let decoded = image::load_from_memory(texture.compressed_png())
            .unwrap()
            .to_rgba8();
        assert_eq!(&decoded, texture.image());
    }
}
