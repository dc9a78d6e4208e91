//! CPU rasterizer implementing [`RenderBackend`].
//!
//! Triangles are filled by testing pixel centers against the three edge functions, with a
//! top-left rule so samples on an edge shared by two triangles are plotted once.
//! Lines are clipped to the surface, then stepped with a DDA, one sample per pixel along
//! the major axis.
//! Primitives are flat shaded with the color of their first vertex.
use glam::{DVec2, Vec2};
use image::{Rgba, RgbaImage};
use tracing::trace;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::raster::backend::{BlendMode, CullMode, FlatColorMaterial, RenderBackend};
use crate::raster::display_list::{DisplayList, PrimitiveKind, Vertex};
use crate::raster::projection::PixelProjection;

/// Square color buffer, row-major, row 0 at the top.
#[derive(Clone, Debug)]
pub struct SoftwareSurface {
    size: u32,
    pixels: Vec<Color>,
}

impl SoftwareSurface {
    fn new(size: u32) -> Self {
        let len = (size as usize) * (size as usize);
        Self {
            size,
            pixels: vec![Color::new(0.0, 0.0, 0.0, 0.0); len],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.size as usize) + x as usize)
            .copied()
    }

    #[inline]
    fn plot(&mut self, x: u32, y: u32, color: Color, blend: BlendMode) {
        let idx = (y as usize) * (self.size as usize) + x as usize;
        let dst = &mut self.pixels[idx];
        *dst = match blend {
            BlendMode::Replace => color,
            BlendMode::Alpha => color.blend_over(*dst),
        };
    }
}

/// Software [`RenderBackend`]. Tracks outstanding surfaces.
#[derive(Debug, Default)]
pub struct SoftwareBackend {
    live: usize,
    acquired: usize,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self {
            live: 0,
            acquired: 0,
        }
    }

    /// Surfaces acquired and not yet released.
    pub fn live_surfaces(&self) -> usize {
        self.live
    }

    /// Surfaces acquired over the backend's lifetime.
    pub fn surfaces_acquired(&self) -> usize {
        self.acquired
    }
}

impl RenderBackend for SoftwareBackend {
    type Surface = SoftwareSurface;

    fn acquire_surface(&mut self, size: u32) -> Result<SoftwareSurface> {
        if size == 0 {
            return Err(Error::Render("surface size must be > 0".into()));
        }
        self.live += 1;
        self.acquired += 1;
        Ok(SoftwareSurface::new(size))
    }

    fn clear(&mut self, surface: &mut SoftwareSurface, color: Color) {
        surface.pixels.fill(color);
    }

    fn draw(
        &mut self,
        surface: &mut SoftwareSurface,
        material: &FlatColorMaterial,
        projection: &PixelProjection,
        list: &DisplayList,
    ) -> Result<()> {
        if projection.size() != surface.size {
            return Err(Error::Render(format!(
                "projection covers {} px but surface is {} px",
                projection.size(),
                surface.size
            )));
        }

        for batch in list.batches() {
            trace!(
                "Drawing {} {:?} primitives.",
                batch.primitive_count(),
                batch.kind()
            );
            match batch.kind() {
                PrimitiveKind::Triangles => {
                    for tri in batch.primitives() {
                        fill_triangle(surface, material, projection, tri);
                    }
                }
                PrimitiveKind::Lines => {
                    for line in batch.primitives() {
                        draw_line(surface, material, projection, line);
                    }
                }
            }
        }
        Ok(())
    }

    fn read_pixels(&mut self, surface: &SoftwareSurface) -> Result<RgbaImage> {
        let size = surface.size;
        Ok(RgbaImage::from_fn(size, size, |x, y| {
            let color = surface.get(x, y).unwrap_or(Color::new(0.0, 0.0, 0.0, 0.0));
            Rgba(color.to_rgba8())
        }))
    }

    fn release_surface(&mut self, surface: SoftwareSurface) {
        drop(surface);
        self.live = self.live.saturating_sub(1);
    }
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Whether `from -> to` is a top or left edge of a triangle with positive area.
#[inline]
fn is_top_left(from: Vec2, to: Vec2) -> bool {
    let d = to - from;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

#[inline]
fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

fn fill_triangle(
    surface: &mut SoftwareSurface,
    material: &FlatColorMaterial,
    projection: &PixelProjection,
    tri: &[Vertex],
) {
    let a = projection.to_pixel(tri[0].position);
    let mut b = projection.to_pixel(tri[1].position);
    let mut c = projection.to_pixel(tri[2].position);
    let color = tri[0].color;

    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    // Image rows grow downward, so counter-clockwise in projection space has negative area here.
    if material.cull == CullMode::Back && area > 0.0 {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut b, &mut c);
    }

    let size = surface.size as f32;
    let min = a.min(b).min(c).max(Vec2::ZERO);
    let max = a.max(b).max(c).min(Vec2::splat(size));
    if min.x >= max.x || min.y >= max.y {
        return;
    }

    let x0 = min.x.floor() as u32;
    let y0 = min.y.floor() as u32;
    let x1 = (max.x.ceil() as u32).min(surface.size);
    let y1 = (max.y.ceil() as u32).min(surface.size);

    let top_left = [is_top_left(b, c), is_top_left(c, a), is_top_left(a, b)];

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let inside = covers(edge(b, c, p), top_left[0])
                && covers(edge(c, a, p), top_left[1])
                && covers(edge(a, b, p), top_left[2]);
            if inside {
                surface.plot(x, y, color, material.blend);
            }
        }
    }
}

/// Clips `a -> b` to the square `[0, extent]²` (Liang-Barsky).
///
/// Runs in `f64` so endpoints far outside the square still land on its border.
fn clip_segment(a: Vec2, b: Vec2, extent: f32) -> Option<(Vec2, Vec2)> {
    let (a, b, extent) = (a.as_dvec2(), b.as_dvec2(), extent as f64);
    let d = b - a;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-d.x, a.x),
        (d.x, extent - a.x),
        (-d.y, a.y),
        (d.y, extent - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let bounds = DVec2::splat(extent);
    let start = (a + d * t0).clamp(DVec2::ZERO, bounds);
    let end = (a + d * t1).clamp(DVec2::ZERO, bounds);
    Some((start.as_vec2(), end.as_vec2()))
}

fn draw_line(
    surface: &mut SoftwareSurface,
    material: &FlatColorMaterial,
    projection: &PixelProjection,
    line: &[Vertex],
) {
    let a = projection.to_pixel(line[0].position);
    let b = projection.to_pixel(line[1].position);
    let color = line[0].color;
    if !(a.is_finite() && b.is_finite()) {
        return;
    }
    let Some((a, b)) = clip_segment(a, b, surface.size as f32) else {
        return;
    };

    let delta = b - a;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
    let mut last: Option<(u32, u32)> = None;

    for i in 0..=steps {
        let p = a + delta * (i as f32 / steps as f32);
        // Points on the far border belong to the last pixel.
        let x = (p.x.max(0.0) as u32).min(surface.size - 1);
        let y = (p.y.max(0.0) as u32).min(surface.size - 1);
        if last == Some((x, y)) {
            continue;
        }
        last = Some((x, y));
        surface.plot(x, y, color, material.blend);
    }
}
