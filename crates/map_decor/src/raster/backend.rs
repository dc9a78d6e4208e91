//! Render backend seam and the scoped off-screen surface.
//!
//! A [`RenderBackend`] owns surfaces and executes [`DisplayList`]s against them.
//! [`ScopedSurface`] ties a surface to a scope so it is released on every exit path.
use image::RgbaImage;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::raster::display_list::DisplayList;
use crate::raster::projection::PixelProjection;

/// How a primitive's color combines with the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Overwrite the destination.
    Replace,
    /// `src * a + dst * (1 - a)`.
    Alpha,
}

/// Which triangles are discarded by winding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    Off,
    /// Discard triangles wound clockwise in projection space.
    Back,
}

/// Render state for flat-colored, unlit primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatColorMaterial {
    pub blend: BlendMode,
    pub cull: CullMode,
    pub depth_write: bool,
}

impl FlatColorMaterial {
    /// Alpha blended, no culling, no depth writes.
    pub fn alpha_blended() -> Self {
        Self {
            blend: BlendMode::Alpha,
            cull: CullMode::Off,
            depth_write: false,
        }
    }
}

impl Default for FlatColorMaterial {
    fn default() -> Self {
        Self::alpha_blended()
    }
}

/// Allocates square off-screen surfaces and draws display lists into them.
pub trait RenderBackend {
    type Surface;

    fn acquire_surface(&mut self, size: u32) -> Result<Self::Surface>;

    fn clear(&mut self, surface: &mut Self::Surface, color: Color);

    fn draw(
        &mut self,
        surface: &mut Self::Surface,
        material: &FlatColorMaterial,
        projection: &PixelProjection,
        list: &DisplayList,
    ) -> Result<()>;

    /// Copies the surface into CPU memory, row 0 at the top.
    fn read_pixels(&mut self, surface: &Self::Surface) -> Result<RgbaImage>;

    fn release_surface(&mut self, surface: Self::Surface);
}

/// A surface borrowed from a backend for the length of a scope.
pub struct ScopedSurface<'a, B: RenderBackend> {
    backend: &'a mut B,
    surface: Option<B::Surface>,
}

impl<'a, B: RenderBackend> ScopedSurface<'a, B> {
    pub fn acquire(backend: &'a mut B, size: u32) -> Result<Self> {
        let surface = backend.acquire_surface(size)?;
        Ok(Self {
            backend,
            surface: Some(surface),
        })
    }

    pub fn clear(&mut self, color: Color) {
        if let Some(surface) = self.surface.as_mut() {
            self.backend.clear(surface, color);
        }
    }

    pub fn draw(
        &mut self,
        material: &FlatColorMaterial,
        projection: &PixelProjection,
        list: &DisplayList,
    ) -> Result<()> {
        match self.surface.as_mut() {
            Some(surface) => self.backend.draw(surface, material, projection, list),
            None => Ok(()),
        }
    }

    pub fn read_pixels(&mut self) -> Result<RgbaImage> {
        match self.surface.as_ref() {
            Some(surface) => self.backend.read_pixels(surface),
            None => Err(Error::Render("surface already released".into())),
        }
    }

    /// Releases the surface now instead of at end of scope.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.backend.release_surface(surface);
        }
    }
}

impl<B: RenderBackend> Drop for ScopedSurface<'_, B> {
    fn drop(&mut self) {
        self.release_inner();
    }
}
