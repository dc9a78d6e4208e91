//! Orthographic pixel projection from mesh space onto a square texture.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};

/// Maps the mesh square `[0, mesh_extent]²` onto a `size × size` pixel grid.
///
/// Mesh `x` grows to the right. Mesh `y` grows upward, so larger `y` lands on a
/// smaller image row (row 0 is the top of the image).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelProjection {
    mesh_extent: f32,
    size: u32,
}

impl PixelProjection {
    /// Fails unless `mesh_extent` is finite and positive and `size` is non-zero.
    pub fn try_new(mesh_extent: f32, size: u32) -> Result<Self> {
        if !mesh_extent.is_finite() || mesh_extent <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "mesh_extent must be finite and > 0, got {mesh_extent}"
            )));
        }
        if size == 0 {
            return Err(Error::InvalidConfig("projection size must be > 0".into()));
        }
        Ok(Self { mesh_extent, size })
    }

    pub fn mesh_extent(&self) -> f32 {
        self.mesh_extent
    }

    /// Viewport side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Pixels per mesh unit.
    pub fn scale(&self) -> f32 {
        self.size as f32 / self.mesh_extent
    }

    /// Converts a projection-space point to continuous image coordinates.
    #[inline]
    pub fn to_pixel(&self, p: Vec3) -> Vec2 {
        let s = self.scale();
        Vec2::new(p.x * s, self.size as f32 - p.y * s)
    }
}

/// Flattens a map position onto the drawing plane (map `x`, map `z`).
#[inline]
pub fn plane_point(p: Vec3) -> Vec3 {
    Vec3::new(p.x, p.z, 0.0)
}
