//! Placement transforms: map-centered position, tilted yaw, jittered scale.
use glam::{EulerRot, Quat, Vec3};
use rand::RngCore;

use crate::scatter::{lerp, rand01, ObjectClass, MAX_TILT_DEGREES};

/// World transform of a placed object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementTransform {
    /// Node center relative to the map center.
    pub position: Vec3,
    /// Euler angles in degrees (x tilt, y yaw, z tilt).
    pub euler_degrees: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl PlacementTransform {
    /// Draws a transform for an object of `class` at `node_center`.
    ///
    /// Consumes exactly four values from `rng`, in order: x tilt, yaw, z tilt, scale.
    pub fn draw(
        node_center: Vec3,
        map_center: Vec3,
        class: &ObjectClass,
        rng: &mut dyn RngCore,
    ) -> Self {
        let x = lerp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES, rand01(rng));
        let y = rand01(rng) * 360.0;
        let z = lerp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES, rand01(rng));
        let euler_degrees = Vec3::new(x, y, z);

        let scale = class.scale + lerp(0.0, class.scale_deviation, rand01(rng));

        Self {
            position: node_center - map_center,
            euler_degrees,
            rotation: euler_rotation(euler_degrees),
            scale,
        }
    }
}

/// Rotation applying Z, then X, then Y around the fixed axes.
pub fn euler_rotation(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}
