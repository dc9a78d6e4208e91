//! Seeded decoration scattering over a [`crate::graph::MapGraph`].
//!
//! A run places trees first and rocks second. Each pass walks the nodes of its
//! allowed types in graph order, gates them, draws one uniform value per candidate
//! and, on success, computes a transform and hands it to an [`spawner::ObjectSpawner`].
use rand::RngCore;

use crate::graph::NodeType;

pub mod events;
pub mod runner;
pub mod settings;
pub mod spawner;
pub mod transform;

pub use settings::{EnvironmentSettings, ObjectClass};

/// Maximum tilt around the X and Z axes, in degrees.
pub const MAX_TILT_DEGREES: f32 = 4.0;

/// Node types considered by the tree pass.
pub const TREE_NODE_TYPES: [NodeType; 2] = [NodeType::Grass, NodeType::TallGrass];

/// Node types considered by the rock pass.
pub const ROCK_NODE_TYPES: [NodeType; 3] = [NodeType::Grass, NodeType::TallGrass, NodeType::Rocky];

/// Opaque handle naming an object class, resolved by the spawner.
pub type ObjectClassId = String;

/// Placement pass of a scatter run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScatterPass {
    Trees,
    Rocks,
}

impl ScatterPass {
    pub fn node_types(self) -> &'static [NodeType] {
        match self {
            ScatterPass::Trees => &TREE_NODE_TYPES,
            ScatterPass::Rocks => &ROCK_NODE_TYPES,
        }
    }
}

/// Generate a random float in the range [0, 1).
///
/// Uses the top 24 bits of one `next_u32` so the result is exactly representable
/// and never rounds up to 1.0.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Wraps an RNG and counts the 32-bit draws taken from it.
pub(crate) struct CountingRng<R> {
    inner: R,
    draws: u64,
}

impl<R: RngCore> CountingRng<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }

    pub(crate) fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.inner.fill_bytes(dest);
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) struct FixedRng {
        pub value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn rand01_stays_below_one() {
        let mut rng = FixedRng { value: u32::MAX };
        assert!(rand01(&mut rng) < 1.0);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn counting_rng_counts_each_draw() {
        let mut rng = CountingRng::new(FixedRng { value: 7 });
        rand01(&mut rng);
        rand01(&mut rng);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn lerp_maps_endpoints() {
        assert_eq!(lerp(-4.0, 4.0, 0.0), -4.0);
        assert_eq!(lerp(-4.0, 4.0, 0.5), 0.0);
        assert_eq!(lerp(0.0, 2.0, 1.0), 2.0);
    }

    #[test]
    fn rock_pass_is_superset_of_tree_pass() {
        for t in ScatterPass::Trees.node_types() {
            assert!(ScatterPass::Rocks.node_types().contains(t));
        }
    }
}
