//! Flat colors and the node type to color mapping used by the rasterizer.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::NodeType;

/// Straight (non-premultiplied) RGBA color with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from float channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque color from byte channels.
    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Quantizes to 8-bit RGBA, clamping each channel.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Straight alpha blend of `self` over `dst` (`src * a + dst * (1 - a)`).
    pub fn blend_over(self, dst: Color) -> Color {
        let a = self.a.clamp(0.0, 1.0);
        let inv = 1.0 - a;
        Color::new(
            self.r * a + dst.r * inv,
            self.g * a + dst.g * inv,
            self.b * a + dst.b * inv,
            a + dst.a * inv,
        )
    }
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// One entry of an ordered color list.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeTypeColor {
    pub node_type: NodeType,
    pub color: Color,
}

impl NodeTypeColor {
    pub fn new(node_type: NodeType, color: Color) -> Self {
        Self { node_type, color }
    }
}

/// Total mapping from [`NodeType`] to [`Color`].
///
/// Built from an ordered list where the first entry for a type wins. Types without an
/// entry resolve to the fallback color ([`Color::RED`] unless overridden).
#[derive(Clone, Debug)]
pub struct ColorMapping {
    colors: HashMap<NodeType, Color>,
    fallback: Color,
}

impl ColorMapping {
    pub fn new() -> Self {
        Self {
            colors: HashMap::new(),
            fallback: Color::RED,
        }
    }

    pub fn from_entries(entries: &[NodeTypeColor]) -> Self {
        let mut mapping = Self::new();
        for entry in entries {
            if mapping.colors.contains_key(&entry.node_type) {
                warn!(
                    "Duplicate color entry for {:?}; keeping the first.",
                    entry.node_type
                );
                continue;
            }
            mapping.colors.insert(entry.node_type, entry.color);
        }
        mapping
    }

    /// Overrides the color used for unmapped types.
    pub fn with_fallback(mut self, fallback: Color) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }

    pub fn contains(&self, node_type: NodeType) -> bool {
        self.colors.contains_key(&node_type)
    }

    #[inline]
    pub fn get(&self, node_type: NodeType) -> Color {
        self.colors
            .get(&node_type)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[NodeTypeColor]> for ColorMapping {
    fn from(entries: &[NodeTypeColor]) -> Self {
        Self::from_entries(entries)
    }
}
