//! Recorded draw commands: batches of colored vertices tagged by primitive kind.
//!
//! Batches are kept in submission order; later batches draw over earlier ones.
use glam::Vec3;

use crate::color::Color;

/// How the vertices of a [`Batch`] are grouped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Every three vertices form a filled triangle.
    Triangles,
    /// Every two vertices form a line segment.
    Lines,
}

impl PrimitiveKind {
    pub fn vertices_per_primitive(self) -> usize {
        match self {
            PrimitiveKind::Triangles => 3,
            PrimitiveKind::Lines => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position in projection space; `z` is ignored by flat renderers.
    pub position: Vec3,
    pub color: Color,
}

/// A run of vertices of one [`PrimitiveKind`].
///
/// Vertices take the batch's current color at the time they are added.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    kind: PrimitiveKind,
    color: Color,
    vertices: Vec<Vertex>,
}

impl Batch {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            color: Color::WHITE,
            vertices: Vec::new(),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Sets the color for subsequently added vertices.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn vertex(&mut self, position: Vec3) {
        self.vertices.push(Vertex {
            position,
            color: self.color,
        });
    }

    pub fn vertex3(&mut self, x: f32, y: f32, z: f32) {
        self.vertex(Vec3::new(x, y, z));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Complete primitives; a trailing partial primitive is ignored.
    pub fn primitives(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.vertices
            .chunks_exact(self.kind.vertices_per_primitive())
    }

    pub fn primitive_count(&self) -> usize {
        self.vertices.len() / self.kind.vertices_per_primitive()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Ordered list of [`Batch`]es ready for submission to a backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    batches: Vec<Batch>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
        }
    }

    /// Appends a batch. Empty batches are dropped.
    pub fn push(&mut self, batch: Batch) {
        if !batch.is_empty() {
            self.batches.push(batch);
        }
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn primitive_count(&self) -> usize {
        self.batches.iter().map(Batch::primitive_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
