//! Builds a [`MapGraph`] from polygon outlines, pairing shared segments as opposite edges.
use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use super::{EdgeId, MapGraph, NodeType};
use crate::error::{Error, Result};

type VertexKey = (i64, i64, i64);

struct Polygon {
    node_type: NodeType,
    outline: Vec<Vec3>,
    center: Option<Vec3>,
}

/// Collects typed polygons and turns them into a linked [`MapGraph`].
///
/// Outlines may be given in either winding; each is rewound counter-clockwise in the
/// x/z plane before its segments become boundary edges. Two segments of different
/// polygons that share their endpoints are then linked as opposites.
pub struct PolygonMapBuilder {
    polygons: Vec<Polygon>,
    tolerance: f32,
}

impl PolygonMapBuilder {
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
            tolerance: 1e-4,
        }
    }

    /// Sets the distance under which two vertices are treated as the same point.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Adds a polygon whose center is the mean of its outline vertices.
    pub fn polygon(mut self, node_type: NodeType, outline: impl Into<Vec<Vec3>>) -> Self {
        self.polygons.push(Polygon {
            node_type,
            outline: outline.into(),
            center: None,
        });
        self
    }

    /// Adds a polygon with an explicit center point.
    pub fn polygon_with_center(
        mut self,
        node_type: NodeType,
        outline: impl Into<Vec<Vec3>>,
        center: Vec3,
    ) -> Self {
        self.polygons.push(Polygon {
            node_type,
            outline: outline.into(),
            center: Some(center),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn build(self) -> Result<MapGraph> {
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidConfig("tolerance must be > 0".into()));
        }
        let edge_count = self.polygons.iter().map(|p| p.outline.len()).sum();
        let mut graph = MapGraph::with_capacity(self.polygons.len(), edge_count);
        let mut segments: HashMap<(VertexKey, VertexKey), EdgeId> =
            HashMap::with_capacity(edge_count);

        for (index, polygon) in self.polygons.iter().enumerate() {
            if polygon.outline.len() < 3 {
                return Err(Error::InvalidGraph(format!(
                    "polygon {index} has {} vertices, need at least 3",
                    polygon.outline.len()
                )));
            }
            let center = polygon.center.unwrap_or_else(|| {
                polygon.outline.iter().copied().sum::<Vec3>() / polygon.outline.len() as f32
            });
            let node = graph.add_node(polygon.node_type, center);

            let mut outline = polygon.outline.clone();
            if signed_area_xz(&outline) < 0.0 {
                outline.reverse();
            }

            let n = outline.len();
            for i in 0..n {
                let start = outline[i];
                let end = outline[(i + 1) % n];
                let edge = graph.add_edge(node, start, end)?;
                let key = (self.key(start), self.key(end));
                if let Some(previous) = segments.insert(key, edge) {
                    return Err(Error::InvalidGraph(format!(
                        "polygon {index} repeats segment {start} -> {end} of {previous:?}"
                    )));
                }
            }
        }

        let mut linked = 0usize;
        for i in 0..graph.edges().len() {
            let edge = &graph.edges()[i];
            if edge.opposite.is_some() {
                continue;
            }
            let reversed = (self.key(edge.end), self.key(edge.start));
            let Some(&other) = segments.get(&reversed) else {
                continue;
            };
            let other_edge = graph.edge(other);
            if other_edge.node == edge.node || other_edge.opposite.is_some() {
                continue;
            }
            let id = edge.id;
            graph.link_opposite(id, other)?;
            linked += 1;
        }

        debug!(
            "Built map graph: {} nodes, {} edges, {} opposite pairs.",
            graph.len(),
            graph.edges().len(),
            linked
        );

        Ok(graph)
    }

    fn key(&self, v: Vec3) -> VertexKey {
        let inv = 1.0 / self.tolerance;
        (
            (v.x * inv).round() as i64,
            (v.y * inv).round() as i64,
            (v.z * inv).round() as i64,
        )
    }
}

/// Shoelace area over the x/z plane; positive for counter-clockwise outlines.
fn signed_area_xz(outline: &[Vec3]) -> f32 {
    let n = outline.len();
    let twice: f32 = (0..n)
        .map(|i| {
            let (a, b) = (outline[i], outline[(i + 1) % n]);
            a.x * b.z - b.x * a.z
        })
        .sum();
    twice * 0.5
}

impl Default for PolygonMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
