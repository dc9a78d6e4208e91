//! Planar map graph shared by the scattering and rasterization passes.
//!
//! A [`MapGraph`] is a set of typed polygonal regions ([`MapNode`]) outlined by directed
//! boundary edges ([`MapEdge`]). An edge may reference the matching edge of the adjacent
//! region through `opposite`; those pairs form the dual (triangulation) graph and define
//! node adjacency.
//!
//! Positions are [`Vec3`] with the map lying in the x/z plane.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod builder;

pub use builder::PolygonMapBuilder;

/// Terrain class of a map region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeType {
    SaltWater,
    FreshWater,
    Beach,
    Grass,
    TallGrass,
    Rocky,
    Mountain,
    Snow,
}

impl NodeType {
    pub const ALL: [NodeType; 8] = [
        NodeType::SaltWater,
        NodeType::FreshWater,
        NodeType::Beach,
        NodeType::Grass,
        NodeType::TallGrass,
        NodeType::Rocky,
        NodeType::Mountain,
        NodeType::Snow,
    ];
}

/// Index of a node inside its [`MapGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Index of an edge inside its [`MapGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// A polygonal region of the map.
#[derive(Clone, Debug)]
pub struct MapNode {
    pub id: NodeId,
    pub node_type: NodeType,
    /// Center point of the region.
    pub center: Vec3,
    occupied: bool,
    edges: Vec<EdgeId>,
}

impl MapNode {
    /// Whether a decoration was placed on this node during the current scatter run.
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Boundary edges in outline order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// A directed boundary segment owned by one node.
#[derive(Clone, Debug)]
pub struct MapEdge {
    pub id: EdgeId,
    /// Owning node.
    pub node: NodeId,
    pub start: Vec3,
    pub end: Vec3,
    /// Matching edge of the neighboring node, absent on the map border.
    pub opposite: Option<EdgeId>,
}

/// Arena of nodes and edges. Iteration order is insertion order.
#[derive(Clone, Debug, Default)]
pub struct MapGraph {
    nodes: Vec<MapNode>,
    edges: Vec<MapEdge>,
}

impl MapGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Adds a node without boundary edges.
    pub fn add_node(&mut self, node_type: NodeType, center: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MapNode {
            id,
            node_type,
            center,
            occupied: false,
            edges: Vec::new(),
        });
        id
    }

    /// Appends a boundary edge to `node`'s outline.
    pub fn add_edge(&mut self, node: NodeId, start: Vec3, end: Vec3) -> Result<EdgeId> {
        let id = EdgeId(self.edges.len());
        let owner = self
            .nodes
            .get_mut(node.0)
            .ok_or_else(|| Error::InvalidGraph(format!("edge references unknown {node:?}")))?;
        owner.edges.push(id);
        self.edges.push(MapEdge {
            id,
            node,
            start,
            end,
            opposite: None,
        });
        Ok(id)
    }

    /// Pairs two edges of different nodes as opposites of each other.
    pub fn link_opposite(&mut self, a: EdgeId, b: EdgeId) -> Result<()> {
        let owner_a = self.edge_checked(a)?.node;
        let owner_b = self.edge_checked(b)?.node;
        if owner_a == owner_b {
            return Err(Error::InvalidGraph(format!(
                "opposite edges {a:?} and {b:?} share owner {owner_a:?}"
            )));
        }
        self.edges[a.0].opposite = Some(b);
        self.edges[b.0].opposite = Some(a);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[MapEdge] {
        &self.edges
    }

    /// # Panics
    /// Panics if `id` does not belong to this graph.
    pub fn node(&self, id: NodeId) -> &MapNode {
        &self.nodes[id.0]
    }

    /// # Panics
    /// Panics if `id` does not belong to this graph.
    pub fn edge(&self, id: EdgeId) -> &MapEdge {
        &self.edges[id.0]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&MapNode> {
        self.nodes.get(id.0)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&MapEdge> {
        self.edges.get(id.0)
    }

    fn edge_checked(&self, id: EdgeId) -> Result<&MapEdge> {
        self.edges
            .get(id.0)
            .ok_or_else(|| Error::InvalidGraph(format!("unknown {id:?}")))
    }

    /// Boundary edges of `id` in outline order.
    pub fn node_edges(&self, id: NodeId) -> impl Iterator<Item = &MapEdge> + '_ {
        self.node(id).edges.iter().map(move |e| &self.edges[e.0])
    }

    /// Nodes across the node's opposite edges, deduplicated in first-seen order.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for edge in self.node_edges(id) {
            let Some(opposite) = edge.opposite else {
                continue;
            };
            let neighbor = self.edges[opposite.0].node;
            if !out.contains(&neighbor) {
                out.push(neighbor);
            }
        }
        out
    }

    /// Iterates over the neighboring nodes of `id`.
    pub fn neighbor_nodes(&self, id: NodeId) -> impl Iterator<Item = &MapNode> + '_ {
        self.neighbors(id).into_iter().map(move |n| &self.nodes[n.0])
    }

    /// Nodes whose type is contained in `types`, in insertion order.
    pub fn nodes_of_type<'a>(
        &'a self,
        types: &'a [NodeType],
    ) -> impl Iterator<Item = &'a MapNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| types.contains(&n.node_type))
    }

    /// Mean of all node centers, or zero for an empty graph.
    pub fn center(&self) -> Vec3 {
        if self.nodes.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.nodes.iter().map(|n| n.center).sum();
        sum / self.nodes.len() as f32
    }

    /// Marks a node occupied. Returns `false` if it already was.
    pub(crate) fn mark_occupied(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        if node.occupied {
            return false;
        }
        node.occupied = true;
        true
    }

    /// Clears every occupancy flag.
    pub fn reset_occupancy(&mut self) {
        for node in &mut self.nodes {
            node.occupied = false;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.occupied).count()
    }

    /// Checks structural invariants: edge ownership and symmetric opposites across
    /// distinct nodes.
    pub fn validate(&self) -> Result<()> {
        let mut owners = vec![0usize; self.edges.len()];
        for node in &self.nodes {
            for edge_id in &node.edges {
                let edge = self.edges.get(edge_id.0).ok_or_else(|| {
                    Error::InvalidGraph(format!("{:?} lists unknown {edge_id:?}", node.id))
                })?;
                if edge.node != node.id {
                    return Err(Error::InvalidGraph(format!(
                        "{edge_id:?} is listed by {:?} but owned by {:?}",
                        node.id, edge.node
                    )));
                }
                owners[edge_id.0] += 1;
            }
        }

        for edge in &self.edges {
            if owners[edge.id.0] != 1 {
                return Err(Error::InvalidGraph(format!(
                    "{:?} belongs to {} nodes",
                    edge.id, owners[edge.id.0]
                )));
            }
            if let Some(opposite) = edge.opposite {
                let other = self.edge_checked(opposite)?;
                if other.node == edge.node {
                    return Err(Error::InvalidGraph(format!(
                        "{:?} and its opposite share {:?}",
                        edge.id, edge.node
                    )));
                }
                if other.opposite != Some(edge.id) {
                    return Err(Error::InvalidGraph(format!(
                        "opposite of {:?} does not point back",
                        edge.id
                    )));
                }
            }
        }

        Ok(())
    }
}
