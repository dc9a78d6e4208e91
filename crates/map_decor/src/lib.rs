#![forbid(unsafe_code)]
//! map_decor: Seeded decoration scattering and flat-color texture rendering over
//! polygonal map graphs.
//!
//! Modules:
//! - graph: typed map regions, boundary edges and their opposite-edge adjacency
//! - scatter: deterministic two-pass tree and rock placement with adjacency gates
//! - raster: fill, boundary and triangulation passes rendered to a PNG-compressed texture
//! - color: flat colors and node type color mapping
//!
//! For examples, see the README and the `map_decor_examples` crate.
pub mod color;
pub mod error;
pub mod graph;
pub mod raster;
pub mod scatter;

/// Convenient re-exports for common types. Import with `use map_decor::prelude::*;`.
pub mod prelude {
    pub use crate::color::{Color, ColorMapping, NodeTypeColor};
    pub use crate::error::{Error, Result};
    pub use crate::graph::{
        EdgeId, MapEdge, MapGraph, MapNode, NodeId, NodeType, PolygonMapBuilder,
    };
    pub use crate::raster::backend::{FlatColorMaterial, RenderBackend, ScopedSurface};
    pub use crate::raster::generator::{
        build_display_list, generate_texture, MapTexture, MapTextureGenerator, TextureConfig,
    };
    pub use crate::raster::software::SoftwareBackend;
    pub use crate::scatter::events::{EventSink, FnSink, GateReason, ScatterEvent, VecSink};
    pub use crate::scatter::runner::{
        init, init_with_events, Environment, PassSummary, Placement, ScatterResult, ScatterRun,
    };
    pub use crate::scatter::spawner::{
        FnSpawner, ObjectSpawner, SpawnRequest, SpawnedObject, VecSpawner,
    };
    pub use crate::scatter::transform::PlacementTransform;
    pub use crate::scatter::{
        EnvironmentSettings, ObjectClass, ObjectClassId, ScatterPass, MAX_TILT_DEGREES,
    };
}
