//! Flat-color map textures.
//!
//! The generator records three passes into a [`display_list::DisplayList`] (region fill,
//! boundary lines, triangulation lines), submits them to a [`backend::RenderBackend`]
//! on a scoped off-screen surface, reads the pixels back and PNG-compresses them.
//! [`software::SoftwareBackend`] is the built-in CPU backend.
pub mod backend;
pub mod display_list;
pub mod generator;
pub mod projection;
pub mod software;

pub use generator::{generate_texture, MapTexture, MapTextureGenerator, TextureConfig};
