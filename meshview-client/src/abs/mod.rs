//! This module contains the GPU layer of the viewer: the graphics context,
//! application setup, shader programs, meshes and textures.

pub mod app;
pub mod gpu;
pub mod mesh;
#[cfg(test)]
pub mod recording;
pub mod shader;
pub mod texture;

pub use app::*;
pub use gpu::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
