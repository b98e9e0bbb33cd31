//! Mesh management module.
//!
//! This module defines the [`GpuMesh`] struct, the GPU side of a [`MeshData`]. Each attribute
//! lives in its own tightly packed buffer so a material can bind exactly the attributes its
//! program declares.

use meshview_core::mesh::MeshData;

use super::gpu::{BufferId, BufferTarget, GpuError, GraphicsContext};

/// Vertex and index buffers of an uploaded mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuMesh {
    pub positions: BufferId,
    pub normals: BufferId,
    pub colors: BufferId,
    pub tex_coords: BufferId,
    pub indices: BufferId,
    index_count: usize,
}

impl GpuMesh {
    /// Uploads the mesh. The data should already be validated.
    pub fn upload(gl: &mut dyn GraphicsContext, data: &MeshData) -> Result<Self, GpuError> {
        let positions =
            gl.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&data.positions))?;
        let normals = gl.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&data.normals))?;
        let colors = gl.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&data.colors))?;
        let tex_coords =
            gl.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&data.tex_coords))?;
        let indices = gl.create_buffer(BufferTarget::Index, bytemuck::cast_slice(&data.indices))?;

        log::debug!(
            "Uploaded mesh with {} vertices and {} triangles",
            data.vertex_count(),
            data.triangle_count()
        );

        Ok(Self {
            positions,
            normals,
            colors,
            tex_coords,
            indices,
            index_count: data.indices.len(),
        })
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::recording::RecordingContext;

    #[test]
    fn test_upload_creates_one_buffer_per_attribute() {
        let mut gl = RecordingContext::new();
        let data = meshview_core::mesh::Shape::Cube.build();
        let mesh = GpuMesh::upload(&mut gl, &data).unwrap();

        assert_eq!(gl.buffers_created, 5);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.index_count(), 36);
    }
}
