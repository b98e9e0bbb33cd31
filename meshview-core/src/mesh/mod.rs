//! CPU side mesh data.
//!
//! A [`MeshData`] is an indexed triangle list with one entry per vertex in each
//! attribute array. It is produced by the procedural [`shapes`] or the Wavefront
//! [`obj`] reader and uploaded to the GPU by the client.

pub mod obj;
pub mod shapes;

use glam::{Vec2, Vec3, Vec4};

pub use shapes::Shape;

/// Errors produced while building or loading mesh data.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("{attribute} has {found} entries but the mesh has {expected} vertices")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("could not read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Builds a mesh from positions and indices. Normals are computed from the
    /// faces, colors default to white and texture coordinates to zero.
    pub fn from_positions(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        let count = positions.len();
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            colors: vec![Vec4::ONE; count],
            tex_coords: vec![Vec2::ZERO; count],
            indices,
        };
        mesh.compute_normals();
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Checks that every attribute array matches the vertex count and that the
    /// indices describe whole triangles over existing vertices.
    pub fn validate(&self) -> Result<(), MeshError> {
        let expected = self.positions.len();
        let lengths = [
            ("normals", self.normals.len()),
            ("colors", self.colors.len()),
            ("tex_coords", self.tex_coords.len()),
        ];
        for (attribute, found) in lengths {
            if found != expected {
                return Err(MeshError::AttributeLength {
                    attribute,
                    expected,
                    found,
                });
            }
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }

        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= expected) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertices: expected,
            });
        }

        Ok(())
    }

    /// Replaces the normals with area weighted vertex normals of the faces.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let (Some(&pa), Some(&pb), Some(&pc)) =
                (self.positions.get(a), self.positions.get(b), self.positions.get(c))
            else {
                continue;
            };
            // Not normalized, so larger faces weigh more.
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }
}
