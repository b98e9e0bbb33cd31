//! Procedurally generated meshes.
//!
//! Every shape is centered on the origin and fits in a unit cube, with counter
//! clockwise front faces pointing outward.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::MeshData;

/// A built-in shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Cube,
    Sphere,
    Torus,
    /// A tube without caps. Its inside is visible through the ends, so it
    /// needs double sided rendering.
    Cylinder,
}

impl Shape {
    pub fn build(self) -> MeshData {
        match self {
            Shape::Cube => cube(0.8),
            Shape::Sphere => sphere(0.5, 32, 16),
            Shape::Torus => torus(0.35, 0.15, 48, 24),
            Shape::Cylinder => open_cylinder(0.4, 0.8, 32),
        }
    }
}

/// Joins a `(rows + 1) x (columns + 1)` vertex grid into triangles. The grid is
/// row major. Triangles face along `column_step x row_step`.
fn grid_indices(rows: u32, columns: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((rows * columns * 6) as usize);
    for row in 0..rows {
        for column in 0..columns {
            let a = row * (columns + 1) + column;
            let b = a + columns + 1;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    indices
}

fn from_parts(
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    indices: Vec<u32>,
) -> MeshData {
    let count = positions.len();
    MeshData {
        positions,
        normals,
        colors: vec![Vec4::ONE; count],
        tex_coords,
        indices,
    }
}

/// An axis aligned cube with flat shaded faces.
pub fn cube(size: f32) -> MeshData {
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let half = size * 0.5;

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut tex_coords = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * half;
        for (du, dv, uv) in [
            (-1.0, -1.0, Vec2::new(0.0, 0.0)),
            (1.0, -1.0, Vec2::new(1.0, 0.0)),
            (1.0, 1.0, Vec2::new(1.0, 1.0)),
            (-1.0, 1.0, Vec2::new(0.0, 1.0)),
        ] {
            positions.push(center + (u * du + v * dv) * half);
            normals.push(normal);
            tex_coords.push(uv);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    from_parts(positions, normals, tex_coords, indices)
}

/// A UV sphere with `slices` segments around the Y axis and `stacks` rings
/// from pole to pole.
pub fn sphere(radius: f32, slices: u32, stacks: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();

    for stack in 0..=stacks {
        let theta = stack as f32 * PI / stacks as f32;
        for slice in 0..=slices {
            let phi = slice as f32 * TAU / slices as f32;
            let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            positions.push(normal * radius);
            normals.push(normal);
            tex_coords.push(Vec2::new(
                slice as f32 / slices as f32,
                1.0 - stack as f32 / stacks as f32,
            ));
        }
    }

    from_parts(positions, normals, tex_coords, grid_indices(stacks, slices))
}

/// A torus around the Y axis.
pub fn torus(major_radius: f32, minor_radius: f32, rings: u32, sides: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();

    for ring in 0..=rings {
        let phi = ring as f32 * TAU / rings as f32;
        let center = Vec3::new(phi.cos(), 0.0, phi.sin()) * major_radius;
        for side in 0..=sides {
            let theta = side as f32 * TAU / sides as f32;
            let normal = Vec3::new(theta.cos() * phi.cos(), theta.sin(), theta.cos() * phi.sin());
            positions.push(center + normal * minor_radius);
            normals.push(normal);
            tex_coords.push(Vec2::new(
                ring as f32 / rings as f32 * 4.0,
                side as f32 / sides as f32,
            ));
        }
    }

    from_parts(positions, normals, tex_coords, grid_indices(rings, sides))
}

/// A tube around the Y axis with no end caps.
pub fn open_cylinder(radius: f32, height: f32, slices: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut tex_coords = Vec::new();

    for slice in 0..=slices {
        let phi = slice as f32 * TAU / slices as f32;
        let normal = Vec3::new(phi.cos(), 0.0, phi.sin());
        for level in 0..=1 {
            let y = (level as f32 - 0.5) * height;
            positions.push(normal * radius + Vec3::Y * y);
            normals.push(normal);
            tex_coords.push(Vec2::new(slice as f32 / slices as f32 * 2.0, level as f32));
        }
    }

    // Rows are slices here and the two columns are the bottom and top ring.
    let mut indices = Vec::with_capacity((slices * 6) as usize);
    for slice in 0..slices {
        let bottom = slice * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        indices.extend_from_slice(&[bottom, top, next_bottom, next_bottom, top, next_top]);
    }

    from_parts(positions, normals, tex_coords, indices)
}
