//! A small Wavefront OBJ reader.
//!
//! Only geometry is read: `v`, `vt`, `vn` and `f`. Polygons are fan
//! triangulated and every distinct `position/texcoord/normal` triple becomes
//! one vertex. Materials, groups and smoothing statements are ignored.

use std::{collections::HashMap, path::Path};

use glam::{Vec2, Vec3, Vec4};

use super::{MeshData, MeshError};

/// Reads an OBJ file from disk.
pub fn load_obj(path: &Path) -> Result<MeshData, MeshError> {
    let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&source)?;
    log::debug!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

type VertexKey = (usize, Option<usize>, Option<usize>);

/// Parses OBJ source text.
pub fn parse_obj(source: &str) -> Result<MeshData, MeshError> {
    let mut positions = Vec::new();
    let mut tex_coords = Vec::new();
    let mut normals = Vec::new();

    let mut mesh = MeshData::default();
    let mut vertices: HashMap<VertexKey, u32> = HashMap::new();
    let mut all_normals = true;

    for (number, line) in source.lines().enumerate() {
        let line_number = number + 1;
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(Vec3::from(parse_floats::<3>(&mut tokens, line_number)?)),
            "vt" => tex_coords.push(Vec2::from(parse_floats::<2>(&mut tokens, line_number)?)),
            "vn" => normals.push(Vec3::from(parse_floats::<3>(&mut tokens, line_number)?)),
            "f" => {
                let mut corners = Vec::with_capacity(4);
                for token in tokens {
                    let key = parse_corner(
                        token,
                        [positions.len(), tex_coords.len(), normals.len()],
                        line_number,
                    )?;
                    let index = match vertices.get(&key) {
                        Some(&index) => index,
                        None => {
                            let index = mesh.positions.len() as u32;
                            let (position, tex_coord, normal) = key;
                            mesh.positions.push(positions[position]);
                            mesh.tex_coords.push(tex_coord.map_or(Vec2::ZERO, |t| tex_coords[t]));
                            mesh.normals.push(normal.map_or(Vec3::ZERO, |n| normals[n]));
                            mesh.colors.push(Vec4::ONE);
                            all_normals &= normal.is_some();
                            vertices.insert(key, index);
                            index
                        }
                    };
                    corners.push(index);
                }

                if corners.len() < 3 {
                    return Err(MeshError::Parse {
                        line: line_number,
                        message: format!("face has {} corners", corners.len()),
                    });
                }
                for i in 1..corners.len() - 1 {
                    mesh.indices.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if !all_normals {
        mesh.compute_normals();
    }
    mesh.validate()?;
    Ok(mesh)
}

fn parse_floats<const N: usize>(
    tokens: &mut std::str::SplitWhitespace<'_>,
    line: usize,
) -> Result<[f32; N], MeshError> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        let token = tokens.next().ok_or_else(|| MeshError::Parse {
            line,
            message: format!("expected {N} numbers"),
        })?;
        *value = token.parse().map_err(|_| MeshError::Parse {
            line,
            message: format!("'{token}' is not a number"),
        })?;
    }
    Ok(values)
}

/// Parses one `v`, `v/t`, `v//n` or `v/t/n` face corner into zero based
/// indices. `counts` holds how many positions, texcoords and normals have been
/// read so far, for range checks and negative (relative) indices.
fn parse_corner(token: &str, counts: [usize; 3], line: usize) -> Result<VertexKey, MeshError> {
    let mut parts = token.split('/');
    let mut resolve = |slot: usize, required: bool| -> Result<Option<usize>, MeshError> {
        let part = parts.next().unwrap_or_default();
        if part.is_empty() {
            return if required {
                Err(MeshError::Parse {
                    line,
                    message: format!("face corner '{token}' has no position"),
                })
            } else {
                Ok(None)
            };
        }
        let raw: i64 = part.parse().map_err(|_| MeshError::Parse {
            line,
            message: format!("'{part}' is not an index"),
        })?;
        let count = counts[slot] as i64;
        let index = if raw < 0 { count + raw } else { raw - 1 };
        if raw == 0 || index < 0 || index >= count {
            return Err(MeshError::Parse {
                line,
                message: format!("index {raw} out of range"),
            });
        }
        Ok(Some(index as usize))
    };

    let position = resolve(0, true)?.unwrap_or_default();
    let tex_coord = resolve(1, false)?;
    let normal = resolve(2, false)?;
    Ok((position, tex_coord, normal))
}
