//! Conversion of one chunk submesh into a `bevy` render mesh.
//!
//! Normals are accumulated from face normals and renormalized per vertex,
//! giving smooth shading across the shared corner-vertex buffer. Material
//! binding stays with the host: one submesh, one mesh, one material.

use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::render_asset::RenderAssetUsages;

use crate::chunk_mesh::ChunkMesh;

/// Compute a face normal from three positions.
fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let nx = u[1] * v[2] - u[2] * v[1];
    let ny = u[2] * v[0] - u[0] * v[2];
    let nz = u[0] * v[1] - u[1] * v[0];
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len < 1e-8 {
        [0.0, 1.0, 0.0]
    } else {
        [nx / len, ny / len, nz / len]
    }
}

/// Per-vertex normals for one submesh: sum of incident face normals,
/// renormalized. Vertices the submesh never references get straight up.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![[0.0_f32; 3]; positions.len()];
    for tri in indices.chunks_exact(3) {
        let n = face_normal(
            positions[tri[0] as usize],
            positions[tri[1] as usize],
            positions[tri[2] as usize],
        );
        for &idx in tri {
            let acc = &mut accumulated[idx as usize];
            acc[0] += n[0];
            acc[1] += n[1];
            acc[2] += n[2];
        }
    }
    accumulated
        .into_iter()
        .map(|[x, y, z]| {
            let len = (x * x + y * y + z * z).sqrt();
            if len < 1e-8 {
                [0.0, 1.0, 0.0]
            } else {
                [x / len, y / len, z / len]
            }
        })
        .collect()
}

/// Build a render mesh for one submesh of a chunk, or `None` when the
/// submesh holds no triangles (a fully open chunk has an empty wall slot).
pub fn to_render_mesh(chunk: &ChunkMesh, submesh: usize) -> Option<Mesh> {
    let indices = chunk.submeshes.get(submesh)?;
    if indices.is_empty() {
        return None;
    }

    let normals = smooth_normals(&chunk.positions, indices);
    Some(
        Mesh::new(
            bevy::render::mesh::PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, chunk.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, chunk.uvs.clone())
        .with_inserted_indices(Indices::U32(indices.clone())),
    )
}
