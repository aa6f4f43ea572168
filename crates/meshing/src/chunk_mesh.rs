//! Chunked quad tessellation over the dual vertex grid.
//!
//! The grid is partitioned into `chunk_size`-square chunks; each chunk owns
//! a shared corner-vertex buffer and four index submeshes. Every cell emits
//! one quad split along the diagonal with the smaller corner height
//! difference, which reduces visible faceting on slopes. A quad touching any
//! wall vertex lands in the wall submesh so wall material covers the full
//! boundary of contact.

use worldgen::config::CaveConfig;
use worldgen::pipeline::CaveWorld;

/// Wall geometry submesh slot; floor slots follow per `DepthZone::submesh`.
pub const SUBMESH_WALL: usize = 0;
/// Wall + shallow + mid + deep.
pub const SUBMESH_COUNT: usize = 4;

/// One chunk's geometry: a shared corner-vertex buffer plus one triangle
/// index list per submesh. UVs are global grid coordinates.
#[derive(Debug, Clone)]
pub struct ChunkMesh {
    pub chunk_x: usize,
    pub chunk_y: usize,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub submeshes: [Vec<u32>; SUBMESH_COUNT],
}

/// All chunk meshes for one generated world.
#[derive(Debug, Clone)]
pub struct MeshSet {
    pub chunks: Vec<ChunkMesh>,
    pub chunks_x: usize,
    pub chunks_y: usize,
}

/// Tessellate a generated world into chunk meshes.
pub fn tessellate(world: &CaveWorld, config: &CaveConfig) -> MeshSet {
    let grid = &world.grid;
    let chunks_x = grid.width.div_ceil(config.chunk_size);
    let chunks_y = grid.height.div_ceil(config.chunk_size);

    let mut chunks = Vec::with_capacity(chunks_x * chunks_y);
    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            chunks.push(build_chunk(world, config, cx, cy));
        }
    }

    MeshSet {
        chunks,
        chunks_x,
        chunks_y,
    }
}

fn build_chunk(world: &CaveWorld, config: &CaveConfig, cx: usize, cy: usize) -> ChunkMesh {
    let grid = &world.grid;
    let vertices = &world.vertices;
    let base_x = cx * config.chunk_size;
    let base_y = cy * config.chunk_size;
    // Edge chunks shrink to the remaining cells.
    let cells_w = config.chunk_size.min(grid.width - base_x);
    let cells_h = config.chunk_size.min(grid.height - base_y);
    let verts_w = cells_w + 1;
    let verts_h = cells_h + 1;

    let mut positions = Vec::with_capacity(verts_w * verts_h);
    let mut uvs = Vec::with_capacity(verts_w * verts_h);
    for ly in 0..verts_h {
        for lx in 0..verts_w {
            let gx = base_x + lx;
            let gy = base_y + ly;
            let vert = vertices.get(gx, gy);
            positions.push([
                gx as f32 * grid.cell_size,
                vert.height,
                gy as f32 * grid.cell_size,
            ]);
            uvs.push([gx as f32, gy as f32]);
        }
    }

    let mut submeshes: [Vec<u32>; SUBMESH_COUNT] = Default::default();
    for ly in 0..cells_h {
        for lx in 0..cells_w {
            let gx = base_x + lx;
            let gy = base_y + ly;

            let v00 = (ly * verts_w + lx) as u32;
            let v10 = v00 + 1;
            let v01 = v00 + verts_w as u32;
            let v11 = v01 + 1;

            let corner = |vx: usize, vy: usize| vertices.get(vx, vy);
            let c00 = corner(gx, gy);
            let c10 = corner(gx + 1, gy);
            let c01 = corner(gx, gy + 1);
            let c11 = corner(gx + 1, gy + 1);

            let submesh = if c00.is_wall || c10.is_wall || c01.is_wall || c11.is_wall {
                SUBMESH_WALL
            } else {
                match grid.get(gx as i32, gy as i32) {
                    Some(cell) => cell.zone.submesh(),
                    None => SUBMESH_WALL,
                }
            };
            let indices = &mut submeshes[submesh];

            // Split along the diagonal with the smaller height difference;
            // ties keep the 00-11 diagonal.
            let d_main = (c00.height - c11.height).abs();
            let d_cross = (c10.height - c01.height).abs();
            if d_main <= d_cross {
                indices.extend_from_slice(&[v00, v11, v10, v00, v01, v11]);
            } else {
                indices.extend_from_slice(&[v00, v01, v10, v10, v01, v11]);
            }
        }
    }

    ChunkMesh {
        chunk_x: cx,
        chunk_y: cy,
        positions,
        uvs,
        submeshes,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
