//! Tessellation of a generated cave into chunked triangle meshes.
//!
//! `chunk_mesh` turns the dual vertex grid into per-chunk vertex/index
//! buffers with four submeshes (wall + three zone floors); `render` converts
//! one submesh into a `bevy` mesh for material binding by the host.

pub mod chunk_mesh;
pub mod render;

pub use chunk_mesh::{tessellate, ChunkMesh, MeshSet, SUBMESH_COUNT, SUBMESH_WALL};
pub use render::to_render_mesh;
