//! Chunk buffers and surface extraction: padded chunk snapshots, per-face
//! visibility culling, per-kind quad meshes, and version-keyed mesh caching.

pub mod buffer;
pub mod cache;
pub mod chunk_mesh;
pub mod face_direction;
pub mod mesher;
pub mod visibility;

pub use buffer::{BUFFER_HEIGHT, BUFFER_WIDTH, ChunkBuffer};
pub use cache::{ChunkMeshState, MeshCache, chunks_in_radius};
pub use chunk_mesh::{ChunkMesh, FaceGroup, MeshVertex};
pub use face_direction::FaceDirection;
pub use mesher::{mesh_chunk, mesh_chunk_all};
pub use visibility::{FaceMask, compute_visible_faces, face_visible};
