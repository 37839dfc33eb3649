//! Face-culled surface extraction, one mesh per block kind.

use blockscape_voxel::BlockKind;

use crate::buffer::ChunkBuffer;
use crate::chunk_mesh::ChunkMesh;
use crate::face_direction::FaceDirection;
use crate::visibility::compute_visible_faces;

/// Emits one unit quad per visible face of every `kind` cell in the buffer.
///
/// Quads are grouped by face direction. A chunk without `kind` cells (or
/// with all of them enclosed) yields an empty mesh.
pub fn mesh_chunk(buffer: &ChunkBuffer, kind: BlockKind) -> ChunkMesh {
    let cells = compute_visible_faces(buffer, kind);
    let mut mesh = ChunkMesh::new(buffer.chunk(), kind);

    for dir in FaceDirection::ALL {
        mesh.begin_group(dir);
        for &(x, y, z, faces) in &cells {
            if faces.contains(dir) {
                mesh.push_quad(dir, x, y, z);
            }
        }
    }

    mesh
}

/// Meshes every non-empty kind present in the chunk.
///
/// Opaque kinds come first, then transparent ones, so drawing the result
/// in order blends correctly. Kinds that produce no geometry are skipped.
pub fn mesh_chunk_all(buffer: &ChunkBuffer) -> Vec<ChunkMesh> {
    let mut kinds: Vec<BlockKind> = buffer
        .kinds_present()
        .into_iter()
        .filter(|k| !k.is_air())
        .collect();
    kinds.sort_by_key(|k| (k.is_transparent(), k.id()));

    let meshes: Vec<ChunkMesh> = kinds
        .into_iter()
        .map(|kind| mesh_chunk(buffer, kind))
        .filter(|mesh| !mesh.is_empty())
        .collect();

    tracing::debug!(
        chunk = %buffer.chunk(),
        meshes = meshes.len(),
        quads = meshes.iter().map(ChunkMesh::quad_count).sum::<usize>(),
        "meshed chunk"
    );
    meshes
}
