//! Chunk mesh data: plain vertex/index buffers grouped by face direction.
//!
//! One [`ChunkMesh`] holds the geometry of a single block kind in a single
//! chunk. Indices are laid out in six contiguous ranges, one per
//! [`FaceDirection`], so a renderer can bind distinct top/side/bottom
//! materials per range.

use blockscape_voxel::{BlockKind, ChunkPos};

use crate::face_direction::FaceDirection;

/// A single vertex in a chunk mesh.
///
/// Positions are chunk-local on X and Z (`0..=CHUNK_WIDTH`) and world-space on Y.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Corner position.
    pub position: [f32; 3],
    /// Face normal.
    pub normal: [f32; 3],
    /// Texture coordinates in `[0, 1]`.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

/// A contiguous index range belonging to one face direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceGroup {
    /// Direction shared by every quad in the range.
    pub direction: FaceDirection,
    /// First index into [`ChunkMesh::indices`].
    pub start: u32,
    /// Number of indices (6 per quad).
    pub count: u32,
}

impl FaceGroup {
    /// Returns the number of quads in this group.
    pub fn quad_count(&self) -> usize {
        self.count as usize / 6
    }
}

/// Geometry for one block kind in one chunk.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    /// Chunk the geometry belongs to.
    pub chunk: ChunkPos,
    /// Block kind drawn by this mesh.
    pub kind: BlockKind,
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    /// Index ranges in [`FaceDirection::ALL`] order.
    pub groups: [FaceGroup; 6],
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new(chunk: ChunkPos, kind: BlockKind) -> Self {
        Self {
            chunk,
            kind,
            vertices: Vec::new(),
            indices: Vec::new(),
            groups: FaceDirection::ALL.map(|direction| FaceGroup {
                direction,
                start: 0,
                count: 0,
            }),
        }
    }

    /// Returns `true` if no geometry was emitted.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the total number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Returns the index range for a face direction.
    pub fn group(&self, direction: FaceDirection) -> &FaceGroup {
        &self.groups[direction.index()]
    }

    /// Opens the index range for `direction`. Quads pushed until the next
    /// call belong to it.
    pub(crate) fn begin_group(&mut self, direction: FaceDirection) {
        let start = self.indices.len() as u32;
        self.groups[direction.index()] = FaceGroup {
            direction,
            start,
            count: 0,
        };
    }

    /// Pushes a unit quad on the `direction` face of cell `(x, y, z)`.
    ///
    /// `x`/`z` are chunk-local and `y` is the world layer. The quad counts
    /// toward the group for `direction`.
    pub fn push_quad(&mut self, direction: FaceDirection, x: i32, y: i32, z: i32) {
        let (normal_axis, u_axis, v_axis) = direction.face_axes();
        let normal = direction.normal();
        let cell = [x as f32, y as f32, z as f32];

        // Positive faces sit on the far side of the cell.
        let layer = if direction.is_positive() {
            cell[normal_axis] + 1.0
        } else {
            cell[normal_axis]
        };

        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let base = self.vertices.len() as u32;

        for (du, dv) in corners {
            let mut position = [0.0_f32; 3];
            position[normal_axis] = layer;
            position[u_axis] = cell[u_axis] + du;
            position[v_axis] = cell[v_axis] + dv;

            self.vertices.push(MeshVertex {
                position,
                normal,
                uv: [du, dv],
            });
        }

        // Corner order winds around u x v. Keep it when that points along the
        // face normal so triangles are counter-clockwise seen from outside.
        let u_cross_v_positive = (v_axis + 3 - u_axis) % 3 == 1;
        if u_cross_v_positive == direction.is_positive() {
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            self.indices
                .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }

        self.groups[direction.index()].count += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> ChunkMesh {
        ChunkMesh::new(ChunkPos::new(0, 0), BlockKind::Stone)
    }

    #[test]
    fn test_empty_mesh() {
        let m = mesh();
        assert!(m.is_empty());
        assert_eq!(m.quad_count(), 0);
        for dir in FaceDirection::ALL {
            assert_eq!(m.group(dir).count, 0);
        }
    }

    #[test]
    fn test_push_single_quad() {
        let mut m = mesh();
        m.begin_group(FaceDirection::PosY);
        m.push_quad(FaceDirection::PosY, 0, 0, 0);
        assert_eq!(m.vertices.len(), 4);
        assert_eq!(m.indices.len(), 6);
        assert_eq!(m.group(FaceDirection::PosY).quad_count(), 1);
    }

    #[test]
    fn test_top_face_sits_on_top_of_cell() {
        let mut m = mesh();
        m.begin_group(FaceDirection::PosY);
        m.push_quad(FaceDirection::PosY, 2, 9, 3);
        assert!(m.vertices.iter().all(|v| v.position[1] == 10.0));
        assert!(m.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        let xs: Vec<f32> = m.vertices.iter().map(|v| v.position[0]).collect();
        assert!(xs.contains(&2.0) && xs.contains(&3.0));
    }

    #[test]
    fn test_bottom_face_sits_on_bottom_of_cell() {
        let mut m = mesh();
        m.begin_group(FaceDirection::NegY);
        m.push_quad(FaceDirection::NegY, 0, -5, 0);
        assert!(m.vertices.iter().all(|v| v.position[1] == -5.0));
    }

    #[test]
    fn test_groups_track_ranges() {
        let mut m = mesh();
        m.begin_group(FaceDirection::PosX);
        m.push_quad(FaceDirection::PosX, 0, 0, 0);
        m.push_quad(FaceDirection::PosX, 1, 0, 0);
        m.begin_group(FaceDirection::NegX);
        m.push_quad(FaceDirection::NegX, 0, 0, 0);

        assert_eq!(m.group(FaceDirection::PosX).start, 0);
        assert_eq!(m.group(FaceDirection::PosX).count, 12);
        assert_eq!(m.group(FaceDirection::NegX).start, 12);
        assert_eq!(m.group(FaceDirection::NegX).count, 6);
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn test_every_face_winds_outward() {
        for dir in FaceDirection::ALL {
            let mut m = mesh();
            m.begin_group(dir);
            m.push_quad(dir, 1, 4, 2);
            let normal = dir.normal();
            for tri in m.indices.chunks(3) {
                let [a, b, c] = [0, 1, 2].map(|i| m.vertices[tri[i] as usize].position);
                let n = cross(sub(b, a), sub(c, a));
                let dot = n[0] * normal[0] + n[1] * normal[1] + n[2] * normal[2];
                assert!(dot > 0.0, "{dir:?} triangle {tri:?} faces inward");
            }
        }
    }

    #[test]
    fn test_vertices_cast_to_bytes() {
        let mut m = mesh();
        m.begin_group(FaceDirection::PosZ);
        m.push_quad(FaceDirection::PosZ, 0, 0, 0);
        let bytes: &[u8] = bytemuck::cast_slice(&m.vertices);
        assert_eq!(bytes.len(), 4 * 32);
    }
}
