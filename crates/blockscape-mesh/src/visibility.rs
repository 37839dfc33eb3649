//! Visible face detection: decides which faces of a kind's cells are exposed.

use blockscape_voxel::BlockKind;

use crate::buffer::ChunkBuffer;
use crate::face_direction::FaceDirection;

/// Set of exposed faces of one cell, one bit per [`FaceDirection`] discriminant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceMask(u8);

impl FaceMask {
    /// Collects the directions for which `exposed` returns `true`.
    pub fn from_fn(mut exposed: impl FnMut(FaceDirection) -> bool) -> Self {
        FaceDirection::ALL
            .into_iter()
            .filter(|&dir| exposed(dir))
            .fold(Self(0), |mask, dir| Self(mask.0 | 1 << dir as u8))
    }

    pub fn contains(self, direction: FaceDirection) -> bool {
        self.0 & (1 << direction as u8) != 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The exposed directions in [`FaceDirection::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = FaceDirection> {
        FaceDirection::ALL
            .into_iter()
            .filter(move |&dir| self.contains(dir))
    }
}

/// Returns `true` if a face of a `kind` cell bordering a `neighbor` cell is drawn.
///
/// Faces are drawn only against transparent neighbors. Two cells of the
/// same transparent kind (water next to water) hide their shared face;
/// opaque cells always show faces toward any transparent neighbor.
pub fn face_visible(kind: BlockKind, neighbor: BlockKind) -> bool {
    neighbor.is_transparent() && (neighbor != kind || !kind.is_transparent())
}

/// Computes the exposed faces of every `kind` cell inside the buffer.
///
/// Returns `(x, y, z, faces)` entries for cells with at least one visible
/// face, `x`/`z` chunk-local and `y` the world layer. Empty space never
/// produces faces.
pub fn compute_visible_faces(
    buffer: &ChunkBuffer,
    kind: BlockKind,
) -> Vec<(i32, i32, i32, FaceMask)> {
    if kind.is_air() {
        return Vec::new();
    }

    buffer
        .interior_cells()
        .filter(|&(_, _, _, k)| k == kind)
        .filter_map(|(x, y, z, _)| {
            let faces = FaceMask::from_fn(|dir| {
                let (nx, ny, nz) = dir.offset(x, y, z);
                face_visible(kind, buffer.get(nx, ny, nz))
            });
            (!faces.is_empty()).then_some((x, y, z, faces))
        })
        .collect()
}
