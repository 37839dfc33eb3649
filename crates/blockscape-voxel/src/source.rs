//! Read-only access to the world grid.

use crate::block::BlockKind;
use crate::coords::WorldPos;

/// Anything that can answer "what occupies this cell".
///
/// Implementations must be total: every position yields a kind, with empty
/// space for anything unknown or out of range. Raycasting, collision and the
/// chunk buffer builder all query the world through this trait.
pub trait VoxelSource {
    /// Returns the kind occupying `pos`.
    fn block(&self, pos: WorldPos) -> BlockKind;

    /// Returns `true` if the cell at `pos` blocks bodies and rays.
    fn is_solid(&self, pos: WorldPos) -> bool {
        self.block(pos).is_solid()
    }

    /// Writes the kinds of the column `(x, z)` for `y_start..y_start + out.len()` into `out`.
    ///
    /// The default calls [`VoxelSource::block`] per cell. Sources with
    /// per-column state override this to share that work across the column.
    fn fill_column(&self, x: i32, z: i32, y_start: i32, out: &mut [BlockKind]) {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.block(WorldPos::new(x, y_start + i as i32, z));
        }
    }
}

impl<T: VoxelSource + ?Sized> VoxelSource for &T {
    fn block(&self, pos: WorldPos) -> BlockKind {
        (**self).block(pos)
    }

    fn fill_column(&self, x: i32, z: i32, y_start: i32, out: &mut [BlockKind]) {
        (**self).fill_column(x, z, y_start, out);
    }
}
