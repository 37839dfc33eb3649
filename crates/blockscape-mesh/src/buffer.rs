//! Padded, owned snapshots of one chunk column.
//!
//! A [`ChunkBuffer`] covers the chunk's `CHUNK_WIDTH × CHUNK_WIDTH` footprint
//! plus one cell of padding on every side, vertically included, so every
//! cell inside the chunk can look up all six neighbors without touching the
//! world again. Once built, it is independent of the source it was read from.

use blockscape_voxel::{BlockKind, CHUNK_WIDTH, ChunkPos, VoxelSource, WORLD_HEIGHT, Y_MIN};

/// Padded horizontal size of a buffer.
pub const BUFFER_WIDTH: usize = CHUNK_WIDTH as usize + 2;
/// Padded vertical size of a buffer.
pub const BUFFER_HEIGHT: usize = WORLD_HEIGHT + 2;

const BUFFER_VOLUME: usize = BUFFER_WIDTH * BUFFER_WIDTH * BUFFER_HEIGHT;

/// Dense snapshot of a chunk and its one-cell border.
///
/// Cells are stored column by column (y varies fastest) so that whole columns
/// can be filled in one call to [`VoxelSource::fill_column`].
#[derive(Clone, Debug)]
pub struct ChunkBuffer {
    chunk: ChunkPos,
    cells: Box<[BlockKind]>,
}

impl ChunkBuffer {
    /// Reads the chunk and its padding from `source`.
    pub fn build<S: VoxelSource + ?Sized>(source: &S, chunk: ChunkPos) -> Self {
        let mut cells = vec![BlockKind::Air; BUFFER_VOLUME].into_boxed_slice();
        let (origin_x, origin_z) = chunk.origin();

        for px in 0..BUFFER_WIDTH {
            for pz in 0..BUFFER_WIDTH {
                let start = column_start(px, pz);
                source.fill_column(
                    origin_x + px as i32 - 1,
                    origin_z + pz as i32 - 1,
                    Y_MIN - 1,
                    &mut cells[start..start + BUFFER_HEIGHT],
                );
            }
        }

        tracing::trace!("built chunk buffer {}", chunk);
        Self { chunk, cells }
    }

    /// The chunk this buffer was built for.
    pub fn chunk(&self) -> ChunkPos {
        self.chunk
    }

    /// Returns the kind at chunk-local `(x, z)` and world layer `y`.
    ///
    /// `x` and `z` range over `[-1, CHUNK_WIDTH]`, `y` over `[Y_MIN - 1, Y_MAX]`.
    /// Anything outside the padded region reads as empty space.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockKind {
        match Self::index(x, y, z) {
            Some(i) => self.cells[i],
            None => BlockKind::Air,
        }
    }

    /// Returns `true` if any cell inside the chunk (padding excluded) is `kind`.
    pub fn contains(&self, kind: BlockKind) -> bool {
        self.interior_cells().any(|(_, _, _, k)| k == kind)
    }

    /// Every distinct kind inside the chunk (padding excluded), in id order.
    pub fn kinds_present(&self) -> Vec<BlockKind> {
        let mut seen = [false; BlockKind::ALL.len()];
        for (_, _, _, kind) in self.interior_cells() {
            seen[kind.id() as usize] = true;
        }
        BlockKind::ALL
            .into_iter()
            .filter(|k| seen[k.id() as usize])
            .collect()
    }

    /// Iterates `(x, y, z, kind)` over every cell inside the chunk, padding excluded.
    ///
    /// `x` and `z` are chunk-local, `y` is the world layer.
    pub fn interior_cells(&self) -> impl Iterator<Item = (i32, i32, i32, BlockKind)> + '_ {
        (0..CHUNK_WIDTH).flat_map(move |x| {
            (0..CHUNK_WIDTH).flat_map(move |z| {
                let start = column_start(x as usize + 1, z as usize + 1);
                self.cells[start + 1..start + BUFFER_HEIGHT - 1]
                    .iter()
                    .enumerate()
                    .map(move |(i, &kind)| (x, Y_MIN + i as i32, z, kind))
            })
        })
    }

    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        let px = usize::try_from(x + 1).ok()?;
        let pz = usize::try_from(z + 1).ok()?;
        let py = usize::try_from(y - (Y_MIN - 1)).ok()?;
        if px >= BUFFER_WIDTH || pz >= BUFFER_WIDTH || py >= BUFFER_HEIGHT {
            return None;
        }
        Some(column_start(px, pz) + py)
    }
}

fn column_start(px: usize, pz: usize) -> usize {
    (px * BUFFER_WIDTH + pz) * BUFFER_HEIGHT
}
