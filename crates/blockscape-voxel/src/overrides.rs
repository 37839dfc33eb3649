//! Sparse, chunk-indexed storage of explicitly set cells.
//!
//! Each chunk that has ever been edited owns a dense array of optional kinds
//! covering its full footprint and vertical range. Untouched chunks cost
//! nothing. The store is only mutated through the world model so that chunk
//! versions and fluid activity stay consistent with its contents.

use rustc_hash::FxHashMap;

use crate::block::BlockKind;
use crate::coords::{CHUNK_WIDTH, ChunkPos, WORLD_HEIGHT, WorldPos, Y_MIN};

const CELLS_PER_CHUNK: usize = (CHUNK_WIDTH * CHUNK_WIDTH) as usize * WORLD_HEIGHT;

/// Dense per-chunk override layer.
#[derive(Clone, Debug)]
struct ChunkOverrides {
    cells: Box<[Option<BlockKind>]>,
    count: usize,
}

impl ChunkOverrides {
    fn new() -> Self {
        Self {
            cells: vec![None; CELLS_PER_CHUNK].into_boxed_slice(),
            count: 0,
        }
    }
}

/// Maps world cells to explicitly recorded kinds.
#[derive(Clone, Debug, Default)]
pub struct OverrideStore {
    chunks: FxHashMap<ChunkPos, ChunkOverrides>,
    len: usize,
}

impl OverrideStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded kind at `pos`, if any.
    pub fn get(&self, pos: WorldPos) -> Option<BlockKind> {
        let index = cell_index(pos)?;
        self.chunks.get(&pos.chunk())?.cells[index]
    }

    /// Records `kind` at `pos`, returning the previously recorded kind.
    ///
    /// Positions outside the vertical range are ignored.
    pub fn insert(&mut self, pos: WorldPos, kind: BlockKind) -> Option<BlockKind> {
        let Some(index) = cell_index(pos) else {
            tracing::warn!("OverrideStore::insert outside vertical range: {}", pos);
            return None;
        };

        let chunk = self
            .chunks
            .entry(pos.chunk())
            .or_insert_with(ChunkOverrides::new);
        let previous = chunk.cells[index].replace(kind);
        if previous.is_none() {
            chunk.count += 1;
            self.len += 1;
        }
        previous
    }

    /// Number of recorded cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of chunks holding at least one override.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if any cell of `chunk` has been recorded.
    pub fn chunk_has_overrides(&self, chunk: ChunkPos) -> bool {
        self.chunks.get(&chunk).is_some_and(|c| c.count > 0)
    }

    /// Iterates over every recorded `(position, kind)` pair, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (WorldPos, BlockKind)> + '_ {
        self.chunks.iter().flat_map(|(chunk, overrides)| {
            let (ox, oz) = chunk.origin();
            overrides
                .cells
                .iter()
                .enumerate()
                .filter_map(move |(i, cell)| cell.map(|kind| (cell_position(ox, oz, i), kind)))
        })
    }
}

/// Index of `pos` inside its chunk's dense array, `None` outside the vertical range.
fn cell_index(pos: WorldPos) -> Option<usize> {
    if !pos.in_vertical_range() {
        return None;
    }
    let (lx, lz) = pos.local_xz();
    let ly = (pos.y - Y_MIN) as usize;
    let w = CHUNK_WIDTH as usize;
    Some(lx as usize + lz as usize * w + ly * w * w)
}

fn cell_position(origin_x: i32, origin_z: i32, index: usize) -> WorldPos {
    let w = CHUNK_WIDTH as usize;
    let lx = index % w;
    let lz = (index / w) % w;
    let ly = index / (w * w);
    WorldPos::new(
        origin_x + lx as i32,
        Y_MIN + ly as i32,
        origin_z + lz as i32,
    )
}
