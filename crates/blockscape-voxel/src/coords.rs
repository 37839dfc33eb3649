//! Integer world coordinates, chunk addressing, and the vertical bounds of the world.
//!
//! Cells are unit cubes anchored at their minimum corner: the cell `(x, y, z)`
//! spans `[x, x+1) × [y, y+1) × [z, z+1)`. Chunks are `CHUNK_WIDTH`-wide
//! horizontal tiles spanning the full vertical range.

use serde::{Deserialize, Serialize};

/// Horizontal edge length of a chunk, in cells.
pub const CHUNK_WIDTH: i32 = 16;
/// Lowest addressable layer. Always bedrock unless overridden.
pub const Y_MIN: i32 = -32;
/// One past the highest addressable layer.
pub const Y_MAX: i32 = 64;
/// Number of layers in `[Y_MIN, Y_MAX)`.
pub const WORLD_HEIGHT: usize = (Y_MAX - Y_MIN) as usize;

// ---------------------------------------------------------------------------
// WorldPos
// ---------------------------------------------------------------------------

/// A cell in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    /// Offsets to the six face-adjacent neighbors: +X, -X, +Y, -Y, +Z, -Z.
    pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
        (1, 0, 0),
        (-1, 0, 0),
        (0, 1, 0),
        (0, -1, 0),
        (0, 0, 1),
        (0, 0, -1),
    ];

    /// Offsets to the four horizontal neighbors.
    pub const HORIZONTAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    /// Creates a new world position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the cell containing the given continuous point.
    pub fn containing(x: f32, y: f32, z: f32) -> Self {
        Self::new(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    /// Returns this position shifted by `(dx, dy, dz)`.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly below.
    pub fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The cell directly above.
    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The six face-adjacent neighbors.
    pub fn neighbors(self) -> [WorldPos; 6] {
        Self::NEIGHBOR_OFFSETS.map(|(dx, dy, dz)| self.offset(dx, dy, dz))
    }

    /// The chunk containing this cell.
    pub fn chunk(self) -> ChunkPos {
        ChunkPos::containing(self.x, self.z)
    }

    /// Horizontal coordinates inside the containing chunk, each in `[0, CHUNK_WIDTH)`.
    pub fn local_xz(self) -> (i32, i32) {
        (
            self.x.rem_euclid(CHUNK_WIDTH),
            self.z.rem_euclid(CHUNK_WIDTH),
        )
    }

    /// Returns `true` if `y` lies in `[Y_MIN, Y_MAX)`.
    pub fn in_vertical_range(self) -> bool {
        (Y_MIN..Y_MAX).contains(&self.y)
    }

    /// Center of the cell as a float triple.
    pub fn center(self) -> [f32; 3] {
        [
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        ]
    }
}

impl From<(i32, i32, i32)> for WorldPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for WorldPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// ChunkPos
// ---------------------------------------------------------------------------

/// Address of a chunk column on the horizontal chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Creates a new chunk address.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the chunk containing world column `(x, z)`.
    pub fn containing(x: i32, z: i32) -> Self {
        Self::new(x.div_euclid(CHUNK_WIDTH), z.div_euclid(CHUNK_WIDTH))
    }

    /// Returns the chunk containing the given continuous horizontal position.
    pub fn containing_point(x: f32, z: f32) -> Self {
        Self::containing(x.floor() as i32, z.floor() as i32)
    }

    /// Returns the address of the chunk offset by `(dx, dz)`.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// World coordinates of the chunk's minimum corner column.
    pub fn origin(self) -> (i32, i32) {
        (self.x * CHUNK_WIDTH, self.z * CHUNK_WIDTH)
    }

    /// Every chunk whose mesh depends on the cell at `pos`.
    ///
    /// The containing chunk is always first. A cell on a chunk's border also
    /// affects the neighbor across that border, because meshing culls faces
    /// against cross-chunk neighbors.
    pub fn affected_by_edit(pos: WorldPos) -> Vec<ChunkPos> {
        let own = pos.chunk();
        let (lx, lz) = pos.local_xz();
        let mut affected = vec![own];

        if lx == 0 {
            affected.push(own.offset(-1, 0));
        }
        if lx == CHUNK_WIDTH - 1 {
            affected.push(own.offset(1, 0));
        }
        if lz == 0 {
            affected.push(own.offset(0, -1));
        }
        if lz == CHUNK_WIDTH - 1 {
            affected.push(own.offset(0, 1));
        }

        affected
    }
}

impl std::fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
