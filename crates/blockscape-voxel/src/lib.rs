//! Block palette, world/chunk coordinates, sparse override storage, and the
//! read-only voxel access trait shared by every consumer of the world grid.

pub mod block;
pub mod coords;
pub mod overrides;
pub mod source;

pub use block::{BlockKind, UnknownBlockId};
pub use coords::{CHUNK_WIDTH, ChunkPos, WORLD_HEIGHT, WorldPos, Y_MAX, Y_MIN};
pub use overrides::OverrideStore;
pub use source::VoxelSource;
