//! Mesh caching keyed on chunk versions.
//!
//! A chunk's meshes stay valid for as long as its world version is unchanged.
//! Callers pass the current version on every query; any mismatch marks the
//! cached meshes stale.

use rustc_hash::FxHashMap;

use blockscape_voxel::{ChunkPos, VoxelSource};

use crate::buffer::ChunkBuffer;
use crate::chunk_mesh::ChunkMesh;
use crate::mesher::mesh_chunk_all;

/// Metadata for a chunk's mesh cache state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMeshState {
    /// Version of the chunk when its meshes were built, `None` if never built.
    pub meshed_version: Option<u64>,
}

impl ChunkMeshState {
    /// Creates a new mesh state with no mesh generated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh is missing or was built for another version.
    pub fn is_stale(&self, current_version: u64) -> bool {
        self.meshed_version != Some(current_version)
    }
}

#[derive(Debug)]
struct CachedChunk {
    state: ChunkMeshState,
    meshes: Vec<ChunkMesh>,
}

/// Per-chunk mesh storage.
#[derive(Debug, Default)]
pub struct MeshCache {
    entries: FxHashMap<ChunkPos, CachedChunk>,
}

impl MeshCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `chunk` has no meshes for `current_version`.
    pub fn needs_remesh(&self, chunk: ChunkPos, current_version: u64) -> bool {
        self.entries
            .get(&chunk)
            .is_none_or(|entry| entry.state.is_stale(current_version))
    }

    /// Stores freshly built meshes for `chunk` at `version`.
    pub fn store(&mut self, chunk: ChunkPos, version: u64, meshes: Vec<ChunkMesh>) {
        self.entries.insert(
            chunk,
            CachedChunk {
                state: ChunkMeshState {
                    meshed_version: Some(version),
                },
                meshes,
            },
        );
    }

    /// Cached meshes for `chunk`, whatever version they were built for.
    pub fn meshes(&self, chunk: ChunkPos) -> Option<&[ChunkMesh]> {
        self.entries.get(&chunk).map(|entry| entry.meshes.as_slice())
    }

    /// Cache state for `chunk`, if it was ever meshed.
    pub fn state(&self, chunk: ChunkPos) -> Option<&ChunkMeshState> {
        self.entries.get(&chunk).map(|entry| &entry.state)
    }

    /// Number of cached chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds every chunk in `chunks` whose cached meshes are stale.
    ///
    /// `version_of` reports each chunk's current version. Returns the number
    /// of chunks rebuilt.
    pub fn refresh<S, F>(&mut self, source: &S, chunks: &[ChunkPos], version_of: F) -> usize
    where
        S: VoxelSource + ?Sized,
        F: Fn(ChunkPos) -> u64,
    {
        let mut rebuilt = 0;
        for &chunk in chunks {
            let version = version_of(chunk);
            if !self.needs_remesh(chunk, version) {
                continue;
            }
            let buffer = ChunkBuffer::build(source, chunk);
            self.store(chunk, version, mesh_chunk_all(&buffer));
            rebuilt += 1;
        }
        if rebuilt > 0 {
            tracing::debug!(rebuilt, cached = self.len(), "refreshed chunk meshes");
        }
        rebuilt
    }

    /// Drops cached chunks farther than `radius` chunks from `center`.
    ///
    /// Returns the number of evicted chunks.
    pub fn retain_within(&mut self, center: ChunkPos, radius: u32) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|&chunk, _| within_radius(center, chunk, radius));
        before - self.entries.len()
    }
}

/// Chunks whose centers lie within a circle of `radius` chunks around
/// `center`, nearest first.
pub fn chunks_in_radius(center: ChunkPos, radius: u32) -> Vec<ChunkPos> {
    let r = radius as i32;
    let mut chunks: Vec<ChunkPos> = (-r..=r)
        .flat_map(|dx| (-r..=r).map(move |dz| center.offset(dx, dz)))
        .filter(|&chunk| within_radius(center, chunk, radius))
        .collect();
    chunks.sort_by_key(|c| {
        let (dx, dz) = (c.x - center.x, c.z - center.z);
        (dx * dx + dz * dz, c.x, c.z)
    });
    chunks
}

fn within_radius(center: ChunkPos, chunk: ChunkPos, radius: u32) -> bool {
    let dx = i64::from(chunk.x - center.x);
    let dz = i64::from(chunk.z - center.z);
    dx * dx + dz * dz <= i64::from(radius) * i64::from(radius)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use blockscape_voxel::{BlockKind, WorldPos};

    use super::*;

    struct TestWorld {
        blocks: HashMap<(i32, i32, i32), BlockKind>,
    }

    impl VoxelSource for TestWorld {
        fn block(&self, pos: WorldPos) -> BlockKind {
            self.blocks
                .get(&(pos.x, pos.y, pos.z))
                .copied()
                .unwrap_or(BlockKind::Air)
        }
    }

    fn world_with_cell() -> TestWorld {
        let mut blocks = HashMap::new();
        blocks.insert((1, 1, 1), BlockKind::Stone);
        TestWorld { blocks }
    }

    #[test]
    fn test_new_state_is_stale() {
        let state = ChunkMeshState::new();
        assert!(state.is_stale(0));
    }

    #[test]
    fn test_version_change_invalidates_mesh() {
        let mut cache = MeshCache::new();
        let chunk = ChunkPos::new(0, 0);
        assert!(cache.needs_remesh(chunk, 0));
        cache.store(chunk, 0, Vec::new());
        assert!(!cache.needs_remesh(chunk, 0));
        assert!(cache.needs_remesh(chunk, 1));
    }

    #[test]
    fn test_refresh_rebuilds_only_stale_chunks() {
        let world = world_with_cell();
        let mut cache = MeshCache::new();
        let chunks = [ChunkPos::new(0, 0), ChunkPos::new(1, 0)];

        assert_eq!(cache.refresh(&world, &chunks, |_| 0), 2);
        assert_eq!(cache.refresh(&world, &chunks, |_| 0), 0);
        let bumped = |c: ChunkPos| if c == ChunkPos::new(1, 0) { 3 } else { 0 };
        assert_eq!(cache.refresh(&world, &chunks, bumped), 1);

        let meshes = cache.meshes(ChunkPos::new(0, 0)).expect("cached");
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].kind, BlockKind::Stone);
        assert!(cache.meshes(ChunkPos::new(1, 0)).is_some_and(|m| m.is_empty()));
        assert_eq!(
            cache.state(ChunkPos::new(1, 0)).and_then(|s| s.meshed_version),
            Some(3)
        );
    }

    #[test]
    fn test_chunks_in_radius_is_circular_and_sorted() {
        let center = ChunkPos::new(5, -5);
        let chunks = chunks_in_radius(center, 2);
        assert_eq!(chunks[0], center);
        assert!(chunks.contains(&center.offset(2, 0)));
        assert!(chunks.contains(&center.offset(1, 1)));
        assert!(!chunks.contains(&center.offset(2, 2)));
        assert_eq!(chunks.len(), 13);
    }

    #[test]
    fn test_radius_zero_is_center_only() {
        assert_eq!(chunks_in_radius(ChunkPos::new(0, 0), 0), vec![ChunkPos::new(0, 0)]);
    }

    #[test]
    fn test_retain_within_evicts_far_chunks() {
        let mut cache = MeshCache::new();
        cache.store(ChunkPos::new(0, 0), 0, Vec::new());
        cache.store(ChunkPos::new(10, 0), 0, Vec::new());
        assert_eq!(cache.retain_within(ChunkPos::new(0, 0), 4), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.meshes(ChunkPos::new(10, 0)).is_none());
    }
}
