//! [`VoxelWorld`]: the single source of truth for cell occupancy.
//!
//! `resolve` layers recorded overrides over the terrain generator. All writes
//! go through [`VoxelWorld::place`], which keeps chunk versions and the active
//! fluid set consistent with the override store.

use rustc_hash::{FxHashMap, FxHashSet};

use blockscape_terrain::{TerrainGenerator, TerrainParams};
use blockscape_voxel::{BlockKind, ChunkPos, OverrideStore, VoxelSource, WorldPos, Y_MAX, Y_MIN};

/// Highest layer inspected when looking for a spawn point.
const SPAWN_SCAN_TOP: i32 = 60;
/// Spawn scan stops above this layer.
const SPAWN_SCAN_BOTTOM: i32 = -10;
/// Spawn height used when the scanned column has no ground.
const SPAWN_FALLBACK: i32 = 30;

/// Procedural world with sparse edits.
pub struct VoxelWorld {
    generator: TerrainGenerator,
    overrides: OverrideStore,
    chunk_versions: FxHashMap<ChunkPos, u64>,
    pub(crate) active_fluids: FxHashSet<WorldPos>,
}

impl VoxelWorld {
    /// Creates a world with no edits.
    pub fn new(params: TerrainParams) -> Self {
        tracing::debug!(seed = params.seed, "creating voxel world");
        Self {
            generator: TerrainGenerator::new(params),
            overrides: OverrideStore::new(),
            chunk_versions: FxHashMap::default(),
            active_fluids: FxHashSet::default(),
        }
    }

    /// Returns the terrain generator underneath the overrides.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Returns the kind occupying `pos`. Never fails.
    pub fn resolve(&self, pos: WorldPos) -> BlockKind {
        match self.overrides.get(pos) {
            Some(kind) => kind,
            None => self.generator.generate(pos),
        }
    }

    /// Returns `true` if `pos` may be written.
    ///
    /// The bedrock floor and everything outside the vertical range is read-only.
    pub fn is_writable(pos: WorldPos) -> bool {
        pos.y > Y_MIN && pos.y < Y_MAX
    }

    /// Records `kind` at `pos`.
    ///
    /// Bumps the version of every chunk whose mesh depends on the cell and
    /// updates the active fluid set: a placed liquid becomes active, anything
    /// else wakes the liquid cells around it. Returns `false` (and changes
    /// nothing) when `pos` is not writable.
    pub fn place(&mut self, pos: WorldPos, kind: BlockKind) -> bool {
        if !Self::is_writable(pos) {
            tracing::warn!("VoxelWorld::place rejected outside writable range: {} {}", pos, kind);
            return false;
        }

        self.overrides.insert(pos, kind);

        for chunk in ChunkPos::affected_by_edit(pos) {
            *self.chunk_versions.entry(chunk).or_insert(0) += 1;
        }

        if kind.is_liquid() {
            self.active_fluids.insert(pos);
        } else {
            self.active_fluids.remove(&pos);
            for neighbor in pos.neighbors() {
                if self.resolve(neighbor).is_liquid() {
                    self.active_fluids.insert(neighbor);
                }
            }
        }

        tracing::trace!("placed {} at {}", kind, pos);
        true
    }

    /// Clears `pos` to empty space. Same side effects as [`VoxelWorld::place`].
    pub fn remove(&mut self, pos: WorldPos) -> bool {
        self.place(pos, BlockKind::Air)
    }

    /// Current version of `chunk`. Starts at 0 and grows with every affecting edit.
    pub fn chunk_version(&self, chunk: ChunkPos) -> u64 {
        self.chunk_versions.get(&chunk).copied().unwrap_or(0)
    }

    /// Returns `true` if `pos` will attempt to flow on the next fluid tick.
    pub fn is_fluid_active(&self, pos: WorldPos) -> bool {
        self.active_fluids.contains(&pos)
    }

    /// Number of cells in the active fluid set.
    pub fn active_fluid_count(&self) -> usize {
        self.active_fluids.len()
    }

    /// Number of explicitly recorded cells.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Read access to the recorded overrides, for persistence collaborators.
    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    /// Feet layer for a body spawning over column `(x, z)`.
    ///
    /// Scans down from layer 60 for the first cell that is neither empty nor
    /// liquid and returns two layers above it, so the body settles onto the
    /// ground on its first steps. Falls back to layer 30 over a bottomless column.
    pub fn find_spawn_height(&self, x: i32, z: i32) -> i32 {
        let found = ((SPAWN_SCAN_BOTTOM + 1)..=SPAWN_SCAN_TOP)
            .rev()
            .find(|&y| self.resolve(WorldPos::new(x, y, z)).is_solid());
        match found {
            Some(y) => y + 2,
            None => {
                tracing::warn!("no ground at column ({}, {}), using fallback spawn", x, z);
                SPAWN_FALLBACK
            }
        }
    }
}

impl VoxelSource for VoxelWorld {
    fn block(&self, pos: WorldPos) -> BlockKind {
        self.resolve(pos)
    }

    fn fill_column(&self, x: i32, z: i32, y_start: i32, out: &mut [BlockKind]) {
        let has_edits = self.overrides.chunk_has_overrides(ChunkPos::containing(x, z));
        let column = self.generator.sample_column(x, z);
        for (i, slot) in out.iter_mut().enumerate() {
            let pos = WorldPos::new(x, y_start + i as i32, z);
            let recorded = if has_edits {
                self.overrides.get(pos)
            } else {
                None
            };
            *slot = recorded.unwrap_or_else(|| self.generator.classify(&column, pos.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> VoxelWorld {
        VoxelWorld::new(TerrainParams::default())
    }

    /// A sky cell well above any generated terrain or tree.
    fn sky(x: i32, z: i32) -> WorldPos {
        WorldPos::new(x, 45, z)
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let w = world();
        for x in -10..10 {
            for y in [-31, -5, 3, 8, 15] {
                let pos = WorldPos::new(x, y, 3 - x);
                assert_eq!(w.resolve(pos), w.resolve(pos));
            }
        }
    }

    #[test]
    fn test_override_precedence() {
        let mut w = world();
        let pos = WorldPos::new(3, 2, -4);
        assert!(w.place(pos, BlockKind::Glass));
        assert_eq!(w.resolve(pos), BlockKind::Glass);
        assert!(w.place(pos, BlockKind::Planks));
        assert_eq!(w.resolve(pos), BlockKind::Planks);
    }

    #[test]
    fn test_bedrock_floor_is_invariant() {
        let mut w = world();
        let floor = WorldPos::new(0, Y_MIN, 0);
        assert_eq!(w.resolve(floor), BlockKind::Bedrock);
        assert!(!w.remove(floor));
        assert_eq!(w.resolve(floor), BlockKind::Bedrock);
        assert_eq!(w.resolve(floor.below()), BlockKind::Air);
        assert_eq!(w.chunk_version(ChunkPos::new(0, 0)), 0);
    }

    #[test]
    fn test_place_above_world_is_rejected() {
        let mut w = world();
        assert!(!w.place(WorldPos::new(0, Y_MAX, 0), BlockKind::Stone));
        assert_eq!(w.override_count(), 0);
    }

    #[test]
    fn test_place_bumps_own_chunk_version() {
        let mut w = world();
        let chunk = ChunkPos::new(0, 0);
        assert_eq!(w.chunk_version(chunk), 0);
        w.place(sky(5, 5), BlockKind::Stone);
        assert_eq!(w.chunk_version(chunk), 1);
        assert_eq!(w.chunk_version(ChunkPos::new(1, 0)), 0);
    }

    #[test]
    fn test_border_place_bumps_neighbor_chunk() {
        let mut w = world();
        w.place(sky(15, 0), BlockKind::Stone);
        assert_eq!(w.chunk_version(ChunkPos::new(0, 0)), 1);
        assert_eq!(w.chunk_version(ChunkPos::new(1, 0)), 1);
        assert_eq!(w.chunk_version(ChunkPos::new(0, -1)), 1);
    }

    #[test]
    fn test_idempotent_remove() {
        let mut w = world();
        let pos = sky(4, 4);
        let chunk = pos.chunk();

        w.remove(pos);
        let overrides_after_first = w.override_count();
        let version_after_first = w.chunk_version(chunk);

        w.remove(pos);
        assert_eq!(w.override_count(), overrides_after_first);
        assert_eq!(w.chunk_version(chunk), version_after_first + 1);
        assert_eq!(w.resolve(pos), BlockKind::Air);
        assert_eq!(w.active_fluid_count(), 0);
    }

    #[test]
    fn test_placed_liquid_becomes_active() {
        let mut w = world();
        let pos = sky(0, 0);
        w.place(pos, BlockKind::Water);
        assert!(w.is_fluid_active(pos));
    }

    #[test]
    fn test_removing_wall_wakes_adjacent_liquid() {
        let mut w = world();
        let water = sky(0, 0);
        let wall = sky(1, 0);
        w.place(water, BlockKind::Water);
        w.active_fluids.clear();
        w.place(wall, BlockKind::Stone);
        assert!(w.is_fluid_active(water));

        w.active_fluids.clear();
        w.remove(wall);
        assert!(w.is_fluid_active(water));
        assert!(!w.is_fluid_active(wall));
    }

    #[test]
    fn test_replacing_liquid_deactivates_cell() {
        let mut w = world();
        let pos = sky(2, 2);
        w.place(pos, BlockKind::Water);
        w.place(pos, BlockKind::Glass);
        assert!(!w.is_fluid_active(pos));
    }

    #[test]
    fn test_fill_column_matches_resolve_with_edits() {
        let mut w = world();
        w.place(WorldPos::new(2, 5, 3), BlockKind::Torch);
        w.place(WorldPos::new(2, -20, 3), BlockKind::Air);

        let mut column = vec![BlockKind::Air; (Y_MAX - Y_MIN + 2) as usize];
        w.fill_column(2, 3, Y_MIN - 1, &mut column);
        for (i, kind) in column.iter().enumerate() {
            let pos = WorldPos::new(2, Y_MIN - 1 + i as i32, 3);
            assert_eq!(*kind, w.resolve(pos), "{pos}");
        }
    }

    #[test]
    fn test_spawn_height_sits_above_ground() {
        let w = world();
        let y = w.find_spawn_height(0, 0);
        assert!(w.resolve(WorldPos::new(0, y - 2, 0)).is_solid());
        assert!(!w.resolve(WorldPos::new(0, y - 1, 0)).is_solid());
    }

    #[test]
    fn test_spawn_height_respects_edits() {
        let mut w = world();
        w.place(WorldPos::new(7, 50, 7), BlockKind::Glass);
        assert_eq!(w.find_spawn_height(7, 7), 52);
    }
}
