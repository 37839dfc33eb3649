//! The pure terrain function: world seed + cell -> block kind.
//!
//! All per-column work (surface height, biome, nearby tree roots) is gathered
//! once into a [`ColumnSample`]. Both single-cell generation and whole-column
//! fills classify layers from that sample through the same code path, so a
//! cell generated on its own always matches the same cell generated as part of
//! a chunk.

use serde::{Deserialize, Serialize};

use blockscape_voxel::{BlockKind, WorldPos, Y_MAX, Y_MIN};

use crate::cave::{CaveCarver, CaveConfig};
use crate::heightmap::{HeightmapParams, HeightmapSampler};
use crate::noise_source::{NoiseLayer, column_random};
use crate::trees::{Tree, TreeConfig};

const ORE_SALT: u64 = 0x0C0B_B1E5;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Complete description of a generated world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// World seed.
    pub seed: u64,
    /// Highest layer filled with water where the surface is lower. Default: 6.
    pub water_level: i32,
    /// Surface height and biome fields.
    pub heightmap: HeightmapParams,
    /// Cave carving.
    pub caves: CaveConfig,
    /// Tree placement.
    pub trees: TreeConfig,
    /// Depth below the surface where stone starts. Default: 4.
    pub stone_depth: i32,
    /// Frequency of the field choosing the rarer deep-fill variant. Default: 0.1.
    pub ore_frequency: f64,
    /// Deep fill becomes cobblestone where that field exceeds this. Default: 0.6.
    pub ore_threshold: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            water_level: 6,
            heightmap: HeightmapParams::default(),
            caves: CaveConfig::default(),
            trees: TreeConfig::default(),
            stone_depth: 4,
            ore_frequency: 0.1,
            ore_threshold: 0.6,
        }
    }
}

// ---------------------------------------------------------------------------
// Column sample
// ---------------------------------------------------------------------------

/// Everything about a column that does not depend on `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSample {
    pub x: i32,
    pub z: i32,
    /// Topmost terrain layer.
    pub surface: i32,
    /// Trees whose trunk or canopy may reach this column, in scan order
    /// (`dx` outer, `dz` inner, both from `-radius` to `radius`).
    pub trees: Vec<Tree>,
}

impl ColumnSample {
    /// Returns `true` if a tree grows from this column.
    pub fn has_root(&self) -> bool {
        self.trees.iter().any(Tree::is_rooted_here)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Deterministic, side-effect-free terrain generator.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    params: TerrainParams,
    heightmap: HeightmapSampler,
    caves: CaveCarver,
    ore: NoiseLayer,
}

impl TerrainGenerator {
    /// Create a generator for the given parameters.
    pub fn new(params: TerrainParams) -> Self {
        let heightmap = HeightmapSampler::new(params.seed, params.heightmap.clone());
        let caves = CaveCarver::new(params.seed, params.caves.clone());
        let ore = NoiseLayer::new(params.seed, ORE_SALT, params.ore_frequency);
        Self {
            params,
            heightmap,
            caves,
            ore,
        }
    }

    /// Returns the generation parameters.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Topmost terrain layer of the column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.heightmap.surface_height(x, z)
    }

    /// The tree rooted in column `(x, z)`, if one grows there.
    ///
    /// Offsets in the returned tree are zero; callers relocate it.
    pub fn tree_rooted_at(&self, x: i32, z: i32) -> Option<Tree> {
        let cfg = &self.params.trees;
        let seed = self.params.seed;
        if column_random(seed, x, z) <= cfg.chance_threshold {
            return None;
        }
        if self.heightmap.biome(x, z) <= cfg.biome_threshold {
            return None;
        }
        let ground = self.surface_height(x, z);
        if ground <= self.params.water_level + 1 {
            return None;
        }

        let extra = (column_random(seed, x + 1, z + 1) * cfg.trunk_variation as f64).floor();
        Some(Tree {
            dx: 0,
            dz: 0,
            base: ground + 1,
            height: cfg.min_trunk + extra as i32,
        })
    }

    /// Gathers the `y`-independent data for column `(x, z)`.
    pub fn sample_column(&self, x: i32, z: i32) -> ColumnSample {
        let radius = self.params.trees.canopy_radius;
        let mut trees = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if let Some(tree) = self.tree_rooted_at(x + dx, z + dz) {
                    trees.push(Tree { dx, dz, ..tree });
                }
            }
        }

        ColumnSample {
            x,
            z,
            surface: self.surface_height(x, z),
            trees,
        }
    }

    /// Classifies layer `y` of a sampled column.
    pub fn classify(&self, column: &ColumnSample, y: i32) -> BlockKind {
        if !(Y_MIN..Y_MAX).contains(&y) {
            return BlockKind::Air;
        }
        if y == Y_MIN {
            return BlockKind::Bedrock;
        }

        let surface = column.surface;
        let water_level = self.params.water_level;

        if y > surface && y <= water_level {
            return BlockKind::Water;
        }

        if y <= surface {
            if self.caves.is_cave(
                column.x,
                y,
                column.z,
                surface,
                water_level,
                column.has_root(),
            ) {
                return BlockKind::Air;
            }
            return self.terrain_layer(column, y);
        }

        self.vegetation(column, y)
    }

    /// Generates the kind of a single cell.
    pub fn generate(&self, pos: WorldPos) -> BlockKind {
        if !pos.in_vertical_range() {
            return BlockKind::Air;
        }
        self.classify(&self.sample_column(pos.x, pos.z), pos.y)
    }

    /// Fills `out[i]` with the generated kind at `(x, y_start + i, z)`.
    pub fn fill_column(&self, x: i32, z: i32, y_start: i32, out: &mut [BlockKind]) {
        let column = self.sample_column(x, z);
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.classify(&column, y_start + i as i32);
        }
    }

    /// Finds the first layer, scanning down from `from` to `to` (exclusive),
    /// whose generated kind is solid.
    pub fn first_solid_below(&self, x: i32, z: i32, from: i32, to: i32) -> Option<i32> {
        let column = self.sample_column(x, z);
        ((to + 1)..=from)
            .rev()
            .find(|&y| self.classify(&column, y).is_solid())
    }

    fn terrain_layer(&self, column: &ColumnSample, y: i32) -> BlockKind {
        let surface = column.surface;
        let shoreline = surface <= self.params.water_level + 1;

        if y == surface {
            return if shoreline {
                BlockKind::Sand
            } else {
                BlockKind::Grass
            };
        }
        if y > surface - self.params.stone_depth {
            return if shoreline {
                BlockKind::Sand
            } else {
                BlockKind::Dirt
            };
        }

        let ore = self.ore.sample3(column.x as f64, y as f64, column.z as f64);
        if ore > self.params.ore_threshold {
            BlockKind::Cobblestone
        } else {
            BlockKind::Stone
        }
    }

    fn vegetation(&self, column: &ColumnSample, y: i32) -> BlockKind {
        let radius = self.params.trees.canopy_radius;

        // Trunks win over any canopy at the same cell.
        if column.trees.iter().any(|t| t.trunk_at(y)) {
            return BlockKind::Wood;
        }
        if column.trees.iter().any(|t| t.leaves_at(y, radius)) {
            return BlockKind::Leaves;
        }
        BlockKind::Air
    }
}
