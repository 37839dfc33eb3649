//! Tree placement and shape.
//!
//! A column grows a tree when its per-column random draw is high enough, its
//! biome allows vegetation, and its surface sits clear of the water. Trees are
//! a straight trunk topped by a four-layer leaf canopy that narrows at the top.

use serde::{Deserialize, Serialize};

use blockscape_voxel::BlockKind;

/// Tree placement parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Column random draw must exceed this. Default: 0.98.
    pub chance_threshold: f64,
    /// Biome value must exceed this. Default: -0.2.
    pub biome_threshold: f64,
    /// Shortest trunk. Default: 4.
    pub min_trunk: i32,
    /// Number of extra trunk heights the random draw picks from. Default: 3.
    pub trunk_variation: i32,
    /// Horizontal reach of the canopy from the trunk. Default: 2.
    pub canopy_radius: i32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            chance_threshold: 0.98,
            biome_threshold: -0.2,
            min_trunk: 4,
            trunk_variation: 3,
            canopy_radius: 2,
        }
    }
}

/// A tree rooted in a column near the one being classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tree {
    /// Offset from the classified column to the trunk column.
    pub dx: i32,
    pub dz: i32,
    /// First trunk layer (one above the ground).
    pub base: i32,
    /// Trunk height in cells.
    pub height: i32,
}

impl Tree {
    /// Returns `true` if this tree grows from the classified column itself.
    pub fn is_rooted_here(&self) -> bool {
        self.dx == 0 && self.dz == 0
    }

    /// One past the top trunk layer.
    pub fn trunk_top(&self) -> i32 {
        self.base + self.height
    }

    /// Whether layer `y` of the classified column is trunk.
    pub fn trunk_at(&self, y: i32) -> bool {
        self.is_rooted_here() && y >= self.base && y < self.trunk_top()
    }

    /// Whether layer `y` of the classified column is inside this tree's canopy.
    pub fn leaves_at(&self, y: i32, canopy_radius: i32) -> bool {
        let start = self.trunk_top() - 2;
        let end = self.trunk_top() + 1;
        if y < start || y > end {
            return false;
        }

        let radius = if y >= end - 1 { 1 } else { canopy_radius };
        if self.dx.abs() > radius || self.dz.abs() > radius {
            return false;
        }
        // The trunk column only carries leaves above the trunk.
        !self.is_rooted_here() || y >= self.trunk_top()
    }

    /// Kind this tree puts at layer `y` of the classified column, if any.
    pub fn block_at(&self, y: i32, canopy_radius: i32) -> Option<BlockKind> {
        if self.trunk_at(y) {
            Some(BlockKind::Wood)
        } else if self.leaves_at(y, canopy_radius) {
            Some(BlockKind::Leaves)
        } else {
            None
        }
    }
}
