//! The closed block palette and the static properties attached to each kind.
//!
//! Ids are stable: `Air` is always 0 so that zero-filled buffers represent
//! empty space, and the remaining ids match the order items were introduced.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every material that can occupy a world cell or an inventory slot.
///
/// Item-only kinds (`Stick`, `Coal`) share the id space so that drops and
/// inventories can carry them, but world generation never produces them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BlockKind {
    /// Empty space.
    #[default]
    Air = 0,
    Dirt = 1,
    Grass = 2,
    Stone = 3,
    /// Tree trunk ("Log").
    Wood = 4,
    Leaves = 5,
    Planks = 6,
    Glass = 7,
    Cobblestone = 8,
    Sand = 9,
    /// The only liquid kind.
    Water = 10,
    Stick = 11,
    Coal = 12,
    Torch = 13,
    CraftingTable = 14,
    /// Unbreakable floor of the world.
    Bedrock = 15,
}

/// Raised when decoding a raw id that does not name any [`BlockKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown block id: {0}")]
pub struct UnknownBlockId(pub u8);

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

impl BlockKind {
    /// All kinds in id order.
    pub const ALL: [BlockKind; 16] = [
        Self::Air,
        Self::Dirt,
        Self::Grass,
        Self::Stone,
        Self::Wood,
        Self::Leaves,
        Self::Planks,
        Self::Glass,
        Self::Cobblestone,
        Self::Sand,
        Self::Water,
        Self::Stick,
        Self::Coal,
        Self::Torch,
        Self::CraftingTable,
        Self::Bedrock,
    ];

    /// Returns the stable numeric id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns `true` for empty space.
    pub fn is_air(self) -> bool {
        self == Self::Air
    }

    /// Returns `true` for the liquid kind.
    pub fn is_liquid(self) -> bool {
        self == Self::Water
    }

    /// Returns `true` if bodies collide with this kind and rays stop on it.
    ///
    /// Everything except empty space and liquid is solid.
    pub fn is_solid(self) -> bool {
        !self.is_air() && !self.is_liquid()
    }

    /// Returns `true` if faces of neighboring cells stay visible through it.
    pub fn is_transparent(self) -> bool {
        matches!(self, Self::Air | Self::Glass | Self::Leaves | Self::Water)
    }

    /// Returns `true` if a player may put this kind into the world.
    pub fn is_placeable(self) -> bool {
        !matches!(self, Self::Air | Self::Stick | Self::Coal)
    }

    /// Seconds of continuous mining needed to break this kind.
    ///
    /// Returns `None` for unbreakable kinds.
    pub fn mining_time(self) -> Option<f32> {
        let seconds = match self {
            Self::Air | Self::Water => 0.0,
            Self::Leaves | Self::Glass => 0.3,
            Self::Sand | Self::Dirt => 0.5,
            Self::Grass => 0.6,
            Self::Planks | Self::Wood | Self::CraftingTable => 1.0,
            Self::Stone | Self::Cobblestone => 1.5,
            Self::Stick | Self::Coal | Self::Torch => 0.1,
            Self::Bedrock => return None,
        };
        Some(seconds)
    }

    /// The item left behind when this kind is broken, if any.
    pub fn drop_kind(self) -> Option<BlockKind> {
        match self {
            Self::Air | Self::Water | Self::Bedrock => None,
            other => Some(other),
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Dirt => "Dirt",
            Self::Grass => "Grass",
            Self::Stone => "Stone",
            Self::Wood => "Log",
            Self::Leaves => "Leaves",
            Self::Planks => "Planks",
            Self::Glass => "Glass",
            Self::Cobblestone => "Cobblestone",
            Self::Sand => "Sand",
            Self::Water => "Water",
            Self::Stick => "Stick",
            Self::Coal => "Coal",
            Self::Torch => "Torch",
            Self::CraftingTable => "Crafting Table",
            Self::Bedrock => "Bedrock",
        }
    }
}

impl TryFrom<u8> for BlockKind {
    type Error = UnknownBlockId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(UnknownBlockId(id))
    }
}

impl From<BlockKind> for u8 {
    fn from(kind: BlockKind) -> Self {
        kind.id()
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
