//! Block mining progress and placement checks.

use glam::Vec3;

use blockscape_voxel::{BlockKind, WorldPos};

use crate::collision::{Aabb, BodyShape};

/// Delay between consecutive breaks while holding the mine input in creative mode.
pub const CREATIVE_BREAK_DELAY: f32 = 0.15;

/// Margin by which the player's box is shrunk before the placement overlap test.
const PLACE_EPSILON: f32 = 0.01;

/// Result of advancing [`MiningProgress`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MiningState {
    /// Nothing is being mined.
    Idle,
    /// Mining is under way; carries the completed fraction in `[0, 1)`.
    Mining(f32),
    /// The target broke this step.
    Broken { cell: WorldPos, kind: BlockKind },
}

/// Tracks how long the mine input has been held on one cell.
#[derive(Clone, Debug, Default)]
pub struct MiningProgress {
    target: Option<WorldPos>,
    elapsed: f32,
    /// Creative mode: the first break while the input is held is instant.
    repeating: bool,
}

impl MiningProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell currently being mined.
    pub fn target(&self) -> Option<WorldPos> {
        self.target
    }

    /// Stops mining, as when the input is released.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances mining by `dt` seconds.
    ///
    /// `target` is the cell under the crosshair and its kind, `None` when
    /// nothing is targeted. Switching targets restarts the timer, and the step
    /// that switches already counts. Cells without a mining time never break
    /// in survival.
    pub fn update(
        &mut self,
        target: Option<(WorldPos, BlockKind)>,
        mining: bool,
        creative: bool,
        dt: f32,
    ) -> MiningState {
        let Some((cell, kind)) = target.filter(|(_, kind)| mining && kind.is_solid()) else {
            self.reset();
            return MiningState::Idle;
        };

        if self.target != Some(cell) {
            self.target = Some(cell);
            self.elapsed = 0.0;
        }

        let required = if creative {
            if self.repeating { CREATIVE_BREAK_DELAY } else { 0.0 }
        } else {
            match kind.mining_time() {
                Some(time) => time,
                None => return MiningState::Mining(0.0),
            }
        };

        self.elapsed += dt;
        if self.elapsed >= required {
            self.target = None;
            self.elapsed = 0.0;
            self.repeating = creative;
            MiningState::Broken { cell, kind }
        } else {
            MiningState::Mining(self.elapsed / required)
        }
    }
}

/// Returns `true` if `kind` may be placed at `cell` without overlapping a
/// player whose feet are at `feet`.
pub fn can_place(kind: BlockKind, cell: WorldPos, feet: Vec3, shape: &BodyShape) -> bool {
    if !kind.is_placeable() {
        return false;
    }
    let player = shape.outer_box(feet).shrink(PLACE_EPSILON);
    !player.intersects(&Aabb::cell(cell))
}
