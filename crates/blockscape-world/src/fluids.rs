//! Liquid propagation over the active fluid set.
//!
//! One tick is a single atomic batch: every decision reads the world as it
//! was when the tick started, then all conversions are written at once.
//! Cells converted during a tick only become eligible to flow on the next
//! one. Liquid never depletes and never recedes.

use rustc_hash::FxHashSet;

use blockscape_voxel::{BlockKind, WorldPos};

use crate::world::VoxelWorld;

/// Summary of one fluid tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FluidTickReport {
    /// Active cells examined this tick.
    pub processed: usize,
    /// Cells converted to liquid this tick.
    pub converted: usize,
    /// Size of the active set after the tick.
    pub active_after: usize,
}

impl VoxelWorld {
    /// Advances liquid propagation by one step.
    ///
    /// Each active liquid cell flows into an empty cell below it. If the cell
    /// below is solid or liquid instead, it flows into every empty horizontal
    /// neighbor. Cells that flowed stay active, as do cells that lost a target
    /// to an earlier source this tick; the rest drop out.
    pub fn tick_fluids(&mut self) -> FluidTickReport {
        if self.active_fluids.is_empty() {
            return FluidTickReport::default();
        }

        let mut sources: Vec<WorldPos> = self.active_fluids.drain().collect();
        // Stable order keeps the write sequence reproducible.
        sources.sort_unstable_by_key(|p| (p.y, p.x, p.z));

        let mut fills: Vec<WorldPos> = Vec::new();
        let mut claimed: FxHashSet<WorldPos> = FxHashSet::default();
        let mut still_flowing: Vec<WorldPos> = Vec::new();

        for &source in &sources {
            if !self.resolve(source).is_liquid() {
                continue;
            }

            let below = source.below();
            let targets: Vec<WorldPos> = if self.resolve(below).is_air() {
                vec![below]
            } else {
                WorldPos::HORIZONTAL_OFFSETS
                    .iter()
                    .map(|&(dx, dz)| source.offset(dx, 0, dz))
                    .filter(|&side| self.resolve(side).is_air())
                    .collect()
            };

            // A target taken by another source turns to liquid at the end of
            // the tick; the source re-checks its surroundings next tick.
            let mut keep = false;
            for target in targets {
                keep |= match self.claim(target, &mut claimed, &mut fills) {
                    Claim::Taken | Claim::Contested => true,
                    Claim::Unwritable => false,
                };
            }

            if keep {
                still_flowing.push(source);
            }
        }

        for &cell in &fills {
            self.place(cell, BlockKind::Water);
        }
        self.active_fluids.extend(still_flowing);

        let report = FluidTickReport {
            processed: sources.len(),
            converted: fills.len(),
            active_after: self.active_fluids.len(),
        };
        tracing::debug!(
            processed = report.processed,
            converted = report.converted,
            active = report.active_after,
            "fluid tick"
        );
        report
    }

    /// Reserves `cell` for conversion this tick.
    fn claim(
        &self,
        cell: WorldPos,
        claimed: &mut FxHashSet<WorldPos>,
        fills: &mut Vec<WorldPos>,
    ) -> Claim {
        if !Self::is_writable(cell) {
            return Claim::Unwritable;
        }
        if !claimed.insert(cell) {
            return Claim::Contested;
        }
        fills.push(cell);
        Claim::Taken
    }
}

/// Outcome of reserving a cell during a fluid tick.
enum Claim {
    Taken,
    /// Another source reserved the cell earlier in the same tick.
    Contested,
    Unwritable,
}
