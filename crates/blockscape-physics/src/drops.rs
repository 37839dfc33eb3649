//! Item drops: small boxes that pop out of broken blocks, settle on the
//! ground and wait to be collected.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use blockscape_voxel::{BlockKind, VoxelSource};

use crate::collision::BodyShape;
use crate::kinematics::{KinematicBody, MoveMode, step_body};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropSettings {
    pub gravity: f32,
    /// Horizontal velocity multiplier applied on ground contact.
    pub friction: f32,
    /// Seconds before an uncollected drop disappears.
    pub lifetime: f32,
    /// Squared distance within which a collector picks drops up.
    pub pickup_radius_sq: f32,
    /// Upward velocity given on spawn.
    pub pop_speed: f32,
    /// Width of the random horizontal spawn velocity range.
    pub scatter: f32,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            gravity: 18.0,
            friction: 0.6,
            lifetime: 300.0,
            pickup_radius_sq: 2.5,
            pop_speed: 4.0,
            scatter: 4.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ItemDrop {
    pub id: u64,
    pub kind: BlockKind,
    pub body: KinematicBody,
    /// Seconds since spawn.
    pub age: f32,
}

impl ItemDrop {
    /// Center of the drop's box.
    pub fn center(&self) -> Vec3 {
        self.body.position + Vec3::new(0.0, BodyShape::DROP.height * 0.5, 0.0)
    }
}

/// Every live drop in the world.
#[derive(Debug)]
pub struct Drops {
    items: Vec<ItemDrop>,
    next_id: u64,
    rng: ChaCha8Rng,
    settings: DropSettings,
}

impl Drops {
    /// Creates an empty set whose spawn velocities come from `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, DropSettings::default())
    }

    pub fn with_settings(seed: u64, settings: DropSettings) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            settings,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDrop> {
        self.items.iter()
    }

    /// Spawns a drop of `kind` centered at `center` with a small random pop.
    /// Returns its id.
    pub fn spawn(&mut self, kind: BlockKind, center: Vec3) -> u64 {
        let half = self.settings.scatter * 0.5;
        let velocity = Vec3::new(
            self.rng.random_range(-half..half),
            self.settings.pop_speed,
            self.rng.random_range(-half..half),
        );
        let feet = center - Vec3::new(0.0, BodyShape::DROP.height * 0.5, 0.0);

        let id = self.next_id;
        self.next_id += 1;
        self.items.push(ItemDrop {
            id,
            kind,
            body: KinematicBody {
                velocity,
                ..KinematicBody::new(feet)
            },
            age: 0.0,
        });
        tracing::trace!(id, kind = %kind, "spawned drop");
        id
    }

    /// Ages, expires and moves every drop.
    pub fn step<S: VoxelSource + ?Sized>(&mut self, world: &S, dt: f32) {
        let s = self.settings;
        let before = self.items.len();
        self.items.retain_mut(|item| {
            item.age += dt;
            if item.age > s.lifetime {
                return false;
            }

            item.body.velocity.y -= s.gravity * dt;
            let displacement = item.body.velocity * dt;
            let outcome = step_body(world, &mut item.body, &BodyShape::DROP, displacement, MoveMode::Walking, false);

            if outcome.blocked_x {
                item.body.velocity.x = 0.0;
            }
            if outcome.blocked_z {
                item.body.velocity.z = 0.0;
            }
            if outcome.landed {
                item.body.velocity.x *= s.friction;
                item.body.velocity.z *= s.friction;
            }
            true
        });

        let expired = before - self.items.len();
        if expired > 0 {
            tracing::debug!(expired, remaining = self.items.len(), "drops expired");
        }
    }

    /// Collects drops near `collector`. Each candidate is offered to
    /// `accept`; drops it takes are removed and returned.
    pub fn collect<F>(&mut self, collector: Vec3, mut accept: F) -> Vec<BlockKind>
    where
        F: FnMut(BlockKind) -> bool,
    {
        let radius_sq = self.settings.pickup_radius_sq;
        let mut taken = Vec::new();
        self.items.retain(|item| {
            if item.center().distance_squared(collector) < radius_sq && accept(item.kind) {
                taken.push(item.kind);
                false
            } else {
                true
            }
        });
        taken
    }
}
