//! A ground-bound creature that chases a target across the terrain.

use glam::{Vec2, Vec3};

use blockscape_voxel::VoxelSource;

use crate::collision::{BodyShape, body_intersects};
use crate::kinematics::{KinematicBody, MoveMode, step_body, try_step_up};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowerSettings {
    pub speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    /// Stops chasing inside this horizontal distance.
    pub stop_distance: f32,
    /// Height probed above a blocking obstacle before jumping over it.
    pub step_probe: f32,
    /// Ledges at most this far above the feet are climbed without jumping.
    pub step_up: f32,
    /// Consecutive barely-moving steps after which a jump is forced.
    pub stuck_limit: u32,
    /// Horizontal movement per step below which the follower counts as stuck.
    pub stuck_epsilon: f32,
    pub spawn_distance: f32,
    pub spawn_height: f32,
    /// Horizontal offset from the target used when respawning.
    pub respawn_offset: Vec2,
    pub void_height: f32,
}

impl Default for FollowerSettings {
    fn default() -> Self {
        Self {
            speed: 4.0,
            jump_speed: 6.0,
            gravity: 20.0,
            stop_distance: 1.5,
            step_probe: 1.1,
            step_up: 0.5,
            stuck_limit: 30,
            stuck_epsilon: 0.001,
            spawn_distance: 45.0,
            spawn_height: 60.0,
            respawn_offset: Vec2::new(20.0, 20.0),
            void_height: -30.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FollowerStep {
    /// A jump was started this step.
    pub jumped: bool,
    /// The follower fell out of the world and was moved back near the target.
    pub respawned: bool,
}

#[derive(Clone, Debug)]
pub struct FollowerController {
    pub body: KinematicBody,
    pub shape: BodyShape,
    pub settings: FollowerSettings,
    stuck_steps: u32,
}

impl FollowerController {
    pub fn new(position: Vec3, settings: FollowerSettings) -> Self {
        Self {
            body: KinematicBody::new(position),
            shape: BodyShape::PLAYER,
            settings,
            stuck_steps: 0,
        }
    }

    /// Spawns `spawn_distance` away from `target` in the direction `angle`
    /// (radians around the Y axis), at the spawn height.
    pub fn spawn_near(target: Vec3, angle: f32, settings: FollowerSettings) -> Self {
        let (sin, cos) = angle.sin_cos();
        let position = Vec3::new(
            target.x + cos * settings.spawn_distance,
            settings.spawn_height,
            target.z + sin * settings.spawn_distance,
        );
        Self::new(position, settings)
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn stuck_steps(&self) -> u32 {
        self.stuck_steps
    }

    /// Advances the follower by `dt` seconds toward `target`.
    pub fn step<S: VoxelSource + ?Sized>(&mut self, world: &S, target: Vec3, dt: f32) -> FollowerStep {
        let s = self.settings;
        let mut result = FollowerStep::default();
        let start = self.body.position;

        let to_target = Vec2::new(target.x - start.x, target.z - start.z);
        let distance = to_target.length();
        let chasing = distance > s.stop_distance;
        let heading = if chasing {
            to_target / distance * s.speed
        } else {
            Vec2::ZERO
        };
        self.body.velocity.x = heading.x;
        self.body.velocity.z = heading.y;
        self.body.velocity.y -= s.gravity * dt;

        let was_grounded = self.body.grounded;
        let displacement = self.body.velocity * dt;
        let outcome = step_body(world, &mut self.body, &self.shape, displacement, MoveMode::Walking, false);

        let mut obstacle = Vec3::ZERO;
        if outcome.blocked_x {
            obstacle.x = displacement.x;
        }
        if outcome.blocked_z {
            obstacle.z = displacement.z;
        }
        let blocked = chasing && obstacle != Vec3::ZERO;
        let climbed = blocked && try_step_up(world, &mut self.body, &self.shape, obstacle, s.step_up);

        if chasing && was_grounded {
            if blocked && !climbed {
                let probe = self.body.position + obstacle + Vec3::new(0.0, s.step_probe, 0.0);
                if !body_intersects(world, probe, &self.shape) {
                    result.jumped = self.jump();
                }
            }

            let moved = Vec2::new(
                self.body.position.x - start.x,
                self.body.position.z - start.z,
            )
            .length();
            if moved < s.stuck_epsilon {
                self.stuck_steps += 1;
            } else {
                self.stuck_steps = 0;
            }
            if self.stuck_steps > s.stuck_limit {
                result.jumped = self.jump();
                self.stuck_steps = 0;
            }
        }

        if self.body.position.y < s.void_height {
            self.body = KinematicBody::new(Vec3::new(
                target.x + s.respawn_offset.x,
                s.spawn_height,
                target.z + s.respawn_offset.y,
            ));
            self.stuck_steps = 0;
            result.respawned = true;
            tracing::debug!(x = self.body.position.x, z = self.body.position.z, "follower respawned");
        }

        result
    }

    fn jump(&mut self) -> bool {
        if !self.body.grounded {
            return false;
        }
        self.body.velocity.y = self.settings.jump_speed;
        self.body.grounded = false;
        true
    }
}
