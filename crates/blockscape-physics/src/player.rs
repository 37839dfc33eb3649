//! Player movement: walking, jumping, crouching, swimming and flight on top
//! of the shared box kinematics.

use glam::{Vec2, Vec3};

use blockscape_voxel::{VoxelSource, WorldPos};

use crate::collision::{BodyShape, body_intersects};
use crate::kinematics::{KinematicBody, MoveMode, step_body};

/// Falls up to this many cells are harmless.
pub const SAFE_FALL_DISTANCE: f32 = 3.0;

/// Damage taken after an unsupported fall of `fall_distance` cells.
pub fn fall_damage(fall_distance: f32) -> u32 {
    if fall_distance > SAFE_FALL_DISTANCE {
        (fall_distance - SAFE_FALL_DISTANCE).floor() as u32
    } else {
        0
    }
}

/// Movement tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSettings {
    pub gravity: f32,
    pub walk_speed: f32,
    pub fly_speed: f32,
    pub jump_speed: f32,
    /// Walk speed multiplier while crouching.
    pub crouch_speed_factor: f32,
    pub stand_height: f32,
    pub crouch_height: f32,
    /// Rate at which the body height moves toward its target, per second.
    pub height_change_rate: f32,
    /// Fraction of gravity applied in liquid.
    pub swim_gravity_factor: f32,
    /// Vertical velocity multiplier applied every step in liquid.
    pub swim_damping: f32,
    /// Vertical speed when swimming up or diving.
    pub swim_speed: f32,
    /// Distance from the top of the head down to the eyes.
    pub eye_offset: f32,
    /// Bodies below this height have fallen out of the world.
    pub void_height: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            gravity: 18.0,
            walk_speed: 5.0,
            fly_speed: 10.0,
            jump_speed: 7.0,
            crouch_speed_factor: 0.4,
            stand_height: 1.8,
            crouch_height: 1.5,
            height_change_rate: 10.0,
            swim_gravity_factor: 0.2,
            swim_damping: 0.8,
            swim_speed: 3.0,
            eye_offset: 0.2,
            void_height: -30.0,
        }
    }
}

/// Movement intent for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Desired horizontal direction on X/Z. Normalized internally.
    pub wish_dir: Vec2,
    pub jump: bool,
    pub crouch: bool,
}

/// What happened during one [`PlayerController::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerStep {
    pub landed: bool,
    pub swimming: bool,
    /// Damage from a fall that ended this step. Always zero in creative mode.
    pub fall_damage: u32,
    /// The body dropped below the void height.
    pub in_void: bool,
}

#[derive(Clone, Debug)]
pub struct PlayerController {
    pub body: KinematicBody,
    pub shape: BodyShape,
    pub settings: PlayerSettings,
    pub flying: bool,
    pub creative: bool,
}

impl PlayerController {
    /// Creates a standing player with its feet at `spawn`.
    pub fn new(spawn: Vec3, settings: PlayerSettings) -> Self {
        Self {
            body: KinematicBody::new(spawn),
            shape: BodyShape::PLAYER.with_height(settings.stand_height),
            settings,
            flying: false,
            creative: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn eye_position(&self) -> Vec3 {
        self.body.position + Vec3::new(0.0, self.shape.height - self.settings.eye_offset, 0.0)
    }

    /// Center of the body box.
    pub fn center(&self) -> Vec3 {
        self.body.position + Vec3::new(0.0, self.shape.height * 0.5, 0.0)
    }

    /// Moves the player and clears its motion.
    pub fn teleport(&mut self, feet: Vec3) {
        self.body = KinematicBody::new(feet);
    }

    /// Returns `true` if the cell at the feet or at the head holds liquid.
    pub fn is_swimming<S: VoxelSource + ?Sized>(&self, world: &S) -> bool {
        let feet = self.body.position;
        let low = WorldPos::containing(feet.x, feet.y + 0.1, feet.z);
        let high = WorldPos::containing(feet.x, feet.y + self.shape.height - 0.1, feet.z);
        world.block(low).is_liquid() || world.block(high).is_liquid()
    }

    /// Advances the player by `dt` seconds.
    pub fn step<S: VoxelSource + ?Sized>(&mut self, world: &S, input: &PlayerInput, dt: f32) -> PlayerStep {
        self.update_height(world, input.crouch, dt);

        let s = self.settings;
        let swimming = !self.flying && self.is_swimming(world);

        let speed = if self.flying {
            s.fly_speed
        } else if input.crouch {
            s.walk_speed * s.crouch_speed_factor
        } else {
            s.walk_speed
        };
        let horizontal = input.wish_dir.normalize_or_zero() * speed;
        self.body.velocity.x = horizontal.x;
        self.body.velocity.z = horizontal.y;

        let mode = if self.flying {
            self.body.velocity.y = if input.jump {
                s.fly_speed
            } else if input.crouch {
                -s.fly_speed
            } else {
                0.0
            };
            self.body.fall_distance = 0.0;
            MoveMode::Flying
        } else if swimming {
            self.body.velocity.y -= s.gravity * dt * s.swim_gravity_factor;
            self.body.velocity.y *= s.swim_damping;
            if input.jump {
                self.body.velocity.y = s.swim_speed;
            } else if input.crouch {
                self.body.velocity.y = -s.swim_speed;
            }
            self.body.fall_distance = 0.0;
            MoveMode::Swimming
        } else {
            self.body.velocity.y -= s.gravity * dt;
            if input.jump && self.body.grounded {
                self.body.velocity.y = s.jump_speed;
                self.body.grounded = false;
            }
            if !self.body.grounded && self.body.velocity.y < 0.0 {
                self.body.fall_distance += -self.body.velocity.y * dt;
            }
            MoveMode::Walking
        };

        let displacement = self.body.velocity * dt;
        let outcome = step_body(world, &mut self.body, &self.shape, displacement, mode, input.crouch);

        let damage = if outcome.landed && mode == MoveMode::Walking && !self.creative {
            fall_damage(outcome.fall_distance)
        } else {
            0
        };
        if damage > 0 {
            tracing::debug!(damage, fall = outcome.fall_distance, "fall damage");
        }

        PlayerStep {
            landed: outcome.landed,
            swimming,
            fall_damage: damage,
            in_void: self.body.position.y < s.void_height,
        }
    }

    /// Moves the body height toward the crouch or stand height. Growth is
    /// refused while something blocks the taller box.
    fn update_height<S: VoxelSource + ?Sized>(&mut self, world: &S, crouch: bool, dt: f32) {
        let s = &self.settings;
        let target = if crouch { s.crouch_height } else { s.stand_height };
        let change = s.height_change_rate * dt;
        let current = self.shape.height;

        if current > target {
            self.shape.height = (current - change).max(target);
        } else if current < target {
            let grown = self.shape.with_height((current + change).min(target));
            if !body_intersects(world, self.body.position, &grown) {
                self.shape = grown;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use blockscape_voxel::BlockKind;

    use super::*;

    struct TestWorld {
        blocks: HashMap<(i32, i32, i32), BlockKind>,
    }

    impl TestWorld {
        fn with_floor(top: i32) -> Self {
            let mut blocks = HashMap::new();
            for x in -8..=8 {
                for z in -8..=8 {
                    blocks.insert((x, top - 1, z), BlockKind::Grass);
                }
            }
            Self { blocks }
        }

        fn set(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) {
            self.blocks.insert((x, y, z), kind);
        }
    }

    impl VoxelSource for TestWorld {
        fn block(&self, pos: WorldPos) -> BlockKind {
            self.blocks
                .get(&(pos.x, pos.y, pos.z))
                .copied()
                .unwrap_or(BlockKind::Air)
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn run(player: &mut PlayerController, world: &TestWorld, input: PlayerInput, frames: u32) -> PlayerStep {
        let mut total = PlayerStep::default();
        for _ in 0..frames {
            let step = player.step(world, &input, DT);
            total.landed |= step.landed;
            total.swimming |= step.swimming;
            total.fall_damage += step.fall_damage;
            total.in_void |= step.in_void;
        }
        total
    }

    #[test]
    fn test_fall_damage_thresholds() {
        assert_eq!(fall_damage(2.9), 0);
        assert_eq!(fall_damage(3.0), 0);
        assert_eq!(fall_damage(3.5), 0);
        assert_eq!(fall_damage(4.0), 1);
        assert_eq!(fall_damage(10.2), 7);
    }

    #[test]
    fn test_player_settles_on_ground() {
        let world = TestWorld::with_floor(10);
        let mut player = PlayerController::new(Vec3::new(0.5, 11.0, 0.5), PlayerSettings::default());
        let result = run(&mut player, &world, PlayerInput::default(), 60);
        assert!(result.landed);
        assert_eq!(result.fall_damage, 0);
        assert_eq!(player.position().y, 10.0);
        assert!(player.body.grounded);
    }

    #[test]
    fn test_long_fall_hurts_in_survival_only() {
        let world = TestWorld::with_floor(10);
        let mut player = PlayerController::new(Vec3::new(0.5, 20.0, 0.5), PlayerSettings::default());
        let result = run(&mut player, &world, PlayerInput::default(), 120);
        assert!(result.fall_damage >= 5, "damage {}", result.fall_damage);

        let mut creative = PlayerController::new(Vec3::new(0.5, 20.0, 0.5), PlayerSettings::default());
        creative.creative = true;
        let result = run(&mut creative, &world, PlayerInput::default(), 120);
        assert_eq!(result.fall_damage, 0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let world = TestWorld::with_floor(10);
        let mut player = PlayerController::new(Vec3::new(0.5, 10.0, 0.5), PlayerSettings::default());
        run(&mut player, &world, PlayerInput::default(), 5);

        let jump = PlayerInput {
            jump: true,
            ..PlayerInput::default()
        };
        player.step(&world, &jump, DT);
        assert!(player.position().y > 10.0);
        let after_first = player.body.velocity.y;
        player.step(&world, &jump, DT);
        assert!(player.body.velocity.y < after_first);
    }

    #[test]
    fn test_walk_speed_and_crouch_factor() {
        let world = TestWorld::with_floor(10);
        let walk = PlayerInput {
            wish_dir: Vec2::new(0.0, 1.0),
            ..PlayerInput::default()
        };
        let mut player = PlayerController::new(Vec3::new(0.5, 10.0, 0.5), PlayerSettings::default());
        run(&mut player, &world, walk, 60);
        assert!((player.position().z - 5.5).abs() < 0.05);

        let crouch = PlayerInput {
            crouch: true,
            ..walk
        };
        let mut sneaking = PlayerController::new(Vec3::new(0.5, 10.0, 0.5), PlayerSettings::default());
        run(&mut sneaking, &world, crouch, 60);
        assert!((sneaking.position().z - 2.5).abs() < 0.05);
        assert_eq!(sneaking.shape.height, 1.5);
    }

    #[test]
    fn test_stand_up_refused_under_low_ceiling() {
        let mut world = TestWorld::with_floor(10);
        let settings = PlayerSettings {
            crouch_height: 0.9,
            ..PlayerSettings::default()
        };
        let mut player = PlayerController::new(Vec3::new(0.5, 10.0, 0.5), settings);
        let crouch = PlayerInput {
            crouch: true,
            ..PlayerInput::default()
        };
        run(&mut player, &world, crouch, 10);
        assert_eq!(player.shape.height, 0.9);

        world.set(0, 11, 0, BlockKind::Stone);
        run(&mut player, &world, PlayerInput::default(), 10);
        assert_eq!(player.shape.height, 0.9);

        world.set(0, 11, 0, BlockKind::Air);
        run(&mut player, &world, PlayerInput::default(), 10);
        assert_eq!(player.shape.height, 1.8);
    }

    #[test]
    fn test_swimming_damps_sinking() {
        let mut world = TestWorld::with_floor(0);
        for y in 0..8 {
            world.set(0, y, 0, BlockKind::Water);
        }
        let mut player = PlayerController::new(Vec3::new(0.5, 5.0, 0.5), PlayerSettings::default());
        let result = run(&mut player, &world, PlayerInput::default(), 10);
        assert!(result.swimming);
        assert!(player.body.velocity.y > -1.0);
        assert!(player.position().y > 4.5);
    }

    #[test]
    fn test_flying_ignores_gravity() {
        let world = TestWorld::with_floor(10);
        let mut player = PlayerController::new(Vec3::new(0.5, 20.0, 0.5), PlayerSettings::default());
        player.flying = true;
        run(&mut player, &world, PlayerInput::default(), 30);
        assert_eq!(player.position().y, 20.0);
    }

    #[test]
    fn test_void_detection() {
        let world = TestWorld::with_floor(10);
        let mut player = PlayerController::new(Vec3::new(100.5, -29.0, 0.5), PlayerSettings::default());
        let result = run(&mut player, &world, PlayerInput::default(), 30);
        assert!(result.in_void);
    }
}
