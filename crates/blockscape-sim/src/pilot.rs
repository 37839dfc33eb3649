//! Scripted stand-in for a human player.

use glam::{Vec2, Vec3};

use blockscape_physics::PlayerInput;

/// Seconds spent standing still after spawn.
const SETTLE_TIME: f32 = 1.0;
/// Length of one walk-then-mine cycle.
const CYCLE: f32 = 4.0;
/// Walking part at the start of each cycle.
const WALK_TIME: f32 = 1.5;
/// The jump input is held for this long at the start of a walk.
const JUMP_TIME: f32 = 0.1;
/// Heading change between cycles, in radians.
const TURN_PER_CYCLE: f32 = 1.2;
/// Downward look angle while mining, in radians.
const LOOK_PITCH: f32 = -0.6;
/// Time after which the pilot tries to pour water.
const WATER_TIME: f32 = 3.0;

/// What the pilot does during one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PilotCommand {
    pub input: PlayerInput,
    /// Unit look direction.
    pub look: Vec3,
    /// Mine input held.
    pub mine: bool,
    /// Pour water at the looked-at face.
    pub pour: bool,
}

/// Alternates between walking in a new direction and mining what is in
/// front of the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pilot;

impl Pilot {
    pub fn command(&self, elapsed: f32) -> PilotCommand {
        let mut command = PilotCommand {
            input: PlayerInput::default(),
            look: look_direction(0.0),
            mine: false,
            pour: false,
        };
        if elapsed < SETTLE_TIME {
            return command;
        }

        let t = elapsed - SETTLE_TIME;
        let cycle = (t / CYCLE).floor();
        let phase = t - cycle * CYCLE;
        let yaw = cycle * TURN_PER_CYCLE;
        command.look = look_direction(yaw);

        if phase < WALK_TIME {
            command.input.wish_dir = Vec2::new(yaw.cos(), yaw.sin());
            command.input.jump = phase < JUMP_TIME;
        } else {
            command.mine = true;
            command.pour = elapsed >= WATER_TIME;
        }
        command
    }
}

fn look_direction(yaw: f32) -> Vec3 {
    let (sin_pitch, cos_pitch) = LOOK_PITCH.sin_cos();
    Vec3::new(yaw.cos() * cos_pitch, sin_pitch, yaw.sin() * cos_pitch)
}
