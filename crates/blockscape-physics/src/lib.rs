//! Gameplay physics on the voxel grid: ray picking, box collision against
//! solid cells, and the bodies that move through the world (the player, a
//! follower, and item drops), plus block mining and placement rules.

pub mod collision;
pub mod drops;
pub mod follower;
pub mod interaction;
pub mod kinematics;
pub mod player;
pub mod raycast;

pub use collision::{Aabb, BodyShape, body_intersects, ceiling_above, floor_below, is_supported};
pub use drops::{DropSettings, Drops, ItemDrop};
pub use follower::{FollowerController, FollowerSettings, FollowerStep};
pub use interaction::{MiningProgress, MiningState, can_place};
pub use kinematics::{
    Axis, AxisOutcome, KinematicBody, MoveMode, StepOutcome, resolve_axis_move, step_body, try_step_up,
};
pub use player::{PlayerController, PlayerInput, PlayerSettings, PlayerStep, fall_damage};
pub use raycast::{RaycastHit, raycast};
