//! Swept movement of box bodies through the voxel grid.
//!
//! Motion is applied one axis at a time (X, then Z, then Y) and split into
//! sub-steps no longer than [`MAX_SUBSTEP_LENGTH`], so a fast body cannot
//! skip over a one-cell wall.

use glam::Vec3;

use blockscape_voxel::VoxelSource;

use crate::collision::{BodyShape, body_intersects, ceiling_above, floor_below, is_supported};

/// Longest distance covered by a single sub-step.
pub const MAX_SUBSTEP_LENGTH: f32 = 0.2;

/// Upper bound on sub-steps per call, reached only by absurd displacements.
const MAX_SUBSTEPS: u32 = 512;

/// Feet snap onto a floor only when they sank less than this below its top.
const FLOOR_SNAP_TOLERANCE: f32 = 0.5;

/// Gap left between the head and a ceiling after snapping.
const CEILING_GAP: f32 = 0.01;

/// State of a moving box body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KinematicBody {
    /// Center of the feet.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Resting on solid ground after the last vertical step.
    pub grounded: bool,
    /// Unsupported fall accumulated since the body last touched ground.
    pub fall_distance: f32,
}

impl KinematicBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// How vertical collisions are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveMode {
    /// Gravity-driven: floors and ceilings snap the body.
    Walking,
    /// In liquid: collisions only stop the body.
    Swimming,
    /// Free flight: collisions only stop the body.
    Flying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Result of moving along a single axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisOutcome {
    /// The full delta was applied.
    Moved,
    /// The move was reverted.
    Blocked,
    /// A downward move ended on the ground. Carries the fall distance that
    /// was accumulated before touching down.
    Landed { fall_distance: f32 },
    /// An upward move struck a ceiling.
    HitCeiling,
}

/// Summary of one [`step_body`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// The body touched ground during the step.
    pub landed: bool,
    /// Largest fall distance reported on landing.
    pub fall_distance: f32,
    pub blocked_x: bool,
    pub blocked_z: bool,
    pub hit_ceiling: bool,
}

/// Moves `body` by `delta` along one axis, resolving collisions.
///
/// Horizontal moves that end inside a solid cell are reverted. With
/// `crouch_guard`, a grounded walking body also refuses horizontal moves
/// that would leave it without ground underneath.
///
/// Vertical moves in [`MoveMode::Walking`] snap: falling into a floor puts
/// the feet exactly on its top surface, grounds the body and clears its
/// vertical velocity and fall accumulator; rising into a ceiling puts the
/// head just below it.
pub fn resolve_axis_move<S: VoxelSource + ?Sized>(
    world: &S,
    body: &mut KinematicBody,
    shape: &BodyShape,
    axis: Axis,
    delta: f32,
    mode: MoveMode,
    crouch_guard: bool,
) -> AxisOutcome {
    if delta == 0.0 {
        return AxisOutcome::Moved;
    }

    let previous = body.position;
    body.position[axis.index()] += delta;
    let blocked = body_intersects(world, body.position, shape);

    if axis != Axis::Y {
        let ledge = !blocked
            && crouch_guard
            && body.grounded
            && mode == MoveMode::Walking
            && !is_supported(world, body.position, shape);
        if blocked || ledge {
            body.position = previous;
            return AxisOutcome::Blocked;
        }
        return AxisOutcome::Moved;
    }

    if !blocked {
        return AxisOutcome::Moved;
    }

    if mode != MoveMode::Walking {
        body.position = previous;
        body.velocity.y = 0.0;
        if delta < 0.0 {
            body.grounded = true;
            body.fall_distance = 0.0;
        }
        return AxisOutcome::Blocked;
    }

    if delta < 0.0 {
        land(world, body, shape, previous)
    } else {
        match ceiling_above(world, body.position, shape) {
            Some(ceiling) => {
                let feet = ceiling as f32 - CEILING_GAP - shape.height;
                body.position.y = if feet >= previous.y { feet } else { previous.y };
            }
            None => body.position = previous,
        }
        body.velocity.y = 0.0;
        AxisOutcome::HitCeiling
    }
}

fn land<S: VoxelSource + ?Sized>(
    world: &S,
    body: &mut KinematicBody,
    shape: &BodyShape,
    previous: Vec3,
) -> AxisOutcome {
    let fall_distance = body.fall_distance;
    body.velocity.y = 0.0;

    match floor_below(world, body.position, shape) {
        Some(floor) => {
            let top = (floor + 1) as f32;
            if top - body.position.y < FLOOR_SNAP_TOLERANCE {
                body.position.y = top;
                body.grounded = true;
                body.fall_distance = 0.0;
                AxisOutcome::Landed { fall_distance }
            } else {
                body.position = previous;
                AxisOutcome::Blocked
            }
        }
        None => {
            body.position = previous;
            body.grounded = true;
            body.fall_distance = 0.0;
            AxisOutcome::Landed { fall_distance: 0.0 }
        }
    }
}

/// Lifts the body onto the next cell top and applies the blocked horizontal
/// `delta`, provided the top is at most `max_rise` above the feet and the
/// raised position is free. Grounds the body on success.
pub fn try_step_up<S: VoxelSource + ?Sized>(
    world: &S,
    body: &mut KinematicBody,
    shape: &BodyShape,
    delta: Vec3,
    max_rise: f32,
) -> bool {
    let top = body.position.y.floor() + 1.0;
    if top - body.position.y > max_rise {
        return false;
    }
    let raised = Vec3::new(body.position.x + delta.x, top, body.position.z + delta.z);
    if body_intersects(world, raised, shape) {
        return false;
    }
    body.position = raised;
    body.velocity.y = 0.0;
    body.grounded = true;
    body.fall_distance = 0.0;
    true
}

/// Moves `body` by `displacement`, sub-stepping so no single step exceeds
/// [`MAX_SUBSTEP_LENGTH`].
///
/// The body's `grounded` flag reflects the last vertical sub-step: a
/// walking body that moved vertically without touching ground is airborne.
pub fn step_body<S: VoxelSource + ?Sized>(
    world: &S,
    body: &mut KinematicBody,
    shape: &BodyShape,
    displacement: Vec3,
    mode: MoveMode,
    crouch_guard: bool,
) -> StepOutcome {
    let length = displacement.length();
    let steps = ((length / MAX_SUBSTEP_LENGTH).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let step = displacement / steps as f32;
    let mut outcome = StepOutcome::default();

    for i in 0..steps {
        let last = i + 1 == steps;

        if resolve_axis_move(world, body, shape, Axis::X, step.x, mode, crouch_guard) == AxisOutcome::Blocked {
            outcome.blocked_x = true;
        }
        if resolve_axis_move(world, body, shape, Axis::Z, step.z, mode, crouch_guard) == AxisOutcome::Blocked {
            outcome.blocked_z = true;
        }

        match resolve_axis_move(world, body, shape, Axis::Y, step.y, mode, crouch_guard) {
            AxisOutcome::Landed { fall_distance } => {
                outcome.landed = true;
                outcome.fall_distance = outcome.fall_distance.max(fall_distance);
            }
            AxisOutcome::HitCeiling => {
                outcome.hit_ceiling = true;
                if last {
                    body.grounded = false;
                }
            }
            AxisOutcome::Blocked => {}
            AxisOutcome::Moved => {
                if last && step.y != 0.0 {
                    body.grounded = false;
                }
            }
        }
    }

    tracing::trace!(
        x = body.position.x,
        y = body.position.y,
        z = body.position.z,
        steps,
        grounded = body.grounded,
        "stepped body"
    );
    outcome
}
