//! Voxel raycasting using the DDA (Amanatides & Woo) algorithm.
//!
//! Cells span `[n, n + 1)` on every axis, so the cell holding a point is the
//! floor of its coordinates. The traversal stops on the first cell that is
//! neither empty nor liquid.

use glam::{IVec3, Vec3};

use blockscape_voxel::{BlockKind, VoxelSource, WorldPos};

/// Result of a successful voxel raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// The cell that was hit.
    pub cell: WorldPos,
    /// Normal of the entry face. Zero when the ray starts inside the cell.
    pub normal: IVec3,
    /// Parametric distance from the origin to the entry face.
    pub distance: f32,
    /// Kind of the hit cell.
    pub kind: BlockKind,
}

impl RaycastHit {
    /// The empty cell in front of the struck face, where a block would be placed.
    pub fn adjacent(&self) -> WorldPos {
        self.cell.offset(self.normal.x, self.normal.y, self.normal.z)
    }
}

/// Casts a ray through the voxel grid.
///
/// `direction` does not need to be normalized; distances are measured along
/// its normalized form. Returns `None` when nothing solid lies within
/// `max_distance`, when the direction is zero, or when the step cap of
/// `3 × max_distance` cells is exhausted.
pub fn raycast<S: VoxelSource + ?Sized>(
    world: &S,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RaycastHit> {
    let dir = direction.try_normalize()?;
    if !origin.is_finite() || max_distance < 0.0 {
        return None;
    }

    let start = origin.floor();
    let sub_offset = origin - start;
    let mut cell = start.as_ivec3();

    let step = IVec3::new(step_sign(dir.x), step_sign(dir.y), step_sign(dir.z));

    // Distance in t-units to cross one full cell on each axis.
    let t_delta = Vec3::new(
        safe_inv(dir.x.abs()),
        safe_inv(dir.y.abs()),
        safe_inv(dir.z.abs()),
    );

    // Distance in t-units to the first cell boundary on each axis.
    let mut t_max = Vec3::new(
        initial_t_max(sub_offset.x, dir.x, t_delta.x),
        initial_t_max(sub_offset.y, dir.y, t_delta.y),
        initial_t_max(sub_offset.z, dir.z, t_delta.z),
    );

    let max_steps = (max_distance * 3.0).ceil() as u32;
    let mut normal = IVec3::ZERO;
    let mut t = 0.0_f32;

    for _ in 0..=max_steps {
        let pos = WorldPos::new(cell.x, cell.y, cell.z);
        let kind = world.block(pos);
        if kind.is_solid() {
            return Some(RaycastHit {
                cell: pos,
                normal,
                distance: t,
                kind,
            });
        }

        // Advance along the axis with the smallest t_max.
        if t_max.x < t_max.y && t_max.x < t_max.z {
            t = t_max.x;
            t_max.x += t_delta.x;
            cell.x += step.x;
            normal = IVec3::new(-step.x, 0, 0);
        } else if t_max.y < t_max.z {
            t = t_max.y;
            t_max.y += t_delta.y;
            cell.y += step.y;
            normal = IVec3::new(0, -step.y, 0);
        } else {
            t = t_max.z;
            t_max.z += t_delta.z;
            cell.z += step.z;
            normal = IVec3::new(0, 0, -step.z);
        }

        if t > max_distance {
            return None;
        }
    }

    tracing::trace!(max_distance, "raycast hit step cap");
    None
}

fn step_sign(component: f32) -> i32 {
    if component >= 0.0 { 1 } else { -1 }
}

/// Safely compute 1.0 / x, clamping to `f32::MAX` when x ≈ 0.
fn safe_inv(x: f32) -> f32 {
    if x.abs() < f32::EPSILON {
        f32::MAX
    } else {
        1.0 / x
    }
}

/// Compute the initial parametric distance to the first cell boundary.
fn initial_t_max(sub: f32, dir_component: f32, t_delta: f32) -> f32 {
    if dir_component > 0.0 {
        (1.0 - sub) * t_delta
    } else if dir_component < 0.0 {
        sub * t_delta
    } else {
        f32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Simple test world backed by a hash map.
    struct TestWorld {
        blocks: HashMap<(i32, i32, i32), BlockKind>,
    }

    impl TestWorld {
        fn new() -> Self {
            Self {
                blocks: HashMap::new(),
            }
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

    const CENTER: Vec3 = Vec3::new(0.5, 0.5, 0.5);

    #[test]
    fn test_ray_hits_cell_along_x() {
        let mut world = TestWorld::new();
        world.set(3, 0, 0, BlockKind::Stone);

        let hit = raycast(&world, CENTER, Vec3::X, 10.0).expect("should hit");
        assert_eq!(hit.cell, WorldPos::new(3, 0, 0));
        assert_eq!(hit.normal, IVec3::new(-1, 0, 0));
        assert!((hit.distance - 2.5).abs() < 1e-5);
        assert_eq!(hit.kind, BlockKind::Stone);
        assert_eq!(hit.adjacent(), WorldPos::new(2, 0, 0));
    }

    #[test]
    fn test_ray_misses_empty_space() {
        let world = TestWorld::new();
        assert!(raycast(&world, CENTER, Vec3::new(1.0, 0.2, -0.3), 100.0).is_none());
    }

    #[test]
    fn test_hit_face_normal_correct() {
        let cases = [
            (Vec3::NEG_X, (-5, 0, 0), IVec3::new(1, 0, 0)),
            (Vec3::Y, (0, 5, 0), IVec3::new(0, -1, 0)),
            (Vec3::NEG_Y, (0, -5, 0), IVec3::new(0, 1, 0)),
            (Vec3::Z, (0, 0, 5), IVec3::new(0, 0, -1)),
            (Vec3::NEG_Z, (0, 0, -5), IVec3::new(0, 0, 1)),
        ];
        for (dir, (x, y, z), expected) in cases {
            let mut world = TestWorld::new();
            world.set(x, y, z, BlockKind::Dirt);
            let hit = raycast(&world, CENTER, dir, 10.0).expect("should hit");
            assert_eq!(hit.cell, WorldPos::new(x, y, z), "{dir:?}");
            assert_eq!(hit.normal, expected, "{dir:?}");
            assert!((hit.distance - 4.5).abs() < 1e-4, "{dir:?}");
        }
    }

    #[test]
    fn test_max_distance_limits_search() {
        let mut world = TestWorld::new();
        world.set(20, 0, 0, BlockKind::Stone);
        assert!(raycast(&world, CENTER, Vec3::X, 10.0).is_none());
        assert!(raycast(&world, CENTER, Vec3::X, 25.0).is_some());
    }

    #[test]
    fn test_liquid_and_air_are_skipped() {
        let mut world = TestWorld::new();
        world.set(1, 0, 0, BlockKind::Water);
        world.set(2, 0, 0, BlockKind::Water);
        world.set(4, 0, 0, BlockKind::Glass);
        let hit = raycast(&world, CENTER, Vec3::X, 10.0).expect("should hit glass");
        assert_eq!(hit.cell, WorldPos::new(4, 0, 0));
        assert_eq!(hit.kind, BlockKind::Glass);
    }

    #[test]
    fn test_origin_inside_solid_hits_immediately() {
        let mut world = TestWorld::new();
        world.set(0, 0, 0, BlockKind::Stone);
        let hit = raycast(&world, CENTER, Vec3::X, 5.0).expect("should hit");
        assert_eq!(hit.cell, WorldPos::new(0, 0, 0));
        assert_eq!(hit.normal, IVec3::ZERO);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_negative_origin_uses_floor() {
        let mut world = TestWorld::new();
        world.set(-3, -1, -1, BlockKind::Stone);
        let hit = raycast(&world, Vec3::new(-0.5, -0.5, -0.5), Vec3::NEG_X, 10.0)
            .expect("should hit");
        assert_eq!(hit.cell, WorldPos::new(-3, -1, -1));
        assert!((hit.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_diagonal_ray_crosses_cells_correctly() {
        let mut world = TestWorld::new();
        world.set(3, 3, 0, BlockKind::Wood);

        let dir = Vec3::new(1.0, 1.0, 0.0);
        let hit = raycast(&world, CENTER, dir, 20.0).expect("should hit diagonal cell");
        assert_eq!(hit.cell, WorldPos::new(3, 3, 0));
        let expected = (3.0_f32 - 0.5) * 2.0_f32.sqrt();
        assert!(
            (hit.distance - expected).abs() < 0.5,
            "distance {} expected ~{}",
            hit.distance,
            expected,
        );
    }

    #[test]
    fn test_unnormalized_direction_measures_true_distance() {
        let mut world = TestWorld::new();
        world.set(3, 0, 0, BlockKind::Stone);
        let hit = raycast(&world, CENTER, Vec3::new(8.0, 0.0, 0.0), 10.0).expect("should hit");
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_returns_none() {
        let mut world = TestWorld::new();
        world.set(0, 0, 0, BlockKind::Stone);
        assert!(raycast(&world, CENTER, Vec3::ZERO, 10.0).is_none());
    }
}
