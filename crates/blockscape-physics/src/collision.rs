//! Axis-aligned box collision against the solid cells of a voxel grid.
//!
//! Bodies are upright boxes anchored at the center of their feet. Every
//! cell that is neither empty nor liquid blocks movement.

use glam::Vec3;

use blockscape_voxel::{VoxelSource, WorldPos};

/// How far below the feet [`is_supported`] probes for ground.
pub const SUPPORT_PROBE: f32 = 0.05;

/// Number of cell layers searched when snapping to a floor or ceiling.
const SNAP_SEARCH_LAYERS: i32 = 3;

/// Dimensions of an upright collision box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyShape {
    /// Half of the box width on X and Z.
    pub half_width: f32,
    /// Height from the feet to the top of the head.
    pub height: f32,
    /// Horizontal inset applied when testing against cells, so bodies slide
    /// along wall seams without snagging.
    pub skin: f32,
}

impl BodyShape {
    /// A standing player.
    pub const PLAYER: Self = Self {
        half_width: 0.3,
        height: 1.8,
        skin: 0.1,
    };

    /// A dropped item.
    pub const DROP: Self = Self {
        half_width: 0.125,
        height: 0.25,
        skin: 0.0,
    };

    /// Returns the same shape with a different height.
    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Half width actually tested against cells.
    pub fn collision_half_width(&self) -> f32 {
        (self.half_width - self.skin).max(0.0)
    }

    /// Collision box for a body whose feet are at `feet`.
    pub fn collision_box(&self, feet: Vec3) -> Aabb {
        let hw = self.collision_half_width();
        Aabb::new(
            Vec3::new(feet.x - hw, feet.y, feet.z - hw),
            Vec3::new(feet.x + hw, feet.y + self.height, feet.z + hw),
        )
    }

    /// Full box (skin included) for a body whose feet are at `feet`.
    pub fn outer_box(&self, feet: Vec3) -> Aabb {
        let hw = self.half_width;
        Aabb::new(
            Vec3::new(feet.x - hw, feet.y, feet.z - hw),
            Vec3::new(feet.x + hw, feet.y + self.height, feet.z + hw),
        )
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The unit box of a cell.
    pub fn cell(pos: WorldPos) -> Self {
        let min = Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32);
        Self::new(min, min + Vec3::ONE)
    }

    /// Shrinks the box by `amount` on every side.
    pub fn shrink(self, amount: f32) -> Self {
        Self::new(self.min + Vec3::splat(amount), self.max - Vec3::splat(amount))
    }

    /// Strict overlap test: boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Cells whose unit boxes strictly overlap this box.
    pub fn overlapping_cells(&self) -> impl Iterator<Item = WorldPos> + use<> {
        let (x0, x1) = cell_span(self.min.x, self.max.x);
        let (y0, y1) = cell_span(self.min.y, self.max.y);
        let (z0, z1) = cell_span(self.min.z, self.max.z);
        (x0..=x1).flat_map(move |x| {
            (y0..=y1).flat_map(move |y| (z0..=z1).map(move |z| WorldPos::new(x, y, z)))
        })
    }
}

/// Inclusive range of cell indices strictly overlapping `(min, max)`.
fn cell_span(min: f32, max: f32) -> (i32, i32) {
    (min.floor() as i32, max.ceil() as i32 - 1)
}

/// Returns `true` if a body at `feet` overlaps any solid cell.
pub fn body_intersects<S: VoxelSource + ?Sized>(world: &S, feet: Vec3, shape: &BodyShape) -> bool {
    shape
        .collision_box(feet)
        .overlapping_cells()
        .any(|pos| world.is_solid(pos))
}

/// Returns `true` if solid ground lies directly under a body at `feet`.
pub fn is_supported<S: VoxelSource + ?Sized>(world: &S, feet: Vec3, shape: &BodyShape) -> bool {
    body_intersects(world, feet - Vec3::new(0.0, SUPPORT_PROBE, 0.0), shape)
}

/// Finds the highest solid layer under the body's footprint, starting at the
/// layer holding the feet and searching a few layers down.
pub fn floor_below<S: VoxelSource + ?Sized>(world: &S, feet: Vec3, shape: &BodyShape) -> Option<i32> {
    let start = feet.y.floor() as i32;
    (start - SNAP_SEARCH_LAYERS + 1..=start)
        .rev()
        .find(|&y| footprint_blocked(world, feet, shape, y))
}

/// Finds the lowest solid layer over the body's footprint, starting at the
/// layer holding the head and searching a few layers up.
pub fn ceiling_above<S: VoxelSource + ?Sized>(world: &S, feet: Vec3, shape: &BodyShape) -> Option<i32> {
    let start = (feet.y + shape.height).ceil() as i32 - 1;
    (start..start + SNAP_SEARCH_LAYERS).find(|&y| footprint_blocked(world, feet, shape, y))
}

fn footprint_blocked<S: VoxelSource + ?Sized>(world: &S, feet: Vec3, shape: &BodyShape, y: i32) -> bool {
    let bounds = shape.collision_box(feet);
    let (x0, x1) = cell_span(bounds.min.x, bounds.max.x);
    let (z0, z1) = cell_span(bounds.min.z, bounds.max.z);
    (x0..=x1).any(|x| (z0..=z1).any(|z| world.is_solid(WorldPos::new(x, y, z))))
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

    #[test]
    fn test_touching_is_not_intersecting() {
        let mut world = TestWorld::new();
        world.set(0, 9, 0, BlockKind::Stone);
        let feet = Vec3::new(0.5, 10.0, 0.5);
        assert!(!body_intersects(&world, feet, &BodyShape::PLAYER));
        assert!(body_intersects(&world, feet - Vec3::Y * 0.01, &BodyShape::PLAYER));
    }

    #[test]
    fn test_liquid_does_not_collide() {
        let mut world = TestWorld::new();
        world.set(0, 10, 0, BlockKind::Water);
        assert!(!body_intersects(&world, Vec3::new(0.5, 10.0, 0.5), &BodyShape::PLAYER));
    }

    #[test]
    fn test_skin_lets_body_slide_past_wall_seam() {
        let mut world = TestWorld::new();
        world.set(1, 10, 0, BlockKind::Stone);
        // Outer box reaches x = 1.05, collision box stops at 0.95.
        let feet = Vec3::new(0.75, 10.0, 0.5);
        assert!(!body_intersects(&world, feet, &BodyShape::PLAYER));
        assert!(body_intersects(&world, feet + Vec3::X * 0.1, &BodyShape::PLAYER));
    }

    #[test]
    fn test_is_supported() {
        let mut world = TestWorld::new();
        world.set(0, 9, 0, BlockKind::Dirt);
        assert!(is_supported(&world, Vec3::new(0.5, 10.0, 0.5), &BodyShape::PLAYER));
        assert!(!is_supported(&world, Vec3::new(2.5, 10.0, 0.5), &BodyShape::PLAYER));
    }

    #[test]
    fn test_floor_and_ceiling_search() {
        let mut world = TestWorld::new();
        world.set(0, 8, 0, BlockKind::Stone);
        world.set(0, 13, 0, BlockKind::Stone);
        let feet = Vec3::new(0.5, 9.5, 0.5);
        assert_eq!(floor_below(&world, feet, &BodyShape::PLAYER), Some(8));
        assert_eq!(ceiling_above(&world, feet, &BodyShape::PLAYER), Some(13));
        assert_eq!(floor_below(&world, feet + Vec3::Y * 10.0, &BodyShape::PLAYER), None);
    }

    #[test]
    fn test_overlapping_cells_excludes_touching_cells() {
        let bounds = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let cells: Vec<WorldPos> = bounds.overlapping_cells().collect();
        assert_eq!(cells, vec![WorldPos::new(0, 0, 0), WorldPos::new(0, 1, 0)]);
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::cell(WorldPos::new(0, 0, 0));
        assert!(a.intersects(&Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5))));
        assert!(!a.intersects(&Aabb::cell(WorldPos::new(1, 0, 0))));
        assert!(!a.shrink(0.01).intersects(&Aabb::new(
            Vec3::new(0.995, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 1.0)
        )));
    }
}
