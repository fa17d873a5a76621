//! Room boundary walls

use crate::foundation::math::{SVector, VERTICAL_AXIS};
use crate::physics::collision::shape::{keep_max_side, keep_min_side};
use crate::physics::collision::{Bounds, CollisionResult, Sides};
use crate::physics::material::MaterialId;

/// The walls around a room plus their material.
///
/// Walls are named by the side flag an entity gets when pushed off them:
/// the `LEFT` wall sits at x = 0, the `FLOOR` wall at the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// Enabled walls
    pub walls: Sides,
    /// Material reported on contact
    pub material: MaterialId,
}

impl Default for Boundary {
    fn default() -> Self {
        Self::open()
    }
}

impl Boundary {
    /// Order walls are resolved in
    pub const WALL_ORDER: [Sides; 6] = [
        Sides::LEFT,
        Sides::RIGHT,
        Sides::CEILING,
        Sides::FLOOR,
        Sides::FRONT,
        Sides::BACK,
    ];

    /// Walls on the given sides
    pub fn new(walls: Sides, material: MaterialId) -> Self {
        Self { walls, material }
    }

    /// No walls
    pub fn open() -> Self {
        Self::new(Sides::empty(), MaterialId::NONE)
    }

    /// Every wall
    pub fn closed(material: MaterialId) -> Self {
        Self::new(Sides::all(), material)
    }

    /// Correction keeping `shape` inside `wall` of a room spanning
    /// `0..extent`. Disabled walls, and walls on an axis the room does not
    /// have, never push.
    pub fn push<const D: usize>(
        &self,
        wall: Sides,
        shape: &impl Bounds<D>,
        extent: &SVector<f32, D>,
    ) -> CollisionResult<D> {
        if !self.walls.contains(wall) {
            return CollisionResult::none();
        }
        let Some((axis, at_min)) = wall_axis(wall) else {
            return CollisionResult::none();
        };
        if axis >= D {
            return CollisionResult::none();
        }
        let delta = if at_min {
            keep_max_side(shape, axis, 0.0)
        } else {
            keep_min_side(shape, axis, extent[axis])
        };
        let mut displacement = SVector::<f32, D>::zeros();
        displacement[axis] = delta;
        CollisionResult::from_push(displacement, self.material)
    }
}

/// Axis a wall blocks and whether it sits at the low end of that axis
fn wall_axis(wall: Sides) -> Option<(usize, bool)> {
    [
        (Sides::LEFT, 0, true),
        (Sides::RIGHT, 0, false),
        (Sides::CEILING, VERTICAL_AXIS, true),
        (Sides::FLOOR, VERTICAL_AXIS, false),
        (Sides::FRONT, 2, true),
        (Sides::BACK, 2, false),
    ]
    .into_iter()
    .find(|(side, _, _)| *side == wall)
    .map(|(_, axis, at_min)| (axis, at_min))
}
