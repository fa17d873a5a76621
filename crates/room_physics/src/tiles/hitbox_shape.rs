//! Tile hitbox strategies
//!
//! A [`TileHitboxShape`] turns a tile's bounds into the obstacle shape the
//! kernel resolves against. It carries no state, so one value is shared by
//! every tile of a type.

use serde::{Deserialize, Serialize};

use crate::foundation::math::VERTICAL_AXIS;
use crate::physics::collision::kernel;
use crate::physics::collision::{
    Aabb, Circle, CollisionResult2, CollisionResult3, Cuboid, Cylinder, Rect, Shape2, Shape3,
};
use crate::physics::material::MaterialId;

/// How a tile type collides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileHitboxShape {
    /// Never collides (air, decoration)
    #[default]
    None,
    /// The whole tile
    Full,
    /// Circle inscribed in the tile; a vertical cylinder in 3D
    Circle,
    /// Lower half of the tile
    BottomSlab,
    /// Upper half of the tile
    TopSlab,
}

impl TileHitboxShape {
    /// Whether tiles of this shape can ever collide
    pub fn is_solid(self) -> bool {
        self != Self::None
    }

    /// Obstacle presented by a tile occupying `tile`
    pub fn obstacle_2d(self, tile: &Rect) -> Option<Shape2> {
        match self {
            Self::None => None,
            Self::Full => Some(Shape2::Rect(*tile)),
            Self::Circle => Some(Shape2::Circle(Circle::inscribed(tile))),
            Self::BottomSlab => Some(Shape2::Rect(lower_half(tile))),
            Self::TopSlab => Some(Shape2::Rect(upper_half(tile))),
        }
    }

    /// Obstacle presented by a cell occupying `cell`
    pub fn obstacle_3d(self, cell: &Cuboid) -> Option<Shape3> {
        match self {
            Self::None => None,
            Self::Full => Some(Shape3::Box(*cell)),
            Self::Circle => Some(Shape3::Cylinder(Cylinder::inscribed(cell))),
            Self::BottomSlab => Some(Shape3::Box(lower_half(cell))),
            Self::TopSlab => Some(Shape3::Box(upper_half(cell))),
        }
    }

    /// Resolve `mover` against a tile
    pub fn collide_2d(self, tile: &Rect, mover: &Shape2, material: MaterialId) -> CollisionResult2 {
        match self.obstacle_2d(tile) {
            Some(obstacle) => kernel::collide_2d(&obstacle, mover, material),
            None => CollisionResult2::none(),
        }
    }

    /// Resolve `mover` against a cell
    pub fn collide_3d(self, cell: &Cuboid, mover: &Shape3, material: MaterialId) -> CollisionResult3 {
        match self.obstacle_3d(cell) {
            Some(obstacle) => kernel::collide_3d(&obstacle, mover, material),
            None => CollisionResult3::none(),
        }
    }

    /// Overlap test against a tile, no displacement
    pub fn intersects_2d(self, tile: &Rect, shape: &Shape2) -> bool {
        self.obstacle_2d(tile)
            .is_some_and(|obstacle| kernel::intersects_2d(&obstacle, shape))
    }

    /// Overlap test against a cell, no displacement
    pub fn intersects_3d(self, cell: &Cuboid, shape: &Shape3) -> bool {
        self.obstacle_3d(cell)
            .is_some_and(|obstacle| kernel::intersects_3d(&obstacle, shape))
    }
}

// y grows down, so the lower half starts halfway through the tile
fn lower_half<const D: usize>(tile: &Aabb<D>) -> Aabb<D> {
    let half = tile.size[VERTICAL_AXIS] * 0.5;
    tile.with_axis(VERTICAL_AXIS, tile.min[VERTICAL_AXIS] + half, half)
}

fn upper_half<const D: usize>(tile: &Aabb<D>) -> Aabb<D> {
    let half = tile.size[VERTICAL_AXIS] * 0.5;
    tile.with_axis(VERTICAL_AXIS, tile.min[VERTICAL_AXIS], half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::Sphere;
    use approx::assert_relative_eq;

    fn tile() -> Rect {
        Rect::rect(16.0, 16.0, 16.0, 16.0)
    }

    #[test]
    fn test_none_never_collides() {
        let mover = Shape2::Rect(Rect::rect(18.0, 18.0, 4.0, 4.0));
        let result = TileHitboxShape::None.collide_2d(&tile(), &mover, MaterialId::NONE);
        assert!(!result.is_collided());
        assert!(!TileHitboxShape::None.intersects_2d(&tile(), &mover));
    }

    #[test]
    fn test_full_pushes_onto_top() {
        let mover = Shape2::Rect(Rect::rect(18.0, 10.0, 8.0, 8.0));
        let result = TileHitboxShape::Full.collide_2d(&tile(), &mover, MaterialId::NONE);
        assert_relative_eq!(result.dy(), -2.0);
        assert!(result.floor());
    }

    #[test]
    fn test_bottom_slab_ignores_upper_half() {
        let upper = Shape2::Rect(Rect::rect(18.0, 17.0, 4.0, 4.0));
        let slab = TileHitboxShape::BottomSlab;
        assert!(!slab.collide_2d(&tile(), &upper, MaterialId::NONE).is_collided());
        assert!(!slab.intersects_2d(&tile(), &upper));

        let lower = Shape2::Rect(Rect::rect(18.0, 22.0, 4.0, 4.0));
        let result = slab.collide_2d(&tile(), &lower, MaterialId::NONE);
        assert!(result.is_collided());
        assert!(slab.intersects_2d(&tile(), &lower));
    }

    #[test]
    fn test_top_slab_ignores_lower_half() {
        let lower = Shape2::Rect(Rect::rect(18.0, 26.0, 4.0, 4.0));
        assert!(!TileHitboxShape::TopSlab.intersects_2d(&tile(), &lower));
        let upper = Shape2::Rect(Rect::rect(18.0, 18.0, 4.0, 4.0));
        assert!(TileHitboxShape::TopSlab.intersects_2d(&tile(), &upper));
    }

    #[test]
    fn test_circle_tile_misses_corner() {
        // Inside the tile's corner but outside the inscribed circle
        let corner = Shape2::Rect(Rect::rect(16.5, 16.5, 1.0, 1.0));
        assert!(TileHitboxShape::Full.intersects_2d(&tile(), &corner));
        assert!(!TileHitboxShape::Circle.intersects_2d(&tile(), &corner));
    }

    #[test]
    fn test_circle_cell_is_a_cylinder() {
        let cell = Cuboid::cuboid(0.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        match TileHitboxShape::Circle.obstacle_3d(&cell) {
            Some(Shape3::Cylinder(cylinder)) => {
                assert_eq!(cylinder, Cylinder::new(1.0, 0.0, 1.0, 1.0, 2.0));
            }
            other => panic!("expected a cylinder, got {:?}", other),
        }
    }

    #[test]
    fn test_bottom_slab_cell_lands_sphere_on_half_height() {
        let cell = Cuboid::cuboid(0.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        // Sphere bottom at y = 1.25, slab top at y = 1.0
        let sphere = Shape3::Sphere(Sphere::new(1.0, 0.75, 1.0, 0.5));
        let result = TileHitboxShape::BottomSlab.collide_3d(&cell, &sphere, MaterialId::NONE);
        assert_relative_eq!(result.dy(), -0.25);
        assert!(result.floor());
    }
}
