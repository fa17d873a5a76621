//! Shape sum types and shared bounds helpers
//!
//! [`Shape2`] and [`Shape3`] are the closed sets of shapes a hitbox or a tile
//! strategy can present to the kernel. Everything that needs an extent goes
//! through [`Bounds`], and the `keep_*` helpers compute how far a shape must
//! move to stay on one side of a line (room walls, platforms).

use crate::foundation::math::{SVector, Vec2, Vec3, VERTICAL_AXIS};
use super::kernel;
use super::primitives::{Aabb, Circle, Cuboid, Cylinder, Rect, Sphere};

/// Anything with an axis-aligned extent that can be moved
pub trait Bounds<const D: usize> {
    /// Smallest axis-aligned box containing the shape
    fn bounding_box(&self) -> Aabb<D>;

    /// Move the shape by `delta`
    fn translate(&mut self, delta: SVector<f32, D>);
}

impl<const D: usize> Bounds<D> for Aabb<D> {
    fn bounding_box(&self) -> Aabb<D> {
        *self
    }

    fn translate(&mut self, delta: SVector<f32, D>) {
        self.min += delta;
    }
}

impl Bounds<2> for Circle {
    fn bounding_box(&self) -> Rect {
        Circle::bounding_box(self)
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

impl Bounds<3> for Cylinder {
    fn bounding_box(&self) -> Cuboid {
        Cylinder::bounding_box(self)
    }

    fn translate(&mut self, delta: Vec3) {
        self.x += delta.x;
        self.y += delta.y;
        self.z += delta.z;
    }
}

impl Bounds<3> for Sphere {
    fn bounding_box(&self) -> Cuboid {
        Sphere::bounding_box(self)
    }

    fn translate(&mut self, delta: Vec3) {
        self.center += delta;
    }
}

/// Displacement along `axis` keeping the shape's maximum at or below `limit`
pub fn keep_min_side<const D: usize>(shape: &impl Bounds<D>, axis: usize, limit: f32) -> f32 {
    (limit - shape.bounding_box().max(axis)).min(0.0)
}

/// Displacement along `axis` keeping the shape's minimum at or above `limit`
pub fn keep_max_side<const D: usize>(shape: &impl Bounds<D>, axis: usize, limit: f32) -> f32 {
    (limit - shape.bounding_box().min[axis]).max(0.0)
}

/// Keep the shape left of `x` (its right edge at most `x`)
pub fn keep_left<const D: usize>(shape: &impl Bounds<D>, x: f32) -> f32 {
    keep_min_side(shape, 0, x)
}

/// Keep the shape right of `x` (its left edge at least `x`)
pub fn keep_right<const D: usize>(shape: &impl Bounds<D>, x: f32) -> f32 {
    keep_max_side(shape, 0, x)
}

/// Keep the shape above `y` (its bottom edge at most `y`)
pub fn keep_above<const D: usize>(shape: &impl Bounds<D>, y: f32) -> f32 {
    keep_min_side(shape, VERTICAL_AXIS, y)
}

/// Keep the shape below `y` (its top edge at least `y`)
pub fn keep_below<const D: usize>(shape: &impl Bounds<D>, y: f32) -> f32 {
    keep_max_side(shape, VERTICAL_AXIS, y)
}

/// Keep the shape in front of `z` (its far edge at most `z`)
pub fn keep_front(shape: &impl Bounds<3>, z: f32) -> f32 {
    keep_min_side(shape, 2, z)
}

/// Keep the shape behind `z` (its near edge at least `z`)
pub fn keep_behind(shape: &impl Bounds<3>, z: f32) -> f32 {
    keep_max_side(shape, 2, z)
}

/// Every 2D shape the kernel understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape2 {
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Circle
    Circle(Circle),
}

impl Shape2 {
    /// Strict overlap test, no displacement computed
    pub fn intersects(&self, other: &Shape2) -> bool {
        kernel::intersects_2d(self, other)
    }
}

impl Bounds<2> for Shape2 {
    fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(rect) => *rect,
            Self::Circle(circle) => circle.bounding_box(),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            Self::Rect(rect) => rect.translate(delta),
            Self::Circle(circle) => Bounds::translate(circle, delta),
        }
    }
}

impl From<Rect> for Shape2 {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Circle> for Shape2 {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

/// Every 3D shape the kernel understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape3 {
    /// Axis-aligned box
    Box(Cuboid),
    /// Vertical cylinder
    Cylinder(Cylinder),
    /// Sphere
    Sphere(Sphere),
}

impl Shape3 {
    /// Strict overlap test, no displacement computed
    pub fn intersects(&self, other: &Shape3) -> bool {
        kernel::intersects_3d(self, other)
    }
}

impl Bounds<3> for Shape3 {
    fn bounding_box(&self) -> Cuboid {
        match self {
            Self::Box(cuboid) => *cuboid,
            Self::Cylinder(cylinder) => cylinder.bounding_box(),
            Self::Sphere(sphere) => sphere.bounding_box(),
        }
    }

    fn translate(&mut self, delta: Vec3) {
        match self {
            Self::Box(cuboid) => cuboid.translate(delta),
            Self::Cylinder(cylinder) => Bounds::translate(cylinder, delta),
            Self::Sphere(sphere) => Bounds::translate(sphere, delta),
        }
    }
}

impl From<Cuboid> for Shape3 {
    fn from(cuboid: Cuboid) -> Self {
        Self::Box(cuboid)
    }
}

impl From<Cylinder> for Shape3 {
    fn from(cylinder: Cylinder) -> Self {
        Self::Cylinder(cylinder)
    }
}

impl From<Sphere> for Shape3 {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_helpers() {
        let rect = Rect::rect(-3.0, 10.0, 4.0, 4.0);
        assert_eq!(keep_right(&rect, 0.0), 3.0);
        assert_eq!(keep_left(&rect, 0.0), -1.0);
        assert_eq!(keep_above(&rect, 12.0), -2.0);
        assert_eq!(keep_below(&rect, 0.0), 0.0);
    }

    #[test]
    fn test_keep_helpers_on_circle() {
        let circle = Circle::new(1.0, 1.0, 2.0);
        assert_eq!(keep_right(&circle, 0.0), 1.0);
        assert_eq!(keep_below(&circle, 0.0), 1.0);
    }

    #[test]
    fn test_keep_depth() {
        let sphere = Sphere::new(0.0, 0.0, 9.5, 1.0);
        assert_eq!(keep_front(&sphere, 10.0), -0.5);
        assert_eq!(keep_behind(&sphere, 0.0), 0.0);
    }

    #[test]
    fn test_shape_translate() {
        let mut shape = Shape2::from(Circle::new(0.0, 0.0, 1.0));
        shape.translate(Vec2::new(2.0, 3.0));
        assert_eq!(shape.bounding_box(), Rect::rect(1.0, 2.0, 2.0, 2.0));
    }
}
