//! Primitive collision shapes
//!
//! Axis-aligned boxes, circles, vertical cylinders and spheres. All of them
//! are plain `Copy` snapshots; entities build fresh ones every time they are
//! asked for their bounds.
//!
//! Overlap tests are strict: shapes that merely touch do not overlap, and a
//! shape with a zero extent never overlaps anything.

use crate::foundation::math::utils::clamp;
use crate::foundation::math::{SVector, Vec2, Vec3, VERTICAL_AXIS};

/// Axis-aligned box in `D` dimensions, stored as minimum corner plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<const D: usize> {
    /// Minimum corner (left, top, and near in 3D)
    pub min: SVector<f32, D>,
    /// Extent along each axis
    pub size: SVector<f32, D>,
}

/// Axis-aligned rectangle `{x, y, w, h}`
pub type Rect = Aabb<2>;

/// Axis-aligned box `{x, y, z, w, h, d}`
pub type Cuboid = Aabb<3>;

impl<const D: usize> Aabb<D> {
    /// Create a box from its minimum corner and size
    pub fn new(min: SVector<f32, D>, size: SVector<f32, D>) -> Self {
        Self { min, size }
    }

    /// Maximum coordinate along `axis`
    pub fn max(&self, axis: usize) -> f32 {
        self.min[axis] + self.size[axis]
    }

    /// Centre coordinate along `axis`
    pub fn center(&self, axis: usize) -> f32 {
        self.min[axis] + self.size[axis] * 0.5
    }

    /// A box with a zero (or negative) extent has no interior
    pub fn is_degenerate(&self) -> bool {
        self.size.iter().any(|extent| *extent <= 0.0)
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Aabb<D>) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        (0..D).all(|axis| self.min[axis] < other.max(axis) && other.min[axis] < self.max(axis))
    }

    /// Copy moved by `delta`
    pub fn translated(&self, delta: SVector<f32, D>) -> Self {
        Self::new(self.min + delta, self.size)
    }

    /// Copy with its range on `axis` replaced
    pub fn with_axis(&self, axis: usize, min: f32, size: f32) -> Self {
        let mut out = *self;
        out.min[axis] = min;
        out.size[axis] = size;
        out
    }

    /// Nearest point of the box to `point`
    pub fn clamp_point(&self, point: SVector<f32, D>) -> SVector<f32, D> {
        let mut nearest = point;
        for axis in 0..D {
            nearest[axis] = clamp(point[axis], self.min[axis], self.max(axis));
        }
        nearest
    }
}

impl Aabb<2> {
    /// Rectangle from `x, y, w, h`
    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    /// Left edge
    pub fn x(&self) -> f32 {
        self.min.x
    }

    /// Top edge
    pub fn y(&self) -> f32 {
        self.min.y
    }

    /// Width
    pub fn w(&self) -> f32 {
        self.size.x
    }

    /// Height
    pub fn h(&self) -> f32 {
        self.size.y
    }
}

impl Aabb<3> {
    /// Box from `x, y, z, w, h, d`
    pub fn cuboid(x: f32, y: f32, z: f32, w: f32, h: f32, d: f32) -> Self {
        Self::new(Vec3::new(x, y, z), Vec3::new(w, h, d))
    }

    /// Footprint on the horizontal (x, z) plane
    pub fn footprint(&self) -> Rect {
        Rect::rect(self.min.x, self.min.z, self.size.x, self.size.z)
    }

    /// Vertical extent as `(top, height)`
    pub fn vertical(&self) -> (f32, f32) {
        (self.min[VERTICAL_AXIS], self.size[VERTICAL_AXIS])
    }
}

/// Circle `{cx, cy, r}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl Circle {
    /// Create a circle
    pub fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { center: Vec2::new(cx, cy), radius }
    }

    /// Circle inscribed in a rectangle (radius is half the smaller side)
    pub fn inscribed(rect: &Rect) -> Self {
        Self::new(rect.center(0), rect.center(1), rect.w().min(rect.h()) * 0.5)
    }

    /// Smallest rectangle containing the circle
    pub fn bounding_box(&self) -> Rect {
        Rect::rect(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Vertical cylinder `{x, y, z, r, h}`: axis at `(x, z)`, top at `y`,
/// extending down to `y + h`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Axis x
    pub x: f32,
    /// Top
    pub y: f32,
    /// Axis z
    pub z: f32,
    /// Radius
    pub radius: f32,
    /// Height
    pub height: f32,
}

impl Cylinder {
    /// Create a cylinder
    pub fn new(x: f32, y: f32, z: f32, radius: f32, height: f32) -> Self {
        Self { x, y, z, radius, height }
    }

    /// Cylinder inscribed in a box, spanning its full height
    pub fn inscribed(cuboid: &Cuboid) -> Self {
        Self::new(
            cuboid.center(0),
            cuboid.min.y,
            cuboid.center(2),
            cuboid.size.x.min(cuboid.size.z) * 0.5,
            cuboid.size.y,
        )
    }

    /// Axis position on the horizontal plane
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// Smallest box containing the cylinder
    pub fn bounding_box(&self) -> Cuboid {
        Cuboid::cuboid(
            self.x - self.radius,
            self.y,
            self.z - self.radius,
            self.radius * 2.0,
            self.height,
            self.radius * 2.0,
        )
    }
}

/// Sphere `{x, y, z, r}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Centre
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere
    pub fn new(x: f32, y: f32, z: f32, radius: f32) -> Self {
        Self { center: Vec3::new(x, y, z), radius }
    }

    /// Smallest box containing the sphere
    pub fn bounding_box(&self) -> Cuboid {
        let diameter = self.radius * 2.0;
        Cuboid::cuboid(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.z - self.radius,
            diameter,
            diameter,
            diameter,
        )
    }

    /// Smallest vertical cylinder containing the sphere
    pub fn bounding_cylinder(&self) -> Cylinder {
        Cylinder::new(
            self.center.x,
            self.center.y - self.radius,
            self.center.z,
            self.radius,
            self.radius * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_zero_size_never_overlaps() {
        let tile = Rect::rect(0.0, 0.0, 16.0, 16.0);
        assert!(!tile.overlaps(&Rect::rect(4.0, 4.0, 0.0, 8.0)));
        assert!(!tile.overlaps(&Rect::rect(4.0, 4.0, 8.0, 0.0)));
    }

    #[test]
    fn test_cuboid_overlap() {
        let a = Cuboid::cuboid(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        assert!(a.overlaps(&Cuboid::cuboid(0.5, 0.5, 0.5, 1.0, 1.0, 1.0)));
        assert!(!a.overlaps(&Cuboid::cuboid(0.5, 0.5, 1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_inscribed_shapes() {
        let tile = Rect::rect(16.0, 32.0, 16.0, 16.0);
        let circle = Circle::inscribed(&tile);
        assert_eq!(circle.center, Vec2::new(24.0, 40.0));
        assert_eq!(circle.radius, 8.0);
        assert_eq!(circle.bounding_box(), tile);

        let cell = Cuboid::cuboid(0.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        let cylinder = Cylinder::inscribed(&cell);
        assert_eq!(cylinder.axis(), Vec2::new(1.0, 1.0));
        assert_eq!(cylinder.bounding_box(), cell);
    }

    #[test]
    fn test_clamp_point() {
        let rect = Rect::rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(rect.clamp_point(Vec2::new(-2.0, 2.0)), Vec2::new(0.0, 2.0));
        assert_eq!(rect.clamp_point(Vec2::new(6.0, 9.0)), Vec2::new(4.0, 4.0));
    }
}
