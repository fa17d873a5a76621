//! Geometry kernel
//!
//! Pure shape-pair resolution. Every function takes an immovable
//! `obstacle`, a moving shape and the obstacle's material, and returns the
//! correction that moves the mover out of the obstacle. Function names read
//! `<obstacle>_to_<mover>`.
//!
//! # Minimal-axis push
//!
//! Boxes are separated along the axis with the smallest penetration first,
//! i.e. the axis the mover only just crossed. After each axis the overlap is
//! re-tested against the corrected position and the remaining axes are only
//! pushed if it still overlaps:
//!
//! ```text
//!   mover falling onto a tile, slightly to the right:
//!
//!        ┌───┐               ┌───┐
//!        │ m │     y pen 2   │ m │
//!   ┌────┼─┐ │  ─────────►   └───┘   x pen 6 is never applied
//!   │ t  └─┼─┘               ┌────┐
//!   └──────┘                 │ t  │
//!                            └────┘
//! ```
//!
//! Equal penetrations resolve the vertical axis first, so entities standing
//! across a seam between two tiles are held up rather than pushed sideways.

use crate::foundation::math::constants::EPSILON;
use crate::foundation::math::utils::dominant_axis;
use crate::foundation::math::{SVector, Vec2, VERTICAL_AXIS};
use crate::physics::material::MaterialId;
use super::primitives::{Aabb, Circle, Cuboid, Cylinder, Rect, Sphere};
use super::result::{CollisionResult, CollisionResult2, CollisionResult3, Sides};
use super::shape::{Shape2, Shape3};

// =============================================================================
// Boxes
// =============================================================================

/// Push along one axis taking `mover` out of `obstacle` on that axis alone.
///
/// A mover centred on the low side is pushed toward the low side. Returns 0
/// when the mover is already past the obstacle on that axis.
fn axis_push<const D: usize>(obstacle: &Aabb<D>, mover: &Aabb<D>, axis: usize) -> f32 {
    if mover.center(axis) < obstacle.center(axis) {
        (obstacle.min[axis] - mover.max(axis)).min(0.0)
    } else {
        (obstacle.max(axis) - mover.min[axis]).max(0.0)
    }
}

/// Box against box in any dimension.
///
/// Axes are resolved shallowest first, re-testing overlap between axes.
pub fn box_to_box<const D: usize>(
    obstacle: &Aabb<D>,
    mover: &Aabb<D>,
    material: MaterialId,
) -> CollisionResult<D> {
    if !obstacle.overlaps(mover) {
        return CollisionResult::none();
    }

    let pushes: [f32; D] = std::array::from_fn(|axis| axis_push(obstacle, mover, axis));
    let mut order: [usize; D] = std::array::from_fn(|axis| axis);
    order.sort_by(|&a, &b| {
        pushes[a]
            .abs()
            .total_cmp(&pushes[b].abs())
            .then_with(|| (a != VERTICAL_AXIS).cmp(&(b != VERTICAL_AXIS)))
            .then_with(|| a.cmp(&b))
    });

    let mut displacement = SVector::<f32, D>::zeros();
    let mut sides = Sides::empty();
    let mut corrected = *mover;
    for (step, &axis) in order.iter().enumerate() {
        if step > 0 && !obstacle.overlaps(&corrected) {
            break;
        }
        displacement[axis] = pushes[axis];
        corrected.min[axis] += pushes[axis];
        sides |= Sides::for_push(axis, pushes[axis]);
    }

    CollisionResult::from_parts(displacement, sides, material)
}

/// Rectangle against rectangle, the basic 2D case
pub fn rect_to_rect_basic(obstacle: &Rect, mover: &Rect, material: MaterialId) -> CollisionResult2 {
    box_to_box(obstacle, mover, material)
}

/// 3D box against 3D box
pub fn box_to_cuboid(obstacle: &Cuboid, mover: &Cuboid, material: MaterialId) -> CollisionResult3 {
    box_to_box(obstacle, mover, material)
}

// =============================================================================
// Balls (circles and spheres)
// =============================================================================

/// Box against a ball (circle in 2D, sphere in 3D).
///
/// The ball is pushed away from the nearest point of the box. If its centre
/// lies inside the box there is no usable direction, so it falls back to the
/// box push of the ball's bounding box.
fn box_to_ball<const D: usize>(
    obstacle: &Aabb<D>,
    center: SVector<f32, D>,
    radius: f32,
    material: MaterialId,
) -> CollisionResult<D> {
    if radius <= 0.0 || obstacle.is_degenerate() {
        return CollisionResult::none();
    }

    let nearest = obstacle.clamp_point(center);
    let offset = center - nearest;
    let distance_sq = offset.norm_squared();
    if distance_sq >= radius * radius {
        return CollisionResult::none();
    }

    let distance = distance_sq.sqrt();
    if distance < EPSILON {
        let bounds = Aabb::new(
            center.add_scalar(-radius),
            SVector::<f32, D>::repeat(radius * 2.0),
        );
        return box_to_box(obstacle, &bounds, material);
    }

    ball_push(offset / distance * (radius - distance), material)
}

/// Ball against ball: push along the centre-to-centre line by the overlap
fn ball_to_ball<const D: usize>(
    obstacle_center: SVector<f32, D>,
    obstacle_radius: f32,
    mover_center: SVector<f32, D>,
    mover_radius: f32,
    material: MaterialId,
) -> CollisionResult<D> {
    if obstacle_radius <= 0.0 || mover_radius <= 0.0 {
        return CollisionResult::none();
    }

    let offset = mover_center - obstacle_center;
    let reach = obstacle_radius + mover_radius;
    let distance_sq = offset.norm_squared();
    if distance_sq >= reach * reach {
        return CollisionResult::none();
    }

    let distance = distance_sq.sqrt();
    if distance < EPSILON {
        // Coincident centres: lift the mover straight up
        let mut push = SVector::<f32, D>::zeros();
        push[VERTICAL_AXIS] = -reach;
        return ball_push(push, material);
    }

    ball_push(offset / distance * (reach - distance), material)
}

/// Result for a diagonal push: only the dominant axis is reported as touched
fn ball_push<const D: usize>(push: SVector<f32, D>, material: MaterialId) -> CollisionResult<D> {
    let axis = dominant_axis(push.as_slice());
    CollisionResult::from_parts(push, Sides::for_push(axis, push[axis]), material)
}

/// Rectangle obstacle, circle mover
pub fn rect_to_circle(obstacle: &Rect, mover: &Circle, material: MaterialId) -> CollisionResult2 {
    box_to_ball(obstacle, mover.center, mover.radius, material)
}

/// Circle obstacle, rectangle mover
pub fn circle_to_rect(obstacle: &Circle, mover: &Rect, material: MaterialId) -> CollisionResult2 {
    // Resolve the circle out of the rectangle, then move the rectangle instead
    rect_to_circle(mover, obstacle, material).invert()
}

/// Circle against circle
pub fn circle_to_circle(obstacle: &Circle, mover: &Circle, material: MaterialId) -> CollisionResult2 {
    ball_to_ball(obstacle.center, obstacle.radius, mover.center, mover.radius, material)
}

/// Box obstacle, sphere mover
pub fn box_to_sphere(obstacle: &Cuboid, mover: &Sphere, material: MaterialId) -> CollisionResult3 {
    box_to_ball(obstacle, mover.center, mover.radius, material)
}

/// Sphere obstacle, box mover
pub fn sphere_to_box(obstacle: &Sphere, mover: &Cuboid, material: MaterialId) -> CollisionResult3 {
    box_to_sphere(mover, obstacle, material).invert()
}

/// Sphere against sphere
pub fn sphere_to_sphere(obstacle: &Sphere, mover: &Sphere, material: MaterialId) -> CollisionResult3 {
    ball_to_ball(obstacle.center, obstacle.radius, mover.center, mover.radius, material)
}

// =============================================================================
// Vertical prisms (cylinders against boxes and each other)
// =============================================================================

/// Vertical push between two `(top, height)` ranges, `None` if they don't overlap
fn vertical_push(obstacle: (f32, f32), mover: (f32, f32)) -> Option<f32> {
    let (obstacle_top, obstacle_height) = obstacle;
    let (mover_top, mover_height) = mover;
    if obstacle_height <= 0.0 || mover_height <= 0.0 {
        return None;
    }
    let obstacle_bottom = obstacle_top + obstacle_height;
    let mover_bottom = mover_top + mover_height;
    if mover_top >= obstacle_bottom || obstacle_top >= mover_bottom {
        return None;
    }
    let push = if mover_top + mover_height * 0.5 < obstacle_top + obstacle_height * 0.5 {
        (obstacle_top - mover_bottom).min(0.0)
    } else {
        (obstacle_bottom - mover_top).max(0.0)
    };
    Some(push)
}

/// Combine a vertical push with a horizontal `(x, z)` push.
///
/// Either push alone fully separates two vertical prisms, so after the
/// shallower one is applied the re-test never needs the other.
fn prism_push(vertical: f32, horizontal: Vec2, material: MaterialId) -> CollisionResult3 {
    if vertical.abs() <= horizontal.norm() {
        CollisionResult3::new(0.0, vertical, 0.0, Sides::for_push(VERTICAL_AXIS, vertical), material)
    } else {
        let sides = if horizontal.x.abs() >= horizontal.y.abs() {
            Sides::for_push(0, horizontal.x)
        } else {
            Sides::for_push(2, horizontal.y)
        };
        CollisionResult3::new(horizontal.x, 0.0, horizontal.y, sides, material)
    }
}

/// Box obstacle, cylinder mover
pub fn box_to_cylinder(obstacle: &Cuboid, mover: &Cylinder, material: MaterialId) -> CollisionResult3 {
    let Some(vertical) = vertical_push(obstacle.vertical(), (mover.y, mover.height)) else {
        return CollisionResult3::none();
    };
    let horizontal = box_to_ball(&obstacle.footprint(), mover.axis(), mover.radius, material);
    if !horizontal.is_collided() {
        return CollisionResult3::none();
    }
    prism_push(vertical, horizontal.displacement(), material)
}

/// Cylinder obstacle, box mover
pub fn cylinder_to_box(obstacle: &Cylinder, mover: &Cuboid, material: MaterialId) -> CollisionResult3 {
    box_to_cylinder(mover, obstacle, material).invert()
}

/// Cylinder against cylinder
pub fn cylinder_to_cylinder(obstacle: &Cylinder, mover: &Cylinder, material: MaterialId) -> CollisionResult3 {
    let Some(vertical) = vertical_push((obstacle.y, obstacle.height), (mover.y, mover.height)) else {
        return CollisionResult3::none();
    };
    let horizontal = ball_to_ball(obstacle.axis(), obstacle.radius, mover.axis(), mover.radius, material);
    if !horizontal.is_collided() {
        return CollisionResult3::none();
    }
    prism_push(vertical, horizontal.displacement(), material)
}

/// Cylinder obstacle, sphere mover (the sphere is treated as its bounding cylinder)
pub fn cylinder_to_sphere(obstacle: &Cylinder, mover: &Sphere, material: MaterialId) -> CollisionResult3 {
    cylinder_to_cylinder(obstacle, &mover.bounding_cylinder(), material)
}

/// Sphere obstacle, cylinder mover (the sphere is treated as its bounding cylinder)
pub fn sphere_to_cylinder(obstacle: &Sphere, mover: &Cylinder, material: MaterialId) -> CollisionResult3 {
    cylinder_to_cylinder(&obstacle.bounding_cylinder(), mover, material)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Resolve any 2D shape pair
pub fn collide_2d(obstacle: &Shape2, mover: &Shape2, material: MaterialId) -> CollisionResult2 {
    match (obstacle, mover) {
        (Shape2::Rect(o), Shape2::Rect(m)) => rect_to_rect_basic(o, m, material),
        (Shape2::Rect(o), Shape2::Circle(m)) => rect_to_circle(o, m, material),
        (Shape2::Circle(o), Shape2::Rect(m)) => circle_to_rect(o, m, material),
        (Shape2::Circle(o), Shape2::Circle(m)) => circle_to_circle(o, m, material),
    }
}

/// Resolve any 3D shape pair
pub fn collide_3d(obstacle: &Shape3, mover: &Shape3, material: MaterialId) -> CollisionResult3 {
    match (obstacle, mover) {
        (Shape3::Box(o), Shape3::Box(m)) => box_to_cuboid(o, m, material),
        (Shape3::Box(o), Shape3::Cylinder(m)) => box_to_cylinder(o, m, material),
        (Shape3::Box(o), Shape3::Sphere(m)) => box_to_sphere(o, m, material),
        (Shape3::Cylinder(o), Shape3::Box(m)) => cylinder_to_box(o, m, material),
        (Shape3::Cylinder(o), Shape3::Cylinder(m)) => cylinder_to_cylinder(o, m, material),
        (Shape3::Cylinder(o), Shape3::Sphere(m)) => cylinder_to_sphere(o, m, material),
        (Shape3::Sphere(o), Shape3::Box(m)) => sphere_to_box(o, m, material),
        (Shape3::Sphere(o), Shape3::Cylinder(m)) => sphere_to_cylinder(o, m, material),
        (Shape3::Sphere(o), Shape3::Sphere(m)) => sphere_to_sphere(o, m, material),
    }
}

fn box_touches_ball<const D: usize>(aabb: &Aabb<D>, center: SVector<f32, D>, radius: f32) -> bool {
    radius > 0.0
        && !aabb.is_degenerate()
        && (center - aabb.clamp_point(center)).norm_squared() < radius * radius
}

fn balls_touch<const D: usize>(a: SVector<f32, D>, ra: f32, b: SVector<f32, D>, rb: f32) -> bool {
    ra > 0.0 && rb > 0.0 && (a - b).norm_squared() < (ra + rb) * (ra + rb)
}

fn box_touches_cylinder(cuboid: &Cuboid, cylinder: &Cylinder) -> bool {
    vertical_push(cuboid.vertical(), (cylinder.y, cylinder.height)).is_some()
        && box_touches_ball(&cuboid.footprint(), cylinder.axis(), cylinder.radius)
}

fn cylinders_touch(a: &Cylinder, b: &Cylinder) -> bool {
    vertical_push((a.y, a.height), (b.y, b.height)).is_some()
        && balls_touch(a.axis(), a.radius, b.axis(), b.radius)
}

/// Strict 2D overlap test
pub fn intersects_2d(a: &Shape2, b: &Shape2) -> bool {
    match (a, b) {
        (Shape2::Rect(a), Shape2::Rect(b)) => a.overlaps(b),
        (Shape2::Rect(r), Shape2::Circle(c)) | (Shape2::Circle(c), Shape2::Rect(r)) => {
            box_touches_ball(r, c.center, c.radius)
        }
        (Shape2::Circle(a), Shape2::Circle(b)) => balls_touch(a.center, a.radius, b.center, b.radius),
    }
}

/// Strict 3D overlap test
pub fn intersects_3d(a: &Shape3, b: &Shape3) -> bool {
    match (a, b) {
        (Shape3::Box(a), Shape3::Box(b)) => a.overlaps(b),
        (Shape3::Box(o), Shape3::Cylinder(c)) | (Shape3::Cylinder(c), Shape3::Box(o)) => {
            box_touches_cylinder(o, c)
        }
        (Shape3::Box(o), Shape3::Sphere(s)) | (Shape3::Sphere(s), Shape3::Box(o)) => {
            box_touches_ball(o, s.center, s.radius)
        }
        (Shape3::Cylinder(a), Shape3::Cylinder(b)) => cylinders_touch(a, b),
        (Shape3::Cylinder(c), Shape3::Sphere(s)) | (Shape3::Sphere(s), Shape3::Cylinder(c)) => {
            cylinders_touch(c, &s.bounding_cylinder())
        }
        (Shape3::Sphere(a), Shape3::Sphere(b)) => balls_touch(a.center, a.radius, b.center, b.radius),
    }
}
