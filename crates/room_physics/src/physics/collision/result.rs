//! Collision results
//!
//! A [`CollisionResult`] is the immutable outcome of one shape-pair test:
//! the positional correction to apply to the moving shape, which of its
//! sides were struck, and the material of whatever it struck. The same type
//! serves 2D and 3D through the `D` parameter.
//!
//! Side flags describe the *mover's* side that made contact, derived from
//! the direction of the correction:
//!
//! ```text
//!            CEILING (pushed +y, down)
//!                 ┌─────┐
//!  LEFT  ──────►  │  m  │  ◄────── RIGHT
//!  (pushed +x)    └─────┘     (pushed -x)
//!            FLOOR  (pushed -y, up)
//! ```
//!
//! In 3D, `FRONT` is a push toward +z and `BACK` a push toward -z.

use bitflags::bitflags;

use crate::foundation::math::{SVector, Vec2, Vec3};
use crate::physics::material::MaterialId;

bitflags! {
    /// Sides of a moving shape touched by a collision
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sides: u8 {
        /// Pushed toward +x
        const LEFT = 1 << 0;
        /// Pushed toward -x
        const RIGHT = 1 << 1;
        /// Pushed toward +y (down)
        const CEILING = 1 << 2;
        /// Pushed toward -y (up)
        const FLOOR = 1 << 3;
        /// Pushed toward +z
        const FRONT = 1 << 4;
        /// Pushed toward -z
        const BACK = 1 << 5;
    }
}

impl Sides {
    /// Every horizontal side
    pub const WALLS: Sides = Sides::LEFT
        .union(Sides::RIGHT)
        .union(Sides::FRONT)
        .union(Sides::BACK);

    /// Flag for a correction of `delta` along `axis` (0 = x, 1 = y, 2 = z).
    /// A zero delta touches nothing.
    pub fn for_push(axis: usize, delta: f32) -> Sides {
        if delta == 0.0 {
            return Sides::empty();
        }
        let positive = delta > 0.0;
        match (axis, positive) {
            (0, true) => Sides::LEFT,
            (0, false) => Sides::RIGHT,
            (1, true) => Sides::CEILING,
            (1, false) => Sides::FLOOR,
            (2, true) => Sides::FRONT,
            (2, false) => Sides::BACK,
            _ => Sides::empty(),
        }
    }

    /// Swap each opposing pair (left/right, ceiling/floor, front/back)
    pub fn mirrored(self) -> Sides {
        let mut out = Sides::empty();
        for (from, to) in [
            (Sides::LEFT, Sides::RIGHT),
            (Sides::RIGHT, Sides::LEFT),
            (Sides::CEILING, Sides::FLOOR),
            (Sides::FLOOR, Sides::CEILING),
            (Sides::FRONT, Sides::BACK),
            (Sides::BACK, Sides::FRONT),
        ] {
            if self.contains(from) {
                out |= to;
            }
        }
        out
    }
}

/// Outcome of resolving a moving shape against one obstacle
///
/// Invariant: a result without displacement has no side flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult<const D: usize> {
    displacement: SVector<f32, D>,
    sides: Sides,
    material: MaterialId,
}

/// 2D collision result
pub type CollisionResult2 = CollisionResult<2>;

/// 3D collision result
pub type CollisionResult3 = CollisionResult<3>;

impl<const D: usize> Default for CollisionResult<D> {
    fn default() -> Self {
        Self::none()
    }
}

impl<const D: usize> CollisionResult<D> {
    /// The no-collision result
    pub fn none() -> Self {
        Self {
            displacement: SVector::<f32, D>::zeros(),
            sides: Sides::empty(),
            material: MaterialId::NONE,
        }
    }

    /// Build a result from an explicit displacement and side set.
    /// Side flags are dropped if the displacement is zero.
    pub fn from_parts(displacement: SVector<f32, D>, sides: Sides, material: MaterialId) -> Self {
        let moved = displacement.iter().any(|component| *component != 0.0);
        Self {
            displacement,
            sides: if moved { sides } else { Sides::empty() },
            material,
        }
    }

    /// Build a result whose flags follow every non-zero axis of the push
    pub fn from_push(displacement: SVector<f32, D>, material: MaterialId) -> Self {
        let sides = displacement
            .iter()
            .enumerate()
            .fold(Sides::empty(), |acc, (axis, delta)| acc | Sides::for_push(axis, *delta));
        Self::from_parts(displacement, sides, material)
    }

    /// Positional correction for the moving shape
    pub fn displacement(&self) -> SVector<f32, D> {
        self.displacement
    }

    /// Touched sides
    pub fn sides(&self) -> Sides {
        self.sides
    }

    /// Material of the touched obstacle
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Whether any correction is required
    pub fn is_collided(&self) -> bool {
        self.displacement.iter().any(|component| *component != 0.0)
    }

    /// Horizontal correction
    pub fn dx(&self) -> f32 {
        self.displacement[0]
    }

    /// Vertical correction (positive is down)
    pub fn dy(&self) -> f32 {
        self.displacement[1]
    }

    /// Left side touched
    pub fn left(&self) -> bool {
        self.sides.contains(Sides::LEFT)
    }

    /// Right side touched
    pub fn right(&self) -> bool {
        self.sides.contains(Sides::RIGHT)
    }

    /// Top of the mover touched something above it
    pub fn ceiling(&self) -> bool {
        self.sides.contains(Sides::CEILING)
    }

    /// Bottom of the mover touched something below it
    pub fn floor(&self) -> bool {
        self.sides.contains(Sides::FLOOR)
    }

    /// Any horizontal side touched
    pub fn wall(&self) -> bool {
        self.sides.intersects(Sides::WALLS)
    }

    /// Same collision, different material
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }

    /// Multiply the displacement by `factor`.
    ///
    /// A negative factor also mirrors every side flag, so a bounce layered on
    /// top of a base collision reports the side it actually pushes from.
    pub fn scale(&self, factor: f32) -> Self {
        let sides = if factor < 0.0 { self.sides.mirrored() } else { self.sides };
        Self::from_parts(self.displacement * factor, sides, self.material)
    }

    /// `scale(-1.0)`
    pub fn invert(&self) -> Self {
        self.scale(-1.0)
    }

    /// Fold another result into this one: displacements add, flags OR.
    ///
    /// The material follows the latest floor contact; without one, the
    /// latest collided result. Should the summed displacement cancel out,
    /// flags are cleared to keep the invariant.
    pub fn accumulate(&mut self, other: &CollisionResult<D>) {
        if other.is_collided() && (other.floor() || !self.floor()) {
            self.material = other.material;
        }
        self.displacement += other.displacement;
        self.sides |= other.sides;
        if !self.is_collided() {
            self.sides = Sides::empty();
        }
    }
}

impl CollisionResult<2> {
    /// 2D result from components
    pub fn new(dx: f32, dy: f32, sides: Sides, material: MaterialId) -> Self {
        Self::from_parts(Vec2::new(dx, dy), sides, material)
    }
}

impl CollisionResult<3> {
    /// 3D result from components
    pub fn new(dx: f32, dy: f32, dz: f32, sides: Sides, material: MaterialId) -> Self {
        Self::from_parts(Vec3::new(dx, dy, dz), sides, material)
    }

    /// Depth correction
    pub fn dz(&self) -> f32 {
        self.displacement[2]
    }
}
