//! Collision detection and resolution
//!
//! Narrow-phase shape-pair math for the room collision loop.
//!
//! # Module Organization
//!
//! - [`primitives`] - Basic geometric primitives (boxes, circles, cylinders, spheres)
//! - [`shape`] - Closed shape sets plus the shared `keep_*` bounds helpers
//! - [`kernel`] - Pure shape-pair resolution (the only place shape math lives)
//! - [`result`] - The collision result value type and side flags
//!
//! # Key Types
//!
//! - [`Shape2`], [`Shape3`] - What a hitbox or tile presents to the kernel
//! - [`CollisionResult`] - Correction, touched sides and material of one test

pub mod primitives;
pub mod shape;
pub mod kernel;
pub mod result;

// Re-export commonly used types
pub use primitives::{Aabb, Circle, Cuboid, Cylinder, Rect, Sphere};
pub use shape::{Bounds, Shape2, Shape3, keep_above, keep_below, keep_behind, keep_front, keep_left, keep_right};
pub use kernel::{collide_2d, collide_3d, rect_to_rect_basic};
pub use result::{CollisionResult, CollisionResult2, CollisionResult3, Sides};
