//! Physics module for collision detection and response
//!
//! Shape-pair collision math, surface materials and the hitbox contract
//! entities implement to take part in a room's collision pass.

pub mod body;
pub mod collision;
pub mod hitbox;
pub mod material;

pub use collision::{
    CollisionResult,
    CollisionResult2,
    CollisionResult3,
    Shape2,
    Shape3,
    Sides,
};
pub use body::{Body, Body2, Body3, ContactEvent, EVENT_LOG_CAPACITY};
pub use hitbox::{Contact, ContactHooks, ContactState, Hitbox2, Hitbox3};
pub use material::{Material, MaterialId, MaterialLibrary};
