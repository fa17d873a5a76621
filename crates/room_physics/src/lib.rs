//! # Room Physics
//!
//! Tile-grid collision detection and resolution for room-based games.
//!
//! ## Features
//!
//! - **Geometry Kernel**: Rect, circle, box, cylinder and sphere pair resolution
//! - **Tile Strategies**: Full, circle and slab tile hitboxes sharing one table
//! - **Contact Tracking**: Floor, ceiling and wall touch/leave callbacks
//! - **2D and 3D Rooms**: The same per-tick pass over square or cubic grids
//! - **Configuration**: Materials, tile types and room layouts from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use room_physics::prelude::*;
//!
//! let mut materials = MaterialLibrary::new();
//! let stone = materials.register(Material::new("stone", 0.8, 0.0));
//! let mut tile_types = TileTypeTable::new();
//! let block = tile_types.register(TileType::new("block", TileHitboxShape::Full, stone));
//!
//! let mut room: Room<Body2> = Room::new("demo", 8, 8, 16.0, tile_types)?;
//! room.set_tile(2, 7, block)?;
//! let player = room.add_entity(Body2::new(Rect::rect(32.0, 80.0, 12.0, 12.0)).with_gravity(400.0));
//!
//! for _ in 0..60 {
//!     room.tick(1.0 / 60.0);
//! }
//! assert!(room.entity(player).is_some_and(|body| body.is_on_ground()));
//! # Ok::<(), RoomError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod physics;
pub mod room;
pub mod tiles;

mod error;

pub use error::RoomError;

/// Common imports for room users
pub mod prelude {
    pub use crate::{
        RoomError,
        core::config::{BoundaryConfig, Config, ConfigError, Room3Config, RoomConfig, TileTypeConfig, WorldConfig},
        foundation::math::{Vec2, Vec3},
        physics::{
            Body2, Body3, Contact, ContactEvent, ContactHooks, ContactState, CollisionResult2,
            CollisionResult3, Hitbox2, Hitbox3, Material, MaterialId, MaterialLibrary, Shape2,
            Shape3, Sides,
            collision::{Bounds, Circle, Cuboid, Cylinder, Rect, Sphere},
        },
        room::{Boundary, EntityId, FloorMaterialPolicy, Room, Room3, SnapshotBuffer},
        tiles::{TileHitboxShape, TileType, TileTypeId, TileTypeTable},
    };
}
