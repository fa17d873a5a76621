//! Tile grid, tile types and tile hitbox strategies
//!
//! - [`hitbox_shape`] - Stateless collision strategies selected per tile type
//! - [`tile_type`] - The flyweight tile type table
//! - [`grid`] - Dense tile storage and the broad-phase index range

pub mod grid;
pub mod hitbox_shape;
pub mod tile_type;

pub use grid::{IndexRange, Tile, Tile3, TileGrid};
pub use hitbox_shape::TileHitboxShape;
pub use tile_type::{TileType, TileTypeId, TileTypeTable};
