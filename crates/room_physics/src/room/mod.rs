//! Rooms
//!
//! A room owns a tile grid and the entities inside it. Every tick it moves
//! each entity, resolves it against the tiles it overlaps and the enabled
//! boundary walls, then updates the entity's contact state.
//!
//! # Module Organization
//!
//! - [`room2d`] - The 2D [`Room`]
//! - [`room3d`] - The 3D [`Room3`]
//! - [`boundary`] - Walls around the grid
//! - [`contact`] - Per-tick contact transitions
//! - [`snapshot`] - Publishing finished ticks to reader threads

pub mod boundary;
pub mod contact;
mod layout;
pub mod room2d;
pub mod room3d;
pub mod snapshot;

pub use boundary::Boundary;
pub use contact::{Contacts, FloorMaterialPolicy};
pub use room2d::Room;
pub use room3d::Room3;
pub use snapshot::{EntitySnapshot, RoomSnapshot, RoomSnapshot2, RoomSnapshot3, SnapshotBuffer};

use crate::error::RoomError;
use crate::tiles::{TileTypeId, TileTypeTable};

slotmap::new_key_type! {
    /// Key of an entity owned by a room
    pub struct EntityId;
}

/// Tile type drawn by `symbol` in a text layout. `.` and space are air
/// unless the legend maps them.
fn layout_symbol<'a>(
    symbol: char,
    legend: impl Fn(char) -> Option<&'a str>,
    tile_types: &TileTypeTable,
) -> Result<Option<TileTypeId>, RoomError> {
    match legend(symbol) {
        Some(name) => tile_types
            .by_name(name)
            .map(Some)
            .ok_or_else(|| RoomError::UnknownTileType(name.to_string())),
        None if symbol == '.' || symbol == ' ' => Ok(None),
        None => Err(RoomError::UnknownTileType(format!("layout symbol '{}'", symbol))),
    }
}

fn check_dimensions(tile_size: f32, dims: &[usize]) -> Result<(), RoomError> {
    if !tile_size.is_finite() || tile_size <= 0.0 {
        return Err(RoomError::InvalidDimensions(format!("tile size {}", tile_size)));
    }
    if dims.iter().any(|dim| *dim == 0) {
        return Err(RoomError::InvalidDimensions(format!("grid of {:?} tiles", dims)));
    }
    Ok(())
}

/// Index of the tile containing `coord` along one axis; may lie outside the grid
fn tile_coordinate(coord: f32, tile_size: f32) -> i64 {
    (coord / tile_size).floor() as i64
}

fn in_range(index: i64, len: usize) -> bool {
    usize::try_from(index).is_ok_and(|index| index < len)
}
