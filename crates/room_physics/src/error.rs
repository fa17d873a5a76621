//! Room construction and editing errors

use crate::config::ConfigError;

/// Errors from building or editing a room
#[derive(thiserror::Error, Debug)]
pub enum RoomError {
    /// A tile write addressed a cell outside the grid
    #[error("Tile index {index:?} outside a {dims:?} grid")]
    TileOutOfBounds {
        /// Requested index
        index: Vec<usize>,
        /// Grid size in tiles
        dims: Vec<usize>,
    },

    /// A tile type name or handle the table does not know
    #[error("Unknown tile type: {0}")]
    UnknownTileType(String),

    /// A material name the library does not know
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    /// Zero-sized grid, non-positive tile size or a malformed layout
    #[error("Invalid room dimensions: {0}")]
    InvalidDimensions(String),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
