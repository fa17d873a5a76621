//! Core configuration types shared by every room
//!
//! - **Config**: serde-backed descriptions of materials, tile types and rooms

pub mod config;

pub use config::{
    BoundaryConfig,
    Config,
    ConfigError,
    Room3Config,
    RoomConfig,
    TileTypeConfig,
    WorldConfig,
};
