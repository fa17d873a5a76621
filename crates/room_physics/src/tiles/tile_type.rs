//! Tile types
//!
//! Tiles only store a [`TileTypeId`]; the name, hitbox strategy and material
//! live once per type in the [`TileTypeTable`]. Handle 0 is always `air`,
//! which never collides.

use serde::{Deserialize, Serialize};

use crate::physics::material::MaterialId;
use super::hitbox_shape::TileHitboxShape;

/// Handle to a type registered in a [`TileTypeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TileTypeId(u16);

impl TileTypeId {
    /// Empty space
    pub const AIR: TileTypeId = TileTypeId(0);

    /// Raw index into the owning table
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Whether this is the air type
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// A kind of tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileType {
    /// Unique name used by configuration files
    pub name: String,
    /// Collision strategy shared by every tile of this type
    pub hitbox: TileHitboxShape,
    /// Material reported when something touches the tile
    pub material: MaterialId,
}

impl TileType {
    /// Name of the built-in air type
    pub const AIR_NAME: &'static str = "air";

    /// Create a tile type
    pub fn new(name: impl Into<String>, hitbox: TileHitboxShape, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            hitbox,
            material,
        }
    }

    fn air() -> Self {
        Self::new(Self::AIR_NAME, TileHitboxShape::None, MaterialId::NONE)
    }
}

/// Flyweight registry of tile types
#[derive(Debug, Clone)]
pub struct TileTypeTable {
    types: Vec<TileType>,
}

impl Default for TileTypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TileTypeTable {
    /// Table holding only `air`
    pub fn new() -> Self {
        Self {
            types: vec![TileType::air()],
        }
    }

    /// Register a tile type, returning its handle.
    ///
    /// A name registered twice keeps its first handle and takes the new
    /// definition, so tiles already placed pick up the change. `air` is
    /// fixed.
    pub fn register(&mut self, tile_type: TileType) -> TileTypeId {
        if tile_type.name == TileType::AIR_NAME {
            log::warn!("Ignoring redefinition of the '{}' tile type", TileType::AIR_NAME);
            return TileTypeId::AIR;
        }
        if let Some(existing) = self.by_name(&tile_type.name) {
            self.types[existing.index()] = tile_type;
            return existing;
        }
        let Ok(raw) = u16::try_from(self.types.len()) else {
            log::warn!("Tile type table full, '{}' maps to air", tile_type.name);
            return TileTypeId::AIR;
        };
        let id = TileTypeId(raw);
        log::debug!("Registered tile type '{}' ({:?}) as {:?}", tile_type.name, tile_type.hitbox, id);
        self.types.push(tile_type);
        id
    }

    /// Look up a handle by name
    pub fn by_name(&self, name: &str) -> Option<TileTypeId> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .and_then(|index| u16::try_from(index).ok())
            .map(TileTypeId)
    }

    /// Whether `id` was handed out by this table
    pub fn contains(&self, id: TileTypeId) -> bool {
        id.index() < self.types.len()
    }

    /// Resolve a handle. Unknown handles resolve to air.
    pub fn get(&self, id: TileTypeId) -> &TileType {
        self.types.get(id.index()).unwrap_or(&self.types[0])
    }

    /// Number of registered types, air included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: air is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over `(handle, definition)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (TileTypeId, &TileType)> {
        self.types
            .iter()
            .enumerate()
            .filter_map(|(index, t)| u16::try_from(index).ok().map(|raw| (TileTypeId(raw), t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_built_in() {
        let table = TileTypeTable::new();
        let air = table.get(TileTypeId::AIR);
        assert_eq!(air.name, "air");
        assert!(!air.hitbox.is_solid());
        assert_eq!(table.by_name("air"), Some(TileTypeId::AIR));
    }

    #[test]
    fn test_register_and_redefine() {
        let mut table = TileTypeTable::new();
        let block = table.register(TileType::new("block", TileHitboxShape::Full, MaterialId::NONE));
        let slab = table.register(TileType::new("slab", TileHitboxShape::BottomSlab, MaterialId::NONE));
        assert_ne!(block, slab);
        assert!(table.contains(slab));

        let again = table.register(TileType::new("block", TileHitboxShape::Circle, MaterialId::NONE));
        assert_eq!(again, block);
        assert_eq!(table.get(block).hitbox, TileHitboxShape::Circle);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_air_cannot_be_redefined() {
        let mut table = TileTypeTable::new();
        let id = table.register(TileType::new("air", TileHitboxShape::Full, MaterialId::NONE));
        assert_eq!(id, TileTypeId::AIR);
        assert_eq!(table.get(TileTypeId::AIR).hitbox, TileHitboxShape::None);
    }

    #[test]
    fn test_unknown_handle_resolves_to_air() {
        let table = TileTypeTable::new();
        assert!(!table.contains(TileTypeId(7)));
        assert_eq!(table.get(TileTypeId(7)).name, "air");
    }
}
