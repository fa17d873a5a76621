//! # Room Configuration
//!
//! Serializable descriptions of everything needed to build rooms: the
//! material list, the tile type list and the rooms themselves. A
//! [`WorldConfig`] bundles all three and loads from TOML or RON through the
//! [`Config`] trait.
//!
//! ## Layouts
//!
//! Rooms are drawn as text. Each row string is one row of tiles, top row
//! first, one character per column. Characters are mapped to tile type
//! names through the `legend`; `.` and space mean air unless the legend says
//! otherwise.
//!
//! ```toml
//! [[rooms]]
//! name = "cave"
//! tile_size = 16.0
//! width = 6
//! height = 3
//! rows = ["......", "..==..", "######"]
//!
//! [rooms.legend]
//! "#" = "stone"
//! "=" = "slab"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::physics::collision::Sides;
use crate::physics::material::{Material, MaterialLibrary};
use crate::room::contact::FloorMaterialPolicy;
use crate::tiles::{TileHitboxShape, TileType, TileTypeTable};
use crate::error::RoomError;

pub use crate::config::{Config, ConfigError};

fn default_material_name() -> String {
    Material::NONE_NAME.to_string()
}

fn default_tile_size() -> f32 {
    16.0
}

/// A tile type as written in a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileTypeConfig {
    /// Unique type name, referenced from room legends
    pub name: String,
    /// Collision strategy
    #[serde(default)]
    pub hitbox: TileHitboxShape,
    /// Material name, resolved against the material list
    #[serde(default = "default_material_name")]
    pub material: String,
}

impl TileTypeConfig {
    /// Create a tile type description
    pub fn new(name: impl Into<String>, hitbox: TileHitboxShape, material: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hitbox,
            material: material.into(),
        }
    }
}

/// Which room edges act as walls, and what they are made of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Wall at x = 0
    pub left: bool,
    /// Wall at the room's right edge
    pub right: bool,
    /// Wall at y = 0
    pub ceiling: bool,
    /// Wall at the room's bottom edge
    pub floor: bool,
    /// Wall at z = 0 (3D rooms only)
    pub front: bool,
    /// Wall at the room's far edge (3D rooms only)
    pub back: bool,
    /// Material name reported when touching a boundary wall
    pub material: String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self::open()
    }
}

impl BoundaryConfig {
    /// No walls at all
    pub fn open() -> Self {
        Self {
            left: false,
            right: false,
            ceiling: false,
            floor: false,
            front: false,
            back: false,
            material: default_material_name(),
        }
    }

    /// Every edge walled
    pub fn closed() -> Self {
        Self {
            left: true,
            right: true,
            ceiling: true,
            floor: true,
            front: true,
            back: true,
            material: default_material_name(),
        }
    }

    /// Set the wall material by name
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Enabled walls as the side flag an entity gets when pushed off each
    pub fn sides(&self) -> Sides {
        let mut sides = Sides::empty();
        sides.set(Sides::LEFT, self.left);
        sides.set(Sides::RIGHT, self.right);
        sides.set(Sides::CEILING, self.ceiling);
        sides.set(Sides::FLOOR, self.floor);
        sides.set(Sides::FRONT, self.front);
        sides.set(Sides::BACK, self.back);
        sides
    }
}

/// A 2D room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Room name, used in log output
    pub name: String,
    /// Edge length of one tile in world units
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    /// Boundary walls
    #[serde(default)]
    pub boundary: BoundaryConfig,
    /// Which floor's material wins when standing on several
    #[serde(default)]
    pub floor_material_policy: FloorMaterialPolicy,
    /// Layout character to tile type name
    #[serde(default)]
    pub legend: BTreeMap<String, String>,
    /// Front layer, top row first
    #[serde(default)]
    pub rows: Vec<String>,
    /// Background layer, same format as `rows`
    #[serde(default)]
    pub back_rows: Vec<String>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self::new("room", 20, 12)
    }
}

impl RoomConfig {
    /// Empty room of `width` by `height` tiles, walled on every side
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            tile_size: default_tile_size(),
            width,
            height,
            boundary: BoundaryConfig::closed(),
            floor_material_policy: FloorMaterialPolicy::default(),
            legend: BTreeMap::new(),
            rows: Vec::new(),
            back_rows: Vec::new(),
        }
    }

    /// Set the tile size
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the boundary walls
    pub fn with_boundary(mut self, boundary: BoundaryConfig) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the floor material policy
    pub fn with_floor_material_policy(mut self, policy: FloorMaterialPolicy) -> Self {
        self.floor_material_policy = policy;
        self
    }

    /// Map a layout character to a tile type name
    pub fn with_legend(mut self, symbol: char, tile_type: impl Into<String>) -> Self {
        self.legend.insert(symbol.to_string(), tile_type.into());
        self
    }

    /// Set the front layer rows
    pub fn with_rows<S: Into<String>>(mut self, rows: impl IntoIterator<Item = S>) -> Self {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Set the background layer rows
    pub fn with_back_rows<S: Into<String>>(mut self, rows: impl IntoIterator<Item = S>) -> Self {
        self.back_rows = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Tile type name drawn by `symbol`, `None` for air
    pub fn tile_type_for(&self, symbol: char) -> Option<&str> {
        lookup_symbol(&self.legend, symbol)
    }

    /// Validate sizes and layout
    pub fn validate(&self) -> Result<(), String> {
        validate_size(self.tile_size, &[self.width, self.height])?;
        validate_legend(&self.legend)?;
        validate_rows(&self.rows, self.width, self.height, "rows")?;
        validate_rows(&self.back_rows, self.width, self.height, "back_rows")
    }
}

/// A 3D room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room3Config {
    /// Room name, used in log output
    pub name: String,
    /// Edge length of one cell in world units
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Cells along x
    pub width: usize,
    /// Cells along y (vertical)
    pub height: usize,
    /// Cells along z
    pub depth: usize,
    /// Boundary walls
    #[serde(default)]
    pub boundary: BoundaryConfig,
    /// Which floor's material wins when standing on several
    #[serde(default)]
    pub floor_material_policy: FloorMaterialPolicy,
    /// Layout character to tile type name
    #[serde(default)]
    pub legend: BTreeMap<String, String>,
    /// One row layout per z slice, nearest first
    #[serde(default)]
    pub layers: Vec<Vec<String>>,
}

impl Default for Room3Config {
    fn default() -> Self {
        Self::new("volume", 8, 8, 8)
    }
}

impl Room3Config {
    /// Empty room of the given size in cells, walled on every side
    pub fn new(name: impl Into<String>, width: usize, height: usize, depth: usize) -> Self {
        Self {
            name: name.into(),
            tile_size: default_tile_size(),
            width,
            height,
            depth,
            boundary: BoundaryConfig::closed(),
            floor_material_policy: FloorMaterialPolicy::default(),
            legend: BTreeMap::new(),
            layers: Vec::new(),
        }
    }

    /// Set the cell size
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the boundary walls
    pub fn with_boundary(mut self, boundary: BoundaryConfig) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the floor material policy
    pub fn with_floor_material_policy(mut self, policy: FloorMaterialPolicy) -> Self {
        self.floor_material_policy = policy;
        self
    }

    /// Map a layout character to a tile type name
    pub fn with_legend(mut self, symbol: char, tile_type: impl Into<String>) -> Self {
        self.legend.insert(symbol.to_string(), tile_type.into());
        self
    }

    /// Append a z slice
    pub fn with_layer<S: Into<String>>(mut self, rows: impl IntoIterator<Item = S>) -> Self {
        self.layers.push(rows.into_iter().map(Into::into).collect());
        self
    }

    /// Tile type name drawn by `symbol`, `None` for air
    pub fn tile_type_for(&self, symbol: char) -> Option<&str> {
        lookup_symbol(&self.legend, symbol)
    }

    /// Validate sizes and layout
    pub fn validate(&self) -> Result<(), String> {
        validate_size(self.tile_size, &[self.width, self.height, self.depth])?;
        validate_legend(&self.legend)?;
        if self.layers.len() > self.depth {
            return Err(format!("{} layers for a depth of {}", self.layers.len(), self.depth));
        }
        self.layers
            .iter()
            .try_for_each(|rows| validate_rows(rows, self.width, self.height, "layers"))
    }
}

/// Materials, tile types and rooms in one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Material definitions
    pub materials: Vec<Material>,
    /// Tile type definitions
    pub tile_types: Vec<TileTypeConfig>,
    /// 2D rooms
    pub rooms: Vec<RoomConfig>,
    /// 3D rooms
    pub volumes: Vec<Room3Config>,
}

impl Config for WorldConfig {}
impl Config for RoomConfig {}
impl Config for Room3Config {}

impl WorldConfig {
    /// Add a material
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    /// Add a tile type
    pub fn with_tile_type(mut self, tile_type: TileTypeConfig) -> Self {
        self.tile_types.push(tile_type);
        self
    }

    /// Add a 2D room
    pub fn with_room(mut self, room: RoomConfig) -> Self {
        self.rooms.push(room);
        self
    }

    /// Add a 3D room
    pub fn with_volume(mut self, volume: Room3Config) -> Self {
        self.volumes.push(volume);
        self
    }

    /// Look up a 2D room by name
    pub fn room(&self, name: &str) -> Option<&RoomConfig> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// Look up a 3D room by name
    pub fn volume(&self, name: &str) -> Option<&Room3Config> {
        self.volumes.iter().find(|volume| volume.name == name)
    }

    /// Register every material
    pub fn material_library(&self) -> MaterialLibrary {
        MaterialLibrary::from_materials(self.materials.iter().cloned())
    }

    /// Register every tile type, resolving material names against `materials`
    pub fn tile_type_table(&self, materials: &MaterialLibrary) -> Result<TileTypeTable, RoomError> {
        let mut table = TileTypeTable::new();
        for def in &self.tile_types {
            let material = materials
                .by_name(&def.material)
                .ok_or_else(|| RoomError::UnknownMaterial(def.material.clone()))?;
            table.register(TileType::new(def.name.clone(), def.hitbox, material));
        }
        Ok(table)
    }

    /// Validate every room
    pub fn validate(&self) -> Result<(), String> {
        for room in &self.rooms {
            room.validate().map_err(|e| format!("room '{}': {}", room.name, e))?;
        }
        for volume in &self.volumes {
            volume.validate().map_err(|e| format!("volume '{}': {}", volume.name, e))?;
        }
        Ok(())
    }
}

fn lookup_symbol(legend: &BTreeMap<String, String>, symbol: char) -> Option<&str> {
    let mut buffer = [0; 4];
    let key: &str = symbol.encode_utf8(&mut buffer);
    legend.get(key).map(String::as_str)
}

fn validate_size(tile_size: f32, dims: &[usize]) -> Result<(), String> {
    if !tile_size.is_finite() || tile_size <= 0.0 {
        return Err(format!("tile size must be positive, got {}", tile_size));
    }
    if dims.iter().any(|dim| *dim == 0) {
        return Err(format!("every dimension must be non-zero, got {:?}", dims));
    }
    Ok(())
}

fn validate_legend(legend: &BTreeMap<String, String>) -> Result<(), String> {
    match legend.keys().find(|key| key.chars().count() != 1) {
        Some(key) => Err(format!("legend key '{}' must be a single character", key)),
        None => Ok(()),
    }
}

fn validate_rows(rows: &[String], width: usize, height: usize, field: &str) -> Result<(), String> {
    if rows.len() > height {
        return Err(format!("{} has {} rows for a height of {}", field, rows.len(), height));
    }
    match rows.iter().position(|row| row.chars().count() > width) {
        Some(y) => Err(format!("{} row {} is wider than {} tiles", field, y, width)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD_TOML: &str = r#####"
        [[materials]]
        name = "stone"
        friction = 0.8

        [[materials]]
        name = "ice"
        friction = 0.05

        [[tile_types]]
        name = "block"
        hitbox = "full"
        material = "stone"

        [[tile_types]]
        name = "slab"
        hitbox = "bottom_slab"
        material = "ice"

        [[rooms]]
        name = "cave"
        width = 4
        height = 2
        rows = ["..=.", "####"]

        [rooms.boundary]
        left = true
        right = true
        material = "stone"

        [rooms.legend]
        "#" = "block"
        "=" = "slab"
    "#####;

    #[test]
    fn test_world_from_toml() {
        let world = WorldConfig::from_toml_str(WORLD_TOML).expect("valid world");
        assert!(world.validate().is_ok());

        let cave = world.room("cave").expect("cave room");
        assert_eq!(cave.tile_size, 16.0);
        assert_eq!(cave.boundary.sides(), Sides::LEFT | Sides::RIGHT);
        assert_eq!(cave.floor_material_policy, FloorMaterialPolicy::Last);
        assert_eq!(cave.tile_type_for('#'), Some("block"));
        assert_eq!(cave.tile_type_for('.'), None);
        assert_eq!(cave.rows, ["..=.", "####"]);
        assert_eq!(cave.tile_type_for('='), Some("slab"));

        let materials = world.material_library();
        let table = world.tile_type_table(&materials).expect("tile types");
        let slab = table.by_name("slab").expect("slab type");
        assert_eq!(table.get(slab).hitbox, TileHitboxShape::BottomSlab);
        assert_eq!(Some(table.get(slab).material), materials.by_name("ice"));
    }

    #[test]
    fn test_world_from_ron() {
        let ron = r#"(
            materials: [(name: "rubber", bounciness: 0.9)],
            tile_types: [(name: "pillar", hitbox: circle, material: "rubber")],
            volumes: [(
                name: "hall",
                width: 2, height: 2, depth: 1,
                floor_material_policy: first,
                legend: {"o": "pillar"},
                layers: [["o.", ".."]],
            )],
        )"#;
        let world = WorldConfig::from_ron_str(ron).expect("valid world");
        assert!(world.validate().is_ok());

        let materials = world.material_library();
        let rubber = materials.by_name("rubber").expect("rubber");
        assert_eq!(materials.get(rubber).friction, 1.0);

        let hall = world.volume("hall").expect("hall volume");
        assert_eq!(hall.floor_material_policy, FloorMaterialPolicy::First);
        assert_eq!(hall.boundary.sides(), Sides::empty());
        assert_eq!(hall.tile_type_for('o'), Some("pillar"));
    }

    #[test]
    fn test_unknown_material_is_an_error() {
        let world = WorldConfig::default()
            .with_tile_type(TileTypeConfig::new("lava", TileHitboxShape::Full, "magma"));
        let err = world.tile_type_table(&world.material_library()).unwrap_err();
        assert!(matches!(err, RoomError::UnknownMaterial(name) if name == "magma"));
    }

    #[test]
    fn test_validation_rejects_bad_layouts() {
        assert!(RoomConfig::new("empty", 0, 4).validate().is_err());
        assert!(RoomConfig::new("room", 4, 4).with_tile_size(-1.0).validate().is_err());
        assert!(RoomConfig::new("room", 2, 1).with_rows(["...", "..."]).validate().is_err());
        assert!(RoomConfig::new("room", 2, 2).with_rows(["..."]).validate().is_err());

        let mut bad_legend = RoomConfig::new("room", 2, 2);
        bad_legend.legend.insert("##".to_string(), "block".to_string());
        assert!(bad_legend.validate().is_err());

        let too_deep = Room3Config::new("volume", 1, 1, 1).with_layer(["."]).with_layer(["."]);
        assert!(too_deep.validate().is_err());
    }

    #[test]
    fn test_room_survives_toml_round_trip() {
        let room = RoomConfig::new("arena", 3, 2)
            .with_legend('#', "block")
            .with_rows(["...", "###"])
            .with_boundary(BoundaryConfig::closed().with_material("stone"));
        let text = room.to_toml_string().expect("serializes");
        assert_eq!(RoomConfig::from_toml_str(&text).expect("parses"), room);
    }
}
