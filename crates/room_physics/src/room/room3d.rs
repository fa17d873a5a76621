//! The 3D room
//!
//! Same pass as the 2D [`Room`](super::Room) over a grid of cubic cells. y is
//! vertical and grows down; layouts list one z slice at a time.

use slotmap::SlotMap;

use crate::core::config::Room3Config;
use crate::error::RoomError;
use crate::foundation::math::Vec3;
use crate::physics::collision::{CollisionResult3, Cuboid, Shape3};
use crate::physics::hitbox::Hitbox3;
use crate::physics::material::MaterialLibrary;
use crate::tiles::{Tile3, TileGrid, TileType, TileTypeId, TileTypeTable};

use super::boundary::Boundary;
use super::contact::FloorMaterialPolicy;
use super::layout::Layout;
use super::snapshot::{EntitySnapshot, RoomSnapshot3, SnapshotBuffer};
use super::{check_dimensions, in_range, layout_symbol, tile_coordinate, EntityId};

/// A 3D cell room and the entities in it
pub struct Room3<E = Box<dyn Hitbox3>> {
    layout: Layout<Tile3, 3>,
    entities: SlotMap<EntityId, E>,
    ticks: u64,
}

impl<E: Hitbox3> Room3<E> {
    /// Empty room of air cells with no boundary walls
    pub fn new(
        name: impl Into<String>,
        dims: [usize; 3],
        tile_size: f32,
        tile_types: TileTypeTable,
    ) -> Result<Self, RoomError> {
        check_dimensions(tile_size, &dims)?;
        Ok(Self {
            layout: Layout::new(name.into(), tile_size, TileGrid::new(dims, Tile3::new), tile_types),
            entities: SlotMap::with_key(),
            ticks: 0,
        })
    }

    /// Build a room from its configuration
    pub fn from_config(
        config: &Room3Config,
        materials: &MaterialLibrary,
        tile_types: &TileTypeTable,
    ) -> Result<Self, RoomError> {
        config.validate().map_err(RoomError::InvalidDimensions)?;
        let wall_material = materials
            .by_name(&config.boundary.material)
            .ok_or_else(|| RoomError::UnknownMaterial(config.boundary.material.clone()))?;

        let mut room = Self::new(
            config.name.clone(),
            [config.width, config.height, config.depth],
            config.tile_size,
            tile_types.clone(),
        )?
        .with_boundary(Boundary::new(config.boundary.sides(), wall_material))
        .with_floor_material_policy(config.floor_material_policy);

        for (z, layer) in config.layers.iter().enumerate() {
            for (y, row) in layer.iter().enumerate() {
                for (x, symbol) in row.chars().enumerate() {
                    let legend = |symbol| config.tile_type_for(symbol);
                    if let Some(id) = layout_symbol(symbol, legend, tile_types)? {
                        room.set_tile(x, y, z, id)?;
                    }
                }
            }
        }

        log::info!(
            "Built room '{}': {}x{}x{} cells of {}",
            config.name,
            config.width,
            config.height,
            config.depth,
            config.tile_size
        );
        Ok(room)
    }

    /// Set the boundary walls
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.layout.boundary = boundary;
        self
    }

    /// Set the floor material policy
    pub fn with_floor_material_policy(mut self, policy: FloorMaterialPolicy) -> Self {
        self.layout.floor_material_policy = policy;
        self
    }

    /// Room name
    pub fn name(&self) -> &str {
        &self.layout.name
    }

    /// Edge length of one cell
    pub fn tile_size(&self) -> f32 {
        self.layout.tile_size
    }

    /// Cells along x, y and z
    pub fn dims(&self) -> [usize; 3] {
        self.layout.grid.dims()
    }

    /// Size in world units
    pub fn extent(&self) -> Vec3 {
        self.layout.extent()
    }

    /// Boundary walls
    pub fn boundary(&self) -> Boundary {
        self.layout.boundary
    }

    /// Completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tile types used by this room
    pub fn tile_types(&self) -> &TileTypeTable {
        &self.layout.tile_types
    }

    /// Definition of a tile type
    pub fn tile_type(&self, id: TileTypeId) -> &TileType {
        self.layout.tile_types.get(id)
    }

    /// Whether column `x` exists
    pub fn in_tiles_x(&self, x: i64) -> bool {
        in_range(x, self.dims()[0])
    }

    /// Whether layer `y` exists
    pub fn in_tiles_y(&self, y: i64) -> bool {
        in_range(y, self.dims()[1])
    }

    /// Whether slice `z` exists
    pub fn in_tiles_z(&self, z: i64) -> bool {
        in_range(z, self.dims()[2])
    }

    /// Cell column containing world coordinate `x`
    pub fn tile_x(&self, x: f32) -> i64 {
        tile_coordinate(x, self.layout.tile_size)
    }

    /// Cell layer containing world coordinate `y`
    pub fn tile_y(&self, y: f32) -> i64 {
        tile_coordinate(y, self.layout.tile_size)
    }

    /// Cell slice containing world coordinate `z`
    pub fn tile_z(&self, z: f32) -> i64 {
        tile_coordinate(z, self.layout.tile_size)
    }

    /// World bounds of a cell
    pub fn tile_bounds(&self, x: usize, y: usize, z: usize) -> Cuboid {
        self.layout.tile_bounds([x, y, z])
    }

    /// Cell at `(x, y, z)`
    pub fn tile(&self, x: usize, y: usize, z: usize) -> Option<&Tile3> {
        self.layout.grid.get([x, y, z])
    }

    /// Cell at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the index lies outside the grid.
    pub fn tile_unchecked(&self, x: usize, y: usize, z: usize) -> &Tile3 {
        &self.layout.grid[[x, y, z]]
    }

    /// Set the type of the cell at `(x, y, z)`
    pub fn set_tile(&mut self, x: usize, y: usize, z: usize, kind: TileTypeId) -> Result<(), RoomError> {
        if !self.layout.tile_types.contains(kind) {
            return Err(RoomError::UnknownTileType(format!("{:?}", kind)));
        }
        let dims = self.layout.grid.dims();
        let cell = self
            .layout
            .grid
            .get_mut([x, y, z])
            .ok_or_else(|| RoomError::TileOutOfBounds {
                index: vec![x, y, z],
                dims: dims.to_vec(),
            })?;
        cell.kind = kind;
        log::debug!("Room '{}': cell ({}, {}, {}) is now {:?}", self.layout.name, x, y, z, kind);
        Ok(())
    }

    /// Add an entity, returning its key
    pub fn add_entity(&mut self, entity: E) -> EntityId {
        let id = self.entities.insert(entity);
        log::debug!("Room '{}': added entity {:?}", self.layout.name, id);
        id
    }

    /// Remove an entity
    pub fn remove_entity(&mut self, id: EntityId) -> Option<E> {
        self.entities.remove(id)
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&E> {
        self.entities.get(id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.entities.get_mut(id)
    }

    /// Every entity with its key
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.entities.iter()
    }

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Advance every entity by `dt`, resolve collisions and fire contact
    /// callbacks
    pub fn tick(&mut self, dt: f32) {
        for (_id, entity) in &mut self.entities {
            self.layout.update(entity, dt);
        }
        self.ticks += 1;
    }

    /// Full per-tick pass for a hitbox the room does not own
    pub fn update<H: Hitbox3 + ?Sized>(&self, hitbox: &mut H, dt: f32) -> CollisionResult3 {
        self.layout.update(hitbox, dt)
    }

    /// Resolve against cells and walls without movement or callbacks
    pub fn collide<H: Hitbox3 + ?Sized>(&self, hitbox: &mut H) -> CollisionResult3 {
        self.layout.resolve(hitbox).result()
    }

    /// Whether `shape` overlaps any solid cell
    pub fn intersects(&self, shape: &Shape3) -> bool {
        self.layout.overlapping(shape).next().is_some()
    }

    /// Solid cells overlapping `shape`
    pub fn tiles_overlapping<'a>(&'a self, shape: &'a Shape3) -> impl Iterator<Item = &'a Tile3> + 'a {
        self.layout.overlapping(shape)
    }

    /// Entities and their contact state as of the last tick
    pub fn snapshot(&self) -> RoomSnapshot3 {
        RoomSnapshot3 {
            tick: self.ticks,
            entities: self
                .entities
                .iter()
                .map(|(id, entity)| EntitySnapshot {
                    id,
                    shape: entity.shape(),
                    contact: *entity.contact_state(),
                })
                .collect(),
        }
    }

    /// Publish [`Room3::snapshot`] to `buffer`
    pub fn publish(&self, buffer: &SnapshotBuffer<Shape3>) -> bool {
        buffer.publish(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::Body3;
    use crate::physics::collision::{Cylinder, Sides, Sphere};
    use crate::physics::hitbox::{Contact, ContactHooks};
    use crate::physics::material::{Material, MaterialId};
    use crate::tiles::TileHitboxShape;
    use approx::assert_relative_eq;

    fn table() -> (TileTypeTable, TileTypeId, TileTypeId, MaterialId) {
        let mut materials = MaterialLibrary::new();
        let wood = materials.register(Material::new("wood", 0.6, 0.0));
        let mut table = TileTypeTable::new();
        let crate_type = table.register(TileType::new("crate", TileHitboxShape::Full, wood));
        let pillar = table.register(TileType::new("pillar", TileHitboxShape::Circle, wood));
        (table, crate_type, pillar, wood)
    }

    #[test]
    fn test_sphere_lands_on_cell() {
        let (table, crate_type, _, wood) = table();
        let mut room: Room3<Body3> = Room3::new("test", [4, 4, 4], 1.0, table).expect("valid room");
        room.set_tile(1, 3, 1, crate_type).expect("in range");

        let mut ball = Body3::new(Sphere::new(1.5, 2.8, 1.5, 0.25));
        let result = room.update(&mut ball, 0.0);
        assert_relative_eq!(result.dy(), -0.05, epsilon = 1e-5);
        assert!(ball.is_on_ground());
        assert_eq!(ball.contact_state().material(Contact::Floor), wood);
        assert_eq!(ball.touch_count(Contact::Floor), 1);
    }

    #[test]
    fn test_cylinder_walks_into_pillar() {
        let (table, _, pillar, _) = table();
        let mut room: Room3<Body3> = Room3::new("test", [4, 4, 4], 2.0, table).expect("valid room");
        room.set_tile(1, 0, 0, pillar).expect("in range");
        // Pillar axis at (3, 1), radius 1; body axis at (1.5, 1), radius 0.75
        let mut body = Body3::new(Cylinder::new(1.5, 0.5, 1.0, 0.75, 1.0));
        let result = room.update(&mut body, 0.0);
        assert_relative_eq!(result.displacement().x, -0.25, epsilon = 1e-5);
        assert!(result.sides().contains(Sides::RIGHT));
        assert!(body.is_on_wall());
        assert!(!body.is_on_ground());
    }

    #[test]
    fn test_front_and_back_walls() {
        let (table, _, _, _) = table();
        let room: Room3<Body3> = Room3::new("test", [2, 2, 2], 1.0, table)
            .expect("valid room")
            .with_boundary(Boundary::new(Sides::FRONT | Sides::BACK, MaterialId::NONE));
        let mut body = Body3::new(Cuboid::cuboid(0.5, 0.5, 1.5, 0.5, 0.5, 1.0));
        let result = room.update(&mut body, 0.0);
        assert_relative_eq!(result.dz(), -0.5);
        assert!(body.is_on_wall());
    }

    #[test]
    fn test_from_config_layers() {
        let (table, crate_type, pillar, _) = table();
        let mut materials = MaterialLibrary::new();
        materials.register(Material::new("wood", 0.6, 0.0));
        let config = Room3Config::new("store", 2, 2, 2)
            .with_tile_size(1.0)
            .with_legend('#', "crate")
            .with_legend('o', "pillar")
            .with_layer(["..", "##"])
            .with_layer(["o.", ".."]);

        let room: Room3 = Room3::from_config(&config, &materials, &table).expect("valid config");
        assert_eq!(room.tile(0, 1, 0).map(|c| c.kind), Some(crate_type));
        assert_eq!(room.tile(1, 1, 0).map(|c| c.kind), Some(crate_type));
        assert_eq!(room.tile_unchecked(0, 0, 1).kind, pillar);
        assert_eq!(room.tile(0, 1, 1).map(|c| c.kind), Some(TileTypeId::AIR));
        assert_eq!(room.boundary().walls, Sides::all());
        assert!(room.in_tiles_z(1));
        assert!(!room.in_tiles_z(2));
        assert_eq!(room.tile_z(1.5), 1);
    }

    #[test]
    fn test_intersects_uses_cell_shape() {
        let (table, _, pillar, _) = table();
        let mut room: Room3<Body3> = Room3::new("test", [2, 2, 2], 2.0, table).expect("valid room");
        room.set_tile(0, 0, 0, pillar).expect("in range");
        // Corner of the cell, outside the inscribed cylinder
        let corner = Shape3::Box(Cuboid::cuboid(0.0, 0.0, 0.0, 0.2, 0.2, 0.2));
        assert!(!room.intersects(&corner));
        let center = Shape3::Sphere(Sphere::new(1.0, 1.0, 1.0, 0.2));
        assert_eq!(room.tiles_overlapping(&center).count(), 1);
    }
}
