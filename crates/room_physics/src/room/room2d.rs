//! The 2D room

use slotmap::SlotMap;

use crate::core::config::RoomConfig;
use crate::error::RoomError;
use crate::physics::collision::{CollisionResult2, Rect, Shape2};
use crate::physics::hitbox::Hitbox2;
use crate::physics::material::MaterialLibrary;
use crate::tiles::{Tile, TileGrid, TileType, TileTypeId, TileTypeTable};

use super::boundary::Boundary;
use super::contact::FloorMaterialPolicy;
use super::layout::Layout;
use super::snapshot::{EntitySnapshot, RoomSnapshot2, SnapshotBuffer};
use super::{check_dimensions, in_range, layout_symbol, tile_coordinate, EntityId};

/// A 2D tile room and the entities in it.
///
/// `E` is the stored entity type; the default holds any [`Hitbox2`]
/// implementor behind a box.
pub struct Room<E = Box<dyn Hitbox2>> {
    layout: Layout<Tile, 2>,
    entities: SlotMap<EntityId, E>,
    ticks: u64,
}

impl<E: Hitbox2> Room<E> {
    /// Empty room of `width` by `height` air tiles with no boundary walls
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        tile_size: f32,
        tile_types: TileTypeTable,
    ) -> Result<Self, RoomError> {
        check_dimensions(tile_size, &[width, height])?;
        Ok(Self {
            layout: Layout::new(name.into(), tile_size, TileGrid::new([width, height], Tile::new), tile_types),
            entities: SlotMap::with_key(),
            ticks: 0,
        })
    }

    /// Build a room from its configuration, resolving material and tile
    /// type names
    pub fn from_config(
        config: &RoomConfig,
        materials: &MaterialLibrary,
        tile_types: &TileTypeTable,
    ) -> Result<Self, RoomError> {
        config.validate().map_err(RoomError::InvalidDimensions)?;
        let wall_material = materials
            .by_name(&config.boundary.material)
            .ok_or_else(|| RoomError::UnknownMaterial(config.boundary.material.clone()))?;

        let mut room = Self::new(
            config.name.clone(),
            config.width,
            config.height,
            config.tile_size,
            tile_types.clone(),
        )?
        .with_boundary(Boundary::new(config.boundary.sides(), wall_material))
        .with_floor_material_policy(config.floor_material_policy);

        for (layer, back) in [(&config.rows, false), (&config.back_rows, true)] {
            for (y, row) in layer.iter().enumerate() {
                for (x, symbol) in row.chars().enumerate() {
                    let legend = |symbol| config.tile_type_for(symbol);
                    let Some(id) = layout_symbol(symbol, legend, tile_types)? else {
                        continue;
                    };
                    if back {
                        room.set_back_tile(x, y, id)?;
                    } else {
                        room.set_tile(x, y, id)?;
                    }
                }
            }
        }

        log::info!(
            "Built room '{}': {}x{} tiles of {}",
            config.name,
            config.width,
            config.height,
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

    /// Edge length of one tile
    pub fn tile_size(&self) -> f32 {
        self.layout.tile_size
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.layout.grid.dims()[0]
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.layout.grid.dims()[1]
    }

    /// Width in world units
    pub fn world_width(&self) -> f32 {
        self.layout.extent().x
    }

    /// Height in world units
    pub fn world_height(&self) -> f32 {
        self.layout.extent().y
    }

    /// Boundary walls
    pub fn boundary(&self) -> Boundary {
        self.layout.boundary
    }

    /// Floor material policy
    pub fn floor_material_policy(&self) -> FloorMaterialPolicy {
        self.layout.floor_material_policy
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
        in_range(x, self.width())
    }

    /// Whether row `y` exists
    pub fn in_tiles_y(&self, y: i64) -> bool {
        in_range(y, self.height())
    }

    /// Column containing world coordinate `x`; may lie outside the grid
    pub fn tile_x(&self, x: f32) -> i64 {
        tile_coordinate(x, self.layout.tile_size)
    }

    /// Row containing world coordinate `y`; may lie outside the grid
    pub fn tile_y(&self, y: f32) -> i64 {
        tile_coordinate(y, self.layout.tile_size)
    }

    /// World bounds of the tile at `(x, y)`
    pub fn tile_bounds(&self, x: usize, y: usize) -> Rect {
        self.layout.tile_bounds([x, y])
    }

    /// Tile at `(x, y)`
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.layout.grid.get([x, y])
    }

    /// Tile at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid. Use [`Room::tile`] when the
    /// index is not known to be valid.
    pub fn tile_unchecked(&self, x: usize, y: usize) -> &Tile {
        &self.layout.grid[[x, y]]
    }

    /// Set the colliding type of the tile at `(x, y)`
    pub fn set_tile(&mut self, x: usize, y: usize, front: TileTypeId) -> Result<(), RoomError> {
        let tile = self.writable_tile(x, y, front)?;
        tile.front = front;
        log::debug!("Room '{}': tile ({}, {}) is now {:?}", self.layout.name, x, y, front);
        Ok(())
    }

    /// Set the background type of the tile at `(x, y)`
    pub fn set_back_tile(&mut self, x: usize, y: usize, back: TileTypeId) -> Result<(), RoomError> {
        let tile = self.writable_tile(x, y, back)?;
        tile.back = back;
        log::debug!("Room '{}': back tile ({}, {}) is now {:?}", self.layout.name, x, y, back);
        Ok(())
    }

    /// Set the colliding type of the tile at `(x, y)` by type name
    pub fn set_tile_named(&mut self, x: usize, y: usize, name: &str) -> Result<(), RoomError> {
        let id = self
            .layout
            .tile_types
            .by_name(name)
            .ok_or_else(|| RoomError::UnknownTileType(name.to_string()))?;
        self.set_tile(x, y, id)
    }

    fn writable_tile(&mut self, x: usize, y: usize, kind: TileTypeId) -> Result<&mut Tile, RoomError> {
        if !self.layout.tile_types.contains(kind) {
            return Err(RoomError::UnknownTileType(format!("{:?}", kind)));
        }
        let dims = self.layout.grid.dims();
        self.layout
            .grid
            .get_mut([x, y])
            .ok_or_else(|| RoomError::TileOutOfBounds {
                index: vec![x, y],
                dims: dims.to_vec(),
            })
    }

    /// Add an entity, returning its key
    pub fn add_entity(&mut self, entity: E) -> EntityId {
        let id = self.entities.insert(entity);
        log::debug!("Room '{}': added entity {:?}", self.layout.name, id);
        id
    }

    /// Remove an entity
    pub fn remove_entity(&mut self, id: EntityId) -> Option<E> {
        let removed = self.entities.remove(id);
        if removed.is_some() {
            log::debug!("Room '{}': removed entity {:?}", self.layout.name, id);
        }
        removed
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
        log::trace!("Room '{}': tick {} done", self.layout.name, self.ticks);
    }

    /// Run one tick's worth of movement, collision and contact callbacks for
    /// a hitbox the room does not own
    pub fn update<H: Hitbox2 + ?Sized>(&self, hitbox: &mut H, dt: f32) -> CollisionResult2 {
        self.layout.update(hitbox, dt)
    }

    /// Resolve a hitbox against tiles and walls without moving it first or
    /// firing contact callbacks (projectiles, probes)
    pub fn collide<H: Hitbox2 + ?Sized>(&self, hitbox: &mut H) -> CollisionResult2 {
        self.layout.resolve(hitbox).result()
    }

    /// Whether `shape` overlaps any solid tile
    pub fn intersects(&self, shape: &Shape2) -> bool {
        self.layout.overlapping(shape).next().is_some()
    }

    /// Solid tiles overlapping `shape`
    pub fn tiles_overlapping<'a>(&'a self, shape: &'a Shape2) -> impl Iterator<Item = &'a Tile> + 'a {
        self.layout.overlapping(shape)
    }

    /// Entities and their contact state as of the last tick
    pub fn snapshot(&self) -> RoomSnapshot2 {
        RoomSnapshot2 {
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

    /// Publish [`Room::snapshot`] to `buffer`
    pub fn publish(&self, buffer: &SnapshotBuffer<Shape2>) -> bool {
        buffer.publish(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::body::{Body2, ContactEvent};
    use crate::physics::collision::{Bounds, Circle, Sides};
    use crate::physics::hitbox::{Contact, ContactHooks};
    use crate::physics::material::{Material, MaterialId};
    use crate::tiles::TileHitboxShape;
    use approx::assert_relative_eq;

    struct Fixture {
        stone: MaterialId,
        block: TileTypeId,
        slab: TileTypeId,
        table: TileTypeTable,
    }

    fn fixture() -> Fixture {
        let mut materials = MaterialLibrary::new();
        let stone = materials.register(Material::new("stone", 0.8, 0.0));
        let mut table = TileTypeTable::new();
        let block = table.register(TileType::new("block", TileHitboxShape::Full, stone));
        let slab = table.register(TileType::new("slab", TileHitboxShape::BottomSlab, stone));
        Fixture { stone, block, slab, table }
    }

    fn room(fixture: &Fixture) -> Room<Body2> {
        Room::new("test", 8, 8, 16.0, fixture.table.clone()).expect("valid room")
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let table = TileTypeTable::new();
        assert!(matches!(
            Room::<Body2>::new("flat", 0, 4, 16.0, table.clone()),
            Err(RoomError::InvalidDimensions(_))
        ));
        assert!(Room::<Body2>::new("tiny", 4, 4, 0.0, table).is_err());
    }

    #[test]
    fn test_coordinate_queries() {
        let f = fixture();
        let room = room(&f);
        assert_eq!(room.tile_x(31.9), 1);
        assert_eq!(room.tile_y(-0.1), -1);
        assert!(room.in_tiles_x(7));
        assert!(!room.in_tiles_x(8));
        assert!(!room.in_tiles_y(-1));
        assert_eq!(room.tile_bounds(2, 3), Rect::rect(32.0, 48.0, 16.0, 16.0));
        assert_relative_eq!(room.world_width(), 128.0);
    }

    #[test]
    fn test_set_tile_checks_bounds_and_type() {
        let f = fixture();
        let mut room = room(&f);
        room.set_tile(1, 2, f.block).expect("in range");
        assert_eq!(room.tile(1, 2).map(|t| t.front), Some(f.block));
        assert_eq!(room.tile_unchecked(1, 2).back, TileTypeId::AIR);

        assert!(matches!(room.set_tile(8, 0, f.block), Err(RoomError::TileOutOfBounds { .. })));
        let foreign = {
            let mut table = f.table.clone();
            table.register(TileType::new("extra", TileHitboxShape::Full, MaterialId::NONE))
        };
        assert!(matches!(room.set_tile(0, 0, foreign), Err(RoomError::UnknownTileType(_))));
        assert!(room.set_tile_named(0, 0, "slab").is_ok());
        assert!(room.set_tile_named(0, 0, "lava").is_err());
    }

    #[test]
    #[should_panic]
    fn test_tile_unchecked_panics_outside() {
        let f = fixture();
        let room = room(&f);
        let _tile = room.tile_unchecked(0, 8);
    }

    #[test]
    fn test_back_tiles_never_collide() {
        let f = fixture();
        let mut room = room(&f);
        room.set_back_tile(1, 1, f.block).expect("in range");
        let mut body = Body2::new(Rect::rect(18.0, 18.0, 8.0, 8.0));
        assert!(!room.collide(&mut body).is_collided());
    }

    #[test]
    fn test_collide_applies_corrections_in_order() {
        let f = fixture();
        let mut room = room(&f);
        // Two blocks side by side, mover sinking into both
        room.set_tile(1, 2, f.block).expect("in range");
        room.set_tile(2, 2, f.block).expect("in range");
        let mut body = Body2::new(Rect::rect(24.0, 20.0, 16.0, 16.0));

        let result = room.collide(&mut body);
        // The first tile lifts the mover clear, the second sees no overlap
        assert_relative_eq!(result.dy(), -4.0);
        assert!(result.floor());
        assert_eq!(result.material(), f.stone);
        assert_relative_eq!(body.bounds().bounding_box().y(), 16.0);
        assert!(body.events().is_empty());
    }

    #[test]
    fn test_boundary_clamps_and_reports_material() {
        let f = fixture();
        let room = room(&f).with_boundary(Boundary::new(Sides::LEFT | Sides::FLOOR, f.stone));
        let mut body = Body2::new(Rect::rect(-5.0, 125.0, 8.0, 8.0));

        let result = room.update(&mut body, 0.0);
        assert_relative_eq!(result.dx(), 5.0);
        assert_relative_eq!(result.dy(), -5.0);
        assert!(body.is_on_wall());
        assert!(body.is_on_ground());
        assert_eq!(body.contact_state().material(Contact::Wall), f.stone);
    }

    #[test]
    fn test_circle_rolls_onto_slab() {
        let f = fixture();
        let mut room = room(&f);
        room.set_tile(0, 1, f.slab).expect("in range");
        // Slab top at y = 24
        let mut ball = Body2::new(Circle::new(8.0, 20.0, 6.0));
        room.update(&mut ball, 0.0);
        assert!(ball.is_on_ground());
        assert_relative_eq!(ball.bounds().bounding_box().max(1), 24.0);
        assert_eq!(ball.touch_count(Contact::Floor), 1);
    }

    #[test]
    fn test_intersects_and_overlapping_tiles() {
        let f = fixture();
        let mut room = room(&f);
        room.set_tile(3, 3, f.block).expect("in range");
        room.set_tile(4, 3, f.slab).expect("in range");

        let probe = Shape2::Rect(Rect::rect(60.0, 50.0, 10.0, 2.0));
        // Crosses both tiles but only the upper half of the slab
        let hits: Vec<_> = room.tiles_overlapping(&probe).map(Tile::index).collect();
        assert_eq!(hits, vec![[3, 3]]);
        assert!(room.intersects(&probe));
        assert!(!room.intersects(&Shape2::Rect(Rect::rect(0.0, 0.0, 10.0, 10.0))));
    }

    #[test]
    fn test_owned_entities_tick_and_snapshot() {
        let f = fixture();
        let mut room: Room<Body2> = room(&f);
        for x in 0..8 {
            room.set_tile(x, 7, f.block).expect("in range");
        }
        let id = room.add_entity(Body2::new(Rect::rect(10.0, 90.0, 8.0, 8.0)).with_gravity(400.0));

        for _ in 0..60 {
            room.tick(1.0 / 60.0);
        }
        let body = room.entity(id).expect("still present");
        assert!(body.is_on_ground());
        assert_relative_eq!(body.bounds().bounding_box().max(1), 112.0, epsilon = 1e-3);
        assert_eq!(body.count(ContactEvent::Leave(Contact::Floor)), 0);

        let snapshot = room.snapshot();
        assert_eq!(snapshot.tick, 60);
        assert!(snapshot.entity(id).is_some_and(|e| e.contact.is_touching(Contact::Floor)));

        assert!(room.remove_entity(id).is_some());
        assert_eq!(room.entity_count(), 0);
        assert!(room.entity_mut(id).is_none());
    }

    #[test]
    fn test_boxed_entities() {
        let f = fixture();
        let mut room: Room = Room::new("boxed", 4, 4, 16.0, f.table.clone()).expect("valid room");
        let id = room.add_entity(Box::new(Body2::new(Rect::rect(0.0, 0.0, 4.0, 4.0))));
        room.tick(0.1);
        assert_eq!(room.entities().count(), 1);
        assert_eq!(room.entity(id).map(|e| e.position()), Some(Vec2::zeros()));
    }
}
