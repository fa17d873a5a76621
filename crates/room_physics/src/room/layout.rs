//! The collision pass shared by [`Room`](super::Room) and [`Room3`](super::Room3)
//!
//! A [`Layout`] is everything a pass reads: the grid, the tile types, the
//! boundary and the floor policy. It is kept apart from the entity storage so
//! entities can be borrowed mutably while the layout is borrowed shared.

use crate::foundation::math::SVector;
use crate::physics::collision::{Aabb, Bounds, CollisionResult, Shape2, Shape3};
use crate::physics::hitbox::{ContactHooks, Hitbox2, Hitbox3};
use crate::physics::material::MaterialId;
use crate::tiles::{Tile, Tile3, TileGrid, TileHitboxShape, TileTypeId, TileTypeTable};

use super::boundary::Boundary;
use super::contact::{update_contacts, Contacts, FloorMaterialPolicy};

/// A shape the tile strategies know how to resolve
pub(crate) trait TileShape<const D: usize>: Bounds<D> {
    fn collide_tile(&self, strategy: TileHitboxShape, tile: &Aabb<D>, material: MaterialId) -> CollisionResult<D>;

    fn intersects_tile(&self, strategy: TileHitboxShape, tile: &Aabb<D>) -> bool;
}

impl TileShape<2> for Shape2 {
    fn collide_tile(&self, strategy: TileHitboxShape, tile: &Aabb<2>, material: MaterialId) -> CollisionResult<2> {
        strategy.collide_2d(tile, self, material)
    }

    fn intersects_tile(&self, strategy: TileHitboxShape, tile: &Aabb<2>) -> bool {
        strategy.intersects_2d(tile, self)
    }
}

impl TileShape<3> for Shape3 {
    fn collide_tile(&self, strategy: TileHitboxShape, tile: &Aabb<3>, material: MaterialId) -> CollisionResult<3> {
        strategy.collide_3d(tile, self, material)
    }

    fn intersects_tile(&self, strategy: TileHitboxShape, tile: &Aabb<3>) -> bool {
        strategy.intersects_3d(tile, self)
    }
}

/// A grid cell; collision reads one tile type per cell
pub(crate) trait TileCell {
    fn solid_type(&self) -> TileTypeId;
}

impl TileCell for Tile {
    fn solid_type(&self) -> TileTypeId {
        self.front
    }
}

impl TileCell for Tile3 {
    fn solid_type(&self) -> TileTypeId {
        self.kind
    }
}

/// What the pass needs from a hitbox, in either dimension
pub(crate) trait Mover<const D: usize>: ContactHooks {
    type Shape: TileShape<D>;

    fn shape(&self) -> Self::Shape;

    fn position(&self) -> SVector<f32, D>;

    fn advance(&mut self, dt: f32);

    fn collide(&mut self, result: &CollisionResult<D>);
}

impl<H: Hitbox2 + ?Sized> Mover<2> for H {
    type Shape = Shape2;

    fn shape(&self) -> Shape2 {
        Hitbox2::shape(self)
    }

    fn position(&self) -> SVector<f32, 2> {
        Hitbox2::position(self)
    }

    fn advance(&mut self, dt: f32) {
        Hitbox2::advance(self, dt);
    }

    fn collide(&mut self, result: &CollisionResult<2>) {
        Hitbox2::collide(self, result);
    }
}

impl<H: Hitbox3 + ?Sized> Mover<3> for H {
    type Shape = Shape3;

    fn shape(&self) -> Shape3 {
        Hitbox3::shape(self)
    }

    fn position(&self) -> SVector<f32, 3> {
        Hitbox3::position(self)
    }

    fn advance(&mut self, dt: f32) {
        Hitbox3::advance(self, dt);
    }

    fn collide(&mut self, result: &CollisionResult<3>) {
        Hitbox3::collide(self, result);
    }
}

pub(crate) struct Layout<C, const D: usize> {
    pub(crate) name: String,
    pub(crate) tile_size: f32,
    pub(crate) grid: TileGrid<C, D>,
    pub(crate) tile_types: TileTypeTable,
    pub(crate) boundary: Boundary,
    pub(crate) floor_material_policy: FloorMaterialPolicy,
}

impl<C: TileCell, const D: usize> Layout<C, D> {
    /// Open layout with the default floor policy
    pub(crate) fn new(name: String, tile_size: f32, grid: TileGrid<C, D>, tile_types: TileTypeTable) -> Self {
        Self {
            name,
            tile_size,
            grid,
            tile_types,
            boundary: Boundary::open(),
            floor_material_policy: FloorMaterialPolicy::default(),
        }
    }

    /// World-space size of the grid
    pub(crate) fn extent(&self) -> SVector<f32, D> {
        SVector::from(self.grid.dims().map(|cells| cells as f32)) * self.tile_size
    }

    pub(crate) fn tile_bounds(&self, index: [usize; D]) -> Aabb<D> {
        Aabb::new(
            SVector::from(index.map(|i| i as f32 * self.tile_size)),
            SVector::repeat(self.tile_size),
        )
    }

    /// Tiles, then walls. Every correction is applied to the hitbox before
    /// the next obstacle is tested.
    pub(crate) fn resolve<H: Mover<D> + ?Sized>(&self, hitbox: &mut H) -> Contacts<D> {
        let mut contacts = Contacts::new(self.floor_material_policy);

        let range = self.grid.index_range(&hitbox.shape().bounding_box(), self.tile_size);
        for index in range {
            let Some(tile) = self.grid.get(index) else {
                continue;
            };
            let tile_type = self.tile_types.get(tile.solid_type());
            if !tile_type.hitbox.is_solid() {
                continue;
            }
            let result = hitbox
                .shape()
                .collide_tile(tile_type.hitbox, &self.tile_bounds(index), tile_type.material);
            if result.is_collided() {
                log::trace!(
                    "Room '{}': tile {:?} ('{}') pushes by {:?}",
                    self.name,
                    index,
                    tile_type.name,
                    result.displacement()
                );
                hitbox.collide(&result);
                contacts.record(&result);
            }
        }

        let extent = self.extent();
        for wall in Boundary::WALL_ORDER {
            let result = self.boundary.push(wall, &hitbox.shape(), &extent);
            if result.is_collided() {
                log::trace!("Room '{}': {:?} wall pushes by {:?}", self.name, wall, result.displacement());
                hitbox.collide(&result);
                contacts.record(&result);
            }
        }

        contacts
    }

    /// Move, resolve, then run the contact transitions
    pub(crate) fn update<H: Mover<D> + ?Sized>(&self, hitbox: &mut H, dt: f32) -> CollisionResult<D> {
        let before = hitbox.position();
        hitbox.advance(dt);
        let contacts = self.resolve(hitbox);
        let after = hitbox.position();
        update_contacts(hitbox, &contacts, &before, &after);
        contacts.result()
    }

    pub(crate) fn overlapping<'a, S: TileShape<D>>(&'a self, shape: &'a S) -> impl Iterator<Item = &'a C> + 'a {
        self.grid
            .index_range(&shape.bounding_box(), self.tile_size)
            .filter_map(move |index| {
                let tile = self.grid.get(index)?;
                let strategy = self.tile_types.get(tile.solid_type()).hitbox;
                shape
                    .intersects_tile(strategy, &self.tile_bounds(index))
                    .then_some(tile)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::{Body2, Body3};
    use crate::physics::collision::{Cuboid, Rect, Sides};
    use crate::physics::material::{Material, MaterialLibrary};
    use crate::tiles::TileType;
    use approx::assert_relative_eq;

    fn table() -> (TileTypeTable, TileTypeId, MaterialId) {
        let mut materials = MaterialLibrary::new();
        let stone = materials.register(Material::new("stone", 0.8, 0.0));
        let mut table = TileTypeTable::new();
        let block = table.register(TileType::new("block", TileHitboxShape::Full, stone));
        (table, block, stone)
    }

    #[test]
    fn test_same_pass_in_two_and_three_dimensions() {
        let (table, block, stone) = table();
        let mut flat: Layout<Tile, 2> = Layout::new("flat".into(), 16.0, TileGrid::new([4, 4], Tile::new), table.clone());
        flat.grid[[1, 2]].front = block;
        let mut deep: Layout<Tile3, 3> = Layout::new("deep".into(), 16.0, TileGrid::new([4, 4, 4], Tile3::new), table);
        deep.grid[[1, 2, 1]].kind = block;

        // Both bodies sink 4 units into the top of the block at y = 32
        let mut body2 = Body2::new(Rect::rect(18.0, 28.0, 8.0, 8.0));
        let mut body3 = Body3::new(Cuboid::cuboid(18.0, 28.0, 18.0, 8.0, 8.0, 8.0));
        let flat_result = flat.update(&mut body2, 0.0);
        let deep_result = deep.update(&mut body3, 0.0);

        assert_relative_eq!(flat_result.dy(), -4.0);
        assert_relative_eq!(deep_result.dy(), -4.0);
        assert_eq!(flat_result.sides(), Sides::FLOOR);
        assert_eq!(deep_result.sides(), Sides::FLOOR);
        assert_eq!(flat_result.material(), stone);
        assert_eq!(deep_result.material(), stone);
        assert!(body2.is_on_ground());
        assert!(body3.is_on_ground());
    }

    #[test]
    fn test_back_tiles_do_not_collide() {
        let (table, block, _) = table();
        let mut flat: Layout<Tile, 2> = Layout::new("flat".into(), 16.0, TileGrid::new([2, 2], Tile::new), table);
        flat.grid[[0, 0]].back = block;

        let shape = Shape2::Rect(Rect::rect(2.0, 2.0, 4.0, 4.0));
        assert_eq!(flat.overlapping(&shape).count(), 0);
        flat.grid[[0, 0]].front = block;
        assert_eq!(flat.overlapping(&shape).count(), 1);
    }
}
