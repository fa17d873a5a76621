//! Dense tile storage
//!
//! [`TileGrid`] keeps one cell per tile in a flat `Vec`, x varying fastest.
//! [`IndexRange`] is the broad phase: the block of cells a bounding box can
//! touch, visited x innermost, then y, then z.

use std::ops::{Index, IndexMut};

use crate::physics::collision::Aabb;
use super::tile_type::TileTypeId;

/// A 2D tile: fixed grid position plus its front and back types.
/// Only the front type collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    index: [usize; 2],
    /// Colliding type
    pub front: TileTypeId,
    /// Background type, purely visual
    pub back: TileTypeId,
}

impl Tile {
    /// Air tile at `index`
    pub fn new(index: [usize; 2]) -> Self {
        Self {
            index,
            front: TileTypeId::AIR,
            back: TileTypeId::AIR,
        }
    }

    /// Grid position
    pub fn index(&self) -> [usize; 2] {
        self.index
    }

    /// Column
    pub fn x(&self) -> usize {
        self.index[0]
    }

    /// Row
    pub fn y(&self) -> usize {
        self.index[1]
    }
}

/// A 3D cell: fixed grid position plus its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile3 {
    index: [usize; 3],
    /// Cell type
    pub kind: TileTypeId,
}

impl Tile3 {
    /// Air cell at `index`
    pub fn new(index: [usize; 3]) -> Self {
        Self {
            index,
            kind: TileTypeId::AIR,
        }
    }

    /// Grid position
    pub fn index(&self) -> [usize; 3] {
        self.index
    }
}

/// Fixed-size `D`-dimensional grid of cells
#[derive(Debug, Clone)]
pub struct TileGrid<C, const D: usize> {
    dims: [usize; D],
    cells: Vec<C>,
}

impl<C, const D: usize> TileGrid<C, D> {
    /// Build a grid of `dims` cells, creating each from its index
    pub fn new(dims: [usize; D], init: impl FnMut([usize; D]) -> C) -> Self {
        let cells = IndexRange::full(dims).map(init).collect();
        Self { dims, cells }
    }

    /// Cells along each axis
    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `index` lies inside the grid
    pub fn contains(&self, index: [usize; D]) -> bool {
        index.iter().zip(self.dims.iter()).all(|(i, dim)| i < dim)
    }

    fn flat_index(&self, index: [usize; D]) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let mut flat = 0;
        for axis in (0..D).rev() {
            flat = flat * self.dims[axis] + index[axis];
        }
        Some(flat)
    }

    /// Checked access
    pub fn get(&self, index: [usize; D]) -> Option<&C> {
        self.flat_index(index).map(|flat| &self.cells[flat])
    }

    /// Checked mutable access
    pub fn get_mut(&mut self, index: [usize; D]) -> Option<&mut C> {
        self.flat_index(index).map(move |flat| &mut self.cells[flat])
    }

    /// Every cell, x varying fastest
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cells.iter()
    }

    /// Cells a box with `bounds` can touch on a grid of `tile_size` cells.
    ///
    /// Coordinates outside the grid clamp to the nearest edge cell. A box
    /// with no interior touches nothing.
    pub fn index_range(&self, bounds: &Aabb<D>, tile_size: f32) -> IndexRange<D> {
        if bounds.is_degenerate() || self.is_empty() || tile_size <= 0.0 {
            return IndexRange::empty();
        }
        let mut min = [0; D];
        let mut max = [0; D];
        for axis in 0..D {
            let last = self.dims[axis] - 1;
            min[axis] = cell_along(bounds.min[axis] / tile_size, last);
            // A box ending exactly on a cell boundary does not reach the next cell
            max[axis] = cell_along((bounds.max(axis) / tile_size).ceil() - 1.0, last);
        }
        IndexRange::new(min, max)
    }
}

impl<C, const D: usize> Index<[usize; D]> for TileGrid<C, D> {
    type Output = C;

    /// Unchecked access.
    ///
    /// # Panics
    ///
    /// Panics if `index` lies outside the grid.
    fn index(&self, index: [usize; D]) -> &C {
        match self.get(index) {
            Some(cell) => cell,
            None => panic!("tile index {:?} outside a {:?} grid", index, self.dims),
        }
    }
}

impl<C, const D: usize> IndexMut<[usize; D]> for TileGrid<C, D> {
    fn index_mut(&mut self, index: [usize; D]) -> &mut C {
        let dims = self.dims;
        match self.get_mut(index) {
            Some(cell) => cell,
            None => panic!("tile index {:?} outside a {:?} grid", index, dims),
        }
    }
}

/// Cell along one axis for a coordinate already divided by the tile size,
/// clamped into `0..=last`. NaN maps to 0.
fn cell_along(scaled: f32, last: usize) -> usize {
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= last as f32 {
        last
    } else {
        scaled.floor() as usize
    }
}

/// Inclusive block of grid indices, iterated x first
#[derive(Debug, Clone)]
pub struct IndexRange<const D: usize> {
    min: [usize; D],
    max: [usize; D],
    next: Option<[usize; D]>,
}

impl<const D: usize> IndexRange<D> {
    /// Range from `min` to `max` inclusive; empty if `min` exceeds `max` on any axis
    pub fn new(min: [usize; D], max: [usize; D]) -> Self {
        let valid = min.iter().zip(max.iter()).all(|(lo, hi)| lo <= hi);
        Self {
            min,
            max,
            next: valid.then_some(min),
        }
    }

    /// Range visiting nothing
    pub fn empty() -> Self {
        Self {
            min: [0; D],
            max: [0; D],
            next: None,
        }
    }

    /// Every index of a grid with `dims` cells
    pub fn full(dims: [usize; D]) -> Self {
        if dims.iter().any(|dim| *dim == 0) {
            return Self::empty();
        }
        Self::new([0; D], dims.map(|dim| dim - 1))
    }

    /// First index of the range
    pub fn lower(&self) -> [usize; D] {
        self.min
    }

    /// Last index of the range
    pub fn upper(&self) -> [usize; D] {
        self.max
    }
}

impl<const D: usize> Iterator for IndexRange<D> {
    type Item = [usize; D];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut next = current;
        self.next = None;
        for axis in 0..D {
            if next[axis] < self.max[axis] {
                next[axis] += 1;
                self.next = Some(next);
                break;
            }
            next[axis] = self.min[axis];
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::{Cuboid, Rect};

    fn grid() -> TileGrid<Tile, 2> {
        TileGrid::new([4, 3], Tile::new)
    }

    #[test]
    fn test_cells_know_their_index() {
        let grid = grid();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.get([3, 2]).map(Tile::index), Some([3, 2]));
        assert_eq!(grid[[1, 2]].x(), 1);
        assert_eq!(grid[[1, 2]].y(), 2);
        assert!(grid.get([4, 0]).is_none());
        assert!(grid.get([0, 3]).is_none());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_unchecked_access_panics() {
        let grid = grid();
        let _tile = grid[[4, 0]];
    }

    #[test]
    fn test_iteration_is_x_innermost() {
        let order: Vec<_> = IndexRange::new([1, 0], [2, 1]).collect();
        assert_eq!(order, vec![[1, 0], [2, 0], [1, 1], [2, 1]]);

        let first: Vec<_> = IndexRange::new([0, 0, 0], [1, 0, 1]).collect();
        assert_eq!(first, vec![[0, 0, 0], [1, 0, 0], [0, 0, 1], [1, 0, 1]]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert_eq!(IndexRange::new([2, 0], [1, 3]).count(), 0);
        assert_eq!(IndexRange::<2>::full([0, 5]).count(), 0);
    }

    #[test]
    fn test_index_range_covers_straddled_cells() {
        let grid = grid();
        let range = grid.index_range(&Rect::rect(12.0, 4.0, 8.0, 8.0), 8.0);
        assert_eq!(range.lower(), [1, 0]);
        assert_eq!(range.upper(), [2, 1]);
    }

    #[test]
    fn test_index_range_stops_at_exact_boundary() {
        let grid = grid();
        let range = grid.index_range(&Rect::rect(8.0, 8.0, 8.0, 8.0), 8.0);
        assert_eq!(range.collect::<Vec<_>>(), vec![[1, 1]]);
    }

    #[test]
    fn test_index_range_clamps_outside_grid() {
        let grid = grid();
        let range = grid.index_range(&Rect::rect(-50.0, 100.0, 10.0, 10.0), 8.0);
        assert_eq!(range.lower(), [0, 2]);
        assert_eq!(range.upper(), [0, 2]);

        let huge = grid.index_range(&Rect::rect(-1.0e9, -1.0e9, 2.0e9, 2.0e9), 8.0);
        assert_eq!(huge.count(), 12);
    }

    #[test]
    fn test_zero_size_bounds_touch_nothing() {
        let grid = grid();
        assert_eq!(grid.index_range(&Rect::rect(8.0, 8.0, 0.0, 4.0), 8.0).count(), 0);
    }

    #[test]
    fn test_three_dimensional_grid() {
        let mut grid: TileGrid<Tile3, 3> = TileGrid::new([2, 2, 2], Tile3::new);
        grid[[1, 0, 1]].kind = TileTypeId::AIR;
        assert_eq!(grid[[1, 0, 1]].index(), [1, 0, 1]);
        let range = grid.index_range(&Cuboid::cuboid(0.5, 0.5, 0.5, 1.0, 1.0, 1.0), 1.0);
        assert_eq!(range.count(), 8);
    }
}
