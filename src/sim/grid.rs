//! Grid model: cell addressing over the pixel canvas
//!
//! Entities store the top-left pixel of a cell-sized square; the cell an
//! entity occupies is the cell under its center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// 4-directional neighbours
    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.col + 1, self.row),
            Cell::new(self.col - 1, self.row),
            Cell::new(self.col, self.row + 1),
            Cell::new(self.col, self.row - 1),
        ]
    }

    /// Euclidean distance in cells
    pub fn distance(self, other: Cell) -> f32 {
        let dc = (self.col - other.col) as f32;
        let dr = (self.row - other.row) as f32;
        (dc * dc + dr * dr).sqrt()
    }
}

/// Grid dimensions derived from the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub cell_size: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cell_size: f32, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            cell_size,
            canvas_width,
            canvas_height,
            cols: (canvas_width / cell_size).floor() as i32,
            rows: (canvas_height / cell_size).floor() as i32,
        }
    }

    /// Cell containing a pixel coordinate
    #[inline]
    pub fn cell_of(&self, pixel: Vec2) -> Cell {
        Cell::new(
            (pixel.x / self.cell_size).floor() as i32,
            (pixel.y / self.cell_size).floor() as i32,
        )
    }

    /// Cell occupied by an entity whose top-left corner is `pos`, always on the grid
    #[inline]
    pub fn cell_of_entity(&self, pos: Vec2) -> Cell {
        let cell = self.cell_of(pos);
        Cell::new(
            cell.col.clamp(0, (self.cols - 1).max(0)),
            cell.row.clamp(0, (self.rows - 1).max(0)),
        )
    }

    /// Center of an entity square whose top-left corner is `pos`
    #[inline]
    pub fn center_of(&self, pos: Vec2) -> Vec2 {
        pos + Vec2::splat(self.cell_size * 0.5)
    }

    /// Top-left pixel of a cell
    #[inline]
    pub fn cell_origin(&self, cell: Cell) -> Vec2 {
        Vec2::new(cell.col as f32, cell.row as f32) * self.cell_size
    }

    /// Center pixel of a cell
    #[inline]
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        self.center_of(self.cell_origin(cell))
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.row >= 0 && cell.col < self.cols && cell.row < self.rows
    }

    #[inline]
    pub fn is_border(&self, cell: Cell) -> bool {
        cell.col == 0 || cell.row == 0 || cell.col == self.cols - 1 || cell.row == self.rows - 1
    }

    pub fn total_cells(&self) -> usize {
        (self.cols.max(0) * self.rows.max(0)) as usize
    }

    /// Largest legal top-left entity position
    pub fn max_pos(&self) -> Vec2 {
        Vec2::new(
            (self.canvas_width - self.cell_size).max(0.0),
            (self.canvas_height - self.cell_size).max(0.0),
        )
    }

    pub fn clamp_pos(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, self.max_pos())
    }

    /// Board center in pixels
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height) * 0.5
    }

    /// All non-border cells, row-major
    pub fn interior_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (1..self.rows - 1).flat_map(move |row| (1..self.cols - 1).map(move |col| Cell::new(col, row)))
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.row * self.cols + cell.col) as usize
    }
}

/// Dense per-cell membership set sized to a grid
///
/// Used for claimed territory and for flood-fill visited marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellMask {
    grid: Grid,
    bits: Vec<bool>,
    count: usize,
}

impl CellMask {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            bits: vec![false; grid.total_cells()],
            count: 0,
        }
    }

    /// Mask holding exactly the outer border ring
    pub fn with_border(grid: Grid) -> Self {
        let mut mask = Self::new(grid);
        mask.fill_border();
        mask
    }

    pub fn fill_border(&mut self) {
        let grid = self.grid;
        for col in 0..grid.cols {
            self.insert(Cell::new(col, 0));
            self.insert(Cell::new(col, grid.rows - 1));
        }
        for row in 0..grid.rows {
            self.insert(Cell::new(0, row));
            self.insert(Cell::new(grid.cols - 1, row));
        }
    }

    /// Reset to border-only
    pub fn reset_to_border(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = false);
        self.count = 0;
        self.fill_border();
    }

    /// Out-of-bounds cells are never members
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.grid.in_bounds(cell) && self.bits[self.grid.index(cell)]
    }

    /// Returns true if the cell was newly inserted
    pub fn insert(&mut self, cell: Cell) -> bool {
        if !self.grid.in_bounds(cell) {
            return false;
        }
        let idx = self.grid.index(cell);
        if self.bits[idx] {
            return false;
        }
        self.bits[idx] = true;
        self.count += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.grid.cols;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(i, _)| Cell::new(i as i32 % cols, i as i32 / cols))
    }

    /// Every member of `self` is also in `other`
    pub fn is_subset(&self, other: &CellMask) -> bool {
        self.iter().all(|c| other.contains(c))
    }

    /// Percentage of the grid covered
    pub fn percent(&self) -> f32 {
        let total = self.grid.total_cells();
        if total == 0 {
            0.0
        } else {
            self.count as f32 / total as f32 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let grid = Grid::new(20.0, 800.0, 600.0);
        assert_eq!(grid.cols, 40);
        assert_eq!(grid.rows, 30);
        assert_eq!(grid.total_cells(), 1200);

        // Partial cells are dropped
        let grid = Grid::new(20.0, 810.0, 619.0);
        assert_eq!((grid.cols, grid.rows), (40, 30));
    }

    #[test]
    fn test_cell_of_floors() {
        let grid = Grid::new(20.0, 800.0, 600.0);
        assert_eq!(grid.cell_of(Vec2::new(0.0, 0.0)), Cell::new(0, 0));
        assert_eq!(grid.cell_of(Vec2::new(19.9, 39.9)), Cell::new(0, 1));
        assert_eq!(grid.cell_of(Vec2::new(20.0, 40.0)), Cell::new(1, 2));
        // Entity at a cell origin occupies that cell
        assert_eq!(grid.cell_of_entity(Vec2::new(100.0, 60.0)), Cell::new(5, 3));
        assert_eq!(grid.cell_of_entity(Vec2::new(119.0, 79.0)), Cell::new(5, 3));
    }

    #[test]
    fn test_entity_cell_on_ragged_canvas() {
        // 810x619 leaves partial cells on the right and bottom
        let grid = Grid::new(20.0, 810.0, 619.0);
        let max = grid.max_pos();
        assert_eq!(grid.cell_of_entity(Vec2::new(max.x, 300.0)), Cell::new(39, 15));
        assert_eq!(grid.cell_of_entity(max), Cell::new(39, 29));
        assert!(grid.in_bounds(grid.cell_of_entity(max)));
        assert!(grid.is_border(grid.cell_of_entity(max)));
        // Positions past the canvas still land on the last cell
        assert_eq!(grid.cell_of_entity(Vec2::new(900.0, -5.0)), Cell::new(39, 0));
    }

    #[test]
    fn test_border_cells() {
        let grid = Grid::new(20.0, 800.0, 600.0);
        assert!(grid.is_border(Cell::new(0, 5)));
        assert!(grid.is_border(Cell::new(39, 5)));
        assert!(grid.is_border(Cell::new(5, 0)));
        assert!(grid.is_border(Cell::new(5, 29)));
        assert!(!grid.is_border(Cell::new(1, 1)));
        assert!(!grid.is_border(Cell::new(38, 28)));
    }

    #[test]
    fn test_border_mask() {
        let grid = Grid::new(20.0, 800.0, 600.0);
        let mask = CellMask::with_border(grid);
        assert_eq!(mask.len(), 2 * 40 + 2 * 28);
        assert!(mask.iter().all(|c| grid.is_border(c)));
        assert_eq!(grid.interior_cells().count(), 38 * 28);
        assert!(grid.interior_cells().all(|c| !mask.contains(c)));
    }

    #[test]
    fn test_mask_insert_counts_once() {
        let grid = Grid::new(10.0, 100.0, 100.0);
        let mut mask = CellMask::new(grid);
        assert!(mask.insert(Cell::new(3, 3)));
        assert!(!mask.insert(Cell::new(3, 3)));
        assert!(!mask.insert(Cell::new(-1, 3)));
        assert!(!mask.contains(Cell::new(10, 3)));
        assert_eq!(mask.len(), 1);

        mask.reset_to_border();
        assert!(!mask.contains(Cell::new(3, 3)));
        assert_eq!(mask.len(), 36);
    }

    #[test]
    fn test_clamp_pos() {
        let grid = Grid::new(20.0, 800.0, 600.0);
        assert_eq!(grid.clamp_pos(Vec2::new(-5.0, 900.0)), Vec2::new(0.0, 580.0));
    }
}
