//! Map cells and the dungeon grid.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Sentinel room id for cells that do not belong to a room.
pub const NO_ROOM: i32 = -1;

/// Cell terrain type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Empty = 0,
    Room = 1,
    Corridor = 2,
}

impl CellType {
    /// Check if this is walkable floor (room or corridor).
    pub const fn is_floor(&self) -> bool {
        matches!(self, CellType::Room | CellType::Corridor)
    }

    /// Get the display character for this cell type.
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Room => '.',
            CellType::Corridor => '#',
        }
    }
}

/// A single grid cell.
///
/// `room_id` is only meaningful for `Room` cells; everything else carries
/// [`NO_ROOM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub typ: CellType,
    pub room_id: i32,
}

impl Cell {
    /// Create an empty cell.
    pub const fn empty() -> Self {
        Self {
            typ: CellType::Empty,
            room_id: NO_ROOM,
        }
    }

    /// Create a room cell owned by the given room.
    pub const fn room(id: i32) -> Self {
        Self {
            typ: CellType::Room,
            room_id: id,
        }
    }

    /// Create a corridor cell.
    pub const fn corridor() -> Self {
        Self {
            typ: CellType::Corridor,
            room_id: NO_ROOM,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// Fixed-size dense cell grid, indexed `[x][y]`.
///
/// Created once per generation run. Every coordinate-taking operation
/// bounds-checks and treats out-of-range coordinates as false / no-op,
/// since callers routinely probe neighbors near the edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create a new all-empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::empty(); height]; width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a coordinate is inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Read a cell; `None` out of bounds.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if self.in_bounds(x, y) {
            Some(self.cells[x as usize][y as usize])
        } else {
            None
        }
    }

    /// Write a cell; no-op out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if self.in_bounds(x, y) {
            self.cells[x as usize][y as usize] = cell;
        }
    }

    /// Check if a coordinate is walkable floor. False out of bounds.
    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|c| c.typ.is_floor())
    }

    /// Get the owning room id at a coordinate, [`NO_ROOM`] for non-room
    /// cells and out-of-bounds coordinates.
    pub fn room_id(&self, x: i32, y: i32) -> i32 {
        match self.cell(x, y) {
            Some(c) if c.typ == CellType::Room => c.room_id,
            _ => NO_ROOM,
        }
    }

    /// Count cells of the given type.
    pub fn count(&self, typ: CellType) -> usize {
        self.cells
            .iter()
            .flat_map(|col| col.iter())
            .filter(|cell| cell.typ == typ)
            .count()
    }

    /// Render the grid as ASCII, one text row per grid row.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cells[x][y].typ.symbol());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.count(CellType::Empty), 80);
        assert_eq!(grid.count(CellType::Room), 0);
    }

    #[test]
    fn test_in_bounds() {
        let grid = Grid::new(10, 8);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(9, 7));
        assert!(!grid.in_bounds(10, 7));
        assert!(!grid.in_bounds(9, 8));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, -1));
    }

    #[test]
    fn test_out_of_bounds_is_not_an_error() {
        let mut grid = Grid::new(4, 4);
        assert!(!grid.is_floor(-1, 2));
        assert!(!grid.is_floor(4, 2));
        assert_eq!(grid.cell(100, 100), None);
        assert_eq!(grid.room_id(-5, -5), NO_ROOM);
        // Out-of-bounds writes are silently dropped
        grid.set(-1, 0, Cell::corridor());
        grid.set(4, 0, Cell::corridor());
        assert_eq!(grid.count(CellType::Corridor), 0);
    }

    #[test]
    fn test_floor_and_room_id() {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, Cell::room(3));
        grid.set(2, 1, Cell::corridor());

        assert!(grid.is_floor(1, 1));
        assert!(grid.is_floor(2, 1));
        assert!(!grid.is_floor(0, 0));

        assert_eq!(grid.room_id(1, 1), 3);
        assert_eq!(grid.room_id(2, 1), NO_ROOM);
        assert_eq!(grid.room_id(0, 0), NO_ROOM);
    }

    #[test]
    fn test_render_ascii() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 0, Cell::room(0));
        grid.set(1, 1, Cell::corridor());
        assert_eq!(grid.render_ascii(), ".  \n # \n");
    }
}
