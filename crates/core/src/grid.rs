//! Grid module - the settled tile matrix
//!
//! The grid is a `width x height` matrix where each cell is empty or holds a
//! numbered tile. Uses a flat vector in row-major order for cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom,
//! so row `height - 1` is the floor.

use tetris_2048_types::{Cell, Tile, MAX_DIMENSION, MIN_DIMENSION};

use crate::error::{Error, Result};

/// The settled board, owned by the controller
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: u16, height: u16) -> Result<Self> {
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if !range.contains(&width) || !range.contains(&height) {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    /// Build a grid from rows of tile values (0 = empty), top row first.
    ///
    /// Intended for tests and scripted setups.
    pub fn from_rows(rows: &[&[u64]]) -> Result<Self> {
        let dimension = |len: usize| u16::try_from(len).unwrap_or(u16::MAX);
        let height = dimension(rows.len());
        let width = dimension(rows.first().map_or(0, |row| row.len()));
        let mut grid = Self::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width as usize {
                return Err(Error::InvalidDimensions {
                    width: dimension(row.len()),
                    height,
                });
            }
            for (x, &value) in row.iter().enumerate() {
                let cell = match value {
                    0 => None,
                    v => Some(Tile::new(v).ok_or_else(|| {
                        Error::InvalidConfig(format!("tile value {v} is not a power of two >= 2"))
                    })?),
                };
                grid.cells[y * width as usize + x] = cell;
            }
        }
        Ok(grid)
    }

    /// Rebuild a grid from its row-major cells, as stored in a saved game
    pub fn from_cells(width: u16, height: u16, cells: Vec<Cell>) -> Result<Self> {
        let grid = Self::new(width, height)?;
        if cells.len() != grid.cells.len() {
            return Err(Error::InvalidSave(format!(
                "expected {} cells for a {width}x{height} grid, found {}",
                grid.cells.len(),
                cells.len()
            )));
        }
        Ok(Self { cells, ..grid })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> Error {
        Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Checked read. Fails with `OutOfBounds` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Result<Cell> {
        self.cell(x, y).ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Checked write. Fails with `OutOfBounds` outside the grid.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<()> {
        let idx = self.index(x, y).ok_or_else(|| self.out_of_bounds(x, y))?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Unchecked-style read: `None` when out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Write by flat index; `idx` must come from this grid's cell range
    pub(crate) fn set_index(&mut self, idx: usize, cell: Cell) {
        self.cells[idx] = cell;
    }

    /// Check if position is within bounds and empty
    pub fn is_vacant(&self, x: i32, y: i32) -> bool {
        matches!(self.cell(x, y), Some(None))
    }

    /// Check if position is within bounds and holds a tile
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.cell(x, y), Some(Some(_)))
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Iterate a column top to bottom
    pub fn column(&self, x: usize) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width as usize;
        let len = if x < width { self.height as usize } else { 0 };
        (0..len).map(move |y| self.cells[y * width + x])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Remove row `from_row`: every row above it moves down by one and an
    /// empty row is inserted at the top.
    pub fn shift_rows_down(&mut self, from_row: usize) {
        if from_row >= self.height as usize {
            return;
        }
        let width = self.width as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=from_row).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }
        self.cells[..width].fill(None);
    }

    /// Remove every full row in a single compaction pass and return the
    /// removed row indices, bottom to top.
    ///
    /// Rows above are shifted by the number of removed rows below them, so
    /// simultaneous clears never double shift.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(None);
        cleared
    }

    /// Compact every column toward the floor, preserving tile order.
    ///
    /// Returns true if any tile moved.
    pub fn apply_gravity(&mut self) -> bool {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut moved = false;

        for x in 0..width {
            let mut write_y = height;
            for read_y in (0..height).rev() {
                let idx = read_y * width + x;
                if self.cells[idx].is_some() {
                    write_y -= 1;
                    if write_y != read_y {
                        self.cells[write_y * width + x] = self.cells[idx].take();
                        moved = true;
                    }
                }
            }
        }

        moved
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Largest tile currently on the grid
    pub fn max_tile(&self) -> Option<Tile> {
        self.cells.iter().flatten().copied().max()
    }

    /// Get a reference to the internal cells (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}
