//! Board module - manages the game grid
//!
//! The board is a fixed `width x height` grid where each cell is either empty
//! (`0`) or holds the fill value of a merged shape.
//! Uses a flat row-major vector; dimensions never change after creation.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Row 0 is the top of the grid; anything above it is the ceiling.

use crate::config::MAX_BOARD_EDGE;
use crate::shape::Shape;
use crate::types::{Cell, Position, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    /// Build a board from explicit rows, top row first.
    ///
    /// Returns `None` if there are no rows, the rows are not all the same
    /// non-zero length, or either edge exceeds [`MAX_BOARD_EDGE`].
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let width = u16::try_from(width).ok()?;
        let height = u16::try_from(rows.len()).ok()?;
        if width > MAX_BOARD_EDGE || height > MAX_BOARD_EDGE {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: rows.concat(),
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True if (x, y) lies outside the grid on any side, ceiling included.
    pub fn is_out_of_bounds(&self, x: i16, y: i16) -> bool {
        x < 0 || y < 0 || x >= self.width as i16 || y >= self.height as i16
    }

    /// Collision predicate for a single cell.
    ///
    /// Bounds come first: a row above the top (ceiling), a column left or right
    /// of the grid, or a row below the floor all collide. Only then is the
    /// cell itself consulted.
    pub fn is_occupied_or_out_of_bounds(&self, x: i16, y: i16) -> bool {
        if y < 0 {
            return true;
        }
        if x < 0 || x >= self.width as i16 {
            return true;
        }
        if y >= self.height as i16 {
            return true;
        }
        self.get(x, y).is_some_and(|cell| cell != EMPTY)
    }

    /// Check whether `shape` anchored at `at` hits anything.
    pub fn collides(&self, shape: &Shape, at: Position) -> bool {
        shape
            .filled()
            .any(|(dx, dy)| self.is_occupied_or_out_of_bounds(at.x + dx, at.y + dy))
    }

    /// Fold every filled cell of `shape` at `at` into the board.
    ///
    /// The caller must have checked the placement with [`Board::collides`];
    /// nothing is re-checked here. Cells that would land outside the grid are
    /// skipped.
    pub fn merge(&mut self, shape: &Shape, at: Position) {
        let value = shape.fill();
        for (dx, dy) in shape.filled() {
            self.set(at.x + dx, at.y + dy, value);
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|&cell| cell != EMPTY))
    }

    /// Borrow one row, top row is 0.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Remove every full row and return how many were removed.
    ///
    /// Two-pointer compaction from the bottom up: surviving rows are copied down
    /// to a write cursor, then the rows left above the cursor are emptied. Row
    /// count is preserved and several full rows (adjacent or not) are handled
    /// in the same pass.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let mut cleared = 0;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(EMPTY);
        cleared
    }

    /// Number of non-empty cells on the board.
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != EMPTY).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}
