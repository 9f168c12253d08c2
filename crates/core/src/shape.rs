//! Shape module - rectangular 0/1 piece matrices
//!
//! Shapes are stored inline (at most 4x4) so rotating one never allocates.
//! Rotation always returns a new shape; catalog entries are never mutated.

use arrayvec::ArrayVec;

use crate::error::ShapeError;
use crate::types::{Cell, RotationDir, MAX_SHAPE_CELLS};

/// A rectangular matrix of filled/empty flags plus the value written to the
/// board when the shape is merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    fill: Cell,
    /// Row-major flags (row * cols + col)
    cells: ArrayVec<bool, MAX_SHAPE_CELLS>,
}

impl Shape {
    /// Build a shape from rows of 0/1 flags (any non-zero counts as filled).
    pub fn from_rows(rows: &[&[u8]], fill: Cell) -> Result<Self, ShapeError> {
        if fill == 0 {
            return Err(ShapeError::ZeroFill);
        }
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(ShapeError::Empty);
        }
        if rows.len() * cols > MAX_SHAPE_CELLS {
            return Err(ShapeError::TooLarge {
                rows: rows.len(),
                cols,
                max: MAX_SHAPE_CELLS,
            });
        }

        let mut cells = ArrayVec::new();
        for (row, flags) in rows.iter().enumerate() {
            if flags.len() != cols {
                return Err(ShapeError::Ragged {
                    row,
                    expected: cols,
                    found: flags.len(),
                });
            }
            cells.extend(flags.iter().map(|&v| v != 0));
        }
        if !cells.iter().any(|&filled| filled) {
            return Err(ShapeError::NoFilledCells);
        }

        Ok(Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            fill,
            cells,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cols as usize
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows as usize
    }

    /// Value written into the board for each filled cell.
    pub fn fill(&self) -> Cell {
        self.fill
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.cells[row * self.width() + col]
    }

    /// Offsets `(dx, dy)` of every filled cell relative to the top-left anchor.
    pub fn filled(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        let cols = self.width();
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(move |(i, _)| ((i % cols) as i16, (i / cols) as i16))
    }

    /// Rotate by 90° in `dir`, returning a new `cols x rows` shape.
    ///
    /// This is a transpose with one axis reversed; the direction picks which:
    /// - clockwise: `new[r][c] = old[rows - 1 - c][r]`
    /// - counter-clockwise: `new[r][c] = old[c][cols - 1 - r]`
    pub fn rotated(&self, dir: RotationDir) -> Shape {
        let (rows, cols) = (self.height(), self.width());
        let mut cells = ArrayVec::new();
        for r in 0..cols {
            for c in 0..rows {
                let (src_r, src_c) = match dir {
                    RotationDir::Clockwise => (rows - 1 - c, r),
                    RotationDir::CounterClockwise => (c, cols - 1 - r),
                };
                cells.push(self.cells[src_r * cols + src_c]);
            }
        }
        Shape {
            rows: self.cols,
            cols: self.rows,
            fill: self.fill,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(shape: &Shape) -> Vec<Vec<u8>> {
        (0..shape.height())
            .map(|r| {
                (0..shape.width())
                    .map(|c| shape.is_filled(r, c) as u8)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn rotating_bar_clockwise_makes_column() {
        let bar = Shape::from_rows(&[&[1, 1, 1, 1]], 1).unwrap();
        let col = bar.rotated(RotationDir::Clockwise);
        assert_eq!((col.height(), col.width()), (4, 1));
        assert_eq!(col.filled().count(), 4);
    }

    #[test]
    fn clockwise_rotation_of_j() {
        // 111      01
        // 001  ->  01
        //          11
        let j = Shape::from_rows(&[&[1, 1, 1], &[0, 0, 1]], 2).unwrap();
        let cw = j.rotated(RotationDir::Clockwise);
        assert_eq!(rows_of(&cw), vec![vec![0, 1], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn counter_clockwise_rotation_of_t() {
        // 010      01
        // 111  ->  11
        //          01
        let t = Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]], 6).unwrap();
        let ccw = t.rotated(RotationDir::CounterClockwise);
        assert_eq!(rows_of(&ccw), vec![vec![0, 1], vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn opposite_rotations_cancel() {
        let s = Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]], 5).unwrap();
        for dir in [RotationDir::Clockwise, RotationDir::CounterClockwise] {
            assert_eq!(s.rotated(dir).rotated(dir.inverse()), s);
        }
    }

    #[test]
    fn four_turns_is_identity() {
        let l = Shape::from_rows(&[&[1, 1, 1], &[1, 0, 0]], 3).unwrap();
        let mut r = l.clone();
        for _ in 0..4 {
            r = r.rotated(RotationDir::Clockwise);
        }
        assert_eq!(r, l);
    }

    #[test]
    fn rotation_keeps_fill_value() {
        let o = Shape::from_rows(&[&[1, 1], &[1, 1]], 4).unwrap();
        assert_eq!(o.rotated(RotationDir::Clockwise).fill(), 4);
    }

    #[test]
    fn invalid_matrices_are_rejected() {
        assert_eq!(Shape::from_rows(&[], 1), Err(ShapeError::Empty));
        assert_eq!(
            Shape::from_rows(&[&[1, 1], &[1]], 1),
            Err(ShapeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Shape::from_rows(&[&[0, 0]], 1),
            Err(ShapeError::NoFilledCells)
        );
        assert_eq!(Shape::from_rows(&[&[1]], 0), Err(ShapeError::ZeroFill));
        assert!(matches!(
            Shape::from_rows(&[&[1; 5], &[1; 5], &[1; 5], &[1; 5]], 1),
            Err(ShapeError::TooLarge { .. })
        ));
    }
}
