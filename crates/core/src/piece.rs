//! Active piece controller
//!
//! Holds the falling shape and its anchor on the board. Every command is
//! all-or-nothing: the candidate placement is checked against the board and
//! the piece is left untouched when it collides. Rotation never nudges the
//! piece sideways to make room.

use rand::Rng;

use crate::board::Board;
use crate::catalog::PieceCatalog;
use crate::shape::Shape;
use crate::types::{Position, RotationDir};

/// Result of a downward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Piece moved down (by `rows` for a hard drop, 1 for a soft step).
    Moved { rows: u16 },
    /// Piece can go no further and must be merged into the board.
    Locked { rows: u16 },
}

impl DropOutcome {
    pub fn is_locked(&self) -> bool {
        matches!(self, DropOutcome::Locked { .. })
    }
}

/// Result of placing a fresh piece at the spawn position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spawn {
    Ready(ActivePiece),
    /// The spawn placement already overlaps the board or the ceiling.
    /// The piece is still returned so it can be drawn on the final frame.
    Blocked(ActivePiece),
}

impl Spawn {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Spawn::Blocked(_))
    }

    pub fn into_piece(self) -> ActivePiece {
        match self {
            Spawn::Ready(p) | Spawn::Blocked(p) => p,
        }
    }
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    shape: Shape,
    pos: Position,
}

impl ActivePiece {
    /// Place `shape` at an explicit anchor without any collision check.
    pub fn new(shape: Shape, pos: Position) -> Self {
        Self { shape, pos }
    }

    /// Spawn column for a shape: `floor(width / 2) - floor(shape_width / 2)`.
    pub fn spawn_column(board: &Board, shape: &Shape) -> i16 {
        (board.width() / 2) as i16 - (shape.width() / 2) as i16
    }

    /// Pick a random catalog shape and place it at the top-center.
    pub fn spawn<R: Rng + ?Sized>(catalog: &PieceCatalog, rng: &mut R, board: &Board) -> Spawn {
        Self::spawn_shape(catalog.pick_random(rng).clone(), board)
    }

    /// Place a specific shape at the top-center.
    pub fn spawn_shape(shape: Shape, board: &Board) -> Spawn {
        let pos = Position::new(Self::spawn_column(board, &shape), 0);
        let piece = Self { shape, pos };
        if piece.collides(board) {
            Spawn::Blocked(piece)
        } else {
            Spawn::Ready(piece)
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn x(&self) -> i16 {
        self.pos.x
    }

    pub fn y(&self) -> i16 {
        self.pos.y
    }

    /// Absolute board coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape
            .filled()
            .map(move |(dx, dy)| self.pos.offset(dx, dy))
    }

    /// Check the current placement against the board.
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape, self.pos)
    }

    fn try_shift(&mut self, board: &Board, dx: i16, dy: i16) -> bool {
        let candidate = self.pos.offset(dx, dy);
        if board.collides(&self.shape, candidate) {
            tracing::trace!(dx, dy, x = self.pos.x, y = self.pos.y, "shift blocked");
            return false;
        }
        self.pos = candidate;
        true
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_shift(board, -1, 0)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_shift(board, 1, 0)
    }

    /// Rotate in place. A colliding rotation is discarded; there are no kicks.
    pub fn rotate(&mut self, board: &Board, dir: RotationDir) -> bool {
        let rotated = self.shape.rotated(dir);
        if board.collides(&rotated, self.pos) {
            tracing::trace!(?dir, x = self.pos.x, y = self.pos.y, "rotation blocked");
            return false;
        }
        self.shape = rotated;
        true
    }

    pub fn rotate_clockwise(&mut self, board: &Board) -> bool {
        self.rotate(board, RotationDir::Clockwise)
    }

    pub fn rotate_counterclockwise(&mut self, board: &Board) -> bool {
        self.rotate(board, RotationDir::CounterClockwise)
    }

    /// One row down; reports `Locked` when the row below is blocked.
    pub fn soft_drop_step(&mut self, board: &Board) -> DropOutcome {
        if self.try_shift(board, 0, 1) {
            DropOutcome::Moved { rows: 1 }
        } else {
            DropOutcome::Locked { rows: 0 }
        }
    }

    /// Fall until the next row would collide, then report `Locked`.
    ///
    /// A piece that already rests stays where it is, so repeating this before
    /// the lock is handled is a no-op.
    pub fn hard_drop(&mut self, board: &Board) -> DropOutcome {
        let rows = self.drop_distance(board);
        self.pos = self.pos.offset(0, rows as i16);
        DropOutcome::Locked { rows }
    }

    /// How many rows the piece can fall from where it is.
    pub fn drop_distance(&self, board: &Board) -> u16 {
        let mut rows: u16 = 0;
        while !board.collides(&self.shape, self.pos.offset(0, rows as i16 + 1)) {
            rows += 1;
        }
        rows
    }

    /// Row the piece would rest on after a hard drop (landing hint).
    pub fn ghost_y(&self, board: &Board) -> i16 {
        self.pos.y + self.drop_distance(board) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::standard_shape;
    use crate::types::PieceKind;

    fn ready(kind: PieceKind, board: &Board) -> ActivePiece {
        match ActivePiece::spawn_shape(standard_shape(kind), board) {
            Spawn::Ready(p) => p,
            Spawn::Blocked(_) => panic!("spawn unexpectedly blocked"),
        }
    }

    #[test]
    fn spawn_is_centered_at_top() {
        let board = Board::new(10, 20);
        let i = ready(PieceKind::I, &board);
        assert_eq!(i.position(), Position::new(3, 0));
        let o = ready(PieceKind::O, &board);
        assert_eq!(o.position(), Position::new(4, 0));
        let t = ready(PieceKind::T, &board);
        assert_eq!(t.position(), Position::new(4, 0));
    }

    #[test]
    fn spawn_blocked_by_occupied_cell() {
        let mut board = Board::new(10, 20);
        board.set(4, 0, 1);
        let spawn = ActivePiece::spawn_shape(standard_shape(PieceKind::O), &board);
        assert!(spawn.is_blocked());
        assert_eq!(spawn.into_piece().position(), Position::new(4, 0));
    }

    #[test]
    fn move_left_at_wall_is_reverted() {
        let board = Board::new(10, 20);
        let mut p = ActivePiece::new(standard_shape(PieceKind::O), Position::new(0, 5));
        assert!(!p.move_left(&board));
        assert_eq!(p.position(), Position::new(0, 5));
        assert!(p.move_right(&board));
        assert_eq!(p.x(), 1);
    }

    #[test]
    fn move_right_at_wall_is_reverted() {
        let board = Board::new(10, 20);
        let mut p = ActivePiece::new(standard_shape(PieceKind::I), Position::new(6, 5));
        assert!(!p.move_right(&board));
        assert_eq!(p.x(), 6);
    }

    #[test]
    fn rotation_blocked_by_floor_keeps_old_shape() {
        let board = Board::new(10, 20);
        // Horizontal bar on the last row cannot stand up.
        let mut p = ActivePiece::new(standard_shape(PieceKind::I), Position::new(3, 19));
        let before = p.shape().clone();
        assert!(!p.rotate_clockwise(&board));
        assert_eq!(p.shape(), &before);
        assert_eq!(p.position(), Position::new(3, 19));
    }

    #[test]
    fn rotation_is_not_kicked_off_the_wall() {
        let board = Board::new(10, 20);
        // Vertical bar hugging the right wall: rotating back needs 4 columns.
        let vertical = standard_shape(PieceKind::I).rotated(RotationDir::Clockwise);
        let mut p = ActivePiece::new(vertical, Position::new(9, 5));
        assert!(!p.rotate_counterclockwise(&board));
        assert_eq!(p.x(), 9);
        assert_eq!(p.shape().width(), 1);
    }

    #[test]
    fn rotate_then_rotate_back_restores_pattern() {
        let board = Board::new(10, 20);
        let mut p = ready(PieceKind::L, &board);
        p.soft_drop_step(&board);
        let original = p.shape().clone();
        assert!(p.rotate_clockwise(&board));
        assert_ne!(p.shape(), &original);
        assert!(p.rotate_counterclockwise(&board));
        assert_eq!(p.shape(), &original);
    }

    #[test]
    fn soft_drop_step_locks_on_floor() {
        let board = Board::new(10, 20);
        let mut p = ActivePiece::new(standard_shape(PieceKind::O), Position::new(4, 17));
        assert_eq!(p.soft_drop_step(&board), DropOutcome::Moved { rows: 1 });
        assert_eq!(p.y(), 18);
        assert_eq!(p.soft_drop_step(&board), DropOutcome::Locked { rows: 0 });
        assert_eq!(p.y(), 18);
    }

    #[test]
    fn hard_drop_rests_on_last_row_and_is_idempotent() {
        let board = Board::new(10, 20);
        let mut p = ready(PieceKind::T, &board);
        let outcome = p.hard_drop(&board);
        assert_eq!(outcome, DropOutcome::Locked { rows: 18 });
        let lowest = p.cells().map(|c| c.y).max().unwrap();
        assert_eq!(lowest, 19);

        let rest = p.position();
        assert_eq!(p.hard_drop(&board), DropOutcome::Locked { rows: 0 });
        assert_eq!(p.position(), rest);
    }

    #[test]
    fn hard_drop_stops_above_stack() {
        let mut board = Board::new(10, 20);
        board.set(4, 10, 1);
        let mut p = ready(PieceKind::O, &board);
        p.hard_drop(&board);
        // O occupies rows y..y+1, so it rests with its bottom on row 9.
        assert_eq!(p.y(), 8);
    }

    #[test]
    fn ghost_matches_hard_drop_target() {
        let board = Board::new(10, 20);
        let p = ready(PieceKind::S, &board);
        let ghost = p.ghost_y(&board);
        let mut dropped = p.clone();
        dropped.hard_drop(&board);
        assert_eq!(ghost, dropped.y());
        assert_eq!(p.y(), 0);
    }

    #[test]
    fn cells_are_absolute() {
        let p = ActivePiece::new(standard_shape(PieceKind::O), Position::new(2, 3));
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(2, 4),
                Position::new(3, 4)
            ]
        );
    }
}
