//! Piece catalog - the fixed set of spawnable shapes
//!
//! Only the spawn orientation of each piece is stored. Other orientations are
//! derived on demand with [`Shape::rotated`].

use rand::Rng;

use crate::error::CatalogError;
use crate::shape::Shape;
use crate::types::PieceKind;

/// Ordered, non-empty list of shapes to spawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCatalog {
    shapes: Vec<Shape>,
}

/// Spawn matrix for a standard piece kind.
fn standard_rows(kind: PieceKind) -> &'static [&'static [u8]] {
    match kind {
        PieceKind::I => &[&[1, 1, 1, 1]],
        PieceKind::J => &[&[1, 1, 1], &[0, 0, 1]],
        PieceKind::L => &[&[1, 1, 1], &[1, 0, 0]],
        PieceKind::O => &[&[1, 1], &[1, 1]],
        PieceKind::S => &[&[0, 1, 1], &[1, 1, 0]],
        PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
        PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
    }
}

/// Spawn shape of a standard piece.
pub fn standard_shape(kind: PieceKind) -> Shape {
    match Shape::from_rows(standard_rows(kind), kind.cell()) {
        Ok(shape) => shape,
        // The standard matrices are fixed literals that always validate.
        Err(err) => unreachable!("standard {} shape rejected: {err}", kind.letter()),
    }
}

impl PieceCatalog {
    /// The seven standard tetrominoes in order I, J, L, O, S, T, Z.
    pub fn standard() -> Self {
        Self {
            shapes: PieceKind::ALL.iter().map(|&k| standard_shape(k)).collect(),
        }
    }

    /// A custom catalog. Must contain at least one shape.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, CatalogError> {
        if shapes.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { shapes })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Uniformly pick one shape.
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Shape {
        &self.shapes[rng.random_range(0..self.shapes.len())]
    }
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
