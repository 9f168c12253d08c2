//! Error types for the simulation core.
//!
//! Losing a game is not an error; it is the `Stopped` run state reached
//! through a blocked spawn. These types only cover invalid construction input.

use thiserror::Error;

/// Invalid shape matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no rows or no columns")]
    Empty,

    #[error("shape row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("shape is {rows}x{cols}, at most {max} cells are supported")]
    TooLarge { rows: usize, cols: usize, max: usize },

    #[error("shape has no filled cells")]
    NoFilledCells,

    #[error("shape fill value must be non-zero")]
    ZeroFill,
}

/// Invalid piece catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("piece catalog is empty")]
    Empty,
}

/// Invalid game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    BoardTooSmall { width: u16, height: u16, min: u16 },

    #[error("board must be at most {max}x{max}, got {width}x{height}")]
    BoardTooLarge { width: u16, height: u16, max: u16 },

    #[error("tick interval must be non-zero")]
    ZeroTick,

    #[error("gravity interval must be non-zero")]
    ZeroGravity,

    #[error("tick interval ({tick_ms}ms) exceeds gravity interval ({gravity_ms}ms)")]
    TickExceedsGravity { tick_ms: u32, gravity_ms: u32 },

    #[error("catalog shape {index} is {cols} columns wide, board is only {width}")]
    ShapeTooWide { index: usize, cols: usize, width: u16 },
}
