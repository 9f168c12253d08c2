//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules and state. It has no dependency on the
//! terminal, the clock or the keyboard, which keeps it:
//!
//! - **Deterministic**: a seeded session replays the same piece sequence
//! - **Testable**: every rule is exercised without a terminal
//! - **Portable**: the same session drives the terminal frontend and benches
//!
//! # Module Structure
//!
//! - [`board`]: width x height grid with bounds-aware collision and row clearing
//! - [`shape`]: inline 0/1 piece matrices with a single rotation primitive
//! - [`catalog`]: the spawnable shapes (seven tetrominoes by default)
//! - [`piece`]: the active falling piece and its all-or-nothing moves
//! - [`session`]: run state, gravity, lock/clear/respawn, score and events
//! - [`config`]: board size and timing, with environment overrides
//!
//! # Game Rules
//!
//! - Pieces spawn top-center; a spawn that overlaps the stack ends the game
//! - Moves and rotations are rejected outright on collision (no wall kicks)
//! - Gravity steps the piece down once per interval; a blocked step locks it
//! - Every cleared row is worth a flat bonus, regardless of how many clear at once
//!
//! # Example
//!
//! ```
//! use tui_blockfall_core::{GameConfig, GameSession};
//! use tui_blockfall_types::GameAction;
//!
//! let mut game = GameSession::new(GameConfig::default().with_seed(12345)).unwrap();
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // One piece on an empty board never completes a row.
//! assert_eq!(game.score(), 0);
//! assert_eq!(game.board().filled_cells(), 4);
//! ```

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod piece;
pub mod session;
pub mod shape;

pub use tui_blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use catalog::{standard_shape, PieceCatalog};
pub use config::GameConfig;
pub use error::{CatalogError, ConfigError, ShapeError};
pub use piece::{ActivePiece, DropOutcome, Spawn};
pub use session::GameSession;
pub use shape::Shape;
