//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`]s. Nothing here
//! touches game state; unbound keys are simply dropped.

pub mod map;

pub use tui_blockfall_types as types;

pub use map::{map_action, map_key, should_quit};
