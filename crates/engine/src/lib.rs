//! Game loop engine.
//!
//! Drives a [`GameSession`](crate::core::GameSession) from wall-clock time and
//! user commands. The engine knows nothing about terminals: the frontend
//! implements [`GameObserver`] and owns the event polling.

pub mod clock;
pub mod game_loop;

pub use tui_blockfall_core as core;
pub use tui_blockfall_types as types;

pub use clock::{TickSource, MAX_CATCH_UP_TICKS};
pub use game_loop::{Flow, GameLoop, GameObserver};
