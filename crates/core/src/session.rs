//! Game session module - owns the complete game state
//!
//! This module ties together the board, catalog, RNG and active piece.
//! It runs gravity on a fixed accumulator, handles lock -> merge -> clear ->
//! respawn, and detects loss when a fresh piece overlaps the stack.
//!
//! The session is a plain value: nothing here is global, and all mutation goes
//! through `&mut self`, so a tick and a key command can never interleave.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::Board;
use crate::catalog::PieceCatalog;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::piece::ActivePiece;
use crate::types::{GameAction, GameEvent, RunState};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    catalog: PieceCatalog,
    rng: StdRng,
    active: Option<ActivePiece>,
    score: u32,
    lines: u32,
    /// Pieces successfully spawned since the last start.
    pieces: u32,
    run_state: RunState,
    /// Set when the session stopped because a spawn was blocked.
    game_over: bool,
    drop_timer_ms: u32,
    /// Pending events, drained by the loop after every tick or command.
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a stopped session using the standard catalog.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, PieceCatalog::standard())
    }

    /// Create a stopped session spawning from a custom catalog.
    pub fn with_catalog(config: GameConfig, catalog: PieceCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        for (index, shape) in catalog.shapes().iter().enumerate() {
            if shape.width() > config.width as usize {
                return Err(ConfigError::ShapeTooWide {
                    index,
                    cols: shape.width(),
                    width: config.width,
                });
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            board: Board::new(config.width, config.height),
            config,
            catalog,
            rng,
            active: None,
            score: 0,
            lines: 0,
            pieces: 0,
            run_state: RunState::Stopped,
            game_over: false,
            drop_timer_ms: 0,
            events: Vec::new(),
        })
    }

    /// Reset board and score, spawn the first piece and start running.
    ///
    /// Safe to call at any time; a running game is simply restarted.
    pub fn start(&mut self) {
        self.board = Board::new(self.config.width, self.config.height);
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.pieces = 0;
        self.drop_timer_ms = 0;
        self.game_over = false;
        self.run_state = RunState::Running;

        info!(
            width = self.config.width,
            height = self.config.height,
            "game started"
        );
        self.events.push(GameEvent::Started);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.spawn_next();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// True once a blocked spawn has stopped the game (until the next start).
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    /// Landing row of the active piece, if any.
    pub fn ghost_y(&self) -> Option<i16> {
        self.active.as_ref().map(|p| p.ghost_y(&self.board))
    }

    /// Drain pending events in the order they happened.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the gravity clock by `elapsed_ms`.
    ///
    /// Once the accumulator reaches the gravity interval it is reset and the
    /// piece steps down one row; a blocked step locks the piece, clears rows
    /// and spawns the next one. Returns true if the piece moved or locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.run_state.is_running() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.config.gravity_ms {
            return false;
        }
        self.drop_timer_ms = 0;

        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.soft_drop_step(&self.board).is_locked() {
            self.lock_active();
        }
        true
    }

    /// Apply a piece command. Ignored (returns false) while stopped.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if !self.run_state.is_running() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        match action {
            GameAction::MoveLeft => active.move_left(&self.board),
            GameAction::MoveRight => active.move_right(&self.board),
            GameAction::RotateCw => active.rotate_clockwise(&self.board),
            GameAction::RotateCcw => active.rotate_counterclockwise(&self.board),
            GameAction::SoftDrop => {
                if active.soft_drop_step(&self.board).is_locked() {
                    self.lock_active();
                }
                true
            }
            GameAction::HardDrop => {
                active.hard_drop(&self.board);
                self.lock_active();
                true
            }
        }
    }

    /// Merge the active piece, clear rows, score them and respawn.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board.merge(piece.shape(), piece.position());
        let rows = self.board.clear_full_rows() as u32;
        debug!(x = piece.x(), y = piece.y(), rows, "piece locked");

        if rows > 0 {
            self.lines = self.lines.saturating_add(rows);
            self.score = self
                .score
                .saturating_add(self.config.line_clear_bonus.saturating_mul(rows));
            debug!(rows, score = self.score, "rows cleared");
            self.events.push(GameEvent::ScoreChanged { score: self.score });
        }
        self.events.push(GameEvent::PieceLocked { rows_cleared: rows });

        self.spawn_next();
    }

    /// Spawn a random piece; a blocked spawn stops the game.
    fn spawn_next(&mut self) -> bool {
        let spawn = ActivePiece::spawn(&self.catalog, &mut self.rng, &self.board);
        let blocked = spawn.is_blocked();
        self.active = Some(spawn.into_piece());

        if blocked {
            self.run_state = RunState::Stopped;
            self.game_over = true;
            info!(score = self.score, lines = self.lines, "spawn blocked, game over");
            self.events.push(GameEvent::GameOver { score: self.score });
            return false;
        }

        self.pieces = self.pieces.wrapping_add(1);
        true
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: ActivePiece) {
        self.active = Some(piece);
    }
}
