//! Terminal block-fall runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer for output. The
//! terminal belongs to the game, so logs only go to a file (`--log-file`).

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tui_blockfall::core::{GameConfig, GameSession};
use tui_blockfall::engine::{Flow, GameLoop, GameObserver};
use tui_blockfall::input::map_key;
use tui_blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_blockfall::types::Command;

/// Input poll timeout while no game is ticking.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// tui-blockfall - falling-block puzzle for the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Fixed tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u32>,

    /// Milliseconds before the piece falls one row
    #[arg(long)]
    gravity_ms: Option<u32>,

    /// Seed for the piece sequence (OS entropy if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start a game right away instead of waiting for Enter
    #[arg(long)]
    autostart: bool,
}

impl Args {
    /// Environment first, then flags on top.
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::from_env();
        let width = self.width.unwrap_or(config.width);
        let height = self.height.unwrap_or(config.height);
        config = config.with_board(width, height);
        if let Some(tick_ms) = self.tick_ms {
            config = config.with_tick_ms(tick_ms);
        }
        if let Some(gravity_ms) = self.gravity_ms {
            config = config.with_gravity_ms(gravity_ms);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_env("BLOCKFALL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

/// Terminal side of the game loop.
struct TermFrontend {
    term: TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
}

impl TermFrontend {
    fn new() -> Self {
        Self {
            term: TerminalRenderer::new(),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
        }
    }
}

impl GameObserver for TermFrontend {
    fn render(&mut self, session: &GameSession) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view.render_into(session, Viewport::new(w, h), &mut self.fb);
        self.term.draw_swap(&mut self.fb)
    }

    fn score_changed(&mut self, score: u32) {
        debug!(score, "score updated");
    }

    fn game_over(&mut self, score: u32) {
        info!(score, "you lose");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = args.config();
    info!(?config, "starting");
    let session = GameSession::new(config).context("invalid game configuration")?;

    let mut frontend = TermFrontend::new();
    frontend.term.enter()?;

    let result = run(&mut frontend, GameLoop::new(session), args.autostart);

    // Always try to restore terminal state.
    if let Err(err) = frontend.term.exit() {
        warn!(%err, "failed to restore terminal");
    }
    result
}

fn run(frontend: &mut TermFrontend, mut game: GameLoop, autostart: bool) -> Result<()> {
    if autostart {
        game.dispatch(Command::Start, Instant::now(), frontend)?;
    } else {
        game.render(frontend)?;
    }

    loop {
        let timeout = game.poll_timeout(Instant::now()).unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = map_key(key) {
                        if game.dispatch(command, Instant::now(), frontend)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(..) => {
                    frontend.term.invalidate();
                    game.render(frontend)?;
                }
                _ => {}
            }
        }

        game.advance(Instant::now(), frontend)?;
    }
}
