//! Game loop lifecycle.
//!
//! Owns the session and the tick source. There is at most one tick source at
//! any time: `start` cancels the previous one before creating a new one, and
//! the game-over transition drops it exactly once.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, trace};

use crate::clock::TickSource;
use crate::core::GameSession;
use crate::types::{Command, GameEvent};

/// Whether the caller should keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Frontend hooks driven by the loop.
///
/// `render` is called after every processed tick or command with the current
/// session; the notification hooks fire before it, in event order.
pub trait GameObserver {
    fn render(&mut self, session: &GameSession) -> Result<()>;

    fn score_changed(&mut self, _score: u32) {}

    fn game_over(&mut self, _score: u32) {}
}

#[derive(Debug)]
pub struct GameLoop {
    session: GameSession,
    ticker: Option<TickSource>,
    ticks: u64,
}

impl GameLoop {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            ticker: None,
            ticks: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// True while a tick source exists (between start and game over).
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Ticks processed since the loop was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reset the session and begin ticking.
    pub fn start(&mut self, now: Instant) {
        if self.ticker.take().is_some() {
            debug!("previous tick source cancelled");
        }
        self.session.start();
        if self.session.is_running() {
            let tick_ms = self.session.config().tick_ms;
            debug!(tick_ms, "tick source started");
            self.ticker = Some(TickSource::new(tick_ms, now));
        }
    }

    /// Input poll timeout; `None` means wait for input indefinitely.
    pub fn poll_timeout(&self, now: Instant) -> Option<Duration> {
        self.ticker.as_ref().map(|t| t.time_until_next(now))
    }

    /// Run every tick due at `now`, rendering after each. Returns ticks run.
    pub fn advance<O>(&mut self, now: Instant, observer: &mut O) -> Result<u32>
    where
        O: GameObserver + ?Sized,
    {
        let (due, tick_ms) = match self.ticker.as_mut() {
            Some(ticker) => (ticker.poll(now), ticker.interval_ms()),
            None => return Ok(0),
        };

        let mut ran = 0;
        for _ in 0..due {
            // Game over inside this batch stops the rest of it.
            if self.ticker.is_none() {
                break;
            }
            self.session.tick(tick_ms);
            self.ticks += 1;
            ran += 1;
            self.publish(observer)?;
        }
        Ok(ran)
    }

    /// Apply one user command and render the result.
    pub fn dispatch<O>(&mut self, command: Command, now: Instant, observer: &mut O) -> Result<Flow>
    where
        O: GameObserver + ?Sized,
    {
        match command {
            Command::Quit => {
                info!(score = self.session.score(), "quit requested");
                return Ok(Flow::Quit);
            }
            Command::Start => self.start(now),
            Command::Action(action) => {
                if !self.session.apply_action(action) {
                    trace!(action = action.as_str(), "action had no effect");
                }
            }
        }
        self.publish(observer)?;
        Ok(Flow::Continue)
    }

    /// Render without advancing (first frame, terminal resize).
    pub fn render<O>(&self, observer: &mut O) -> Result<()>
    where
        O: GameObserver + ?Sized,
    {
        observer.render(&self.session)
    }

    fn publish<O>(&mut self, observer: &mut O) -> Result<()>
    where
        O: GameObserver + ?Sized,
    {
        for event in self.session.take_events() {
            match event {
                GameEvent::ScoreChanged { score } => observer.score_changed(score),
                GameEvent::GameOver { score } => {
                    if self.ticker.take().is_some() {
                        info!(score, ticks = self.ticks, "tick source stopped");
                    }
                    observer.game_over(score);
                }
                GameEvent::Started | GameEvent::PieceLocked { .. } => {}
            }
        }
        observer.render(&self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{standard_shape, GameConfig, PieceCatalog};
    use crate::types::{GameAction, PieceKind};

    #[derive(Default)]
    struct Recorder {
        renders: usize,
        scores: Vec<u32>,
        game_overs: Vec<u32>,
    }

    impl GameObserver for Recorder {
        fn render(&mut self, _session: &GameSession) -> Result<()> {
            self.renders += 1;
            Ok(())
        }

        fn score_changed(&mut self, score: u32) {
            self.scores.push(score);
        }

        fn game_over(&mut self, score: u32) {
            self.game_overs.push(score);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn standard_loop() -> GameLoop {
        let session = GameSession::new(GameConfig::default().with_seed(7)).unwrap();
        GameLoop::new(session)
    }

    /// 4x4 board fed only with one kind of piece.
    fn tiny_loop(kind: PieceKind) -> GameLoop {
        let catalog = PieceCatalog::new(vec![standard_shape(kind)]).unwrap();
        let config = GameConfig::default().with_board(4, 4).with_seed(1);
        GameLoop::new(GameSession::with_catalog(config, catalog).unwrap())
    }

    #[test]
    fn idle_loop_does_not_tick() {
        let mut game = standard_loop();
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        assert!(!game.is_ticking());
        assert_eq!(game.poll_timeout(t0), None);
        assert_eq!(game.advance(t0 + ms(1_000), &mut obs).unwrap(), 0);
        assert_eq!(obs.renders, 0);
    }

    #[test]
    fn actions_before_start_are_ignored_but_rendered() {
        let mut game = standard_loop();
        let mut obs = Recorder::default();
        let flow = game
            .dispatch(Command::Action(GameAction::HardDrop), Instant::now(), &mut obs)
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(game.session().board().filled_cells(), 0);
        assert_eq!(obs.renders, 1);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut game = standard_loop();
        let mut obs = Recorder::default();
        let flow = game.dispatch(Command::Quit, Instant::now(), &mut obs).unwrap();
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn start_reports_zero_score_and_ticks() {
        let mut game = standard_loop();
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        game.dispatch(Command::Start, t0, &mut obs).unwrap();
        assert!(game.is_ticking());
        assert_eq!(obs.scores, vec![0]);
        assert_eq!(game.poll_timeout(t0), Some(ms(16)));
        assert_eq!(game.advance(t0 + ms(16), &mut obs).unwrap(), 1);
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn restart_replaces_tick_source() {
        let mut game = standard_loop();
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        game.dispatch(Command::Start, t0, &mut obs).unwrap();
        game.dispatch(Command::Start, t0 + ms(10), &mut obs).unwrap();

        // Only the second source exists: its first tick is due at 26ms, not 16ms.
        assert_eq!(game.advance(t0 + ms(16), &mut obs).unwrap(), 0);
        assert_eq!(game.advance(t0 + ms(26), &mut obs).unwrap(), 1);
    }

    #[test]
    fn gravity_after_a_second_of_ticks() {
        let mut game = standard_loop();
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        game.start(t0);
        let y0 = game.session().active().unwrap().y();

        for i in 1..=62u64 {
            game.advance(t0 + ms(16 * i), &mut obs).unwrap();
        }
        assert_eq!(game.session().active().unwrap().y(), y0);

        game.advance(t0 + ms(16 * 63), &mut obs).unwrap();
        assert_eq!(game.session().active().unwrap().y(), y0 + 1);
        assert_eq!(obs.renders, 63);
    }

    #[test]
    fn cleared_row_is_reported() {
        let mut game = tiny_loop(PieceKind::I);
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        game.start(t0);
        game.dispatch(Command::Action(GameAction::HardDrop), t0, &mut obs)
            .unwrap();
        assert_eq!(obs.scores, vec![0, 10]);
        assert_eq!(game.session().lines(), 1);
    }

    #[test]
    fn game_over_stops_ticking_exactly_once() {
        let mut game = tiny_loop(PieceKind::O);
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        game.dispatch(Command::Start, t0, &mut obs).unwrap();

        // Two squares fill the middle columns; the third cannot spawn.
        for _ in 0..2 {
            game.dispatch(Command::Action(GameAction::HardDrop), t0, &mut obs)
                .unwrap();
        }
        assert!(!game.is_ticking());
        assert!(!game.session().is_running());
        assert_eq!(obs.game_overs, vec![0]);

        // Nothing ticks and no second notification arrives.
        assert_eq!(game.advance(t0 + ms(5_000), &mut obs).unwrap(), 0);
        game.dispatch(Command::Action(GameAction::HardDrop), t0, &mut obs)
            .unwrap();
        assert_eq!(obs.game_overs, vec![0]);

        // A new game ticks again.
        game.dispatch(Command::Start, t0 + ms(6_000), &mut obs).unwrap();
        assert!(game.is_ticking());
        assert_eq!(game.session().board().filled_cells(), 0);
    }

    #[test]
    fn game_over_by_gravity_ends_the_batch() {
        let mut game = tiny_loop(PieceKind::O);
        let mut obs = Recorder::default();
        let t0 = Instant::now();
        game.start(t0);

        let mut now = t0;
        for _ in 0..1_000 {
            now += ms(16);
            game.advance(now, &mut obs).unwrap();
            if !game.is_ticking() {
                break;
            }
        }
        assert!(!game.is_ticking());
        assert_eq!(obs.game_overs.len(), 1);
    }
}
