//! Session configuration.

use crate::error::ConfigError;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, GRAVITY_MS, LINE_CLEAR_BONUS, TICK_MS};

/// Smallest accepted board edge; the standard I piece is four cells wide.
pub const MIN_BOARD_EDGE: u16 = 4;

/// Largest accepted board edge; board coordinates are `i16`.
pub const MAX_BOARD_EDGE: u16 = 255;

/// Game session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub tick_ms: u32,
    pub gravity_ms: u32,
    pub line_clear_bonus: u32,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            tick_ms: TICK_MS,
            gravity_ms: GRAVITY_MS,
            line_clear_bonus: LINE_CLEAR_BONUS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables, falling back to defaults for
    /// anything missing or unparseable.
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            width: parsed("BLOCKFALL_WIDTH").unwrap_or(defaults.width),
            height: parsed("BLOCKFALL_HEIGHT").unwrap_or(defaults.height),
            tick_ms: parsed("BLOCKFALL_TICK_MS").unwrap_or(defaults.tick_ms),
            gravity_ms: parsed("BLOCKFALL_GRAVITY_MS").unwrap_or(defaults.gravity_ms),
            line_clear_bonus: defaults.line_clear_bonus,
            seed: parsed("BLOCKFALL_SEED"),
        }
    }

    pub fn with_board(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn with_gravity_ms(mut self, gravity_ms: u32) -> Self {
        self.gravity_ms = gravity_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BOARD_EDGE || self.height < MIN_BOARD_EDGE {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_EDGE,
            });
        }
        if self.width > MAX_BOARD_EDGE || self.height > MAX_BOARD_EDGE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_EDGE,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.gravity_ms == 0 {
            return Err(ConfigError::ZeroGravity);
        }
        if self.tick_ms > self.gravity_ms {
            return Err(ConfigError::TickExceedsGravity {
                tick_ms: self.tick_ms,
                gravity_ms: self.gravity_ms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.width, 10);
        assert_eq!(cfg.height, 20);
        assert_eq!(cfg.seed, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_tiny_board() {
        let cfg = GameConfig::default().with_board(3, 20);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::BoardTooSmall {
                width: 3,
                height: 20,
                min: MIN_BOARD_EDGE
            })
        );
    }

    #[test]
    fn rejects_oversized_board() {
        assert!(GameConfig::default()
            .with_board(MAX_BOARD_EDGE, MAX_BOARD_EDGE)
            .validate()
            .is_ok());
        assert_eq!(
            GameConfig::default().with_board(40_000, 4).validate(),
            Err(ConfigError::BoardTooLarge {
                width: 40_000,
                height: 4,
                max: MAX_BOARD_EDGE
            })
        );
        assert!(matches!(
            GameConfig::default().with_board(10, 256).validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_bad_intervals() {
        assert_eq!(
            GameConfig::default().with_tick_ms(0).validate(),
            Err(ConfigError::ZeroTick)
        );
        assert_eq!(
            GameConfig::default().with_gravity_ms(0).validate(),
            Err(ConfigError::ZeroGravity)
        );
        assert_eq!(
            GameConfig::default()
                .with_tick_ms(50)
                .with_gravity_ms(20)
                .validate(),
            Err(ConfigError::TickExceedsGravity {
                tick_ms: 50,
                gravity_ms: 20
            })
        );
    }

    #[test]
    fn builder_setters_chain() {
        let cfg = GameConfig::default()
            .with_board(12, 24)
            .with_gravity_ms(500)
            .with_seed(42);
        assert_eq!((cfg.width, cfg.height), (12, 24));
        assert_eq!(cfg.gravity_ms, 500);
        assert_eq!(cfg.seed, Some(42));
    }
}
