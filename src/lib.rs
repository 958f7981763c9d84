//! Pixel Puzzle: a tile-matching puzzle with bomb and line power tiles.
//!
//! The [`field::Field`] owns the grid and does all the rules work: chained
//! pops, match detection, gravity and refill. [`game::Game`] sequences those
//! calls over discrete ticks and keeps score. The terminal front-end lives in
//! the binary and only talks to [`game::Game`].

pub mod cursor;
pub mod field;
pub mod game;
pub mod logging;
pub mod tile;

pub use cursor::{Cursor, Direction};
pub use field::{EraseResult, Field, FieldError, PopResult};
pub use game::{Game, GameStats, Phase, TickEvent};
pub use tile::{Color, Tile};

use thiserror::Error;

/// Default board width and height.
pub const DEFAULT_SIZE: usize = 8;
/// Logic ticks per second; one tick is one animation frame of the resolve cadence.
pub const DEFAULT_TICK_RATE: f64 = 30.0;
/// Largest board side the terminal front-end can lay out.
pub const MAX_SIZE: usize = 64;
/// Accepted tick rate range, in ticks per second.
pub const MIN_TICK_RATE: f64 = 1.0;
pub const MAX_TICK_RATE: f64 = 1000.0;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Create bomb and line tiles from large matches. Off gives the plain ruleset.
    pub power_tiles: bool,
    pub tick_rate: f64,
    /// Fixed seed for a reproducible session; None draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            power_tiles: true,
            tick_rate: DEFAULT_TICK_RATE,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("board must be at most {max}x{max}, got {width}x{height}")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("tick rate must be between 1 and 1000 per second, got {0}")]
    TickRate(f64),
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_SIZE || self.height > MAX_SIZE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_SIZE,
            });
        }
        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&self.tick_rate) {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        Ok(())
    }
}
