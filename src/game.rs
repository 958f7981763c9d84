//! Game state: field, cursor, score, and the select/resolve turn sequence.

use crate::cursor::{Cursor, Direction};
use crate::field::{Field, FieldError, PopResult};
use crate::tile::Tile;
use crate::vlog;
use crate::GameConfig;
use rand::Rng;
use rand::rngs::StdRng;

/// Length of one drop/fill + erase cycle while resolving, in ticks.
pub const CYCLE_TICKS: u32 = 20;

/// Tick within a cycle on which tiles fall and the board is refilled.
pub const DROP_TICK: u32 = 10;

/// Points per tile cleared by the player's pop.
const POP_TILE_POINTS: u64 = 100;
/// Bonus per bomb or line set off by the player's pop.
const POWER_POINTS: u64 = 200;
/// Base points per tile cleared by a match; the elapsed resolve ticks are added on top.
const MATCH_BASE_POINTS: u64 = 100;

/// Turn phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player: cursor moves and select are live.
    Selecting,
    /// Board is falling, refilling and clearing; input is ignored.
    Resolving {
        /// Ticks since the pop that started this resolve.
        elapsed: u32,
    },
}

/// What a single [`Game::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Selecting; nothing to do.
    Idle,
    /// Resolving, between cadence steps.
    Waiting,
    /// Tiles dropped and empty cells were refilled.
    Refilled,
    /// A match pass cleared tiles.
    Matched { count: u32, points: u64 },
    /// A match pass found nothing; back to selecting.
    Settled,
}

/// Running totals for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStats {
    pub pops: u32,
    pub tiles_popped: u32,
    pub bombs: u32,
    pub lines: u32,
    /// Match passes that cleared something.
    pub matches: u32,
    /// Most match passes in a single resolve.
    pub best_chain: u32,
}

#[derive(Debug)]
pub struct Game<R = StdRng> {
    field: Field<R>,
    cursor: Cursor,
    phase: Phase,
    score: u64,
    power_tiles: bool,
    stats: GameStats,
    /// Match passes so far in the current resolve.
    chain: u32,
    /// Cells blanked by the last pop or match pass, for the clear animation.
    cleared: Vec<(usize, usize)>,
}

impl Game<StdRng> {
    /// New session: random stable field, then one settling pass under the
    /// session's ruleset.
    pub fn new(config: &GameConfig) -> Result<Self, FieldError> {
        let mut field = match config.seed {
            Some(seed) => Field::seeded(config.width, config.height, seed)?,
            None => Field::new(config.width, config.height)?,
        };
        field.settle(config.power_tiles);
        vlog!(
            "session start: {}x{} seed={:?} power_tiles={}",
            config.width,
            config.height,
            config.seed,
            config.power_tiles
        );
        Ok(Self::with_field(field, config.power_tiles))
    }
}

impl<R: Rng> Game<R> {
    /// Session on an existing field, taken as-is.
    pub fn with_field(field: Field<R>, power_tiles: bool) -> Self {
        Self {
            field,
            cursor: Cursor::default(),
            phase: Phase::Selecting,
            score: 0,
            power_tiles,
            stats: GameStats::default(),
            chain: 0,
            cleared: Vec::new(),
        }
    }

    pub fn field(&self) -> &Field<R> {
        &self.field
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn power_tiles(&self) -> bool {
        self.power_tiles
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, Phase::Resolving { .. })
    }

    /// Move the cursor one cell. Ignored while resolving.
    pub fn move_cursor(&mut self, direction: Direction) {
        if self.is_resolving() {
            return;
        }
        self.cursor
            .step(direction, self.field.width(), self.field.height());
    }

    /// Pop the tile under the cursor and start resolving.
    /// Returns None (and does nothing) while already resolving.
    pub fn select(&mut self) -> Option<PopResult> {
        if self.is_resolving() {
            return None;
        }
        let before = self.field.tiles().to_vec();
        let (x, y) = self.cursor.position();
        let result = self.field.pop(x, y);
        self.score += pop_points(result);
        self.record_cleared(&before);

        self.stats.pops += 1;
        self.stats.tiles_popped += result.tiles;
        self.stats.bombs += result.bombs;
        self.stats.lines += result.lines;
        self.chain = 0;
        self.phase = Phase::Resolving { elapsed: 0 };
        vlog!(
            "pop ({x}, {y}): tiles={} bombs={} lines={} score={}",
            result.tiles,
            result.bombs,
            result.lines,
            self.score
        );
        Some(result)
    }

    /// Advance one tick. While resolving, drops and refills on [`DROP_TICK`]
    /// of each cycle and runs a match pass at the end of each cycle; a pass
    /// that clears nothing ends the resolve.
    pub fn tick(&mut self) -> Result<TickEvent, FieldError> {
        let elapsed = match self.phase {
            Phase::Selecting => return Ok(TickEvent::Idle),
            Phase::Resolving { elapsed } => elapsed + 1,
        };
        self.phase = Phase::Resolving { elapsed };

        if drop_due(elapsed) {
            self.field.drop();
            self.field.fill()?;
            return Ok(TickEvent::Refilled);
        }
        if !erase_due(elapsed) {
            return Ok(TickEvent::Waiting);
        }

        let before = self.field.tiles().to_vec();
        let erased = self.field.erase(self.power_tiles);
        if !erased.erased {
            self.phase = Phase::Selecting;
            self.stats.best_chain = self.stats.best_chain.max(self.chain);
            vlog!("settled after {elapsed} ticks, chain={}", self.chain);
            return Ok(TickEvent::Settled);
        }

        let points = u64::from(erased.count) * (MATCH_BASE_POINTS + u64::from(elapsed));
        self.score += points;
        self.chain += 1;
        self.stats.matches += 1;
        self.record_cleared(&before);
        vlog!(
            "match at tick {elapsed}: count={} points={points} score={}",
            erased.count,
            self.score
        );
        Ok(TickEvent::Matched {
            count: erased.count,
            points,
        })
    }

    /// Cells blanked since the last call, if any.
    pub fn take_cleared(&mut self) -> Option<Vec<(usize, usize)>> {
        if self.cleared.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.cleared))
        }
    }

    fn record_cleared(&mut self, before: &[Tile]) {
        let height = self.field.height();
        self.cleared = before
            .iter()
            .zip(self.field.tiles())
            .enumerate()
            .filter(|(_, (old, new))| !old.is_blank() && new.is_blank())
            .map(|(i, _)| (i / height, i % height))
            .collect();
    }
}

fn pop_points(result: PopResult) -> u64 {
    u64::from(result.tiles) * POP_TILE_POINTS + u64::from(result.triggered()) * POWER_POINTS
}

fn drop_due(elapsed: u32) -> bool {
    elapsed % CYCLE_TICKS == DROP_TICK
}

fn erase_due(elapsed: u32) -> bool {
    elapsed > 0 && elapsed % CYCLE_TICKS == 0
}
