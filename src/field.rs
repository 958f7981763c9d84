//! Field: the tile grid, match detection, chained pops, gravity and refill.

use crate::tile::{Color, Tile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} field")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("fill called without a preceding drop")]
    FillWithoutDrop,
    #[error("invalid field size {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("expected {expected} tiles, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("unknown tile character {0:?}")]
    UnknownTile(char),
}

/// Outcome of a chained pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopResult {
    /// Basic tiles cleared.
    pub tiles: u32,
    /// Bombs detonated.
    pub bombs: u32,
    /// Lines fired.
    pub lines: u32,
}

impl PopResult {
    /// Power tiles set off by the chain.
    pub fn triggered(&self) -> u32 {
        self.bombs + self.lines
    }
}

/// Outcome of one match-detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EraseResult {
    pub erased: bool,
    pub count: u32,
}

/// W x H grid of tiles. (0, 0) is the top-left cell; y grows downwards.
///
/// Reads outside the grid return [`Tile::Blank`]. Writes outside the grid are
/// rejected by [`Field::set_tile`].
#[derive(Debug, Clone)]
pub struct Field<R = StdRng> {
    width: usize,
    height: usize,
    /// Column-major: tiles[x * height + y].
    tiles: Vec<Tile>,
    /// Refill extent per column from the last `drop`; None once consumed or invalidated.
    dropped_spaces: Option<Vec<Option<usize>>>,
    rng: R,
}

impl Field<StdRng> {
    /// Random, stabilised field seeded from OS entropy.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Random, stabilised field with a fixed seed.
    pub fn seeded(width: usize, height: usize, seed: u64) -> Result<Self, FieldError> {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Field<R> {
    /// Fill every cell with a random basic tile, then erase/drop/fill until no
    /// matches remain. Power tiles are not created during this settling.
    pub fn with_rng(width: usize, height: usize, mut rng: R) -> Result<Self, FieldError> {
        check_dimensions(width, height)?;
        let tiles = (0..width * height)
            .map(|_| Tile::random_basic(&mut rng))
            .collect();
        let mut field = Self {
            width,
            height,
            tiles,
            dropped_spaces: None,
            rng,
        };
        field.settle(false);
        Ok(field)
    }

    /// Field with an explicit column-major layout. No settling is done.
    pub fn from_tiles(
        width: usize,
        height: usize,
        rng: R,
        tiles: Vec<Tile>,
    ) -> Result<Self, FieldError> {
        check_dimensions(width, height)?;
        if tiles.len() != width * height {
            return Err(FieldError::TileCountMismatch {
                expected: width * height,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
            dropped_spaces: None,
            rng,
        })
    }

    /// Field from one string per row, top row first (see [`Tile::from_char`]).
    pub fn from_rows(rows: &[&str], rng: R) -> Result<Self, FieldError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        check_dimensions(width, height)?;
        let mut tiles = vec![Tile::Blank; width * height];
        let mut parsed = 0;
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if x >= width {
                    parsed += 1;
                    continue;
                }
                tiles[x * height + y] = Tile::from_char(c).ok_or(FieldError::UnknownTile(c))?;
                parsed += 1;
            }
        }
        if parsed != width * height {
            return Err(FieldError::TileCountMismatch {
                expected: width * height,
                actual: parsed,
            });
        }
        Self::from_tiles(width, height, rng, tiles)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Column-major view of every cell.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some(x * self.height + y)
    }

    /// Tile at (x, y); Blank outside the grid.
    #[inline]
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::Blank, |i| self.tiles[i])
    }

    /// Overwrite one cell. Invalidates any pending refill from `drop`.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), FieldError> {
        let i = self.index(x, y).ok_or(FieldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.tiles[i] = tile;
        self.dropped_spaces = None;
        Ok(())
    }

    /// Internal write; callers only pass cells they have just read as non-blank.
    #[inline]
    fn put(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Clear (x, y) and set off any power tiles the clear reaches.
    ///
    /// Bombs pop their clipped 3x3 neighbourhood (x outer, y inner). Lines pop
    /// their row left to right, then their column top to bottom. Each cell is
    /// blanked before its neighbours are queued, so a cell is never counted
    /// twice and chains always end. The worklist is LIFO with each expansion
    /// pushed in reverse, which visits cells in the same order as recursion.
    pub fn pop(&mut self, x: i32, y: i32) -> PopResult {
        self.dropped_spaces = None;
        let mut result = PopResult::default();
        let mut pending = vec![(x, y)];
        while let Some((px, py)) = pending.pop() {
            let tile = self.get_tile(px, py);
            if tile.is_blank() {
                continue;
            }
            self.put(px, py, Tile::Blank);
            let start = pending.len();
            match tile {
                Tile::Blank => {}
                Tile::Basic(_) => result.tiles += 1,
                Tile::Bomb => {
                    result.bombs += 1;
                    self.bomb_targets(px, py, &mut pending);
                }
                Tile::Line => {
                    result.lines += 1;
                    self.line_targets(px, py, &mut pending);
                }
            }
            pending[start..].reverse();
        }
        result
    }

    fn bomb_targets(&self, x: i32, y: i32, out: &mut Vec<(i32, i32)>) {
        let (w, h) = (self.width as i32, self.height as i32);
        for px in (x - 1).max(0)..(x + 2).min(w) {
            for py in (y - 1).max(0)..(y + 2).min(h) {
                if (px, py) != (x, y) {
                    out.push((px, py));
                }
            }
        }
    }

    fn line_targets(&self, x: i32, y: i32, out: &mut Vec<(i32, i32)>) {
        out.extend((0..self.width as i32).filter(|&px| px != x).map(|px| (px, y)));
        out.extend((0..self.height as i32).filter(|&py| py != y).map(|py| (x, py)));
    }

    /// Plus shape centred on (x, y): the tile and its four orthogonal neighbours.
    fn plus_at(&self, x: i32, y: i32, tile: Tile) -> bool {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .iter()
            .all(|&(dx, dy)| self.get_tile(x + dx, y + dy) == tile)
    }

    /// 2x2 block with (x, y) as its top-left cell.
    fn block_at(&self, x: i32, y: i32, tile: Tile) -> bool {
        [(1, 0), (0, 1), (1, 1)]
            .iter()
            .all(|&(dx, dy)| self.get_tile(x + dx, y + dy) == tile)
    }

    fn vertical_at(&self, x: i32, y: i32, tile: Tile) -> bool {
        self.get_tile(x, y - 1) == tile && self.get_tile(x, y + 1) == tile
    }

    fn horizontal_at(&self, x: i32, y: i32, tile: Tile) -> bool {
        self.get_tile(x - 1, y) == tile && self.get_tile(x + 1, y) == tile
    }

    /// Upper bound (exclusive) for both axes of the power-tile pass. It comes
    /// from the width alone, so on a non-square field rows at y >= width - 1
    /// are never scanned for plus shapes or blocks.
    fn power_scan_bound(&self) -> i32 {
        self.width as i32 - 1
    }

    /// Clear matched tiles and report how many went.
    ///
    /// First pass: a plus shape turns its centre into a Line (5 tiles), else a
    /// 2x2 block turns its top-left into a Bomb (4 tiles). With
    /// `generate_powerups` false those centres become Blank instead. Second
    /// pass: every remaining basic tile that is the middle of a vertical or
    /// horizontal triple clears that triple (3 tiles per axis, both axes may
    /// fire for the same tile).
    pub fn erase(&mut self, generate_powerups: bool) -> EraseResult {
        self.dropped_spaces = None;
        let mut count = 0;

        let bound = self.power_scan_bound();
        for x in 0..bound {
            for y in 0..bound {
                let tile = self.get_tile(x, y);
                if !tile.is_basic() {
                    continue;
                }
                if self.plus_at(x, y, tile) {
                    self.put(x, y, if generate_powerups { Tile::Line } else { Tile::Blank });
                    for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                        self.put(x + dx, y + dy, Tile::Blank);
                    }
                    count += 5;
                } else if self.block_at(x, y, tile) {
                    self.put(x, y, if generate_powerups { Tile::Bomb } else { Tile::Blank });
                    for (dx, dy) in [(0, 1), (1, 0), (1, 1)] {
                        self.put(x + dx, y + dy, Tile::Blank);
                    }
                    count += 4;
                }
            }
        }

        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let tile = self.get_tile(x, y);
                if !tile.is_basic() {
                    continue;
                }
                let vertical = self.vertical_at(x, y, tile);
                let horizontal = self.horizontal_at(x, y, tile);
                if vertical {
                    for dy in -1..=1 {
                        self.put(x, y + dy, Tile::Blank);
                    }
                    count += 3;
                }
                if horizontal {
                    for dx in -1..=1 {
                        self.put(x + dx, y, Tile::Blank);
                    }
                    count += 3;
                }
            }
        }

        EraseResult {
            erased: count > 0,
            count,
        }
    }

    /// True if `erase` would clear anything right now.
    pub fn has_matches(&self) -> bool {
        let triples = (0..self.width as i32).any(|x| {
            (0..self.height as i32).any(|y| {
                let tile = self.get_tile(x, y);
                tile.is_basic() && (self.vertical_at(x, y, tile) || self.horizontal_at(x, y, tile))
            })
        });
        let bound = self.power_scan_bound();
        triples
            || (0..bound).any(|x| {
                (0..bound).any(|y| {
                    let tile = self.get_tile(x, y);
                    tile.is_basic() && self.block_at(x, y, tile)
                })
            })
    }

    /// Compact each column downwards; returns the refill extent per column.
    fn compact(&mut self) -> Vec<Option<usize>> {
        let h = self.height;
        self.tiles
            .chunks_mut(h)
            .map(|column| {
                let mut next = h;
                for y in (0..h).rev() {
                    let tile = column[y];
                    if !tile.is_blank() {
                        column[y] = Tile::Blank;
                        next -= 1;
                        column[next] = tile;
                    }
                }
                // Highest empty row after compaction; None when the column is full.
                next.checked_sub(1)
            })
            .collect()
    }

    fn refill(&mut self, spaces: &[Option<usize>]) {
        for (x, top) in spaces.iter().enumerate() {
            let Some(top) = *top else { continue };
            for y in 0..=top {
                self.tiles[x * self.height + y] = Tile::random_basic(&mut self.rng);
            }
        }
    }

    /// Let tiles fall to the bottom of their column, keeping their order.
    /// Must be followed by [`Field::fill`].
    #[allow(clippy::should_implement_trait)]
    pub fn drop(&mut self) {
        self.dropped_spaces = Some(self.compact());
    }

    /// Refill extent recorded by the last `drop`, if not yet consumed.
    pub fn dropped_spaces(&self) -> Option<&[Option<usize>]> {
        self.dropped_spaces.as_deref()
    }

    /// Put fresh random basic tiles into the cells emptied by the last `drop`.
    pub fn fill(&mut self) -> Result<(), FieldError> {
        let spaces = self.dropped_spaces.take().ok_or(FieldError::FillWithoutDrop)?;
        self.refill(&spaces);
        Ok(())
    }

    /// Erase, drop and refill until nothing matches. Returns tiles erased.
    pub fn settle(&mut self, generate_powerups: bool) -> u32 {
        let mut total = 0;
        loop {
            let EraseResult { erased, count } = self.erase(generate_powerups);
            if !erased {
                return total;
            }
            total += count;
            let spaces = self.compact();
            self.refill(&spaces);
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), FieldError> {
    if width == 0 || height == 0 || i32::try_from(width.saturating_mul(height)).is_err() {
        return Err(FieldError::InvalidDimensions { width, height });
    }
    Ok(())
}

impl Tile {
    /// Board notation: `.` blank, `R O G B P` basics, `L` line, `X` bomb.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '.' => Self::Blank,
            'R' => Self::Basic(Color::Red),
            'O' => Self::Basic(Color::Orange),
            'G' => Self::Basic(Color::Green),
            'B' => Self::Basic(Color::Blue),
            'P' => Self::Basic(Color::Purple),
            'L' => Self::Line,
            'X' => Self::Bomb,
            _ => return None,
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Blank => '.',
            Self::Basic(Color::Red) => 'R',
            Self::Basic(Color::Orange) => 'O',
            Self::Basic(Color::Green) => 'G',
            Self::Basic(Color::Blue) => 'B',
            Self::Basic(Color::Purple) => 'P',
            Self::Line => 'L',
            Self::Bomb => 'X',
        }
    }
}

impl<R> fmt::Display for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", self.tiles[x * self.height + y].to_char())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn field(rows: &[&str]) -> Field<StdRng> {
        Field::from_rows(rows, StdRng::seed_from_u64(1)).unwrap()
    }

    fn rows<R>(field: &Field<R>) -> Vec<String> {
        field.to_string().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_out_of_bounds_reads_blank() {
        let f = field(&["RG", "BO"]);
        assert_eq!(f.get_tile(-1, 0), Tile::Blank);
        assert_eq!(f.get_tile(0, -1), Tile::Blank);
        assert_eq!(f.get_tile(2, 0), Tile::Blank);
        assert_eq!(f.get_tile(0, 2), Tile::Blank);
        assert_eq!(f.get_tile(1, 1), Tile::Basic(Color::Orange));
    }

    #[test]
    fn test_set_tile_rejects_out_of_bounds() {
        let mut f = field(&["RG", "BO"]);
        let err = f.set_tile(2, 0, Tile::Bomb).unwrap_err();
        assert_eq!(
            err,
            FieldError::OutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            }
        );
        assert!(f.set_tile(-1, 1, Tile::Bomb).is_err());
        f.set_tile(1, 0, Tile::Bomb).unwrap();
        assert_eq!(f.get_tile(1, 0), Tile::Bomb);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        let rng = StepRng::new(0, 0);
        assert_eq!(
            Field::from_rows(&["RZ"], rng.clone()).unwrap_err(),
            FieldError::UnknownTile('Z')
        );
        assert!(matches!(
            Field::from_rows(&["RG", "B"], rng.clone()).unwrap_err(),
            FieldError::TileCountMismatch { .. }
        ));
        assert!(matches!(
            Field::from_rows(&[], rng).unwrap_err(),
            FieldError::InvalidDimensions { .. }
        ));
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert_eq!(
            Field::new(0, 4).unwrap_err(),
            FieldError::InvalidDimensions { width: 0, height: 4 }
        );
        assert!(matches!(
            Field::from_tiles(usize::MAX, 2, StepRng::new(0, 0), Vec::new()).unwrap_err(),
            FieldError::InvalidDimensions { .. }
        ));
    }

    #[test]
    fn test_new_field_is_stable() {
        for seed in 0..50 {
            let f = Field::seeded(8, 8, seed).unwrap();
            assert!(!f.has_matches(), "seed {seed} left a match:\n{f}");
            assert!(f.tiles().iter().all(|t| t.is_basic()));
        }
    }

    #[test]
    fn test_pop_basic_and_blank() {
        let mut f = field(&["R.", "GB"]);
        assert_eq!(
            f.pop(0, 0),
            PopResult {
                tiles: 1,
                bombs: 0,
                lines: 0
            }
        );
        assert_eq!(f.get_tile(0, 0), Tile::Blank);
        assert_eq!(f.pop(1, 0), PopResult::default());
        assert_eq!(f.pop(0, 0), PopResult::default());
        assert_eq!(f.pop(9, 9), PopResult::default());
    }

    #[test]
    fn test_bomb_clears_interior_three_by_three() {
        let mut f = field(&[
            "OGOGO", //
            "GRRRG", //
            "ORXRO", //
            "GRRRG", //
            "OGOGO",
        ]);
        let r = f.pop(2, 2);
        assert_eq!(
            r,
            PopResult {
                tiles: 8,
                bombs: 1,
                lines: 0
            }
        );
        assert_eq!(rows(&f), ["OGOGO", "G...G", "O...O", "G...G", "OGOGO"]);
    }

    #[test]
    fn test_bomb_in_corner_is_clipped() {
        let mut f = field(&["XRG", "GBO", "OPR"]);
        let r = f.pop(0, 0);
        assert_eq!(r.tiles, 3);
        assert_eq!(r.bombs, 1);
        assert_eq!(rows(&f), ["..G", "..O", "OPR"]);
    }

    #[test]
    fn test_line_clears_row_and_column() {
        let mut f = field(&[
            "OGRGO", //
            "GORPG", //
            "BRLGB", //
            "GORPG", //
            "OGRGO", //
            "PBOBP",
        ]);
        let r = f.pop(2, 2);
        assert_eq!(
            r,
            PopResult {
                tiles: (5 - 1) + (6 - 1),
                bombs: 0,
                lines: 1
            }
        );
        assert_eq!(
            rows(&f),
            ["OG.GO", "GO.PG", ".....", "GO.PG", "OG.GO", "PB.BP"]
        );
    }

    #[test]
    fn test_line_into_bomb_cascade() {
        let mut f = field(&[
            "LRGXB", //
            "ROGPO", //
            "GBOGR", //
            "BPRBG", //
            "OGBRP",
        ]);
        let r = f.pop(0, 0);
        assert_eq!(
            r,
            PopResult {
                tiles: 10,
                bombs: 1,
                lines: 1
            }
        );
        assert_eq!(rows(&f), [".....", ".O...", ".BOGR", ".PRBG", ".GBRP"]);
    }

    #[test]
    fn test_bomb_chain_counts_each_power_once() {
        let mut f = field(&["XXR", "RXG", "GBO"]);
        let r = f.pop(0, 0);
        assert_eq!(r.bombs, 3);
        assert_eq!(r.tiles, 6);
        assert!(f.tiles().iter().all(|t| t.is_blank()));
    }

    #[test]
    fn test_erase_triples_and_idempotence() {
        let mut f = field(&[
            "RRRG", //
            "GBOB", //
            "GOBO", //
            "GBOP",
        ]);
        let r = f.erase(true);
        assert_eq!(r, EraseResult { erased: true, count: 6 });
        assert_eq!(rows(&f), ["...G", ".BOB", ".OBO", ".BOP"]);
        assert_eq!(f.erase(true), EraseResult::default());
    }

    #[test]
    fn test_plus_shape_becomes_line_or_blank() {
        let mut f = field(&[
            "GOGOG", //
            "OGRGO", //
            "BRRRB", //
            "OGRGO", //
            "GOGOG",
        ]);
        // Plus shape takes priority and becomes a line.
        let r = f.erase(true);
        assert_eq!(r.count, 5);
        assert_eq!(f.get_tile(2, 2), Tile::Line);

        let mut f = field(&[
            "GOGOG", //
            "OGRGO", //
            "BRRRB", //
            "OGRGO", //
            "GOGOG",
        ]);
        // Without power tiles the same shape simply disappears.
        let r = f.erase(false);
        assert_eq!(r.count, 5);
        assert_eq!(f.get_tile(2, 2), Tile::Blank);
    }

    #[test]
    fn test_erase_single_cell_two_axes_in_second_pass() {
        // The T-shape centre at (1, 3) sits below the width-bounded power scan,
        // so only the triple pass sees it and both axes fire from one cell.
        let mut f = field(&[
            "GOB", //
            "OGO", //
            "BRG", //
            "RRR", //
            "ORB",
        ]);
        let r = f.erase(true);
        assert_eq!(r, EraseResult { erased: true, count: 6 });
        assert_eq!(rows(&f), ["GOB", "OGO", "B.G", "...", "O.B"]);
    }

    #[test]
    fn test_plus_shape_wins_over_block() {
        let mut f = field(&[
            "GOGOG", //
            "OGRGO", //
            "GRRRG", //
            "OGRRO", //
            "GOGOG",
        ]);
        let r = f.erase(true);
        assert_eq!(r.count, 5);
        assert_eq!(f.get_tile(2, 2), Tile::Line);
        assert!(!f.tiles().contains(&Tile::Bomb));
        assert_eq!(f.get_tile(3, 3), Tile::Basic(Color::Red));
    }

    #[test]
    fn test_block_becomes_bomb() {
        let mut f = field(&[
            "RRG", //
            "RRO", //
            "GBP",
        ]);
        let r = f.erase(true);
        assert_eq!(r, EraseResult { erased: true, count: 4 });
        assert_eq!(rows(&f), ["X.G", "..O", "GBP"]);

        let mut f = field(&["RRG", "RRO", "GBP"]);
        f.erase(false);
        assert_eq!(rows(&f), ["..G", "..O", "GBP"]);
    }

    #[test]
    fn test_power_scan_uses_width_for_rows() {
        // 3 wide, 6 tall: only rows 0..2 are scanned for blocks, so the block
        // at rows 3-4 is left alone.
        let mut f = field(&[
            "GOG", //
            "OGO", //
            "GOG", //
            "RRO", //
            "RRG", //
            "OGO",
        ]);
        assert!(!f.has_matches());
        assert_eq!(f.erase(true), EraseResult::default());
        assert_eq!(f.get_tile(0, 3), Tile::Basic(Color::Red));

        let mut f = field(&[
            "RRO", //
            "RRG", //
            "GOG", //
            "OGO", //
            "GOG", //
            "OGO",
        ]);
        assert!(f.has_matches());
        assert_eq!(f.erase(true).count, 4);
        assert_eq!(f.get_tile(0, 0), Tile::Bomb);
    }

    #[test]
    fn test_power_scan_on_short_field_reads_blank_rows() {
        // 4 wide, 2 tall: the scan walks y up to 2, past the last row, harmlessly.
        let mut f = field(&["GRRO", "BRRG"]);
        let r = f.erase(true);
        assert_eq!(r.count, 4);
        assert_eq!(rows(&f), ["GX.O", "B..G"]);
    }

    #[test]
    fn test_power_scan_walks_columns_before_rows() {
        // Blocks at (0, 1) and (1, 0) overlap. Column 0 is scanned first, so
        // its block wins and the one at (1, 0) no longer matches.
        let mut f = field(&[
            ".RRG", //
            "RRRB", //
            "RRGO", //
            "GBOP",
        ]);
        let r = f.erase(true);
        assert_eq!(r.count, 4);
        assert_eq!(f.get_tile(0, 1), Tile::Bomb);
        assert_eq!(f.get_tile(1, 0), Tile::Basic(Color::Red));
        assert_eq!(rows(&f), [".RRG", "X.RB", "..GO", "GBOP"]);
    }

    #[test]
    fn test_drop_compacts_column() {
        let mut f = field(&["R", ".", "G", "."]);
        f.drop();
        assert_eq!(rows(&f), [".", ".", "R", "G"]);
        assert_eq!(f.dropped_spaces(), Some(&[Some(1)][..]));
    }

    #[test]
    fn test_drop_full_column_needs_no_refill() {
        let mut f = field(&["RG", ".B", ".O"]);
        f.drop();
        assert_eq!(f.dropped_spaces(), Some(&[Some(1), None][..]));
        f.fill().unwrap();
        assert_eq!(f.get_tile(1, 0), Tile::Basic(Color::Green));
        assert_eq!(f.get_tile(0, 2), Tile::Basic(Color::Red));
        assert!(f.tiles().iter().all(|t| t.is_basic()));
    }

    #[test]
    fn test_drop_keeps_power_tiles() {
        let mut f = field(&["L", ".", "X", "."]);
        f.drop();
        assert_eq!(rows(&f), [".", ".", "L", "X"]);
    }

    #[test]
    fn test_fill_requires_drop() {
        let mut f = field(&["R.", "GB"]);
        assert_eq!(f.fill(), Err(FieldError::FillWithoutDrop));
        f.drop();
        f.fill().unwrap();
        // The drop is consumed by the first fill.
        assert_eq!(f.fill(), Err(FieldError::FillWithoutDrop));
        f.drop();
        f.set_tile(0, 0, Tile::Blank).unwrap();
        assert_eq!(f.fill(), Err(FieldError::FillWithoutDrop));
    }

    #[test]
    fn test_fill_uses_injected_rng() {
        let mut f = Field::from_rows(&["..", "RG"], StepRng::new(0, 0)).unwrap();
        f.drop();
        f.fill().unwrap();
        assert!(f.tiles().iter().all(|t| t.is_basic()));
        // Both refilled cells draw the same colour from a constant source.
        assert_eq!(f.get_tile(0, 0), f.get_tile(1, 0));
    }

    #[test]
    fn test_settle_reaches_stable_field() {
        let mut f = field(&[
            "RRRR", //
            "RRRR", //
            "RRRR", //
            "RRRR",
        ]);
        let erased = f.settle(true);
        assert!(erased >= 16);
        assert!(!f.has_matches());
        assert_eq!(f.erase(true), EraseResult::default());
    }
}
