//! Pixel Puzzle: tile-matching puzzle with bombs and lines, in the terminal.

mod app;
mod input;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use pixel_puzzle::{GameConfig, logging};
use std::path::PathBuf;

/// Log file used by `--verbose` when `--log-file` is not given.
const DEFAULT_LOG_FILE: &str = "pixel-puzzle.log";

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_path() {
        logging::init_log_file(&path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        logging::enable_verbose_logging();
    }
    let config = args.game_config();
    config.validate()?;
    let mut app = App::new(config, args.no_animation)?;
    app.run()?;
    Ok(())
}

/// Tile-matching puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "pixel-puzzle",
    version,
    about = "Tile-matching puzzle in the terminal. Pop a tile, watch the board fall and clear.",
    long_about = "Pixel Puzzle is a terminal tile-matching game.\n\n\
        Move the cursor and pop a tile. The board falls, refills, and any three or more \
        same-coloured tiles in a row or column clear on their own, chaining for more points. \
        A plus-shaped match leaves a line tile (clears its row and column when popped); \
        a 2x2 square leaves a bomb (clears the surrounding 3x3).\n\n\
        CONTROLS:\n  Arrows / hjkl  Move    Space / Enter  Pop    P  Pause    R  Restart    Q / Esc  Quit"
)]
pub struct Args {
    /// Board width in tiles.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub width: usize,

    /// Board height in tiles.
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub height: usize,

    /// Game logic ticks per second (one resolve step per tick).
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Seed for a reproducible board and refills.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Plain ruleset: large matches clear like any other, no bombs or lines.
    #[arg(long)]
    pub no_power_tiles: bool,

    /// Disable the fade on cleared tiles.
    #[arg(long)]
    pub no_animation: bool,

    /// Write the event log to this file (implies --verbose).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log every pop, match and phase change, to pixel-puzzle.log unless --log-file is given.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Where to write the event log, if logging is on.
    fn log_path(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(path.clone()),
            None if self.verbose => Some(PathBuf::from(DEFAULT_LOG_FILE)),
            None => None,
        }
    }

    fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            power_tiles: !self.no_power_tiles,
            tick_rate: self.tick_rate,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_game_config_default() {
        let args = Args::parse_from(["pixel-puzzle"]);
        assert_eq!(args.game_config(), GameConfig::default());
    }

    #[test]
    fn test_flags_map_to_config() {
        let args = Args::parse_from([
            "pixel-puzzle",
            "--width",
            "6",
            "--height",
            "7",
            "--seed",
            "42",
            "--no-power-tiles",
        ]);
        let config = args.game_config();
        assert_eq!((config.width, config.height), (6, 7));
        assert_eq!(config.seed, Some(42));
        assert!(!config.power_tiles);
    }

    #[test]
    fn test_log_path_follows_flags() {
        assert_eq!(Args::parse_from(["pixel-puzzle"]).log_path(), None);
        assert_eq!(
            Args::parse_from(["pixel-puzzle", "--verbose"]).log_path(),
            Some(PathBuf::from(DEFAULT_LOG_FILE))
        );
        assert_eq!(
            Args::parse_from(["pixel-puzzle", "--log-file", "run.log"]).log_path(),
            Some(PathBuf::from("run.log"))
        );
        assert_eq!(
            Args::parse_from(["pixel-puzzle", "-v", "--log-file", "run.log"]).log_path(),
            Some(PathBuf::from("run.log"))
        );
    }
}
