//! App: terminal init, fixed-rate tick loop and key handling.

use crate::input::{Action, key_to_action};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use pixel_puzzle::{Game, GameConfig, TickEvent, vlog};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Restart,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::Restart,
            Self::Restart => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::Restart => Self::Resume,
            Self::Exit => Self::Restart,
        }
    }
}

/// Whether the loop keeps going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct App {
    config: GameConfig,
    game: Game,
    screen: Screen,
    paused: bool,
    quit_selected: QuitOption,
    tick_interval: Duration,
    last_tick: Instant,
    no_animation: bool,
    /// Cells being faded out after a pop or match.
    clear_cells: Vec<(usize, usize)>,
    /// TachyonFX fade for `clear_cells` (created on first draw).
    clear_effect: Option<Effect>,
    /// Last time we processed the clear effect (for delta).
    clear_effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, no_animation: bool) -> Result<Self> {
        config.validate()?;
        let game = Game::new(&config)?;
        let tick_interval = Duration::try_from_secs_f64(config.tick_rate.recip())?;
        Ok(Self {
            config,
            game,
            screen: Screen::Playing,
            paused: false,
            quit_selected: QuitOption::Resume,
            tick_interval,
            last_tick: Instant::now(),
            no_animation,
            clear_cells: Vec::new(),
            clear_effect: None,
            clear_effect_process_time: None,
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        self.game = Game::new(&self.config)?;
        self.screen = Screen::Playing;
        self.paused = false;
        self.last_tick = Instant::now();
        self.reset_clear_effect();
        vlog!("restart");
        Ok(())
    }

    fn reset_clear_effect(&mut self) {
        self.clear_cells.clear();
        self.clear_effect = None;
        self.clear_effect_process_time = None;
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            if let Some(cells) = self.game.take_cleared() {
                self.reset_clear_effect();
                if !self.no_animation {
                    self.clear_cells = cells;
                }
            }

            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.game,
                    self.paused,
                    self.quit_selected,
                    &self.clear_cells,
                    &mut self.clear_effect,
                    &mut self.clear_effect_process_time,
                    now,
                );
            })?;

            if self.clear_effect.as_ref().is_some_and(|e| e.done()) {
                self.reset_clear_effect();
            }

            let timeout = self.tick_interval.saturating_sub(self.last_tick.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_action(key_to_action(key))? == Flow::Exit {
                            return Ok(());
                        }
                    }
                }
            }

            if self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                if self.screen == Screen::Playing && !self.paused {
                    if let TickEvent::Matched { count, points } = self.game.tick()? {
                        vlog!("chain link: {count} tiles for {points}");
                    }
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) -> Result<Flow> {
        match self.screen {
            Screen::Playing if self.paused => match action {
                Action::Pause => self.paused = false,
                Action::Quit => self.open_quit_menu(),
                _ => {}
            },
            Screen::Playing => match action {
                Action::Move(direction) => self.game.move_cursor(direction),
                Action::Select => {
                    self.game.select();
                }
                Action::Pause => self.paused = true,
                Action::Restart => self.reset_game()?,
                Action::Quit => self.open_quit_menu(),
                Action::None => {}
            },
            Screen::QuitMenu => match action {
                Action::Move(pixel_puzzle::Direction::Down | pixel_puzzle::Direction::Right) => {
                    self.quit_selected = self.quit_selected.next();
                }
                Action::Move(pixel_puzzle::Direction::Up | pixel_puzzle::Direction::Left) => {
                    self.quit_selected = self.quit_selected.prev();
                }
                Action::Select => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::Restart => self.reset_game()?,
                    QuitOption::Exit => return Ok(Flow::Exit),
                },
                Action::Pause | Action::Quit => self.screen = Screen::Playing,
                Action::Restart | Action::None => {}
            },
        }
        Ok(Flow::Continue)
    }

    fn open_quit_menu(&mut self) {
        self.screen = Screen::QuitMenu;
        self.quit_selected = QuitOption::Resume;
    }
}
