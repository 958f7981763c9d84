//! Layout and drawing: board, cursor, sidebar, pause and quit overlays, clear fade.

use crate::app::{QuitOption, Screen};
use pixel_puzzle::{Game, Phase, Tile};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each tile is two terminal columns wide so the board looks square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;

/// Fade of cleared cells; shorter than the 10-tick gap before tiles fall.
const CLEAR_FADE_MS: u32 = 250;

/// One Dark colours.
const BG: Color = Color::Rgb(0x31, 0x35, 0x3F);
const DIV_LINE: Color = Color::Rgb(0x3F, 0x44, 0x4F);
const MAIN_FG: Color = Color::Rgb(0xAB, 0xB2, 0xBF);
const TITLE: Color = Color::Rgb(0xE5, 0xC0, 0x7B);
/// Basic tile colours in `Color::ALL` order: red, orange, green, blue, purple.
const TILE_COLORS: [Color; 5] = [
    Color::Rgb(0xE0, 0x6C, 0x75),
    Color::Rgb(0xD1, 0x9A, 0x66),
    Color::Rgb(0x98, 0xC3, 0x79),
    Color::Rgb(0x61, 0xAF, 0xEF),
    Color::Rgb(0xC6, 0x78, 0xDD),
];

/// Board size in terminal cells, border included.
fn board_outer_size(width: usize, height: usize) -> (u16, u16) {
    let cells = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
    (
        cells(width).saturating_mul(CELL_WIDTH).saturating_add(2),
        cells(height).saturating_add(2),
    )
}

/// Centre board + sidebar in `area`; returns (board with border, sidebar).
fn game_areas(area: Rect, game: &Game) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(game.field().width(), game.field().height());
    let total_w = bw + SIDEBAR_WIDTH;
    let total_h = bh.max(16);

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let board = Rect {
        height: bh.min(inner[0].height),
        ..inner[0]
    };
    (board, inner[1])
}

/// Board cells only (inside the border).
fn board_inner_rect(board: Rect) -> Rect {
    Rect {
        x: board.x + 1,
        y: board.y + 1,
        width: board.width.saturating_sub(2),
        height: board.height.saturating_sub(2),
    }
}

/// Draw one frame. While `clear_cells` is non-empty, runs the fade on them and
/// updates `clear_effect` / `clear_process_time`.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    game: &Game,
    paused: bool,
    quit_selected: QuitOption,
    clear_cells: &[(usize, usize)],
    clear_effect: &mut Option<Effect>,
    clear_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    let (board, sidebar) = game_areas(area, game);
    draw_board(frame, game, board, clear_cells);
    draw_sidebar(frame, game, sidebar);

    if !clear_cells.is_empty() {
        apply_clear_effect(
            frame,
            board_inner_rect(board),
            clear_cells,
            clear_effect,
            clear_process_time,
            now,
        );
    }

    match screen {
        Screen::Playing if paused => draw_pause_overlay(frame, area),
        Screen::Playing => {}
        Screen::QuitMenu => draw_quit_menu(frame, quit_selected),
    }
}

/// Symbol and style for one tile.
fn tile_look(tile: Tile) -> (&'static str, Style) {
    let base = if tile.is_power() {
        Style::default().bg(BG).bold()
    } else {
        Style::default().bg(BG)
    };
    match tile {
        Tile::Blank => ("  ", base),
        Tile::Basic(c) => ("██", base.fg(TILE_COLORS[c.index()])),
        Tile::Line => ("══", base.fg(Color::White)),
        Tile::Bomb => ("()", base.fg(TITLE)),
    }
}

fn draw_board(frame: &mut Frame, game: &Game, area: Rect, clear_cells: &[(usize, usize)]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIV_LINE).bg(BG))
        .title(Span::styled(" Pixel Puzzle ", Style::default().fg(TITLE)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let field = game.field();
    let cursor = game.cursor();
    let selecting = game.phase() == Phase::Selecting;
    let clear_set: HashSet<(usize, usize)> = clear_cells.iter().copied().collect();
    let buf = frame.buffer_mut();

    for x in 0..field.width() {
        for y in 0..field.height() {
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + y as u16;
            if rx + CELL_WIDTH > inner.x + inner.width || ry >= inner.y + inner.height {
                continue;
            }
            let tile = field.get_tile(x as i32, y as i32);
            let (mut symbol, mut style) = tile_look(tile);
            if tile.is_blank() && clear_set.contains(&(x, y)) {
                symbol = "░░";
                style = Style::default().fg(Color::White).bg(BG);
            }
            if selecting && (cursor.x, cursor.y) == (x, y) {
                symbol = "[]";
                style = match tile.color() {
                    Some(c) => Style::default().fg(Color::Black).bg(TILE_COLORS[c.index()]),
                    None => Style::default().fg(Color::White).bg(DIV_LINE),
                }
                .bold();
            }
            buf.set_string(rx, ry, symbol, style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, game: &Game, area: Rect) {
    let title_style = Style::default().fg(TITLE);
    let fg_style = Style::default().fg(MAIN_FG);
    let border_style = Style::default().fg(DIV_LINE).bg(BG);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Stats (border + score, status, counters)
            Constraint::Length(1), // gap
            Constraint::Length(7), // Keys
        ])
        .split(area);

    let stats = game.stats();
    let status = match game.phase() {
        Phase::Selecting => Span::styled("select", Style::default().fg(TILE_COLORS[2])),
        Phase::Resolving { .. } => Span::styled("resolving", Style::default().fg(TILE_COLORS[1])),
    };
    let row = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, title_style), Span::styled(value, fg_style)])
    };
    let stats_lines = vec![
        row("Score: ", game.score().to_string()),
        Line::from(vec![Span::styled("Status: ", title_style), status]),
        row("Pops: ", stats.pops.to_string()),
        row("Bombs: ", stats.bombs.to_string()),
        row("Lines: ", stats.lines.to_string()),
        row("Matches: ", stats.matches.to_string()),
        row("Best chain: ", stats.best_chain.to_string()),
    ];
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    Paragraph::new(ratatui::text::Text::from(stats_lines)).render(stats_inner, frame.buffer_mut());

    let power = if game.power_tiles() { "on" } else { "off" };
    let key_lines = vec![
        row("Move: ", "arrows / hjkl".to_string()),
        row("Pop: ", "space / enter".to_string()),
        row("Pause: ", "p".to_string()),
        row("Restart: ", "r".to_string()),
        row("Power tiles: ", power.to_string()),
    ];
    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let keys_inner = keys_block.inner(chunks[2]);
    keys_block.render(chunks[2], frame.buffer_mut());
    Paragraph::new(ratatui::text::Text::from(key_lines)).render(keys_inner, frame.buffer_mut());
}

/// Buffer positions covered by the given board cells.
fn clearing_buffer_positions(board_rect: Rect, cells: &[(usize, usize)]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &(gx, gy) in cells {
        let x0 = board_rect.x + gx as u16 * CELL_WIDTH;
        let y = board_rect.y + gy as u16;
        for bx in x0..(x0 + CELL_WIDTH).min(board_rect.x + board_rect.width) {
            set.insert((bx, y));
        }
    }
    set
}

/// Create or advance the fade on freshly cleared cells.
fn apply_clear_effect(
    frame: &mut Frame,
    board_rect: Rect,
    cells: &[(usize, usize)],
    clear_effect: &mut Option<Effect>,
    clear_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = clear_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *clear_process_time = Some(now);

    if clear_effect.is_none() {
        let clearing_set = clearing_buffer_positions(board_rect, cells);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            clearing_set.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_to(BG, BG, (CLEAR_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        *clear_effect = Some(effect);
    }

    if let Some(effect) = clear_effect {
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_pause_overlay(frame: &mut Frame, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P Resume    Q Quit ",
            Style::default().fg(MAIN_FG),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DIV_LINE).bg(BG)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_quit_menu(frame: &mut Frame, selected: QuitOption) {
    let area = frame.area();
    let qw = 24u16.min(area.width);
    let qh = 8u16.min(area.height);
    let quit_rect = Rect {
        x: area.x + area.width.saturating_sub(qw) / 2,
        y: area.y + area.height.saturating_sub(qh) / 2,
        width: qw,
        height: qh,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(TITLE))
        .title(" Quit? ");

    for y in quit_rect.y..quit_rect.y + quit_rect.height {
        for x in quit_rect.x..quit_rect.x + quit_rect.width {
            frame.buffer_mut()[(x, y)].set_style(Style::default().bg(BG));
        }
    }

    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::Restart, " Restart "),
        (QuitOption::Exit, " Exit "),
    ];
    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default().fg(BG).bg(TITLE).bold()
        } else {
            Style::default().fg(TITLE)
        };
        let rx = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.y + inner.height {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}
