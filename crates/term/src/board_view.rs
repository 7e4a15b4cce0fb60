//! BoardView: maps a `GameBoard` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The board is drawn one terminal row per grid row. The sub-row scroll offset
//! of the endless board is rounded to whole rows; horizontal swap slides keep
//! their half-cell precision because a cell is two columns wide.

use crate::core::{Cursor, DialogKind, GameBoard, Tile};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{DrawType, GameMode, TileColor, BOARD_HEIGHT, BOARD_WIDTH, TILE_SIZE};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const CURSOR_BG: Rgb = Rgb::new(110, 110, 130);
const CURSOR_BG_EXPANDED: Rgb = Rgb::new(170, 170, 190);

/// A lightweight terminal renderer for the board.
pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for BoardView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Board frame rectangle on screen, border included.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the board into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, board: &GameBoard, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_w = BOARD_WIDTH as u16 * self.cell_w;
        let board_h = BOARD_HEIGHT as u16;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_w + 2) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(board_h + 2) / 2,
                AnchorY::Top => 0,
            },
            w: board_w + 2,
            h: board_h + 2,
        };

        fb.fill_rect(frame.x + 1, frame.y + 1, board_w, board_h, ' ', CellStyle::new(PLAY_BG, PLAY_BG));
        draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG));

        let lowest = board.lowest_visible_row();
        for y in board.top_most_row()..=lowest {
            for x in 0..BOARD_WIDTH {
                if let Some(tile) = board.tile_at(x, y) {
                    self.draw_tile(fb, board, frame, tile, y == lowest);
                }
            }
        }

        self.draw_cursor(fb, board, frame, board.cursor(), board.cursor_expanded());
        self.draw_dialogs(fb, board, frame);
        self.draw_side_panel(fb, board, viewport, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, board: &GameBoard, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(board, viewport, &mut fb);
        fb
    }

    /// Screen row of a logical y coordinate, if it falls inside the window.
    fn screen_row(&self, board: &GameBoard, frame: Frame, logical_y: f32) -> Option<u16> {
        let from_top = logical_y + (BOARD_HEIGHT * TILE_SIZE - board.board_offset_position()) as f32;
        let row = (from_top / TILE_SIZE as f32).floor() as i32;
        (0..BOARD_HEIGHT)
            .contains(&row)
            .then(|| frame.y + 1 + row as u16)
    }

    fn screen_col(&self, frame: Frame, logical_x: f32) -> Option<u16> {
        let col = (logical_x * self.cell_w as f32 / TILE_SIZE as f32).round() as i32;
        let max = (BOARD_WIDTH as u16 * self.cell_w) as i32;
        (0..max).contains(&col).then(|| frame.x + 1 + col as u16)
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, board: &GameBoard, frame: Frame, tile: &Tile, incoming: bool) {
        let (Some(row), Some(col)) = (
            self.screen_row(board, frame, tile.draw_y),
            self.screen_col(frame, tile.draw_x),
        ) else {
            return;
        };

        let base = tile_rgb(tile.color);
        let (ch, mut style) = match tile.draw_type {
            DrawType::Regular => ('█', CellStyle::new(base, PLAY_BG).bold()),
            DrawType::Matched => ('▓', CellStyle::new(base.scaled(3, 2), PLAY_BG).bold()),
            DrawType::MatchedBlink => ('▓', CellStyle::new(Rgb::new(240, 240, 240), PLAY_BG).bold()),
            DrawType::Popping => ('▒', CellStyle::new(base.scaled(1, 2), PLAY_BG)),
            DrawType::Popped => ('·', CellStyle::new(base.scaled(1, 3), PLAY_BG).dim()),
            DrawType::BounceLow => ('▄', CellStyle::new(base, PLAY_BG).bold()),
            DrawType::BounceHigh => ('▀', CellStyle::new(base, PLAY_BG).bold()),
            DrawType::BounceMid => ('▆', CellStyle::new(base, PLAY_BG).bold()),
        };
        if incoming {
            style = CellStyle::new(base.scaled(2, 5), PLAY_BG).dim();
        }
        let right_edge = frame.x + 1 + BOARD_WIDTH as u16 * self.cell_w;
        let w = self.cell_w.min(right_edge.saturating_sub(col));
        fb.fill_rect(col, row, w, 1, ch, style);
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, board: &GameBoard, frame: Frame, cursor: Cursor, expanded: bool) {
        let Some(row) = self.screen_row(board, frame, (cursor.y * TILE_SIZE) as f32) else {
            return;
        };
        let Some(col) = self.screen_col(frame, (cursor.x * TILE_SIZE) as f32) else {
            return;
        };
        let bg = if expanded { CURSOR_BG_EXPANDED } else { CURSOR_BG };
        fb.restyle_rect(col, row, self.cell_w * 2, 1, |c| c.style.on(bg).cell(c.ch));

        if expanded {
            let edge = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
            fb.put_char(frame.x, row, '▶', edge);
            fb.put_char(frame.x + frame.w - 1, row, '◀', edge);
        }
    }

    fn draw_dialogs(&self, fb: &mut FrameBuffer, board: &GameBoard, frame: Frame) {
        for dialog in board.pop_dialogs() {
            let (Some(row), Some(col)) = (
                self.screen_row(board, frame, dialog.y),
                self.screen_col(frame, dialog.x),
            ) else {
                continue;
            };
            let style = match dialog.kind {
                DialogKind::Pop => CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(180, 40, 40)).bold(),
                DialogKind::Repeat => CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(40, 140, 40)).bold(),
            };
            let mut x = col;
            if dialog.kind == DialogKind::Repeat {
                x = fb.put_str(x, row, "x", style);
            }
            fb.put_u64(x, row, u64::from(dialog.count), style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, board: &GameBoard, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "MODE", label);
        y = y.saturating_add(1);
        let mode = match board.mode() {
            GameMode::Endless => "ENDLESS",
            GameMode::Puzzle => "PUZZLE",
        };
        fb.put_str(panel_x, y, mode, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "CHAIN", label);
        y = y.saturating_add(1);
        fb.put_char(panel_x, y, 'x', value);
        fb.put_u64(panel_x + 1, y, u64::from(board.combo_count()), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "TICK", label);
        y = y.saturating_add(1);
        fb.put_u64(panel_x, y, board.tick_count(), value);
        y = y.saturating_add(2);

        if board.mode() == GameMode::Endless {
            fb.put_str(panel_x, y, "SPEED", label);
            y = y.saturating_add(1);
            fb.put_u64(panel_x, y, u64::from(board.speed()), value);
            y = y.saturating_add(2);
        } else {
            fb.put_str(panel_x, y, "TILES", label);
            y = y.saturating_add(1);
            fb.put_u64(panel_x, y, board.tiles().len() as u64, value);
            y = y.saturating_add(2);
        }

        if board.is_paused() {
            fb.put_str(panel_x, y, "POP!", label);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn tile_rgb(color: TileColor) -> Rgb {
    match color {
        TileColor::Green => Rgb::new(100, 220, 120),
        TileColor::Purple => Rgb::new(200, 120, 220),
        TileColor::Red => Rgb::new(220, 80, 80),
        TileColor::Yellow => Rgb::new(240, 220, 80),
        TileColor::Teal => Rgb::new(80, 220, 220),
        TileColor::Blue => Rgb::new(80, 120, 220),
    }
}
