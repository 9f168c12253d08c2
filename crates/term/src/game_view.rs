//! GameView: maps a `core::GameSession` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSession;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::Position;

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

/// Overlay shown while waiting for the first game.
pub const START_PROMPT: &str = "PRESS ENTER";
/// Overlay shown after a blocked spawn.
pub const LOSE_BANNER: &str = "YOU LOSE!";

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Solid colours for fill values 1..=7; larger values wrap around.
const PALETTE: [Rgb; 7] = [
    Rgb::new(80, 220, 220),
    Rgb::new(80, 120, 220),
    Rgb::new(255, 165, 0),
    Rgb::new(240, 220, 80),
    Rgb::new(100, 220, 120),
    Rgb::new(200, 120, 220),
    Rgb::new(220, 80, 80),
];

const CONTROLS: [(&str, &str); 6] = [
    ("\u{2190}\u{2192}", "move"),
    ("\u{2191}\u{2193}", "rotate"),
    ("s", "soft drop"),
    ("spc", "hard drop"),
    ("ent", "start"),
    ("q", "quit"),
];

/// Colour used for a filled board cell.
pub fn fill_color(fill: u8) -> Rgb {
    PALETTE[(fill.max(1) as usize - 1) % PALETTE.len()]
}

/// Where the playfield frame landed in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the playfield and its side panel.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Terminal columns and rows taken by the bordered playfield.
    pub fn frame_size(&self, session: &GameSession) -> (u16, u16) {
        let board = session.board();
        (
            board.width().saturating_mul(self.cell_w).saturating_add(2),
            board.height().saturating_mul(self.cell_h).saturating_add(2),
        )
    }

    /// Render the session into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, session: &GameSession, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let (w, h) = self.frame_size(session);
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        self.draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG));
        self.draw_board(fb, frame, session);

        if let Some(active) = session.active() {
            if session.is_running() {
                if let Some(ghost_y) = session.ghost_y() {
                    let ghost = CellStyle::new(Rgb::new(140, 140, 140), PLAYFIELD_BG).dim();
                    let lift = ghost_y - active.y();
                    for pos in active.cells() {
                        self.draw_cell(fb, frame, session, pos.offset(0, lift), '░', ghost);
                    }
                }
            }

            let style = CellStyle::new(fill_color(active.shape().fill()), PLAYFIELD_BG).bold();
            for pos in active.cells() {
                self.draw_cell(fb, frame, session, pos, '█', style);
            }
        }

        self.draw_side_panel(fb, frame, session, viewport);

        if !session.is_running() {
            if session.is_game_over() {
                self.draw_overlay(fb, frame, 0, LOSE_BANNER);
                self.draw_overlay(fb, frame, 2, "ENTER: retry");
            } else {
                self.draw_overlay(fb, frame, 0, START_PROMPT);
            }
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, session: &GameSession, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(session, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }
        let (right, bottom) = (x + w - 1, y + h - 1);

        fb.put_char(x, y, '┌', style);
        fb.put_char(right, y, '┐', style);
        fb.put_char(x, bottom, '└', style);
        fb.put_char(right, bottom, '┘', style);
        for cx in x + 1..right {
            fb.put_char(cx, y, '─', style);
            fb.put_char(cx, bottom, '─', style);
        }
        for cy in y + 1..bottom {
            fb.put_char(x, cy, '│', style);
            fb.put_char(right, cy, '│', style);
        }
    }

    /// Locked cells in their fill colour, empty cells as a faint grid dot.
    fn draw_board(&self, fb: &mut FrameBuffer, frame: Frame, session: &GameSession) {
        let board = session.board();
        let empty = CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        for y in 0..board.height() as i16 {
            for x in 0..board.width() as i16 {
                let pos = Position::new(x, y);
                match board.get(x, y) {
                    Some(fill) if fill != 0 => {
                        let style = CellStyle::new(fill_color(fill), PLAYFIELD_BG);
                        self.draw_cell(fb, frame, session, pos, '█', style);
                    }
                    _ => self.draw_cell(fb, frame, session, pos, '·', empty),
                }
            }
        }
    }

    /// Fill one board cell's terminal rectangle; positions off the board are skipped.
    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        session: &GameSession,
        pos: Position,
        ch: char,
        style: CellStyle,
    ) {
        if session.board().is_out_of_bounds(pos.x, pos.y) {
            return;
        }
        let px = frame.x + 1 + pos.x as u16 * self.cell_w;
        let py = frame.y + 1 + pos.y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        session: &GameSession,
        viewport: Viewport,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if viewport.width.saturating_sub(panel_x) < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let hint = value.dim();

        let mut y = frame.y;
        let x = fb.put_str(panel_x, y, "Score: ", label);
        fb.put_u32(x, y, session.score(), value);
        y = y.saturating_add(1);
        let x = fb.put_str(panel_x, y, "Lines: ", label);
        fb.put_u32(x, y, session.lines(), value);
        y = y.saturating_add(2);

        for (key, action) in CONTROLS {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, key, value);
            fb.put_str(panel_x.saturating_add(4), y, action, hint);
            y = y.saturating_add(1);
        }
    }

    /// Centered text `row` lines below the middle of the playfield.
    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, row: u16, text: &str) {
        let y = frame.y.saturating_add(frame.h / 2).saturating_add(row);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, y, text, style);
    }
}
