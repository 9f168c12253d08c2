//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are encoded into a reusable byte buffer and written in one go. After
//! the first frame only runs of cells that changed since the previous frame
//! are sent.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// A horizontal span of changed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// Iterator over changed runs between two equally-sized frames, row by row.
pub struct ChangedRuns<'a> {
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    x: u16,
    y: u16,
}

impl<'a> ChangedRuns<'a> {
    pub fn new(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> Self {
        Self {
            prev,
            next,
            x: 0,
            y: 0,
        }
    }

    fn differs(&self, x: u16, y: u16) -> bool {
        self.prev.get(x, y) != self.next.get(x, y)
    }
}

impl Iterator for ChangedRuns<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let (w, h) = (self.next.width(), self.next.height());
        while self.y < h {
            while self.x < w && !self.differs(self.x, self.y) {
                self.x += 1;
            }
            if self.x < w {
                let start = self.x;
                while self.x < w && self.differs(self.x, self.y) {
                    self.x += 1;
                }
                return Some(Run {
                    x: start,
                    y: self.y,
                    len: self.x - start,
                });
            }
            self.x = 0;
            self.y += 1;
        }
        None
    }
}

/// Emits cells while only re-sending style changes.
struct StyledWriter<'a> {
    out: &'a mut Vec<u8>,
    current: Option<CellStyle>,
}

impl<'a> StyledWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, current: None }
    }

    fn cell(&mut self, cell: Cell) -> Result<()> {
        if self.current != Some(cell.style) {
            let style = cell.style;
            self.out.queue(SetAttribute(Attribute::Reset))?;
            self.out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
            self.out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.current = Some(style);
        }
        self.out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut writer = StyledWriter::new(out);
    for y in 0..fb.height() {
        writer.out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            writer.cell(fb.get(x, y).unwrap_or_default())?;
        }
    }
    writer.finish()
}

/// Encode only the runs of `next` that differ from `prev` into `out`.
///
/// Frames of different sizes fall back to a full redraw.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if (prev.width(), prev.height()) != (next.width(), next.height()) {
        return encode_full_into(next, out);
    }

    let mut writer = StyledWriter::new(out);
    for run in ChangedRuns::new(prev, next) {
        writer.out.queue(cursor::MoveTo(run.x, run.y))?;
        for x in run.x..run.x + run.len {
            writer.cell(next.get(x, run.y).unwrap_or_default())?;
        }
    }
    writer.finish()
}

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Previously flushed frame; `None` forces a full redraw.
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    raw_mode: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into an arbitrary writer (no raw mode handling until `enter`).
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            raw_mode: false,
        }
    }

    /// Switch to raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.last = None;
        Ok(())
    }

    /// Restore the terminal. Raw mode is left even if writing fails.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        let written = self.flush_buf();
        if self.raw_mode {
            self.raw_mode = false;
            terminal::disable_raw_mode()?;
        }
        written
    }

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, diffing against the previous frame, then swap buffers.
    ///
    /// On return `fb` holds the frame before this one, so the caller can keep
    /// rendering into it without cloning.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut prev = match self.last.take() {
            Some(prev) => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            None => {
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    /// Bytes produced by the last draw.
    pub fn last_output(&self) -> &[u8] {
        &self.buf
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_text(w: u16, h: u16, x: u16, y: u16, s: &str) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        fb.put_str(x, y, s, CellStyle::default());
        fb
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let a = FrameBuffer::new(5, 1);
        let b = with_text(5, 1, 1, 0, "XXX");
        let runs: Vec<_> = ChangedRuns::new(&a, &b).collect();
        assert_eq!(runs, vec![Run { x: 1, y: 0, len: 3 }]);
    }

    #[test]
    fn changed_runs_split_on_equal_cells_and_rows() {
        let a = FrameBuffer::new(6, 2);
        let mut b = with_text(6, 2, 0, 0, "X X");
        b.put_str(5, 1, "Y", CellStyle::default());
        let runs: Vec<_> = ChangedRuns::new(&a, &b).collect();
        assert_eq!(
            runs,
            vec![
                Run { x: 0, y: 0, len: 1 },
                Run { x: 2, y: 0, len: 1 },
                Run { x: 5, y: 1, len: 1 }
            ]
        );
    }

    #[test]
    fn identical_frames_encode_no_cells() {
        let a = with_text(4, 2, 0, 0, "ab");
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(!text.contains('a'));
    }

    #[test]
    fn second_draw_only_sends_changes() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut fb = with_text(8, 2, 0, 0, "hello");
        term.draw_swap(&mut fb).unwrap();
        assert!(String::from_utf8_lossy(term.last_output()).contains("hello"));

        let mut next = with_text(8, 2, 0, 0, "hellO");
        term.draw_swap(&mut next).unwrap();
        let text = String::from_utf8_lossy(term.last_output()).into_owned();
        assert!(text.contains('O'));
        assert!(!text.contains("hell"));
    }

    #[test]
    fn size_change_redraws_everything() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut small = with_text(4, 1, 0, 0, "ab");
        term.draw_swap(&mut small).unwrap();
        let mut large = with_text(6, 1, 0, 0, "ab");
        term.draw_swap(&mut large).unwrap();
        assert!(String::from_utf8_lossy(term.last_output()).contains("ab"));
    }

    #[test]
    fn draw_swap_returns_previous_frame() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut fb = with_text(3, 1, 0, 0, "one");
        term.draw_swap(&mut fb).unwrap();
        // First draw swaps in a blank frame.
        assert_eq!(fb.row_text(0), "   ");
    }
}
