//! TerminalRenderer: puts framebuffers on a real terminal.
//!
//! The renderer remembers what is on screen and repaints only rows that
//! changed. A repainted row is sent as runs of equally styled glyphs, which is
//! how the board looks: a tile is two identical cells and a dialog is one run.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb, Weight};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    on_screen: FrameBuffer,
    repaint_all: bool,
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
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            on_screen: FrameBuffer::default(),
            repaint_all: true,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        queue!(
            self.out,
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )?;
        self.out.flush()?;
        self.repaint_all = true;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        queue!(
            self.out,
            ResetColor,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next [`TerminalRenderer::present`].
    pub fn invalidate(&mut self) {
        self.repaint_all = true;
    }

    /// Bring the screen in line with `fb`. Returns how many rows were sent.
    pub fn present(&mut self, fb: &FrameBuffer) -> Result<usize> {
        let resized =
            fb.width() != self.on_screen.width() || fb.height() != self.on_screen.height();
        let repaint_all = self.repaint_all || resized;
        if repaint_all {
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        }

        let mut sent = 0;
        for y in 0..fb.height() {
            let Some(row) = fb.row(y) else { break };
            if !repaint_all && self.on_screen.row(y) == Some(row) {
                continue;
            }
            paint_row(&mut self.out, y, row)?;
            sent += 1;
        }
        if sent > 0 {
            queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        }
        self.out.flush()?;

        self.on_screen.clone_from(fb);
        self.repaint_all = false;
        Ok(sent)
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

fn paint_row(out: &mut impl Write, y: u16, row: &[Cell]) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, y))?;
    for run in row.chunk_by(|a, b| a.style == b.style) {
        let text: String = run.iter().map(|c| c.ch).collect();
        apply_style(out, run[0].style)?;
        queue!(out, Print(text))?;
    }
    Ok(())
}

fn apply_style(out: &mut impl Write, style: CellStyle) -> io::Result<()> {
    let weight = match style.weight {
        Weight::Normal => Attribute::NormalIntensity,
        Weight::Bold => Attribute::Bold,
        Weight::Faint => Attribute::Dim,
    };
    queue!(
        out,
        SetAttribute(Attribute::NormalIntensity),
        SetColors(Colors::new(color(style.fg), color(style.bg))),
        SetAttribute(weight)
    )
}

fn color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent_text(renderer: &TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.writer()).into_owned()
    }

    #[test]
    fn first_frame_paints_every_row() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(4, 3);
        fb.put_str(0, 1, "ab", CellStyle::default().bold());
        fb.put_str(2, 1, "cd", CellStyle::default());

        assert_eq!(renderer.present(&fb).unwrap(), 3);
        let text = sent_text(&renderer);
        assert!(text.contains("ab"));
        assert!(text.contains("cd"));
    }

    #[test]
    fn unchanged_frame_sends_nothing() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let fb = FrameBuffer::new(4, 3);
        renderer.present(&fb).unwrap();
        let before = renderer.writer().len();

        assert_eq!(renderer.present(&fb).unwrap(), 0);
        assert_eq!(renderer.writer().len(), before);
    }

    #[test]
    fn only_changed_rows_are_repainted() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(4, 3);
        renderer.present(&fb).unwrap();
        let before = renderer.writer().len();

        fb.put_char(3, 2, 'z', CellStyle::default());
        assert_eq!(renderer.present(&fb).unwrap(), 1);
        let tail = String::from_utf8_lossy(&renderer.writer()[before..]).into_owned();
        assert!(tail.contains("   z"));
    }

    #[test]
    fn resize_and_invalidate_repaint_everything() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        renderer.present(&FrameBuffer::new(4, 3)).unwrap();

        assert_eq!(renderer.present(&FrameBuffer::new(5, 2)).unwrap(), 2);
        renderer.invalidate();
        assert_eq!(renderer.present(&FrameBuffer::new(5, 2)).unwrap(), 2);
    }
}
