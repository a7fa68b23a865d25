//! Differential terminal output over crossterm.
//!
//! Compares the current frame to the previous one and writes only changed
//! cells, wrapped in a synchronized update block so partial frames never
//! flash. Color/attribute state is tracked across cells to keep the escape
//! stream short.

use std::io::{self, BufWriter, Stdout, Write, stdout};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

/// Differential renderer writing to stdout.
pub struct TermRenderer {
    out: BufWriter<Stdout>,
    previous: Option<FrameBuffer>,
    last_fg: Option<Rgba>,
    last_bg: Option<Rgba>,
    last_attrs: Option<Attr>,
}

impl TermRenderer {
    pub fn new() -> Self {
        Self {
            out: BufWriter::new(stdout()),
            previous: None,
            last_fg: None,
            last_bg: None,
            last_attrs: None,
        }
    }

    /// Enter the alternate screen with raw mode and mouse capture.
    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(
            self.out,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            EnableMouseCapture
        )?;
        self.invalidate();
        Ok(())
    }

    /// Restore the terminal. Safe to call after a failed enter.
    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            DisableMouseCapture,
            ResetColor,
            Show,
            LeaveAlternateScreen
        )?;
        disable_raw_mode()
    }

    /// Render a frame, outputting only changed cells.
    ///
    /// Returns true if any cell was written.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let mut has_changes = false;

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.reset_pen();

        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|p| p.width() == buffer.width() && p.height() == buffer.height());

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else { continue };
                let changed = if same_size {
                    self.previous
                        .as_ref()
                        .and_then(|p| p.get(x, y))
                        .is_none_or(|prev| prev != cell)
                } else {
                    true
                };
                if changed {
                    has_changes = true;
                    self.write_cell(x, y, *cell)?;
                }
            }
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Forget the previous frame; the next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    fn reset_pen(&mut self) {
        self.last_fg = None;
        self.last_bg = None;
        self.last_attrs = None;
    }

    fn write_cell(&mut self, x: u16, y: u16, cell: Cell) -> io::Result<()> {
        queue!(self.out, MoveTo(x, y))?;

        if self.last_attrs != Some(cell.attrs) {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            // Attribute reset also clears colors
            self.last_fg = None;
            self.last_bg = None;
            for (flag, attr) in [
                (Attr::BOLD, Attribute::Bold),
                (Attr::DIM, Attribute::Dim),
                (Attr::ITALIC, Attribute::Italic),
                (Attr::UNDERLINE, Attribute::Underlined),
                (Attr::INVERSE, Attribute::Reverse),
            ] {
                if cell.attrs.contains(flag) {
                    queue!(self.out, SetAttribute(attr))?;
                }
            }
            self.last_attrs = Some(cell.attrs);
        }

        if self.last_fg != Some(cell.fg) {
            queue!(self.out, SetForegroundColor(to_color(cell.fg)))?;
            self.last_fg = Some(cell.fg);
        }
        if self.last_bg != Some(cell.bg) {
            queue!(self.out, SetBackgroundColor(to_color(cell.bg)))?;
            self.last_bg = Some(cell.bg);
        }

        queue!(self.out, Print(cell.ch))
    }
}

impl Default for TermRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_starts_without_previous() {
        let renderer = TermRenderer::new();
        assert!(!renderer.has_previous());
    }

    #[test]
    fn test_invalidate_clears_previous() {
        let mut renderer = TermRenderer::new();
        renderer.previous = Some(FrameBuffer::new(4, 4));
        assert!(renderer.has_previous());

        renderer.invalidate();
        assert!(!renderer.has_previous());
    }

    #[test]
    fn test_to_color_maps_default_to_reset() {
        assert_eq!(to_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(
            to_color(Rgba::rgb(1, 2, 3)),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
