//! Frame buffer - a width x height grid of styled cells.
//!
//! All drawing clips to the buffer bounds; coordinates are `i32` so callers
//! can pass parallax-offset positions that wander off-screen without
//! pre-clamping.

use crate::types::{Attr, Cell, Rgba};

/// Style applied by the text drawing helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub fg: Rgba,
    /// `None` keeps the background already in the buffer.
    pub bg: Option<Rgba>,
    pub attrs: Attr,
}

impl TextStyle {
    /// Plain foreground color, background untouched.
    pub const fn fg(color: Rgba) -> Self {
        Self {
            fg: color,
            bg: None,
            attrs: Attr::NONE,
        }
    }

    /// Add attributes.
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// Set a background color.
    pub const fn on(mut self, bg: Rgba) -> Self {
        self.bg = Some(bg);
        self
    }
}

/// A grid of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get a cell, or `None` outside the buffer.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Set a cell. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells[idx] = cell;
    }

    /// Fill the whole buffer with a background color.
    pub fn clear(&mut self, bg: Rgba) {
        let cell = Cell {
            bg,
            ..Cell::default()
        };
        self.cells.fill(cell);
    }

    /// Fill a rectangle with a background color, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, bg: Rgba) {
        for row in y..y + height {
            for col in x..x + width {
                if let Some(current) = self.cell_at_mut(col, row) {
                    current.bg = bg;
                    current.ch = ' ';
                }
            }
        }
    }

    /// Draw a single line of text, clipped to the buffer.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_at_mut(x + i as i32, y) {
                cell.ch = ch;
                cell.fg = style.fg;
                cell.attrs = style.attrs;
                if let Some(bg) = style.bg {
                    cell.bg = bg;
                }
            }
        }
    }

    /// Draw text centered within `[x, x + width)`.
    pub fn draw_text_centered(&mut self, x: i32, width: i32, y: i32, text: &str, style: TextStyle) {
        let len = text.chars().count() as i32;
        let start = x + (width - len) / 2;
        self.draw_text(start, y, text, style);
    }

    /// Draw a horizontal rule of `width` cells.
    pub fn draw_hline(&mut self, x: i32, y: i32, width: i32, style: TextStyle) {
        for col in x..x + width {
            if let Some(cell) = self.cell_at_mut(col, y) {
                cell.ch = '─';
                cell.fg = style.fg;
                cell.attrs = style.attrs;
                if let Some(bg) = style.bg {
                    cell.bg = bg;
                }
            }
        }
    }

    fn cell_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.cells
            .get_mut(y as usize * self.width as usize + x as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let mut fb = FrameBuffer::new(10, 5);
        let cell = Cell {
            ch: 'X',
            fg: Rgba::WHITE,
            bg: Rgba::BLACK,
            attrs: Attr::BOLD,
        };
        fb.set(3, 2, cell);
        assert_eq!(fb.get(3, 2), Some(&cell));
        assert_eq!(fb.get(4, 2), Some(&Cell::default()));
    }

    #[test]
    fn test_out_of_bounds_is_dropped() {
        let mut fb = FrameBuffer::new(10, 5);
        fb.set(-1, 0, Cell::default());
        fb.set(10, 0, Cell::default());
        fb.set(0, 5, Cell::default());
        assert_eq!(fb.get(10, 0), None);
        assert_eq!(fb.get(0, 5), None);
    }

    #[test]
    fn test_draw_text_clips() {
        let mut fb = FrameBuffer::new(5, 1);
        fb.draw_text(3, 0, "hello", TextStyle::fg(Rgba::WHITE));
        assert_eq!(fb.get(3, 0).unwrap().ch, 'h');
        assert_eq!(fb.get(4, 0).unwrap().ch, 'e');
        // "llo" fell off the edge

        // Negative start clips the head
        fb.draw_text(-2, 0, "world", TextStyle::fg(Rgba::WHITE));
        assert_eq!(fb.get(0, 0).unwrap().ch, 'r');
    }

    #[test]
    fn test_draw_text_centered() {
        let mut fb = FrameBuffer::new(11, 1);
        fb.draw_text_centered(0, 11, 0, "abc", TextStyle::fg(Rgba::WHITE));
        assert_eq!(fb.get(4, 0).unwrap().ch, 'a');
        assert_eq!(fb.get(6, 0).unwrap().ch, 'c');
    }

    #[test]
    fn test_fill_rect_keeps_bounds() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_rect(2, 2, 10, 10, Rgba::WHITE);
        assert_eq!(fb.get(3, 3).unwrap().bg, Rgba::WHITE);
        assert_eq!(fb.get(1, 1).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_text_style_preserves_background() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.fill_rect(0, 0, 3, 1, Rgba::gray(40));
        fb.draw_text(0, 0, "ab", TextStyle::fg(Rgba::WHITE));
        assert_eq!(fb.get(0, 0).unwrap().bg, Rgba::gray(40));

        fb.draw_text(0, 0, "ab", TextStyle::fg(Rgba::WHITE).on(Rgba::BLACK));
        assert_eq!(fb.get(0, 0).unwrap().bg, Rgba::BLACK);
    }
}
