//! About section - portrait frame, bio, and closing quote.
//!
//! The portrait frame drifts against the text on pointer moves, the one
//! place the original put its heaviest parallax. Wide terminals get two
//! columns; narrow ones stack the portrait above the text.

use crate::content;
use crate::interaction::{PointerTracker, PresenceTracker};
use crate::render::{FrameBuffer, TextStyle};
use crate::surface;
use crate::types::{Attr, Rect, Rgba};

use super::{parallax_xy, reveal, reveal_offset, wrap_text};

const TWO_COLUMN_MIN_WIDTH: f64 = 70.0;
const PORTRAIT_WIDTH: i32 = 24;
const PORTRAIT_HEIGHT: i32 = 12;

pub struct AboutSection {
    surface: usize,
    presence: PresenceTracker,
    pointer: PointerTracker,
}

impl AboutSection {
    pub fn mount() -> Self {
        let surface = surface::allocate();
        Self {
            surface,
            presence: PresenceTracker::attach(Some(surface)),
            pointer: PointerTracker::attach(Some(surface)),
        }
    }

    pub fn surface(&self) -> usize {
        self.surface
    }

    pub fn set_rect(&self, rect: Rect) {
        surface::set_rect(self.surface, rect);
    }

    /// Paint the section into `view`, its rect in viewport coordinates.
    pub fn render(&self, fb: &mut FrameBuffer, view: Rect) {
        let visible = self.presence.is_visible();
        let p = self.pointer.position();

        let x = view.x as i32;
        let y = view.y as i32 + reveal_offset(visible);
        let width = view.width as i32;
        let two_column = view.width >= TWO_COLUMN_MIN_WIDTH;

        let heading = reveal(visible, TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD));
        let body = reveal(visible, TextStyle::fg(Rgba::gray(180)));
        let faint = reveal(visible, TextStyle::fg(Rgba::gray(120)));

        // Portrait drifts on the strongest layer
        let (px, py) = parallax_xy(p, 4.0);
        let portrait_x = if two_column { x + 4 + px } else { x + (width - PORTRAIT_WIDTH) / 2 + px };
        let portrait_y = y + 3 + py;
        self.render_portrait(fb, portrait_x, portrait_y, visible);

        let (text_x, text_width, mut row) = if two_column {
            let tx = x + 4 + PORTRAIT_WIDTH + 6;
            (tx, width - (4 + PORTRAIT_WIDTH + 6) - 4, y + 3)
        } else {
            (x + 4, width - 8, y + 4 + PORTRAIT_HEIGHT + 1)
        };

        fb.draw_text(text_x, row, "A B O U T", faint);
        row += 2;
        fb.draw_text(text_x, row, content::ABOUT_HEADING, heading);
        row += 2;

        for paragraph in content::ABOUT_BIO {
            for line in wrap_text(paragraph, text_width.max(20) as usize) {
                fb.draw_text(text_x, row, &line, body);
                row += 1;
            }
            row += 1;
        }

        let quote = reveal(
            visible,
            TextStyle::fg(Rgba::gray(150)).with_attrs(Attr::ITALIC),
        );
        for line in wrap_text(content::ABOUT_QUOTE, (text_width.max(20) - 2) as usize) {
            fb.draw_text(text_x + 2, row, &line, quote);
            row += 1;
        }
        row += 1;
        let signature = format!("— {}", content::ARTIST_NAME);
        fb.draw_text(text_x + 2, row, &signature, faint);
    }

    fn render_portrait(&self, fb: &mut FrameBuffer, x: i32, y: i32, visible: bool) {
        let frame = reveal(visible, TextStyle::fg(Rgba::gray(100)));

        fb.fill_rect(x + 1, y + 1, PORTRAIT_WIDTH - 2, PORTRAIT_HEIGHT - 2, Rgba::gray(34));
        fb.draw_text(x, y, "┌", frame);
        fb.draw_text(x + PORTRAIT_WIDTH - 1, y, "┐", frame);
        fb.draw_text(x, y + PORTRAIT_HEIGHT - 1, "└", frame);
        fb.draw_text(x + PORTRAIT_WIDTH - 1, y + PORTRAIT_HEIGHT - 1, "┘", frame);
        for col in x + 1..x + PORTRAIT_WIDTH - 1 {
            fb.draw_text(col, y, "─", frame);
            fb.draw_text(col, y + PORTRAIT_HEIGHT - 1, "─", frame);
        }
        for row in y + 1..y + PORTRAIT_HEIGHT - 1 {
            fb.draw_text(x, row, "│", frame);
            fb.draw_text(x + PORTRAIT_WIDTH - 1, row, "│", frame);
        }
        fb.draw_text_centered(
            x,
            PORTRAIT_WIDTH,
            y + PORTRAIT_HEIGHT / 2,
            "✦",
            reveal(visible, TextStyle::fg(Rgba::gray(160))),
        );
    }

    pub fn unmount(&mut self) {
        self.presence.detach();
        self.pointer.detach();
        surface::release(self.surface);
    }
}

impl Drop for AboutSection {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================
