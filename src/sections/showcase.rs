//! Showcase section - the responsive artwork grid.
//!
//! One surface per card for clicks, plus a pointer-move subscription on the
//! section surface that hit-tests cards to maintain the hovered index. The
//! grid drops from three columns to two to one as the terminal narrows.

use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::content::{self, WORKS};
use crate::interaction::{PointerTracker, PresenceTracker};
use crate::layout::{self, CARD_ROWS};
use crate::render::{FrameBuffer, TextStyle};
use crate::surface;
use crate::types::{Attr, Cleanup, Rect, Rgba};

use super::{parallax, reveal, reveal_offset};

const GRID_MARGIN: f64 = 4.0;
const GRID_GAP: f64 = 2.0;
const HEADER_ROWS: f64 = 7.0;

pub struct ShowcaseSection {
    surface: usize,
    card_surfaces: Vec<usize>,
    hovered: Signal<Option<usize>>,
    presence: PresenceTracker,
    pointer: PointerTracker,
    subs: Vec<Cleanup>,
}

impl ShowcaseSection {
    /// Mount the grid. `on_view` receives the index of a clicked card.
    pub fn mount(on_view: impl Fn(usize) + 'static) -> Self {
        let surface = surface::allocate();
        let card_surfaces: Vec<usize> = WORKS.iter().map(|_| surface::allocate()).collect();
        let hovered = signal(None);

        let mut subs = Vec::with_capacity(card_surfaces.len() + 1);

        let view: Rc<dyn Fn(usize)> = Rc::new(on_view);
        for (i, card) in card_surfaces.iter().enumerate() {
            let view = view.clone();
            subs.push(surface::on_click(*card, move |_, _| {
                view(i);
                true
            }));
        }

        // Hover: hit-test cards on every move inside the section
        let hover = hovered.clone();
        let cards = card_surfaces.clone();
        subs.push(surface::on_pointer_move(surface, move |x, y| {
            let hit = cards
                .iter()
                .position(|card| surface::rect(*card).is_some_and(|r| r.contains(x, y)));
            hover.set(hit);
        }));

        Self {
            surface,
            card_surfaces,
            hovered,
            presence: PresenceTracker::attach(Some(surface)),
            pointer: PointerTracker::attach(Some(surface)),
            subs,
        }
    }

    pub fn surface(&self) -> usize {
        self.surface
    }

    /// Hovered card index, if the pointer is over one.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered.get()
    }

    /// Reactive hover signal.
    pub fn hovered_signal(&self) -> Signal<Option<usize>> {
        self.hovered.clone()
    }

    /// Place the section and lay the card grid out inside it.
    pub fn set_rect(&self, rect: Rect) {
        surface::set_rect(self.surface, rect);

        let cols = layout::showcase_columns(rect.width);
        let card_width =
            (rect.width - GRID_MARGIN * 2.0 - (cols as f64 - 1.0) * GRID_GAP) / cols as f64;
        let card_height = CARD_ROWS - 2.0;

        for (i, card) in self.card_surfaces.iter().enumerate() {
            let col = i % cols;
            let row = i / cols;
            surface::set_rect(
                *card,
                Rect::new(
                    (rect.x + GRID_MARGIN + col as f64 * (card_width + GRID_GAP)).floor(),
                    rect.y + HEADER_ROWS + row as f64 * CARD_ROWS,
                    card_width.floor(),
                    card_height,
                ),
            );
        }
    }

    /// Paint the section into `view`, its rect in viewport coordinates.
    ///
    /// Card rects are stored in content space; `scroll` shifts them into
    /// the frame.
    pub fn render(&self, fb: &mut FrameBuffer, view: Rect, scroll: f64) {
        let visible = self.presence.is_visible();
        let hovered = self.hovered.get();
        let p = self.pointer.position();

        let x = view.x as i32;
        let y = view.y as i32 + reveal_offset(visible);
        let width = view.width as i32;

        let heading = reveal(visible, TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD));
        let dim = reveal(visible, TextStyle::fg(Rgba::gray(130)));

        // Eyebrow drifts slightly with the pointer
        let drift = parallax(p.x, 2.0);
        fb.draw_text_centered(x + drift, width, y + 2, "P O R T F O L I O", dim);
        fb.draw_text_centered(x, width, y + 4, "Featured Works", heading);
        fb.draw_text_centered(x, width, y + 5, "A selection of recent pieces", dim);

        for (i, work) in WORKS.iter().enumerate() {
            let Some(rect) = surface::rect(self.card_surfaces[i]) else {
                continue;
            };
            let lifted = hovered == Some(i);
            let card = Rect::new(rect.x, rect.y - scroll, rect.width, rect.height);
            self.render_card(fb, card, work, i, visible, lifted);
        }
    }

    fn render_card(
        &self,
        fb: &mut FrameBuffer,
        card: Rect,
        work: &content::Artwork,
        index: usize,
        visible: bool,
        lifted: bool,
    ) {
        let x = card.x as i32;
        // Hovered cards lift by one row
        let y = card.y as i32 - if lifted { 1 } else { 0 } + reveal_offset(visible);
        let w = card.width as i32;
        let h = card.height as i32;

        let border = if lifted {
            reveal(visible, TextStyle::fg(Rgba::WHITE))
        } else {
            reveal(visible, TextStyle::fg(Rgba::gray(90)))
        };

        fb.draw_text(x, y, "┌", border);
        fb.draw_text(x + w - 1, y, "┐", border);
        fb.draw_text(x, y + h - 1, "└", border);
        fb.draw_text(x + w - 1, y + h - 1, "┘", border);
        for col in x + 1..x + w - 1 {
            fb.draw_text(col, y, "─", border);
            fb.draw_text(col, y + h - 1, "─", border);
        }
        for row in y + 1..y + h - 1 {
            fb.draw_text(x, row, "│", border);
            fb.draw_text(x + w - 1, row, "│", border);
        }

        // Artwork area: a flat tone per piece, brighter under the pointer
        let base = 30 + (index as u8 % 3) * 12;
        let tone = if lifted { base + 16 } else { base };
        fb.fill_rect(x + 1, y + 1, w - 2, h - 5, Rgba::gray(tone));

        let title = if lifted {
            reveal(
                visible,
                TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD | Attr::UNDERLINE),
            )
        } else {
            reveal(visible, TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD))
        };
        fb.draw_text(x + 2, y + h - 4, work.title, title);

        let caption = format!("{} · {}", work.medium, work.year);
        fb.draw_text(
            x + 2,
            y + h - 3,
            &caption,
            reveal(visible, TextStyle::fg(Rgba::gray(140))),
        );
    }

    /// Drop subscriptions and release surfaces. Idempotent.
    pub fn unmount(&mut self) {
        for cleanup in self.subs.drain(..) {
            cleanup();
        }
        self.presence.detach();
        self.pointer.detach();
        for card in &self.card_surfaces {
            surface::release(*card);
        }
        surface::release(self.surface);
    }
}

impl Drop for ShowcaseSection {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport;
    use std::cell::RefCell;

    fn setup(width: f64) -> ShowcaseSection {
        surface::reset();
        viewport::reset();
        viewport::set_size(width, 40.0);
        viewport::set_content_height(400.0);

        let showcase = ShowcaseSection::mount(|_| {});
        showcase.set_rect(Rect::new(0.0, 36.0, width, 100.0));
        showcase
    }

    #[test]
    fn test_grid_columns_follow_width() {
        let wide = setup(100.0);
        let r0 = surface::rect(wide.card_surfaces[0]).unwrap();
        let r2 = surface::rect(wide.card_surfaces[2]).unwrap();
        let r3 = surface::rect(wide.card_surfaces[3]).unwrap();
        // Three columns: cards 0..2 share a row, card 3 wraps
        assert_eq!(r0.y, r2.y);
        assert!(r3.y > r0.y);
        assert!(r3.x == r0.x);
        drop(wide);

        let narrow = setup(50.0);
        let r0 = surface::rect(narrow.card_surfaces[0]).unwrap();
        let r1 = surface::rect(narrow.card_surfaces[1]).unwrap();
        // Single column: every card on its own row
        assert_eq!(r0.x, r1.x);
        assert!(r1.y > r0.y);
    }

    #[test]
    fn test_hover_tracks_pointer() {
        let showcase = setup(100.0);
        assert_eq!(showcase.hovered(), None);

        let r1 = surface::rect(showcase.card_surfaces[1]).unwrap();
        surface::dispatch_pointer_move(r1.x + 2.0, r1.y + 2.0);
        assert_eq!(showcase.hovered(), Some(1));

        // Between cards: hover clears
        surface::dispatch_pointer_move(1.0, r1.y + 2.0);
        assert_eq!(showcase.hovered(), None);
    }

    #[test]
    fn test_card_click_reports_index() {
        surface::reset();
        viewport::reset();
        viewport::set_size(100.0, 40.0);
        viewport::set_content_height(400.0);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let showcase = ShowcaseSection::mount(move |i| seen_clone.borrow_mut().push(i));
        showcase.set_rect(Rect::new(0.0, 36.0, 100.0, 100.0));

        let r4 = surface::rect(showcase.card_surfaces[4]).unwrap();
        assert!(surface::dispatch_click(r4.x + 1.0, r4.y + 1.0));
        assert_eq!(*seen.borrow(), vec![4]);
    }

    #[test]
    fn test_unmount_releases_cards() {
        let mut showcase = setup(100.0);
        let cards = showcase.card_surfaces.clone();

        showcase.unmount();
        for card in cards {
            assert!(!surface::is_allocated(card));
        }
        showcase.unmount();
    }
}
