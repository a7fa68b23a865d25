//! Footer section - brand, link columns, services, socials.

use crate::content;
use crate::interaction::{PointerTracker, PresenceTracker};
use crate::render::{FrameBuffer, TextStyle};
use crate::surface;
use crate::types::{Attr, Rect, Rgba};

use super::{parallax_xy, reveal, reveal_offset};

pub struct FooterSection {
    surface: usize,
    presence: PresenceTracker,
    pointer: PointerTracker,
}

impl FooterSection {
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

    /// Paint the footer into `view`, its rect in viewport coordinates.
    pub fn render(&self, fb: &mut FrameBuffer, view: Rect) {
        let visible = self.presence.is_visible();
        let x = view.x as i32;
        let y = view.y as i32 + reveal_offset(visible);
        let width = view.width as i32;

        let bright = reveal(visible, TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD));
        let plain = reveal(visible, TextStyle::fg(Rgba::gray(170)));
        let faint = reveal(visible, TextStyle::fg(Rgba::gray(110)));

        fb.draw_hline(x, y, width, faint);

        fb.draw_text(x + 2, y + 2, content::ARTIST_NAME, bright);
        fb.draw_text(x + 2, y + 3, content::SITE_TITLE, faint);

        // Three columns: quick links, services, socials
        let col = (width / 3).max(20);
        fb.draw_text(x + col, y + 2, "Quick Links", bright);
        for (i, link) in content::NAV_LINKS.iter().enumerate() {
            fb.draw_text(x + col, y + 3 + i as i32, link.label, plain);
        }

        fb.draw_text(x + col * 2, y + 2, "Services", bright);
        for (i, service) in content::SERVICES.iter().enumerate() {
            fb.draw_text(x + col * 2, y + 3 + i as i32, service, plain);
        }

        let socials = content::SOCIAL_LINKS.join("  ");
        fb.draw_text(x + 2, y + 8, &socials, plain);

        // Floating accents drift against the pointer
        let (dx, dy) = parallax_xy(self.pointer.position(), 2.0);
        fb.draw_text(x + width / 4 - dx, y + 6 + dy, "*", faint);
        fb.draw_text(x + width * 3 / 4 + dx, y + 5 - dy, "+", faint);

        fb.draw_hline(x, y + 10, width, faint);
        let copyright = format!(
            "(c) 2024 {}. All rights reserved.",
            content::ARTIST_NAME
        );
        fb.draw_text_centered(x, width, y + 11, &copyright, faint);
    }

    pub fn unmount(&mut self) {
        self.pointer.detach();
        self.presence.detach();
        surface::release(self.surface);
    }
}

impl Drop for FooterSection {
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

    fn setup() {
        surface::reset();
        viewport::reset();
        viewport::set_size(80.0, 24.0);
        viewport::set_content_height(200.0);
    }

    #[test]
    fn test_presence_follows_scroll() {
        setup();

        let footer = FooterSection::mount();
        footer.set_rect(Rect::new(0.0, 188.0, 80.0, 12.0));
        viewport::reevaluate();
        assert!(!footer.presence.is_visible());

        viewport::set_scroll(176.0);
        assert!(footer.presence.is_visible());
    }

    #[test]
    fn test_render_is_clipped_when_partially_visible() {
        setup();

        let footer = FooterSection::mount();
        footer.set_rect(Rect::new(0.0, 188.0, 80.0, 12.0));

        // Footer top sits on the last viewport row; drawing must not panic
        let mut fb = FrameBuffer::new(80, 24);
        footer.render(&mut fb, Rect::new(0.0, 23.0, 80.0, 12.0));
        assert!(fb.get(0, 23).is_some());
    }

    #[test]
    fn test_pointer_tracks_over_footer() {
        setup();

        let footer = FooterSection::mount();
        footer.set_rect(Rect::new(0.0, 0.0, 80.0, 12.0));

        surface::dispatch_pointer_move(40.0, 3.0);
        let p = footer.pointer.position();
        assert_eq!(p.x, 0.5);
        assert_eq!(p.y, 0.25);
    }

    #[test]
    fn test_unmount_releases_surface() {
        setup();

        let mut footer = FooterSection::mount();
        let s = footer.surface();
        footer.unmount();
        assert!(!surface::is_allocated(s));
        footer.unmount();
    }
}
