//! Hero section - full-bleed carousel with parallax headline.
//!
//! Owns the [`CarouselController`] for the background slides, one clickable
//! surface per pager dot, and the explore button that scrolls the showcase
//! into view. The pointer tracker drives decorative parallax drift on the
//! background pattern and headline; the samples are best-effort and never
//! block a frame.

use std::rc::Rc;

use crate::content::{self, HERO_SLIDES};
use crate::interaction::{CarouselController, CarouselError, PointerTracker, PresenceTracker};
use crate::render::{FrameBuffer, TextStyle};
use crate::surface;
use crate::types::{Attr, Cleanup, Rect, Rgba};

use super::{parallax_xy, reveal, wrap_text};

const EXPLORE_LABEL: &str = "[ Explore My Work ]";

pub struct HeroSection {
    surface: usize,
    dot_surfaces: Vec<usize>,
    explore_surface: usize,
    carousel: Rc<CarouselController>,
    presence: PresenceTracker,
    pointer: PointerTracker,
    subs: Vec<Cleanup>,
}

impl HeroSection {
    /// Mount the hero and arm the slide auto-advance.
    ///
    /// `on_explore` runs when the explore button is clicked; the app wires
    /// it to scroll the showcase into view.
    pub fn mount(on_explore: impl Fn() + 'static) -> Result<Self, CarouselError> {
        let surface = surface::allocate();
        let dot_surfaces: Vec<usize> = HERO_SLIDES.iter().map(|_| surface::allocate()).collect();
        let explore_surface = surface::allocate();

        let carousel = Rc::new(CarouselController::new(HERO_SLIDES.len())?);
        carousel.start();

        let mut subs = Vec::with_capacity(dot_surfaces.len() + 1);
        for (i, dot) in dot_surfaces.iter().enumerate() {
            let carousel = carousel.clone();
            subs.push(surface::on_click(*dot, move |_, _| {
                if carousel.select(i).is_err() {
                    tracing::warn!(index = i, "pager dot outside slide range");
                }
                true
            }));
        }

        let explore: Rc<dyn Fn()> = Rc::new(on_explore);
        subs.push(surface::on_click(explore_surface, move |_, _| {
            explore();
            true
        }));

        Ok(Self {
            surface,
            dot_surfaces,
            explore_surface,
            carousel,
            presence: PresenceTracker::attach(Some(surface)),
            pointer: PointerTracker::attach(Some(surface)),
            subs,
        })
    }

    pub fn surface(&self) -> usize {
        self.surface
    }

    /// The slide state machine, read by renders and tests.
    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    /// Place the hero and its interactive child surfaces.
    pub fn set_rect(&self, rect: Rect) {
        surface::set_rect(self.surface, rect);

        // Pager dots: vertical stack on the right edge, centered
        let dots = self.dot_surfaces.len() as f64;
        let stack_height = dots * 2.0 - 1.0;
        let top = rect.y + (rect.height - stack_height) / 2.0;
        for (i, dot) in self.dot_surfaces.iter().enumerate() {
            surface::set_rect(
                *dot,
                Rect::new(rect.x + rect.width - 5.0, top + i as f64 * 2.0, 3.0, 1.0),
            );
        }

        // Explore button in the lower third
        let len = EXPLORE_LABEL.chars().count() as f64;
        surface::set_rect(
            self.explore_surface,
            Rect::new(
                rect.x + (rect.width - len) / 2.0,
                (rect.y + rect.height * 0.72).floor(),
                len,
                1.0,
            ),
        );
    }

    /// Paint the hero into `view`, its rect in viewport coordinates.
    pub fn render(&self, fb: &mut FrameBuffer, view: Rect) {
        let carousel = self.carousel();
        let visible = self.presence.is_visible();
        let p = self.pointer.position();

        let x = view.x as i32;
        let y = view.y as i32;
        let width = view.width as i32;
        let height = view.height as i32;

        // Slide background; mid-transition shows a blend toward the target
        let current = HERO_SLIDES[carousel.current_index()].shade;
        let shade = match carousel.target() {
            Some(target) => Rgba::gray(current).blend(Rgba::gray(HERO_SLIDES[target].shade), 0.5),
            None => Rgba::gray(current),
        };
        fb.fill_rect(x, y, width, height, shade);

        // Drifting dot pattern behind the headline
        let (bx, by) = parallax_xy(p, 6.0);
        let pattern = TextStyle::fg(Rgba::gray(current.saturating_add(30))).with_attrs(Attr::DIM);
        let mut row = y + by.rem_euclid(3) - 3;
        while row < y + height {
            let mut col = x + bx.rem_euclid(6) - 6;
            while col < x + width {
                fb.draw_text(col, row, "·", pattern.on(shade));
                col += 6;
            }
            row += 3;
        }

        // Headline drifts on its own, shallower, layer
        let (hx, hy) = parallax_xy(p, 2.0);
        let headline_row = y + (height as f64 * 0.34) as i32 + hy;
        let headline = reveal(visible, TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD));
        fb.draw_text_centered(x + hx, width, headline_row, content::SITE_TITLE, headline);

        let tagline = reveal(visible, TextStyle::fg(Rgba::gray(190)));
        let budget = (width - 20).max(20) as usize;
        for (i, line) in wrap_text(content::HERO_TAGLINE, budget).iter().enumerate() {
            fb.draw_text_centered(x, width, headline_row + 2 + i as i32, line, tagline);
        }

        // Same placement formula as set_rect, in viewport space
        let button = reveal(visible, TextStyle::fg(Rgba::BLACK).on(Rgba::WHITE));
        let button_row = (view.y + view.height * 0.72).floor() as i32;
        fb.draw_text_centered(x, width, button_row, EXPLORE_LABEL, button);

        // Pager dots and progress
        self.render_pager(fb, view, visible);
    }

    fn render_pager(&self, fb: &mut FrameBuffer, view: Rect, visible: bool) {
        let carousel = self.carousel();
        let active = carousel.target().unwrap_or_else(|| carousel.current_index());

        let dots = self.dot_surfaces.len() as i32;
        let stack_height = dots * 2 - 1;
        let dot_x = (view.x + view.width) as i32 - 5;
        let top = view.y as i32 + ((view.height as i32 - stack_height) / 2);
        for i in 0..dots {
            let ch = if i as usize == active { "●" } else { "○" };
            let style = if i as usize == active {
                TextStyle::fg(Rgba::WHITE)
            } else {
                TextStyle::fg(Rgba::gray(120))
            };
            fb.draw_text(dot_x + 1, top + i * 2, ch, reveal(visible, style));
        }

        // Progress column beside the dots: filled portion tracks the index
        let len = carousel.len() as i32;
        let filled = (carousel.current_index() as i32 + 1) * stack_height / len;
        for row in 0..stack_height {
            let style = if row < filled {
                TextStyle::fg(Rgba::WHITE)
            } else {
                TextStyle::fg(Rgba::gray(70))
            };
            fb.draw_text(dot_x + 3, top + row, "│", reveal(visible, style));
        }
    }

    /// Cancel timers, drop subscriptions, release surfaces. Idempotent.
    pub fn unmount(&mut self) {
        for cleanup in self.subs.drain(..) {
            cleanup();
        }
        // Click closures held clones of the controller; with subs gone the
        // handle is unique again and can tear the timers down.
        if let Some(carousel) = Rc::get_mut(&mut self.carousel) {
            carousel.teardown();
        }
        self.presence.detach();
        self.pointer.detach();
        for dot in &self.dot_surfaces {
            surface::release(*dot);
        }
        surface::release(self.explore_surface);
        surface::release(self.surface);
    }
}

impl Drop for HeroSection {
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
    use crate::interaction::{AUTO_ADVANCE_MS, SETTLE_MS};
    use crate::runtime::clock;
    use crate::viewport;
    use std::cell::Cell;

    fn setup() -> HeroSection {
        clock::reset();
        surface::reset();
        viewport::reset();
        viewport::set_size(100.0, 40.0);
        viewport::set_content_height(200.0);

        let hero = HeroSection::mount(|| {}).unwrap();
        hero.set_rect(Rect::new(0.0, 0.0, 100.0, 36.0));
        viewport::reevaluate();
        hero
    }

    fn dot_center(hero: &HeroSection, i: usize) -> (f64, f64) {
        let rect = surface::rect(hero.dot_surfaces[i]).unwrap();
        (rect.x + 1.0, rect.y)
    }

    #[test]
    fn test_auto_advance_then_dot_click_round_trip() {
        let hero = setup();
        let carousel = hero.carousel();
        assert_eq!(carousel.current_index(), 0);

        // One auto-advance period plus the settle delay lands on slide 1
        clock::advance(AUTO_ADVANCE_MS);
        clock::advance(SETTLE_MS);
        assert_eq!(carousel.current_index(), 1);

        // Clicking dot 0 while idle transitions back
        let (cx, cy) = dot_center(&hero, 0);
        assert!(surface::dispatch_click(cx, cy));
        assert!(carousel.is_transitioning());
        assert_eq!(carousel.target(), Some(0));

        clock::advance(SETTLE_MS);
        assert_eq!(carousel.current_index(), 0);

        // Clicking the now-current dot again is a no-op
        assert!(surface::dispatch_click(cx, cy));
        assert!(!carousel.is_transitioning());
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn test_dot_click_ignored_mid_transition() {
        let hero = setup();

        let (x1, y1) = dot_center(&hero, 1);
        surface::dispatch_click(x1, y1);
        assert_eq!(hero.carousel().target(), Some(1));

        // Second dot click while the first is settling changes nothing
        let (x0, y0) = dot_center(&hero, 0);
        surface::dispatch_click(x0, y0);
        assert_eq!(hero.carousel().target(), Some(1));

        clock::advance(SETTLE_MS);
        assert_eq!(hero.carousel().current_index(), 1);
    }

    #[test]
    fn test_explore_button_fires_callback() {
        clock::reset();
        surface::reset();
        viewport::reset();
        viewport::set_size(100.0, 40.0);
        viewport::set_content_height(200.0);

        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let hero = HeroSection::mount(move || clicks_clone.set(clicks_clone.get() + 1)).unwrap();
        hero.set_rect(Rect::new(0.0, 0.0, 100.0, 36.0));

        let rect = surface::rect(hero.explore_surface).unwrap();
        assert!(surface::dispatch_click(rect.x, rect.y));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_unmount_cancels_timers_and_surfaces() {
        let mut hero = setup();
        clock::advance(AUTO_ADVANCE_MS); // transition in flight

        let surfaces: Vec<usize> = std::iter::once(hero.surface)
            .chain(std::iter::once(hero.explore_surface))
            .chain(hero.dot_surfaces.iter().copied())
            .collect();

        hero.unmount();
        assert_eq!(clock::pending_count(), 0);
        for s in surfaces {
            assert!(!surface::is_allocated(s));
        }

        // No late commit after unmount
        clock::advance(SETTLE_MS);
        hero.unmount();
    }

    #[test]
    fn test_render_paints_slide_background() {
        let hero = setup();
        let mut fb = FrameBuffer::new(100, 40);
        hero.render(&mut fb, Rect::new(0.0, 0.0, 100.0, 36.0));
        assert_eq!(fb.get(50, 0).unwrap().bg, Rgba::gray(HERO_SLIDES[0].shade));
    }
}
