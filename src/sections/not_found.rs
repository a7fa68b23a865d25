//! 404 view - entrance delay, periodic glitch pulse, back-home button.
//!
//! The view reveals after a short entrance delay, then every few seconds
//! the headline glitches for a 150ms pulse (chromatic-split copies one
//! cell either side). All three timers are cancelled on unmount, so a
//! pulse can never land on a dead view.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::interaction::PointerTracker;
use crate::render::{FrameBuffer, TextStyle};
use crate::runtime::clock::{self, TimerHandle};
use crate::surface;
use crate::types::{Attr, Cleanup, Rect, Rgba};

use super::parallax;

/// Delay before the view fades in.
pub const ENTRANCE_MS: u64 = 100;

/// Period between glitch pulses.
pub const GLITCH_PERIOD_MS: u64 = 6000;

/// Length of one glitch pulse.
pub const GLITCH_PULSE_MS: u64 = 150;

const HOME_LABEL: &str = "[ Back to Home ]";

pub struct NotFoundView {
    surface: usize,
    home_surface: usize,
    entered: Signal<bool>,
    glitching: Signal<bool>,
    entrance: Option<TimerHandle>,
    interval: Option<TimerHandle>,
    pulse: Rc<Cell<Option<TimerHandle>>>,
    pointer: PointerTracker,
    click_sub: Option<Cleanup>,
}

impl NotFoundView {
    /// Mount the view and arm its timers.
    pub fn mount(on_home: impl Fn() + 'static) -> Self {
        let surface = surface::allocate();
        let home_surface = surface::allocate();

        let entered = signal(false);
        let glitching = signal(false);
        let pulse = Rc::new(Cell::new(None));

        let entered_clone = entered.clone();
        let entrance = clock::set_timeout(ENTRANCE_MS, move || {
            entered_clone.set(true);
        });

        // Each interval fire raises the glitch flag and schedules the
        // pulse-end timeout; the handle is kept so unmount can cancel a
        // pulse caught mid-flight.
        let glitch_flag = glitching.clone();
        let pulse_slot = pulse.clone();
        let interval = clock::set_interval(GLITCH_PERIOD_MS, move || {
            glitch_flag.set(true);
            let flag = glitch_flag.clone();
            let handle = clock::set_timeout(GLITCH_PULSE_MS, move || {
                flag.set(false);
            });
            pulse_slot.set(Some(handle));
        });

        let home: Rc<dyn Fn()> = Rc::new(on_home);
        let click_sub = surface::on_click(home_surface, move |_, _| {
            home();
            true
        });

        Self {
            surface,
            home_surface,
            entered,
            glitching,
            entrance: Some(entrance),
            interval: Some(interval),
            pulse,
            pointer: PointerTracker::attach(Some(surface)),
            click_sub: Some(click_sub),
        }
    }

    pub fn surface(&self) -> usize {
        self.surface
    }

    pub fn has_entered(&self) -> bool {
        self.entered.get()
    }

    pub fn is_glitching(&self) -> bool {
        self.glitching.get()
    }

    /// Place the view over the whole viewport.
    pub fn set_rect(&self, width: f64, height: f64) {
        surface::set_rect(self.surface, Rect::new(0.0, 0.0, width, height));

        let len = HOME_LABEL.chars().count() as f64;
        surface::set_rect(
            self.home_surface,
            Rect::new(
                ((width - len) / 2.0).floor(),
                (height * 0.62).floor(),
                len,
                1.0,
            ),
        );
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        let width = fb.width() as i32;
        let height = fb.height() as i32;
        fb.fill_rect(0, 0, width, height, Rgba::gray(12));

        if !self.entered.get() {
            return;
        }

        let headline_row = (height as f64 * 0.35) as i32;
        let code = TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD);

        if self.glitching.get() {
            fb.draw_text_centered(
                -1,
                width,
                headline_row,
                "4 0 4",
                TextStyle::fg(Rgba::rgb(230, 80, 80)),
            );
            fb.draw_text_centered(
                1,
                width,
                headline_row,
                "4 0 4",
                TextStyle::fg(Rgba::rgb(80, 200, 230)),
            );
        }
        fb.draw_text_centered(0, width, headline_row, "4 0 4", code);

        fb.draw_text_centered(
            0,
            width,
            headline_row + 2,
            "Page Not Found",
            TextStyle::fg(Rgba::gray(200)),
        );
        // The subtitle drifts with the pointer; the headline stays put
        let dx = parallax(self.pointer.position().x, 2.0);
        fb.draw_text_centered(
            dx,
            width,
            headline_row + 4,
            "The page you are looking for has drifted out of frame.",
            TextStyle::fg(Rgba::gray(130)),
        );

        if let Some(rect) = surface::rect(self.home_surface) {
            fb.draw_text(
                rect.x as i32,
                rect.y as i32,
                HOME_LABEL,
                TextStyle::fg(Rgba::BLACK).on(Rgba::WHITE),
            );
        }
    }

    /// Cancel every timer and release surfaces. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.entrance.take() {
            handle.cancel();
        }
        if let Some(handle) = self.interval.take() {
            handle.cancel();
        }
        if let Some(handle) = self.pulse.take() {
            handle.cancel();
        }
        if let Some(cleanup) = self.click_sub.take() {
            cleanup();
        }
        self.pointer.detach();
        surface::release(self.home_surface);
        surface::release(self.surface);
    }
}

impl Drop for NotFoundView {
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

    fn setup() -> NotFoundView {
        clock::reset();
        surface::reset();
        viewport::reset();
        viewport::set_size(80.0, 24.0);

        let view = NotFoundView::mount(|| {});
        view.set_rect(80.0, 24.0);
        view
    }

    #[test]
    fn test_entrance_after_delay() {
        let view = setup();
        assert!(!view.has_entered());

        clock::advance(ENTRANCE_MS - 1);
        assert!(!view.has_entered());

        clock::advance(1);
        assert!(view.has_entered());
    }

    #[test]
    fn test_glitch_pulse_timing() {
        let view = setup();

        clock::advance(GLITCH_PERIOD_MS);
        assert!(view.is_glitching());

        clock::advance(GLITCH_PULSE_MS - 1);
        assert!(view.is_glitching());

        clock::advance(1);
        assert!(!view.is_glitching());

        // And again next period
        clock::advance(GLITCH_PERIOD_MS - GLITCH_PULSE_MS);
        assert!(view.is_glitching());
    }

    #[test]
    fn test_home_click_fires_callback() {
        use std::cell::Cell;

        clock::reset();
        surface::reset();
        viewport::reset();
        viewport::set_size(80.0, 24.0);

        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let view = NotFoundView::mount(move || clicks_clone.set(clicks_clone.get() + 1));
        view.set_rect(80.0, 24.0);

        let rect = surface::rect(view.home_surface).unwrap();
        assert!(surface::dispatch_click(rect.x, rect.y));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_unmount_cancels_all_timers() {
        let mut view = setup();

        // Catch a pulse mid-flight
        clock::advance(GLITCH_PERIOD_MS);
        assert!(view.is_glitching());

        view.unmount();
        assert_eq!(clock::pending_count(), 0);

        // The stale pulse never lands
        clock::advance(GLITCH_PULSE_MS);
        assert!(view.is_glitching());

        assert!(!surface::is_allocated(view.surface));
        view.unmount();
    }

    #[test]
    fn test_render_before_entrance_is_blank() {
        let view = setup();

        let row = (24.0_f64 * 0.35) as u16;
        let mut fb = FrameBuffer::new(80, 24);
        view.render(&mut fb);
        // Background only, no headline yet; "4 0 4" starts at column 37
        assert_eq!(fb.get(37, row).unwrap().ch, ' ');

        clock::advance(ENTRANCE_MS);
        view.render(&mut fb);
        assert_eq!(fb.get(37, row).unwrap().ch, '4');
    }
}
