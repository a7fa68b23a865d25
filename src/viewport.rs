//! Viewport state - scroll offset, viewport size, intersection observations.
//!
//! The page is a vertical column taller than the terminal; the viewport is
//! the visible window over it. This module owns that window as process-wide
//! state with explicit subscribe/unsubscribe, instead of ambient globals:
//!
//! - Scroll subscriptions drive the nav bar's shrink-on-scroll effect.
//! - Intersection observations drive section presence flags: on every
//!   scroll, resize, or layout change, each observed surface's visible-area
//!   ratio is recomputed against a fixed 10% threshold and the callback
//!   fires only when the boolean result flips. No intermediate states.
//!
//! Scroll offset is clamped to `[0, content_height - viewport_height]`.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::surface;
use crate::types::{Cleanup, Rect};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Fraction of a surface's area that must be visible to count as present.
pub const PRESENCE_THRESHOLD: f64 = 0.1;

/// Scroll amount for one mouse wheel notch, in rows.
pub const WHEEL_SCROLL: f64 = 3.0;

// =============================================================================
// STATE
// =============================================================================

type ScrollHandler = Rc<dyn Fn(f64)>;
type PresenceHandler = Rc<dyn Fn(bool)>;

struct Observation {
    id: u64,
    surface: usize,
    last: Option<bool>,
    cb: PresenceHandler,
}

struct ViewportState {
    scroll_y: Signal<f64>,
    size: Signal<(f64, f64)>,
    content_height: f64,
    scroll_subs: Vec<(u64, ScrollHandler)>,
    observations: Vec<Observation>,
    next_id: u64,
}

impl ViewportState {
    fn new() -> Self {
        Self {
            scroll_y: signal(0.0),
            size: signal((80.0, 24.0)),
            content_height: 0.0,
            scroll_subs: Vec::new(),
            observations: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn max_scroll(&self) -> f64 {
        let (_, h) = self.size.get();
        (self.content_height - h).max(0.0)
    }
}

thread_local! {
    static VIEWPORT: RefCell<ViewportState> = RefCell::new(ViewportState::new());
}

// =============================================================================
// SCROLL / SIZE
// =============================================================================

/// Current scroll offset in rows.
pub fn scroll_y() -> f64 {
    VIEWPORT.with(|vp| vp.borrow().scroll_y.get())
}

/// Reactive scroll signal, for derived state like the nav shrink flag.
pub fn scroll_signal() -> Signal<f64> {
    VIEWPORT.with(|vp| vp.borrow().scroll_y.clone())
}

/// Viewport size (columns, rows).
pub fn size() -> (f64, f64) {
    VIEWPORT.with(|vp| vp.borrow().size.get())
}

/// Set the viewport size and re-evaluate observations.
pub fn set_size(width: f64, height: f64) {
    VIEWPORT.with(|vp| {
        let vp = vp.borrow();
        vp.size.set((width, height));
        let clamped = vp.scroll_y.get().min(vp.max_scroll());
        vp.scroll_y.set(clamped);
    });
    reevaluate();
}

/// Set the total scrollable content height (from layout).
pub fn set_content_height(height: f64) {
    VIEWPORT.with(|vp| {
        let mut vp = vp.borrow_mut();
        vp.content_height = height;
        let clamped = vp.scroll_y.get().min(vp.max_scroll());
        vp.scroll_y.set(clamped);
    });
    reevaluate();
}

/// Set the scroll offset (clamped), notify scroll subscribers, and
/// re-evaluate observations.
pub fn set_scroll(y: f64) {
    let (changed, value, handlers) = VIEWPORT.with(|vp| {
        let vp = vp.borrow();
        let clamped = y.clamp(0.0, vp.max_scroll());
        let changed = vp.scroll_y.get() != clamped;
        vp.scroll_y.set(clamped);
        let handlers: Vec<ScrollHandler> =
            vp.scroll_subs.iter().map(|(_, cb)| cb.clone()).collect();
        (changed, clamped, handlers)
    });
    if changed {
        for handler in handlers {
            handler(value);
        }
        reevaluate();
    }
}

/// Scroll by a delta in rows.
pub fn scroll_by(delta: f64) {
    set_scroll(scroll_y() + delta);
}

/// Scroll so the given surface's top lands at `offset` rows below the
/// viewport top (the "scroll into view" of a named section).
pub fn scroll_into_view(surface: usize, offset: f64) {
    if let Some(rect) = surface::rect(surface) {
        set_scroll(rect.y - offset);
    }
}

/// Subscribe to scroll offset changes. Returns cleanup.
pub fn on_scroll(cb: impl Fn(f64) + 'static) -> Cleanup {
    let id = VIEWPORT.with(|vp| {
        let mut vp = vp.borrow_mut();
        let id = vp.next_id();
        vp.scroll_subs.push((id, Rc::new(cb)));
        id
    });
    Box::new(move || {
        VIEWPORT.with(|vp| {
            vp.borrow_mut().scroll_subs.retain(|(i, _)| *i != id);
        });
    })
}

// =============================================================================
// INTERSECTION OBSERVATIONS
// =============================================================================

/// Observe a surface's intersection with the viewport.
///
/// The callback receives the presence boolean (visible ratio above
/// [`PRESENCE_THRESHOLD`]) and fires once immediately, then only on flips.
/// Returns cleanup; releasing an already-released observation is a no-op.
pub fn observe(surface: usize, cb: impl Fn(bool) + 'static) -> Cleanup {
    let id = VIEWPORT.with(|vp| {
        let mut vp = vp.borrow_mut();
        let id = vp.next_id();
        vp.observations.push(Observation {
            id,
            surface,
            last: None,
            cb: Rc::new(cb),
        });
        id
    });
    reevaluate();
    Box::new(move || {
        VIEWPORT.with(|vp| {
            vp.borrow_mut().observations.retain(|o| o.id != id);
        });
    })
}

/// Visible-area ratio of a rect against the current viewport window.
fn visible_ratio(rect: &Rect, scroll: f64, width: f64, height: f64) -> f64 {
    let area = rect.area();
    if area == 0.0 {
        return 0.0;
    }
    let window = Rect::new(0.0, scroll, width, height);
    rect.intersection_area(&window) / area
}

/// Recompute every observation and fire callbacks for boolean flips.
///
/// Called on scroll, resize, and after layout writes new surface rects.
pub fn reevaluate() {
    let due: Vec<(PresenceHandler, bool)> = VIEWPORT.with(|vp| {
        let mut vp = vp.borrow_mut();
        let scroll = vp.scroll_y.get();
        let (w, h) = vp.size.get();
        let mut due = Vec::new();
        for obs in &mut vp.observations {
            let visible = surface::rect(obs.surface)
                .is_some_and(|r| visible_ratio(&r, scroll, w, h) >= PRESENCE_THRESHOLD);
            if obs.last != Some(visible) {
                obs.last = Some(visible);
                due.push((obs.cb.clone(), visible));
            }
        }
        due
    });
    for (cb, visible) in due {
        cb(visible);
    }
}

/// Reset all viewport state (for testing).
pub fn reset() {
    VIEWPORT.with(|vp| {
        *vp.borrow_mut() = ViewportState::new();
    });
}

// =============================================================================
// TESTS
// =============================================================================
