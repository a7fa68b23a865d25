//! Pointer tracker - normalized pointer position relative to a surface.
//!
//! Converts absolute pointer coordinates into a position relative to the
//! surface's bounding rect: `x = (px - left) / width`, `y = (py - top) / height`.
//! Consumers use the value purely for decorative parallax offsets, so it is
//! a best-effort latest sample with no ordering guarantee against render
//! frames. The value is NOT clamped to [0,1]: if the rect changes between
//! delivery and computation the sample can land outside the unit square,
//! matching the original behavior rather than hiding it.
//!
//! # Example
//!
//! ```ignore
//! let surface = surface::allocate();
//! let tracker = PointerTracker::attach(Some(surface));
//! // ...event loop dispatches pointer moves...
//! let p = tracker.position();
//! let offset_x = p.x * 10.0 - 5.0; // background drift
//! ```

use spark_signals::{Signal, signal};

use crate::surface;
use crate::types::Cleanup;

/// Normalized pointer position. `(0,0)` is the surface's top-left corner,
/// `(1,1)` its bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Tracks the pointer relative to one surface.
///
/// Attached on mount, detached on unmount. Detach is idempotent and also
/// runs on drop.
pub struct PointerTracker {
    position: Signal<PointerPosition>,
    unsubscribe: Option<Cleanup>,
}

impl PointerTracker {
    /// Attach to a surface. `None` yields an inert tracker that stays at
    /// `(0,0)` - a missing container is a no-op, not an error.
    pub fn attach(surface_index: Option<usize>) -> Self {
        let position = signal(PointerPosition::default());

        let unsubscribe = surface_index.map(|index| {
            let position = position.clone();
            surface::on_pointer_move(index, move |px, py| {
                if let Some(rect) = surface::rect(index) {
                    if rect.width > 0.0 && rect.height > 0.0 {
                        position.set(PointerPosition {
                            x: (px - rect.x) / rect.width,
                            y: (py - rect.y) / rect.height,
                        });
                    }
                }
            })
        });

        Self {
            position,
            unsubscribe,
        }
    }

    /// Latest sample.
    pub fn position(&self) -> PointerPosition {
        self.position.get()
    }

    /// Reactive position signal.
    pub fn signal(&self) -> Signal<PointerPosition> {
        self.position.clone()
    }

    /// Release the subscription. Safe to call more than once.
    pub fn detach(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn setup() {
        surface::reset();
    }

    #[test]
    fn test_normalization_is_exact() {
        setup();

        // Rect with origin (L,T) = (10, 20), W = 40, H = 16
        let s = surface::allocate();
        surface::set_rect(s, Rect::new(10.0, 20.0, 40.0, 16.0));

        let tracker = PointerTracker::attach(Some(s));
        assert_eq!(tracker.position(), PointerPosition::default());

        // Pointer at (L + 0.5W, T + 0.25H)
        surface::dispatch_pointer_move(10.0 + 20.0, 20.0 + 4.0);
        let p = tracker.position();
        assert_eq!(p.x, 0.5);
        assert_eq!(p.y, 0.25);
    }

    #[test]
    fn test_last_write_wins() {
        setup();

        let s = surface::allocate();
        surface::set_rect(s, Rect::new(0.0, 0.0, 10.0, 10.0));
        let tracker = PointerTracker::attach(Some(s));

        surface::dispatch_pointer_move(2.0, 2.0);
        surface::dispatch_pointer_move(8.0, 6.0);
        assert_eq!(tracker.position(), PointerPosition { x: 0.8, y: 0.6 });
    }

    #[test]
    fn test_missing_surface_is_inert() {
        setup();

        let mut tracker = PointerTracker::attach(None);
        surface::dispatch_pointer_move(5.0, 5.0);
        assert_eq!(tracker.position(), PointerPosition::default());

        // Detach twice: no-op both times
        tracker.detach();
        tracker.detach();
    }

    #[test]
    fn test_detach_stops_updates() {
        setup();

        let s = surface::allocate();
        surface::set_rect(s, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut tracker = PointerTracker::attach(Some(s));

        surface::dispatch_pointer_move(5.0, 5.0);
        let before = tracker.position();

        tracker.detach();
        surface::dispatch_pointer_move(9.0, 9.0);
        assert_eq!(tracker.position(), before);
    }

    #[test]
    fn test_drop_releases_subscription() {
        setup();

        let s = surface::allocate();
        surface::set_rect(s, Rect::new(0.0, 0.0, 10.0, 10.0));
        {
            let _tracker = PointerTracker::attach(Some(s));
        }
        // Dispatch after drop must not touch freed state
        surface::dispatch_pointer_move(5.0, 5.0);
    }
}
