//! Presence tracker - viewport visibility flag for enter-animations.
//!
//! Wraps a [`viewport::observe`] observation in a signal. The flag starts
//! `false`, flips when the owning surface crosses the 10% visibility
//! threshold, and may lag real viewport state by one observation pass.
//! Sections gate their reveal animations on it.

use spark_signals::{Signal, signal};

use crate::types::Cleanup;
use crate::viewport;

/// Tracks whether one surface is present in the viewport.
///
/// Attached on mount, detached on unmount. Detach is idempotent and also
/// runs on drop.
pub struct PresenceTracker {
    visible: Signal<bool>,
    unobserve: Option<Cleanup>,
}

impl PresenceTracker {
    /// Attach to a surface. `None` yields an inert tracker that stays
    /// hidden - a missing container is a no-op, not an error.
    pub fn attach(surface_index: Option<usize>) -> Self {
        let visible = signal(false);

        let unobserve = surface_index.map(|index| {
            let visible = visible.clone();
            viewport::observe(index, move |v| {
                visible.set(v);
            })
        });

        Self { visible, unobserve }
    }

    /// Current presence flag.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Reactive presence signal.
    pub fn signal(&self) -> Signal<bool> {
        self.visible.clone()
    }

    /// Release the observation. Safe to call more than once.
    pub fn detach(&mut self) {
        if let Some(unobserve) = self.unobserve.take() {
            unobserve();
        }
    }
}

impl Drop for PresenceTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

// =============================================================================
// TESTS
// =============================================================================
