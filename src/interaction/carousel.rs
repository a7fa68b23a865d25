//! Carousel controller - timed index advance with a transition-lock.
//!
//! Operates over a fixed ordered sequence of N items. The controller is a
//! two-state machine: Idle(current) and Transitioning(current, target).
//! A transition is started by the auto-advance timer or an explicit
//! selection, holds the lock for the settle delay, then commits the target
//! index and returns to Idle.
//!
//! Selections made while a transition is in flight are ignored - no queuing,
//! no interruption. That policy avoids overlapping visual transitions and is
//! part of the contract, not something to "fix".
//!
//! Every commit re-arms the auto-advance interval, so user-driven index
//! changes push the next automatic advance a full period out.
//!
//! # Example
//!
//! ```ignore
//! let carousel = CarouselController::new(slides.len())?;
//! carousel.start();
//! // dot click:
//! carousel.select(2)?;
//! // teardown happens on drop; timers are cancelled, no late commit
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{Signal, signal};
use thiserror::Error;

use crate::runtime::clock::{self, TimerHandle};

/// Auto-advance period in milliseconds.
pub const AUTO_ADVANCE_MS: u64 = 6000;

/// Settle delay between starting a transition and committing the new index.
pub const SETTLE_MS: u64 = 500;

/// Contract violations by the caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CarouselError {
    /// The carousel needs at least one item.
    #[error("carousel requires at least one item")]
    Empty,
    /// Selection outside [0, len). Rejected without mutating state so
    /// caller bugs surface in tests instead of being clamped away.
    #[error("index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}

struct CarouselCore {
    len: usize,
    current: Signal<usize>,
    transitioning: Signal<bool>,
    target: Cell<Option<usize>>,
    interval: Cell<Option<TimerHandle>>,
    settle: Cell<Option<TimerHandle>>,
    auto_started: Cell<bool>,
    torn_down: Cell<bool>,
}

impl CarouselCore {
    fn begin_transition(self: &Rc<Self>, target: usize) {
        self.transitioning.set(true);
        self.target.set(Some(target));
        let core = self.clone();
        let handle = clock::set_timeout(SETTLE_MS, move || core.commit());
        self.settle.set(Some(handle));
    }

    fn commit(self: &Rc<Self>) {
        // The settle timeout is cancelled on teardown, so this should be
        // unreachable after teardown; the guard keeps it an invariant
        // rather than a scheduling accident.
        if self.torn_down.get() {
            return;
        }
        if let Some(target) = self.target.take() {
            self.current.set(target);
        }
        self.transitioning.set(false);
        self.settle.set(None);
        if self.auto_started.get() {
            self.arm_auto();
        }
    }

    fn arm_auto(self: &Rc<Self>) {
        if let Some(handle) = self.interval.take() {
            handle.cancel();
        }
        let core = self.clone();
        let handle = clock::set_interval(AUTO_ADVANCE_MS, move || core.auto_advance());
        self.interval.set(Some(handle));
    }

    fn auto_advance(self: &Rc<Self>) {
        if self.torn_down.get() || self.transitioning.get() {
            return;
        }
        let next = (self.current.get() + 1) % self.len;
        self.begin_transition(next);
    }

    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        if let Some(handle) = self.interval.take() {
            handle.cancel();
        }
        if let Some(handle) = self.settle.take() {
            handle.cancel();
        }
    }
}

/// The carousel state machine.
///
/// Lives for the lifetime of its owning view; [`teardown`](Self::teardown)
/// (or drop) cancels the auto-advance interval and any pending settle
/// timeout, so no commit can land after disposal.
pub struct CarouselController {
    core: Rc<CarouselCore>,
}

impl CarouselController {
    /// Create a controller over `len` items, starting at Idle(0).
    ///
    /// The auto-advance timer is not armed until [`start`](Self::start).
    pub fn new(len: usize) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        Ok(Self {
            core: Rc::new(CarouselCore {
                len,
                current: signal(0),
                transitioning: signal(false),
                target: Cell::new(None),
                interval: Cell::new(None),
                settle: Cell::new(None),
                auto_started: Cell::new(false),
                torn_down: Cell::new(false),
            }),
        })
    }

    /// Arm the auto-advance interval.
    pub fn start(&self) {
        if self.core.torn_down.get() {
            return;
        }
        self.core.auto_started.set(true);
        self.core.arm_auto();
    }

    /// Explicitly select an index.
    ///
    /// - Out of range: rejected, state untouched.
    /// - Equal to the current index while idle: no-op (no timer reset).
    /// - While transitioning: ignored (no queuing).
    /// - Otherwise: starts a transition that commits after the settle delay.
    pub fn select(&self, index: usize) -> Result<(), CarouselError> {
        let core = &self.core;
        if index >= core.len {
            return Err(CarouselError::OutOfRange {
                index,
                len: core.len,
            });
        }
        if core.torn_down.get() || core.transitioning.get() {
            return Ok(());
        }
        if index == core.current.get() {
            return Ok(());
        }
        core.begin_transition(index);
        Ok(())
    }

    /// Committed index, in [0, len).
    pub fn current_index(&self) -> usize {
        self.core.current.get()
    }

    /// Reactive index signal.
    pub fn current_signal(&self) -> Signal<usize> {
        self.core.current.clone()
    }

    /// Transition-lock state.
    pub fn is_transitioning(&self) -> bool {
        self.core.transitioning.get()
    }

    /// Reactive transition-lock signal.
    pub fn transitioning_signal(&self) -> Signal<bool> {
        self.core.transitioning.clone()
    }

    /// Target of the in-flight transition, if any.
    pub fn target(&self) -> Option<usize> {
        self.core.target.get()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.core.len
    }

    /// Always false; `new` rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cancel all timers. Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        self.core.teardown();
    }
}

impl Drop for CarouselController {
    fn drop(&mut self) {
        self.core.teardown();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        clock::reset();
    }

    /// One full advance: interval fire plus settle delay.
    fn advance_one_cycle() {
        clock::advance(AUTO_ADVANCE_MS);
        clock::advance(SETTLE_MS);
    }

    #[test]
    fn test_new_rejects_empty() {
        setup();
        assert_eq!(CarouselController::new(0).err(), Some(CarouselError::Empty));
    }

    #[test]
    fn test_wraparound_after_n_fires() {
        setup();

        for n in [1usize, 2, 5] {
            clock::reset();
            let carousel = CarouselController::new(n).unwrap();
            carousel.start();

            for _ in 0..n {
                advance_one_cycle();
                assert!(carousel.current_index() < n);
            }
            assert_eq!(carousel.current_index(), 0, "wraparound for n={n}");
        }
    }

    #[test]
    fn test_timer_fire_transitions_then_commits() {
        setup();

        let carousel = CarouselController::new(3).unwrap();
        carousel.start();

        clock::advance(AUTO_ADVANCE_MS);
        assert!(carousel.is_transitioning());
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.target(), Some(1));

        clock::advance(SETTLE_MS);
        assert!(!carousel.is_transitioning());
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(carousel.target(), None);
    }

    #[test]
    fn test_select_current_is_noop_without_timer_reset() {
        setup();

        let carousel = CarouselController::new(2).unwrap();
        carousel.start();

        // Halfway through the period, selecting the current index must not
        // reset the interval.
        clock::advance(AUTO_ADVANCE_MS / 2);
        carousel.select(0).unwrap();
        assert!(!carousel.is_transitioning());

        clock::advance(AUTO_ADVANCE_MS / 2);
        assert!(carousel.is_transitioning(), "interval was not reset");
    }

    #[test]
    fn test_select_other_commits_after_settle() {
        setup();

        let carousel = CarouselController::new(4).unwrap();
        carousel.select(2).unwrap();
        assert!(carousel.is_transitioning());
        assert_eq!(carousel.current_index(), 0);

        clock::advance(SETTLE_MS - 1);
        assert_eq!(carousel.current_index(), 0);

        clock::advance(1);
        assert_eq!(carousel.current_index(), 2);
        assert!(!carousel.is_transitioning());
    }

    #[test]
    fn test_select_during_transition_is_ignored() {
        setup();

        let carousel = CarouselController::new(4).unwrap();
        carousel.select(2).unwrap();
        assert_eq!(carousel.target(), Some(2));

        // Attempt mid-flight: state and target unchanged
        carousel.select(3).unwrap();
        assert_eq!(carousel.target(), Some(2));
        assert!(carousel.is_transitioning());

        clock::advance(SETTLE_MS);
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn test_out_of_range_rejected_without_mutation() {
        setup();

        let carousel = CarouselController::new(3).unwrap();
        let err = carousel.select(3).unwrap_err();
        assert_eq!(err, CarouselError::OutOfRange { index: 3, len: 3 });
        assert!(!carousel.is_transitioning());
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.target(), None);
    }

    #[test]
    fn test_commit_rearms_interval() {
        setup();

        let carousel = CarouselController::new(3).unwrap();
        carousel.start();

        // User selection commits at t = SETTLE_MS
        carousel.select(2).unwrap();
        clock::advance(SETTLE_MS);
        assert_eq!(carousel.current_index(), 2);

        // Old interval would have fired at t = AUTO_ADVANCE_MS; the re-armed
        // one fires at t = SETTLE_MS + AUTO_ADVANCE_MS.
        clock::advance(AUTO_ADVANCE_MS - SETTLE_MS);
        assert!(!carousel.is_transitioning());

        clock::advance(SETTLE_MS);
        assert!(carousel.is_transitioning());
        assert_eq!(carousel.target(), Some(0));
    }

    #[test]
    fn test_teardown_cancels_pending_settle() {
        setup();

        let mut carousel = CarouselController::new(2).unwrap();
        carousel.start();

        clock::advance(AUTO_ADVANCE_MS);
        assert!(carousel.is_transitioning());

        carousel.teardown();
        clock::advance(SETTLE_MS);
        // No late commit after teardown
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(clock::pending_count(), 0);

        // Idempotent
        carousel.teardown();
    }

    #[test]
    fn test_drop_cancels_timers() {
        setup();

        {
            let carousel = CarouselController::new(2).unwrap();
            carousel.start();
            clock::advance(AUTO_ADVANCE_MS);
            assert!(carousel.is_transitioning());
        }
        assert_eq!(clock::pending_count(), 0);
        clock::advance(SETTLE_MS); // nothing to fire, nothing to corrupt
    }

    #[test]
    fn test_select_after_teardown_is_noop() {
        setup();

        let mut carousel = CarouselController::new(3).unwrap();
        carousel.teardown();

        carousel.select(1).unwrap();
        assert!(!carousel.is_transitioning());
        assert_eq!(carousel.current_index(), 0);

        // Out-of-range is still reported as the caller bug it is
        assert!(carousel.select(7).is_err());
    }

    #[test]
    fn test_single_item_carousel() {
        setup();

        let carousel = CarouselController::new(1).unwrap();
        carousel.start();

        advance_one_cycle();
        assert_eq!(carousel.current_index(), 0);

        // Selecting the only index while idle is a no-op
        carousel.select(0).unwrap();
        assert!(!carousel.is_transitioning());
    }
}
