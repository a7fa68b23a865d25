//! Virtual clock - timer queue for the cooperative event loop.
//!
//! Timers never fire from a background thread. The event loop calls
//! [`advance`] with real elapsed milliseconds; tests call it with simulated
//! time. Due timers run in fire-time order, one at a time, outside the
//! registry borrow, so a callback may freely schedule or cancel timers.
//!
//! A cancelled timer never fires, including timers already due inside the
//! current `advance` batch. This is what makes teardown safe: cancelling a
//! pending settle timeout guarantees no late commit.
//!
//! # Example
//!
//! ```ignore
//! use atelier_tui::runtime::clock;
//!
//! let handle = clock::set_timeout(500, || println!("settled"));
//! clock::advance(499); // nothing
//! clock::advance(1);   // fires
//! handle.cancel();     // idempotent no-op by now
//! ```

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// TIMER REGISTRY
// =============================================================================

enum TimerKind {
    Once(Option<Box<dyn FnOnce()>>),
    Repeating(Rc<dyn Fn()>),
}

struct Timer {
    id: u64,
    fire_at: u64,
    period: Option<u64>,
    kind: TimerKind,
}

struct ClockState {
    now: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl ClockState {
    fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Remove and return the earliest timer due at or before `deadline`.
    /// Ties break by insertion order (lower id first).
    fn take_due(&mut self, deadline: u64) -> Option<Timer> {
        let mut best: Option<usize> = None;
        for (i, timer) in self.timers.iter().enumerate() {
            if timer.fire_at > deadline {
                continue;
            }
            match best {
                None => best = Some(i),
                Some(j) => {
                    let b = &self.timers[j];
                    if (timer.fire_at, timer.id) < (b.fire_at, b.id) {
                        best = Some(i);
                    }
                }
            }
        }
        best.map(|i| self.timers.remove(i))
    }
}

thread_local! {
    static CLOCK: RefCell<ClockState> = RefCell::new(ClockState::new());
}

// =============================================================================
// TIMER HANDLE
// =============================================================================

/// Handle for a scheduled timer.
///
/// [`cancel`](TimerHandle::cancel) removes the timer from the queue.
/// Cancelling an already-fired or already-cancelled timer is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: u64,
}

impl TimerHandle {
    /// Cancel the timer. Idempotent.
    pub fn cancel(&self) {
        let id = self.id;
        CLOCK.with(|clock| {
            clock.borrow_mut().timers.retain(|t| t.id != id);
        });
    }

    /// Check whether the timer is still scheduled.
    pub fn is_pending(&self) -> bool {
        let id = self.id;
        CLOCK.with(|clock| clock.borrow().timers.iter().any(|t| t.id == id))
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Current virtual time in milliseconds.
pub fn now() -> u64 {
    CLOCK.with(|clock| clock.borrow().now)
}

/// Schedule a one-shot callback after `delay_ms`.
pub fn set_timeout(delay_ms: u64, f: impl FnOnce() + 'static) -> TimerHandle {
    CLOCK.with(|clock| {
        let mut clock = clock.borrow_mut();
        let id = clock.next_id();
        let fire_at = clock.now + delay_ms;
        clock.timers.push(Timer {
            id,
            fire_at,
            period: None,
            kind: TimerKind::Once(Some(Box::new(f))),
        });
        TimerHandle { id }
    })
}

/// Schedule a repeating callback every `period_ms`.
///
/// The first fire happens one full period after scheduling. Re-scheduling
/// is drift-free: each fire is anchored to the previous fire time, not to
/// when the callback finished.
pub fn set_interval(period_ms: u64, f: impl Fn() + 'static) -> TimerHandle {
    let period_ms = period_ms.max(1);
    CLOCK.with(|clock| {
        let mut clock = clock.borrow_mut();
        let id = clock.next_id();
        let fire_at = clock.now + period_ms;
        clock.timers.push(Timer {
            id,
            fire_at,
            period: Some(period_ms),
            kind: TimerKind::Repeating(Rc::new(f)),
        });
        TimerHandle { id }
    })
}

/// Advance virtual time by `ms`, firing every timer that comes due.
///
/// Callbacks run outside the registry borrow. A repeating timer that comes
/// due several times within one `advance` fires once per elapsed period.
pub fn advance(ms: u64) {
    let deadline = CLOCK.with(|clock| {
        let mut clock = clock.borrow_mut();
        clock.now += ms;
        clock.now
    });

    loop {
        let due = CLOCK.with(|clock| clock.borrow_mut().take_due(deadline));
        let Some(mut timer) = due else { break };

        match &mut timer.kind {
            TimerKind::Once(f) => {
                if let Some(f) = f.take() {
                    f();
                }
            }
            TimerKind::Repeating(f) => {
                let f = f.clone();
                // Re-arm before running so the callback can cancel itself.
                let fire_at = timer.fire_at + timer.period.unwrap_or(1);
                CLOCK.with(|clock| {
                    clock.borrow_mut().timers.push(Timer { fire_at, ..timer });
                });
                f();
            }
        }
    }
}

/// Number of scheduled timers.
pub fn pending_count() -> usize {
    CLOCK.with(|clock| clock.borrow().timers.len())
}

/// Reset the clock to time zero with no timers (for testing).
pub fn reset() {
    CLOCK.with(|clock| {
        *clock.borrow_mut() = ClockState::new();
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn setup() {
        reset();
    }

    #[test]
    fn test_timeout_fires_once() {
        setup();

        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        set_timeout(500, move || fired_clone.set(fired_clone.get() + 1));

        advance(499);
        assert_eq!(fired.get(), 0);

        advance(1);
        assert_eq!(fired.get(), 1);

        advance(1000);
        assert_eq!(fired.get(), 1);
        assert_eq!(pending_count(), 0);
    }

    #[test]
    fn test_cancel_before_fire() {
        setup();

        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        let handle = set_timeout(100, move || fired_clone.set(true));

        assert!(handle.is_pending());
        handle.cancel();
        assert!(!handle.is_pending());

        advance(200);
        assert!(!fired.get());

        // Double cancel is safe
        handle.cancel();
    }

    #[test]
    fn test_interval_repeats() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let handle = set_interval(100, move || count_clone.set(count_clone.get() + 1));

        advance(100);
        assert_eq!(count.get(), 1);

        // Several periods in one advance fire once per period
        advance(300);
        assert_eq!(count.get(), 4);

        handle.cancel();
        advance(500);
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn test_fire_order_is_deadline_order() {
        setup();

        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = order.clone();
        let o2 = order.clone();
        let o3 = order.clone();
        set_timeout(300, move || o1.borrow_mut().push("late"));
        set_timeout(100, move || o2.borrow_mut().push("early"));
        set_timeout(200, move || o3.borrow_mut().push("mid"));

        advance(300);
        assert_eq!(*order.borrow(), vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_callback_can_schedule() {
        setup();

        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        set_timeout(100, move || {
            let inner = fired_clone.clone();
            set_timeout(50, move || inner.set(true));
        });

        advance(100);
        assert!(!fired.get());
        advance(50);
        assert!(fired.get());
    }

    #[test]
    fn test_callback_can_cancel_due_timer() {
        setup();

        // Both timers due in the same batch; the first cancels the second.
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        let victim = set_timeout(100, move || fired_clone.set(true));
        set_timeout(50, move || victim.cancel());

        advance(100);
        assert!(!fired.get());
    }

    #[test]
    fn test_interval_can_cancel_itself() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let handle: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));
        let handle_clone = handle.clone();
        let h = set_interval(100, move || {
            count_clone.set(count_clone.get() + 1);
            if count_clone.get() == 2 {
                if let Some(h) = handle_clone.borrow_mut().take() {
                    h.cancel();
                }
            }
        });
        *handle.borrow_mut() = Some(h);

        advance(1000);
        assert_eq!(count.get(), 2);
    }
}
