//! Surface registry - container handles for sections and widgets.
//!
//! A surface is an index into a thread-local slot array, owning nothing but
//! a bounding [`Rect`]. Sections allocate surfaces on mount, the layout pass
//! writes their rects, and the event loop dispatches pointer events against
//! them. Subscriptions are scoped to a surface and removed by the returned
//! cleanup closure.
//!
//! # API
//!
//! - `allocate` / `release` - Slot lifecycle (duplicate release is a no-op)
//! - `set_rect` / `rect` - Bounding rectangle
//! - `on_pointer_move(index, cb)` - Pointer-move subscription
//! - `on_click(index, cb)` - Click subscription (consuming, newest-first)
//! - `dispatch_pointer_move` / `dispatch_click` - Called by the event loop

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::{Cleanup, Rect};

// =============================================================================
// REGISTRY
// =============================================================================

/// Pointer-move callback. Receives absolute cell coordinates.
type PointerMoveHandler = Rc<dyn Fn(f64, f64)>;

/// Click callback. Return true to consume the event.
type ClickHandler = Rc<dyn Fn(f64, f64) -> bool>;

struct SurfaceRegistry {
    /// Rect per slot; `None` marks a freed slot.
    slots: Vec<Option<Rect>>,
    free: Vec<usize>,
    move_subs: Vec<(u64, usize, PointerMoveHandler)>,
    click_subs: Vec<(u64, usize, ClickHandler)>,
    next_sub_id: u64,
}

impl SurfaceRegistry {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            move_subs: Vec::new(),
            click_subs: Vec::new(),
            next_sub_id: 0,
        }
    }

    fn next_sub_id(&mut self) -> u64 {
        let id = self.next_sub_id;
        self.next_sub_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<SurfaceRegistry> = RefCell::new(SurfaceRegistry::new());
}

// =============================================================================
// SLOT LIFECYCLE
// =============================================================================

/// Allocate a surface with a zero rect. Freed slots are reused.
pub fn allocate() -> usize {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        if let Some(index) = reg.free.pop() {
            reg.slots[index] = Some(Rect::default());
            index
        } else {
            reg.slots.push(Some(Rect::default()));
            reg.slots.len() - 1
        }
    })
}

/// Release a surface and drop its subscriptions.
///
/// Releasing an unknown or already-released index is a no-op.
pub fn release(index: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let reg = &mut *reg;
        if let Some(slot @ Some(_)) = reg.slots.get_mut(index) {
            *slot = None;
            reg.free.push(index);
            reg.move_subs.retain(|(_, s, _)| *s != index);
            reg.click_subs.retain(|(_, s, _)| *s != index);
        }
    });
}

/// Check whether a surface is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    REGISTRY.with(|reg| matches!(reg.borrow().slots.get(index), Some(Some(_))))
}

/// Set the bounding rect of a surface. No-op for released slots.
pub fn set_rect(index: usize, rect: Rect) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        if let Some(slot @ Some(_)) = reg.slots.get_mut(index) {
            *slot = Some(rect);
        }
    });
}

/// Get the bounding rect of a surface.
pub fn rect(index: usize) -> Option<Rect> {
    REGISTRY.with(|reg| reg.borrow().slots.get(index).copied().flatten())
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Subscribe to pointer-move events inside a surface. Returns cleanup.
pub fn on_pointer_move(index: usize, cb: impl Fn(f64, f64) + 'static) -> Cleanup {
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_sub_id();
        reg.move_subs.push((id, index, Rc::new(cb)));
        id
    });
    Box::new(move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().move_subs.retain(|(i, _, _)| *i != id);
        });
    })
}

/// Subscribe to clicks inside a surface. Return true from the callback to
/// consume the click. Returns cleanup.
pub fn on_click(index: usize, cb: impl Fn(f64, f64) -> bool + 'static) -> Cleanup {
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_sub_id();
        reg.click_subs.push((id, index, Rc::new(cb)));
        id
    });
    Box::new(move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().click_subs.retain(|(i, _, _)| *i != id);
        });
    })
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Deliver a pointer-move to every subscription whose surface contains the
/// point. Handlers run outside the registry borrow.
pub fn dispatch_pointer_move(x: f64, y: f64) {
    let handlers: Vec<PointerMoveHandler> = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        reg.move_subs
            .iter()
            .filter(|(_, index, _)| {
                reg.slots
                    .get(*index)
                    .copied()
                    .flatten()
                    .is_some_and(|r| r.contains(x, y))
            })
            .map(|(_, _, cb)| cb.clone())
            .collect()
    });
    for handler in handlers {
        handler(x, y);
    }
}

/// Deliver a click to subscriptions whose surface contains the point,
/// newest-first (later registrations sit on top), stopping at the first
/// consumer. Returns true if any handler consumed the click.
pub fn dispatch_click(x: f64, y: f64) -> bool {
    let handlers: Vec<ClickHandler> = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        reg.click_subs
            .iter()
            .rev()
            .filter(|(_, index, _)| {
                reg.slots
                    .get(*index)
                    .copied()
                    .flatten()
                    .is_some_and(|r| r.contains(x, y))
            })
            .map(|(_, _, cb)| cb.clone())
            .collect()
    });
    for handler in handlers {
        if handler(x, y) {
            return true;
        }
    }
    false
}

/// Reset the registry (for testing).
pub fn reset() {
    REGISTRY.with(|reg| {
        *reg.borrow_mut() = SurfaceRegistry::new();
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
    fn test_allocate_release_reuse() {
        setup();

        let a = allocate();
        let b = allocate();
        assert_ne!(a, b);
        assert!(is_allocated(a));

        release(a);
        assert!(!is_allocated(a));

        // Freed slot is reused
        let c = allocate();
        assert_eq!(c, a);
    }

    #[test]
    fn test_duplicate_release_is_noop() {
        setup();

        let a = allocate();
        release(a);
        release(a);
        release(9999);
        assert!(!is_allocated(a));
    }

    #[test]
    fn test_rect_roundtrip() {
        setup();

        let a = allocate();
        assert_eq!(rect(a), Some(Rect::default()));

        set_rect(a, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect(a), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));

        release(a);
        assert_eq!(rect(a), None);
        // Writes to released slots are dropped
        set_rect(a, Rect::new(9.0, 9.0, 9.0, 9.0));
        assert_eq!(rect(a), None);
    }

    #[test]
    fn test_pointer_move_scoped_to_rect() {
        setup();

        let a = allocate();
        set_rect(a, Rect::new(0.0, 0.0, 10.0, 10.0));

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let cleanup = on_pointer_move(a, move |_, _| hits_clone.set(hits_clone.get() + 1));

        dispatch_pointer_move(5.0, 5.0);
        assert_eq!(hits.get(), 1);

        // Outside the rect: not delivered
        dispatch_pointer_move(15.0, 5.0);
        assert_eq!(hits.get(), 1);

        cleanup();
        dispatch_pointer_move(5.0, 5.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_release_drops_subscriptions() {
        setup();

        let a = allocate();
        set_rect(a, Rect::new(0.0, 0.0, 10.0, 10.0));

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let cleanup = on_pointer_move(a, move |_, _| hits_clone.set(hits_clone.get() + 1));

        release(a);
        dispatch_pointer_move(5.0, 5.0);
        assert_eq!(hits.get(), 0);

        // Cleanup after release is still safe
        cleanup();
    }

    #[test]
    fn test_click_newest_first_and_consume() {
        setup();

        let below = allocate();
        let above = allocate();
        set_rect(below, Rect::new(0.0, 0.0, 20.0, 20.0));
        set_rect(above, Rect::new(5.0, 5.0, 5.0, 5.0));

        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = order.clone();
        let o2 = order.clone();
        let _c1 = on_click(below, move |_, _| {
            o1.borrow_mut().push("below");
            false
        });
        let _c2 = on_click(above, move |_, _| {
            o2.borrow_mut().push("above");
            true
        });

        // Inside both: the later registration wins and consumes
        assert!(dispatch_click(6.0, 6.0));
        assert_eq!(*order.borrow(), vec!["above"]);

        // Only inside the lower surface
        order.borrow_mut().clear();
        assert!(!dispatch_click(1.0, 1.0));
        assert_eq!(*order.borrow(), vec!["below"]);
    }
}
