//! Host runtime - cooperative, single-threaded scheduling.
//!
//! Everything in this crate mutates state from discrete callback
//! invocations (pointer move, intersection change, timer fire, click)
//! dispatched by the event loop. The [`clock`] module owns the timed side
//! of that model: a virtual-time timer queue that the event loop advances
//! with real elapsed time and tests advance by hand.

pub mod clock;

pub use clock::{TimerHandle, advance, now, set_interval, set_timeout};
