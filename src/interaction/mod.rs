//! Interaction primitives - the reusable contract every section shares.
//!
//! Three small pieces of per-view state, each owned exclusively by the view
//! instance that mounts it and released when that view is torn down:
//!
//! - [`PresenceTracker`] - boolean "is my container in the viewport" flag
//! - [`PointerTracker`] - normalized pointer position for parallax offsets
//! - [`CarouselController`] - timed index advance with a transition-lock
//!
//! None of these have externally observable failure modes; absent containers
//! are no-ops and duplicate teardown is always safe.

pub mod carousel;
pub mod pointer;
pub mod presence;

pub use carousel::{AUTO_ADVANCE_MS, CarouselController, CarouselError, SETTLE_MS};
pub use pointer::{PointerPosition, PointerTracker};
pub use presence::PresenceTracker;
