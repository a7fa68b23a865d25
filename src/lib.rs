//! # atelier-tui
//!
//! A single-artist portfolio as a reactive terminal app.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity: sections read signals while painting, and the
//! one render effect repaints whenever any of them changes.
//!
//! ## Architecture
//!
//! The page is a scrollable column of sections over a registry of surfaces
//! (index-allocated bounding rects). Interaction state is tracked per
//! surface - viewport presence, normalized pointer position, and the hero
//! carousel's transition lock - and timing runs on a virtual clock the
//! event loop advances, so every timed behavior is deterministic in tests.
//!
//! ```text
//! input events → surfaces/viewport → signals → render effect → terminal
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rect, Rgba, Cell, Route)
//! - [`runtime`] - Virtual clock and timers
//! - [`surface`] - Surface registry and pointer dispatch
//! - [`viewport`] - Scroll state and intersection observations
//! - [`interaction`] - Presence, pointer, and carousel trackers
//! - [`layout`] - Taffy column layout for the section stack
//! - [`render`] - Frame buffer and diff renderer
//! - [`sections`] - The page sections and the 404 view
//! - [`app`] - Routing, render effect, event loop

pub mod app;
pub mod content;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod sections;
pub mod surface;
pub mod types;
pub mod viewport;

// Re-export commonly used items
pub use types::*;

pub use app::{AppError, MountHandle, mount, run, tick};

pub use interaction::{
    AUTO_ADVANCE_MS, CarouselController, CarouselError, PointerPosition, PointerTracker,
    PresenceTracker, SETTLE_MS,
};

pub use layout::{LayoutError, NAV_ROWS, PageLayout, compute_page_layout, showcase_columns};

pub use render::{FrameBuffer, TermRenderer, TextStyle};

pub use runtime::{TimerHandle, advance, now, set_interval, set_timeout};

pub use sections::{
    ContactMessage, ContactTransport, LogTransport, SubmitError, SubmitStatus, TransportError,
};

pub use viewport::{PRESENCE_THRESHOLD, WHEEL_SCROLL};
