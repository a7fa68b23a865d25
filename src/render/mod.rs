//! Terminal renderer - frame buffer and diff output.
//!
//! Sections paint [`FrameBuffer`] cells; [`TermRenderer`] diffs consecutive
//! frames and writes only changed cells to the terminal inside a
//! synchronized update block.

pub mod buffer;
pub mod term;

pub use buffer::{FrameBuffer, TextStyle};
pub use term::TermRenderer;
