//! Page sections - the views of the portfolio.
//!
//! Every section owns its surfaces and trackers exclusively: allocated on
//! mount, rects written by the layout pass, released on unmount regardless
//! of exit path. Rendering is a pure read of section state into the frame
//! buffer; all mutation happens in event callbacks.
//!
//! Coordinates: surface rects live in content (scrollable) space. Render
//! receives the section's rect already shifted into viewport space.

pub mod about;
pub mod contact;
pub mod footer;
pub mod hero;
pub mod nav;
pub mod not_found;
pub mod showcase;

pub use about::AboutSection;
pub use contact::{
    ContactMessage, ContactSection, ContactTransport, Field, LogTransport, SubmitError,
    SubmitStatus, TransportError,
};
pub use footer::FooterSection;
pub use hero::HeroSection;
pub use nav::NavBar;
pub use not_found::NotFoundView;
pub use showcase::ShowcaseSection;

use crate::interaction::PointerPosition;
use crate::render::TextStyle;
use crate::types::Attr;

/// Dim a style while its section is outside the viewport - the terminal
/// stand-in for the enter-animation's pre-reveal state.
pub(crate) fn reveal(visible: bool, style: TextStyle) -> TextStyle {
    if visible {
        style
    } else {
        style.with_attrs(style.attrs | Attr::DIM)
    }
}

/// Row offset applied to un-revealed content (translate-y before reveal).
pub(crate) fn reveal_offset(visible: bool) -> i32 {
    if visible { 0 } else { 1 }
}

/// Decorative parallax offset in cells: `p * scale - scale / 2`, rounded.
///
/// Mirrors the background-drift formulas of the original sections; the
/// input is a best-effort pointer sample and may sit outside [0,1].
pub(crate) fn parallax(p: f64, scale: f64) -> i32 {
    (p * scale - scale / 2.0).round() as i32
}

/// Both parallax axes at once.
pub(crate) fn parallax_xy(p: PointerPosition, scale: f64) -> (i32, i32) {
    (parallax(p.x, scale), parallax(p.y, scale))
}

/// Greedy word wrap to a column budget (char-counted; the copy is ASCII).
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// =============================================================================
// TESTS
// =============================================================================
