//! Core types shared across the crate.
//!
//! - [`Rect`] - Surface bounding rectangle in cell coordinates
//! - [`Rgba`] - 32-bit color used by the renderer
//! - [`Attr`] - Cell attribute bitflags
//! - [`Cell`] - The atomic unit of terminal rendering
//! - [`SectionKind`] / [`Route`] - Page structure identifiers

use std::fmt;

/// Cleanup function returned by subscriptions and component mounts.
///
/// Calling it releases the underlying resource. All cleanups in this crate
/// are safe to call after the resource is already gone.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Rect
// =============================================================================

/// A bounding rectangle in terminal cell coordinates.
///
/// Stored as `f64` because pointer normalization and intersection ratios
/// divide by width/height; layout results from taffy are fractional too.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect (half-open on the far edges).
    #[inline]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Area of the rect. Zero for degenerate rects.
    pub fn area(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Area of the overlap between two rects.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let left = self.x.max(other.x);
        let right = (self.x + self.width).min(other.x + other.width);
        let top = self.y.max(other.y);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            0.0
        } else {
            (right - left) * (bottom - top)
        }
    }
}

// =============================================================================
// Rgba
// =============================================================================

/// A 32-bit RGBA color.
///
/// Alpha is carried for blending decorative layers; the terminal output path
/// only distinguishes opaque colors from [`Rgba::TERMINAL_DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Sentinel for "let the terminal pick" (alpha 0, channels 1).
    pub const TERMINAL_DEFAULT: Self = Self { r: 1, g: 1, b: 1, a: 0 };

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an opaque gray.
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Check if this is the terminal-default sentinel.
    pub fn is_terminal_default(&self) -> bool {
        *self == Self::TERMINAL_DEFAULT
    }

    /// Linear blend toward another color. `t` in [0,1], clamped.
    pub fn blend(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A single terminal cell.
///
/// The sections compute these, the renderer outputs them. Nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode scalar (space when empty).
    pub ch: char,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Attribute flags (bold, dim, etc.).
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// Page structure
// =============================================================================

/// The sections of the home page, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Showcase,
    About,
    Contact,
    Footer,
}

impl SectionKind {
    /// Document order of the scrollable column (nav is a fixed overlay).
    pub const FLOW: [SectionKind; 5] = [
        SectionKind::Hero,
        SectionKind::Showcase,
        SectionKind::About,
        SectionKind::Contact,
        SectionKind::Footer,
    ];
}

/// Routes the app can display.
///
/// The site has a single real page; every nav target without a page of its
/// own resolves to [`Route::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    NotFound,
}

impl Route {
    /// Resolve a nav href to a route.
    pub fn from_href(href: &str) -> Self {
        match href {
            "/" => Route::Home,
            _ => Route::NotFound,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 5.0, 20.0, 10.0);
        assert!(r.contains(10.0, 5.0));
        assert!(r.contains(29.9, 14.9));
        assert!(!r.contains(30.0, 10.0));
        assert!(!r.contains(9.9, 10.0));
    }

    #[test]
    fn test_rect_intersection_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&b), 25.0);

        let c = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert_eq!(a.intersection_area(&c), 0.0);
    }

    #[test]
    fn test_rgba_blend() {
        let mid = Rgba::BLACK.blend(Rgba::WHITE, 0.5);
        assert_eq!(mid.r, 128);
        assert_eq!(Rgba::BLACK.blend(Rgba::WHITE, 0.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.blend(Rgba::WHITE, 1.0), Rgba::WHITE);
        // Out-of-range t clamps
        assert_eq!(Rgba::BLACK.blend(Rgba::WHITE, 2.0), Rgba::WHITE);
    }

    #[test]
    fn test_route_from_href() {
        assert_eq!(Route::from_href("/"), Route::Home);
        assert_eq!(Route::from_href("/portfolio"), Route::NotFound);
        assert_eq!(Route::from_href("/about"), Route::NotFound);
    }

    #[test]
    fn test_attr_flags() {
        let a = Attr::BOLD | Attr::DIM;
        assert!(a.contains(Attr::BOLD));
        assert!(!a.contains(Attr::ITALIC));
    }
}
