//! Fixed navigation bar.
//!
//! The nav overlays the top rows of the viewport and does not scroll with
//! the page. Past a small scroll offset it shrinks by one row and gains a
//! solid backdrop, mirroring the original shrink-on-scroll chrome. On
//! terminals too narrow for the inline links they collapse behind a menu
//! toggle that drops them down as a list. Link clicks resolve hrefs to
//! routes and hand them to the app's navigate callback.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::content::{self, NAV_LINKS};
use crate::layout::NAV_ROWS;
use crate::render::{FrameBuffer, TextStyle};
use crate::surface;
use crate::types::{Attr, Cleanup, Rect, Rgba, Route};
use crate::viewport;

/// Scroll offset past which the bar shrinks, in rows.
pub const SCROLL_SHRINK_THRESHOLD: f64 = 5.0;

/// Below this width the inline links collapse behind the menu toggle.
pub const MENU_COLLAPSE_WIDTH: f64 = 56.0;

struct NavGeometry {
    surface: usize,
    brand: usize,
    toggle: usize,
    links: Vec<usize>,
    width: Cell<f64>,
}

impl NavGeometry {
    /// Place the bar and its link surfaces at the current scroll offset.
    ///
    /// The surfaces live in content coordinates like everything else, so
    /// keeping the overlay "fixed" means re-pinning it on every scroll.
    /// Collapsed-and-closed links get a zero-width rect, which no hit
    /// test can match.
    fn place(&self, scroll: f64, shrunk: bool, menu_open: bool) {
        let width = self.width.get();
        let collapsed = width < MENU_COLLAPSE_WIDTH;
        let bar_rows = if shrunk { NAV_ROWS - 1.0 } else { NAV_ROWS };
        let rows = if collapsed && menu_open {
            bar_rows + NAV_LINKS.len() as f64
        } else {
            bar_rows
        };
        surface::set_rect(self.surface, Rect::new(0.0, scroll, width, rows));

        let label_row = if shrunk { scroll } else { scroll + 1.0 };
        surface::set_rect(
            self.brand,
            Rect::new(
                2.0,
                label_row,
                content::ARTIST_NAME.chars().count() as f64,
                1.0,
            ),
        );

        if collapsed {
            surface::set_rect(self.toggle, Rect::new(width - 5.0, label_row, 3.0, 1.0));
            for (i, (surface, link)) in self.links.iter().zip(NAV_LINKS.iter()).enumerate() {
                let rect = if menu_open {
                    let len = link.label.chars().count() as f64;
                    Rect::new(width - 2.0 - len, label_row + 1.0 + i as f64, len, 1.0)
                } else {
                    Rect::new(0.0, 0.0, 0.0, 0.0)
                };
                surface::set_rect(*surface, rect);
            }
        } else {
            surface::set_rect(self.toggle, Rect::new(0.0, 0.0, 0.0, 0.0));
            // Links right-aligned, three cells of padding between them
            let mut x = width - 2.0;
            for (surface, link) in self.links.iter().zip(NAV_LINKS.iter()).rev() {
                let len = link.label.chars().count() as f64;
                x -= len;
                surface::set_rect(*surface, Rect::new(x, label_row, len, 1.0));
                x -= 3.0;
            }
        }
    }
}

/// The fixed nav bar.
pub struct NavBar {
    geo: Rc<NavGeometry>,
    scrolled: Signal<bool>,
    menu_open: Signal<bool>,
    scroll_sub: Option<Cleanup>,
    click_subs: Vec<Cleanup>,
}

impl NavBar {
    /// Mount the bar and subscribe to scroll changes.
    pub fn mount(on_navigate: impl Fn(Route) + 'static) -> Self {
        let geo = Rc::new(NavGeometry {
            surface: surface::allocate(),
            brand: surface::allocate(),
            toggle: surface::allocate(),
            links: NAV_LINKS.iter().map(|_| surface::allocate()).collect(),
            width: Cell::new(viewport::size().0),
        });

        let scrolled = signal(viewport::scroll_y() > SCROLL_SHRINK_THRESHOLD);
        let menu_open = signal(false);

        let navigate: Rc<dyn Fn(Route)> = Rc::new(on_navigate);
        let mut click_subs = Vec::with_capacity(NAV_LINKS.len() + 2);
        for (surface, link) in geo.links.iter().zip(NAV_LINKS.iter()) {
            let navigate = navigate.clone();
            let href = link.href;
            let geo = geo.clone();
            let open = menu_open.clone();
            let shrunk_flag = scrolled.clone();
            click_subs.push(surface::on_click(*surface, move |_, _| {
                // Picking a link closes the dropdown
                if open.get() {
                    open.set(false);
                    geo.place(viewport::scroll_y(), shrunk_flag.get(), false);
                }
                navigate(Route::from_href(href));
                true
            }));
        }
        let brand_navigate = navigate.clone();
        click_subs.push(surface::on_click(geo.brand, move |_, _| {
            brand_navigate(Route::Home);
            true
        }));

        let toggle_geo = geo.clone();
        let toggle_open = menu_open.clone();
        let toggle_shrunk = scrolled.clone();
        click_subs.push(surface::on_click(geo.toggle, move |_, _| {
            let open = !toggle_open.get();
            toggle_open.set(open);
            toggle_geo.place(viewport::scroll_y(), toggle_shrunk.get(), open);
            true
        }));

        let scroll_geo = geo.clone();
        let scroll_flag = scrolled.clone();
        let scroll_open = menu_open.clone();
        let scroll_sub = viewport::on_scroll(move |y| {
            let shrunk = y > SCROLL_SHRINK_THRESHOLD;
            scroll_flag.set(shrunk);
            scroll_geo.place(y, shrunk, scroll_open.get());
        });

        geo.place(viewport::scroll_y(), scrolled.get(), false);

        Self {
            geo,
            scrolled,
            menu_open,
            scroll_sub: Some(scroll_sub),
            click_subs,
        }
    }

    /// Re-pin the bar after a layout pass or resize.
    pub fn set_width(&self, width: f64) {
        self.geo.width.set(width);
        self.geo
            .place(viewport::scroll_y(), self.scrolled.get(), self.menu_open.get());
    }

    /// Whether the collapsed-menu dropdown is open.
    pub fn is_menu_open(&self) -> bool {
        self.menu_open.get()
    }

    /// Shrink flag, true once the page is scrolled past the threshold.
    pub fn is_scrolled(&self) -> bool {
        self.scrolled.get()
    }

    /// Reactive shrink signal.
    pub fn scrolled_signal(&self) -> Signal<bool> {
        self.scrolled.clone()
    }

    /// Paint the bar across the top rows of the frame.
    pub fn render(&self, fb: &mut FrameBuffer) {
        let width = fb.width() as i32;
        let shrunk = self.scrolled.get();
        let collapsed = (width as f64) < MENU_COLLAPSE_WIDTH;
        let open = collapsed && self.menu_open.get();
        let bar_rows = (if shrunk { NAV_ROWS - 1.0 } else { NAV_ROWS }) as i32;
        let rows = if open {
            bar_rows + NAV_LINKS.len() as i32
        } else {
            bar_rows
        };

        if shrunk || open {
            // Solid backdrop once content scrolls underneath, or while the
            // dropdown covers it
            fb.fill_rect(0, 0, width, rows, Rgba::gray(16));
        }

        let label_row = if shrunk { 0 } else { 1 };
        let brand = TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD);
        fb.draw_text(2, label_row, content::ARTIST_NAME, brand);

        let link_style = TextStyle::fg(Rgba::gray(200));
        if collapsed {
            let glyph = if open { "[x]" } else { "[=]" };
            fb.draw_text(width - 5, label_row, glyph, link_style);
            if open {
                for (i, link) in NAV_LINKS.iter().enumerate() {
                    let len = link.label.chars().count() as i32;
                    fb.draw_text(width - 2 - len, label_row + 1 + i as i32, link.label, link_style);
                }
            }
        } else {
            let mut x = width - 2;
            for link in NAV_LINKS.iter().rev() {
                let len = link.label.chars().count() as i32;
                x -= len;
                fb.draw_text(x, label_row, link.label, link_style);
                x -= 3;
            }
        }

        if shrunk || open {
            fb.draw_hline(0, rows - 1, width, TextStyle::fg(Rgba::gray(60)));
        }
    }

    /// Release surfaces and subscriptions. Idempotent.
    pub fn unmount(&mut self) {
        for cleanup in self.click_subs.drain(..) {
            cleanup();
        }
        if let Some(cleanup) = self.scroll_sub.take() {
            cleanup();
        }
        surface::release(self.geo.brand);
        surface::release(self.geo.toggle);
        for link in &self.geo.links {
            surface::release(*link);
        }
        surface::release(self.geo.surface);
    }
}

impl Drop for NavBar {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================
