//! Application shell - routing, render effect, and event loop.
//!
//! [`mount`] sets up one render effect that reads section state into a
//! frame buffer and diffs it to the terminal. Every signal a render
//! touches becomes a dependency, so a carousel commit, a presence flip, or
//! a keystroke in the contact form repaints on its own.
//!
//! Navigation is deliberately not an effect. Click handlers only write the
//! route signal; [`tick`] notices the change and swaps views from the top
//! of the loop, where no subscription closure is on the stack and no
//! render is tracking. Swapping inside a handler would drop the very
//! closure that is executing.
//!
//! The event loop is cooperative: [`tick`] polls the terminal, advances the
//! virtual clock by real elapsed time, and routes input. Mouse coordinates
//! arrive in viewport space and are shifted by the scroll offset before
//! dispatch, since surfaces live in content space.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind, poll, read,
};
use spark_signals::{Signal, effect, signal};
use thiserror::Error;

use crate::interaction::CarouselError;
use crate::layout::{self, LayoutError, NAV_ROWS, PageLayout};
use crate::render::{FrameBuffer, TermRenderer};
use crate::runtime::clock;
use crate::sections::{
    AboutSection, ContactSection, ContactTransport, FooterSection, HeroSection, NavBar,
    NotFoundView, ShowcaseSection,
};
use crate::surface;
use crate::types::{Route, SectionKind};
use crate::viewport;

/// Poll timeout per tick (~60fps).
const TICK_POLL: Duration = Duration::from_millis(16);

/// Mount failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Carousel(#[from] CarouselError),
}

// =============================================================================
// HOME PAGE
// =============================================================================

/// The home page: nav overlay plus the five-section scroll column.
struct HomePage {
    nav: NavBar,
    hero: HeroSection,
    showcase: ShowcaseSection,
    about: AboutSection,
    contact: ContactSection,
    footer: FooterSection,
    layout: PageLayout,
}

impl HomePage {
    fn mount(route: Signal<Route>, transport: Rc<dyn ContactTransport>) -> Result<Self, AppError> {
        let nav_route = route.clone();
        let nav = NavBar::mount(move |r| {
            nav_route.set(r);
        });

        // Showcase before hero: the explore button scrolls to it
        let card_route = route.clone();
        let showcase = ShowcaseSection::mount(move |index| {
            // Individual piece pages do not exist
            tracing::debug!(index, "artwork detail requested");
            card_route.set(Route::NotFound);
        });

        let showcase_surface = showcase.surface();
        let hero = HeroSection::mount(move || {
            viewport::scroll_into_view(showcase_surface, NAV_ROWS);
        })?;

        let about = AboutSection::mount();
        let contact = ContactSection::mount(transport);
        let footer = FooterSection::mount();

        let (width, height) = viewport::size();
        let mut page = Self {
            nav,
            hero,
            showcase,
            about,
            contact,
            footer,
            layout: layout::compute_page_layout(width, height)?,
        };
        page.apply_layout()?;
        Ok(page)
    }

    /// Recompute geometry and push rects into the surface registry.
    fn apply_layout(&mut self) -> Result<(), AppError> {
        let (width, height) = viewport::size();
        self.layout = layout::compute_page_layout(width, height)?;

        for (kind, rect) in &self.layout.sections {
            match kind {
                SectionKind::Hero => self.hero.set_rect(*rect),
                SectionKind::Showcase => self.showcase.set_rect(*rect),
                SectionKind::About => self.about.set_rect(*rect),
                SectionKind::Contact => self.contact.set_rect(*rect),
                SectionKind::Footer => self.footer.set_rect(*rect),
            }
        }
        self.nav.set_width(width);
        // Re-clamps the scroll offset and re-evaluates presence
        viewport::set_content_height(self.layout.content_height);
        Ok(())
    }

    fn render(&self, fb: &mut FrameBuffer) {
        let scroll = viewport::scroll_y();
        let height = fb.height() as f64;

        for (kind, rect) in &self.layout.sections {
            let view = crate::types::Rect::new(rect.x, rect.y - scroll, rect.width, rect.height);
            if view.y + view.height <= 0.0 || view.y >= height {
                continue;
            }
            match kind {
                SectionKind::Hero => self.hero.render(fb, view),
                SectionKind::Showcase => self.showcase.render(fb, view, scroll),
                SectionKind::About => self.about.render(fb, view),
                SectionKind::Contact => self.contact.render(fb, view, scroll),
                SectionKind::Footer => self.footer.render(fb, view),
            }
        }

        // Fixed overlay paints last
        self.nav.render(fb);
    }
}

enum View {
    Home(Box<HomePage>),
    NotFound(NotFoundView),
}

type SharedView = Rc<RefCell<Option<View>>>;

// =============================================================================
// MOUNT
// =============================================================================

/// Handle returned by [`mount`]; unmount through it to restore the terminal.
pub struct MountHandle {
    view: SharedView,
    route: Signal<Route>,
    mounted_route: Cell<Option<Route>>,
    frame: Signal<u64>,
    running: Arc<AtomicBool>,
    renderer: Rc<RefCell<TermRenderer>>,
    transport: Rc<dyn ContactTransport>,
    last_tick: Cell<Instant>,
    stop_render: Option<Box<dyn FnOnce()>>,
}

impl MountHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request a graceful stop; the event loop exits on its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Tear the app down and restore the terminal.
    pub fn unmount(mut self) {
        self.running.store(false, Ordering::SeqCst);

        // Dropping the view unmounts sections: timers cancelled, surfaces
        // released, subscriptions dropped.
        self.view.borrow_mut().take();

        if let Some(stop) = self.stop_render.take() {
            stop();
        }

        if let Err(err) = self.renderer.borrow_mut().exit_fullscreen() {
            tracing::warn!(error = %err, "terminal restore failed");
        }
        tracing::info!("unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_render.take() {
            stop();
        }
    }
}

/// Mount the portfolio app on the current terminal.
pub fn mount(transport: Rc<dyn ContactTransport>) -> Result<MountHandle, AppError> {
    let (cols, rows) = crossterm::terminal::size()?;
    viewport::set_size(cols as f64, rows as f64);

    let renderer = Rc::new(RefCell::new(TermRenderer::new()));
    renderer.borrow_mut().enter_fullscreen()?;

    let route = signal(Route::Home);
    let frame = signal(0u64);
    let view: SharedView = Rc::new(RefCell::new(None));
    let running = Arc::new(AtomicBool::new(true));

    // Render effect: every signal read below (directly or inside a section
    // render) registers as a dependency.
    let render_view = view.clone();
    let render_frame = frame.clone();
    let render_running = running.clone();
    let render_renderer = renderer.clone();
    let stop_render: Box<dyn FnOnce()> = Box::new(effect(move || {
        if !render_running.load(Ordering::SeqCst) {
            return;
        }
        render_frame.get();
        let (width, height) = viewport::size();
        let mut fb = FrameBuffer::new(width as u16, height as u16);

        // A mid-swap run sees no view and paints the empty frame; the
        // frame bump after the swap repaints.
        if let Ok(current) = render_view.try_borrow() {
            match &*current {
                Some(View::Home(page)) => page.render(&mut fb),
                Some(View::NotFound(not_found)) => not_found.render(&mut fb),
                None => {}
            }
        }

        if let Ok(mut renderer) = render_renderer.try_borrow_mut() {
            if let Err(err) = renderer.render(&fb) {
                tracing::warn!(error = %err, "frame output failed");
            }
        }
    }));

    let handle = MountHandle {
        view,
        route,
        mounted_route: Cell::new(None),
        frame,
        running,
        renderer,
        transport,
        last_tick: Cell::new(Instant::now()),
        stop_render: Some(stop_render),
    };
    sync_route(&handle);

    tracing::info!(cols, rows, "mounted");
    Ok(handle)
}

/// Swap views when the route signal has moved past the mounted view.
///
/// The old view is dropped and the new one mounted outside any borrow, so
/// signal writes during mount (presence flips, layout) can run the render
/// effect safely mid-swap.
fn sync_route(handle: &MountHandle) {
    let target = handle.route.get();
    if handle.mounted_route.get() == Some(target) {
        return;
    }

    let old = handle.view.borrow_mut().take();
    drop(old);
    viewport::set_scroll(0.0);

    let next = match target {
        Route::Home => match HomePage::mount(handle.route.clone(), handle.transport.clone()) {
            Ok(page) => Some(View::Home(Box::new(page))),
            Err(err) => {
                tracing::error!(error = %err, "home mount failed");
                None
            }
        },
        Route::NotFound => {
            let home_route = handle.route.clone();
            let not_found = NotFoundView::mount(move || {
                home_route.set(Route::Home);
            });
            let (w, h) = viewport::size();
            not_found.set_rect(w, h);
            Some(View::NotFound(not_found))
        }
    };

    *handle.view.borrow_mut() = next;
    handle.mounted_route.set(Some(target));
    handle.frame.set(handle.frame.get().wrapping_add(1));
    tracing::info!(route = ?target, "route mounted");
}

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Process one tick: advance timers, poll and route one input event.
///
/// Returns `Ok(false)` once the app should stop.
pub fn tick(handle: &MountHandle) -> io::Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    sync_route(handle);

    let elapsed = handle.last_tick.get().elapsed().as_millis() as u64;
    if elapsed > 0 {
        handle.last_tick.set(Instant::now());
        clock::advance(elapsed);
    }

    if poll(TICK_POLL)? {
        route_event(handle, read()?);
    }

    Ok(handle.is_running())
}

/// Run the blocking event loop until stop.
pub fn run(handle: &MountHandle) -> io::Result<()> {
    while tick(handle)? {}
    Ok(())
}

fn route_event(handle: &MountHandle, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => route_key(handle, key.code, key.modifiers),
        Event::Mouse(mouse) => route_mouse(mouse),
        Event::Resize(cols, rows) => {
            viewport::set_size(cols as f64, rows as f64);
            {
                let mut view = handle.view.borrow_mut();
                match &mut *view {
                    Some(View::Home(page)) => {
                        if let Err(err) = page.apply_layout() {
                            tracing::error!(error = %err, "relayout failed");
                        }
                    }
                    Some(View::NotFound(not_found)) => {
                        not_found.set_rect(cols as f64, rows as f64)
                    }
                    None => {}
                }
            }
            handle.renderer.borrow_mut().invalidate();
            handle.frame.set(handle.frame.get().wrapping_add(1));
        }
        _ => {}
    }
}

/// What a keypress should do, decided under a short shared borrow and
/// executed after it ends so route swaps can re-borrow the view.
enum KeyAction {
    None,
    Stop,
    GoHome,
    Scroll(f64),
}

fn route_key(handle: &MountHandle, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        handle.stop();
        return;
    }

    let action = {
        let view = handle.view.borrow();
        match &*view {
            Some(View::Home(page)) => home_key(page, code),
            Some(View::NotFound(_)) => match code {
                KeyCode::Char('q') => KeyAction::Stop,
                KeyCode::Esc | KeyCode::Enter => KeyAction::GoHome,
                _ => KeyAction::None,
            },
            None => KeyAction::None,
        }
    };

    match action {
        KeyAction::None => {}
        KeyAction::Stop => handle.stop(),
        KeyAction::GoHome => {
            handle.route.set(Route::Home);
        }
        KeyAction::Scroll(delta) => viewport::scroll_by(delta),
    }
}

fn home_key(page: &HomePage, code: KeyCode) -> KeyAction {
    let typing = page.contact.focused_field().is_some();
    match code {
        // Form input wins over shortcuts while a field is focused
        KeyCode::Char(c) if typing => {
            page.contact.push_char(c);
            KeyAction::None
        }
        KeyCode::Backspace if typing => {
            page.contact.backspace();
            KeyAction::None
        }
        KeyCode::Enter if typing => {
            let _ = page.contact.submit();
            KeyAction::None
        }
        KeyCode::Esc if typing => {
            page.contact.blur();
            KeyAction::None
        }
        KeyCode::Tab => {
            page.contact.focus_next();
            KeyAction::None
        }
        KeyCode::Char('q') => KeyAction::Stop,
        KeyCode::Up => KeyAction::Scroll(-1.0),
        KeyCode::Down => KeyAction::Scroll(1.0),
        KeyCode::PageUp => KeyAction::Scroll(-viewport::size().1),
        KeyCode::PageDown => KeyAction::Scroll(viewport::size().1),
        KeyCode::Home => KeyAction::Scroll(f64::NEG_INFINITY),
        KeyCode::End => KeyAction::Scroll(f64::INFINITY),
        _ => KeyAction::None,
    }
}

fn route_mouse(mouse: MouseEvent) {
    // Events arrive in viewport coordinates; surfaces live in content
    // coordinates.
    let x = mouse.column as f64;
    let y = mouse.row as f64 + viewport::scroll_y();

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => surface::dispatch_pointer_move(x, y),
        MouseEventKind::Down(MouseButton::Left) => {
            surface::dispatch_click(x, y);
        }
        MouseEventKind::ScrollDown => viewport::scroll_by(viewport::WHEEL_SCROLL),
        MouseEventKind::ScrollUp => viewport::scroll_by(-viewport::WHEEL_SCROLL),
        _ => {}
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HERO_SLIDES;
    use crate::interaction::{AUTO_ADVANCE_MS, SETTLE_MS};
    use crate::sections::LogTransport;

    fn setup_home() -> HomePage {
        clock::reset();
        surface::reset();
        viewport::reset();
        viewport::set_size(100.0, 40.0);

        HomePage::mount(signal(Route::Home), Rc::new(LogTransport)).unwrap()
    }

    #[test]
    fn test_home_mounts_all_sections() {
        let page = setup_home();

        assert!(surface::is_allocated(page.hero.surface()));
        assert!(surface::is_allocated(page.showcase.surface()));
        assert!(surface::is_allocated(page.about.surface()));
        assert!(surface::is_allocated(page.contact.surface()));
        assert!(surface::is_allocated(page.footer.surface()));
        assert_eq!(page.layout.sections.len(), SectionKind::FLOW.len());
    }

    #[test]
    fn test_explore_scrolls_showcase_into_view() {
        let page = setup_home();
        assert_eq!(viewport::scroll_y(), 0.0);

        let hero_rect = surface::rect(page.hero.surface()).unwrap();
        // Explore button lives in the lower third of the hero
        let bx = hero_rect.width / 2.0;
        let by = (hero_rect.height * 0.72).floor();
        assert!(surface::dispatch_click(bx, by));

        let showcase_rect = surface::rect(page.showcase.surface()).unwrap();
        assert_eq!(viewport::scroll_y(), showcase_rect.y - NAV_ROWS);
    }

    #[test]
    fn test_hero_carousel_runs_under_page() {
        let page = setup_home();

        clock::advance(AUTO_ADVANCE_MS);
        clock::advance(SETTLE_MS);
        assert_eq!(
            page.hero.carousel().current_index(),
            1 % HERO_SLIDES.len()
        );
    }

    #[test]
    fn test_resize_relayouts_sections() {
        let mut page = setup_home();
        let wide = page.layout.content_height;

        viewport::set_size(50.0, 40.0);
        page.apply_layout().unwrap();
        // One-column showcase makes the page taller
        assert!(page.layout.content_height > wide);

        let hero = surface::rect(page.hero.surface()).unwrap();
        assert_eq!(hero.width, 50.0);
    }

    #[test]
    fn test_page_render_covers_frame() {
        let page = setup_home();

        let mut fb = FrameBuffer::new(100, 40);
        page.render(&mut fb);
        // Hero background fills the top row
        assert_eq!(
            fb.get(50, 5).unwrap().bg,
            crate::types::Rgba::gray(HERO_SLIDES[0].shade)
        );
    }

    #[test]
    fn test_drop_releases_every_surface() {
        let page = setup_home();
        let hero = page.hero.surface();
        let contact = page.contact.surface();

        drop(page);
        assert!(!surface::is_allocated(hero));
        assert!(!surface::is_allocated(contact));
        assert_eq!(clock::pending_count(), 0);
    }
}
