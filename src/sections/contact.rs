//! Contact section - commission inquiry form.
//!
//! Form state is reactive: three field signals, a focus signal, and a
//! submit status signal. Delivery goes through the [`ContactTransport`]
//! seam so the binary can plug in a real sink and tests a failing one.
//! Validation failures and transport failures stay distinguishable in
//! [`SubmitError`].
//!
//! The state lives in an `Rc` core shared with the click subscriptions,
//! so the submit button works without the event loop knowing the form.

use std::rc::Rc;

use spark_signals::{Signal, signal};
use thiserror::Error;

use crate::content;
use crate::interaction::{PointerTracker, PresenceTracker};
use crate::render::{FrameBuffer, TextStyle};
use crate::surface;
use crate::types::{Attr, Cleanup, Rect, Rgba};

use super::{reveal, reveal_offset, wrap_text};

const SUBMIT_LABEL: &str = "[ Send Message ]";

// =============================================================================
// TRANSPORT SEAM
// =============================================================================

/// A validated inquiry ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Delivery failure reported by a transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Where submitted inquiries go.
pub trait ContactTransport {
    fn deliver(&self, message: &ContactMessage) -> Result<(), TransportError>;
}

/// Default transport: logs the inquiry. The site has no backend.
pub struct LogTransport;

impl ContactTransport for LogTransport {
    fn deliver(&self, message: &ContactMessage) -> Result<(), TransportError> {
        tracing::info!(
            name = %message.name,
            email = %message.email,
            "contact inquiry submitted"
        );
        Ok(())
    }
}

/// Submission failure. Validation and delivery stay separate variants so
/// the form can tell the user which one happened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("delivery failed: {0}")]
    Delivery(#[from] TransportError),
}

// =============================================================================
// FORM STATE
// =============================================================================

/// The three form fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }
}

/// Outcome shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Sent,
    Failed(String),
}

struct FormCore {
    name: Signal<String>,
    email: Signal<String>,
    message: Signal<String>,
    focused: Signal<Option<Field>>,
    status: Signal<SubmitStatus>,
    transport: Rc<dyn ContactTransport>,
}

impl FormCore {
    fn field_signal(&self, field: Field) -> Signal<String> {
        match field {
            Field::Name => self.name.clone(),
            Field::Email => self.email.clone(),
            Field::Message => self.message.clone(),
        }
    }

    fn submit(&self) -> Result<(), SubmitError> {
        let result = self.try_deliver();
        match &result {
            Ok(()) => {
                self.name.set(String::new());
                self.email.set(String::new());
                self.message.set(String::new());
                self.focused.set(None);
                self.status.set(SubmitStatus::Sent);
            }
            Err(err) => {
                tracing::debug!(error = %err, "contact submission rejected");
                self.status.set(SubmitStatus::Failed(err.to_string()));
            }
        }
        result
    }

    fn try_deliver(&self) -> Result<(), SubmitError> {
        let name = self.name.get().trim().to_string();
        let email = self.email.get().trim().to_string();
        let message = self.message.get().trim().to_string();

        for (value, label) in [(&name, "name"), (&email, "email"), (&message, "message")] {
            if value.is_empty() {
                return Err(SubmitError::MissingField(label));
            }
        }

        self.transport.deliver(&ContactMessage {
            name,
            email,
            message,
        })?;
        Ok(())
    }
}

// =============================================================================
// SECTION
// =============================================================================

pub struct ContactSection {
    surface: usize,
    field_surfaces: Vec<usize>,
    submit_surface: usize,
    core: Rc<FormCore>,
    presence: PresenceTracker,
    pointer: PointerTracker,
    subs: Vec<Cleanup>,
}

impl ContactSection {
    /// Mount the form over a delivery transport.
    pub fn mount(transport: Rc<dyn ContactTransport>) -> Self {
        let surface = surface::allocate();
        let field_surfaces: Vec<usize> = Field::ALL.iter().map(|_| surface::allocate()).collect();
        let submit_surface = surface::allocate();

        let core = Rc::new(FormCore {
            name: signal(String::new()),
            email: signal(String::new()),
            message: signal(String::new()),
            focused: signal(None),
            status: signal(SubmitStatus::Idle),
            transport,
        });

        let mut subs = Vec::with_capacity(field_surfaces.len() + 2);
        // Registered before the field subs so fields win the hit test
        let blur = core.clone();
        subs.push(surface::on_click(surface, move |_, _| {
            blur.focused.set(None);
            false
        }));
        for (field_surface, field) in field_surfaces.iter().zip(Field::ALL) {
            let focus = core.clone();
            subs.push(surface::on_click(*field_surface, move |_, _| {
                focus.focused.set(Some(field));
                true
            }));
        }
        let submit = core.clone();
        subs.push(surface::on_click(submit_surface, move |_, _| {
            // Outcome lands in the status signal either way
            let _ = submit.submit();
            true
        }));

        Self {
            surface,
            field_surfaces,
            submit_surface,
            core,
            presence: PresenceTracker::attach(Some(surface)),
            pointer: PointerTracker::attach(Some(surface)),
            subs,
        }
    }

    pub fn surface(&self) -> usize {
        self.surface
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.core.focused.get()
    }

    pub fn status(&self) -> SubmitStatus {
        self.core.status.get()
    }

    /// Move focus to the next field, or blur after the last one.
    pub fn focus_next(&self) {
        let next = match self.core.focused.get() {
            None => Some(Field::Name),
            Some(Field::Name) => Some(Field::Email),
            Some(Field::Email) => Some(Field::Message),
            Some(Field::Message) => None,
        };
        self.core.focused.set(next);
    }

    pub fn blur(&self) {
        self.core.focused.set(None);
    }

    /// Append a character to the focused field.
    pub fn push_char(&self, ch: char) {
        if let Some(field) = self.core.focused.get() {
            let signal = self.core.field_signal(field);
            let mut value = signal.get();
            value.push(ch);
            signal.set(value);
        }
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&self) {
        if let Some(field) = self.core.focused.get() {
            let signal = self.core.field_signal(field);
            let mut value = signal.get();
            value.pop();
            signal.set(value);
        }
    }

    /// Validate and deliver the inquiry.
    ///
    /// Success clears the form; either failure leaves it intact so the
    /// user can fix and resend. The status signal is updated either way.
    pub fn submit(&self) -> Result<(), SubmitError> {
        self.core.submit()
    }

    /// Place the section, its field boxes, and the submit button.
    pub fn set_rect(&self, rect: Rect) {
        surface::set_rect(self.surface, rect);

        let form_width = (rect.width - 8.0).clamp(24.0, 60.0);
        let form_x = (rect.x + (rect.width - form_width) / 2.0).floor();
        let mut row = rect.y + 6.0;
        for (field_surface, field) in self.field_surfaces.iter().zip(Field::ALL) {
            let rows = if field == Field::Message { 4.0 } else { 2.0 };
            surface::set_rect(*field_surface, Rect::new(form_x, row, form_width, rows));
            row += rows + 1.0;
        }

        let len = SUBMIT_LABEL.chars().count() as f64;
        surface::set_rect(
            self.submit_surface,
            Rect::new(form_x + form_width - len, row, len, 1.0),
        );
    }

    /// Paint the section into `view`, its rect in viewport coordinates.
    pub fn render(&self, fb: &mut FrameBuffer, view: Rect, scroll: f64) {
        let visible = self.presence.is_visible();
        let focused = self.core.focused.get();

        let x = view.x as i32;
        let y = view.y as i32 + reveal_offset(visible);
        let width = view.width as i32;

        let heading = reveal(visible, TextStyle::fg(Rgba::WHITE).with_attrs(Attr::BOLD));
        let dim = reveal(visible, TextStyle::fg(Rgba::gray(150)));

        fb.draw_text_centered(x, width, y + 2, content::CONTACT_HEADING, heading);
        let budget = (width - 12).max(24) as usize;
        for (i, line) in wrap_text(content::CONTACT_INTRO, budget).iter().enumerate() {
            fb.draw_text_centered(x, width, y + 4 + i as i32, line, dim);
        }

        for (field_surface, field) in self.field_surfaces.iter().zip(Field::ALL) {
            let Some(rect) = surface::rect(*field_surface) else {
                continue;
            };
            let rect = Rect::new(rect.x, rect.y - scroll, rect.width, rect.height);
            self.render_field(fb, rect, field, focused == Some(field), visible);
        }

        if let Some(rect) = surface::rect(self.submit_surface) {
            let style = reveal(visible, TextStyle::fg(Rgba::BLACK).on(Rgba::WHITE));
            fb.draw_text(rect.x as i32, (rect.y - scroll) as i32, SUBMIT_LABEL, style);

            let status_row = (rect.y - scroll) as i32 + 2;
            match self.core.status.get() {
                SubmitStatus::Idle => {}
                SubmitStatus::Sent => fb.draw_text_centered(
                    x,
                    width,
                    status_row,
                    "Thank you! Your message has been sent.",
                    reveal(visible, TextStyle::fg(Rgba::rgb(120, 220, 120))),
                ),
                SubmitStatus::Failed(reason) => fb.draw_text_centered(
                    x,
                    width,
                    status_row,
                    &reason,
                    reveal(visible, TextStyle::fg(Rgba::rgb(230, 110, 110))),
                ),
            }
        }
    }

    fn render_field(
        &self,
        fb: &mut FrameBuffer,
        rect: Rect,
        field: Field,
        focused: bool,
        visible: bool,
    ) {
        let x = rect.x as i32;
        let y = rect.y as i32;
        let width = rect.width as i32;

        let label_style = if focused {
            reveal(visible, TextStyle::fg(Rgba::WHITE))
        } else {
            reveal(visible, TextStyle::fg(Rgba::gray(130)))
        };
        fb.draw_text(x, y, field.label(), label_style);

        let mut value = self.core.field_signal(field).get();
        if focused {
            value.push('▌');
        }
        let value_style = reveal(visible, TextStyle::fg(Rgba::gray(210)).on(Rgba::gray(26)));
        let inner_width = (width - 2).max(4) as usize;
        let rows = rect.height as i32 - 1;
        let lines = wrap_text(&value, inner_width);
        for row in 0..rows {
            fb.fill_rect(x, y + 1 + row, width, 1, Rgba::gray(26));
            if let Some(line) = lines.get(row as usize) {
                fb.draw_text(x + 1, y + 1 + row, line, value_style);
            }
        }
    }

    /// Drop subscriptions and release surfaces. Idempotent.
    pub fn unmount(&mut self) {
        for cleanup in self.subs.drain(..) {
            cleanup();
        }
        self.presence.detach();
        self.pointer.detach();
        for field in &self.field_surfaces {
            surface::release(*field);
        }
        surface::release(self.submit_surface);
        surface::release(self.surface);
    }
}

impl Drop for ContactSection {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================
