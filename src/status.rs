//! Status reporting for a send attempt.
//!
//! The sender announces progress through [`StatusReporter`]. The terminal
//! implementation prints toasts and HUD messages; tests record them.

// Rust guideline compliant 2026-02

use std::io::Write;

use crate::form::FieldError;

/// Visual state of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastStyle {
    /// Work in progress.
    Animated,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Failure,
}

/// A status message that changes as the send progresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Current style.
    pub style: ToastStyle,
    /// Headline.
    pub title: String,
    /// Optional detail line.
    pub message: Option<String>,
}

impl Toast {
    /// An in-progress toast.
    pub fn animated(title: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Animated,
            title: title.into(),
            message: None,
        }
    }

    /// Move the toast to a terminal state.
    pub fn finish(&mut self, style: ToastStyle, title: &str, message: &str) {
        self.style = style;
        self.title = title.to_string();
        self.message = Some(message.to_string());
    }
}

/// Receives the observable status transitions of a send.
pub trait StatusReporter {
    /// Show or update `toast`.
    fn show_toast(&mut self, toast: &Toast);

    /// Show a short-lived standalone message.
    fn show_hud(&mut self, message: &str);

    /// Show an inline error for one form field.
    fn show_field_error(&mut self, error: &FieldError);
}

/// Reporter that writes to the terminal.
///
/// Toasts and field errors go to stderr, the final HUD message to stdout.
#[derive(Debug, Default)]
pub struct TerminalReporter;

impl StatusReporter for TerminalReporter {
    // Write errors (e.g. a closed pipe) are ignored.
    fn show_toast(&mut self, toast: &Toast) {
        let _ = write_toast(&mut std::io::stderr().lock(), toast);
    }

    fn show_hud(&mut self, message: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{message}");
    }

    fn show_field_error(&mut self, error: &FieldError) {
        let _ = writeln!(std::io::stderr().lock(), "  ✗ {error}");
    }
}

fn write_toast(out: &mut impl Write, toast: &Toast) -> std::io::Result<()> {
    let marker = match toast.style {
        ToastStyle::Animated => "…",
        ToastStyle::Success => "✓",
        ToastStyle::Failure => "✗",
    };
    match &toast.message {
        Some(message) => writeln!(out, "  {marker} {}: {message}", toast.title),
        None => writeln!(out, "  {marker} {}", toast.title),
    }
}
