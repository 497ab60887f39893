//! Notification form input and validation.

// Rust guideline compliant 2026-02

use serde::{Deserialize, Serialize};

/// Message shown for an empty required field.
pub const REQUIRED_MESSAGE: &str = "The item is required";

/// Raw form values as entered by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationForm {
    /// Title input.
    pub title: String,
    /// Body input.
    pub body: String,
}

/// A form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// The "Title" input.
    Title,
    /// The "Body" input.
    Body,
}

impl Field {
    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Body => "Body",
        }
    }
}

/// Inline validation error for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field.
    pub field: Field,
    /// Message to display next to it.
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Validated notification content. Both fields are non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationContent {
    title: String,
    body: String,
}

impl NotificationContent {
    /// Notification title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Notification body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl NotificationForm {
    /// Form with both fields filled in.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Value of `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Body => &self.body,
        }
    }

    /// Check that both fields are filled in.
    ///
    /// Whitespace-only input counts as empty. Returns one error per empty
    /// field, in form order. Values are passed through unmodified.
    pub fn validate(&self) -> Result<NotificationContent, Vec<FieldError>> {
        let errors: Vec<FieldError> = [Field::Title, Field::Body]
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .map(|field| FieldError {
                field,
                message: REQUIRED_MESSAGE,
            })
            .collect();

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NotificationContent {
            title: self.title.clone(),
            body: self.body.clone(),
        })
    }
}
