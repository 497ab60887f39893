//! Notification payload handed to the push service.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Icon path the receiving service worker resolves against its own origin.
pub const DEFAULT_ICON: &str = "/icon.png";

/// JSON body of a push message: `{ "title", "body", "icon" }`.
///
/// The payload is serialized here and encrypted by the delivery layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Icon URL or path.
    pub icon: String,
}

impl NotificationPayload {
    /// Payload with the default icon.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: DEFAULT_ICON.to_string(),
        }
    }

    /// UTF-8 JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("Failed to serialize notification payload")
    }
}
