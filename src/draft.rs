//! Form drafts kept between runs of the interactive prompt.
//!
//! The CLI saves unsent input here and seeds the next prompt with it.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::form::NotificationForm;

/// Draft file name inside the config directory.
pub const DRAFT_FILE: &str = "draft.json";

/// File-backed draft of the notification form.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Draft store at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the draft file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved draft, or an empty form when none exists.
    ///
    /// An unreadable draft is discarded with a warning.
    pub fn load(&self) -> NotificationForm {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return NotificationForm::default(),
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable draft {:?}: {}", self.path, e);
            NotificationForm::default()
        })
    }

    /// Save `form` as the current draft. Empty forms clear the draft.
    pub fn save(&self, form: &NotificationForm) -> Result<()> {
        if form.title.is_empty() && form.body.is_empty() {
            return self.clear();
        }
        let content = serde_json::to_string_pretty(form).context("Failed to serialize draft")?;
        fs::write(&self.path, content).context("Failed to write draft file")?;
        log::debug!("Saved draft to {:?}", self.path);
        Ok(())
    }

    /// Remove the saved draft, if any.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to delete draft file"),
        }
    }
}
