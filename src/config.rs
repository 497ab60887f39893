//! Configuration loading.
//!
//! Reads the process-wide preferences (VAPID credentials and the target
//! push subscription) once at startup. The sender receives them by value;
//! nothing in the crate reads configuration from global state.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.json";

/// Placeholder printed instead of a secret.
const REDACTED: &str = "<redacted>";

/// Preferences supplied to the CLI.
///
/// Field names match the stored `"vapid-keys"` record so both can be
/// written by the same tooling.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Contact address used for the VAPID `sub` claim (`mailto:{email}`).
    pub email: String,
    /// VAPID public key (base64url, uncompressed P-256 point).
    pub public_key: String,
    /// VAPID private key (base64url, raw P-256 scalar).
    pub private_key: String,
    /// Push service endpoint URL of the subscription.
    pub endpoint: String,
    /// Subscriber's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Subscriber's auth secret (base64url).
    pub auth: String,
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `#[cfg(test)]` (unit tests): `tmp/vapid-push-test`
    /// 2. `VAPID_PUSH_CONFIG_DIR` env var: explicit override
    /// 3. `VAPID_PUSH_ENV=test`: `tmp/vapid-push-test` (integration tests)
    /// 4. Default: platform config dir (macOS: ~/Library/Application Support/vapid-push)
    pub fn config_dir() -> Result<PathBuf> {
        let dir = {
            #[cfg(test)]
            {
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/vapid-push-test")
            }

            #[cfg(not(test))]
            {
                if let Ok(dir) = std::env::var("VAPID_PUSH_CONFIG_DIR") {
                    PathBuf::from(dir)
                } else if crate::env::is_test_mode() {
                    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/vapid-push-test")
                } else {
                    dirs::config_dir()
                        .context("Could not determine config directory")?
                        .join("vapid-push")
                }
            }
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    ///
    /// `path` overrides the default `config.json` location. A missing file
    /// yields all-empty preferences; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_dir()?.join(CONFIG_FILE),
        };
        let mut config = Self::load_from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))
    }

    /// Applies `VAPID_PUSH_*` overrides using `lookup` to read variables.
    ///
    /// Empty values are ignored so an unset-but-exported variable does not
    /// wipe a configured field.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 6] = [
            ("VAPID_PUSH_EMAIL", &mut self.email),
            ("VAPID_PUSH_PUBLIC_KEY", &mut self.public_key),
            ("VAPID_PUSH_PRIVATE_KEY", &mut self.private_key),
            ("VAPID_PUSH_ENDPOINT", &mut self.endpoint),
            ("VAPID_PUSH_P256DH", &mut self.p256dh),
            ("VAPID_PUSH_AUTH", &mut self.auth),
        ];
        for (var, field) in fields {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    /// Copy of the configuration that is safe to print.
    ///
    /// The private key and the subscription auth secret are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [&mut copy.private_key, &mut copy.auth] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        copy
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("public_key", &self.public_key)
            .field("private_key", &REDACTED)
            .field("endpoint", &self.endpoint)
            .field("p256dh", &self.p256dh)
            .field("auth", &REDACTED)
            .finish()
    }
}
