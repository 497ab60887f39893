//! Local key-value store holding the persisted `"vapid-keys"` record.
//!
//! The store file is a JSON object mapping keys to values. It is read on a
//! background tokio task; until that read finishes every lookup reports
//! [`Lookup::Loading`]. This crate only reads the store.

// Rust guideline compliant 2026-02

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

/// Store file name inside the config directory.
pub const STORE_FILE: &str = "local-storage.json";

/// How long callers wait for the initial load before giving up.
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Key of the stored VAPID/subscription record.
pub const VAPID_KEYS: &str = "vapid-keys";

/// Result of a store lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The store has not finished loading.
    Loading,
    /// The store is loaded and holds no usable value for the key.
    NotFound,
    /// The stored value.
    Found(T),
}

/// Persisted mirror of the preferences. Every field defaults to empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredRecord {
    /// Contact email.
    pub email: String,
    /// VAPID public key.
    pub public_key: String,
    /// VAPID private key.
    pub private_key: String,
    /// Subscription endpoint.
    pub endpoint: String,
    /// Subscription P-256 ECDH key.
    pub p256dh: String,
    /// Subscription auth secret.
    pub auth: String,
}

impl StoredRecord {
    /// Whether every field is blank.
    pub fn is_empty(&self) -> bool {
        [
            &self.email,
            &self.public_key,
            &self.private_key,
            &self.endpoint,
            &self.p256dh,
            &self.auth,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

#[derive(Debug)]
enum LoadState {
    Loading,
    Ready(HashMap<String, serde_json::Value>),
}

/// Asynchronously loaded local store.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    state: watch::Receiver<LoadState>,
}

impl LocalStorage {
    /// Start loading the store file at `path` on a background task.
    ///
    /// Must be called inside a tokio runtime. A missing or unreadable file
    /// loads as an empty store.
    pub fn open(path: PathBuf) -> Self {
        let (tx, rx) = watch::channel(LoadState::Loading);
        tokio::spawn(async move {
            let entries = read_entries(&path).await;
            log::debug!("[Store] Loaded {} entr(ies) from {}", entries.len(), path.display());
            let _ = tx.send(LoadState::Ready(entries));
        });
        Self { state: rx }
    }

    /// A store that is already loaded with `entries`.
    pub fn from_entries(entries: HashMap<String, serde_json::Value>) -> Self {
        let (_tx, rx) = watch::channel(LoadState::Ready(entries));
        Self { state: rx }
    }

    /// A store whose load never completes.
    #[cfg(test)]
    pub(crate) fn loading() -> Self {
        let (_tx, rx) = watch::channel(LoadState::Loading);
        Self { state: rx }
    }

    /// Whether the load has finished.
    #[cfg(test)]
    pub(crate) fn is_loaded(&self) -> bool {
        matches!(*self.state.borrow(), LoadState::Ready(_))
    }

    /// Wait until the load finishes.
    ///
    /// Returns immediately if the loader went away without finishing; the
    /// store then keeps reporting [`Lookup::Loading`].
    pub async fn ready(&self) {
        let mut rx = self.state.clone();
        let _ = rx.wait_for(|state| matches!(state, LoadState::Ready(_))).await;
    }

    /// Snapshot lookup of `key`, deserialized as `T`.
    ///
    /// A value that does not deserialize as `T` is reported as
    /// [`Lookup::NotFound`].
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        let state = self.state.borrow();
        let LoadState::Ready(entries) = &*state else {
            return Lookup::Loading;
        };
        let Some(value) = entries.get(key) else {
            return Lookup::NotFound;
        };
        match serde_json::from_value(value.clone()) {
            Ok(record) => Lookup::Found(record),
            Err(e) => {
                log::warn!("[Store] Ignoring malformed value for '{}': {}", key, e);
                Lookup::NotFound
            }
        }
    }

    /// Lookup of the `"vapid-keys"` record.
    pub fn vapid_keys(&self) -> Lookup<StoredRecord> {
        self.lookup(VAPID_KEYS)
    }
}

async fn read_entries(path: &Path) -> HashMap<String, serde_json::Value> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            log::warn!("[Store] Failed to read {}: {}", path.display(), e);
            return HashMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("[Store] Failed to parse {} as a JSON object: {}", path.display(), e);
            HashMap::new()
        }
    }
}
