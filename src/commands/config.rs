//! `config` command: print the resolved preferences and store status.

// Rust guideline compliant 2026-02

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::store::{LocalStorage, Lookup, StoredRecord, LOAD_TIMEOUT, STORE_FILE};

/// Print the configuration as JSON, secrets redacted.
pub async fn show(config: &Config, config_dir: &Path) -> Result<()> {
    let store = LocalStorage::open(config_dir.join(STORE_FILE));
    let _ = tokio::time::timeout(LOAD_TIMEOUT, store.ready()).await;

    let report = serde_json::json!({
        "configDir": config_dir.display().to_string(),
        "preferences": config.redacted(),
        "vapidKeys": describe(&store.vapid_keys()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// One-word status of the stored record.
pub fn describe(lookup: &Lookup<StoredRecord>) -> &'static str {
    match lookup {
        Lookup::Loading => "loading",
        Lookup::NotFound => "missing",
        Lookup::Found(record) if record.is_empty() => "empty",
        Lookup::Found(_) => "present",
    }
}
