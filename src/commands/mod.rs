//! CLI subcommand implementations for vapid-push.
//!
//! - [`send`] - The notification form (interactive or from flags)
//! - [`config`] - Show the resolved configuration
//!
//! # Usage
//!
//! ```ignore
//! use vapid_push::commands;
//!
//! let sent = commands::send::run(config, &config_dir, args).await?;
//! commands::config::show(&config, &config_dir).await?;
//! ```

// Rust guideline compliant 2026-02

pub mod config;
pub mod send;

#[doc(inline)]
pub use send::SendArgs;
