//! vapid-push - send one VAPID-signed Web Push notification.
//!
//! The crate collects a notification title and body, resolves the sender's
//! VAPID credentials and the target browser subscription from configuration
//! and a local store, and delivers a single encrypted push message.
//!
//! # Architecture
//!
//! - **Sender** - Validates input, resolves configuration, drives one delivery
//! - **Delivery** - `PushDelivery` trait; `WebPushDelivery` signs, encrypts, POSTs
//! - **Status** - Presentation adapter for progress, success and failure
//! - **Commands** - CLI surface (`send`, `config`)
//!
//! # Modules
//!
//! - [`sender`] - Notification sender and its error taxonomy
//! - [`notifications`] - Payload, VAPID identity, web push delivery
//! - [`config`] - Preference loading
//! - [`store`] - Asynchronously loaded local key-value store

// Rust guideline compliant 2026-02

pub mod commands;
pub mod config;
pub mod draft;
pub mod env;
pub mod form;
pub mod notifications;
pub mod sender;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use form::NotificationForm;
pub use sender::{NotificationSender, SendError, Sent, Unavailable};
