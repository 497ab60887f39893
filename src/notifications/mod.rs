//! Web push notification infrastructure.
//!
//! Builds and delivers one encrypted web push message (RFC 8030) to a
//! configured browser subscription, signed with VAPID (RFC 8292).
//!
//! # Architecture
//!
//! ```text
//! NotificationPayload { title, body, icon }
//!     ↓ serialized to JSON
//! PushDelivery::deliver (WebPushDelivery: web-push + reqwest)
//!     ↓ aes128gcm-encrypted, VAPID-signed POST
//! Push service delivers to the browser's service worker
//! ```

// Rust guideline compliant 2026-02

pub mod payload;
pub mod push;
pub mod vapid;

pub use payload::{NotificationPayload, DEFAULT_ICON};
pub use push::{DeliveryOptions, PushDelivery, PushSubscription, Urgency, WebPushDelivery};
pub use vapid::VapidIdentity;
