//! Web push message delivery.
//!
//! Defines the subscription descriptor, the [`PushDelivery`] seam the sender
//! talks to, and [`WebPushDelivery`], which encrypts and signs messages
//! (RFC 8291 / RFC 8292) with the `web-push` crate and sends them with
//! reqwest.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::vapid::VapidIdentity;

/// Default message TTL: four weeks, in seconds.
pub const DEFAULT_TTL: u32 = 2_419_200;

/// HTTP timeout for a single push service request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A browser's push subscription.
///
/// Contains everything needed to send a web push message to one browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// Browser's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
}

impl PushSubscription {
    /// Whether any part of the descriptor is missing.
    pub fn is_incomplete(&self) -> bool {
        self.endpoint.trim().is_empty() || self.p256dh.trim().is_empty() || self.auth.trim().is_empty()
    }
}

/// Push service urgency hint (RFC 8030 section 5.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Urgency {
    /// Deliver only when on power and Wi-Fi.
    VeryLow,
    /// Deliver when on power or Wi-Fi.
    Low,
    /// Deliver when not on low battery.
    Normal,
    /// Deliver immediately.
    High,
}

impl From<Urgency> for web_push::Urgency {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::VeryLow => Self::VeryLow,
            Urgency::Low => Self::Low,
            Urgency::Normal => Self::Normal,
            Urgency::High => Self::High,
        }
    }
}

/// Per-message options forwarded to the push service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Seconds the push service keeps an undelivered message.
    pub ttl: u32,
    /// Optional urgency header.
    pub urgency: Option<Urgency>,
    /// Optional topic; a newer message with the same topic replaces a pending one.
    pub topic: Option<String>,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            urgency: None,
            topic: None,
        }
    }
}

/// The capability that signs, encrypts and transmits one push message.
#[async_trait]
pub trait PushDelivery: Send + Sync + std::fmt::Debug {
    /// Set the VAPID identity used for every following [`deliver`](Self::deliver).
    ///
    /// Fails when the contact URI or key material is malformed.
    fn configure_identity(&mut self, identity: VapidIdentity) -> Result<()>;

    /// Deliver `payload` to `subscription`.
    ///
    /// Fails on any transport, authorization, or encryption error, and on
    /// any non-2xx push service response.
    async fn deliver(&self, subscription: &PushSubscription, payload: &[u8]) -> Result<()>;
}

/// [`PushDelivery`] backed by `web-push` and reqwest.
#[derive(Debug)]
pub struct WebPushDelivery {
    client: reqwest::Client,
    identity: Option<VapidIdentity>,
    options: DeliveryOptions,
}

impl WebPushDelivery {
    /// Create a delivery with its own HTTP client.
    pub fn new(options: DeliveryOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, options))
    }

    /// Create a delivery that reuses `client` for connection pooling.
    pub fn with_client(client: reqwest::Client, options: DeliveryOptions) -> Self {
        Self {
            client,
            identity: None,
            options,
        }
    }
}

#[async_trait]
impl PushDelivery for WebPushDelivery {
    fn configure_identity(&mut self, identity: VapidIdentity) -> Result<()> {
        let identity = identity.validate()?;
        log::debug!("[WebPush] VAPID identity set for {}", identity.contact());
        self.identity = Some(identity);
        Ok(())
    }

    async fn deliver(&self, subscription: &PushSubscription, payload: &[u8]) -> Result<()> {
        use web_push::{ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder};

        let identity = self
            .identity
            .as_ref()
            .context("VAPID identity not configured")?;

        let sub_info =
            SubscriptionInfo::new(&subscription.endpoint, &subscription.p256dh, &subscription.auth);

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(identity.private_key_base64url(), &sub_info)
                .context("Failed to build VAPID signature")?;
        sig_builder.add_claim("sub", identity.contact());
        let sig = sig_builder.build().context("Failed to sign VAPID JWT")?;

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(sig);
        builder.set_ttl(self.options.ttl);
        if let Some(urgency) = self.options.urgency {
            builder.set_urgency(urgency.into());
        }
        if let Some(topic) = &self.options.topic {
            builder.set_topic(topic.clone());
        }

        let message = builder.build().context("Failed to build web push message")?;

        let mut request = self
            .client
            .post(message.endpoint.to_string())
            .header("TTL", message.ttl.to_string());

        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        if let Some(push_payload) = message.payload {
            request = request
                .header("Content-Encoding", push_payload.content_encoding.to_str())
                .header("Content-Type", "application/octet-stream");

            for (key, value) in &push_payload.crypto_headers {
                request = request.header(*key, value.as_str());
            }

            request = request.body(push_payload.content);
        }

        let response = request.send().await.context("Web push HTTP request failed")?;
        let status = response.status().as_u16();

        match status {
            200..=299 => {
                log::info!("[WebPush] Push service accepted message (HTTP {status})");
                Ok(())
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow::anyhow!("Web push send failed (HTTP {status}): {body}"))
            }
        }
    }
}
