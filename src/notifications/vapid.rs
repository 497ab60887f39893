//! VAPID sender identity (RFC 8292).
//!
//! Holds the contact URI and key pair that sign outgoing push messages and
//! validates them before any message is built.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use p256::ecdsa::SigningKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Contact URI, public key and private key identifying the sender.
///
/// The private key is the raw 32-byte P-256 scalar (base64url), which is
/// the format `web-push`'s `VapidSignatureBuilder::from_base64()` expects.
/// It is wiped from memory when the identity is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VapidIdentity {
    contact: String,
    public_key_b64: String,
    private_key_b64: String,
}

impl VapidIdentity {
    /// Build an identity from an email address, as `mailto:{email}`.
    pub fn from_email(email: &str, public_key_b64: &str, private_key_b64: &str) -> Self {
        Self::new(format!("mailto:{email}"), public_key_b64, private_key_b64)
    }

    /// Build an identity without validating it.
    ///
    /// Call [`VapidIdentity::validate`] before signing with it.
    pub fn new(contact: String, public_key_b64: &str, private_key_b64: &str) -> Self {
        Self {
            contact,
            public_key_b64: public_key_b64.trim().to_string(),
            private_key_b64: private_key_b64.trim().to_string(),
        }
    }

    /// The `sub` claim value (`mailto:` URI or `https:` URL).
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Base64url-encoded uncompressed public key.
    pub fn public_key_base64url(&self) -> &str {
        &self.public_key_b64
    }

    /// Base64url-encoded raw 32-byte private key scalar.
    pub fn private_key_base64url(&self) -> &str {
        &self.private_key_b64
    }

    /// Check the contact URI and both keys.
    ///
    /// Accepts private keys in legacy DER form (SEC1 or PKCS8) and rewrites
    /// them to the raw scalar. Returns the normalized identity.
    pub fn validate(mut self) -> Result<Self> {
        validate_contact(&self.contact)?;

        let pub_bytes = BASE64URL
            .decode(&self.public_key_b64)
            .context("Invalid base64url for VAPID public key")?;
        anyhow::ensure!(
            pub_bytes.len() == 65 && pub_bytes[0] == 0x04,
            "VAPID public key must be 65-byte uncompressed P-256 point, got {} bytes",
            pub_bytes.len()
        );

        let signing_key = decode_private_key(&self.private_key_b64)?;
        let derived = signing_key.verifying_key().to_encoded_point(false);
        anyhow::ensure!(
            derived.as_bytes() == pub_bytes.as_slice(),
            "VAPID public key does not match the private key"
        );

        self.private_key_b64 = BASE64URL.encode(signing_key.to_bytes().as_slice());
        Ok(self)
    }
}

impl std::fmt::Debug for VapidIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VapidIdentity")
            .field("contact", &self.contact)
            .field("public_key_b64", &self.public_key_b64)
            .field("private_key_b64", &"<redacted>")
            .finish()
    }
}

fn validate_contact(contact: &str) -> Result<()> {
    if let Some(address) = contact.strip_prefix("mailto:") {
        anyhow::ensure!(
            !address.trim().is_empty(),
            "VAPID contact must include an email address"
        );
        return Ok(());
    }
    anyhow::ensure!(
        contact.starts_with("https://") && contact.len() > "https://".len(),
        "VAPID contact must be a mailto: or https: URI"
    );
    Ok(())
}

/// Decode a private key given as a raw scalar, SEC1 DER, or PKCS8 DER.
fn decode_private_key(private_key_b64: &str) -> Result<SigningKey> {
    let priv_bytes = BASE64URL
        .decode(private_key_b64)
        .context("Invalid base64url for VAPID private key")?;

    if priv_bytes.len() == 32 {
        return SigningKey::from_bytes(priv_bytes.as_slice().into())
            .context("VAPID private key is not a valid P-256 scalar");
    }

    let signing_key = if let Ok(sk) = p256::SecretKey::from_sec1_der(&priv_bytes) {
        SigningKey::from(sk)
    } else {
        use p256::pkcs8::DecodePrivateKey;
        SigningKey::from_pkcs8_der(&priv_bytes)
            .context("VAPID private key is not a 32-byte scalar, SEC1 DER, or PKCS8 DER")?
    };

    log::info!(
        "[WebPush] Converted VAPID private key from DER ({} bytes) to raw scalar",
        priv_bytes.len()
    );
    Ok(signing_key)
}
