//! Notification sender: validates a form, resolves credentials and the
//! target subscription, and delivers one push message.
//!
//! [`prepare`] holds the decisions and has no side effects.
//! [`NotificationSender::submit`] runs them, reports status transitions,
//! and performs the single delivery call.

// Rust guideline compliant 2026-02

use thiserror::Error;

use crate::config::Config;
use crate::form::{FieldError, NotificationForm};
use crate::notifications::{NotificationPayload, PushDelivery, PushSubscription, VapidIdentity};
use crate::status::{StatusReporter, Toast, ToastStyle};
use crate::store::{LocalStorage, Lookup, StoredRecord};

/// Why the sender refused to attempt delivery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Unavailable {
    /// Store not loaded, empty, or credentials incomplete.
    #[error("No VAPID keys available")]
    VapidKeys,
    /// Subscription descriptor incomplete.
    #[error("No subscription available")]
    Subscription,
    /// Key material present but rejected by the delivery capability.
    #[error("Invalid VAPID keys")]
    InvalidVapidKeys(String),
}

/// Outcome of a failed submission.
#[derive(Debug, Error)]
pub enum SendError {
    /// One or more required fields are empty.
    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),
    /// Configuration missing; nothing was sent.
    #[error(transparent)]
    Unavailable(#[from] Unavailable),
    /// The delivery capability failed.
    #[error("Failed to send notification")]
    Delivery(#[source] anyhow::Error),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Successful delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sent {
    /// Endpoint the message was delivered to.
    pub endpoint: String,
}

/// Everything needed for one delivery.
#[derive(Debug)]
pub struct PreparedSend {
    /// Sender identity.
    pub identity: VapidIdentity,
    /// Recipient.
    pub subscription: PushSubscription,
    /// Serialized JSON payload.
    pub payload: Vec<u8>,
}

/// Preference value, or the stored value when the preference is blank.
fn resolve(preference: &str, stored: &str) -> String {
    if preference.trim().is_empty() {
        stored.trim().to_string()
    } else {
        preference.trim().to_string()
    }
}

/// Validate the form and resolve credentials and subscription.
///
/// Checks run in order: form fields, store availability, credentials,
/// subscription. The first failing check decides the error.
pub fn prepare(
    form: &NotificationForm,
    stored: Lookup<StoredRecord>,
    config: &Config,
) -> Result<PreparedSend, SendError> {
    let content = form.validate().map_err(SendError::Validation)?;

    let record = match stored {
        Lookup::Found(record) if !record.is_empty() => record,
        Lookup::Found(_) | Lookup::NotFound | Lookup::Loading => {
            return Err(Unavailable::VapidKeys.into());
        }
    };

    let email = resolve(&config.email, &record.email);
    let public_key = resolve(&config.public_key, &record.public_key);
    let private_key = resolve(&config.private_key, &record.private_key);
    if email.is_empty() || public_key.is_empty() || private_key.is_empty() {
        return Err(Unavailable::VapidKeys.into());
    }

    let subscription = PushSubscription {
        endpoint: resolve(&config.endpoint, &record.endpoint),
        p256dh: resolve(&config.p256dh, &record.p256dh),
        auth: resolve(&config.auth, &record.auth),
    };
    if subscription.is_incomplete() {
        return Err(Unavailable::Subscription.into());
    }

    let payload = NotificationPayload::new(content.title(), content.body())
        .to_bytes()
        .map_err(SendError::Delivery)?;

    Ok(PreparedSend {
        identity: VapidIdentity::from_email(&email, &public_key, &private_key),
        subscription,
        payload,
    })
}

/// Sends notifications to the configured subscription.
///
/// Each [`submit`](Self::submit) is an independent attempt; nothing carries
/// over between calls except the configuration.
#[derive(Debug)]
pub struct NotificationSender<D> {
    config: Config,
    store: LocalStorage,
    delivery: D,
}

impl<D: PushDelivery> NotificationSender<D> {
    /// Create a sender.
    pub fn new(config: Config, store: LocalStorage, delivery: D) -> Self {
        Self {
            config,
            store,
            delivery,
        }
    }

    /// The delivery capability.
    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Submit the form: validate, resolve, and deliver one message.
    ///
    /// Never panics on delivery failure; the error is logged, reported
    /// through `reporter`, and returned.
    pub async fn submit(
        &mut self,
        form: &NotificationForm,
        reporter: &mut dyn StatusReporter,
    ) -> Result<Sent, SendError> {
        let prepared = match prepare(form, self.store.vapid_keys(), &self.config) {
            Ok(prepared) => prepared,
            Err(err) => {
                report_refusal(&err, reporter);
                return Err(err);
            }
        };

        if let Err(e) = self.delivery.configure_identity(prepared.identity) {
            log::warn!("[Sender] Rejected VAPID keys: {e:#}");
            let err = SendError::from(Unavailable::InvalidVapidKeys(format!("{e:#}")));
            report_refusal(&err, reporter);
            return Err(err);
        }

        log::info!(
            "[Sender] Sending notification to {}",
            prepared.subscription.endpoint
        );

        let mut toast = Toast::animated("Sending notification");
        reporter.show_toast(&toast);

        match self
            .delivery
            .deliver(&prepared.subscription, &prepared.payload)
            .await
        {
            Ok(()) => {
                toast.finish(
                    ToastStyle::Success,
                    "Sent notification",
                    "Notification sent successfully",
                );
                reporter.show_toast(&toast);
                reporter.show_hud("Notification sent");
                Ok(Sent {
                    endpoint: prepared.subscription.endpoint,
                })
            }
            Err(e) => {
                log::error!("[Sender] Error sending push notification: {e:#}");
                toast.finish(ToastStyle::Failure, "Failed", "Failed to send notification");
                reporter.show_toast(&toast);
                Err(SendError::Delivery(e))
            }
        }
    }
}

fn report_refusal(err: &SendError, reporter: &mut dyn StatusReporter) {
    match err {
        SendError::Validation(errors) => {
            for error in errors {
                reporter.show_field_error(error);
            }
        }
        SendError::Unavailable(reason) => {
            log::warn!("[Sender] {reason}");
            reporter.show_hud(&reason.to_string());
        }
        SendError::Delivery(e) => {
            log::error!("[Sender] {e:#}");
            reporter.show_hud("Failed to send notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;
    use crate::status::tests::{RecordingReporter, StatusEvent};
    use crate::store::VAPID_KEYS;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Delivery fake that replays scripted outcomes and records calls.
    #[derive(Debug, Default)]
    struct ScriptedDelivery {
        reject_identity: bool,
        outcomes: Mutex<VecDeque<Result<(), String>>>,
        contacts: Vec<String>,
        calls: Mutex<Vec<(PushSubscription, Vec<u8>)>>,
    }

    impl ScriptedDelivery {
        fn with_outcomes(outcomes: impl IntoIterator<Item = Result<(), String>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(PushSubscription, Vec<u8>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PushDelivery for ScriptedDelivery {
        fn configure_identity(&mut self, identity: VapidIdentity) -> Result<()> {
            anyhow::ensure!(!self.reject_identity, "VAPID public key must be 65 bytes");
            self.contacts.push(identity.contact().to_string());
            Ok(())
        }

        async fn deliver(&self, subscription: &PushSubscription, payload: &[u8]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((subscription.clone(), payload.to_vec()));
            match self.outcomes.lock().unwrap().pop_front() {
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                _ => Ok(()),
            }
        }
    }

    fn full_config() -> Config {
        Config {
            email: "ops@example.com".to_string(),
            public_key: "BPub".to_string(),
            private_key: "priv".to_string(),
            endpoint: "https://push.example.com/sub/1".to_string(),
            p256dh: "BKey".to_string(),
            auth: "secret".to_string(),
        }
    }

    fn record() -> StoredRecord {
        StoredRecord {
            email: "stored@example.com".to_string(),
            public_key: "BStoredPub".to_string(),
            private_key: "stored-priv".to_string(),
            endpoint: "https://push.example.com/sub/stored".to_string(),
            p256dh: "BStoredKey".to_string(),
            auth: "stored-secret".to_string(),
        }
    }

    fn loaded_store(record: &StoredRecord) -> LocalStorage {
        LocalStorage::from_entries(HashMap::from([(
            VAPID_KEYS.to_string(),
            serde_json::to_value(record).unwrap(),
        )]))
    }

    fn build_sender(
        config: Config,
        store: LocalStorage,
        delivery: ScriptedDelivery,
    ) -> NotificationSender<ScriptedDelivery> {
        NotificationSender::new(config, store, delivery)
    }

    #[test]
    fn test_prepare_prefers_configuration_over_record() {
        let prepared = prepare(
            &NotificationForm::new("Hi", "There"),
            Lookup::Found(record()),
            &full_config(),
        )
        .unwrap();
        assert_eq!(prepared.identity.contact(), "mailto:ops@example.com");
        assert_eq!(prepared.subscription.endpoint, "https://push.example.com/sub/1");
        assert_eq!(prepared.subscription.auth, "secret");
    }

    #[test]
    fn test_prepare_falls_back_to_record() {
        let prepared = prepare(
            &NotificationForm::new("Hi", "There"),
            Lookup::Found(record()),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(prepared.identity.contact(), "mailto:stored@example.com");
        assert_eq!(prepared.identity.public_key_base64url(), "BStoredPub");
        assert_eq!(prepared.subscription.endpoint, "https://push.example.com/sub/stored");
    }

    #[test]
    fn test_prepare_payload() {
        let prepared = prepare(
            &NotificationForm::new("Hi", "There"),
            Lookup::Found(record()),
            &full_config(),
        )
        .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&prepared.payload).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({ "title": "Hi", "body": "There", "icon": "/icon.png" })
        );
    }

    #[test]
    fn test_prepare_validation_comes_first() {
        let err = prepare(&NotificationForm::new("", "There"), Lookup::Loading, &full_config())
            .unwrap_err();
        assert!(matches!(err, SendError::Validation(ref errors) if errors[0].field == Field::Title));
    }

    #[test]
    fn test_prepare_requires_loaded_non_empty_store() {
        let form = NotificationForm::new("Hi", "There");
        for lookup in [
            Lookup::Loading,
            Lookup::NotFound,
            Lookup::Found(StoredRecord::default()),
        ] {
            let err = prepare(&form, lookup, &full_config()).unwrap_err();
            assert!(matches!(err, SendError::Unavailable(Unavailable::VapidKeys)));
        }
    }

    #[test]
    fn test_prepare_missing_credential_field() {
        let mut stored = record();
        stored.private_key.clear();
        let config = Config {
            private_key: String::new(),
            ..full_config()
        };
        let err = prepare(&NotificationForm::new("Hi", "There"), Lookup::Found(stored), &config)
            .unwrap_err();
        assert!(matches!(err, SendError::Unavailable(Unavailable::VapidKeys)));
    }

    #[test]
    fn test_prepare_missing_subscription_field() {
        let mut stored = record();
        stored.endpoint.clear();
        let config = Config {
            endpoint: "   ".to_string(),
            ..full_config()
        };
        let err = prepare(&NotificationForm::new("Hi", "There"), Lookup::Found(stored), &config)
            .unwrap_err();
        assert!(matches!(err, SendError::Unavailable(Unavailable::Subscription)));
        assert_eq!(err.to_string(), "No subscription available");
    }

    #[tokio::test]
    async fn test_empty_fields_never_deliver() {
        for form in [
            NotificationForm::new("", "Body"),
            NotificationForm::new("Title", ""),
            NotificationForm::default(),
        ] {
            let mut sender = build_sender(full_config(), loaded_store(&record()), ScriptedDelivery::default());
            let mut reporter = RecordingReporter::default();

            let err = sender.submit(&form, &mut reporter).await.unwrap_err();

            assert!(matches!(err, SendError::Validation(_)));
            assert!(sender.delivery().calls().is_empty());
            assert!(reporter
                .events
                .iter()
                .all(|event| matches!(event, StatusEvent::FieldError(_))));
        }
    }

    #[tokio::test]
    async fn test_missing_subscription_never_delivers() {
        let config = Config {
            endpoint: String::new(),
            p256dh: String::new(),
            auth: String::new(),
            ..full_config()
        };
        let stored = StoredRecord {
            email: "stored@example.com".to_string(),
            ..StoredRecord::default()
        };
        let mut sender = build_sender(config, loaded_store(&stored), ScriptedDelivery::default());
        let mut reporter = RecordingReporter::default();

        let err = sender
            .submit(&NotificationForm::new("Hi", "There"), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Unavailable(Unavailable::Subscription)));
        assert!(sender.delivery().calls().is_empty());
        assert_eq!(reporter.huds(), vec!["No subscription available"]);
    }

    #[tokio::test]
    async fn test_loading_store_never_delivers() {
        let mut sender = build_sender(full_config(), LocalStorage::loading(), ScriptedDelivery::default());
        let mut reporter = RecordingReporter::default();

        let err = sender
            .submit(&NotificationForm::new("Hi", "There"), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Unavailable(Unavailable::VapidKeys)));
        assert!(sender.delivery().calls().is_empty());
        assert!(sender.delivery().contacts.is_empty());
        assert_eq!(reporter.huds(), vec!["No VAPID keys available"]);
    }

    #[tokio::test]
    async fn test_rejected_identity_never_delivers() {
        let delivery = ScriptedDelivery {
            reject_identity: true,
            ..ScriptedDelivery::default()
        };
        let mut sender = build_sender(full_config(), loaded_store(&record()), delivery);
        let mut reporter = RecordingReporter::default();

        let err = sender
            .submit(&NotificationForm::new("Hi", "There"), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Unavailable(Unavailable::InvalidVapidKeys(_))));
        assert!(sender.delivery().calls().is_empty());
        assert_eq!(reporter.huds(), vec!["Invalid VAPID keys"]);
    }

    #[tokio::test]
    async fn test_successful_send_delivers_once() {
        let mut sender = build_sender(full_config(), loaded_store(&record()), ScriptedDelivery::default());
        let mut reporter = RecordingReporter::default();

        let sent = sender
            .submit(&NotificationForm::new("Deploy", "Finished"), &mut reporter)
            .await
            .unwrap();

        assert_eq!(sent.endpoint, "https://push.example.com/sub/1");
        assert_eq!(sender.delivery().contacts, vec!["mailto:ops@example.com"]);

        let calls = sender.delivery().calls();
        assert_eq!(calls.len(), 1);
        let (subscription, payload) = &calls[0];
        assert_eq!(
            subscription,
            &PushSubscription {
                endpoint: "https://push.example.com/sub/1".to_string(),
                p256dh: "BKey".to_string(),
                auth: "secret".to_string(),
            }
        );
        let payload: serde_json::Value = serde_json::from_slice(payload).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({ "title": "Deploy", "body": "Finished", "icon": "/icon.png" })
        );

        assert_eq!(
            reporter.events,
            vec![
                StatusEvent::Toast(Toast::animated("Sending notification")),
                StatusEvent::Toast(Toast {
                    style: ToastStyle::Success,
                    title: "Sent notification".to_string(),
                    message: Some("Notification sent successfully".to_string()),
                }),
                StatusEvent::Hud("Notification sent".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_delivery_reports_failure() {
        let delivery =
            ScriptedDelivery::with_outcomes([Err("Web push send failed (HTTP 410): gone".to_string())]);
        let mut sender = build_sender(full_config(), loaded_store(&record()), delivery);
        let mut reporter = RecordingReporter::default();

        let err = sender
            .submit(&NotificationForm::new("Deploy", "Finished"), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Delivery(_)));
        assert_eq!(err.to_string(), "Failed to send notification");
        assert_eq!(sender.delivery().calls().len(), 1);

        let toast = reporter.last_toast().unwrap();
        assert_eq!(toast.style, ToastStyle::Failure);
        assert_eq!(toast.message.as_deref(), Some("Failed to send notification"));
        assert!(reporter.huds().is_empty());
    }

    #[tokio::test]
    async fn test_sequential_submissions_are_independent() {
        let delivery = ScriptedDelivery::with_outcomes([Err("connection reset".to_string()), Ok(())]);
        let mut sender = build_sender(full_config(), loaded_store(&record()), delivery);

        let mut first = RecordingReporter::default();
        let first_result = sender
            .submit(&NotificationForm::new("One", "First"), &mut first)
            .await;
        assert!(matches!(first_result, Err(SendError::Delivery(_))));

        let mut second = RecordingReporter::default();
        let sent = sender
            .submit(&NotificationForm::new("Two", "Second"), &mut second)
            .await
            .unwrap();
        assert_eq!(sent.endpoint, "https://push.example.com/sub/1");
        assert_eq!(second.huds(), vec!["Notification sent"]);

        let calls = sender.delivery().calls();
        assert_eq!(calls.len(), 2);
        let second_payload: serde_json::Value = serde_json::from_slice(&calls[1].1).unwrap();
        assert_eq!(second_payload["title"], "Two");
        assert_eq!(sender.delivery().contacts.len(), 2, "identity configured per attempt");
    }
}
