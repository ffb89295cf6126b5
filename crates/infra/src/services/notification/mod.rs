use petsync_reminders_domain::{Metadata, ID};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{error, warn};

/// What the user gets shown, plus opaque correlation data for the client.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: Metadata,
}

/// Result of a dispatch attempt. Dispatching is best-effort: a user with
/// no registered devices or an unreachable gateway is reported here, never
/// surfaced as an error.
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    pub delivered: bool,
}

#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send(&self, payload: &NotificationPayload, owner_id: &ID) -> NotificationOutcome;
}

/// Delivers notifications by POSTing them to the push gateway, which owns
/// device token lookup and the actual platform push.
pub struct PushGatewaySender {
    client: reqwest::Client,
    url: Option<String>,
    api_key: String,
}

impl PushGatewaySender {
    pub fn new(url: Option<String>, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl INotificationSender for PushGatewaySender {
    async fn send(&self, payload: &NotificationPayload, owner_id: &ID) -> NotificationOutcome {
        let url = match &self.url {
            Some(url) => url,
            None => {
                warn!(
                    "PUSH_GATEWAY_URL is not configured. Dropping notification for user {}.",
                    owner_id
                );
                return NotificationOutcome { delivered: false };
            }
        };

        let res = self
            .client
            .post(url)
            .header("petsync-push-key", &self.api_key)
            .json(&json!({
                "ownerId": owner_id.as_string(),
                "notification": {
                    "title": payload.title,
                    "body": payload.body,
                },
                "data": payload.data,
            }))
            .send()
            .await;

        match res {
            Ok(res) if res.status().is_success() => NotificationOutcome { delivered: true },
            Ok(res) => {
                error!(
                    "Push gateway rejected the notification for user {}: {}",
                    owner_id,
                    res.status()
                );
                NotificationOutcome { delivered: false }
            }
            Err(err) => {
                error!("Error reaching the push gateway: {:?}", err);
                NotificationOutcome { delivered: false }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentNotification {
    pub payload: NotificationPayload,
    pub owner_id: ID,
}

/// Records every dispatch instead of delivering it. Used by tests and as
/// the default sender of the inmemory context.
pub struct StubNotificationSender {
    pub sent: Mutex<Vec<SentNotification>>,
    delivered: AtomicBool,
}

impl StubNotificationSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            delivered: AtomicBool::new(true),
        }
    }

    /// Makes every subsequent dispatch report a failed delivery.
    pub fn fail_deliveries(&self) {
        self.delivered.store(false, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for StubNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationSender for StubNotificationSender {
    async fn send(&self, payload: &NotificationPayload, owner_id: &ID) -> NotificationOutcome {
        self.sent.lock().unwrap().push(SentNotification {
            payload: payload.clone(),
            owner_id: owner_id.clone(),
        });
        NotificationOutcome {
            delivered: self.delivered.load(Ordering::SeqCst),
        }
    }
}
