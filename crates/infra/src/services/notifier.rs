use super::WEBHOOK_KEY_HEADER;
use anyhow::anyhow;
use medremind_domain::ID;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};
use tracing::info;

/// A button attached to a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationAction {
    #[serde(rename_all = "camelCase")]
    Confirm { log_id: ID },
    #[serde(rename_all = "camelCase")]
    Decline { log_id: ID },
    #[serde(rename_all = "camelCase")]
    Snooze { log_id: ID, minutes: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub text: String,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn text(text: String) -> Self {
        Self {
            text,
            actions: Vec::new(),
        }
    }
}

/// Delivers messages to users. Delivery failures are reported but never
/// retried by the caller.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn send(&self, user_id: &ID, notification: &Notification) -> anyhow::Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload<'a> {
    user_id: &'a ID,
    #[serde(flatten)]
    notification: &'a Notification,
}

pub struct WebhookNotifier {
    client: Client,
    url: String,
    key: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: String, key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            key,
        }
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn send(&self, user_id: &ID, notification: &Notification) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.url).json(&NotificationPayload {
            user_id,
            notification,
        });
        if let Some(key) = &self.key {
            req = req.header(WEBHOOK_KEY_HEADER, key);
        }
        req.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Used when no notification endpoint is configured
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn send(&self, user_id: &ID, notification: &Notification) -> anyhow::Result<()> {
        info!(
            "Notification to user: {}: {} ({} actions)",
            user_id,
            notification.text,
            notification.actions.len()
        );
        Ok(())
    }
}

/// Keeps every sent notification around so that tests can inspect them
pub struct InMemoryNotifier {
    sent: Mutex<Vec<(ID, Notification)>>,
    failing: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every following `send` fail until turned off again
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(ID, Notification)> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn sent_to(&self, user_id: &ID) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|(receiver, _)| receiver == user_id)
            .map(|(_, notification)| notification)
            .collect()
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn send(&self, user_id: &ID, notification: &Notification) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("Notifier is unavailable"));
        }
        self.sent
            .lock()
            .map_err(|_| anyhow!("Notifier lock is poisoned"))?
            .push((user_id.clone(), notification.clone()));
        Ok(())
    }
}
