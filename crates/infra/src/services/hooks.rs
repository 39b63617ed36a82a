use super::WEBHOOK_KEY_HEADER;
use medremind_domain::{Reminder, ReminderLog, ID};
use reqwest::Client;
use serde::Serialize;
use std::sync::Mutex;
use tracing::info;

/// Collaborators that react to adherence changes
#[async_trait::async_trait]
pub trait IAdherenceHooks: Send + Sync {
    /// A log got confirmed and achievements might have been unlocked
    async fn evaluate_achievements(&self, user_id: &ID) -> anyhow::Result<()>;
    /// A log got declined and the caregivers of the user should know
    async fn notify_caregivers(&self, log: &ReminderLog, reminder: &Reminder)
        -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdherenceHookEvent {
    #[serde(rename_all = "camelCase")]
    EvaluateAchievements { user_id: ID },
    #[serde(rename_all = "camelCase")]
    NotifyCaregivers {
        user_id: ID,
        reminder_id: ID,
        log_id: ID,
        scheduled_for: i64,
    },
}

impl AdherenceHookEvent {
    fn caregivers(log: &ReminderLog, reminder: &Reminder) -> Self {
        Self::NotifyCaregivers {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
            log_id: log.id.clone(),
            scheduled_for: log.scheduled_for,
        }
    }
}

pub struct WebhookAdherenceHooks {
    client: Client,
    url: String,
    key: Option<String>,
}

impl WebhookAdherenceHooks {
    pub fn new(url: String, key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            key,
        }
    }

    async fn post(&self, event: &AdherenceHookEvent) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.url).json(event);
        if let Some(key) = &self.key {
            req = req.header(WEBHOOK_KEY_HEADER, key);
        }
        req.send().await?.error_for_status()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IAdherenceHooks for WebhookAdherenceHooks {
    async fn evaluate_achievements(&self, user_id: &ID) -> anyhow::Result<()> {
        self.post(&AdherenceHookEvent::EvaluateAchievements {
            user_id: user_id.clone(),
        })
        .await
    }

    async fn notify_caregivers(
        &self,
        log: &ReminderLog,
        reminder: &Reminder,
    ) -> anyhow::Result<()> {
        self.post(&AdherenceHookEvent::caregivers(log, reminder))
            .await
    }
}

pub struct LogAdherenceHooks {}

#[async_trait::async_trait]
impl IAdherenceHooks for LogAdherenceHooks {
    async fn evaluate_achievements(&self, user_id: &ID) -> anyhow::Result<()> {
        info!("Achievements should be evaluated for user: {}", user_id);
        Ok(())
    }

    async fn notify_caregivers(
        &self,
        log: &ReminderLog,
        reminder: &Reminder,
    ) -> anyhow::Result<()> {
        info!(
            "Caregivers of user: {} should know that log: {} got declined",
            reminder.user_id, log.id
        );
        Ok(())
    }
}

/// Records hook invocations for tests
pub struct InMemoryAdherenceHooks {
    events: Mutex<Vec<AdherenceHookEvent>>,
}

impl InMemoryAdherenceHooks {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<AdherenceHookEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: AdherenceHookEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for InMemoryAdherenceHooks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IAdherenceHooks for InMemoryAdherenceHooks {
    async fn evaluate_achievements(&self, user_id: &ID) -> anyhow::Result<()> {
        self.record(AdherenceHookEvent::EvaluateAchievements {
            user_id: user_id.clone(),
        });
        Ok(())
    }

    async fn notify_caregivers(
        &self,
        log: &ReminderLog,
        reminder: &Reminder,
    ) -> anyhow::Result<()> {
        self.record(AdherenceHookEvent::caregivers(log, reminder));
        Ok(())
    }
}
