mod hooks;
mod notifier;

use crate::config::Config;
pub use hooks::{AdherenceHookEvent, IAdherenceHooks, InMemoryAdherenceHooks};
use hooks::{LogAdherenceHooks, WebhookAdherenceHooks};
pub use notifier::{INotifier, InMemoryNotifier, Notification, NotificationAction};
use notifier::{LogNotifier, WebhookNotifier};
use std::sync::Arc;

/// Outbound collaborators of the engine
#[derive(Clone)]
pub struct Services {
    pub notifier: Arc<dyn INotifier>,
    pub hooks: Arc<dyn IAdherenceHooks>,
}

impl Services {
    /// Webhook backed services where a url is configured, log only otherwise
    pub fn create(config: &Config) -> Self {
        let notifier: Arc<dyn INotifier> = match &config.notifier_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone(), config.webhook_key.clone())),
            None => Arc::new(LogNotifier {}),
        };
        let hooks: Arc<dyn IAdherenceHooks> = match &config.hooks_webhook_url {
            Some(url) => Arc::new(WebhookAdherenceHooks::new(
                url.clone(),
                config.webhook_key.clone(),
            )),
            None => Arc::new(LogAdherenceHooks {}),
        };
        Self { notifier, hooks }
    }

    pub fn create_inmemory() -> Self {
        Self {
            notifier: Arc::new(InMemoryNotifier::new()),
            hooks: Arc::new(InMemoryAdherenceHooks::new()),
        }
    }
}

/// Header carrying the configured webhook key
pub const WEBHOOK_KEY_HEADER: &str = "medremind-webhook-key";
