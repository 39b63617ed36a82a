use crate::{APIResponse, BaseClient};
use medremind_api_structs::*;
use medremind_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Tells the server that a reminder was edited elsewhere
    pub async fn sync(&self, reminder_id: &ID) -> APIResponse<sync_reminder::APIResponse> {
        self.base
            .post((), format!("reminders/{}/sync", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn trigger_event(
        &self,
        user_id: &ID,
        event_label: String,
    ) -> APIResponse<trigger_event::APIResponse> {
        let body = trigger_event::RequestBody { event_label };
        self.base
            .post(body, format!("users/{}/events", user_id), StatusCode::OK)
            .await
    }

    pub async fn trigger_arrival(
        &self,
        user_id: &ID,
        reminder_id: Option<ID>,
    ) -> APIResponse<trigger_arrival::APIResponse> {
        let body = trigger_arrival::RequestBody { reminder_id };
        self.base
            .post(body, format!("users/{}/arrivals", user_id), StatusCode::OK)
            .await
    }
}
