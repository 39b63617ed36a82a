use crate::{APIResponse, BaseClient};
use medremind_api_structs::*;
use medremind_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

/// Actions a user takes on a fired reminder
#[derive(Clone)]
pub struct ReminderLogClient {
    base: Arc<BaseClient>,
}

impl ReminderLogClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn confirm(&self, log_id: &ID) -> APIResponse<confirm_log::APIResponse> {
        self.base
            .post((), format!("logs/{}/confirm", log_id), StatusCode::OK)
            .await
    }

    pub async fn decline(&self, log_id: &ID) -> APIResponse<decline_log::APIResponse> {
        self.base
            .post((), format!("logs/{}/decline", log_id), StatusCode::OK)
            .await
    }

    pub async fn snooze(&self, log_id: &ID, minutes: u32) -> APIResponse<snooze_log::APIResponse> {
        let body = snooze_log::RequestBody { minutes };
        self.base
            .post(body, format!("logs/{}/snooze", log_id), StatusCode::OK)
            .await
    }
}
