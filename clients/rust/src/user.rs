use crate::{APIResponse, BaseClient};
use medremind_api_structs::*;
use medremind_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserClient {
    base: Arc<BaseClient>,
}

pub struct SetTimezoneInput {
    pub user_id: ID,
    pub timezone: Option<String>,
    pub coordinates: Option<(f64, f64)>,
}

impl UserClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn set_timezone(
        &self,
        input: SetTimezoneInput,
    ) -> APIResponse<set_user_timezone::APIResponse> {
        let body = set_user_timezone::RequestBody {
            timezone: input.timezone,
            lat: input.coordinates.map(|(lat, _)| lat),
            lon: input.coordinates.map(|(_, lon)| lon),
        };
        self.base
            .put(body, format!("users/{}/timezone", input.user_id), StatusCode::OK)
            .await
    }

    /// Adherence over the last `days` days, the server picks the window when `None`
    pub async fn adherence(
        &self,
        user_id: &ID,
        days: Option<u32>,
    ) -> APIResponse<get_adherence::APIResponse> {
        let query = days.map(|days| format!("?days={}", days)).unwrap_or_default();
        self.base
            .get(format!("users/{}/adherence{}", user_id, query), StatusCode::OK)
            .await
    }
}
