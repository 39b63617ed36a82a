use crate::{APIResponse, BaseClient};
use medremind_api_structs::*;
use medremind_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ItemClient {
    base: Arc<BaseClient>,
}

impl ItemClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn restock(
        &self,
        item_id: &ID,
        quantity: f64,
    ) -> APIResponse<restock_item::APIResponse> {
        let body = restock_item::RequestBody { quantity };
        self.base
            .post(body, format!("items/{}/restock", item_id), StatusCode::OK)
            .await
    }
}
