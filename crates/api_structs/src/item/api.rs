use crate::dtos::ItemDTO;
use medremind_domain::{Item, ID};
use serde::{Deserialize, Serialize};

pub mod restock_item {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub item_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub quantity: f64,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub item: ItemDTO,
    }

    impl APIResponse {
        pub fn new(item: Item) -> Self {
            Self {
                item: ItemDTO::new(item),
            }
        }
    }
}
