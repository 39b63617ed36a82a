use crate::dtos::ItemAdherenceDTO;
use medremind_domain::{AdherenceCounts, ID};
use serde::{Deserialize, Serialize};

pub mod get_adherence {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct QueryParams {
        pub days: Option<u32>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub days: u32,
        #[serde(flatten)]
        pub counts: AdherenceCounts,
        pub adherence_percent: f64,
        pub items: Vec<ItemAdherenceDTO>,
    }
}
