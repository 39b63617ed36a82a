use medremind_domain::{Item, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItemDTO {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub dose_size: f64,
    pub stock_remaining: f64,
    pub low_stock_threshold: Option<f64>,
    pub track_stock: bool,
    pub archived: bool,
}

impl ItemDTO {
    pub fn new(item: Item) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            name: item.name,
            dose_size: item.dose_size,
            stock_remaining: item.stock_remaining,
            low_stock_threshold: item.low_stock_threshold,
            track_stock: item.track_stock,
            archived: item.archived,
        }
    }
}
