use medremind_domain::{AdherenceCounts, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItemAdherenceDTO {
    /// `None` for reminders that are not about an item
    pub item_id: Option<ID>,
    pub item_name: Option<String>,
    #[serde(flatten)]
    pub counts: AdherenceCounts,
    pub adherence_percent: f64,
}
