use crate::dtos::{ArmedTriggerDTO, ReminderDTO};
use medremind_domain::ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggersResponse {
    pub armed: Vec<ArmedTriggerDTO>,
}

pub mod sync_reminder {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// `None` when the reminder does not exist anymore
        pub reminder: Option<ReminderDTO>,
        pub live_timers: usize,
    }
}

pub mod trigger_event {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub event_label: String,
    }

    pub type APIResponse = TriggersResponse;
}

pub mod trigger_arrival {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Every geo reminder of the user is triggered when missing
        #[serde(default)]
        pub reminder_id: Option<ID>,
    }

    pub type APIResponse = TriggersResponse;
}
