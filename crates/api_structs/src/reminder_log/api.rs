use crate::dtos::ReminderLogDTO;
use medremind_domain::{ReminderLog, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct LogPathParams {
    pub log_id: ID,
}

/// `changed` is false when the log was not pending anymore and the action
/// was ignored
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLogResponse {
    pub log: ReminderLogDTO,
    pub changed: bool,
}

impl ResolvedLogResponse {
    pub fn new(log: ReminderLog, changed: bool) -> Self {
        Self {
            log: ReminderLogDTO::new(log),
            changed,
        }
    }
}

pub mod confirm_log {
    use super::*;

    pub type PathParams = LogPathParams;
    pub type APIResponse = ResolvedLogResponse;
}

pub mod decline_log {
    use super::*;

    pub type PathParams = LogPathParams;
    pub type APIResponse = ResolvedLogResponse;
}

pub mod snooze_log {
    use super::*;

    pub type PathParams = LogPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub minutes: u32,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub log: ReminderLogDTO,
        /// The pending log that replaces the snoozed one
        pub new_log: Option<ReminderLogDTO>,
        pub changed: bool,
        pub snooze_limit: Option<u32>,
    }

    impl APIResponse {
        pub fn new(
            log: ReminderLog,
            new_log: Option<ReminderLog>,
            snooze_limit: Option<u32>,
        ) -> Self {
            Self {
                log: ReminderLogDTO::new(log),
                changed: new_log.is_some(),
                new_log: new_log.map(ReminderLogDTO::new),
                snooze_limit,
            }
        }
    }
}
