use medremind_domain::{LogStatus, ReminderLog, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderLogDTO {
    pub id: ID,
    pub reminder_id: ID,
    pub user_id: ID,
    pub scheduled_for: i64,
    pub status: LogStatus,
    pub taken_at: Option<i64>,
    pub resolved_at: Option<i64>,
    pub note: Option<String>,
}

impl ReminderLogDTO {
    pub fn new(log: ReminderLog) -> Self {
        Self {
            id: log.id,
            reminder_id: log.reminder_id,
            user_id: log.user_id,
            scheduled_for: log.scheduled_for,
            status: log.status,
            taken_at: log.taken_at,
            resolved_at: log.resolved_at,
            note: log.note,
        }
    }
}
