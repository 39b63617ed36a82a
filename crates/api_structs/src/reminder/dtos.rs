use medremind_domain::{NagPolicy, Reminder, ReminderSchedule, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub item_id: Option<ID>,
    pub label: Option<String>,
    pub schedule: ReminderSchedule,
    pub timezone: String,
    pub nag: NagPolicy,
    pub snooze_limit: u32,
    pub active: bool,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            item_id: reminder.item_id,
            label: reminder.label,
            schedule: reminder.schedule,
            timezone: reminder.timezone.name().to_string(),
            nag: reminder.nag,
            snooze_limit: reminder.snooze_limit,
            active: reminder.active,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}

/// A one shot fire that got armed by a trigger
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ArmedTriggerDTO {
    pub reminder_id: ID,
    pub fire_at: i64,
}
