use crate::{
    reminder::Reminder,
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// `Pending` is the only state a log can leave. `Snoozed` is terminal for the
/// row itself, the snooze creates a new pending row instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Pending,
    Taken,
    Missed,
    Snoozed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Taken => "taken",
            Self::Missed => "missed",
            Self::Snoozed => "snoozed",
        }
    }
}

impl Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "taken" => Ok(Self::Taken),
            "missed" => Ok(Self::Missed),
            "snoozed" => Ok(Self::Snoozed),
            _ => Err(()),
        }
    }
}

/// One firing of a `Reminder`. Logs are never deleted and form the adherence
/// ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderLog {
    pub id: ID,
    pub reminder_id: ID,
    pub user_id: ID,
    /// The instant the notification targeted, in millis
    pub scheduled_for: i64,
    pub status: LogStatus,
    /// Set when the log got confirmed
    pub taken_at: Option<i64>,
    /// Set on any transition out of pending
    pub resolved_at: Option<i64>,
    pub note: Option<String>,
}

impl Entity for ReminderLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl ReminderLog {
    pub fn new(reminder: &Reminder, scheduled_for: i64) -> Self {
        Self {
            id: Default::default(),
            reminder_id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            scheduled_for,
            status: LogStatus::Pending,
            taken_at: None,
            resolved_at: None,
            note: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == LogStatus::Pending
    }

    /// Moves a pending log into `status`. Returns false and leaves the log
    /// untouched when it is not pending anymore.
    pub fn resolve(&mut self, status: LogStatus, at: i64) -> bool {
        if !self.is_pending() || status == LogStatus::Pending {
            return false;
        }
        self.status = status;
        self.resolved_at = Some(at);
        if status == LogStatus::Taken {
            self.taken_at = Some(at);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::{NagPolicy, ReminderSchedule};

    fn reminder() -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: Default::default(),
            item_id: None,
            label: None,
            schedule: ReminderSchedule::Interval { interval_hours: 4 },
            timezone: chrono_tz::UTC,
            nag: NagPolicy {
                enabled: false,
                interval_minutes: 15,
            },
            snooze_limit: 3,
            active: true,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn only_pending_logs_transition() {
        let mut log = ReminderLog::new(&reminder(), 100);
        assert!(log.is_pending());
        assert!(log.resolve(LogStatus::Missed, 200));
        assert_eq!(log.resolved_at, Some(200));
        assert_eq!(log.taken_at, None);

        assert!(!log.resolve(LogStatus::Taken, 300));
        assert_eq!(log.status, LogStatus::Missed);
        assert_eq!(log.taken_at, None);
    }

    #[test]
    fn confirm_stamps_taken_at() {
        let mut log = ReminderLog::new(&reminder(), 100);
        assert!(!log.resolve(LogStatus::Pending, 150));
        assert!(log.resolve(LogStatus::Taken, 200));
        assert_eq!(log.taken_at, Some(200));
        assert_eq!(log.scheduled_for, 100);
    }

    #[test]
    fn status_round_trips_through_its_column_value() {
        for status in [
            LogStatus::Pending,
            LogStatus::Taken,
            LogStatus::Missed,
            LogStatus::Snoozed,
        ] {
            assert_eq!(status.as_str().parse::<LogStatus>(), Ok(status));
        }
        assert!("done".parse::<LogStatus>().is_err());
    }
}
