use super::IReminderLogRepo;
use crate::repos::shared::inmemory_repo::*;
use medremind_domain::{LogStatus, ReminderLog, TimeSpan, ID};

pub struct InMemoryReminderLogRepo {
    logs: std::sync::Mutex<Vec<ReminderLog>>,
}

impl InMemoryReminderLogRepo {
    pub fn new() -> Self {
        Self {
            logs: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderLogRepo for InMemoryReminderLogRepo {
    async fn insert(&self, log: &ReminderLog) -> anyhow::Result<()> {
        insert(log, &self.logs);
        Ok(())
    }

    async fn find(&self, log_id: &ID) -> Option<ReminderLog> {
        find(log_id, &self.logs)
    }

    async fn delete(&self, log_id: &ID) -> Option<ReminderLog> {
        delete(log_id, &self.logs)
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<ReminderLog> {
        find_by(&self.logs, |log| log.reminder_id == *reminder_id)
    }

    async fn find_by_user(&self, user_id: &ID, timespan: &TimeSpan) -> Vec<ReminderLog> {
        find_by(&self.logs, |log| {
            log.user_id == *user_id && timespan.contains(log.scheduled_for)
        })
    }

    async fn resolve_if_pending(
        &self,
        log_id: &ID,
        status: LogStatus,
        at: i64,
    ) -> anyhow::Result<Option<ReminderLog>> {
        Ok(update_one(log_id, &self.logs, |log| log.resolve(status, at)))
    }
}
