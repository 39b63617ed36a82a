mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderLogRepo;
use medremind_domain::{LogStatus, ReminderLog, TimeSpan, ID};
pub use postgres::PostgresReminderLogRepo;

#[async_trait::async_trait]
pub trait IReminderLogRepo: Send + Sync {
    async fn insert(&self, log: &ReminderLog) -> anyhow::Result<()>;
    async fn find(&self, log_id: &ID) -> Option<ReminderLog>;
    async fn delete(&self, log_id: &ID) -> Option<ReminderLog>;
    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<ReminderLog>;
    /// Logs of the user whose `scheduled_for` is inside the timespan
    async fn find_by_user(&self, user_id: &ID, timespan: &TimeSpan) -> Vec<ReminderLog>;
    /// Compare and set: moves the log into `status` only if it is still
    /// pending. Returns the updated log when this call made the transition.
    async fn resolve_if_pending(
        &self,
        log_id: &ID,
        status: LogStatus,
        at: i64,
    ) -> anyhow::Result<Option<ReminderLog>>;
}
