mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
use medremind_domain::{Reminder, ID};
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
    /// Every `Reminder` with the `active` flag set, across all users
    async fn find_active(&self) -> Vec<Reminder>;
}
