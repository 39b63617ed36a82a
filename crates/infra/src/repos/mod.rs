mod item;
mod reminder;
mod reminder_log;
mod shared;
mod user;

pub use item::IItemRepo;
use item::{InMemoryItemRepo, PostgresItemRepo};
pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
pub use reminder_log::IReminderLogRepo;
use reminder_log::{InMemoryReminderLogRepo, PostgresReminderLogRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub reminder_logs: Arc<dyn IReminderLogRepo>,
    pub items: Arc<dyn IItemRepo>,
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            reminder_logs: Arc::new(PostgresReminderLogRepo::new(pool.clone())),
            items: Arc::new(PostgresItemRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            reminder_logs: Arc::new(InMemoryReminderLogRepo::new()),
            items: Arc::new(InMemoryItemRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
        }
    }
}
