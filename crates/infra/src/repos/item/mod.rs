mod inmemory;
mod postgres;

pub use inmemory::InMemoryItemRepo;
use medremind_domain::{Item, ID};
pub use postgres::PostgresItemRepo;

#[async_trait::async_trait]
pub trait IItemRepo: Send + Sync {
    async fn insert(&self, item: &Item) -> anyhow::Result<()>;
    async fn save(&self, item: &Item) -> anyhow::Result<()>;
    async fn find(&self, item_id: &ID) -> Option<Item>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Item>;
    /// Items that are neither archived nor excluded from stock tracking
    async fn find_stock_tracked(&self) -> Vec<Item>;
    /// Atomically takes one dose out of the stock, floored at zero
    async fn consume_dose(&self, item_id: &ID) -> anyhow::Result<Option<Item>>;
    /// Atomically adds `quantity` to the stock
    async fn restock(&self, item_id: &ID, quantity: f64) -> anyhow::Result<Option<Item>>;
}
