use super::IItemRepo;
use crate::repos::shared::inmemory_repo::*;
use medremind_domain::{Item, ID};

pub struct InMemoryItemRepo {
    items: std::sync::Mutex<Vec<Item>>,
}

impl InMemoryItemRepo {
    pub fn new() -> Self {
        Self {
            items: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IItemRepo for InMemoryItemRepo {
    async fn insert(&self, item: &Item) -> anyhow::Result<()> {
        insert(item, &self.items);
        Ok(())
    }

    async fn save(&self, item: &Item) -> anyhow::Result<()> {
        save(item, &self.items);
        Ok(())
    }

    async fn find(&self, item_id: &ID) -> Option<Item> {
        find(item_id, &self.items)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Item> {
        find_by(&self.items, |item| item.user_id == *user_id)
    }

    async fn find_stock_tracked(&self) -> Vec<Item> {
        find_by(&self.items, |item| item.is_stock_tracked())
    }

    async fn consume_dose(&self, item_id: &ID) -> anyhow::Result<Option<Item>> {
        Ok(update_one(item_id, &self.items, |item| {
            item.consume_dose();
            true
        }))
    }

    async fn restock(&self, item_id: &ID, quantity: f64) -> anyhow::Result<Option<Item>> {
        Ok(update_one(item_id, &self.items, |item| {
            item.restock(quantity);
            true
        }))
    }
}
