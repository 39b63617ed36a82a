use crate::shared::entity::{Entity, ID};

/// A medication or anything else a `Reminder` can be about. Items with
/// `track_stock` are watched for running low.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    /// Amount consumed by one confirmed reminder
    pub dose_size: f64,
    pub stock_remaining: f64,
    /// Falls back to the configured default when `None`
    pub low_stock_threshold: Option<f64>,
    pub track_stock: bool,
    pub archived: bool,
}

impl Entity for Item {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Item {
    pub fn new(user_id: ID, name: String) -> Self {
        Self {
            id: Default::default(),
            user_id,
            name,
            dose_size: 1.0,
            stock_remaining: 0.0,
            low_stock_threshold: None,
            track_stock: false,
            archived: false,
        }
    }

    pub fn is_stock_tracked(&self) -> bool {
        self.track_stock && !self.archived
    }

    pub fn threshold(&self, default_threshold: f64) -> f64 {
        self.low_stock_threshold.unwrap_or(default_threshold)
    }

    pub fn is_low_stock(&self, default_threshold: f64) -> bool {
        self.stock_remaining <= self.threshold(default_threshold)
    }

    /// Takes one dose out of the stock, never going below zero
    pub fn consume_dose(&mut self) {
        self.stock_remaining = (self.stock_remaining - self.dose_size).max(0.0);
    }

    pub fn restock(&mut self, quantity: f64) {
        self.stock_remaining += quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consuming_is_floored_at_zero() {
        let mut item = Item::new(ID::new(), "Aspirin".into());
        item.stock_remaining = 1.5;
        item.dose_size = 1.0;
        item.consume_dose();
        assert_eq!(item.stock_remaining, 0.5);
        item.consume_dose();
        assert_eq!(item.stock_remaining, 0.0);
    }

    #[test]
    fn low_stock_uses_own_threshold_first() {
        let mut item = Item::new(ID::new(), "Vitamin D".into());
        item.stock_remaining = 3.0;
        assert!(item.is_low_stock(3.0));
        item.low_stock_threshold = Some(2.0);
        assert!(!item.is_low_stock(3.0));
    }

    #[test]
    fn archived_items_are_not_tracked() {
        let mut item = Item::new(ID::new(), "Insulin".into());
        assert!(!item.is_stock_tracked());
        item.track_stock = true;
        assert!(item.is_stock_tracked());
        item.archived = true;
        assert!(!item.is_stock_tracked());
    }
}
