use crate::shared::usecase::UseCase;
use medremind_domain::ID;
use medremind_infra::{MedContext, Notification};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use tracing::{error, info};

/// Ids of the items that were already notified in their current low stock
/// episode. Owned by the low stock job and shared between its sweeps.
pub type NotifiedItems = Arc<Mutex<HashSet<ID>>>;

/// Level triggered sweep over every stock tracked item which notifies once
/// per low stock episode
#[derive(Debug)]
pub struct SweepLowStockUseCase {
    pub notified: NotifiedItems,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

impl SweepLowStockUseCase {
    /// Returns true if the caller is the one who should notify about `item_id`
    fn claim(&self, item_id: &ID) -> bool {
        self.notified
            .lock()
            .map(|mut notified| notified.insert(item_id.clone()))
            .unwrap_or_else(|poisoned| poisoned.into_inner().insert(item_id.clone()))
    }

    fn release(&self, item_id: &ID) {
        match self.notified.lock() {
            Ok(mut notified) => notified.remove(item_id),
            Err(poisoned) => poisoned.into_inner().remove(item_id),
        };
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SweepLowStockUseCase {
    /// Number of notifications sent
    type Response = usize;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let default_threshold = ctx.config.low_stock_threshold;
        let mut sent = 0;

        for item in ctx.repos.items.find_stock_tracked().await {
            if !item.is_low_stock(default_threshold) {
                self.release(&item.id);
                continue;
            }
            if !self.claim(&item.id) {
                continue;
            }

            let notification = Notification::text(format!(
                "Running low on {}: {} left",
                item.name, item.stock_remaining
            ));
            match ctx.services.notifier.send(&item.user_id, &notification).await {
                Ok(_) => {
                    info!("Notified user: {} about low stock of: {}", item.user_id, item.id);
                    sent += 1;
                }
                Err(e) => {
                    error!(
                        "Unable to notify about low stock of item: {}. Error: {:?}",
                        item.id, e
                    );
                    // Retried on the next sweep
                    self.release(&item.id);
                }
            }
        }

        Ok(sent)
    }
}
