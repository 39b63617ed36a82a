use super::{confirm_log::ConfirmLogUseCase, decline_log::DeclineLogUseCase, ResolvedLog};
use crate::shared::usecase::Subscriber;
use medremind_infra::MedContext;
use tracing::{error, info};

pub struct ConsumeDoseOnConfirm;

#[async_trait::async_trait(?Send)]
impl Subscriber<ConfirmLogUseCase> for ConsumeDoseOnConfirm {
    async fn notify(&self, resolved: &ResolvedLog, ctx: &MedContext) {
        if !resolved.changed {
            return;
        }
        let item_id = match ctx.repos.reminders.find(&resolved.log.reminder_id).await {
            Some(reminder) => match reminder.item_id {
                Some(item_id) => item_id,
                None => return,
            },
            None => return,
        };

        match ctx.repos.items.consume_dose(&item_id).await {
            Ok(Some(item)) => info!(
                "Item: {} has {} left after log: {}",
                item.id, item.stock_remaining, resolved.log.id
            ),
            Ok(None) => (),
            Err(e) => error!(
                "Unable to consume a dose of item: {} for log: {}. Error: {:?}",
                item_id, resolved.log.id, e
            ),
        }
    }
}

pub struct EvaluateAchievementsOnConfirm;

#[async_trait::async_trait(?Send)]
impl Subscriber<ConfirmLogUseCase> for EvaluateAchievementsOnConfirm {
    async fn notify(&self, resolved: &ResolvedLog, ctx: &MedContext) {
        if !resolved.changed {
            return;
        }
        if let Err(e) = ctx
            .services
            .hooks
            .evaluate_achievements(&resolved.log.user_id)
            .await
        {
            error!(
                "Unable to evaluate achievements of user: {}. Error: {:?}",
                resolved.log.user_id, e
            );
        }
    }
}

pub struct NotifyCaregiversOnDecline;

#[async_trait::async_trait(?Send)]
impl Subscriber<DeclineLogUseCase> for NotifyCaregiversOnDecline {
    async fn notify(&self, resolved: &ResolvedLog, ctx: &MedContext) {
        if !resolved.changed {
            return;
        }
        let reminder = match ctx.repos.reminders.find(&resolved.log.reminder_id).await {
            Some(reminder) => reminder,
            None => return,
        };
        if let Err(e) = ctx
            .services
            .hooks
            .notify_caregivers(&resolved.log, &reminder)
            .await
        {
            error!(
                "Unable to notify caregivers about log: {}. Error: {:?}",
                resolved.log.id, e
            );
        }
    }
}
