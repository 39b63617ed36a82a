use super::fire_reminder::{log_actions, reminder_subject};
use crate::shared::usecase::UseCase;
use medremind_domain::{ReminderLog, ID};
use medremind_infra::{MedContext, Notification};
use tracing::{debug, error};

/// Follow up on a log that is still unanswered
#[derive(Debug)]
pub struct SendNagUseCase {
    pub log_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    NotifierError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendNagUseCase {
    /// The nagged log, `None` if the user already responded
    type Response = Option<ReminderLog>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let log = ctx
            .repos
            .reminder_logs
            .find(&self.log_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.log_id.clone()))?;
        if !log.is_pending() {
            debug!("Log: {} is {}, no need to nag", log.id, log.status);
            return Ok(None);
        }

        let reminder = match ctx.repos.reminders.find(&log.reminder_id).await {
            Some(reminder) if reminder.active => reminder,
            _ => return Ok(None),
        };

        let subject = reminder_subject(&reminder, ctx).await;
        let notification = Notification {
            text: format!("Still waiting for you: {}", subject),
            actions: log_actions(&log.id),
        };
        ctx.services
            .notifier
            .send(&reminder.user_id, &notification)
            .await
            .map_err(|e| {
                error!("Unable to nag about log: {}. Error: {:?}", log.id, e);
                UseCaseErrors::NotifierError
            })?;

        Ok(Some(log))
    }
}
