use super::subscribers::RescheduleOnActiveChanged;
use crate::shared::usecase::{Subscriber, UseCase};
use medremind_domain::{Reminder, ID};
use medremind_infra::MedContext;

/// Pauses or resumes a reminder
#[derive(Debug)]
pub struct SetReminderActiveUseCase {
    pub reminder_id: ID,
    pub active: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetReminderActiveUseCase {
    type Response = Reminder;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.reminder_id.clone()))?;

        reminder.active = self.active;
        reminder.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RescheduleOnActiveChanged)]
    }
}
