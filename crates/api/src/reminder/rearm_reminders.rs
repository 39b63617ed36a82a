use crate::{scheduler::Scheduler, shared::usecase::UseCase};
use medremind_infra::MedContext;
use tracing::info;

/// Arms the timers of every active reminder. Runs once on startup since
/// timers do not survive a restart.
#[derive(Debug)]
pub struct RearmActiveRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait(?Send)]
impl UseCase for RearmActiveRemindersUseCase {
    /// Number of reminders that got scheduled
    type Response = usize;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let scheduler = Scheduler::new(ctx);
        let reminders = ctx.repos.reminders.find_active().await;
        for reminder in &reminders {
            scheduler.schedule(reminder);
        }
        info!("Re-armed {} active reminders", reminders.len());
        Ok(reminders.len())
    }
}
