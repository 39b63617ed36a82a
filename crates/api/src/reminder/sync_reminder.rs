use crate::{
    error::MedError,
    scheduler::Scheduler,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use medremind_api_structs::{dtos::ReminderDTO, sync_reminder::*};
use medremind_domain::{Reminder, ID};
use medremind_infra::MedContext;

pub async fn sync_reminder_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = SyncReminderUseCase {
        reminder_id: path.into_inner().reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|synced| {
            HttpResponse::Ok().json(APIResponse {
                reminder: synced.reminder.map(ReminderDTO::new),
                live_timers: synced.live_timers,
            })
        })
        .map_err(MedError::from)
}

/// Reloads a reminder that got changed elsewhere and brings its timers in
/// line with what is stored
#[derive(Debug)]
pub struct SyncReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub struct SyncedReminder {
    pub reminder: Option<Reminder>,
    pub live_timers: usize,
}

#[derive(Debug)]
pub enum UseCaseErrors {}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncReminderUseCase {
    type Response = SyncedReminder;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let scheduler = Scheduler::new(ctx);
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => {
                let live_timers = scheduler.schedule(&reminder);
                Ok(SyncedReminder {
                    reminder: Some(reminder),
                    live_timers,
                })
            }
            None => {
                scheduler.cancel(&self.reminder_id);
                Ok(SyncedReminder {
                    reminder: None,
                    live_timers: 0,
                })
            }
        }
    }
}
