use crate::{
    error::MedError,
    scheduler::Scheduler,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::Duration;
use medremind_api_structs::snooze_log::*;
use medremind_domain::{LogStatus, ReminderLog, ValidationError, ID};
use medremind_infra::MedContext;
use tracing::info;

pub async fn snooze_log_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = SnoozeLogUseCase {
        log_id: path.into_inner().log_id,
        minutes: body.into_inner().minutes,
    };

    execute(usecase, &ctx)
        .await
        .map(|snoozed| {
            HttpResponse::Ok().json(APIResponse::new(
                snoozed.log,
                snoozed.new_log,
                Some(snoozed.snooze_limit),
            ))
        })
        .map_err(MedError::from)
}

/// Closes a pending log as snoozed and schedules a fresh log `minutes` later
#[derive(Debug)]
pub struct SnoozeLogUseCase {
    pub log_id: ID,
    pub minutes: u32,
}

#[derive(Debug, PartialEq)]
pub struct SnoozedLog {
    /// The original log, `snoozed` unless it was not pending anymore
    pub log: ReminderLog,
    /// The pending log that replaces it
    pub new_log: Option<ReminderLog>,
    /// Declared limit of the reminder, left to the caller to enforce
    pub snooze_limit: u32,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidMinutes(ValidationError),
    LogNotFound(ID),
    ReminderNotFound(ID),
    StorageError,
}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidMinutes(e) => Self::BadClientData(e.to_string()),
            UseCaseErrors::LogNotFound(id) => {
                Self::NotFound(format!("The log with id: {}, was not found.", id))
            }
            UseCaseErrors::ReminderNotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SnoozeLogUseCase {
    type Response = SnoozedLog;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        if self.minutes < 1 {
            return Err(UseCaseErrors::InvalidMinutes(
                ValidationError::NonPositiveSnooze(i64::from(self.minutes)),
            ));
        }

        let log = ctx
            .repos
            .reminder_logs
            .find(&self.log_id)
            .await
            .ok_or_else(|| UseCaseErrors::LogNotFound(self.log_id.clone()))?;
        let reminder = ctx
            .repos
            .reminders
            .find(&log.reminder_id)
            .await
            .ok_or_else(|| UseCaseErrors::ReminderNotFound(log.reminder_id.clone()))?;

        if !reminder.active {
            info!(
                "Reminder: {} is paused, ignoring snooze of log: {}",
                reminder.id, log.id
            );
            return Ok(SnoozedLog {
                log,
                new_log: None,
                snooze_limit: reminder.snooze_limit,
            });
        }
        if !log.is_pending() {
            info!("Log: {} is {}, ignoring snooze", log.id, log.status);
            return Ok(SnoozedLog {
                log,
                new_log: None,
                snooze_limit: reminder.snooze_limit,
            });
        }

        // The replacement is stored first so that a failed write leaves the
        // original log pending
        let now = ctx.sys.get_timestamp_millis();
        let delay = Duration::minutes(i64::from(self.minutes));
        let new_log = ReminderLog::new(&reminder, now + delay.num_milliseconds());
        ctx.repos
            .reminder_logs
            .insert(&new_log)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let snoozed = ctx
            .repos
            .reminder_logs
            .resolve_if_pending(&log.id, LogStatus::Snoozed, now)
            .await;
        let snoozed = match snoozed {
            Ok(Some(snoozed)) => snoozed,
            Ok(None) => {
                // Answered in the meantime
                ctx.repos.reminder_logs.delete(&new_log.id).await;
                let log = ctx.repos.reminder_logs.find(&log.id).await.unwrap_or(log);
                info!("Log: {} is {}, ignoring snooze", log.id, log.status);
                return Ok(SnoozedLog {
                    log,
                    new_log: None,
                    snooze_limit: reminder.snooze_limit,
                });
            }
            Err(_) => {
                ctx.repos.reminder_logs.delete(&new_log.id).await;
                return Err(UseCaseErrors::StorageError);
            }
        };

        let scheduler = Scheduler::new(ctx);
        scheduler.cancel_nag(&reminder.id, &snoozed.id);
        scheduler.arm_fire(&reminder.id, &new_log.id, delay);

        Ok(SnoozedLog {
            log: snoozed,
            new_log: Some(new_log),
            snooze_limit: reminder.snooze_limit,
        })
    }
}
