pub mod confirm_log;
pub mod decline_log;
pub mod get_adherence;
pub mod snooze_log;
mod subscribers;

use crate::scheduler::Scheduler;
use actix_web::web;
use medremind_domain::{LogStatus, ReminderLog, ID};
use medremind_infra::MedContext;
use tracing::debug;

/// A log after an action on it. `changed` is false when the log was no
/// longer pending and the action got ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLog {
    pub log: ReminderLog,
    pub changed: bool,
}

#[derive(Debug, PartialEq)]
pub enum ResolveError {
    NotFound(ID),
    StorageError,
}

/// Moves a pending log to `status`. Stale logs are returned untouched.
async fn resolve_log(
    ctx: &MedContext,
    log_id: &ID,
    status: LogStatus,
) -> Result<ResolvedLog, ResolveError> {
    let now = ctx.sys.get_timestamp_millis();
    let resolved = ctx
        .repos
        .reminder_logs
        .resolve_if_pending(log_id, status, now)
        .await
        .map_err(|_| ResolveError::StorageError)?;

    match resolved {
        Some(log) => {
            Scheduler::new(ctx).cancel_nag(&log.reminder_id, &log.id);
            Ok(ResolvedLog { log, changed: true })
        }
        None => {
            let log = ctx
                .repos
                .reminder_logs
                .find(log_id)
                .await
                .ok_or_else(|| ResolveError::NotFound(log_id.clone()))?;
            debug!("Log: {} is already {}, ignoring {}", log.id, log.status, status);
            Ok(ResolvedLog {
                log,
                changed: false,
            })
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/logs/{log_id}/confirm",
        web::post().to(confirm_log::confirm_log_controller),
    );
    cfg.route(
        "/logs/{log_id}/decline",
        web::post().to(decline_log::decline_log_controller),
    );
    cfg.route(
        "/logs/{log_id}/snooze",
        web::post().to(snooze_log::snooze_log_controller),
    );
    cfg.route(
        "/users/{user_id}/adherence",
        web::get().to(get_adherence::get_adherence_controller),
    );
}
