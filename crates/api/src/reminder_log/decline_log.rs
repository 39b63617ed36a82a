use super::{resolve_log, subscribers::NotifyCaregiversOnDecline, ResolveError, ResolvedLog};
use crate::{
    error::MedError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use medremind_api_structs::decline_log::*;
use medremind_domain::{LogStatus, ID};
use medremind_infra::MedContext;

pub async fn decline_log_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = DeclineLogUseCase {
        log_id: path.into_inner().log_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|resolved| HttpResponse::Ok().json(APIResponse::new(resolved.log, resolved.changed)))
        .map_err(MedError::from)
}

/// The user skipped the dose
#[derive(Debug)]
pub struct DeclineLogUseCase {
    pub log_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeclineLogUseCase {
    type Response = ResolvedLog;

    type Errors = ResolveError;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        resolve_log(ctx, &self.log_id, LogStatus::Missed).await
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(NotifyCaregiversOnDecline)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medremind_domain::{NagPolicy, Reminder, ReminderLog, ReminderSchedule};
    use medremind_infra::{AdherenceHookEvent, InMemoryAdherenceHooks};
    use std::sync::Arc;

    #[actix_web::main]
    #[test]
    async fn decline_marks_missed_and_tells_caregivers_once() {
        let mut ctx = MedContext::create_inmemory();
        let hooks = Arc::new(InMemoryAdherenceHooks::new());
        ctx.services.hooks = hooks.clone();

        let reminder = Reminder {
            id: Default::default(),
            user_id: Default::default(),
            item_id: None,
            label: Some("Insulin".into()),
            schedule: ReminderSchedule::Interval { interval_hours: 8 },
            timezone: chrono_tz::UTC,
            nag: NagPolicy {
                enabled: false,
                interval_minutes: 10,
            },
            snooze_limit: 3,
            active: true,
            created: 0,
            updated: 0,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        let log = ReminderLog::new(&reminder, 1000);
        ctx.repos.reminder_logs.insert(&log).await.unwrap();

        let decline = || DeclineLogUseCase {
            log_id: log.id.clone(),
        };
        let resolved = execute(decline(), &ctx).await.unwrap();
        assert!(resolved.changed);
        assert_eq!(resolved.log.status, LogStatus::Missed);
        assert_eq!(resolved.log.taken_at, None);

        let resolved = execute(decline(), &ctx).await.unwrap();
        assert!(!resolved.changed);

        assert_eq!(
            hooks.events(),
            vec![AdherenceHookEvent::NotifyCaregivers {
                user_id: reminder.user_id.clone(),
                reminder_id: reminder.id.clone(),
                log_id: log.id.clone(),
                scheduled_for: 1000,
            }]
        );
    }
}
