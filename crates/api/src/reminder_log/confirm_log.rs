use super::{
    resolve_log,
    subscribers::{ConsumeDoseOnConfirm, EvaluateAchievementsOnConfirm},
    ResolveError, ResolvedLog,
};
use crate::{
    error::MedError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use medremind_api_structs::confirm_log::*;
use medremind_domain::{LogStatus, ID};
use medremind_infra::MedContext;

pub async fn confirm_log_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = ConfirmLogUseCase {
        log_id: path.into_inner().log_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|resolved| HttpResponse::Ok().json(APIResponse::new(resolved.log, resolved.changed)))
        .map_err(MedError::from)
}

/// The user took the medication
#[derive(Debug)]
pub struct ConfirmLogUseCase {
    pub log_id: ID,
}

impl From<ResolveError> for MedError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound(id) => {
                Self::NotFound(format!("The log with id: {}, was not found.", id))
            }
            ResolveError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ConfirmLogUseCase {
    type Response = ResolvedLog;

    type Errors = ResolveError;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        resolve_log(ctx, &self.log_id, LogStatus::Taken).await
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(ConsumeDoseOnConfirm),
            Box::new(EvaluateAchievementsOnConfirm),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use medremind_domain::{Item, NagPolicy, Reminder, ReminderLog, ReminderSchedule};
    use medremind_infra::{AdherenceHookEvent, InMemoryAdherenceHooks};
    use std::sync::Arc;

    struct TestContext {
        ctx: MedContext,
        hooks: Arc<InMemoryAdherenceHooks>,
        item: Item,
        reminder: Reminder,
    }

    async fn setup() -> TestContext {
        let mut ctx = MedContext::create_inmemory();
        let hooks = Arc::new(InMemoryAdherenceHooks::new());
        ctx.services.hooks = hooks.clone();

        let mut item = Item::new(ID::new(), "Metformin".into());
        item.track_stock = true;
        item.dose_size = 2.0;
        item.stock_remaining = 3.0;
        ctx.repos.items.insert(&item).await.unwrap();

        let reminder = Reminder {
            id: Default::default(),
            user_id: item.user_id.clone(),
            item_id: Some(item.id.clone()),
            label: None,
            schedule: ReminderSchedule::Interval { interval_hours: 12 },
            timezone: chrono_tz::UTC,
            nag: NagPolicy {
                enabled: true,
                interval_minutes: 10,
            },
            snooze_limit: 3,
            active: true,
            created: 0,
            updated: 0,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        TestContext {
            ctx,
            hooks,
            item,
            reminder,
        }
    }

    #[actix_web::main]
    #[test]
    async fn confirm_takes_the_dose_once() {
        let TestContext {
            ctx,
            hooks,
            item,
            reminder,
        } = setup().await;
        let log = ReminderLog::new(&reminder, 1000);
        ctx.repos.reminder_logs.insert(&log).await.unwrap();
        Scheduler::new(&ctx).arm_nag(&reminder, &log.id);

        let confirm = || ConfirmLogUseCase {
            log_id: log.id.clone(),
        };
        let resolved = execute(confirm(), &ctx).await.unwrap();
        assert!(resolved.changed);
        assert_eq!(resolved.log.status, LogStatus::Taken);
        assert!(resolved.log.taken_at.is_some());
        assert_eq!(ctx.timers.live_timers(&log.id), 0);

        // A duplicate tap changes nothing
        let resolved = execute(confirm(), &ctx).await.unwrap();
        assert!(!resolved.changed);

        let stock = ctx.repos.items.find(&item.id).await.map(|i| i.stock_remaining);
        assert_eq!(stock, Some(1.0));
        assert_eq!(
            hooks.events(),
            vec![AdherenceHookEvent::EvaluateAchievements {
                user_id: reminder.user_id.clone()
            }]
        );
    }

    #[actix_web::main]
    #[test]
    async fn confirm_on_a_missed_log_is_a_no_op() {
        let TestContext { ctx, reminder, .. } = setup().await;
        let log = ReminderLog::new(&reminder, 1000);
        ctx.repos.reminder_logs.insert(&log).await.unwrap();
        ctx.repos
            .reminder_logs
            .resolve_if_pending(&log.id, LogStatus::Missed, 2000)
            .await
            .unwrap();

        let resolved = execute(
            ConfirmLogUseCase {
                log_id: log.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(!resolved.changed);
        assert_eq!(resolved.log.status, LogStatus::Missed);
        assert_eq!(resolved.log.taken_at, None);
    }

    #[actix_web::main]
    #[test]
    async fn unknown_log_is_not_found() {
        let TestContext { ctx, .. } = setup().await;
        let log_id = ID::new();
        let res = ConfirmLogUseCase {
            log_id: log_id.clone(),
        }
        .execute(&ctx)
        .await;
        assert_eq!(res, Err(ResolveError::NotFound(log_id)));
    }
}
