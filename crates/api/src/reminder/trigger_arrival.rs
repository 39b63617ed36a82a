use super::ArmedTrigger;
use crate::{
    error::MedError,
    scheduler::Scheduler,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::Duration;
use medremind_api_structs::trigger_arrival::*;
use medremind_domain::{ScheduleKind, ID};
use medremind_infra::MedContext;

pub async fn trigger_arrival_controller(
    path: web::Path<PathParams>,
    body: Option<web::Json<RequestBody>>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let body = body.map(|body| body.into_inner()).unwrap_or_default();
    let usecase = TriggerArrivalUseCase {
        user_id: path.into_inner().user_id,
        reminder_id: body.reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|armed| {
            HttpResponse::Ok().json(APIResponse {
                armed: armed.into_iter().map(Into::into).collect(),
            })
        })
        .map_err(MedError::from)
}

/// The user arrived at a location. Proximity is decided by the caller, this
/// only fires the geo reminders right away.
#[derive(Debug)]
pub struct TriggerArrivalUseCase {
    pub user_id: ID,
    /// Only this reminder, otherwise every geo reminder of the user
    pub reminder_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    ReminderNotFound(ID),
}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::ReminderNotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for TriggerArrivalUseCase {
    type Response = Vec<ArmedTrigger>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let reminders = match &self.reminder_id {
            Some(reminder_id) => match ctx.repos.reminders.find(reminder_id).await {
                Some(reminder) if reminder.user_id == self.user_id => vec![reminder],
                _ => return Err(UseCaseErrors::ReminderNotFound(reminder_id.clone())),
            },
            None => ctx.repos.reminders.find_by_user(&self.user_id).await,
        };

        let now = ctx.sys.get_timestamp_millis();
        let scheduler = Scheduler::new(ctx);
        let armed = reminders
            .into_iter()
            .filter(|reminder| {
                reminder.active && reminder.schedule.kind() == ScheduleKind::GeoTrigger
            })
            .map(|reminder| {
                scheduler.arm_trigger(&reminder.id, Duration::zero());
                ArmedTrigger {
                    reminder_id: reminder.id,
                    fire_at: now,
                }
            })
            .collect();

        Ok(armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medremind_domain::{NagPolicy, Reminder, ReminderSchedule};
    use medremind_infra::InMemoryNotifier;
    use std::sync::Arc;

    fn geo_reminder(user_id: &ID) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: user_id.clone(),
            item_id: None,
            label: Some("Pharmacy pickup".into()),
            schedule: ReminderSchedule::GeoTrigger {
                lat: 55.75,
                lon: 37.62,
            },
            timezone: chrono_tz::Europe::Moscow,
            nag: NagPolicy {
                enabled: false,
                interval_minutes: 10,
            },
            snooze_limit: 3,
            active: true,
            created: 0,
            updated: 0,
        }
    }

    #[actix_web::main]
    #[test]
    async fn fires_geo_reminders_right_away() {
        let mut ctx = MedContext::create_inmemory();
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.services.notifier = notifier.clone();
        let user_id = ID::new();
        let reminder = geo_reminder(&user_id);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let armed = execute(
            TriggerArrivalUseCase {
                user_id: user_id.clone(),
                reminder_id: None,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(armed.len(), 1);

        actix_web::rt::time::sleep(std::time::Duration::from_millis(100)).await;
        let sent = notifier.sent_to(&user_id);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "Time for Pharmacy pickup");
        assert_eq!(ctx.repos.reminder_logs.find_by_reminder(&reminder.id).await.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn named_reminder_must_belong_to_the_user() {
        let ctx = MedContext::create_inmemory();
        let reminder = geo_reminder(&ID::new());
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let res = TriggerArrivalUseCase {
            user_id: ID::new(),
            reminder_id: Some(reminder.id.clone()),
        }
        .execute(&ctx)
        .await;
        assert_eq!(res, Err(UseCaseErrors::ReminderNotFound(reminder.id)));
    }
}
