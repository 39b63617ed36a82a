use super::ArmedTrigger;
use crate::{
    error::MedError,
    scheduler::Scheduler,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::Duration;
use medremind_api_structs::trigger_event::*;
use medremind_domain::{ReminderSchedule, ID};
use medremind_infra::MedContext;
use tracing::info;

pub async fn trigger_event_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedContext>,
) -> Result<HttpResponse, MedError> {
    let usecase = TriggerEventUseCase {
        user_id: path.into_inner().user_id,
        event_label: body.into_inner().event_label,
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

/// Something happened for the user, e.g. breakfast. Every active event
/// reminder with that label fires after its offset.
#[derive(Debug)]
pub struct TriggerEventUseCase {
    pub user_id: ID,
    pub event_label: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    EmptyEventLabel,
    UserNotFound(ID),
}

impl From<UseCaseErrors> for MedError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::EmptyEventLabel => {
                Self::BadClientData("The event label can not be empty".into())
            }
            UseCaseErrors::UserNotFound(id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for TriggerEventUseCase {
    type Response = Vec<ArmedTrigger>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let label = self.event_label.trim().to_lowercase();
        if label.is_empty() {
            return Err(UseCaseErrors::EmptyEventLabel);
        }
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseErrors::UserNotFound(self.user_id.clone()));
        }

        let now = ctx.sys.get_timestamp_millis();
        let scheduler = Scheduler::new(ctx);
        let armed = ctx
            .repos
            .reminders
            .find_by_user(&self.user_id)
            .await
            .into_iter()
            .filter(|reminder| reminder.active)
            .filter_map(|reminder| match &reminder.schedule {
                ReminderSchedule::EventOffset {
                    event_label,
                    offset_minutes,
                } if event_label.trim().to_lowercase() == label => {
                    let delay = Duration::minutes(i64::from(*offset_minutes));
                    scheduler.arm_trigger(&reminder.id, delay);
                    Some(ArmedTrigger {
                        reminder_id: reminder.id,
                        fire_at: now + delay.num_milliseconds(),
                    })
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        info!(
            "Event: {} of user: {} armed {} reminders",
            label,
            self.user_id,
            armed.len()
        );
        Ok(armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medremind_domain::{NagPolicy, Reminder, User};

    fn event_reminder(user: &User, label: &str, offset_minutes: u32) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: user.id.clone(),
            item_id: None,
            label: None,
            schedule: ReminderSchedule::EventOffset {
                event_label: label.into(),
                offset_minutes,
            },
            timezone: chrono_tz::UTC,
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
    async fn arms_matching_active_reminders_only() {
        let ctx = MedContext::create_inmemory();
        let user = User::new("Ivan".into());
        ctx.repos.users.insert(&user).await.unwrap();

        let after_breakfast = event_reminder(&user, "Breakfast", 30);
        let mut paused = event_reminder(&user, "breakfast", 0);
        paused.active = false;
        let after_lunch = event_reminder(&user, "lunch", 0);
        for reminder in [&after_breakfast, &paused, &after_lunch].iter() {
            ctx.repos.reminders.insert(reminder).await.unwrap();
        }

        let now = ctx.sys.get_timestamp_millis();
        let armed = TriggerEventUseCase {
            user_id: user.id.clone(),
            event_label: "  BREAKFAST ".into(),
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert_eq!(armed.len(), 1);
        assert_eq!(armed[0].reminder_id, after_breakfast.id);
        assert!(armed[0].fire_at >= now + 30 * 60 * 1000);
        assert_eq!(ctx.timers.live_timers(&after_breakfast.id), 1);
        assert_eq!(ctx.timers.live_timers(&paused.id), 0);
        assert_eq!(ctx.timers.live_timers(&after_lunch.id), 0);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_blank_labels_and_unknown_users() {
        let ctx = MedContext::create_inmemory();
        let res = TriggerEventUseCase {
            user_id: ID::new(),
            event_label: "   ".into(),
        }
        .execute(&ctx)
        .await;
        assert_eq!(res, Err(UseCaseErrors::EmptyEventLabel));

        let user_id = ID::new();
        let res = TriggerEventUseCase {
            user_id: user_id.clone(),
            event_label: "dinner".into(),
        }
        .execute(&ctx)
        .await;
        assert_eq!(res, Err(UseCaseErrors::UserNotFound(user_id)));
    }
}
