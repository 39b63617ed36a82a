use super::subscribers::ScheduleOnReminderCreated;
use crate::shared::usecase::{Subscriber, UseCase};
use medremind_domain::{NagPolicy, Reminder, ReminderSchedule, ValidationError, ID};
use medremind_infra::MedContext;

/// Persists a new reminder for a user and arms its timers
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub item_id: Option<ID>,
    pub label: Option<String>,
    pub schedule: ReminderSchedule,
    pub nag_enabled: bool,
    /// Falls back to the configured default
    pub nag_interval_minutes: Option<u32>,
    /// Falls back to the configured default
    pub snooze_limit: Option<u32>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    UserNotFound(ID),
    ItemNotFound(ID),
    InvalidSchedule(ValidationError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or_else(|| UseCaseErrors::UserNotFound(self.user_id.clone()))?;

        if let Some(item_id) = &self.item_id {
            match ctx.repos.items.find(item_id).await {
                Some(item) if item.user_id == user.id => (),
                _ => return Err(UseCaseErrors::ItemNotFound(item_id.clone())),
            }
        }

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder {
            id: Default::default(),
            user_id: user.id,
            item_id: self.item_id.clone(),
            label: self.label.clone(),
            schedule: self.schedule.clone(),
            timezone: user.timezone,
            nag: NagPolicy {
                enabled: self.nag_enabled,
                interval_minutes: self
                    .nag_interval_minutes
                    .unwrap_or(ctx.config.default_nag_interval_minutes),
            },
            snooze_limit: self.snooze_limit.unwrap_or(ctx.config.default_snooze_limit),
            active: true,
            created: now,
            updated: now,
        };
        reminder.validate().map_err(UseCaseErrors::InvalidSchedule)?;

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleOnReminderCreated)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::NaiveTime;
    use medremind_domain::{Item, User};

    async fn setup() -> (MedContext, User) {
        let ctx = MedContext::create_inmemory();
        let mut user = User::new("Maria".into());
        user.timezone = chrono_tz::Asia::Tomsk;
        ctx.repos.users.insert(&user).await.unwrap();
        (ctx, user)
    }

    fn usecase(user: &User, schedule: ReminderSchedule) -> CreateReminderUseCase {
        CreateReminderUseCase {
            user_id: user.id.clone(),
            item_id: None,
            label: Some("Vitamins".into()),
            schedule,
            nag_enabled: true,
            nag_interval_minutes: None,
            snooze_limit: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn snapshots_timezone_applies_defaults_and_schedules() {
        let (ctx, user) = setup().await;
        let schedule = ReminderSchedule::FixedTime {
            time_of_day: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        };

        let reminder = execute(usecase(&user, schedule), &ctx).await.unwrap();
        assert_eq!(reminder.timezone, chrono_tz::Asia::Tomsk);
        assert_eq!(reminder.nag.interval_minutes, ctx.config.default_nag_interval_minutes);
        assert_eq!(reminder.snooze_limit, ctx.config.default_snooze_limit);
        assert!(reminder.active);
        assert_eq!(ctx.repos.reminders.find(&reminder.id).await, Some(reminder.clone()));
        assert_eq!(ctx.timers.live_timers(&reminder.id), 1);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_schedules_without_persisting() {
        let (ctx, user) = setup().await;

        let res = execute(
            usecase(&user, ReminderSchedule::Interval { interval_hours: 0 }),
            &ctx,
        )
        .await;
        assert_eq!(
            res,
            Err(UseCaseErrors::InvalidSchedule(
                ValidationError::NonPositiveInterval(0)
            ))
        );
        assert!(ctx.repos.reminders.find_by_user(&user.id).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_items_of_other_users() {
        let (ctx, user) = setup().await;
        let item = Item::new(ID::new(), "Not mine".into());
        ctx.repos.items.insert(&item).await.unwrap();

        let mut usecase = usecase(&user, ReminderSchedule::Interval { interval_hours: 2 });
        usecase.item_id = Some(item.id.clone());
        let res = usecase.execute(&ctx).await;
        assert_eq!(res, Err(UseCaseErrors::ItemNotFound(item.id)));

        let mut unknown_user = usecase;
        unknown_user.user_id = ID::new();
        assert!(matches!(
            unknown_user.execute(&ctx).await,
            Err(UseCaseErrors::UserNotFound(_))
        ));
    }
}
