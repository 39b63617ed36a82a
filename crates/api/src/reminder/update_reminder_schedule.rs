use super::subscribers::RescheduleOnReminderUpdated;
use crate::shared::usecase::{Subscriber, UseCase};
use medremind_domain::{timezone::resolve_timezone, Reminder, ReminderSchedule, ValidationError, ID};
use medremind_infra::MedContext;

/// Edits when a reminder fires. Every field left as `None` is kept as is.
#[derive(Debug, Default)]
pub struct UpdateReminderScheduleUseCase {
    pub reminder_id: ID,
    pub schedule: Option<ReminderSchedule>,
    pub nag_enabled: Option<bool>,
    pub nag_interval_minutes: Option<u32>,
    pub snooze_limit: Option<u32>,
    /// Free text, goes through the timezone resolver
    pub timezone: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidSchedule(ValidationError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderScheduleUseCase {
    type Response = Reminder;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &MedContext) -> Result<Self::Response, Self::Errors> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.reminder_id.clone()))?;

        if let Some(schedule) = &self.schedule {
            reminder.schedule = schedule.clone();
        }
        if let Some(enabled) = self.nag_enabled {
            reminder.nag.enabled = enabled;
        }
        if let Some(interval_minutes) = self.nag_interval_minutes {
            reminder.nag.interval_minutes = interval_minutes;
        }
        if let Some(snooze_limit) = self.snooze_limit {
            reminder.snooze_limit = snooze_limit;
        }
        if let Some(timezone) = &self.timezone {
            reminder.timezone = resolve_timezone(timezone).ok_or_else(|| {
                UseCaseErrors::InvalidSchedule(ValidationError::UnknownTimezone(timezone.clone()))
            })?;
        }
        reminder.validate().map_err(UseCaseErrors::InvalidSchedule)?;
        reminder.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RescheduleOnReminderUpdated)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scheduler::Scheduler, shared::usecase::execute};
    use chrono::NaiveTime;
    use medremind_domain::NagPolicy;
    use medremind_infra::TimerKey;

    async fn setup() -> (MedContext, Reminder) {
        let ctx = MedContext::create_inmemory();
        let reminder = Reminder {
            id: Default::default(),
            user_id: Default::default(),
            item_id: None,
            label: None,
            schedule: ReminderSchedule::EventOffset {
                event_label: "dinner".into(),
                offset_minutes: 15,
            },
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
        (ctx, reminder)
    }

    #[actix_web::main]
    #[test]
    async fn reschedules_with_the_new_schedule_and_timezone() {
        let (ctx, reminder) = setup().await;
        let log_id = ID::new();
        Scheduler::new(&ctx).arm_nag(&reminder, &log_id);
        assert_eq!(ctx.timers.live_timers(&log_id), 1);

        let usecase = UpdateReminderScheduleUseCase {
            reminder_id: reminder.id.clone(),
            schedule: Some(ReminderSchedule::FixedTime {
                time_of_day: NaiveTime::from_hms_opt(7, 45, 0).unwrap(),
            }),
            timezone: Some("Томск".into()),
            ..Default::default()
        };
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.timezone, chrono_tz::Asia::Tomsk);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.map(|r| r.schedule),
            Some(updated.schedule.clone())
        );
        assert_eq!(
            ctx.timers.live_keys(&reminder.id),
            vec![TimerKey::Reminder(reminder.id.clone())]
        );
        // The pending log still gets its nag
        assert_eq!(ctx.timers.live_timers(&log_id), 1);
    }

    #[actix_web::main]
    #[test]
    async fn invalid_edits_change_nothing() {
        let (ctx, reminder) = setup().await;

        let res = UpdateReminderScheduleUseCase {
            reminder_id: reminder.id.clone(),
            timezone: Some("Nowhereistan".into()),
            ..Default::default()
        }
        .execute(&ctx)
        .await;
        assert_eq!(
            res,
            Err(UseCaseErrors::InvalidSchedule(
                ValidationError::UnknownTimezone("Nowhereistan".into())
            ))
        );

        let res = UpdateReminderScheduleUseCase {
            reminder_id: reminder.id.clone(),
            nag_interval_minutes: Some(0),
            ..Default::default()
        }
        .execute(&ctx)
        .await;
        assert!(matches!(res, Err(UseCaseErrors::InvalidSchedule(_))));

        assert_eq!(ctx.repos.reminders.find(&reminder.id).await, Some(reminder));
    }
}
